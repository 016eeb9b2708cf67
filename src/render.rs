/// Output frame buffers.
pub mod frame;
/// The per-frame synthesis pipeline.
pub mod synth;
