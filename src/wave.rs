/// Time-varying scalar wave field and the per-frame scalars derived from the phase.
pub mod field;
/// Displacement maps and bilinear resampling.
pub mod remap;
