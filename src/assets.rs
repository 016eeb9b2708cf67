/// Decoding and resizing the base image.
pub mod decode;
