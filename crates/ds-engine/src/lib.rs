pub mod dither;
/// Halftone engine for dotscreen.
///
/// Turns pixel buffers into grids of luminance-scaled ink discs.
pub mod engine;
pub mod renderer;
pub mod sampler;
