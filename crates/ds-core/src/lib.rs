/// Types, paramètres et configuration partagés de dotscreen.
///
/// This crate contains the pixel buffer, cell grid, parameter set, and
/// error types used across the dotscreen workspace.

pub mod buffer;
pub mod config;
pub mod error;
pub mod grid;
pub mod params;

pub use buffer::PixelBuffer;
pub use error::HalftoneError;
pub use grid::{Cell, CellGrid};
pub use params::{Background, DitherMode, HalftoneParams};
