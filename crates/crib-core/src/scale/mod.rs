//! Scales mapping data values onto drawing coordinates and colors.

pub mod band;
pub mod color;
pub mod linear;

pub use band::BandScale;
pub use color::ColorScale;
pub use linear::LinearScale;
