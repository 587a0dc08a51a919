//! Text meshes from three.js typeface fonts.

pub mod font;
pub mod geometry;

pub use font::{Contour, Font, Glyph, PathCommand};
pub use geometry::{build_text_mesh, TextOptions};
