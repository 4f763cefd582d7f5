//! Symmetric ink blot generator.
//!
//! A painter walks over the left half of a [`Surface`] and every mark it makes
//! is reflected across the vertical centerline. Two painters are provided:
//! [`RandomWalkBrushPainter`] lays down small colored rectangles along a
//! jittering walk, [`DiffusionFieldPainter`] blurs a seeded intensity field
//! into a soft black blot.

pub mod color;
pub mod config;
pub mod error;
pub mod painter;
pub mod random;
pub mod surface;

pub use color::{Color, Fill, Palette};
pub use config::{BlurMode, ColorRange, PainterConfig};
pub use error::Error;
pub use painter::{DiffusionFieldPainter, Engine, Painter, RandomWalkBrushPainter};
pub use random::RandomSource;
pub use surface::{Raster, Recorder, Surface};
