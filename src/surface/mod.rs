pub mod raster;
pub mod recorder;

pub use raster::Raster;
pub use recorder::{DrawOp, Recorder};

use crate::color::Fill;
use crate::error::SurfaceError;

pub type SurfaceResult = Result<(), SurfaceError>;

/// Drawing target the painters render onto.
///
/// Coordinates outside the surface are legal and must be clipped by the
/// implementation.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, fill: Fill) -> SurfaceResult;

    fn set_pixel(&mut self, x: i64, y: i64, fill: Fill) -> SurfaceResult {
        self.fill_rect(x, y, 1, 1, fill)
    }
}
