use super::{Surface, SurfaceResult};
use crate::color::Fill;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOp {
    pub x: i64,
    pub y: i64,
    pub w: u32,
    pub h: u32,
    pub fill: Fill,
}

/// Surface that keeps every fill as a display list instead of rasterizing.
pub struct Recorder {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Issues the recorded fills, in order, on another surface.
    pub fn replay(&self, target: &mut dyn Surface) -> SurfaceResult {
        for op in self.ops.iter() {
            target.fill_rect(op.x, op.y, op.w, op.h, op.fill)?;
        }
        Ok(())
    }
}

impl Surface for Recorder {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, fill: Fill) -> SurfaceResult {
        self.ops.push(DrawOp { x, y, w, h, fill });
        Ok(())
    }
}
