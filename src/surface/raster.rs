use super::{Surface, SurfaceResult};
use crate::color::{Color, Fill, OutputColor, COLOR_CHANNELS};
use ultraviolet::{Lerp, Vec3};

/// In-memory RGB canvas. Fills are composited source-over.
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Vec3>,
}

impl Raster {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::from(background); width as usize * height as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<OutputColor> {
        if x < self.width && y < self.height {
            Some(quantize(self.pixels[self.index(x, y)]))
        } else {
            None
        }
    }

    /// 8bpp RGB, row-major, top row first.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixels.len() * COLOR_CHANNELS);
        for p in self.pixels.iter() {
            data.extend_from_slice(&quantize(*p));
        }
        data
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Intersects a rectangle with the canvas, returning half-open bounds.
    fn clip(&self, x: i64, y: i64, w: u32, h: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(w)).min(i64::from(self.width));
        let y1 = (y + i64::from(h)).min(i64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            None
        } else {
            Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
        }
    }
}

fn quantize(c: Vec3) -> OutputColor {
    let c = c.clamped(Vec3::zero(), Vec3::one()) * 255.;
    [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8]
}

impl Surface for Raster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, fill: Fill) -> SurfaceResult {
        let (x0, y0, x1, y1) = match self.clip(x, y, w, h) {
            Some(bounds) => bounds,
            None => return Ok(()),
        };
        let src = Vec3::from(fill.color);
        for y in y0..y1 {
            for x in x0..x1 {
                let i = self.index(x, y);
                self.pixels[i] = self.pixels[i].lerp(src, fill.alpha);
            }
        }
        Ok(())
    }
}
