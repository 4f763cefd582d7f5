use super::Painter;
use crate::color::{Color, Fill};
use crate::config::PainterConfig;
use crate::error::Error;
use crate::random::RandomSource;
use crate::surface::Surface;
use log::debug;

/// Mutable drawing state stepped once per blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    pub width: u32,
    pub height: u32,
    pub color: Color,
}

impl Brush {
    pub fn new(rng: &mut impl RandomSource, config: &PainterConfig, color: Color) -> Self {
        let mut brush = Self {
            width: 0,
            height: 0,
            color,
        };
        brush.resize(rng, config);
        brush
    }

    pub fn resize(&mut self, rng: &mut impl RandomSource, config: &PainterConfig) {
        self.width = rng.uniform_range(
            i64::from(config.blob_width_min),
            i64::from(config.blob_width_max),
        ) as u32;
        self.height = rng.uniform_range(
            i64::from(config.blob_height_min),
            i64::from(config.blob_height_max),
        ) as u32;
    }

    /// Moves every channel by -1, 0 or +1.
    pub fn wander(&mut self, rng: &mut impl RandomSource) {
        let mut delta = [0; 3];
        for d in delta.iter_mut() {
            *d = -1 + (rng.uniform_int(100) % 3) as i32;
        }
        self.color = self.color.offset(delta);
    }

    /// Draws the blob at `position` and at its reflection across the centerline.
    pub fn stamp(
        &self,
        surface: &mut dyn Surface,
        position: Position,
        opacity: f32,
    ) -> Result<(), Error> {
        let fill = Fill::new(self.color, opacity);
        let mirror_x = i64::from(surface.width()) - position.x;
        surface.fill_rect(position.x, position.y, self.width, self.height, fill)?;
        surface.fill_rect(mirror_x, position.y, self.width, self.height, fill)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub fn random(rng: &mut impl RandomSource, x_max: i64, y_max: i64) -> Self {
        Self {
            x: rng.uniform_int(x_max),
            y: rng.uniform_int(y_max),
        }
    }

    pub fn jitter(&mut self, rng: &mut impl RandomSource, radius: u32) {
        let radius = i64::from(radius);
        self.x += -radius + rng.uniform_int(100) % (2 * radius + 1);
        self.y += -radius + rng.uniform_int(100) % (2 * radius + 1);
    }

    /// Teleports an out-of-range coordinate to a fresh random spot instead of
    /// clipping it. Both bounds are inclusive.
    pub fn confine(&mut self, rng: &mut impl RandomSource, x_max: i64, y_max: i64) {
        if self.x < 0 || self.x > x_max {
            self.x = rng.uniform_int(x_max);
        }
        if self.y < 0 || self.y > y_max {
            self.y = rng.uniform_int(y_max);
        }
    }
}

/// Drops small rectangles along a random walk over the left half of the
/// surface, mirroring each one onto the right half.
///
/// The brush color drifts by at most one step per channel per blob. Once it
/// leaves `config.color_range` around its base color, a new base is picked
/// from the palette and the brush restarts from it. Later range checks
/// measure against that new base, not the first one.
pub struct RandomWalkBrushPainter;

impl<R: RandomSource> Painter<R> for RandomWalkBrushPainter {
    fn paint(
        &self,
        rng: &mut R,
        surface: &mut dyn Surface,
        config: &PainterConfig,
    ) -> Result<(), Error> {
        config.validate()?;
        let half_width = i64::from(surface.width()) / 2;
        let height = i64::from(surface.height());

        let mut base = config.palette.pick(rng);
        let mut brush = Brush::new(rng, config, base);
        let mut position = Position::random(rng, half_width, height);
        let ink_amount = rng.uniform_range(
            i64::from(config.ink_amount_min),
            i64::from(config.ink_amount_max),
        );
        debug!(
            "walk: {} blobs on {}x{}, starting from {}",
            ink_amount,
            surface.width(),
            surface.height(),
            Fill::opaque(base)
        );

        for _ in 0..ink_amount {
            brush.stamp(surface, position, config.opacity)?;
            brush.wander(rng);
            position.jitter(rng, config.jitter);
            brush.resize(rng, config);
            if config.color_range.exceeded(&brush.color, &base) {
                base = config.palette.pick(rng);
                brush.color = base;
            }
            position.confine(rng, half_width, height);
        }
        Ok(())
    }
}
