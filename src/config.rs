use crate::color::{Color, Palette};
use crate::error::Error;

/// How far a brush color may wander from its base before it is re-seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRange {
    /// Squared euclidean distance bound.
    Squared(u32),
    /// Bound on the absolute difference of every single channel.
    PerChannel(u32),
}

impl ColorRange {
    pub fn exceeded(&self, color: &Color, base: &Color) -> bool {
        match *self {
            ColorRange::Squared(threshold) => color.distance_squared(base) > threshold,
            ColorRange::PerChannel(bound) => color.max_channel_delta(base) > bound,
        }
    }
}

impl Default for ColorRange {
    fn default() -> Self {
        ColorRange::Squared(8 * 8)
    }
}

/// Update order of a diffusion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurMode {
    /// Single buffer updated row-major; later cells see updated neighbours.
    InPlace,
    /// Every cell reads the previous generation.
    DoubleBuffered,
}

impl Default for BlurMode {
    fn default() -> Self {
        BlurMode::InPlace
    }
}

#[derive(Debug, Clone)]
pub struct PainterConfig {
    pub palette: Palette,

    // Random walk brush
    pub ink_amount_min: u32,
    pub ink_amount_max: u32,
    pub blob_width_min: u32,
    pub blob_width_max: u32,
    pub blob_height_min: u32,
    pub blob_height_max: u32,
    pub color_range: ColorRange,
    pub jitter: u32,
    pub opacity: f32,

    // Diffusion field
    /// Seed count; drawn from `[10, 100]` per paint when `None`.
    pub blots: Option<u32>,
    pub iterations: u32,
    pub width_factor: f64,
    pub drift_probability: f64,
    pub drift_radius: u32,
    pub threshold_factor: f64,
    pub blur: BlurMode,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            ink_amount_min: 1000,
            ink_amount_max: 5000,
            blob_width_min: 1,
            blob_width_max: 10,
            blob_height_min: 1,
            blob_height_max: 10,
            color_range: ColorRange::default(),
            jitter: 5,
            opacity: 1.,
            blots: None,
            iterations: 50,
            width_factor: 0.525,
            drift_probability: 0.9,
            drift_radius: 25,
            threshold_factor: 0.25,
            blur: BlurMode::default(),
        }
    }
}

impl PainterConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !(0. ..=1.).contains(&self.opacity) {
            return Err(Error::invalid(format!(
                "opacity {} is outside [0, 1]",
                self.opacity
            )));
        }
        if self.iterations == 0 {
            return Err(Error::invalid("iterations must be at least 1"));
        }
        if !(0. ..=1.).contains(&self.width_factor) {
            return Err(Error::invalid(format!(
                "width factor {} is outside [0, 1]",
                self.width_factor
            )));
        }
        if !(self.threshold_factor.is_finite() && self.threshold_factor >= 0.) {
            return Err(Error::invalid(format!(
                "threshold factor {} must be a non-negative number",
                self.threshold_factor
            )));
        }
        if !(0. ..=1.).contains(&self.drift_probability) {
            return Err(Error::invalid(format!(
                "drift probability {} is outside [0, 1]",
                self.drift_probability
            )));
        }
        Ok(())
    }
}
