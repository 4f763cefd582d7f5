use crate::error::Error;
use crate::random::RandomSource;
use std::fmt;
use std::str::FromStr;
use ultraviolet::Vec3;

pub const COLOR_CHANNELS: usize = 3;
pub type OutputColor = [u8; COLOR_CHANNELS];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Clips any integer into a channel value.
    pub fn clamp(component: i32) -> u8 {
        component.max(0).min(255) as u8
    }

    /// Sum of squared channel differences. Compare against a squared threshold.
    pub fn distance_squared(&self, other: &Color) -> u32 {
        self.channel_deltas(other)
            .iter()
            .map(|d| (d * d) as u32)
            .sum()
    }

    /// Largest absolute difference of any single channel.
    pub fn max_channel_delta(&self, other: &Color) -> u32 {
        self.channel_deltas(other)
            .iter()
            .map(|d| d.abs() as u32)
            .max()
            .unwrap_or(0)
    }

    /// Adds a signed offset to each channel, clamping the result.
    pub fn offset(self, delta: [i32; COLOR_CHANNELS]) -> Self {
        Self::new(
            Self::clamp(i32::from(self.red) + delta[0]),
            Self::clamp(i32::from(self.green) + delta[1]),
            Self::clamp(i32::from(self.blue) + delta[2]),
        )
    }

    fn channel_deltas(&self, other: &Color) -> [i32; COLOR_CHANNELS] {
        [
            i32::from(self.red) - i32::from(other.red),
            i32::from(self.green) - i32::from(other.green),
            i32::from(self.blue) - i32::from(other.blue),
        ]
    }
}

impl From<Color> for Vec3 {
    fn from(c: Color) -> Self {
        Vec3::new(
            f32::from(c.red) / 255.,
            f32::from(c.green) / 255.,
            f32::from(c.blue) / 255.,
        )
    }
}

impl From<Color> for OutputColor {
    fn from(c: Color) -> Self {
        [c.red, c.green, c.blue]
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Parses `#rrggbb` or `#rgb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || Error::invalid(format!("not a hex color: {:?}", s));
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        if !hex.is_ascii() {
            return Err(invalid());
        }

        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

/// A color plus the opacity it is laid down with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: Color,
    pub alpha: f32,
}

impl Fill {
    pub fn new(color: Color, alpha: f32) -> Self {
        Self {
            color,
            alpha: if alpha.is_nan() { 0. } else { alpha.max(0.).min(1.) },
        }
    }

    pub fn opaque(color: Color) -> Self {
        Self::new(color, 1.)
    }

    pub fn is_opaque(&self) -> bool {
        self.alpha >= 1.
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Color { red, green, blue } = self.color;
        if self.is_opaque() {
            write!(f, "rgb({},{},{})", red, green, blue)
        } else {
            write!(f, "rgba({},{},{},{:.3})", red, green, blue, self.alpha)
        }
    }
}

/// Ordered, never empty list of colors the brush draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(Vec<Color>);

impl Palette {
    pub fn new(colors: Vec<Color>) -> Result<Self, Error> {
        if colors.is_empty() {
            return Err(Error::invalid("palette needs at least one color"));
        }
        Ok(Self(colors))
    }

    pub fn colors(&self) -> &[Color] {
        &self.0
    }

    /// Returns a copy of a uniformly chosen entry.
    pub fn pick(&self, rng: &mut impl RandomSource) -> Color {
        self.0[rng.uniform_int(self.0.len() as i64) as usize]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(vec![Color::BLACK])
    }
}

impl FromStr for Palette {
    type Err = Error;

    /// Parses a comma separated list of hex colors.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let colors = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Color>, _>>()?;
        Self::new(colors)
    }
}
