pub mod brush;
pub mod diffusion;

pub use brush::RandomWalkBrushPainter;
pub use diffusion::DiffusionFieldPainter;

use crate::config::PainterConfig;
use crate::error::Error;
use crate::random::RandomSource;
use crate::surface::Surface;
use std::fmt;
use std::str::FromStr;

/// A generative engine that renders one complete mirrored blot per call.
pub trait Painter<R: RandomSource>: Send + Sync {
    fn paint(
        &self,
        rng: &mut R,
        surface: &mut dyn Surface,
        config: &PainterConfig,
    ) -> Result<(), Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Walk,
    Diffusion,
}

impl Engine {
    pub fn painter<R: RandomSource + 'static>(self) -> Box<dyn Painter<R>> {
        match self {
            Engine::Walk => Box::new(RandomWalkBrushPainter),
            Engine::Diffusion => Box::new(DiffusionFieldPainter),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::Walk
    }
}

impl FromStr for Engine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "walk" | "brush" => Ok(Engine::Walk),
            "diffusion" | "blur" => Ok(Engine::Diffusion),
            _ => Err(Error::invalid(format!(
                "unknown engine {:?}, expected walk or diffusion",
                s
            ))),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Engine::Walk => "walk",
            Engine::Diffusion => "diffusion",
        })
    }
}
