use super::Painter;
use crate::color::{Color, Fill};
use crate::config::{BlurMode, PainterConfig};
use crate::error::Error;
use crate::random::RandomSource;
use crate::surface::Surface;
use log::{debug, trace};

/// Scalar ink field covering the left part of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityGrid {
    width: usize,
    height: usize,
    cells: Vec<f64>,
}

impl IntensityGrid {
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        let len = width.checked_mul(height).ok_or_else(|| {
            Error::invalid(format!("a {}x{} field is too large", width, height))
        })?;
        Ok(Self {
            width,
            height,
            cells: vec![0.; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            None
        } else {
            Some(y as usize * self.width + x as usize)
        }
    }

    /// Out-of-range reads return 0.
    pub fn get(&self, x: i64, y: i64) -> f64 {
        self.index(x, y).map_or(0., |i| self.cells[i])
    }

    /// Out-of-range writes are ignored.
    pub fn set(&mut self, x: i64, y: i64, value: f64) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = value;
        }
    }

    pub fn max(&self) -> f64 {
        self.cells.iter().copied().fold(0., f64::max)
    }

    /// Mean of the 3x3 block centered on `(x, y)`; missing cells count as 0.
    fn box_mean(&self, x: i64, y: i64) -> f64 {
        let mut sum = 0.;
        for dy in -1..=1 {
            for dx in -1..=1 {
                sum += self.get(x + dx, y + dy);
            }
        }
        sum / 9.
    }

    /// Drops `blots` seeds along a random walk that mostly drifts by up to
    /// `radius` cells and occasionally jumps anywhere.
    pub fn seed(
        &mut self,
        rng: &mut impl RandomSource,
        blots: u32,
        drift_probability: f64,
        radius: u32,
        max_value: i64,
    ) {
        let (w, h) = (self.width as i64, self.height as i64);
        let radius = i64::from(radius);
        let mut x = rng.uniform_int(w);
        let mut y = rng.uniform_int(h);
        for _ in 0..blots {
            if rng.chance(drift_probability) {
                x += rng.uniform_range(-radius, radius + 1);
                y += rng.uniform_range(-radius, radius + 1);
            } else {
                x = rng.uniform_int(w);
                y = rng.uniform_int(h);
            }
            let value = rng.uniform_range(1, max_value) as f64;
            self.set(x, y, value);
        }
    }

    pub fn blur(&mut self, mode: BlurMode) {
        match mode {
            BlurMode::InPlace => {
                for y in 0..self.height as i64 {
                    for x in 0..self.width as i64 {
                        let mean = self.box_mean(x, y);
                        self.set(x, y, mean);
                    }
                }
            }
            BlurMode::DoubleBuffered => {
                let mut next = Vec::with_capacity(self.cells.len());
                for y in 0..self.height as i64 {
                    for x in 0..self.width as i64 {
                        next.push(self.box_mean(x, y));
                    }
                }
                self.cells = next;
            }
        }
    }

    /// Zeroes every cell below `floor`.
    pub fn threshold(&mut self, floor: f64) {
        for v in self.cells.iter_mut() {
            if *v < floor {
                *v = 0.;
            }
        }
    }
}

/// Seeds an intensity field, blurs it into a soft blot and stamps it in
/// black onto the canvas together with its mirror image.
///
/// The field is slightly wider than half the canvas so the two halves
/// overlap along the centerline.
pub struct DiffusionFieldPainter;

impl DiffusionFieldPainter {
    /// Runs seeding, diffusion and thresholding, returning the finished field.
    pub fn field(
        rng: &mut impl RandomSource,
        width: u32,
        height: u32,
        config: &PainterConfig,
    ) -> Result<IntensityGrid, Error> {
        config.validate()?;
        let grid_width = (f64::from(width) * config.width_factor).floor() as usize;
        let mut grid = IntensityGrid::new(grid_width, height as usize)?;

        let blots = Self::blot_count(rng, config);
        let max_value = i64::from(config.iterations).saturating_pow(4);
        debug!(
            "diffusion: {} blots on a {}x{} field, {} {:?} passes",
            blots, grid_width, height, config.iterations, config.blur
        );
        grid.seed(
            rng,
            blots,
            config.drift_probability,
            config.drift_radius,
            max_value,
        );

        for pass in 0..config.iterations {
            grid.blur(config.blur);
            trace!("diffusion pass {}: peak {:.3}", pass, grid.max());
        }
        grid.threshold(f64::from(config.iterations) * config.threshold_factor);
        Ok(grid)
    }

    /// Configured seed count, or a fresh draw from `[10, 100]`.
    pub fn blot_count(rng: &mut impl RandomSource, config: &PainterConfig) -> u32 {
        match config.blots {
            Some(blots) => blots,
            None => rng.uniform_range(10, 101) as u32,
        }
    }

    /// Sets one pixel per field cell plus its reflection at `width - 1 - x`.
    pub fn rasterize(
        grid: &IntensityGrid,
        surface: &mut dyn Surface,
        iterations: u32,
    ) -> Result<(), Error> {
        let mirror = i64::from(surface.width()) - 1;
        let scale = f64::from(iterations);
        for y in 0..grid.height() as i64 {
            for x in 0..grid.width() as i64 {
                let alpha = (grid.get(x, y) / scale).max(0.).min(1.) as f32;
                let fill = Fill::new(Color::BLACK, alpha);
                surface.set_pixel(x, y, fill)?;
                surface.set_pixel(mirror - x, y, fill)?;
            }
        }
        Ok(())
    }
}

impl<R: RandomSource> Painter<R> for DiffusionFieldPainter {
    fn paint(
        &self,
        rng: &mut R,
        surface: &mut dyn Surface,
        config: &PainterConfig,
    ) -> Result<(), Error> {
        let grid = Self::field(rng, surface.width(), surface.height(), config)?;
        Self::rasterize(&grid, surface, config.iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SurfaceError;
    use crate::surface::{Raster, Recorder, SurfaceResult};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn small_config() -> PainterConfig {
        PainterConfig {
            blots: Some(40),
            iterations: 12,
            drift_radius: 6,
            ..Default::default()
        }
    }

    #[test]
    fn grid_reads_zero_and_ignores_writes_outside() {
        let mut grid = IntensityGrid::new(3, 2).unwrap();
        grid.set(-1, 0, 5.);
        grid.set(3, 0, 5.);
        grid.set(0, 2, 5.);
        assert_eq!(grid.max(), 0.);
        grid.set(2, 1, 4.);
        assert_eq!(grid.get(2, 1), 4.);
        assert_eq!(grid.get(3, 1), 0.);
        assert_eq!(grid.get(-1, -1), 0.);
    }

    #[test]
    fn double_buffered_blur_spreads_evenly() {
        let mut grid = IntensityGrid::new(5, 5).unwrap();
        grid.set(2, 2, 9.);
        grid.blur(BlurMode::DoubleBuffered);
        for y in 0..5 {
            for x in 0..5 {
                let expected = if (1..=3).contains(&x) && (1..=3).contains(&y) {
                    1.
                } else {
                    0.
                };
                assert_eq!(grid.get(x, y), expected, "cell {},{}", x, y);
            }
        }
    }

    #[test]
    fn in_place_blur_sees_updated_neighbours() {
        let mut grid = IntensityGrid::new(3, 1).unwrap();
        grid.set(0, 0, 9.);
        grid.blur(BlurMode::InPlace);
        // (0,0) becomes 1, then (1,0) averages the already updated 1.
        assert_eq!(grid.get(0, 0), 1.);
        assert_eq!(grid.get(1, 0), 1. / 9.);
        assert_eq!(grid.get(2, 0), (1. / 9.) / 9.);

        let mut buffered = IntensityGrid::new(3, 1).unwrap();
        buffered.set(0, 0, 9.);
        buffered.blur(BlurMode::DoubleBuffered);
        assert_eq!(buffered.get(1, 0), 1.);
        assert_eq!(buffered.get(2, 0), 0.);
    }

    #[test]
    fn edges_bleed_out() {
        let mut grid = IntensityGrid::new(1, 1).unwrap();
        grid.set(0, 0, 81.);
        grid.blur(BlurMode::InPlace);
        grid.blur(BlurMode::InPlace);
        assert_eq!(grid.get(0, 0), 1.);
    }

    #[test]
    fn threshold_never_raises_the_peak() {
        let mut rng = XorShiftRng::seed_from_u64(6);
        let mut grid = IntensityGrid::new(30, 20).unwrap();
        grid.seed(&mut rng, 25, 0.9, 5, 12i64.pow(4));
        for _ in 0..12 {
            grid.blur(BlurMode::InPlace);
        }
        let before = grid.max();
        grid.threshold(3.);
        assert!(grid.max() <= before);
        assert!(grid.cells.iter().all(|&v| v == 0. || v >= 3.));
    }

    #[test]
    fn seeding_stays_non_negative_and_bounded() {
        let mut rng = XorShiftRng::seed_from_u64(13);
        let mut grid = IntensityGrid::new(16, 16).unwrap();
        grid.seed(&mut rng, 200, 0.9, 25, 100);
        assert!(grid.max() > 0.);
        assert!(grid.max() < 100.);
        assert!(grid.cells.iter().all(|&v| v >= 0.));
    }

    #[test]
    fn field_is_slightly_wider_than_half() {
        let mut rng = XorShiftRng::seed_from_u64(1);
        let grid = DiffusionFieldPainter::field(&mut rng, 200, 30, &small_config()).unwrap();
        assert_eq!(grid.width(), 105);
        assert_eq!(grid.height(), 30);
    }

    #[test]
    fn no_blots_means_fully_transparent() {
        let config = PainterConfig {
            blots: Some(0),
            ..small_config()
        };
        let mut rng = XorShiftRng::seed_from_u64(3);
        let mut recorder = Recorder::new(40, 10);
        DiffusionFieldPainter
            .paint(&mut rng, &mut recorder, &config)
            .unwrap();
        assert_eq!(recorder.ops().len(), 2 * 21 * 10);
        assert!(recorder.ops().iter().all(|op| op.fill.alpha == 0.));

        let mut raster = Raster::new(40, 10, Color::WHITE);
        recorder.replay(&mut raster).unwrap();
        assert!(raster.to_rgb8().iter().all(|&c| c == 255));
    }

    #[test]
    fn pixels_are_mirrored_with_equal_alpha() {
        let mut rng = XorShiftRng::seed_from_u64(17);
        let mut recorder = Recorder::new(60, 24);
        DiffusionFieldPainter
            .paint(&mut rng, &mut recorder, &small_config())
            .unwrap();
        let ops = recorder.ops();
        assert!(ops.iter().any(|op| op.fill.alpha > 0.));
        for pair in ops.chunks(2) {
            assert_eq!((pair[0].w, pair[0].h), (1, 1));
            assert_eq!(pair[0].fill, pair[1].fill);
            assert_eq!(pair[0].y, pair[1].y);
            assert_eq!(pair[1].x, 59 - pair[0].x);
            assert!((0. ..=1.).contains(&pair[0].fill.alpha));
            assert_eq!(pair[0].fill.color, Color::BLACK);
        }
    }

    #[test]
    fn blur_modes_produce_different_fields() {
        let render = |blur| {
            let config = PainterConfig {
                blur,
                ..small_config()
            };
            let mut rng = XorShiftRng::seed_from_u64(23);
            DiffusionFieldPainter::field(&mut rng, 50, 20, &config).unwrap()
        };
        assert_ne!(render(BlurMode::InPlace), render(BlurMode::DoubleBuffered));
    }

    #[test]
    fn same_seed_same_raster() {
        let render = || {
            let mut rng = XorShiftRng::seed_from_u64(77);
            let mut raster = Raster::new(50, 20, Color::WHITE);
            DiffusionFieldPainter
                .paint(&mut rng, &mut raster, &small_config())
                .unwrap();
            raster.to_rgb8()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn oversized_field_is_rejected() {
        assert!(matches!(
            IntensityGrid::new(usize::MAX, 2),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn huge_width_factor_is_an_error_not_a_crash() {
        let config = PainterConfig {
            width_factor: 1e30,
            blots: Some(1),
            iterations: 1,
            ..Default::default()
        };
        let mut rng = XorShiftRng::seed_from_u64(0);
        let mut recorder = Recorder::new(10, 10);
        let err = DiffusionFieldPainter
            .paint(&mut rng, &mut recorder, &config)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert!(recorder.ops().is_empty());
    }

    #[test]
    fn default_blot_count_reaches_upper_bound() {
        let mut rng = XorShiftRng::seed_from_u64(5);
        let config = PainterConfig::default();
        let draws: Vec<_> = (0..5000)
            .map(|_| DiffusionFieldPainter::blot_count(&mut rng, &config))
            .collect();
        assert!(draws.iter().all(|d| (10..=100).contains(d)));
        assert!(draws.contains(&100));
        assert!(draws.contains(&10));

        let fixed = PainterConfig {
            blots: Some(7),
            ..Default::default()
        };
        assert_eq!(DiffusionFieldPainter::blot_count(&mut rng, &fixed), 7);
    }

    struct Broken;

    impl Surface for Broken {
        fn width(&self) -> u32 {
            10
        }

        fn height(&self) -> u32 {
            10
        }

        fn fill_rect(&mut self, _: i64, _: i64, _: u32, _: u32, _: Fill) -> SurfaceResult {
            Err(SurfaceError::from("device lost"))
        }
    }

    #[test]
    fn surface_errors_propagate() {
        let mut rng = XorShiftRng::seed_from_u64(0);
        let err = DiffusionFieldPainter
            .paint(&mut rng, &mut Broken, &small_config())
            .unwrap_err();
        assert!(matches!(err, Error::Surface(_)));
        assert_eq!(err.to_string(), "surface error: device lost");
    }
}
