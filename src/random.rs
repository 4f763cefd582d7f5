use rand::Rng;

/// Uniform draws used by the painters.
///
/// Degenerate ranges (`max <= 0`, `max <= min`) return the lower bound
/// instead of panicking.
pub trait RandomSource {
    /// Integer in `[0, max)`.
    fn uniform_int(&mut self, max: i64) -> i64;

    /// Integer in `[min, max)`.
    fn uniform_range(&mut self, min: i64, max: i64) -> i64;

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool;
}

impl<R: Rng> RandomSource for R {
    fn uniform_int(&mut self, max: i64) -> i64 {
        self.uniform_range(0, max)
    }

    fn uniform_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            min
        } else {
            self.gen_range(min..max)
        }
    }

    fn chance(&mut self, p: f64) -> bool {
        self.gen::<f64>() < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn draws_stay_in_half_open_range() {
        let mut rng = XorShiftRng::seed_from_u64(3);
        for _ in 0..1000 {
            let v = rng.uniform_int(10);
            assert!((0..10).contains(&v));
            let v = rng.uniform_range(-25, 26);
            assert!((-25..26).contains(&v));
        }
    }

    #[test]
    fn degenerate_ranges_return_lower_bound() {
        let mut rng = XorShiftRng::seed_from_u64(3);
        assert_eq!(rng.uniform_int(0), 0);
        assert_eq!(rng.uniform_int(-5), 0);
        assert_eq!(rng.uniform_range(7, 7), 7);
        assert_eq!(rng.uniform_range(9, 2), 9);
    }

    #[test]
    fn chance_extremes() {
        let mut rng = XorShiftRng::seed_from_u64(3);
        assert!((0..100).all(|_| !rng.chance(0.)));
        assert!((0..100).all(|_| rng.chance(1.)));
    }

    #[test]
    fn seeded_sources_repeat() {
        let mut a = XorShiftRng::seed_from_u64(42);
        let mut b = XorShiftRng::seed_from_u64(42);
        let a: Vec<_> = (0..32).map(|_| a.uniform_int(1000)).collect();
        let b: Vec<_> = (0..32).map(|_| b.uniform_int(1000)).collect();
        assert_eq!(a, b);
    }
}
