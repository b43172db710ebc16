//! Small numeric helpers shared by the stochastic passes.

use rand::Rng;

/// Returns `true` with probability `p`.
///
/// Values of `p` outside `[0, 1]` saturate instead of panicking.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.random::<f64>() < p
}

/// Clamp a bounded field to `[0, 1]`. NaN collapses to 0.
pub const fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Floor an unbounded non-negative field at 0. NaN collapses to 0.
pub fn floor_zero(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn chance_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(!chance(&mut rng, 0.0));
            assert!(chance(&mut rng, 1.0));
            assert!(!chance(&mut rng, -3.0));
            assert!(chance(&mut rng, 7.0));
        }
    }

    #[test]
    fn clamp_unit_bounds() {
        assert!((clamp_unit(1.3) - 1.0).abs() < f64::EPSILON);
        assert!(clamp_unit(-0.2).abs() < f64::EPSILON);
        assert!(clamp_unit(f64::NAN).abs() < f64::EPSILON);
        assert!((clamp_unit(0.42) - 0.42).abs() < f64::EPSILON);
    }

    #[test]
    fn clamp_unit_in_const_context() {
        const CEILING: f64 = clamp_unit(2.5);
        assert!((CEILING - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn floor_zero_keeps_large_values() {
        assert!((floor_zero(250.0) - 250.0).abs() < f64::EPSILON);
        assert!(floor_zero(-5.0).abs() < f64::EPSILON);
    }
}
