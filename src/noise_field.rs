//! Coherent noise sampled by every particle of a field.

use noise::{NoiseFn, OpenSimplex};

/// A smooth, deterministic scalar field over three coordinates.
///
/// Implementations should return values in roughly `[-1, 1]`. Any closure
/// `Fn(f64, f64, f64) -> f64` is a noise source, which keeps tests free of
/// a real noise generator.
pub trait NoiseSource {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64;
}

impl<F> NoiseSource for F
where
    F: Fn(f64, f64, f64) -> f64,
{
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        self(x, y, z)
    }
}

/// 3D OpenSimplex noise.
pub struct SimplexNoise {
    inner: OpenSimplex,
    seed: u32,
}

impl SimplexNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            inner: OpenSimplex::new(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl NoiseSource for SimplexNoise {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        self.inner.get([x, y, z])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplex_is_deterministic_and_bounded() {
        let a = SimplexNoise::new(7);
        let b = SimplexNoise::new(7);

        for i in 0..200 {
            let t = i as f64 * 0.37;
            let p = (t * 0.003, t * 0.011 + 100.0, t * 0.01 + 4.2);
            let va = a.sample(p.0, p.1, p.2);
            assert_eq!(va, b.sample(p.0, p.1, p.2));
            assert!(va.abs() <= 1.5, "{va} out of range");
        }
    }

    #[test]
    fn closures_are_sources() {
        let constant = |_: f64, _: f64, _: f64| 0.5;
        assert_eq!(constant.sample(1.0, 2.0, 3.0), 0.5);
    }
}
