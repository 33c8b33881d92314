//! Particle pool seeding and the per-frame drift step.

use rand::Rng;

use crate::color::Rgba;
use crate::noise_field::NoiseSource;
use crate::surface::DrawContext;
use crate::types::{Bounds, VortexConfig};

/// Spatial frequency of the noise lookup, in noise units per pixel.
const NOISE_SCALE: f64 = 0.003;
/// How far the noise lookup advances along z per frame.
const NOISE_TIME_STEP: f64 = 0.01;
/// Offset between the horizontal and vertical lookups so `vx` and `vy` decorrelate.
const NOISE_AXIS_OFFSET: f64 = 100.0;
const NOISE_SEED_RANGE: f32 = 10.0;
const MIN_RADIUS: f32 = 0.1;

const PARTICLE_SATURATION: f32 = 1.0;
const PARTICLE_LIGHTNESS: f32 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Height the particle was born at; fade is measured from here.
    pub origin_y: f32,
    pub speed: f32,
    pub hue: f32,
    pub size: f32,
    pub noise_seed: f32,
}

impl Particle {
    /// A particle at rest at `(x, y)` with attributes drawn from `config`.
    pub fn spawn<R: Rng + ?Sized>(x: f32, y: f32, config: &VortexConfig, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            origin_y: y,
            speed: config.default_speed + rng.gen::<f32>() * config.range_speed,
            hue: config.base_hue + rng.gen::<f32>() * config.range_hue - config.range_hue / 2.0,
            size: rng.gen::<f32>() * config.particle_size + MIN_RADIUS,
            noise_seed: rng.gen::<f32>() * NOISE_SEED_RANGE,
        }
    }

    pub fn alpha(&self, range_y: f32) -> f32 {
        fade_alpha(self.y, self.origin_y, range_y)
    }

    pub fn color(&self, range_y: f32) -> Rgba {
        Rgba::from_hsla(
            self.hue,
            PARTICLE_SATURATION,
            PARTICLE_LIGHTNESS,
            self.alpha(range_y),
        )
    }
}

/// Seeds `config.particle_count` particles uniformly over the extent.
///
/// `bounds` must not be empty.
pub fn seed_particles<R: Rng + ?Sized>(
    config: &VortexConfig,
    bounds: Bounds,
    rng: &mut R,
) -> Vec<Particle> {
    debug_assert!(!bounds.is_empty());
    (0..config.particle_count)
        .map(|_| {
            let x = (rng.gen::<f32>() * bounds.width).min(just_below(bounds.width));
            let y = (rng.gen::<f32>() * bounds.height).min(just_below(bounds.height));
            Particle::spawn(x, y, config, rng)
        })
        .collect()
}

/// Advances every particle by one frame at time `time`.
///
/// Velocity is resampled from the noise field rather than integrated, so the
/// result depends only on the current positions, the bounds, and `time`.
pub fn step_particles<N: NoiseSource + ?Sized>(
    particles: &mut [Particle],
    bounds: Bounds,
    range_y: f32,
    time: u64,
    noise: &N,
) {
    let t = time as f64 * NOISE_TIME_STEP;

    for particle in particles.iter_mut() {
        let px = particle.x as f64 * NOISE_SCALE;
        let py = particle.y as f64 * NOISE_SCALE;
        let z = t + particle.noise_seed as f64;

        let nx = noise.sample(px, py, z) as f32;
        let ny = noise.sample(px + NOISE_AXIS_OFFSET, py + NOISE_AXIS_OFFSET, z) as f32;

        particle.vx = nx * particle.speed;
        particle.vy = (ny * particle.speed) / 2.0;

        particle.x += particle.vx;
        particle.y += particle.vy;

        wrap(particle, bounds, range_y);
    }
}

/// Paints every particle as a filled circle with its faded color.
pub fn paint_particles(particles: &[Particle], range_y: f32, ctx: &mut dyn DrawContext) {
    for particle in particles {
        ctx.set_fill_color(particle.color(range_y));
        ctx.fill_circle(particle.x, particle.y, particle.size);
    }
}

/// Quadratic falloff of opacity with vertical distance from the birth height.
pub fn fade_alpha(y: f32, origin_y: f32, range_y: f32) -> f32 {
    let travelled = ((y - origin_y).abs() / range_y).min(1.0);
    1.0 - travelled * travelled
}

fn wrap(particle: &mut Particle, bounds: Bounds, range_y: f32) {
    if particle.x >= bounds.width {
        particle.x = 0.0;
    } else if particle.x < 0.0 {
        particle.x = just_below(bounds.width);
    }

    if particle.y >= bounds.height + range_y {
        particle.y = 0.0;
    } else if particle.y < -range_y {
        particle.y = bounds.height;
    }
}

/// Largest useful coordinate strictly inside an edge at `edge`.
fn just_below(edge: f32) -> f32 {
    (edge - edge * f32::EPSILON).max(0.0)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn bounds() -> Bounds {
        Bounds::new(320, 200)
    }

    fn swirl(x: f64, y: f64, z: f64) -> f64 {
        ((x * 13.0).sin() + (y * 7.0).cos() + z.sin()) / 3.0
    }

    #[test]
    fn seeding_respects_attribute_ranges() {
        let config = VortexConfig {
            particle_count: 500,
            base_hue: 220.0,
            range_hue: 60.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let particles = seed_particles(&config, bounds(), &mut rng);

        assert_eq!(particles.len(), 500);
        for p in &particles {
            assert!((0.0..320.0).contains(&p.x));
            assert!((0.0..200.0).contains(&p.y));
            assert_eq!(p.origin_y, p.y);
            assert!((190.0..=250.0).contains(&p.hue), "hue {}", p.hue);
            assert!((3.0..4.0).contains(&p.speed));
            assert!((0.1..1.6).contains(&p.size));
            assert!((0.0..10.0).contains(&p.noise_seed));
            assert_eq!((p.vx, p.vy), (0.0, 0.0));
        }
    }

    #[test]
    fn velocity_comes_from_two_offset_samples() {
        let mut particles = [Particle {
            x: 100.0,
            y: 50.0,
            vx: 0.0,
            vy: 0.0,
            origin_y: 50.0,
            speed: 2.0,
            hue: 200.0,
            size: 1.0,
            noise_seed: 0.0,
        }];
        // negative in the horizontal lookup, positive in the offset one
        let split = |x: f64, _: f64, _: f64| if x < 50.0 { -0.5 } else { 0.5 };

        step_particles(&mut particles, bounds(), 100.0, 0, &split);

        let p = particles[0];
        assert_eq!((p.vx, p.vy), (-1.0, 0.5));
        assert_eq!((p.x, p.y), (99.0, 50.5));
    }

    #[test]
    fn horizontal_wrap_is_toroidal() {
        let mut particles = [Particle {
            x: 319.5,
            y: 10.0,
            vx: 0.0,
            vy: 0.0,
            origin_y: 10.0,
            speed: 1.0,
            hue: 0.0,
            size: 1.0,
            noise_seed: 0.0,
        }];
        let right = |_: f64, _: f64, _: f64| 1.0;
        step_particles(&mut particles, bounds(), 100.0, 0, &right);
        assert_eq!(particles[0].x, 0.0);

        let left = |_: f64, _: f64, _: f64| -1.0;
        step_particles(&mut particles, bounds(), 100.0, 1, &left);
        assert!(particles[0].x < 320.0 && particles[0].x > 319.9);
    }

    #[test]
    fn vertical_wrap_uses_margin() {
        let mut p = Particle {
            x: 10.0,
            y: 299.0,
            vx: 0.0,
            vy: 0.0,
            origin_y: 0.0,
            speed: 4.0,
            hue: 0.0,
            size: 1.0,
            noise_seed: 0.0,
        };
        let down = |_: f64, _: f64, _: f64| 1.0;
        let up = |_: f64, _: f64, _: f64| -1.0;

        let mut pool = [p];
        step_particles(&mut pool, bounds(), 100.0, 0, &down);
        assert_eq!(pool[0].y, 0.0);

        p.y = -99.0;
        let mut pool = [p];
        step_particles(&mut pool, bounds(), 100.0, 0, &up);
        assert_eq!(pool[0].y, 200.0);

        // inside the margin nothing wraps
        p.y = 250.0;
        let mut pool = [p];
        step_particles(&mut pool, bounds(), 100.0, 0, &down);
        assert_eq!(pool[0].y, 252.0);
    }

    #[test]
    fn motionless_when_speed_is_zero() {
        let config = VortexConfig {
            particle_count: 1,
            default_speed: 0.0,
            range_speed: 0.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let mut particles = seed_particles(&config, bounds(), &mut rng);
        let start = particles[0];

        for time in 0..500 {
            step_particles(&mut particles, bounds(), config.range_y, time, &swirl);
            assert_eq!((particles[0].vx, particles[0].vy), (0.0, 0.0));
        }
        assert_eq!((particles[0].x, particles[0].y), (start.x, start.y));
    }

    #[test]
    fn same_inputs_give_identical_runs() {
        let config = VortexConfig::default();
        let seeded = seed_particles(&config, bounds(), &mut StdRng::seed_from_u64(42));
        let mut a = seeded.clone();
        let mut b = seeded;

        for time in 0..300 {
            step_particles(&mut a, bounds(), config.range_y, time, &swirl);
            step_particles(&mut b, bounds(), config.range_y, time, &swirl);
            for (pa, pb) in a.iter().zip(&b) {
                assert_eq!(pa.x.to_bits(), pb.x.to_bits());
                assert_eq!(pa.y.to_bits(), pb.y.to_bits());
            }
        }
    }

    #[test]
    fn alpha_endpoints() {
        assert_eq!(fade_alpha(40.0, 40.0, 100.0), 1.0);
        assert_eq!(fade_alpha(140.0, 40.0, 100.0), 0.0);
        assert_eq!(fade_alpha(-500.0, 40.0, 100.0), 0.0);
        assert_eq!(fade_alpha(90.0, 40.0, 100.0), 0.75);
    }

    proptest! {
        #[test]
        fn positions_stay_inside_wrap_bounds(
            seed in any::<u64>(),
            speed in 0.0f32..40.0,
            range_y in 1.0f32..300.0,
            width in 1u32..2000,
            height in 1u32..2000,
            ticks in 1u64..60,
        ) {
            let config = VortexConfig {
                particle_count: 40,
                default_speed: speed,
                range_y,
                ..Default::default()
            };
            let bounds = Bounds::new(width, height);
            let mut particles = seed_particles(&config, bounds, &mut StdRng::seed_from_u64(seed));
            let hues: Vec<f32> = particles.iter().map(|p| p.hue).collect();

            for time in 0..ticks {
                step_particles(&mut particles, bounds, range_y, time, &swirl);
                prop_assert_eq!(particles.len(), 40);
                for p in &particles {
                    prop_assert!(p.x >= 0.0 && p.x < bounds.width, "x = {}", p.x);
                    prop_assert!(p.y >= -range_y && p.y < bounds.height + range_y, "y = {}", p.y);
                }
            }

            let after: Vec<f32> = particles.iter().map(|p| p.hue).collect();
            prop_assert_eq!(hues, after);
        }

        #[test]
        fn alpha_never_increases_with_distance(
            origin in -500.0f32..500.0,
            near in 0.0f32..400.0,
            extra in 0.0f32..400.0,
            range_y in 0.5f32..300.0,
        ) {
            let a_near = fade_alpha(origin + near, origin, range_y);
            let a_far = fade_alpha(origin + near + extra, origin, range_y);
            prop_assert!(a_far <= a_near);
            prop_assert!((0.0..=1.0).contains(&a_near));
        }
    }
}
