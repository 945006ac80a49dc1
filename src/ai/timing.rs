//! Randomized decision timing and target sampling

use std::f32::consts::TAU;

use rand::Rng;

use crate::core::types::Vec2;

/// Idle wait stddev as a fraction of the mean
pub const IDLE_WAIT_STDDEV_FRACTION: f32 = 0.3;
/// Shortest idle pause (seconds)
pub const MIN_IDLE_WAIT: f32 = 0.2;

/// Normal sample via the Box–Muller transform
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f32, std_dev: f32) -> f32 {
    // u1 in (0, 1] keeps ln() finite
    let u1: f32 = 1.0 - rng.gen::<f32>();
    let u2: f32 = rng.gen::<f32>();
    let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
    mean + std_dev * z
}

/// Pause between wander/guard moves
pub fn idle_wait<R: Rng + ?Sized>(rng: &mut R, mean: f32) -> f32 {
    gaussian(rng, mean, mean * IDLE_WAIT_STDDEV_FRACTION).max(MIN_IDLE_WAIT)
}

/// Uniform point inside the disc of `radius` around `center`
pub fn random_point_in_radius<R: Rng + ?Sized>(rng: &mut R, center: Vec2, radius: f32) -> Vec2 {
    if radius <= 0.0 {
        return center;
    }
    let r = radius * rng.gen::<f32>().sqrt();
    let theta = rng.gen::<f32>() * TAU;
    center + Vec2::new(theta.cos(), theta.sin()) * r
}
