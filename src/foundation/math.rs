use std::f32::consts::PI;

/// Lanczos-windowed sinc, `sinc(pi x) * sinc(pi x / radius)` on `(-radius, radius)`.
///
/// `x == 0` returns exactly `1.0` so the removable singularity never produces `0/0`.
#[inline]
pub fn lanczos(x: f32, radius: f32) -> f32 {
    if x == 0.0 {
        return 1.0;
    }
    if x <= -radius || x >= radius {
        return 0.0;
    }
    let x_pi = x * PI;
    let x_pi_r = x_pi / radius;
    x_pi.sin() * x_pi_r.sin() / (x_pi * x_pi_r)
}

/// Decode table for 8-bit channel values: `(v / 255)^(1 / gamma)`.
pub fn gamma_decode_lut(gamma: f32) -> [f32; 256] {
    let inv = 1.0 / gamma;
    std::array::from_fn(|i| (i as f32 / 255.0).powf(inv))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
