use rayon::prelude::*;

use crate::foundation::error::{CrtError, CrtResult};
use crate::raster::geometry::RasterGeometry;

/// Gaussian sigma of the glow for an output `width`, scaled from the reference width.
pub fn glow_sigma(geometry: &RasterGeometry, width: u32) -> f32 {
    geometry.glow_sigma * width as f32 / geometry.glow_reference_width
}

/// Normalized Gaussian taps in Q16; the taps always sum to exactly `1 << 16`.
pub fn gaussian_kernel_q16(sigma: f32) -> CrtResult<Vec<u32>> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(CrtError::validation("glow sigma must be >= 0"));
    }
    let radius = (2.0 * sigma).ceil() as i32;
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }

    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-radius..=radius)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(CrtError::pipeline("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

/// Separable blur of one `width x height` channel with edge clamping.
///
/// `tmp` holds the horizontal pass; all three slices must be `width * height` long.
pub fn blur_plane(
    src: &[i32],
    tmp: &mut [i32],
    dst: &mut [i32],
    width: usize,
    height: usize,
    kernel: &[u32],
) {
    debug_assert_eq!(src.len(), width * height);
    if kernel.len() == 1 {
        dst.copy_from_slice(src);
        return;
    }
    horizontal_pass(src, tmp, width, kernel);
    vertical_pass(tmp, dst, width, height, kernel);
}

fn horizontal_pass(src: &[i32], dst: &mut [i32], width: usize, k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    let last = width as isize - 1;
    dst.par_chunks_mut(width)
        .zip(src.par_chunks(width))
        .for_each(|(out, row)| {
            for (x, o) in out.iter_mut().enumerate() {
                let mut acc = 0i64;
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x as isize + ki as isize - radius).clamp(0, last) as usize;
                    acc += i64::from(kw) * i64::from(row[sx]);
                }
                *o = q16_to_i32(acc);
            }
        });
}

fn vertical_pass(src: &[i32], dst: &mut [i32], width: usize, height: usize, k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    let last = height as isize - 1;
    dst.par_chunks_mut(width).enumerate().for_each(|(y, out)| {
        for (x, o) in out.iter_mut().enumerate() {
            let mut acc = 0i64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y as isize + ki as isize - radius).clamp(0, last) as usize;
                acc += i64::from(kw) * i64::from(src[sy * width + x]);
            }
            *o = q16_to_i32(acc);
        }
    });
}

fn q16_to_i32(acc: i64) -> i32 {
    ((acc + 32768) >> 16) as i32
}

#[cfg(test)]
#[path = "../../tests/unit/effects/glow.rs"]
mod tests;
