use rayon::prelude::*;

use crate::effects::clamp::clamp_with_desaturation;
use crate::effects::glow::{blur_plane, gaussian_kernel_q16, glow_sigma};
use crate::foundation::core::{CHANNELS, Frame, Plane, Size, zeroed};
use crate::foundation::error::{CrtError, CrtResult};
use crate::raster::geometry::RasterGeometry;

/// Integer scale of the layer fed to the glow blur.
const GLOW_SCALE: f32 = 600.0;
/// Integer scale of the sharp base layer.
const SHARP_SCALE: f32 = 255.0;

/// Turns the linear output plane into packed pixels: normalize, re-encode gamma, add glow,
/// clamp with desaturation.
///
/// Owns its integer layers so steady-state frames do not allocate.
#[derive(Debug)]
pub struct PostProcessor {
    size: Size,
    normalization: f32,
    gamma: f32,
    kernel: Vec<u32>,
    sharp: Vec<i32>,
    glow_src: Vec<i32>,
    glow_tmp: Vec<i32>,
    glow: Vec<i32>,
}

impl PostProcessor {
    pub fn new(geometry: &RasterGeometry, size: Size, normalization: f32) -> CrtResult<Self> {
        let kernel = gaussian_kernel_q16(glow_sigma(geometry, size.width))?;
        let n = size
            .checked_area()
            .and_then(|a| a.checked_mul(CHANNELS))
            .ok_or_else(|| CrtError::validation(format!("output {size} is too large")))?;
        Ok(Self {
            size,
            normalization,
            gamma: geometry.gamma,
            kernel,
            sharp: zeroed(n)?,
            glow_src: zeroed(n)?,
            glow_tmp: zeroed(n)?,
            glow: zeroed(n)?,
        })
    }

    pub fn glow_taps(&self) -> usize {
        self.kernel.len()
    }

    /// Consume `linear` (scaled in place) and write the packed result into `out`.
    pub fn run(&mut self, linear: &mut Plane, out: &mut Frame) {
        let factor = self.normalization;
        linear.data_mut().par_iter_mut().for_each(|v| *v *= factor);

        let gamma = self.gamma;
        let src = linear.data();
        rayon::join(
            || encode_gamma(src, &mut self.glow_src, GLOW_SCALE, gamma),
            || encode_gamma(src, &mut self.sharp, SHARP_SCALE, gamma),
        );

        let n = self.size.area();
        let (w, h) = (self.size.width as usize, self.size.height as usize);
        let kernel = &self.kernel;
        self.glow_src
            .par_chunks(n)
            .zip(self.glow_tmp.par_chunks_mut(n))
            .zip(self.glow.par_chunks_mut(n))
            .for_each(|((src, tmp), dst)| blur_plane(src, tmp, dst, w, h, kernel));

        let (sharp, glow) = (&self.sharp, &self.glow);
        out.pixels_mut()
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, px)| {
                *px = clamp_with_desaturation(
                    sharp[i] + glow[i],
                    sharp[n + i] + glow[n + i],
                    sharp[2 * n + i] + glow[2 * n + i],
                );
            });
    }
}

fn encode_gamma(src: &[f32], dst: &mut [i32], scale: f32, gamma: f32) {
    dst.par_iter_mut()
        .zip(src.par_iter())
        .for_each(|(d, &v)| *d = (scale * v.powf(gamma)) as i32);
}

#[cfg(test)]
#[path = "../../tests/unit/render/post.rs"]
mod tests;
