use rayon::prelude::*;

use crate::foundation::math::lanczos;

/// Lanczos lobe count.
pub const FILTER_RADIUS: f32 = 2.0;

/// Extra widening of the kernel on top of the scale-adaptive support.
const BLUR: f32 = 1.0;

/// Memory layout of one resampling pass over a flat sample buffer.
///
/// The filtered axis advances by `*_step`; the independent lines that share the same
/// contributions advance by `*_line`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strides {
    pub src_step: usize,
    pub src_line: usize,
    pub dst_step: usize,
    pub dst_line: usize,
    pub lines: usize,
}

impl Strides {
    /// Row-major pass along each of `rows` rows.
    pub const fn horizontal(src_width: usize, dst_width: usize, rows: usize) -> Self {
        Self {
            src_step: 1,
            src_line: src_width,
            dst_step: 1,
            dst_line: dst_width,
            lines: rows,
        }
    }

    /// Row-major pass along each of `width` columns.
    pub const fn vertical(width: usize) -> Self {
        Self {
            src_step: width,
            src_line: 1,
            dst_step: width,
            dst_line: 1,
            lines: width,
        }
    }

    /// A single contiguous run of samples.
    pub const fn single() -> Self {
        Self::horizontal(0, 0, 1)
    }
}

/// Source range and weight sum used for one target sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contribution {
    pub start: usize,
    pub nmax: usize,
    /// Unnormalized sum of the weights in the window.
    pub density: f32,
    offset: usize,
}

impl Contribution {
    /// Reciprocal used to normalize the weighted sum; `0` and `1` densities skip normalization.
    pub fn density_rev(&self) -> f32 {
        if self.density == 0.0 || self.density == 1.0 {
            1.0
        } else {
            1.0 / self.density
        }
    }
}

/// Lanczos contribution windows for every target index of one axis.
#[derive(Clone, Debug)]
pub struct FilterBank {
    src_len: usize,
    dst_len: usize,
    contributions: Vec<Contribution>,
    weights: Vec<f32>,
}

impl FilterBank {
    pub fn lanczos(src_len: usize, dst_len: usize) -> Self {
        let factor = dst_len as f32 / src_len as f32;
        let scale = factor.min(1.0) / BLUR;
        let support = FILTER_RADIUS / scale;

        let per_window = (2.0 * support).ceil() as usize + 2;
        let mut contributions = Vec::with_capacity(dst_len);
        let mut weights = Vec::with_capacity(dst_len.saturating_mul(per_window.min(src_len + 1)));

        for i in 0..dst_len {
            let center = (i as f32 + 0.5) / factor;
            let start = (center - support + 0.5).floor().max(0.0) as usize;
            let end = ((center + support + 0.5).floor().max(0.0) as usize).min(src_len);
            let nmax = end.saturating_sub(start);

            let offset = weights.len();
            let base = start as f32 - center + 0.5;
            let mut density = 0.0f32;
            for n in 0..nmax {
                let w = lanczos((base + n as f32) * scale, FILTER_RADIUS);
                weights.push(w);
                density += w;
            }
            contributions.push(Contribution {
                start,
                nmax,
                density,
                offset,
            });
        }

        Self {
            src_len,
            dst_len,
            contributions,
            weights,
        }
    }

    pub fn src_len(&self) -> usize {
        self.src_len
    }

    pub fn dst_len(&self) -> usize {
        self.dst_len
    }

    pub fn contribution(&self, i: usize) -> (&Contribution, &[f32]) {
        let c = &self.contributions[i];
        (c, &self.weights[c.offset..c.offset + c.nmax])
    }

    fn iter(&self) -> impl Iterator<Item = (&Contribution, &[f32])> {
        self.contributions
            .iter()
            .map(|c| (c, &self.weights[c.offset..c.offset + c.nmax]))
    }

    /// Filter every line sequentially. `src`/`dst` are addressed purely through `strides`.
    pub fn apply(&self, strides: Strides, src: &[f32], dst: &mut [f32]) {
        for (i, (c, w)) in self.iter().enumerate() {
            let rev = c.density_rev();
            let mut src_pos = c.start * strides.src_step;
            let mut dst_pos = i * strides.dst_step;
            for _ in 0..strides.lines {
                dst[dst_pos] = weighted_sum(src, src_pos, strides.src_step, w) * rev;
                src_pos += strides.src_line;
                dst_pos += strides.dst_line;
            }
        }
    }

    /// Same as [`FilterBank::apply`], fanned out over rayon.
    ///
    /// Work is split along whichever destination stride is contiguous, so every task owns a
    /// disjoint slice of `dst`.
    pub fn par_apply(&self, strides: Strides, src: &[f32], dst: &mut [f32]) {
        if strides.dst_step == 1 {
            // A single line has no line stride; it spans the whole target axis.
            dst.par_chunks_mut(strides.dst_line.max(self.dst_len).max(1))
                .take(strides.lines)
                .enumerate()
                .for_each(|(line, out)| {
                    let line_base = line * strides.src_line;
                    for (i, (c, w)) in self.iter().enumerate() {
                        let src_pos = line_base + c.start * strides.src_step;
                        out[i] = weighted_sum(src, src_pos, strides.src_step, w) * c.density_rev();
                    }
                });
        } else {
            debug_assert!(strides.lines * strides.dst_line <= strides.dst_step);
            dst.par_chunks_mut(strides.dst_step)
                .take(self.dst_len)
                .enumerate()
                .for_each(|(i, out)| {
                    let (c, w) = self.contribution(i);
                    let rev = c.density_rev();
                    let mut src_pos = c.start * strides.src_step;
                    for line in 0..strides.lines {
                        out[line * strides.dst_line] =
                            weighted_sum(src, src_pos, strides.src_step, w) * rev;
                        src_pos += strides.src_line;
                    }
                });
        }
    }
}

#[inline]
fn weighted_sum(src: &[f32], mut pos: usize, step: usize, weights: &[f32]) -> f32 {
    let mut acc = 0.0f32;
    for &w in weights {
        acc += w * src[pos];
        pos += step;
    }
    acc
}

/// Resample `src_len -> dst_len` along the axis described by `strides`, in parallel.
pub fn resample(src_len: usize, dst_len: usize, strides: Strides, src: &[f32], dst: &mut [f32]) {
    FilterBank::lanczos(src_len, dst_len).par_apply(strides, src, dst);
}

/// Resample one contiguous run of samples to `dst_len` samples.
pub fn resample_1d(src: &[f32], dst_len: usize) -> Vec<f32> {
    let mut out = vec![0.0; dst_len];
    FilterBank::lanczos(src.len(), dst_len).apply(Strides::single(), src, &mut out);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/resample/lanczos.rs"]
mod tests;
