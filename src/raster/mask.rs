//! Subpixel mask and scanline beam model.
//!
//! Everything here is a pure function of the raster geometry. The mask is evaluated on the
//! virtual raster, far above output resolution, so the resamplers can band-limit it instead of
//! aliasing it.

use crate::foundation::core::CHANNELS;
use crate::raster::geometry::RasterGeometry;

/// Samples taken across one scanline period when integrating the beam profile.
const BEAM_SAMPLES: u32 = 8;

/// Precomputed mask lookup for one geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterMask {
    h_period: u32,
    v_period: u32,
    lit_height: u32,
    stagger: u32,
    spans: [(u32, u32); CHANNELS],
}

impl RasterMask {
    pub fn new(geometry: &RasterGeometry) -> Self {
        let spans = std::array::from_fn(|c| {
            let start = geometry.cell_start(c);
            (start, start + geometry.cells[c].lit)
        });
        Self {
            h_period: geometry.horizontal_period(),
            v_period: geometry.vertical_period(),
            lit_height: geometry.cell_height,
            stagger: geometry.stagger % geometry.vertical_period().max(1),
            spans,
        }
    }

    pub fn horizontal_period(&self) -> u32 {
        self.h_period
    }

    pub fn vertical_period(&self) -> u32 {
        self.v_period
    }

    /// Whether `channel`'s cell is lit at virtual raster pixel `(x, y)`.
    ///
    /// Successive triad columns are shifted down by `stagger` rows, giving the brick pattern.
    #[inline]
    pub fn is_lit(&self, channel: usize, x: u32, y: u32) -> bool {
        let period = u64::from(self.v_period);
        let column = u64::from(x / self.h_period) % period;
        let hmod = x % self.h_period;
        let shift = u64::from(self.stagger) * column % period;
        let vmod = (u64::from(y) + shift) % period;
        let (start, end) = self.spans[channel];
        vmod < u64::from(self.lit_height) && hmod >= start && hmod < end
    }

    #[inline]
    pub fn weight(&self, channel: usize, x: u32, y: u32) -> f32 {
        if self.is_lit(channel, x, y) { 1.0 } else { 0.0 }
    }

    /// Lit pixels of `channel` inside one `h_period x v_period` tile.
    pub fn lit_count(&self, channel: usize) -> u32 {
        let mut n = 0;
        for y in 0..self.v_period {
            for x in 0..self.h_period {
                n += u32::from(self.is_lit(channel, x, y));
            }
        }
        n
    }
}

/// One virtual row's view of the scanline beams: its own scanline plus the nearer neighbour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamTaps {
    pub own: f32,
    /// `-1` for the scanline above, `+1` for the one below.
    pub neighbor_offset: isize,
    pub neighbor: f32,
}

impl BeamTaps {
    pub fn total(&self) -> f32 {
        self.own + self.neighbor
    }
}

/// Gaussian scanline beam profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanlineProfile {
    sigma: f32,
}

impl ScanlineProfile {
    pub fn new(sigma: f32) -> Self {
        Self { sigma }
    }

    /// Beam intensity at fractional position `n` from a scanline's top edge; peaks at `n = 0.5`.
    #[inline]
    pub fn intensity(&self, n: f32) -> f32 {
        let d = n - 0.5;
        (-(d * d) / (2.0 * self.sigma * self.sigma)).exp()
    }

    /// Beam weights at fractional offset `frac` (in `[0, 1)`) inside a scanline.
    pub fn taps(&self, frac: f32) -> BeamTaps {
        let (neighbor_offset, n) = if frac < 0.5 {
            (-1, frac + 1.0)
        } else {
            (1, frac - 1.0)
        };
        BeamTaps {
            own: self.intensity(frac),
            neighbor_offset,
            neighbor: self.intensity(n),
        }
    }

    /// Mean beam energy over one scanline period, sampled at `BEAM_SAMPLES` points.
    pub fn mean_energy(&self) -> f32 {
        let sum: f32 = (0..BEAM_SAMPLES)
            .map(|n| self.taps(n as f32 / BEAM_SAMPLES as f32).total())
            .sum();
        sum / BEAM_SAMPLES as f32
    }
}

/// Gain that undoes the average energy removed by the mask and the scanline gaps.
///
/// A uniform frame comes out of masking at `lit_fraction * beam_energy` of its level, where the
/// lit fraction is averaged over the channels.
pub fn normalization_factor(geometry: &RasterGeometry) -> f32 {
    let mask = RasterMask::new(geometry);
    let tile = mask.horizontal_period() * mask.vertical_period();
    let lit: u32 = (0..CHANNELS).map(|c| mask.lit_count(c)).sum();
    let lit_fraction = lit as f32 / (CHANNELS as u32 * tile) as f32;
    let beam = ScanlineProfile::new(geometry.scanline_sigma).mean_energy();
    1.0 / (lit_fraction * beam)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/mask.rs"]
mod tests;
