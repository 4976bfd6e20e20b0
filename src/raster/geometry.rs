use std::path::Path;

use crate::foundation::core::CHANNELS;
use crate::foundation::error::{CrtError, CrtResult};

/// Lit width and trailing gap of one color cell, in virtual raster pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CellSpan {
    pub lit: u32,
    pub gap: u32,
}

impl CellSpan {
    pub const fn new(lit: u32, gap: u32) -> Self {
        Self { lit, gap }
    }

    pub const fn period(self) -> u32 {
        self.lit + self.gap
    }
}

/// Subpixel mask and tone constants of the simulated tube.
///
/// Fixed for the lifetime of a pipeline; the normalization factor is derived from it once.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RasterGeometry {
    /// R, G, B cells, laid out left to right inside one triad.
    pub cells: [CellSpan; CHANNELS],
    /// Lit height of a triad.
    pub cell_height: u32,
    /// Dark rows below a triad.
    pub cell_gap: u32,
    /// Vertical offset applied per successive triad column.
    pub stagger: u32,
    /// Number of triad columns across the virtual raster.
    pub columns: u32,
    /// Width of the Gaussian scanline beam profile.
    pub scanline_sigma: f32,
    pub gamma: f32,
    /// Gaussian glow sigma at `glow_reference_width` output columns.
    pub glow_sigma: f32,
    pub glow_reference_width: f32,
}

impl Default for RasterGeometry {
    fn default() -> Self {
        Self {
            cells: [CellSpan::new(2, 1), CellSpan::new(2, 1), CellSpan::new(2, 2)],
            cell_height: 5,
            cell_gap: 1,
            stagger: 3,
            columns: 640,
            scanline_sigma: 0.3,
            gamma: 2.0,
            glow_sigma: 3.0,
            glow_reference_width: 640.0,
        }
    }
}

impl RasterGeometry {
    /// Width of one RGB triad including gaps.
    pub fn horizontal_period(&self) -> u32 {
        self.cells.iter().map(|c| c.period()).sum()
    }

    /// Height of one triad including its gap.
    pub fn vertical_period(&self) -> u32 {
        self.cell_height + self.cell_gap
    }

    /// Horizontal offset of channel `c`'s lit cell inside a triad.
    pub fn cell_start(&self, c: usize) -> u32 {
        self.cells[..c].iter().map(|s| s.period()).sum()
    }

    /// Width of the virtual horizontal raster.
    pub fn virtual_width(&self) -> usize {
        (self.columns as usize).saturating_mul(self.horizontal_period() as usize)
    }

    /// Height of the virtual vertical raster for `scanlines` scanlines.
    pub fn virtual_height(&self, scanlines: u32) -> usize {
        (scanlines as usize).saturating_mul(self.vertical_period() as usize)
    }

    pub fn validate(&self) -> CrtResult<()> {
        for (c, cell) in self.cells.iter().enumerate() {
            if cell.lit == 0 {
                return Err(CrtError::validation(format!(
                    "raster cell {c} must have a positive lit width"
                )));
            }
        }
        if self.cell_height == 0 {
            return Err(CrtError::validation("raster cell_height must be positive"));
        }
        let h_period = self
            .cells
            .iter()
            .try_fold(0u32, |acc, c| acc.checked_add(c.lit)?.checked_add(c.gap));
        if h_period.is_none() || self.cell_height.checked_add(self.cell_gap).is_none() {
            return Err(CrtError::validation("raster cell periods overflow"));
        }
        if self.columns == 0 {
            return Err(CrtError::validation("raster columns must be positive"));
        }
        if !self.scanline_sigma.is_finite() || self.scanline_sigma <= 0.0 {
            return Err(CrtError::validation("scanline_sigma must be > 0"));
        }
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(CrtError::validation("gamma must be > 0"));
        }
        if !self.glow_sigma.is_finite() || self.glow_sigma < 0.0 {
            return Err(CrtError::validation("glow_sigma must be >= 0"));
        }
        if !self.glow_reference_width.is_finite() || self.glow_reference_width <= 0.0 {
            return Err(CrtError::validation("glow_reference_width must be > 0"));
        }
        Ok(())
    }

    /// Parse a JSON geometry override; missing fields keep their reference values.
    pub fn from_json_str(s: &str) -> CrtResult<Self> {
        let geometry: Self = serde_json::from_str(s)
            .map_err(|e| CrtError::config(format!("parse raster geometry: {e}")))?;
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn load(path: &Path) -> CrtResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CrtError::config(format!("read raster geometry '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/geometry.rs"]
mod tests;
