use serde::{Deserialize, Serialize};

use crate::error::SectionError;

/// How a negative simulated host-layer thickness is accumulated.
///
/// An affine rescale of a Gaussian field has no lower bound, so a thin-tailed
/// draw can come out below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThicknessPolicy {
    /// Treat negative thickness as a zero-thickness layer. Keeps the cumulative
    /// thickness of every column non-decreasing.
    #[default]
    ClampZero,
    /// Accumulate the raw value. A column may move back down the section.
    Allow,
}

impl ThicknessPolicy {
    #[inline]
    pub fn apply(self, thickness: f64) -> f64 {
        match self {
            ThicknessPolicy::ClampZero => thickness.max(0.0),
            ThicknessPolicy::Allow => thickness,
        }
    }
}

/// Realization parameters for one interbedded section.
/// Defaults describe a chalk section with flint bands every few metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionParams {
    /// Number of columns (lateral cells).
    pub nx: usize,
    /// Number of rows (vertical cells).
    pub ny: usize,
    /// Physical size of one square cell.
    pub cell_size: f64,
    /// Target mean host-layer thickness, physical units.
    pub mean: f64,
    /// Target standard deviation of host-layer thickness, physical units.
    pub stdev: f64,
    /// Inclusive lower bound for the sampled lateral variogram range.
    pub hmin: u32,
    /// Inclusive upper bound for the sampled lateral variogram range.
    pub hmax: u32,
    pub thickness_policy: ThicknessPolicy,
}

impl Default for SectionParams {
    fn default() -> Self {
        Self {
            nx: 200,
            ny: 100,
            cell_size: 1.0,
            mean: 5.0,
            stdev: 1.5,
            hmin: 20,
            hmax: 80,
            thickness_policy: ThicknessPolicy::ClampZero,
        }
    }
}

impl SectionParams {
    /// Parse parameters from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SectionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every precondition of a generation run.
    pub fn validate(&self) -> Result<(), SectionError> {
        if self.nx == 0 || self.ny == 0 {
            return Err(SectionError::configuration(format!(
                "grid dimensions must be positive, got nx={} ny={}",
                self.nx, self.ny
            )));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(SectionError::configuration(format!(
                "cell_size must be positive and finite, got {}",
                self.cell_size
            )));
        }
        if !(self.mean.is_finite() && self.mean > 0.0) {
            return Err(SectionError::configuration(format!(
                "mean thickness must be positive and finite, got {}",
                self.mean
            )));
        }
        if !(self.stdev.is_finite() && self.stdev >= 0.0) {
            return Err(SectionError::configuration(format!(
                "thickness stdev must be non-negative and finite, got {}",
                self.stdev
            )));
        }
        if self.hmin == 0 {
            return Err(SectionError::configuration("hmin must be positive"));
        }
        if self.hmin > self.hmax {
            return Err(SectionError::configuration(format!(
                "hmin ({}) must not exceed hmax ({})",
                self.hmin, self.hmax
            )));
        }
        Ok(())
    }

    /// Vertical physical extent of the section.
    #[inline]
    pub fn section_height(&self) -> f64 {
        self.ny as f64 * self.cell_size
    }

    /// Number of deposition rounds: the expected count of host layers needed to
    /// fill the section at the target mean thickness.
    pub fn round_count(&self) -> usize {
        let rounds = (self.section_height() / self.mean).floor();
        if rounds.is_finite() && rounds > 0.0 {
            rounds as usize
        } else {
            0
        }
    }

    /// Band-to-band spacing in cells for a zero-variance thickness field.
    #[inline]
    pub fn nominal_spacing(&self) -> f64 {
        self.mean / self.cell_size + 1.0
    }
}
