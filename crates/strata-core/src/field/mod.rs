//! Unconditional spatial random field generation.
//!
//! The section generator consumes fields only through [`FieldSimulator`], so the
//! numerical engine can be swapped for a deterministic stub in tests.

pub mod fbm;
pub mod noise_sim;
pub mod rescale;
pub mod stub;

use thiserror::Error;

use crate::variogram::VariogramModel;

pub use noise_sim::NoiseFieldSimulator;
pub use rescale::affine_rescale;
pub use stub::{ConstantFieldSimulator, ProfileFieldSimulator};

/// Failure reported by a field generator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("invalid variogram: {0}")]
    InvalidVariogram(String),

    #[error(
        "field shape mismatch: expected {expected_width}×{expected_height}, got {width}×{height}"
    )]
    ShapeMismatch {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },

    #[error("non-finite value at cell {0}")]
    NonFinite(usize),

    #[error("no realization available for call {0}")]
    Exhausted(usize),
}

/// Request for one unconditional 2D realization.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub width: usize,
    pub height: usize,
    pub cell_size: f64,
    pub seed: u64,
    pub variogram: VariogramModel,
    /// Name of the simulated attribute.
    pub label: String,
}

impl FieldSpec {
    /// Check the grid and variogram before simulating.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimulationError::InvalidGrid(format!(
                "dimensions must be positive, got {}×{}",
                self.width, self.height
            )));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(SimulationError::InvalidGrid(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        let v = &self.variogram;
        if !(v.nugget.is_finite() && v.nugget >= 0.0) {
            return Err(SimulationError::InvalidVariogram(format!(
                "nugget {} is invalid",
                v.nugget
            )));
        }
        if v.structures.is_empty() {
            return Err(SimulationError::InvalidVariogram(
                "at least one structure is required".into(),
            ));
        }
        for (i, s) in v.structures.iter().enumerate() {
            if !(s.contribution.is_finite() && s.contribution >= 0.0) {
                return Err(SimulationError::InvalidVariogram(format!(
                    "structure {i}: contribution {} is invalid",
                    s.contribution
                )));
            }
            if !(s.major_range.is_finite() && s.major_range > 0.0)
                || !(s.minor_range.is_finite() && s.minor_range > 0.0)
            {
                return Err(SimulationError::InvalidVariogram(format!(
                    "structure {i}: ranges must be positive, got major={} minor={}",
                    s.major_range, s.minor_range
                )));
            }
            if !s.azimuth_deg.is_finite() {
                return Err(SimulationError::InvalidVariogram(format!(
                    "structure {i}: azimuth is not finite"
                )));
            }
        }
        if v.sill() <= 0.0 {
            return Err(SimulationError::InvalidVariogram("total sill must be positive".into()));
        }
        Ok(())
    }
}

/// A simulated field, row-major, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub width: usize,
    pub height: usize,
    pub values: Vec<f64>,
    pub label: String,
}

impl Field {
    pub fn filled(width: usize, height: usize, value: f64, label: impl Into<String>) -> Self {
        Self { width, height, values: vec![value; width * height], label: label.into() }
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.width;
        &self.values[start..start + self.width]
    }

    /// Lateral profile used as a layer-thickness sequence: the top row.
    pub fn profile(&self) -> &[f64] {
        self.row(0)
    }
}

/// Generator of unconditional Gaussian-correlated fields.
pub trait FieldSimulator {
    /// Produce one realization matching `spec`, or fail outright.
    fn simulate(&self, spec: &FieldSpec) -> Result<Field, SimulationError>;
}

impl<T: FieldSimulator + ?Sized> FieldSimulator for &T {
    fn simulate(&self, spec: &FieldSpec) -> Result<Field, SimulationError> {
        (**self).simulate(spec)
    }
}

impl<T: FieldSimulator + ?Sized> FieldSimulator for Box<T> {
    fn simulate(&self, spec: &FieldSpec) -> Result<Field, SimulationError> {
        (**self).simulate(spec)
    }
}
