//! Layer accumulation and rasterisation of an interbedded section.
//!
//! Each round simulates one lateral profile of host-layer (chalk) thickness,
//! adds it to the cumulative thickness of every column, stamps a one-cell
//! boundary band (flint) on top, then reserves that cell. Deposition runs from
//! the base of the section upwards.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::SectionError;
use crate::field::{
    affine_rescale, Field, FieldSimulator, FieldSpec, NoiseFieldSimulator, SimulationError,
};
use crate::grid::LithologyGrid;
use crate::params::{SectionParams, ThicknessPolicy};
use crate::variogram::VariogramModel;

/// Per-round field seeds are drawn from this range.
pub const SEED_RANGE: RangeInclusive<u64> = 10_000..=99_999;

/// Major-axis azimuth: correlation runs laterally.
pub const LATERAL_AZIMUTH_DEG: f64 = 90.0;

/// Minor range as a fraction of the vertical physical extent.
pub const MINOR_RANGE_FRACTION: f64 = 0.1;

/// Attribute label passed to the field generator.
pub const THICKNESS_LABEL: &str = "thickness";

/// Thickness of a boundary band, in cells.
pub const BAND_THICKNESS_CELLS: f64 = 1.0;

/// Random draws and outcome of one deposition round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundRecord {
    pub round: usize,
    /// Sampled lateral variogram range.
    pub range: u32,
    pub seed: u64,
    /// Columns that received a band this round.
    pub stamped_columns: usize,
}

/// Full output of one generation run.
#[derive(Debug, Clone, Serialize)]
pub struct SectionResult {
    pub grid: LithologyGrid,
    pub round_count: usize,
    pub rounds: Vec<RoundRecord>,
    /// Final cumulative thickness per column, in cells.
    pub cumulative: Vec<f64>,
}

/// Variogram for one round: zero nugget, one unit spherical structure with
/// lateral major range `range` and a minor range tied to the section height.
pub fn round_variogram(range: u32, params: &SectionParams) -> VariogramModel {
    VariogramModel::single(
        LATERAL_AZIMUTH_DEG,
        range as f64,
        params.section_height() * MINOR_RANGE_FRACTION,
    )
}

/// Grid row of a band whose base sits `cumulative` cells above the section
/// base, or `None` when the column has no room left.
#[inline]
pub fn band_row(ny: usize, cumulative: f64) -> Option<usize> {
    // Negated comparison also rejects NaN.
    if !(cumulative >= 0.0) {
        return None;
    }
    let offset = cumulative.floor();
    if offset >= ny as f64 {
        return None;
    }
    Some(ny - 1 - offset as usize)
}

/// Lay down one round: add `thickness` (physical units, one value per column)
/// to `cumulative`, stamp a band where the column still has room, then add the
/// band's own thickness. Returns the number of columns stamped.
///
/// Columns never interact.
pub fn deposit_round(
    grid: &mut LithologyGrid,
    cumulative: &mut [f64],
    thickness: &[f64],
    cell_size: f64,
    policy: ThicknessPolicy,
) -> usize {
    debug_assert_eq!(cumulative.len(), grid.nx());
    debug_assert_eq!(thickness.len(), grid.nx());

    let ny = grid.ny();
    let mut stamped = 0;
    for (col, (cum, &t)) in cumulative.iter_mut().zip(thickness).enumerate() {
        *cum += policy.apply(t) / cell_size;
        if let Some(row) = band_row(ny, *cum) {
            grid.stamp(row, col);
            stamped += 1;
        }
        *cum += BAND_THICKNESS_CELLS;
    }
    stamped
}

/// Check the simulated field, rescale the whole realization to the target
/// moments, then read its top row as the lateral thickness profile.
fn thickness_profile(field: Field, params: &SectionParams) -> Result<Vec<f64>, SimulationError> {
    if field.width != params.nx
        || field.height != params.ny
        || field.values.len() != params.nx * params.ny
    {
        return Err(SimulationError::ShapeMismatch {
            expected_width: params.nx,
            expected_height: params.ny,
            width: field.width,
            height: field.height,
        });
    }
    if let Some(index) = field.values.iter().position(|v| !v.is_finite()) {
        return Err(SimulationError::NonFinite(index));
    }
    let values = affine_rescale(&field.values, params.mean, params.stdev);
    let rescaled = Field { values, ..field };
    Ok(rescaled.profile().to_vec())
}

/// Run every deposition round and return the grid together with the draws
/// that produced it.
pub fn run_section<S, R>(
    params: &SectionParams,
    simulator: &S,
    rng: &mut R,
) -> Result<SectionResult, SectionError>
where
    S: FieldSimulator + ?Sized,
    R: Rng,
{
    params.validate()?;

    let mut grid = LithologyGrid::new(params.nx, params.ny);
    let mut cumulative = vec![0.0f64; params.nx];
    let round_count = params.round_count();
    let mut rounds = Vec::with_capacity(round_count);

    for round in 0..round_count {
        let range = rng.gen_range(params.hmin..=params.hmax);
        let variogram = round_variogram(range, params);
        let seed = rng.gen_range(SEED_RANGE);

        let spec = FieldSpec {
            width: params.nx,
            height: params.ny,
            cell_size: params.cell_size,
            seed,
            variogram,
            label: THICKNESS_LABEL.to_string(),
        };
        let field = simulator
            .simulate(&spec)
            .map_err(|source| SectionError::Simulation { round, source })?;
        let thickness = thickness_profile(field, params)
            .map_err(|source| SectionError::Simulation { round, source })?;

        let stamped_columns = deposit_round(
            &mut grid,
            &mut cumulative,
            &thickness,
            params.cell_size,
            params.thickness_policy,
        );
        rounds.push(RoundRecord { round, range, seed, stamped_columns });
    }

    Ok(SectionResult { grid, round_count, rounds, cumulative })
}

/// Generate an interbedded chalk/flint section.
///
/// All randomness comes from `rng`; with a seeded generator and a deterministic
/// simulator the output is bit-identical across runs.
pub fn generate_interbedded_section<S, R>(
    params: &SectionParams,
    simulator: &S,
    rng: &mut R,
) -> Result<LithologyGrid, SectionError>
where
    S: FieldSimulator + ?Sized,
    R: Rng,
{
    run_section(params, simulator, rng).map(|r| r.grid)
}

/// Seed of ensemble member `index`, derived from the ensemble base seed.
#[inline]
pub fn member_seed(base_seed: u64, index: usize) -> u64 {
    base_seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Section generator bound to a field simulator.
pub struct SectionGenerator<S = NoiseFieldSimulator> {
    simulator: S,
}

impl SectionGenerator<NoiseFieldSimulator> {
    pub fn new() -> Self {
        Self { simulator: NoiseFieldSimulator::default() }
    }
}

impl Default for SectionGenerator<NoiseFieldSimulator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FieldSimulator> SectionGenerator<S> {
    pub fn with_simulator(simulator: S) -> Self {
        Self { simulator }
    }

    /// Generate one section from a seed.
    pub fn generate(
        &self,
        params: &SectionParams,
        seed: u64,
    ) -> Result<SectionResult, SectionError> {
        let mut rng = StdRng::seed_from_u64(seed);
        run_section(params, &self.simulator, &mut rng)
    }
}

impl<S: FieldSimulator + Sync> SectionGenerator<S> {
    /// Generate `count` independent sections. Member `i` uses
    /// [`member_seed`]`(base_seed, i)`, so the output does not depend on
    /// whether members run in parallel. The first failure aborts the ensemble.
    pub fn generate_ensemble(
        &self,
        params: &SectionParams,
        base_seed: u64,
        count: usize,
    ) -> Result<Vec<SectionResult>, SectionError> {
        params.validate()?;

        #[cfg(feature = "threading")]
        let members: Result<Vec<SectionResult>, SectionError> = {
            use rayon::prelude::*;
            (0..count)
                .into_par_iter()
                .map(|i| self.generate(params, member_seed(base_seed, i)))
                .collect()
        };

        #[cfg(not(feature = "threading"))]
        let members: Result<Vec<SectionResult>, SectionError> = (0..count)
            .map(|i| self.generate(params, member_seed(base_seed, i)))
            .collect();

        members
    }
}
