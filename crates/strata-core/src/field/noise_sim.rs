//! Noise-based unconditional field simulator.
//!
//! Each variogram structure is realised as a seeded fBm evaluated in
//! range-normalised, azimuth-rotated coordinates, so correlation length follows
//! the major and minor ranges. Structures are standardised, weighted by the
//! square root of their contribution and summed; the nugget adds white noise.
//! The total is standardised to zero mean and unit variance.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::fbm::Fbm;
use super::rescale::{population_std, MIN_STD};
use super::{Field, FieldSimulator, FieldSpec, SimulationError};

const NUGGET_SALT: u64 = 0x6E75_6767_6574_0001;

/// Default field simulator backed by Perlin fBm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseFieldSimulator {
    pub octaves: u32,
    pub hurst: f64,
}

impl Default for NoiseFieldSimulator {
    fn default() -> Self {
        Self { octaves: 4, hurst: 1.0 }
    }
}

impl NoiseFieldSimulator {
    pub fn new() -> Self {
        Self::default()
    }
}

fn structure_seed(seed: u64, index: usize) -> u32 {
    let mixed = seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    (mixed ^ (mixed >> 32)) as u32
}

/// Shift to zero mean and scale to unit variance in place. A flat layer becomes zero.
fn standardise(values: &mut [f64]) {
    if values.is_empty() {
        return;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let std = population_std(values);
    if std > MIN_STD {
        for v in values.iter_mut() {
            *v = (*v - mean) / std;
        }
    } else {
        values.iter_mut().for_each(|v| *v = 0.0);
    }
}

impl FieldSimulator for NoiseFieldSimulator {
    fn simulate(&self, spec: &FieldSpec) -> Result<Field, SimulationError> {
        spec.validate()?;

        let (w, h) = (spec.width, spec.height);
        let n = w * h;
        let mut values = vec![0.0f64; n];
        let mut layer = vec![0.0f64; n];

        for (i, s) in spec.variogram.structures.iter().enumerate() {
            if s.contribution == 0.0 {
                continue;
            }
            let fbm = Fbm::new(structure_seed(spec.seed, i), self.hurst, self.octaves);
            for r in 0..h {
                // Row 0 is the top of the section; north points up.
                let y = (h - r) as f64 * spec.cell_size - 0.5 * spec.cell_size;
                for c in 0..w {
                    let x = (c as f64 + 0.5) * spec.cell_size;
                    let (major, minor) = s.axis_components(x, y);
                    layer[r * w + c] = fbm.sample(major / s.major_range, minor / s.minor_range);
                }
            }
            standardise(&mut layer);
            let weight = s.contribution.sqrt();
            for (v, l) in values.iter_mut().zip(&layer) {
                *v += weight * l;
            }
        }

        let nugget = spec.variogram.nugget;
        if nugget > 0.0 {
            let mut rng = StdRng::seed_from_u64(spec.seed ^ NUGGET_SALT);
            // Uniform on [−√3, √3] has unit variance.
            let amp = nugget.sqrt() * 3.0f64.sqrt();
            for v in values.iter_mut() {
                *v += amp * rng.gen_range(-1.0f64..=1.0);
            }
        }

        standardise(&mut values);
        Ok(Field { width: w, height: h, values, label: spec.label.clone() })
    }
}
