//! Fractional Brownian motion over Perlin noise.
//!
//! fBm: sum of octaves with amplitude = gain^i and frequency = 2^i, where
//! gain = 2^(−H). H = 1 gives a smooth field dominated by the first octave,
//! which suits range-limited variogram structures.
use noise::{NoiseFn, Perlin};

/// Fixed sub-lattice offset. Perlin noise is zero at integer lattice points,
/// and range-scaled cell centres often land on them.
const LATTICE_OFFSET: [f64; 2] = [0.318_309_886, 0.732_050_808];

pub struct Fbm {
    pub hurst: f64,
    pub octaves: u32,
    noise: Perlin,
}

impl Fbm {
    pub fn new(seed: u32, hurst: f64, octaves: u32) -> Self {
        Self { hurst, octaves: octaves.max(1), noise: Perlin::new(seed) }
    }

    #[inline]
    fn gain(&self) -> f64 {
        2.0f64.powf(-self.hurst)
    }

    /// Evaluate at `(u, v)` in range-normalised coordinates: one unit spans one
    /// correlation range along each axis.
    pub fn sample(&self, u: f64, v: f64) -> f64 {
        let gain = self.gain();
        let mut value = 0.0f64;
        let mut amp = 1.0f64;
        let mut freq = 1.0f64;
        for _ in 0..self.octaves {
            let point = [u * freq + LATTICE_OFFSET[0], v * freq + LATTICE_OFFSET[1]];
            value += amp * self.noise.get(point);
            amp *= gain;
            freq *= 2.0;
        }
        value
    }
}
