//! Affine rescaling of a field to target first and second moments.

/// Below this input standard deviation the field is treated as flat.
pub const MIN_STD: f64 = 1e-12;

pub(crate) fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}

/// Linearly map `values` so their mean is `target_mean` and their population
/// standard deviation is `target_stdev`, preserving the spatial pattern.
///
/// A flat (zero-variance) input returns a flat field equal to `target_mean`.
pub fn affine_rescale(values: &[f64], target_mean: f64, target_stdev: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let std = population_std(values);
    if !(std > MIN_STD) {
        return vec![target_mean; values.len()];
    }
    let scale = target_stdev / std;
    values.iter().map(|&v| target_mean + (v - mean) * scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn matches_target_moments() {
        let raw = [-1.0, 0.5, 2.0, 3.5, -0.25, 1.0];
        let out = affine_rescale(&raw, 5.0, 2.0);
        let mean = out.iter().sum::<f64>() / out.len() as f64;
        assert_relative_eq!(mean, 5.0, epsilon = 1e-12);
        assert_relative_eq!(population_std(&out), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn preserves_ordering() {
        let raw = [3.0, -2.0, 0.0, 7.0];
        let out = affine_rescale(&raw, 10.0, 1.0);
        assert!(out[3] > out[0] && out[0] > out[2] && out[2] > out[1]);
    }

    #[test]
    fn flat_input_maps_to_target_mean() {
        let out = affine_rescale(&[0.0; 10], 5.0, 0.0);
        assert_eq!(out, vec![5.0; 10]);
        let out = affine_rescale(&[2.0; 4], 3.0, 1.5);
        assert_eq!(out, vec![3.0; 4]);
    }

    #[test]
    fn zero_target_stdev_flattens() {
        let out = affine_rescale(&[1.0, 2.0, 3.0], 4.0, 0.0);
        for v in out {
            assert_relative_eq!(v, 4.0);
        }
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(affine_rescale(&[], 1.0, 1.0).is_empty());
    }
}
