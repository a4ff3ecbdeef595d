use serde::Serialize;
use strata_core::metrics::{compute_band_stats, BandStats};
use strata_core::section::RoundRecord;
use strata_core::{SectionGenerator, SectionParams};
use wasm_bindgen::prelude::*;

/// Section payload handed to JavaScript.
#[derive(Debug, Serialize)]
pub struct SectionOutput {
    pub nx: usize,
    pub ny: usize,
    /// Row-major labels, row 0 at the top.
    pub data: Vec<u8>,
    pub round_count: usize,
    pub rounds: Vec<RoundRecord>,
    pub stats: BandStats,
    pub generation_time_ms: f64,
}

/// Parse params, generate, and package the result. Shared by the bindings.
fn build_output(params_json: &str, seed: u64) -> Result<SectionOutput, String> {
    let params = SectionParams::from_json(params_json).map_err(|e| format!("Invalid params: {e}"))?;
    let result = SectionGenerator::new()
        .generate(&params, seed)
        .map_err(|e| e.to_string())?;

    let max_top_gap = params.nominal_spacing().ceil() as usize;
    let stats = compute_band_stats(&result.grid, max_top_gap);
    let (ny, nx) = result.grid.shape();
    Ok(SectionOutput {
        nx,
        ny,
        data: result.grid.as_slice().to_vec(),
        round_count: result.round_count,
        rounds: result.rounds,
        stats,
        generation_time_ms: 0.0,
    })
}

/// Generate a section from parameters JSON and a seed.
/// Resolves to `{ nx, ny, data, round_count, rounds, stats, generation_time_ms }`.
#[wasm_bindgen]
pub async fn generate(params_json: String, seed: u64) -> Result<JsValue, JsValue> {
    let start = js_sys::Date::now();
    let mut output = build_output(&params_json, seed).map_err(|e| JsValue::from_str(&e))?;
    output.generation_time_ms = js_sys::Date::now() - start;
    serde_wasm_bindgen::to_value(&output).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Default parameters as JSON, for populating UI controls.
#[wasm_bindgen]
pub fn default_params() -> Result<String, JsValue> {
    serde_json::to_string(&SectionParams::default()).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_output_packs_grid() {
        let params = r#"{"nx": 24, "ny": 30, "mean": 4.0, "stdev": 1.0, "hmin": 5, "hmax": 20}"#;
        let out = build_output(params, 3).unwrap();
        assert_eq!((out.nx, out.ny), (24, 30));
        assert_eq!(out.data.len(), 24 * 30);
        assert_eq!(out.round_count, 7);
        assert_eq!(out.rounds.len(), 7);
        assert_eq!(out.stats.total_bands, out.data.iter().filter(|&&v| v == 1).count());
    }

    #[test]
    fn build_output_reports_bad_params() {
        let err = build_output(r#"{"hmin": 9, "hmax": 3}"#, 1).unwrap_err();
        assert!(err.contains("hmin"), "{err}");
        let err = build_output("not json", 1).unwrap_err();
        assert!(err.starts_with("Invalid params"), "{err}");
    }
}
