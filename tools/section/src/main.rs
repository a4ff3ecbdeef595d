/// Section generator: simulates one interbedded chalk/flint section and writes
/// it as a plain numeric matrix, optionally with a JSON run report.
use std::fs;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use strata_core::export::{save_matrix, write_matrix, Delimiter};
use strata_core::metrics::{compute_band_stats, BandStats};
use strata_core::section::RoundRecord;
use strata_core::{SectionGenerator, SectionParams, ThicknessPolicy};

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "section", about = "Generate a synthetic chalk/flint cross-section")]
struct Args {
    /// JSON parameter file; flags below override its fields.
    #[arg(short, long)]
    params: Option<PathBuf>,

    #[arg(long)]
    nx: Option<usize>,

    #[arg(long)]
    ny: Option<usize>,

    /// Physical size of one cell.
    #[arg(long)]
    cell_size: Option<f64>,

    /// Target mean chalk-layer thickness (physical units).
    #[arg(long)]
    mean: Option<f64>,

    /// Target chalk-layer thickness standard deviation (physical units).
    #[arg(long)]
    stdev: Option<f64>,

    /// Lower bound of the lateral variogram range.
    #[arg(long)]
    hmin: Option<u32>,

    /// Upper bound of the lateral variogram range.
    #[arg(long)]
    hmax: Option<u32>,

    /// Keep negative simulated thickness instead of clamping it to zero.
    #[arg(long)]
    allow_negative: bool,

    /// RNG seed (random when omitted; the chosen seed is logged).
    #[arg(short, long)]
    seed: Option<u64>,

    /// Matrix output path, or "-" for stdout.
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Matrix delimiter: whitespace or comma.
    #[arg(short, long, default_value = "whitespace")]
    delimiter: Delimiter,

    /// Write a JSON run report (parameters, per-round draws, band statistics).
    #[arg(long)]
    report: Option<PathBuf>,
}

// ── Report ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct RunReport<'a> {
    seed: u64,
    params: &'a SectionParams,
    round_count: usize,
    rounds: &'a [RoundRecord],
    stats: BandStats,
}

fn resolve_params(args: &Args) -> Result<SectionParams> {
    let mut params = match &args.params {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading parameter file {}", path.display()))?;
            SectionParams::from_json(&json)
                .with_context(|| format!("parsing parameter file {}", path.display()))?
        }
        None => SectionParams::default(),
    };
    if let Some(v) = args.nx {
        params.nx = v;
    }
    if let Some(v) = args.ny {
        params.ny = v;
    }
    if let Some(v) = args.cell_size {
        params.cell_size = v;
    }
    if let Some(v) = args.mean {
        params.mean = v;
    }
    if let Some(v) = args.stdev {
        params.stdev = v;
    }
    if let Some(v) = args.hmin {
        params.hmin = v;
    }
    if let Some(v) = args.hmax {
        params.hmax = v;
    }
    if args.allow_negative {
        params.thickness_policy = ThicknessPolicy::Allow;
    }
    params.validate()?;
    Ok(params)
}

// ── main ─────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    let params = resolve_params(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);

    eprintln!(
        "[section] {}×{} cells, cell={} mean={} stdev={} h∈[{}, {}], seed {}",
        params.nx,
        params.ny,
        params.cell_size,
        params.mean,
        params.stdev,
        params.hmin,
        params.hmax,
        seed
    );

    let result = SectionGenerator::new()
        .generate(&params, seed)
        .context("section generation failed")?;

    let stats = compute_band_stats(&result.grid, params.nominal_spacing().ceil() as usize);
    eprintln!(
        "[section] {} rounds, {} bands, {:.1}% flint, {} under-filled columns",
        result.round_count,
        stats.total_bands,
        stats.flint_fraction * 100.0,
        stats.underfilled_columns
    );

    if args.output == "-" {
        let stdout = io::stdout();
        write_matrix(&result.grid, BufWriter::new(stdout.lock()), args.delimiter)
            .context("writing matrix to stdout")?;
    } else {
        let path = PathBuf::from(&args.output);
        save_matrix(&result.grid, &path, args.delimiter)
            .with_context(|| format!("writing matrix to {}", path.display()))?;
        eprintln!("[section] Wrote {}", path.display());
    }

    if let Some(path) = &args.report {
        let report = RunReport {
            seed,
            params: &params,
            round_count: result.round_count,
            rounds: &result.rounds,
            stats,
        };
        fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing report {}", path.display()))?;
        eprintln!("[section] Wrote {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(flags: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("section").chain(flags.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_parameter_file() {
        let path = std::env::temp_dir().join(format!("section_params_{}.json", std::process::id()));
        fs::write(&path, r#"{"nx": 40, "ny": 30, "mean": 3.0, "hmin": 5, "hmax": 15}"#).unwrap();
        let args = parse(&["--params", path.to_str().unwrap(), "--nx", "12", "--mean", "4.5"]);
        let params = resolve_params(&args);
        fs::remove_file(&path).ok();

        let params = params.unwrap();
        assert_eq!(params.nx, 12);
        assert_eq!(params.mean, 4.5);
        assert_eq!(params.ny, 30);
        assert_eq!((params.hmin, params.hmax), (5, 15));
        assert_eq!(params.stdev, SectionParams::default().stdev);
        assert_eq!(params.thickness_policy, ThicknessPolicy::ClampZero);
    }

    #[test]
    fn allow_negative_selects_raw_thickness() {
        let params = resolve_params(&parse(&["--allow-negative"])).unwrap();
        assert_eq!(params.thickness_policy, ThicknessPolicy::Allow);
        let params = resolve_params(&parse(&[])).unwrap();
        assert_eq!(params.thickness_policy, ThicknessPolicy::ClampZero);
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        assert!(resolve_params(&parse(&["--hmin", "50", "--hmax", "10"])).is_err());
        assert!(resolve_params(&parse(&["--cell-size", "0"])).is_err());
    }

    #[test]
    fn missing_parameter_file_is_an_error() {
        let args = parse(&["--params", "/nonexistent/strata/params.json"]);
        assert!(resolve_params(&args).is_err());
    }
}
