//! Ensemble runner: generates many independent sections from one parameter
//! set and aggregates band statistics (mean/std/p10/p90) across members.
//! Output: a JSON summary, plus optional per-member matrices.

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use strata_core::export::{save_matrix, Delimiter};
use strata_core::metrics::{compute_band_stats, BandStats};
use strata_core::section::member_seed;
use strata_core::{SectionGenerator, SectionParams};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "ensemble", about = "Generate a section ensemble and summarise band statistics")]
struct Args {
    /// JSON parameter file (defaults when omitted).
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Number of ensemble members.
    #[arg(short = 'n', long, default_value = "32")]
    count: usize,

    /// Base seed; member i uses a seed derived from it.
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Summary JSON output path.
    #[arg(short, long, default_value = "data/ensemble/summary.json")]
    output: PathBuf,

    /// Also write each member's matrix into this directory.
    #[arg(long)]
    members_dir: Option<PathBuf>,

    /// Matrix delimiter for member files.
    #[arg(short, long, default_value = "whitespace")]
    delimiter: Delimiter,
}

// ── Output types ──────────────────────────────────────────────────────────────

#[derive(Serialize, Clone, Copy)]
struct Stats1 {
    mean: f64,
    std: f64,
    p10: f64,
    p90: f64,
}

#[derive(Serialize)]
struct MemberSummary {
    index: usize,
    seed: u64,
    round_count: usize,
    stats: BandStats,
}

#[derive(Serialize)]
struct EnsembleSummary {
    params: SectionParams,
    base_seed: u64,
    members: usize,
    total_bands: Stats1,
    flint_fraction: Stats1,
    mean_spacing: Stats1,
    underfilled_fraction: Stats1,
    per_member: Vec<MemberSummary>,
}

// ── Aggregation ───────────────────────────────────────────────────────────────

fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = ((sorted.len() - 1) as f64 * p).round() as usize;
    sorted[idx]
}

/// Aggregate the finite values; `None` when none are present.
fn scalar_stats(values: &[Option<f64>]) -> Option<Stats1> {
    let mut v: Vec<f64> = values.iter().flatten().copied().filter(|x| x.is_finite()).collect();
    if v.is_empty() {
        return None;
    }
    v.sort_by(|a, b| a.total_cmp(b));
    let n = v.len() as f64;
    let mean = v.iter().sum::<f64>() / n;
    let std = (v.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();
    Some(Stats1 { mean, std, p10: percentile(&v, 0.10), p90: percentile(&v, 0.90) })
}

fn load_params(path: Option<&Path>) -> Result<SectionParams> {
    let params = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading parameter file {}", path.display()))?;
            SectionParams::from_json(&json)
                .with_context(|| format!("parsing parameter file {}", path.display()))?
        }
        None => SectionParams::default(),
    };
    params.validate()?;
    Ok(params)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    if args.count == 0 {
        bail!("ensemble needs at least one member");
    }
    let params = load_params(args.params.as_deref())?;

    eprintln!(
        "[ensemble] {} members of {}×{} cells, base seed {} ...",
        args.count, params.nx, params.ny, args.seed
    );
    let results = SectionGenerator::new()
        .generate_ensemble(&params, args.seed, args.count)
        .context("ensemble generation failed")?;

    let max_top_gap = params.nominal_spacing().ceil() as usize;
    let per_member: Vec<MemberSummary> = results
        .par_iter()
        .enumerate()
        .map(|(index, r)| MemberSummary {
            index,
            seed: member_seed(args.seed, index),
            round_count: r.round_count,
            stats: compute_band_stats(&r.grid, max_top_gap),
        })
        .collect();

    if let Some(dir) = &args.members_dir {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        for (i, r) in results.iter().enumerate() {
            let path = dir.join(format!("member_{i:04}.txt"));
            save_matrix(&r.grid, &path, args.delimiter)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        eprintln!("[ensemble] Wrote {} member matrices to {}", results.len(), dir.display());
    }

    let nx = params.nx as f64;
    let bands: Vec<Option<f64>> =
        per_member.iter().map(|m| Some(m.stats.total_bands as f64)).collect();
    let flint: Vec<Option<f64>> =
        per_member.iter().map(|m| Some(m.stats.flint_fraction)).collect();
    let spacing: Vec<Option<f64>> = per_member.iter().map(|m| m.stats.mean_spacing).collect();
    let under: Vec<Option<f64>> = per_member
        .iter()
        .map(|m| Some(m.stats.underfilled_columns as f64 / nx))
        .collect();

    let empty = Stats1 { mean: f64::NAN, std: f64::NAN, p10: f64::NAN, p90: f64::NAN };
    let spacing_stats = scalar_stats(&spacing).unwrap_or_else(|| {
        eprintln!("[ensemble] Warning: no member has two bands in a column; spacing undefined");
        empty
    });

    let summary = EnsembleSummary {
        params,
        base_seed: args.seed,
        members: per_member.len(),
        total_bands: scalar_stats(&bands).unwrap_or(empty),
        flint_fraction: scalar_stats(&flint).unwrap_or(empty),
        mean_spacing: spacing_stats,
        underfilled_fraction: scalar_stats(&under).unwrap_or(empty),
        per_member,
    };

    eprintln!(
        "[ensemble] bands {:.1}±{:.1}, flint {:.2}%, spacing {:.2} cells (nominal {:.2}), \
         under-filled {:.1}%",
        summary.total_bands.mean,
        summary.total_bands.std,
        summary.flint_fraction.mean * 100.0,
        summary.mean_spacing.mean,
        summary.params.nominal_spacing(),
        summary.underfilled_fraction.mean * 100.0,
    );

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(&args.output, serde_json::to_string_pretty(&summary)?)
        .with_context(|| format!("writing {}", args.output.display()))?;
    eprintln!("[ensemble] Done -> {}", args.output.display());
    Ok(())
}
