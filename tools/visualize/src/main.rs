//! Section renderer: writes a lithology grid as a PNG, chalk in off-white and
//! flint in charcoal. Reads an exported matrix, or generates a fresh section.
//! Each cell becomes a square block of pixels, so the image keeps the
//! section's physical aspect ratio.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use strata_core::export::load_matrix;
use strata_core::{Lithology, LithologyGrid, SectionGenerator, SectionParams};

#[derive(Parser, Debug)]
#[command(name = "visualize", about = "Render a chalk/flint section to PNG")]
struct Args {
    /// Matrix file written by `section`. Omit to generate one.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Parameter JSON used when generating.
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Seed used when generating.
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Pixels per cell edge.
    #[arg(long, default_value = "4")]
    scale: u32,

    /// Draw a grey tick every this many cells along the top and left edges (0 disables).
    #[arg(long, default_value = "10")]
    tick_every: usize,

    #[arg(short, long, default_value = "data/debug/section.png")]
    output: PathBuf,
}

// ── Colour helpers ────────────────────────────────────────────────────────────

fn lithology_color(lith: Lithology) -> image::Rgb<u8> {
    match lith {
        Lithology::Chalk => image::Rgb([238, 234, 218]),
        Lithology::Flint => image::Rgb([45, 45, 52]),
    }
}

const TICK_COLOR: image::Rgb<u8> = image::Rgb([150, 150, 150]);

fn load_or_generate(args: &Args) -> Result<LithologyGrid> {
    if let Some(path) = &args.input {
        eprintln!("[visualize] Reading {}", path.display());
        return load_matrix(path).with_context(|| format!("loading {}", path.display()));
    }
    let params = match &args.params {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading parameter file {}", path.display()))?;
            SectionParams::from_json(&json)?
        }
        None => SectionParams::default(),
    };
    eprintln!("[visualize] Generating {}×{} section, seed {}", params.nx, params.ny, args.seed);
    Ok(SectionGenerator::new().generate(&params, args.seed)?.grid)
}

/// Pixel dimensions of a `nx`×`ny` section at `scale` pixels per cell.
fn image_size(nx: usize, ny: usize, scale: u32) -> Result<(u32, u32)> {
    let side = |cells: usize| u32::try_from(cells).ok().and_then(|n| n.checked_mul(scale));
    match (side(nx), side(ny)) {
        (Some(width), Some(height)) => Ok((width, height)),
        _ => bail!("{nx}×{ny} cells at scale {scale} exceed the maximum image size"),
    }
}

fn render(grid: &LithologyGrid, scale: u32, tick_every: usize) -> Result<image::RgbImage> {
    let (ny, nx) = grid.shape();
    let (width, height) = image_size(nx, ny, scale)?;
    let mut img = image::RgbImage::new(width, height);
    for r in 0..ny {
        for c in 0..nx {
            let px = lithology_color(grid.lithology(r, c));
            for dy in 0..scale {
                for dx in 0..scale {
                    img.put_pixel(c as u32 * scale + dx, r as u32 * scale + dy, px);
                }
            }
        }
    }
    if tick_every > 0 {
        let tick_len = (scale * 2).min(img.width()).min(img.height());
        for c in (0..nx).step_by(tick_every) {
            for y in 0..tick_len {
                img.put_pixel(c as u32 * scale, y, TICK_COLOR);
            }
        }
        for r in (0..ny).step_by(tick_every) {
            for x in 0..tick_len {
                img.put_pixel(x, r as u32 * scale, TICK_COLOR);
            }
        }
    }
    Ok(img)
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.scale == 0 {
        bail!("--scale must be at least 1");
    }
    let grid = load_or_generate(&args)?;
    let img = render(&grid, args.scale, args.tick_every)?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    img.save(&args.output)
        .with_context(|| format!("saving {}", args.output.display()))?;
    eprintln!("[visualize] Wrote {} ({}×{} px)", args.output.display(), img.width(), img.height());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_flint(nx: usize, ny: usize, cells: &[(usize, usize)]) -> LithologyGrid {
        let mut grid = LithologyGrid::new(nx, ny);
        for &(r, c) in cells {
            grid.stamp(r, c);
        }
        grid
    }

    #[test]
    fn image_is_scaled_cell_blocks() {
        let grid = grid_with_flint(3, 2, &[(1, 2)]);
        let img = render(&grid, 4, 0).unwrap();
        assert_eq!(img.dimensions(), (12, 8));

        let flint = lithology_color(Lithology::Flint);
        let chalk = lithology_color(Lithology::Chalk);
        for y in 4..8 {
            for x in 8..12 {
                assert_eq!(*img.get_pixel(x, y), flint, "pixel ({x}, {y})");
            }
        }
        assert_eq!(*img.get_pixel(0, 0), chalk);
        assert_eq!(*img.get_pixel(7, 7), chalk);
        assert_eq!(*img.get_pixel(8, 3), chalk);
    }

    #[test]
    fn ticks_mark_top_and_left_edges() {
        let grid = LithologyGrid::new(6, 6);
        let img = render(&grid, 2, 3).unwrap();
        assert_eq!(*img.get_pixel(6, 0), TICK_COLOR);
        assert_eq!(*img.get_pixel(0, 6), TICK_COLOR);
        assert_eq!(*img.get_pixel(5, 5), lithology_color(Lithology::Chalk));
    }

    #[test]
    fn oversized_image_is_rejected() {
        assert_eq!(image_size(200, 100, 4).unwrap(), (800, 400));
        assert!(image_size(1 << 20, 10, 1 << 13).is_err());
        assert!(image_size(10, 1 << 20, 1 << 13).is_err());
        assert!(image_size(usize::MAX, 1, 2).is_err());
    }
}
