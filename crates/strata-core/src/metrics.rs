//! Band statistics for a generated section.

use serde::Serialize;

use crate::grid::{Lithology, LithologyGrid};

/// Rows holding a flint band in `col`, top to bottom.
pub fn band_rows(grid: &LithologyGrid, col: usize) -> Vec<usize> {
    grid.column(col)
        .enumerate()
        .filter(|&(_, v)| v == Lithology::Flint.code())
        .map(|(r, _)| r)
        .collect()
}

/// Vertical distance in cells between consecutive bands of `col`.
pub fn band_spacings(grid: &LithologyGrid, col: usize) -> Vec<usize> {
    band_rows(grid, col).windows(2).map(|w| w[1] - w[0]).collect()
}

/// Summary of band placement across a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandStats {
    pub total_bands: usize,
    pub flint_fraction: f64,
    pub min_bands_per_column: usize,
    pub max_bands_per_column: usize,
    pub mean_bands_per_column: f64,
    /// `None` when no column holds two bands.
    pub mean_spacing: Option<f64>,
    pub min_spacing: Option<usize>,
    pub max_spacing: Option<usize>,
    /// Columns whose shallowest band lies more than `max_top_gap` rows below
    /// the top of the section, or that hold no band at all.
    pub underfilled_columns: usize,
}

/// Compute [`BandStats`]. `max_top_gap` is the number of chalk rows allowed
/// above the shallowest band before a column counts as under-filled.
pub fn compute_band_stats(grid: &LithologyGrid, max_top_gap: usize) -> BandStats {
    let nx = grid.nx();
    let mut total_bands = 0usize;
    let mut min_bands = usize::MAX;
    let mut max_bands = 0usize;
    let mut spacing_sum = 0usize;
    let mut spacing_count = 0usize;
    let mut min_spacing: Option<usize> = None;
    let mut max_spacing: Option<usize> = None;
    let mut underfilled = 0usize;

    for col in 0..nx {
        let rows = band_rows(grid, col);
        total_bands += rows.len();
        min_bands = min_bands.min(rows.len());
        max_bands = max_bands.max(rows.len());

        match rows.first() {
            Some(&top) if top <= max_top_gap => {}
            _ => underfilled += 1,
        }

        for d in band_spacings(grid, col) {
            spacing_sum += d;
            spacing_count += 1;
            min_spacing = Some(min_spacing.map_or(d, |m| m.min(d)));
            max_spacing = Some(max_spacing.map_or(d, |m| m.max(d)));
        }
    }

    BandStats {
        total_bands,
        flint_fraction: grid.flint_fraction(),
        min_bands_per_column: if nx == 0 { 0 } else { min_bands },
        max_bands_per_column: max_bands,
        mean_bands_per_column: if nx == 0 { 0.0 } else { total_bands as f64 / nx as f64 },
        mean_spacing: (spacing_count > 0).then(|| spacing_sum as f64 / spacing_count as f64),
        min_spacing,
        max_spacing,
        underfilled_columns: underfilled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&[u8]]) -> LithologyGrid {
        let nx = rows[0].len();
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        LithologyGrid::from_vec(nx, rows.len(), data).unwrap()
    }

    #[test]
    fn band_rows_and_spacings_per_column() {
        let g = grid_from(&[
            &[1, 0],
            &[0, 0],
            &[0, 1],
            &[1, 0],
            &[0, 0],
            &[1, 1],
        ]);
        assert_eq!(band_rows(&g, 0), vec![0, 3, 5]);
        assert_eq!(band_spacings(&g, 0), vec![3, 2]);
        assert_eq!(band_spacings(&g, 1), vec![3]);
    }

    #[test]
    fn stats_summarise_columns() {
        let g = grid_from(&[
            &[1, 0, 0],
            &[0, 0, 0],
            &[0, 1, 0],
            &[1, 0, 0],
            &[0, 0, 0],
            &[1, 1, 0],
        ]);
        let s = compute_band_stats(&g, 1);
        assert_eq!(s.total_bands, 5);
        assert_eq!(s.min_bands_per_column, 0);
        assert_eq!(s.max_bands_per_column, 3);
        assert!((s.mean_bands_per_column - 5.0 / 3.0).abs() < 1e-12);
        assert_eq!(s.min_spacing, Some(2));
        assert_eq!(s.max_spacing, Some(3));
        assert!((s.mean_spacing.unwrap() - 8.0 / 3.0).abs() < 1e-12);
        // Column 1 starts at row 2 (> 1), column 2 has no band.
        assert_eq!(s.underfilled_columns, 2);
        assert!((s.flint_fraction - 5.0 / 18.0).abs() < 1e-12);
    }

    #[test]
    fn empty_section_has_no_spacing() {
        let g = LithologyGrid::new(4, 6);
        let s = compute_band_stats(&g, 6);
        assert_eq!(s.total_bands, 0);
        assert_eq!(s.mean_spacing, None);
        assert_eq!(s.underfilled_columns, 4);
    }
}
