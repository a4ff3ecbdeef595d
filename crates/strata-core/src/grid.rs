use serde::Serialize;

/// Lithology class of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Lithology {
    /// Host lithology filling the space between bands.
    Chalk = 0,
    /// Boundary lithology forming thin bands.
    Flint = 1,
}

impl Lithology {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Lithology {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Lithology::Chalk),
            1 => Ok(Lithology::Flint),
            other => Err(other),
        }
    }
}

/// A 2D cross-section of lithology labels, row-major, `ny` rows × `nx` columns.
///
/// Row 0 is the top (shallowest) row; row `ny - 1` is the base of the section.
/// Dimensions are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LithologyGrid {
    data: Vec<u8>,
    nx: usize,
    ny: usize,
}

impl LithologyGrid {
    /// Create an all-chalk grid.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self { data: vec![Lithology::Chalk.code(); nx * ny], nx, ny }
    }

    /// Build a grid from row-major labels. Returns `None` when the length does not
    /// match `nx * ny` or a label is outside {0, 1}.
    pub fn from_vec(nx: usize, ny: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != nx * ny || data.iter().any(|&v| Lithology::try_from(v).is_err()) {
            return None;
        }
        Some(Self { data, nx, ny })
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// `(rows, columns)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.nx + col]
    }

    #[inline]
    pub fn lithology(&self, row: usize, col: usize) -> Lithology {
        if self.get(row, col) == Lithology::Flint.code() {
            Lithology::Flint
        } else {
            Lithology::Chalk
        }
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, lith: Lithology) {
        self.data[row * self.nx + col] = lith.code();
    }

    /// Mark a boundary-band cell.
    #[inline]
    pub fn stamp(&mut self, row: usize, col: usize) {
        self.set(row, col, Lithology::Flint);
    }

    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.nx;
        &self.data[start..start + self.nx]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks_exact(0) panics; an empty grid has no rows anyway.
        self.data.chunks_exact(self.nx.max(1)).take(self.ny)
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = u8> + '_ {
        (0..self.ny).map(move |r| self.get(r, col))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn count(&self, lith: Lithology) -> usize {
        let code = lith.code();
        self.data.iter().filter(|&&v| v == code).count()
    }

    /// Fraction of cells labelled flint; 0 for an empty grid.
    pub fn flint_fraction(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.count(Lithology::Flint) as f64 / self.data.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_chalk() {
        let g = LithologyGrid::new(5, 3);
        assert_eq!(g.shape(), (3, 5));
        assert_eq!(g.count(Lithology::Chalk), 15);
        assert_eq!(g.flint_fraction(), 0.0);
    }

    #[test]
    fn stamp_sets_single_cell() {
        let mut g = LithologyGrid::new(4, 4);
        g.stamp(2, 1);
        assert_eq!(g.get(2, 1), 1);
        assert_eq!(g.lithology(2, 1), Lithology::Flint);
        assert_eq!(g.count(Lithology::Flint), 1);
        assert_eq!(g.row(2), &[0, 1, 0, 0]);
        assert_eq!(g.column(1).collect::<Vec<_>>(), vec![0, 0, 1, 0]);
    }

    #[test]
    fn from_vec_rejects_bad_labels_and_lengths() {
        assert!(LithologyGrid::from_vec(2, 2, vec![0, 1, 0, 1]).is_some());
        assert!(LithologyGrid::from_vec(2, 2, vec![0, 1, 0]).is_none());
        assert!(LithologyGrid::from_vec(2, 2, vec![0, 1, 2, 1]).is_none());
    }

    #[test]
    fn rows_iterates_top_to_bottom() {
        let g = LithologyGrid::from_vec(3, 2, vec![1, 0, 0, 0, 0, 1]).unwrap();
        let rows: Vec<&[u8]> = g.rows().collect();
        assert_eq!(rows, vec![&[1u8, 0, 0][..], &[0u8, 0, 1][..]]);
    }

    #[test]
    fn lithology_code_conversion() {
        assert_eq!(Lithology::try_from(0u8), Ok(Lithology::Chalk));
        assert_eq!(Lithology::try_from(1u8), Ok(Lithology::Flint));
        assert_eq!(Lithology::try_from(9u8), Err(9));
    }
}
