#![allow(non_snake_case)]
use super::FloatT;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dense matrix in row-major order.
///
/// Rows index decision making units and columns index inputs or outputs, so
/// the per-unit LP builders slice rows directly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DenseMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// row-major element data, length `m * n`
    pub data: Vec<T>,
}

impl<T: FloatT> DenseMatrix<T> {
    /// Creates a matrix from row-major data.  The data length must agree
    /// with the dimensions.
    pub fn new(m: usize, n: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), m * n, "data length must equal m * n");
        Self { m, n, data }
    }

    /// Creates a matrix from a slice of equal-length rows.
    pub fn from_rows(rows: &[Vec<T>]) -> Self {
        let m = rows.len();
        let n = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(m * n);
        for row in rows {
            assert_eq!(row.len(), n, "all rows must have equal length");
            data.extend_from_slice(row);
        }
        Self { m, n, data }
    }

    /// An `m` x `n` matrix of zeros.
    pub fn zeros(m: usize, n: usize) -> Self {
        Self {
            m,
            n,
            data: vec![T::zero(); m * n],
        }
    }

    /// Dimensions as a `(rows, cols)` pair.
    pub fn size(&self) -> (usize, usize) {
        (self.m, self.n)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.n + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, v: T) {
        self.data[i * self.n + j] = v;
    }

    /// Borrows row `i` as a slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Overwrites row `i`.
    pub fn set_row(&mut self, i: usize, row: &[T]) {
        assert_eq!(row.len(), self.n);
        self.data[i * self.n..(i + 1) * self.n].copy_from_slice(row);
    }

    /// Iterator over the rows of the matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks_exact(self.n.max(1))
    }

    fn col_iter(&self, j: usize) -> impl Iterator<Item = T> + '_ {
        (0..self.m).map(move |i| self.get(i, j))
    }

    /// Minimum of column `j`.
    pub fn col_min(&self, j: usize) -> T {
        self.col_iter(j).fold(T::infinity(), T::min)
    }

    /// Maximum of column `j`.
    pub fn col_max(&self, j: usize) -> T {
        self.col_iter(j).fold(-T::infinity(), T::max)
    }

    /// Mean of column `j`.
    pub fn col_mean(&self, j: usize) -> T {
        let n = T::from_usize(self.m).unwrap_or_else(T::one);
        self.col_iter(j).fold(T::zero(), |acc, v| acc + v) / n
    }

    /// Sample standard deviation of column `j` (`n - 1` denominator).
    /// Returns zero for a single-row matrix.
    pub fn col_std(&self, j: usize) -> T {
        if self.m < 2 {
            return T::zero();
        }
        let mean = self.col_mean(j);
        let denom = T::from_usize(self.m - 1).unwrap_or_else(T::one);
        let ss = self
            .col_iter(j)
            .fold(T::zero(), |acc, v| acc + (v - mean) * (v - mean));
        (ss / denom).sqrt()
    }
}
