use super::FloatT;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sparse matrix in Compressed Sparse Row (CSR) format.
///
/// Used for the peer/lambda matrix: each row holds the intensity weights of
/// one evaluated unit over the reference set.  Rows are produced
/// independently by the per-unit solves and concatenated, so a row-compressed
/// layout is the natural one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CsrMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// CSR format row pointer, length `m + 1`
    pub rowptr: Vec<usize>,
    /// vector of column indices
    pub colind: Vec<usize>,
    /// vector of non-zero matrix elements
    pub nzval: Vec<T>,
}

impl<T: FloatT> CsrMatrix<T> {
    /// Assembles a CSR matrix from dense rows, dropping entries with
    /// magnitude at or below `drop_tol` and clamping small negative values
    /// (solver noise) to zero.
    pub fn from_dense_rows(rows: &[Vec<T>], ncols: usize, drop_tol: T) -> Self {
        let m = rows.len();
        let mut rowptr = Vec::with_capacity(m + 1);
        let mut colind = Vec::new();
        let mut nzval = Vec::new();

        rowptr.push(0);
        for row in rows {
            debug_assert_eq!(row.len(), ncols);
            for (j, &v) in row.iter().enumerate() {
                let v = if v < T::zero() { T::zero() } else { v };
                if v > drop_tol {
                    colind.push(j);
                    nzval.push(v);
                }
            }
            rowptr.push(colind.len());
        }

        Self {
            m,
            n: ncols,
            rowptr,
            colind,
            nzval,
        }
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.nzval.len()
    }

    /// Column indices and values of row `i`.
    pub fn row(&self, i: usize) -> (&[usize], &[T]) {
        let rng = self.rowptr[i]..self.rowptr[i + 1];
        (&self.colind[rng.clone()], &self.nzval[rng])
    }

    /// Entry `(i, j)`, or zero if not stored.
    pub fn get(&self, i: usize, j: usize) -> T {
        let (cols, vals) = self.row(i);
        match cols.iter().position(|&c| c == j) {
            Some(k) => vals[k],
            None => T::zero(),
        }
    }

    /// Sum of the stored entries of row `i`.
    pub fn row_sum(&self, i: usize) -> T {
        let (_, vals) = self.row(i);
        vals.iter().fold(T::zero(), |acc, &v| acc + v)
    }

    /// Expands to a dense row-major matrix.
    pub fn to_dense(&self) -> super::DenseMatrix<T> {
        let mut out = super::DenseMatrix::zeros(self.m, self.n);
        for i in 0..self.m {
            let (cols, vals) = self.row(i);
            for (&j, &v) in cols.iter().zip(vals) {
                out.set(i, j, v);
            }
        }
        out
    }
}
