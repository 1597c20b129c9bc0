#![allow(non_snake_case)]
use crate::algebra::*;
use crate::model::DeaError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------
// Observation data shared by every model family
// ---------------

/// Evaluation and reference observation sets.
///
/// `X` is `n x m` (units by inputs) and `Y` is `n x s` (units by outputs).
/// The reference technology defaults to the evaluation set itself, but a
/// distinct reference set can be supplied, e.g. to score units one by one
/// against a fixed sample.  All shape checks happen at construction; the
/// data is read-only afterwards.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProblemData<T = f64> {
    X: DenseMatrix<T>,
    Y: DenseMatrix<T>,
    Xref: Option<DenseMatrix<T>>,
    Yref: Option<DenseMatrix<T>>,
    names: Option<Vec<String>>,
}

impl<T> ProblemData<T>
where
    T: FloatT,
{
    /// Creates a data set evaluated against its own technology.
    pub fn new(X: &DenseMatrix<T>, Y: &DenseMatrix<T>) -> Result<Self, DeaError> {
        if X.m == 0 || X.n == 0 || Y.n == 0 {
            return Err(DeaError::EmptyData);
        }
        if X.m != Y.m {
            return Err(DeaError::UnitCountMismatch { nx: X.m, ny: Y.m });
        }
        Ok(Self {
            X: X.clone(),
            Y: Y.clone(),
            Xref: None,
            Yref: None,
            names: None,
        })
    }

    /// Replaces the reference technology with an explicit observation set.
    pub fn with_reference(
        mut self,
        Xref: &DenseMatrix<T>,
        Yref: &DenseMatrix<T>,
    ) -> Result<Self, DeaError> {
        if Xref.m != Yref.m {
            return Err(DeaError::ReferenceCountMismatch {
                nx: Xref.m,
                ny: Yref.m,
            });
        }
        if Xref.m == 0 {
            return Err(DeaError::EmptyData);
        }
        if Xref.n != self.X.n {
            return Err(DeaError::ColumnMismatch {
                what: "Xref",
                got: Xref.n,
                expected: self.X.n,
            });
        }
        if Yref.n != self.Y.n {
            return Err(DeaError::ColumnMismatch {
                what: "Yref",
                got: Yref.n,
                expected: self.Y.n,
            });
        }
        self.Xref = Some(Xref.clone());
        self.Yref = Some(Yref.clone());
        Ok(self)
    }

    /// Attaches display names to the evaluated units.
    pub fn with_names<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Result<Self, DeaError> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != self.X.m {
            return Err(DeaError::NameCountMismatch {
                got: names.len(),
                expected: self.X.m,
            });
        }
        self.names = Some(names);
        Ok(self)
    }

    /// Number of evaluated units.
    pub fn nunits(&self) -> usize {
        self.X.m
    }

    /// Number of inputs.
    pub fn ninputs(&self) -> usize {
        self.X.n
    }

    /// Number of outputs.
    pub fn noutputs(&self) -> usize {
        self.Y.n
    }

    /// Number of reference units.
    pub fn nref(&self) -> usize {
        self.Xref.as_ref().map_or(self.X.m, |x| x.m)
    }

    pub fn inputs(&self) -> &DenseMatrix<T> {
        &self.X
    }

    pub fn outputs(&self) -> &DenseMatrix<T> {
        &self.Y
    }

    /// Reference inputs: the explicit reference set if given, else the
    /// evaluation set.
    pub fn ref_inputs(&self) -> &DenseMatrix<T> {
        self.Xref.as_ref().unwrap_or(&self.X)
    }

    /// Reference outputs.
    pub fn ref_outputs(&self) -> &DenseMatrix<T> {
        self.Yref.as_ref().unwrap_or(&self.Y)
    }

    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// Checks that a per-unit matrix (prices, custom weights or directions)
    /// matches the shape of the side of the data it refers to.
    pub(crate) fn check_unit_matrix(
        &self,
        what: &'static str,
        matrix: &DenseMatrix<T>,
        ncols: usize,
    ) -> Result<(), DeaError> {
        if matrix.m != self.X.m {
            return Err(DeaError::RowMismatch {
                what,
                got: matrix.m,
                expected: self.X.m,
            });
        }
        if matrix.n != ncols {
            return Err(DeaError::ColumnMismatch {
                what,
                got: matrix.n,
                expected: ncols,
            });
        }
        Ok(())
    }
}
