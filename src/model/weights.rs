#![allow(non_snake_case)]
use crate::algebra::*;
use crate::model::{
    AdditiveScheme, DeaError, DirectionScheme, Disposability, Orientation, ProblemData,
};

// ---------------
// Weight resolution for the additive model
// ---------------

/// Per-unit slack weights for both sides, after scheme evaluation,
/// orientation gating and weak-disposal zeroing.
pub(crate) struct ResolvedWeights<T> {
    pub wx: DenseMatrix<T>,
    pub wy: DenseMatrix<T>,
}

/// Count of slack dimensions active under the orientation; the RAM and BAM
/// normalizers divide by it.
fn active_dims<T: FloatT>(orientation: Orientation, m: usize, s: usize) -> T {
    let k = match orientation {
        Orientation::Graph => m + s,
        Orientation::Input => m,
        Orientation::Output => s,
    };
    T::from_usize(k).unwrap_or_else(T::one)
}

/// A weight of `1/0` or worse is mapped to zero: the slack stays feasible
/// but drops out of the objective.
#[inline]
fn finite_or_zero<T: FloatT>(w: T) -> T {
    if w.is_finite() {
        w
    } else {
        T::zero()
    }
}

fn elementwise_recip<T: FloatT>(src: &DenseMatrix<T>) -> DenseMatrix<T> {
    let data = src
        .data
        .iter()
        .map(|&v| finite_or_zero(v.recip()))
        .collect();
    DenseMatrix::new(src.m, src.n, data)
}

fn columnwise<T: FloatT>(m: usize, n: usize, mut col: impl FnMut(usize) -> T) -> DenseMatrix<T> {
    let mut out = DenseMatrix::zeros(m, n);
    for j in 0..n {
        let w = finite_or_zero(col(j));
        for i in 0..m {
            out.set(i, j, w);
        }
    }
    out
}

pub(crate) fn resolve_additive_weights<T>(
    data: &ProblemData<T>,
    scheme: &AdditiveScheme<T>,
    orientation: Orientation,
    dispos_x: Disposability,
    dispos_y: Disposability,
) -> Result<ResolvedWeights<T>, DeaError>
where
    T: FloatT,
{
    let X = data.inputs();
    let Y = data.outputs();
    let (n, m, s) = (data.nunits(), data.ninputs(), data.noutputs());
    let k = active_dims::<T>(orientation, m, s);

    let (mut wx, mut wy) = match scheme {
        AdditiveScheme::Ones => (
            DenseMatrix::new(n, m, vec![T::one(); n * m]),
            DenseMatrix::new(n, s, vec![T::one(); n * s]),
        ),
        AdditiveScheme::Mip => (elementwise_recip(X), elementwise_recip(Y)),
        AdditiveScheme::Normalized => (
            columnwise(n, m, |j| X.col_std(j).recip()),
            columnwise(n, s, |j| Y.col_std(j).recip()),
        ),
        AdditiveScheme::Ram => (
            columnwise(n, m, |j| (k * (X.col_max(j) - X.col_min(j))).recip()),
            columnwise(n, s, |j| (k * (Y.col_max(j) - Y.col_min(j))).recip()),
        ),
        AdditiveScheme::Bam => {
            let mut wx = DenseMatrix::zeros(n, m);
            let mut wy = DenseMatrix::zeros(n, s);
            for j in 0..m {
                let lo = X.col_min(j);
                for i in 0..n {
                    wx.set(i, j, finite_or_zero((k * (X.get(i, j) - lo)).recip()));
                }
            }
            for j in 0..s {
                let hi = Y.col_max(j);
                for i in 0..n {
                    wy.set(i, j, finite_or_zero((k * (hi - Y.get(i, j))).recip()));
                }
            }
            (wx, wy)
        }
        AdditiveScheme::Custom { wx, wy } => {
            data.check_unit_matrix("input weights", wx, m)?;
            data.check_unit_matrix("output weights", wy, s)?;
            (wx.clone(), wy.clone())
        }
    };

    // the side an orientation leaves alone keeps unit weights; its slacks
    // stay feasible but are not part of the objective
    match orientation {
        Orientation::Input => wy = DenseMatrix::new(n, s, vec![T::one(); n * s]),
        Orientation::Output => wx = DenseMatrix::new(n, m, vec![T::one(); n * m]),
        Orientation::Graph => {}
    }

    // weak disposal is structural: zero weights here, and the builder pins
    // the matching slacks to zero
    if dispos_x == Disposability::Weak {
        wx = DenseMatrix::zeros(n, m);
    }
    if dispos_y == Disposability::Weak {
        wy = DenseMatrix::zeros(n, s);
    }

    Ok(ResolvedWeights { wx, wy })
}

// ---------------
// Direction resolution for directional models
// ---------------

/// Resolves one side's named direction scheme to a dense matrix.
fn resolve_side<T>(
    data: &ProblemData<T>,
    scheme: &DirectionScheme<T>,
    observed: &DenseMatrix<T>,
    what: &'static str,
    monetary: Option<&[T]>,
) -> Result<DenseMatrix<T>, DeaError>
where
    T: FloatT,
{
    let (n, cols) = (observed.m, observed.n);
    let g = match scheme {
        DirectionScheme::Zeros => DenseMatrix::zeros(n, cols),
        DirectionScheme::Ones => DenseMatrix::new(n, cols, vec![T::one(); n * cols]),
        DirectionScheme::Observed => observed.clone(),
        DirectionScheme::Mean => columnwise(n, cols, |j| observed.col_mean(j)),
        DirectionScheme::Monetary => {
            let scale = monetary.ok_or(DeaError::MonetaryDirectionsWithoutPrices)?;
            let mut g = DenseMatrix::zeros(n, cols);
            for i in 0..n {
                for j in 0..cols {
                    g.set(i, j, scale[i]);
                }
            }
            g
        }
        DirectionScheme::Custom(g) => {
            data.check_unit_matrix(what, g, cols)?;
            g.clone()
        }
    };
    Ok(g)
}

/// Resolves both direction schemes against the data, with optional price
/// matrices `(W, P)` enabling the monetary calibration.
pub(crate) fn resolve_directions<T>(
    data: &ProblemData<T>,
    gx: &DirectionScheme<T>,
    gy: &DirectionScheme<T>,
    prices: Option<(&DenseMatrix<T>, &DenseMatrix<T>)>,
) -> Result<(DenseMatrix<T>, DenseMatrix<T>), DeaError>
where
    T: FloatT,
{
    // the monetary scale is 1/(total price mass) per unit, shared by both
    // sides so that p'Gy + w'Gx sums to one money unit
    let monetary: Option<Vec<T>> = prices.map(|(W, P)| {
        (0..data.nunits())
            .map(|i| finite_or_zero((W.row(i).sum() + P.row(i).sum()).recip()))
            .collect()
    });

    let gx = resolve_side(data, gx, data.inputs(), "input directions", monetary.as_deref())?;
    let gy = resolve_side(data, gy, data.outputs(), "output directions", monetary.as_deref())?;

    let all_zero =
        |g: &DenseMatrix<T>| g.data.iter().all(|&v| v == T::zero());
    if all_zero(&gx) && all_zero(&gy) {
        return Err(DeaError::InvalidDirections);
    }

    Ok((gx, gy))
}

// ---------------
// tests
// ---------------
