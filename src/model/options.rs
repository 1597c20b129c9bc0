use crate::algebra::DenseMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Side of the technology a model contracts or expands.
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// Contract inputs holding outputs fixed.
    Input,
    /// Expand outputs holding inputs fixed.
    Output,
    /// Adjust both sides simultaneously.
    Graph,
}

/// Returns-to-scale assumption of the reference technology.
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rts {
    /// Constant returns to scale: intensity weights are unrestricted in sum.
    Crs,
    /// Variable returns to scale: intensity weights sum to one.
    Vrs,
}

/// Disposability of one side of the technology.
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Disposability {
    /// Free disposal: envelopment constraints are inequalities.
    Strong,
    /// Disposal only along the frontier: envelopment constraints are
    /// equalities and the corresponding slacks are fixed to zero.
    Weak,
}

/// Weighting scheme for the weighted additive model.
///
/// The statistical schemes (`Normalized`, `Ram`, `Bam`) map any weight that
/// evaluates to a non-finite value (for example on a zero-range column) to
/// zero.  This keeps degenerate columns feasible but silently removes them
/// from the objective; callers with such data may prefer `Custom` weights.
#[derive(PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AdditiveScheme<T = f64> {
    /// Unit weights on every slack.
    Ones,
    /// Measure of inefficiency proportions: weights `1/x` and `1/y`.
    Mip,
    /// Weights are reciprocals of each column's sample standard deviation.
    Normalized,
    /// Range adjusted measure: `1/(k (max - min))` per column, where `k`
    /// counts the dimensions active under the chosen orientation.
    Ram,
    /// Bounded adjusted measure: per-unit weights `1/(k (x - min))` for
    /// inputs and `1/(k (max - y))` for outputs.  Under constant returns to
    /// scale this scheme adds bounds keeping the projection between the
    /// sample extrema, without which the program is unbounded.
    Bam,
    /// Caller-supplied weight matrices, shaped like the observation data.
    Custom {
        wx: DenseMatrix<T>,
        wy: DenseMatrix<T>,
    },
}

/// Direction vectors for one side of a directional distance function.
#[derive(PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DirectionScheme<T = f64> {
    /// No movement on this side.
    Zeros,
    /// Unit direction.
    Ones,
    /// Each unit moves along its own observed quantities.
    Observed,
    /// All units move along the sample column means.
    Mean,
    /// Monetary calibration: a constant `1/(sum of prices)` per unit across
    /// all columns, so the inefficiency measure is in money units.  Only
    /// meaningful for the profit model, which supplies the prices.
    Monetary,
    /// Caller-supplied direction matrix, shaped like the observation data.
    Custom(DenseMatrix<T>),
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::fmt::Display for Rts {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Rts::Crs => write!(f, "CRS"),
            Rts::Vrs => write!(f, "VRS"),
        }
    }
}

impl std::fmt::Display for Disposability {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl<T> DirectionScheme<T> {
    /// Short tag for error messages and the verbose report.
    pub(crate) fn tag(&self) -> &'static str {
        match self {
            DirectionScheme::Zeros => "Zeros",
            DirectionScheme::Ones => "Ones",
            DirectionScheme::Observed => "Observed",
            DirectionScheme::Mean => "Mean",
            DirectionScheme::Monetary => "Monetary",
            DirectionScheme::Custom(_) => "Custom",
        }
    }
}

impl<T> AdditiveScheme<T> {
    pub(crate) fn tag(&self) -> &'static str {
        match self {
            AdditiveScheme::Ones => "Ones",
            AdditiveScheme::Mip => "MIP",
            AdditiveScheme::Normalized => "Normalized",
            AdditiveScheme::Ram => "RAM",
            AdditiveScheme::Bam => "BAM",
            AdditiveScheme::Custom { .. } => "Custom",
        }
    }
}
