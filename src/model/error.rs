use thiserror::Error;

/// Error type returned by model construction.
///
/// Shape and configuration problems abort the whole model-construction call
/// before any linear program is built.  Per-unit solver non-optimality is
/// *not* an error: it is attached to the result as a
/// [`SolveWarning`](crate::model::SolveWarning).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeaError {
    /// Evaluation input and output matrices disagree on the unit count.
    #[error("number of units in X ({nx}) and Y ({ny}) differ")]
    UnitCountMismatch { nx: usize, ny: usize },

    /// Reference input and output matrices disagree on the unit count.
    #[error("number of units in Xref ({nx}) and Yref ({ny}) differ")]
    ReferenceCountMismatch { nx: usize, ny: usize },

    /// A matrix has the wrong number of columns for the dimension it spans.
    #[error("{what} has {got} columns, expected {expected}")]
    ColumnMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    /// A per-unit matrix (weights, directions, prices) has the wrong number
    /// of rows.
    #[error("{what} has {got} rows, expected {expected}")]
    RowMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    /// The unit name list length disagrees with the unit count.
    #[error("{got} unit names supplied for {expected} units")]
    NameCountMismatch { got: usize, expected: usize },

    /// The data set is empty in some dimension.
    #[error("observation data must have at least one unit, input and output")]
    EmptyData,

    /// An orientation not supported by the requested model family.
    #[error("orientation {0} is not supported by this model family")]
    UnsupportedOrientation(crate::model::Orientation),

    /// Weak disposability on the side the measure contracts or expands is
    /// economically undefined.
    #[error("weak {side} disposability is undefined under {orientation} orientation")]
    WeakDisposalOnOrientedSide {
        side: &'static str,
        orientation: crate::model::Orientation,
    },

    /// Directional model with zero directions on both sides.
    #[error("directions are zero on both sides; the measure is undefined")]
    InvalidDirections,

    /// Monetary directions outside the profit model.
    #[error("monetary directions require price data and are only available for the profit model")]
    MonetaryDirectionsWithoutPrices,

    /// Generalized distance function parameter out of range.
    #[error("generalized distance parameter alpha = {0} is outside [0, 1]")]
    AlphaOutOfRange(f64),

    /// A settings field failed validation.
    #[error("bad value for settings field '{0}'")]
    BadSettingsValue(&'static str),
}
