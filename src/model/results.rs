use crate::algebra::*;
use crate::model::{DeaSettings, LpStatus, ProblemData};
use enum_dispatch::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::additive::AdditiveModel;
use crate::model::cost::CostModel;
use crate::model::directional::DirectionalModel;
use crate::model::gdf::GeneralizedModel;
use crate::model::profit::ProfitModel;
use crate::model::radial::RadialModel;
use crate::model::revenue::RevenueModel;

// ---------------
// Per-unit solver warnings
// ---------------

/// Which solve of a unit's pipeline produced a non-optimal status.
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolveStage {
    /// The efficiency program itself.
    Efficiency,
    /// The second-stage slack maximization.
    Slacks,
    /// An auxiliary radial or directional sub-solve used by a decomposition.
    Technical,
    /// A degenerate decomposition (for example a zero normalizer).
    Decomposition,
}

/// A non-fatal, per-unit condition raised during the batch solve.
///
/// The affected unit's rows still carry whatever values the solver returned,
/// so infeasible or unbounded programs can be inspected; it is up to the
/// caller to decide whether a warning is fatal.
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveWarning {
    /// evaluated unit (row index)
    pub unit: usize,
    /// pipeline stage that produced the status
    pub stage: SolveStage,
    /// the offending termination status
    pub status: LpStatus,
}

impl std::fmt::Display for SolveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "unit {}: {:?} stage terminated with {}",
            self.unit, self.stage, self.status
        )
    }
}

// ---------------
// Shared result payload
// ---------------

/// Result fields common to every model family.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResultCore<T> {
    pub nunits: usize,
    pub ninputs: usize,
    pub noutputs: usize,
    /// one efficiency (or inefficiency) score per evaluated unit
    pub efficiency: Vec<T>,
    /// sparse intensity weights over the reference set, one row per unit
    pub peers: CsrMatrix<T>,
    pub slacks_x: Option<DenseMatrix<T>>,
    pub slacks_y: Option<DenseMatrix<T>>,
    pub targets_x: Option<DenseMatrix<T>>,
    pub targets_y: Option<DenseMatrix<T>>,
    pub names: Option<Vec<String>>,
    pub warnings: Vec<SolveWarning>,
    /// wall-clock batch solve time in seconds
    pub solve_time: f64,
}

/// Common accessors over all model families.
///
/// The per-family result types share this behavior through a tagged enum
/// ([`Model`]), so heterogeneous collections of results dispatch on the
/// variant rather than on any inheritance structure.
#[enum_dispatch]
pub trait DeaModel<T: FloatT> {
    /// Number of evaluated units.
    fn nunits(&self) -> usize;
    /// Number of inputs.
    fn ninputs(&self) -> usize;
    /// Number of outputs.
    fn noutputs(&self) -> usize;
    /// Efficiency scores, one per unit.  The convention is family specific:
    /// radial input-oriented and generalized scores are `<= 1`, radial
    /// output-oriented scores are `>= 1`, additive/directional scores are
    /// non-negative inefficiencies, and economic efficiencies are ratios in
    /// `(0, 1]`, with profit reporting a non-negative normalized
    /// inefficiency.
    fn efficiency(&self) -> &[T];
    /// Sparse peer matrix (units by reference units).
    fn peers(&self) -> &CsrMatrix<T>;
    /// Input slacks, if the family produces them.
    fn slacks_x(&self) -> Option<&DenseMatrix<T>>;
    /// Output slacks, if the family produces them.
    fn slacks_y(&self) -> Option<&DenseMatrix<T>>;
    /// Projected input targets, if the family produces them.
    fn targets_x(&self) -> Option<&DenseMatrix<T>>;
    /// Projected output targets, if the family produces them.
    fn targets_y(&self) -> Option<&DenseMatrix<T>>;
    /// Unit names, when supplied with the data.
    fn names(&self) -> Option<&[String]>;
    /// Non-fatal per-unit solver conditions.
    fn warnings(&self) -> &[SolveWarning];
    /// Wall-clock batch solve time in seconds.
    fn solve_time(&self) -> f64;
}

/// Tagged union over the per-family result types.
#[enum_dispatch(DeaModel<T>)]
#[derive(Debug, Clone)]
pub enum Model<T: FloatT> {
    Radial(RadialModel<T>),
    Additive(AdditiveModel<T>),
    Directional(DirectionalModel<T>),
    Generalized(GeneralizedModel<T>),
    Profit(ProfitModel<T>),
    Revenue(RevenueModel<T>),
    Cost(CostModel<T>),
}

macro_rules! impl_dea_model {
    ($model:ident) => {
        impl<T: crate::algebra::FloatT> crate::model::DeaModel<T> for $model<T> {
            fn nunits(&self) -> usize {
                self.core.nunits
            }
            fn ninputs(&self) -> usize {
                self.core.ninputs
            }
            fn noutputs(&self) -> usize {
                self.core.noutputs
            }
            fn efficiency(&self) -> &[T] {
                &self.core.efficiency
            }
            fn peers(&self) -> &crate::algebra::CsrMatrix<T> {
                &self.core.peers
            }
            fn slacks_x(&self) -> Option<&crate::algebra::DenseMatrix<T>> {
                self.core.slacks_x.as_ref()
            }
            fn slacks_y(&self) -> Option<&crate::algebra::DenseMatrix<T>> {
                self.core.slacks_y.as_ref()
            }
            fn targets_x(&self) -> Option<&crate::algebra::DenseMatrix<T>> {
                self.core.targets_x.as_ref()
            }
            fn targets_y(&self) -> Option<&crate::algebra::DenseMatrix<T>> {
                self.core.targets_y.as_ref()
            }
            fn names(&self) -> Option<&[String]> {
                self.core.names.as_deref()
            }
            fn warnings(&self) -> &[crate::model::SolveWarning] {
                &self.core.warnings
            }
            fn solve_time(&self) -> f64 {
                self.core.solve_time
            }
        }
    };
}
pub(crate) use impl_dea_model;

// ---------------
// Batch assembly
// ---------------

/// One unit's contribution to the result, returned by each worker task and
/// scattered into the shared structures after the join.
pub(crate) struct UnitSolution<T> {
    pub eff: T,
    pub lambda: Vec<T>,
    pub slack_x: Option<Vec<T>>,
    pub slack_y: Option<Vec<T>>,
    pub target_x: Option<Vec<T>>,
    pub target_y: Option<Vec<T>>,
    pub warnings: Vec<SolveWarning>,
}

/// Clamps interior-point noise: values in `(-tol, 0)` become exact zeros.
fn clamp_noise<T: FloatT>(v: T, tol: T) -> T {
    if v < T::zero() && v > -tol {
        T::zero()
    } else {
        v
    }
}

fn gather_matrix<T: FloatT>(
    units: &[UnitSolution<T>],
    field: impl Fn(&UnitSolution<T>) -> Option<&Vec<T>>,
    ncols: usize,
    tol: T,
) -> Option<DenseMatrix<T>> {
    field(units.first()?)?;
    let mut out = DenseMatrix::zeros(units.len(), ncols);
    for (i, unit) in units.iter().enumerate() {
        if let Some(row) = field(unit) {
            for (j, &v) in row.iter().enumerate() {
                out.set(i, j, clamp_noise(v, tol));
            }
        }
    }
    Some(out)
}

/// Merges the per-unit records into the shared result payload.
pub(crate) fn assemble_core<T>(
    data: &ProblemData<T>,
    units: Vec<UnitSolution<T>>,
    settings: &DeaSettings<T>,
    solve_time: f64,
) -> ResultCore<T>
where
    T: FloatT,
{
    let (m, s) = (data.ninputs(), data.noutputs());

    let efficiency: Vec<T> = units.iter().map(|u| u.eff).collect();
    let lambda_rows: Vec<Vec<T>> = units.iter().map(|u| u.lambda.clone()).collect();
    let peers = CsrMatrix::from_dense_rows(&lambda_rows, data.nref(), settings.peer_tol);

    let slacks_x = gather_matrix(&units, |u| u.slack_x.as_ref(), m, settings.tol);
    let slacks_y = gather_matrix(&units, |u| u.slack_y.as_ref(), s, settings.tol);
    let targets_x = gather_matrix(&units, |u| u.target_x.as_ref(), m, settings.tol);
    let targets_y = gather_matrix(&units, |u| u.target_y.as_ref(), s, settings.tol);

    let mut warnings = Vec::new();
    for unit in &units {
        warnings.extend_from_slice(&unit.warnings);
    }

    ResultCore {
        nunits: data.nunits(),
        ninputs: m,
        noutputs: s,
        efficiency,
        peers,
        slacks_x,
        slacks_y,
        targets_x,
        targets_y,
        names: data.names().map(|n| n.to_vec()),
        warnings,
        solve_time,
    }
}

/// Writes a one-block solve summary to stdout when `verbose` is set.
pub(crate) fn print_summary<T>(family: &str, detail: &str, core: &ResultCore<T>, verbose: bool)
where
    T: FloatT,
{
    if !verbose {
        return;
    }
    println!("\nenvelo v{} ({} model, {})", crate::VERSION, family, detail);
    println!("  units     = {}", core.nunits);
    println!("  inputs    = {}", core.ninputs);
    println!("  outputs   = {}", core.noutputs);
    println!("  nnz(peer) = {}", core.peers.nnz());
    println!("  warnings  = {}", core.warnings.len());
    println!("  solve time = {:.6}s", core.solve_time);
}
