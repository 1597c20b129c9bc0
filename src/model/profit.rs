#![allow(non_snake_case)]
use crate::algebra::*;
use crate::model::directional::solve_directional_unit;
use crate::model::lp::*;
use crate::model::results::{assemble_core, impl_dea_model, print_summary, UnitSolution};
use crate::model::weights::resolve_directions;
use crate::model::*;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------
// Profit efficiency (Nerlovian decomposition)
// ---------------

/// Options for the profit model.  Profit maximization is posed against the
/// convex hull of the observed technology, so returns to scale are always
/// variable.
#[derive(PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProfitOptions<T = f64> {
    /// input contraction direction of the normalization
    pub gx: DirectionScheme<T>,
    /// output expansion direction of the normalization
    pub gy: DirectionScheme<T>,
}

impl<T> Default for ProfitOptions<T> {
    fn default() -> Self {
        Self {
            gx: DirectionScheme::Monetary,
            gy: DirectionScheme::Monetary,
        }
    }
}

/// Result of a profit efficiency solve.
///
/// `efficiency` holds the Nerlovian profit inefficiency: the gap between
/// maximal and observed profit, normalized by the price value of the chosen
/// directions.  It is non-negative with zero for profit-efficient units, and
/// splits additively into [`technical`](ProfitModel::technical) and
/// [`allocative`](ProfitModel::allocative) components.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProfitModel<T: FloatT> {
    pub(crate) core: ResultCore<T>,
    technical: Vec<T>,
    allocative: Vec<T>,
    normalization: Vec<T>,
    maximal: Vec<T>,
}

impl_dea_model!(ProfitModel);

impl<T: FloatT> ProfitModel<T> {
    /// Directional distance inefficiency at the configured directions.
    pub fn technical(&self) -> &[T] {
        &self.technical
    }

    /// Residual inefficiency: profit inefficiency minus the technical part.
    pub fn allocative(&self) -> &[T] {
        &self.allocative
    }

    /// Per-unit normalization `p'Gy + w'Gx` applied to the profit gap.
    pub fn normalization(&self) -> &[T] {
        &self.normalization
    }

    /// Maximal attainable profit per unit.
    pub fn maximal(&self) -> &[T] {
        &self.maximal
    }
}

struct ProfitUnit<T> {
    solution: UnitSolution<T>,
    technical: T,
    allocative: T,
    normalization: T,
    maximal: T,
}

fn solve_unit<T, S>(
    data: &ProblemData<T>,
    unit: usize,
    W: &DenseMatrix<T>,
    P: &DenseMatrix<T>,
    gx: &DenseMatrix<T>,
    gy: &DenseMatrix<T>,
    tol: T,
    solver: &S,
) -> ProfitUnit<T>
where
    T: FloatT,
    S: LpSolver<T>,
{
    let Xref = data.ref_inputs();
    let Yref = data.ref_outputs();
    let x0 = data.inputs().row(unit);
    let y0 = data.outputs().row(unit);
    let (m, s, nref) = (data.ninputs(), data.noutputs(), data.nref());
    let w0 = W.row(unit);
    let p0 = P.row(unit);

    // max p'ye - w'xe over feasible production plans (xe, ye)
    let mut lp = LinearProgram::new(Objective::Maximize);
    let xe = lp.add_vars(m, |j| -w0[j], Bound::Free);
    let ye = lp.add_vars(s, |r| p0[r], Bound::Free);
    let lam = lp.add_vars(nref, |_| T::zero(), Bound::NonNegative);

    for j in 0..m {
        // sum_t Xref[t,j] lam_t <= xe_j
        let mut coeffs: Vec<(usize, T)> =
            (0..nref).map(|t| (lam + t, Xref.get(t, j))).collect();
        coeffs.push((xe + j, -T::one()));
        lp.add_row(coeffs, ConstraintOp::Le, T::zero());
    }
    for r in 0..s {
        // sum_t Yref[t,r] lam_t >= ye_r
        let mut coeffs: Vec<(usize, T)> =
            (0..nref).map(|t| (lam + t, Yref.get(t, r))).collect();
        coeffs.push((ye + r, -T::one()));
        lp.add_row(coeffs, ConstraintOp::Ge, T::zero());
    }
    let coeffs = (0..nref).map(|t| (lam + t, T::one())).collect();
    lp.add_row(coeffs, ConstraintOp::Eq, T::one());

    let sol = solver.solve(&lp);
    let mut warnings = Vec::new();
    if !sol.status.is_optimal() {
        warnings.push(SolveWarning {
            unit,
            stage: SolveStage::Efficiency,
            status: sol.status,
        });
    }

    let maximal = sol.objective;
    let observed = p0.dot(y0) - w0.dot(x0);
    let normalization = p0.dot(gy.row(unit)) + w0.dot(gx.row(unit));

    let (technical, tech_status) = {
        let (beta, _, status) = solve_directional_unit(
            data,
            unit,
            gx.row(unit),
            gy.row(unit),
            Rts::Vrs,
            Disposability::Strong,
            Disposability::Strong,
            solver,
        );
        (beta, status)
    };
    if !tech_status.is_optimal() {
        warnings.push(SolveWarning {
            unit,
            stage: SolveStage::Technical,
            status: tech_status,
        });
    }

    let eff;
    let allocative;
    if normalization <= tol {
        warnings.push(SolveWarning {
            unit,
            stage: SolveStage::Decomposition,
            status: LpStatus::NumericalError,
        });
        eff = T::nan();
        allocative = T::nan();
    } else {
        eff = (maximal - observed) / normalization;
        allocative = eff - technical;
    }

    ProfitUnit {
        solution: UnitSolution {
            eff,
            lambda: sol.x[lam..lam + nref].to_vec(),
            slack_x: None,
            slack_y: None,
            target_x: Some(sol.x[xe..xe + m].to_vec()),
            target_y: Some(sol.x[ye..ye + s].to_vec()),
            warnings,
        },
        technical,
        allocative,
        normalization,
        maximal,
    }
}

/// Nerlovian profit inefficiency of every unit, split into technical and
/// allocative components, given input prices `W` and output prices `P`
/// shaped like the observation matrices.
pub fn profit<T>(
    data: &ProblemData<T>,
    W: &DenseMatrix<T>,
    P: &DenseMatrix<T>,
    options: &ProfitOptions<T>,
    settings: &DeaSettings<T>,
) -> Result<ProfitModel<T>, DeaError>
where
    T: FloatT,
{
    settings.validate()?;
    data.check_unit_matrix("input prices", W, data.ninputs())?;
    data.check_unit_matrix("output prices", P, data.noutputs())?;
    let (gx, gy) = resolve_directions(data, &options.gx, &options.gy, Some((W, P)))?;

    let solver = ClarabelSolver::new(settings);
    let now = Instant::now();
    let units = batch::run_units(data.nunits(), settings.max_threads, |i| {
        solve_unit(data, i, W, P, &gx, &gy, settings.tol, &solver)
    });

    let mut solutions = Vec::with_capacity(units.len());
    let mut technical = Vec::with_capacity(units.len());
    let mut allocative = Vec::with_capacity(units.len());
    let mut normalization = Vec::with_capacity(units.len());
    let mut maximal = Vec::with_capacity(units.len());
    for u in units {
        solutions.push(u.solution);
        technical.push(u.technical);
        allocative.push(u.allocative);
        normalization.push(u.normalization);
        maximal.push(u.maximal);
    }

    let core = assemble_core(data, solutions, settings, now.elapsed().as_secs_f64());
    print_summary(
        "profit",
        &format!("Gx = {}, Gy = {}, VRS", options.gx.tag(), options.gy.tag()),
        &core,
        settings.verbose,
    );

    Ok(ProfitModel {
        core,
        technical,
        allocative,
        normalization,
        maximal,
    })
}
