#![allow(non_snake_case)]
use crate::algebra::*;
use crate::model::lp::*;
use crate::model::radial::solve_radial_unit;
use crate::model::results::{assemble_core, impl_dea_model, print_summary, UnitSolution};
use crate::model::*;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------
// Revenue efficiency
// ---------------

/// Options for the revenue model.
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RevenueOptions {
    pub rts: Rts,
    /// disposability of the input side; outputs are chosen by the program
    pub dispos_x: Disposability,
}

impl Default for RevenueOptions {
    fn default() -> Self {
        Self {
            rts: Rts::Vrs,
            dispos_x: Disposability::Strong,
        }
    }
}

/// Result of a revenue efficiency solve.
///
/// `efficiency` is the ratio of observed to maximal attainable revenue, in
/// `(0, 1]`, and factors multiplicatively into
/// [`technical`](RevenueModel::technical) x
/// [`allocative`](RevenueModel::allocative).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RevenueModel<T: FloatT> {
    pub(crate) core: ResultCore<T>,
    technical: Vec<T>,
    allocative: Vec<T>,
    maximal: Vec<T>,
}

impl_dea_model!(RevenueModel);

impl<T: FloatT> RevenueModel<T> {
    /// Output-oriented technical efficiency (reciprocal of the radial
    /// expansion factor), in `(0, 1]`.
    pub fn technical(&self) -> &[T] {
        &self.technical
    }

    /// Allocative component: revenue efficiency over technical efficiency.
    pub fn allocative(&self) -> &[T] {
        &self.allocative
    }

    /// Maximal attainable revenue per unit.
    pub fn maximal(&self) -> &[T] {
        &self.maximal
    }
}

struct RevenueUnit<T> {
    solution: UnitSolution<T>,
    technical: T,
    allocative: T,
    maximal: T,
}

fn solve_unit<T, S>(
    data: &ProblemData<T>,
    unit: usize,
    P: &DenseMatrix<T>,
    options: &RevenueOptions,
    tol: T,
    solver: &S,
) -> RevenueUnit<T>
where
    T: FloatT,
    S: LpSolver<T>,
{
    let Xref = data.ref_inputs();
    let Yref = data.ref_outputs();
    let x0 = data.inputs().row(unit);
    let y0 = data.outputs().row(unit);
    let (s, nref) = (data.noutputs(), data.nref());
    let p0 = P.row(unit);

    let x_op = match options.dispos_x {
        Disposability::Strong => ConstraintOp::Le,
        Disposability::Weak => ConstraintOp::Eq,
    };

    // max p'ye over output plans attainable with the observed inputs;
    // the non-negativity bound keeps zero-price outputs on a bounded face
    let mut lp = LinearProgram::new(Objective::Maximize);
    let ye = lp.add_vars(s, |r| p0[r], Bound::NonNegative);
    let lam = lp.add_vars(nref, |_| T::zero(), Bound::NonNegative);

    for j in 0..data.ninputs() {
        let coeffs = (0..nref).map(|t| (lam + t, Xref.get(t, j))).collect();
        lp.add_row(coeffs, x_op, x0[j]);
    }
    for r in 0..s {
        let mut coeffs: Vec<(usize, T)> =
            (0..nref).map(|t| (lam + t, Yref.get(t, r))).collect();
        coeffs.push((ye + r, -T::one()));
        lp.add_row(coeffs, ConstraintOp::Ge, T::zero());
    }
    if options.rts == Rts::Vrs {
        let coeffs = (0..nref).map(|t| (lam + t, T::one())).collect();
        lp.add_row(coeffs, ConstraintOp::Eq, T::one());
    }

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
    let observed = p0.dot(y0);

    let (phi, _, tech_status) = solve_radial_unit(
        data,
        unit,
        Orientation::Output,
        options.rts,
        options.dispos_x,
        Disposability::Strong,
        solver,
    );
    if !tech_status.is_optimal() {
        warnings.push(SolveWarning {
            unit,
            stage: SolveStage::Technical,
            status: tech_status,
        });
    }
    let technical = phi.recip();

    let eff;
    let allocative;
    if maximal <= tol {
        warnings.push(SolveWarning {
            unit,
            stage: SolveStage::Decomposition,
            status: LpStatus::NumericalError,
        });
        eff = T::nan();
        allocative = T::nan();
    } else {
        eff = observed / maximal;
        allocative = eff / technical;
    }

    RevenueUnit {
        solution: UnitSolution {
            eff,
            lambda: sol.x[lam..lam + nref].to_vec(),
            slack_x: None,
            slack_y: None,
            target_x: Some(x0.to_vec()),
            target_y: Some(sol.x[ye..ye + s].to_vec()),
            warnings,
        },
        technical,
        allocative,
        maximal,
    }
}

/// Revenue efficiency of every unit given output prices `P` shaped like the
/// output matrix, decomposed into technical and allocative components.
pub fn revenue<T>(
    data: &ProblemData<T>,
    P: &DenseMatrix<T>,
    options: &RevenueOptions,
    settings: &DeaSettings<T>,
) -> Result<RevenueModel<T>, DeaError>
where
    T: FloatT,
{
    settings.validate()?;
    data.check_unit_matrix("output prices", P, data.noutputs())?;

    let solver = ClarabelSolver::new(settings);
    let now = Instant::now();
    let units = batch::run_units(data.nunits(), settings.max_threads, |i| {
        solve_unit(data, i, P, options, settings.tol, &solver)
    });

    let mut solutions = Vec::with_capacity(units.len());
    let mut technical = Vec::with_capacity(units.len());
    let mut allocative = Vec::with_capacity(units.len());
    let mut maximal = Vec::with_capacity(units.len());
    for u in units {
        solutions.push(u.solution);
        technical.push(u.technical);
        allocative.push(u.allocative);
        maximal.push(u.maximal);
    }

    let core = assemble_core(data, solutions, settings, now.elapsed().as_secs_f64());
    print_summary("revenue", &format!("{}", options.rts), &core, settings.verbose);

    Ok(RevenueModel {
        core,
        technical,
        allocative,
        maximal,
    })
}
