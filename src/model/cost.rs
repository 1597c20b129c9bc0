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
// Cost efficiency
// ---------------

/// Options for the cost model.
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CostOptions {
    pub rts: Rts,
    /// disposability of the output side; inputs are chosen by the program
    pub dispos_y: Disposability,
}

impl Default for CostOptions {
    fn default() -> Self {
        Self {
            rts: Rts::Vrs,
            dispos_y: Disposability::Strong,
        }
    }
}

/// Result of a cost efficiency solve.
///
/// `efficiency` is the ratio of minimal to observed cost, in `(0, 1]`, and
/// factors multiplicatively into [`technical`](CostModel::technical) x
/// [`allocative`](CostModel::allocative).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CostModel<T: FloatT> {
    pub(crate) core: ResultCore<T>,
    technical: Vec<T>,
    allocative: Vec<T>,
    minimal: Vec<T>,
}

impl_dea_model!(CostModel);

impl<T: FloatT> CostModel<T> {
    /// Input-oriented radial technical efficiency, in `(0, 1]`.
    pub fn technical(&self) -> &[T] {
        &self.technical
    }

    /// Allocative component: cost efficiency over technical efficiency.
    pub fn allocative(&self) -> &[T] {
        &self.allocative
    }

    /// Minimal attainable cost per unit.
    pub fn minimal(&self) -> &[T] {
        &self.minimal
    }
}

struct CostUnit<T> {
    solution: UnitSolution<T>,
    technical: T,
    allocative: T,
    minimal: T,
}

fn solve_unit<T, S>(
    data: &ProblemData<T>,
    unit: usize,
    W: &DenseMatrix<T>,
    options: &CostOptions,
    tol: T,
    solver: &S,
) -> CostUnit<T>
where
    T: FloatT,
    S: LpSolver<T>,
{
    let Xref = data.ref_inputs();
    let Yref = data.ref_outputs();
    let x0 = data.inputs().row(unit);
    let y0 = data.outputs().row(unit);
    let (m, nref) = (data.ninputs(), data.nref());
    let w0 = W.row(unit);

    let y_op = match options.dispos_y {
        Disposability::Strong => ConstraintOp::Ge,
        Disposability::Weak => ConstraintOp::Eq,
    };

    // min w'xe over input plans that still produce the observed outputs;
    // the non-negativity bound keeps zero-price inputs on a bounded face
    let mut lp = LinearProgram::new(Objective::Minimize);
    let xe = lp.add_vars(m, |j| w0[j], Bound::NonNegative);
    let lam = lp.add_vars(nref, |_| T::zero(), Bound::NonNegative);

    for j in 0..m {
        let mut coeffs: Vec<(usize, T)> =
            (0..nref).map(|t| (lam + t, Xref.get(t, j))).collect();
        coeffs.push((xe + j, -T::one()));
        lp.add_row(coeffs, ConstraintOp::Le, T::zero());
    }
    for r in 0..data.noutputs() {
        let coeffs = (0..nref).map(|t| (lam + t, Yref.get(t, r))).collect();
        lp.add_row(coeffs, y_op, y0[r]);
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

    let minimal = sol.objective;
    let observed = w0.dot(x0);

    let (theta, _, tech_status) = solve_radial_unit(
        data,
        unit,
        Orientation::Input,
        options.rts,
        Disposability::Strong,
        options.dispos_y,
        solver,
    );
    if !tech_status.is_optimal() {
        warnings.push(SolveWarning {
            unit,
            stage: SolveStage::Technical,
            status: tech_status,
        });
    }
    let technical = theta;

    let eff;
    let allocative;
    if observed <= tol {
        warnings.push(SolveWarning {
            unit,
            stage: SolveStage::Decomposition,
            status: LpStatus::NumericalError,
        });
        eff = T::nan();
        allocative = T::nan();
    } else {
        eff = minimal / observed;
        allocative = eff / technical;
    }

    CostUnit {
        solution: UnitSolution {
            eff,
            lambda: sol.x[lam..lam + nref].to_vec(),
            slack_x: None,
            slack_y: None,
            target_x: Some(sol.x[xe..xe + m].to_vec()),
            target_y: Some(y0.to_vec()),
            warnings,
        },
        technical,
        allocative,
        minimal,
    }
}

/// Cost efficiency of every unit given input prices `W` shaped like the
/// input matrix, decomposed into technical and allocative components.
pub fn cost<T>(
    data: &ProblemData<T>,
    W: &DenseMatrix<T>,
    options: &CostOptions,
    settings: &DeaSettings<T>,
) -> Result<CostModel<T>, DeaError>
where
    T: FloatT,
{
    settings.validate()?;
    data.check_unit_matrix("input prices", W, data.ninputs())?;

    let solver = ClarabelSolver::new(settings);
    let now = Instant::now();
    let units = batch::run_units(data.nunits(), settings.max_threads, |i| {
        solve_unit(data, i, W, options, settings.tol, &solver)
    });

    let mut solutions = Vec::with_capacity(units.len());
    let mut technical = Vec::with_capacity(units.len());
    let mut allocative = Vec::with_capacity(units.len());
    let mut minimal = Vec::with_capacity(units.len());
    for u in units {
        solutions.push(u.solution);
        technical.push(u.technical);
        allocative.push(u.allocative);
        minimal.push(u.minimal);
    }

    let core = assemble_core(data, solutions, settings, now.elapsed().as_secs_f64());
    print_summary("cost", &format!("{}", options.rts), &core, settings.verbose);

    Ok(CostModel {
        core,
        technical,
        allocative,
        minimal,
    })
}
