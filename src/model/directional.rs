#![allow(non_snake_case)]
use crate::algebra::*;
use crate::model::lp::*;
use crate::model::results::{assemble_core, impl_dea_model, print_summary, UnitSolution};
use crate::model::weights::resolve_directions;
use crate::model::*;
use itertools::izip;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------
// Directional distance function
// ---------------

/// Options for the directional distance function model.
#[derive(PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DirectionalOptions<T = f64> {
    /// input contraction direction
    pub gx: DirectionScheme<T>,
    /// output expansion direction
    pub gy: DirectionScheme<T>,
    pub rts: Rts,
    pub dispos_x: Disposability,
    pub dispos_y: Disposability,
    /// run the second-stage slack maximization at the fixed distance
    pub slacks: bool,
}

impl<T> Default for DirectionalOptions<T> {
    fn default() -> Self {
        Self {
            gx: DirectionScheme::Observed,
            gy: DirectionScheme::Observed,
            rts: Rts::Crs,
            dispos_x: Disposability::Strong,
            dispos_y: Disposability::Strong,
            slacks: true,
        }
    }
}

/// Result of a directional distance function solve.  Scores are distances
/// along the chosen directions: non-negative against a reference technology
/// containing the unit, zero on the frontier.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DirectionalModel<T: FloatT> {
    pub(crate) core: ResultCore<T>,
    rts: Rts,
    gx: &'static str,
    gy: &'static str,
}

impl_dea_model!(DirectionalModel);

impl<T: FloatT> DirectionalModel<T> {
    pub fn rts(&self) -> Rts {
        self.rts
    }

    /// Tags of the direction schemes the model was built with.
    pub fn directions(&self) -> (&'static str, &'static str) {
        (self.gx, self.gy)
    }
}

#[inline]
fn envelopment_op(dispos: Disposability, strong: ConstraintOp) -> ConstraintOp {
    match dispos {
        Disposability::Strong => strong,
        Disposability::Weak => ConstraintOp::Eq,
    }
}

/// Solves one unit's directional program `max beta` subject to
/// `X lam <= x0 - beta gx0` and `Y lam >= y0 + beta gy0`.
///
/// Also used for the technical component of the profit decomposition.
pub(crate) fn solve_directional_unit<T, S>(
    data: &ProblemData<T>,
    unit: usize,
    gx0: &[T],
    gy0: &[T],
    rts: Rts,
    dispos_x: Disposability,
    dispos_y: Disposability,
    solver: &S,
) -> (T, Vec<T>, LpStatus)
where
    T: FloatT,
    S: LpSolver<T>,
{
    let Xref = data.ref_inputs();
    let Yref = data.ref_outputs();
    let x0 = data.inputs().row(unit);
    let y0 = data.outputs().row(unit);
    let nref = data.nref();

    let mut lp = LinearProgram::new(Objective::Maximize);
    let beta = lp.add_var(T::one(), Bound::Free);
    let lam = lp.add_vars(nref, |_| T::zero(), Bound::NonNegative);

    let x_op = envelopment_op(dispos_x, ConstraintOp::Le);
    let y_op = envelopment_op(dispos_y, ConstraintOp::Ge);

    for j in 0..data.ninputs() {
        // sum_t Xref[t,j] lam_t + beta gx0[j] <= x0[j]
        let mut coeffs: Vec<(usize, T)> =
            (0..nref).map(|t| (lam + t, Xref.get(t, j))).collect();
        coeffs.push((beta, gx0[j]));
        lp.add_row(coeffs, x_op, x0[j]);
    }
    for r in 0..data.noutputs() {
        // sum_t Yref[t,r] lam_t - beta gy0[r] >= y0[r]
        let mut coeffs: Vec<(usize, T)> =
            (0..nref).map(|t| (lam + t, Yref.get(t, r))).collect();
        coeffs.push((beta, -gy0[r]));
        lp.add_row(coeffs, y_op, y0[r]);
    }
    if rts == Rts::Vrs {
        let coeffs = (0..nref).map(|t| (lam + t, T::one())).collect();
        lp.add_row(coeffs, ConstraintOp::Eq, T::one());
    }

    let sol = solver.solve(&lp);
    (sol.x[beta], sol.x[lam..lam + nref].to_vec(), sol.status)
}

fn solve_directional_slacks<T, S>(
    data: &ProblemData<T>,
    unit: usize,
    target_x: &[T],
    target_y: &[T],
    rts: Rts,
    dispos_x: Disposability,
    dispos_y: Disposability,
    solver: &S,
) -> (Vec<T>, Vec<T>, Vec<T>, LpStatus)
where
    T: FloatT,
    S: LpSolver<T>,
{
    let Xref = data.ref_inputs();
    let Yref = data.ref_outputs();
    let (m, s, nref) = (data.ninputs(), data.noutputs(), data.nref());

    let x_bound = match dispos_x {
        Disposability::Strong => Bound::NonNegative,
        Disposability::Weak => Bound::Fixed(T::zero()),
    };
    let y_bound = match dispos_y {
        Disposability::Strong => Bound::NonNegative,
        Disposability::Weak => Bound::Fixed(T::zero()),
    };

    let mut lp = LinearProgram::new(Objective::Maximize);
    let sx = lp.add_vars(m, |_| T::one(), x_bound);
    let sy = lp.add_vars(s, |_| T::one(), y_bound);
    let lam = lp.add_vars(nref, |_| T::zero(), Bound::NonNegative);

    for j in 0..m {
        let mut coeffs: Vec<(usize, T)> =
            (0..nref).map(|t| (lam + t, Xref.get(t, j))).collect();
        coeffs.push((sx + j, T::one()));
        lp.add_row(coeffs, ConstraintOp::Eq, target_x[j]);
    }
    for r in 0..s {
        let mut coeffs: Vec<(usize, T)> =
            (0..nref).map(|t| (lam + t, Yref.get(t, r))).collect();
        coeffs.push((sy + r, -T::one()));
        lp.add_row(coeffs, ConstraintOp::Eq, target_y[r]);
    }
    if rts == Rts::Vrs {
        let coeffs = (0..nref).map(|t| (lam + t, T::one())).collect();
        lp.add_row(coeffs, ConstraintOp::Eq, T::one());
    }

    let sol = solver.solve(&lp);
    (
        sol.x[sx..sx + m].to_vec(),
        sol.x[sy..sy + s].to_vec(),
        sol.x[lam..lam + nref].to_vec(),
        sol.status,
    )
}

fn solve_unit<T, S>(
    data: &ProblemData<T>,
    unit: usize,
    gx: &DenseMatrix<T>,
    gy: &DenseMatrix<T>,
    options: &DirectionalOptions<T>,
    solver: &S,
) -> UnitSolution<T>
where
    T: FloatT,
    S: LpSolver<T>,
{
    let (m, s) = (data.ninputs(), data.noutputs());
    let x0 = data.inputs().row(unit);
    let y0 = data.outputs().row(unit);
    let gx0 = gx.row(unit);
    let gy0 = gy.row(unit);

    let (beta, mut lambda, status) = solve_directional_unit(
        data,
        unit,
        gx0,
        gy0,
        options.rts,
        options.dispos_x,
        options.dispos_y,
        solver,
    );

    let mut warnings = Vec::new();
    if !status.is_optimal() {
        warnings.push(SolveWarning {
            unit,
            stage: SolveStage::Efficiency,
            status,
        });
    }

    let mut target_x: Vec<T> = izip!(x0, gx0).map(|(&v, &g)| v - beta * g).collect();
    let mut target_y: Vec<T> = izip!(y0, gy0).map(|(&v, &g)| v + beta * g).collect();

    let mut slack_x = None;
    let mut slack_y = None;
    if options.slacks {
        if status.is_optimal() {
            let (sx, sy, lam2, status2) = solve_directional_slacks(
                data,
                unit,
                &target_x,
                &target_y,
                options.rts,
                options.dispos_x,
                options.dispos_y,
                solver,
            );
            if status2.is_optimal() {
                for (t, &v) in target_x.iter_mut().zip(&sx) {
                    *t = *t - v;
                }
                for (t, &v) in target_y.iter_mut().zip(&sy) {
                    *t = *t + v;
                }
                lambda = lam2;
            } else {
                warnings.push(SolveWarning {
                    unit,
                    stage: SolveStage::Slacks,
                    status: status2,
                });
            }
            slack_x = Some(sx);
            slack_y = Some(sy);
        } else {
            slack_x = Some(vec![T::zero(); m]);
            slack_y = Some(vec![T::zero(); s]);
        }
    }

    UnitSolution {
        eff: beta,
        lambda,
        slack_x,
        slack_y,
        target_x: Some(target_x),
        target_y: Some(target_y),
        warnings,
    }
}

/// Directional distance inefficiency of every unit along the resolved
/// directions: zero on the frontier, positive inside the technology.
pub fn directional<T>(
    data: &ProblemData<T>,
    options: &DirectionalOptions<T>,
    settings: &DeaSettings<T>,
) -> Result<DirectionalModel<T>, DeaError>
where
    T: FloatT,
{
    settings.validate()?;
    if matches!(options.gx, DirectionScheme::Monetary)
        || matches!(options.gy, DirectionScheme::Monetary)
    {
        return Err(DeaError::MonetaryDirectionsWithoutPrices);
    }
    let (gx, gy) = resolve_directions(data, &options.gx, &options.gy, None)?;

    let solver = ClarabelSolver::new(settings);
    let now = Instant::now();
    let units = batch::run_units(data.nunits(), settings.max_threads, |i| {
        solve_unit(data, i, &gx, &gy, options, &solver)
    });
    let core = assemble_core(data, units, settings, now.elapsed().as_secs_f64());
    print_summary(
        "directional",
        &format!(
            "Gx = {}, Gy = {}, {}",
            options.gx.tag(),
            options.gy.tag(),
            options.rts
        ),
        &core,
        settings.verbose,
    );

    Ok(DirectionalModel {
        core,
        rts: options.rts,
        gx: options.gx.tag(),
        gy: options.gy.tag(),
    })
}
