#![allow(non_snake_case)]
use crate::algebra::*;
use crate::model::lp::*;
use crate::model::radial::{check_oriented_disposability, solve_radial_unit};
use crate::model::results::{assemble_core, impl_dea_model, print_summary, UnitSolution};
use crate::model::*;
use num_traits::ToPrimitive;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------
// Generalized distance function
// ---------------
//
// The score delta solves
//
//   min delta   s.t.   X lam <= delta^alpha x0,
//                      Y lam >= y0 / delta^(1-alpha)
//
// which interpolates between the oriented radial measures: alpha = 1 is the
// input-oriented program itself, and alpha = 0 contracts the reciprocal of
// the output-oriented expansion factor.  The endpoints are solved as exact
// LPs; interior alpha makes the constraints nonlinear in delta, but
// feasibility is monotone in delta, so the optimum is found by bisection
// over LP feasibility subproblems.

/// Options for the generalized distance function model.
#[derive(PartialEq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneralizedOptions<T = f64> {
    /// interpolation parameter in `[0, 1]`: 1 = input orientation,
    /// 0 = (reciprocal) output orientation
    pub alpha: T,
    pub rts: Rts,
    pub dispos_x: Disposability,
    pub dispos_y: Disposability,
}

impl<T: FloatT> Default for GeneralizedOptions<T> {
    fn default() -> Self {
        Self {
            alpha: (0.5).as_T(),
            rts: Rts::Crs,
            dispos_x: Disposability::Strong,
            dispos_y: Disposability::Strong,
        }
    }
}

/// Result of a generalized distance function solve.  Scores lie in `(0, 1]`
/// with `1` on the frontier.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneralizedModel<T: FloatT> {
    pub(crate) core: ResultCore<T>,
    alpha: T,
    rts: Rts,
}

impl_dea_model!(GeneralizedModel);

impl<T: FloatT> GeneralizedModel<T> {
    pub fn alpha(&self) -> T {
        self.alpha
    }

    pub fn rts(&self) -> Rts {
        self.rts
    }
}

#[inline]
fn envelopment_op(dispos: Disposability, strong: ConstraintOp) -> ConstraintOp {
    match dispos {
        Disposability::Strong => strong,
        Disposability::Weak => ConstraintOp::Eq,
    }
}

enum Probe<T> {
    Feasible(Vec<T>),
    Infeasible,
    /// the probe terminated with neither an optimum nor an infeasibility
    /// certificate; bisection treats this as infeasible (conservative) and
    /// surfaces the status as a warning
    Degraded(LpStatus),
}

/// Feasibility probe at a fixed delta.  Returns the intensity weights when
/// the scaled technology admits the unit.
fn probe<T, S>(
    data: &ProblemData<T>,
    unit: usize,
    delta: T,
    options: &GeneralizedOptions<T>,
    solver: &S,
) -> Probe<T>
where
    T: FloatT,
    S: LpSolver<T>,
{
    let Xref = data.ref_inputs();
    let Yref = data.ref_outputs();
    let x0 = data.inputs().row(unit);
    let y0 = data.outputs().row(unit);
    let nref = data.nref();
    let alpha = options.alpha;
    let one = T::one();

    let in_scale = delta.powf(alpha);
    let out_scale = delta.powf(one - alpha).recip();

    // minimizing the intensity sum keeps the probe bounded and its
    // reported point deterministic
    let mut lp = LinearProgram::new(Objective::Minimize);
    let lam = lp.add_vars(nref, |_| T::one(), Bound::NonNegative);

    let x_op = envelopment_op(options.dispos_x, ConstraintOp::Le);
    let y_op = envelopment_op(options.dispos_y, ConstraintOp::Ge);

    for j in 0..data.ninputs() {
        let coeffs = (0..nref).map(|t| (lam + t, Xref.get(t, j))).collect();
        lp.add_row(coeffs, x_op, in_scale * x0[j]);
    }
    for r in 0..data.noutputs() {
        let coeffs = (0..nref).map(|t| (lam + t, Yref.get(t, r))).collect();
        lp.add_row(coeffs, y_op, out_scale * y0[r]);
    }
    if options.rts == Rts::Vrs {
        let coeffs = (0..nref).map(|t| (lam + t, one)).collect();
        lp.add_row(coeffs, ConstraintOp::Eq, one);
    }

    let sol = solver.solve(&lp);
    match sol.status {
        s if s.is_optimal() => Probe::Feasible(sol.x[lam..lam + nref].to_vec()),
        LpStatus::Infeasible => Probe::Infeasible,
        s => Probe::Degraded(s),
    }
}

fn solve_unit<T, S>(
    data: &ProblemData<T>,
    unit: usize,
    options: &GeneralizedOptions<T>,
    gdf_tol: T,
    solver: &S,
) -> UnitSolution<T>
where
    T: FloatT,
    S: LpSolver<T>,
{
    let one = T::one();
    let alpha = options.alpha;

    // endpoints are plain radial programs; solve them exactly
    let (eff, lambda, status) = if alpha == one {
        solve_radial_unit(
            data,
            unit,
            Orientation::Input,
            options.rts,
            options.dispos_x,
            options.dispos_y,
            solver,
        )
    } else if alpha == T::zero() {
        let (phi, lambda, status) = solve_radial_unit(
            data,
            unit,
            Orientation::Output,
            options.rts,
            options.dispos_x,
            options.dispos_y,
            solver,
        );
        (phi.recip(), lambda, status)
    } else {
        bisect_unit(data, unit, options, gdf_tol, solver)
    };

    let mut warnings = Vec::new();
    if !status.is_optimal() {
        warnings.push(SolveWarning {
            unit,
            stage: SolveStage::Efficiency,
            status,
        });
    }

    let x0 = data.inputs().row(unit);
    let y0 = data.outputs().row(unit);
    let in_scale = eff.powf(alpha);
    let out_scale = eff.powf(one - alpha).recip();
    let target_x = x0.iter().map(|&v| in_scale * v).collect();
    let target_y = y0.iter().map(|&v| out_scale * v).collect();

    UnitSolution {
        eff,
        lambda,
        slack_x: None,
        slack_y: None,
        target_x: Some(target_x),
        target_y: Some(target_y),
        warnings,
    }
}

/// Bisection on delta for interior alpha.  Feasibility is monotone: growing
/// delta relaxes both the input and the output side at once.
fn bisect_unit<T, S>(
    data: &ProblemData<T>,
    unit: usize,
    options: &GeneralizedOptions<T>,
    gdf_tol: T,
    solver: &S,
) -> (T, Vec<T>, LpStatus)
where
    T: FloatT,
    S: LpSolver<T>,
{
    let nref = data.nref();
    let two = (2.0).as_T();
    let mut degraded: Option<LpStatus> = None;

    // find a feasible upper bracket; delta = 1 works whenever the unit is
    // inside its own reference technology
    let mut hi = T::one();
    let mut lambda: Option<Vec<T>> = None;
    let mut expansions = 0;
    loop {
        match probe(data, unit, hi, options, solver) {
            Probe::Feasible(lam) => {
                lambda = Some(lam);
                break;
            }
            Probe::Infeasible => {}
            Probe::Degraded(status) => degraded = Some(status),
        }
        if expansions >= 60 {
            let status = degraded.unwrap_or(LpStatus::Infeasible);
            return (T::nan(), vec![T::zero(); nref], status);
        }
        hi = hi * two;
        expansions += 1;
    }
    let mut lambda = lambda.unwrap_or_else(|| vec![T::zero(); nref]);

    // shrink onto the smallest feasible contraction; hi always tracks a
    // confirmed-feasible point
    let mut lo = T::zero();
    while hi - lo > gdf_tol * T::max(T::one(), hi) {
        let mid = (lo + hi) / two;
        match probe(data, unit, mid, options, solver) {
            Probe::Feasible(lam) => {
                hi = mid;
                lambda = lam;
            }
            Probe::Infeasible => lo = mid,
            Probe::Degraded(status) => {
                degraded = Some(status);
                lo = mid;
            }
        }
    }

    (hi, lambda, degraded.unwrap_or(LpStatus::Optimal))
}

/// Generalized distance efficiency of every unit for the configured alpha.
pub fn generalized<T>(
    data: &ProblemData<T>,
    options: &GeneralizedOptions<T>,
    settings: &DeaSettings<T>,
) -> Result<GeneralizedModel<T>, DeaError>
where
    T: FloatT,
{
    settings.validate()?;
    if options.alpha < T::zero() || options.alpha > T::one() || options.alpha.is_nan() {
        return Err(DeaError::AlphaOutOfRange(
            options.alpha.to_f64().unwrap_or(f64::NAN),
        ));
    }
    // the endpoints reduce to oriented radial programs, where weak disposal
    // on the rescaled side is undefined
    if options.alpha == T::one() {
        check_oriented_disposability(Orientation::Input, options.dispos_x, options.dispos_y)?;
    }
    if options.alpha == T::zero() {
        check_oriented_disposability(Orientation::Output, options.dispos_x, options.dispos_y)?;
    }

    let solver = ClarabelSolver::new(settings);
    let now = Instant::now();
    let units = batch::run_units(data.nunits(), settings.max_threads, |i| {
        solve_unit(data, i, options, settings.gdf_tol, &solver)
    });
    let core = assemble_core(data, units, settings, now.elapsed().as_secs_f64());
    print_summary(
        "generalized distance",
        &format!(
            "alpha = {}, {}",
            options.alpha.to_f64().unwrap_or(f64::NAN),
            options.rts
        ),
        &core,
        settings.verbose,
    );

    Ok(GeneralizedModel {
        core,
        alpha: options.alpha,
        rts: options.rts,
    })
}
