#![allow(non_snake_case)]
use crate::algebra::*;
use crate::model::lp::*;
use crate::model::results::{assemble_core, impl_dea_model, print_summary, UnitSolution};
use crate::model::*;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------
// Radial (Farrell) efficiency
// ---------------

/// Options for the radial model.
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RadialOptions {
    /// contraction/expansion side; `Graph` is not a radial orientation
    pub orientation: Orientation,
    pub rts: Rts,
    pub dispos_x: Disposability,
    pub dispos_y: Disposability,
    /// run the second-stage slack maximization at the fixed radial factor
    pub slacks: bool,
}

impl Default for RadialOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Input,
            rts: Rts::Crs,
            dispos_x: Disposability::Strong,
            dispos_y: Disposability::Strong,
            slacks: true,
        }
    }
}

/// Result of a radial model solve.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RadialModel<T: FloatT> {
    pub(crate) core: ResultCore<T>,
    options: RadialOptions,
}

impl_dea_model!(RadialModel);

impl<T: FloatT> RadialModel<T> {
    pub fn options(&self) -> &RadialOptions {
        &self.options
    }

    pub fn orientation(&self) -> Orientation {
        self.options.orientation
    }

    pub fn rts(&self) -> Rts {
        self.options.rts
    }
}

/// Weak disposability on the side the measure rescales leaves the program
/// without a well defined optimum.
pub(crate) fn check_oriented_disposability(
    orientation: Orientation,
    dispos_x: Disposability,
    dispos_y: Disposability,
) -> Result<(), DeaError> {
    if orientation == Orientation::Input && dispos_x == Disposability::Weak {
        return Err(DeaError::WeakDisposalOnOrientedSide {
            side: "input",
            orientation,
        });
    }
    if orientation == Orientation::Output && dispos_y == Disposability::Weak {
        return Err(DeaError::WeakDisposalOnOrientedSide {
            side: "output",
            orientation,
        });
    }
    Ok(())
}

#[inline]
fn envelopment_op(dispos: Disposability, strong: ConstraintOp) -> ConstraintOp {
    match dispos {
        Disposability::Strong => strong,
        Disposability::Weak => ConstraintOp::Eq,
    }
}

/// Solves the radial program of one unit and returns the factor (theta or
/// phi), the intensity weights and the termination status.
///
/// Shared by the radial entry point, the generalized distance endpoints and
/// the technical components of the economic decompositions.
pub(crate) fn solve_radial_unit<T, S>(
    data: &ProblemData<T>,
    unit: usize,
    orientation: Orientation,
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

    let sense = match orientation {
        Orientation::Input => Objective::Minimize,
        _ => Objective::Maximize,
    };
    let mut lp = LinearProgram::new(sense);
    let factor = lp.add_var(T::one(), Bound::Free);
    let lam = lp.add_vars(nref, |_| T::zero(), Bound::NonNegative);

    let x_op = envelopment_op(dispos_x, ConstraintOp::Le);
    let y_op = envelopment_op(dispos_y, ConstraintOp::Ge);

    for j in 0..data.ninputs() {
        let mut coeffs: Vec<(usize, T)> =
            (0..nref).map(|t| (lam + t, Xref.get(t, j))).collect();
        match orientation {
            // sum_t Xref[t,j] lam_t <= theta * x0[j]
            Orientation::Input => {
                coeffs.push((factor, -x0[j]));
                lp.add_row(coeffs, x_op, T::zero());
            }
            // sum_t Xref[t,j] lam_t <= x0[j]
            _ => lp.add_row(coeffs, x_op, x0[j]),
        }
    }
    for r in 0..data.noutputs() {
        let mut coeffs: Vec<(usize, T)> =
            (0..nref).map(|t| (lam + t, Yref.get(t, r))).collect();
        match orientation {
            // sum_t Yref[t,r] lam_t >= phi * y0[r]
            Orientation::Output => {
                coeffs.push((factor, -y0[r]));
                lp.add_row(coeffs, y_op, T::zero());
            }
            // sum_t Yref[t,r] lam_t >= y0[r]
            _ => lp.add_row(coeffs, y_op, y0[r]),
        }
    }
    if rts == Rts::Vrs {
        let coeffs = (0..nref).map(|t| (lam + t, T::one())).collect();
        lp.add_row(coeffs, ConstraintOp::Eq, T::one());
    }

    let sol = solver.solve(&lp);
    let score = sol.x[factor];
    let lambda = sol.x[lam..lam + nref].to_vec();
    (score, lambda, sol.status)
}

/// Second-stage slack maximization at a fixed radial factor.  Returns input
/// and output slacks, the refined intensity weights and the status.
fn solve_radial_slacks<T, S>(
    data: &ProblemData<T>,
    unit: usize,
    orientation: Orientation,
    rts: Rts,
    dispos_x: Disposability,
    dispos_y: Disposability,
    factor: T,
    solver: &S,
) -> (Vec<T>, Vec<T>, Vec<T>, LpStatus)
where
    T: FloatT,
    S: LpSolver<T>,
{
    let Xref = data.ref_inputs();
    let Yref = data.ref_outputs();
    let x0 = data.inputs().row(unit);
    let y0 = data.outputs().row(unit);
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
        // sum_t Xref[t,j] lam_t + sx_j = target input j
        let mut coeffs: Vec<(usize, T)> =
            (0..nref).map(|t| (lam + t, Xref.get(t, j))).collect();
        coeffs.push((sx + j, T::one()));
        let rhs = match orientation {
            Orientation::Input => factor * x0[j],
            _ => x0[j],
        };
        lp.add_row(coeffs, ConstraintOp::Eq, rhs);
    }
    for r in 0..s {
        // sum_t Yref[t,r] lam_t - sy_r = target output r
        let mut coeffs: Vec<(usize, T)> =
            (0..nref).map(|t| (lam + t, Yref.get(t, r))).collect();
        coeffs.push((sy + r, -T::one()));
        let rhs = match orientation {
            Orientation::Output => factor * y0[r],
            _ => y0[r],
        };
        lp.add_row(coeffs, ConstraintOp::Eq, rhs);
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
    options: &RadialOptions,
    solver: &S,
) -> UnitSolution<T>
where
    T: FloatT,
    S: LpSolver<T>,
{
    let (m, s) = (data.ninputs(), data.noutputs());
    let x0 = data.inputs().row(unit);
    let y0 = data.outputs().row(unit);

    let (score, mut lambda, status) = solve_radial_unit(
        data,
        unit,
        options.orientation,
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

    // radial projection; refined below when the slack stage runs
    let mut target_x: Vec<T> = match options.orientation {
        Orientation::Input => x0.iter().map(|&v| score * v).collect(),
        _ => x0.to_vec(),
    };
    let mut target_y: Vec<T> = match options.orientation {
        Orientation::Output => y0.iter().map(|&v| score * v).collect(),
        _ => y0.to_vec(),
    };

    let mut slack_x = None;
    let mut slack_y = None;
    if options.slacks {
        if status.is_optimal() {
            let (sx, sy, lam2, status2) = solve_radial_slacks(
                data,
                unit,
                options.orientation,
                options.rts,
                options.dispos_x,
                options.dispos_y,
                score,
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
        eff: score,
        lambda,
        slack_x,
        slack_y,
        target_x: Some(target_x),
        target_y: Some(target_y),
        warnings,
    }
}

/// Radial efficiency of every unit: input-oriented contraction factors in
/// `(0, 1]` or output-oriented expansion factors in `[1, inf)`, with `1` on
/// the frontier of the reference technology.
pub fn radial<T>(
    data: &ProblemData<T>,
    options: &RadialOptions,
    settings: &DeaSettings<T>,
) -> Result<RadialModel<T>, DeaError>
where
    T: FloatT,
{
    settings.validate()?;
    if options.orientation == Orientation::Graph {
        return Err(DeaError::UnsupportedOrientation(options.orientation));
    }
    check_oriented_disposability(options.orientation, options.dispos_x, options.dispos_y)?;

    let solver = ClarabelSolver::new(settings);
    let now = Instant::now();
    let units = batch::run_units(data.nunits(), settings.max_threads, |i| {
        solve_unit(data, i, options, &solver)
    });
    let core = assemble_core(data, units, settings, now.elapsed().as_secs_f64());
    print_summary(
        "radial",
        &format!("{} oriented, {}", options.orientation, options.rts),
        &core,
        settings.verbose,
    );

    Ok(RadialModel {
        core,
        options: *options,
    })
}
