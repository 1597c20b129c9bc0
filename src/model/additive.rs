#![allow(non_snake_case)]
use crate::algebra::*;
use crate::model::lp::*;
use crate::model::radial::check_oriented_disposability;
use crate::model::results::{assemble_core, impl_dea_model, print_summary, UnitSolution};
use crate::model::weights::{resolve_additive_weights, ResolvedWeights};
use crate::model::*;
use itertools::izip;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------
// Weighted additive efficiency
// ---------------

/// Options for the weighted additive model.
#[derive(PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdditiveOptions<T = f64> {
    pub scheme: AdditiveScheme<T>,
    /// which sides contribute slacks to the objective
    pub orientation: Orientation,
    pub rts: Rts,
    pub dispos_x: Disposability,
    pub dispos_y: Disposability,
}

impl<T> Default for AdditiveOptions<T> {
    fn default() -> Self {
        Self {
            scheme: AdditiveScheme::Ones,
            orientation: Orientation::Graph,
            rts: Rts::Vrs,
            dispos_x: Disposability::Strong,
            dispos_y: Disposability::Strong,
        }
    }
}

/// Result of a weighted additive model solve.  Scores are weighted slack
/// sums: non-negative, with zero on the frontier.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdditiveModel<T: FloatT> {
    pub(crate) core: ResultCore<T>,
    orientation: Orientation,
    rts: Rts,
    scheme: &'static str,
}

impl_dea_model!(AdditiveModel);

impl<T: FloatT> AdditiveModel<T> {
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn rts(&self) -> Rts {
        self.rts
    }

    /// Tag of the weighting scheme the model was built with.
    pub fn scheme(&self) -> &'static str {
        self.scheme
    }
}

struct AdditiveContext<'a, T> {
    weights: &'a ResolvedWeights<T>,
    options: &'a AdditiveOptions<T>,
    /// BAM under constant returns needs the projection bounded between the
    /// sample extrema; unbounded otherwise
    bounds: Option<(Vec<T>, Vec<T>)>,
}

fn solve_unit<T, S>(
    data: &ProblemData<T>,
    unit: usize,
    ctx: &AdditiveContext<T>,
    solver: &S,
) -> UnitSolution<T>
where
    T: FloatT,
    S: LpSolver<T>,
{
    let Xref = data.ref_inputs();
    let Yref = data.ref_outputs();
    let x0 = data.inputs().row(unit);
    let y0 = data.outputs().row(unit);
    let (m, s, nref) = (data.ninputs(), data.noutputs(), data.nref());
    let options = ctx.options;

    let wx0 = ctx.weights.wx.row(unit);
    let wy0 = ctx.weights.wy.row(unit);
    let x_active = matches!(options.orientation, Orientation::Graph | Orientation::Input);
    let y_active = matches!(options.orientation, Orientation::Graph | Orientation::Output);

    // a slack with zero weight on an objective-active side is pinned rather
    // than left to drift on the optimal face
    let slack_bound = |active: bool, dispos: Disposability, w: T| -> Bound<T> {
        if dispos == Disposability::Weak || (active && w == T::zero()) {
            Bound::Fixed(T::zero())
        } else {
            Bound::NonNegative
        }
    };

    let mut lp = LinearProgram::new(Objective::Maximize);
    let sx = {
        let first = lp.num_vars();
        for j in 0..m {
            let cost = if x_active { wx0[j] } else { T::zero() };
            lp.add_var(cost, slack_bound(x_active, options.dispos_x, wx0[j]));
        }
        first
    };
    let sy = {
        let first = lp.num_vars();
        for r in 0..s {
            let cost = if y_active { wy0[r] } else { T::zero() };
            lp.add_var(cost, slack_bound(y_active, options.dispos_y, wy0[r]));
        }
        first
    };
    let lam = lp.add_vars(nref, |_| T::zero(), Bound::NonNegative);

    for j in 0..m {
        // sum_t Xref[t,j] lam_t = x0[j] - sx_j
        let mut coeffs: Vec<(usize, T)> =
            (0..nref).map(|t| (lam + t, Xref.get(t, j))).collect();
        coeffs.push((sx + j, T::one()));
        lp.add_row(coeffs, ConstraintOp::Eq, x0[j]);
    }
    for r in 0..s {
        // sum_t Yref[t,r] lam_t = y0[r] + sy_r
        let mut coeffs: Vec<(usize, T)> =
            (0..nref).map(|t| (lam + t, Yref.get(t, r))).collect();
        coeffs.push((sy + r, -T::one()));
        lp.add_row(coeffs, ConstraintOp::Eq, y0[r]);
    }
    if options.rts == Rts::Vrs {
        let coeffs = (0..nref).map(|t| (lam + t, T::one())).collect();
        lp.add_row(coeffs, ConstraintOp::Eq, T::one());
    }
    if let Some((lo, hi)) = &ctx.bounds {
        for j in 0..m {
            let coeffs = (0..nref).map(|t| (lam + t, Xref.get(t, j))).collect();
            lp.add_row(coeffs, ConstraintOp::Ge, lo[j]);
        }
        for r in 0..s {
            let coeffs = (0..nref).map(|t| (lam + t, Yref.get(t, r))).collect();
            lp.add_row(coeffs, ConstraintOp::Le, hi[r]);
        }
    }

    let sol = solver.solve(&lp);
    let slack_x = sol.x[sx..sx + m].to_vec();
    let slack_y = sol.x[sy..sy + s].to_vec();

    let mut warnings = Vec::new();
    if !sol.status.is_optimal() {
        warnings.push(SolveWarning {
            unit,
            stage: SolveStage::Efficiency,
            status: sol.status,
        });
    }

    let target_x: Vec<T> = izip!(x0, &slack_x).map(|(&v, &sl)| v - sl).collect();
    let target_y: Vec<T> = izip!(y0, &slack_y).map(|(&v, &sl)| v + sl).collect();

    UnitSolution {
        eff: sol.objective,
        lambda: sol.x[lam..lam + nref].to_vec(),
        slack_x: Some(slack_x),
        slack_y: Some(slack_y),
        target_x: Some(target_x),
        target_y: Some(target_y),
        warnings,
    }
}

/// Weighted additive inefficiency of every unit: the maximal weighted slack
/// sum, zero exactly on the frontier.
pub fn additive<T>(
    data: &ProblemData<T>,
    options: &AdditiveOptions<T>,
    settings: &DeaSettings<T>,
) -> Result<AdditiveModel<T>, DeaError>
where
    T: FloatT,
{
    settings.validate()?;
    check_oriented_disposability(options.orientation, options.dispos_x, options.dispos_y)?;

    let weights = resolve_additive_weights(
        data,
        &options.scheme,
        options.orientation,
        options.dispos_x,
        options.dispos_y,
    )?;

    let bounds = match (&options.scheme, options.rts) {
        (AdditiveScheme::Bam, Rts::Crs) => {
            let X = data.inputs();
            let Y = data.outputs();
            let lo = (0..data.ninputs()).map(|j| X.col_min(j)).collect();
            let hi = (0..data.noutputs()).map(|r| Y.col_max(r)).collect();
            Some((lo, hi))
        }
        _ => None,
    };

    let ctx = AdditiveContext {
        weights: &weights,
        options,
        bounds,
    };

    let solver = ClarabelSolver::new(settings);
    let now = Instant::now();
    let units = batch::run_units(data.nunits(), settings.max_threads, |i| {
        solve_unit(data, i, &ctx, &solver)
    });
    let core = assemble_core(data, units, settings, now.elapsed().as_secs_f64());
    print_summary(
        "additive",
        &format!("{} weights, {}", options.scheme.tag(), options.rts),
        &core,
        settings.verbose,
    );

    Ok(AdditiveModel {
        core,
        orientation: options.orientation,
        rts: options.rts,
        scheme: options.scheme.tag(),
    })
}
