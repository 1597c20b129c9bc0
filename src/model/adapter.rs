use crate::algebra::*;
use crate::model::lp::{Bound, ConstraintOp, LinearProgram, Objective};
use crate::model::DeaSettings;

use clarabel::algebra::CscMatrix;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------
// Solver adapter boundary
// ---------------

/// Termination status of a single linear program, as reported by the solver
/// backend.
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LpStatus {
    /// Solved to the backend's full accuracy.
    Optimal,
    /// Solved to reduced accuracy.
    AlmostOptimal,
    /// The program is (primal) infeasible.
    Infeasible,
    /// The program is unbounded (dual infeasible).
    Unbounded,
    /// Iteration limit reached before termination.
    IterationLimit,
    /// The per-program time limit expired.
    TimeLimit,
    /// Numerical breakdown or insufficient progress.
    NumericalError,
    /// The backend reported nothing usable.
    Unknown,
}

impl LpStatus {
    /// Whether the reported point can be used as an optimum.
    pub fn is_optimal(&self) -> bool {
        matches!(self, LpStatus::Optimal | LpStatus::AlmostOptimal)
    }
}

impl std::fmt::Display for LpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Primal solution of a single linear program.
#[derive(Debug, Clone)]
pub struct LpSolution<T> {
    /// primal variable values, in declaration order
    pub x: Vec<T>,
    /// objective value in the caller's optimization sense
    pub objective: T,
    /// termination status
    pub status: LpStatus,
}

/// Interface to an external LP solver.
///
/// A fresh backend problem instance must be constructed per call so that no
/// state leaks between the programs of unrelated units.  Implementations
/// must not panic on pathological programs: infeasibility, unboundedness and
/// timeouts are reported through [`LpStatus`].
pub trait LpSolver<T: FloatT>: Sync {
    fn solve(&self, lp: &LinearProgram<T>) -> LpSolution<T>;
}

// ---------------
// Clarabel backend
// ---------------

/// [`LpSolver`] implementation backed by the Clarabel interior point solver.
///
/// An LP is passed to Clarabel as a conic program: equality rows (and
/// variables pinned by `Bound::Fixed`) form a zero cone block, and all
/// inequality rows, normalized to `a'x <= b`, together with the
/// `Bound::NonNegative` variable bounds form a nonnegative cone block.
pub struct ClarabelSolver<T> {
    max_iter: u32,
    time_limit: f64,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> ClarabelSolver<T>
where
    T: FloatT,
{
    pub fn new(settings: &DeaSettings<T>) -> Self {
        Self {
            max_iter: settings.solver_max_iter,
            time_limit: settings.solver_time_limit,
            _phantom: std::marker::PhantomData,
        }
    }

    fn failed(status: LpStatus, nvars: usize) -> LpSolution<T> {
        LpSolution {
            x: vec![T::zero(); nvars],
            objective: T::nan(),
            status,
        }
    }
}

impl<T> LpSolver<T> for ClarabelSolver<T>
where
    T: FloatT,
{
    fn solve(&self, lp: &LinearProgram<T>) -> LpSolution<T> {
        let nv = lp.num_vars();

        // Rows are emitted equalities first so the two cone blocks are
        // contiguous in A.
        let mut triplets: Vec<(usize, usize, T)> = Vec::new();
        let mut b: Vec<T> = Vec::new();
        let mut nrows = 0usize;

        for row in lp.rows() {
            if row.op == ConstraintOp::Eq {
                for &(j, v) in &row.coeffs {
                    triplets.push((nrows, j, v));
                }
                b.push(row.rhs);
                nrows += 1;
            }
        }
        for j in 0..nv {
            if let Bound::Fixed(v) = lp.bound(j) {
                triplets.push((nrows, j, T::one()));
                b.push(v);
                nrows += 1;
            }
        }
        let neq = nrows;

        for row in lp.rows() {
            let flip = match row.op {
                ConstraintOp::Le => T::one(),
                ConstraintOp::Ge => -T::one(),
                ConstraintOp::Eq => continue,
            };
            for &(j, v) in &row.coeffs {
                triplets.push((nrows, j, flip * v));
            }
            b.push(flip * row.rhs);
            nrows += 1;
        }
        for j in 0..nv {
            if Bound::NonNegative == lp.bound(j) {
                triplets.push((nrows, j, -T::one()));
                b.push(T::zero());
                nrows += 1;
            }
        }
        let nineq = nrows - neq;

        let mut cones: Vec<SupportedConeT<T>> = Vec::with_capacity(2);
        if neq > 0 {
            cones.push(SupportedConeT::ZeroConeT(neq));
        }
        if nineq > 0 {
            cones.push(SupportedConeT::NonnegativeConeT(nineq));
        }

        let q: Vec<T> = match lp.objective() {
            Objective::Minimize => lp.cost().to_vec(),
            Objective::Maximize => lp.cost().iter().map(|&c| -c).collect(),
        };

        let P = CscMatrix::new(nv, nv, vec![0; nv + 1], vec![], vec![]);
        let A = csc_from_triplets(nrows, nv, triplets);

        let settings = match DefaultSettingsBuilder::<T>::default()
            .verbose(false)
            .max_iter(self.max_iter)
            .time_limit(self.time_limit)
            .build()
        {
            Ok(s) => s,
            Err(_) => return Self::failed(LpStatus::NumericalError, nv),
        };

        let mut solver = DefaultSolver::new(&P, &q, &A, &b, &cones, settings);
        solver.solve();

        let x = solver.solution.x.clone();
        let objective = lp.cost().dot(&x);
        LpSolution {
            x,
            objective,
            status: map_status(solver.solution.status),
        }
    }
}

fn map_status(status: SolverStatus) -> LpStatus {
    match status {
        SolverStatus::Solved => LpStatus::Optimal,
        SolverStatus::AlmostSolved => LpStatus::AlmostOptimal,
        SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
            LpStatus::Infeasible
        }
        SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => LpStatus::Unbounded,
        SolverStatus::MaxIterations => LpStatus::IterationLimit,
        SolverStatus::MaxTime => LpStatus::TimeLimit,
        SolverStatus::NumericalError | SolverStatus::InsufficientProgress => {
            LpStatus::NumericalError
        }
        _ => LpStatus::Unknown,
    }
}

/// Builds a CSC matrix from unordered (row, col, value) triplets.  The model
/// builders never emit duplicate coordinates.
fn csc_from_triplets<T: FloatT>(
    m: usize,
    n: usize,
    mut triplets: Vec<(usize, usize, T)>,
) -> CscMatrix<T> {
    triplets.sort_by(|a, b| (a.1, a.0).cmp(&(b.1, b.0)));

    let mut colptr = vec![0usize; n + 1];
    let mut rowval = Vec::with_capacity(triplets.len());
    let mut nzval = Vec::with_capacity(triplets.len());

    for &(r, c, v) in &triplets {
        colptr[c + 1] += 1;
        rowval.push(r);
        nzval.push(v);
    }
    for c in 0..n {
        colptr[c + 1] += colptr[c];
    }

    CscMatrix::new(m, n, colptr, rowval, nzval)
}

// ---------------
// tests
// ---------------

#[test]
fn test_adapter_basic_lp() {
    use crate::model::lp::*;

    // max x1 + 2 x2  s.t.  x1 + x2 <= 1, x >= 0
    let mut lp = LinearProgram::<f64>::new(Objective::Maximize);
    let x1 = lp.add_var(1.0, Bound::NonNegative);
    let x2 = lp.add_var(2.0, Bound::NonNegative);
    lp.add_row(vec![(x1, 1.0), (x2, 1.0)], ConstraintOp::Le, 1.0);

    let solver = ClarabelSolver::new(&DeaSettings::default());
    let sol = solver.solve(&lp);

    assert!(sol.status.is_optimal());
    assert!((sol.objective - 2.0).abs() <= 1e-6);
    assert!((sol.x[x2] - 1.0).abs() <= 1e-6);
}

#[test]
fn test_adapter_infeasible_lp() {
    use crate::model::lp::*;

    // x >= 0 and x <= -1
    let mut lp = LinearProgram::<f64>::new(Objective::Minimize);
    let x = lp.add_var(1.0, Bound::NonNegative);
    lp.add_row(vec![(x, 1.0)], ConstraintOp::Le, -1.0);

    let solver = ClarabelSolver::new(&DeaSettings::default());
    let sol = solver.solve(&lp);

    assert_eq!(sol.status, LpStatus::Infeasible);
}

#[test]
fn test_adapter_fixed_variable() {
    use crate::model::lp::*;

    // min x1 + x2  s.t.  x1 + x2 >= 3, x2 pinned to 1
    let mut lp = LinearProgram::<f64>::new(Objective::Minimize);
    let x1 = lp.add_var(1.0, Bound::NonNegative);
    let x2 = lp.add_var(1.0, Bound::Fixed(1.0));
    lp.add_row(vec![(x1, 1.0), (x2, 1.0)], ConstraintOp::Ge, 3.0);

    let solver = ClarabelSolver::new(&DeaSettings::default());
    let sol = solver.solve(&lp);

    assert!(sol.status.is_optimal());
    assert!((sol.x[x1] - 2.0).abs() <= 1e-6);
    assert!((sol.x[x2] - 1.0).abs() <= 1e-6);
}
