use crate::algebra::FloatT;

// ---------------
// Linear program container
// ---------------
//
// The model builders express every per-unit program in this small row
// oriented form; the solver adapter owns the translation into whatever
// standard form its backend wants.

/// Optimization sense of a [`LinearProgram`].
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
pub enum Objective {
    Minimize,
    Maximize,
}

/// Simple bound on a single decision variable.
#[derive(PartialEq, Clone, Debug, Copy)]
pub enum Bound<T> {
    /// `x >= 0`
    NonNegative,
    /// unrestricted
    Free,
    /// pinned to an exact value; used to remove a variable structurally
    /// rather than penalizing it in the objective
    Fixed(T),
}

/// Comparison operator of a constraint row.
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
pub enum ConstraintOp {
    Le,
    Ge,
    Eq,
}

pub(crate) struct Row<T> {
    pub coeffs: Vec<(usize, T)>,
    pub op: ConstraintOp,
    pub rhs: T,
}

/// A linear program over scalar variables with simple bounds and sparse
/// constraint rows.
pub struct LinearProgram<T> {
    objective: Objective,
    cost: Vec<T>,
    bounds: Vec<Bound<T>>,
    rows: Vec<Row<T>>,
}

impl<T> LinearProgram<T>
where
    T: FloatT,
{
    pub fn new(objective: Objective) -> Self {
        Self {
            objective,
            cost: Vec::new(),
            bounds: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Adds a variable with the given objective coefficient and bound,
    /// returning its index.
    pub fn add_var(&mut self, cost: T, bound: Bound<T>) -> usize {
        self.cost.push(cost);
        self.bounds.push(bound);
        self.cost.len() - 1
    }

    /// Adds `count` variables sharing a bound, with per-variable costs drawn
    /// from `cost`.  Returns the index of the first one; the block is
    /// contiguous.
    pub fn add_vars(&mut self, count: usize, mut cost: impl FnMut(usize) -> T, bound: Bound<T>) -> usize {
        let first = self.cost.len();
        for k in 0..count {
            self.cost.push(cost(k));
            self.bounds.push(bound);
        }
        first
    }

    /// Adds a constraint row.  Zero coefficients are dropped.
    pub fn add_row(&mut self, coeffs: Vec<(usize, T)>, op: ConstraintOp, rhs: T) {
        let coeffs: Vec<(usize, T)> = coeffs.into_iter().filter(|&(_, v)| v != T::zero()).collect();
        self.rows.push(Row { coeffs, op, rhs });
    }

    pub fn num_vars(&self) -> usize {
        self.cost.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn cost(&self) -> &[T] {
        &self.cost
    }

    pub fn bound(&self, var: usize) -> Bound<T> {
        self.bounds[var]
    }

    pub(crate) fn rows(&self) -> &[Row<T>] {
        &self.rows
    }
}
