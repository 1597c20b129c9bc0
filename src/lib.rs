//! __Envelo__ is a Rust engine for Data Envelopment Analysis (DEA): it measures
//! the relative efficiency of a set of decision making units (DMUs), each
//! consuming multiple inputs to produce multiple outputs, by solving one small
//! linear program per unit against a reference technology.
//!
//! Supported model families:
//!
//! * __Radial__ input- and output-oriented measures under constant or variable
//!   returns to scale, with strong or weak disposability and an optional
//!   second-stage slack maximization.
//! * __Weighted additive__ measures (Ones, MIP, Normalized, RAM, BAM or custom
//!   weights).
//! * __Directional distance functions__ with named or custom direction vectors.
//! * __Generalized distance functions__ parameterized between the input- and
//!   output-oriented radial measures.
//! * __Economic__ efficiency: profit, revenue and cost models decomposed into
//!   technical and allocative components.
//!
//! Model construction validates all data shapes and options up front, solves
//! every unit's program independently (in parallel with the `parallel`
//! feature), and returns an immutable result carrying efficiency scores, a
//! sparse peer matrix, slacks, projected targets and any per-unit solver
//! warnings.  The linear programs themselves are delegated to
//! [Clarabel](https://github.com/oxfordcontrol/Clarabel.rs) through a small
//! solver-adapter trait.

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod model;

/// Version of this crate as a string.
pub fn version() -> &'static str {
    VERSION
}
