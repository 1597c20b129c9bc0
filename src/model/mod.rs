//! DEA model families, their options, and the shared result model.
//!
//! Each family is a single construction call: the data and options are
//! validated, one linear program per unit is formulated and solved against
//! the reference technology, and the per-unit solutions are decomposed into
//! an immutable result.
//!
//! : closed option enumerations and problem data validation
//! : per-family program builders and decompositions
//! : the LP container and the external solver boundary
//! : user settings
//! : common result accessors dispatched over a tagged model enum

pub(crate) mod batch;
pub(crate) mod weights;

mod adapter;
mod additive;
mod cost;
mod data;
mod directional;
mod error;
mod gdf;
mod lp;
mod options;
mod profit;
mod radial;
mod results;
mod revenue;
mod settings;

#[cfg(feature = "serde")]
mod json;

// partially flatten the public surface

pub use adapter::*;
pub use additive::*;
pub use cost::*;
pub use data::*;
pub use directional::*;
pub use error::*;
pub use gdf::*;
pub use lp::*;
pub use options::*;
pub use profit::*;
pub use radial::*;
pub use results::*;
pub use revenue::*;
pub use settings::*;

#[cfg(feature = "serde")]
pub use json::*;
