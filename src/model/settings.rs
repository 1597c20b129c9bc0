use crate::algebra::*;
use crate::model::DeaError;
use derive_builder::Builder;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Numerical and execution settings shared by all model families.
///
/// Settings are independent of the model structure (orientation, returns to
/// scale, weighting), which lives in the per-family option types.
#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeaSettings<T: FloatT> {
    /// tolerance for clamping solver noise: slack and intensity values in
    /// `(-tol, 0)` are treated as exact zeros, and decomposition
    /// denominators below `tol` are reported as degenerate
    #[builder(default = "(1e-8).as_T()")]
    pub tol: T,

    /// intensity weights at or below this threshold are dropped from the
    /// sparse peer matrix
    #[builder(default = "(1e-8).as_T()")]
    pub peer_tol: T,

    /// convergence width of the bisection used by the generalized distance
    /// function for interior values of alpha
    #[builder(default = "(1e-9).as_T()")]
    pub gdf_tol: T,

    /// print a solve summary to stdout
    #[builder(default = "false")]
    pub verbose: bool,

    /// maximum worker threads for the per-unit batch;
    /// choosing 0 lets the pool choose for itself
    #[builder(default = "0")]
    pub max_threads: u32,

    /// iteration limit handed to the LP solver for each unit's program
    #[builder(default = "200")]
    pub solver_max_iter: u32,

    /// per-program time limit in seconds enforced at the solver boundary;
    /// expiry surfaces as a `TimeLimit` warning on the affected unit
    #[builder(default = "f64::INFINITY")]
    pub solver_time_limit: f64,
}

impl<T> Default for DeaSettings<T>
where
    T: FloatT,
{
    fn default() -> DeaSettings<T> {
        DeaSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> DeaSettings<T>
where
    T: FloatT,
{
    /// Checks that all numerical fields are finite and non-negative.
    pub fn validate(&self) -> Result<(), DeaError> {
        validate_tolerance(self.tol, "tol")?;
        validate_tolerance(self.peer_tol, "peer_tol")?;
        validate_tolerance(self.gdf_tol, "gdf_tol")?;
        if self.gdf_tol <= T::zero() {
            return Err(DeaError::BadSettingsValue("gdf_tol"));
        }
        if self.solver_time_limit < 0.0 || self.solver_time_limit.is_nan() {
            return Err(DeaError::BadSettingsValue("solver_time_limit"));
        }
        Ok(())
    }
}

impl From<DeaError> for DeaSettingsBuilderError {
    fn from(e: DeaError) -> Self {
        DeaSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> DeaSettingsBuilder<T>
where
    T: FloatT,
{
    fn validate(&self) -> Result<(), DeaError> {
        if let Some(tol) = self.tol {
            validate_tolerance(tol, "tol")?;
        }
        if let Some(tol) = self.peer_tol {
            validate_tolerance(tol, "peer_tol")?;
        }
        if let Some(tol) = self.gdf_tol {
            validate_tolerance(tol, "gdf_tol")?;
            if tol <= T::zero() {
                return Err(DeaError::BadSettingsValue("gdf_tol"));
            }
        }
        if let Some(limit) = self.solver_time_limit {
            if limit < 0.0 || limit.is_nan() {
                return Err(DeaError::BadSettingsValue("solver_time_limit"));
            }
        }
        Ok(())
    }
}

fn validate_tolerance<T: FloatT>(v: T, field: &'static str) -> Result<(), DeaError> {
    if v < T::zero() || !v.is_finite() {
        return Err(DeaError::BadSettingsValue(field));
    }
    Ok(())
}

#[test]
fn test_settings_validate() {
    // all standard settings
    DeaSettingsBuilder::<f64>::default().build().unwrap();

    // fail on a negative tolerance
    assert!(DeaSettingsBuilder::<f64>::default()
        .tol(-1e-8)
        .build()
        .is_err());

    // fail on a zero bisection width
    assert!(DeaSettingsBuilder::<f64>::default()
        .gdf_tol(0.0)
        .build()
        .is_err());

    // directly construct bad settings and manually check
    let settings = DeaSettings::<f64> {
        solver_time_limit: -1.0,
        ..DeaSettings::default()
    };
    assert!(settings.validate().is_err());
}
