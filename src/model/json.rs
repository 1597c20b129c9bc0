#![allow(non_snake_case)]
use crate::algebra::*;
use crate::model::*;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

// A self-contained snapshot of a model configuration: the observation data,
// the family-specific specification and the settings.  Useful for capturing
// a failing configuration and replaying it elsewhere.

/// Family tag plus the per-family options and price data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
pub enum ModelSpec<T: FloatT> {
    Radial(RadialOptions),
    Additive(AdditiveOptions<T>),
    Directional(DirectionalOptions<T>),
    Generalized(GeneralizedOptions<T>),
    Profit {
        prices_x: DenseMatrix<T>,
        prices_y: DenseMatrix<T>,
        options: ProfitOptions<T>,
    },
    Revenue {
        prices_y: DenseMatrix<T>,
        options: RevenueOptions,
    },
    Cost {
        prices_x: DenseMatrix<T>,
        options: CostOptions,
    },
}

/// A solvable problem snapshot with JSON file round-tripping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
pub struct JsonProblem<T: FloatT> {
    pub data: ProblemData<T>,
    pub spec: ModelSpec<T>,
    pub settings: DeaSettings<T>,
}

impl<T> JsonProblem<T>
where
    T: FloatT + Serialize + DeserializeOwned,
{
    pub fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        let mut snapshot = self.clone();

        // sanitize settings to remove values that can't be serialized,
        // i.e. infs
        if snapshot.settings.solver_time_limit == f64::INFINITY {
            snapshot.settings.solver_time_limit = f64::MAX;
        }

        let json = serde_json::to_string(&snapshot)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    pub fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let mut snapshot: JsonProblem<T> = serde_json::from_str(&buffer)?;

        // restore sanitized settings to their (likely) original values
        if snapshot.settings.solver_time_limit == f64::MAX {
            snapshot.settings.solver_time_limit = f64::INFINITY;
        }
        Ok(snapshot)
    }

    /// Solves the snapshot with its stored configuration.
    pub fn solve(&self) -> Result<Model<T>, DeaError> {
        let model = match &self.spec {
            ModelSpec::Radial(options) => {
                Model::Radial(radial(&self.data, options, &self.settings)?)
            }
            ModelSpec::Additive(options) => {
                Model::Additive(additive(&self.data, options, &self.settings)?)
            }
            ModelSpec::Directional(options) => {
                Model::Directional(directional(&self.data, options, &self.settings)?)
            }
            ModelSpec::Generalized(options) => {
                Model::Generalized(generalized(&self.data, options, &self.settings)?)
            }
            ModelSpec::Profit {
                prices_x,
                prices_y,
                options,
            } => Model::Profit(profit(&self.data, prices_x, prices_y, options, &self.settings)?),
            ModelSpec::Revenue { prices_y, options } => {
                Model::Revenue(revenue(&self.data, prices_y, options, &self.settings)?)
            }
            ModelSpec::Cost { prices_x, options } => {
                Model::Cost(cost(&self.data, prices_x, options, &self.settings)?)
            }
        };
        Ok(model)
    }
}

#[test]
fn test_json_roundtrip() {
    use std::io::{Seek, SeekFrom};

    let X = DenseMatrix::from_rows(&[vec![2.0], vec![4.0], vec![8.0]]);
    let Y = DenseMatrix::from_rows(&[vec![1.0], vec![4.0], vec![6.0]]);
    let problem = JsonProblem {
        data: ProblemData::new(&X, &Y).unwrap(),
        spec: ModelSpec::Radial(RadialOptions::default()),
        settings: DeaSettings::<f64>::default(),
    };

    let mut file = tempfile::tempfile().unwrap();
    problem.write_to_file(&mut file).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    let reread = JsonProblem::<f64>::read_from_file(&mut file).unwrap();

    let a = problem.solve().unwrap();
    let b = reread.solve().unwrap();
    assert_eq!(a.efficiency(), b.efficiency());
    assert_eq!(reread.settings.solver_time_limit, f64::INFINITY);
}
