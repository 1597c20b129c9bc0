#![allow(non_snake_case)]
#![cfg(feature = "serde")]
use approx::assert_relative_eq;
use envelo::{algebra::*, model::*};
use std::io::{Seek, SeekFrom};

fn snapshot() -> JsonProblem<f64> {
    let X = DenseMatrix::from_rows(&[vec![5.0, 13.0], vec![16.0, 12.0], vec![17.0, 15.0]]);
    let Y = DenseMatrix::from_rows(&[vec![12.0], vec![14.0], vec![26.0]]);
    JsonProblem {
        data: ProblemData::new(&X, &Y)
            .unwrap()
            .with_names(["A", "B", "C"])
            .unwrap(),
        spec: ModelSpec::Radial(RadialOptions {
            rts: Rts::Vrs,
            ..RadialOptions::default()
        }),
        settings: DeaSettings::default(),
    }
}

#[test]
fn test_snapshot_roundtrip_reproduces_scores() {
    let problem = snapshot();

    let mut file = tempfile::tempfile().unwrap();
    problem.write_to_file(&mut file).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    let reread = JsonProblem::<f64>::read_from_file(&mut file).unwrap();

    let a = problem.solve().unwrap();
    let b = reread.solve().unwrap();

    assert_eq!(a.nunits(), b.nunits());
    assert_eq!(a.efficiency(), b.efficiency());
    assert_eq!(b.names().unwrap()[2], "C");
}

#[test]
fn test_model_enum_dispatches_family_results() {
    let X = DenseMatrix::from_rows(&[vec![1.0], vec![2.0]]);
    let Y = DenseMatrix::from_rows(&[vec![1.0], vec![1.0]]);
    let data = ProblemData::new(&X, &Y).unwrap();
    let settings = DeaSettings::default();

    let models: Vec<Model<f64>> = vec![
        radial(&data, &RadialOptions::default(), &settings)
            .unwrap()
            .into(),
        additive(&data, &AdditiveOptions::default(), &settings)
            .unwrap()
            .into(),
        generalized(&data, &GeneralizedOptions::default(), &settings)
            .unwrap()
            .into(),
    ];

    for model in &models {
        assert_eq!(model.nunits(), 2);
        assert_eq!(model.ninputs(), 1);
        // the first unit is efficient under every measure
        let first = model.efficiency()[0];
        assert!(first.abs() <= 1e-6 || (first - 1.0).abs() <= 1e-6);
    }
}

#[test]
fn test_snapshot_of_economic_model() {
    let X = DenseMatrix::from_rows(&[vec![1.0], vec![2.0]]);
    let Y = DenseMatrix::from_rows(&[vec![3.0], vec![4.0]]);
    let P = DenseMatrix::from_rows(&[vec![1.0], vec![1.0]]);
    let problem = JsonProblem {
        data: ProblemData::new(&X, &Y).unwrap(),
        spec: ModelSpec::Revenue {
            prices_y: P,
            options: RevenueOptions::default(),
        },
        settings: DeaSettings::default(),
    };

    let mut file = tempfile::tempfile().unwrap();
    problem.write_to_file(&mut file).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    let reread = JsonProblem::<f64>::read_from_file(&mut file).unwrap();

    let model = reread.solve().unwrap();
    match &model {
        Model::Revenue(rev) => {
            assert_relative_eq!(rev.efficiency()[0], 1.0, epsilon = 1e-5);
            assert!(rev.technical().len() == 2);
        }
        _ => panic!("expected a revenue model"),
    }
}
