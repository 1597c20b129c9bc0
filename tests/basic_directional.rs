#![allow(non_snake_case)]
use approx::assert_relative_eq;
use envelo::{algebra::*, model::*};

fn sample() -> ProblemData<f64> {
    let X = DenseMatrix::from_rows(&[
        vec![5.0, 13.0],
        vec![16.0, 12.0],
        vec![16.0, 26.0],
        vec![17.0, 15.0],
        vec![18.0, 14.0],
        vec![23.0, 6.0],
        vec![25.0, 10.0],
        vec![27.0, 22.0],
        vec![37.0, 14.0],
        vec![42.0, 25.0],
        vec![5.0, 17.0],
    ]);
    let Y = DenseMatrix::from_rows(&[
        vec![12.0],
        vec![14.0],
        vec![25.0],
        vec![26.0],
        vec![8.0],
        vec![9.0],
        vec![27.0],
        vec![30.0],
        vec![31.0],
        vec![26.0],
        vec![12.0],
    ]);
    ProblemData::new(&X, &Y).unwrap()
}

#[test]
fn test_directional_input_direction_matches_radial() {
    // with Gx = x0 and Gy = 0 the distance is the input contraction itself:
    // beta = 1 - theta
    let data = sample();
    let ddf = directional(
        &data,
        &DirectionalOptions {
            gx: DirectionScheme::Observed,
            gy: DirectionScheme::Zeros,
            ..DirectionalOptions::default()
        },
        &DeaSettings::default(),
    )
    .unwrap();
    let theta = radial(&data, &RadialOptions::default(), &DeaSettings::default()).unwrap();

    for (&beta, &t) in ddf.efficiency().iter().zip(theta.efficiency()) {
        assert_relative_eq!(beta, 1.0 - t, epsilon = 1e-5);
    }
}

#[test]
fn test_directional_observed_crs_relates_to_radial() {
    // with g = (x0, y0) under constant returns, beta = (1 - theta)/(1 + theta)
    let data = sample();
    let ddf = directional(&data, &DirectionalOptions::default(), &DeaSettings::default()).unwrap();
    let theta = radial(&data, &RadialOptions::default(), &DeaSettings::default()).unwrap();

    for (&beta, &t) in ddf.efficiency().iter().zip(theta.efficiency()) {
        assert_relative_eq!(beta, (1.0 - t) / (1.0 + t), epsilon = 1e-5);
        assert!(beta >= -1e-9);
    }
}

#[test]
fn test_directional_unit_directions_vrs() {
    let X = DenseMatrix::from_rows(&[vec![1.0], vec![2.0]]);
    let Y = DenseMatrix::from_rows(&[vec![1.0], vec![1.0]]);
    let data = ProblemData::new(&X, &Y).unwrap();

    let model = directional(
        &data,
        &DirectionalOptions {
            gx: DirectionScheme::Ones,
            gy: DirectionScheme::Zeros,
            rts: Rts::Vrs,
            ..DirectionalOptions::default()
        },
        &DeaSettings::default(),
    )
    .unwrap();

    assert_relative_eq!(model.efficiency()[0], 0.0, epsilon = 1e-6);
    assert_relative_eq!(model.efficiency()[1], 1.0, epsilon = 1e-6);
    assert_relative_eq!(model.targets_x().unwrap().get(1, 0), 1.0, epsilon = 1e-5);
}

#[test]
fn test_directional_slack_stage_cleans_residuals() {
    // the second unit reaches the frontier radially but keeps an input slack
    let X = DenseMatrix::from_rows(&[vec![1.0, 1.0], vec![1.0, 3.0]]);
    let Y = DenseMatrix::from_rows(&[vec![1.0], vec![1.0]]);
    let data = ProblemData::new(&X, &Y).unwrap();

    let model = directional(
        &data,
        &DirectionalOptions {
            gx: DirectionScheme::Zeros,
            gy: DirectionScheme::Ones,
            rts: Rts::Vrs,
            ..DirectionalOptions::default()
        },
        &DeaSettings::default(),
    )
    .unwrap();

    // no output expansion is possible, but the slack stage still projects
    // the second input down to the frontier
    assert_relative_eq!(model.efficiency()[1], 0.0, epsilon = 1e-6);
    assert_relative_eq!(model.slacks_x().unwrap().get(1, 1), 2.0, epsilon = 1e-5);
    assert_relative_eq!(model.targets_x().unwrap().get(1, 1), 1.0, epsilon = 1e-5);
}

#[test]
fn test_generalized_reduces_to_oriented_radial_at_endpoints() {
    let data = sample();
    let settings = DeaSettings::default();

    let input = radial(&data, &RadialOptions::default(), &settings).unwrap();
    let output = radial(
        &data,
        &RadialOptions {
            orientation: Orientation::Output,
            ..RadialOptions::default()
        },
        &settings,
    )
    .unwrap();

    let at_one = generalized(
        &data,
        &GeneralizedOptions {
            alpha: 1.0,
            ..GeneralizedOptions::default()
        },
        &settings,
    )
    .unwrap();
    let at_zero = generalized(
        &data,
        &GeneralizedOptions {
            alpha: 0.0,
            ..GeneralizedOptions::default()
        },
        &settings,
    )
    .unwrap();

    for i in 0..data.nunits() {
        // alpha = 1 is the input-oriented program itself
        assert!((at_one.efficiency()[i] - input.efficiency()[i]).abs() <= 1e-7);
        // alpha = 0 contracts the reciprocal of the output expansion
        assert!((1.0 / at_zero.efficiency()[i] - output.efficiency()[i]).abs() <= 1e-7);
    }
}

#[test]
fn test_generalized_interior_alpha_crs() {
    // under constant returns the generalized distance coincides with the
    // input-oriented score for every alpha
    let X = DenseMatrix::from_rows(&[vec![2.0], vec![4.0], vec![8.0]]);
    let Y = DenseMatrix::from_rows(&[vec![1.0], vec![4.0], vec![6.0]]);
    let data = ProblemData::new(&X, &Y).unwrap();
    let settings = DeaSettings::default();

    let theta = radial(&data, &RadialOptions::default(), &settings).unwrap();
    let gdf = generalized(&data, &GeneralizedOptions::default(), &settings).unwrap();

    for i in 0..3 {
        assert_relative_eq!(gdf.efficiency()[i], theta.efficiency()[i], epsilon = 1e-6);
        assert!(gdf.efficiency()[i] <= 1.0 + 1e-6);
    }
    assert_relative_eq!(gdf.efficiency()[1], 1.0, epsilon = 1e-6);
}

#[test]
fn test_generalized_vrs_frontier_units_score_one() {
    let data = sample();
    let model = generalized(
        &data,
        &GeneralizedOptions {
            rts: Rts::Vrs,
            ..GeneralizedOptions::default()
        },
        &DeaSettings::default(),
    )
    .unwrap();

    let radial_vrs = radial(
        &data,
        &RadialOptions {
            rts: Rts::Vrs,
            ..RadialOptions::default()
        },
        &DeaSettings::default(),
    )
    .unwrap();

    for i in 0..data.nunits() {
        let delta = model.efficiency()[i];
        assert!(delta > 0.0 && delta <= 1.0 + 1e-6);
        // radially efficient units stay efficient under the graph measure
        if radial_vrs.efficiency()[i] > 1.0 - 1e-9 {
            assert_relative_eq!(delta, 1.0, epsilon = 1e-6);
        }
    }
}
