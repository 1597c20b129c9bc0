#![allow(non_snake_case)]
use approx::assert_relative_eq;
use envelo::{algebra::*, model::*};

// Canonical 11-unit, 2-input, 1-output sample.
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
fn test_radial_input_crs() {
    let data = sample();
    let model = radial(&data, &RadialOptions::default(), &DeaSettings::default()).unwrap();

    assert_eq!(model.nunits(), 11);
    assert_eq!(model.ninputs(), 2);
    assert_eq!(model.noutputs(), 1);
    assert!(model.warnings().is_empty());

    let eff = model.efficiency();

    // the first unit is on the frontier of its own sample
    assert_relative_eq!(eff[0], 1.0, epsilon = 1e-6);
    // the second contracts to about 62.23% of its inputs
    assert_relative_eq!(eff[1], 0.6223, epsilon = 1e-4);

    // input-oriented scores lie in (0, 1]
    for &e in eff {
        assert!(e > 0.0 && e <= 1.0 + 1e-6);
    }

    // unit 2's projection leans on the frontier units 4 and 7
    let peers = model.peers();
    assert_relative_eq!(peers.get(1, 3), 0.42498, epsilon = 1e-3);
    assert_relative_eq!(peers.get(1, 6), 0.10928, epsilon = 1e-3);
}

#[test]
fn test_radial_targets_satisfy_envelopment() {
    let data = sample();
    let model = radial(&data, &RadialOptions::default(), &DeaSettings::default()).unwrap();

    // peer combinations must reproduce the radial target equations
    let Xr = data.ref_inputs();
    let Yr = data.ref_outputs();
    for i in 0..model.nunits() {
        let theta = model.efficiency()[i];
        let (cols, vals) = model.peers().row(i);
        for j in 0..model.ninputs() {
            let combo: f64 = cols.iter().zip(vals).map(|(&t, &l)| l * Xr.get(t, j)).sum();
            assert!(combo <= theta * data.inputs().get(i, j) + 1e-5);
        }
        for r in 0..model.noutputs() {
            let combo: f64 = cols.iter().zip(vals).map(|(&t, &l)| l * Yr.get(t, r)).sum();
            assert!(combo >= data.outputs().get(i, r) - 1e-5);
        }
    }
}

#[test]
fn test_radial_output_crs_is_reciprocal_of_input() {
    let data = sample();
    let input = radial(&data, &RadialOptions::default(), &DeaSettings::default()).unwrap();
    let output = radial(
        &data,
        &RadialOptions {
            orientation: Orientation::Output,
            ..RadialOptions::default()
        },
        &DeaSettings::default(),
    )
    .unwrap();

    for (&theta, &phi) in input.efficiency().iter().zip(output.efficiency()) {
        // under constant returns the oriented measures are reciprocal
        assert!(phi >= 1.0 - 1e-6);
        assert_relative_eq!(phi, 1.0 / theta, epsilon = 1e-5);
    }
}

#[test]
fn test_radial_vrs_peer_rows_sum_to_one() {
    let data = sample();
    let model = radial(
        &data,
        &RadialOptions {
            rts: Rts::Vrs,
            ..RadialOptions::default()
        },
        &DeaSettings::default(),
    )
    .unwrap();

    for i in 0..model.nunits() {
        assert_relative_eq!(model.peers().row_sum(i), 1.0, epsilon = 1e-6);
        assert!(model.efficiency()[i] <= 1.0 + 1e-6);
    }
}

#[test]
fn test_radial_slacks_are_nonnegative_and_consistent() {
    let data = sample();
    let model = radial(&data, &RadialOptions::default(), &DeaSettings::default()).unwrap();

    let sx = model.slacks_x().unwrap();
    let sy = model.slacks_y().unwrap();
    let tx = model.targets_x().unwrap();
    let ty = model.targets_y().unwrap();

    for i in 0..model.nunits() {
        let theta = model.efficiency()[i];
        for j in 0..model.ninputs() {
            assert!(sx.get(i, j) >= 0.0);
            // target = radial projection minus residual slack
            assert_relative_eq!(
                tx.get(i, j),
                theta * data.inputs().get(i, j) - sx.get(i, j),
                epsilon = 1e-9
            );
        }
        for r in 0..model.noutputs() {
            assert!(sy.get(i, r) >= 0.0);
            assert_relative_eq!(
                ty.get(i, r),
                data.outputs().get(i, r) + sy.get(i, r),
                epsilon = 1e-9
            );
        }
    }
}

#[test]
fn test_radial_weak_output_disposal_under_input_orientation() {
    let X = DenseMatrix::from_rows(&[vec![1.0], vec![2.0]]);
    let Y = DenseMatrix::from_rows(&[vec![1.0], vec![1.0]]);
    let data = ProblemData::new(&X, &Y).unwrap();

    let model = radial(
        &data,
        &RadialOptions {
            rts: Rts::Vrs,
            dispos_y: Disposability::Weak,
            ..RadialOptions::default()
        },
        &DeaSettings::default(),
    )
    .unwrap();

    assert_relative_eq!(model.efficiency()[0], 1.0, epsilon = 1e-6);
    assert_relative_eq!(model.efficiency()[1], 0.5, epsilon = 1e-6);
}

#[test]
fn test_radial_named_units() {
    let X = DenseMatrix::from_rows(&[vec![1.0], vec![2.0]]);
    let Y = DenseMatrix::from_rows(&[vec![1.0], vec![1.0]]);
    let data = ProblemData::new(&X, &Y)
        .unwrap()
        .with_names(["A", "B"])
        .unwrap();

    let model = radial(&data, &RadialOptions::default(), &DeaSettings::default()).unwrap();
    assert_eq!(model.names().unwrap(), &["A".to_string(), "B".to_string()]);
}
