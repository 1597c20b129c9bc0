#![allow(non_snake_case)]
use approx::assert_relative_eq;
use envelo::{algebra::*, model::*};

// Three units on a line: the first is the only efficient one.
fn line() -> ProblemData<f64> {
    let X = DenseMatrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]);
    let Y = DenseMatrix::from_rows(&[vec![1.0], vec![1.0], vec![1.0]]);
    ProblemData::new(&X, &Y).unwrap()
}

#[test]
fn test_additive_ones_vrs() {
    let data = line();
    let model = additive(&data, &AdditiveOptions::default(), &DeaSettings::default()).unwrap();

    assert_eq!(model.scheme(), "Ones");
    let eff = model.efficiency();
    assert_relative_eq!(eff[0], 0.0, epsilon = 1e-6);
    assert_relative_eq!(eff[1], 1.0, epsilon = 1e-6);
    assert_relative_eq!(eff[2], 2.0, epsilon = 1e-6);

    // the inefficient units project onto the first one
    for i in 1..3 {
        assert_relative_eq!(model.peers().get(i, 0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(model.targets_x().unwrap().get(i, 0), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn test_additive_mip_weights_scale_slacks() {
    let data = line();
    let model = additive(
        &data,
        &AdditiveOptions {
            scheme: AdditiveScheme::Mip,
            ..AdditiveOptions::default()
        },
        &DeaSettings::default(),
    )
    .unwrap();

    // slack over own value: 1/2 and 2/3
    let eff = model.efficiency();
    assert_relative_eq!(eff[1], 0.5, epsilon = 1e-6);
    assert_relative_eq!(eff[2], 2.0 / 3.0, epsilon = 1e-6);
}

#[test]
fn test_additive_ram_and_bam() {
    let data = line();

    let ram = additive(
        &data,
        &AdditiveOptions {
            scheme: AdditiveScheme::Ram,
            ..AdditiveOptions::default()
        },
        &DeaSettings::default(),
    )
    .unwrap();
    // input range 2, two active dimensions; the zero-range output column
    // drops out of the objective
    assert_relative_eq!(ram.efficiency()[1], 0.25, epsilon = 1e-6);
    assert_relative_eq!(ram.efficiency()[2], 0.5, epsilon = 1e-6);

    let bam = additive(
        &data,
        &AdditiveOptions {
            scheme: AdditiveScheme::Bam,
            ..AdditiveOptions::default()
        },
        &DeaSettings::default(),
    )
    .unwrap();
    assert_relative_eq!(bam.efficiency()[1], 0.5, epsilon = 1e-6);
    assert_relative_eq!(bam.efficiency()[2], 0.5, epsilon = 1e-6);
}

#[test]
fn test_additive_bam_crs_stays_bounded() {
    let X = DenseMatrix::from_rows(&[vec![2.0, 2.0], vec![4.0, 6.0], vec![8.0, 4.0]]);
    let Y = DenseMatrix::from_rows(&[vec![2.0], vec![5.0], vec![4.0]]);
    let data = ProblemData::new(&X, &Y).unwrap();

    let model = additive(
        &data,
        &AdditiveOptions {
            scheme: AdditiveScheme::Bam,
            rts: Rts::Crs,
            ..AdditiveOptions::default()
        },
        &DeaSettings::default(),
    )
    .unwrap();

    // without the min/max projection bounds this program is unbounded
    assert!(model.warnings().is_empty());
    for &e in model.efficiency() {
        let e: f64 = e;
        assert!(e.is_finite() && e >= -1e-9);
    }
}

#[test]
fn test_additive_slacks_nonnegative_and_vrs_peer_sums() {
    let X = DenseMatrix::from_rows(&[
        vec![5.0, 13.0],
        vec![16.0, 12.0],
        vec![16.0, 26.0],
        vec![17.0, 15.0],
        vec![18.0, 14.0],
        vec![23.0, 6.0],
    ]);
    let Y = DenseMatrix::from_rows(&[
        vec![12.0],
        vec![14.0],
        vec![25.0],
        vec![26.0],
        vec![8.0],
        vec![9.0],
    ]);
    let data = ProblemData::new(&X, &Y).unwrap();
    let model = additive(&data, &AdditiveOptions::default(), &DeaSettings::default()).unwrap();

    for i in 0..model.nunits() {
        assert_relative_eq!(model.peers().row_sum(i), 1.0, epsilon = 1e-6);
        assert!(model.efficiency()[i] >= -1e-9);
        for j in 0..model.ninputs() {
            assert!(model.slacks_x().unwrap().get(i, j) >= 0.0);
        }
        for r in 0..model.noutputs() {
            assert!(model.slacks_y().unwrap().get(i, r) >= 0.0);
        }
    }
}

#[test]
fn test_additive_input_orientation_ignores_output_slack() {
    // the second unit wastes input and underproduces; input orientation
    // only credits the input side to the objective
    let X = DenseMatrix::from_rows(&[vec![1.0], vec![2.0]]);
    let Y = DenseMatrix::from_rows(&[vec![2.0], vec![1.0]]);
    let data = ProblemData::new(&X, &Y).unwrap();

    let model = additive(
        &data,
        &AdditiveOptions {
            orientation: Orientation::Input,
            ..AdditiveOptions::default()
        },
        &DeaSettings::default(),
    )
    .unwrap();

    assert_relative_eq!(model.efficiency()[1], 1.0, epsilon = 1e-6);
    // the output shortfall is still closed by the feasibility slack
    assert_relative_eq!(model.slacks_y().unwrap().get(1, 0), 1.0, epsilon = 1e-6);
}

#[test]
fn test_additive_weak_output_disposal_pins_output_slack() {
    let X = DenseMatrix::from_rows(&[vec![1.0], vec![2.0]]);
    let Y = DenseMatrix::from_rows(&[vec![1.0], vec![1.0]]);
    let data = ProblemData::new(&X, &Y).unwrap();

    let model = additive(
        &data,
        &AdditiveOptions {
            dispos_y: Disposability::Weak,
            ..AdditiveOptions::default()
        },
        &DeaSettings::default(),
    )
    .unwrap();

    for i in 0..2 {
        assert_eq!(model.slacks_y().unwrap().get(i, 0), 0.0);
    }
    assert_relative_eq!(model.efficiency()[1], 1.0, epsilon = 1e-6);
}
