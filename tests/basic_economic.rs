#![allow(non_snake_case)]
use approx::assert_relative_eq;
use envelo::{algebra::*, model::*};

#[test]
fn test_revenue_decomposition() {
    // five units, one input, two outputs, unit prices
    let X = DenseMatrix::from_rows(&vec![vec![1.0]; 5]);
    let Y = DenseMatrix::from_rows(&[
        vec![7.0, 7.0],
        vec![4.0, 8.0],
        vec![8.0, 4.0],
        vec![3.0, 5.0],
        vec![3.0, 3.0],
    ]);
    let P = DenseMatrix::from_rows(&vec![vec![1.0, 1.0]; 5]);
    let data = ProblemData::new(&X, &Y).unwrap();

    let model = revenue(&data, &P, &RevenueOptions::default(), &DeaSettings::default()).unwrap();

    let eff = model.efficiency();
    assert_relative_eq!(eff[0], 1.0, epsilon = 1e-6);
    assert_relative_eq!(eff[1], 6.0 / 7.0, epsilon = 1e-6);
    assert_relative_eq!(eff[2], 6.0 / 7.0, epsilon = 1e-6);
    assert_relative_eq!(eff[3], 4.0 / 7.0, epsilon = 1e-6);
    assert_relative_eq!(eff[4], 3.0 / 7.0, epsilon = 1e-6);

    // maximal revenue is 14 everywhere
    for &r in model.maximal() {
        assert_relative_eq!(r, 14.0, epsilon = 1e-5);
    }

    // the fourth unit: technical 9/14, allocative 8/9
    assert_relative_eq!(model.technical()[3], 9.0 / 14.0, epsilon = 1e-5);
    assert_relative_eq!(model.allocative()[3], 8.0 / 9.0, epsilon = 1e-5);

    // efficiency = technical x allocative, all components in (0, 1]
    for i in 0..5 {
        assert_relative_eq!(
            eff[i],
            model.technical()[i] * model.allocative()[i],
            epsilon = 1e-6
        );
        assert!(model.technical()[i] > 0.0 && model.technical()[i] <= 1.0 + 1e-6);
        assert!(model.allocative()[i] > 0.0 && model.allocative()[i] <= 1.0 + 1e-6);
    }
}

#[test]
fn test_cost_decomposition() {
    // five units, two inputs, one common output, unit prices
    let X = DenseMatrix::from_rows(&[
        vec![2.0, 2.0],
        vec![1.0, 4.0],
        vec![4.0, 1.0],
        vec![4.0, 4.0],
        vec![5.0, 5.0],
    ]);
    let Y = DenseMatrix::from_rows(&vec![vec![1.0]; 5]);
    let W = DenseMatrix::from_rows(&vec![vec![1.0, 1.0]; 5]);
    let data = ProblemData::new(&X, &Y).unwrap();

    let model = cost(&data, &W, &CostOptions::default(), &DeaSettings::default()).unwrap();

    let eff = model.efficiency();
    assert_relative_eq!(eff[0], 1.0, epsilon = 1e-6);
    assert_relative_eq!(eff[1], 4.0 / 5.0, epsilon = 1e-6);
    assert_relative_eq!(eff[2], 4.0 / 5.0, epsilon = 1e-6);
    assert_relative_eq!(eff[3], 0.5, epsilon = 1e-6);

    // minimal cost is 4 everywhere
    for &c in model.minimal() {
        assert_relative_eq!(c, 4.0, epsilon = 1e-5);
    }

    // the fourth unit is purely technically inefficient
    assert_relative_eq!(model.technical()[3], 0.5, epsilon = 1e-5);
    assert_relative_eq!(model.allocative()[3], 1.0, epsilon = 1e-5);
    // the second is technically efficient but in the wrong input mix
    assert_relative_eq!(model.technical()[1], 1.0, epsilon = 1e-5);
    assert_relative_eq!(model.allocative()[1], 4.0 / 5.0, epsilon = 1e-5);

    for i in 0..5 {
        assert_relative_eq!(
            eff[i],
            model.technical()[i] * model.allocative()[i],
            epsilon = 1e-6
        );
    }
}

#[test]
fn test_profit_decomposition_unit_directions() {
    let X = DenseMatrix::from_rows(&[vec![1.0], vec![2.0]]);
    let Y = DenseMatrix::from_rows(&[vec![2.0], vec![2.0]]);
    let W = DenseMatrix::from_rows(&[vec![1.0], vec![1.0]]);
    let P = DenseMatrix::from_rows(&[vec![1.0], vec![1.0]]);
    let data = ProblemData::new(&X, &Y).unwrap();

    let model = profit(
        &data,
        &W,
        &P,
        &ProfitOptions {
            gx: DirectionScheme::Ones,
            gy: DirectionScheme::Ones,
        },
        &DeaSettings::default(),
    )
    .unwrap();

    // maximal profit 1 is earned by the first unit
    assert_relative_eq!(model.maximal()[0], 1.0, epsilon = 1e-5);
    assert_relative_eq!(model.efficiency()[0], 0.0, epsilon = 1e-5);

    // the second unit loses one money unit, normalized by p'Gy + w'Gx = 2
    assert_relative_eq!(model.efficiency()[1], 0.5, epsilon = 1e-5);
    // it sits on the frontier, so the loss is purely allocative
    assert_relative_eq!(model.technical()[1], 0.0, epsilon = 1e-5);
    assert_relative_eq!(model.allocative()[1], 0.5, epsilon = 1e-5);

    // profit inefficiency = technical + allocative
    for i in 0..2 {
        assert_relative_eq!(
            model.efficiency()[i],
            model.technical()[i] + model.allocative()[i],
            epsilon = 1e-6
        );
    }
}

#[test]
fn test_profit_monetary_directions() {
    let X = DenseMatrix::from_rows(&[vec![1.0], vec![2.0]]);
    let Y = DenseMatrix::from_rows(&[vec![2.0], vec![2.0]]);
    let W = DenseMatrix::from_rows(&[vec![1.0], vec![1.0]]);
    let P = DenseMatrix::from_rows(&[vec![1.0], vec![1.0]]);
    let data = ProblemData::new(&X, &Y).unwrap();

    let model = profit(&data, &W, &P, &ProfitOptions::default(), &DeaSettings::default()).unwrap();

    // monetary directions normalize the gap to one money unit
    for &v in model.normalization() {
        assert_relative_eq!(v, 1.0, epsilon = 1e-9);
    }
    assert_relative_eq!(model.efficiency()[1], 1.0, epsilon = 1e-5);

    // targets are the profit-maximizing plan
    assert_relative_eq!(model.targets_x().unwrap().get(1, 0), 1.0, epsilon = 1e-4);
    assert_relative_eq!(model.targets_y().unwrap().get(1, 0), 2.0, epsilon = 1e-4);
}

#[test]
fn test_revenue_weak_input_disposal() {
    // weak input disposal forces the input envelopment to hold with equality
    let X = DenseMatrix::from_rows(&[vec![1.0], vec![2.0]]);
    let Y = DenseMatrix::from_rows(&[vec![3.0], vec![4.0]]);
    let P = DenseMatrix::from_rows(&[vec![1.0], vec![1.0]]);
    let data = ProblemData::new(&X, &Y).unwrap();

    let model = revenue(
        &data,
        &P,
        &RevenueOptions {
            dispos_x: Disposability::Weak,
            ..RevenueOptions::default()
        },
        &DeaSettings::default(),
    )
    .unwrap();

    // each unit's input level pins the attainable frontier point
    assert_relative_eq!(model.efficiency()[0], 1.0, epsilon = 1e-5);
    assert_relative_eq!(model.efficiency()[1], 1.0, epsilon = 1e-5);
}
