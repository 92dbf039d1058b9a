// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use approx::assert_abs_diff_eq;
use ndarray::Axis;
use rstest::rstest;
use shiftmi::estimators::approaches::binned::binning::{BinGrid, BinIndex};
use shiftmi::estimators::approaches::binned::bootstrap::{
    bootstrapped_mutual_information, shifted_mutual_information_with_bootstrap,
    shifted_mutual_information_with_bootstrap_into,
};
use shiftmi::estimators::approaches::binned::shift_scan::shifted_mutual_information;
use shiftmi::estimators::config::{BootstrapParams, ShiftRange};
use shiftmi::estimators::error::MiError;
use shiftmi::estimators::mutual_information::ShiftedMutualInformation;

use crate::test_helpers::{sinusoid, uniform_noise, SeedableRng, StdRng};

fn sinusoid_estimator(shifts: ShiftRange) -> ShiftedMutualInformation<f64> {
    let x = sinusoid(1000);
    let grid = BinGrid::new(10, -1.0, 1.0).unwrap();
    ShiftedMutualInformation::new(grid, grid, &x, &x, shifts).unwrap()
}

#[test]
fn result_has_one_row_per_shift() {
    let x = sinusoid(1000);
    let result =
        shifted_mutual_information_with_bootstrap(-100, 100, 10, 10, (-1.0, 1.0), (-1.0, 1.0), &x, &x, 100, 10, 1)
            .unwrap();
    assert_eq!(result.dim(), (201, 10));
    assert!(result.iter().all(|v| v.is_finite() && *v >= 0.0));
}

#[test]
fn mean_follows_plain_estimate() {
    let x = sinusoid(1000);
    let plain =
        shifted_mutual_information(-100, 100, 10, 10, (-1.0, 1.0), (-1.0, 1.0), &x, &x, 10).unwrap();
    let boot = sinusoid_estimator(ShiftRange::new(-100, 100, 10))
        .bootstrap(&BootstrapParams::new(100, 100).with_seed(2024))
        .unwrap();
    assert_eq!(boot.dim(), (21, 100));
    let means = boot.mean_axis(Axis(1)).unwrap();
    for (mean, expected) in means.iter().zip(plain.iter()) {
        assert_abs_diff_eq!(*mean, *expected, epsilon = 0.1);
    }
    // Resampling spreads the estimates.
    let spread = boot.row(10).std(1.0);
    assert!(spread > 0.0 && spread < 0.2, "std {spread}");
}

#[test]
fn unseeded_runs_differ() {
    let estimator = sinusoid_estimator(ShiftRange::new(-5, 5, 1));
    let params = BootstrapParams::new(50, 4);
    let a = estimator.bootstrap(&params).unwrap();
    let b = estimator.bootstrap(&params).unwrap();
    assert_ne!(a, b);
}

#[test]
fn repetitions_of_one_shift_differ() {
    let estimator = sinusoid_estimator(ShiftRange::new(-5, 5, 1));
    let result = estimator
        .bootstrap(&BootstrapParams::new(50, 8).with_seed(1))
        .unwrap();
    let row = result.row(3);
    assert!(row.iter().any(|v| *v != row[0]));
}

#[test]
fn fixed_seed_is_reproducible() {
    let estimator = sinusoid_estimator(ShiftRange::new(-20, 20, 4));
    let params = BootstrapParams::new(100, 5).with_seed(7);
    let a = estimator.bootstrap(&params).unwrap();
    let b = estimator.bootstrap(&params).unwrap();
    assert_eq!(a, b);

    let c = estimator.bootstrap(&params.with_seed(8)).unwrap();
    assert_ne!(a, c);
}

#[test]
fn into_writes_row_major() {
    let estimator = sinusoid_estimator(ShiftRange::new(-10, 10, 5));
    let params = BootstrapParams::new(20, 3).with_seed(99);
    let expected = estimator.bootstrap(&params).unwrap();
    let mut out = vec![0.0; 15];
    estimator.bootstrap_into(&params, &mut out).unwrap();
    assert_eq!(out, expected.iter().copied().collect::<Vec<_>>());

    let x = sinusoid(1000);
    let mut short = vec![0.0; 14];
    let err = shifted_mutual_information_with_bootstrap_into(
        -10, 10, 10, 10, (-1.0, 1.0), (-1.0, 1.0), &x, &x, 20, 3, 5, &mut short,
    )
    .unwrap_err();
    assert_eq!(err, MiError::SizeMismatch { left: 14, right: 15 });
}

#[rstest]
#[case(0, 10)]
#[case(10, 0)]
#[case(901, 10)]
fn invalid_parameters_are_rejected(#[case] nr_samples: usize, #[case] nr_repetitions: usize) {
    let x = sinusoid(1000);
    let err = shifted_mutual_information_with_bootstrap(
        -100, 100, 10, 10, (-1.0, 1.0), (-1.0, 1.0), &x, &x, nr_samples, nr_repetitions, 1,
    )
    .unwrap_err();
    assert!(matches!(err, MiError::InvalidArgument(_)));
}

#[test]
fn largest_valid_sample_count_is_accepted() {
    let estimator = sinusoid_estimator(ShiftRange::new(-100, 100, 100));
    let result = estimator
        .bootstrap(&BootstrapParams::new(900, 1).with_seed(3))
        .unwrap();
    assert_eq!(result.dim(), (3, 1));
}

#[test]
fn single_estimate_checks_inputs() {
    let grid = BinGrid::new(4, 0.0, 1.0).unwrap();
    let ix = grid.map_indices(&uniform_noise(40, 1));
    let iy = grid.map_indices(&uniform_noise(40, 2));
    let mut rng = StdRng::seed_from_u64(0);

    let err = bootstrapped_mutual_information(&ix, &iy[1..], &grid, &grid, 4, &mut rng).unwrap_err();
    assert_eq!(err, MiError::SizeMismatch { left: 40, right: 39 });
    let err = bootstrapped_mutual_information(&ix, &iy, &grid, &grid, 0, &mut rng).unwrap_err();
    assert!(matches!(err, MiError::InvalidArgument(_)));
    let err = bootstrapped_mutual_information(&ix, &iy, &grid, &grid, 41, &mut rng).unwrap_err();
    assert!(matches!(err, MiError::InvalidArgument(_)));

    let mi = bootstrapped_mutual_information(&ix, &iy, &grid, &grid, 4, &mut rng).unwrap();
    assert!(mi >= 0.0);
}

#[test]
fn single_estimate_of_identical_indices() {
    // Equal series: the estimate is the entropy of the resampled bin, close to one bit.
    let grid = BinGrid::new(2, 0.0_f64, 1.0).unwrap();
    let ix: Vec<BinIndex> = (0..200).map(|i| BinIndex::Valid(i % 2)).collect();
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..10 {
        let mi = bootstrapped_mutual_information(&ix, &ix, &grid, &grid, 10, &mut rng).unwrap();
        assert!((mi - 1.0).abs() < 0.1, "mi {mi}");
    }
}
