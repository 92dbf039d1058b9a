// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use approx::assert_abs_diff_eq;
use rstest::rstest;
use shiftmi::estimators::approaches::binned::binning::BinGrid;
use shiftmi::estimators::approaches::binned::shift_scan::{
    mutual_information_at, shifted_mutual_information, shifted_mutual_information_into,
};
use shiftmi::estimators::config::ShiftRange;
use shiftmi::estimators::error::MiError;
use shiftmi::estimators::mutual_information::MutualInformation;

use crate::test_helpers::{
    argmax, sinusoid, triangle_wave, uniform_noise, SeedableRng, StdRng, Rng, TRIANGLE_MI,
};

#[test]
fn triangle_wave_regression() {
    let x: Vec<f64> = triangle_wave();
    let mi = shifted_mutual_information(-5, 5, 5, 5, (0.0, 10.0), (0.0, 10.0), &x, &x, 1).unwrap();
    assert_eq!(mi.len(), TRIANGLE_MI.len());
    for (got, expected) in mi.iter().zip(TRIANGLE_MI) {
        assert_abs_diff_eq!(*got, expected, epsilon = 1e-5);
    }
}

#[test]
fn triangle_wave_regression_f32() {
    let x: Vec<f32> = triangle_wave();
    let mi = shifted_mutual_information(-5, 5, 5, 5, (0.0, 10.0), (0.0, 10.0), &x, &x, 1).unwrap();
    for (got, expected) in mi.iter().zip(TRIANGLE_MI) {
        assert_abs_diff_eq!(*got, expected as f32, epsilon = 1e-4);
    }
}

#[test]
fn step_selects_every_other_shift() {
    let x: Vec<f64> = triangle_wave();
    let mi = shifted_mutual_information(-5, 4, 5, 5, (0.0, 10.0), (0.0, 10.0), &x, &x, 2).unwrap();
    let expected = [0.954434, 0.684977, 1.085475, 1.085475, 0.684977];
    assert_eq!(mi.len(), expected.len());
    for (got, expected) in mi.iter().zip(expected) {
        assert_abs_diff_eq!(*got, expected, epsilon = 1e-5);
    }
}

#[test]
fn sinusoid_against_itself() {
    let x = sinusoid(1000);
    let mi = shifted_mutual_information(-100, 100, 10, 10, (-1.0, 1.0), (-1.0, 1.0), &x, &x, 1)
        .unwrap();
    assert_eq!(mi.len(), 201);
    assert_eq!(argmax(mi.iter().copied()), 100);
    assert_abs_diff_eq!(mi[100], 3.13355, epsilon = 1e-4);
    assert_abs_diff_eq!(mi[0], 1.24074, epsilon = 1e-4);
    // A series against itself is symmetric in the shift.
    for k in 0..100 {
        assert_abs_diff_eq!(mi[k], mi[200 - k], epsilon = 1e-12);
    }
}

#[test]
fn scan_is_deterministic() {
    let x = uniform_noise(800, 5);
    let y = uniform_noise(800, 6);
    let a = shifted_mutual_information(-50, 50, 6, 6, (0.0, 1.0), (0.0, 1.0), &x, &y, 1).unwrap();
    let b = shifted_mutual_information(-50, 50, 6, 6, (0.0, 1.0), (0.0, 1.0), &x, &y, 1).unwrap();
    assert_eq!(a, b);
}

#[test]
fn detects_lag_of_coupled_series() {
    let x = uniform_noise(500, 42);
    let mut rng = StdRng::seed_from_u64(43);
    // y leads x by three samples
    let y: Vec<f64> = (0..500)
        .map(|i| if i + 3 < 500 { x[i + 3] } else { rng.gen_range(0.0..1.0) })
        .collect();
    let mi = shifted_mutual_information(-10, 10, 8, 8, (0.0, 1.0), (0.0, 1.0), &x, &y, 1).unwrap();
    let shifts = ShiftRange::new(-10, 10, 1);
    let best = argmax(mi.iter().copied());
    assert_eq!(shifts.shift_at(best), 3);
    assert!(mi[best] > 2.5);
    for (pos, value) in mi.iter().enumerate() {
        if pos != best {
            assert!(*value < 0.5, "shift {} gave {}", shifts.shift_at(pos), value);
        }
    }
}

#[test]
fn into_matches_allocating_variant() {
    let x = sinusoid(300);
    let y: Vec<f64> = x.iter().map(|v| v * v).collect();
    let expected = shifted_mutual_information(-20, 30, 7, 5, (-1.0, 1.0), (0.0, 1.0), &x, &y, 3).unwrap();
    let mut out = vec![0.0; expected.len()];
    shifted_mutual_information_into(-20, 30, 7, 5, (-1.0, 1.0), (0.0, 1.0), &x, &y, 3, &mut out).unwrap();
    assert_eq!(out, expected.to_vec());
}

#[test]
fn into_rejects_wrong_buffer_length() {
    let x = sinusoid(100);
    let mut out = vec![0.0; 10];
    let err = shifted_mutual_information_into(-5, 5, 4, 4, (-1.0, 1.0), (-1.0, 1.0), &x, &x, 1, &mut out)
        .unwrap_err();
    assert_eq!(err, MiError::SizeMismatch { left: 10, right: 11 });
}

#[test]
fn single_shift_matches_scan() {
    let x = uniform_noise(400, 9);
    let y = uniform_noise(400, 10);
    let (gx, gy) = (BinGrid::new(4, 0.0, 1.0).unwrap(), BinGrid::new(6, 0.0, 1.0).unwrap());
    let (ix, iy) = (gx.map_indices(&x), gy.map_indices(&y));
    let mi = shifted_mutual_information(-30, 30, 4, 6, (0.0, 1.0), (0.0, 1.0), &x, &y, 5).unwrap();
    for (pos, shift) in ShiftRange::new(-30, 30, 5).iter().enumerate() {
        let single = mutual_information_at(&gx, &gy, &ix, &iy, shift).unwrap();
        assert_eq!(single, mi[pos]);
    }
}

#[test]
fn precomputed_indices_give_same_curve() {
    let x = sinusoid(600);
    let y = uniform_noise(600, 3);
    let (gx, gy) = (BinGrid::new(10, -1.0, 1.0).unwrap(), BinGrid::new(10, 0.0, 1.0).unwrap());
    let shifts = ShiftRange::new(-40, 40, 2);
    let estimator = MutualInformation::new_shifted_from_indices(
        gx,
        gy,
        gx.map_indices(&x),
        gy.map_indices(&y),
        shifts,
    )
    .unwrap();
    assert_eq!(estimator.len(), 41);
    assert_eq!(estimator.series_len(), 600);
    let expected =
        shifted_mutual_information(-40, 40, 10, 10, (-1.0, 1.0), (0.0, 1.0), &x, &y, 2).unwrap();
    assert_eq!(estimator.values().unwrap(), expected);
}

#[rstest]
#[case(-5, 21)]
#[case(-21, 5)]
#[case(-30, 30)]
fn shift_outside_series_is_rejected(#[case] from: i64, #[case] to: i64) {
    let x: Vec<f64> = triangle_wave();
    let err = shifted_mutual_information(from, to, 5, 5, (0.0, 10.0), (0.0, 10.0), &x, &x, 1).unwrap_err();
    assert!(matches!(err, MiError::ShiftOutOfBounds { len: 21, .. }));
}

#[rstest]
#[case(5, 5, 1)]
#[case(5, -5, 1)]
#[case(-5, 5, 0)]
fn invalid_shift_range_is_rejected(#[case] from: i64, #[case] to: i64, #[case] step: usize) {
    let x: Vec<f64> = triangle_wave();
    let err = shifted_mutual_information(from, to, 5, 5, (0.0, 10.0), (0.0, 10.0), &x, &x, step).unwrap_err();
    assert!(matches!(err, MiError::InvalidArgument(_)));
}

#[test]
fn invalid_bins_and_ranges_are_rejected() {
    let x: Vec<f64> = triangle_wave();
    let err = shifted_mutual_information(-5, 5, 0, 5, (0.0, 10.0), (0.0, 10.0), &x, &x, 1).unwrap_err();
    assert!(matches!(err, MiError::InvalidArgument(_)));
    let err = shifted_mutual_information(-5, 5, 5, 5, (0.0, 10.0), (3.0, 3.0), &x, &x, 1).unwrap_err();
    assert!(matches!(err, MiError::InvalidRange { axis: "y", .. }));
}

#[test]
fn different_lengths_are_rejected() {
    let x: Vec<f64> = triangle_wave();
    let err = shifted_mutual_information(-5, 5, 5, 5, (0.0, 10.0), (0.0, 10.0), &x, &x[1..], 1).unwrap_err();
    assert_eq!(err, MiError::SizeMismatch { left: 21, right: 20 });
}

#[test]
fn overlap_without_in_range_pairs_fails() {
    let x = vec![5.0; 50];
    let y = uniform_noise(50, 1);
    let err = shifted_mutual_information(-3, 3, 4, 4, (0.0, 1.0), (0.0, 1.0), &x, &y, 1).unwrap_err();
    assert_eq!(err, MiError::EmptyHistogram);
}

#[test]
fn into_reports_failure_of_a_late_shift() {
    // Only the leading samples of x are in range, so large positive shifts see none.
    let x: Vec<f64> = (0..40).map(|i| if i < 10 { 0.5 } else { 5.0 }).collect();
    let y = uniform_noise(40, 2);
    let mut out = vec![f64::NAN; 21];
    let err = shifted_mutual_information_into(-10, 10, 4, 4, (0.0, 1.0), (0.0, 1.0), &x, &y, 1, &mut out)
        .unwrap_err();
    assert_eq!(err, MiError::EmptyHistogram);
    assert_eq!(out.len(), 21);
}
