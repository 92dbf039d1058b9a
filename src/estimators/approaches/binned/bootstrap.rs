// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bootstrap estimate of the shifted mutual information.
//!
//! For one shift, a single estimate is obtained by
//!
//! 1. filling `nr_samples` small histograms with `floor(n / nr_samples)` index pairs
//!    each, drawn uniformly with replacement from the overlap,
//! 2. drawing `nr_samples` of these histograms with replacement and adding them up,
//! 3. taking the mutual information of the sum.
//!
//! Repeating this `nr_repetitions` times per shift gives a sample from which the
//! caller can compute mean and spread. Every (shift, repetition) pair gets its own
//! generator, see [`crate::estimators::utils::seeding`].

use ndarray::Array2;
use rand::Rng;
use rayon::prelude::*;

use crate::estimators::approaches::binned::binning::{BinGrid, BinIndex};
use crate::estimators::approaches::binned::histogram2d::Histogram2D;
use crate::estimators::config::{BootstrapParams, ShiftRange};
use crate::estimators::error::{MiError, Result};
use crate::estimators::mutual_information::ShiftedMutualInformation;
use crate::estimators::traits::Real;
use crate::estimators::utils::seeding::{iteration_rng, scan_seed};
use crate::estimators::utils::shift_slicing::shifted_overlap;
use crate::estimators::utils::thread_pool;

/// One bootstrap estimate of the mutual information between two aligned index arrays.
pub fn bootstrapped_mutual_information<T: Real, R: Rng + ?Sized>(
    indices_x: &[BinIndex],
    indices_y: &[BinIndex],
    grid_x: &BinGrid<T>,
    grid_y: &BinGrid<T>,
    nr_samples: usize,
    rng: &mut R,
) -> Result<T> {
    if indices_x.len() != indices_y.len() {
        return Err(MiError::SizeMismatch {
            left: indices_x.len(),
            right: indices_y.len(),
        });
    }
    if nr_samples < 1 {
        return Err(MiError::InvalidArgument(
            "nr_samples has to be at least 1".to_string(),
        ));
    }
    let n = indices_x.len();
    let sample_size = n / nr_samples;
    if sample_size == 0 {
        return Err(MiError::InvalidArgument(format!(
            "nr_samples ({nr_samples}) exceeds the number of index pairs ({n})"
        )));
    }

    let ensemble: Vec<Histogram2D<T>> = (0..nr_samples)
        .map(|_| {
            let mut hist = Histogram2D::new(*grid_x, *grid_y);
            for _ in 0..sample_size {
                let i = rng.gen_range(0..n);
                hist.increment_at(indices_x[i], indices_y[i]);
            }
            hist
        })
        .collect();

    let mut merged = Histogram2D::new(*grid_x, *grid_y);
    for _ in 0..nr_samples {
        merged.add(&ensemble[rng.gen_range(0..nr_samples)])?;
    }
    merged.mutual_information()
}

/// Bootstrap estimates for every shift in `shift_from ..= shift_to` (step `shift_step`).
///
/// Row `k` of the result holds the `nr_repetitions` estimates for the shift
/// `shift_from + k * shift_step`.
pub fn shifted_mutual_information_with_bootstrap<T: Real>(
    shift_from: i64,
    shift_to: i64,
    bins_x: usize,
    bins_y: usize,
    range_x: (T, T),
    range_y: (T, T),
    x: &[T],
    y: &[T],
    nr_samples: usize,
    nr_repetitions: usize,
    shift_step: usize,
) -> Result<Array2<T>> {
    let grid_x = BinGrid::new_for_axis("x", bins_x, range_x.0, range_x.1)?;
    let grid_y = BinGrid::new_for_axis("y", bins_y, range_y.0, range_y.1)?;
    let shifts = ShiftRange::new(shift_from, shift_to, shift_step);
    let params = BootstrapParams::new(nr_samples, nr_repetitions);
    ShiftedMutualInformation::new(grid_x, grid_y, x, y, shifts)?.bootstrap(&params)
}

/// Like [`shifted_mutual_information_with_bootstrap`], writing into a caller-owned
/// buffer laid out row-major with stride `nr_repetitions`.
///
/// On `Err` the contents of `out` are unspecified: shifts evaluated before the
/// failing one may already have been written.
pub fn shifted_mutual_information_with_bootstrap_into<T: Real>(
    shift_from: i64,
    shift_to: i64,
    bins_x: usize,
    bins_y: usize,
    range_x: (T, T),
    range_y: (T, T),
    x: &[T],
    y: &[T],
    nr_samples: usize,
    nr_repetitions: usize,
    shift_step: usize,
    out: &mut [T],
) -> Result<()> {
    let grid_x = BinGrid::new_for_axis("x", bins_x, range_x.0, range_x.1)?;
    let grid_y = BinGrid::new_for_axis("y", bins_y, range_y.0, range_y.1)?;
    let shifts = ShiftRange::new(shift_from, shift_to, shift_step);
    let params = BootstrapParams::new(nr_samples, nr_repetitions);
    ShiftedMutualInformation::new(grid_x, grid_y, x, y, shifts)?.bootstrap_into(&params, out)
}

/// Bootstrap scan over already validated inputs;
/// `out.len()` must equal `shifts.len() * params.nr_repetitions`.
pub(crate) fn scan_into<T: Real>(
    grid_x: &BinGrid<T>,
    grid_y: &BinGrid<T>,
    indices_x: &[BinIndex],
    indices_y: &[BinIndex],
    shifts: &ShiftRange,
    params: &BootstrapParams,
    out: &mut [T],
) -> Result<()> {
    debug_assert_eq!(out.len(), shifts.len() * params.nr_repetitions);
    let seed = scan_seed(params.seed);
    thread_pool::install(|| {
        out.par_chunks_mut(params.nr_repetitions)
            .enumerate()
            .try_for_each(|(pos, row)| -> Result<()> {
                let (xs, ys) = shifted_overlap(indices_x, indices_y, shifts.shift_at(pos));
                for (repetition, slot) in row.iter_mut().enumerate() {
                    let mut rng = iteration_rng(seed, pos, repetition);
                    *slot = bootstrapped_mutual_information(
                        xs,
                        ys,
                        grid_x,
                        grid_y,
                        params.nr_samples,
                        &mut rng,
                    )?;
                }
                Ok(())
            })
    })
}
