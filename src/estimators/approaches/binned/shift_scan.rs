// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mutual information as a function of the shift between two series.
//!
//! Every shift gets its own [`Histogram2D`] filled from the overlapping parts of
//! the precomputed index arrays. Shifts share nothing mutable and are spread
//! across the worker pool.

use ndarray::Array1;
use rayon::prelude::*;

use crate::estimators::approaches::binned::binning::{BinGrid, BinIndex};
use crate::estimators::approaches::binned::histogram2d::Histogram2D;
use crate::estimators::config::ShiftRange;
use crate::estimators::error::Result;
use crate::estimators::mutual_information::ShiftedMutualInformation;
use crate::estimators::traits::Real;
use crate::estimators::utils::shift_slicing::shifted_overlap;
use crate::estimators::utils::thread_pool;

/// Mutual information of `x` against `y` for every shift in
/// `shift_from, shift_from + shift_step, ..., <= shift_to`.
///
/// Position `k` of the result holds the shift `shift_from + k * shift_step`.
/// All parameters are checked before any histogram is built.
///
/// # Example
///
/// ```rust
/// use shiftmi::estimators::approaches::binned::shift_scan::shifted_mutual_information;
///
/// let x: Vec<f64> = (0..1000).map(|i| (0.01 * i as f64).sin()).collect();
/// let mi = shifted_mutual_information(-100, 100, 10, 10, (-1.0, 1.0), (-1.0, 1.0), &x, &x, 1).unwrap();
/// assert_eq!(mi.len(), 201);
/// ```
pub fn shifted_mutual_information<T: Real>(
    shift_from: i64,
    shift_to: i64,
    bins_x: usize,
    bins_y: usize,
    range_x: (T, T),
    range_y: (T, T),
    x: &[T],
    y: &[T],
    shift_step: usize,
) -> Result<Array1<T>> {
    let grid_x = BinGrid::new_for_axis("x", bins_x, range_x.0, range_x.1)?;
    let grid_y = BinGrid::new_for_axis("y", bins_y, range_y.0, range_y.1)?;
    let shifts = ShiftRange::new(shift_from, shift_to, shift_step);
    ShiftedMutualInformation::new(grid_x, grid_y, x, y, shifts)?.values()
}

/// Like [`shifted_mutual_information`], writing into a caller-owned buffer.
///
/// `out` must hold exactly `(shift_to - shift_from) / shift_step + 1` values.
///
/// On `Err` the contents of `out` are unspecified: shifts evaluated before the
/// failing one may already have been written.
pub fn shifted_mutual_information_into<T: Real>(
    shift_from: i64,
    shift_to: i64,
    bins_x: usize,
    bins_y: usize,
    range_x: (T, T),
    range_y: (T, T),
    x: &[T],
    y: &[T],
    shift_step: usize,
    out: &mut [T],
) -> Result<()> {
    let grid_x = BinGrid::new_for_axis("x", bins_x, range_x.0, range_x.1)?;
    let grid_y = BinGrid::new_for_axis("y", bins_y, range_y.0, range_y.1)?;
    let shifts = ShiftRange::new(shift_from, shift_to, shift_step);
    ShiftedMutualInformation::new(grid_x, grid_y, x, y, shifts)?.values_into(out)
}

/// Mutual information of one shift.
pub fn mutual_information_at<T: Real>(
    grid_x: &BinGrid<T>,
    grid_y: &BinGrid<T>,
    indices_x: &[BinIndex],
    indices_y: &[BinIndex],
    shift: i64,
) -> Result<T> {
    let (xs, ys) = shifted_overlap(indices_x, indices_y, shift);
    let mut hist = Histogram2D::new(*grid_x, *grid_y);
    hist.increment(xs, ys)?;
    hist.mutual_information()
}

/// Scan over already validated inputs; `out.len()` must equal `shifts.len()`.
pub(crate) fn scan_into<T: Real>(
    grid_x: &BinGrid<T>,
    grid_y: &BinGrid<T>,
    indices_x: &[BinIndex],
    indices_y: &[BinIndex],
    shifts: &ShiftRange,
    out: &mut [T],
) -> Result<()> {
    debug_assert_eq!(out.len(), shifts.len());
    thread_pool::install(|| {
        out.par_iter_mut().enumerate().try_for_each(|(pos, slot)| -> Result<()> {
            *slot = mutual_information_at(
                grid_x,
                grid_y,
                indices_x,
                indices_y,
                shifts.shift_at(pos),
            )?;
            Ok(())
        })
    })
}
