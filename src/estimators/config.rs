// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scan configuration.
//!
//! Defaults mirror the command-line front end: shifts `-500..=500` in steps of one,
//! 10 x 10 bins with data-derived ranges, and 100 bootstrap samples.

use crate::estimators::approaches::binned::binning::BinGrid;
use crate::estimators::error::{MiError, Result};
use crate::estimators::mutual_information::{MutualInformation, ScanOutput};
use crate::estimators::traits::Real;

/// Inclusive range of shifts `from, from + step, ..., <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftRange {
    /// Smallest shift; may be negative (default: -500).
    pub from: i64,
    /// Largest shift; has to be greater than `from` (default: 500).
    pub to: i64,
    /// Distance between evaluated shifts (default: 1).
    pub step: usize,
}

impl Default for ShiftRange {
    fn default() -> Self {
        Self {
            from: -500,
            to: 500,
            step: 1,
        }
    }
}

impl ShiftRange {
    pub fn new(from: i64, to: i64, step: usize) -> Self {
        Self { from, to, step }
    }

    /// Check the range against series of length `n`.
    pub fn validate(&self, n: usize) -> Result<()> {
        if self.from >= self.to {
            return Err(MiError::InvalidArgument(format!(
                "shift_from ({}) has to be smaller than shift_to ({})",
                self.from, self.to
            )));
        }
        if self.step < 1 {
            return Err(MiError::InvalidArgument(
                "shift_step has to be at least 1".to_string(),
            ));
        }
        for shift in [self.from, self.to] {
            if shift.unsigned_abs() >= n as u64 {
                return Err(MiError::ShiftOutOfBounds { shift, len: n });
            }
        }
        Ok(())
    }

    /// Number of evaluated shifts: `(to - from) / step + 1`.
    pub fn len(&self) -> usize {
        if self.to < self.from || self.step == 0 {
            return 0;
        }
        let steps = self.to.abs_diff(self.from) / self.step as u64;
        usize::try_from(steps).unwrap_or(usize::MAX).saturating_add(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shift evaluated at output position `pos`.
    #[inline]
    pub fn shift_at(&self, pos: usize) -> i64 {
        // `pos < len()` keeps the sum inside `from..=to`; only the offset can exceed i64.
        self.from.wrapping_add_unsigned(pos as u64 * self.step as u64)
    }

    /// Output position of `shift`, if it is one of the evaluated shifts.
    pub fn position(&self, shift: i64) -> Option<usize> {
        if shift < self.from || shift > self.to || self.step == 0 {
            return None;
        }
        let offset = shift.abs_diff(self.from);
        let step = self.step as u64;
        if offset % step != 0 {
            return None;
        }
        usize::try_from(offset / step).ok()
    }

    /// Largest absolute shift, i.e. how much overlap is lost at worst.
    pub fn max_abs(&self) -> u64 {
        self.from.unsigned_abs().max(self.to.unsigned_abs())
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.len()).map(|pos| self.shift_at(pos))
    }
}

/// Binning of one axis. Missing bounds are taken from the data's finite extrema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSpec<T> {
    /// Number of bins (default: 10).
    pub bins: usize,
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Default for AxisSpec<T> {
    fn default() -> Self {
        Self {
            bins: 10,
            min: None,
            max: None,
        }
    }
}

impl<T: Real> AxisSpec<T> {
    pub fn new(bins: usize) -> Self {
        Self {
            bins,
            ..Self::default()
        }
    }

    pub fn with_range(mut self, min: T, max: T) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Resolve into a concrete grid for `values`.
    pub fn resolve(&self, axis: &'static str, values: &[T]) -> Result<BinGrid<T>> {
        BinGrid::from_data(axis, self.bins, values, self.min, self.max)
    }
}

/// Bootstrap resampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapParams {
    /// Histograms in the resampled ensemble (default: 100).
    pub nr_samples: usize,
    /// Independent bootstrap estimates per shift (default: 100).
    pub nr_repetitions: usize,
    /// Fixed base seed for reproducible runs; fresh entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for BootstrapParams {
    fn default() -> Self {
        Self {
            nr_samples: 100,
            nr_repetitions: 100,
            seed: None,
        }
    }
}

impl BootstrapParams {
    pub fn new(nr_samples: usize, nr_repetitions: usize) -> Self {
        Self {
            nr_samples,
            nr_repetitions,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the parameters against the smallest overlap of the scan.
    pub fn validate(&self, min_overlap: usize) -> Result<()> {
        if self.nr_samples < 1 {
            return Err(MiError::InvalidArgument(
                "nr_samples has to be at least 1".to_string(),
            ));
        }
        if self.nr_repetitions < 1 {
            return Err(MiError::InvalidArgument(
                "nr_repetitions has to be at least 1".to_string(),
            ));
        }
        if self.nr_samples > min_overlap {
            return Err(MiError::InvalidArgument(format!(
                "nr_samples ({}) exceeds the smallest overlap of the scan ({min_overlap})",
                self.nr_samples
            )));
        }
        Ok(())
    }
}

/// Complete description of a shifted mutual information scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig<T> {
    pub shifts: ShiftRange,
    pub x: AxisSpec<T>,
    pub y: AxisSpec<T>,
    /// Run the bootstrap estimator instead of the plain scan when set.
    pub bootstrap: Option<BootstrapParams>,
}

impl<T> Default for ScanConfig<T> {
    fn default() -> Self {
        Self {
            shifts: ShiftRange::default(),
            x: AxisSpec::default(),
            y: AxisSpec::default(),
            bootstrap: None,
        }
    }
}

impl<T: Real> ScanConfig<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shifts(mut self, from: i64, to: i64) -> Self {
        self.shifts.from = from;
        self.shifts.to = to;
        self
    }

    pub fn with_step(mut self, step: usize) -> Self {
        self.shifts.step = step;
        self
    }

    pub fn with_bins(mut self, bins_x: usize, bins_y: usize) -> Self {
        self.x.bins = bins_x;
        self.y.bins = bins_y;
        self
    }

    pub fn with_range_x(mut self, min: T, max: T) -> Self {
        self.x = self.x.with_range(min, max);
        self
    }

    pub fn with_range_y(mut self, min: T, max: T) -> Self {
        self.y = self.y.with_range(min, max);
        self
    }

    pub fn with_bootstrap(mut self, nr_samples: usize, nr_repetitions: usize) -> Self {
        let seed = self.bootstrap.and_then(|b| b.seed);
        self.bootstrap = Some(BootstrapParams {
            nr_samples,
            nr_repetitions,
            seed,
        });
        self
    }

    /// Fix the bootstrap seed; enables bootstrapping with default parameters if
    /// it was not configured yet.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.bootstrap = Some(self.bootstrap.unwrap_or_default().with_seed(seed));
        self
    }

    /// Validate, precompute indices and run the configured scan.
    pub fn run(&self, x: &[T], y: &[T]) -> Result<ScanOutput<T>> {
        let estimator = MutualInformation::new_shifted(x, y, self)?;
        match &self.bootstrap {
            Some(params) => estimator.bootstrap(params).map(ScanOutput::Bootstrap),
            None => estimator.values().map(ScanOutput::Plain),
        }
    }
}
