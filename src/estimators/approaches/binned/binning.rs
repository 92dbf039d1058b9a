// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of raw samples onto histogram bins.
//!
//! Indices are computed once per sample and then reused for every shift, which
//! keeps the range arithmetic out of the scan loop.

use num_traits::ToPrimitive;
use rayon::prelude::*;

use crate::estimators::error::{MiError, Result};
use crate::estimators::traits::Real;
use crate::estimators::utils::thread_pool;

/// Below this length index mapping runs on the calling thread.
const PARALLEL_MIN_LEN: usize = 4096;

/// Bin of a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BinIndex {
    /// Index in `[0, bins)`.
    Valid(u32),
    /// The sample was outside `[min, max]` or NaN.
    #[default]
    OutOfRange,
}

impl BinIndex {
    /// The index as `usize`, or `None` for out-of-range samples.
    #[inline]
    pub fn get(self) -> Option<usize> {
        match self {
            BinIndex::Valid(i) => Some(i as usize),
            BinIndex::OutOfRange => None,
        }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        matches!(self, BinIndex::Valid(_))
    }
}

/// Equal-width partition of `[min, max]` into `bins` bins.
///
/// The interval is half-open per bin, except that `max` itself falls into the
/// last bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinGrid<T> {
    bins: usize,
    min: T,
    max: T,
}

impl<T: Real> BinGrid<T> {
    pub fn new(bins: usize, min: T, max: T) -> Result<Self> {
        Self::new_for_axis("value", bins, min, max)
    }

    /// Like [`BinGrid::new`], naming `axis` in error messages.
    pub fn new_for_axis(axis: &'static str, bins: usize, min: T, max: T) -> Result<Self> {
        if bins < 1 {
            return Err(MiError::InvalidArgument(format!(
                "there must be at least one bin on the {axis} axis"
            )));
        }
        if bins > u32::MAX as usize {
            return Err(MiError::InvalidArgument(format!(
                "too many bins on the {axis} axis: {bins}"
            )));
        }
        if !(min < max) || !min.is_finite() || !max.is_finite() {
            return Err(MiError::InvalidRange {
                axis,
                min: min.to_f64().unwrap_or(f64::NAN),
                max: max.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(Self { bins, min, max })
    }

    /// Build a grid whose missing bounds come from the finite extrema of `values`.
    pub fn from_data(
        axis: &'static str,
        bins: usize,
        values: &[T],
        min: Option<T>,
        max: Option<T>,
    ) -> Result<Self> {
        if let (Some(min), Some(max)) = (min, max) {
            return Self::new_for_axis(axis, bins, min, max);
        }
        let (lo, hi) = finite_extrema(values).ok_or_else(|| {
            MiError::InvalidArgument(format!(
                "cannot derive a range for the {axis} axis: data has no finite values"
            ))
        })?;
        Self::new_for_axis(axis, bins, min.unwrap_or(lo), max.unwrap_or(hi))
    }

    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    #[inline]
    pub fn min(&self) -> T {
        self.min
    }

    #[inline]
    pub fn max(&self) -> T {
        self.max
    }

    pub fn range(&self) -> (T, T) {
        (self.min, self.max)
    }

    /// Bin of `value`. NaN compares false to both bounds and is out of range.
    #[inline]
    pub fn map(&self, value: T) -> BinIndex {
        if value >= self.min && value < self.max {
            let scaled = (self.fraction(value) * T::from_count(self.bins as u64)).floor();
            match scaled.to_usize() {
                // Rounding can push values just below max onto `bins`.
                Some(index) => BinIndex::Valid(index.min(self.bins - 1) as u32),
                None => BinIndex::OutOfRange,
            }
        } else if value == self.max {
            BinIndex::Valid((self.bins - 1) as u32)
        } else {
            BinIndex::OutOfRange
        }
    }

    /// Position of `value` inside `[min, max]` as a fraction in `[0, 1]`.
    ///
    /// Bounds far apart (e.g. `-MAX..MAX`) overflow `max - min`; those are
    /// measured on halved values instead.
    #[inline]
    fn fraction(&self, value: T) -> T {
        let width = self.max - self.min;
        if width.is_finite() {
            (value - self.min) / width
        } else {
            let two = T::from_count(2);
            (value / two - self.min / two) / (self.max / two - self.min / two)
        }
    }

    /// Map every value. Each element is independent, so long inputs are split
    /// across the worker pool.
    pub fn map_indices(&self, values: &[T]) -> Vec<BinIndex> {
        if values.len() < PARALLEL_MIN_LEN {
            return values.iter().map(|&v| self.map(v)).collect();
        }
        thread_pool::install(|| values.par_iter().map(|&v| self.map(v)).collect())
    }
}

/// Bin index of a single value under `bins` bins over `[min, max]`.
pub fn map_index<T: Real>(bins: usize, min: T, max: T, value: T) -> Result<BinIndex> {
    Ok(BinGrid::new(bins, min, max)?.map(value))
}

/// Bin indices of all `values`; the parameters are checked once for the batch.
pub fn map_indices<T: Real>(bins: usize, min: T, max: T, values: &[T]) -> Result<Vec<BinIndex>> {
    Ok(BinGrid::new(bins, min, max)?.map_indices(values))
}

/// Smallest and largest finite value, ignoring NaN and infinities.
pub fn finite_extrema<T: Real>(values: &[T]) -> Option<(T, T)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
