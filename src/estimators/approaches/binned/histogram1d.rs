// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::Array1;

use crate::estimators::approaches::binned::binning::{BinGrid, BinIndex};
use crate::estimators::error::{MiError, Result};
use crate::estimators::traits::Real;

/// One-dimensional histogram over a fixed [`BinGrid`].
///
/// Values outside the grid (and NaN) are skipped on insertion, so `count()` can be
/// lower than the number of inserted samples. `count()` always equals the sum of
/// `counts()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram1D<T> {
    grid: BinGrid<T>,
    counts: Array1<u64>,
    count: u64,
}

impl<T: Real> Histogram1D<T> {
    /// Empty histogram over `grid`.
    pub fn new(grid: BinGrid<T>) -> Self {
        Self {
            counts: Array1::zeros(grid.bins()),
            count: 0,
            grid,
        }
    }

    /// Histogram of `values` over their own finite range.
    pub fn from_data(bins: usize, values: &[T]) -> Result<Self> {
        let grid = BinGrid::from_data("value", bins, values, None, None)?;
        let mut hist = Self::new(grid);
        hist.calculate(values);
        Ok(hist)
    }

    /// Wrap an existing count vector, e.g. a marginal of a joint histogram.
    pub fn from_counts(grid: BinGrid<T>, counts: Array1<u64>, count: u64) -> Result<Self> {
        if counts.len() != grid.bins() {
            return Err(MiError::InvalidArgument(format!(
                "count vector has {} entries but the histogram has {} bins",
                counts.len(),
                grid.bins()
            )));
        }
        if counts.sum() != count {
            return Err(MiError::InvalidArgument(format!(
                "element count {count} does not match the sum of the bins ({})",
                counts.sum()
            )));
        }
        Ok(Self {
            grid,
            counts,
            count,
        })
    }

    /// Insert raw values. Calls accumulate.
    pub fn calculate(&mut self, values: &[T]) {
        for &value in values {
            self.transfer(self.grid.map(value));
        }
    }

    /// Insert precomputed bin indices. Calls accumulate.
    pub fn increment(&mut self, indices: &[BinIndex]) {
        for &index in indices {
            self.transfer(index);
        }
    }

    #[inline]
    fn transfer(&mut self, index: BinIndex) {
        if let Some(i) = index.get().filter(|&i| i < self.grid.bins()) {
            self.counts[i] += 1;
            self.count += 1;
        }
    }

    pub fn counts(&self) -> &Array1<u64> {
        &self.counts
    }

    /// Total number of inserted (in-range) elements.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn bins(&self) -> usize {
        self.grid.bins()
    }

    pub fn range(&self) -> (T, T) {
        self.grid.range()
    }

    pub fn min(&self) -> T {
        self.grid.min()
    }

    pub fn max(&self) -> T {
        self.grid.max()
    }

    pub fn grid(&self) -> &BinGrid<T> {
        &self.grid
    }

    /// Shannon entropy of the bin distribution in bits.
    pub fn entropy(&self) -> Result<T> {
        if self.count == 0 {
            return Err(MiError::EmptyHistogram);
        }
        let n = T::from_count(self.count);
        // -sum(p * log2 p) over occupied bins
        let h = self
            .counts
            .iter()
            .filter(|&&c| c > 0)
            .fold(T::zero(), |acc, &c| {
                let p = T::from_count(c) / n;
                acc - p * p.log2()
            });
        Ok(h)
    }
}
