// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Joint histogram with lazily derived marginals and mutual information.
//!
//! The marginals and the mutual information are cached on first request. Every
//! mutating method drops both caches, so a cached value always describes the
//! current counts. The `*_forced` variants recompute unconditionally.

use ndarray::{Array2, Axis};

use crate::estimators::approaches::binned::binning::{BinGrid, BinIndex};
use crate::estimators::approaches::binned::histogram1d::Histogram1D;
use crate::estimators::error::{MiError, Result};
use crate::estimators::traits::Real;

/// Two-dimensional histogram over a pair of [`BinGrid`]s.
#[derive(Debug, Clone)]
pub struct Histogram2D<T> {
    grid_x: BinGrid<T>,
    grid_y: BinGrid<T>,
    /// `counts[[x, y]]`, shape `bins_x x bins_y`.
    counts: Array2<u64>,
    count: u64,
    marginals: Option<(Histogram1D<T>, Histogram1D<T>)>,
    mutual_information: Option<T>,
}

impl<T: Real> Histogram2D<T> {
    /// Empty histogram.
    pub fn new(grid_x: BinGrid<T>, grid_y: BinGrid<T>) -> Self {
        Self {
            counts: Array2::zeros((grid_x.bins(), grid_y.bins())),
            count: 0,
            grid_x,
            grid_y,
            marginals: None,
            mutual_information: None,
        }
    }

    /// Wrap a count table computed elsewhere (e.g. on the GPU).
    pub fn from_counts(grid_x: BinGrid<T>, grid_y: BinGrid<T>, counts: Array2<u64>) -> Result<Self> {
        let expected = (grid_x.bins(), grid_y.bins());
        if counts.dim() != expected {
            return Err(MiError::IncompatibleGeometry {
                left: expected,
                right: counts.dim(),
            });
        }
        let count = counts.sum();
        Ok(Self {
            grid_x,
            grid_y,
            counts,
            count,
            marginals: None,
            mutual_information: None,
        })
    }

    /// Insert raw value pairs `(xs[i], ys[i])`.
    pub fn calculate(&mut self, xs: &[T], ys: &[T]) -> Result<()> {
        check_sizes(xs.len(), ys.len())?;
        self.invalidate();
        for (&x, &y) in xs.iter().zip(ys) {
            let (ix, iy) = (self.grid_x.map(x), self.grid_y.map(y));
            self.transfer(ix, iy);
        }
        Ok(())
    }

    /// Insert precomputed index pairs `(ixs[i], iys[i])`.
    pub fn increment(&mut self, ixs: &[BinIndex], iys: &[BinIndex]) -> Result<()> {
        check_sizes(ixs.len(), iys.len())?;
        self.invalidate();
        for (&ix, &iy) in ixs.iter().zip(iys) {
            self.transfer(ix, iy);
        }
        Ok(())
    }

    /// Insert precomputed index pairs.
    pub fn increment_pairs(&mut self, pairs: &[(BinIndex, BinIndex)]) {
        self.invalidate();
        for &(ix, iy) in pairs {
            self.transfer(ix, iy);
        }
    }

    /// Insert a single index pair.
    #[inline]
    pub fn increment_at(&mut self, ix: BinIndex, iy: BinIndex) {
        self.invalidate();
        self.transfer(ix, iy);
    }

    #[inline]
    fn transfer(&mut self, ix: BinIndex, iy: BinIndex) {
        let x = ix.get().filter(|&x| x < self.grid_x.bins());
        let y = iy.get().filter(|&y| y < self.grid_y.bins());
        if let (Some(x), Some(y)) = (x, y) {
            self.counts[[x, y]] += 1;
            self.count += 1;
        }
    }

    /// Add the counts of `other`, which must have the same bin counts.
    pub fn add(&mut self, other: &Histogram2D<T>) -> Result<()> {
        if self.counts.dim() != other.counts.dim() {
            return Err(MiError::IncompatibleGeometry {
                left: self.counts.dim(),
                right: other.counts.dim(),
            });
        }
        self.invalidate();
        self.counts += &other.counts;
        self.count += other.count;
        Ok(())
    }

    #[inline]
    fn invalidate(&mut self) {
        self.marginals = None;
        self.mutual_information = None;
    }

    /// Marginal histograms `(x, y)`, computed on first request.
    pub fn reduce1d(&mut self) -> Result<(&Histogram1D<T>, &Histogram1D<T>)> {
        let marginals = match self.marginals.take() {
            Some(marginals) => marginals,
            None => self.compute_marginals()?,
        };
        let (x, y) = self.marginals.insert(marginals);
        Ok((&*x, &*y))
    }

    /// Recompute the marginals regardless of the cache.
    pub fn reduce1d_forced(&mut self) -> Result<(&Histogram1D<T>, &Histogram1D<T>)> {
        let marginals = self.compute_marginals()?;
        let (x, y) = self.marginals.insert(marginals);
        Ok((&*x, &*y))
    }

    fn compute_marginals(&self) -> Result<(Histogram1D<T>, Histogram1D<T>)> {
        let x = Histogram1D::from_counts(self.grid_x, self.counts.sum_axis(Axis(1)), self.count)?;
        let y = Histogram1D::from_counts(self.grid_y, self.counts.sum_axis(Axis(0)), self.count)?;
        Ok((x, y))
    }

    /// Mutual information of the joint distribution in bits, computed on first request.
    ///
    /// `I(X;Y) = sum p(x,y) log2(p(x,y) / (p(x) p(y)))` over all non-empty cells.
    /// Fails with [`MiError::EmptyHistogram`] if no element was inserted.
    pub fn mutual_information(&mut self) -> Result<T> {
        match self.mutual_information {
            Some(mi) => Ok(mi),
            None => self.mutual_information_forced(),
        }
    }

    /// Recompute marginals and mutual information regardless of the caches.
    pub fn mutual_information_forced(&mut self) -> Result<T> {
        if self.count == 0 {
            return Err(MiError::EmptyHistogram);
        }
        let (mx, my) = self.compute_marginals()?;
        let n = T::from_count(self.count);
        let mut mi = T::zero();
        for ((x, y), &c) in self.counts.indexed_iter() {
            if c == 0 {
                continue;
            }
            let p_xy = T::from_count(c) / n;
            let p_x = T::from_count(mx.counts()[x]) / n;
            let p_y = T::from_count(my.counts()[y]) / n;
            mi = mi + p_xy * (p_xy / (p_x * p_y)).log2();
        }
        self.marginals = Some((mx, my));
        self.mutual_information = Some(mi);
        Ok(mi)
    }

    pub fn counts(&self) -> &Array2<u64> {
        &self.counts
    }

    /// Total number of inserted (in-range) pairs.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn bins_x(&self) -> usize {
        self.grid_x.bins()
    }

    pub fn bins_y(&self) -> usize {
        self.grid_y.bins()
    }

    pub fn grid_x(&self) -> &BinGrid<T> {
        &self.grid_x
    }

    pub fn grid_y(&self) -> &BinGrid<T> {
        &self.grid_y
    }

    /// Whether the marginals are currently cached.
    pub fn has_cached_marginals(&self) -> bool {
        self.marginals.is_some()
    }

    /// Whether the mutual information is currently cached.
    pub fn has_cached_mutual_information(&self) -> bool {
        self.mutual_information.is_some()
    }
}

#[inline]
fn check_sizes(left: usize, right: usize) -> Result<()> {
    if left != right {
        return Err(MiError::SizeMismatch { left, right });
    }
    Ok(())
}
