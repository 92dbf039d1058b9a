// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2};

use crate::estimators::approaches::binned::binning::{BinGrid, BinIndex};
use crate::estimators::approaches::binned::{bootstrap, shift_scan};
use crate::estimators::config::{BootstrapParams, ScanConfig, ShiftRange};
use crate::estimators::error::{MiError, Result};
use crate::estimators::traits::Real;
use crate::estimators::utils::shift_slicing::overlap_len;

/// Mutual information estimation entry points.
///
/// This struct provides static methods for creating shifted mutual information
/// estimators from raw series or from precomputed bin indices.
pub struct MutualInformation;

impl MutualInformation {
    /// Creates a shifted mutual information estimator for two raw series.
    ///
    /// Missing axis ranges in `config` are derived from the finite extrema of the
    /// respective series. Every parameter is validated here, and the bin indices of
    /// both series are computed once for all shifts.
    pub fn new_shifted<T: Real>(
        x: &[T],
        y: &[T],
        config: &ScanConfig<T>,
    ) -> Result<ShiftedMutualInformation<T>> {
        if x.len() != y.len() {
            return Err(MiError::SizeMismatch {
                left: x.len(),
                right: y.len(),
            });
        }
        let grid_x = config.x.resolve("x", x)?;
        let grid_y = config.y.resolve("y", y)?;
        ShiftedMutualInformation::new(grid_x, grid_y, x, y, config.shifts)
    }

    /// Creates a shifted mutual information estimator from precomputed bin indices.
    pub fn new_shifted_from_indices<T: Real>(
        grid_x: BinGrid<T>,
        grid_y: BinGrid<T>,
        indices_x: Vec<BinIndex>,
        indices_y: Vec<BinIndex>,
        shifts: ShiftRange,
    ) -> Result<ShiftedMutualInformation<T>> {
        ShiftedMutualInformation::from_indices(grid_x, grid_y, indices_x, indices_y, shifts)
    }
}

/// Result of [`ScanConfig::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutput<T> {
    /// One value per shift.
    Plain(Array1<T>),
    /// Shape `(shifts, nr_repetitions)`.
    Bootstrap(Array2<T>),
}

/// Validated inputs of a shift scan: two bin grids, the index arrays of both
/// series and the shifts to evaluate.
#[derive(Debug, Clone)]
pub struct ShiftedMutualInformation<T> {
    grid_x: BinGrid<T>,
    grid_y: BinGrid<T>,
    indices_x: Vec<BinIndex>,
    indices_y: Vec<BinIndex>,
    shifts: ShiftRange,
}

impl<T: Real> ShiftedMutualInformation<T> {
    /// Validate the shifts against the series and precompute the bin indices.
    pub fn new(
        grid_x: BinGrid<T>,
        grid_y: BinGrid<T>,
        x: &[T],
        y: &[T],
        shifts: ShiftRange,
    ) -> Result<Self> {
        if x.len() != y.len() {
            return Err(MiError::SizeMismatch {
                left: x.len(),
                right: y.len(),
            });
        }
        shifts.validate(x.len())?;
        let indices_x = grid_x.map_indices(x);
        let indices_y = grid_y.map_indices(y);
        Ok(Self {
            grid_x,
            grid_y,
            indices_x,
            indices_y,
            shifts,
        })
    }

    /// Use index arrays computed elsewhere. Indices `>= bins` are ignored like
    /// out-of-range samples.
    pub fn from_indices(
        grid_x: BinGrid<T>,
        grid_y: BinGrid<T>,
        indices_x: Vec<BinIndex>,
        indices_y: Vec<BinIndex>,
        shifts: ShiftRange,
    ) -> Result<Self> {
        if indices_x.len() != indices_y.len() {
            return Err(MiError::SizeMismatch {
                left: indices_x.len(),
                right: indices_y.len(),
            });
        }
        shifts.validate(indices_x.len())?;
        Ok(Self {
            grid_x,
            grid_y,
            indices_x,
            indices_y,
            shifts,
        })
    }

    /// Mutual information (bits) for every shift.
    pub fn values(&self) -> Result<Array1<T>> {
        let mut out = vec![T::zero(); self.len()];
        self.values_into(&mut out)?;
        Ok(Array1::from(out))
    }

    /// Like [`Self::values`], writing into `out` (length [`Self::len`]).
    ///
    /// On `Err` the contents of `out` are unspecified.
    pub fn values_into(&self, out: &mut [T]) -> Result<()> {
        if out.len() != self.len() {
            return Err(MiError::SizeMismatch {
                left: out.len(),
                right: self.len(),
            });
        }
        shift_scan::scan_into(
            &self.grid_x,
            &self.grid_y,
            &self.indices_x,
            &self.indices_y,
            &self.shifts,
            out,
        )
    }

    /// Bootstrap estimates, shape `(len, nr_repetitions)`.
    pub fn bootstrap(&self, params: &BootstrapParams) -> Result<Array2<T>> {
        let mut out = vec![T::zero(); self.len() * params.nr_repetitions];
        self.bootstrap_into(params, &mut out)?;
        Array2::from_shape_vec((self.len(), params.nr_repetitions), out)
            .map_err(|e| MiError::InvalidArgument(e.to_string()))
    }

    /// Like [`Self::bootstrap`], writing row-major into `out`
    /// (length `len * nr_repetitions`, stride `nr_repetitions`).
    ///
    /// On `Err` the contents of `out` are unspecified.
    pub fn bootstrap_into(&self, params: &BootstrapParams, out: &mut [T]) -> Result<()> {
        params.validate(self.min_overlap())?;
        let expected = self.len() * params.nr_repetitions;
        if out.len() != expected {
            return Err(MiError::SizeMismatch {
                left: out.len(),
                right: expected,
            });
        }
        bootstrap::scan_into(
            &self.grid_x,
            &self.grid_y,
            &self.indices_x,
            &self.indices_y,
            &self.shifts,
            params,
            out,
        )
    }

    /// Mutual information for every shift with the joint histograms counted on the GPU.
    ///
    /// Falls back to [`Self::values`] if no GPU is available or the histograms do
    /// not fit into a single dispatch.
    #[cfg(feature = "gpu_support")]
    pub fn values_gpu(&self) -> Result<Array1<T>> {
        use crate::estimators::approaches::binned::histogram2d::Histogram2D;
        use crate::estimators::approaches::binned::histogram_gpu::gpu_joint_histograms;

        let Some(tables) = gpu_joint_histograms(
            &self.grid_x,
            &self.grid_y,
            &self.indices_x,
            &self.indices_y,
            &self.shifts,
        ) else {
            return self.values();
        };
        let values = tables
            .into_iter()
            .map(|counts| Histogram2D::from_counts(self.grid_x, self.grid_y, counts)?.mutual_information())
            .collect::<Result<Vec<T>>>()?;
        Ok(Array1::from(values))
    }

    /// Number of evaluated shifts.
    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    pub fn shifts(&self) -> &ShiftRange {
        &self.shifts
    }

    pub fn grid_x(&self) -> &BinGrid<T> {
        &self.grid_x
    }

    pub fn grid_y(&self) -> &BinGrid<T> {
        &self.grid_y
    }

    pub fn indices_x(&self) -> &[BinIndex] {
        &self.indices_x
    }

    pub fn indices_y(&self) -> &[BinIndex] {
        &self.indices_y
    }

    /// Length of both series.
    pub fn series_len(&self) -> usize {
        self.indices_x.len()
    }

    /// Overlap at the largest absolute shift.
    fn min_overlap(&self) -> usize {
        overlap_len(self.series_len(), self.shifts.max_abs() as i64)
    }
}
