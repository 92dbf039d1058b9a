// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error type shared by the histogram and shift-scan estimators.
//!
//! All parameter checks run before any histogram work starts, so an `Err` never
//! comes with a partially filled result. Individual NaN or out-of-range samples
//! are not errors; they are dropped from the counts.

/// Errors raised by histogram construction, histogram arithmetic and shift scans.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MiError {
    /// A scalar parameter is outside its domain (bin count, shift step, sample counts, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `min >= max` (or a non-finite bound) on one axis.
    #[error("invalid range on {axis} axis: min ({min}) has to be smaller than max ({max})")]
    InvalidRange {
        axis: &'static str,
        min: f64,
        max: f64,
    },

    /// Two sequences that are processed pairwise have different lengths.
    #[error("size mismatch: {left} elements vs {right} elements")]
    SizeMismatch { left: usize, right: usize },

    /// The requested shift leaves no overlap between the two series.
    #[error("shift {shift} is out of bounds for series of length {len}")]
    ShiftOutOfBounds { shift: i64, len: usize },

    /// Histograms with different bin counts cannot be merged.
    #[error("incompatible histogram geometry: {}x{} vs {}x{}", left.0, left.1, right.0, right.1)]
    IncompatibleGeometry {
        left: (usize, usize),
        right: (usize, usize),
    },

    /// Probabilities are undefined for a histogram without elements.
    #[error("histogram is empty; mutual information is undefined")]
    EmptyHistogram,
}

pub type Result<T> = std::result::Result<T, MiError>;
