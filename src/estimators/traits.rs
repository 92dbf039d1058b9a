// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_traits::Float;
use std::fmt::Debug;

/// Floating-point element type of the input series and of the estimated values.
///
/// Implemented for `f32` and `f64`. Bin counts are always integers (`u64`); this
/// trait only supplies the conversion from counts into probabilities.
pub trait Real: Float + Debug + Send + Sync + 'static {
    /// Convert a histogram count into the float type.
    fn from_count(count: u64) -> Self;
}

impl Real for f32 {
    #[inline]
    fn from_count(count: u64) -> Self {
        count as f32
    }
}

impl Real for f64 {
    #[inline]
    fn from_count(count: u64) -> Self {
        count as f64
    }
}
