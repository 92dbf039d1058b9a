// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

// Binned (histogram-based) estimators: groups all binning-related submodules
// and exposes them to the parent approaches module.

pub mod binning;
pub mod bootstrap;
#[cfg(feature = "gpu_support")]
pub mod histogram_gpu;
pub mod histogram1d;
pub mod histogram2d;
pub mod shift_scan;

pub use binning::{map_index, map_indices, BinGrid, BinIndex};
pub use bootstrap::{
    bootstrapped_mutual_information, shifted_mutual_information_with_bootstrap,
    shifted_mutual_information_with_bootstrap_into,
};
pub use histogram1d::Histogram1D;
pub use histogram2d::Histogram2D;
pub use shift_scan::{shifted_mutual_information, shifted_mutual_information_into};
