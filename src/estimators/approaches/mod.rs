// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod binned;

// Re-exports so users can import shiftmi::estimators::approaches::* directly.
pub use binned::bootstrap::{
    bootstrapped_mutual_information, shifted_mutual_information_with_bootstrap,
};
pub use binned::shift_scan::shifted_mutual_information;
pub use binned::{BinGrid, BinIndex, Histogram1D, Histogram2D};
