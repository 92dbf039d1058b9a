// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod approaches;
pub mod config;
pub mod error;
pub mod mutual_information;
pub mod traits;
pub mod utils;

pub use config::{AxisSpec, BootstrapParams, ScanConfig, ShiftRange};
pub use error::{MiError, Result};
pub use mutual_information::{MutualInformation, ScanOutput, ShiftedMutualInformation};
pub use traits::Real;
