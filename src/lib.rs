// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # shiftmi
//!
//! Mutual information between two time series as a function of the shift between
//! them, estimated from binned (histogram) probabilities.
//!
//! ## Quick Start
//!
//! ```rust
//! use shiftmi::estimators::config::ScanConfig;
//! use shiftmi::estimators::mutual_information::ScanOutput;
//!
//! let x: Vec<f64> = (0..1000).map(|i| (0.01 * i as f64).sin()).collect();
//! let y: Vec<f64> = x.iter().map(|v| v * v).collect();
//!
//! // Shifts -100..=100, 10 x 10 bins over the data ranges
//! let config = ScanConfig::new().with_shifts(-100, 100);
//! if let ScanOutput::Plain(mi) = config.run(&x, &y).unwrap() {
//!     assert_eq!(mi.len(), 201);
//! }
//! ```
//!
//! ## Building Blocks
//!
//! | Type / function | Purpose |
//! |-----------------|---------|
//! | `BinGrid`, `map_indices` | Map samples onto equal-width bins |
//! | `Histogram1D` | Counts and entropy of one series |
//! | `Histogram2D` | Joint counts, cached marginals and mutual information |
//! | `shifted_mutual_information` | Mutual information for every shift in a range |
//! | `shifted_mutual_information_with_bootstrap` | Resampled estimates per shift |
//!
//! All estimates are in bits. Samples outside the configured range (and NaN) are
//! dropped from every histogram.
//!
//! ## Architecture
//!
//! 1. **Public API Layer**: `MutualInformation`, `ShiftedMutualInformation` and `ScanConfig`
//! 2. **Binned Approach**: index mapping, histograms, shift scan and bootstrap
//! 3. **Core Infrastructure**: errors, the float trait, seeding and the worker pool
//! 4. **Performance Layer**: optional GPU counting of the joint histograms
//!
//! ## Feature Flags
//!
//! - `gpu_support`: count the joint histograms of a scan on the GPU via `wgpu`

pub mod estimators;
