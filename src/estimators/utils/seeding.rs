// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-iteration RNG seeds for bootstrap resampling.
//!
//! Concurrent shift iterations must never share a random stream, and seeding
//! from the wall clock would hand identical seeds to iterations scheduled in the
//! same tick. Seeds are instead derived from a process-wide entropy seed, a
//! global scan counter and the iteration coordinates.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

static BASE_SEED: OnceLock<u64> = OnceLock::new();
static SCAN_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Counter-based seed derivation using SplitMix64.
///
/// Stateless and well distributed: consecutive counters give uncorrelated seeds.
/// See <https://xoshiro.di.unimi.it/splitmix64.c>.
#[inline]
pub fn counter_rng_seed(base_seed: u64, counter: u64) -> u64 {
    let mut z = base_seed.wrapping_add(counter.wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Process-wide base seed drawn once from the operating system's entropy source.
pub fn entropy_base_seed() -> u64 {
    *BASE_SEED.get_or_init(rand::random::<u64>)
}

/// Seed for a whole scan.
///
/// With a fixed seed the scan is reproducible. Without one, every call mixes the
/// entropy base seed with a fresh value of the global scan counter, so two scans
/// in the same process never reuse streams.
pub fn scan_seed(fixed: Option<u64>) -> u64 {
    match fixed {
        Some(seed) => seed,
        None => counter_rng_seed(
            entropy_base_seed(),
            SCAN_COUNTER.fetch_add(1, Ordering::Relaxed),
        ),
    }
}

/// Generator for one (shift, repetition) iteration of a scan.
pub fn iteration_rng(scan_seed: u64, shift_pos: usize, repetition: usize) -> StdRng {
    let per_shift = counter_rng_seed(scan_seed, shift_pos as u64);
    StdRng::seed_from_u64(counter_rng_seed(per_shift, repetition as u64))
}
