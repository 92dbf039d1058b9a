// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared worker pool for the shift scans and index precomputation.
//!
//! Every shift iteration is independent, so the pool is the only scheduling
//! primitive the estimators need. It is built lazily on first use with one
//! worker per logical CPU.

use rayon::ThreadPool;
use std::sync::OnceLock;

static THREAD_POOL: OnceLock<Option<ThreadPool>> = OnceLock::new();

/// Get or initialize the shared worker pool.
///
/// Returns `None` if the operating system refused to spawn the workers; callers
/// then run on rayon's global pool instead.
pub fn get_thread_pool() -> Option<&'static ThreadPool> {
    THREAD_POOL
        .get_or_init(|| {
            rayon::ThreadPoolBuilder::new()
                .thread_name(|i| format!("shiftmi-worker-{i}"))
                .build()
                .ok()
        })
        .as_ref()
}

/// Execute a parallel operation on the shared worker pool.
pub fn install<OP, R>(op: OP) -> R
where
    OP: FnOnce() -> R + Send,
    R: Send,
{
    match get_thread_pool() {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

/// Number of workers the scans run on.
pub fn current_num_threads() -> usize {
    install(rayon::current_num_threads)
}
