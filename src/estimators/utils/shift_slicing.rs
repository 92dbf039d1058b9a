// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Overlapping parts of two equally long series when the second one is shifted.
///
/// ```text
/// shift == 0:   x |------------------|
///               y |------------------|
/// shift <  0:   x     |------------------|
///               y |------------------|
/// shift >  0:   x |------------------|
///               y     |------------------|
/// ```
///
/// A negative shift pairs `x[0 .. n+shift)` with `y[-shift .. n)`, a positive shift
/// pairs `x[shift .. n)` with `y[0 .. n-shift)`. Both returned slices have length
/// `n - |shift|`.
///
/// Callers validate `|shift| < n` and equal lengths beforehand; a shift beyond the
/// series yields two empty slices.
pub fn shifted_overlap<'a, A>(x: &'a [A], y: &'a [A], shift: i64) -> (&'a [A], &'a [A]) {
    debug_assert_eq!(x.len(), y.len(), "Series must have equal length");
    let n = x.len().min(y.len());
    let offset = usize::try_from(shift.unsigned_abs()).unwrap_or(usize::MAX).min(n);
    if shift < 0 {
        (&x[..n - offset], &y[offset..n])
    } else {
        (&x[offset..n], &y[..n - offset])
    }
}

/// Number of pairs in the overlap for a given shift.
pub fn overlap_len(n: usize, shift: i64) -> usize {
    let offset = usize::try_from(shift.unsigned_abs()).unwrap_or(usize::MAX);
    n.saturating_sub(offset)
}
