//! Shared numeric tolerance.

/// Tolerance used by every strict/loose geometric predicate.
///
/// Changing it moves cells between `Partial` and `Full`/`Outside` near
/// region boundaries, so all comparisons go through this one value.
pub const EPSILON: f64 = 1e-5;
