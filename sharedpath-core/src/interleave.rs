//! Order-preserving merges of two stop sequences.
//!
//! Merging sequences of length `m` and `n` while keeping each one's internal
//! order yields exactly `C(m + n, m)` orderings. They are produced directly by
//! branching on "take the next stop of traveler one" versus "take the next stop
//! of traveler two" rather than by filtering all permutations.

use std::collections::HashSet;

use crate::StopId;

/// Every order-preserving interleaving of `first` and `second`.
///
/// When either input is empty the result is the other sequence unchanged.
/// Two empty inputs yield a single empty ordering.
///
/// # Examples
/// ```
/// use sharedpath_core::{Group, StopId, interleavings};
///
/// let a = [StopId::new(Group::First, 0), StopId::new(Group::First, 1)];
/// let b = [StopId::new(Group::Second, 0)];
/// let merges = interleavings(&a, &b);
/// assert_eq!(merges.len(), 3);
/// ```
#[must_use]
pub fn interleavings(first: &[StopId], second: &[StopId]) -> Vec<Vec<StopId>> {
    let capacity = usize::try_from(interleaving_count(first.len(), second.len())).unwrap_or(0);
    let mut results = Vec::with_capacity(capacity);
    let mut current = Vec::with_capacity(first.len() + second.len());
    interleave_rec(first, second, &mut current, &mut results);
    results
}

fn interleave_rec(
    first: &[StopId],
    second: &[StopId],
    current: &mut Vec<StopId>,
    results: &mut Vec<Vec<StopId>>,
) {
    if first.is_empty() && second.is_empty() {
        results.push(current.clone());
        return;
    }
    if let Some((head, rest)) = first.split_first() {
        current.push(*head);
        interleave_rec(rest, second, current, results);
        current.pop();
    }
    if let Some((head, rest)) = second.split_first() {
        current.push(*head);
        interleave_rec(first, rest, current, results);
        current.pop();
    }
}

/// Number of order-preserving interleavings, `C(m + n, m)`.
///
/// Saturates at `u128::MAX` instead of overflowing.
#[must_use]
pub fn interleaving_count(m: usize, n: usize) -> u128 {
    let k = u128::try_from(m.min(n)).unwrap_or(u128::MAX);
    let total = u128::try_from(m.max(n)).unwrap_or(u128::MAX);
    // C(total + k, k) built incrementally; each step stays an integer.
    (1..=k).fold(1_u128, |acc, i| {
        acc.checked_mul(total.saturating_add(i))
            .and_then(|v| v.checked_div(i))
            .unwrap_or(u128::MAX)
    })
}

/// Whether `ordering` is a valid interleaving of `first` and `second`.
///
/// Every stop must appear exactly once, nothing else may appear, and each
/// traveler's stops must keep their original relative order.
#[must_use]
pub fn is_order_preserving(ordering: &[StopId], first: &[StopId], second: &[StopId]) -> bool {
    if ordering.len() != first.len() + second.len() {
        return false;
    }
    let mut seen = HashSet::with_capacity(ordering.len());
    if !ordering.iter().all(|id| seen.insert(*id)) {
        return false;
    }
    subsequence_matches(ordering, first) && subsequence_matches(ordering, second)
}

fn subsequence_matches(ordering: &[StopId], expected: &[StopId]) -> bool {
    let Some(group) = expected.first().map(|id| id.group) else {
        return true;
    };
    ordering
        .iter()
        .filter(|id| id.group == group)
        .eq(expected.iter())
}
