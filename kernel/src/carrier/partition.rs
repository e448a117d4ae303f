//! Bucket arithmetic for one weighing round.
//!
//! A round splits `n` surviving candidates into three buckets: left pan,
//! right pan, held out. Both pans take `ceil(n / 3)` candidates; the held
//! bucket takes the remainder (possibly zero, never negative for `n >= 2`).
//!
//! # Worked sizes
//!
//! | n | left | right | held |
//! |---|------|-------|------|
//! | 2 | 1    | 1     | 0    |
//! | 3 | 1    | 1     | 1    |
//! | 7 | 3    | 3     | 1    |
//! | 9 | 3    | 3     | 3    |
//!
//! Every bucket of a valid plan is strictly smaller than `n`, so a search
//! that keeps one bucket per round always terminates.

/// Bucket sizes for one round: left pan, right pan, held out.
///
/// Produced only by [`split`]; the invariant `left + right + held == n`
/// holds for every value this module hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplitPlan {
    /// Candidates on the left pan (`ceil(n / 3)`).
    pub left: usize,
    /// Candidates on the right pan (`ceil(n / 3)`, always equal to `left`).
    pub right: usize,
    /// Candidates held out of the weighing (`n - left - right`).
    pub held: usize,
}

impl SplitPlan {
    /// Total candidates covered by the plan.
    #[must_use]
    pub const fn total(self) -> usize {
        self.left + self.right + self.held
    }
}

/// Bucket sizes for a round over `n` surviving candidates.
///
/// Returns `None` for `n <= 1`: a single survivor is confirmed, not
/// weighed, and an empty lineup is rejected long before a round starts.
///
/// Deterministic, no I/O, no floating point. `ceil(n / 3)` is computed as
/// `n / 3 + (n % 3 != 0)`, which cannot overflow.
#[must_use]
pub fn split(n: usize) -> Option<SplitPlan> {
    if n <= 1 {
        return None;
    }
    let pan = n / 3 + usize::from(n % 3 != 0);
    // For n >= 2 both pans fit: 2 * ceil(n / 3) <= n fails only at n == 1.
    let held = n.checked_sub(2 * pan)?;
    Some(SplitPlan {
        left: pan,
        right: pan,
        held,
    })
}

/// Worst-case round count for a collection of `n` candidates.
///
/// Each round shrinks the lineup to at most `ceil(n / 3)` (the held bucket
/// can be smaller, in which case that branch finishes early). Iterating the
/// shrink until one candidate remains gives `ceil(log3(n))` — returned here
/// without floating point. `0` for `n <= 1`.
#[must_use]
pub fn rounds_for(n: usize) -> u32 {
    let mut remaining = n;
    let mut rounds = 0;
    while remaining > 1 {
        remaining = remaining / 3 + usize::from(remaining % 3 != 0);
        rounds += 1;
    }
    rounds
}
