//! Search policy types.

use crate::error::SearchError;

/// Bounded wait for one blocking device operation.
///
/// Ticks are abstract: a polling adapter consumes one tick per poll, a
/// simulated device compares its publication latency against the budget.
/// The reference behavior waits 5 time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitBudget {
    /// Maximum ticks to wait before the operation fails with a timeout.
    pub max_ticks: u64,
}

impl WaitBudget {
    /// The reference wait: 5 ticks.
    pub const DEFAULT_TICKS: u64 = 5;

    /// A budget of exactly `max_ticks` ticks.
    #[must_use]
    pub const fn from_ticks(max_ticks: u64) -> Self {
        Self { max_ticks }
    }
}

impl Default for WaitBudget {
    fn default() -> Self {
        Self::from_ticks(Self::DEFAULT_TICKS)
    }
}

/// Bounded-wait configuration for one search.
///
/// There are no retry or resume knobs on purpose: a timed-out or failed
/// round abandons the whole search, and the round count needs no budget —
/// every round strictly shrinks the lineup, so the loop terminates by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPolicyV1 {
    /// Wait budget for each weighing's reading to publish.
    pub weigh_wait: WaitBudget,
    /// Wait budget for the final confirmation message to appear.
    pub confirm_wait: WaitBudget,
}

impl SearchPolicyV1 {
    /// Validate the policy before any device traffic.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidInput`] for a zero-tick budget, which
    /// could never observe a reading.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.weigh_wait.max_ticks == 0 {
            return Err(SearchError::InvalidInput {
                detail: "weigh wait budget must be at least one tick".into(),
            });
        }
        if self.confirm_wait.max_ticks == 0 {
            return Err(SearchError::InvalidInput {
                detail: "confirm wait budget must be at least one tick".into(),
            });
        }
        Ok(())
    }
}

impl Default for SearchPolicyV1 {
    fn default() -> Self {
        Self {
            weigh_wait: WaitBudget::default(),
            confirm_wait: WaitBudget::default(),
        }
    }
}
