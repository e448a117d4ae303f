//! `Lineup`: the ordered set of candidates still suspected of being fake.
//!
//! Built once per search from the device's candidate listing, then rebuilt
//! from the surviving bucket after every round. Order is load-bearing: pan
//! assignment is positional (first `left` labels to the left pan, next
//! `right` to the right pan, the rest held out), so two lineups with the
//! same labels in different orders are different lineups — and their
//! fingerprints differ.
//!
//! Construction enforces what every later step assumes: at least one
//! candidate, no empty labels, no duplicates. A listing that violates any
//! of these is a device synchronization bug surfaced immediately, before
//! anything is weighed.

use std::collections::BTreeSet;
use std::fmt;

use crate::carrier::label::BarLabel;
use crate::carrier::partition::SplitPlan;
use crate::proof::hash::{canonical_hash, ContentHash};
use crate::proof::hash_domain::HashDomain;

/// Why a candidate listing was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineupError {
    /// The listing contained no candidates.
    Empty,
    /// A candidate at the given position had an empty label.
    EmptyLabel { position: usize },
    /// The same label appeared more than once.
    DuplicateLabel { label: BarLabel },
}

impl fmt::Display for LineupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "candidate listing is empty"),
            Self::EmptyLabel { position } => {
                write!(f, "candidate at position {position} has an empty label")
            }
            Self::DuplicateLabel { label } => {
                write!(f, "duplicate candidate label {label:?}")
            }
        }
    }
}

impl std::error::Error for LineupError {}

/// Ordered, duplicate-free, non-empty candidate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineup {
    labels: Vec<BarLabel>,
}

impl Lineup {
    /// Build a lineup from an ordered candidate listing.
    ///
    /// Order is preserved exactly as given.
    ///
    /// # Errors
    ///
    /// [`LineupError::Empty`] for an empty listing, [`LineupError::EmptyLabel`]
    /// for a blank label, [`LineupError::DuplicateLabel`] for a repeated one.
    pub fn new(labels: impl IntoIterator<Item = BarLabel>) -> Result<Self, LineupError> {
        let labels: Vec<BarLabel> = labels.into_iter().collect();
        if labels.is_empty() {
            return Err(LineupError::Empty);
        }
        let mut seen = BTreeSet::new();
        for (position, label) in labels.iter().enumerate() {
            if label.is_empty() {
                return Err(LineupError::EmptyLabel { position });
            }
            if !seen.insert(label.clone()) {
                return Err(LineupError::DuplicateLabel {
                    label: label.clone(),
                });
            }
        }
        Ok(Self { labels })
    }

    /// Number of surviving candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false: an empty lineup cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The candidates in lineup order.
    #[must_use]
    pub fn labels(&self) -> &[BarLabel] {
        &self.labels
    }

    /// The single survivor, if exactly one candidate remains.
    #[must_use]
    pub fn sole(&self) -> Option<&BarLabel> {
        match self.labels.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Slice the lineup into (left pan, right pan, held out) per the plan.
    ///
    /// Positional: the first `plan.left` labels go left, the next
    /// `plan.right` go right, the remainder is held out. Returns `None`
    /// when the plan does not cover exactly this lineup — the caller treats
    /// that as invalid input, not a panic.
    #[must_use]
    pub fn buckets(&self, plan: SplitPlan) -> Option<(&[BarLabel], &[BarLabel], &[BarLabel])> {
        if plan.total() != self.labels.len() {
            return None;
        }
        let (left, rest) = self.labels.split_at(plan.left);
        let (right, held) = rest.split_at(plan.right);
        Some((left, right, held))
    }

    /// Domain-separated fingerprint of the lineup.
    ///
    /// Hashes a length-prefixed encoding (u64-le candidate count, then per
    /// label a u64-le byte length followed by the label's UTF-8 bytes), so
    /// no two distinct lineups share an input encoding. Order-sensitive.
    #[must_use]
    pub fn fingerprint(&self) -> ContentHash {
        let mut encoded = Vec::new();
        encoded.extend_from_slice(&(self.labels.len() as u64).to_le_bytes());
        for label in &self.labels {
            encoded.extend_from_slice(&(label.as_bytes().len() as u64).to_le_bytes());
            encoded.extend_from_slice(label.as_bytes());
        }
        canonical_hash(HashDomain::LineupFingerprint, &encoded)
    }
}
