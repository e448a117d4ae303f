//! Typed search errors.
//!
//! Every failure is fail-stop: the search is abandoned, nothing is retried,
//! and a new search must start over from the full collection. Device-phase
//! variants carry the 0-based round index and the candidate labels that were
//! still in play, which is enough to reproduce the failing round against a
//! scripted device.

use karat_kernel::carrier::label::{bracket_join, BarLabel};

use crate::contract::PanSide;

/// Typed failure for one search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The input could never be searched: empty collection, duplicate or
    /// blank labels, bucket counts that disagree with the lineup, or an
    /// unusable policy.
    InvalidInput { detail: String },

    /// A bounded wait elapsed without the device publishing a reading or
    /// confirmation. Never retried.
    DeviceTimeout {
        round: u64,
        waited_ticks: u64,
        remaining: Vec<BarLabel>,
    },

    /// The device broke the reading protocol: a symbol outside the alphabet,
    /// or a `Balanced` reading when no candidate was held out.
    ProtocolViolation {
        round: u64,
        detail: String,
        remaining: Vec<BarLabel>,
    },

    /// A pan did not echo back what was assigned to it.
    PlacementMismatch {
        round: u64,
        side: PanSide,
        sent: Vec<BarLabel>,
        observed: Vec<BarLabel>,
    },

    /// A device operation failed at the transport level.
    DeviceFault {
        round: u64,
        operation: String,
        detail: String,
        remaining: Vec<BarLabel>,
    },
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { detail } => write!(f, "invalid input: {detail}"),
            Self::DeviceTimeout {
                round,
                waited_ticks,
                remaining,
            } => write!(
                f,
                "device did not publish within {waited_ticks} ticks at round {round}, \
                 candidates {}",
                bracket_join(remaining)
            ),
            Self::ProtocolViolation {
                round,
                detail,
                remaining,
            } => write!(
                f,
                "protocol violation at round {round}: {detail}, candidates {}",
                bracket_join(remaining)
            ),
            Self::PlacementMismatch {
                round,
                side,
                sent,
                observed,
            } => write!(
                f,
                "{side} pan mismatch at round {round}: sent {}, device reports {}",
                bracket_join(sent),
                bracket_join(observed)
            ),
            Self::DeviceFault {
                round,
                operation,
                detail,
                remaining,
            } => write!(
                f,
                "device fault in {operation} at round {round}: {detail}, candidates {}",
                bracket_join(remaining)
            ),
        }
    }
}

impl std::error::Error for SearchError {}
