//! Round log: the per-search audit artifact.
//!
//! One record per completed weighing, plus metadata binding the log to the
//! device and the starting lineup. The canonical JSON serialization is the
//! normative form: two runs agree exactly when their round-log bytes agree,
//! and the bundle digests are computed over those bytes.

use karat_kernel::carrier::label::BarLabel;
use karat_kernel::carrier::outcome::Outcome;
use karat_kernel::carrier::partition::SplitPlan;
use karat_kernel::proof::canon::{canonical_json_bytes, CanonError};
use karat_kernel::proof::hash::{canonical_hash, ContentHash};
use karat_kernel::proof::hash_domain::HashDomain;

/// Schema identifier embedded in every round log.
pub const SCHEMA_ROUND_LOG: &str = "round_log.v1";

/// One completed weighing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecordV1 {
    /// 0-based round index.
    pub round: u64,
    /// Lineup size entering the round.
    pub candidate_count: u64,
    /// Bucket sizes the round used.
    pub plan: SplitPlan,
    /// Left pan contents, in assignment order.
    pub left: Vec<BarLabel>,
    /// Right pan contents, in assignment order.
    pub right: Vec<BarLabel>,
    /// Held-out candidates, in lineup order.
    pub held: Vec<BarLabel>,
    /// The published reading.
    pub outcome: Outcome,
    /// Lineup size leaving the round.
    pub surviving_count: u64,
}

/// Bindings that tie a round log to one search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundLogMetadataV1 {
    /// Always [`SCHEMA_ROUND_LOG`].
    pub schema_version: String,
    /// The device that performed the weighings.
    pub device_id: String,
    /// Size of the full starting collection.
    pub initial_count: u64,
    /// Fingerprint of the starting lineup (`"sha256:..."`).
    pub lineup_fingerprint: String,
    /// Number of completed weighings.
    pub total_rounds: u64,
    /// The confirmed fake.
    pub fake_label: BarLabel,
}

/// Ordered round records plus run metadata. Normative bundle artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundLogV1 {
    pub rounds: Vec<RoundRecordV1>,
    pub metadata: RoundLogMetadataV1,
}

impl RoundLogV1 {
    /// Serialize the log to canonical JSON bytes.
    ///
    /// Uses `karat_kernel::proof::canon::canonical_json_bytes` for
    /// deterministic output (sorted keys, compact separators).
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails. Log values are
    /// strings and unsigned integers, so this does not happen for logs the
    /// search loop builds.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Domain-separated digest of the canonical bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonical serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = self.to_canonical_json_bytes()?;
        Ok(canonical_hash(HashDomain::RoundLog, &bytes))
    }

    fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "metadata": {
                "device_id": self.metadata.device_id,
                "fake_label": self.metadata.fake_label.as_str(),
                "initial_count": self.metadata.initial_count,
                "lineup_fingerprint": self.metadata.lineup_fingerprint,
                "schema_version": self.metadata.schema_version,
                "total_rounds": self.metadata.total_rounds,
            },
            "rounds": self.rounds.iter().map(round_record_to_json).collect::<Vec<_>>(),
        })
    }
}

fn labels_to_json(labels: &[BarLabel]) -> serde_json::Value {
    serde_json::Value::Array(
        labels
            .iter()
            .map(|label| serde_json::Value::String(label.as_str().to_string()))
            .collect(),
    )
}

fn round_record_to_json(record: &RoundRecordV1) -> serde_json::Value {
    serde_json::json!({
        "candidate_count": record.candidate_count,
        "held": labels_to_json(&record.held),
        "left": labels_to_json(&record.left),
        "outcome": record.outcome.name(),
        "plan": {
            "held": record.plan.held,
            "left": record.plan.left,
            "right": record.plan.right,
        },
        "right": labels_to_json(&record.right),
        "round": record.round,
        "surviving_count": record.surviving_count,
    })
}
