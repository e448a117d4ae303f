//! `SearchReportV1`: the session-level summary artifact.
//!
//! The report binds the session's identities together: which device ran,
//! what it found, and the digests of the round log and policy snapshot it
//! ran under. Verification recomputes those digests from the sibling
//! artifacts and rejects a bundle whose report points elsewhere.

use karat_kernel::carrier::label::BarLabel;
use karat_kernel::proof::canon::{canonical_json_bytes, CanonError};
use karat_kernel::proof::hash::{canonical_hash, ContentHash};
use karat_kernel::proof::hash_domain::HashDomain;

/// Schema identifier embedded in every search report.
pub const SCHEMA_SEARCH_REPORT: &str = "search_report.v1";

/// Session summary. Normative bundle artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReportV1 {
    /// The device that performed the weighings.
    pub device_id: String,
    /// Size of the starting collection.
    pub initial_count: u64,
    /// The confirmed fake.
    pub fake_label: BarLabel,
    /// Text of the device's confirmation message, verbatim.
    pub confirmation: String,
    /// Number of completed weighings.
    pub total_rounds: u64,
    /// Digest of the round log artifact (`RoundLogV1::digest()`).
    pub round_log_digest: ContentHash,
    /// Digest of the policy snapshot artifact.
    pub policy_digest: ContentHash,
}

impl SearchReportV1 {
    /// Serialize the report to canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails. Report values are
    /// strings and unsigned integers, so this does not happen for reports
    /// the runner builds.
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
        Ok(canonical_hash(HashDomain::SearchReport, &bytes))
    }

    fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "confirmation": self.confirmation,
            "device_id": self.device_id,
            "fake_label": self.fake_label.as_str(),
            "initial_count": self.initial_count,
            "policy_digest": self.policy_digest.as_str(),
            "round_log_digest": self.round_log_digest.as_str(),
            "schema_version": SCHEMA_SEARCH_REPORT,
            "total_rounds": self.total_rounds,
        })
    }
}
