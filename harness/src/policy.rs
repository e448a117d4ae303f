//! Policy snapshot: auditable declaration of the conditions under which a
//! session ran.
//!
//! The runner derives a [`PolicySnapshotV1`] deterministically from the
//! device identifier and the session's wait budgets, freezing them BEFORE
//! any device traffic. The snapshot is a normative artifact in every
//! bundle's `digest_basis`, committing the bundle digest to the policy.

use karat_kernel::proof::canon::canonical_json_bytes;
use karat_kernel::proof::hash::{canonical_hash, ContentHash};
use karat_kernel::proof::hash_domain::HashDomain;
use karat_search::policy::{SearchPolicyV1, WaitBudget};

/// Domain for policy snapshot digests (harness-originated).
pub const DOMAIN_POLICY_SNAPSHOT: HashDomain = HashDomain::PolicySnapshot;

/// Schema identifier embedded in every policy snapshot.
pub const SCHEMA_POLICY_SNAPSHOT: &str = "search_policy.v1";

/// Session configuration that can override the default wait budgets.
///
/// `None` keeps the default. The runner resolves overrides through
/// [`effective_policy`] before the session starts, so the snapshot records
/// the budgets the run actually used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Ticks to wait for each weighing's reading. `None` uses
    /// [`WaitBudget::DEFAULT_TICKS`].
    pub weigh_wait_ticks: Option<u64>,
    /// Ticks to wait for the confirmation message. `None` uses
    /// [`WaitBudget::DEFAULT_TICKS`].
    pub confirm_wait_ticks: Option<u64>,
}

/// Resolve a [`SessionConfig`] into the concrete policy a search runs under.
#[must_use]
pub fn effective_policy(config: &SessionConfig) -> SearchPolicyV1 {
    let defaults = SearchPolicyV1::default();
    SearchPolicyV1 {
        weigh_wait: config
            .weigh_wait_ticks
            .map_or(defaults.weigh_wait, WaitBudget::from_ticks),
        confirm_wait: config
            .confirm_wait_ticks
            .map_or(defaults.confirm_wait, WaitBudget::from_ticks),
    }
}

/// Frozen policy snapshot for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySnapshotV1 {
    /// Canonical JSON bytes of the snapshot.
    pub bytes: Vec<u8>,
    /// `canonical_hash(DOMAIN_POLICY_SNAPSHOT, bytes)`.
    pub digest: ContentHash,
}

/// Error building a policy snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyBuildError {
    /// Canonical JSON serialization failed.
    CanonError { detail: String },
}

impl std::fmt::Display for PolicyBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CanonError { detail } => write!(f, "canonical JSON error: {detail}"),
        }
    }
}

impl std::error::Error for PolicyBuildError {}

/// Build a [`PolicySnapshotV1`] from the device identifier and session config.
///
/// The snapshot is derived deterministically:
/// - `budgets` from [`effective_policy`] (overrides already resolved)
/// - `determinism_contract` is always the same (no wall time, no env reads,
///   no retries)
/// - `device_id` names the scale the session targets
///
/// # Errors
///
/// Returns [`PolicyBuildError`] if canonical JSON serialization fails.
pub fn build_policy_snapshot(
    device_id: &str,
    config: &SessionConfig,
) -> Result<PolicySnapshotV1, PolicyBuildError> {
    let policy = effective_policy(config);

    let snapshot_value = serde_json::json!({
        "budgets": {
            "confirm_wait_ticks": policy.confirm_wait.max_ticks,
            "weigh_wait_ticks": policy.weigh_wait.max_ticks,
        },
        "determinism_contract": {
            "no_env_reads": true,
            "no_retry": true,
            "no_wall_time": true,
        },
        "device_id": device_id,
        "schema_version": SCHEMA_POLICY_SNAPSHOT,
    });

    let bytes =
        canonical_json_bytes(&snapshot_value).map_err(|e| PolicyBuildError::CanonError {
            detail: e.to_string(),
        })?;
    let digest = canonical_hash(DOMAIN_POLICY_SNAPSHOT, &bytes);

    Ok(PolicySnapshotV1 { bytes, digest })
}
