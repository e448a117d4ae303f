//! Session runner: drives one search end to end and packages the
//! evidence bundle.
//!
//! # Pipeline
//!
//! ```text
//! build_policy_snapshot() → run_search() → release reset
//!   → round_log.json + search_report.json + device_log.json
//!   → build_bundle() (4 artifacts)
//! ```
//!
//! The runner holds the device exclusively for the whole session (the
//! `&mut` borrow) and always hands it back reset, on the success and
//! failure paths alike. The policy snapshot is frozen before any device
//! traffic, so the bundle records the budgets the run actually used.

use karat_kernel::proof::canon::canonical_json_bytes;
use karat_search::contract::ScaleDeviceV1;
use karat_search::error::SearchError;
use karat_search::run::{run_search, SearchResult};

use crate::bundle::{
    build_bundle, BundleBuildError, ReportBundleV1, ARTIFACT_DEVICE_LOG,
    ARTIFACT_POLICY_SNAPSHOT, ARTIFACT_ROUND_LOG, ARTIFACT_SEARCH_REPORT,
};
use crate::policy::{build_policy_snapshot, effective_policy, PolicySnapshotV1, SessionConfig};
use crate::report::SearchReportV1;

/// Error during a session run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Policy snapshot construction failed.
    PolicyBuildFailed { detail: String },
    /// The search itself failed (device or input error).
    SearchFailed(SearchError),
    /// The search succeeded but the release reset was rejected.
    ReleaseFailed { detail: String },
    /// Canonical JSON serialization failed.
    CanonFailed { detail: String },
    /// Bundle assembly failed.
    BundleFailed(BundleBuildError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PolicyBuildFailed { detail } => write!(f, "policy build failed: {detail}"),
            Self::SearchFailed(e) => write!(f, "search failed: {e}"),
            Self::ReleaseFailed { detail } => write!(f, "device release failed: {detail}"),
            Self::CanonFailed { detail } => write!(f, "canonical JSON error: {detail}"),
            Self::BundleFailed(e) => write!(f, "bundle assembly failed: {e}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Everything a completed session produces.
#[derive(Debug, Clone)]
pub struct SessionOutput {
    /// The search result, including the in-memory round log.
    pub result: SearchResult,
    /// The frozen policy snapshot the session ran under.
    pub snapshot: PolicySnapshotV1,
    /// The evidence bundle (verifiable offline).
    pub bundle: ReportBundleV1,
}

/// Run one search session against `device` and package the evidence.
///
/// The device is acquired by the `&mut` borrow and released by a final
/// reset that runs whether or not the search succeeded. A search failure
/// outranks a release failure; [`SessionError::ReleaseFailed`] surfaces
/// only for a session whose search completed.
///
/// # Errors
///
/// Returns [`SessionError`] at the first failing pipeline step. Sessions
/// are not resumable: rerun from the start after fixing the cause.
pub fn run_session(
    device: &mut dyn ScaleDeviceV1,
    config: &SessionConfig,
) -> Result<SessionOutput, SessionError> {
    // Freeze the policy before any device traffic.
    let snapshot = build_policy_snapshot(device.device_id(), config).map_err(|e| {
        SessionError::PolicyBuildFailed {
            detail: e.to_string(),
        }
    })?;
    let policy = effective_policy(config);

    let searched = run_search(device, &policy);
    // Hand the device back clean whatever the search did.
    let released = device.reset();
    let result = searched.map_err(SessionError::SearchFailed)?;
    released.map_err(|e| SessionError::ReleaseFailed {
        detail: e.to_string(),
    })?;

    let round_log_bytes =
        result
            .round_log
            .to_canonical_json_bytes()
            .map_err(|e| SessionError::CanonFailed {
                detail: e.to_string(),
            })?;
    let round_log_digest = result.round_log.digest().map_err(|e| SessionError::CanonFailed {
        detail: e.to_string(),
    })?;

    let report = SearchReportV1 {
        device_id: result.round_log.metadata.device_id.clone(),
        initial_count: result.round_log.metadata.initial_count,
        fake_label: result.fake.clone(),
        confirmation: result.confirmation.clone(),
        total_rounds: result.total_rounds(),
        round_log_digest,
        policy_digest: snapshot.digest.clone(),
    };
    let report_bytes = report
        .to_canonical_json_bytes()
        .map_err(|e| SessionError::CanonFailed {
            detail: e.to_string(),
        })?;

    let device_log_bytes = canonical_json_bytes(&serde_json::json!(&result.device_weighings))
        .map_err(|e| SessionError::CanonFailed {
            detail: e.to_string(),
        })?;

    let bundle = build_bundle(vec![
        (ARTIFACT_ROUND_LOG.to_string(), round_log_bytes, true),
        (
            ARTIFACT_POLICY_SNAPSHOT.to_string(),
            snapshot.bytes.clone(),
            true,
        ),
        (ARTIFACT_SEARCH_REPORT.to_string(), report_bytes, true),
        (ARTIFACT_DEVICE_LOG.to_string(), device_log_bytes, false),
    ])
    .map_err(SessionError::BundleFailed)?;

    Ok(SessionOutput {
        result,
        snapshot,
        bundle,
    })
}
