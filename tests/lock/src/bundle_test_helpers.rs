//! Shared test helpers for mutating and rebuilding report bundles.
//!
//! These helpers maintain digest consistency when modifying bundle artifacts,
//! preventing tests from accidentally testing digest mismatch instead of the
//! semantic mismatch they intend to exercise.

use karat_harness::bundle::{
    build_bundle, ReportBundleV1, ARTIFACT_ROUND_LOG, ARTIFACT_SEARCH_REPORT,
};
use karat_harness::devices::honest::HonestScale;
use karat_harness::policy::SessionConfig;
use karat_harness::runner::run_session;
use karat_kernel::proof::canon::canonical_json_bytes;
use karat_kernel::proof::hash::canonical_hash;
use karat_kernel::proof::hash_domain::HashDomain;

/// Run a full session against an honest scale and return its bundle.
///
/// # Panics
///
/// Panics if the session fails; callers only use honest devices, so a
/// failure here is a test bug.
#[must_use]
pub fn session_bundle(count: usize, fake_index: usize) -> ReportBundleV1 {
    let mut scale = HonestScale::new(count, fake_index);
    run_session(&mut scale, &SessionConfig::default())
        .unwrap()
        .bundle
}

/// Rebuild a bundle with one artifact's bytes replaced verbatim.
///
/// Content hashes, manifest, digest basis, and bundle digest are all
/// recomputed, so structural checks pass and the report's digest bindings
/// are the first checks that can fire. Use this when the test *wants* a
/// binding mismatch; use the `rebuild_with_modified_*` helpers otherwise.
///
/// # Panics
///
/// Panics if `name` is not present in the bundle.
#[must_use]
pub fn rebuild_with_artifact(
    bundle: &ReportBundleV1,
    name: &str,
    content: Vec<u8>,
) -> ReportBundleV1 {
    assert!(
        bundle.artifacts.contains_key(name),
        "bundle has no artifact named {name}"
    );
    let artifacts: Vec<(String, Vec<u8>, bool)> = bundle
        .artifacts
        .values()
        .map(|a| {
            if a.name == name {
                (a.name.clone(), content.clone(), a.normative)
            } else {
                (a.name.clone(), a.content.clone(), a.normative)
            }
        })
        .collect();
    build_bundle(artifacts).unwrap()
}

/// Modify the `search_report.json` in a bundle and rebuild.
///
/// The edited report is re-canonicalized before reassembly, so only the
/// semantic checks (digest bindings, identity coherence) can fire.
///
/// # Panics
///
/// Panics if the bundle is missing `search_report.json` or its content is
/// not valid JSON. These are test-only invariants.
#[must_use]
pub fn rebuild_with_modified_report(
    bundle: &ReportBundleV1,
    modify: impl FnOnce(&mut serde_json::Value),
) -> ReportBundleV1 {
    let report_artifact = bundle.artifacts.get(ARTIFACT_SEARCH_REPORT).unwrap();
    let mut report_json: serde_json::Value =
        serde_json::from_slice(&report_artifact.content).unwrap();
    modify(&mut report_json);
    let modified_report_bytes = canonical_json_bytes(&report_json).unwrap();
    rebuild_with_artifact(bundle, ARTIFACT_SEARCH_REPORT, modified_report_bytes)
}

/// Modify the `round_log.json` in a bundle and rebuild with a consistent
/// `round_log_digest` in the report, so that digest-binding checks pass
/// and only the coherence check under test fires.
///
/// This is the **only** sanctioned way to mutate the round log for
/// negative tests. Call sites must NOT manually patch report digests.
///
/// # Panics
///
/// Panics if the bundle is missing `round_log.json` or `search_report.json`,
/// or if their contents are not valid JSON. These are test-only invariants.
#[must_use]
pub fn rebuild_with_modified_round_log(
    bundle: &ReportBundleV1,
    modify: impl FnOnce(&mut serde_json::Value),
) -> ReportBundleV1 {
    let log_artifact = bundle.artifacts.get(ARTIFACT_ROUND_LOG).unwrap();
    let mut log_json: serde_json::Value = serde_json::from_slice(&log_artifact.content).unwrap();
    modify(&mut log_json);
    let modified_log_bytes = canonical_json_bytes(&log_json).unwrap();

    // Rebind the report's round_log_digest to the modified log.
    let new_log_digest = canonical_hash(HashDomain::RoundLog, &modified_log_bytes);
    let rebuilt = rebuild_with_artifact(bundle, ARTIFACT_ROUND_LOG, modified_log_bytes);
    rebuild_with_modified_report(&rebuilt, |report| {
        report["round_log_digest"] = serde_json::json!(new_log_digest.as_str());
    })
}
