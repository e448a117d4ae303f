//! In-memory evidence bundle: the output of a session run.
//!
//! No file I/O in this module. The bundle is a deterministic in-memory
//! representation that can be inspected programmatically; persistence
//! lives in [`crate::bundle_dir`].
//!
//! # Normative vs observational artifacts
//!
//! Each artifact is tagged `normative` (participates in the bundle digest)
//! or observational (present in the manifest but excluded from the digest).
//!
//! `device_log.json` is observational because its text is device-authored:
//! a hardware adapter may interleave timestamps or UI noise. The
//! controller-derived view of every weighing lives in the normative
//! `round_log.json`.
//!
//! The bundle digest is computed over the **digest basis**: a canonical
//! JSON projection of normative artifact hashes only.
//!
//! # Fixed artifact set
//!
//! A session bundle always holds exactly four artifacts:
//!
//! | name                   | normative |
//! |------------------------|-----------|
//! | `round_log.json`       | yes       |
//! | `policy_snapshot.json` | yes       |
//! | `search_report.json`   | yes       |
//! | `device_log.json`      | no        |
//!
//! Verification is fail-closed: a missing or unexpected artifact is an
//! error, as is any digest, binding, or coherence mismatch.

use std::collections::BTreeMap;

use karat_kernel::proof::canon::canonical_json_bytes;
use karat_kernel::proof::hash::{canonical_hash, ContentHash};
use karat_kernel::proof::hash_domain::HashDomain;

use crate::policy::SCHEMA_POLICY_SNAPSHOT;
use crate::report::SCHEMA_SEARCH_REPORT;
use karat_search::log::SCHEMA_ROUND_LOG;

/// Domain prefix for bundle artifact content hashing (harness-originated).
pub const DOMAIN_BUNDLE_ARTIFACT: HashDomain = HashDomain::BundleArtifact;

/// Domain prefix for bundle digest computation (harness-originated).
pub const DOMAIN_BUNDLE_DIGEST: HashDomain = HashDomain::BundleDigest;

/// Schema identifier embedded in the manifest.
pub const SCHEMA_BUNDLE: &str = "bundle.v1";

/// Schema identifier embedded in the digest basis.
pub const SCHEMA_DIGEST_BASIS: &str = "bundle_digest_basis.v1";

/// Round log artifact filename.
pub const ARTIFACT_ROUND_LOG: &str = "round_log.json";

/// Policy snapshot artifact filename.
pub const ARTIFACT_POLICY_SNAPSHOT: &str = "policy_snapshot.json";

/// Search report artifact filename.
pub const ARTIFACT_SEARCH_REPORT: &str = "search_report.json";

/// Device log artifact filename (observational).
pub const ARTIFACT_DEVICE_LOG: &str = "device_log.json";

/// The fixed artifact set with normativity flags.
const EXPECTED_ARTIFACTS: &[(&str, bool)] = &[
    (ARTIFACT_DEVICE_LOG, false),
    (ARTIFACT_POLICY_SNAPSHOT, true),
    (ARTIFACT_ROUND_LOG, true),
    (ARTIFACT_SEARCH_REPORT, true),
];

/// A single artifact in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleArtifact {
    /// Logical filename (e.g., `"round_log.json"`).
    pub name: String,
    /// Raw bytes of the artifact.
    pub content: Vec<u8>,
    /// Content hash: `canonical_hash(DOMAIN_BUNDLE_ARTIFACT, content)`.
    pub content_hash: ContentHash,
    /// Whether this artifact participates in the bundle digest.
    pub normative: bool,
}

/// The complete evidence bundle from a session run.
#[derive(Debug, Clone)]
pub struct ReportBundleV1 {
    /// Artifacts indexed by logical name, in sorted order (`BTreeMap`).
    pub artifacts: BTreeMap<String, BundleArtifact>,
    /// Full manifest: canonical JSON listing all artifacts with normative flags.
    pub manifest: Vec<u8>,
    /// Digest basis: canonical JSON listing normative artifact hashes only.
    pub digest_basis: Vec<u8>,
    /// Bundle digest: `canonical_hash(DOMAIN_BUNDLE_DIGEST, digest_basis)`.
    pub digest: ContentHash,
}

/// Error building a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleBuildError {
    /// Canonical JSON serialization failed.
    CanonError { detail: String },
    /// Two inputs share a logical filename.
    DuplicateArtifact { name: String },
}

impl std::fmt::Display for BundleBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CanonError { detail } => write!(f, "canonical JSON error: {detail}"),
            Self::DuplicateArtifact { name } => write!(f, "duplicate artifact name: {name}"),
        }
    }
}

impl std::error::Error for BundleBuildError {}

/// Input for bundle assembly.
pub struct ArtifactInput {
    /// Logical filename.
    pub name: String,
    /// Raw bytes of the artifact.
    pub content: Vec<u8>,
    /// Whether this artifact participates in the bundle digest.
    pub normative: bool,
}

impl From<(String, Vec<u8>, bool)> for ArtifactInput {
    fn from((name, content, normative): (String, Vec<u8>, bool)) -> Self {
        Self {
            name,
            content,
            normative,
        }
    }
}

/// Build a [`ReportBundleV1`] from a list of artifact inputs.
///
/// Computes content hashes, builds the sorted manifest and digest basis,
/// and derives the bundle digest. All JSON via the kernel's
/// `canonical_json_bytes`.
///
/// Accepts `Vec<ArtifactInput>` or `Vec<(String, Vec<u8>, bool)>` (via `From`).
///
/// # Errors
///
/// Returns [`BundleBuildError`] on a duplicate artifact name or if
/// canonical JSON serialization fails.
pub fn build_bundle(
    artifacts: Vec<impl Into<ArtifactInput>>,
) -> Result<ReportBundleV1, BundleBuildError> {
    let mut artifact_map = BTreeMap::new();

    for input in artifacts {
        let input = input.into();
        let content_hash = canonical_hash(DOMAIN_BUNDLE_ARTIFACT, &input.content);
        let entry = BundleArtifact {
            name: input.name.clone(),
            content: input.content,
            content_hash,
            normative: input.normative,
        };
        if artifact_map.insert(input.name.clone(), entry).is_some() {
            return Err(BundleBuildError::DuplicateArtifact { name: input.name });
        }
    }

    let manifest = compute_manifest_bytes(&artifact_map)
        .map_err(|detail| BundleBuildError::CanonError { detail })?;

    let digest_basis = compute_digest_basis_bytes(&artifact_map)
        .map_err(|detail| BundleBuildError::CanonError { detail })?;

    let digest = canonical_hash(DOMAIN_BUNDLE_DIGEST, &digest_basis);

    Ok(ReportBundleV1 {
        artifacts: artifact_map,
        manifest,
        digest_basis,
        digest,
    })
}

/// Error from bundle integrity verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleVerifyError {
    /// A required artifact is absent.
    MissingArtifact { name: String },
    /// An artifact outside the fixed set is present.
    UnexpectedArtifact { name: String },
    /// An artifact carries the wrong normativity flag.
    NormativityMismatch { name: String, expected: bool },
    /// An artifact's stored `content_hash` does not match the recomputed hash.
    ContentHashMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },
    /// Stored `manifest` bytes do not match the recomputed manifest.
    ManifestMismatch,
    /// Stored `digest_basis` bytes do not match the recomputed projection.
    DigestBasisMismatch,
    /// Stored `digest` does not match the recomputed hash of `digest_basis`.
    DigestMismatch { expected: String, actual: String },
    /// A normative JSON artifact is not in canonical JSON form.
    ArtifactNotCanonical { artifact: String },
    /// An artifact failed JSON parsing.
    ArtifactParseError { artifact: String, detail: String },
    /// An artifact is missing a required field (or it has the wrong type).
    FieldMissing {
        artifact: String,
        field: &'static str,
    },
    /// An artifact declares an unexpected `schema_version`.
    SchemaVersionMismatch { artifact: String, found: String },
    /// The report's `round_log_digest` does not match the digest recomputed
    /// from `round_log.json`.
    RoundLogDigestMismatch { declared: String, recomputed: String },
    /// The report's `policy_digest` does not match the digest recomputed
    /// from `policy_snapshot.json`.
    PolicyDigestMismatch { declared: String, recomputed: String },
    /// The same identity field disagrees across artifacts.
    IdentityMismatch {
        field: &'static str,
        in_report: String,
        observed: String,
    },
    /// The round log's `lineup_fingerprint` is not a canonical sha256 hash.
    LineupFingerprintInvalid { value: String },
    /// `device_log.json` entry count does not match the report's round count.
    WeighingCountMismatch { logged: u64, expected: u64 },
    /// Canonical JSON error during verification.
    CanonError { detail: String },
}

impl std::fmt::Display for BundleVerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingArtifact { name } => write!(f, "missing artifact: {name}"),
            Self::UnexpectedArtifact { name } => write!(f, "unexpected artifact: {name}"),
            Self::NormativityMismatch { name, expected } => {
                write!(f, "artifact {name} must have normative={expected}")
            }
            Self::ContentHashMismatch {
                artifact,
                expected,
                actual,
            } => write!(
                f,
                "content hash mismatch for {artifact}: stored {expected}, recomputed {actual}"
            ),
            Self::ManifestMismatch => f.write_str("manifest does not match artifacts"),
            Self::DigestBasisMismatch => f.write_str("digest basis does not match artifacts"),
            Self::DigestMismatch { expected, actual } => write!(
                f,
                "bundle digest mismatch: stored {expected}, recomputed {actual}"
            ),
            Self::ArtifactNotCanonical { artifact } => {
                write!(f, "artifact {artifact} is not canonical JSON")
            }
            Self::ArtifactParseError { artifact, detail } => {
                write!(f, "artifact {artifact} failed to parse: {detail}")
            }
            Self::FieldMissing { artifact, field } => {
                write!(f, "artifact {artifact} is missing field {field}")
            }
            Self::SchemaVersionMismatch { artifact, found } => {
                write!(f, "artifact {artifact} has schema_version {found:?}")
            }
            Self::RoundLogDigestMismatch {
                declared,
                recomputed,
            } => write!(
                f,
                "round_log_digest mismatch: report declares {declared}, recomputed {recomputed}"
            ),
            Self::PolicyDigestMismatch {
                declared,
                recomputed,
            } => write!(
                f,
                "policy_digest mismatch: report declares {declared}, recomputed {recomputed}"
            ),
            Self::IdentityMismatch {
                field,
                in_report,
                observed,
            } => write!(
                f,
                "{field} disagrees: report says {in_report:?}, sibling artifact says {observed:?}"
            ),
            Self::LineupFingerprintInvalid { value } => {
                write!(f, "lineup_fingerprint is not a canonical sha256 hash: {value:?}")
            }
            Self::WeighingCountMismatch { logged, expected } => write!(
                f,
                "device log records {logged} weighings but the report declares {expected}"
            ),
            Self::CanonError { detail } => write!(f, "canonical JSON error: {detail}"),
        }
    }
}

impl std::error::Error for BundleVerifyError {}

/// Verify a bundle's integrity. Fail-closed: the first failing check wins.
///
/// Checks, in order:
///
/// 1. The artifact set is exactly the fixed four, with the expected
///    normativity flags.
/// 2. Every artifact's stored `content_hash` matches its content.
/// 3. The stored manifest matches the recomputed manifest byte-for-byte.
/// 4. The stored digest basis matches the recomputed normative projection.
/// 5. The stored bundle digest matches the recomputed hash of the basis.
/// 6. Every normative artifact is canonical JSON with the expected
///    `schema_version`.
/// 7. The report's `round_log_digest` and `policy_digest` match digests
///    recomputed from the sibling artifacts.
/// 8. Identity fields agree across artifacts: `device_id` (report, round
///    log, policy snapshot), `fake_label`, `initial_count`, and
///    `total_rounds` (report vs round log, including the records array).
/// 9. The round log's `lineup_fingerprint` is a canonical sha256 hash.
/// 10. The observational device log parses as a string array with one
///     entry per declared round.
///
/// # Errors
///
/// Returns the [`BundleVerifyError`] for the first failing check.
pub fn verify_bundle(bundle: &ReportBundleV1) -> Result<(), BundleVerifyError> {
    // Step 1: fixed artifact set.
    verify_artifact_set(bundle)?;

    // Step 2: per-artifact content hashes.
    for artifact in bundle.artifacts.values() {
        let recomputed = canonical_hash(DOMAIN_BUNDLE_ARTIFACT, &artifact.content);
        if recomputed != artifact.content_hash {
            return Err(BundleVerifyError::ContentHashMismatch {
                artifact: artifact.name.clone(),
                expected: artifact.content_hash.as_str().to_string(),
                actual: recomputed.as_str().to_string(),
            });
        }
    }

    // Step 3: manifest recompute. Byte equality against the canonical
    // recomputation also proves the stored bytes are canonical.
    let expected_manifest = compute_manifest_bytes(&bundle.artifacts)
        .map_err(|detail| BundleVerifyError::CanonError { detail })?;
    if expected_manifest != bundle.manifest {
        return Err(BundleVerifyError::ManifestMismatch);
    }

    // Step 4: digest basis recompute.
    let expected_basis = compute_digest_basis_bytes(&bundle.artifacts)
        .map_err(|detail| BundleVerifyError::CanonError { detail })?;
    if expected_basis != bundle.digest_basis {
        return Err(BundleVerifyError::DigestBasisMismatch);
    }

    // Step 5: bundle digest recompute.
    let recomputed_digest = canonical_hash(DOMAIN_BUNDLE_DIGEST, &bundle.digest_basis);
    if recomputed_digest != bundle.digest {
        return Err(BundleVerifyError::DigestMismatch {
            expected: bundle.digest.as_str().to_string(),
            actual: recomputed_digest.as_str().to_string(),
        });
    }

    // Step 6: normative artifacts are canonical JSON with the right schema.
    for (name, schema) in [
        (ARTIFACT_ROUND_LOG, SCHEMA_ROUND_LOG),
        (ARTIFACT_POLICY_SNAPSHOT, SCHEMA_POLICY_SNAPSHOT),
        (ARTIFACT_SEARCH_REPORT, SCHEMA_SEARCH_REPORT),
    ] {
        let value = parse_canonical_artifact(bundle, name)?;
        // The round log carries its schema_version inside `metadata`;
        // the snapshot and report carry it at the top level.
        let holder = if name == ARTIFACT_ROUND_LOG {
            &value["metadata"]
        } else {
            &value
        };
        let found = schema_version_of(holder, name)?;
        if found != schema {
            return Err(BundleVerifyError::SchemaVersionMismatch {
                artifact: name.to_string(),
                found: found.to_string(),
            });
        }
    }

    // Step 7: report digest bindings.
    verify_round_log_digest_binding(bundle)?;
    verify_policy_digest_binding(bundle)?;

    // Steps 8-9: cross-artifact identity coherence.
    verify_identity_coherence(bundle)?;

    // Step 10: device log coherence.
    verify_device_log_coherence(bundle)?;

    Ok(())
}

/// Recompute manifest bytes from the artifact map.
fn compute_manifest_bytes(artifacts: &BTreeMap<String, BundleArtifact>) -> Result<Vec<u8>, String> {
    let manifest_artifacts: Vec<serde_json::Value> = artifacts
        .values()
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
                "normative": a.normative,
            })
        })
        .collect();

    let manifest_value = serde_json::json!({
        "artifacts": manifest_artifacts,
        "schema_version": SCHEMA_BUNDLE,
    });

    canonical_json_bytes(&manifest_value).map_err(|e| e.to_string())
}

/// Recompute digest basis bytes from normative artifacts only.
fn compute_digest_basis_bytes(
    artifacts: &BTreeMap<String, BundleArtifact>,
) -> Result<Vec<u8>, String> {
    let normative_artifacts: Vec<serde_json::Value> = artifacts
        .values()
        .filter(|a| a.normative)
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
            })
        })
        .collect();

    let digest_basis_value = serde_json::json!({
        "artifacts": normative_artifacts,
        "schema_version": SCHEMA_DIGEST_BASIS,
    });

    canonical_json_bytes(&digest_basis_value).map_err(|e| e.to_string())
}

/// Check the artifact set is exactly the fixed four with expected flags.
fn verify_artifact_set(bundle: &ReportBundleV1) -> Result<(), BundleVerifyError> {
    for (name, normative) in EXPECTED_ARTIFACTS {
        match bundle.artifacts.get(*name) {
            None => {
                return Err(BundleVerifyError::MissingArtifact {
                    name: (*name).to_string(),
                })
            }
            Some(artifact) if artifact.normative != *normative => {
                return Err(BundleVerifyError::NormativityMismatch {
                    name: (*name).to_string(),
                    expected: *normative,
                });
            }
            Some(_) => {}
        }
    }
    for name in bundle.artifacts.keys() {
        if !EXPECTED_ARTIFACTS.iter().any(|(n, _)| n == name) {
            return Err(BundleVerifyError::UnexpectedArtifact { name: name.clone() });
        }
    }
    Ok(())
}

/// Parse an artifact as JSON and confirm its bytes are canonical.
fn parse_canonical_artifact(
    bundle: &ReportBundleV1,
    name: &str,
) -> Result<serde_json::Value, BundleVerifyError> {
    let artifact =
        bundle
            .artifacts
            .get(name)
            .ok_or_else(|| BundleVerifyError::MissingArtifact {
                name: name.to_string(),
            })?;
    let value: serde_json::Value = serde_json::from_slice(&artifact.content).map_err(|e| {
        BundleVerifyError::ArtifactParseError {
            artifact: name.to_string(),
            detail: e.to_string(),
        }
    })?;
    let recanonicalized =
        canonical_json_bytes(&value).map_err(|e| BundleVerifyError::CanonError {
            detail: e.to_string(),
        })?;
    if recanonicalized != artifact.content {
        return Err(BundleVerifyError::ArtifactNotCanonical {
            artifact: name.to_string(),
        });
    }
    Ok(value)
}

/// Extract `schema_version` from a parsed artifact.
fn schema_version_of<'a>(
    value: &'a serde_json::Value,
    artifact: &str,
) -> Result<&'a str, BundleVerifyError> {
    value["schema_version"]
        .as_str()
        .ok_or_else(|| BundleVerifyError::FieldMissing {
            artifact: artifact.to_string(),
            field: "schema_version",
        })
}

/// Extract a string field from a parsed artifact.
fn require_str<'a>(
    value: &'a serde_json::Value,
    artifact: &str,
    field: &'static str,
) -> Result<&'a str, BundleVerifyError> {
    value[field]
        .as_str()
        .ok_or_else(|| BundleVerifyError::FieldMissing {
            artifact: artifact.to_string(),
            field,
        })
}

/// Extract an unsigned integer field from a parsed artifact.
fn require_u64(
    value: &serde_json::Value,
    artifact: &str,
    field: &'static str,
) -> Result<u64, BundleVerifyError> {
    value[field]
        .as_u64()
        .ok_or_else(|| BundleVerifyError::FieldMissing {
            artifact: artifact.to_string(),
            field,
        })
}

/// The report's `round_log_digest` must match the digest recomputed from
/// the round log artifact's bytes under the round-log domain.
fn verify_round_log_digest_binding(bundle: &ReportBundleV1) -> Result<(), BundleVerifyError> {
    let report = parse_canonical_artifact(bundle, ARTIFACT_SEARCH_REPORT)?;
    let declared = require_str(&report, ARTIFACT_SEARCH_REPORT, "round_log_digest")?;

    let log_artifact = bundle.artifacts.get(ARTIFACT_ROUND_LOG).ok_or_else(|| {
        BundleVerifyError::MissingArtifact {
            name: ARTIFACT_ROUND_LOG.to_string(),
        }
    })?;
    let recomputed = canonical_hash(HashDomain::RoundLog, &log_artifact.content);

    if recomputed.as_str() != declared {
        return Err(BundleVerifyError::RoundLogDigestMismatch {
            declared: declared.to_string(),
            recomputed: recomputed.as_str().to_string(),
        });
    }
    Ok(())
}

/// The report's `policy_digest` must match the digest recomputed from the
/// policy snapshot artifact's bytes under the policy-snapshot domain.
fn verify_policy_digest_binding(bundle: &ReportBundleV1) -> Result<(), BundleVerifyError> {
    let report = parse_canonical_artifact(bundle, ARTIFACT_SEARCH_REPORT)?;
    let declared = require_str(&report, ARTIFACT_SEARCH_REPORT, "policy_digest")?;

    let policy_artifact = bundle
        .artifacts
        .get(ARTIFACT_POLICY_SNAPSHOT)
        .ok_or_else(|| BundleVerifyError::MissingArtifact {
            name: ARTIFACT_POLICY_SNAPSHOT.to_string(),
        })?;
    let recomputed = canonical_hash(HashDomain::PolicySnapshot, &policy_artifact.content);

    if recomputed.as_str() != declared {
        return Err(BundleVerifyError::PolicyDigestMismatch {
            declared: declared.to_string(),
            recomputed: recomputed.as_str().to_string(),
        });
    }
    Ok(())
}

/// Identity fields must agree wherever they appear.
fn verify_identity_coherence(bundle: &ReportBundleV1) -> Result<(), BundleVerifyError> {
    let report = parse_canonical_artifact(bundle, ARTIFACT_SEARCH_REPORT)?;
    let log = parse_canonical_artifact(bundle, ARTIFACT_ROUND_LOG)?;
    let policy = parse_canonical_artifact(bundle, ARTIFACT_POLICY_SNAPSHOT)?;
    let metadata = &log["metadata"];
    if metadata.is_null() {
        return Err(BundleVerifyError::FieldMissing {
            artifact: ARTIFACT_ROUND_LOG.to_string(),
            field: "metadata",
        });
    }

    let report_device = require_str(&report, ARTIFACT_SEARCH_REPORT, "device_id")?;
    let log_device = require_str(metadata, ARTIFACT_ROUND_LOG, "device_id")?;
    if report_device != log_device {
        return Err(BundleVerifyError::IdentityMismatch {
            field: "device_id",
            in_report: report_device.to_string(),
            observed: log_device.to_string(),
        });
    }
    let policy_device = require_str(&policy, ARTIFACT_POLICY_SNAPSHOT, "device_id")?;
    if report_device != policy_device {
        return Err(BundleVerifyError::IdentityMismatch {
            field: "device_id",
            in_report: report_device.to_string(),
            observed: policy_device.to_string(),
        });
    }

    let report_fake = require_str(&report, ARTIFACT_SEARCH_REPORT, "fake_label")?;
    let log_fake = require_str(metadata, ARTIFACT_ROUND_LOG, "fake_label")?;
    if report_fake != log_fake {
        return Err(BundleVerifyError::IdentityMismatch {
            field: "fake_label",
            in_report: report_fake.to_string(),
            observed: log_fake.to_string(),
        });
    }

    let report_initial = require_u64(&report, ARTIFACT_SEARCH_REPORT, "initial_count")?;
    let log_initial = require_u64(metadata, ARTIFACT_ROUND_LOG, "initial_count")?;
    if report_initial != log_initial {
        return Err(BundleVerifyError::IdentityMismatch {
            field: "initial_count",
            in_report: report_initial.to_string(),
            observed: log_initial.to_string(),
        });
    }

    let report_rounds = require_u64(&report, ARTIFACT_SEARCH_REPORT, "total_rounds")?;
    let log_rounds = require_u64(metadata, ARTIFACT_ROUND_LOG, "total_rounds")?;
    if report_rounds != log_rounds {
        return Err(BundleVerifyError::IdentityMismatch {
            field: "total_rounds",
            in_report: report_rounds.to_string(),
            observed: log_rounds.to_string(),
        });
    }
    let record_count =
        log["rounds"]
            .as_array()
            .map(Vec::len)
            .ok_or_else(|| BundleVerifyError::FieldMissing {
                artifact: ARTIFACT_ROUND_LOG.to_string(),
                field: "rounds",
            })?;
    if record_count as u64 != report_rounds {
        return Err(BundleVerifyError::IdentityMismatch {
            field: "total_rounds",
            in_report: report_rounds.to_string(),
            observed: record_count.to_string(),
        });
    }

    let fingerprint = require_str(metadata, ARTIFACT_ROUND_LOG, "lineup_fingerprint")?;
    let valid = ContentHash::parse(fingerprint).is_some_and(|h| h.is_canonical_sha256());
    if !valid {
        return Err(BundleVerifyError::LineupFingerprintInvalid {
            value: fingerprint.to_string(),
        });
    }

    Ok(())
}

/// The device log must be a string array with one entry per round.
fn verify_device_log_coherence(bundle: &ReportBundleV1) -> Result<(), BundleVerifyError> {
    let report = parse_canonical_artifact(bundle, ARTIFACT_SEARCH_REPORT)?;
    let expected = require_u64(&report, ARTIFACT_SEARCH_REPORT, "total_rounds")?;

    let log_artifact = bundle.artifacts.get(ARTIFACT_DEVICE_LOG).ok_or_else(|| {
        BundleVerifyError::MissingArtifact {
            name: ARTIFACT_DEVICE_LOG.to_string(),
        }
    })?;
    let value: serde_json::Value = serde_json::from_slice(&log_artifact.content).map_err(|e| {
        BundleVerifyError::ArtifactParseError {
            artifact: ARTIFACT_DEVICE_LOG.to_string(),
            detail: e.to_string(),
        }
    })?;
    let entries = value
        .as_array()
        .ok_or_else(|| BundleVerifyError::FieldMissing {
            artifact: ARTIFACT_DEVICE_LOG.to_string(),
            field: "entries",
        })?;
    if entries.iter().any(|e| !e.is_string()) {
        return Err(BundleVerifyError::ArtifactParseError {
            artifact: ARTIFACT_DEVICE_LOG.to_string(),
            detail: "non-string entry".to_string(),
        });
    }
    let logged = entries.len() as u64;
    if logged != expected {
        return Err(BundleVerifyError::WeighingCountMismatch { logged, expected });
    }
    Ok(())
}
