//! Bundle directory persistence: write/read/verify a [`ReportBundleV1`]
//! on disk.
//!
//! # Directory layout
//!
//! ```text
//! <dir>/
//!   bundle_manifest.json         — canonical JSON, full artifact listing
//!   bundle_digest_basis.json     — canonical JSON, normative projection only
//!   bundle_digest.txt            — ASCII digest string ("sha256:...")
//!   round_log.json               — artifact file (normative)
//!   policy_snapshot.json         — artifact file (normative)
//!   search_report.json           — artifact file (normative)
//!   device_log.json              — artifact file (observational)
//! ```
//!
//! The directory path is never part of any hash surface. File ordering on
//! disk is irrelevant; the manifest's declared list is the source of truth.
//!
//! # Fail-closed semantics
//!
//! - Missing declared artifact files → error
//! - Extra undeclared files → error
//! - Stored digest disagreeing with the recomputed one → error
//! - Integrity checks from [`verify_bundle`] on top of the read

use std::collections::BTreeSet;
use std::path::Path;

use karat_kernel::proof::hash::{canonical_hash, ContentHash};

use crate::bundle::{
    verify_bundle, BundleArtifact, BundleVerifyError, ReportBundleV1, DOMAIN_BUNDLE_DIGEST,
    SCHEMA_BUNDLE,
};

/// Fixed metadata filenames in the bundle directory.
const MANIFEST_FILENAME: &str = "bundle_manifest.json";
const DIGEST_BASIS_FILENAME: &str = "bundle_digest_basis.json";
const DIGEST_FILENAME: &str = "bundle_digest.txt";

/// The reserved metadata filenames (not artifact files).
const METADATA_FILENAMES: &[&str] = &[MANIFEST_FILENAME, DIGEST_BASIS_FILENAME, DIGEST_FILENAME];

/// Error writing a bundle directory.
#[derive(Debug)]
pub enum BundleDirWriteError {
    /// I/O error during write.
    Io { detail: String },
}

impl std::fmt::Display for BundleDirWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
        }
    }
}

impl std::error::Error for BundleDirWriteError {}

/// Error reading a bundle directory.
#[derive(Debug)]
pub enum BundleDirReadError {
    /// I/O error during read.
    Io { detail: String },
    /// A required metadata file is missing.
    MissingMetadata { filename: String },
    /// A declared artifact file is missing from the directory.
    MissingArtifact { name: String },
    /// An undeclared file exists in the directory.
    ExtraFile { name: String },
    /// `bundle_manifest.json` is not valid JSON.
    ManifestParseError { detail: String },
    /// Manifest `schema_version` is not recognized.
    ManifestVersionMismatch { found: String },
    /// An artifact entry in the manifest is missing a required field.
    ManifestEntryInvalid { detail: String },
    /// `bundle_digest.txt` does not match the recomputed digest.
    DigestMismatch { stored: String, recomputed: String },
}

impl std::fmt::Display for BundleDirReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::MissingMetadata { filename } => write!(f, "missing metadata file: {filename}"),
            Self::MissingArtifact { name } => write!(f, "missing artifact: {name}"),
            Self::ExtraFile { name } => write!(f, "undeclared extra file: {name}"),
            Self::ManifestParseError { detail } => write!(f, "manifest parse error: {detail}"),
            Self::ManifestVersionMismatch { found } => {
                write!(f, "manifest version mismatch: {found}")
            }
            Self::ManifestEntryInvalid { detail } => write!(f, "manifest entry invalid: {detail}"),
            Self::DigestMismatch { stored, recomputed } => {
                write!(f, "digest mismatch: stored={stored}, recomputed={recomputed}")
            }
        }
    }
}

impl std::error::Error for BundleDirReadError {}

/// Error verifying a bundle directory.
#[derive(Debug)]
pub enum BundleDirVerifyError {
    /// Error reading the directory.
    ReadError(BundleDirReadError),
    /// Bundle integrity verification failed.
    VerifyError(BundleVerifyError),
}

impl std::fmt::Display for BundleDirVerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadError(e) => write!(f, "read error: {e}"),
            Self::VerifyError(e) => write!(f, "verify error: {e}"),
        }
    }
}

impl std::error::Error for BundleDirVerifyError {}

/// Write a [`ReportBundleV1`] to a directory.
///
/// Creates the directory if it does not exist, then writes each artifact
/// file plus the three metadata files.
///
/// # Errors
///
/// Returns [`BundleDirWriteError`] on I/O failure.
pub fn write_bundle_dir(bundle: &ReportBundleV1, dir: &Path) -> Result<(), BundleDirWriteError> {
    std::fs::create_dir_all(dir).map_err(|e| BundleDirWriteError::Io {
        detail: format!("create_dir_all: {e}"),
    })?;

    for artifact in bundle.artifacts.values() {
        write_atomic(&dir.join(&artifact.name), &artifact.content)?;
    }

    write_atomic(&dir.join(MANIFEST_FILENAME), &bundle.manifest)?;
    write_atomic(&dir.join(DIGEST_BASIS_FILENAME), &bundle.digest_basis)?;
    write_atomic(&dir.join(DIGEST_FILENAME), bundle.digest.as_str().as_bytes())?;

    Ok(())
}

/// Read a bundle directory back into a [`ReportBundleV1`].
///
/// Fail-closed:
/// - Missing declared artifact files → error
/// - Extra undeclared files → error
/// - Manifest must be valid JSON with `schema_version: "bundle.v1"`
/// - `bundle_digest.txt` must match the digest recomputed from
///   `bundle_digest_basis.json`
///
/// # Errors
///
/// Returns [`BundleDirReadError`] on any validation failure.
pub fn read_bundle_dir(dir: &Path) -> Result<ReportBundleV1, BundleDirReadError> {
    let manifest_bytes = read_required(dir, MANIFEST_FILENAME)?;
    let digest_basis_bytes = read_required(dir, DIGEST_BASIS_FILENAME)?;
    let digest_text = read_required(dir, DIGEST_FILENAME)?;

    let manifest_value: serde_json::Value =
        serde_json::from_slice(&manifest_bytes).map_err(|e| {
            BundleDirReadError::ManifestParseError {
                detail: e.to_string(),
            }
        })?;

    let schema_version = manifest_value["schema_version"].as_str().unwrap_or("");
    if schema_version != SCHEMA_BUNDLE {
        return Err(BundleDirReadError::ManifestVersionMismatch {
            found: schema_version.to_string(),
        });
    }

    let entries = manifest_value["artifacts"].as_array().ok_or_else(|| {
        BundleDirReadError::ManifestParseError {
            detail: "\"artifacts\" is not an array".into(),
        }
    })?;

    let mut artifacts = std::collections::BTreeMap::new();
    let mut declared: BTreeSet<String> = BTreeSet::new();

    for entry in entries {
        let name = entry["name"]
            .as_str()
            .ok_or_else(|| BundleDirReadError::ManifestEntryInvalid {
                detail: "missing \"name\" field".into(),
            })?
            .to_string();
        let content_hash_text = entry["content_hash"].as_str().ok_or_else(|| {
            BundleDirReadError::ManifestEntryInvalid {
                detail: format!("missing \"content_hash\" for {name}"),
            }
        })?;
        let normative = entry["normative"].as_bool().ok_or_else(|| {
            BundleDirReadError::ManifestEntryInvalid {
                detail: format!("missing \"normative\" for {name}"),
            }
        })?;
        let content_hash = ContentHash::parse(content_hash_text).ok_or_else(|| {
            BundleDirReadError::ManifestEntryInvalid {
                detail: format!("invalid content_hash for {name}: {content_hash_text}"),
            }
        })?;

        let content = std::fs::read(dir.join(&name))
            .map_err(|_| BundleDirReadError::MissingArtifact { name: name.clone() })?;

        declared.insert(name.clone());
        artifacts.insert(
            name.clone(),
            BundleArtifact {
                name,
                content,
                content_hash,
                normative,
            },
        );
    }

    // Reject files the manifest does not declare.
    for filename in &list_files(dir)? {
        let reserved = METADATA_FILENAMES.contains(&filename.as_str());
        if !reserved && !declared.contains(filename) {
            return Err(BundleDirReadError::ExtraFile {
                name: filename.clone(),
            });
        }
    }

    // The stored digest must match the basis on disk.
    let recomputed = canonical_hash(DOMAIN_BUNDLE_DIGEST, &digest_basis_bytes);
    let stored = String::from_utf8_lossy(&digest_text).trim().to_string();
    if recomputed.as_str() != stored {
        return Err(BundleDirReadError::DigestMismatch {
            stored,
            recomputed: recomputed.as_str().to_string(),
        });
    }

    Ok(ReportBundleV1 {
        artifacts,
        manifest: manifest_bytes,
        digest_basis: digest_basis_bytes,
        digest: recomputed,
    })
}

/// Read a bundle directory and run the full integrity verification.
///
/// This is the offline verification entrypoint: everything
/// [`read_bundle_dir`] checks, then everything [`verify_bundle`] checks.
///
/// # Errors
///
/// Returns [`BundleDirVerifyError`] on read failure or integrity mismatch.
pub fn verify_bundle_dir(dir: &Path) -> Result<ReportBundleV1, BundleDirVerifyError> {
    let bundle = read_bundle_dir(dir).map_err(BundleDirVerifyError::ReadError)?;
    verify_bundle(&bundle).map_err(BundleDirVerifyError::VerifyError)?;
    Ok(bundle)
}

/// Write bytes via temp file + rename (best-effort atomicity on Unix).
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), BundleDirWriteError> {
    let dir = path.parent().ok_or_else(|| BundleDirWriteError::Io {
        detail: "no parent directory".into(),
    })?;
    let temp_name = format!(
        ".tmp_{}",
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    let temp_path = dir.join(temp_name);

    std::fs::write(&temp_path, content).map_err(|e| BundleDirWriteError::Io {
        detail: format!("write {}: {e}", temp_path.display()),
    })?;
    std::fs::rename(&temp_path, path).map_err(|e| BundleDirWriteError::Io {
        detail: format!("rename {} to {}: {e}", temp_path.display(), path.display()),
    })?;
    Ok(())
}

/// Read a required metadata file; missing file is a typed error.
fn read_required(dir: &Path, filename: &str) -> Result<Vec<u8>, BundleDirReadError> {
    std::fs::read(dir.join(filename)).map_err(|_| BundleDirReadError::MissingMetadata {
        filename: filename.to_string(),
    })
}

/// List regular files in the directory (filenames only).
fn list_files(dir: &Path) -> Result<BTreeSet<String>, BundleDirReadError> {
    let mut files = BTreeSet::new();
    let entries = std::fs::read_dir(dir).map_err(|e| BundleDirReadError::Io {
        detail: format!("read_dir: {e}"),
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| BundleDirReadError::Io {
            detail: format!("dir entry: {e}"),
        })?;
        let file_type = entry.file_type().map_err(|e| BundleDirReadError::Io {
            detail: format!("file_type: {e}"),
        })?;
        if file_type.is_file() {
            if let Some(name) = entry.file_name().to_str() {
                // Skip leftover temp files from write_atomic.
                if !name.starts_with(".tmp_") {
                    files.insert(name.to_string());
                }
            }
        }
    }
    Ok(files)
}
