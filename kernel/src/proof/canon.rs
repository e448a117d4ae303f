//! Canonical JSON bytes: the single serialization-for-hashing implementation.
//!
//! **Exactly one place** produces canonical JSON bytes in this workspace.
//! Every artifact digest (round log, policy snapshot, search report, bundle
//! manifest) routes through [`canonical_json_bytes`]; two artifacts are the
//! same artifact exactly when their canonical bytes match.
//!
//! # Canonicalization rules
//!
//! 1. Object keys are sorted lexicographically (byte order).
//! 2. No extraneous whitespace (compact form: `{"a":1,"b":2}`).
//! 3. Strings are JSON-escaped per RFC 8259 §7.
//! 4. Numbers must be integers (`i64` or `u64`). Floats are rejected to
//!    prevent cross-platform formatting drift.
//! 5. `null`, `true`, `false` are written literally.
//! 6. Output is always valid UTF-8.
//!
//! Rules 1-3 and 5-6 are exactly what `serde_json::to_vec` emits when the
//! `preserve_order` feature is off: `serde_json::Map` is `BTreeMap`-backed,
//! so keys serialize in sorted order and the compact writer adds no
//! whitespace. This module therefore only has to enforce rule 4 itself,
//! with a structural sweep before handing the value to the serializer.

use std::fmt;

/// Error type for canonical JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonError {
    /// A JSON number was not an integer.
    NonIntegerNumber {
        /// The offending number as serde_json renders it.
        raw: String,
        /// Dotted path from the root to the offending number.
        path: String,
    },
    /// `serde_json` failed to serialize the (already validated) value.
    Serialize { detail: String },
}

impl fmt::Display for CanonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonIntegerNumber { raw, path } => {
                write!(f, "non-integer number {raw} at {path} in canonical JSON")
            }
            Self::Serialize { detail } => {
                write!(f, "canonical JSON serialization failed: {detail}")
            }
        }
    }
}

impl std::error::Error for CanonError {}

/// Produce canonical JSON bytes from a `serde_json::Value`.
///
/// This is the single canonical JSON implementation in the workspace.
/// All hashing/digest flows that involve JSON must use this function.
///
/// # Errors
///
/// Returns [`CanonError::NonIntegerNumber`] if any number in the value is
/// not representable as `i64` or `u64` (serde_json cannot hold NaN or
/// infinities, so finite floats are the only non-integer case).
pub fn canonical_json_bytes(value: &serde_json::Value) -> Result<Vec<u8>, CanonError> {
    reject_non_integers(value, "$")?;
    serde_json::to_vec(value).map_err(|err| CanonError::Serialize {
        detail: err.to_string(),
    })
}

/// Structural sweep for rule 4: every number must be an i64 or u64.
fn reject_non_integers(value: &serde_json::Value, path: &str) -> Result<(), CanonError> {
    match value {
        serde_json::Value::Null
        | serde_json::Value::Bool(_)
        | serde_json::Value::String(_) => Ok(()),
        serde_json::Value::Number(n) => {
            if n.as_i64().is_some() || n.as_u64().is_some() {
                Ok(())
            } else {
                Err(CanonError::NonIntegerNumber {
                    raw: n.to_string(),
                    path: path.to_string(),
                })
            }
        }
        serde_json::Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                reject_non_integers(item, &format!("{path}[{index}]"))?;
            }
            Ok(())
        }
        serde_json::Value::Object(map) => {
            for (key, item) in map {
                reject_non_integers(item, &format!("{path}.{key}"))?;
            }
            Ok(())
        }
    }
}
