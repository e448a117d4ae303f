//! Canonical hashing: domain-separated SHA-256 content addressing.
//!
//! **Exactly one place defines canonical hashing** in this workspace. Every
//! digest — lineup fingerprints, round logs, policy snapshots, bundle
//! artifacts — is `sha256(domain_prefix || bytes)` rendered as
//! `"sha256:<lowercase_hex>"`. Domain prefixes are the typed
//! [`HashDomain`](super::hash_domain::HashDomain) separators, so equal bytes
//! hashed for different purposes never collide into the same address.

use std::fmt;

use sha2::{Digest, Sha256};

use super::hash_domain::HashDomain;

/// A content-addressed hash with algorithm identifier.
///
/// Format: `"algorithm:hex_digest"` (e.g. `"sha256:abcdef..."`).
///
/// [`ContentHash::parse`] is deliberately permissive (any non-empty
/// algorithm, any non-empty digest) so artifacts from newer writers still
/// parse; callers that require the canonical V1 form use
/// [`ContentHash::is_canonical_sha256`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash {
    full: String,
}

impl ContentHash {
    /// Parse from `"algorithm:hex"` format.
    ///
    /// Returns `None` if there is no `:` separator or either side of the
    /// first separator is empty.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (algorithm, digest) = s.split_once(':')?;
        if algorithm.is_empty() || digest.is_empty() {
            return None;
        }
        Some(Self {
            full: s.to_string(),
        })
    }

    /// The algorithm portion (e.g. `"sha256"`).
    #[must_use]
    pub fn algorithm(&self) -> &str {
        match self.full.split_once(':') {
            Some((algorithm, _)) => algorithm,
            None => &self.full,
        }
    }

    /// The hex digest portion.
    #[must_use]
    pub fn hex_digest(&self) -> &str {
        match self.full.split_once(':') {
            Some((_, digest)) => digest,
            None => "",
        }
    }

    /// The full string representation (`"algorithm:hex_digest"`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// True if this is the canonical V1 form: algorithm `sha256` with a
    /// 64-character lowercase hex digest.
    #[must_use]
    pub fn is_canonical_sha256(&self) -> bool {
        self.algorithm() == "sha256"
            && self.hex_digest().len() == 64
            && self
                .hex_digest()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

/// Compute the canonical hash of a byte slice with domain separation.
///
/// `sha256(domain.as_bytes() || data)`, rendered `"sha256:<lowercase_hex>"`.
/// Total and deterministic; the only way this workspace produces a digest.
#[must_use]
pub fn canonical_hash(domain: HashDomain, data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    hasher.update(data);
    let digest = hasher.finalize();
    ContentHash {
        full: format!("sha256:{}", hex::encode(digest)),
    }
}
