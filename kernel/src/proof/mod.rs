//! Proof module: canonical JSON and domain-separated content hashing.
//!
//! Depends on nothing internal. `carrier` builds on this for lineup
//! fingerprints; the search and harness crates route every artifact digest
//! through here.

pub mod canon;
pub mod hash;
pub mod hash_domain;
