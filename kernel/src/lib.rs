//! Karat Kernel: the pure core of the fake-bar search.
//!
//! # API Surface
//!
//! The kernel exposes the value types and pure functions everything else is
//! built on:
//!
//! - [`carrier::partition::split`] -- bucket sizes for one weighing round
//! - [`carrier::lineup::Lineup`] -- the ordered surviving candidate set
//! - [`carrier::outcome::Outcome`] -- the tri-state scale reading
//! - [`proof::canon::canonical_json_bytes`] -- the single canonical JSON implementation
//! - [`proof::hash::canonical_hash`] -- domain-separated SHA-256 content addressing
//!
//! # Module Dependency Direction
//!
//! `proof` ← `carrier`
//!
//! One-way only. No cycles. `carrier` depends on `proof` (lineup
//! fingerprints); `proof` depends on nothing internal. Neither performs I/O.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod carrier;
pub mod proof;
