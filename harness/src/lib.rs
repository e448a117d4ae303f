//! Karat Harness: session-level orchestration for the search loop.
//!
//! The harness runs a scale device through the search pipeline
//! (`build_policy_snapshot` → `run_search` → release) and packages the
//! result as a self-contained evidence bundle.
//!
//! The harness does NOT implement search logic — it delegates to
//! `karat_search`. Devices provide readings only; the harness owns
//! orchestration, policy, and packaging.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bundle;
pub mod bundle_dir;
pub mod devices;
pub mod policy;
pub mod report;
pub mod runner;
