//! Karat Search: the weigh-and-narrow loop with auditable round log.
//!
//! This crate provides the search layer. It depends only on `karat_kernel` —
//! it does NOT depend on `karat_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! karat_kernel  ←  karat_search  ←  karat_harness
//! (pure carrier)   (loop, contract)  (devices, runner, bundles)
//! ```
//!
//! # Key types
//!
//! - [`contract::ScaleDeviceV1`] — trait for balance-scale adapters
//! - [`policy::SearchPolicyV1`] — bounded-wait configuration
//! - [`log::RoundLogV1`] — per-round audit log (normative bundle artifact)
//! - [`run::run_search`] — the search entry point
//! - [`error::SearchError`] — the failure taxonomy

#![forbid(unsafe_code)]

pub mod contract;
pub mod error;
pub mod log;
pub mod policy;
pub mod run;
