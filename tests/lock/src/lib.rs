//! Shared support code for the lock test suite.

#![forbid(unsafe_code)]

pub mod bundle_test_helpers;
