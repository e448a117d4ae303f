//! In-memory scale devices for harness runs and tests.

pub mod honest;
