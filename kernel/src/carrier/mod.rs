//! Carrier module: bar labels, the candidate lineup, bucket arithmetic, and
//! the scale reading.
//!
//! Everything here is a pure value type. Device I/O lives behind the search
//! crate's contract; nothing in this module blocks, waits, or talks to
//! hardware.

pub mod label;
pub mod lineup;
pub mod outcome;
pub mod partition;
