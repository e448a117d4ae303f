//! Shared helpers for karat benchmark suites.

use karat_harness::devices::honest::HonestScale;
use karat_kernel::proof::hash::{canonical_hash, ContentHash};
use karat_kernel::proof::hash_domain::HashDomain;
use karat_search::policy::SearchPolicyV1;
use karat_search::run::{run_search, SearchResult};

/// An honest scale with the fake at position 0.
///
/// Position 0 keeps the fake in the left pan every round, so the search
/// takes the full `ceil(log3(n))` rounds. Benchmarks time the worst case.
#[must_use]
pub fn worst_case_scale(count: usize) -> HonestScale {
    HonestScale::new(count, 0)
}

/// Run a worst-case search over `count` bars.
///
/// # Panics
///
/// Panics if the search fails. Benchmark runs are expected to succeed.
#[must_use]
pub fn run_worst_case(count: usize) -> SearchResult {
    let mut scale = worst_case_scale(count);
    run_search(&mut scale, &SearchPolicyV1::default())
        .expect("search should succeed in benchmarks")
}

/// Determinism guard digest over a search result's round log.
///
/// Benchmarks compute this once before timing and assert a repeat run
/// reproduces it, so throughput numbers are never collected from runs
/// that silently diverged.
///
/// # Panics
///
/// Panics if the round log fails canonical serialization.
#[must_use]
pub fn determinism_guard(result: &SearchResult) -> ContentHash {
    let bytes = result
        .round_log
        .to_canonical_json_bytes()
        .expect("round log canonicalization");
    canonical_hash(HashDomain::BenchGuard, &bytes)
}
