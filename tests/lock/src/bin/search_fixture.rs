//! Binary that runs a full nine-bar session against an honest scale
//! and prints deterministic output lines for cross-process verification.
//!
//! Usage: `search_fixture`
//!
//! Output: key=value lines (see source for format).

use karat_harness::devices::honest::HonestScale;
use karat_harness::policy::SessionConfig;
use karat_harness::runner::run_session;

fn main() {
    let mut scale = HonestScale::new(9, 4);
    let output = run_session(&mut scale, &SessionConfig::default()).expect("session run failed");
    let bundle = &output.bundle;

    // Extract the search report.
    let report = bundle
        .artifacts
        .get("search_report.json")
        .expect("missing search_report.json");
    let report_json: serde_json::Value =
        serde_json::from_slice(&report.content).expect("invalid report JSON");
    let round_log_digest = report_json["round_log_digest"]
        .as_str()
        .expect("missing round_log_digest");
    let policy_digest = report_json["policy_digest"]
        .as_str()
        .expect("missing policy_digest");
    let total_rounds = report_json["total_rounds"]
        .as_u64()
        .expect("missing total_rounds");

    // Extract the round log.
    let log = bundle
        .artifacts
        .get("round_log.json")
        .expect("missing round_log.json");
    let log_json: serde_json::Value =
        serde_json::from_slice(&log.content).expect("invalid round log JSON");
    let lineup_fingerprint = log_json["metadata"]["lineup_fingerprint"]
        .as_str()
        .expect("missing lineup_fingerprint");

    println!("bundle_digest={}", bundle.digest.as_str());
    println!("round_log_digest={round_log_digest}");
    println!("policy_digest={policy_digest}");
    println!("fake={}", output.result.fake.as_str());
    println!("total_rounds={total_rounds}");
    println!("artifact_count={}", bundle.artifacts.len());
    println!("confirmation={}", output.result.confirmation);
    println!("lineup_fingerprint={lineup_fingerprint}");
}
