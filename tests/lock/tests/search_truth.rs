//! Search truth-regime lock tests.
//!
//! Proves that the weigh-and-narrow loop finds the planted fake against an
//! honest scale, for every collection size and every fake position in the
//! swept range. Key invariants:
//! - The confirmed fake is the planted one, and the device confirms it
//! - Round count never exceeds the iterated ceil(n/3) worst case
//! - The worst case is attained when the fake sits at position 0
//! - The reading selects the matching bucket: `<` left, `>` right, `=` held
//! - The round log chains: each round's survivors enter the next round
//! - The scale is reset after every weighing and left clean

use karat_harness::devices::honest::{HonestScale, CONFIRM_FOUND};
use karat_kernel::carrier::label::BarLabel;
use karat_kernel::carrier::lineup::Lineup;
use karat_kernel::carrier::outcome::Outcome;
use karat_kernel::carrier::partition::rounds_for;
use karat_search::policy::SearchPolicyV1;
use karat_search::run::{run_search, SearchResult};

/// Run a search against an honest scale with the default policy.
fn find(count: usize, fake_index: usize) -> SearchResult {
    let mut scale = HonestScale::new(count, fake_index);
    run_search(&mut scale, &SearchPolicyV1::default()).expect("honest search must succeed")
}

/// Labels `"start"` through `"end-1"`, matching the honest scale's listing.
fn label_range(range: std::ops::Range<usize>) -> Vec<BarLabel> {
    range.map(|i| BarLabel::new(i.to_string())).collect()
}

// ---------------------------------------------------------------------------
// Exhaustive correctness
// ---------------------------------------------------------------------------

/// Every fake position in every collection size up to 40 is found.
#[test]
fn every_fake_position_is_found() {
    for n in 1..=40 {
        for fake_index in 0..n {
            let result = find(n, fake_index);
            assert_eq!(
                result.fake.as_str(),
                fake_index.to_string(),
                "wrong fake for n={n} fake_index={fake_index}"
            );
            assert_eq!(result.confirmation, CONFIRM_FOUND);
            assert!(
                result.total_rounds() <= u64::from(rounds_for(n)),
                "n={n} fake_index={fake_index} took {} rounds, bound is {}",
                result.total_rounds(),
                rounds_for(n)
            );
        }
    }
}

/// A fake at position 0 stays in the left pan every round, so the search
/// takes exactly the worst-case number of rounds.
#[test]
fn worst_case_round_count_is_attained_at_position_zero() {
    for n in 1..=100 {
        let result = find(n, 0);
        assert_eq!(
            result.total_rounds(),
            u64::from(rounds_for(n)),
            "n={n} must attain the worst case"
        );
    }
}

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

/// Nine bars, fake at index 2: two rounds, 3/3/3 then 1/1/1.
#[test]
fn nine_bars_fake_at_two() {
    let result = find(9, 2);
    assert_eq!(result.fake.as_str(), "2");
    assert_eq!(result.total_rounds(), 2);

    let first = &result.round_log.rounds[0];
    assert_eq!(first.candidate_count, 9);
    assert_eq!(
        (first.plan.left, first.plan.right, first.plan.held),
        (3, 3, 3)
    );
    assert_eq!(first.left, label_range(0..3));
    assert_eq!(first.outcome, Outcome::LeftLighter);
    assert_eq!(first.surviving_count, 3);

    let second = &result.round_log.rounds[1];
    assert_eq!(second.candidate_count, 3);
    assert_eq!(
        (second.plan.left, second.plan.right, second.plan.held),
        (1, 1, 1)
    );
    assert_eq!(second.outcome, Outcome::Balanced);
    assert_eq!(second.surviving_count, 1);
}

/// Seven bars, fake held out: the balanced branch keeps a single survivor
/// and the search finishes in one round, under the two-round worst case.
#[test]
fn seven_bars_held_branch_finishes_early() {
    let result = find(7, 6);
    assert_eq!(result.fake.as_str(), "6");
    assert_eq!(result.total_rounds(), 1);
    assert_eq!(rounds_for(7), 2, "worst case for seven bars is two rounds");

    let only = &result.round_log.rounds[0];
    assert_eq!((only.plan.left, only.plan.right, only.plan.held), (3, 3, 1));
    assert_eq!(only.outcome, Outcome::Balanced);
    assert_eq!(only.held, label_range(6..7));
    assert_eq!(only.surviving_count, 1);
}

/// Two bars: one weighing with nothing held out.
#[test]
fn two_bars_single_round() {
    let result = find(2, 0);
    assert_eq!(result.fake.as_str(), "0");
    assert_eq!(result.total_rounds(), 1);

    let only = &result.round_log.rounds[0];
    assert_eq!((only.plan.left, only.plan.right, only.plan.held), (1, 1, 0));
    assert_eq!(only.outcome, Outcome::LeftLighter);
}

/// A single bar is confirmed without any weighing.
#[test]
fn single_bar_confirmed_without_weighing() {
    let mut scale = HonestScale::new(1, 0);
    let result = run_search(&mut scale, &SearchPolicyV1::default()).unwrap();
    assert_eq!(result.fake.as_str(), "0");
    assert_eq!(result.confirmation, CONFIRM_FOUND);
    assert_eq!(result.total_rounds(), 0);
    assert!(result.device_weighings.is_empty());
    assert_eq!(scale.weigh_count(), 0, "nothing to weigh for one bar");
}

/// The reading selects the matching bucket on the first round of a
/// nine-bar search: `<` keeps the left pan, `>` the right, `=` the held.
#[test]
fn reading_selects_the_matching_bucket() {
    let left_case = find(9, 0);
    let first = &left_case.round_log.rounds[0];
    assert_eq!(first.outcome, Outcome::LeftLighter);
    assert_eq!(first.surviving_count, 3);
    assert_eq!(left_case.round_log.rounds[1].candidate_count, 3);

    let right_case = find(9, 3);
    let first = &right_case.round_log.rounds[0];
    assert_eq!(first.outcome, Outcome::RightLighter);
    assert_eq!(first.right, label_range(3..6));

    let held_case = find(9, 8);
    let first = &held_case.round_log.rounds[0];
    assert_eq!(first.outcome, Outcome::Balanced);
    assert_eq!(first.held, label_range(6..9));
}

// ---------------------------------------------------------------------------
// Round log coherence
// ---------------------------------------------------------------------------

/// Log metadata binds the run to the device and the starting lineup.
#[test]
fn round_log_metadata_binds_the_run() {
    let result = find(9, 4);
    let metadata = &result.round_log.metadata;
    assert_eq!(metadata.schema_version, "round_log.v1");
    assert_eq!(metadata.device_id, "honest_scale");
    assert_eq!(metadata.initial_count, 9);
    assert_eq!(metadata.fake_label.as_str(), "4");
    assert_eq!(metadata.total_rounds, result.round_log.rounds.len() as u64);

    let expected = Lineup::new(label_range(0..9)).unwrap().fingerprint();
    assert_eq!(metadata.lineup_fingerprint, expected.as_str());
}

/// Each round's survivors enter the next round, down to a single candidate.
#[test]
fn survivors_chain_between_rounds() {
    for n in 2..=40 {
        for fake_index in [0, n / 2, n - 1] {
            let result = find(n, fake_index);
            let rounds = &result.round_log.rounds;
            assert_eq!(rounds[0].candidate_count, n as u64);
            for pair in rounds.windows(2) {
                assert_eq!(
                    pair[0].surviving_count, pair[1].candidate_count,
                    "rounds must chain for n={n} fake_index={fake_index}"
                );
            }
            assert_eq!(rounds.last().unwrap().surviving_count, 1);
        }
    }
}

/// Every round strictly shrinks the lineup.
#[test]
fn each_round_strictly_shrinks_the_lineup() {
    for n in 2..=40 {
        let result = find(n, 0);
        for record in &result.round_log.rounds {
            assert!(
                record.surviving_count < record.candidate_count,
                "round {} failed to shrink for n={n}",
                record.round
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Device summaries
// ---------------------------------------------------------------------------

/// The device's own summaries match the reference transcript exactly.
#[test]
fn device_summaries_match_the_reference_transcript() {
    let held_twice = find(9, 8);
    assert_eq!(
        held_twice.device_weighings,
        vec!["[0,1,2] = [3,4,5]", "[6] = [7]"]
    );

    let left_twice = find(9, 0);
    assert_eq!(
        left_twice.device_weighings,
        vec!["[0,1,2] < [3,4,5]", "[0] < [1]"]
    );
}

/// One device summary per completed weighing.
#[test]
fn device_summary_count_matches_the_log() {
    for n in 1..=30 {
        for fake_index in [0, n - 1] {
            let result = find(n, fake_index);
            assert_eq!(
                result.device_weighings.len() as u64,
                result.total_rounds(),
                "summary count for n={n} fake_index={fake_index}"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Reset discipline and determinism
// ---------------------------------------------------------------------------

/// The scale is reset once per weighing and ends the search clean.
#[test]
fn the_scale_is_left_clean_after_every_round() {
    let mut scale = HonestScale::new(9, 4);
    let result = run_search(&mut scale, &SearchPolicyV1::default()).unwrap();
    assert_eq!(scale.reset_count(), result.total_rounds());
    assert!(scale.is_clear(), "pans and display must be clear");
}

/// Two identical runs produce identical results and round-log digests.
#[test]
fn identical_runs_are_identical() {
    let first = find(9, 4);
    let second = find(9, 4);
    assert_eq!(first, second);
    assert_eq!(
        first.round_log.digest().unwrap(),
        second.round_log.digest().unwrap()
    );
}
