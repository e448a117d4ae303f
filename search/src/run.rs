//! Search entry point: the weigh-and-narrow loop.

use karat_kernel::carrier::label::BarLabel;
use karat_kernel::carrier::lineup::Lineup;
use karat_kernel::carrier::outcome::Outcome;
use karat_kernel::carrier::partition::split;

use crate::contract::{DeviceError, PanSide, ScaleDeviceV1};
use crate::error::SearchError;
use crate::log::{RoundLogMetadataV1, RoundLogV1, RoundRecordV1, SCHEMA_ROUND_LOG};
use crate::policy::SearchPolicyV1;

/// Result of a completed search.
///
/// Produced once per run and immutable thereafter. The round log inside is
/// the normative audit artifact; the confirmation message and the device's
/// own weighing summaries are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// The confirmed fake.
    pub fake: BarLabel,
    /// Text of the device's confirmation message.
    pub confirmation: String,
    /// The device's own round summaries, oldest first.
    pub device_weighings: Vec<String>,
    /// One record per completed weighing, plus run metadata.
    pub round_log: RoundLogV1,
}

impl SearchResult {
    /// Number of weighings the search performed.
    #[must_use]
    pub fn total_rounds(&self) -> u64 {
        self.round_log.metadata.total_rounds
    }
}

/// Lift a device-level failure into the search taxonomy with round context.
fn lift_device_error(
    round: u64,
    operation: &str,
    err: DeviceError,
    remaining: &[BarLabel],
) -> SearchError {
    match err {
        DeviceError::Timeout { waited_ticks } => SearchError::DeviceTimeout {
            round,
            waited_ticks,
            remaining: remaining.to_vec(),
        },
        DeviceError::MalformedReading { symbol } => SearchError::ProtocolViolation {
            round,
            detail: format!("{operation} returned malformed reading {symbol:?}"),
            remaining: remaining.to_vec(),
        },
        DeviceError::Fault { detail } => SearchError::DeviceFault {
            round,
            operation: operation.to_string(),
            detail,
            remaining: remaining.to_vec(),
        },
    }
}

/// Assign one pan and verify the device echoes the assignment back.
fn place_and_verify(
    device: &mut dyn ScaleDeviceV1,
    side: PanSide,
    bars: &[BarLabel],
    round: u64,
    remaining: &[BarLabel],
) -> Result<(), SearchError> {
    device
        .assign_pan(side, bars)
        .map_err(|err| lift_device_error(round, "assign_pan", err, remaining))?;
    let observed = device
        .read_pan(side)
        .map_err(|err| lift_device_error(round, "read_pan", err, remaining))?;
    if observed != bars {
        return Err(SearchError::PlacementMismatch {
            round,
            side,
            sent: bars.to_vec(),
            observed,
        });
    }
    Ok(())
}

/// Isolate the fake by repeated three-way weighing, then confirm it.
///
/// Phases: **Searching** (one weighing per loop iteration, each strictly
/// shrinking the lineup) → **Confirming** (declare the sole survivor and
/// collect the device's summaries) → **Done**. Done is terminal: the run
/// returns, and a fresh search starts over from `list_candidates`.
///
/// Per round: split the lineup, assign both pans positionally and verify
/// the echo, weigh with the policy's bounded wait, reset the device
/// unconditionally, then keep the bucket the reading points at — `<` keeps
/// the left pan, `>` the right pan, `=` the held-out bucket.
///
/// # Errors
///
/// [`SearchError::InvalidInput`] for an unusable listing or policy;
/// [`SearchError::DeviceTimeout`], [`SearchError::ProtocolViolation`],
/// [`SearchError::PlacementMismatch`], or [`SearchError::DeviceFault`] when
/// a round fails. All failures are fail-stop.
pub fn run_search(
    device: &mut dyn ScaleDeviceV1,
    policy: &SearchPolicyV1,
) -> Result<SearchResult, SearchError> {
    policy.validate()?;

    // Build the lineup once from the device listing.
    let device_id = device.device_id().to_string();
    let listing = device
        .list_candidates()
        .map_err(|err| lift_device_error(0, "list_candidates", err, &[]))?;
    let mut lineup = Lineup::new(listing).map_err(|err| SearchError::InvalidInput {
        detail: err.to_string(),
    })?;
    let initial_count = lineup.len() as u64;
    let lineup_fingerprint = lineup.fingerprint();

    let mut rounds: Vec<RoundRecordV1> = Vec::new();
    let mut round: u64 = 0;

    // Searching: one weighing per iteration.
    while lineup.len() > 1 {
        let Some(plan) = split(lineup.len()) else {
            return Err(SearchError::InvalidInput {
                detail: format!("no split plan for {} candidates", lineup.len()),
            });
        };
        let Some((left, right, held)) = lineup.buckets(plan) else {
            return Err(SearchError::InvalidInput {
                detail: format!(
                    "plan covers {} candidates but {} remain at round {round}",
                    plan.total(),
                    lineup.len()
                ),
            });
        };
        let left = left.to_vec();
        let right = right.to_vec();
        let held = held.to_vec();
        let candidate_count = lineup.len() as u64;

        place_and_verify(device, PanSide::Left, &left, round, lineup.labels())?;
        place_and_verify(device, PanSide::Right, &right, round, lineup.labels())?;

        let reading = device.weigh(policy.weigh_wait);
        // The reset runs on every path out of the weigh, ready or not.
        let reset = device.reset();
        let outcome =
            reading.map_err(|err| lift_device_error(round, "weigh", err, lineup.labels()))?;
        reset.map_err(|err| lift_device_error(round, "reset", err, lineup.labels()))?;

        let survivors = match outcome {
            Outcome::LeftLighter => left.clone(),
            Outcome::RightLighter => right.clone(),
            Outcome::Balanced => {
                if held.is_empty() {
                    return Err(SearchError::ProtocolViolation {
                        round,
                        detail: "balanced reading with no held-out candidates".into(),
                        remaining: lineup.labels().to_vec(),
                    });
                }
                held.clone()
            }
        };

        rounds.push(RoundRecordV1 {
            round,
            candidate_count,
            plan,
            left,
            right,
            held,
            outcome,
            surviving_count: survivors.len() as u64,
        });

        lineup = Lineup::new(survivors).map_err(|err| SearchError::InvalidInput {
            detail: err.to_string(),
        })?;
        round += 1;
    }

    // Confirming: exactly one candidate remains.
    let Some(fake) = lineup.sole().cloned() else {
        return Err(SearchError::InvalidInput {
            detail: "lineup did not narrow to a single candidate".into(),
        });
    };
    let confirmation = device
        .select_final(&fake, policy.confirm_wait)
        .map_err(|err| lift_device_error(round, "select_final", err, lineup.labels()))?;
    let device_weighings = device
        .read_log()
        .map_err(|err| lift_device_error(round, "read_log", err, lineup.labels()))?;

    let total_rounds = rounds.len() as u64;
    let round_log = RoundLogV1 {
        rounds,
        metadata: RoundLogMetadataV1 {
            schema_version: SCHEMA_ROUND_LOG.to_string(),
            device_id,
            initial_count,
            lineup_fingerprint: lineup_fingerprint.as_str().to_string(),
            total_rounds,
            fake_label: fake.clone(),
        },
    };

    Ok(SearchResult {
        fake,
        confirmation,
        device_weighings,
        round_log,
    })
}
