//! Scale device contract trait.

use karat_kernel::carrier::label::BarLabel;
use karat_kernel::carrier::outcome::Outcome;

use crate::policy::WaitBudget;

/// One side of the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanSide {
    Left,
    Right,
}

impl PanSide {
    /// Stable lowercase name used in error context and serialized records.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl std::fmt::Display for PanSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Device-level failure, reported by adapters and lifted into
/// [`SearchError`](crate::error::SearchError) by the search loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// A bounded wait elapsed without the device publishing.
    Timeout { waited_ticks: u64 },
    /// The device published a symbol outside the reading alphabet.
    MalformedReading { symbol: String },
    /// The transport or adapter failed outright.
    Fault { detail: String },
}

impl std::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout { waited_ticks } => {
                write!(f, "device did not publish within {waited_ticks} ticks")
            }
            Self::MalformedReading { symbol } => {
                write!(f, "device published malformed reading {symbol:?}")
            }
            Self::Fault { detail } => write!(f, "device fault: {detail}"),
        }
    }
}

impl std::error::Error for DeviceError {}

/// Trait for balance-scale adapters.
///
/// Implementations wrap whatever transport reaches the physical or simulated
/// scale (UI automation, RPC, in-process simulation). The search loop never
/// sees transport details — only this surface.
///
/// # Contract
///
/// - `list_candidates` returns the full ordered bar listing; it is called
///   once per search, before any weighing.
/// - `assign_pan` followed by `read_pan` on the same side must echo back
///   exactly the bars just assigned; the search loop verifies this before
///   every weighing.
/// - `weigh` blocks until the reading publishes or `wait` is exhausted.
///   Adapters map the published symbol through
///   [`Outcome::from_symbol`]; a symbol outside the alphabet is
///   [`DeviceError::MalformedReading`], and the pending sentinel `"?"` is
///   never returned as a reading.
/// - `reset` clears both pans and the published reading. It must be
///   **idempotent**: resetting an already-clean device succeeds and changes
///   nothing. The search loop calls it after every weigh attempt, on the
///   success and failure paths alike.
/// - `select_final` declares the fake. The device raises a dismissible
///   confirmation message; the adapter reads it, dismisses it, and returns
///   its text, blocking at most `wait`.
/// - `read_log` returns the device's own round summaries (one string per
///   completed weighing, e.g. `"[0,1,2] < [3,4,5]"`).
pub trait ScaleDeviceV1 {
    /// Stable device identifier, recorded in audit artifacts.
    fn device_id(&self) -> &str;

    /// The full ordered candidate listing.
    ///
    /// # Errors
    ///
    /// [`DeviceError`] if the listing cannot be read.
    fn list_candidates(&mut self) -> Result<Vec<BarLabel>, DeviceError>;

    /// Place `bars` on one pan, replacing that pan's previous content.
    ///
    /// # Errors
    ///
    /// [`DeviceError`] if the assignment cannot be delivered.
    fn assign_pan(&mut self, side: PanSide, bars: &[BarLabel]) -> Result<(), DeviceError>;

    /// Echo back one pan's current content, in assignment order.
    ///
    /// # Errors
    ///
    /// [`DeviceError`] if the pan cannot be read.
    fn read_pan(&mut self, side: PanSide) -> Result<Vec<BarLabel>, DeviceError>;

    /// Perform a weighing and block for the published reading.
    ///
    /// # Errors
    ///
    /// [`DeviceError::Timeout`] when `wait` elapses first,
    /// [`DeviceError::MalformedReading`] for a symbol outside the alphabet.
    fn weigh(&mut self, wait: WaitBudget) -> Result<Outcome, DeviceError>;

    /// Clear both pans and the published reading. Idempotent.
    ///
    /// # Errors
    ///
    /// [`DeviceError`] if the device rejects the reset.
    fn reset(&mut self) -> Result<(), DeviceError>;

    /// Declare `bar` as the fake and return the confirmation message text
    /// (after dismissing the message).
    ///
    /// # Errors
    ///
    /// [`DeviceError::Timeout`] when no message appears within `wait`.
    fn select_final(&mut self, bar: &BarLabel, wait: WaitBudget) -> Result<String, DeviceError>;

    /// The device's own round summaries, oldest first.
    ///
    /// # Errors
    ///
    /// [`DeviceError`] if the summaries cannot be read.
    fn read_log(&mut self) -> Result<Vec<String>, DeviceError>;
}
