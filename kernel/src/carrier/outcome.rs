//! `Outcome`: the tri-state reading a weighing publishes.
//!
//! The device displays one symbol per finished weighing: `"<"` when the left
//! pan is lighter, `">"` when the right pan is lighter, `"="` when the pans
//! balance. Before the reading publishes the device shows `"?"` — a pending
//! sentinel, not an outcome. Anything else is a malformed reading and is the
//! device's problem, never a kernel panic.

use std::fmt;

/// Pending sentinel the device displays before a reading publishes.
pub const PENDING_SYMBOL: &str = "?";

/// Tri-state result of one weighing.
///
/// The fake is lighter than a genuine bar, so the pan holding it reads
/// lighter. `Balanced` means neither pan holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Left pan lighter (`"<"`): the fake is on the left pan.
    LeftLighter,
    /// Right pan lighter (`">"`): the fake is on the right pan.
    RightLighter,
    /// Pans balance (`"="`): the fake is in the held-out bucket.
    Balanced,
}

impl Outcome {
    /// Parse a published reading symbol.
    ///
    /// Returns `None` for anything that is not one of the three outcome
    /// symbols — including the `"?"` pending sentinel, which callers must
    /// treat as "keep waiting", not as a reading.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(Self::LeftLighter),
            ">" => Some(Self::RightLighter),
            "=" => Some(Self::Balanced),
            _ => None,
        }
    }

    /// The symbol the device displays for this outcome.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::LeftLighter => "<",
            Self::RightLighter => ">",
            Self::Balanced => "=",
        }
    }

    /// Stable lowercase name used in serialized round records.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LeftLighter => "left_lighter",
            Self::RightLighter => "right_lighter",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
