//! `BarLabel`: the identifier a bar carries on the device.
//!
//! Labels are whatever text the device displays for each bar (the reference
//! scale labels its nine bars `"0"` through `"8"`). The kernel treats them as
//! opaque: no numeric parsing, no format assumptions beyond non-emptiness,
//! which the lineup enforces at construction.
//!
//! # Canonical form
//!
//! The canonical representation is the label's UTF-8 bytes. Ordering and
//! equality are byte order on those bytes — `Ord` is derived so labels can
//! key `BTreeMap`s and sort deterministically.

use std::fmt;

/// A single bar's on-device label.
///
/// Cheap to clone; comparison is on the label text.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BarLabel(String);

impl BarLabel {
    /// Construct from the device's label text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The label text as displayed by the device.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The canonical byte form (UTF-8 of the label text).
    ///
    /// Serialization and fingerprinting always use these bytes, never a
    /// parsed-integer view of the label.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// True if the label text is empty.
    ///
    /// Empty labels are a device synchronization bug; the lineup rejects
    /// them at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for BarLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BarLabel({:?})", self.0)
    }
}

impl fmt::Display for BarLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BarLabel {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for BarLabel {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Render labels as the device displays a bucket: `[0,1,2]`.
///
/// This is the format the scale's own round summaries use; error context
/// renders candidate sets the same way so logs and messages line up.
#[must_use]
pub fn bracket_join(labels: &[BarLabel]) -> String {
    let mut out = String::from("[");
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(label.as_str());
    }
    out.push(']');
    out
}
