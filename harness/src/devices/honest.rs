//! `HonestScale`: in-memory balance scale with one planted lighter bar.
//!
//! The device models the reference scale faithfully: bars are labeled
//! `"0"` through `"n-1"`, every genuine bar weighs the same, the planted
//! fake weighs one unit less, and a weighing compares total pan weights.
//! Readings publish after a fixed latency; a weigh whose budget is shorter
//! than the latency times out without publishing.
//!
//! The device also enforces the reset discipline: requesting a weighing
//! while a previous reading is still displayed is a device fault. Callers
//! that reset after every weigh never see it.

use karat_kernel::carrier::label::{bracket_join, BarLabel};
use karat_kernel::carrier::outcome::Outcome;
use karat_search::contract::{DeviceError, PanSide, ScaleDeviceV1};
use karat_search::policy::WaitBudget;

/// Weight of a genuine bar, in arbitrary units. The fake weighs one less.
const GENUINE_WEIGHT: u64 = 10;

/// Confirmation text for a correct declaration.
pub const CONFIRM_FOUND: &str = "Yay! You find it!";

/// Confirmation text for a wrong declaration.
pub const CONFIRM_WRONG: &str = "Oops! Try Again!";

/// In-memory balance scale with one planted lighter bar.
pub struct HonestScale {
    device_id: String,
    labels: Vec<BarLabel>,
    fake: BarLabel,
    latency_ticks: u64,
    left: Vec<BarLabel>,
    right: Vec<BarLabel>,
    displayed: Option<Outcome>,
    weighings: Vec<String>,
    weigh_count: u64,
    reset_count: u64,
}

impl HonestScale {
    /// A scale with `count` bars labeled `"0"..="count-1"`, the fake at
    /// `fake_index`, and a publication latency of one tick.
    ///
    /// # Panics
    ///
    /// Panics if `fake_index >= count`.
    #[must_use]
    pub fn new(count: usize, fake_index: usize) -> Self {
        Self::with_latency(count, fake_index, 1)
    }

    /// A scale whose readings publish after `latency_ticks` ticks.
    ///
    /// A weigh or confirmation wait shorter than the latency times out.
    ///
    /// # Panics
    ///
    /// Panics if `fake_index >= count`.
    #[must_use]
    pub fn with_latency(count: usize, fake_index: usize, latency_ticks: u64) -> Self {
        assert!(
            fake_index < count,
            "fake_index {fake_index} out of range for {count} bars"
        );
        let labels: Vec<BarLabel> = (0..count).map(|i| BarLabel::new(i.to_string())).collect();
        let fake = labels[fake_index].clone();
        Self {
            device_id: "honest_scale".to_string(),
            labels,
            fake,
            latency_ticks,
            left: Vec::new(),
            right: Vec::new(),
            displayed: None,
            weighings: Vec::new(),
            weigh_count: 0,
            reset_count: 0,
        }
    }

    /// Number of weigh requests received, including timed-out ones.
    #[must_use]
    pub fn weigh_count(&self) -> u64 {
        self.weigh_count
    }

    /// Number of resets received.
    #[must_use]
    pub fn reset_count(&self) -> u64 {
        self.reset_count
    }

    /// True when both pans are empty and no reading is displayed.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.left.is_empty() && self.right.is_empty() && self.displayed.is_none()
    }

    /// Total weight of one pan's contents.
    fn pan_weight(&self, pan: &[BarLabel]) -> u64 {
        pan.iter()
            .map(|bar| {
                if *bar == self.fake {
                    GENUINE_WEIGHT - 1
                } else {
                    GENUINE_WEIGHT
                }
            })
            .sum()
    }
}

impl ScaleDeviceV1 for HonestScale {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn list_candidates(&mut self) -> Result<Vec<BarLabel>, DeviceError> {
        Ok(self.labels.clone())
    }

    fn assign_pan(&mut self, side: PanSide, bars: &[BarLabel]) -> Result<(), DeviceError> {
        match side {
            PanSide::Left => self.left = bars.to_vec(),
            PanSide::Right => self.right = bars.to_vec(),
        }
        Ok(())
    }

    fn read_pan(&mut self, side: PanSide) -> Result<Vec<BarLabel>, DeviceError> {
        Ok(match side {
            PanSide::Left => self.left.clone(),
            PanSide::Right => self.right.clone(),
        })
    }

    fn weigh(&mut self, wait: WaitBudget) -> Result<Outcome, DeviceError> {
        self.weigh_count += 1;
        if self.displayed.is_some() {
            return Err(DeviceError::Fault {
                detail: "weigh requested while a reading is still displayed".into(),
            });
        }
        if self.latency_ticks > wait.max_ticks {
            // The reading never publishes inside the window.
            return Err(DeviceError::Timeout {
                waited_ticks: wait.max_ticks,
            });
        }

        let outcome = match self.pan_weight(&self.left).cmp(&self.pan_weight(&self.right)) {
            std::cmp::Ordering::Less => Outcome::LeftLighter,
            std::cmp::Ordering::Greater => Outcome::RightLighter,
            std::cmp::Ordering::Equal => Outcome::Balanced,
        };
        self.weighings.push(format!(
            "{} {} {}",
            bracket_join(&self.left),
            outcome.symbol(),
            bracket_join(&self.right)
        ));
        self.displayed = Some(outcome);
        Ok(outcome)
    }

    fn reset(&mut self) -> Result<(), DeviceError> {
        self.reset_count += 1;
        self.left.clear();
        self.right.clear();
        self.displayed = None;
        Ok(())
    }

    fn select_final(&mut self, bar: &BarLabel, wait: WaitBudget) -> Result<String, DeviceError> {
        if self.latency_ticks > wait.max_ticks {
            return Err(DeviceError::Timeout {
                waited_ticks: wait.max_ticks,
            });
        }
        let message = if *bar == self.fake {
            CONFIRM_FOUND
        } else {
            CONFIRM_WRONG
        };
        Ok(message.to_string())
    }

    fn read_log(&mut self) -> Result<Vec<String>, DeviceError> {
        Ok(self.weighings.clone())
    }
}
