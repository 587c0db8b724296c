//! Drink schedule calculation.
//!
//! Reminder frequency depends on workout length:
//! - up to 30 minutes: every 10 minutes
//! - up to 60 minutes: every 12 minutes
//! - longer: every 15 minutes
//!
//! A final reminder two minutes before the end is added whenever the workout
//! is longer than one interval, unless an interval reminder already sits there.

use serde::Serialize;

/// Pick the reminder interval for a workout of `duration_minutes`
pub fn interval_minutes(duration_minutes: u32) -> u32 {
    if duration_minutes <= 30 {
        10
    } else if duration_minutes <= 60 {
        12
    } else {
        15
    }
}

/// Reminder offsets for a workout, in seconds from session start
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DrinkSchedule {
    interval_minutes: u32,
    offsets: Vec<u32>,
}

impl DrinkSchedule {
    /// Compute the schedule for a workout of `duration_minutes`
    ///
    /// Offsets are strictly increasing and all fall before the end of the
    /// workout. The final reminder is slotted in order among the interval
    /// multiples and only dropped when one of them lands on it exactly.
    pub fn for_duration(duration_minutes: u32) -> Self {
        let interval = interval_minutes(duration_minutes);

        let mut offsets: Vec<u32> = (1..)
            .map(|n| n * interval)
            .take_while(|&minute| minute < duration_minutes)
            .map(|minute| minute * 60)
            .collect();

        if duration_minutes > interval {
            let final_offset = (duration_minutes - 2) * 60;
            if let Err(pos) = offsets.binary_search(&final_offset) {
                offsets.insert(pos, final_offset);
            }
        }

        tracing::debug!(
            "Drink schedule for {} min: {:?}",
            duration_minutes,
            offsets.iter().map(|s| s / 60).collect::<Vec<_>>()
        );

        Self {
            interval_minutes: interval,
            offsets,
        }
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.offsets.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Fixed water dose per reminder.
    ///
    /// The opening reminder at start counts as one extra slot, hence `len + 1`.
    pub fn dose_ml(&self, water_ml: u32) -> u32 {
        water_ml / (self.offsets.len() as u32 + 1)
    }
}
