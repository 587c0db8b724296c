//! Core domain types for Hydrate.
//!
//! This module defines the values that flow between the session state
//! machine and its host:
//! - Session configuration and its input bounds
//! - Reminder and drink events
//! - End-of-workout summaries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Configuration Bounds
// ============================================================================

pub const MIN_DURATION_MINUTES: u32 = 15;
pub const MAX_DURATION_MINUTES: u32 = 180;
pub const MIN_WATER_ML: u32 = 250;
pub const MAX_WATER_ML: u32 = 1000;
pub const MIN_CREATINE_GRAMS: f64 = 0.0;
pub const MAX_CREATINE_GRAMS: f64 = 10.0;

pub const DEFAULT_DURATION_MINUTES: u32 = 60;
pub const DEFAULT_WATER_ML: u32 = 500;
pub const DEFAULT_CREATINE_GRAMS: f64 = 5.0;

// ============================================================================
// Session Configuration
// ============================================================================

/// What the user asked for: workout length and total intake targets.
///
/// Fields are public so a host can pass raw input straight through; use
/// [`SessionConfig::clamped`] at the input boundary to pull values into range.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    pub duration_minutes: u32,
    pub water_ml: u32,
    pub creatine_grams: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_minutes: DEFAULT_DURATION_MINUTES,
            water_ml: DEFAULT_WATER_ML,
            creatine_grams: DEFAULT_CREATINE_GRAMS,
        }
    }
}

impl SessionConfig {
    /// Build a config with every field clamped into its allowed range
    pub fn clamped(duration_minutes: u32, water_ml: u32, creatine_grams: f64) -> Self {
        Self {
            duration_minutes,
            water_ml,
            creatine_grams,
        }
        .clamp()
    }

    /// Pull every field into range. NaN creatine becomes the minimum.
    pub fn clamp(self) -> Self {
        let creatine_grams = if self.creatine_grams.is_nan() {
            MIN_CREATINE_GRAMS
        } else {
            self.creatine_grams
                .clamp(MIN_CREATINE_GRAMS, MAX_CREATINE_GRAMS)
        };

        Self {
            duration_minutes: self
                .duration_minutes
                .clamp(MIN_DURATION_MINUTES, MAX_DURATION_MINUTES),
            water_ml: self.water_ml.clamp(MIN_WATER_ML, MAX_WATER_ML),
            creatine_grams,
        }
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }
}

// ============================================================================
// Session Phase
// ============================================================================

/// Lifecycle phase of a workout session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Setup,
    Running,
    Paused,
    Completed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Setup => "setup",
            SessionPhase::Running => "running",
            SessionPhase::Paused => "paused",
            SessionPhase::Completed => "completed",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Events
// ============================================================================

/// A drink reminder that has come due
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoseEvent {
    /// Position in the drink schedule; `None` for the opening reminder
    pub index: Option<usize>,
    /// Scheduled offset from session start, in seconds of active time
    pub offset_seconds: u32,
    /// How much water the user should drink now
    pub dose_ml: u32,
}

/// Result of a recorded drink
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrinkRecorded {
    pub dose_ml: u32,
    pub consumed_ml: u32,
}

/// Everything that happened during one tick
#[derive(Clone, Debug, Default)]
pub struct TickOutcome {
    pub elapsed_seconds: u32,
    pub drinks_due: Vec<DoseEvent>,
    pub completed: Option<SessionSummary>,
}

impl TickOutcome {
    pub fn is_completed(&self) -> bool {
        self.completed.is_some()
    }
}

/// Final report of a finished workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub planned_minutes: u32,
    /// Wall-clock minutes minus time spent paused, floored
    pub actual_duration_minutes: u32,
    pub paused_seconds: u32,
    pub elapsed_seconds: u32,
    pub water_consumed_ml: u32,
    pub water_target_ml: u32,
    pub final_creatine_grams: f64,
    pub reminders_fired: usize,
    pub drinks_recorded: u32,
}

// ============================================================================
// Countdown Display
// ============================================================================

/// Where the user stands relative to the next reminder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextDrink {
    /// Seconds of active time until the next reminder
    In(u32),
    /// The next reminder is due
    Now,
    /// No reminders left in the schedule
    FinalStretch,
}

impl fmt::Display for NextDrink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextDrink::In(seconds) => write!(f, "{}:{:02}", seconds / 60, seconds % 60),
            NextDrink::Now => f.write_str("Now!"),
            NextDrink::FinalStretch => f.write_str("Final stretch!"),
        }
    }
}

/// Render seconds as `MM:SS`
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
