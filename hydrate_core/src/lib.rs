#![forbid(unsafe_code)]

//! Core domain model and session logic for Hydrate, a workout hydration
//! reminder.
//!
//! This crate provides:
//! - Domain types (session config, reminders, summaries)
//! - Drink schedule calculation
//! - The workout session state machine
//! - Collaborator seams (clock, reminder sink, settings store)
//! - Configuration and logging setup

pub mod types;
pub mod error;
pub mod schedule;
pub mod clock;
pub mod session;
pub mod notify;
pub mod settings;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result, ValidationError};
pub use types::*;
pub use schedule::{interval_minutes, DrinkSchedule};
pub use clock::{Clock, ManualClock, SystemClock};
pub use session::WorkoutSession;
pub use notify::{dispatch, Notification, ReminderSink, TracingSink};
pub use settings::{JsonSettingsStore, SavedSettings, SettingsStore};
pub use config::Config;
