//! Workout session state machine.
//!
//! `Setup -> Running <-> Paused -> Completed`, with `reset` as the only way
//! back to `Setup`. The session never touches timers or I/O: the host calls
//! [`WorkoutSession::tick`] once per second while running and forwards user
//! actions. The only outside input is the [`Clock`], read when pausing,
//! resuming and completing to account for wall-clock time.

use crate::clock::{Clock, SystemClock};
use crate::{
    DoseEvent, DrinkRecorded, DrinkSchedule, NextDrink, SessionConfig, SessionPhase,
    SessionSummary, TickOutcome, ValidationError, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES,
};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Everything that belongs to one started workout
#[derive(Clone, Debug)]
struct ActiveRun {
    id: Uuid,
    config: SessionConfig,
    schedule: DrinkSchedule,
    started_at: DateTime<Utc>,
    pause_started_at: Option<DateTime<Utc>>,
    total_paused: Duration,
    elapsed_seconds: u32,
    next_drink_index: usize,
    water_consumed_ml: u32,
    drinks_recorded: u32,
}

impl ActiveRun {
    fn dose_ml(&self) -> u32 {
        self.schedule.dose_ml(self.config.water_ml)
    }
}

/// A single workout tracking cycle
#[derive(Debug)]
pub struct WorkoutSession<C: Clock = SystemClock> {
    clock: C,
    phase: SessionPhase,
    run: Option<ActiveRun>,
    summary: Option<SessionSummary>,
}

impl WorkoutSession<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for WorkoutSession<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> WorkoutSession<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            phase: SessionPhase::Setup,
            run: None,
            summary: None,
        }
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Begin a workout
    ///
    /// Only valid from `Setup`. On error nothing changes.
    pub fn start(&mut self, config: SessionConfig) -> Result<(), ValidationError> {
        if self.phase != SessionPhase::Setup {
            return Err(ValidationError::NotInSetup(self.phase));
        }

        if config.duration_minutes < MIN_DURATION_MINUTES {
            return Err(ValidationError::DurationTooShort {
                got: config.duration_minutes,
                min: MIN_DURATION_MINUTES,
            });
        }

        if config.duration_minutes > MAX_DURATION_MINUTES {
            return Err(ValidationError::DurationTooLong {
                got: config.duration_minutes,
                max: MAX_DURATION_MINUTES,
            });
        }

        let run = ActiveRun {
            id: Uuid::new_v4(),
            config,
            schedule: DrinkSchedule::for_duration(config.duration_minutes),
            started_at: self.clock.now(),
            pause_started_at: None,
            total_paused: Duration::zero(),
            elapsed_seconds: 0,
            next_drink_index: 0,
            water_consumed_ml: 0,
            drinks_recorded: 0,
        };

        tracing::info!(
            "Started workout {}: {} min, {}ml water, {:.1}g creatine, {} reminders",
            run.id,
            config.duration_minutes,
            config.water_ml,
            config.creatine_grams,
            run.schedule.len()
        );

        self.run = Some(run);
        self.summary = None;
        self.phase = SessionPhase::Running;
        Ok(())
    }

    /// Advance one second of active time
    ///
    /// Reports any reminders that came due and completes the session when the
    /// full duration has elapsed. Outside `Running` this changes nothing.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::Running {
            return TickOutcome {
                elapsed_seconds: self.elapsed_seconds(),
                ..TickOutcome::default()
            };
        }

        let Some(run) = self.run.as_mut() else {
            return TickOutcome::default();
        };
        run.elapsed_seconds += 1;
        let elapsed_seconds = run.elapsed_seconds;
        let finished = elapsed_seconds >= run.config.duration_seconds();

        let drinks_due = self.check_drink_due();
        let completed = if finished { self.complete() } else { None };

        TickOutcome {
            elapsed_seconds,
            drinks_due,
            completed,
        }
    }

    /// Report every reminder whose offset has been reached and move past it
    pub fn check_drink_due(&mut self) -> Vec<DoseEvent> {
        let mut due = Vec::new();
        if self.phase != SessionPhase::Running {
            return due;
        }
        let Some(run) = self.run.as_mut() else {
            return due;
        };

        let dose_ml = run.dose_ml();
        while let Some(offset) = run.schedule.get(run.next_drink_index) {
            if run.elapsed_seconds < offset {
                break;
            }
            tracing::debug!(
                "Drink reminder {} due at {}s ({}ml)",
                run.next_drink_index,
                offset,
                dose_ml
            );
            due.push(DoseEvent {
                index: Some(run.next_drink_index),
                offset_seconds: offset,
                dose_ml,
            });
            run.next_drink_index += 1;
        }

        due
    }

    /// Freeze the workout. Returns false if the session was not running.
    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        let now = self.clock.now();
        if let Some(run) = self.run.as_mut() {
            run.pause_started_at = Some(now);
            tracing::debug!("Paused at {}s", run.elapsed_seconds);
        }
        self.phase = SessionPhase::Paused;
        true
    }

    /// Continue a paused workout. Returns false if the session was not paused.
    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        let now = self.clock.now();
        if let Some(run) = self.run.as_mut() {
            close_pause(run, now);
            tracing::debug!(
                "Resumed at {}s, {}s paused in total",
                run.elapsed_seconds,
                run.total_paused.num_seconds()
            );
        }
        self.phase = SessionPhase::Running;
        true
    }

    /// Flip between running and paused, returning the resulting phase
    pub fn toggle_pause(&mut self) -> SessionPhase {
        match self.phase {
            SessionPhase::Running => {
                self.pause();
            }
            SessionPhase::Paused => {
                self.resume();
            }
            SessionPhase::Setup | SessionPhase::Completed => {}
        }
        self.phase
    }

    /// Credit one fixed dose of water
    ///
    /// The dose is the same regardless of how many reminders have fired or
    /// how many drinks were already recorded. Returns `None` unless running.
    pub fn record_drink(&mut self) -> Option<DrinkRecorded> {
        if self.phase != SessionPhase::Running {
            tracing::debug!("Ignoring drink while {}", self.phase);
            return None;
        }
        let run = self.run.as_mut()?;

        let dose_ml = run.dose_ml();
        run.water_consumed_ml += dose_ml;
        run.drinks_recorded += 1;

        tracing::debug!(
            "Recorded drink of {}ml ({}ml total)",
            dose_ml,
            run.water_consumed_ml
        );

        Some(DrinkRecorded {
            dose_ml,
            consumed_ml: run.water_consumed_ml,
        })
    }

    /// Finish the workout and compute its summary
    ///
    /// Valid from `Running` or `Paused`. An open pause is closed at the
    /// completion instant so it counts as paused time.
    pub fn complete(&mut self) -> Option<SessionSummary> {
        if !matches!(self.phase, SessionPhase::Running | SessionPhase::Paused) {
            return None;
        }
        let now = self.clock.now();
        let run = self.run.as_mut()?;
        close_pause(run, now);

        let active = (now - run.started_at - run.total_paused).max(Duration::zero());
        let final_creatine_grams = if run.config.water_ml == 0 {
            0.0
        } else {
            (run.water_consumed_ml as f64 / run.config.water_ml as f64) * run.config.creatine_grams
        };

        let summary = SessionSummary {
            session_id: run.id,
            started_at: run.started_at,
            ended_at: now,
            planned_minutes: run.config.duration_minutes,
            actual_duration_minutes: (active.num_seconds() / 60) as u32,
            paused_seconds: run.total_paused.num_seconds().max(0) as u32,
            elapsed_seconds: run.elapsed_seconds,
            water_consumed_ml: run.water_consumed_ml,
            water_target_ml: run.config.water_ml,
            final_creatine_grams,
            reminders_fired: run.next_drink_index,
            drinks_recorded: run.drinks_recorded,
        };

        tracing::info!(
            "Completed workout {}: {} min, {}ml water, {:.1}g creatine",
            summary.session_id,
            summary.actual_duration_minutes,
            summary.water_consumed_ml,
            summary.final_creatine_grams
        );

        self.phase = SessionPhase::Completed;
        self.summary = Some(summary.clone());
        Some(summary)
    }

    /// User-requested end of the workout
    ///
    /// On an already completed session this hands back the stored summary.
    pub fn end(&mut self) -> Option<SessionSummary> {
        match self.phase {
            SessionPhase::Completed => self.summary.clone(),
            _ => self.complete(),
        }
    }

    /// Discard everything and return to `Setup`
    pub fn reset(&mut self) {
        tracing::debug!("Reset session from {}", self.phase);
        self.phase = SessionPhase::Setup;
        self.run = None;
        self.summary = None;
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.run.as_ref().map(|r| &r.config)
    }

    pub fn schedule(&self) -> Option<&DrinkSchedule> {
        self.run.as_ref().map(|r| &r.schedule)
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.run.as_ref().map_or(0, |r| r.elapsed_seconds)
    }

    pub fn next_drink_index(&self) -> usize {
        self.run.as_ref().map_or(0, |r| r.next_drink_index)
    }

    pub fn water_consumed_ml(&self) -> u32 {
        self.run.as_ref().map_or(0, |r| r.water_consumed_ml)
    }

    pub fn dose_ml(&self) -> Option<u32> {
        self.run.as_ref().map(ActiveRun::dose_ml)
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.run.as_ref().map_or(0, |r| {
            r.config.duration_seconds().saturating_sub(r.elapsed_seconds)
        })
    }

    /// Share of the workout done, 0 to 100
    pub fn progress_percent(&self) -> f64 {
        match &self.run {
            Some(r) if r.config.duration_seconds() > 0 => {
                (r.elapsed_seconds as f64 / r.config.duration_seconds() as f64 * 100.0)
                    .min(100.0)
            }
            _ => 0.0,
        }
    }

    pub fn water_remaining_ml(&self) -> u32 {
        self.run.as_ref().map_or(0, |r| {
            r.config.water_ml.saturating_sub(r.water_consumed_ml)
        })
    }

    /// Share of the water target still left to drink, 0 to 100
    pub fn water_level_percent(&self) -> f64 {
        match &self.run {
            Some(r) if r.config.water_ml > 0 => {
                self.water_remaining_ml() as f64 / r.config.water_ml as f64 * 100.0
            }
            _ => 0.0,
        }
    }

    /// Countdown to the next reminder; `None` before the workout starts
    pub fn next_drink(&self) -> Option<NextDrink> {
        let run = self.run.as_ref()?;
        let next = match run.schedule.get(run.next_drink_index) {
            Some(offset) if offset > run.elapsed_seconds => {
                NextDrink::In(offset - run.elapsed_seconds)
            }
            Some(_) => NextDrink::Now,
            None => NextDrink::FinalStretch,
        };
        Some(next)
    }

    /// The reminder to show the moment the workout starts
    ///
    /// Not part of the schedule, so dispatching it moves nothing forward.
    pub fn opening_reminder(&self) -> Option<DoseEvent> {
        let run = self.run.as_ref()?;
        Some(DoseEvent {
            index: None,
            offset_seconds: 0,
            dose_ml: run.dose_ml(),
        })
    }
}

fn close_pause(run: &mut ActiveRun, now: DateTime<Utc>) {
    if let Some(paused_at) = run.pause_started_at.take() {
        run.total_paused = run.total_paused + (now - paused_at).max(Duration::zero());
    }
}
