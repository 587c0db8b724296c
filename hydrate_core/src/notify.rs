//! Reminder dispatch.
//!
//! The session only produces events; a [`ReminderSink`] turns them into
//! something the user notices. Sinks are fire-and-forget: they cannot fail
//! the session.

use crate::{DoseEvent, SessionSummary, TickOutcome};

/// A user-facing notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Notifications with the same tag replace each other
    pub tag: &'static str,
}

impl Notification {
    pub fn drink(event: &DoseEvent) -> Self {
        Self {
            title: "💧 Time to Drink!".into(),
            body: format!(
                "Stay hydrated! You should have {}ml now.",
                event.dose_ml
            ),
            tag: "drink-reminder",
        }
    }

    pub fn completion(summary: &SessionSummary) -> Self {
        Self {
            title: "🎉 Workout Complete!".into(),
            body: format!(
                "Great job! You consumed {}ml of water and {:.1}g of creatine.",
                summary.water_consumed_ml, summary.final_creatine_grams
            ),
            tag: "workout-complete",
        }
    }
}

/// Receiver for drink-due and completion events
pub trait ReminderSink {
    fn drink_due(&mut self, event: &DoseEvent);
    fn completed(&mut self, summary: &SessionSummary);
}

/// Sink that only logs
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl ReminderSink for TracingSink {
    fn drink_due(&mut self, event: &DoseEvent) {
        let note = Notification::drink(event);
        tracing::info!(tag = note.tag, "{}: {}", note.title, note.body);
    }

    fn completed(&mut self, summary: &SessionSummary) {
        let note = Notification::completion(summary);
        tracing::info!(tag = note.tag, "{}: {}", note.title, note.body);
    }
}

/// Forward everything a tick produced to `sink`, reminders first
pub fn dispatch(sink: &mut dyn ReminderSink, outcome: &TickOutcome) {
    for event in &outcome.drinks_due {
        sink.drink_due(event);
    }
    if let Some(summary) = &outcome.completed {
        sink.completed(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[derive(Default)]
    struct Recorder {
        drinks: Vec<u32>,
        completions: usize,
    }

    impl ReminderSink for Recorder {
        fn drink_due(&mut self, event: &DoseEvent) {
            self.drinks.push(event.offset_seconds);
        }

        fn completed(&mut self, _summary: &SessionSummary) {
            self.completions += 1;
        }
    }

    fn summary(consumed: u32, creatine: f64) -> SessionSummary {
        SessionSummary {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: Utc::now(),
            planned_minutes: 30,
            actual_duration_minutes: 30,
            paused_seconds: 0,
            elapsed_seconds: 1800,
            water_consumed_ml: consumed,
            water_target_ml: 500,
            final_creatine_grams: creatine,
            reminders_fired: 3,
            drinks_recorded: 2,
        }
    }

    #[test]
    fn test_drink_notification_text() {
        let note = Notification::drink(&DoseEvent {
            index: Some(0),
            offset_seconds: 600,
            dose_ml: 125,
        });
        assert_eq!(note.body, "Stay hydrated! You should have 125ml now.");
        assert_eq!(note.tag, "drink-reminder");
    }

    #[test]
    fn test_completion_notification_text() {
        let note = Notification::completion(&summary(250, 2.5));
        assert_eq!(
            note.body,
            "Great job! You consumed 250ml of water and 2.5g of creatine."
        );
        assert_eq!(note.tag, "workout-complete");
    }

    #[test]
    fn test_dispatch_forwards_events() {
        let mut recorder = Recorder::default();
        let outcome = TickOutcome {
            elapsed_seconds: 1800,
            drinks_due: vec![DoseEvent {
                index: Some(2),
                offset_seconds: 1680,
                dose_ml: 125,
            }],
            completed: Some(summary(375, 3.75)),
        };

        dispatch(&mut recorder, &outcome);

        assert_eq!(recorder.drinks, vec![1680]);
        assert_eq!(recorder.completions, 1);
    }
}
