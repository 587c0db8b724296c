use clap::{Args, Parser, Subcommand};
use hydrate_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "hydrate")]
#[command(about = "Workout hydration reminder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a workout and get drink reminders (default)
    Start(StartArgs),

    /// Show the drink schedule for a workout length
    Schedule {
        /// Workout duration in minutes (15-180)
        #[arg(long)]
        duration: Option<u32>,

        /// Total water in ml (250-1000)
        #[arg(long)]
        water: Option<u32>,
    },

    /// Show the settings remembered from the last workout
    Settings,
}

#[derive(Args, Default)]
struct StartArgs {
    /// Workout duration in minutes (15-180)
    #[arg(long)]
    duration: Option<u32>,

    /// Total water to drink in ml (250-1000)
    #[arg(long)]
    water: Option<u32>,

    /// Creatine mixed into the water, in grams (0-10)
    #[arg(long)]
    creatine: Option<f64>,

    /// Milliseconds per tick (one tick is one second of workout)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Record a drink on every reminder
    #[arg(long)]
    auto_drink: bool,

    /// Do not read actions from stdin
    #[arg(long)]
    no_input: bool,

    /// Do not remember these settings for next time
    #[arg(long)]
    no_save: bool,

    /// Print only the final summary, as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    hydrate_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Some(Commands::Start(args)) => cmd_start(data_dir, args, &config),
        Some(Commands::Schedule { duration, water }) => {
            cmd_schedule(data_dir, duration, water, &config)
        }
        Some(Commands::Settings) => cmd_settings(data_dir),
        None => {
            // Default to "start" command
            cmd_start(data_dir, StartArgs::default(), &config)
        }
    }
}

/// Command line values first, then last-used settings, then config defaults
fn resolve_session_config(
    store: &JsonSettingsStore,
    config: &Config,
    duration: Option<u32>,
    water: Option<u32>,
    creatine: Option<f64>,
) -> Result<SessionConfig> {
    let fallback = store.load()?.apply_to(config.defaults.session_config());
    Ok(SessionConfig::clamped(
        duration.unwrap_or(fallback.duration_minutes),
        water.unwrap_or(fallback.water_ml),
        creatine.unwrap_or(fallback.creatine_grams),
    ))
}

fn cmd_start(data_dir: PathBuf, args: StartArgs, config: &Config) -> Result<()> {
    let store = JsonSettingsStore::in_data_dir(&data_dir);
    let session_config =
        resolve_session_config(&store, config, args.duration, args.water, args.creatine)?;

    let mut session = WorkoutSession::new();
    session.start(session_config)?;

    if !args.no_save {
        store.save(&session_config)?;
    }

    let quiet = args.json;
    let mut sink = TerminalSink {
        notifications: config.reminders.notifications && !quiet,
        sound: config.reminders.sound && !quiet,
    };

    if !quiet {
        display_start(&session);
    }

    // First reminder goes out as soon as the workout starts
    if let Some(opening) = session.opening_reminder() {
        sink.drink_due(&opening);
        if args.auto_drink {
            record_drink(&mut session, quiet);
        }
    }

    let tick = Duration::from_millis(args.tick_ms.unwrap_or(config.reminders.tick_interval_ms));
    let mut input = if args.no_input {
        None
    } else {
        if !quiet {
            display_controls();
        }
        Some(spawn_input_reader())
    };

    let mut next_tick = Instant::now() + tick;

    while session.phase() != SessionPhase::Completed {
        if let Some(rx) = &input {
            // Ticks stop while paused; only an action can move things on
            let received = if session.phase() == SessionPhase::Paused {
                rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
            } else {
                rx.recv_timeout(next_tick.saturating_duration_since(Instant::now()))
            };

            match received {
                Ok(action) => {
                    let was_paused = session.phase() == SessionPhase::Paused;
                    handle_action(&mut session, &mut sink, action, quiet);
                    if was_paused && session.phase() == SessionPhase::Running {
                        next_tick = Instant::now() + tick;
                    }
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("Input closed, continuing without it");
                    input = None;
                    if session.phase() == SessionPhase::Paused {
                        session.resume();
                        next_tick = Instant::now() + tick;
                    }
                    continue;
                }
            }
        } else {
            thread::sleep(next_tick.saturating_duration_since(Instant::now()));
        }

        next_tick += tick;
        let outcome = session.tick();
        dispatch(&mut sink, &outcome);

        if args.auto_drink {
            for _ in &outcome.drinks_due {
                record_drink(&mut session, quiet);
            }
        }

        if !quiet && !outcome.is_completed() && outcome.elapsed_seconds % 60 == 0 {
            display_status(&session);
        }
    }

    let summary = session
        .summary()
        .cloned()
        .ok_or_else(|| Error::Other("workout ended without a summary".into()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        display_summary(&summary);
    }

    Ok(())
}

fn cmd_schedule(
    data_dir: PathBuf,
    duration: Option<u32>,
    water: Option<u32>,
    config: &Config,
) -> Result<()> {
    let store = JsonSettingsStore::in_data_dir(&data_dir);
    let session_config = resolve_session_config(&store, config, duration, water, None)?;
    let schedule = DrinkSchedule::for_duration(session_config.duration_minutes);

    let minutes: Vec<String> = schedule
        .offsets()
        .iter()
        .map(|s| (s / 60).to_string())
        .collect();

    println!("Workout: {} min", session_config.duration_minutes);
    println!("Interval: every {} min", schedule.interval_minutes());
    println!("Reminders at: {} min", minutes.join(", "));
    println!(
        "Dose per drink: {}ml of {}ml",
        schedule.dose_ml(session_config.water_ml),
        session_config.water_ml
    );

    Ok(())
}

fn cmd_settings(data_dir: PathBuf) -> Result<()> {
    let store = JsonSettingsStore::in_data_dir(&data_dir);
    let saved = store.load()?;

    if saved.is_empty() {
        println!("No saved settings yet.");
        return Ok(());
    }

    let show = |value: Option<String>| value.unwrap_or_else(|| "-".into());
    println!("Last workout settings ({})", store.path().display());
    println!("  Duration: {}", show(saved.duration_minutes.map(|d| format!("{} min", d))));
    println!("  Water:    {}", show(saved.water_ml.map(|w| format!("{}ml", w))));
    println!("  Creatine: {}", show(saved.creatine_grams.map(|c| format!("{:.1}g", c))));

    Ok(())
}

// ============================================================================
// User input
// ============================================================================

enum UserAction {
    Drink,
    TogglePause,
    End,
    Status,
    Unknown(String),
}

impl UserAction {
    fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "" | "d" | "drink" => UserAction::Drink,
            "p" | "pause" | "resume" => UserAction::TogglePause,
            "e" | "end" | "q" | "quit" => UserAction::End,
            "s" | "status" => UserAction::Status,
            other => UserAction::Unknown(other.to_string()),
        }
    }
}

fn spawn_input_reader() -> Receiver<UserAction> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(UserAction::parse(&line)).is_err() {
                break;
            }
        }
    });
    rx
}

fn handle_action(
    session: &mut WorkoutSession,
    sink: &mut TerminalSink,
    action: UserAction,
    quiet: bool,
) {
    match action {
        UserAction::Drink => record_drink(session, quiet),
        UserAction::TogglePause => {
            let phase = session.toggle_pause();
            if !quiet {
                match phase {
                    SessionPhase::Paused => println!("⏸  Paused. 'p' + Enter to resume."),
                    SessionPhase::Running => println!("▶  Resumed."),
                    _ => {}
                }
            }
        }
        UserAction::End => {
            if let Some(summary) = session.end() {
                sink.completed(&summary);
            }
        }
        UserAction::Status => {
            if !quiet {
                display_status(session);
            }
        }
        UserAction::Unknown(input) => {
            eprintln!("Unknown action: {}", input);
            if !quiet {
                display_controls();
            }
        }
    }
}

fn record_drink(session: &mut WorkoutSession, quiet: bool) {
    match session.record_drink() {
        Some(drink) if !quiet => {
            println!("💧 Great! +{}ml ({}ml so far)", drink.dose_ml, drink.consumed_ml)
        }
        Some(_) => {}
        None if !quiet => println!("Resume the workout to record a drink."),
        None => {}
    }
}

// ============================================================================
// Output
// ============================================================================

/// Prints notifications and rings the terminal bell
struct TerminalSink {
    notifications: bool,
    sound: bool,
}

impl TerminalSink {
    fn show(&self, note: &Notification) {
        if self.sound {
            print!("\x07");
        }
        if self.notifications {
            println!("\n{}  {}", note.title, note.body);
        }
        let _ = io::stdout().flush();
    }
}

impl ReminderSink for TerminalSink {
    fn drink_due(&mut self, event: &DoseEvent) {
        TracingSink.drink_due(event);
        self.show(&Notification::drink(event));
    }

    fn completed(&mut self, summary: &SessionSummary) {
        TracingSink.completed(summary);
        self.show(&Notification::completion(summary));
    }
}

fn display_start(session: &WorkoutSession) {
    let (Some(config), Some(schedule)) = (session.config(), session.schedule()) else {
        return;
    };

    let minutes: Vec<String> = schedule
        .offsets()
        .iter()
        .map(|s| (s / 60).to_string())
        .collect();

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  WORKOUT STARTED");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Duration: {} min", config.duration_minutes);
    println!("  Water:    {}ml", config.water_ml);
    println!("  Creatine: {:.1}g", config.creatine_grams);
    println!(
        "  Reminders every {} min at: {} min",
        schedule.interval_minutes(),
        minutes.join(", ")
    );
    println!("  Dose per drink: {}ml", schedule.dose_ml(config.water_ml));
}

fn display_controls() {
    println!("─────────────────────────────────────────");
    println!("Press Enter (or 'd') after drinking");
    println!("  'p' + Enter to pause/resume");
    println!("  's' + Enter for status");
    println!("  'e' + Enter to end the workout");
}

fn display_status(session: &WorkoutSession) {
    let next = session
        .next_drink()
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".into());

    println!(
        "  {} left · {:.0}% complete · next drink: {} · {}ml to go",
        format_clock(session.remaining_seconds()),
        session.progress_percent(),
        next,
        session.water_remaining_ml()
    );
}

fn display_summary(summary: &SessionSummary) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  WORKOUT COMPLETE");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Duration: {} minutes", summary.actual_duration_minutes);
    println!(
        "  Water:    {}ml of {}ml",
        summary.water_consumed_ml, summary.water_target_ml
    );
    println!("  Creatine: {:.1}g", summary.final_creatine_grams);
    if summary.paused_seconds > 0 {
        println!("  Paused:   {}", format_clock(summary.paused_seconds));
    }
    println!();
}
