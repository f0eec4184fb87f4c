//! entrenos - Personal workout tracker
//!
//! CLI front over the local store: routines, exercises, logged records,
//! body measurements and the training calendar.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};

use entrenos::ingest;
use entrenos::models::{Exercise, NewMeasurement, NewRecord, SetEntry};
use entrenos::stats::Calendar;
use entrenos::store::{self, Store};
use entrenos::tracker::{Tracker, fresh_id};

#[derive(Parser)]
#[command(name = "entrenos")]
#[command(author, version, about = "Personal workout tracker")]
struct Cli {
    /// Data directory holding the per-profile slot files
    #[arg(long, env = "ENTRENOS_DIR", default_value = "entrenos-data")]
    data_dir: PathBuf,

    /// Profile to operate on (defaults to the active one)
    #[arg(long)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the routine list on first run
    Init,

    /// List routines
    Routines,

    /// List the exercises of a routine
    Exercises {
        /// Routine id
        routine: i64,
    },

    /// Add an exercise to a routine
    AddExercise {
        routine: i64,
        name: String,

        /// Image file to attach (downscaled and embedded)
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Remove an exercise from a routine
    RemoveExercise { routine: i64, exercise: i64 },

    /// Log a performance record for an exercise
    Log {
        routine: i64,
        exercise: i64,

        /// Sets as WEIGHTxREPS pairs, e.g. 50x10 52.5x8
        #[arg(required = true)]
        sets: Vec<String>,

        /// Optional notes
        #[arg(short, long, default_value = "")]
        notes: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show the record history of an exercise
    History { routine: i64, exercise: i64 },

    /// Remove a logged record
    RemoveRecord {
        routine: i64,
        exercise: i64,
        record: i64,
    },

    /// Move an exercise to another position in its routine
    Reorder {
        routine: i64,
        /// Exercise being moved
        dragged: i64,
        /// Exercise whose position it takes
        target: i64,
    },

    /// Log a body measurement
    Measure {
        /// Body weight in kg
        weight: f64,

        /// Waist girth in cm
        #[arg(long)]
        waist: Option<f64>,

        /// Hip girth in cm
        #[arg(long)]
        hip: Option<f64>,

        /// Chest girth in cm
        #[arg(long)]
        chest: Option<f64>,

        /// Arm girth in cm
        #[arg(long)]
        arm: Option<f64>,

        /// Optional notes
        #[arg(short, long, default_value = "")]
        notes: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show the body-measurement history
    Measures,

    /// Show training days, streaks and frequency
    Calendar,

    /// Show or switch the active profile
    Profile { name: Option<String> },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let profile = cli
        .profile
        .clone()
        .unwrap_or_else(|| store::active_profile(&cli.data_dir));
    let tracker = Tracker::new(Store::open(&cli.data_dir, &profile)?);

    match cli.command {
        Commands::Init => {
            let routines = tracker.store().initialize()?;
            println!("Profile '{}' ready with {} routines", profile, routines.len());
        }

        Commands::Routines => {
            for r in tracker.store().initialize()? {
                println!("{:>3} | {:10} | {}", r.id, r.name, r.description);
            }
        }

        Commands::Exercises { routine } => {
            let exercises = tracker.list_exercises(routine);
            if exercises.is_empty() {
                println!("No exercises in routine {}", routine);
            }
            for e in exercises {
                println!("{:>15} | {:25} | {} records", e.id, e.name, e.records.len());
            }
        }

        Commands::AddExercise {
            routine,
            name,
            image,
        } => {
            let image_data = match image {
                Some(path) => ingest::ingest(&path)?,
                None => String::new(),
            };
            let id = fresh_id();
            tracker.add_exercise(
                routine,
                Exercise {
                    id,
                    name: name.clone(),
                    image_data,
                    records: vec![],
                },
            )?;
            println!("Added: {} (id: {})", name, id);
        }

        Commands::RemoveExercise { routine, exercise } => {
            tracker.remove_exercise(routine, exercise)?;
            println!("Removed exercise {} from routine {}", exercise, routine);
        }

        Commands::Log {
            routine,
            exercise,
            sets,
            notes,
            date,
        } => {
            let sets = sets
                .iter()
                .map(|s| parse_set(s))
                .collect::<Result<Vec<_>>>()?;
            let record = NewRecord {
                date: date.unwrap_or_else(today),
                sets,
                notes,
            };
            if !tracker.add_record(routine, exercise, record)? {
                bail!("exercise {} not found in routine {}", exercise, routine);
            }
            println!("Logged");
        }

        Commands::History { routine, exercise } => {
            let Some(found) = tracker.get_exercise(routine, exercise) else {
                bail!("exercise {} not found in routine {}", exercise, routine);
            };
            println!("{} - {} records", found.name, found.records.len());
            println!("{:-<60}", "");
            for r in &found.records {
                let sets: Vec<_> = r
                    .sets
                    .iter()
                    .map(|s| format!("{}x{}", s.weight, s.reps))
                    .collect();
                println!("{} | {} | {:30} | {}", r.id, r.date, sets.join(", "), r.notes);
            }
        }

        Commands::RemoveRecord {
            routine,
            exercise,
            record,
        } => {
            if !tracker.remove_record(routine, exercise, record)? {
                bail!("exercise {} not found in routine {}", exercise, routine);
            }
            println!("Removed");
        }

        Commands::Reorder {
            routine,
            dragged,
            target,
        } => {
            if !tracker.reorder_exercises(routine, dragged, target)? {
                bail!("routine {} does not contain both exercises", routine);
            }
            println!("Reordered");
        }

        Commands::Measure {
            weight,
            waist,
            hip,
            chest,
            arm,
            notes,
            date,
        } => {
            let entry = tracker.add_measurement(NewMeasurement {
                date: date.unwrap_or_else(today),
                weight,
                waist,
                hip,
                chest,
                arm,
                notes,
            })?;
            println!("Logged: {} kg on {} (id: {})", entry.weight, entry.date, entry.id);
        }

        Commands::Measures => {
            for m in tracker.list_measurements() {
                let girth = |v: Option<f64>| v.map_or("-".to_string(), |x| x.to_string());
                println!(
                    "{} | {:5} kg | cintura {} | cadera {} | {}",
                    m.date,
                    m.weight,
                    girth(m.waist),
                    girth(m.hip),
                    m.notes
                );
            }
        }

        Commands::Calendar => {
            let cal = Calendar::from_table(&tracker.snapshot());
            let today = Local::now().date_naive();
            println!("Training calendar");
            println!("{:-<40}", "");
            println!("Training days:   {}", cal.training_days());
            println!("Current streak:  {} days", cal.current_streak(today));
            println!("Longest streak:  {} days", cal.longest_streak());
            println!(
                "This month:      {} days",
                cal.days_in_month(today.year(), today.month())
            );
            println!("Frequency:       {:.1} days/week", cal.weekly_frequency());
        }

        Commands::Profile { name } => match name {
            Some(name) => {
                store::set_active_profile(&cli.data_dir, &name)?;
                Store::open(&cli.data_dir, &name)?.initialize()?;
                println!("Active profile: {}", name);
            }
            None => println!("Active profile: {}", store::active_profile(&cli.data_dir)),
        },
    }

    Ok(())
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parse one "WEIGHTxREPS" argument, e.g. "52.5x8".
fn parse_set(arg: &str) -> Result<SetEntry> {
    let (weight, reps) = arg
        .split_once(['x', 'X'])
        .with_context(|| format!("invalid set '{arg}', expected WEIGHTxREPS"))?;
    Ok(SetEntry {
        weight: weight
            .parse()
            .with_context(|| format!("invalid weight in set '{arg}'"))?,
        reps: reps
            .parse()
            .with_context(|| format!("invalid reps in set '{arg}'"))?,
    })
}
