use chrono::NaiveDate;
use clap::{ArgGroup, Parser, Subcommand};
use lifto_core::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "lifto")]
#[command(about = "Liftoscript training plan generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate upcoming workouts from a script, replacing the current queue
    #[command(group(ArgGroup::new("source").required(true).args(["script", "preset"])))]
    Generate {
        /// Liftoscript file
        #[arg(long)]
        script: Option<PathBuf>,

        /// Built-in preset name
        #[arg(long)]
        preset: Option<String>,

        /// Number of times to repeat the script
        #[arg(long, default_value_t = 1)]
        cycles: u32,

        /// Squat one-rep max
        #[arg(long)]
        squat: Option<f64>,

        /// Bench one-rep max
        #[arg(long)]
        bench: Option<f64>,

        /// Deadlift one-rep max
        #[arg(long)]
        deadlift: Option<f64>,

        /// Logged workout CSV used to estimate maxes not given explicitly
        #[arg(long)]
        history: Option<PathBuf>,

        /// Show the plan without touching the upcoming queue
        #[arg(long)]
        dry_run: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List built-in presets
    Presets {
        #[arg(long)]
        json: bool,
    },

    /// Print a preset's script
    Preset { name: String },

    /// Show the upcoming workout queue
    Upcoming {
        /// Only this session
        #[arg(long)]
        session: Option<u32>,

        #[arg(long)]
        json: bool,
    },

    /// Delete one session from the upcoming queue
    DropSession { session: u32 },

    /// Log a session as done: append its sets to history and drop it from the queue
    Complete {
        session: u32,

        /// Date the session was performed (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// History CSV to append to (defaults to history.csv in the data directory)
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Show estimated 1RM progression for an exercise, logged and projected
    Progression {
        exercise: String,

        /// History CSV to read (defaults to history.csv in the data directory)
        #[arg(long)]
        history: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Export the upcoming queue as CSV
    Export { path: PathBuf },

    /// Estimate a one-rep max from a logged set
    Estimate {
        #[arg(long)]
        weight: f64,

        /// Reps, e.g. 5, 5+ or 8-12
        #[arg(long)]
        reps: String,
    },

    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the config file path
    Path,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        lifto_core::logging::init_with_level("debug");
    } else {
        lifto_core::logging::init_with_level("warn");
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_config_path);

    // Config helpers must work even when the existing file is broken
    let mut config = match (&cli.command, &cli.config) {
        (Commands::Config { .. }, _) => Config::default(),
        (_, None) => Config::load()?,
        (_, Some(path)) if path.exists() => Config::load_from(path)?,
        (_, Some(path)) => {
            tracing::info!("No config file at {:?}, using defaults", path);
            Config::default()
        }
    };
    if let Some(dir) = cli.data_dir {
        config.data.data_dir = dir;
    }
    let mut store = JsonFileStore::new(config.upcoming_path());

    match cli.command {
        Commands::Generate {
            script,
            preset,
            cycles,
            squat,
            bench,
            deadlift,
            history,
            dry_run,
            json,
        } => {
            let script = match (script, preset) {
                (Some(path), _) => std::fs::read_to_string(&path)?,
                (None, Some(name)) => get_preset(&name)?.script,
                (None, None) => {
                    return Err(Error::InvalidParameter(
                        "either --script or --preset is required".into(),
                    ))
                }
            };

            let explicit = Maxes {
                squat,
                bench,
                deadlift,
            };
            let maxes = match history {
                Some(path) => {
                    let sets = load_logged_sets(&path)?;
                    explicit.or(estimate_maxes(
                        &sets,
                        &config.lifts,
                        config.plan.weight_unit,
                    ))
                }
                None => explicit,
            };

            let generator = Generator::from_config(&config)?;
            if dry_run {
                cmd_dry_run(&generator, &script, cycles, &maxes, json)
            } else {
                cmd_generate(&generator, &mut store, &script, cycles, &maxes, json)
            }
        }
        Commands::Presets { json } => cmd_presets(json),
        Commands::Preset { name } => {
            print!("{}", get_preset(&name)?.script);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Upcoming { session, json } => cmd_upcoming(&store, session, json),
        Commands::DropSession { session } => {
            let removed = store.delete_session(session)?;
            if removed == 0 {
                eprintln!("Session {} not found", session);
                return Ok(ExitCode::FAILURE);
            }
            println!("✓ Removed {} workouts from session {}", removed, session);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Complete {
            session,
            date,
            history,
        } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let history = history.unwrap_or_else(|| config.history_path());
            match complete_session(&mut store, session, date, &history) {
                Ok(result) => {
                    println!("✓ {}", result.message);
                    println!("  History: {}", history.display());
                    Ok(ExitCode::SUCCESS)
                }
                Err(Error::SessionNotFound(n)) => {
                    eprintln!("Session {} not found", n);
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => Err(e),
            }
        }
        Commands::Progression {
            exercise,
            history,
            json,
        } => {
            let history = history.unwrap_or_else(|| config.history_path());
            cmd_progression(&store, &exercise, &history, json)
        }
        Commands::Export { path } => {
            let count = lifto_core::export::export_csv(&store.all()?, &path)?;
            println!("✓ Exported {} workouts", count);
            println!("  CSV: {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Estimate { weight, reps } => {
            let reps: Reps = reps.parse().map_err(Error::InvalidParameter)?;
            match estimate_one_rep_max(weight, &reps) {
                Some(estimate) => {
                    println!("Estimated 1RM: {}", estimate);
                    Ok(ExitCode::SUCCESS)
                }
                None => Err(Error::InvalidParameter(format!(
                    "weight must be positive, got {}",
                    weight
                ))),
            }
        }
        Commands::Config { action } => cmd_config(&action, &config_path),
    }
}

fn cmd_generate(
    generator: &Generator,
    store: &mut JsonFileStore,
    script: &str,
    cycles: u32,
    maxes: &Maxes,
    json: bool,
) -> Result<ExitCode> {
    let result = generator.run(store, script, cycles, maxes);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        println!("✓ {}", result.message);
        println!("  Replaced {} previous entries", result.deleted_count);
        println!("  Store: {}", store.path().display());
    } else {
        eprintln!("✗ {}", result.message);
    }

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_dry_run(
    generator: &Generator,
    script: &str,
    cycles: u32,
    maxes: &Maxes,
    json: bool,
) -> Result<ExitCode> {
    let plan = match generator.build_plan(script, cycles, maxes) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("✗ {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&materialize(&plan))?);
        return Ok(ExitCode::SUCCESS);
    }

    for session in &plan.sessions {
        display_session(session);
    }
    println!(
        "[Dry run - {} workouts across {} sessions, queue not modified]",
        plan.set_count(),
        plan.sessions.len()
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_presets(json: bool) -> Result<ExitCode> {
    let presets = list_presets();
    if json {
        println!("{}", serde_json::to_string_pretty(&presets)?);
        return Ok(ExitCode::SUCCESS);
    }

    for preset in presets {
        let needs = if preset.requires_maxes {
            " (needs maxes)"
        } else {
            ""
        };
        println!("{:<18} {}{}", preset.name, preset.display_name, needs);
        println!("{:<18} {}", "", preset.description);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_upcoming(store: &JsonFileStore, session: Option<u32>, json: bool) -> Result<ExitCode> {
    let rows = match session {
        Some(n) => store.by_session(n)?,
        None => store.all()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(ExitCode::SUCCESS);
    }

    if rows.is_empty() {
        println!("No upcoming workouts.");
        return Ok(ExitCode::SUCCESS);
    }

    let mut current = None;
    for row in &rows {
        let w = &row.workout;
        if current != Some(w.session) {
            println!("\nSession {}", w.session);
            current = Some(w.session);
        }
        println!(
            "  {}",
            format_set(
                &w.exercise,
                w.weight,
                w.weight_unit,
                &w.reps,
                w.comment.as_deref()
            )
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_progression(
    store: &JsonFileStore,
    exercise: &str,
    history: &Path,
    json: bool,
) -> Result<ExitCode> {
    let logged = if history.exists() {
        load_logged_sets(history)?
    } else {
        tracing::info!("No history at {:?}, showing the queue only", history);
        Vec::new()
    };
    let today = chrono::Local::now().date_naive();
    let report = progression_report(exercise, &logged, &store.all()?, today);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    if report.historical.is_empty() && report.upcoming.is_empty() {
        println!("No weighted sets of {} logged or queued.", exercise);
        return Ok(ExitCode::SUCCESS);
    }

    for point in &report.historical {
        let unit = point
            .weight_unit
            .map(|u| u.to_string())
            .unwrap_or_default();
        println!(
            "{}  {:>7} {:<3} x {:<5} e1RM {}",
            point.date,
            point.weight,
            unit,
            point.reps.to_string(),
            point.estimated_1rm
        );
    }
    for point in &report.upcoming {
        println!(
            "{}  {:>7} {:<3} x {:<5} e1RM {}  (session {})",
            point.projected_date,
            point.weight,
            point.weight_unit.to_string(),
            point.reps.to_string(),
            point.estimated_1rm,
            point.session
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_config(action: &ConfigAction, path: &Path) -> Result<ExitCode> {
    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                eprintln!(
                    "Config already exists at {} (use --force to overwrite)",
                    path.display()
                );
                return Ok(ExitCode::FAILURE);
            }
            Config::default().save_to(path)?;
            println!("✓ Wrote default config to {}", path.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn display_session(session: &Session) {
    let week = session.week.as_deref().unwrap_or("-");
    println!(
        "Session {} (cycle {}) {} / {} [{}]",
        session.number, session.cycle, week, session.day, session.category
    );
    for set in &session.sets {
        println!(
            "  {}",
            format_set(
                &set.exercise,
                set.weight,
                set.weight_unit,
                &set.reps,
                set.comment.as_deref()
            )
        );
    }
}

fn format_set(
    exercise: &str,
    weight: Option<f64>,
    unit: WeightUnit,
    reps: &Reps,
    comment: Option<&str>,
) -> String {
    let load = match weight {
        Some(w) => format!(" @ {} {}", w, unit),
        None => String::new(),
    };
    let note = comment.map(|c| format!("  // {}", c)).unwrap_or_default();
    format!("{:<28} {} reps{}{}", exercise, reps, load, note)
}
