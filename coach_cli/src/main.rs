use coach_core::insights::{self, Prediction};
use coach_core::*;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Upper bound accepted for `--max` and `--target`
const MAX_REPS_LIMIT: i64 = 10_000;

#[derive(Parser)]
#[command(name = "repcoach")]
#[command(about = "Adaptive bodyweight training planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Test your max and plan the next week for an exercise
    Plan {
        /// Exercise type (pushups, pullups, ...)
        #[arg(long)]
        exercise: String,

        /// Max reps from today's test set
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_REPS_LIMIT))]
        max: u32,

        /// Goal max reps
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_REPS_LIMIT))]
        target: Option<u32>,

        /// Show the week without saving it
        #[arg(long)]
        dry_run: bool,

        /// Print the week as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record how a training day went
    Feedback {
        #[arg(long)]
        exercise: String,

        /// Day number within the latest week (2-13)
        #[arg(long, value_parser = clap::value_parser!(u32).range(2..))]
        day: u32,

        /// too-easy, perfect, difficult-finished or too-hard
        #[arg(long)]
        result: Feedback,

        /// Sets fully completed (too-hard only)
        #[arg(long)]
        actual_sets: Option<u32>,

        /// Reps managed in the failed set (too-hard only)
        #[arg(long)]
        actual_last_reps: Option<u32>,
    },

    /// Show the latest planned week
    Show {
        #[arg(long)]
        exercise: Option<String>,

        /// Print the week as JSON
        #[arg(long)]
        json: bool,
    },

    /// List planned weeks (default)
    History {
        #[arg(long)]
        exercise: Option<String>,
    },

    /// List the available training strategies
    Algorithms,

    /// Export history as JSON, or the programs as CSV
    Export {
        #[arg(long)]
        output: PathBuf,

        #[arg(long)]
        csv: bool,
    },

    /// Replace history with a JSON export
    Import { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    coach_core::logging::init_for_cli(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store = HistoryStore::in_dir(&data_dir);
    tracing::debug!("Using history at {:?}", store.path());

    match cli.command {
        Some(Commands::Plan {
            exercise,
            max,
            target,
            dry_run,
            json,
        }) => cmd_plan(&store, &config, &exercise, max, target, dry_run, json),
        Some(Commands::Feedback {
            exercise,
            day,
            result,
            actual_sets,
            actual_last_reps,
        }) => cmd_feedback(&store, &exercise, day, result, actual_sets, actual_last_reps),
        Some(Commands::Show { exercise, json }) => cmd_show(&store, &config, exercise.as_deref(), json),
        Some(Commands::History { exercise }) => cmd_history(&store, exercise.as_deref()),
        Some(Commands::Algorithms) => {
            cmd_algorithms();
            Ok(())
        }
        Some(Commands::Export { output, csv }) => cmd_export(&store, &output, csv),
        Some(Commands::Import { path }) => cmd_import(&store, &path),
        None => cmd_history(&store, None),
    }
}

fn cmd_plan(
    store: &HistoryStore,
    config: &Config,
    exercise: &str,
    max: u32,
    target: Option<u32>,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let exercise = normalize_exercise(exercise)?;
    let doc = store.load()?;
    let previous = doc.latest_for(&exercise);

    let planner = WeekPlanner::new(config.planner.clone())?;
    let request = WeekRequest {
        week_number: doc.next_week_number(&exercise),
        max_reps: max,
        exercise_type: &exercise,
        target_reps: target,
    };
    let week = planner.generate_week(request, previous, &doc.weeks);

    if json {
        println!("{}", serde_json::to_string_pretty(&week)?);
    } else {
        display_week(&week, config);
    }

    if dry_run {
        if !json {
            println!("\n[Dry run - week not saved]");
        }
        return Ok(());
    }

    let week_number = week.week_number;
    store.append_week(week)?;
    if !json {
        println!("\n✓ Week {} saved", week_number);
    }
    Ok(())
}

fn cmd_feedback(
    store: &HistoryStore,
    exercise: &str,
    day: u32,
    result: Feedback,
    actual_sets: Option<u32>,
    actual_last_reps: Option<u32>,
) -> Result<()> {
    let exercise = normalize_exercise(exercise)?;
    if result != Feedback::TooHard && (actual_sets.is_some() || actual_last_reps.is_some()) {
        eprintln!("Note: --actual-sets/--actual-last-reps are only kept for too-hard days");
    }

    let week = store.record_feedback(&exercise, day, result, actual_sets, actual_last_reps)?;
    let rated = week.training_days().filter(|d| d.feedback.is_some()).count();
    let total = week.training_days().count();

    println!(
        "✓ Day {} of week {} ({}) marked {}",
        day, week.week_number, week.exercise_type, result
    );
    println!("  {}/{} days rated", rated, total);
    Ok(())
}

fn cmd_show(store: &HistoryStore, config: &Config, exercise: Option<&str>, json: bool) -> Result<()> {
    let doc = store.load()?;
    let week = match exercise {
        Some(ex) => doc.latest_for(&normalize_exercise(ex)?),
        None => doc.weeks.last(),
    };

    let Some(week) = week else {
        println!("No weeks planned yet. Start with `repcoach plan --exercise <type> --max <n>`.");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(week)?);
    } else {
        display_week(week, config);
    }
    Ok(())
}

fn cmd_history(store: &HistoryStore, exercise: Option<&str>) -> Result<()> {
    let doc = store.load()?;
    let filter = exercise.map(normalize_exercise).transpose()?;
    let weeks: Vec<&Week> = doc
        .weeks
        .iter()
        .filter(|w| filter.as_deref().map_or(true, |ex| w.exercise_type == ex))
        .collect();

    if weeks.is_empty() {
        println!("No weeks planned yet. Start with `repcoach plan --exercise <type> --max <n>`.");
        return Ok(());
    }

    println!(
        "{:<12} {:>4} {:>4} {:<20} {:>6} {:>7} {:>6}",
        "exercise", "week", "max", "strategy", "factor", "volume", "rated"
    );
    for week in weeks {
        let rated = week.training_days().filter(|d| d.feedback.is_some()).count();
        println!(
            "{:<12} {:>4} {:>4} {:<20} {:>6.2} {:>7} {:>3}/{:<2}",
            week.exercise_type,
            week.week_number,
            week.max_reps,
            catalog::display_name(week.algo_id),
            week.progression_factor,
            week.total_volume,
            rated,
            week.training_days().count()
        );
    }
    Ok(())
}

fn cmd_algorithms() {
    for descriptor in catalog::all() {
        println!("{} ({})", descriptor.name, descriptor.id);
        println!("  by {}", descriptor.author);
        println!("  {}", descriptor.description);
        println!("  Best for: {}", descriptor.best_for);
        println!();
    }
}

fn cmd_export(store: &HistoryStore, output: &Path, csv: bool) -> Result<()> {
    if csv {
        let doc = store.load()?;
        let rows = write_program_csv(&doc.weeks, output)?;
        println!("✓ Exported {} days to {}", rows, output.display());
    } else {
        let weeks = store.export_to(output)?;
        println!("✓ Exported {} weeks to {}", weeks, output.display());
    }
    Ok(())
}

fn cmd_import(store: &HistoryStore, path: &Path) -> Result<()> {
    let count = store.import_from(path)?;
    println!("✓ Imported {} weeks into {}", count, store.path().display());
    Ok(())
}

fn normalize_exercise(exercise: &str) -> Result<String> {
    let normalized = exercise.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(Error::Other("Exercise type must not be empty".into()));
    }
    Ok(normalized)
}

fn display_week(week: &Week, config: &Config) {
    println!("\n╭─────────────────────────────────────────╮");
    println!(
        "│  WEEK {} · {} · max {}",
        week.week_number, week.exercise_type, week.max_reps
    );
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Strategy: {}    Factor: {:.2}    Volume: {} reps",
        catalog::display_name(week.algo_id),
        week.progression_factor,
        week.total_volume
    );
    if week.split_applied {
        println!("  Split applied after last week's failure");
    }
    println!();

    println!(
        "  {:>3}  {:<8} {:<20} {:>4} {:>4} {:>5} {:>4}  {}",
        "day", "session", "type", "sets", "reps", "rest", "int", "feedback"
    );
    for day in &week.program {
        let session = match day.session {
            Some(Session::Morning) => "morning",
            Some(Session::Evening) => "evening",
            None => "",
        };
        let reps = match &day.ladder {
            Some(ladder) => ladder
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join("-"),
            None => day.reps.to_string(),
        };
        println!(
            "  {:>3}  {:<8} {:<20} {:>4} {:>4} {:>4}s {:>3}%  {}{}",
            day.day,
            session,
            day.day_type,
            day.sets,
            reps,
            day.rest,
            day.intensity,
            day.feedback.map(|f| f.as_str()).unwrap_or("-"),
            if day.split_applied { " (split)" } else { "" }
        );
    }

    if !week.advice.is_empty() {
        println!();
        for line in week.advice.lines() {
            println!("  {}", line);
        }
    }

    let alerts = insights::alerts(week);
    if !alerts.is_empty() {
        println!();
        for alert in alerts {
            println!("  ⚠ {}", alert);
        }
    }

    let statuses = insights::day_type_status(week);
    if !statuses.is_empty() {
        println!();
        let summary: Vec<String> = statuses
            .iter()
            .map(|(category, status)| format!("{} {}", category, status.as_str()))
            .collect();
        println!("  Last week by day type: {}", summary.join(", "));
    }

    let prediction = insights::predict_target(
        week.max_reps,
        week.target_reps,
        config.planner.prediction.weekly_growth,
    );
    if let (Some(target), Some(p)) = (week.target_reps, prediction) {
        println!();
        println!("  {}", describe_prediction(target, &p));
    }
}

fn describe_prediction(target: u32, prediction: &Prediction) -> String {
    if prediction.beyond_a_year {
        format!(
            "Goal {} reps: more than a year away at +{}% per week ({} weeks).",
            target, prediction.weekly_growth_pct, prediction.weeks_needed
        )
    } else {
        format!(
            "Goal {} reps: about {} weeks at +{}% per week.",
            target, prediction.weeks_needed, prediction.weekly_growth_pct
        )
    }
}
