//! F1 Predict CLI - Command-line interface for race finishing order predictions

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use dialoguer::{theme::ColorfulTheme, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use f1predict::config::{DEFAULT_DRIVERS_CSV, DEFAULT_MODEL_DIR, DEFAULT_SCHEDULE_CSV};
use f1predict::data::{DriverTable, Event, GridAssignment, GridSlot, Schedule, GRID_SIZE};
use f1predict::models::PredictResponse;
use f1predict::predictor::Predictor;

#[derive(Parser)]
#[command(name = "f1predict")]
#[command(author, version, about = "F1 race prediction CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to model artifacts directory
    #[arg(long, default_value = DEFAULT_MODEL_DIR)]
    model_dir: PathBuf,

    /// Path to the season driver table
    #[arg(long, default_value = DEFAULT_DRIVERS_CSV)]
    drivers_csv: PathBuf,

    /// Path to the season schedule
    #[arg(long, default_value = DEFAULT_SCHEDULE_CSV)]
    schedule_csv: PathBuf,

    /// Season year
    #[arg(long, default_value = "2024")]
    season: i32,
}

#[derive(Subcommand)]
enum Commands {
    /// List the season's events
    Events,

    /// List the season's drivers
    Drivers,

    /// Predict the finishing order of a race
    Predict {
        /// Event name (e.g. "Monaco Grand Prix")
        #[arg(short, long, conflicts_with = "round")]
        event: Option<String>,

        /// Round number
        #[arg(short, long)]
        round: Option<u32>,

        /// Starting grid as driver codes, pole first (VER,NOR,...)
        #[arg(short, long, value_delimiter = ',', conflicts_with = "grid_file")]
        grid: Vec<String>,

        /// CSV with `position,driver` rows
        #[arg(long)]
        grid_file: Option<PathBuf>,
    },
}

/// Paths shared by every command
struct DataPaths<'a> {
    model_dir: &'a Path,
    drivers_csv: &'a Path,
    schedule_csv: &'a Path,
    season: i32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    println!(
        "{}",
        format!("F1 Predict CLI v{}", env!("CARGO_PKG_VERSION"))
            .cyan()
            .bold()
    );
    println!();

    let paths = DataPaths {
        model_dir: &cli.model_dir,
        drivers_csv: &cli.drivers_csv,
        schedule_csv: &cli.schedule_csv,
        season: cli.season,
    };

    if cli.interactive {
        run_interactive(&paths)?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Events => list_events(&paths)?,
            Commands::Drivers => list_drivers(&paths)?,
            Commands::Predict {
                event,
                round,
                grid,
                grid_file,
            } => {
                predict_race(&paths, event.as_deref(), round, &grid, grid_file.as_deref())?;
            }
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb
}

fn load_drivers(paths: &DataPaths) -> Result<DriverTable> {
    DriverTable::load(paths.drivers_csv)
        .with_context(|| format!("Failed to load drivers from {:?}", paths.drivers_csv))
}

fn load_schedule(paths: &DataPaths) -> Result<Schedule> {
    Schedule::load(paths.schedule_csv, paths.season)
        .with_context(|| format!("Failed to load schedule from {:?}", paths.schedule_csv))
}

fn load_predictor(paths: &DataPaths, drivers: &DriverTable) -> Result<Predictor> {
    let pb = spinner("Loading model...");
    let predictor = Predictor::load(paths.model_dir, drivers)
        .with_context(|| format!("Failed to load model from {:?}", paths.model_dir));
    pb.finish_and_clear();
    predictor
}

fn list_events(paths: &DataPaths) -> Result<()> {
    let schedule = load_schedule(paths)?;

    println!("{}", format!("{} season", schedule.season()).yellow().bold());
    println!("{:>5} {:<32} {:<16} {:>10}", "Round", "Event", "Country", "Date");
    println!("{}", "-".repeat(66));

    for event in schedule.events() {
        println!(
            "{:>5} {:<32} {:<16} {:>10}",
            event.round,
            truncate_name(&event.name, 32),
            event.country.as_deref().unwrap_or("-"),
            event
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }

    println!();
    println!("Total: {} events", schedule.len());
    Ok(())
}

fn list_drivers(paths: &DataPaths) -> Result<()> {
    let drivers = load_drivers(paths)?;

    println!(
        "{:<4} {:<20} {:<16} {:>6} {:>7} {:>7}",
        "Code", "Driver", "Team", "Points", "Quali", "Race"
    );
    println!("{}", "-".repeat(65));

    for driver in drivers.iter() {
        println!(
            "{:<4} {:<20} {:<16} {:>6.0} {:>7.2} {:>7.2}",
            driver.code.bold(),
            truncate_name(&driver.name, 20),
            truncate_name(&driver.team, 16),
            driver.points,
            driver.avg_quali_position,
            driver.avg_race_position
        );
    }

    Ok(())
}

fn predict_race(
    paths: &DataPaths,
    event_name: Option<&str>,
    round: Option<u32>,
    grid_order: &[String],
    grid_file: Option<&Path>,
) -> Result<()> {
    let drivers = load_drivers(paths)?;
    let schedule = load_schedule(paths)?;

    let event = find_event(&schedule, event_name, round)?;

    let grid = match grid_file {
        Some(path) => {
            let slots = GridSlot::load_csv(path)
                .with_context(|| format!("Failed to read grid from {:?}", path))?;
            GridAssignment::from_slots(&slots, &drivers)?
        }
        None if !grid_order.is_empty() => GridAssignment::from_order(grid_order, &drivers)?,
        None => bail!("A starting grid is required: pass --grid or --grid-file"),
    };

    let mut predictor = load_predictor(paths, &drivers)?;
    let response = predictor
        .predict_race(&drivers, schedule.season(), event, &grid)
        .with_context(|| format!("Prediction failed for {}", event.name))?;

    print_prediction(&response);
    Ok(())
}

fn find_event<'a>(
    schedule: &'a Schedule,
    event_name: Option<&str>,
    round: Option<u32>,
) -> Result<&'a Event> {
    match (round, event_name) {
        (Some(round), _) => schedule
            .by_round(round)
            .with_context(|| format!("No event with round {} in {}", round, schedule.season())),
        (None, Some(name)) => schedule
            .by_name(name)
            .with_context(|| format!("Unknown event: {}", name)),
        (None, None) => bail!("Either --event or --round is required"),
    }
}

fn print_prediction(response: &PredictResponse) {
    println!(
        "{}: {} {} (round {})",
        "Prediction".green(),
        response.season,
        response.event_name,
        response.round
    );
    println!();

    // Podium
    println!("{}", "Podium:".yellow().bold());
    for entry in &response.podium {
        println!(
            "  {} {:<7} {:<4} {:<20} {:>3} pts",
            format!("P{}", entry.rank).bold(),
            medal_label(&entry.medal),
            entry.driver,
            entry.driver_name,
            entry.predicted_points
        );
    }
    println!();

    // Full classification
    println!("{}", "Predicted classification:".yellow().bold());
    println!(
        "{:>4} {:<4} {:<20} {:<16} {:>5} {:>9} {:>6} {:>6}",
        "Pos", "Code", "Driver", "Team", "Grid", "Pred", "Pts", "Conf"
    );
    println!("{}", "-".repeat(78));

    for row in &response.results {
        println!(
            "{:>4} {:<4} {:<20} {:<16} {:>5} {:>9.3} {:>6} {:>5.0}%",
            row.rank,
            row.driver.bold(),
            truncate_name(&row.driver_name, 20),
            truncate_name(&row.team, 16),
            row.grid_position,
            row.predicted_position,
            row.predicted_points,
            row.confidence
        );
    }
    println!();

    // Grid -> finish chart
    println!("{}", "Position changes:".yellow().bold());
    for change in &response.position_changes {
        let delta = i32::from(change.grid_position) - i32::from(change.predicted_rank);
        println!(
            "  {:<4} P{:<3} -> P{:<3} {}",
            change.driver,
            change.grid_position,
            change.predicted_rank,
            format_delta(delta)
        );
    }
    println!();

    // Statistics
    let stats = &response.statistics;
    println!("{}", "Race statistics:".yellow().bold());
    if let Some(gainer) = &stats.biggest_gainer {
        println!(
            "  Biggest gainer: {} (P{} -> P{}, +{})",
            gainer.driver.green(),
            gainer.grid_position,
            gainer.rank,
            gainer.places
        );
    }
    if let Some(loser) = &stats.biggest_loser {
        println!(
            "  Biggest loser:  {} (P{} -> P{}, -{})",
            loser.driver.red(),
            loser.grid_position,
            loser.rank,
            loser.places
        );
    }
    println!("  Average confidence: {:.1}%", stats.avg_confidence);
    println!("  Drivers: {}", stats.total_drivers);
}

fn run_interactive(paths: &DataPaths) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!();

    let drivers = load_drivers(paths)?;
    let schedule = load_schedule(paths)?;
    let mut predictor = load_predictor(paths, &drivers)?;

    let theme = ColorfulTheme::default();

    loop {
        let mut options: Vec<String> = schedule
            .events()
            .iter()
            .map(|e| format!("R{:02} {}", e.round, e.name))
            .collect();
        options.push("Quit".to_string());

        let selection = Select::with_theme(&theme)
            .with_prompt("Select a race")
            .items(&options)
            .default(0)
            .interact()?;

        let Some(event) = schedule.events().get(selection) else {
            println!("Goodbye!");
            break;
        };

        let slots = pick_grid(&theme, &drivers)?;
        println!();

        let grid = match GridAssignment::from_slots(&slots, &drivers) {
            Ok(grid) => grid,
            Err(e) => {
                println!("{} {}", "Cannot predict:".red(), e);
                println!();
                continue;
            }
        };

        match predictor.predict_race(&drivers, schedule.season(), event, &grid) {
            Ok(response) => print_prediction(&response),
            Err(e) => println!("{} {}", "Prediction failed:".red(), e),
        }
        println!();
    }

    Ok(())
}

/// Ask for a driver on each grid slot, offering only drivers not yet placed
fn pick_grid(theme: &ColorfulTheme, drivers: &DriverTable) -> Result<Vec<GridSlot>> {
    let mut remaining: Vec<&str> = drivers.codes().collect();
    let mut slots = Vec::with_capacity(GRID_SIZE);

    for position in 1..=GRID_SIZE as u8 {
        let mut items: Vec<String> = remaining
            .iter()
            .map(|code| {
                let name = drivers.get(code).map(|d| d.name.as_str()).unwrap_or("");
                format!("{} {}", code, name)
            })
            .collect();
        items.push("(leave empty)".to_string());

        let choice = Select::with_theme(theme)
            .with_prompt(format!("P{}", position))
            .items(&items)
            .default(0)
            .interact()?;

        let driver = if choice < remaining.len() {
            remaining.remove(choice).to_string()
        } else {
            String::new()
        };
        slots.push(GridSlot { position, driver });
    }

    Ok(slots)
}

fn medal_label(medal: &str) -> ColoredString {
    match medal {
        "gold" => medal.yellow().bold(),
        "silver" => medal.white().bold(),
        "bronze" => medal.red(),
        _ => medal.normal(),
    }
}

fn format_delta(delta: i32) -> ColoredString {
    match delta {
        d if d > 0 => format!("+{}", d).green(),
        d if d < 0 => d.to_string().red(),
        _ => "=".dimmed(),
    }
}

/// Truncate name to fit display width
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len {
        name.to_string()
    } else {
        chars[..max_len - 1].iter().collect::<String>() + "…"
    }
}
