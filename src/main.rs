//! Broadcast schedule optimizer CLI.
//!
//! Loads a ratings CSV, runs the genetic algorithm, and prints the best
//! lineup for the broadcast day.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info};
use serde::Serialize;

use u_broadcast::data::RatingsLoader;
use u_broadcast::error::Result;
use u_broadcast::format::FormattedSchedule;
use u_broadcast::ga::{GaConfig, GaResult, GaRunner, RunOptions};
use u_broadcast::models::{Schedule, ScheduleInvariant};
use u_broadcast::settings::Settings;

#[derive(Parser)]
#[command(name = "u-broadcast")]
#[command(about = "Optimize a day of TV programming with a genetic algorithm")]
struct Cli {
    /// Ratings CSV: header row, then `program,rating_1,...,rating_n`
    ratings: PathBuf,

    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of generations
    #[arg(short, long)]
    generations: Option<usize>,

    /// Schedules per generation
    #[arg(short, long)]
    population: Option<usize>,

    /// Crossover rate in [0, 1]
    #[arg(long)]
    crossover_rate: Option<f64>,

    /// Mutation rate in [0, 1]
    #[arg(long)]
    mutation_rate: Option<f64>,

    /// Elite schedules carried into each generation
    #[arg(long)]
    elitism: Option<usize>,

    /// Draw parents from the N best schedules only
    #[arg(long)]
    selection_pool: Option<usize>,

    /// Schedule invariant: permutation, allow_duplicates
    #[arg(long)]
    invariant: Option<ScheduleInvariant>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Starting lineup (comma-separated programs, one per slot)
    #[arg(long, value_delimiter = ',')]
    seed_schedule: Option<Vec<String>>,

    /// First broadcast hour
    #[arg(long)]
    first_hour: Option<u32>,

    /// Last broadcast hour
    #[arg(long)]
    last_hour: Option<u32>,

    /// Abort if the run takes longer than this many seconds
    #[arg(long)]
    time_limit: Option<u64>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Save the resolved settings to this TOML file before running
    #[arg(long)]
    write_config: Option<PathBuf>,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let ga = &mut settings.ga;
        if let Some(v) = self.generations {
            ga.generation_count = v;
        }
        if let Some(v) = self.population {
            ga.population_size = v;
        }
        if let Some(v) = self.crossover_rate {
            ga.crossover_rate = v;
        }
        if let Some(v) = self.mutation_rate {
            ga.mutation_rate = v;
        }
        if let Some(v) = self.elitism {
            ga.elitism_size = v;
        }
        if self.selection_pool.is_some() {
            ga.selection_pool_size = self.selection_pool;
        }
        if let Some(v) = self.invariant {
            ga.invariant = v;
        }
        if self.seed.is_some() {
            ga.seed = self.seed;
        }
        if let Some(v) = self.first_hour {
            settings.slots.first_hour = v;
        }
        if let Some(v) = self.last_hour {
            settings.slots.last_hour = v;
        }
        settings.validate()?;
        Ok(settings)
    }

    fn run_options(&self) -> Result<RunOptions> {
        let options = RunOptions {
            seed_schedule: self.seed_schedule.clone().map(Schedule::new),
            deadline: None,
        };
        match self.time_limit {
            Some(secs) => options.with_time_limit(Duration::from_secs(secs)),
            None => Ok(options),
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    config: &'a GaConfig,
    result: &'a GaResult,
    upper_bound: f64,
    schedule: &'a FormattedSchedule,
}

fn run(cli: Cli) -> Result<()> {
    let settings = cli.settings()?;
    if let Some(path) = &cli.write_config {
        settings.save(path)?;
        info!("Wrote settings to {}", path.display());
    }
    let formatter = settings.slots.formatter()?;
    let table = RatingsLoader::load_with_slots(&cli.ratings, formatter.slot_count())?;
    let upper_bound: f64 = table.slot_leaders().iter().map(|(_, r)| r).sum();

    let options = cli.run_options()?;
    let mut rng = GaRunner::rng_for(&settings.ga);
    let result = GaRunner::run_with_rng(&table, &settings.ga, options, &mut rng)?;
    let schedule = formatter.format(&result.best, &table, &mut rng)?;

    if cli.json {
        let report = Report {
            config: &settings.ga,
            result: &result,
            upper_bound,
            schedule: &schedule,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Crossover Rate: {}, Mutation Rate: {}",
            settings.ga.crossover_rate, settings.ga.mutation_rate
        );
        println!();
        println!("{schedule}");
        println!("Upper Bound: {upper_bound:.2}");
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
