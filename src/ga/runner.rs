//! Generational evolution loop.
//!
//! # Algorithm
//!
//! 1. Build the initial population (seed schedule first, if any).
//! 2. For each of `generation_count` generations:
//!    - **Ranking**: score and sort the population best-first; copy the
//!      top `elitism_size` schedules into a fresh buffer.
//!    - **Breeding**: draw parent pairs, recombine with probability
//!      `crossover_rate` (else clone), mutate each child with probability
//!      `mutation_rate`, append until the buffer holds `population_size`.
//! 3. Re-score the final population and return its best schedule.
//!
//! Elitism makes the best fitness non-decreasing across generations.

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::config::GaConfig;
use super::fitness::FitnessEvaluator;
use super::operators::{OperatorSet, PermutationOperators, ResamplingOperators};
use super::population::PopulationInitializer;
use super::selection::{RankedPopulation, SelectionPolicy};
use crate::error::{Result, ScheduleError};
use crate::models::{RatingsTable, Schedule, ScheduleInvariant};

/// Lifecycle phase of an [`EvolutionLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Initializing,
    Ranking,
    Breeding,
    Terminated,
}

/// Fitness summary of one generation, taken at ranking time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Zero-based generation index.
    pub generation: usize,
    /// Best fitness in the generation.
    pub best_fitness: f64,
    /// Mean fitness across the generation.
    pub mean_fitness: f64,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaResult {
    /// Highest-fitness schedule in the final population.
    pub best: Schedule,
    /// Fitness of `best`, recomputed after the last breeding step.
    pub best_fitness: f64,
    /// Generations completed.
    pub generations: usize,
    /// Per-generation statistics, oldest first.
    pub history: Vec<GenerationStats>,
}

/// Genetic algorithm over one ratings table and one operator set.
///
/// The operator set type fixes the schedule invariant for the whole run;
/// construction fails if the configuration asks for the other one.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_broadcast::ga::{EvolutionLoop, GaConfig, PermutationOperators};
/// use u_broadcast::models::RatingsTable;
///
/// let table = RatingsTable::from_rows(
///     2,
///     vec![("News", vec![0.9, 0.1]), ("Drama", vec![0.2, 0.8])],
/// )
/// .unwrap();
/// let config = GaConfig::default()
///     .with_population_size(6)
///     .with_generation_count(5)
///     .with_mutation_rate(1.0);
///
/// let mut ga = EvolutionLoop::<PermutationOperators>::new(&table, config).unwrap();
/// let result = ga.run(&mut SmallRng::seed_from_u64(1)).unwrap();
/// assert_eq!(result.best.programs, vec!["News", "Drama"]);
/// ```
#[derive(Debug)]
pub struct EvolutionLoop<'a, O: OperatorSet> {
    config: GaConfig,
    operators: O,
    evaluator: FitnessEvaluator<'a>,
    initializer: PopulationInitializer<'a>,
    selection: SelectionPolicy,
    deadline: Option<Instant>,
    phase: Phase,
}

impl<'a, O: OperatorSet + Default> EvolutionLoop<'a, O> {
    /// Creates a loop with the operator set's default instance.
    ///
    /// # Errors
    /// See [`EvolutionLoop::with_operators`].
    pub fn new(table: &'a RatingsTable, config: GaConfig) -> Result<Self> {
        Self::with_operators(table, config, O::default())
    }
}

impl<'a, O: OperatorSet> EvolutionLoop<'a, O> {
    /// Creates a loop, validating everything before any generation runs.
    ///
    /// # Errors
    /// - `Configuration` if `config` is invalid or names a different
    ///   invariant than `O` preserves.
    /// - `InvalidInput` if the table cannot support the invariant
    ///   (empty catalog, too few programs for a permutation, or fewer
    ///   than two slots with permutation crossover enabled).
    pub fn with_operators(table: &'a RatingsTable, config: GaConfig, operators: O) -> Result<Self> {
        config.validate()?;
        if config.invariant != O::INVARIANT {
            return Err(ScheduleError::Configuration(format!(
                "Configured invariant '{}' does not match operator set '{}'",
                config.invariant,
                O::INVARIANT
            )));
        }
        if O::INVARIANT == ScheduleInvariant::Permutation
            && table.slot_count() < 2
            && config.crossover_rate > 0.0
        {
            return Err(ScheduleError::InvalidInput(format!(
                "Permutation crossover needs at least 2 slots, table has {}",
                table.slot_count()
            )));
        }
        let initializer = PopulationInitializer::new(table, O::INVARIANT)?;

        Ok(Self {
            selection: config.selection_policy(),
            config,
            operators,
            evaluator: FitnessEvaluator::new(table),
            initializer,
            deadline: None,
            phase: Phase::Initializing,
        })
    }

    /// Places `seed` unmodified in the initial population.
    ///
    /// # Errors
    /// `InvalidInput` if the seed does not fit the table or invariant.
    pub fn with_seed_schedule(mut self, seed: Schedule) -> Result<Self> {
        self.initializer = self.initializer.with_seed(seed)?;
        Ok(self)
    }

    /// Fails the run if `deadline` passes. Checked between generations only.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Runs all generations and returns the best schedule found.
    ///
    /// # Errors
    /// - `UnknownProgram` / `InvariantViolation` if an operator produced an
    ///   invalid schedule.
    /// - `DeadlineExceeded` if the deadline passed between generations.
    pub fn run<R: Rng>(&mut self, rng: &mut R) -> Result<GaResult> {
        self.enter(Phase::Initializing);
        let generations = self.config.generation_count;
        info!(
            "Starting GA: {} generations x {} schedules, invariant={}, crossover={}, mutation={}, elitism={}",
            generations,
            self.config.population_size,
            O::INVARIANT,
            self.config.crossover_rate,
            self.config.mutation_rate,
            self.config.elitism_size
        );

        let mut population = self
            .initializer
            .initialize(self.config.population_size, rng);
        let mut history = Vec::with_capacity(generations);

        for generation in 0..generations {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    return Err(ScheduleError::DeadlineExceeded {
                        completed: generation,
                    });
                }
            }

            self.enter(Phase::Ranking);
            let ranked = RankedPopulation::rank(population, &self.evaluator)?;
            let stats = GenerationStats {
                generation,
                best_fitness: ranked.best().map(|(_, f)| f).unwrap_or(0.0),
                mean_fitness: ranked.mean_fitness(),
            };
            debug!(
                "Generation {}: best={:.4}, mean={:.4}",
                stats.generation, stats.best_fitness, stats.mean_fitness
            );
            history.push(stats);

            self.enter(Phase::Breeding);
            population = self.breed(&ranked, rng)?;
        }

        self.enter(Phase::Terminated);
        let ranked = RankedPopulation::rank(population, &self.evaluator)?;
        let (best, best_fitness) = ranked.into_best().ok_or_else(|| {
            ScheduleError::InvariantViolation("Final population is empty".into())
        })?;
        info!("GA finished: best fitness {best_fitness:.4}");

        Ok(GaResult {
            best,
            best_fitness,
            generations,
            history,
        })
    }

    /// Builds the next generation into a buffer separate from `ranked`.
    fn breed<R: Rng>(&self, ranked: &RankedPopulation, rng: &mut R) -> Result<Vec<Schedule>> {
        let size = self.config.population_size;
        let catalog = self.evaluator.table().programs();

        let mut next = Vec::with_capacity(size);
        next.extend(ranked.elites(self.config.elitism_size).cloned());

        while next.len() < size {
            let parent1 = self.select(ranked, rng)?;
            let parent2 = self.select(ranked, rng)?;

            let (mut child1, mut child2) = if rng.random_bool(self.config.crossover_rate) {
                self.operators.crossover(parent1, parent2, rng)?
            } else {
                (parent1.clone(), parent2.clone())
            };

            if rng.random_bool(self.config.mutation_rate) {
                self.operators.mutate(&mut child1, catalog, rng);
            }
            if rng.random_bool(self.config.mutation_rate) {
                self.operators.mutate(&mut child2, catalog, rng);
            }

            next.push(child1);
            if next.len() < size {
                next.push(child2);
            }
        }
        Ok(next)
    }

    fn select<'r, R: Rng>(&self, ranked: &'r RankedPopulation, rng: &mut R) -> Result<&'r Schedule> {
        self.selection.select(ranked, rng).ok_or_else(|| {
            ScheduleError::InvariantViolation("Selection pool is empty".into())
        })
    }

    fn enter(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!("GA phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }
}

/// Optional inputs of a [`GaRunner`] run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Schedule placed unmodified in the initial population.
    pub seed_schedule: Option<Schedule>,
    /// Host deadline, checked between generations.
    pub deadline: Option<Instant>,
}

impl RunOptions {
    /// Sets the deadline to `limit` from now.
    ///
    /// # Errors
    /// `Configuration` if `limit` overflows the platform clock.
    pub fn with_time_limit(mut self, limit: Duration) -> Result<Self> {
        let deadline = Instant::now().checked_add(limit).ok_or_else(|| {
            ScheduleError::Configuration(format!(
                "Time limit of {}s is out of range",
                limit.as_secs()
            ))
        })?;
        self.deadline = Some(deadline);
        Ok(self)
    }
}

/// Runs the GA with the operator set named by `config.invariant`.
pub struct GaRunner;

impl GaRunner {
    /// Runs with the random source seeded from `config.seed` (or the OS).
    pub fn run(table: &RatingsTable, config: &GaConfig) -> Result<GaResult> {
        let mut rng = Self::rng_for(config);
        Self::run_with_rng(table, config, RunOptions::default(), &mut rng)
    }

    /// Random source for `config`: seeded when `config.seed` is set.
    pub fn rng_for(config: &GaConfig) -> StdRng {
        match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Runs with an explicit random source.
    pub fn run_with_rng<R: Rng>(
        table: &RatingsTable,
        config: &GaConfig,
        options: RunOptions,
        rng: &mut R,
    ) -> Result<GaResult> {
        match config.invariant {
            ScheduleInvariant::Permutation => {
                let ga = EvolutionLoop::<PermutationOperators>::new(table, config.clone())?;
                Self::drive(ga, options, rng)
            }
            ScheduleInvariant::AllowDuplicates => {
                let ga = EvolutionLoop::<ResamplingOperators>::new(table, config.clone())?;
                Self::drive(ga, options, rng)
            }
        }
    }

    fn drive<O: OperatorSet, R: Rng>(
        ga: EvolutionLoop<'_, O>,
        options: RunOptions,
        rng: &mut R,
    ) -> Result<GaResult> {
        let mut ga = match options.seed_schedule {
            Some(seed) => ga.with_seed_schedule(seed)?,
            None => ga,
        };
        if let Some(deadline) = options.deadline {
            ga = ga.with_deadline(deadline);
        }
        ga.run(rng)
    }
}
