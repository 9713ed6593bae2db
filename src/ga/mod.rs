//! GA-based broadcast schedule optimization.
//!
//! A schedule is encoded directly as its slot-ordered program list. Fitness
//! is the summed rating of each program in its slot (maximized).
//!
//! # Submodules
//!
//! - [`operators`]: Invariant-tagged crossover and mutation sets
//!
//! # Invariants
//!
//! A run uses exactly one [`ScheduleInvariant`](crate::models::ScheduleInvariant).
//! [`EvolutionLoop`] is generic over an [`OperatorSet`], whose associated
//! invariant must match the configuration.
//!
//! # Reference
//! Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"

mod config;
mod fitness;
pub mod operators;
mod population;
mod runner;
mod selection;

pub use config::GaConfig;
pub use fitness::FitnessEvaluator;
pub use operators::{
    OperatorSet, PermutationOperators, ResamplingOperators, order_preserving_crossover,
    replace_mutation, single_point_crossover, swap_mutation,
};
pub use population::PopulationInitializer;
pub use runner::{EvolutionLoop, GaResult, GaRunner, GenerationStats, Phase, RunOptions};
pub use selection::{RankedPopulation, SelectionPolicy};
