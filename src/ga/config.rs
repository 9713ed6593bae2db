//! GA run parameters.

use serde::{Deserialize, Serialize};

use super::selection::SelectionPolicy;
use crate::error::{Result, ScheduleError};
use crate::models::ScheduleInvariant;

/// Parameters of one optimization run.
///
/// Defaults mirror the interactive tool: 100 generations of 50 schedules,
/// crossover 0.8, mutation 0.02, two elites, parents drawn from the whole
/// population, permutation schedules.
///
/// # Example
///
/// ```
/// use u_broadcast::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_generation_count(30)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Generations to run. No early stopping.
    pub generation_count: usize,
    /// Schedules per generation.
    pub population_size: usize,
    /// Probability that a parent pair is recombined rather than cloned.
    pub crossover_rate: f64,
    /// Probability, per child, of one mutation.
    pub mutation_rate: f64,
    /// Best schedules copied unchanged into each next generation.
    pub elitism_size: usize,
    /// Restrict parents to the `k` best schedules. `None` = whole population.
    pub selection_pool_size: Option<usize>,
    /// Uniqueness constraint, which fixes the operator set.
    pub invariant: ScheduleInvariant,
    /// Random seed. `None` = seeded from the OS.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            generation_count: 100,
            population_size: 50,
            crossover_rate: 0.8,
            mutation_rate: 0.02,
            elitism_size: 2,
            selection_pool_size: None,
            invariant: ScheduleInvariant::Permutation,
            seed: None,
        }
    }
}

impl GaConfig {
    pub fn with_generation_count(mut self, generations: usize) -> Self {
        self.generation_count = generations;
        self
    }

    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_elitism_size(mut self, size: usize) -> Self {
        self.elitism_size = size;
        self
    }

    pub fn with_selection_pool_size(mut self, pool: Option<usize>) -> Self {
        self.selection_pool_size = pool;
        self
    }

    pub fn with_invariant(mut self, invariant: ScheduleInvariant) -> Self {
        self.invariant = invariant;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parent selection policy implied by `selection_pool_size`.
    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy::from_pool_size(self.selection_pool_size)
    }

    /// Checks parameter ranges and combinations.
    ///
    /// # Errors
    /// `Configuration` if the generation count is zero, the population
    /// cannot hold the elites plus one bred pair, a rate is outside
    /// `[0, 1]`, or the selection pool is empty or larger than the population.
    pub fn validate(&self) -> Result<()> {
        if self.generation_count == 0 {
            return Err(ScheduleError::Configuration(
                "Generation count must be at least 1".into(),
            ));
        }
        if self.population_size < self.elitism_size.saturating_add(2) {
            return Err(ScheduleError::Configuration(format!(
                "Population size {} must be at least elitism size {} + 2",
                self.population_size, self.elitism_size
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ScheduleError::Configuration(format!(
                "Crossover rate {} must be between 0 and 1",
                self.crossover_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ScheduleError::Configuration(format!(
                "Mutation rate {} must be between 0 and 1",
                self.mutation_rate
            )));
        }
        if let Some(pool) = self.selection_pool_size {
            if pool == 0 || pool > self.population_size {
                return Err(ScheduleError::Configuration(format!(
                    "Selection pool size {pool} must be between 1 and population size {}",
                    self.population_size
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let c = GaConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.generation_count, 100);
        assert_eq!(c.population_size, 50);
        assert_eq!(c.elitism_size, 2);
        assert_eq!(c.selection_policy(), SelectionPolicy::Uniform);
    }

    #[test]
    fn test_population_must_fit_elites_and_a_pair() {
        let c = GaConfig::default().with_elitism_size(4).with_population_size(5);
        assert!(matches!(c.validate(), Err(ScheduleError::Configuration(_))));

        let c = GaConfig::default().with_elitism_size(4).with_population_size(6);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_rates_out_of_range() {
        assert!(GaConfig::default().with_crossover_rate(1.2).validate().is_err());
        assert!(GaConfig::default().with_mutation_rate(-0.1).validate().is_err());
        assert!(GaConfig::default().with_mutation_rate(f64::NAN).validate().is_err());
        assert!(GaConfig::default()
            .with_crossover_rate(0.0)
            .with_mutation_rate(1.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_zero_generations() {
        let c = GaConfig::default().with_generation_count(0);
        assert!(matches!(c.validate(), Err(ScheduleError::Configuration(_))));
    }

    #[test]
    fn test_selection_pool_bounds() {
        let base = GaConfig::default().with_population_size(10);
        assert!(base.clone().with_selection_pool_size(Some(0)).validate().is_err());
        assert!(base.clone().with_selection_pool_size(Some(11)).validate().is_err());

        let c = base.with_selection_pool_size(Some(10));
        assert!(c.validate().is_ok());
        assert_eq!(c.selection_policy(), SelectionPolicy::TopK(10));
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let c: GaConfig =
            serde_json::from_str(r#"{"mutation_rate": 0.05, "invariant": "allow_duplicates"}"#)
                .unwrap();
        assert_eq!(c.mutation_rate, 0.05);
        assert_eq!(c.invariant, ScheduleInvariant::AllowDuplicates);
        assert_eq!(c.population_size, 50);
    }
}
