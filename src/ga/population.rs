//! Initial population construction.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::error::{Result, ScheduleError};
use crate::models::{RatingsTable, Schedule, ScheduleInvariant};
use crate::validation::validate_schedule;

/// Builds starting populations over a ratings table's catalog.
///
/// Under [`ScheduleInvariant::Permutation`] each random member draws
/// `slot_count` distinct programs in random order; under
/// [`ScheduleInvariant::AllowDuplicates`] each slot is sampled with
/// replacement. A seed schedule, when set, is member 0 unmodified.
#[derive(Debug, Clone)]
pub struct PopulationInitializer<'a> {
    table: &'a RatingsTable,
    invariant: ScheduleInvariant,
    seed: Option<Schedule>,
}

impl<'a> PopulationInitializer<'a> {
    /// Creates an initializer for `table` under `invariant`.
    ///
    /// # Errors
    /// `InvalidInput` if the catalog is empty, or if the invariant is
    /// `Permutation` and the catalog has fewer programs than slots.
    pub fn new(table: &'a RatingsTable, invariant: ScheduleInvariant) -> Result<Self> {
        if table.is_empty() || table.slot_count() == 0 {
            return Err(ScheduleError::InvalidInput(
                "Population needs a non-empty catalog and at least one slot".into(),
            ));
        }
        if invariant == ScheduleInvariant::Permutation && table.len() < table.slot_count() {
            return Err(ScheduleError::InvalidInput(format!(
                "Permutation schedules need at least {} programs, catalog has {}",
                table.slot_count(),
                table.len()
            )));
        }
        Ok(Self {
            table,
            invariant,
            seed: None,
        })
    }

    /// Sets the seed schedule placed unmodified at index 0.
    ///
    /// # Errors
    /// `InvalidInput` if the seed has the wrong length, references unknown
    /// programs, or repeats a program under `Permutation`.
    pub fn with_seed(mut self, seed: Schedule) -> Result<Self> {
        validate_schedule(&seed, self.table, self.invariant).map_err(|errors| {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            ScheduleError::InvalidInput(format!("Seed schedule: {}", messages.join("; ")))
        })?;
        self.seed = Some(seed);
        Ok(self)
    }

    /// The invariant every generated member satisfies.
    pub fn invariant(&self) -> ScheduleInvariant {
        self.invariant
    }

    /// The seed schedule, if set.
    pub fn seed(&self) -> Option<&Schedule> {
        self.seed.as_ref()
    }

    /// Produces `size` schedules.
    pub fn initialize<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<Schedule> {
        let mut population = Vec::with_capacity(size);
        if let Some(seed) = &self.seed {
            if size > 0 {
                population.push(seed.clone());
            }
        }
        while population.len() < size {
            population.push(self.random_schedule(rng));
        }
        population
    }

    /// One independent random schedule satisfying the invariant.
    pub fn random_schedule<R: Rng>(&self, rng: &mut R) -> Schedule {
        let catalog = self.table.programs();
        let slots = self.table.slot_count();
        let programs = match self.invariant {
            ScheduleInvariant::Permutation => {
                let mut picked: Vec<String> =
                    catalog.choose_multiple(rng, slots).cloned().collect();
                picked.shuffle(rng);
                picked
            }
            ScheduleInvariant::AllowDuplicates => (0..slots)
                .map(|_| catalog[rng.random_range(0..catalog.len())].clone())
                .collect(),
        };
        Schedule::new(programs)
    }
}
