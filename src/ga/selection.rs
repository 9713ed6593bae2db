//! Ranking and parent selection.
//!
//! Ranking consumes a generation and produces an ordered, read-only view.
//! Breeding reads from that view and writes into a separate buffer, so the
//! sort order can never be disturbed by later mutation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::fitness::FitnessEvaluator;
use crate::error::Result;
use crate::models::Schedule;

/// A generation sorted by descending fitness.
#[derive(Debug, Clone)]
pub struct RankedPopulation {
    members: Vec<(Schedule, f64)>,
}

impl RankedPopulation {
    /// Scores every schedule and sorts best-first.
    ///
    /// The sort is stable: ties keep their population order.
    ///
    /// # Errors
    /// Propagates lookup failures from the evaluator.
    pub fn rank(population: Vec<Schedule>, evaluator: &FitnessEvaluator<'_>) -> Result<Self> {
        let mut members = population
            .into_iter()
            .map(|s| -> Result<(Schedule, f64)> {
                let fitness = evaluator.evaluate(&s)?;
                Ok((s, fitness))
            })
            .collect::<Result<Vec<_>>>()?;
        members.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(Self { members })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member at `rank` (0 = best).
    pub fn get(&self, rank: usize) -> Option<(&Schedule, f64)> {
        self.members.get(rank).map(|(s, f)| (s, *f))
    }

    /// The highest-fitness member.
    pub fn best(&self) -> Option<(&Schedule, f64)> {
        self.get(0)
    }

    /// The top `count` schedules, best-first.
    pub fn elites(&self, count: usize) -> impl Iterator<Item = &Schedule> {
        self.members.iter().take(count).map(|(s, _)| s)
    }

    /// Fitness values, best-first.
    pub fn fitnesses(&self) -> impl Iterator<Item = f64> + '_ {
        self.members.iter().map(|(_, f)| *f)
    }

    /// Mean fitness, or `0.0` for an empty population.
    pub fn mean_fitness(&self) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        self.fitnesses().sum::<f64>() / self.members.len() as f64
    }

    /// Consumes the ranking, returning the best member.
    pub fn into_best(self) -> Option<(Schedule, f64)> {
        self.members.into_iter().next()
    }
}

/// How parents are drawn from a ranked generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Uniform over the whole population.
    #[default]
    Uniform,
    /// Uniform over the `k` best members.
    TopK(usize),
}

impl SelectionPolicy {
    /// Builds a policy from an optional pool size.
    pub fn from_pool_size(pool: Option<usize>) -> Self {
        match pool {
            Some(k) => Self::TopK(k),
            None => Self::Uniform,
        }
    }

    /// Number of members eligible as parents.
    pub fn pool_len(&self, population: usize) -> usize {
        match *self {
            Self::Uniform => population,
            Self::TopK(k) => k.min(population),
        }
    }

    /// Draws one parent. Returns `None` if the eligible pool is empty.
    pub fn select<'r, R: Rng>(
        &self,
        ranked: &'r RankedPopulation,
        rng: &mut R,
    ) -> Option<&'r Schedule> {
        let pool = self.pool_len(ranked.len());
        if pool == 0 {
            return None;
        }
        ranked.get(rng.random_range(0..pool)).map(|(s, _)| s)
    }
}
