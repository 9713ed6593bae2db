//! Ratings table model.
//!
//! Maps each program to its expected audience rating in every time slot.
//! The catalog keeps input order so that seeded runs are reproducible.

use std::collections::HashMap;

use crate::error::{Result, ScheduleError};
use crate::validation::validate_ratings;

/// Immutable program → per-slot rating lookup.
///
/// # Invariants
/// - Every program has exactly `slot_count` ratings.
/// - Ratings are finite and non-negative.
/// - Program ids are unique.
#[derive(Debug, Clone)]
pub struct RatingsTable {
    slot_count: usize,
    programs: Vec<String>,
    ratings: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
}

impl RatingsTable {
    /// Builds a table from `(program, ratings)` rows.
    ///
    /// All rows are checked before failing, so the error lists every
    /// malformed row at once.
    ///
    /// # Errors
    /// `InvalidInput` if `slot_count` is zero, the catalog is empty, a row's
    /// length differs from `slot_count`, a rating is negative or not finite,
    /// or a program id repeats.
    pub fn from_rows<I, S>(slot_count: usize, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let rows: Vec<(String, Vec<f64>)> =
            rows.into_iter().map(|(p, r)| (p.into(), r)).collect();

        validate_ratings(&rows, slot_count).map_err(|errors| {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            ScheduleError::InvalidInput(messages.join("; "))
        })?;

        let mut programs = Vec::with_capacity(rows.len());
        let mut ratings = Vec::with_capacity(rows.len());
        let mut index = HashMap::with_capacity(rows.len());
        for (i, (program, row)) in rows.into_iter().enumerate() {
            index.insert(program.clone(), i);
            programs.push(program);
            ratings.push(row);
        }

        Ok(Self {
            slot_count,
            programs,
            ratings,
            index,
        })
    }

    /// Number of time slots every program is rated for.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Number of programs in the catalog.
    #[inline]
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// The program catalog, in input order.
    pub fn programs(&self) -> &[String] {
        &self.programs
    }

    /// Whether `program` is in the catalog.
    pub fn contains(&self, program: &str) -> bool {
        self.index.contains_key(program)
    }

    /// All slot ratings for `program`.
    pub fn ratings(&self, program: &str) -> Option<&[f64]> {
        self.index
            .get(program)
            .map(|&i| self.ratings[i].as_slice())
    }

    /// Rating of `program` in `slot`.
    pub fn rating(&self, program: &str, slot: usize) -> Option<f64> {
        self.ratings(program).and_then(|r| r.get(slot).copied())
    }

    /// Iterates `(program, ratings)` in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.programs
            .iter()
            .zip(&self.ratings)
            .map(|(p, r)| (p.as_str(), r.as_slice()))
    }

    /// Highest-rated program for each slot, ignoring uniqueness.
    ///
    /// The sum of these ratings is an upper bound on any schedule's fitness.
    pub fn slot_leaders(&self) -> Vec<(&str, f64)> {
        (0..self.slot_count)
            .filter_map(|slot| {
                self.iter()
                    .map(|(p, r)| (p, r[slot]))
                    .max_by(|a, b| a.1.total_cmp(&b.1))
            })
            .collect()
    }
}
