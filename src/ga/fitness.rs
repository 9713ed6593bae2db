//! Schedule fitness: total expected rating across all slots.

use crate::error::{Result, ScheduleError};
use crate::models::{RatingsTable, Schedule};

/// Scores schedules against a ratings table.
///
/// Higher fitness = better schedule (maximization convention).
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    table: &'a RatingsTable,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(table: &'a RatingsTable) -> Self {
        Self { table }
    }

    /// The table this evaluator reads from.
    pub fn table(&self) -> &'a RatingsTable {
        self.table
    }

    /// Sum over slots `i` of `rating(schedule[i], i)`.
    ///
    /// # Errors
    /// - `UnknownProgram` if a slot holds a program outside the catalog.
    /// - `InvalidInput` if the schedule has more slots than the table.
    pub fn evaluate(&self, schedule: &Schedule) -> Result<f64> {
        if schedule.len() > self.table.slot_count() {
            return Err(ScheduleError::InvalidInput(format!(
                "Schedule fills {} slot(s) but ratings cover {}",
                schedule.len(),
                self.table.slot_count()
            )));
        }

        schedule.iter().try_fold(0.0, |total, (slot, program)| {
            let rating = self
                .table
                .rating(program, slot)
                .ok_or_else(|| ScheduleError::UnknownProgram {
                    program: program.to_string(),
                })?;
            Ok(total + rating)
        })
    }
}
