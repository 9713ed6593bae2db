//! Presentation of optimized schedules.
//!
//! Zips a schedule with slot labels (hours of the broadcast day) and renders
//! it as a text table or serializable rows.
//!
//! # Padding
//!
//! A schedule shorter than the label list is padded with programs sampled
//! with replacement from the catalog, and a warning is logged. The optimizer
//! never produces short schedules, so padding only ever applies to
//! externally supplied ones.

use std::fmt;

use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::models::{RatingsTable, Schedule};

/// One displayed slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Slot label, e.g. `"06:00"`.
    pub time_slot: String,
    /// Program airing in the slot.
    pub program: String,
    /// Program's rating in the slot.
    pub rating: f64,
}

/// A schedule ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedSchedule {
    pub rows: Vec<ScheduleRow>,
    /// Sum of row ratings.
    pub total_rating: f64,
    /// Trailing slots filled by padding.
    pub padded_slots: usize,
}

impl fmt::Display for FormattedSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SLOT_HEADER: &str = "Time Slot";
        const PROGRAM_HEADER: &str = "Program";

        let slot_width = self
            .rows
            .iter()
            .map(|r| r.time_slot.len())
            .chain([SLOT_HEADER.len()])
            .max()
            .unwrap_or(0);
        let program_width = self
            .rows
            .iter()
            .map(|r| r.program.len())
            .chain([PROGRAM_HEADER.len()])
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{SLOT_HEADER:<slot_width$} | {PROGRAM_HEADER:<program_width$} | Rating"
        )?;
        writeln!(
            f,
            "{}-+-{}-+-------",
            "-".repeat(slot_width),
            "-".repeat(program_width)
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<slot_width$} | {:<program_width$} | {:.2}",
                row.time_slot, row.program, row.rating
            )?;
        }
        write!(f, "Total Ratings: {:.2}", self.total_rating)
    }
}

/// Maps schedules onto slot labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleFormatter {
    labels: Vec<String>,
}

impl ScheduleFormatter {
    /// Creates a formatter with explicit slot labels.
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Hourly labels `HH:00` from `first_hour` through `last_hour` inclusive.
    ///
    /// # Errors
    /// `InvalidInput` if `first_hour > last_hour` or `last_hour > 23`.
    pub fn hourly(first_hour: u32, last_hour: u32) -> Result<Self> {
        if first_hour > last_hour || last_hour > 23 {
            return Err(ScheduleError::InvalidInput(format!(
                "Invalid broadcast hours {first_hour}..={last_hour}"
            )));
        }
        Ok(Self::new(
            (first_hour..=last_hour).map(|h| format!("{h:02}:00")).collect(),
        ))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of displayable slots.
    pub fn slot_count(&self) -> usize {
        self.labels.len()
    }

    /// Returns `schedule` stretched to the label count, and how many slots
    /// were padded.
    ///
    /// # Errors
    /// `InvalidInput` if the schedule is longer than the label list, or if
    /// padding is needed and the catalog is empty.
    pub fn align<R: Rng>(
        &self,
        schedule: &Schedule,
        catalog: &[String],
        rng: &mut R,
    ) -> Result<(Schedule, usize)> {
        let slots = self.labels.len();
        if schedule.len() > slots {
            return Err(ScheduleError::InvalidInput(format!(
                "Schedule fills {} slot(s) but only {slots} label(s) exist",
                schedule.len()
            )));
        }
        let missing = slots - schedule.len();
        if missing == 0 {
            return Ok((schedule.clone(), 0));
        }
        if catalog.is_empty() {
            return Err(ScheduleError::InvalidInput(
                "Cannot pad schedule from an empty catalog".into(),
            ));
        }

        warn!(
            "Schedule covers {} of {slots} slots; padding {missing} with random programs",
            schedule.len()
        );
        let mut programs = schedule.programs.clone();
        programs.extend((0..missing).map(|_| catalog[rng.random_range(0..catalog.len())].clone()));
        Ok((Schedule::new(programs), missing))
    }

    /// Aligns `schedule` to the labels and looks up each slot's rating.
    ///
    /// # Errors
    /// - `InvalidInput` if the labels disagree with the table's slot count,
    ///   or alignment fails.
    /// - `UnknownProgram` if a slot holds a program outside the table.
    pub fn format<R: Rng>(
        &self,
        schedule: &Schedule,
        table: &RatingsTable,
        rng: &mut R,
    ) -> Result<FormattedSchedule> {
        if self.labels.len() != table.slot_count() {
            return Err(ScheduleError::InvalidInput(format!(
                "{} slot label(s) for a table rated over {} slot(s)",
                self.labels.len(),
                table.slot_count()
            )));
        }
        let (aligned, padded_slots) = self.align(schedule, table.programs(), rng)?;

        let rows = self
            .labels
            .iter()
            .zip(aligned.iter())
            .map(|(label, (slot, program))| -> Result<ScheduleRow> {
                let rating = table.rating(program, slot).ok_or_else(|| {
                    ScheduleError::UnknownProgram {
                        program: program.to_string(),
                    }
                })?;
                Ok(ScheduleRow {
                    time_slot: label.clone(),
                    program: program.to_string(),
                    rating,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let total_rating = rows.iter().map(|r| r.rating).sum::<f64>();

        Ok(FormattedSchedule {
            rows,
            total_rating,
            padded_slots,
        })
    }
}

impl Default for ScheduleFormatter {
    /// The broadcast day `06:00` through `23:00`.
    fn default() -> Self {
        Self::new((6..=23).map(|h| format!("{h:02}:00")).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn table() -> RatingsTable {
        RatingsTable::from_rows(
            3,
            vec![
                ("News", vec![0.5, 0.2, 0.1]),
                ("Drama", vec![0.1, 0.6, 0.3]),
                ("Sports", vec![0.2, 0.3, 0.9]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_hourly_labels() {
        let f = ScheduleFormatter::hourly(6, 8).unwrap();
        assert_eq!(f.labels(), &["06:00", "07:00", "08:00"]);
        assert!(ScheduleFormatter::hourly(9, 8).is_err());
        assert!(ScheduleFormatter::hourly(6, 24).is_err());

        let day = ScheduleFormatter::default();
        assert_eq!(day.slot_count(), 18);
        assert_eq!(day.labels()[0], "06:00");
        assert_eq!(day.labels()[17], "23:00");
    }

    #[test]
    fn test_format_full_schedule() {
        let t = table();
        let f = ScheduleFormatter::hourly(6, 8).unwrap();
        let s: Schedule = ["News", "Drama", "Sports"].into_iter().collect();
        let mut rng = SmallRng::seed_from_u64(42);

        let out = f.format(&s, &t, &mut rng).unwrap();
        assert_eq!(out.padded_slots, 0);
        assert_eq!(out.rows.len(), 3);
        assert_eq!(out.rows[1].time_slot, "07:00");
        assert_eq!(out.rows[1].program, "Drama");
        assert!((out.total_rating - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_schedule_is_padded() {
        let t = table();
        let f = ScheduleFormatter::hourly(6, 8).unwrap();
        let s: Schedule = ["Sports"].into_iter().collect();
        let mut rng = SmallRng::seed_from_u64(42);

        let out = f.format(&s, &t, &mut rng).unwrap();
        assert_eq!(out.padded_slots, 2);
        assert_eq!(out.rows.len(), 3);
        assert_eq!(out.rows[0].program, "Sports");
        assert!(out.rows.iter().all(|r| t.contains(&r.program)));
    }

    #[test]
    fn test_long_schedule_rejected() {
        let f = ScheduleFormatter::hourly(6, 7).unwrap();
        let s: Schedule = ["News", "Drama", "Sports"].into_iter().collect();
        let catalog = vec!["News".to_string()];
        let mut rng = SmallRng::seed_from_u64(42);
        assert!(matches!(
            f.align(&s, &catalog, &mut rng),
            Err(ScheduleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_label_count_must_match_table() {
        let t = table();
        let f = ScheduleFormatter::default();
        let s: Schedule = ["News", "Drama", "Sports"].into_iter().collect();
        let mut rng = SmallRng::seed_from_u64(42);
        assert!(matches!(
            f.format(&s, &t, &mut rng),
            Err(ScheduleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_render_table() {
        let t = table();
        let f = ScheduleFormatter::hourly(6, 8).unwrap();
        let s: Schedule = ["News", "Drama", "Sports"].into_iter().collect();
        let out = f.format(&s, &t, &mut SmallRng::seed_from_u64(1)).unwrap();

        let text = out.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Time Slot | Program | Rating");
        assert_eq!(lines[2], "06:00     | News    | 0.50");
        assert_eq!(lines.last(), Some(&"Total Ratings: 2.00"));
    }

    #[test]
    fn test_rows_serialize() {
        let t = table();
        let f = ScheduleFormatter::hourly(6, 8).unwrap();
        let s: Schedule = ["News", "Drama", "Sports"].into_iter().collect();
        let out = f.format(&s, &t, &mut SmallRng::seed_from_u64(1)).unwrap();

        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["rows"][2]["program"], "Sports");
        assert_eq!(json["padded_slots"], 0);
    }
}
