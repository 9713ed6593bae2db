//! Schedule (candidate solution) model.
//!
//! A schedule is an ordered slot-to-program assignment: slot `i` airs
//! `programs[i]`. Fitness is never stored on the schedule; it is always
//! recomputed from the ratings table.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Uniqueness constraint a run enforces on every schedule.
///
/// Fixes which operator set is legal for the run; the two variants
/// never mix inside one population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleInvariant {
    /// Programs may repeat across slots.
    AllowDuplicates,
    /// Each program airs at most once.
    #[default]
    Permutation,
}

impl ScheduleInvariant {
    /// Stable name used in settings files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllowDuplicates => "allow_duplicates",
            Self::Permutation => "permutation",
        }
    }
}

impl fmt::Display for ScheduleInvariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleInvariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "allow_duplicates" | "duplicates" | "resampling" => Ok(Self::AllowDuplicates),
            "permutation" | "unique" => Ok(Self::Permutation),
            other => Err(format!(
                "unknown schedule invariant '{other}' (expected 'permutation' or 'allow_duplicates')"
            )),
        }
    }
}

/// An ordered assignment of programs to time slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Schedule {
    /// Program ids, one per slot index.
    pub programs: Vec<String>,
}

impl Schedule {
    /// Creates a schedule from program ids in slot order.
    pub fn new(programs: Vec<String>) -> Self {
        Self { programs }
    }

    /// Number of slots filled.
    #[inline]
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Program airing in `slot`, if the slot is filled.
    pub fn program_at(&self, slot: usize) -> Option<&str> {
        self.programs.get(slot).map(|s| s.as_str())
    }

    /// Whether `program` airs anywhere in the schedule.
    pub fn contains(&self, program: &str) -> bool {
        self.programs.iter().any(|p| p == program)
    }

    /// Iterates `(slot, program)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.programs.iter().enumerate().map(|(i, p)| (i, p.as_str()))
    }

    /// Programs that air more than once, in order of their second airing.
    pub fn duplicates(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.programs
            .iter()
            .filter(|p| !seen.insert(p.as_str()))
            .map(|p| p.as_str())
            .collect()
    }

    /// Whether the schedule satisfies `invariant`.
    pub fn satisfies(&self, invariant: ScheduleInvariant) -> bool {
        match invariant {
            ScheduleInvariant::AllowDuplicates => true,
            ScheduleInvariant::Permutation => self.duplicates().is_empty(),
        }
    }
}

impl From<Vec<String>> for Schedule {
    fn from(programs: Vec<String>) -> Self {
        Self::new(programs)
    }
}

impl<'a> FromIterator<&'a str> for Schedule {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(str::to_string).collect())
    }
}
