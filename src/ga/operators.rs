//! Genetic operators for broadcast schedules.
//!
//! Operators come in two sets, one per [`ScheduleInvariant`]. Each set
//! supplies both its crossover and its mutation, so a run can never pair a
//! duplicate-tolerant operator with a uniqueness-preserving one.
//!
//! | Set | Crossover | Mutation |
//! |-----|-----------|----------|
//! | [`ResamplingOperators`] | [`single_point_crossover`] | [`replace_mutation`] |
//! | [`PermutationOperators`] | [`order_preserving_crossover`] | [`swap_mutation`] |
//!
//! # Usage
//!
//! ```
//! use u_broadcast::ga::operators::{OperatorSet, PermutationOperators};
//! use u_broadcast::models::ScheduleInvariant;
//!
//! assert_eq!(PermutationOperators::INVARIANT, ScheduleInvariant::Permutation);
//! ```

use std::collections::HashSet;

use rand::Rng;
use rand::seq::index;

use crate::error::{Result, ScheduleError};
use crate::models::{Schedule, ScheduleInvariant};

/// A crossover/mutation pairing that preserves one schedule invariant.
pub trait OperatorSet {
    /// The invariant every schedule produced by this set satisfies,
    /// given parents that satisfy it.
    const INVARIANT: ScheduleInvariant;

    /// Combines two parents into two children.
    fn crossover<R: Rng>(
        &self,
        parent1: &Schedule,
        parent2: &Schedule,
        rng: &mut R,
    ) -> Result<(Schedule, Schedule)>;

    /// Perturbs a schedule in place, drawing new programs from `catalog`
    /// when the set allows it.
    fn mutate<R: Rng>(&self, schedule: &mut Schedule, catalog: &[String], rng: &mut R);
}

/// Duplicate-tolerant operators: single-point crossover, single-slot replace.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResamplingOperators;

impl OperatorSet for ResamplingOperators {
    const INVARIANT: ScheduleInvariant = ScheduleInvariant::AllowDuplicates;

    fn crossover<R: Rng>(
        &self,
        parent1: &Schedule,
        parent2: &Schedule,
        rng: &mut R,
    ) -> Result<(Schedule, Schedule)> {
        Ok(single_point_crossover(parent1, parent2, rng))
    }

    fn mutate<R: Rng>(&self, schedule: &mut Schedule, catalog: &[String], rng: &mut R) {
        replace_mutation(schedule, catalog, rng);
    }
}

/// Uniqueness-preserving operators: order-preserving crossover, swap.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermutationOperators;

impl OperatorSet for PermutationOperators {
    const INVARIANT: ScheduleInvariant = ScheduleInvariant::Permutation;

    fn crossover<R: Rng>(
        &self,
        parent1: &Schedule,
        parent2: &Schedule,
        rng: &mut R,
    ) -> Result<(Schedule, Schedule)> {
        order_preserving_crossover(parent1, parent2, rng)
    }

    fn mutate<R: Rng>(&self, schedule: &mut Schedule, _catalog: &[String], rng: &mut R) {
        swap_mutation(schedule, rng);
    }
}

// ======================== Crossover operators ========================

/// Single-point crossover without uniqueness enforcement.
///
/// Picks a cut `k` in `[1, S-1]`; child 1 takes parent 1's head and parent 2's
/// tail, child 2 the reverse. Parents shorter than two slots are cloned.
pub fn single_point_crossover<R: Rng>(
    parent1: &Schedule,
    parent2: &Schedule,
    rng: &mut R,
) -> (Schedule, Schedule) {
    let len = parent1.len().min(parent2.len());
    if len < 2 {
        return (parent1.clone(), parent2.clone());
    }
    let cut = rng.random_range(1..len);

    let splice = |head: &Schedule, tail: &Schedule| {
        let mut programs = Vec::with_capacity(tail.len());
        programs.extend_from_slice(&head.programs[..cut]);
        programs.extend_from_slice(&tail.programs[cut..]);
        Schedule::new(programs)
    };

    (splice(parent1, parent2), splice(parent2, parent1))
}

/// Single-point crossover that keeps every child free of repeats.
///
/// Picks a cut `k` in `[1, S-1]`; child 1 keeps parent 1's first `k` programs,
/// then backfills with parent 2's programs in parent 2's order, skipping any
/// already placed. Child 2 is built symmetrically.
///
/// # Errors
/// - `InvalidInput` if the parents differ in length or have fewer than two slots.
/// - `InvariantViolation` if the donor cannot backfill enough distinct
///   programs, which only happens when a parent already repeats a program.
pub fn order_preserving_crossover<R: Rng>(
    parent1: &Schedule,
    parent2: &Schedule,
    rng: &mut R,
) -> Result<(Schedule, Schedule)> {
    let len = parent1.len();
    if parent2.len() != len {
        return Err(ScheduleError::InvalidInput(format!(
            "Crossover parents differ in length ({len} vs {})",
            parent2.len()
        )));
    }
    if len < 2 {
        return Err(ScheduleError::InvalidInput(format!(
            "Order-preserving crossover needs at least 2 slots, got {len}"
        )));
    }
    let cut = rng.random_range(1..len);

    let child1 = backfill_child(parent1, parent2, cut)?;
    let child2 = backfill_child(parent2, parent1, cut)?;
    Ok((child1, child2))
}

fn backfill_child(head: &Schedule, donor: &Schedule, cut: usize) -> Result<Schedule> {
    let len = head.len();
    let kept = &head.programs[..cut];
    let placed: HashSet<&str> = kept.iter().map(|p| p.as_str()).collect();

    let mut programs = Vec::with_capacity(len);
    programs.extend_from_slice(kept);
    programs.extend(
        donor
            .programs
            .iter()
            .filter(|p| !placed.contains(p.as_str()))
            .take(len - cut)
            .cloned(),
    );

    if programs.len() < len {
        return Err(ScheduleError::InvariantViolation(format!(
            "Crossover backfill produced {} of {len} slots",
            programs.len()
        )));
    }
    Ok(Schedule::new(programs))
}

// ======================== Mutation operators ========================

/// Replace mutation: overwrites one random slot with a random catalog program.
///
/// May introduce repeats; only legal under [`ScheduleInvariant::AllowDuplicates`].
pub fn replace_mutation<R: Rng>(schedule: &mut Schedule, catalog: &[String], rng: &mut R) {
    if schedule.is_empty() || catalog.is_empty() {
        return;
    }
    let slot = rng.random_range(0..schedule.len());
    let pick = rng.random_range(0..catalog.len());
    schedule.programs[slot] = catalog[pick].clone();
}

/// Swap mutation: exchanges the programs in two distinct random slots.
pub fn swap_mutation<R: Rng>(schedule: &mut Schedule, rng: &mut R) {
    let len = schedule.len();
    if len < 2 {
        return;
    }
    let picked = index::sample(rng, len, 2);
    schedule.programs.swap(picked.index(0), picked.index(1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;

    fn catalog(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("P{i}")).collect()
    }

    fn random_permutation(programs: &[String], rng: &mut SmallRng) -> Schedule {
        let mut p = programs.to_vec();
        p.shuffle(rng);
        Schedule::new(p)
    }

    fn sorted(s: &Schedule) -> Vec<String> {
        let mut p = s.programs.clone();
        p.sort();
        p
    }

    #[test]
    fn test_order_preserving_keeps_permutation() {
        let mut rng = SmallRng::seed_from_u64(42);
        for &size in &[2usize, 3, 10] {
            let programs = catalog(size);
            let mut expected = programs.clone();
            expected.sort();

            for _ in 0..200 {
                let p1 = random_permutation(&programs, &mut rng);
                let p2 = random_permutation(&programs, &mut rng);
                let (c1, c2) = order_preserving_crossover(&p1, &p2, &mut rng).unwrap();

                assert_eq!(c1.len(), size);
                assert_eq!(c2.len(), size);
                assert_eq!(sorted(&c1), expected);
                assert_eq!(sorted(&c2), expected);
            }
        }
    }

    #[test]
    fn test_order_preserving_keeps_head_and_donor_order() {
        let mut rng = SmallRng::seed_from_u64(7);
        let p1: Schedule = ["A", "B", "C", "D"].into_iter().collect();
        let p2: Schedule = ["D", "C", "B", "A"].into_iter().collect();

        let (c1, _) = order_preserving_crossover(&p1, &p2, &mut rng).unwrap();
        let cut = (1..4)
            .find(|&k| c1.programs[..k] == p1.programs[..k] && c1.programs[k] != p1.programs[k])
            .unwrap_or(4);
        let tail: Vec<&String> = c1.programs[cut..].iter().collect();
        let donor_order: Vec<&String> = p2
            .programs
            .iter()
            .filter(|p| !p1.programs[..cut].contains(*p))
            .collect();
        assert_eq!(tail, donor_order);
    }

    #[test]
    fn test_order_preserving_partial_catalog() {
        // Schedules draw 3 of 6 programs; children must stay repeat-free.
        let mut rng = SmallRng::seed_from_u64(3);
        let programs = catalog(6);
        for _ in 0..200 {
            let mut a = programs.clone();
            a.shuffle(&mut rng);
            let mut b = programs.clone();
            b.shuffle(&mut rng);
            let p1 = Schedule::new(a[..3].to_vec());
            let p2 = Schedule::new(b[..3].to_vec());

            let (c1, c2) = order_preserving_crossover(&p1, &p2, &mut rng).unwrap();
            assert_eq!(c1.len(), 3);
            assert!(c1.satisfies(ScheduleInvariant::Permutation));
            assert!(c2.satisfies(ScheduleInvariant::Permutation));
        }
    }

    #[test]
    fn test_order_preserving_rejects_single_slot() {
        let mut rng = SmallRng::seed_from_u64(42);
        let p: Schedule = ["A"].into_iter().collect();
        assert!(matches!(
            order_preserving_crossover(&p, &p, &mut rng),
            Err(ScheduleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_order_preserving_shortfall_fails_fast() {
        let mut rng = SmallRng::seed_from_u64(42);
        let p1: Schedule = ["A", "B", "C"].into_iter().collect();
        let p2: Schedule = ["A", "A", "A"].into_iter().collect();
        assert!(matches!(
            order_preserving_crossover(&p1, &p2, &mut rng),
            Err(ScheduleError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_single_point_splices_at_cut() {
        let mut rng = SmallRng::seed_from_u64(42);
        let p1: Schedule = ["A", "A", "A", "A"].into_iter().collect();
        let p2: Schedule = ["B", "B", "B", "B"].into_iter().collect();

        for _ in 0..50 {
            let (c1, c2) = single_point_crossover(&p1, &p2, &mut rng);
            assert_eq!(c1.len(), 4);
            assert_eq!(c2.len(), 4);
            let cut = c1.programs.iter().take_while(|p| *p == "A").count();
            assert!((1..4).contains(&cut));
            assert!(c1.programs[cut..].iter().all(|p| p == "B"));
            assert!(c2.programs[..cut].iter().all(|p| p == "B"));
            assert!(c2.programs[cut..].iter().all(|p| p == "A"));
        }
    }

    #[test]
    fn test_single_point_short_parents_cloned() {
        let mut rng = SmallRng::seed_from_u64(42);
        let p1: Schedule = ["A"].into_iter().collect();
        let p2: Schedule = ["B"].into_iter().collect();
        let (c1, c2) = single_point_crossover(&p1, &p2, &mut rng);
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);
    }

    #[test]
    fn test_swap_preserves_permutation() {
        let mut rng = SmallRng::seed_from_u64(42);
        let programs = catalog(10);
        let mut s = random_permutation(&programs, &mut rng);
        let expected = sorted(&s);

        for _ in 0..500 {
            let before = s.clone();
            swap_mutation(&mut s, &mut rng);
            assert_eq!(sorted(&s), expected);
            // Two distinct slots always change.
            let changed = before
                .programs
                .iter()
                .zip(&s.programs)
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(changed, 2);
        }
    }

    #[test]
    fn test_swap_single_slot_noop() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut s: Schedule = ["A"].into_iter().collect();
        swap_mutation(&mut s, &mut rng);
        assert_eq!(s.programs, vec!["A".to_string()]);
    }

    #[test]
    fn test_replace_can_introduce_duplicates() {
        let mut rng = SmallRng::seed_from_u64(42);
        let programs = catalog(3);
        let original = Schedule::new(programs.clone());

        let mut saw_duplicate = false;
        for _ in 0..100 {
            let mut s = original.clone();
            replace_mutation(&mut s, &programs, &mut rng);
            assert_eq!(s.len(), 3);
            assert!(s.programs.iter().all(|p| programs.contains(p)));
            if !s.satisfies(ScheduleInvariant::Permutation) {
                saw_duplicate = true;
            }
        }
        assert!(saw_duplicate, "replace mutation should be able to repeat a program");
    }

    #[test]
    fn test_operator_sets_are_tagged() {
        assert_eq!(
            ResamplingOperators::INVARIANT,
            ScheduleInvariant::AllowDuplicates
        );
        assert_eq!(PermutationOperators::INVARIANT, ScheduleInvariant::Permutation);
    }

    #[test]
    fn test_operators_deterministic_for_seed() {
        let programs = catalog(8);
        let run = |seed: u64| {
            let mut rng = SmallRng::seed_from_u64(seed);
            let p1 = random_permutation(&programs, &mut rng);
            let p2 = random_permutation(&programs, &mut rng);
            let ops = PermutationOperators;
            let (mut c1, c2) = ops.crossover(&p1, &p2, &mut rng).unwrap();
            ops.mutate(&mut c1, &programs, &mut rng);
            (c1, c2)
        };
        assert_eq!(run(11), run(11));
    }
}
