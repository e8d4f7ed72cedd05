use crate::data::{Score, Shift, WeightPreset, WeightRule};
use crate::weights;
use itertools::Itertools;
use log::{trace, warn};
use std::cmp::Reverse;

/// A concrete shift selected for scheduling, with its resolved weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub shift: Shift,
    pub weight: Score,
}

/// Turns the preset's rules into concrete shifts, heaviest first.
///
/// Each rule claims the earliest unclaimed shift in `universe` that falls on
/// its day and kind. Rules that find nothing are skipped.
pub fn match_candidates(preset: &WeightPreset, universe: &[Shift]) -> Vec<Candidate> {
    let rules: Vec<&WeightRule> = preset
        .rules
        .iter()
        .sorted_by_key(|rule| Reverse(rule.weight))
        .collect();

    // dedupe by (date, kind); keep first occurrence
    let mut available: Vec<Shift> = universe.iter().copied().unique().collect();
    let mut candidates = Vec::with_capacity(rules.len().min(available.len()));

    for rule in rules {
        let position = available
            .iter()
            .position(|s| s.day_of_week() == rule.day && s.kind == rule.kind);

        let Some(position) = position else {
            warn!(
                "No matching shift found for rule {:?} {} (weight {})",
                rule.day, rule.kind, rule.weight
            );
            continue;
        };

        let shift = available.remove(position);
        let weight = weights::resolve(preset, rule.day, rule.kind);
        trace!("Rule {:?} {} matched {} at weight {}", rule.day, rule.kind, shift, weight);
        candidates.push(Candidate { shift, weight });
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DayOfWeek, ShiftKind};
    use chrono::NaiveDate;

    fn shift(d: u32, kind: ShiftKind) -> Shift {
        // June 2024: the 9th is a Sunday
        Shift::new(NaiveDate::from_ymd_opt(2024, 6, d).unwrap(), kind)
    }

    fn rule(day: DayOfWeek, kind: ShiftKind, weight: Score) -> WeightRule {
        WeightRule { day, kind, weight }
    }

    #[test]
    fn orders_by_descending_weight() {
        let preset = WeightPreset::new(
            "REGULAR",
            vec![
                rule(DayOfWeek::Sunday, ShiftKind::Day, 1),
                rule(DayOfWeek::Friday, ShiftKind::Night, 4),
                rule(DayOfWeek::Tuesday, ShiftKind::Day, 2),
            ],
        );
        let universe: Vec<Shift> = (9..=15)
            .flat_map(|d| ShiftKind::ALL.map(|k| shift(d, k)))
            .collect();

        let candidates = match_candidates(&preset, &universe);
        let shifts: Vec<Shift> = candidates.iter().map(|c| c.shift).collect();
        assert_eq!(
            shifts,
            vec![
                shift(14, ShiftKind::Night),
                shift(11, ShiftKind::Day),
                shift(9, ShiftKind::Day)
            ]
        );
        assert_eq!(candidates[0].weight, 4);
    }

    #[test]
    fn skips_rules_without_a_matching_shift() {
        let preset = WeightPreset::new(
            "REGULAR",
            vec![
                rule(DayOfWeek::Saturday, ShiftKind::Day, 7),
                rule(DayOfWeek::Monday, ShiftKind::Night, 2),
            ],
        );
        let universe = vec![shift(10, ShiftKind::Day), shift(10, ShiftKind::Night)];

        let candidates = match_candidates(&preset, &universe);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].shift, shift(10, ShiftKind::Night));
    }

    #[test]
    fn duplicate_shifts_are_scheduled_once() {
        let preset = WeightPreset::new(
            "REGULAR",
            vec![
                rule(DayOfWeek::Monday, ShiftKind::Day, 3),
                rule(DayOfWeek::Monday, ShiftKind::Day, 1),
            ],
        );
        let universe = vec![shift(10, ShiftKind::Day), shift(10, ShiftKind::Day)];

        let candidates = match_candidates(&preset, &universe);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].weight, 3);
    }

    #[test]
    fn repeated_rules_claim_successive_weeks() {
        let preset = WeightPreset::new(
            "REGULAR",
            vec![
                rule(DayOfWeek::Monday, ShiftKind::Day, 3),
                rule(DayOfWeek::Monday, ShiftKind::Day, 3),
            ],
        );
        let universe = vec![shift(10, ShiftKind::Day), shift(17, ShiftKind::Day)];

        let shifts: Vec<Shift> = match_candidates(&preset, &universe)
            .into_iter()
            .map(|c| c.shift)
            .collect();
        assert_eq!(shifts, vec![shift(10, ShiftKind::Day), shift(17, ShiftKind::Day)]);
    }
}
