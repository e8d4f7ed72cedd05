use crate::data::{Score, Shift, WorkerRecord};
use crate::matcher::Candidate;
use crate::weights::{self, MAX_MISSED_OFFICE_DAYS};
use chrono::Duration;

/// Minimum separation between two shifts held by the same worker.
pub const MIN_REST_HOURS: i64 = 48;

/// One tentative assignment, kept so it can be undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index into the roster's worker list.
    pub worker: usize,
    pub shift: Shift,
    pub weight: Score,
    /// Running score before this placement; scores saturate, so `pop` restores
    /// it rather than subtracting.
    prior: Score,
    missed: u32,
}

/// Mutable per-run state: running scores, held shifts and missed-day counters.
///
/// Placements form an undo log; `pop` restores exactly what `push` changed.
#[derive(Debug, Clone)]
pub struct Roster<'a> {
    workers: &'a [WorkerRecord],
    immediate: bool,
    scores: Vec<Score>,
    held: Vec<Vec<Shift>>,
    missed: Vec<u32>,
    placements: Vec<Placement>,
}

impl<'a> Roster<'a> {
    pub fn new(workers: &'a [WorkerRecord], immediate: bool) -> Self {
        Self {
            workers,
            immediate,
            scores: workers.iter().map(|w| w.worker.score).collect(),
            held: vec![Vec::new(); workers.len()],
            missed: vec![0; workers.len()],
            placements: Vec::new(),
        }
    }

    pub fn scores(&self) -> &[Score] {
        &self.scores
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Worker indices by ascending running score; ties keep input order.
    pub fn by_score(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.workers.len()).collect();
        order.sort_by_key(|&i| self.scores[i]);
        order
    }

    fn missed_for(&self, shift: &Shift) -> u32 {
        if self.immediate {
            weights::missed_office_days(shift.day_of_week(), shift.kind)
        } else {
            0
        }
    }

    fn rested(&self, worker: usize, shift: &Shift) -> bool {
        let min_rest = Duration::hours(MIN_REST_HOURS);
        let start = shift.starts_at();
        self.held[worker]
            .iter()
            .all(|held| (held.starts_at() - start).abs() >= min_rest)
    }

    /// Whether `worker` may take `shift` given everything placed so far.
    pub fn can_take(&self, worker: usize, shift: &Shift) -> bool {
        if self.workers[worker].is_blocked(shift) {
            return false;
        }
        if !self.rested(worker, shift) {
            return false;
        }
        if self.immediate && self.missed[worker] + self.missed_for(shift) > MAX_MISSED_OFFICE_DAYS {
            return false;
        }
        true
    }

    pub fn push(&mut self, worker: usize, candidate: &Candidate) {
        let missed = self.missed_for(&candidate.shift);
        let prior = self.scores[worker];
        self.scores[worker] = prior.saturating_add(candidate.weight);
        self.missed[worker] += missed;
        self.held[worker].push(candidate.shift);
        self.placements.push(Placement {
            worker,
            shift: candidate.shift,
            weight: candidate.weight,
            prior,
            missed,
        });
    }

    pub fn pop(&mut self) -> Option<Placement> {
        let placement = self.placements.pop()?;
        self.scores[placement.worker] = placement.prior;
        self.missed[placement.worker] -= placement.missed;
        self.held[placement.worker].pop();
        Some(placement)
    }

    /// Spread between the highest and lowest running score; lower is fairer.
    pub fn fairness(&self) -> Score {
        let max = self.scores.iter().max().copied().unwrap_or(0);
        let min = self.scores.iter().min().copied().unwrap_or(0);
        max.saturating_sub(min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Constraint, ConstraintKind, Role, ShiftKind, Worker};
    use chrono::NaiveDate;

    fn shift(d: u32, kind: ShiftKind) -> Shift {
        Shift::new(NaiveDate::from_ymd_opt(2024, 6, d).unwrap(), kind)
    }

    fn record(id: &str, score: Score) -> WorkerRecord {
        WorkerRecord::new(
            Worker {
                id: id.into(),
                score,
                role: Role::Worker,
            },
            vec![],
        )
    }

    fn candidate(shift: Shift, weight: Score) -> Candidate {
        Candidate { shift, weight }
    }

    #[test]
    fn push_then_pop_restores_state() {
        let workers = vec![record("a", 2), record("b", 0)];
        let mut roster = Roster::new(&workers, true);
        let before = roster.clone();

        // Monday night: two missed office days
        roster.push(0, &candidate(shift(10, ShiftKind::Night), 3));
        assert_eq!(roster.scores(), &[5, 0]);
        assert_eq!(roster.fairness(), 5);

        roster.pop();
        assert_eq!(roster.scores(), before.scores());
        assert!(roster.is_empty());
        assert!(roster.can_take(0, &shift(11, ShiftKind::Day)));
    }

    #[test]
    fn extreme_weights_saturate_and_undo_exactly() {
        let workers = vec![record("a", 1), record("b", -5)];
        let mut roster = Roster::new(&workers, false);

        roster.push(0, &candidate(shift(10, ShiftKind::Day), Score::MAX));
        assert_eq!(roster.scores(), &[Score::MAX, -5]);
        assert_eq!(roster.fairness(), Score::MAX);

        roster.push(1, &candidate(shift(12, ShiftKind::Day), Score::MIN));
        assert_eq!(roster.scores(), &[Score::MAX, Score::MIN]);
        assert_eq!(roster.fairness(), Score::MAX);

        roster.pop();
        roster.pop();
        assert_eq!(roster.scores(), &[1, -5]);
        assert_eq!(roster.fairness(), 6);
    }

    #[test]
    fn rest_gap_is_measured_in_hours() {
        let workers = vec![record("a", 0)];
        let mut roster = Roster::new(&workers, false);
        roster.push(0, &candidate(shift(10, ShiftKind::Day), 1));

        assert!(!roster.can_take(0, &shift(10, ShiftKind::Night)));
        assert!(!roster.can_take(0, &shift(11, ShiftKind::Day)));
        assert!(!roster.can_take(0, &shift(9, ShiftKind::Night)));
        assert!(roster.can_take(0, &shift(12, ShiftKind::Day)));
        assert!(roster.can_take(0, &shift(8, ShiftKind::Night)));
    }

    #[test]
    fn missed_day_cap_applies_only_when_immediate() {
        let workers = vec![record("a", 0)];
        // Sunday night costs two missed days, Tuesday day one more
        let mut immediate = Roster::new(&workers, true);
        immediate.push(0, &candidate(shift(9, ShiftKind::Night), 1));
        assert!(!immediate.can_take(0, &shift(11, ShiftKind::Day)));
        // Friday day costs nothing
        assert!(immediate.can_take(0, &shift(14, ShiftKind::Day)));

        let mut regular = Roster::new(&workers, false);
        regular.push(0, &candidate(shift(9, ShiftKind::Night), 1));
        assert!(regular.can_take(0, &shift(11, ShiftKind::Day)));
    }

    #[test]
    fn cant_constraint_blocks() {
        let mut workers = vec![record("a", 0)];
        workers[0].constraints.push(Constraint {
            worker_id: "a".into(),
            shift: shift(10, ShiftKind::Day),
            kind: ConstraintKind::Cant,
        });
        let roster = Roster::new(&workers, false);
        assert!(!roster.can_take(0, &shift(10, ShiftKind::Day)));
        assert!(roster.can_take(0, &shift(10, ShiftKind::Night)));
    }

    #[test]
    fn ordering_is_stable_on_ties() {
        let workers = vec![record("a", 4), record("b", 1), record("c", 1)];
        let roster = Roster::new(&workers, false);
        assert_eq!(roster.by_score(), vec![1, 2, 0]);
    }
}
