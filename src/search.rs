use crate::data::{Score, WorkerRecord};
use crate::matcher::Candidate;
use crate::roster::{Placement, Roster};
use log::{info, trace};
use std::time::Instant;

/// Result of a bounded search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub placements: Vec<Placement>,
    /// Every candidate is placed.
    pub full: bool,
    /// Fairness spread of the returned full assignment.
    pub fairness: Option<Score>,
    pub timed_out: bool,
    pub nodes: u64,
}

/// One level of the walk: the candidate at `index` and the workers still to try.
struct Frame {
    index: usize,
    skipped: usize,
    order: Vec<usize>,
    next: usize,
    /// A placement for this level sits on top of the roster.
    placed: bool,
    placed_any: bool,
    skip_taken: bool,
}

struct Search<'a> {
    candidates: &'a [Candidate],
    roster: Roster<'a>,
    deadline: Instant,
    best_full: Option<(Score, Vec<Placement>)>,
    best_partial: Vec<Placement>,
    nodes: u64,
    timed_out: bool,
}

impl Search<'_> {
    fn expired(&mut self) -> bool {
        if !self.timed_out && Instant::now() >= self.deadline {
            self.timed_out = true;
        }
        self.timed_out
    }

    fn settled(&self) -> bool {
        matches!(self.best_full, Some((0, _)))
    }

    /// Node entry: bookkeeping, pruning and leaf handling. Returns a frame
    /// when the node still has branches to try.
    fn enter(&mut self, index: usize, skipped: usize) -> Option<Frame> {
        self.nodes += 1;
        if self.expired() || self.settled() {
            return None;
        }

        if self.roster.len() > self.best_partial.len() {
            self.best_partial = self.roster.placements().to_vec();
        }

        let remaining = self.candidates.len() - index;
        if skipped > 0
            && (self.best_full.is_some() || self.roster.len() + remaining <= self.best_partial.len())
        {
            // this path can neither become full nor beat the best partial
            return None;
        }

        if remaining == 0 {
            if skipped == 0 {
                let fairness = self.roster.fairness();
                let better = self.best_full.as_ref().is_none_or(|(best, _)| fairness < *best);
                if better {
                    trace!("New best full assignment with fairness {}", fairness);
                    self.best_full = Some((fairness, self.roster.placements().to_vec()));
                }
            }
            return None;
        }

        Some(Frame {
            index,
            skipped,
            order: self.roster.by_score(),
            next: 0,
            placed: false,
            placed_any: false,
            skip_taken: false,
        })
    }

    /// Depth-first walk driven by an explicit frame stack, so input length
    /// never bounds the thread stack.
    fn explore(&mut self) {
        let mut stack: Vec<Frame> = Vec::new();
        stack.extend(self.enter(0, 0));

        while let Some(frame) = stack.last_mut() {
            if frame.placed {
                // back from the child below this placement
                self.roster.pop();
                frame.placed = false;
                if self.timed_out || self.settled() {
                    return;
                }
            }

            let candidate = self.candidates[frame.index];
            let eligible = frame.order[frame.next..]
                .iter()
                .position(|&w| self.roster.can_take(w, &candidate.shift))
                .map(|offset| frame.next + offset);

            let child = match eligible {
                Some(at) => {
                    frame.next = at + 1;
                    frame.placed = true;
                    frame.placed_any = true;
                    self.roster.push(frame.order[at], &candidate);
                    self.enter(frame.index + 1, frame.skipped)
                }
                None if !frame.placed_any && !frame.skip_taken => {
                    trace!("No eligible worker for {} on this path, skipping", candidate.shift);
                    frame.next = frame.order.len();
                    frame.skip_taken = true;
                    self.enter(frame.index + 1, frame.skipped + 1)
                }
                None => {
                    stack.pop();
                    continue;
                }
            };
            stack.extend(child);
        }
    }
}

/// Depth-first search over every eligible worker for every candidate.
///
/// Polls `deadline` on every node and unwinds once it has passed. Returns the
/// fairest full assignment found, or failing that the largest partial one.
pub fn search(
    candidates: &[Candidate],
    workers: &[WorkerRecord],
    immediate: bool,
    deadline: Instant,
) -> SearchOutcome {
    let mut search = Search {
        candidates,
        roster: Roster::new(workers, immediate),
        deadline,
        best_full: None,
        best_partial: Vec::new(),
        nodes: 0,
        timed_out: false,
    };
    search.explore();

    let outcome = match search.best_full {
        Some((fairness, placements)) => SearchOutcome {
            placements,
            full: true,
            fairness: Some(fairness),
            timed_out: search.timed_out,
            nodes: search.nodes,
        },
        None => SearchOutcome {
            placements: search.best_partial,
            full: false,
            fairness: None,
            timed_out: search.timed_out,
            nodes: search.nodes,
        },
    };

    info!(
        "Search visited {} nodes (timed out: {}), returning {} of {} shifts, fairness {:?}",
        outcome.nodes,
        outcome.timed_out,
        outcome.placements.len(),
        candidates.len(),
        outcome.fairness
    );
    outcome
}
