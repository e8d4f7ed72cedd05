use crate::data::WorkerRecord;
use crate::matcher::Candidate;
use crate::roster::{Placement, Roster};
use log::{debug, warn};

/// Result of the single greedy pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreedyOutcome {
    pub placements: Vec<Placement>,
    pub complete: bool,
}

/// Assigns each candidate, in order, to the lowest-scored worker who can take it.
///
/// Stops at the first candidate nobody can take; the outcome is then
/// incomplete and holds whatever was placed before it.
pub fn assign(candidates: &[Candidate], workers: &[WorkerRecord], immediate: bool) -> GreedyOutcome {
    let mut roster = Roster::new(workers, immediate);

    for candidate in candidates {
        let chosen = roster
            .by_score()
            .into_iter()
            .find(|&w| roster.can_take(w, &candidate.shift));

        let Some(worker) = chosen else {
            warn!(
                "No suitable worker found for shift {}, greedy pass stops after {} of {}",
                candidate.shift,
                roster.len(),
                candidates.len()
            );
            return GreedyOutcome {
                placements: roster.placements().to_vec(),
                complete: false,
            };
        };

        debug!(
            "Greedy: {} -> {} (+{})",
            candidate.shift, workers[worker].worker.id, candidate.weight
        );
        roster.push(worker, candidate);
    }

    GreedyOutcome {
        placements: roster.placements().to_vec(),
        complete: true,
    }
}
