use crate::config::EngineConfig;
use crate::data::{
    AssignedShift, Score, Shift, ShiftKind, SuggestOutput, WeightPreset, WeightSettings,
    WorkerRecord, WorkerScore,
};
use crate::error::{AssignError, Result};
use crate::matcher::{self, Candidate};
use crate::roster::Placement;
use crate::{greedy, search, weights};
use chrono::{Days, NaiveDate};
use log::{info, warn};
use std::future::{self, Future};
use std::sync::Arc;
use std::time::Instant;

/// Source of the weight settings snapshot used for a run.
pub trait SettingsProvider {
    fn load_settings(&self) -> impl Future<Output = Result<WeightSettings>> + Send;
}

impl SettingsProvider for WeightSettings {
    fn load_settings(&self) -> impl Future<Output = Result<WeightSettings>> + Send {
        future::ready(Ok(self.clone()))
    }
}

/// Greedy pass first, bounded search on a blocking thread when greedy falls short.
#[derive(Debug, Clone)]
pub struct AssignmentEngine<S> {
    settings: S,
    config: EngineConfig,
}

impl<S: SettingsProvider> AssignmentEngine<S> {
    pub fn new(settings: S, config: EngineConfig) -> Self {
        Self { settings, config }
    }

    /// Suggests who should work which shift. Persists nothing.
    pub async fn suggest_assignment(
        &self,
        shifts: &[Shift],
        workers: &[WorkerRecord],
    ) -> Result<Vec<AssignedShift>> {
        Ok(self.suggest(shifts, workers).await?.assignments)
    }

    /// Like [`Self::suggest_assignment`], with coverage figures attached.
    pub async fn suggest(&self, shifts: &[Shift], workers: &[WorkerRecord]) -> Result<SuggestOutput> {
        let started = Instant::now();
        let eligible: Vec<WorkerRecord> = workers
            .iter()
            .filter(|w| !w.worker.is_admin())
            .cloned()
            .collect();

        if eligible.is_empty() {
            warn!("No assignable workers among {} supplied, nothing to do", workers.len());
            return Ok(SuggestOutput {
                assignments: Vec::new(),
                // nothing was matched, so nothing is missing
                complete: true,
                assigned_count: 0,
                candidate_count: 0,
                scores: Vec::new(),
            });
        }

        let settings = self.settings.load_settings().await?;
        let preset = settings.active_preset()?.clone();
        let immediate = preset.is_immediate();
        info!(
            "Suggesting assignments for {} shifts and {} workers under preset '{}'",
            shifts.len(),
            eligible.len(),
            preset.name
        );

        let candidates = matcher::match_candidates(&preset, shifts);
        let first_pass = greedy::assign(&candidates, &eligible, immediate);
        if first_pass.complete {
            info!(
                "Greedy pass covered all {} candidate shifts in {:.2?}",
                candidates.len(),
                started.elapsed()
            );
            return Ok(output(&first_pass.placements, &eligible, &preset, candidates.len()));
        }

        info!(
            "Greedy pass placed {} of {} shifts, starting bounded search ({:?} budget)",
            first_pass.placements.len(),
            candidates.len(),
            self.config.search_budget
        );
        let deadline = started + self.config.search_budget;
        let eligible = Arc::new(eligible);
        let candidates: Arc<[Candidate]> = candidates.into();

        let handle = {
            let eligible = Arc::clone(&eligible);
            let candidates = Arc::clone(&candidates);
            tokio::task::spawn_blocking(move || {
                search::search(&candidates, &eligible, immediate, deadline)
            })
        };
        let outcome = handle
            .await
            .map_err(|e| AssignError::Execution(format!("search task failed: {e}")))?;

        info!("Suggestion finished in {:.2?}", started.elapsed());
        Ok(output(&outcome.placements, &eligible, &preset, candidates.len()))
    }
}

fn output(
    placements: &[Placement],
    workers: &[WorkerRecord],
    preset: &WeightPreset,
    candidate_count: usize,
) -> SuggestOutput {
    let assignments: Vec<AssignedShift> = placements
        .iter()
        .map(|p| AssignedShift {
            shift: p.shift,
            assigned_worker: Some(workers[p.worker].worker.id.clone()),
            preset: preset.clone(),
        })
        .collect();

    let mut running: Vec<Score> = workers.iter().map(|w| w.worker.score).collect();
    for p in placements {
        running[p.worker] = running[p.worker].saturating_add(p.weight);
    }
    let scores = workers
        .iter()
        .zip(running)
        .map(|(record, score)| WorkerScore {
            worker_id: record.worker.id.clone(),
            score,
        })
        .collect();

    SuggestOutput {
        complete: assignments.len() == candidate_count,
        assigned_count: assignments.len(),
        candidate_count,
        assignments,
        scores,
    }
}

/// Every shift kind on every day from `start` through `end`, inclusive.
pub fn shift_universe(start: NaiveDate, end: NaiveDate) -> Result<Vec<Shift>> {
    if end < start {
        return Err(AssignError::InvalidRange { start, end });
    }
    let days = (end - start).num_days() as u64;
    Ok((0..=days)
        .map(|offset| start + Days::new(offset))
        .flat_map(|date| ShiftKind::ALL.map(|kind| Shift::new(date, kind)))
        .collect())
}

/// Recomputes every worker's score from the assignments they hold.
///
/// Each assignment is weighed under its own preset snapshot.
pub fn recalculate_scores(assignments: &[AssignedShift], workers: &[WorkerRecord]) -> Vec<WorkerScore> {
    workers
        .iter()
        .map(|record| {
            let score = assignments
                .iter()
                .filter(|a| a.assigned_worker.as_deref() == Some(record.worker.id.as_str()))
                .map(|a| weights::resolve(&a.preset, a.shift.day_of_week(), a.shift.kind))
                .fold(0, Score::saturating_add);
            WorkerScore {
                worker_id: record.worker.id.clone(),
                score,
            }
        })
        .collect()
}

/// Rejects the first assignment that lands on one of the worker's CANT constraints.
pub fn validate_assignments(assignments: &[AssignedShift], workers: &[WorkerRecord]) -> Result<()> {
    for assignment in assignments {
        let Some(worker_id) = assignment.assigned_worker.as_deref() else {
            continue;
        };
        let blocked = workers
            .iter()
            .filter(|r| r.worker.id == worker_id)
            .any(|r| r.is_blocked(&assignment.shift));
        if blocked {
            return Err(AssignError::Conflict {
                worker: worker_id.to_string(),
                shift: assignment.shift,
            });
        }
    }
    Ok(())
}
