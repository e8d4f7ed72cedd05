use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{AssignError, Result};

// Type aliases for clarity
pub type WorkerId = String;
pub type Score = i64;

/// Name of the preset that turns on the missed-office-day cap.
pub const IMMEDIATE_PRESET: &str = "IMMEDIATE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftKind {
    Day,
    Night,
}

impl ShiftKind {
    pub const ALL: [ShiftKind; 2] = [ShiftKind::Day, ShiftKind::Night];
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftKind::Day => write!(f, "DAY"),
            ShiftKind::Night => write!(f, "NIGHT"),
        }
    }
}

/// Canonical day of week used by weight rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub fn of(date: NaiveDate) -> DayOfWeek {
        match date.weekday() {
            Weekday::Sun => DayOfWeek::Sunday,
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
        }
    }
}

/// A concrete shift, identified by its date and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Shift {
    pub date: NaiveDate,
    pub kind: ShiftKind,
}

impl Shift {
    pub fn new(date: NaiveDate, kind: ShiftKind) -> Self {
        Self { date, kind }
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        DayOfWeek::of(self.date)
    }

    /// Instant used for rest-gap arithmetic: the shift's date at midnight.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    #[serde(alias = "user")]
    Worker,
    #[serde(alias = "administrator")]
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Worker {
    pub id: WorkerId,
    #[serde(default)]
    pub score: Score,
    #[serde(default)]
    pub role: Role,
}

impl Worker {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintKind {
    /// Hard exclusion: the worker cannot take this shift.
    Cant,
    PrefersNot,
    Prefers,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub worker_id: WorkerId,
    pub shift: Shift,
    pub kind: ConstraintKind,
}

impl Constraint {
    pub fn forbids(&self, worker_id: &str, shift: &Shift) -> bool {
        self.kind == ConstraintKind::Cant && self.worker_id == worker_id && self.shift == *shift
    }
}

/// A worker together with the constraints they registered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRecord {
    #[serde(flatten)]
    pub worker: Worker,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl WorkerRecord {
    pub fn new(worker: Worker, constraints: Vec<Constraint>) -> Self {
        Self { worker, constraints }
    }

    pub fn is_blocked(&self, shift: &Shift) -> bool {
        self.constraints
            .iter()
            .any(|c| c.forbids(&self.worker.id, shift))
    }

    /// Drops constraints on shifts outside the planning universe.
    pub fn retain_constraints_within(&mut self, universe: &[Shift]) {
        self.constraints.retain(|c| universe.contains(&c.shift));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightRule {
    pub day: DayOfWeek,
    pub kind: ShiftKind,
    pub weight: Score,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WeightPreset {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<WeightRule>,
}

impl WeightPreset {
    pub fn new(name: impl Into<String>, rules: Vec<WeightRule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    pub fn is_immediate(&self) -> bool {
        self.name == IMMEDIATE_PRESET
    }
}

/// The active preset plus every known preset by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightSettings {
    active: String,
    presets: BTreeMap<String, WeightPreset>,
}

impl WeightSettings {
    pub fn new(active: WeightPreset) -> Self {
        let name = active.name.clone();
        let mut presets = BTreeMap::new();
        presets.insert(name.clone(), active);
        Self {
            active: name,
            presets,
        }
    }

    pub fn active_name(&self) -> &str {
        &self.active
    }

    pub fn active_preset(&self) -> Result<&WeightPreset> {
        self.presets.get(&self.active).ok_or_else(|| {
            AssignError::Config(format!(
                "active preset '{}' is not among the known presets",
                self.active
            ))
        })
    }

    /// Inserts or replaces a preset by name.
    pub fn add_preset(&mut self, preset: WeightPreset) {
        self.presets.insert(preset.name.clone(), preset);
    }

    pub fn set_active(&mut self, name: &str) -> Result<()> {
        if !self.presets.contains_key(name) {
            return Err(AssignError::Config(format!("unknown preset '{name}'")));
        }
        self.active = name.to_string();
        Ok(())
    }
}

/// A shift together with its assignee and the preset it was weighed under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedShift {
    #[serde(flatten)]
    pub shift: Shift,
    pub assigned_worker: Option<WorkerId>,
    pub preset: WeightPreset,
}

/// Body of a suggestion request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub settings: WeightSettings,
    pub workers: Vec<WorkerRecord>,
}

/// Outcome of a suggestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestOutput {
    pub assignments: Vec<AssignedShift>,
    pub complete: bool,
    pub assigned_count: usize,
    pub candidate_count: usize,
    /// Running score of every assignable worker once the suggestion is applied.
    pub scores: Vec<WorkerScore>,
}

/// Body shared by the validation and recalculation endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentsRequest {
    pub assignments: Vec<AssignedShift>,
    pub workers: Vec<WorkerRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerScore {
    pub worker_id: WorkerId,
    pub score: Score,
}
