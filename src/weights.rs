use crate::data::{DayOfWeek, Score, ShiftKind, WeightPreset};

/// Weight used when no rule in the preset covers a (day, kind) pair.
pub const DEFAULT_WEIGHT: Score = 1;

/// Cap on cumulative missed office days under the immediate preset.
pub const MAX_MISSED_OFFICE_DAYS: u32 = 2;

/// Weight of the first rule matching `day` and `kind`, or [`DEFAULT_WEIGHT`].
pub fn resolve(preset: &WeightPreset, day: DayOfWeek, kind: ShiftKind) -> Score {
    preset
        .rules
        .iter()
        .find(|rule| rule.day == day && rule.kind == kind)
        .map(|rule| rule.weight)
        .unwrap_or(DEFAULT_WEIGHT)
}

/// Office days a worker misses by taking this shift.
pub fn missed_office_days(day: DayOfWeek, kind: ShiftKind) -> u32 {
    match (kind, day) {
        (ShiftKind::Day, DayOfWeek::Friday | DayOfWeek::Saturday) => 0,
        (ShiftKind::Day, _) => 1,
        (ShiftKind::Night, DayOfWeek::Friday) => 0,
        (ShiftKind::Night, DayOfWeek::Thursday | DayOfWeek::Saturday) => 1,
        (ShiftKind::Night, _) => 2,
    }
}
