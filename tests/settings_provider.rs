use chrono::NaiveDate;
use shift_assigner::config::EngineConfig;
use shift_assigner::data::{
    DayOfWeek, Role, ShiftKind, WeightPreset, WeightRule, WeightSettings, Worker, WorkerRecord,
};
use shift_assigner::solver::shift_universe;
use shift_assigner::{AssignError, AssignmentEngine, Result, SettingsProvider};
use std::future::Future;
use std::sync::Mutex;

/// Provider backed by a mutable store, like a key-value collaborator would be.
struct Store {
    settings: Mutex<Option<WeightSettings>>,
}

impl SettingsProvider for Store {
    fn load_settings(&self) -> impl Future<Output = Result<WeightSettings>> + Send {
        let snapshot = self
            .settings
            .lock()
            .map_err(|e| AssignError::Settings(e.to_string()))
            .and_then(|s| s.clone().ok_or_else(|| AssignError::Settings("store is empty".into())));
        async move { snapshot }
    }
}

fn workers() -> Vec<WorkerRecord> {
    vec![WorkerRecord::new(
        Worker {
            id: "dana".into(),
            score: 0,
            role: Role::Worker,
        },
        vec![],
    )]
}

fn week() -> Vec<shift_assigner::data::Shift> {
    shift_universe(
        NaiveDate::from_ymd_opt(2024, 6, 9).unwrap(),
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn settings_failure_is_surfaced() {
    let engine = AssignmentEngine::new(
        Store {
            settings: Mutex::new(None),
        },
        EngineConfig::default(),
    );

    let err = engine.suggest_assignment(&week(), &workers()).await.unwrap_err();
    assert!(matches!(err, AssignError::Settings(_)));
}

#[tokio::test]
async fn snapshot_is_taken_per_run() {
    let friday = WeightPreset::new(
        "FRIDAY",
        vec![WeightRule {
            day: DayOfWeek::Friday,
            kind: ShiftKind::Night,
            weight: 4,
        }],
    );
    let store = Store {
        settings: Mutex::new(Some(WeightSettings::new(friday))),
    };
    let engine = AssignmentEngine::new(store, EngineConfig::default());

    let result = engine.suggest_assignment(&week(), &workers()).await.unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].shift.kind, ShiftKind::Night);
    assert_eq!(result[0].preset.name, "FRIDAY");
}
