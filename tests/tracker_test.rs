//! End-to-end tests for the tracker over a file-backed store.

use std::path::Path;
use vitals_tracker::{
    Clock, Directory, FileStore, HealthRecord, HealthTracker, KeyValueStore, LatestRecord,
    RecordStore, RiskFactor, StoreError, Submission,
};

fn open(path: &Path) -> HealthTracker<FileStore> {
    HealthTracker::new(
        FileStore::open(path).expect("open store"),
        Directory::default(),
        Clock::Zone(chrono_tz::UTC),
    )
}

fn submission(user: &str, bp: &str, sugar: u32, hr: u32) -> Submission {
    Submission {
        user_id: user.to_string(),
        blood_pressure: bp.to_string(),
        blood_sugar: sugar,
        heart_rate: hr,
    }
}

#[test]
fn test_records_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let saved = {
        let mut tracker = open(&path);
        tracker
            .submit(submission("user123", "120/80", 100, 70))
            .unwrap();
        tracker
            .submit(submission("user123", "150/95", 150, 110))
            .unwrap()
            .record
    };

    let tracker = open(&path);
    let dashboard = tracker.dashboard("user123").unwrap();
    assert_eq!(dashboard.latest, LatestRecord::Found(saved));
    assert_eq!(dashboard.trend.blood_sugar, vec![100, 150]);
    assert_eq!(dashboard.trend.heart_rate, vec![70, 110]);
}

#[test]
fn test_default_user_initial_load() {
    let dir = tempfile::tempdir().unwrap();
    let tracker = open(&dir.path().join("store.json"));

    let dashboard = tracker.dashboard("user123").unwrap();
    assert_eq!(dashboard.latest, LatestRecord::NoData);
    assert!(dashboard.trend.is_empty());
}

#[test]
fn test_storage_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let mut tracker = open(&path);
    tracker.submit(submission("alice", "118/76", 95, 64)).unwrap();
    tracker.submit(submission("bob", "135/88", 145, 58)).unwrap();

    let store = FileStore::open(&path).unwrap();
    let history: serde_json::Value =
        serde_json::from_str(&store.get("healthHistory").unwrap().unwrap()).unwrap();
    assert_eq!(history.as_array().map(Vec::len), Some(2));
    assert_eq!(history[1]["userId"], "bob");
    assert_eq!(history[1]["bloodPressure"], "135/88");

    let alice: HealthRecord = serde_json::from_str(&store.get("alice").unwrap().unwrap()).unwrap();
    assert_eq!(alice.heart_rate(), 64);
}

#[test]
fn test_reads_legacy_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let record = r#"{"userId":"user123","bloodPressure":"130/85","bloodSugar":120,"heartRate":80,"dateTime":"5/6/2024, 7:08:09 AM"}"#;
    let contents = serde_json::json!({
        "user123": record,
        "healthHistory": format!("[{record}]"),
    });
    std::fs::write(&path, contents.to_string()).unwrap();

    let store = RecordStore::new(FileStore::open(&path).unwrap());
    let latest = store.latest("user123").unwrap();
    assert_eq!(latest.recorded_at(), "5/6/2024, 7:08:09 AM");
    assert_eq!(store.history().unwrap(), vec![latest]);
}

#[test]
fn test_history_is_append_only_across_users() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = open(&dir.path().join("store.json"));

    let users = ["alice", "bob", "alice", "carol", "alice"];
    for (i, user) in users.iter().enumerate() {
        let before = tracker.store().history().unwrap().len();
        tracker
            .submit(submission(user, "120/80", 100 + i as u32, 70))
            .unwrap();
        assert_eq!(tracker.store().history().unwrap().len(), before + 1);
    }

    assert_eq!(tracker.store().history_for("alice").unwrap().len(), 3);
    assert!(matches!(
        tracker.store().latest("dave"),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn test_outcome_assessment() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = open(&dir.path().join("store.json"));

    let outcome = tracker
        .submit(submission("user123", "not-a-number", 100, 70))
        .unwrap();
    assert!(outcome.assessment.risk.is_normal());
    assert!(outcome.assessment.risk.blood_pressure_unreadable);
    assert_eq!(outcome.assessment.hospitals[0].name, "General Hospital");

    let outcome = tracker
        .submit(submission("user123", "120/80", 100, 45))
        .unwrap();
    assert_eq!(outcome.assessment.risk.factors, vec![RiskFactor::AbnormalHeartRate]);
    assert!(outcome.assessment.advice.activity.contains("aerobic"));
    assert_eq!(outcome.trend.len(), 2);
}

#[test]
fn test_two_handles_on_one_store_keep_every_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let mut cli = RecordStore::new(FileStore::open(&path).unwrap());
    let mut server = RecordStore::new(FileStore::open(&path).unwrap());

    let alice = HealthRecord::with_timestamp("alice", "120/80", 100, 70, "a").unwrap();
    let bob = HealthRecord::with_timestamp("bob", "130/85", 110, 75, "b").unwrap();
    cli.save(&alice).unwrap();
    server.save(&bob).unwrap();

    let reopened = RecordStore::new(FileStore::open(&path).unwrap());
    assert_eq!(reopened.history().unwrap(), vec![alice.clone(), bob.clone()]);
    assert_eq!(reopened.latest("alice").unwrap(), alice);
    assert_eq!(reopened.latest("bob").unwrap(), bob);
    assert_eq!(cli.history().unwrap().len(), 2);
}

#[test]
fn test_saves_from_parallel_handles_are_linearized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let workers: Vec<_> = ["alice", "bob", "carol"]
        .into_iter()
        .map(|user| {
            let path = path.clone();
            std::thread::spawn(move || {
                let mut tracker = open(&path);
                for i in 0..5 {
                    tracker.submit(submission(user, "120/80", 100 + i, 70)).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let store = RecordStore::new(FileStore::open(&path).unwrap());
    assert_eq!(store.history().unwrap().len(), 15);
    for user in ["alice", "bob", "carol"] {
        let sugars: Vec<u32> = store
            .history_for(user)
            .unwrap()
            .iter()
            .map(HealthRecord::blood_sugar)
            .collect();
        assert_eq!(sugars, vec![100, 101, 102, 103, 104]);
    }
}
