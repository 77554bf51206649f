use std::fs;

use hellas_quest_core::{
    AchievementId, CategoryFilter, Character, Command, Difficulty, Event, LifetimeState,
    PowerUpKind,
};
use hellas_quest_persistence::{
    corrupt_backup_path, Gateway, JsonFileStore, KeyValueStore, MemoryStore, StoreError,
    ACHIEVEMENTS_KEY, HIGH_SCORE_KEY, HIGH_SCORE_LEVEL_KEY, POWER_UPS_USED_KEY,
    TOTAL_CORRECT_ANSWERS_KEY,
};
use hellas_quest_session::{self as session, query, Session, SessionConfig};
use hellas_quest_system_question_bank::QuestionBank;

fn stored(store: &impl KeyValueStore, key: &str) -> Option<String> {
    store.get(key).expect("readable store")
}

#[test]
fn empty_store_loads_defaults() {
    let gateway = Gateway::new(MemoryStore::new());
    assert_eq!(gateway.load(), LifetimeState::default());
}

#[test]
fn malformed_entries_fall_back_to_defaults() {
    let mut store = MemoryStore::new();
    store.set(TOTAL_CORRECT_ANSWERS_KEY, "many").expect("set");
    store.set(ACHIEVEMENTS_KEY, "{not json").expect("set");
    store.set(HIGH_SCORE_KEY, "1250").expect("set");
    store.set(POWER_UPS_USED_KEY, "[]").expect("set");

    let lifetime = Gateway::new(store).load();
    assert_eq!(lifetime.total_correct_answers, 0);
    assert!(lifetime.achievements.is_empty());
    assert_eq!(lifetime.high_score, 1250);
    assert_eq!(lifetime.high_score_level, 0);
    assert!(!lifetime.power_ups_used.all_used());
}

#[test]
fn browser_encoded_values_are_understood() {
    let mut store = MemoryStore::new();
    store.set(TOTAL_CORRECT_ANSWERS_KEY, "27").expect("set");
    store
        .set(ACHIEVEMENTS_KEY, r#"["firstAnswer","level3","retired"]"#)
        .expect("set");
    store.set(HIGH_SCORE_LEVEL_KEY, "3").expect("set");
    store
        .set(POWER_UPS_USED_KEY, r#"{"hint":true,"doublePoints":true}"#)
        .expect("set");

    let lifetime = Gateway::new(store).load();
    assert_eq!(lifetime.total_correct_answers, 27);
    assert_eq!(
        lifetime.achievements.into_iter().collect::<Vec<_>>(),
        vec![AchievementId::FirstAnswer, AchievementId::Level3]
    );
    assert_eq!(lifetime.high_score_level, 3);
    assert!(lifetime.power_ups_used.has_used(PowerUpKind::Hint));
    assert!(!lifetime.power_ups_used.has_used(PowerUpKind::Strike));
}

#[test]
fn record_writes_only_touched_keys() {
    let mut gateway = Gateway::new(MemoryStore::new());
    let mut lifetime = LifetimeState {
        total_correct_answers: 4,
        high_score: 900,
        ..LifetimeState::default()
    };
    let _ = lifetime.achievements.insert(AchievementId::FirstAnswer);

    gateway
        .record(&[Event::CorrectAnswerRecorded { total: 4 }], &lifetime)
        .expect("record");

    assert_eq!(
        stored(gateway.store(), TOTAL_CORRECT_ANSWERS_KEY).as_deref(),
        Some("4")
    );
    assert_eq!(stored(gateway.store(), ACHIEVEMENTS_KEY), None);
    assert_eq!(stored(gateway.store(), HIGH_SCORE_KEY), None);
}

#[test]
fn high_score_writes_score_and_level() {
    let mut gateway = Gateway::new(MemoryStore::new());
    let lifetime = LifetimeState {
        high_score: 1400,
        high_score_level: 3,
        ..LifetimeState::default()
    };

    gateway
        .record(
            &[Event::HighScoreRecorded {
                score: 1400,
                level: 3,
            }],
            &lifetime,
        )
        .expect("record");

    assert_eq!(stored(gateway.store(), HIGH_SCORE_KEY).as_deref(), Some("1400"));
    assert_eq!(
        stored(gateway.store(), HIGH_SCORE_LEVEL_KEY).as_deref(),
        Some("3")
    );
}

#[test]
fn json_file_store_survives_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("save.json");

    let mut store = JsonFileStore::open(&path).expect("open new store");
    store.set(HIGH_SCORE_KEY, "640").expect("set");
    store.set(TOTAL_CORRECT_ANSWERS_KEY, "3").expect("set");

    let reopened = JsonFileStore::open(&path).expect("reopen store");
    assert_eq!(stored(&reopened, HIGH_SCORE_KEY).as_deref(), Some("640"));
    assert_eq!(
        stored(&reopened, TOTAL_CORRECT_ANSWERS_KEY).as_deref(),
        Some("3")
    );
}

#[test]
fn corrupt_save_file_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("save.json");
    fs::write(&path, "[1, 2, 3]").expect("write corrupt file");

    let error = JsonFileStore::open(&path).expect_err("corrupt file");
    assert!(matches!(error, StoreError::Malformed { .. }));
}

#[test]
fn corrupt_save_file_starts_a_default_session() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("save.json");
    let truncated = r#"{"achievements": "["firstAn"#;
    fs::write(&path, truncated).expect("write truncated file");

    let store = JsonFileStore::open_or_recover(&path).expect("recovered store");
    let gateway = Gateway::new(store);
    assert_eq!(gateway.load(), LifetimeState::default());

    let backup = corrupt_backup_path(&path);
    assert_eq!(fs::read_to_string(&backup).expect("backup kept"), truncated);
    assert!(!path.exists());

    let bank = QuestionBank::builtin().expect("builtin bank");
    let session = Session::new(SessionConfig::default(), bank, gateway.load(), 7);
    assert_eq!(query::hud(&session).high_score, 0);
    assert!(query::lifetime(&session).achievements.is_empty());
}

#[test]
fn recovered_store_saves_to_the_original_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("save.json");
    fs::write(&path, "not json").expect("write corrupt file");

    let mut store = JsonFileStore::open_or_recover(&path).expect("recovered store");
    store.set(HIGH_SCORE_KEY, "300").expect("set");

    let reopened = JsonFileStore::open(&path).expect("reopen store");
    assert_eq!(stored(&reopened, HIGH_SCORE_KEY).as_deref(), Some("300"));
    assert_eq!(
        fs::read_to_string(corrupt_backup_path(&path)).expect("backup kept"),
        "not json"
    );
}

#[test]
fn saving_leaves_only_the_save_file_behind() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("save.json");

    let mut store = JsonFileStore::open(&path).expect("open new store");
    store.set(HIGH_SCORE_KEY, "10").expect("set");
    store.set(HIGH_SCORE_KEY, "20").expect("set");

    let names: Vec<_> = fs::read_dir(dir.path())
        .expect("list dir")
        .map(|entry| entry.expect("dir entry").file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("save.json")]);
    let reopened = JsonFileStore::open(&path).expect("reopen store");
    assert_eq!(stored(&reopened, HIGH_SCORE_KEY).as_deref(), Some("20"));
}

#[test]
fn healthy_save_file_is_opened_unchanged() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("save.json");
    fs::write(&path, r#"{"greekGameHighScore": "75"}"#).expect("write save");

    let store = JsonFileStore::open_or_recover(&path).expect("open store");
    assert_eq!(stored(&store, HIGH_SCORE_KEY).as_deref(), Some("75"));
    assert!(!corrupt_backup_path(&path).exists());
}

#[test]
fn session_progress_round_trips_through_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("save.json");
    let mut gateway = Gateway::new(JsonFileStore::open(&path).expect("open store"));

    let bank = QuestionBank::builtin().expect("builtin bank");
    let mut session = Session::new(SessionConfig::default(), bank, gateway.load(), 31);
    let commands = [
        Command::SelectDifficulty {
            difficulty: Difficulty::Easy,
        },
        Command::SelectCategory {
            category: CategoryFilter::All,
        },
        Command::SelectCharacter {
            character: Character::Perseus,
        },
        Command::StartSession,
        Command::ActivatePowerUp {
            kind: PowerUpKind::Strike,
        },
    ];
    for command in commands {
        let mut events = Vec::new();
        session::apply(&mut session, command, &mut events);
        gateway
            .record(&events, query::lifetime(&session))
            .expect("record setup");
    }

    let option = query::correct_option(&session).expect("question on screen");
    for command in [Command::SubmitAnswer { option }, Command::EndSession] {
        let mut events = Vec::new();
        session::apply(&mut session, command, &mut events);
        gateway
            .record(&events, query::lifetime(&session))
            .expect("record answer");
    }

    let reopened = Gateway::new(JsonFileStore::open(&path).expect("reopen store"));
    let lifetime = reopened.load();
    assert_eq!(lifetime, *query::lifetime(&session));
    assert_eq!(lifetime.total_correct_answers, 1);
    assert_eq!(lifetime.high_score, 210);
    assert!(lifetime.achievements.contains(&AchievementId::FirstAnswer));
    assert!(lifetime.power_ups_used.has_used(PowerUpKind::Strike));
}
