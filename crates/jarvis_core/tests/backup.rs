use chrono::{TimeZone, Utc};
use jarvis_core::{
    Assistant, BackupError, FixedClock, Layout, MemoryKeyValueStore, NewEvent, NoteEdit,
    SequentialIdGenerator, Settings, StorageService, Theme,
};
use std::rc::Rc;

fn assistant() -> Assistant<MemoryKeyValueStore> {
    let clock = Rc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
    ));
    Assistant::with_parts(
        StorageService::new(MemoryKeyValueStore::new()),
        Box::new(clock),
        Box::new(SequentialIdGenerator::new()),
    )
}

fn seed(assistant: &Assistant<MemoryKeyValueStore>) {
    assistant.todos().add("책 반납").unwrap();
    assistant.ask("일정 10월 30일 15:00 병원");
    let note = assistant.notes().create_blank().unwrap();
    assistant
        .notes()
        .update(
            &note.id,
            NoteEdit {
                title: "아이디어".to_string(),
                content: "앱 만들기".to_string(),
                tags: "idea".to_string(),
            },
        )
        .unwrap();
    assistant
        .calendar()
        .add(NewEvent {
            title: "회고".to_string(),
            description: Some("분기 회고".to_string()),
            date: Some(chrono::NaiveDate::from_ymd_opt(2026, 11, 2).unwrap()),
            time: None,
        })
        .unwrap();
    assistant
        .storage()
        .save_settings(&Settings {
            theme: Theme::Light,
            auto_save: false,
            layout: Layout::Top,
        })
        .unwrap();
}

#[test]
fn export_document_has_expected_shape_and_file_name() {
    let assistant = assistant();
    seed(&assistant);

    let json = assistant.backup().export_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for field in ["todos", "notes", "events", "settings", "exportDate"] {
        assert!(value.get(field).is_some(), "missing {field}");
    }
    assert_eq!(value["settings"]["layout"], "top");
    assert_eq!(value["events"][0]["date"], "2026-10-30");
    assert_eq!(value["todos"][0]["priority"], "medium");
    assert!(value.get("commands").is_none());
    assert_eq!(
        assistant.backup().suggested_file_name(),
        "jarvis-backup-2026-10-19.json"
    );
}

#[test]
fn export_then_import_reproduces_collections() {
    let source = assistant();
    seed(&source);
    let exported = source.backup().export();
    let json = source.backup().export_json().unwrap();

    let target = assistant();
    target.todos().add("덮어쓸 항목").unwrap();
    let report = target.backup().import_json(&json).unwrap();
    assert!(report.todos && report.notes && report.events && report.settings);

    let imported = target.backup().export();
    assert_eq!(imported.todos, exported.todos);
    assert_eq!(imported.notes, exported.notes);
    assert_eq!(imported.events, exported.events);
    assert_eq!(imported.settings, exported.settings);
}

#[test]
fn import_overwrites_only_present_sections() {
    let assistant = assistant();
    seed(&assistant);

    let report = assistant
        .backup()
        .import_json(r#"{ "todos": [], "settings": { "theme": "dark" } }"#)
        .unwrap();
    assert!(report.todos && report.settings);
    assert!(!report.notes && !report.events);

    let summary = assistant.backup().summary();
    assert_eq!((summary.todos, summary.notes, summary.events), (0, 1, 2));
    assert_eq!(assistant.storage().settings(), Settings::default());
}

#[test]
fn malformed_import_changes_nothing() {
    let assistant = assistant();
    seed(&assistant);
    let before = assistant.backup().export();

    for broken in ["{ \"todos\": [", "42", r#"{ "todos": [{ "id": 1 }] }"#] {
        let err = assistant.backup().import_json(broken).unwrap_err();
        assert!(matches!(err, BackupError::Malformed(_)), "{broken}");
    }

    let after = assistant.backup().export();
    assert_eq!(after.todos, before.todos);
    assert_eq!(after.notes, before.notes);
    assert_eq!(after.events, before.events);
    assert_eq!(after.settings, before.settings);
}

#[test]
fn clear_all_wipes_collections_history_and_settings() {
    let assistant = assistant();
    seed(&assistant);

    assistant.backup().clear_all().unwrap();

    let summary = assistant.backup().summary();
    assert_eq!((summary.todos, summary.notes, summary.events), (0, 0, 0));
    assert!(assistant.storage().commands().is_empty());
    assert_eq!(assistant.storage().settings(), Settings::default());
}
