use jarvis_core::db::{open_db, open_db_in_memory};
use jarvis_core::{
    Assistant, ChangeFeed, ChangeKind, KeyValueStore, SqliteKeyValueStore, StorageService,
};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn sqlite_store_upserts_lists_and_removes() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);

    assert_eq!(store.get("missing").unwrap(), None);
    store.set("jarvis_todos", "[]").unwrap();
    store.set("jarvis_notes", "[]").unwrap();
    store.set("jarvis_todos", "[1]").unwrap();

    assert_eq!(store.get("jarvis_todos").unwrap().as_deref(), Some("[1]"));
    assert_eq!(
        store.keys().unwrap(),
        vec!["jarvis_notes".to_string(), "jarvis_todos".to_string()]
    );
    assert!(store.remove("jarvis_notes").unwrap());
    assert!(!store.remove("jarvis_notes").unwrap());

    store.clear().unwrap();
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn collections_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jarvis.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let assistant = Assistant::new(SqliteKeyValueStore::new(&conn));
        assistant.todos().add("우유 사기").unwrap();
        assistant.ask("메모 장보기 목록 정리");
    }

    let conn = open_db(&path).unwrap();
    let assistant = Assistant::new(SqliteKeyValueStore::new(&conn));
    let todos = assistant.storage().todos();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].text, "우유 사기");
    assert_eq!(assistant.storage().notes().len(), 1);
    assert_eq!(assistant.storage().commands().len(), 1);
}

#[test]
fn writes_from_one_service_notify_observers_sharing_the_feed() {
    let conn = open_db_in_memory().unwrap();
    let feed = ChangeFeed::new();
    let writer = StorageService::with_feed(SqliteKeyValueStore::new(&conn), feed.clone());
    let reader = StorageService::with_feed(SqliteKeyValueStore::new(&conn), feed.clone());

    let reloaded = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&reloaded);
    reader.feed().subscribe(move |change| {
        sink.borrow_mut().push((change.key.clone(), change.kind));
    });

    let settings = jarvis_core::Settings {
        theme: jarvis_core::Theme::Light,
        ..jarvis_core::Settings::default()
    };
    writer.save_settings(&settings).unwrap();
    assert_eq!(reader.settings().theme, jarvis_core::Theme::Light);
    writer.clear_all().unwrap();

    let seen = reloaded.borrow();
    assert_eq!(
        *seen,
        vec![
            (Some("jarvis_settings".to_string()), ChangeKind::Set),
            (None, ChangeKind::Cleared),
        ]
    );
}
