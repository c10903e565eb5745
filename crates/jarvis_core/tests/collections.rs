use chrono::{Duration, NaiveDate, TimeZone, Utc};
use jarvis_core::{
    Assistant, FixedClock, MemoryKeyValueStore, NewEvent, NoteEdit, Priority,
    SequentialIdGenerator, ServiceError, StorageService, TodoFilter,
};
use std::rc::Rc;

fn assistant_with_clock() -> (Assistant<MemoryKeyValueStore>, Rc<FixedClock>) {
    let clock = Rc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap(),
    ));
    let assistant = Assistant::with_parts(
        StorageService::new(MemoryKeyValueStore::new()),
        Box::new(Rc::clone(&clock)),
        Box::new(SequentialIdGenerator::new()),
    );
    (assistant, clock)
}

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

#[test]
fn todo_toggle_priority_filter_and_delete() {
    let (assistant, _clock) = assistant_with_clock();
    let todos = assistant.todos();

    let first = todos.add("  설거지 ").unwrap();
    let second = todos.add("빨래").unwrap();
    assert_eq!(first.text, "설거지");
    assert!(matches!(
        todos.add("   "),
        Err(ServiceError::InvalidInput(_))
    ));

    let toggled = todos.toggle(&first.id).unwrap();
    assert!(toggled.completed);
    let raised = todos.set_priority(&second.id, Priority::High).unwrap();
    assert_eq!(raised.priority, Priority::High);

    assert_eq!(todos.list(TodoFilter::All).len(), 2);
    assert_eq!(todos.list(TodoFilter::Completed)[0].id, first.id);
    assert_eq!(todos.list(TodoFilter::Active)[0].id, second.id);
    let counts = todos.counts();
    assert_eq!((counts.total, counts.active, counts.completed), (2, 1, 1));

    todos.delete(&first.id).unwrap();
    assert!(matches!(
        todos.delete(&first.id),
        Err(ServiceError::NotFound { collection: "todo", .. })
    ));
    assert!(matches!(
        todos.toggle("missing"),
        Err(ServiceError::NotFound { .. })
    ));
    assert_eq!(todos.counts().total, 1);
}

#[test]
fn calendar_add_validates_and_orders_events() {
    let (assistant, _clock) = assistant_with_clock();
    let calendar = assistant.calendar();

    assert!(matches!(
        calendar.add(NewEvent {
            title: " ".to_string(),
            date: Some(date(10, 20)),
            ..NewEvent::default()
        }),
        Err(ServiceError::InvalidInput(_))
    ));
    assert!(matches!(
        calendar.add(NewEvent {
            title: "무제".to_string(),
            ..NewEvent::default()
        }),
        Err(ServiceError::InvalidInput(_))
    ));

    let late = calendar
        .add(NewEvent {
            title: "저녁".to_string(),
            date: Some(date(10, 21)),
            time: Some("19:00".to_string()),
            ..NewEvent::default()
        })
        .unwrap();
    let early = calendar
        .add(NewEvent {
            title: "조회".to_string(),
            description: Some(String::new()),
            date: Some(date(10, 21)),
            time: Some(String::new()),
        })
        .unwrap();
    let before = calendar
        .add(NewEvent {
            title: "출장".to_string(),
            date: Some(date(10, 20)),
            ..NewEvent::default()
        })
        .unwrap();

    assert_eq!(early.time, None);
    assert_eq!(early.description, None);
    let ordered: Vec<_> = calendar
        .all_sorted()
        .into_iter()
        .map(|event| event.id)
        .collect();
    assert_eq!(ordered, vec![before.id.clone(), early.id.clone(), late.id.clone()]);
    assert_eq!(calendar.on_date(date(10, 21)).len(), 2);

    calendar.delete(&late.id).unwrap();
    assert!(matches!(
        calendar.delete(&late.id),
        Err(ServiceError::NotFound { collection: "event", .. })
    ));
}

#[test]
fn same_day_events_sort_by_parsed_time_of_day() {
    let (assistant, _clock) = assistant_with_clock();
    let calendar = assistant.calendar();
    let add = |title: &str, time: Option<&str>| {
        calendar
            .add(NewEvent {
                title: title.to_string(),
                date: Some(date(10, 20)),
                time: time.map(str::to_string),
                ..NewEvent::default()
            })
            .unwrap();
    };

    add("오후 회의", Some("14:00"));
    add("아침 운동", Some("9:00"));
    add("점심", Some("12시"));
    add("출근", Some("8시"));
    add("언젠가", Some("나중에"));
    add("하루 종일", None);

    let titles: Vec<_> = calendar
        .all_sorted()
        .into_iter()
        .map(|event| event.title)
        .collect();
    assert_eq!(
        titles,
        vec!["하루 종일", "출근", "아침 운동", "점심", "오후 회의", "언젠가"]
    );
}

#[test]
fn note_edit_refreshes_updated_at_and_parses_tags() {
    let (assistant, clock) = assistant_with_clock();
    let notes = assistant.notes();

    let older = notes.create_blank().unwrap();
    let newer = notes.create_blank().unwrap();
    assert_eq!(older.title, "새 메모");
    assert_eq!(notes.list()[0].id, newer.id);

    clock.advance(Duration::minutes(5));
    let edited = notes
        .update(
            &older.id,
            NoteEdit {
                title: String::new(),
                content: "Rust 학습 계획".to_string(),
                tags: "study, ,Rust ".to_string(),
            },
        )
        .unwrap();
    assert_eq!(edited.title, "제목 없음");
    assert_eq!(edited.tags, vec!["study".to_string(), "Rust".to_string()]);
    assert_eq!(edited.created_at, older.created_at);
    assert_eq!(edited.updated_at, older.created_at + Duration::minutes(5));
    assert_eq!(notes.get(&older.id), Some(edited.clone()));

    assert_eq!(notes.search("rust").len(), 1);
    assert_eq!(notes.search("STUDY")[0].id, older.id);
    assert_eq!(notes.search("  ").len(), 2);
    assert!(notes.search("없는 단어").is_empty());

    notes.delete(&newer.id).unwrap();
    assert!(notes.get(&newer.id).is_none());
    assert!(matches!(
        notes.update(&newer.id, NoteEdit::default()),
        Err(ServiceError::NotFound { collection: "note", .. })
    ));
}
