use chrono::{NaiveDate, TimeZone, Utc};
use jarvis_core::db::open_db_in_memory;
use jarvis_core::{
    classify_at, Assistant, CommandAction, ExtractedData, FixedClock, IntentType,
    MemoryKeyValueStore, SequentialIdGenerator, SessionError, SqliteKeyValueStore,
    StorageService, HISTORY_LIMIT,
};
use std::rc::Rc;
use std::time::Duration;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn memory_assistant() -> Assistant<MemoryKeyValueStore> {
    let clock = Rc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap(),
    ));
    Assistant::with_parts(
        StorageService::new(MemoryKeyValueStore::new()),
        Box::new(clock),
        Box::new(SequentialIdGenerator::new()),
    )
}

#[test]
fn todo_keyword_with_separator_extracts_trimmed_remainder() {
    let cases = [
        ("할일 회의 준비하기 추가", "회의 준비하기 추가"),
        ("할 일: 보고서 제출", "보고서 제출"),
        ("todo   stretch  ", "stretch"),
        ("운동 등록：스쿼트", "스쿼트"),
        ("생성 새 프로젝트", "새 프로젝트"),
    ];
    for (input, expected) in cases {
        let parsed = classify_at(input, today());
        assert_eq!(parsed.intent_type, IntentType::Todo, "{input}");
        assert_eq!(
            parsed.data,
            ExtractedData::Todo {
                text: expected.to_string()
            },
            "{input}"
        );
    }
}

#[test]
fn calendar_clock_time_is_copied_verbatim() {
    for (input, time) in [
        ("일정 9:05 스탠드업", "9:05"),
        ("calendar dentist at 14:30", "14:30"),
        ("예약 미용실 3/2 11:00", "11:00"),
    ] {
        let parsed = classify_at(input, today());
        assert_eq!(parsed.intent_type, IntentType::Calendar, "{input}");
        match parsed.data {
            ExtractedData::Calendar { time: found, .. } => {
                assert_eq!(found.as_deref(), Some(time), "{input}")
            }
            other => panic!("unexpected payload for {input}: {other:?}"),
        }
    }
}

#[test]
fn greeting_yields_chat_reply() {
    let parsed = classify_at("안녕", today());
    assert_eq!(parsed.intent_type, IntentType::Unknown);
    assert_eq!(parsed.action, CommandAction::Chat);
    assert_eq!(parsed.message, "안녕하세요! 무엇을 도와드릴까요?");
}

#[test]
fn ask_persists_records_and_history_newest_first() {
    let assistant = memory_assistant();

    let reply = assistant.ask("할일 회의 준비하기 추가");
    assert_eq!(reply, "할 일 \"회의 준비하기 추가\"을(를) 추가했습니다.");
    assistant.ask("일정 내일 오후 3시 미팅");
    assistant.ask("메모 프로젝트 아이디어");
    assistant.ask("전체 목록 보여줘");

    let events = assistant.storage().events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].date, today());
    assert_eq!(events[0].time.as_deref(), Some("3시"));

    let history = assistant.executor().history();
    let intents: Vec<IntentType> = history.iter().map(|entry| entry.intent_type).collect();
    assert_eq!(
        intents,
        vec![
            IntentType::Unknown,
            IntentType::Note,
            IntentType::Calendar,
            IntentType::Todo
        ]
    );
    assert_eq!(history[0].action, CommandAction::List);
    assert_eq!(assistant.storage().todos().len(), 1);
    assert_eq!(assistant.storage().notes().len(), 1);
}

#[test]
fn empty_payload_is_persisted_as_is() {
    let assistant = memory_assistant();

    // Trailing whitespace satisfies the tail pattern but trims to nothing.
    assistant.ask("할일 ");

    let todos = assistant.storage().todos();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].text, "");
}

#[test]
fn history_keeps_the_latest_fifty_entries_in_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let assistant = Assistant::new(SqliteKeyValueStore::new(&conn));

    for index in 1..=HISTORY_LIMIT + 1 {
        assistant.ask(&format!("할일 작업 {index}"));
    }

    let history = assistant.executor().history();
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history[0].raw_text, format!("할일 작업 {}", HISTORY_LIMIT + 1));
    assert_eq!(history[HISTORY_LIMIT - 1].raw_text, "할일 작업 2");
    assert!(history.iter().all(|entry| entry.raw_text != "할일 작업 1"));
    assert_eq!(assistant.storage().todos().len(), HISTORY_LIMIT + 1);
}

#[test]
fn session_defers_and_cancels_submissions() {
    let assistant = memory_assistant();
    let mut session = assistant.session(Duration::from_millis(5));

    let first = session.submit("메모 버릴 내용").unwrap();
    assert_eq!(session.submit("할일 x"), Err(SessionError::Busy));
    session.cancel(first).unwrap();

    let second = session.submit("할일 빨래").unwrap();
    let reply = session.complete(second).unwrap();
    assert_eq!(reply, "할 일 \"빨래\"을(를) 추가했습니다.");

    assert!(assistant.storage().notes().is_empty());
    assert_eq!(assistant.storage().todos().len(), 1);
    assert_eq!(session.recent_history(5).len(), 1);
}
