//! Rule-based intent classifier for free-text commands.
//!
//! # Responsibility
//! - Map raw text to a `ParsedCommand` using an ordered list of
//!   `(predicate, extractor)` rules.
//!
//! # Invariants
//! - Rules run in `RULES` order; the first rule whose predicate holds and
//!   whose extractor yields a command wins.
//! - Predicates probe the trimmed, lower-cased text; extractors run their
//!   capture regex on the original text.
//! - A predicate hit whose extractor finds no tail falls through to the
//!   next rule. This is observed behavior and is kept as-is.
//! - Classification never fails; `fallback` always matches.

use crate::model::command::{CommandAction, ExtractedData, IntentType, ParsedCommand};
use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

pub const TODO_KEYWORDS: &[&str] = &["할일", "할 일", "todo", "추가", "등록", "생성"];
pub const CALENDAR_KEYWORDS: &[&str] = &["일정", "약속", "calendar", "스케줄", "예약"];
pub const NOTE_KEYWORDS: &[&str] = &["메모", "note", "기록", "적어", "저장"];
pub const DELETE_KEYWORDS: &[&str] = &["삭제", "지워", "제거", "delete", "remove"];
pub const LIST_KEYWORDS: &[&str] = &["보여", "조회", "확인", "리스트", "목록", "show", "list"];

/// Maximum characters of a note tail kept as its title.
pub const NOTE_TITLE_CHARS: usize = 50;
/// Maximum characters of a note tail echoed in the confirmation.
pub const NOTE_PREVIEW_CHARS: usize = 30;

pub const GREETING_REPLY: &str = "안녕하세요! 무엇을 도와드릴까요?";
pub const THANKS_REPLY: &str = "천만에요, 주인님.";
pub const DELETE_PROMPT: &str = "삭제할 항목을 선택해주세요.";
pub const LIST_REPLY: &str = "목록을 표시합니다.";
pub const HELP_REPLY: &str = "죄송합니다. 잘 이해하지 못했습니다. 할 일, 일정, 메모 추가 명령을 내려주세요.\n예: \"할일 운동 추가\", \"일정 내일 2시 미팅\"";

// Alternation order inside each pattern decides which keyword anchors the
// tail when several keywords start at the same position.
static TODO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(할일|할 일|todo|추가|등록|생성)[\s:：]*(.+)").expect("valid todo regex")
});
static CALENDAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(일정|약속|calendar|스케줄|예약)[\s:：]*(.+)").expect("valid calendar regex")
});
static NOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(메모|note|기록|적어|저장)[\s:：]*(.+)").expect("valid note regex")
});
// Fragment digits are ASCII only; `\d` would also accept other scripts.
static DATE_FRAGMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{1,2})[월/\-.]\s*([0-9]{1,2})일?").expect("valid date fragment regex")
});
static TIME_FRAGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{1,2}:[0-9]{2}|[0-9]{1,2}시").expect("valid time fragment regex"));
static GREETING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(안녕|반가워|hi|hello|hey)").expect("valid greeting regex"));
static THANKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(고마워|감사|thanks|thank you)").expect("valid thanks regex"));

/// Text handed to each rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    /// Original, untouched input.
    pub raw: &'a str,
    /// Trimmed and lower-cased input used by predicates.
    pub lowered: &'a str,
    /// Date used when a calendar command names none.
    pub today: NaiveDate,
}

/// One classification rule.
#[derive(Clone, Copy)]
pub struct CommandRule {
    pub name: &'static str,
    predicate: fn(&RuleInput<'_>) -> bool,
    extractor: fn(&RuleInput<'_>) -> Option<ParsedCommand>,
}

impl CommandRule {
    /// Runs the predicate and, when it holds, the extractor.
    pub fn apply(&self, input: &RuleInput<'_>) -> Option<ParsedCommand> {
        if (self.predicate)(input) {
            (self.extractor)(input)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for CommandRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRule")
            .field("name", &self.name)
            .finish()
    }
}

/// Classification rules in evaluation order.
pub static RULES: &[CommandRule] = &[
    CommandRule {
        name: "todo",
        predicate: |input| contains_any(input.lowered, TODO_KEYWORDS),
        extractor: extract_todo,
    },
    CommandRule {
        name: "calendar",
        predicate: |input| contains_any(input.lowered, CALENDAR_KEYWORDS),
        extractor: extract_calendar,
    },
    CommandRule {
        name: "note",
        predicate: |input| contains_any(input.lowered, NOTE_KEYWORDS),
        extractor: extract_note,
    },
    CommandRule {
        name: "greeting",
        predicate: |input| GREETING_RE.is_match(input.lowered),
        extractor: |input| {
            Some(ParsedCommand::unknown(
                input.raw,
                CommandAction::Chat,
                GREETING_REPLY,
            ))
        },
    },
    CommandRule {
        name: "thanks",
        predicate: |input| THANKS_RE.is_match(input.lowered),
        extractor: |input| {
            Some(ParsedCommand::unknown(
                input.raw,
                CommandAction::Chat,
                THANKS_REPLY,
            ))
        },
    },
    CommandRule {
        name: "delete",
        predicate: |input| contains_any(input.lowered, DELETE_KEYWORDS),
        extractor: |input| {
            Some(ParsedCommand::unknown(
                input.raw,
                CommandAction::Delete,
                DELETE_PROMPT,
            ))
        },
    },
    CommandRule {
        name: "list",
        predicate: |input| contains_any(input.lowered, LIST_KEYWORDS),
        extractor: |input| {
            Some(ParsedCommand::unknown(
                input.raw,
                CommandAction::List,
                LIST_REPLY,
            ))
        },
    },
    CommandRule {
        name: "fallback",
        predicate: |_| true,
        extractor: |input| Some(fallback(input.raw)),
    },
];

/// Names of `RULES` in evaluation order.
pub fn rule_names() -> Vec<&'static str> {
    RULES.iter().map(|rule| rule.name).collect()
}

/// Classifies `text` using today's UTC date for calendar defaults.
pub fn classify(text: &str) -> ParsedCommand {
    classify_at(text, Utc::now().date_naive())
}

/// Classifies `text`, resolving calendar dates relative to `today`.
pub fn classify_at(text: &str, today: NaiveDate) -> ParsedCommand {
    let lowered = text.trim().to_lowercase();
    let input = RuleInput {
        raw: text,
        lowered: lowered.as_str(),
        today,
    };

    RULES
        .iter()
        .find_map(|rule| rule.apply(&input))
        .unwrap_or_else(|| fallback(text))
}

fn fallback(raw: &str) -> ParsedCommand {
    ParsedCommand::unknown(raw, CommandAction::Unknown, HELP_REPLY)
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}

/// Returns the trimmed text following the first keyword match.
fn capture_tail(pattern: &Regex, raw: &str) -> Option<String> {
    pattern
        .captures(raw)
        .and_then(|caps| caps.get(2))
        .map(|tail| tail.as_str().trim().to_string())
}

fn extract_todo(input: &RuleInput<'_>) -> Option<ParsedCommand> {
    let text = capture_tail(&TODO_RE, input.raw)?;
    Some(ParsedCommand {
        raw_text: input.raw.to_string(),
        intent_type: IntentType::Todo,
        action: CommandAction::Create,
        message: format!("할 일 \"{text}\"을(를) 추가했습니다."),
        data: ExtractedData::Todo { text },
    })
}

fn extract_calendar(input: &RuleInput<'_>) -> Option<ParsedCommand> {
    let title = capture_tail(&CALENDAR_RE, input.raw)?;
    let date_caps = DATE_FRAGMENT_RE.captures(&title);
    let date_fragment = date_caps
        .as_ref()
        .and_then(|caps| caps.get(0))
        .map(|fragment| fragment.as_str().to_string());
    let date = date_caps
        .as_ref()
        .and_then(|caps| resolve_month_day(caps.get(1)?.as_str(), caps.get(2)?.as_str(), input.today))
        .unwrap_or(input.today);
    let time = TIME_FRAGMENT_RE
        .find(&title)
        .map(|fragment| fragment.as_str().to_string());

    Some(ParsedCommand {
        raw_text: input.raw.to_string(),
        intent_type: IntentType::Calendar,
        action: CommandAction::Create,
        message: format!("일정 \"{title}\"을(를) 추가했습니다."),
        data: ExtractedData::Calendar {
            title,
            date,
            date_fragment,
            time,
        },
    })
}

fn extract_note(input: &RuleInput<'_>) -> Option<ParsedCommand> {
    let content = capture_tail(&NOTE_RE, input.raw)?;
    let title: String = content.chars().take(NOTE_TITLE_CHARS).collect();
    let preview: String = content.chars().take(NOTE_PREVIEW_CHARS).collect();

    Some(ParsedCommand {
        raw_text: input.raw.to_string(),
        intent_type: IntentType::Note,
        action: CommandAction::Create,
        message: format!("메모 \"{preview}...\"을(를) 저장했습니다."),
        data: ExtractedData::Note { title, content },
    })
}

/// Resolves a month/day pair in `today`'s year; `None` when not a real date.
fn resolve_month_day(month: &str, day: &str, today: NaiveDate) -> Option<NaiveDate> {
    let month = month.parse::<u32>().ok()?;
    let day = day.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(today.year(), month, day)
}
