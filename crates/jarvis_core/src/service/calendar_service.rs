//! Calendar use-cases.

use crate::model::event::CalendarEvent;
use crate::model::id::RecordId;
use crate::repo::kv_repo::KeyValueStore;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::ServiceContext;
use chrono::NaiveDate;
use log::info;

const COLLECTION: &str = "event";

/// Form input for a new event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

pub struct CalendarService<'a, S: KeyValueStore> {
    ctx: ServiceContext<'a, S>,
}

impl<'a, S: KeyValueStore> CalendarService<'a, S> {
    pub fn new(ctx: ServiceContext<'a, S>) -> Self {
        Self { ctx }
    }

    /// Appends an event.
    ///
    /// Empty `description`/`time` strings are stored as absent.
    ///
    /// # Errors
    /// - `InvalidInput` when the title is blank or the date is missing.
    pub fn add(&self, request: NewEvent) -> ServiceResult<CalendarEvent> {
        if request.title.trim().is_empty() {
            return Err(ServiceError::InvalidInput("event title is empty"));
        }
        let date = request
            .date
            .ok_or(ServiceError::InvalidInput("event date is missing"))?;

        let mut event = CalendarEvent::new(self.ctx.ids.next_id(), request.title, date);
        event.description = request.description.filter(|value| !value.is_empty());
        event.time = request.time.filter(|value| !value.trim().is_empty());

        let mut events = self.ctx.storage.events();
        events.push(event.clone());
        self.ctx.storage.save_events(&events)?;
        info!("event=calendar_add module=service status=ok");
        Ok(event)
    }

    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        let mut events = self.ctx.storage.events();
        let before = events.len();
        events.retain(|event| event.id != id);
        if events.len() == before {
            return Err(ServiceError::NotFound {
                collection: COLLECTION,
                id: RecordId::from(id),
            });
        }
        self.ctx.storage.save_events(&events)?;
        info!("event=calendar_delete module=service status=ok");
        Ok(())
    }

    /// Events on `date`, in insertion order.
    pub fn on_date(&self, date: NaiveDate) -> Vec<CalendarEvent> {
        self.ctx
            .storage
            .events()
            .into_iter()
            .filter(|event| event.date == date)
            .collect()
    }

    /// All events ordered by date, then time of day.
    ///
    /// Within a date, untimed events come first and times that do not
    /// parse come last. Ties keep insertion order.
    pub fn all_sorted(&self) -> Vec<CalendarEvent> {
        let mut events = self.ctx.storage.events();
        events.sort_by_key(|event| (event.date, time_sort_key(event.time.as_deref())));
        events
    }
}

fn time_sort_key(time: Option<&str>) -> (u8, u32) {
    match time {
        None => (0, 0),
        Some(raw) => match minutes_since_midnight(raw) {
            Some(minutes) => (1, minutes),
            None => (2, 0),
        },
    }
}

/// Parses `H:MM`, `HH:MM` or `N시` into minutes since midnight.
fn minutes_since_midnight(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let (hour, minute) = match raw.strip_suffix('시') {
        Some(hour) => (hour, "0"),
        None => {
            let (hour, minute) = raw.split_once(':')?;
            if minute.len() != 2 {
                return None;
            }
            (hour, minute)
        }
    };
    if !is_short_ascii_number(hour) || !is_short_ascii_number(minute) {
        return None;
    }
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    (hour < 24 && minute < 60).then_some(hour * 60 + minute)
}

fn is_short_ascii_number(value: &str) -> bool {
    (1..=2).contains(&value.len()) && value.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::{minutes_since_midnight, time_sort_key};

    #[test]
    fn clock_and_korean_hour_forms_parse_to_minutes() {
        assert_eq!(minutes_since_midnight("9:00"), Some(540));
        assert_eq!(minutes_since_midnight("14:30"), Some(870));
        assert_eq!(minutes_since_midnight("9시"), Some(540));
        assert_eq!(minutes_since_midnight("10시"), Some(600));
        assert_eq!(minutes_since_midnight("25:00"), None);
        assert_eq!(minutes_since_midnight("저녁"), None);
        assert_eq!(minutes_since_midnight("١٢:٣٠"), None);
    }

    #[test]
    fn untimed_sorts_before_timed_and_unparsed_last() {
        let mut keys = vec![
            time_sort_key(Some("오후")),
            time_sort_key(Some("10시")),
            time_sort_key(Some("9시")),
            time_sort_key(None),
        ];
        keys.sort();
        assert_eq!(keys, vec![(0, 0), (1, 540), (1, 600), (2, 0)]);
    }
}
