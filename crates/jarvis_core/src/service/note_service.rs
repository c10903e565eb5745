//! Note use-cases.
//!
//! # Responsibility
//! - Create, edit, delete and search notes.
//! - Parse comma-separated tag input.
//!
//! # Invariants
//! - New blank notes are placed at the front of the collection.
//! - Every edit refreshes `updated_at`; `created_at` never changes.
//! - An edit with an empty title stores `UNTITLED_NOTE_TITLE`.

use crate::model::id::RecordId;
use crate::model::note::Note;
use crate::repo::kv_repo::KeyValueStore;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::ServiceContext;
use log::info;

pub const NEW_NOTE_TITLE: &str = "새 메모";
pub const UNTITLED_NOTE_TITLE: &str = "제목 없음";

const COLLECTION: &str = "note";

/// Full replacement of a note's editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteEdit {
    pub title: String,
    pub content: String,
    /// Comma-separated tags as typed by the user.
    pub tags: String,
}

pub struct NoteService<'a, S: KeyValueStore> {
    ctx: ServiceContext<'a, S>,
}

impl<'a, S: KeyValueStore> NoteService<'a, S> {
    pub fn new(ctx: ServiceContext<'a, S>) -> Self {
        Self { ctx }
    }

    /// Inserts an empty note titled `NEW_NOTE_TITLE` at the front.
    pub fn create_blank(&self) -> ServiceResult<Note> {
        let note = Note::new(
            self.ctx.ids.next_id(),
            NEW_NOTE_TITLE,
            "",
            self.ctx.clock.now(),
        );
        let mut notes = self.ctx.storage.notes();
        notes.insert(0, note.clone());
        self.ctx.storage.save_notes(&notes)?;
        info!("event=note_create module=service status=ok");
        Ok(note)
    }

    /// Replaces title, content and tags of one note.
    pub fn update(&self, id: &str, edit: NoteEdit) -> ServiceResult<Note> {
        let now = self.ctx.clock.now();
        let mut notes = self.ctx.storage.notes();
        let note = notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or_else(|| not_found(id))?;

        note.title = if edit.title.is_empty() {
            UNTITLED_NOTE_TITLE.to_string()
        } else {
            edit.title
        };
        note.content = edit.content;
        note.tags = parse_tags(&edit.tags);
        note.updated_at = now;
        let updated = note.clone();

        self.ctx.storage.save_notes(&notes)?;
        info!(
            "event=note_update module=service status=ok tag_count={}",
            updated.tags.len()
        );
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        let mut notes = self.ctx.storage.notes();
        let before = notes.len();
        notes.retain(|note| note.id != id);
        if notes.len() == before {
            return Err(not_found(id));
        }
        self.ctx.storage.save_notes(&notes)?;
        info!("event=note_delete module=service status=ok");
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Note> {
        self.ctx.storage.notes().into_iter().find(|note| note.id == id)
    }

    pub fn list(&self) -> Vec<Note> {
        self.ctx.storage.notes()
    }

    /// Case-insensitive search over title, content and tags.
    ///
    /// A blank query returns every note.
    pub fn search(&self, query: &str) -> Vec<Note> {
        let needle = query.trim().to_lowercase();
        let notes = self.ctx.storage.notes();
        if needle.is_empty() {
            return notes;
        }
        notes
            .into_iter()
            .filter(|note| note.matches(&needle))
            .collect()
    }
}

/// Splits on commas, trims, and drops empty entries. Order is preserved.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn not_found(id: &str) -> ServiceError {
    ServiceError::NotFound {
        collection: COLLECTION,
        id: RecordId::from(id),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_tags;

    #[test]
    fn parse_tags_trims_and_drops_empty_entries() {
        assert_eq!(
            parse_tags(" work, ,idea ,, 회의"),
            vec!["work".to_string(), "idea".to_string(), "회의".to_string()]
        );
        assert!(parse_tags("  ").is_empty());
    }
}
