//! To-do list use-cases.
//!
//! # Invariants
//! - New items are appended in creation order, open, medium priority.
//! - Mutations rewrite the whole collection.

use crate::model::id::RecordId;
use crate::model::todo::{Priority, Todo};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::ServiceContext;
use log::info;

const COLLECTION: &str = "todo";

/// Visibility filter for `TodoService::list`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TodoFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TodoFilter {
    fn accepts(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

pub struct TodoService<'a, S: KeyValueStore> {
    ctx: ServiceContext<'a, S>,
}

impl<'a, S: KeyValueStore> TodoService<'a, S> {
    pub fn new(ctx: ServiceContext<'a, S>) -> Self {
        Self { ctx }
    }

    /// Appends a new item with trimmed `text`.
    ///
    /// # Errors
    /// - `InvalidInput` when `text` is blank.
    pub fn add(&self, text: &str) -> ServiceResult<Todo> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::InvalidInput("todo text is empty"));
        }

        let todo = Todo::new(self.ctx.ids.next_id(), text, self.ctx.clock.now());
        let mut todos = self.ctx.storage.todos();
        todos.push(todo.clone());
        self.ctx.storage.save_todos(&todos)?;
        info!("event=todo_add module=service status=ok");
        Ok(todo)
    }

    /// Flips the completion flag.
    pub fn toggle(&self, id: &str) -> ServiceResult<Todo> {
        self.modify(id, |todo| todo.completed = !todo.completed)
    }

    pub fn set_priority(&self, id: &str, priority: Priority) -> ServiceResult<Todo> {
        self.modify(id, |todo| todo.priority = priority)
    }

    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        let mut todos = self.ctx.storage.todos();
        let before = todos.len();
        todos.retain(|todo| todo.id != id);
        if todos.len() == before {
            return Err(not_found(id));
        }
        self.ctx.storage.save_todos(&todos)?;
        info!("event=todo_delete module=service status=ok");
        Ok(())
    }

    pub fn list(&self, filter: TodoFilter) -> Vec<Todo> {
        self.ctx
            .storage
            .todos()
            .into_iter()
            .filter(|todo| filter.accepts(todo))
            .collect()
    }

    pub fn counts(&self) -> TodoCounts {
        let todos = self.ctx.storage.todos();
        let completed = todos.iter().filter(|todo| todo.completed).count();
        TodoCounts {
            total: todos.len(),
            active: todos.len() - completed,
            completed,
        }
    }

    fn modify(&self, id: &str, change: impl FnOnce(&mut Todo)) -> ServiceResult<Todo> {
        let mut todos = self.ctx.storage.todos();
        let todo = todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or_else(|| not_found(id))?;
        change(todo);
        let updated = todo.clone();
        self.ctx.storage.save_todos(&todos)?;
        Ok(updated)
    }
}

fn not_found(id: &str) -> ServiceError {
    ServiceError::NotFound {
        collection: COLLECTION,
        id: RecordId::from(id),
    }
}
