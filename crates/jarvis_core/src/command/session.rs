//! Deferred, cancelable command submission.
//!
//! # Responsibility
//! - Classify a submission immediately and hold its execution until a
//!   fixed "thinking" delay has elapsed.
//! - Allow at most one submission in flight.
//!
//! # Invariants
//! - A cancelled submission is discarded: no record and no history entry.
//! - A ticket completes or cancels at most once.

use crate::command::classifier::classify_at;
use crate::command::executor::CommandExecutor;
use crate::model::command::{CommandRecord, ParsedCommand};
use crate::repo::kv_repo::KeyValueStore;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Delay applied between submit and execution unless configured otherwise.
pub const DEFAULT_THINK_DELAY: Duration = Duration::from_millis(500);

/// Errors raised by session bookkeeping; execution itself never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Input was empty after trimming.
    EmptyInput,
    /// Another submission is still pending.
    Busy,
    /// Ticket does not refer to the pending submission.
    UnknownTicket(u64),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "command text is empty"),
            Self::Busy => write!(f, "a command is already being processed"),
            Self::UnknownTicket(id) => write!(f, "no pending command for ticket {id}"),
        }
    }
}

impl Error for SessionError {}

/// Handle for one pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandTicket {
    pub id: u64,
    pub due_at: Instant,
}

impl CommandTicket {
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due_at
    }
}

#[derive(Debug)]
struct Pending {
    ticket: CommandTicket,
    command: ParsedCommand,
}

/// Command-center state machine wrapping a `CommandExecutor`.
pub struct CommandSession<'a, S: KeyValueStore> {
    executor: CommandExecutor<'a, S>,
    think_delay: Duration,
    pending: Option<Pending>,
    last_ticket: u64,
}

impl<'a, S: KeyValueStore> CommandSession<'a, S> {
    pub fn new(executor: CommandExecutor<'a, S>, think_delay: Duration) -> Self {
        Self {
            executor,
            think_delay,
            pending: None,
            last_ticket: 0,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// The classified command awaiting execution, if any.
    pub fn pending_command(&self) -> Option<&ParsedCommand> {
        self.pending.as_ref().map(|pending| &pending.command)
    }

    /// Classifies `text` against the clock's current date and schedules
    /// its execution.
    ///
    /// # Errors
    /// - `EmptyInput` when `text` is blank.
    /// - `Busy` while a previous ticket is pending.
    pub fn submit(&mut self, text: &str) -> Result<CommandTicket, SessionError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        if self.pending.is_some() {
            return Err(SessionError::Busy);
        }

        let command = classify_at(trimmed, self.executor.today());
        self.last_ticket += 1;
        let ticket = CommandTicket {
            id: self.last_ticket,
            due_at: Instant::now() + self.think_delay,
        };
        debug!(
            "event=command_submit module=command status=ok ticket={} intent={}",
            ticket.id,
            command.intent_type.as_str()
        );
        self.pending = Some(Pending { ticket, command });
        Ok(ticket)
    }

    /// Blocks until the ticket is due, then executes it.
    pub fn complete(&mut self, ticket: CommandTicket) -> Result<String, SessionError> {
        let pending = self.take_pending(ticket)?;
        let remaining = pending
            .ticket
            .due_at
            .saturating_duration_since(Instant::now());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
        Ok(self.executor.execute(&pending.command))
    }

    /// Executes the pending submission if it is due at `now`.
    ///
    /// Intended for event loops that must not block.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.ticket.is_due(now));
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        Some(self.executor.execute(&pending.command))
    }

    /// Discards the pending submission without executing it.
    pub fn cancel(&mut self, ticket: CommandTicket) -> Result<ParsedCommand, SessionError> {
        let pending = self.take_pending(ticket)?;
        info!(
            "event=command_cancel module=command status=ok ticket={}",
            ticket.id
        );
        Ok(pending.command)
    }

    /// Most recent `limit` history entries, newest first.
    pub fn recent_history(&self, limit: usize) -> Vec<CommandRecord> {
        let mut history = self.executor.history();
        history.truncate(limit);
        history
    }

    fn take_pending(&mut self, ticket: CommandTicket) -> Result<Pending, SessionError> {
        match self.pending.take() {
            Some(pending) if pending.ticket.id == ticket.id => Ok(pending),
            other => {
                self.pending = other;
                Err(SessionError::UnknownTicket(ticket.id))
            }
        }
    }
}
