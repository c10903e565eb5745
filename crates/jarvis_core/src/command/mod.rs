//! Free-text command pipeline: classify, then execute.
//!
//! # Responsibility
//! - Classify raw input into an intent with extracted payload.
//! - Execute intents against storage and keep a bounded history.
//! - Defer execution behind a cancelable delay.

pub mod classifier;
pub mod executor;
pub mod session;
