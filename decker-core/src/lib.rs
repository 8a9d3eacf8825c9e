//! Session engine for the decker terminal.
//!
//! This crate provides:
//! - A typewriter output scheduler with a single shared completion handle
//! - A permissive shell-like line parser
//! - A modal input stack for multi-step sub-dialogues
//! - A session controller routing lines to blocks or commands
//! - A command resolver with generic field access over the character store
//!
//! # Quick start
//!
//! ```ignore
//! use decker_core::{boot_sequence, CharacterStore, Scheduler, Session};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut store = CharacterStore::new();
//!     store.load("./character.json").expect("character file");
//!
//!     let mut session = Session::new(Scheduler::new(), store);
//!     boot_sequence(&session).await;
//!
//!     session.handle_line("gold +25");
//!     session.out.flushed().await;
//! }
//! ```

pub mod boot;
pub mod commands;
pub mod dice;
pub mod parse;
pub mod resolve;
pub mod scheduler;
pub mod session;
pub mod skills;
pub mod stack;
pub mod store;
pub mod style;
pub mod testing;

// Primary public API
pub use boot::boot_sequence;
pub use parse::{parse_line, FlagValue, Flags, ParsedCommand};
pub use resolve::{Command, CommandRegistry, Resolution};
pub use scheduler::{FlushHandle, Scheduler};
pub use session::Session;
pub use stack::{InputStack, DEFAULT_LABEL};
pub use store::{CharacterStore, FieldError, StoreError};
