//! Ukrainian lemmatization for search tokenizers.
//!
//! A host tokenizer pushes one raw token at a time and pulls a variable
//! number of lemmas back. This crate owns that protocol and the analyzers
//! behind it.
//!
//! - [`cursor`] -- per-token candidate cursor (the pull state machine)
//! - [`session`] -- per-stream push/pull orchestration and counters
//! - [`engine`] -- analysis backends (dictionary lexicon, pymorphy2)
//! - [`slot`] -- process-wide engine ownership and locked access
//! - [`config`] -- environment and per-session option parsing
//! - [`logging`] -- forwarding `log` records to the host's callback
//! - [`version`] -- interpreter version gate

pub mod config;
pub mod cursor;
pub mod engine;
pub mod logging;
pub mod session;
pub mod slot;
pub mod version;

pub use config::{BackendKind, Config, OverlongPolicy};
pub use cursor::{CursorState, ExpansionCursor};
pub use session::{Emit, Pushed, Session, SessionStats};
pub use slot::{EngineHandle, EngineSlot, Ownership};
