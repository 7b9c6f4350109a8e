//! Shared types for the lemmatizing tokenizer plugin.
//!
//! - [`candidate`] -- one lemma interpretation of an input token
//! - [`token`] -- fixed-size token buffer and truncation rules
//! - [`error`] -- initialization and per-token analysis errors
//! - [`analyzer`] -- the analyzer capability shared by all backends

pub mod analyzer;
pub mod candidate;
pub mod error;
pub mod token;

pub use analyzer::Analyzer;
pub use candidate::Candidate;
pub use error::{AnalysisError, InitError};
pub use token::{MAX_TOKEN_LEN, TokenBuf};
