// Session: one tokenization stream's view of the lemmatizer.
//
// The host drives a session as `push, pull*, push, pull*, ...`. A push
// analyzes the raw token, loads the candidates into the cursor and emits the
// first one; pulls emit the rest. Analysis failures and empty results fall
// back to passing the raw token through unchanged, so one bad token never
// ends the stream.
//
// Emitted lemmas are copied into a fixed host-sized buffer and truncated at
// the same boundary every time.

use lemmatize_core::token::{MAX_TOKEN_BYTES, clip};
use lemmatize_core::{Analyzer, TokenBuf};

use crate::config::OverlongPolicy;
use crate::cursor::ExpansionCursor;

/// Where the result of a push lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    /// The raw token passes through; hand the host its own token back.
    Original,
    /// The first lemma is in [`Session::result`].
    Buffer,
}

/// Outcome of [`Session::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pushed {
    pub emit: Emit,
    /// Number of further lemmas available through pulls.
    pub extra: usize,
}

/// Diagnostic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Raw tokens pushed.
    pub tokens_in: u64,
    /// Lemmas emitted by pushes and pulls together.
    pub tokens_out: u64,
    /// Pushes that fell back to the raw token.
    pub passed_through: u64,
}

/// Per-stream lemmatizer state.
pub struct Session<A: Analyzer> {
    analyzer: A,
    cursor: ExpansionCursor,
    result: TokenBuf,
    overlong: OverlongPolicy,
    stats: SessionStats,
}

impl<A: Analyzer> Session<A> {
    pub fn new(analyzer: A) -> Self {
        Self::with_policy(analyzer, OverlongPolicy::default())
    }

    pub fn with_policy(analyzer: A, overlong: OverlongPolicy) -> Self {
        Self {
            analyzer,
            cursor: ExpansionCursor::new(),
            result: TokenBuf::new(),
            overlong,
            stats: SessionStats::default(),
        }
    }

    /// Push a raw token and emit its first lemma.
    ///
    /// Any candidates still pending from the previous token are discarded.
    pub fn push(&mut self, raw: &str) -> Pushed {
        if raw.len() > MAX_TOKEN_BYTES && self.overlong == OverlongPolicy::PassThrough {
            log::debug!("token of {} bytes passed through unanalyzed", raw.len());
            return self.pass_through();
        }

        self.stats.tokens_in += 1;
        let candidates = match self.analyzer.analyze(clip(raw, MAX_TOKEN_BYTES)) {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("analysis of '{raw}' failed: {e}");
                Vec::new()
            }
        };

        self.cursor.reset(candidates);
        let extra = self.cursor.len().saturating_sub(1);

        if self.emit_next() {
            Pushed {
                emit: Emit::Buffer,
                extra,
            }
        } else {
            self.fall_back()
        }
    }

    /// Take a token without analyzing it; the caller indexes it unchanged.
    ///
    /// Counts as a push: pending candidates of the previous token are
    /// discarded.
    pub fn pass_through(&mut self) -> Pushed {
        self.stats.tokens_in += 1;
        self.cursor.reset(Vec::new());
        self.fall_back()
    }

    fn fall_back(&mut self) -> Pushed {
        self.result.clear();
        self.stats.passed_through += 1;
        Pushed {
            emit: Emit::Original,
            extra: 0,
        }
    }

    /// Push a raw token; returns the token to index in its place and the
    /// number of extra tokens to pull.
    pub fn push_token<'a>(&'a mut self, raw: &'a str) -> (&'a str, usize) {
        let pushed = self.push(raw);
        match pushed.emit {
            Emit::Original => (raw, 0),
            Emit::Buffer => (self.result.as_str(), pushed.extra),
        }
    }

    /// Emit the next pending lemma of the current token, or `None` once all
    /// have been emitted. Safe to call any number of times.
    pub fn pull_extra_token(&mut self) -> Option<&str> {
        if self.emit_next() {
            Some(self.result.as_str())
        } else {
            None
        }
    }

    fn emit_next(&mut self) -> bool {
        let Some(candidate) = self.cursor.pull() else {
            return false;
        };
        if self.result.set(candidate.lemma()) {
            log::debug!("lemma truncated to {MAX_TOKEN_BYTES} bytes");
        }
        self.stats.tokens_out += 1;
        true
    }

    /// Buffer holding the most recently emitted lemma.
    pub fn result(&self) -> &TokenBuf {
        &self.result
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn overlong(&self) -> OverlongPolicy {
        self.overlong
    }

    pub fn set_overlong(&mut self, overlong: OverlongPolicy) {
        self.overlong = overlong;
    }
}

impl<A: Analyzer> Drop for Session<A> {
    fn drop(&mut self) {
        log::debug!(
            "session done: tokens {}({}), passed through {}",
            self.stats.tokens_in,
            self.stats.tokens_out,
            self.stats.passed_through
        );
    }
}
