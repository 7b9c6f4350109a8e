// ExpansionCursor: the candidates of the current input token and a read
// position into them.
//
// States:
//   Empty      -- nothing loaded since construction
//   Loaded     -- candidates loaded (possibly zero), not all of them pulled
//   Exhausted  -- every candidate has been pulled
//
// `reset` enters Loaded from any state and drops the previous candidates.
// `pull` past the end is a no-op returning None; the host may ask for
// another token speculatively. A cursor loaded with zero candidates stays
// Loaded: its pulls return None and change nothing.

use lemmatize_core::Candidate;

/// Observable state of an [`ExpansionCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// No candidates have been loaded yet.
    Empty,
    /// `len` candidates loaded, `position` of them already pulled.
    Loaded { len: usize, position: usize },
    /// All loaded candidates have been pulled.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Empty,
    Loaded,
    Exhausted,
}

/// Pull cursor over one token's candidates.
#[derive(Debug, Default)]
pub struct ExpansionCursor {
    candidates: Vec<Candidate>,
    position: usize,
    phase: Phase,
}

impl ExpansionCursor {
    /// Create a cursor in the `Empty` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a new candidate sequence and rewind to its start.
    pub fn reset(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.position = 0;
        self.phase = Phase::Loaded;
    }

    /// Return the next candidate, or `None` once exhausted.
    pub fn pull(&mut self) -> Option<&Candidate> {
        if self.phase != Phase::Loaded {
            return None;
        }
        // Only reachable with zero candidates loaded; nothing changes.
        if self.position == self.candidates.len() {
            return None;
        }
        let index = self.position;
        self.position += 1;
        if self.position == self.candidates.len() {
            self.phase = Phase::Exhausted;
        }
        Some(&self.candidates[index])
    }

    /// Number of candidates not yet pulled.
    pub fn remaining(&self) -> usize {
        self.candidates.len() - self.position
    }

    /// Number of candidates loaded by the last reset.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn state(&self) -> CursorState {
        match self.phase {
            Phase::Empty => CursorState::Empty,
            Phase::Loaded => CursorState::Loaded {
                len: self.candidates.len(),
                position: self.position,
            },
            Phase::Exhausted => CursorState::Exhausted,
        }
    }

    /// True when a pull would return nothing.
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.candidates.len()
    }
}
