// Candidate: one normal form proposed by a morphological analyzer.

/// One possible normal form of an input token.
///
/// Analyzers return candidates in their own ranked order (most probable
/// first). That order decides which lemma takes the original token's
/// position, so nothing downstream reorders or deduplicates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    lemma: String,
}

impl Candidate {
    /// Create a candidate from a normal form.
    pub fn new(lemma: impl Into<String>) -> Self {
        Self {
            lemma: lemma.into(),
        }
    }

    /// The normal form.
    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    /// Consume the candidate, returning the normal form.
    pub fn into_lemma(self) -> String {
        self.lemma
    }
}

impl From<&str> for Candidate {
    fn from(lemma: &str) -> Self {
        Self::new(lemma)
    }
}

impl From<String> for Candidate {
    fn from(lemma: String) -> Self {
        Self::new(lemma)
    }
}
