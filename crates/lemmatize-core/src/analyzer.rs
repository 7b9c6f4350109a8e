// Analyzer capability: word in, ranked candidates out.

use std::sync::Arc;

use crate::candidate::Candidate;
use crate::error::AnalysisError;

/// A morphological analyzer.
///
/// Implementations own whatever synchronization their engine needs; callers
/// never see a lock. Zero candidates is a valid answer meaning "could not
/// parse", not an error.
pub trait Analyzer: Send + Sync {
    /// Analyze a word and return its candidate lemmas, most probable first.
    fn analyze(&self, word: &str) -> Result<Vec<Candidate>, AnalysisError>;
}

impl<A: Analyzer + ?Sized> Analyzer for &A {
    fn analyze(&self, word: &str) -> Result<Vec<Candidate>, AnalysisError> {
        (**self).analyze(word)
    }
}

impl<A: Analyzer + ?Sized> Analyzer for Box<A> {
    fn analyze(&self, word: &str) -> Result<Vec<Candidate>, AnalysisError> {
        (**self).analyze(word)
    }
}

impl<A: Analyzer + ?Sized> Analyzer for Arc<A> {
    fn analyze(&self, word: &str) -> Result<Vec<Candidate>, AnalysisError> {
        (**self).analyze(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Analyzer for Echo {
        fn analyze(&self, word: &str) -> Result<Vec<Candidate>, AnalysisError> {
            Ok(vec![Candidate::new(word)])
        }
    }

    #[test]
    fn blanket_impls_delegate() {
        let boxed: Box<dyn Analyzer> = Box::new(Echo);
        let shared: Arc<dyn Analyzer> = Arc::new(Echo);
        assert_eq!(boxed.analyze("a").unwrap(), vec![Candidate::new("a")]);
        assert_eq!(shared.analyze("b").unwrap(), vec![Candidate::new("b")]);
        assert_eq!((&Echo).analyze("c").unwrap(), vec![Candidate::new("c")]);
    }
}
