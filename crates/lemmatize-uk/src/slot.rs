// EngineSlot: the process-wide engine and who owns it.
//
// At most one engine is live per slot. The first successful `load_with`
// brings it up and is told it is the owner; later loads share it. Only the
// owner's `unload` tears it down.
//
// Sessions reach the engine through `EngineHandle`, which holds the slot's
// read lock for a single analyze call. Unload takes the write lock, so it
// waits for in-flight calls and later calls see an empty slot.

use std::sync::RwLock;

use lemmatize_core::token::{MAX_TOKEN_BYTES, clip};
use lemmatize_core::{AnalysisError, Analyzer, Candidate, InitError};

use crate::engine::MorphEngine;

/// Whether a `load_with` call performed the initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// This caller brought the engine up and must tear it down.
    Owner,
    /// The engine was already loaded by someone else.
    Shared,
}

/// Holder for the process-wide engine.
pub struct EngineSlot {
    engine: RwLock<Option<Box<dyn MorphEngine>>>,
}

impl EngineSlot {
    pub const fn new() -> Self {
        Self {
            engine: RwLock::new(None),
        }
    }

    /// Bring the engine up with `init` unless one is already loaded.
    pub fn load_with<F>(&self, init: F) -> Result<Ownership, InitError>
    where
        F: FnOnce() -> Result<Box<dyn MorphEngine>, InitError>,
    {
        let mut slot = match self.engine.write() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if slot.is_some() {
            return Ok(Ownership::Shared);
        }
        let engine = init()?;
        log::debug!("{} engine loaded", engine.name());
        *slot = Some(engine);
        Ok(Ownership::Owner)
    }

    /// Tear the engine down if `ownership` is [`Ownership::Owner`].
    ///
    /// Returns `true` if an engine was shut down.
    pub fn unload(&self, ownership: Ownership) -> bool {
        if ownership != Ownership::Owner {
            return false;
        }
        let engine = match self.engine.write() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match engine {
            Some(engine) => {
                log::debug!("{} engine unloaded", engine.name());
                engine.shutdown();
                true
            }
            None => false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.engine.read().map(|s| s.is_some()).unwrap_or(false)
    }

    /// Name of the loaded engine, if any.
    pub fn engine_name(&self) -> Option<&'static str> {
        self.engine.read().ok()?.as_ref().map(|e| e.name())
    }

    /// An analyzer that forwards to whatever engine is loaded at call time.
    pub fn handle(&self) -> EngineHandle<'_> {
        EngineHandle { slot: self }
    }
}

impl Default for EngineSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyzer view of an [`EngineSlot`].
#[derive(Clone, Copy)]
pub struct EngineHandle<'a> {
    slot: &'a EngineSlot,
}

impl Analyzer for EngineHandle<'_> {
    fn analyze(&self, word: &str) -> Result<Vec<Candidate>, AnalysisError> {
        let slot = self
            .slot
            .engine
            .read()
            .map_err(|_| AnalysisError::EngineUnavailable)?;
        let engine = slot.as_ref().ok_or(AnalysisError::EngineUnavailable)?;
        engine.analyze(clip(word, MAX_TOKEN_BYTES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::engine::LexiconEngine;

    /// Counts shutdowns and records the longest word it was asked about.
    struct Probe {
        shutdowns: Arc<AtomicUsize>,
        longest: Arc<AtomicUsize>,
    }

    impl Analyzer for Probe {
        fn analyze(&self, word: &str) -> Result<Vec<Candidate>, AnalysisError> {
            self.longest.fetch_max(word.len(), Ordering::SeqCst);
            Ok(vec![Candidate::new(word)])
        }
    }

    impl MorphEngine for Probe {
        fn name(&self) -> &'static str {
            "probe"
        }

        fn shutdown(self: Box<Self>) {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn probe() -> (Box<dyn MorphEngine>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let shutdowns = Arc::new(AtomicUsize::new(0));
        let longest = Arc::new(AtomicUsize::new(0));
        let engine = Box::new(Probe {
            shutdowns: Arc::clone(&shutdowns),
            longest: Arc::clone(&longest),
        });
        (engine, shutdowns, longest)
    }

    #[test]
    fn empty_slot_is_unavailable() {
        let slot = EngineSlot::new();
        assert!(!slot.is_loaded());
        assert_eq!(
            slot.handle().analyze("дому"),
            Err(AnalysisError::EngineUnavailable)
        );
    }

    #[test]
    fn first_load_owns_second_shares() {
        let slot = EngineSlot::new();
        let (engine, shutdowns, _) = probe();
        assert_eq!(slot.load_with(|| Ok(engine)), Ok(Ownership::Owner));

        let mut second_init_ran = false;
        let second = slot.load_with(|| {
            second_init_ran = true;
            Ok(Box::new(LexiconEngine::default()) as Box<dyn MorphEngine>)
        });
        assert_eq!(second, Ok(Ownership::Shared));
        assert!(!second_init_ran);
        assert_eq!(slot.engine_name(), Some("probe"));

        assert!(!slot.unload(Ownership::Shared));
        assert!(slot.is_loaded());
        assert!(slot.unload(Ownership::Owner));
        assert!(!slot.is_loaded());
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_init_leaves_slot_empty() {
        let slot = EngineSlot::new();
        let err = slot
            .load_with(|| Err(InitError::ImportFailed("pymorphy2".into())))
            .unwrap_err();
        assert_eq!(err, InitError::ImportFailed("pymorphy2".into()));
        assert!(!slot.is_loaded());
        assert!(!slot.unload(Ownership::Owner));
    }

    #[test]
    fn handle_sees_unload() {
        let slot = EngineSlot::new();
        let (engine, _, _) = probe();
        slot.load_with(|| Ok(engine)).unwrap();
        let handle = slot.handle();
        assert_eq!(handle.analyze("хата").unwrap(), vec![Candidate::new("хата")]);
        slot.unload(Ownership::Owner);
        assert_eq!(handle.analyze("хата"), Err(AnalysisError::EngineUnavailable));
    }

    #[test]
    fn handle_never_passes_more_than_the_buffer() {
        let slot = EngineSlot::new();
        let (engine, _, longest) = probe();
        slot.load_with(|| Ok(engine)).unwrap();
        slot.handle().analyze(&"ї".repeat(400)).unwrap();
        assert!(longest.load(Ordering::SeqCst) <= MAX_TOKEN_BYTES);
    }

    #[test]
    fn concurrent_handles_share_one_engine() {
        let slot = EngineSlot::new();
        slot.load_with(|| {
            Ok(Box::new(LexiconEngine::parse("дому\tдім\tдома\n")?) as Box<dyn MorphEngine>)
        })
        .unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let handle = slot.handle();
                    for _ in 0..100 {
                        assert_eq!(handle.analyze("дому").unwrap().len(), 2);
                    }
                });
            }
        });
    }
}
