// Analysis engines.
//
// An engine is an analyzer that is brought up once per process and torn
// down explicitly. `start` picks the backend named by the configuration.

pub mod lexicon;
#[cfg(feature = "pymorphy")]
pub mod pymorphy;

pub use lexicon::LexiconEngine;
#[cfg(feature = "pymorphy")]
pub use pymorphy::PyMorphyEngine;

use lemmatize_core::{Analyzer, InitError};

use crate::config::{BackendKind, Config, ENV_LEXICON};

/// A process-wide analysis engine.
pub trait MorphEngine: Analyzer {
    /// Short backend name for diagnostics.
    fn name(&self) -> &'static str;

    /// Release the engine and anything it started. Called at most once,
    /// by whoever brought the engine up.
    fn shutdown(self: Box<Self>) {}
}

/// Bring up the engine selected by `config`.
pub fn start(config: &Config) -> Result<Box<dyn MorphEngine>, InitError> {
    match config.backend {
        BackendKind::Lexicon => {
            let path = config.lexicon_path.as_deref().ok_or_else(|| {
                InitError::InvalidConfig(format!("lexicon backend needs {ENV_LEXICON}"))
            })?;
            Ok(Box::new(LexiconEngine::open(path)?))
        }
        BackendKind::PyMorphy => start_pymorphy(config),
    }
}

#[cfg(feature = "pymorphy")]
fn start_pymorphy(config: &Config) -> Result<Box<dyn MorphEngine>, InitError> {
    let engine = PyMorphyEngine::start(&config.language, crate::version::MIN_PYTHON)?;
    Ok(Box::new(engine))
}

#[cfg(not(feature = "pymorphy"))]
fn start_pymorphy(_config: &Config) -> Result<Box<dyn MorphEngine>, InitError> {
    Err(InitError::ImportFailed(
        "pymorphy2 support not compiled in (enable the `pymorphy` feature)".to_string(),
    ))
}
