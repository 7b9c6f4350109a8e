// pymorphy2 backend running in an embedded Python interpreter.
//
// The interpreter is shared with anything else in the process. It is only
// started (and later finalized) here if nobody started it before us; a
// later start after such a finalize brings it up again. Every
// call into Python holds the GIL for exactly that call; `with_gil` releases
// it on every exit path.

use lemmatize_core::{AnalysisError, Analyzer, Candidate, InitError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::MorphEngine;
use crate::version::{PythonVersion, check_version};

/// Bound `MorphAnalyzer.parse` of a pymorphy2 analyzer.
pub struct PyMorphyEngine {
    parse: Py<PyAny>,
    owns_interpreter: bool,
}

impl PyMorphyEngine {
    /// Start the interpreter if needed, import pymorphy2 and construct an
    /// analyzer for `language`.
    ///
    /// On failure nothing is left behind: an interpreter started by this
    /// call is finalized again.
    pub fn start(language: &str, minimum: PythonVersion) -> Result<Self, InitError> {
        // SAFETY: querying the interpreter state has no preconditions.
        let owns_interpreter = unsafe { pyo3::ffi::Py_IsInitialized() } == 0;
        if owns_interpreter {
            initialize_interpreter();
        }

        let parse = Python::with_gil(|py| bind_parse(py, language, minimum));
        match parse {
            Ok(parse) => {
                log::info!("pymorphy2 analyzer ready (lang={language})");
                Ok(Self {
                    parse,
                    owns_interpreter,
                })
            }
            Err(e) => {
                if owns_interpreter {
                    finalize_interpreter();
                }
                Err(e)
            }
        }
    }
}

fn bind_parse(py: Python<'_>, language: &str, minimum: PythonVersion) -> Result<Py<PyAny>, InitError> {
    check_version(py.version(), minimum)?;

    let module = PyModule::import_bound(py, "pymorphy2")
        .map_err(|e| InitError::ImportFailed(format!("pymorphy2: {e}")))?;

    let construct = |e: PyErr| InitError::ConstructFailed(format!("MorphAnalyzer: {e}"));
    let kwargs = PyDict::new_bound(py);
    kwargs.set_item("lang", language).map_err(construct)?;
    let morph = module
        .getattr("MorphAnalyzer")
        .and_then(|class| class.call((), Some(&kwargs)))
        .map_err(construct)?;
    let parse = morph.getattr("parse").map_err(construct)?;

    Ok(parse.unbind())
}

// Runs on every start that finds no interpreter, including one after an
// earlier engine finalized it on unload.
fn initialize_interpreter() {
    log::debug!("initializing python interpreter");
    // SAFETY: no interpreter is running. Initialization leaves the GIL held
    // by this thread; releasing it lets `with_gil` take it from any thread.
    unsafe {
        pyo3::ffi::Py_InitializeEx(0);
        pyo3::ffi::PyEval_SaveThread();
    }
}

fn finalize_interpreter() {
    // SAFETY: only reached by the engine that initialized the interpreter,
    // after every Python object it owns has been released. The GIL state is
    // never released again because the interpreter is gone.
    unsafe {
        pyo3::ffi::PyGILState_Ensure();
        pyo3::ffi::Py_FinalizeEx();
    }
}

impl Analyzer for PyMorphyEngine {
    fn analyze(&self, word: &str) -> Result<Vec<Candidate>, AnalysisError> {
        Python::with_gil(|py| {
            let result = self
                .parse
                .bind(py)
                .call1((word,))
                .map_err(|e| AnalysisError::MalformedResult(format!("parse failed: {e}")))?;
            let forms = result
                .downcast::<PyList>()
                .map_err(|_| AnalysisError::MalformedResult("result is not a list".into()))?;

            forms
                .iter()
                .map(|form| {
                    form.getattr("normal_form")
                        .and_then(|nf| nf.extract::<String>())
                        .map(Candidate::new)
                        .map_err(|e| {
                            AnalysisError::MalformedResult(format!("bad normal_form: {e}"))
                        })
                })
                .collect()
        })
    }
}

impl MorphEngine for PyMorphyEngine {
    fn name(&self) -> &'static str {
        "pymorphy2"
    }

    fn shutdown(self: Box<Self>) {
        let Self {
            parse,
            owns_interpreter,
        } = *self;
        Python::with_gil(|_py| drop(parse));
        if owns_interpreter {
            log::debug!("finalizing python interpreter");
            finalize_interpreter();
        }
    }
}
