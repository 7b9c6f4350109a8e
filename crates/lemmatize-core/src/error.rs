// Error types: engine bring-up failures and per-token analysis failures.

/// Failure while bringing up an analysis engine.
///
/// These are the only errors that reach the host: plugin load fails with the
/// rendered message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    /// The engine's runtime is older than the minimum supported version.
    #[error("invalid engine version '{found}', at least {required} required")]
    VersionUnsupported { found: String, required: String },

    /// A required analysis backend could not be found or imported.
    #[error("failed to import analysis backend: {0}")]
    ImportFailed(String),

    /// The analyzer object could not be constructed.
    #[error("failed to construct analyzer: {0}")]
    ConstructFailed(String),

    /// Configuration or plugin options could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failure while analyzing a single token.
///
/// Never fatal: the session turns every variant into a pass-through of the
/// original token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// No engine is loaded, or the engine failed and is no longer usable.
    #[error("analysis engine is not available")]
    EngineUnavailable,

    /// The engine answered with something that is not a candidate list.
    #[error("malformed analysis result: {0}")]
    MalformedResult(String),
}
