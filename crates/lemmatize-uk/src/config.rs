// Plugin configuration.
//
// Plugin load has no option channel of its own, so process-wide settings
// come from LEMMATIZE_UK_* environment variables. Each tokenizer session can
// then refine the per-token policy through the host's options string
// ("overlong=passthrough").

use std::path::PathBuf;
use std::str::FromStr;

use lemmatize_core::InitError;
use log::LevelFilter;

pub const ENV_BACKEND: &str = "LEMMATIZE_UK_BACKEND";
pub const ENV_LEXICON: &str = "LEMMATIZE_UK_LEXICON";
pub const ENV_LANG: &str = "LEMMATIZE_UK_LANG";
pub const ENV_OVERLONG: &str = "LEMMATIZE_UK_OVERLONG";
pub const ENV_LOG: &str = "LEMMATIZE_UK_LOG";

/// Analyzer language passed to the engine.
pub const DEFAULT_LANGUAGE: &str = "uk";

/// Which analysis engine to bring up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// pymorphy2 running in an embedded Python interpreter.
    PyMorphy,
    /// Tab-separated form/lemma dictionary loaded into memory.
    Lexicon,
}

impl Default for BackendKind {
    fn default() -> Self {
        if cfg!(feature = "pymorphy") {
            BackendKind::PyMorphy
        } else {
            BackendKind::Lexicon
        }
    }
}

impl FromStr for BackendKind {
    type Err = InitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pymorphy" | "pymorphy2" => Ok(BackendKind::PyMorphy),
            "lexicon" => Ok(BackendKind::Lexicon),
            other => Err(InitError::InvalidConfig(format!("unknown backend '{other}'"))),
        }
    }
}

/// What to do with a token longer than the host buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlongPolicy {
    /// Analyze the longest prefix that fits.
    #[default]
    Truncate,
    /// Skip analysis and hand the token back untouched.
    PassThrough,
}

impl FromStr for OverlongPolicy {
    type Err = InitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truncate" => Ok(OverlongPolicy::Truncate),
            "passthrough" | "pass-through" => Ok(OverlongPolicy::PassThrough),
            other => Err(InitError::InvalidConfig(format!(
                "unknown overlong policy '{other}'"
            ))),
        }
    }
}

/// Resolved plugin settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: BackendKind,
    pub language: String,
    pub lexicon_path: Option<PathBuf>,
    pub overlong: OverlongPolicy,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            lexicon_path: None,
            overlong: OverlongPolicy::default(),
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, InitError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its
    /// value. Unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InitError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = set(ENV_BACKEND) {
            config.backend = v.parse()?;
        }
        if let Some(v) = set(ENV_LEXICON) {
            config.lexicon_path = Some(PathBuf::from(v.trim()));
        }
        if let Some(v) = set(ENV_LANG) {
            config.language = v.trim().to_string();
        }
        if let Some(v) = set(ENV_OVERLONG) {
            config.overlong = v.parse()?;
        }
        if let Some(v) = set(ENV_LOG) {
            config.log_level = v.trim().parse().map_err(|_| {
                InitError::InvalidConfig(format!("unknown log level '{}'", v.trim()))
            })?;
        }

        Ok(config)
    }

    /// Apply a host options string of `key=value` pairs separated by `;`
    /// or `,`. Only per-session keys are accepted.
    pub fn apply_options(&mut self, options: &str) -> Result<(), InitError> {
        for pair in options.split([';', ',']) {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let Some((key, value)) = pair.split_once('=') else {
                return Err(InitError::InvalidConfig(format!(
                    "expected key=value, got '{pair}'"
                )));
            };
            match key.trim().to_ascii_lowercase().as_str() {
                "overlong" => self.overlong = value.parse()?,
                other => {
                    return Err(InitError::InvalidConfig(format!("unknown option '{other}'")));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.language, "uk");
        assert_eq!(config.overlong, OverlongPolicy::Truncate);
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_BACKEND, "lexicon"),
            (ENV_LEXICON, "/srv/uk.tsv"),
            (ENV_LANG, "ru"),
            (ENV_OVERLONG, "passthrough"),
            (ENV_LOG, "debug"),
        ]))
        .unwrap();
        assert_eq!(config.backend, BackendKind::Lexicon);
        assert_eq!(config.lexicon_path, Some(PathBuf::from("/srv/uk.tsv")));
        assert_eq!(config.language, "ru");
        assert_eq!(config.overlong, OverlongPolicy::PassThrough);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = Config::from_lookup(lookup_from(&[(ENV_LANG, "  ")])).unwrap();
        assert_eq!(config.language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn bad_backend_is_invalid_config() {
        let err = Config::from_lookup(lookup_from(&[(ENV_BACKEND, "hunspell")])).unwrap_err();
        assert_eq!(
            err,
            InitError::InvalidConfig("unknown backend 'hunspell'".into())
        );
    }

    #[test]
    fn bad_log_level_is_invalid_config() {
        let err = Config::from_lookup(lookup_from(&[(ENV_LOG, "loud")])).unwrap_err();
        assert!(matches!(err, InitError::InvalidConfig(_)));
    }

    #[test]
    fn backend_aliases() {
        assert_eq!("pymorphy2".parse::<BackendKind>().unwrap(), BackendKind::PyMorphy);
        assert_eq!(" Lexicon ".parse::<BackendKind>().unwrap(), BackendKind::Lexicon);
    }

    #[test]
    fn options_set_overlong_policy() {
        let mut config = Config::default();
        config.apply_options("overlong=passthrough").unwrap();
        assert_eq!(config.overlong, OverlongPolicy::PassThrough);
        config.apply_options(" ; OVERLONG = truncate ,").unwrap();
        assert_eq!(config.overlong, OverlongPolicy::Truncate);
    }

    #[test]
    fn empty_options_are_accepted() {
        let mut config = Config::default();
        config.apply_options("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut config = Config::default();
        let err = config.apply_options("stemmer=on").unwrap_err();
        assert_eq!(err, InitError::InvalidConfig("unknown option 'stemmer'".into()));
    }

    #[test]
    fn option_without_value_is_rejected() {
        let mut config = Config::default();
        assert!(config.apply_options("overlong").is_err());
    }
}
