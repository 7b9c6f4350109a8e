// Host log sink.
//
// The host registers one process-wide callback before any session exists.
// A `log::Log` implementation forwards every enabled record to it; with no
// callback registered records are dropped.

use std::sync::{Once, RwLock};

use log::{LevelFilter, Log, Metadata, Record};

/// Callback receiving one formatted log line.
pub type LogSink = Box<dyn Fn(&str) + Send + Sync>;

/// Prefix placed in front of every forwarded message.
pub const LOG_PREFIX: &str = "lemmatize_uk";

struct HostLogger {
    sink: RwLock<Option<LogSink>>,
}

static LOGGER: HostLogger = HostLogger {
    sink: RwLock::new(None),
};

static INSTALL: Once = Once::new();

impl Log for HostLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        self.sink.read().map(|s| s.is_some()).unwrap_or(false)
    }

    fn log(&self, record: &Record<'_>) {
        let Ok(sink) = self.sink.read() else {
            return;
        };
        if let Some(sink) = sink.as_ref() {
            sink(&format!("{LOG_PREFIX}: {}", record.args()));
        }
    }

    fn flush(&self) {}
}

/// Register (or with `None`, unregister) the host callback.
///
/// The first call also installs the forwarding logger as the process's `log`
/// backend. If the embedding process already installed another logger, that
/// one keeps receiving records and the sink stays unused.
pub fn set_sink(sink: Option<LogSink>) {
    install();
    match LOGGER.sink.write() {
        Ok(mut slot) => *slot = sink,
        Err(poisoned) => *poisoned.into_inner() = sink,
    }
}

/// Limit forwarded records to `level` and above.
pub fn set_level(level: LevelFilter) {
    install();
    log::set_max_level(level);
}

/// True if a host callback is currently registered.
pub fn has_sink() -> bool {
    LOGGER.sink.read().map(|s| s.is_some()).unwrap_or(false)
}

fn install() {
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Info);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    // The logger is process-wide; keep everything touching it in one test.
    #[test]
    fn sink_receives_prefixed_messages_until_unregistered() {
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let captured = Arc::clone(&lines);
        set_sink(Some(Box::new(move |msg: &str| {
            captured.lock().unwrap().push(msg.to_string());
        })));
        set_level(LevelFilter::Info);
        assert!(has_sink());

        log::warn!("result token is not list");
        log::debug!("filtered out at info");

        set_sink(None);
        assert!(!has_sink());
        log::warn!("dropped");

        // Other tests in this binary may log concurrently; look only for ours.
        let lines = lines.lock().unwrap();
        assert!(lines.contains(&"lemmatize_uk: result token is not list".to_string()));
        assert!(!lines.iter().any(|l| l.contains("filtered out at info")));
        assert!(!lines.iter().any(|l| l.ends_with("dropped")));
    }
}
