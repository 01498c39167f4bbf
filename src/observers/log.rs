//! # Logging exception handler for debugging and demos.
//!
//! [`FailureLogger`] writes one `tracing` warning per observer failure.
//!
//! ## Output format (with the `tracing_subscriber::fmt` layer)
//! ```text
//! WARN sigdispatch::observers::log: observer failed dispatcher="default" code="job" kind="observer_failed" error=error: cannot process 5
//! WARN sigdispatch::observers::log: observer failed dispatcher="default" code="job" kind="observer_panicked" error=panic: boom
//! ```
//!
//! ## Example
//! ```no_run
//! # use sigdispatch::{Dispatcher, FailureLogger};
//! let dispatcher = Dispatcher::new();
//! FailureLogger::default().install(&dispatcher);
//! ```

use crate::Payload;
use crate::dispatcher::Dispatcher;
use crate::error::ObserverFailure;

/// Exception handler that logs observer failures.
///
/// Enabled via the `logging` feature. Not intended as the only failure
/// handling in production - install your own handler for alerting or metrics.
#[derive(Debug, Clone, Default)]
pub struct FailureLogger {
    include_payload: bool,
}

impl FailureLogger {
    /// Also records the payload on each warning.
    pub fn with_payload(mut self) -> Self {
        self.include_payload = true;
        self
    }

    /// Registers this logger as an exception handler of `dispatcher`.
    pub fn install(self, dispatcher: &Dispatcher) {
        let name = dispatcher.config().name.clone();
        dispatcher.on_exceptions(move |code, payload, failures| {
            self.log(&name, code, payload, failures);
            Ok(())
        });
    }

    fn log(&self, dispatcher: &str, code: &str, payload: &Payload, failures: &[ObserverFailure]) {
        for failure in failures {
            if self.include_payload {
                tracing::warn!(
                    dispatcher,
                    code,
                    kind = failure.as_label(),
                    error = %failure.as_message(),
                    payload = %payload,
                    "observer failed"
                );
            } else {
                tracing::warn!(
                    dispatcher,
                    code,
                    kind = failure.as_label(),
                    error = %failure.as_message(),
                    "observer failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tracing::Level;

    use super::*;
    use crate::DispatcherConfig;

    /// In-memory sink for the fmt subscriber.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock())
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    fn logged(logger: FailureLogger) -> Vec<String> {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(Level::WARN)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let d = Dispatcher::with_config(DispatcherConfig::named("jobs"));
            logger.install(&d);
            assert_eq!(d.exception_handler_count(), 1);

            d.observe("job", |_| anyhow::bail!("boom")).unwrap();
            d.observe("job", |_| panic!("kaput")).unwrap();
            d.observe("job", |_| Ok(())).unwrap();
            d.emit("job", 1).unwrap();
            d.emit("quiet", 2).unwrap();
        });
        capture.lines()
    }

    #[test]
    fn logs_one_warning_per_failure() {
        let lines = logged(FailureLogger::default());

        assert_eq!(lines.len(), 2, "{lines:#?}");
        for line in &lines {
            assert!(line.contains("WARN"), "{line}");
            assert!(line.contains("observer failed"), "{line}");
            assert!(line.contains(r#"dispatcher="jobs""#), "{line}");
            assert!(line.contains(r#"code="job""#), "{line}");
            assert!(!line.contains("payload="), "{line}");
        }
        assert!(lines.iter().any(|l| l.contains(r#"kind="observer_failed""#) && l.contains("boom")));
        assert!(lines.iter().any(|l| l.contains(r#"kind="observer_panicked""#) && l.contains("kaput")));
    }

    #[test]
    fn with_payload_adds_the_payload_field() {
        let lines = logged(FailureLogger::default().with_payload());

        assert_eq!(lines.len(), 2, "{lines:#?}");
        assert!(lines.iter().all(|l| l.contains("payload=1")), "{lines:#?}");
    }
}
