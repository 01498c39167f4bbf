//! # Process-wide default dispatcher.
//!
//! [`default_dispatcher`] is created on first use and lives for the rest of
//! the process. The free functions [`observe`], [`emit`] and [`on_exceptions`]
//! are shorthands for the same-named methods called on it, and
//! [`Observer::register`](crate::Observer::register) attaches to it.

use std::sync::OnceLock;

use crate::Payload;
use crate::config::DispatcherConfig;
use crate::error::{DispatchError, ObserverFailure};

use super::core::Dispatcher;
use super::unobserve::Unobserve;

/// Returns the shared dispatcher used when no explicit one is supplied.
pub fn default_dispatcher() -> &'static Dispatcher {
    static DEFAULT: OnceLock<Dispatcher> = OnceLock::new();
    DEFAULT.get_or_init(|| Dispatcher::with_config(DispatcherConfig::named("default")))
}

/// Calls [`Dispatcher::observe`] on the [`default_dispatcher`].
pub fn observe<F>(code: &str, observer: F) -> Result<Unobserve, DispatchError>
where
    F: Fn(&Payload) -> anyhow::Result<()> + Send + Sync + 'static,
{
    default_dispatcher().observe(code, observer)
}

/// Calls [`Dispatcher::emit`] on the [`default_dispatcher`].
pub fn emit(code: &str, payload: impl Into<Payload>) -> Result<(), DispatchError> {
    default_dispatcher().emit(code, payload)
}

/// Calls [`Dispatcher::on_exceptions`] on the [`default_dispatcher`].
pub fn on_exceptions<F>(handler: F)
where
    F: Fn(&str, &Payload, &[ObserverFailure]) -> anyhow::Result<()> + Send + Sync + 'static,
{
    default_dispatcher().on_exceptions(handler);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    // The default dispatcher is shared by every test in the binary, so each
    // test uses codes nobody else observes.

    #[test]
    fn default_is_a_single_instance() {
        assert!(default_dispatcher().ptr_eq(default_dispatcher()));
        assert_eq!(default_dispatcher().config().name, "default");
    }

    #[test]
    fn free_functions_forward_to_default() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let token = observe("global.free_functions", move |payload| {
            assert_eq!(payload, &serde_json::json!("bar"));
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();

        emit("global.free_functions", "bar").unwrap();
        default_dispatcher()
            .emit("global.free_functions", "bar")
            .unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        token.unobserve();
        emit("global.free_functions", "bar").unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn on_exceptions_registers_on_default() {
        let before = default_dispatcher().exception_handler_count();
        on_exceptions(|_, _, _| Ok(()));
        assert!(default_dispatcher().exception_handler_count() > before);
        assert!(emit("global.nobody", ()).is_ok());
    }
}
