//! # Signal dispatcher.
//!
//! [`Dispatcher`] keeps a table of observers per signal code and runs them
//! synchronously, in the emitting thread, whenever that code is emitted.
//!
//! ## Architecture
//! ```text
//! emit(code, payload)
//!     │
//!     ├──► snapshot observers[code]   (read lock released before any call)
//!     │
//!     ├──► guarded(observer1(payload)) ──► Err / panic ─┐
//!     ├──► guarded(observer2(payload))                  ├──► failures: Vec<ObserverFailure>
//!     └──► guarded(observerN(payload)) ──► Err / panic ─┘
//!                                                       │ (non-empty)
//!                                                       ▼
//!                  handler1(code, payload, failures) ──► error swallowed
//!                  handler2(code, payload, failures)
//!                  ...                    (registration order)
//! ```
//!
//! ## Rules
//! - **Synchronous**: `emit` returns after every observer and handler has run.
//! - **No ordering** across the observers of one code.
//! - **Isolation**: a failing observer never stops the others and never reaches
//!   the emitter; a failing handler never stops later handlers.
//! - **Reentrant**: observers may call back into the dispatcher. Registration
//!   changes made during a dispatch apply from the next dispatch on.
//! - **Any string is a code**, the empty string included; emitting a code
//!   nobody observes is a no-op.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::Payload;
use crate::config::DispatcherConfig;
use crate::error::{DispatchError, ObserverFailure};

use super::guard::guarded;
use super::handle::{ExceptionHandlerFn, ObserverFn, ObserverRef};
use super::unobserve::Unobserve;

/// State shared by all clones of a [`Dispatcher`] and referenced weakly by tokens.
pub(crate) struct Shared {
    config: DispatcherConfig,
    observers: RwLock<HashMap<Arc<str>, HashSet<ObserverRef>>>,
    exception_handlers: RwLock<Vec<Arc<ExceptionHandlerFn>>>,
}

impl Shared {
    /// Removes `observer` from `code`'s set; drops the set once empty.
    ///
    /// Sets hold their members strongly, so a handle that no longer upgrades
    /// is in none of them.
    pub(crate) fn remove(&self, code: &str, observer: &Weak<ObserverFn>) -> bool {
        let Some(observer) = ObserverRef::upgrade(observer) else {
            return false;
        };
        let mut table = self.observers.write();
        let Some(set) = table.get_mut(code) else {
            return false;
        };
        let removed = set.remove(&observer);
        if set.is_empty() {
            table.remove(code);
        }
        drop(table);

        if removed {
            debug!(dispatcher = %self.config.name, code, "observer removed");
        }
        removed
    }
}

/// Channel for sending signals to the observers of a signal code.
///
/// Cheap to clone: clones share one registration table.
///
/// ```
/// use std::sync::{Arc, Weak};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use sigdispatch::Dispatcher;
///
/// let d = Dispatcher::new();
/// let hits = Arc::new(AtomicUsize::new(0));
///
/// let h = Arc::clone(&hits);
/// let unobserve = d.observe("ping", move |_payload| {
///     h.fetch_add(1, Ordering::SeqCst);
///     Ok(())
/// })?;
///
/// d.emit("ping", ())?;
/// unobserve.unobserve();
/// d.emit("ping", ())?;
///
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// # Ok::<(), sigdispatch::DispatchError>(())
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    shared: Arc<Shared>,
}

impl Dispatcher {
    /// Creates a dispatcher with [`DispatcherConfig::default`].
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Creates a dispatcher with the given configuration.
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                observers: RwLock::new(HashMap::new()),
                exception_handlers: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Observes `code` with a closure.
    ///
    /// Every later `emit(code, payload)` calls `observer(&payload)` until the
    /// returned token is used. Each call wraps the closure in a new
    /// [`ObserverRef`]; use [`observe_ref`](Self::observe_ref) to register one
    /// handle under several codes or to rely on set semantics.
    ///
    /// Dropping the returned [`Unobserve`] does **not** remove the observer: it
    /// stays registered for the lifetime of the dispatcher. Keep the token to
    /// be able to stop observing, or discard it explicitly with `let _ = ..`.
    ///
    /// # Errors
    /// Every `&str` is a valid code, the empty string included, so this
    /// returns `Ok` for all inputs today.
    pub fn observe<F>(&self, code: &str, observer: F) -> Result<Unobserve, DispatchError>
    where
        F: Fn(&Payload) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.observe_ref(code, ObserverRef::new(observer))
    }

    /// Observes `code` with a shared handle.
    ///
    /// The observers of a code form a set: observing the same handle twice
    /// under the same code keeps a single entry, invoked once per emit.
    ///
    /// As with [`observe`](Self::observe), dropping the token keeps the
    /// observer registered.
    ///
    /// # Errors
    /// Never fails for a `&str` code; see [`observe`](Self::observe).
    pub fn observe_ref(
        &self,
        code: &str,
        observer: ObserverRef,
    ) -> Result<Unobserve, DispatchError> {
        let key = {
            let mut table = self.shared.observers.write();
            let key = match table.get_key_value(code) {
                Some((key, _)) => Arc::clone(key),
                None => Arc::<str>::from(code),
            };
            table
                .entry(Arc::clone(&key))
                .or_default()
                .insert(observer.clone());
            key
        };

        debug!(dispatcher = %self.shared.config.name, code, "observer added");
        Ok(Unobserve::new(
            Arc::downgrade(&self.shared),
            key,
            observer.downgrade(),
        ))
    }

    /// Emits a signal.
    ///
    /// Calls every observer of `code` with `payload`, in this thread, before
    /// returning. Errors and panics raised by observers are collected and
    /// handed to the exception handlers (see [`on_exceptions`](Self::on_exceptions));
    /// they are never returned from here.
    ///
    /// Emitting a code nobody observes is not an error.
    ///
    /// # Errors
    /// Never fails for a `&str` code; observer failures go to the exception
    /// handlers instead.
    pub fn emit(&self, code: &str, payload: impl Into<Payload>) -> Result<(), DispatchError> {
        let payload = payload.into();

        let observers: Vec<ObserverRef> = match self.shared.observers.read().get(code) {
            Some(set) if !set.is_empty() => set.iter().cloned().collect(),
            _ => return Ok(()),
        };

        if self.shared.config.log_payloads {
            trace!(
                dispatcher = %self.shared.config.name,
                code,
                observers = observers.len(),
                payload = %payload,
                "emit"
            );
        } else {
            trace!(
                dispatcher = %self.shared.config.name,
                code,
                observers = observers.len(),
                "emit"
            );
        }

        let failures = self.emit_to_observers(&observers, &payload);
        if !failures.is_empty() {
            debug!(
                dispatcher = %self.shared.config.name,
                code,
                failures = failures.len(),
                "observers failed during dispatch"
            );
            self.handle_failures(code, &payload, &failures);
        }
        Ok(())
    }

    /// Adds a handler for the failures collected during a dispatch.
    ///
    /// After a dispatch in which at least one observer failed, every handler is
    /// called once, in registration order, with the signal code, the payload
    /// and all failures of that dispatch. Handlers accumulate and cannot be
    /// removed. Errors and panics raised by a handler are discarded.
    pub fn on_exceptions<F>(&self, handler: F)
    where
        F: Fn(&str, &Payload, &[ObserverFailure]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.shared.exception_handlers.write().push(Arc::new(handler));
    }

    /// Number of observers currently registered for `code`.
    pub fn observer_count(&self, code: &str) -> usize {
        self.shared.observers.read().get(code).map_or(0, HashSet::len)
    }

    /// True if at least one observer is registered for `code`.
    #[inline]
    pub fn has_observers(&self, code: &str) -> bool {
        self.observer_count(code) > 0
    }

    /// Number of registered exception handlers.
    pub fn exception_handler_count(&self) -> usize {
        self.shared.exception_handlers.read().len()
    }

    /// The configuration this dispatcher was built with.
    #[inline]
    pub fn config(&self) -> &DispatcherConfig {
        &self.shared.config
    }

    /// True if both handles refer to the same dispatcher.
    #[inline]
    pub fn ptr_eq(&self, other: &Dispatcher) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Weak handle that does not keep the registration table alive.
    pub(crate) fn downgrade(&self) -> WeakDispatcher {
        WeakDispatcher(Arc::downgrade(&self.shared))
    }

    fn emit_to_observers(&self, observers: &[ObserverRef], payload: &Payload) -> Vec<ObserverFailure> {
        observers
            .iter()
            .filter_map(|observer| guarded(|| observer.call(payload)).err())
            .collect()
    }

    fn handle_failures(&self, code: &str, payload: &Payload, failures: &[ObserverFailure]) {
        let handlers: Vec<Arc<ExceptionHandlerFn>> =
            self.shared.exception_handlers.read().iter().cloned().collect();

        for handler in handlers {
            let _ = guarded(|| handler(code, payload, failures));
        }
    }
}

/// Non-owning counterpart of [`Dispatcher`], held by observer registrations.
#[derive(Clone, Default)]
pub(crate) struct WeakDispatcher(Weak<Shared>);

impl WeakDispatcher {
    pub(crate) fn upgrade(&self) -> Option<Dispatcher> {
        self.0.upgrade().map(|shared| Dispatcher { shared })
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("name", &self.shared.config.name)
            .field("codes", &self.shared.observers.read().len())
            .field("exception_handlers", &self.exception_handler_count())
            .finish()
    }
}
