//! # Registration bookkeeping shared by all observers.
//!
//! [`Registration`] remembers which dispatcher an observer is attached to and
//! the [`Unobserve`] tokens acquired when it was attached.
//!
//! Nothing here is owned strongly: the dispatcher is held through a weak
//! handle and the tokens are weak too. The dispatcher table owns the handlers,
//! and the handlers own the observer, so an observer dropped together with
//! its dispatcher is freed without `unregister`.
//!
//! ## State machine
//! ```text
//!            attach (ok)                      detach
//! Unregistered ──────────► Registered ──────────────► Unregistered
//!      ▲  │                   │  attach ──► Err(AlreadyRegistered), state kept
//!      │  │ attach (observe   │
//!      │  │ failed): tokens   │
//!      └──┘ released          │ detach (again) ──► no-op
//! ```

use std::borrow::Cow;
use std::fmt;

use parking_lot::Mutex;
use tracing::debug;

use crate::dispatcher::{Dispatcher, Unobserve, WeakDispatcher};
use crate::error::DispatchError;

use super::handlers::Handlers;

struct Attached {
    dispatcher: WeakDispatcher,
    dispatcher_name: Cow<'static, str>,
    unobservers: Vec<Unobserve>,
}

/// Bookkeeping value embedded in every [`Observer`](crate::Observer).
#[derive(Default)]
pub struct Registration {
    state: Mutex<Option<Attached>>,
}

impl Registration {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while attached to a dispatcher.
    ///
    /// Stays `true` after the dispatcher is dropped, until `detach`.
    pub fn is_registered(&self) -> bool {
        self.state.lock().is_some()
    }

    /// The dispatcher currently attached to, if any and still alive.
    pub fn dispatcher(&self) -> Option<Dispatcher> {
        self.state
            .lock()
            .as_ref()
            .and_then(|attached| attached.dispatcher.upgrade())
    }

    /// Observes every handler on `dispatcher` and records the tokens.
    ///
    /// If one `observe` fails, the handlers observed so far are removed again
    /// and the registration stays empty.
    pub(crate) fn attach(
        &self,
        dispatcher: &Dispatcher,
        observer: &str,
        handlers: Handlers,
    ) -> Result<(), DispatchError> {
        let mut state = self.state.lock();
        if state.is_some() {
            return Err(DispatchError::AlreadyRegistered {
                observer: observer.to_string(),
            });
        }

        let mut unobservers = Vec::with_capacity(handlers.len());
        for (code, handler) in handlers {
            match dispatcher.observe_ref(&code, handler) {
                Ok(token) => unobservers.push(token),
                Err(err) => {
                    for token in &unobservers {
                        token.unobserve();
                    }
                    return Err(err);
                }
            }
        }

        debug!(
            observer,
            dispatcher = %dispatcher.config().name,
            handlers = unobservers.len(),
            "observer registered"
        );
        *state = Some(Attached {
            dispatcher: dispatcher.downgrade(),
            dispatcher_name: dispatcher.config().name.clone(),
            unobservers,
        });
        Ok(())
    }

    /// Removes every handler observed by the last [`attach`](Self::attach).
    /// No-op when not attached.
    pub(crate) fn detach(&self, observer: &str) {
        let Some(attached) = self.state.lock().take() else {
            return;
        };
        for token in &attached.unobservers {
            token.unobserve();
        }
        debug!(
            observer,
            dispatcher = %attached.dispatcher_name,
            "observer unregistered"
        );
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Registration")
            .field(
                "dispatcher",
                &state.as_ref().map(|a| &a.dispatcher_name),
            )
            .field("handlers", &state.as_ref().map_or(0, |a| a.unobservers.len()))
            .finish()
    }
}
