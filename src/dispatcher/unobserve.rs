//! # Unobserve token.
//!
//! [`Unobserve`] is the capability returned by
//! [`Dispatcher::observe`](crate::Dispatcher::observe). It removes exactly one
//! `(code, observer)` pairing, looked up against the dispatcher's state at the
//! time it is called.
//!
//! ## Rules
//! - Only the first call removes anything; later calls return `false`.
//! - The token holds weak references only: it never keeps a dispatcher or an
//!   observer alive, and calling it after the dispatcher is gone is a no-op.
//! - Dropping the token does **not** unobserve.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use super::core::Shared;
use super::handle::ObserverFn;

/// Removes one observer from one signal code.
///
/// Dropping the token leaves the observer registered.
pub struct Unobserve {
    shared: Weak<Shared>,
    code: Arc<str>,
    observer: Weak<ObserverFn>,
    spent: AtomicBool,
}

impl Unobserve {
    pub(crate) fn new(shared: Weak<Shared>, code: Arc<str>, observer: Weak<ObserverFn>) -> Self {
        Self {
            shared,
            code,
            observer,
            spent: AtomicBool::new(false),
        }
    }

    /// Stops the bound observer from receiving signals of the bound code.
    ///
    /// Returns `true` if this call removed the observer. Repeated calls are
    /// safe and return `false`.
    pub fn unobserve(&self) -> bool {
        if self.spent.swap(true, Ordering::AcqRel) {
            return false;
        }
        match self.shared.upgrade() {
            Some(shared) => shared.remove(&self.code, &self.observer),
            None => false,
        }
    }

    /// The signal code this token is bound to.
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// True once [`unobserve`](Self::unobserve) has been called.
    #[inline]
    pub fn is_spent(&self) -> bool {
        self.spent.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Unobserve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unobserve")
            .field("code", &self.code)
            .field(
                "observer",
                &format_args!("{:#x}", Weak::as_ptr(&self.observer).cast::<()>() as usize),
            )
            .field("spent", &self.is_spent())
            .finish()
    }
}
