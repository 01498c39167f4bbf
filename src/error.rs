//! Error types used by the dispatcher and by registered observers.
//!
//! This module defines two enums:
//!
//! - [`DispatchError`]: misuse of the API, surfaced to the direct caller.
//! - [`ObserverFailure`]: a failure raised by an observer during a dispatch.
//!   These never reach the emitter; they are handed to exception handlers.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.

use thiserror::Error;

/// # Errors returned by the public dispatcher API.
///
/// These are the only errors that escape to a caller: argument errors on
/// [`Dispatcher::observe`](crate::Dispatcher::observe) /
/// [`Dispatcher::emit`](crate::Dispatcher::emit), and double registration of an
/// [`Observer`](crate::Observer).
///
/// Signal codes are plain `&str` and observers are typed callables, so no
/// current input to `observe` or `emit` yields `InvalidArgument`.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A parameter failed its constraint.
    #[error("{name} is not valid: {reason}")]
    InvalidArgument {
        /// Parameter name (e.g. `code`).
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// `register` was called on an observer that is already registered.
    #[error("observer object {observer} already registered in signal dispatcher.")]
    AlreadyRegistered {
        /// Name of the offending observer (see [`Observer::name`](crate::Observer::name)).
        observer: String,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use sigdispatch::DispatchError;
    ///
    /// let err = DispatchError::AlreadyRegistered { observer: "audit".into() };
    /// assert_eq!(err.as_label(), "already_registered");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::InvalidArgument { .. } => "invalid_argument",
            DispatchError::AlreadyRegistered { .. } => "already_registered",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::InvalidArgument { name, reason } => {
                format!("invalid {name}: {reason}")
            }
            DispatchError::AlreadyRegistered { observer } => {
                format!("already registered: {observer}")
            }
        }
    }
}

/// # Failure of a single observer invocation.
///
/// Collected during one dispatch and passed to every exception handler.
/// An observer fails either by returning `Err` or by panicking.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ObserverFailure {
    /// Observer returned an error.
    #[error("{0:#}")]
    Failed(anyhow::Error),

    /// Observer panicked; holds the panic message when one was available.
    #[error("observer panicked: {0}")]
    Panicked(String),
}

impl ObserverFailure {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use sigdispatch::ObserverFailure;
    ///
    /// let failure = ObserverFailure::Panicked("boom".into());
    /// assert_eq!(failure.as_label(), "observer_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ObserverFailure::Failed(_) => "observer_failed",
            ObserverFailure::Panicked(_) => "observer_panicked",
        }
    }

    /// Returns a human-readable message with details about the failure.
    pub fn as_message(&self) -> String {
        match self {
            ObserverFailure::Failed(err) => format!("error: {err:#}"),
            ObserverFailure::Panicked(info) => format!("panic: {info}"),
        }
    }

    /// The underlying error, if the observer returned one.
    pub fn error(&self) -> Option<&anyhow::Error> {
        match self {
            ObserverFailure::Failed(err) => Some(err),
            ObserverFailure::Panicked(_) => None,
        }
    }

    /// True if the observer panicked instead of returning an error.
    #[inline]
    pub fn is_panic(&self) -> bool {
        matches!(self, ObserverFailure::Panicked(_))
    }
}
