//! # Signal dispatching.
//!
//! This module provides the [`Dispatcher`] and everything it hands out:
//! - [`ObserverRef`]: identity-compared observer handle;
//! - [`Unobserve`]: token removing one observer from one code;
//! - [`default_dispatcher`] and the free functions forwarding to it.
//!
//! ## Architecture
//! ```text
//!   observe(code, f) ──► observers: code ─► {ObserverRef, ...}
//!        │
//!        └─► Unobserve ──(weak)──► same table, removes (code, f) once
//!
//!   emit(code, payload) ──► every ObserverRef of code ──► failures ──► exception handlers
//! ```

mod core;
mod global;
mod guard;
mod handle;
mod unobserve;

pub use self::core::Dispatcher;
pub(crate) use self::core::WeakDispatcher;
pub use global::{default_dispatcher, emit, observe, on_exceptions};
pub use handle::{ExceptionHandlerFn, ObserverFn, ObserverRef};
pub use unobserve::Unobserve;
