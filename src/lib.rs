//! # sigdispatch
//!
//! **sigdispatch** is a small, synchronous, in-process signal dispatcher.
//!
//! Components observe **signal codes** (strings) with callbacks; other
//! components **emit** a code with a payload, and every observer of that code
//! runs in the emitting thread before `emit` returns. Emitters don't know who
//! receives their signals, and a misbehaving observer can't break them.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌──────────────────┐  ┌──────────────────┐  ┌────────────────────────┐
//!  │ observe(code, f) │  │ Observer object  │  │ on_exceptions(handler) │
//!  │  (one callback)  │  │ on_foo / on_bar  │  │   (failure handlers)   │
//!  └────────┬─────────┘  └────────┬─────────┘  └───────────┬────────────┘
//!           │                     │ register()             │
//!           ▼                     ▼                        ▼
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  Dispatcher                                                          │
//! │  - observers: code ─► {ObserverRef}        (set, no ordering)        │
//! │  - exception handlers: [handler, ...]      (registration order)      │
//! └──────────────────────────────────┬───────────────────────────────────┘
//!                                    │ emit(code, payload)
//!                ┌───────────────────┼───────────────────┐
//!                ▼                   ▼                   ▼
//!            observer1           observer2           observerN
//!                │ Err / panic       │                   │ Err / panic
//!                └──────────► failures (this dispatch) ◄─┘
//!                                    │ non-empty
//!                                    ▼
//!                      handler(code, payload, failures)   (errors swallowed)
//! ```
//!
//! ### Lifecycle of an [`Observer`]
//! ```text
//! Unregistered ──register()──► Registered ──unregister()──► Unregistered
//!                                  │
//!                                  └─ register() ─► Err(AlreadyRegistered)
//! ```
//!
//! ## Features
//! | Area              | Description                                                 | Key types / functions                         |
//! |-------------------|-------------------------------------------------------------|-----------------------------------------------|
//! | **Dispatch**      | Observe codes, emit payloads, isolate observer failures.    | [`Dispatcher`], [`ObserverRef`], [`Unobserve`] |
//! | **Observers**     | Sign up every `on_<code>` method of an object at once.      | [`Observer`], [`Registration`], [`handlers!`] |
//! | **Default**       | Process-wide dispatcher and free functions.                 | [`default_dispatcher`], [`observe`], [`emit`] |
//! | **Errors**        | Typed errors for misuse and observer failures.              | [`DispatchError`], [`ObserverFailure`]        |
//! | **Configuration** | Per-dispatcher logging settings.                            | [`DispatcherConfig`]                          |
//!
//! ## Optional features
//! - `logging`: exports [`FailureLogger`], an exception handler writing
//!   observer failures to `tracing` _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use sigdispatch::Dispatcher;
//!
//! let dispatcher = Dispatcher::new();
//! let received = Arc::new(Mutex::new(Vec::new()));
//!
//! let r = Arc::clone(&received);
//! dispatcher.observe("foo", move |payload| {
//!     r.lock().unwrap().push(format!("Received {payload}."));
//!     Ok(())
//! })?;
//! dispatcher.observe("foo", |_| anyhow::bail!("this one is broken"))?;
//!
//! dispatcher.on_exceptions(|code, _payload, failures| {
//!     assert_eq!(code, "foo");
//!     assert_eq!(failures.len(), 1);
//!     Ok(())
//! });
//!
//! // The broken observer doesn't reach the emitter.
//! dispatcher.emit("foo", vec![1, 2, 3])?;
//! assert_eq!(*received.lock().unwrap(), vec!["Received [1,2,3].".to_string()]);
//! # Ok::<(), sigdispatch::DispatchError>(())
//! ```

mod config;
mod dispatcher;
mod error;
mod observers;

/// Value delivered to observers of an emitted signal.
///
/// Payloads are JSON values; `Payload::Null` stands for "no payload".
pub type Payload = serde_json::Value;

// ---- Public re-exports ----

pub use config::DispatcherConfig;
pub use dispatcher::{
    Dispatcher, ExceptionHandlerFn, ObserverFn, ObserverRef, Unobserve,
    default_dispatcher, emit, observe, on_exceptions,
};
pub use error::{DispatchError, ObserverFailure};
pub use observers::{HANDLER_PREFIX, Handlers, Observer, Registration};

// Optional: expose a simple built-in logging exception handler (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::FailureLogger;
