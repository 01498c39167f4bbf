//! # Convention-based observers.
//!
//! This module provides the [`Observer`] trait and its building blocks:
//! - [`Registration`]: per-object bookkeeping (dispatcher + tokens);
//! - [`Handlers`] and the [`handlers!`](crate::handlers) macro: the `on_<code>` map.
//!
//! ## Observer types
//! - **Stateless observers** - react to signals (notify, log, forward)
//! - **Stateful observers** - share state between the handlers of one object
//!
//! A ready-made [`FailureLogger`] exception handler is exported with the
//! `logging` feature.

mod handlers;
#[cfg(feature = "logging")]
mod log;
mod observer;
mod registration;

pub use handlers::{HANDLER_PREFIX, Handlers};
#[cfg(feature = "logging")]
pub use log::FailureLogger;
pub use observer::Observer;
pub use registration::Registration;
