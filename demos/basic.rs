//! # Example: basic
//!
//! Minimal example of observing and emitting on the default dispatcher.
//!
//! Demonstrates how to:
//! - Observe a signal code with closures via [`sigdispatch::observe`].
//! - Emit payloads with [`sigdispatch::emit`].
//! - Detach one observer with its [`Unobserve`] token.
//!
//! ## Flow
//! ```text
//! observe("foo", on_foo) ──┐
//! observe("foo", also)   ──┼──► default_dispatcher
//!                          │
//! emit("foo", [1, 2, 3]) ──┴──► on_foo([1,2,3]), also([1,2,3])   (any order)
//! unobserve()            ──────► also detached
//! emit("foo", "again")   ──────► on_foo("again")
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=sigdispatch=trace cargo run --example basic
//! ```

use sigdispatch::{DispatchError, Unobserve, emit, observe};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), DispatchError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 1. Two observers on the same code
    observe("foo", |payload| {
        println!("Received {payload}.");
        Ok(())
    })?;
    let also: Unobserve = observe("foo", |payload| {
        println!("Received {payload} too.");
        Ok(())
    })?;

    // 2. Both run before emit returns; order is unspecified
    emit("foo", vec![1, 2, 3])?;

    // 3. Detach the second one; calling the token again does nothing
    also.unobserve();
    also.unobserve();
    emit("foo", "again")?;

    // 4. Nobody observes "bar": not an error
    emit("bar", ())?;
    Ok(())
}
