//! # Example: convention_observer
//!
//! Demonstrates how to group related handlers on one object.
//!
//! Shows how to:
//! - Implement the [`Observer`] trait with `on_<code>` methods.
//! - Build the handler map with [`handlers!`].
//! - Register, detect double registration, unregister and register again.
//!
//! ## Flow
//! ```text
//! Buzzwords::register_with(&dispatcher)
//!     ├─► observe("holistic", on_holistic)
//!     └─► observe("proactive", on_proactive)
//! emit("holistic", ..)  ──► on_holistic
//! register_with(..)     ──► Err(AlreadyRegistered)
//! unregister()          ──► both handlers detached
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example convention_observer
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sigdispatch::{Dispatcher, Handlers, Observer, Payload, Registration, handlers};

/// Counts buzzwords; both handlers share the counter.
#[derive(Default)]
struct Buzzwords {
    registration: Registration,
    count: AtomicUsize,
}

impl Buzzwords {
    fn on_holistic(&self, payload: &Payload) -> anyhow::Result<()> {
        self.count.fetch_add(1, Ordering::SeqCst);
        println!("A holistic approach to {payload}.");
        Ok(())
    }

    fn on_proactive(&self, payload: &Payload) -> anyhow::Result<()> {
        self.count.fetch_add(1, Ordering::SeqCst);
        println!("We're looking for passionate, proactive {payload} to join us.");
        Ok(())
    }
}

impl Observer for Buzzwords {
    fn registration(&self) -> &Registration {
        &self.registration
    }

    fn handlers(self: &Arc<Self>) -> Handlers {
        handlers!(self; on_holistic, on_proactive)
    }

    fn name(&self) -> &'static str {
        "buzzwords"
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let dispatcher = Dispatcher::new();
    let buzz = Arc::new(Buzzwords::default());

    // 1. Sign up every on_<code> method
    buzz.register_with(&dispatcher)?;
    dispatcher.emit("holistic", "social media influence content viral impact")?;
    dispatcher.emit("proactive", "keyboard banger")?;

    // 2. A second registration is refused; the first one stays active
    if let Err(err) = buzz.register_with(&dispatcher) {
        println!("[refused] {err}");
    }

    // 3. Sign off; emits no longer reach the object
    buzz.unregister();
    dispatcher.emit("holistic", "nobody")?;

    println!("buzzwords counted: {}", buzz.count.load(Ordering::SeqCst));
    Ok(())
}
