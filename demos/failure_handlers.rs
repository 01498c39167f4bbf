//! # Example: failure_handlers
//!
//! Demonstrates failure isolation during a dispatch.
//!
//! Shows how to:
//! - Install the built-in [`FailureLogger`] and a custom exception handler.
//! - Keep emitting while observers return errors or panic.
//!
//! ## Flow
//! ```text
//! emit("job", 42)
//!     ├─► worker_ok         ──► Ok
//!     ├─► worker_err        ──► Err  ─┐
//!     └─► worker_panic      ──► panic ┴─► [failure, failure]
//!                                          ├─► FailureLogger  (tracing warn)
//!                                          └─► custom handler (println)
//! emit returns Ok(())
//! ```
//!
//! ## Run
//! Requires the `logging` feature to export [`FailureLogger`].
//! ```bash
//! cargo run --example failure_handlers --features logging
//! ```

use sigdispatch::{Dispatcher, DispatcherConfig, FailureLogger};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let dispatcher = Dispatcher::with_config(DispatcherConfig::named("jobs"));

    // 1. Exception handlers run in registration order
    FailureLogger::default().with_payload().install(&dispatcher);
    dispatcher.on_exceptions(|code, payload, failures| {
        println!(
            "[handler] code={code} payload={payload} failures={}",
            failures.len()
        );
        Ok(())
    });

    // 2. One healthy observer, two broken ones
    dispatcher.observe("job", |payload| {
        println!("[worker_ok] processed {payload}");
        Ok(())
    })?;
    dispatcher.observe("job", |payload| {
        anyhow::bail!("cannot process {payload}")
    })?;
    dispatcher.observe("job", |_| panic!("worker exploded"))?;

    // 3. The emitter never sees observer failures
    dispatcher.emit("job", 42)?;
    println!("emit returned normally");
    Ok(())
}
