//! Error boundary around user callbacks.
//!
//! Every observer and exception handler runs through [`guarded`], which turns
//! both an `Err` return and a panic into an [`ObserverFailure`] value.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a callback holds a lock on state captured from outside and panics.
//! The process panic hook still runs, so panics are reported on stderr as usual.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::ObserverFailure;

/// Runs `f`, containing any error or panic it raises.
pub(crate) fn guarded<F>(f: F) -> Result<(), ObserverFailure>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(ObserverFailure::Failed(err)),
        Err(panic_err) => Err(ObserverFailure::Panicked(panic_message(&*panic_err))),
    }
}

fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_success_through() {
        assert!(guarded(|| Ok(())).is_ok());
    }

    #[test]
    fn converts_errors() {
        let failure = guarded(|| Err(anyhow::anyhow!("nope"))).unwrap_err();
        assert_eq!(failure.as_label(), "observer_failed");
        assert_eq!(failure.to_string(), "nope");
    }

    #[test]
    fn converts_panics_with_message() {
        let failure = guarded(|| panic!("kaboom {}", 7)).unwrap_err();
        match failure {
            ObserverFailure::Panicked(msg) => assert_eq!(msg, "kaboom 7"),
            other => panic!("unexpected failure: {other:?}"),
        }

        let failure = guarded(|| std::panic::panic_any(42_u8)).unwrap_err();
        assert_eq!(failure.to_string(), "observer panicked: unknown panic");
    }
}
