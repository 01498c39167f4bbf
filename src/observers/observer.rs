//! # Observer: convention-based bulk registration
//!
//! The [`Observer`] trait groups related handlers on one object, perhaps
//! sharing state between dispatches, and signs all of them up (or off) in a
//! single call.
//!
//! Every handler is a method named `on_<code>`; the object lists them in
//! [`Observer::handlers`], usually with the [`handlers!`](crate::handlers) macro.
//! The shared bookkeeping lives in a [`Registration`] field.
//!
//! ## Architecture
//! ```text
//! observer.register_with(&dispatcher)
//!     ├─► Registration: already attached? ──► Err(AlreadyRegistered)
//!     ├─► handlers() ──► [(code, on_<code>), ...]
//!     ├─► dispatcher.observe_ref(code, handler)   (once per handler)
//!     └─► Registration keeps a weak dispatcher + Unobserve tokens
//!
//! observer.unregister()
//!     └─► every token.unobserve(), Registration cleared
//! ```
//!
//! While registered, the dispatcher holds an `Arc` of the observer through its
//! handlers; [`unregister`](Observer::unregister) releases it, and so does
//! dropping the dispatcher. The observer never keeps its dispatcher alive.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use sigdispatch::{handlers, Dispatcher, Handlers, Observer, Payload, Registration};
//!
//! #[derive(Default)]
//! struct Buzzwords {
//!     registration: Registration,
//!     seen: AtomicUsize,
//! }
//!
//! impl Buzzwords {
//!     fn on_holistic(&self, _payload: &Payload) -> anyhow::Result<()> {
//!         self.seen.fetch_add(1, Ordering::SeqCst);
//!         Ok(())
//!     }
//!
//!     fn on_proactive(&self, _payload: &Payload) -> anyhow::Result<()> {
//!         self.seen.fetch_add(1, Ordering::SeqCst);
//!         Ok(())
//!     }
//! }
//!
//! impl Observer for Buzzwords {
//!     fn registration(&self) -> &Registration {
//!         &self.registration
//!     }
//!
//!     fn handlers(self: &Arc<Self>) -> Handlers {
//!         handlers!(self; on_holistic, on_proactive)
//!     }
//! }
//!
//! let dispatcher = Dispatcher::new();
//! let o = Arc::new(Buzzwords::default());
//! o.register_with(&dispatcher)?;
//!
//! dispatcher.emit("holistic", "synergy")?;
//! dispatcher.emit("proactive", "keyboard banger")?;
//! assert_eq!(o.seen.load(Ordering::SeqCst), 2);
//!
//! o.unregister();
//! dispatcher.emit("holistic", "synergy")?;
//! assert_eq!(o.seen.load(Ordering::SeqCst), 2);
//! # Ok::<(), sigdispatch::DispatchError>(())
//! ```

use std::sync::Arc;

use crate::dispatcher::{Dispatcher, default_dispatcher};
use crate::error::DispatchError;

use super::handlers::Handlers;
use super::registration::Registration;

/// Object whose `on_<code>` methods observe signals as a unit.
///
/// Implementors provide [`registration`](Self::registration) and
/// [`handlers`](Self::handlers); registering and unregistering come for free.
pub trait Observer: Send + Sync + 'static {
    /// Bookkeeping storage for this observer.
    fn registration(&self) -> &Registration;

    /// Lists the `on_<code>` handlers of this observer.
    ///
    /// Called once per registration; handlers added later are not picked up
    /// until the next [`register`](Self::register).
    fn handlers(self: &Arc<Self>) -> Handlers;

    /// Returns the observer name used in logs and in
    /// [`DispatchError::AlreadyRegistered`].
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Starts observing on the [`default_dispatcher`].
    ///
    /// # Errors
    /// See [`register_with`](Self::register_with).
    fn register(self: &Arc<Self>) -> Result<(), DispatchError>
    where
        Self: Sized,
    {
        self.register_with(default_dispatcher())
    }

    /// Starts observing on `dispatcher`: every `on_<code>` handler is
    /// afterwards called with the payload of each `<code>` signal.
    ///
    /// # Errors
    /// - [`DispatchError::AlreadyRegistered`] when called twice without
    ///   [`unregister`](Self::unregister) in between; the first registration
    ///   stays active.
    ///
    /// A bare `on_` handler observes the empty code `""`.
    fn register_with(self: &Arc<Self>, dispatcher: &Dispatcher) -> Result<(), DispatchError>
    where
        Self: Sized,
    {
        let registration = self.registration();
        if registration.is_registered() {
            return Err(DispatchError::AlreadyRegistered {
                observer: self.name().to_string(),
            });
        }
        registration.attach(dispatcher, self.name(), self.handlers())
    }

    /// Stops observing. Does nothing when not registered.
    fn unregister(&self) {
        self.registration().detach(self.name());
    }

    /// True while registered with a dispatcher.
    fn is_registered(&self) -> bool {
        self.registration().is_registered()
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::Payload;

    type Calls = Arc<Mutex<Vec<(&'static str, Payload)>>>;

    struct MyObserver {
        registration: Registration,
        calls: Calls,
    }

    impl MyObserver {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                registration: Registration::new(),
                calls: Calls::default(),
            })
        }

        fn on_foo(&self, payload: &Payload) -> anyhow::Result<()> {
            self.calls.lock().push(("foo", payload.clone()));
            Ok(())
        }

        fn on_bar(&self, payload: &Payload) -> anyhow::Result<()> {
            self.calls.lock().push(("bar", payload.clone()));
            Ok(())
        }

        fn calls(&self) -> Vec<(&'static str, Payload)> {
            self.calls.lock().clone()
        }
    }

    impl Observer for MyObserver {
        fn registration(&self) -> &Registration {
            &self.registration
        }

        fn handlers(self: &Arc<Self>) -> Handlers {
            crate::handlers!(self; on_foo, on_bar)
        }

        fn name(&self) -> &'static str {
            "my_observer"
        }
    }

    /// Exposes a handler named by the bare prefix.
    #[derive(Default)]
    struct BarePrefix {
        registration: Registration,
    }

    impl Observer for BarePrefix {
        fn registration(&self) -> &Registration {
            &self.registration
        }

        fn handlers(self: &Arc<Self>) -> Handlers {
            Handlers::new()
                .method("on_fine", |_| Ok(()))
                .method("on_", |_| Ok(()))
        }
    }

    #[test]
    fn register_observes_every_handler() {
        let d = Dispatcher::new();
        let o = MyObserver::new();
        o.register_with(&d).unwrap();

        d.emit("foo", 123).unwrap();
        d.emit("bar", ()).unwrap();

        assert_eq!(o.calls(), vec![("foo", json!(123)), ("bar", Payload::Null)]);
        assert!(o.is_registered());
        assert!(o.registration().dispatcher().unwrap().ptr_eq(&d));
    }

    #[test]
    fn register_twice_fails_and_keeps_first_registration() {
        let d = Dispatcher::new();
        let other = Dispatcher::new();
        let o = MyObserver::new();
        o.register_with(&d).unwrap();

        let err = o.register_with(&other).unwrap_err();
        assert_eq!(
            err,
            DispatchError::AlreadyRegistered {
                observer: "my_observer".into()
            }
        );
        assert_eq!(
            err.to_string(),
            "observer object my_observer already registered in signal dispatcher."
        );
        assert_eq!(d.observer_count("foo"), 1);
        assert!(!other.has_observers("foo"));

        d.emit("foo", 123).unwrap();
        assert_eq!(o.calls(), vec![("foo", json!(123))]);
    }

    #[test]
    fn unregister_then_register_again() {
        let d = Dispatcher::new();
        let o = MyObserver::new();
        o.register_with(&d).unwrap();

        o.unregister();
        d.emit("foo", 123).unwrap();
        assert!(o.calls().is_empty());
        assert!(!d.has_observers("foo"));
        assert!(!d.has_observers("bar"));

        o.register_with(&d).unwrap();
        d.emit("foo", 123).unwrap();
        assert_eq!(o.calls(), vec![("foo", json!(123))]);
    }

    #[test]
    fn unregister_several_times() {
        let d = Dispatcher::new();
        let o = MyObserver::new();
        o.unregister();
        o.register_with(&d).unwrap();
        o.unregister();
        o.unregister();

        d.emit("foo", 123).unwrap();
        assert!(o.calls().is_empty());
        assert!(!o.is_registered());
    }

    #[test]
    fn unregister_leaves_other_observers_alone() {
        let d = Dispatcher::new();
        let a = MyObserver::new();
        let b = MyObserver::new();
        a.register_with(&d).unwrap();
        b.register_with(&d).unwrap();
        assert_eq!(d.observer_count("foo"), 2);

        a.unregister();
        d.emit("foo", 1).unwrap();

        assert!(a.calls().is_empty());
        assert_eq!(b.calls(), vec![("foo", json!(1))]);
    }

    #[test]
    fn uses_default_dispatcher() {
        let o = MyObserver::new();
        o.register().unwrap();

        default_dispatcher().emit("foo", 123).unwrap();
        assert!(o.calls().contains(&("foo", json!(123))));

        o.unregister();
        assert!(o.registration().dispatcher().is_none());
    }

    #[test]
    fn bare_prefix_observes_the_empty_code() {
        let d = Dispatcher::new();
        let o = Arc::new(BarePrefix::default());

        o.register_with(&d).unwrap();

        assert!(o.is_registered());
        assert_eq!(d.observer_count("fine"), 1);
        assert_eq!(d.observer_count(""), 1);
        d.emit("", ()).unwrap();

        o.unregister();
        assert!(!d.has_observers(""));
    }

    #[test]
    fn dropping_observer_and_dispatcher_frees_both() {
        let d = Dispatcher::new();
        let o = MyObserver::new();
        let observer = Arc::downgrade(&o);
        o.register_with(&d).unwrap();
        drop(o);

        // The dispatcher's handlers keep the observer alive.
        assert!(observer.upgrade().is_some());
        d.emit("foo", 1).unwrap();

        drop(d);
        assert!(observer.upgrade().is_none());
    }

    #[test]
    fn registration_does_not_keep_the_dispatcher_alive() {
        let d = Dispatcher::new();
        let o = MyObserver::new();
        o.register_with(&d).unwrap();
        drop(d);

        assert!(o.registration().dispatcher().is_none());
        assert_eq!(Arc::strong_count(&o), 1);

        o.unregister();
        assert!(!o.is_registered());
        o.register_with(&Dispatcher::new()).unwrap();
    }

    #[test]
    fn failing_handler_reaches_exception_handlers() {
        struct Flaky {
            registration: Registration,
        }

        impl Flaky {
            fn on_job(&self, payload: &Payload) -> anyhow::Result<()> {
                anyhow::bail!("cannot process {payload}")
            }
        }

        impl Observer for Flaky {
            fn registration(&self) -> &Registration {
                &self.registration
            }

            fn handlers(self: &Arc<Self>) -> Handlers {
                crate::handlers!(self; on_job)
            }
        }

        let d = Dispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        d.on_exceptions(move |code, _, failures| {
            s.lock().push(format!("{code}: {}", failures[0]));
            Ok(())
        });

        let o = Arc::new(Flaky {
            registration: Registration::new(),
        });
        o.register_with(&d).unwrap();
        d.emit("job", 5).unwrap();

        assert_eq!(*seen.lock(), vec!["job: cannot process 5".to_string()]);
    }
}
