//! Observer and exception-handler handles.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use crate::Payload;
use crate::error::ObserverFailure;

/// Callable stored for one observer.
pub type ObserverFn = dyn Fn(&Payload) -> anyhow::Result<()> + Send + Sync;

/// Callable stored for one exception handler: `(code, payload, failures)`.
pub type ExceptionHandlerFn =
    dyn Fn(&str, &Payload, &[ObserverFailure]) -> anyhow::Result<()> + Send + Sync;

/// Shared reference to an observer callable.
///
/// Equality and hashing use the identity of the allocation, not the callable's
/// behavior: clones of one `ObserverRef` are equal, two refs built from
/// identical closures are not. A dispatcher stores observers per code as a set
/// of these, so observing the same ref twice under one code keeps one entry.
///
/// ```
/// use sigdispatch::{Dispatcher, ObserverRef};
///
/// let d = Dispatcher::new();
/// let obs = ObserverRef::new(|_payload| Ok(()));
/// d.observe_ref("foo", obs.clone()).unwrap();
/// d.observe_ref("foo", obs).unwrap();
/// assert_eq!(d.observer_count("foo"), 1);
/// ```
#[derive(Clone)]
pub struct ObserverRef(Arc<ObserverFn>);

impl ObserverRef {
    /// Wraps a callable in a fresh handle.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Payload) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wraps an already shared callable; clones of the same `Arc` compare equal.
    pub fn from_arc(f: Arc<ObserverFn>) -> Self {
        Self(f)
    }

    #[inline]
    pub(crate) fn call(&self, payload: &Payload) -> anyhow::Result<()> {
        (self.0)(payload)
    }

    #[inline]
    pub(crate) fn downgrade(&self) -> Weak<ObserverFn> {
        Arc::downgrade(&self.0)
    }

    #[inline]
    pub(crate) fn upgrade(weak: &Weak<ObserverFn>) -> Option<Self> {
        weak.upgrade().map(Self)
    }

    #[inline]
    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl PartialEq for ObserverRef {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for ObserverRef {}

impl Hash for ObserverRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for ObserverRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObserverRef")
            .field(&format_args!("{:#x}", self.addr()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn identity_not_behavior() {
        let a = ObserverRef::new(|_| Ok(()));
        let b = ObserverRef::new(|_| Ok(()));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);

        let set: HashSet<_> = [a.clone(), a, b].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    fn noop(_: &Payload) -> anyhow::Result<()> {
        Ok(())
    }

    #[test]
    fn from_arc_shares_identity() {
        let f: Arc<ObserverFn> = Arc::new(noop);
        assert_eq!(
            ObserverRef::from_arc(Arc::clone(&f)),
            ObserverRef::from_arc(f)
        );
    }

    #[test]
    fn upgrade_keeps_identity() {
        let a = ObserverRef::new(noop);
        let weak = a.downgrade();
        assert_eq!(ObserverRef::upgrade(&weak), Some(a.clone()));
        drop(a);
        assert_eq!(ObserverRef::upgrade(&weak), None);
    }
}
