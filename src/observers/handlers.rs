//! # Handler map for convention-based observers.
//!
//! [`Handlers`] is what an [`Observer`](crate::Observer) returns from
//! [`Observer::handlers`](crate::Observer::handlers): a list of methods named by
//! the `on_<code>` convention. Names without the `on_` prefix are not handlers
//! and are skipped.
//!
//! The [`handlers!`](crate::handlers) macro builds the map straight from method
//! identifiers, so a method `on_user_created` observes `user_created`.

use tracing::trace;

use crate::Payload;
use crate::dispatcher::ObserverRef;

/// Method-name prefix marking a handler.
pub const HANDLER_PREFIX: &str = "on_";

/// `on_<code>` handlers exposed by one observer.
///
/// ```
/// use sigdispatch::Handlers;
///
/// let handlers = Handlers::new()
///     .method("on_foo", |_payload| Ok(()))
///     .method("helper", |_payload| Ok(()));
///
/// assert_eq!(handlers.codes().collect::<Vec<_>>(), vec!["foo"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Handlers {
    entries: Vec<(String, ObserverRef)>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the method `name`, if it follows the `on_<code>` convention.
    pub fn method<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&Payload) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.method_ref(name, ObserverRef::new(f))
    }

    /// Like [`method`](Self::method), with a shared handle.
    pub fn method_ref(mut self, name: &str, observer: ObserverRef) -> Self {
        match name.strip_prefix(HANDLER_PREFIX) {
            Some(code) => self.entries.push((code.to_string(), observer)),
            None => trace!(method = name, "not an on_<code> handler, skipped"),
        }
        self
    }

    /// Signal codes covered, in insertion order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(code, _)| code.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Handlers {
    type Item = (String, ObserverRef);
    type IntoIter = std::vec::IntoIter<(String, ObserverRef)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Builds [`Handlers`] from `on_<code>` methods of an `Arc`-held observer.
///
/// Each method must have the signature
/// `fn on_<code>(&self, payload: &Payload) -> anyhow::Result<()>`.
/// The closure registered for it keeps its own clone of the `Arc`.
///
/// ```
/// use std::sync::Arc;
/// use sigdispatch::{handlers, Handlers, Payload};
///
/// struct Greeter;
///
/// impl Greeter {
///     fn on_hello(&self, _payload: &Payload) -> anyhow::Result<()> { Ok(()) }
///     fn on_bye(&self, _payload: &Payload) -> anyhow::Result<()> { Ok(()) }
/// }
///
/// let greeter = Arc::new(Greeter);
/// let map: Handlers = handlers!(&greeter; on_hello, on_bye);
/// assert_eq!(map.codes().collect::<Vec<_>>(), vec!["hello", "bye"]);
/// ```
#[macro_export]
macro_rules! handlers {
    ($this:expr; $($method:ident),* $(,)?) => {{
        let this: &::std::sync::Arc<_> = $this;
        let handlers = $crate::Handlers::new();
        $(
            let handlers = {
                let this = ::std::sync::Arc::clone(this);
                handlers.method(
                    ::std::stringify!($method),
                    move |payload: &$crate::Payload| this.$method(payload),
                )
            };
        )*
        handlers
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_the_prefix() {
        let handlers = Handlers::new()
            .method("on_foo", |_| Ok(()))
            .method("on_user.created", |_| Ok(()));
        assert_eq!(
            handlers.codes().collect::<Vec<_>>(),
            vec!["foo", "user.created"]
        );
        assert_eq!(handlers.len(), 2);
    }

    #[test]
    fn skips_unconventional_names() {
        let handlers = Handlers::new()
            .method("foo", |_| Ok(()))
            .method("onfoo", |_| Ok(()))
            .method("On_foo", |_| Ok(()));
        assert!(handlers.is_empty());
    }

    #[test]
    fn bare_prefix_keeps_an_empty_code() {
        let handlers = Handlers::new().method("on_", |_| Ok(()));
        assert_eq!(handlers.codes().collect::<Vec<_>>(), vec![""]);
    }
}
