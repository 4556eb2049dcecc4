//! Event-callback adapters that drop the event argument.
//!
//! Event sources hand every handler the event first. Callbacks written for
//! other APIs usually don't want it, so these adapters discard it and forward
//! the rest, optionally prefixed with arguments bound at creation time.

/// Wrap a one-argument callback as a two-argument event handler.
pub fn discard_event<E, A, R, F>(callback: F) -> impl Fn(&E, A) -> R
where
    F: Fn(A) -> R,
{
    move |_event, arg| callback(arg)
}

/// Adapter for callbacks over a uniform argument list.
///
/// Calling it with `[event, rest @ ..]` invokes the callback with
/// `bound ++ rest`.
pub struct EventProxy<T, F> {
    callback: F,
    bound: Vec<T>,
}

impl<T, R, F> EventProxy<T, F>
where
    T: Clone,
    F: Fn(&[T]) -> R,
{
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            bound: Vec::new(),
        }
    }

    pub fn with_bound(callback: F, bound: Vec<T>) -> Self {
        Self { callback, bound }
    }

    pub fn call(&self, args: &[T]) -> R {
        let rest = args.get(1..).unwrap_or(&[]);
        if self.bound.is_empty() {
            return (self.callback)(rest);
        }

        let mut forwarded = Vec::with_capacity(self.bound.len() + rest.len());
        forwarded.extend_from_slice(&self.bound);
        forwarded.extend_from_slice(rest);
        (self.callback)(&forwarded)
    }
}

/// Build an [`EventProxy`] and return it as a plain closure.
pub fn event_proxy<T, R, F>(callback: F, bound: Vec<T>) -> impl Fn(&[T]) -> R
where
    T: Clone,
    F: Fn(&[T]) -> R,
{
    let proxy = EventProxy::with_bound(callback, bound);
    move |args| proxy.call(args)
}
