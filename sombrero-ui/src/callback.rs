//! Identity-comparable callback handles.
//!
//! Controller args carry these so `Args` structs can stay `Clone + PartialEq`
//! without comparing closures deeply: two handles are equal only when they
//! share the same underlying closure.

use std::sync::Arc;

/// Shared callback for `Fn(T) -> R`, used for value notifications such as
/// "order committed" or "endpoint connected".
pub struct CallbackWith<T, R = ()> {
    handler: Arc<dyn Fn(T) -> R + Send + Sync>,
}

impl<T, R> CallbackWith<T, R> {
    /// Create a callback handle from a closure.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Invoke the callback with an argument.
    pub fn call(&self, value: T) -> R {
        (self.handler)(value)
    }
}

impl<T, R, F> From<F> for CallbackWith<T, R>
where
    F: Fn(T) -> R + Send + Sync + 'static,
{
    fn from(handler: F) -> Self {
        Self::new(handler)
    }
}

impl<T, R> Clone for CallbackWith<T, R> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<T, R> PartialEq for CallbackWith<T, R> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl<T, R> Eq for CallbackWith<T, R> {}

impl<T, R> std::fmt::Debug for CallbackWith<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CallbackWith(<fn>)")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn callbacks_compare_by_identity() {
        let a: CallbackWith<usize> = CallbackWith::new(|_| {});
        let b = a.clone();
        let c: CallbackWith<usize> = CallbackWith::new(|_| {});
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn callback_with_forwards_argument() {
        let total = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&total);
        let add: CallbackWith<usize> = CallbackWith::new(move |n| {
            sink.fetch_add(n, Ordering::SeqCst);
        });
        add.call(3);
        add.clone().call(4);
        assert_eq!(total.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn callback_with_returns_value() {
        let double: CallbackWith<i32, i32> = (|n: i32| n * 2).into();
        assert_eq!(double.call(21), 42);
    }
}
