//! Handler dispatch.
//!
//! Three ways to route a [`Trapped`] failure to a handler, all with the same
//! rules:
//!
//! - A handler for kind `K` fires only if the failure's kind is exactly `K`.
//! - The first matching handler claims the result; nothing fires after it.
//! - Catch-all handlers fire only if nothing claimed the result first.
//! - `finally` always runs, failure or not, claimed or not.
//!
//! | Style | Entry point |
//! |-------|-------------|
//! | Direct | [`catch::<K>(result, h)`](catch) |
//! | Builder | [`result.when().on::<K>(h).any(h).finally(f)`](Trapped::when) |
//! | Handler list | [`result.handle([handler::<K>(h), handler_any(h)])`](Trapped::handle) |

use core::marker::PhantomData;

use crate::failure::Failure;
use crate::kind::FailureKind;
use crate::trap::Trapped;

impl Trapped {
    /// Invoke `handler` if the result is unclaimed and its kind is `K`.
    fn claim_kind<K: FailureKind>(&mut self, via: &'static str, handler: impl FnOnce(&K, &Failure)) {
        if self.claimed {
            return;
        }
        let Some(failure) = self.failure.as_ref() else {
            return;
        };
        if let Some(kind) = failure.kind_as::<K>() {
            handler(kind, failure);
            self.claimed = true;
            tracing::trace!(kind = failure.kind_name(), via, "failure claimed");
        }
    }

    /// Invoke `handler` if the result holds an unclaimed failure.
    fn claim_any(&mut self, via: &'static str, handler: impl FnOnce(&Failure)) {
        if self.claimed {
            return;
        }
        if let Some(failure) = self.failure.as_ref() {
            handler(failure);
            self.claimed = true;
            tracing::trace!(kind = failure.kind_name(), via, "failure claimed");
        }
    }

    /// Catch-all: handle any failure nothing else claimed.
    pub fn any(mut self, handler: impl FnOnce(&Failure)) -> Self {
        self.claim_any("any", handler);
        self
    }

    /// Run `cleanup` unconditionally and return the result.
    ///
    /// A panic inside `cleanup` propagates to the caller.
    pub fn finally(self, cleanup: impl FnOnce()) -> Self {
        cleanup();
        self
    }

    /// Start a handler chain.
    pub fn when(self) -> Catcher {
        Catcher { result: self }
    }

    /// Try each handler in order until one handles the failure.
    ///
    /// ```
    /// use trapline::{handler, handler_any, throw_argument_null, trap, NullArgument};
    ///
    /// let mut param = String::new();
    /// let result = trap(|| throw_argument_null("user", "")).handle([
    ///     handler::<NullArgument>(|k, _| param = k.param.clone()),
    ///     handler_any(|_| unreachable!()),
    /// ]);
    /// assert!(result.is_claimed());
    /// assert_eq!(param, "user");
    /// ```
    pub fn handle<I>(mut self, handlers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Handler,
    {
        if self.claimed {
            return self;
        }
        if let Some(failure) = self.failure.as_ref() {
            for mut h in handlers {
                if h.attempt(failure) {
                    self.claimed = true;
                    tracing::trace!(kind = failure.kind_name(), via = "handle", "failure claimed");
                    break;
                }
            }
        }
        self
    }
}

/// Handle a failure of kind `K`, if that is what the result holds.
///
/// ```
/// use trapline::{catch, throw_invalid_operation, trap, InvalidOperation};
///
/// let result = catch::<InvalidOperation>(trap(|| throw_invalid_operation("closed")), |k, _| {
///     assert_eq!(k.message, "closed");
/// });
/// assert!(result.is_claimed());
/// ```
pub fn catch<K: FailureKind>(mut result: Trapped, handler: impl FnOnce(&K, &Failure)) -> Trapped {
    result.claim_kind("catch", handler);
    result
}

// ============================================================
// Builder
// ============================================================

/// Chained handler builder returned by [`Trapped::when`].
#[must_use = "call `finally` or `end` to get the result back"]
#[derive(Debug)]
pub struct Catcher {
    result: Trapped,
}

impl Catcher {
    /// Handle kind `K`.
    pub fn on<K: FailureKind>(mut self, handler: impl FnOnce(&K, &Failure)) -> Self {
        self.result.claim_kind("on", handler);
        self
    }

    /// Handle whatever is left unclaimed.
    pub fn any(mut self, handler: impl FnOnce(&Failure)) -> Self {
        self.result.claim_any("any", handler);
        self
    }

    /// Run `cleanup` unconditionally and return the result.
    pub fn finally(self, cleanup: impl FnOnce()) -> Trapped {
        self.result.finally(cleanup)
    }

    /// Return the result without cleanup.
    pub fn end(self) -> Trapped {
        self.result
    }
}

// ============================================================
// Handler list
// ============================================================

/// One entry of a [`Trapped::handle`] list.
pub trait Handler {
    /// Handle `failure` if this entry applies to it. Returns whether it did.
    fn attempt(&mut self, failure: &Failure) -> bool;
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn attempt(&mut self, failure: &Failure) -> bool {
        (**self).attempt(failure)
    }
}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn attempt(&mut self, failure: &Failure) -> bool {
        (**self).attempt(failure)
    }
}

/// Handler for exactly one kind.
pub struct Typed<K, F> {
    handler: F,
    _kind: PhantomData<fn(&K)>,
}

impl<K: FailureKind, F: FnMut(&K, &Failure)> Handler for Typed<K, F> {
    fn attempt(&mut self, failure: &Failure) -> bool {
        match failure.kind_as::<K>() {
            Some(kind) => {
                (self.handler)(kind, failure);
                true
            }
            None => false,
        }
    }
}

/// Handler for any kind. Always reports handled.
pub struct CatchAll<F> {
    handler: F,
}

impl<F: FnMut(&Failure)> Handler for CatchAll<F> {
    fn attempt(&mut self, failure: &Failure) -> bool {
        (self.handler)(failure);
        true
    }
}

/// Boxed handler for kind `K`.
pub fn handler<'a, K: FailureKind>(f: impl FnMut(&K, &Failure) + 'a) -> Box<dyn Handler + 'a> {
    Box::new(Typed {
        handler: f,
        _kind: PhantomData,
    })
}

/// Boxed catch-all handler.
pub fn handler_any<'a>(f: impl FnMut(&Failure) + 'a) -> Box<dyn Handler + 'a> {
    Box::new(CatchAll { handler: f })
}
