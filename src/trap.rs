//! Protected execution.
//!
//! [`trap`] runs a unit of work and turns whatever it raises into a
//! [`Failure`], so dispatch never has to tell a structured throw from a
//! native panic.

use core::any::Any;
use core::panic::Location;
use std::panic::{self, AssertUnwindSafe};

use crate::builtin::{FileError, InvalidOperation, NetworkError, NullArgument, OutOfRange};
use crate::failure::Failure;
use crate::hook::{self, Region};
use crate::kind::FailureKind;
use crate::stack;

type Payload = Box<dyn Any + Send + 'static>;

/// Outcome of [`trap`]: an optional failure plus whether a handler has
/// claimed it.
///
/// Dispatch methods live in [`crate::dispatch`]. A failure that is neither
/// claimed nor [rethrown](Trapped::rethrow) is dropped silently.
#[must_use = "an unclaimed failure is dropped unless it is dispatched or rethrown"]
#[derive(Debug)]
pub struct Trapped {
    pub(crate) failure: Option<Failure>,
    pub(crate) claimed: bool,
}

/// Run `work` with panics intercepted.
///
/// - Returns normally: no failure.
/// - Raises a [`Failure`] (via [`throw`](crate::throw) or
///   [`Failure::throw`]): carried unchanged.
/// - Panics with a bare kind (`panic_any(kind)` for a built-in kind, or a
///   `Box<dyn FailureKind>`): wrapped in a fresh failure.
/// - Panics with anything else: an [`InvalidOperation`] carrying the
///   payload's text.
///
/// A custom kind passed straight to `panic_any` is not recognized and ends
/// up as `InvalidOperation("non-string panic payload")`. Raise custom kinds
/// with [`throw`](crate::throw), or box them as `Box<dyn FailureKind>`.
///
/// Traps nest; each level owns its own result.
///
/// ```
/// use trapline::{trap, InvalidOperation};
///
/// let result = trap(|| panic!("boom"));
/// let failure = result.failure().unwrap();
/// assert!(failure.is::<InvalidOperation>());
/// assert!(failure.message().contains("boom"));
/// ```
#[track_caller]
pub fn trap<F: FnOnce()>(work: F) -> Trapped {
    let origin = Location::caller();
    let region = Region::enter();
    let outcome = panic::catch_unwind(AssertUnwindSafe(work));
    drop(region);

    match outcome {
        Ok(()) => Trapped::clean(),
        Err(payload) => Trapped::failed(normalize(payload, origin)),
    }
}

fn normalize(payload: Payload, origin: &'static Location<'static>) -> Failure {
    let payload = match payload.downcast::<Failure>() {
        Ok(failure) => {
            tracing::debug!(kind = failure.kind_name(), "trap caught failure");
            return *failure;
        }
        Err(p) => p,
    };
    let payload = match payload.downcast::<Box<Failure>>() {
        Ok(failure) => return **failure,
        Err(p) => p,
    };

    let text = describe(&*payload);
    let frames = hook::take_pending(&text).unwrap_or_else(|| stack::capture(origin));
    let failure = match bare_kind(payload) {
        Ok(kind) => Failure::from_boxed(kind, frames),
        Err(_) => Failure::from_boxed(Box::new(InvalidOperation::new(text)), frames),
    };
    tracing::debug!(
        kind = failure.kind_name(),
        message = failure.message(),
        "trap intercepted panic"
    );
    failure
}

/// Recover a kind raised without an envelope.
fn bare_kind(payload: Payload) -> Result<Box<dyn FailureKind>, Payload> {
    let payload = match payload.downcast::<Box<dyn FailureKind>>() {
        Ok(kind) => return Ok(*kind),
        Err(p) => p,
    };

    macro_rules! try_kinds {
        ($payload:ident, $($kind:ty),*) => {
            $(
                let $payload = match $payload.downcast::<$kind>() {
                    Ok(kind) => return Ok(kind as Box<dyn FailureKind>),
                    Err(p) => p,
                };
            )*
        };
    }

    try_kinds!(payload, NullArgument, OutOfRange, InvalidOperation, FileError, NetworkError);
    Err(payload)
}

/// Text for a panic payload that is not a failure kind.
pub(crate) fn describe(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        return (*s).to_string();
    }
    if let Some(s) = payload.downcast_ref::<String>() {
        return s.clone();
    }
    if let Some(e) = payload.downcast_ref::<Box<dyn std::error::Error + Send + Sync>>() {
        return e.to_string();
    }
    if let Some(e) = payload.downcast_ref::<std::io::Error>() {
        return e.to_string();
    }
    #[cfg(feature = "anyhow")]
    if let Some(e) = payload.downcast_ref::<anyhow::Error>() {
        return e.to_string();
    }

    macro_rules! try_display {
        ($($t:ty),*) => {
            $(
                if let Some(v) = payload.downcast_ref::<$t>() {
                    return v.to_string();
                }
            )*
        };
    }

    try_display!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char);
    "non-string panic payload".to_string()
}

impl Trapped {
    pub(crate) fn clean() -> Self {
        Self {
            failure: None,
            claimed: false,
        }
    }

    pub(crate) fn failed(failure: Failure) -> Self {
        Self {
            failure: Some(failure),
            claimed: false,
        }
    }

    /// Whether the unit of work raised anything.
    pub fn has_failure(&self) -> bool {
        self.failure.is_some()
    }

    /// The failure, claimed or not.
    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// Whether a handler has claimed the failure.
    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// The failure if it is still waiting for a handler.
    pub fn unclaimed(&self) -> Option<&Failure> {
        if self.claimed {
            None
        } else {
            self.failure.as_ref()
        }
    }

    /// Take ownership of the failure, e.g. to use it as a cause.
    pub fn into_failure(self) -> Option<Failure> {
        self.failure
    }

    /// `Err` with the failure if it is still unclaimed, `Ok` otherwise.
    pub fn into_result(self) -> crate::Result<()> {
        match self.failure {
            Some(failure) if !self.claimed => Err(failure),
            _ => Ok(()),
        }
    }

    /// Raise the stored failure again if no handler claimed it.
    ///
    /// No-op when there was no failure or it was claimed.
    #[track_caller]
    pub fn rethrow(self) {
        if self.claimed {
            return;
        }
        if let Some(failure) = self.failure {
            tracing::debug!(kind = failure.kind_name(), "rethrowing unclaimed failure");
            failure.throw();
        }
    }
}
