//! Extension traits bridging `Result` and `Option` into throws.

use core::fmt;

use crate::builtin::{InvalidOperation, NullArgument};
use crate::kind::FailureKind;
use crate::throw::throw;

/// Turn an `Err` into a raised failure.
pub trait ThrowExt<T, E> {
    /// Unwrap `Ok`, or raise the kind built from the error.
    fn or_throw<K, F>(self, f: F) -> T
    where
        K: FailureKind,
        F: FnOnce(E) -> K;

    /// Unwrap `Ok`, or raise [`InvalidOperation`] with the error's text.
    fn or_throw_invalid(self) -> T
    where
        E: fmt::Display;
}

impl<T, E> ThrowExt<T, E> for Result<T, E> {
    #[track_caller]
    fn or_throw<K, F>(self, f: F) -> T
    where
        K: FailureKind,
        F: FnOnce(E) -> K,
    {
        match self {
            Ok(v) => v,
            Err(e) => throw(f(e)),
        }
    }

    #[track_caller]
    fn or_throw_invalid(self) -> T
    where
        E: fmt::Display,
    {
        match self {
            Ok(v) => v,
            Err(e) => throw(InvalidOperation::new(e.to_string())),
        }
    }
}

/// Turn a `None` into a raised [`NullArgument`].
pub trait NilExt<T> {
    /// Unwrap `Some`, or raise [`NullArgument`] naming `param`.
    fn or_throw_nil(self, param: &str) -> T;
}

impl<T> NilExt<T> for Option<T> {
    #[track_caller]
    fn or_throw_nil(self, param: &str) -> T {
        match self {
            Some(v) => v,
            None => throw(NullArgument::new(param, "")),
        }
    }
}
