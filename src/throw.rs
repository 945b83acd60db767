//! Throw operations.
//!
//! All of these raise a [`Failure`] with the stack captured at the call
//! site and never return. Use them inside [`trap`](crate::trap); outside a
//! protected region the failure surfaces as an ordinary panic.

use crate::builtin::{FileError, InvalidOperation, NetworkError, NullArgument, OutOfRange};
use crate::failure::Failure;
use crate::kind::FailureKind;
use crate::value::IntoValue;

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Raise `kind`.
#[track_caller]
pub fn throw<K: FailureKind>(kind: K) -> ! {
    Failure::new(kind).throw()
}

/// Raise `kind` when `condition` holds.
#[track_caller]
pub fn throw_if<K: FailureKind>(condition: bool, kind: K) {
    if condition {
        throw(kind)
    }
}

/// Raise `kind` with `cause` as its inner failure.
///
/// The new failure captures its own stack; the cause keeps the one it was
/// raised with.
#[track_caller]
pub fn throw_with_cause<K: FailureKind>(kind: K, cause: Option<Failure>) -> ! {
    Failure::with_cause(kind, cause).throw()
}

/// A value that may be absent.
pub trait Nullable {
    fn is_nil(&self) -> bool;
}

impl<T> Nullable for Option<T> {
    fn is_nil(&self) -> bool {
        self.is_none()
    }
}

impl<T: ?Sized> Nullable for *const T {
    fn is_nil(&self) -> bool {
        self.is_null()
    }
}

impl<T: ?Sized> Nullable for *mut T {
    fn is_nil(&self) -> bool {
        self.is_null()
    }
}

impl<T: Nullable + ?Sized> Nullable for &T {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

/// Raise [`NullArgument`] for `param` if `value` is nil.
///
/// ```
/// use trapline::{throw_if_nil, trap, NullArgument};
///
/// let user: Option<&str> = None;
/// let result = trap(|| throw_if_nil("user", &user));
/// assert_eq!(result.failure().unwrap().kind_as::<NullArgument>().unwrap().param, "user");
/// ```
#[track_caller]
pub fn throw_if_nil<T: Nullable + ?Sized>(param: &str, value: &T) {
    if value.is_nil() {
        throw(NullArgument::new(param, ""))
    }
}

#[track_caller]
pub fn throw_argument_null(param: &str, message: &str) -> ! {
    throw(NullArgument::new(param, message))
}

#[track_caller]
pub fn throw_out_of_range(param: &str, value: impl IntoValue, message: &str) -> ! {
    throw(OutOfRange::new(param, value, message))
}

#[track_caller]
pub fn throw_invalid_operation(message: &str) -> ! {
    throw(InvalidOperation::new(message))
}

#[track_caller]
pub fn throw_file_error(filename: &str, message: &str, cause: Option<Cause>) -> ! {
    throw(FileError {
        filename: filename.to_string(),
        message: message.to_string(),
        cause,
    })
}

#[track_caller]
pub fn throw_network_error(endpoint: &str, message: &str, cause: Option<Cause>) -> ! {
    throw(NetworkError {
        endpoint: endpoint.to_string(),
        message: message.to_string(),
        cause,
    })
}
