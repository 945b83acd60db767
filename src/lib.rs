//! trapline - structured, kind-dispatched exceptions over Rust panics
//!
//! # Overview
//!
//! `trapline` lets code raise a typed failure deep in a call stack and
//! handle it at a chosen ancestor frame. A protected region ([`trap`])
//! turns anything raised inside it, structured throw or native panic, into
//! a [`Failure`]; handlers are then matched against the failure's kind in
//! order, first match wins.
//!
//! # Quick Start
//!
//! ```
//! use trapline::{handler, handler_any, throw_if_nil, trap, NullArgument};
//!
//! fn greet(user: Option<&str>) {
//!     throw_if_nil("user", &user);
//!     println!("hello {}", user.unwrap_or_default());
//! }
//!
//! let mut cleaned = false;
//! let result = trap(|| greet(None))
//!     .handle([
//!         handler::<NullArgument>(|k, _| assert_eq!(k.param, "user")),
//!         handler_any(|f| eprintln!("unexpected: {}", f)),
//!     ])
//!     .finally(|| cleaned = true);
//!
//! assert!(result.is_claimed());
//! assert!(cleaned);
//! ```
//!
//! # Raising
//!
//! | Function | Raises |
//! |----------|--------|
//! | [`throw(kind)`](throw) | `kind` |
//! | [`throw_if(cond, kind)`](throw_if) | `kind` when `cond` |
//! | [`throw_if_nil(name, &v)`](throw_if_nil) | [`NullArgument`] when `v` is nil |
//! | [`throw_with_cause(kind, cause)`](throw_with_cause) | `kind` wrapping an earlier failure |
//! | [`Failure::throw`] | a prepared failure, e.g. with attachments |
//!
//! # Handling
//!
//! | Pattern | Description |
//! |---------|-------------|
//! | `catch::<K>(result, \|k, f\| ..)` | Direct registration |
//! | `result.when().on::<K>(..).any(..).finally(..)` | Chained builder |
//! | `result.handle([handler::<K>(..), handler_any(..)])` | Ordered handler list |
//! | `result.any(..)` | Catch-all |
//! | `result.finally(..)` | Cleanup, always runs |
//! | `result.rethrow()` | Raise again if unclaimed |
//!
//! # Chains
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`Failure::has_cause`] / [`Failure::cause`] | Direct cause |
//! | [`Failure::full_message`] | Renders joined by `" --> "` |
//! | [`Failure::flatten`] | This failure then each cause |
//! | [`Failure::find_cause::<K>`](Failure::find_cause) | First kind `K` in the chain |
//!
//! # Custom kinds
//!
//! ```
//! use trapline::{throw, trap, FailureKind};
//!
//! #[derive(Debug, thiserror::Error, FailureKind)]
//! #[error("RateLimited: retry after {retry_after}s")]
//! struct RateLimited {
//!     retry_after: u64,
//! }
//!
//! let result = trap(|| throw(RateLimited { retry_after: 30 }))
//!     .when()
//!     .on::<RateLimited>(|k, _| assert_eq!(k.retry_after, 30))
//!     .end();
//! assert!(result.is_claimed());
//! ```

extern crate self as trapline;

// ============================================================
// Modules
// ============================================================

mod builtin;
pub mod config;
mod dispatch;
mod ext;
mod failure;
mod hook;
mod kind;
mod stack;
mod throw;
mod trap;
mod value;

// ============================================================
// Re-exports
// ============================================================

pub use builtin::{FileError, InvalidOperation, NetworkError, NullArgument, OutOfRange};
pub use config::Config;
pub use dispatch::{catch, handler, handler_any, CatchAll, Catcher, Handler, Typed};
pub use ext::{NilExt, ThrowExt};
pub use failure::{Chain, Failure, CAUSE_SEPARATOR};
pub use kind::FailureKind;
pub use throw::{
    throw, throw_argument_null, throw_file_error, throw_if, throw_if_nil, throw_invalid_operation,
    throw_network_error, throw_out_of_range, throw_with_cause, Nullable,
};
pub use trap::{trap, Trapped};
pub use value::{IntoValue, Value};

/// Derive macro for [`FailureKind`](trait@FailureKind).
pub use trapline_macros::FailureKind;

#[doc(hidden)]
pub use kind::AsAny;

/// Result type alias for moving a failure out of a trap as a value.
pub type Result<T, E = Failure> = core::result::Result<T, E>;
