//! Bounded stack capture.
//!
//! Frames are rendered as `file:line symbol` (or just `symbol` when no debug
//! info is available), most recent call first. Frames from the unwinding
//! runtime and from this crate's own machinery are skipped.

use core::panic::Location;
use smallvec::SmallVec;

use crate::config;

/// Captured frames. Inline storage covers short traces.
pub(crate) type Frames = SmallVec<[String; 4]>;

/// Symbol fragments that mark a frame as runtime or crate-internal.
#[cfg_attr(not(feature = "backtrace"), allow(dead_code))]
const INTERNAL: &[&str] = &[
    "backtrace::",
    "std::backtrace",
    "std::panicking",
    "std::panic::",
    "std::sys::",
    "core::panicking",
    "core::panic::",
    "core::ops::function::",
    "<alloc::boxed::Box<F,A> as core::ops::function::",
    "rust_begin_unwind",
    "rust_panic",
    "__rust_",
    "trapline::stack::",
    "trapline::hook::",
    "trapline::trap::",
    "trapline::throw::",
    "trapline::failure::",
    "trapline::ext::",
];

#[cfg_attr(not(feature = "backtrace"), allow(dead_code))]
fn is_internal(symbol: &str) -> bool {
    INTERNAL.iter().any(|needle| symbol.contains(needle))
}

fn origin_frame(origin: &Location<'_>) -> String {
    format!("{}:{}:{}", origin.file(), origin.line(), origin.column())
}

/// Capture the current call stack.
///
/// `origin` is the throw or panic site. It becomes the only frame when stack
/// walking is disabled or unavailable.
#[inline(never)]
pub(crate) fn capture(origin: &Location<'_>) -> Frames {
    let cfg = config::current();
    let mut frames = Frames::new();
    if cfg.frame_limit == 0 {
        return frames;
    }
    if cfg.capture_stack {
        walk(cfg.frame_limit, &mut frames);
    }
    if frames.is_empty() {
        frames.push(origin_frame(origin));
    }
    frames
}

#[cfg(feature = "backtrace")]
fn walk(limit: usize, frames: &mut Frames) {
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if frames.len() >= limit {
                return;
            }
            let name = match symbol.name() {
                Some(name) => format!("{:#}", name),
                None => return,
            };
            if is_internal(&name) {
                return;
            }
            let entry = match (symbol.filename(), symbol.lineno()) {
                (Some(file), Some(line)) => format!("{}:{} {}", file.display(), line, name),
                _ => name,
            };
            frames.push(entry);
        });
        frames.len() < limit
    });
}

#[cfg(not(feature = "backtrace"))]
fn walk(_limit: usize, _frames: &mut Frames) {}
