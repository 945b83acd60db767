//! Panic hook and protected-region bookkeeping.
//!
//! The hook is installed once per process and chains to whatever hook was
//! in place before it. Each thread tracks how many `trap` calls it is
//! currently nested in; only panics raised inside a protected region are
//! treated as intercepted.

use std::cell::{Cell, RefCell};
use std::panic;
use std::sync::Once;

use crate::config;
use crate::failure::Failure;
use crate::stack::{self, Frames};
use crate::trap::describe;

thread_local! {
    static DEPTH: Cell<usize> = Cell::new(0);
    /// Frames captured by the hook at the fault site, picked up by `trap`.
    static PENDING: RefCell<Option<Pending>> = RefCell::new(None);
}

/// Fault-site frames plus the text of the payload they were captured for.
struct Pending {
    text: String,
    frames: Frames,
}

static INSTALL: Once = Once::new();

/// Install the trapline panic hook if it is not installed yet.
///
/// The hook cannot be replaced while this thread unwinds, so installation
/// waits for the next call made outside a panic.
pub(crate) fn install() {
    if INSTALL.is_completed() || std::thread::panicking() {
        return;
    }
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let protected = DEPTH.try_with(Cell::get).unwrap_or(0) > 0;

            if let Some(failure) = info.payload().downcast_ref::<Failure>() {
                // Structured throws carry their own frames.
                if !protected {
                    report_uncaught(failure);
                }
                return;
            }

            if !protected {
                previous(info);
                return;
            }

            let frames = match info.location() {
                Some(loc) => stack::capture(loc),
                None => stack::capture(panic::Location::caller()),
            };
            let pending = Pending {
                text: describe(info.payload()),
                frames,
            };
            let _ = PENDING.try_with(|p| *p.borrow_mut() = Some(pending));
            if config::current().report_intercepted {
                previous(info);
            }
        }));
        tracing::trace!("trapline panic hook installed");
    });
}

fn report_uncaught(failure: &Failure) {
    let thread = std::thread::current();
    let name = thread.name().unwrap_or("<unnamed>");
    tracing::error!(
        kind = failure.kind_name(),
        thread = name,
        "uncaught failure: {}",
        failure.full_message()
    );
    eprintln!("thread '{}' raised an uncaught failure: {}", name, failure.full_message());
    for frame in failure.stack_frames() {
        eprintln!("    at {}", frame);
    }
}

/// Marks the current thread as inside a protected region until dropped.
pub(crate) struct Region {
    _private: (),
}

impl Region {
    pub(crate) fn enter() -> Self {
        install();
        DEPTH.with(|d| d.set(d.get() + 1));
        clear_pending();
        Region { _private: () }
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        let _ = DEPTH.try_with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// Take the frames stashed by the hook for the latest intercepted panic.
///
/// `text` is the description of the payload `trap` received. Frames stashed
/// for a different payload belong to a panic that was caught and dropped
/// elsewhere, and are discarded.
pub(crate) fn take_pending(text: &str) -> Option<Frames> {
    PENDING
        .try_with(|p| p.borrow_mut().take())
        .ok()
        .flatten()
        .filter(|pending| pending.text == text)
        .map(|pending| pending.frames)
}

fn clear_pending() {
    let _ = PENDING.try_with(|p| p.borrow_mut().take());
}

/// Current protected-region nesting depth on this thread.
#[cfg(test)]
pub(crate) fn depth() -> usize {
    DEPTH.with(Cell::get)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_depth() {
        assert_eq!(depth(), 0);
        {
            let _outer = Region::enter();
            assert_eq!(depth(), 1);
            {
                let _inner = Region::enter();
                assert_eq!(depth(), 2);
            }
            assert_eq!(depth(), 1);
        }
        assert_eq!(depth(), 0);
    }

    fn stash(text: &str) {
        PENDING.with(|p| {
            *p.borrow_mut() = Some(Pending {
                text: text.to_string(),
                frames: Frames::from_vec(vec!["site".to_string()]),
            })
        });
    }

    #[test]
    fn test_pending_cleared_on_enter() {
        stash("boom");
        let _region = Region::enter();
        assert!(take_pending("boom").is_none());
    }

    #[test]
    fn test_pending_matches_payload() {
        stash("first");
        assert!(take_pending("second").is_none());
        // A mismatch still consumes the stale entry.
        assert!(take_pending("first").is_none());

        stash("boom");
        assert_eq!(take_pending("boom").unwrap().as_slice(), ["site".to_string()]);
    }

    #[test]
    fn test_install_skipped_while_panicking() {
        struct Guard;
        impl Drop for Guard {
            fn drop(&mut self) {
                assert!(std::thread::panicking());
                install();
            }
        }
        let outcome = std::thread::spawn(|| {
            let _guard = Guard;
            panic!("unwinding");
        })
        .join();
        assert!(outcome.is_err());
    }
}
