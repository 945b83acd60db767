//! Process-wide runtime settings.
//!
//! ```
//! use trapline::Config;
//!
//! Config::new().frame_limit(6).apply();
//! assert_eq!(trapline::config::current().frame_limit, 6);
//! # Config::default().apply();
//! ```

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Default number of stack frames kept per failure.
pub const DEFAULT_FRAME_LIMIT: usize = 12;

static FRAME_LIMIT: AtomicUsize = AtomicUsize::new(DEFAULT_FRAME_LIMIT);
static CAPTURE_STACK: AtomicBool = AtomicBool::new(true);
static REPORT_INTERCEPTED: AtomicBool = AtomicBool::new(false);

/// Runtime settings, applied with [`Config::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum frames recorded per failure.
    pub frame_limit: usize,
    /// Walk the call stack on throw. When off, only the throw site is kept.
    pub capture_stack: bool,
    /// Forward panics intercepted by `trap` to the previously installed
    /// panic hook, so they still print.
    pub report_intercepted: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_limit: DEFAULT_FRAME_LIMIT,
            capture_stack: true,
            report_intercepted: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_limit(mut self, limit: usize) -> Self {
        self.frame_limit = limit;
        self
    }

    pub fn capture_stack(mut self, on: bool) -> Self {
        self.capture_stack = on;
        self
    }

    pub fn report_intercepted(mut self, on: bool) -> Self {
        self.report_intercepted = on;
        self
    }

    /// Install these settings for the whole process.
    pub fn apply(self) {
        FRAME_LIMIT.store(self.frame_limit, Ordering::Relaxed);
        CAPTURE_STACK.store(self.capture_stack, Ordering::Relaxed);
        REPORT_INTERCEPTED.store(self.report_intercepted, Ordering::Relaxed);
        tracing::debug!(
            frame_limit = self.frame_limit,
            capture_stack = self.capture_stack,
            report_intercepted = self.report_intercepted,
            "trapline config applied"
        );
    }
}

/// Settings currently in effect.
pub fn current() -> Config {
    Config {
        frame_limit: FRAME_LIMIT.load(Ordering::Relaxed),
        capture_stack: CAPTURE_STACK.load(Ordering::Relaxed),
        report_intercepted: REPORT_INTERCEPTED.load(Ordering::Relaxed),
    }
}
