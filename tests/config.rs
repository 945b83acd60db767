//! Process-wide settings. Kept to one test since `Config::apply` is global.

use trapline::{config, throw, trap, Config, InvalidOperation};

fn raise() -> trapline::Failure {
    trap(|| throw(InvalidOperation::new("configured")))
        .into_failure()
        .unwrap()
}

#[test]
fn settings_shape_captured_frames() {
    Config::new().frame_limit(3).apply();
    assert_eq!(config::current().frame_limit, 3);
    let failure = raise();
    assert!(!failure.stack_frames().is_empty());
    assert!(failure.stack_frames().len() <= 3);

    // Only the throw site is kept.
    Config::new().capture_stack(false).apply();
    let failure = raise();
    assert_eq!(failure.stack_frames().len(), 1);
    assert!(failure.stack_frames()[0].contains("config.rs"));

    // Native panics fall back to the fault site too.
    let failure = trap(|| panic!("no walk")).into_failure().unwrap();
    assert_eq!(failure.stack_frames().len(), 1);

    Config::new().frame_limit(0).apply();
    assert!(raise().stack_frames().is_empty());

    // Intercepted panics also reach the previous hook, and are still trapped.
    Config::new().report_intercepted(true).apply();
    let failure = trap(|| panic!("reported")).into_failure().unwrap();
    assert!(failure.is::<InvalidOperation>());
    assert_eq!(failure.message(), "InvalidOperation: reported");
    assert!(!failure.stack_frames().is_empty());

    Config::default().apply();
    assert_eq!(config::current(), Config::default());
    assert!(!raise().stack_frames().is_empty());
}
