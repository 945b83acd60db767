//! Causal chains built from nested traps.

use trapline::{
    catch, throw, throw_file_error, throw_with_cause, trap, Failure, FileError, InvalidOperation,
    NetworkError, NullArgument,
};

/// Raise `n` failures, each wrapping the previous one as its cause.
fn nested_chain(n: usize) -> Failure {
    let mut cause: Option<Failure> = None;
    for level in 0..n {
        let previous = cause.take();
        let result = trap(move || {
            if level == 0 {
                throw(FileError::new("root.dat", "level 0"))
            } else {
                throw_with_cause(InvalidOperation::new(format!("level {}", level)), previous)
            }
        });
        cause = result.into_failure();
    }
    cause.expect("at least one level")
}

#[test]
fn flatten_length_matches_depth() {
    for n in 1..=5 {
        let failure = nested_chain(n);
        assert_eq!(failure.flatten().len(), n);
        assert_eq!(failure.has_cause(), n > 1);
    }
}

#[test]
fn flatten_is_outermost_first() {
    let failure = nested_chain(3);
    let messages: Vec<&str> = failure.flatten().iter().map(|f| f.message()).collect();
    assert_eq!(
        messages,
        [
            "InvalidOperation: level 2",
            "InvalidOperation: level 1",
            "FileError: level 0 (file: root.dat)",
        ]
    );
}

#[test]
fn find_cause_returns_first_match_or_none() {
    let failure = nested_chain(3);
    assert_eq!(failure.find_cause::<InvalidOperation>().unwrap().message, "level 2");
    assert_eq!(failure.find_cause::<FileError>().unwrap().message, "level 0");
    assert!(failure.find_cause::<NetworkError>().is_none());
    assert!(failure
        .find_failure::<FileError>()
        .map(|f| !f.has_cause())
        .unwrap_or(false));
}

#[test]
fn inspection_is_idempotent() {
    let failure = nested_chain(4);
    let first = (failure.has_cause(), failure.full_message(), failure.flatten().len());
    for _ in 0..3 {
        assert_eq!(
            (failure.has_cause(), failure.full_message(), failure.flatten().len()),
            first
        );
    }
}

#[test]
fn wrap_prior_file_error() {
    let prior = trap(|| throw_file_error("settings.json", "unreadable", None)).into_failure();
    let mut seen = None;
    let result = trap(move || throw_with_cause(InvalidOperation::new("init failed"), prior));
    let result = catch::<InvalidOperation>(result, |_, full| {
        seen = Some((
            full.full_message(),
            full.has_cause(),
            full.find_cause::<FileError>().is_some(),
        ));
    });
    assert!(result.is_claimed());

    let (message, has_cause, found) = seen.unwrap();
    assert!(message.contains("init failed"));
    assert!(message.contains("unreadable"));
    assert!(message.contains(" --> "));
    assert!(has_cause);
    assert!(found);
}

#[test]
fn wrapping_captures_a_fresh_stack() {
    let inner = trap(|| throw(NullArgument::new("id", ""))).into_failure().unwrap();
    let inner_frames = inner.stack_frames().to_vec();
    let outer = trap(move || throw_with_cause(InvalidOperation::new("outer"), Some(inner)))
        .into_failure()
        .unwrap();
    assert!(!outer.stack_frames().is_empty());
    assert_eq!(outer.cause().unwrap().stack_frames(), inner_frames.as_slice());
}

#[test]
fn throw_with_no_cause() {
    let failure = trap(|| throw_with_cause(InvalidOperation::new("alone"), None))
        .into_failure()
        .unwrap();
    assert!(!failure.has_cause());
    assert!(failure.cause().is_none());
    assert_eq!(failure.full_message(), "InvalidOperation: alone");
}

#[test]
fn error_source_walks_the_chain() {
    use std::error::Error;

    let failure = nested_chain(3);
    let mut depth = 1;
    let mut current: &dyn Error = &failure;
    while let Some(next) = current.source() {
        depth += 1;
        current = next;
    }
    assert_eq!(depth, 3);
}
