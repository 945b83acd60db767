//! A trap opened by a destructor while its thread unwinds.
//!
//! Kept in its own test binary so this is the first trap of the process
//! and the panic hook is not installed yet.

use std::sync::mpsc;
use std::thread;

use trapline::{throw, trap, Failure, InvalidOperation, NullArgument};

struct Guard {
    report: mpsc::Sender<Option<Failure>>,
}

impl Drop for Guard {
    fn drop(&mut self) {
        let failure = trap(|| panic!("cleanup fault")).into_failure();
        let _ = self.report.send(failure);
    }
}

#[test]
fn first_trap_inside_unwinding_destructor() {
    let (tx, rx) = mpsc::channel();
    let outcome = thread::spawn(move || {
        let _guard = Guard { report: tx };
        panic!("original fault");
    })
    .join();
    assert!(outcome.is_err());

    let failure = rx.recv().unwrap().unwrap();
    assert!(failure.is::<InvalidOperation>());
    assert!(failure.message().contains("cleanup fault"));
    assert!(!failure.stack_frames().is_empty());

    // The hook is installed by the next trap outside a panic.
    let failure = trap(|| throw(NullArgument::new("later", "")))
        .into_failure()
        .unwrap();
    assert!(failure.is::<NullArgument>());
}
