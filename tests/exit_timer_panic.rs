use std::error::Error;
use std::panic::{self, AssertUnwindSafe};

use automatey::{Automatey, AutomateyOptions};
use automatey_test_utils::{lines_containing, log_file, project_with_file_log};

type TestResult = Result<(), Box<dyn Error>>;

// Own binary: the armed guard is process-wide.
#[test]
fn exit_timer_fires_when_scope_panics() -> TestResult {
    let (_project, start) = project_with_file_log();
    let automatey = Automatey::load(AutomateyOptions::default().start_dir(&start))?;
    let log = log_file(&automatey);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let _: () = automatey.scoped(|a| {
            a.logger().error("about to fail");
            panic!("task blew up");
        });
    }));

    assert!(outcome.is_err(), "the panic must propagate");
    assert!(automatey.timer().has_fired());
    assert_eq!(lines_containing(&log, "All tasks complete:").len(), 1);
    assert_eq!(lines_containing(&log, "about to fail").len(), 1);
    Ok(())
}
