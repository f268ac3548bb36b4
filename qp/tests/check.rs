#![cfg(feature = "enabled")]
//! What a failed `qp_check!` does to the process.

use std::panic::{self, AssertUnwindSafe};
use std::process::Command;

use qp::{CheckAction, Config, qp_check};

const CHILD_ENV: &str = "QP_TEST_ABORT_CHILD";

#[test]
#[should_panic(expected = "qp check failed: len == 3")]
fn test_check_panic() {
    let config = Config::default().with_check_action(CheckAction::Panic);
    let len = 2;
    qp::with_config(config, || qp::capture(|| qp_check!(len == 3)));
}

#[test]
fn test_check_panic_emits_first() {
    let config = Config::default().with_check_action(CheckAction::Panic);
    let sink = qp::BufferSink::new();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        qp::with_config(config, || qp::with_sink(sink.clone(), || qp_check!(1 + 1 == 3)));
    }));
    assert!(result.is_err());
    assert!(sink.contents().ends_with(": check failed: 1 + 1 == 3\n"));
}

/// Runs in a child process; aborts on purpose.
#[test]
fn abort_child() {
    if std::env::var_os(CHILD_ENV).is_none() {
        return;
    }
    let config = Config::default().with_check_action(CheckAction::Abort);
    let depth = 9;
    qp::with_config(config, || qp_check!(depth < 4, depth));
    unreachable!("check should have aborted");
}

#[test]
fn test_check_abort_flushes_then_aborts() {
    let exe = std::env::current_exe().unwrap_or_else(|e| panic!("current_exe: {e}"));
    let output = Command::new(exe)
        .args(["--exact", "abort_child", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1")
        .env_remove("QP_SINK")
        .output()
        .unwrap_or_else(|e| panic!("spawn child: {e}"));

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(":abort_child: check failed: depth < 4, depth = 9\n"),
        "stderr was: {stderr}"
    );
    assert!(!stderr.contains("should have aborted"));
}
