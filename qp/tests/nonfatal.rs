#![cfg(all(feature = "enabled", feature = "nonfatal"))]
//! Failed checks keep going when built with `nonfatal`.
//!
//! Run with `cargo test-nonfatal`.

use qp::{CheckAction, Config, qp_check, qp_trace};

#[test]
fn test_default_action_is_continue() {
    assert_eq!(Config::default().check_action, CheckAction::Continue);
}

#[test]
fn test_failed_check_continues() {
    let items = [1, 2];
    let out = qp::with_config(Config::default(), || {
        qp::capture(|| {
            qp_check!(items.len() == 3, items);
            qp_trace!("after");
        })
    });
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(": check failed: items.len() == 3, items = [1, 2]"));
    assert!(lines[1].ends_with(": [after]"));
}
