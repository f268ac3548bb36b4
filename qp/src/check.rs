//! Failure path of `qp_check!`.

use crate::config::{self, CheckAction};
use crate::emit::emit;
use crate::event::CaptureEvent;

/// Emit a failed check and apply the configured [`CheckAction`].
///
/// The record is delivered (and flushed) before the process aborts.
#[cold]
#[inline(never)]
pub fn fail(event: CaptureEvent, condition: &'static str) {
    let action = config::current().check_action;
    emit(event);
    match action {
        CheckAction::Abort => std::process::abort(),
        CheckAction::Panic => panic!("qp check failed: {condition}"),
        CheckAction::Continue => {},
    }
}
