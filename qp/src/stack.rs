//! Stack dumps.

use std::backtrace::Backtrace;

use crate::constants::MAX_STACK_FRAMES;
use crate::emit::emit;
use crate::event::CaptureEvent;
use crate::location::Location;

/// Capture the current backtrace, keeping at most `max_frames` frames.
///
/// Frames are counted by their numbered lines (`  12: symbol`); the `at
/// file:line` lines below a frame stay with it.
#[must_use]
pub fn capture_backtrace(max_frames: usize) -> String {
    truncate_frames(&Backtrace::force_capture().to_string(), max_frames)
}

fn is_frame_start(line: &str) -> bool {
    line.trim_start()
        .split_once(':')
        .is_some_and(|(index, _)| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
}

fn truncate_frames(trace: &str, max_frames: usize) -> String {
    let mut out = String::with_capacity(trace.len());
    let mut frames = 0;
    let mut omitted = 0;
    for line in trace.lines() {
        if is_frame_start(line) {
            frames += 1;
        }
        if frames > max_frames {
            omitted += usize::from(is_frame_start(line));
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    if omitted > 0 {
        out.push_str(&format!("      ... {omitted} more frames\n"));
    }
    out
}

/// Emit `stack backtrace:` and the capped backtrace as one record.
pub fn dump_stack(location: Location) {
    let trace = capture_backtrace(MAX_STACK_FRAMES);
    let message = format!("stack backtrace:\n{}", trace.trim_end_matches('\n'));
    emit(CaptureEvent::new(location).message(message));
}
