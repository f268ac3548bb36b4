//! Emission: stamp, render, deliver.

use std::fmt;
use std::time::SystemTime;

use crate::config;
use crate::event::CaptureEvent;
use crate::render::{self, render_record};
use crate::sink;

/// Render `event` and hand it to the active sink.
///
/// Sink errors are dropped: a probe must never change the behavior of the
/// program it observes.
pub fn emit(event: CaptureEvent) {
    let header = config::current().time_header;
    let event = if header.is_enabled() && event.timestamp.is_none() {
        event.with_timestamp(SystemTime::now())
    } else {
        event
    };
    let _ = sink::write(&render_record(&event, header));
}

/// Deliver pre-formatted text as one record, without a location prefix.
///
/// A trailing newline is added when missing.
pub fn emit_raw(args: fmt::Arguments<'_>) {
    let mut text = render::args_value(args);
    if !text.ends_with('\n') {
        text.push('\n');
    }
    let _ = sink::write(&text);
}
