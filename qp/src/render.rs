//! Line rendering.
//!
//! # Output Format
//!
//! ```text
//! [<time header> ]<file>:<line>:<function>: [<label>] <message>, <expr1> = <value1>, <expr2> = <value2>
//! ```
//!
//! Absent parts are omitted, so a plain dump reads:
//!
//! ```text
//! probe.rs:42:compute: x = 5, y + 1 = 3
//! ```
//!
//! Every record ends in a single `\n` and is handed to the sink in one piece.
//!
//! Values are formatted into a private buffer first. `format!` panics when a
//! `Debug` or `Display` implementation reports an error; here the field is
//! replaced by [`PLACEHOLDER`] and the rest of the line is kept.

use std::fmt::{self, Write};

use crate::constants::{FIELD_SEPARATOR, PLACEHOLDER};
use crate::event::CaptureEvent;
use crate::time::TimeHeader;

fn render_with(render: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut buf = String::new();
    match render(&mut buf) {
        Ok(()) => buf,
        Err(_) => PLACEHOLDER.to_owned(),
    }
}

/// Render a value through `Debug`, degrading to the placeholder on error.
#[must_use]
pub fn debug_value<T: fmt::Debug + ?Sized>(value: &T) -> String {
    render_with(|buf| write!(buf, "{value:?}"))
}

/// Render a value through `Display`, degrading to the placeholder on error.
#[must_use]
pub fn display_value<T: fmt::Display + ?Sized>(value: &T) -> String {
    render_with(|buf| write!(buf, "{value}"))
}

/// Render format arguments, degrading to the placeholder on error.
#[must_use]
pub fn args_value(args: fmt::Arguments<'_>) -> String {
    render_with(|buf| buf.write_fmt(args))
}

/// Render an event into a newline-terminated record.
#[must_use]
pub fn render_record(event: &CaptureEvent, header: TimeHeader) -> String {
    // location ~40, plus message, plus ~16 per field
    let estimated_capacity = 64
        + event.message.as_ref().map_or(0, String::len)
        + event
            .fields
            .iter()
            .map(|f| f.name.len() + f.value.len() + 5)
            .sum::<usize>();
    let mut out = String::with_capacity(estimated_capacity);

    if let Some(at) = event.timestamp {
        header.write(&mut out, at);
    }

    let location = &event.location;
    out.push_str(location.file);
    out.push(':');
    let _ = write!(out, "{}", location.line);
    out.push(':');
    out.push_str(location.function_name());
    out.push(':');

    if let Some(label) = &event.label {
        out.push_str(" [");
        out.push_str(label);
        out.push(']');
    }

    let mut first = true;
    if let Some(message) = &event.message {
        out.push(' ');
        out.push_str(message);
        first = false;
    }
    for field in &event.fields {
        out.push_str(if first { " " } else { FIELD_SEPARATOR });
        out.push_str(&field.name);
        out.push_str(" = ");
        out.push_str(&field.value);
        first = false;
    }

    out.push('\n');
    out
}
