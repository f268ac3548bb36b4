//! The capture event: what one probe saw at one call site.

use std::borrow::Cow;
use std::fmt;
use std::time::SystemTime;

use crate::dump::{Dump, FieldWriter};
use crate::location::Location;
use crate::render;

/// One rendered `(expression, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Field {
    /// Source text of the expression, or a dotted path for struct dumps.
    pub name: Cow<'static, str>,
    /// Rendered value, or [`PLACEHOLDER`](crate::constants::PLACEHOLDER).
    pub value: String,
}

impl Field {
    /// Create a field from an already rendered value.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, value: String) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Ephemeral record of a single probe invocation.
///
/// Values are rendered as they are added, so the event never borrows from
/// the host expressions and each expression is evaluated exactly once.
///
/// ```
/// use qp::{CaptureEvent, Location};
///
/// let x = 5;
/// let event = CaptureEvent::new(Location::new("probe.rs", 42, 1, "app", "app::compute"))
///     .field("x", &x)
///     .field("x + 1", &(x + 1));
/// assert_eq!(event.fields.len(), 2);
/// assert_eq!(event.fields[1].value, "6");
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct CaptureEvent {
    /// Where the probe sits.
    pub location: Location,
    /// Optional probe label, rendered as `[label]`.
    pub label: Option<String>,
    /// Optional free-form message.
    pub message: Option<String>,
    /// Payload, in evaluation order.
    pub fields: Vec<Field>,
    /// Set by the emission layer when a time header is configured.
    pub timestamp: Option<SystemTime>,
}

impl CaptureEvent {
    /// Start an event with an empty payload.
    #[inline]
    #[must_use]
    pub const fn new(location: Location) -> Self {
        Self {
            location,
            label: None,
            message: None,
            fields: Vec::new(),
            timestamp: None,
        }
    }

    /// Attach a label.
    #[must_use]
    pub fn label<L: fmt::Display + ?Sized>(mut self, label: &L) -> Self {
        self.label = Some(render::display_value(label));
        self
    }

    /// Attach a plain message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach a message built from format arguments.
    #[must_use]
    pub fn message_args(mut self, args: fmt::Arguments<'_>) -> Self {
        self.message = Some(render::args_value(args));
        self
    }

    /// Attach a message rendered through `Display`.
    #[must_use]
    pub fn message_display<T: fmt::Display + ?Sized>(mut self, value: &T) -> Self {
        self.message = Some(render::display_value(value));
        self
    }

    /// Add a field rendered through `Debug`.
    #[must_use]
    pub fn field<T: fmt::Debug + ?Sized>(mut self, name: &'static str, value: &T) -> Self {
        self.fields
            .push(Field::new(name, render::debug_value(value)));
        self
    }

    /// Add a field rendered through `Display`.
    #[must_use]
    pub fn field_display<T: fmt::Display + ?Sized>(mut self, name: &'static str, value: &T) -> Self {
        self.fields
            .push(Field::new(name, render::display_value(value)));
        self
    }

    /// Add a field rendered from format arguments.
    #[must_use]
    pub fn field_args(mut self, name: &'static str, args: fmt::Arguments<'_>) -> Self {
        self.fields.push(Field::new(name, render::args_value(args)));
        self
    }

    /// Add one field per member of a [`Dump`] value, prefixed with `prefix`.
    #[must_use]
    pub fn dump<T: Dump + ?Sized>(mut self, prefix: &'static str, value: &T) -> Self {
        value.dump_fields(&mut FieldWriter::new(prefix, &mut self.fields));
        self
    }

    /// Stamp the event with a capture time.
    #[must_use]
    pub const fn with_timestamp(mut self, at: SystemTime) -> Self {
        self.timestamp = Some(at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PLACEHOLDER;

    fn here() -> Location {
        Location::new("event.rs", 7, 1, "qp::event", "qp::event::tests::here")
    }

    struct Broken;

    impl fmt::Debug for Broken {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn test_fields_keep_order() {
        let event = CaptureEvent::new(here())
            .field("a", &1)
            .field("b", "two")
            .field("c", &[3, 4]);
        let names: Vec<_> = event.fields.iter().map(|f| f.name.as_ref()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(event.fields[1].value, "\"two\"");
        assert_eq!(event.fields[2].value, "[3, 4]");
    }

    #[test]
    fn test_broken_field_gets_placeholder_others_survive() {
        let event = CaptureEvent::new(here())
            .field("ok", &1)
            .field("broken", &Broken)
            .field("after", &2);
        assert_eq!(event.fields[0].value, "1");
        assert_eq!(event.fields[1].value, PLACEHOLDER);
        assert_eq!(event.fields[2].value, "2");
    }

    #[test]
    fn test_label_and_message() {
        let event = CaptureEvent::new(here())
            .label("phase1")
            .message_args(format_args!("got {} items", 3));
        assert_eq!(event.label.as_deref(), Some("phase1"));
        assert_eq!(event.message.as_deref(), Some("got 3 items"));
    }

    #[test]
    fn test_field_args_uses_format() {
        let event = CaptureEvent::new(here()).field_args("flags", format_args!("{:#06x}", 0x2a));
        assert_eq!(event.fields[0].value, "0x002a");
    }

    #[test]
    fn test_new_event_is_unstamped() {
        assert!(CaptureEvent::new(here()).timestamp.is_none());
    }
}
