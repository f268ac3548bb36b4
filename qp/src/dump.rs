//! Field-by-field dumps of structured values.
//!
//! [`Dump`] is normally derived:
//!
//! ```
//! use qp::Dump;
//!
//! #[derive(Dump)]
//! struct Packet {
//!     len: usize,
//!     #[dump(hex)]
//!     flags: u16,
//!     #[dump(skip)]
//!     _payload: Vec<u8>,
//! }
//!
//! let packet = Packet { len: 3, flags: 0x12, _payload: vec![1, 2, 3] };
//! let event = qp::CaptureEvent::new(qp::__qp_location!()).dump("packet", &packet);
//! let names: Vec<_> = event.fields.iter().map(|f| f.name.as_ref()).collect();
//! assert_eq!(names, ["packet.len", "packet.flags"]);
//! assert_eq!(event.fields[1].value, "0x12");
//! ```

use std::borrow::Cow;
use std::fmt;

use crate::event::Field;
use crate::render;

/// A value that can list its own fields.
pub trait Dump {
    /// Write one field per member.
    fn dump_fields(&self, out: &mut FieldWriter<'_>);
}

impl<T: Dump + ?Sized> Dump for &T {
    fn dump_fields(&self, out: &mut FieldWriter<'_>) {
        (**self).dump_fields(out);
    }
}

impl<T: Dump + ?Sized> Dump for Box<T> {
    fn dump_fields(&self, out: &mut FieldWriter<'_>) {
        (**self).dump_fields(out);
    }
}

/// Collects the fields of a [`Dump`] value under a dotted prefix.
#[derive(Debug)]
pub struct FieldWriter<'a> {
    prefix: Cow<'static, str>,
    fields: &'a mut Vec<Field>,
}

impl<'a> FieldWriter<'a> {
    /// Append to `fields`, naming each one `prefix.member`.
    ///
    /// An empty prefix leaves member names bare.
    pub fn new(prefix: impl Into<Cow<'static, str>>, fields: &'a mut Vec<Field>) -> Self {
        Self {
            prefix: prefix.into(),
            fields,
        }
    }

    fn name(&self, member: &'static str) -> Cow<'static, str> {
        if self.prefix.is_empty() {
            Cow::Borrowed(member)
        } else {
            Cow::Owned(format!("{}.{member}", self.prefix))
        }
    }

    /// Add a member rendered through `Debug`.
    pub fn debug<T: fmt::Debug + ?Sized>(&mut self, member: &'static str, value: &T) {
        let field = Field::new(self.name(member), render::debug_value(value));
        self.fields.push(field);
    }

    /// Add a member rendered through `Display`.
    pub fn display<T: fmt::Display + ?Sized>(&mut self, member: &'static str, value: &T) {
        let field = Field::new(self.name(member), render::display_value(value));
        self.fields.push(field);
    }

    /// Add a member rendered as `0x`-prefixed lowercase hex.
    pub fn hex<T: fmt::LowerHex + ?Sized>(&mut self, member: &'static str, value: &T) {
        let field = Field::new(
            self.name(member),
            render::args_value(format_args!("{value:#x}")),
        );
        self.fields.push(field);
    }

    /// Add every member of a nested [`Dump`] value under `prefix.member`.
    pub fn nested<T: Dump + ?Sized>(&mut self, member: &'static str, value: &T) {
        let mut inner = FieldWriter {
            prefix: self.name(member),
            fields: &mut *self.fields,
        };
        value.dump_fields(&mut inner);
    }
}
