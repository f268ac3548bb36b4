#![allow(clippy::unwrap_used, clippy::indexing_slicing, dead_code)]
//! Tests for `#[derive(Dump)]` and the code it generates.
//!
//! These tests verify:
//! 1. Fields are listed in declaration order under the dumped expression
//! 2. `skip`, `hex`, `display`, `rename` and `nested` change one field each
//! 3. Tuple, unit and generic structs are supported

use std::net::Ipv4Addr;

use qp::{CaptureEvent, Dump, qp_dump_fields};

#[derive(Dump)]
struct Stats {
    rtt: u32,
    retries: u8,
}

#[derive(Dump)]
struct Conn {
    peer: String,
    #[dump(hex)]
    flags: u32,
    #[dump(display)]
    addr: Ipv4Addr,
    #[dump(rename = "tx")]
    tx_bytes: u64,
    #[dump(nested)]
    stats: Stats,
    #[dump(skip)]
    secret: Vec<u8>,
}

fn conn() -> Conn {
    Conn {
        peer: "db".to_string(),
        flags: 0x11,
        addr: Ipv4Addr::new(10, 0, 0, 2),
        tx_bytes: 512,
        stats: Stats { rtt: 3, retries: 0 },
        secret: vec![0xde, 0xad],
    }
}

fn pairs(event: &CaptureEvent) -> Vec<(String, String)> {
    event
        .fields
        .iter()
        .map(|f| (f.name.to_string(), f.value.clone()))
        .collect()
}

#[test]
fn test_field_options() {
    let c = conn();
    let event = CaptureEvent::new(qp::__qp_location!()).dump("c", &c);
    assert_eq!(
        pairs(&event),
        [
            ("c.peer".to_string(), "\"db\"".to_string()),
            ("c.flags".to_string(), "0x11".to_string()),
            ("c.addr".to_string(), "10.0.0.2".to_string()),
            ("c.tx".to_string(), "512".to_string()),
            ("c.stats.rtt".to_string(), "3".to_string()),
            ("c.stats.retries".to_string(), "0".to_string()),
        ]
    );
}

#[test]
fn test_dump_fields_line() {
    let c = conn();
    let line = line!() + 1;
    let out = qp::capture(|| qp_dump_fields!(c));
    assert_eq!(
        out,
        format!(
            "{}:{line}:test_dump_fields_line: c.peer = \"db\", c.flags = 0x11, c.addr = 10.0.0.2, \
             c.tx = 512, c.stats.rtt = 3, c.stats.retries = 0\n",
            file!()
        )
    );
}

#[test]
fn test_dump_fields_with_label() {
    let stats = Stats { rtt: 9, retries: 2 };
    let out = qp::capture(|| qp_dump_fields!(@"net", stats));
    assert!(out.ends_with(":test_dump_fields_with_label: [net] stats.rtt = 9, stats.retries = 2\n"));
}

#[derive(Dump)]
struct Pair(u8, #[dump(hex)] u16);

#[test]
fn test_tuple_struct() {
    let pair = Pair(7, 0xbeef);
    let event = CaptureEvent::new(qp::__qp_location!()).dump("pair", &pair);
    assert_eq!(
        pairs(&event),
        [
            ("pair.0".to_string(), "7".to_string()),
            ("pair.1".to_string(), "0xbeef".to_string()),
        ]
    );
}

#[derive(Dump)]
struct Marker;

#[test]
fn test_unit_struct_has_no_fields() {
    let event = CaptureEvent::new(qp::__qp_location!()).dump("m", &Marker);
    assert!(event.fields.is_empty());
}

#[derive(Dump)]
struct Wrapper<T> {
    #[dump(display)]
    inner: T,
    count: usize,
}

#[test]
fn test_generic_struct() {
    let w = Wrapper { inner: 2.5_f64, count: 1 };
    let event = CaptureEvent::new(qp::__qp_location!()).dump("w", &w);
    assert_eq!(event.fields[0].value, "2.5");
    assert_eq!(event.fields[1].name, "w.count");
}

#[test]
fn test_dump_through_reference_and_box() {
    let boxed: Box<Stats> = Box::new(Stats { rtt: 1, retries: 1 });
    let by_box = CaptureEvent::new(qp::__qp_location!()).dump("s", &boxed);
    let by_ref = CaptureEvent::new(qp::__qp_location!()).dump("s", &&*boxed);
    assert_eq!(pairs(&by_box), pairs(&by_ref));
}
