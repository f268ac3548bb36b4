use qp::Dump;

// All field options together
#[derive(Dump)]
struct Frame {
    seq: u32,
    #[dump(hex)]
    flags: u8,
    #[dump(display)]
    src: std::net::Ipv4Addr,
    #[dump(rename = "len")]
    payload_len: usize,
    #[dump(nested)]
    inner: Inner,
    #[dump(skip)]
    raw: Vec<u8>,
}

#[derive(Dump)]
struct Inner {
    id: u64,
}

// Generic struct with an existing where clause
#[derive(Dump)]
struct Tagged<T, U>
where
    U: Clone,
{
    #[dump(display)]
    tag: T,
    value: U,
}

// Lifetimes and tuple fields
#[derive(Dump)]
struct View<'a>(&'a str, #[dump(hex)] u16);

fn main() {
    let frame = Frame {
        seq: 1,
        flags: 2,
        src: std::net::Ipv4Addr::LOCALHOST,
        payload_len: 0,
        inner: Inner { id: 9 },
        raw: Vec::new(),
    };
    qp::qp_dump_fields!(frame);

    let tagged = Tagged { tag: "t", value: 3_i32 };
    qp::qp_dump_fields!(tagged);

    let view = View("x", 0x10);
    qp::qp_dump_fields!(@"view", view);
}
