use qp::Dump;

#[derive(Dump)]
struct Conn {
    peer: String,
    #[dump(hex)]
    flags: u32,
    #[dump(rename = "tx")]
    tx_bytes: u64,
    #[dump(skip)]
    secret: Vec<u8>,
}

fn main() {}
