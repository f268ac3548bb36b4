#[qp::trace_fn(args, exit, label = "io")]
fn read_block(fd: i32, len: usize) -> usize {
    let _ = fd;
    len
}

fn main() {
    let _ = read_block(3, 4096);
}
