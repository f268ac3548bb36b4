use qp::trace_fn;

#[trace_fn]
fn no_args() {}

#[trace_fn(args, exit, label = "math")]
fn add(a: i64, b: i64) -> i64 {
    a + b
}

// Patterns without a single name are not printed
#[trace_fn(args)]
fn swap((a, b): (u8, u8), _unused: &str) -> (u8, u8) {
    (b, a)
}

// Generic functions and mutable bindings
#[trace_fn(args, exit)]
fn longest<T: std::fmt::Debug + AsRef<str>>(mut first: T, second: T) -> usize {
    if second.as_ref().len() > first.as_ref().len() {
        first = second;
    }
    first.as_ref().len()
}

struct Service;

impl Service {
    #[trace_fn(exit)]
    fn handle(&self, id: u32) -> u32 {
        id
    }
}

#[trace_fn(exit)]
async fn fetch(id: u32) -> u32 {
    id
}

fn main() {
    no_args();
    let _ = add(1, 2);
    let _ = swap((1, 2), "x");
    let _ = longest("ab", "abc");
    let _ = Service.handle(3);
    let _ = fetch(4);
}
