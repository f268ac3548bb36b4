//! Capture primitives.
//!
//! Every macro body sits behind `if $crate::ENABLED`. Without the `enabled`
//! feature the condition is a constant `false`: arguments are still
//! type-checked (an unrenderable value fails the build either way) but never
//! evaluated, and the optimizer drops the whole branch.
//!
//! The only exception is [`qp_tap!`], which always evaluates its argument
//! because it has to return it.

use crate::emit::emit;
use crate::event::CaptureEvent;
use crate::location::Location;

// ============================================================================
// CORE PROBES
// ============================================================================

/// Emit a trace point.
///
/// ```
/// fn parse() {
///     let out = qp::capture(|| {
///         qp::qp_trace!();
///         qp::qp_trace!("after-parse");
///     });
///     if qp::ENABLED {
///         assert!(out.lines().nth(1).unwrap().ends_with(":parse: [after-parse]"));
///     } else {
///         assert!(out.is_empty());
///     }
/// }
/// parse();
/// ```
#[macro_export]
macro_rules! qp_trace {
    () => {
        if $crate::ENABLED {
            $crate::emit(
                $crate::CaptureEvent::new($crate::__qp_location!())
                    .message($crate::constants::TRACE_MESSAGE),
            );
        }
    };
    ($label:expr $(,)?) => {
        if $crate::ENABLED {
            $crate::emit($crate::CaptureEvent::new($crate::__qp_location!()).label(&$label));
        }
    };
}

/// Dump expressions with their source text, rendered through `Debug`.
///
/// Each expression is evaluated exactly once, left to right. A leading
/// `@label,` tags the line.
///
/// ```
/// let (x, y) = (5, 2);
/// let out = qp::capture(|| qp::qp_dump!(x, y + 1));
/// if qp::ENABLED {
///     assert!(out.ends_with(": x = 5, y + 1 = 3\n"));
/// }
///
/// let out = qp::capture(|| qp::qp_dump!(@"p1", x));
/// if qp::ENABLED {
///     assert!(out.ends_with(": [p1] x = 5\n"));
/// }
/// ```
///
/// A value without `Debug` does not compile, enabled or not:
///
/// ```compile_fail
/// struct Opaque;
/// qp::qp_dump!(Opaque);
/// ```
#[macro_export]
macro_rules! qp_dump {
    (@ $label:expr, $($e:expr),+ $(,)?) => {
        if $crate::ENABLED {
            $crate::emit(
                $crate::CaptureEvent::new($crate::__qp_location!())
                    .label(&$label)
                    $(.field(::core::stringify!($e), &$e))+,
            );
        }
    };
    ($($e:expr),+ $(,)?) => {
        if $crate::ENABLED {
            $crate::emit(
                $crate::CaptureEvent::new($crate::__qp_location!())
                    $(.field(::core::stringify!($e), &$e))+,
            );
        }
    };
}

/// Emit `check failed: <condition>` when the condition is false, then apply
/// the configured [`CheckAction`](crate::CheckAction).
///
/// Extra expressions are dumped on failure only. When disabled the condition
/// is not evaluated.
///
/// ```
/// let config = qp::Config::default().with_check_action(qp::CheckAction::Continue);
/// let x = -1;
/// let out = qp::with_config(config, || qp::capture(|| qp::qp_check!(x > 0, x)));
/// if qp::ENABLED {
///     assert!(out.ends_with(": check failed: x > 0, x = -1\n"));
/// }
/// ```
#[macro_export]
macro_rules! qp_check {
    (@ $label:expr, $cond:expr $(,)?) => {
        if $crate::ENABLED && !($cond) {
            $crate::check::fail(
                $crate::CaptureEvent::new($crate::__qp_location!())
                    .label(&$label)
                    .message(::core::concat!("check failed: ", ::core::stringify!($cond))),
                ::core::stringify!($cond),
            );
        }
    };
    (@ $label:expr, $cond:expr, $($e:expr),+ $(,)?) => {
        if $crate::ENABLED && !($cond) {
            $crate::check::fail(
                $crate::CaptureEvent::new($crate::__qp_location!())
                    .label(&$label)
                    .message(::core::concat!("check failed: ", ::core::stringify!($cond)))
                    $(.field(::core::stringify!($e), &$e))+,
                ::core::stringify!($cond),
            );
        }
    };
    ($cond:expr $(,)?) => {
        if $crate::ENABLED && !($cond) {
            $crate::check::fail(
                $crate::CaptureEvent::new($crate::__qp_location!())
                    .message(::core::concat!("check failed: ", ::core::stringify!($cond))),
                ::core::stringify!($cond),
            );
        }
    };
    ($cond:expr, $($e:expr),+ $(,)?) => {
        if $crate::ENABLED && !($cond) {
            $crate::check::fail(
                $crate::CaptureEvent::new($crate::__qp_location!())
                    .message(::core::concat!("check failed: ", ::core::stringify!($cond)))
                    $(.field(::core::stringify!($e), &$e))+,
                ::core::stringify!($cond),
            );
        }
    };
}

/// Dump an expression and return its value.
///
/// The expression is evaluated exactly once whether or not capture is
/// enabled, so wrapping it never changes what the program does.
///
/// ```
/// let total = qp::qp_tap!(2 + 3) * 10;
/// assert_eq!(total, 50);
/// ```
#[macro_export]
macro_rules! qp_tap {
    ($e:expr $(,)?) => {
        match $e {
            value => {
                if $crate::ENABLED {
                    $crate::emit(
                        $crate::CaptureEvent::new($crate::__qp_location!())
                            .field(::core::stringify!($e), &value),
                    );
                }
                value
            },
        }
    };
}

/// Dump an expression with an explicit format string.
///
/// ```
/// let flags = 0x2a_u16;
/// let out = qp::capture(|| qp::qp_dump_fmt!("{:#06x}", flags));
/// if qp::ENABLED {
///     assert!(out.ends_with(": flags = 0x002a\n"));
/// }
/// ```
#[macro_export]
macro_rules! qp_dump_fmt {
    (@ $label:expr, $fmt:literal, $e:expr $(,)?) => {
        if $crate::ENABLED {
            $crate::emit(
                $crate::CaptureEvent::new($crate::__qp_location!())
                    .label(&$label)
                    .field_args(::core::stringify!($e), ::core::format_args!($fmt, $e)),
            );
        }
    };
    ($fmt:literal, $e:expr $(,)?) => {
        if $crate::ENABLED {
            $crate::emit(
                $crate::CaptureEvent::new($crate::__qp_location!())
                    .field_args(::core::stringify!($e), ::core::format_args!($fmt, $e)),
            );
        }
    };
}

/// Dump every field of a [`Dump`](crate::Dump) value as `expr.field = value`.
#[macro_export]
macro_rules! qp_dump_fields {
    (@ $label:expr, $e:expr $(,)?) => {
        if $crate::ENABLED {
            $crate::emit(
                $crate::CaptureEvent::new($crate::__qp_location!())
                    .label(&$label)
                    .dump(::core::stringify!($e), &$e),
            );
        }
    };
    ($e:expr $(,)?) => {
        if $crate::ENABLED {
            $crate::emit(
                $crate::CaptureEvent::new($crate::__qp_location!())
                    .dump(::core::stringify!($e), &$e),
            );
        }
    };
}

/// Write formatted text straight to the sink, without a location header.
#[macro_export]
macro_rules! qp_print {
    ($($arg:tt)+) => {
        if $crate::ENABLED {
            $crate::emit_raw(::core::format_args!($($arg)+));
        }
    };
}

/// Emit a location header followed by a formatted message.
///
/// ```
/// let out = qp::capture(|| qp::qp_print_loc!("got {} items", 3));
/// if qp::ENABLED {
///     assert!(out.ends_with(": got 3 items\n"));
/// }
/// ```
#[macro_export]
macro_rules! qp_print_loc {
    ($($arg:tt)+) => {
        if $crate::ENABLED {
            $crate::emit(
                $crate::CaptureEvent::new($crate::__qp_location!())
                    .message_args(::core::format_args!($($arg)+)),
            );
        }
    };
}

// ============================================================================
// ONCE AND RATE LIMITING
// ============================================================================

/// `true` the first time this call site runs, `false` afterwards.
///
/// Always `false` when capture is disabled.
#[macro_export]
macro_rules! qp_once {
    () => {{
        static __QP_ONCE: $crate::ratelimit::Once = $crate::ratelimit::Once::new();
        $crate::ENABLED && __QP_ONCE.first()
    }};
}

/// [`qp_print!`] the first time this call site runs.
#[macro_export]
macro_rules! qp_print_once {
    ($($arg:tt)+) => {
        if $crate::qp_once!() {
            $crate::emit_raw(::core::format_args!($($arg)+));
        }
    };
}

/// [`qp_print_loc!`] the first time this call site runs.
#[macro_export]
macro_rules! qp_print_loc_once {
    ($($arg:tt)+) => {
        if $crate::qp_once!() {
            $crate::emit(
                $crate::CaptureEvent::new($crate::__qp_location!())
                    .message_args(::core::format_args!($($arg)+)),
            );
        }
    };
}

/// `Some(elapsed_ms)` at most once per interval for this call site.
///
/// The interval defaults to the configured rate-limit interval. The first
/// call always fires. Always `None` when capture is disabled.
#[macro_export]
macro_rules! qp_ratelimit {
    () => {
        $crate::qp_ratelimit!($crate::config::current().ratelimit_interval_ms())
    };
    ($interval_ms:expr $(,)?) => {{
        static __QP_LIMIT: $crate::ratelimit::RateLimiter = $crate::ratelimit::RateLimiter::new();
        if $crate::ENABLED {
            __QP_LIMIT.check($interval_ms)
        } else {
            ::core::option::Option::None
        }
    }};
}

/// Count calls; once per interval emit `cnt=<n> rate=<r>/s: <message>`.
#[macro_export]
macro_rules! qp_print_ratelimit {
    ($($arg:tt)+) => {
        if $crate::ENABLED {
            static __QP_COUNTER: $crate::ratelimit::RateCounter =
                $crate::ratelimit::RateCounter::new();
            if let ::core::option::Option::Some(report) =
                __QP_COUNTER.tick($crate::config::current().ratelimit_interval_ms())
            {
                $crate::emit(
                    $crate::CaptureEvent::new($crate::__qp_location!()).message_args(
                        ::core::format_args!("{}: {}", report, ::core::format_args!($($arg)+)),
                    ),
                );
            }
        }
    };
}

/// Rate-limited trace point.
#[macro_export]
macro_rules! qp_trace_ratelimit {
    () => {
        $crate::qp_print_ratelimit!("{}", $crate::constants::TRACE_MESSAGE)
    };
}

/// Rate-limited counts per value of an integer in `0..N`.
///
/// Values outside the range share one overflow slot.
///
/// ```
/// for code in [0_u8, 1, 1, 9] {
///     qp::qp_print_hist_ratelimit!(code, 4, "status");
/// }
/// ```
#[macro_export]
macro_rules! qp_print_hist_ratelimit {
    ($value:expr, $n:expr, $($arg:tt)+) => {
        if $crate::ENABLED {
            static __QP_HIST: $crate::ratelimit::HistRateLimiter<{ $n }> =
                $crate::ratelimit::HistRateLimiter::new();
            let key = $crate::ratelimit::HistValue::hist_key($value);
            if let ::core::option::Option::Some((slot, report)) =
                __QP_HIST.record(key, $crate::config::current().ratelimit_interval_ms())
            {
                $crate::emit(
                    $crate::CaptureEvent::new($crate::__qp_location!()).message_args(
                        ::core::format_args!(
                            "{} {}: {}",
                            slot,
                            report,
                            ::core::format_args!($($arg)+)
                        ),
                    ),
                );
            }
        }
    };
}

// ============================================================================
// STACK AND SHELL
// ============================================================================

/// Emit the current backtrace as one record.
#[macro_export]
macro_rules! qp_dump_stack {
    () => {
        if $crate::ENABLED {
            $crate::stack::dump_stack($crate::__qp_location!());
        }
    };
}

/// [`qp_dump_stack!`] at most once every five seconds for this call site.
#[macro_export]
macro_rules! qp_dump_stack_ratelimit {
    () => {
        if $crate::qp_ratelimit!($crate::constants::STACK_RATELIMIT_INTERVAL_MS).is_some() {
            $crate::stack::dump_stack($crate::__qp_location!());
        }
    };
}

/// Run a shell command, forwarding its output to the sink.
///
/// Returns `None` without running anything when capture is disabled.
#[macro_export]
macro_rules! qp_run_system {
    ($cmd:expr $(,)?) => {
        if $crate::ENABLED {
            ::core::option::Option::Some($crate::system::run_system(
                $crate::__qp_location!(),
                ::core::convert::AsRef::<str>::as_ref(&$cmd),
            ))
        } else {
            ::core::option::Option::None
        }
    };
}

// ============================================================================
// BYTES AND NETWORK
// ============================================================================

/// Dump a value through a `Display` wrapper built with `Wrapper::new(&value)`.
///
/// ```
/// let mac = [2_u8, 3, 4, 5, 6, 7];
/// let out = qp::capture(|| qp::qp_dump_as!(qp::net::Mac<'_>, mac));
/// if qp::ENABLED {
///     assert!(out.ends_with(": mac = 02:03:04:05:06:07\n"));
/// }
/// ```
#[macro_export]
macro_rules! qp_dump_as {
    ($wrap:ty, $e:expr $(,)?) => {
        if $crate::ENABLED {
            $crate::emit(
                $crate::CaptureEvent::new($crate::__qp_location!())
                    .field_display(::core::stringify!($e), &<$wrap>::new(&$e)),
            );
        }
    };
}

/// Dump bytes as one hex run.
#[macro_export]
macro_rules! qp_dump_bytes {
    ($e:expr $(,)?) => {
        $crate::qp_dump_as!($crate::bytes::HexBytes<'_>, $e)
    };
}

/// Dump bytes as a multi-line hex block.
#[macro_export]
macro_rules! qp_dump_hex {
    ($e:expr $(,)?) => {
        if $crate::ENABLED {
            $crate::emit(
                $crate::CaptureEvent::new($crate::__qp_location!())
                    .message_display(&$crate::bytes::HexBlock::new(&$e)),
            );
        }
    };
}

/// Dump a MAC address.
#[macro_export]
macro_rules! qp_dump_mac {
    ($e:expr $(,)?) => {
        $crate::qp_dump_as!($crate::net::Mac<'_>, $e)
    };
}

/// Dump an IPv4 address.
#[macro_export]
macro_rules! qp_dump_ipv4 {
    ($e:expr $(,)?) => {
        $crate::qp_dump_as!($crate::net::Ipv4<'_>, $e)
    };
}

/// Dump an IPv6 address.
#[macro_export]
macro_rules! qp_dump_ipv6 {
    ($e:expr $(,)?) => {
        $crate::qp_dump_as!($crate::net::Ipv6<'_>, $e)
    };
}

/// Dump an Ethernet header.
#[macro_export]
macro_rules! qp_dump_eth_hdr {
    ($e:expr $(,)?) => {
        $crate::qp_dump_as!($crate::net::EthHeader<'_>, $e)
    };
}

/// Dump an ARP header.
#[macro_export]
macro_rules! qp_dump_arp_hdr {
    ($e:expr $(,)?) => {
        $crate::qp_dump_as!($crate::net::ArpHeader<'_>, $e)
    };
}

/// Dump an IPv4 or IPv6 header.
#[macro_export]
macro_rules! qp_dump_ip_hdr {
    ($e:expr $(,)?) => {
        $crate::qp_dump_as!($crate::net::IpHeader<'_>, $e)
    };
}

/// Dump a UDP header.
#[macro_export]
macro_rules! qp_dump_udp_hdr {
    ($e:expr $(,)?) => {
        $crate::qp_dump_as!($crate::net::UdpHeader<'_>, $e)
    };
}

/// Dump a TCP header.
#[macro_export]
macro_rules! qp_dump_tcp_hdr {
    ($e:expr $(,)?) => {
        $crate::qp_dump_as!($crate::net::TcpHeader<'_>, $e)
    };
}

// ============================================================================
// SCOPE EXIT
// ============================================================================

/// Emits `exit` when dropped; `exit (unwinding)` during a panic.
///
/// Used by `#[trace_fn(exit)]`.
#[derive(Debug)]
#[must_use = "the exit record is emitted when the probe is dropped"]
pub struct ExitProbe {
    location: Location,
    label: Option<&'static str>,
}

impl ExitProbe {
    /// Arm a probe for `location`.
    pub const fn new(location: Location) -> Self {
        Self {
            location,
            label: None,
        }
    }

    /// Tag the exit line.
    pub const fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }
}

impl Drop for ExitProbe {
    fn drop(&mut self) {
        if !crate::ENABLED {
            return;
        }
        let message = if std::thread::panicking() {
            "exit (unwinding)"
        } else {
            "exit"
        };
        let mut event = CaptureEvent::new(self.location).message(message);
        if let Some(label) = self.label {
            event = event.label(label);
        }
        emit(event);
    }
}
