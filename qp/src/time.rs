//! Clocks and time headers.
//!
//! Probes are unstamped by default. When a [`TimeHeader`] is configured the
//! emission layer stamps each event with the wall clock and prefixes the
//! line with one of these layouts:
//!
//! | Header    | `QP_TIME_HEADER` | Example                        |
//! |-----------|------------------|--------------------------------|
//! | `Millis`  | `4_3`            | `[1234.567] `                  |
//! | `Nanos`   | `5_6`            | `[01234.567890] `              |
//! | `Iso8601` | `iso`            | `[2025-01-16T10:50:00.123Z] `  |
//!
//! The seconds fields of `Millis` and `Nanos` wrap (mod 10000 and 100000):
//! they are meant for comparing nearby events, not for reading dates.
//!
//! ```
//! # use qp::time;
//! let ms = time::militime_now();
//! let ns = time::nanotime_now();
//! assert!(ns / 1_000_000 >= ms);
//! ```

use std::fmt::Write;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::constants::{SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};

/// Prefix layout for emitted lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum TimeHeader {
    /// No prefix and no timestamp.
    #[default]
    None,
    /// `[SSSS.mmm] `: seconds mod 10000 and milliseconds.
    Millis,
    /// `[SSSSS.uuuuuu] `: seconds mod 100000 and microseconds.
    Nanos,
    /// `[YYYY-MM-DDTHH:MM:SS.mmmZ] ` in UTC.
    Iso8601,
}

impl TimeHeader {
    /// Names accepted by [`TimeHeader::parse`].
    pub const NAMES: &'static [&'static str] = &["none", "4_3", "5_6", "iso"];

    /// Parse a `QP_TIME_HEADER` value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(Self::None),
            "4_3" | "millis" => Some(Self::Millis),
            "5_6" | "nanos" => Some(Self::Nanos),
            "iso" | "iso8601" => Some(Self::Iso8601),
            _ => None,
        }
    }

    /// Whether events need a timestamp.
    #[inline]
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Length of the rendered prefix, including the trailing space.
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::None => 0,
            Self::Millis => 11,
            Self::Nanos => 15,
            Self::Iso8601 => 27,
        }
    }

    /// Whether the rendered prefix is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Append the prefix for `at` to `out`.
    pub fn write(self, out: &mut String, at: SystemTime) {
        let since = since_epoch(at);
        let _ = match self {
            Self::None => Ok(()),
            Self::Millis => {
                let ms = since.as_millis();
                write!(out, "[{:04}.{:03}] ", ms / 1000 % 10_000, ms % 1000)
            },
            Self::Nanos => {
                let ns = since.as_nanos();
                write!(
                    out,
                    "[{:05}.{:06}] ",
                    ns / 1_000_000_000 % 100_000,
                    ns / 1000 % 1_000_000
                )
            },
            Self::Iso8601 => {
                let iso = format_iso8601(since.as_secs(), since.subsec_millis());
                write!(out, "[{iso}] ")
            },
        };
    }
}

fn since_epoch(at: SystemTime) -> Duration {
    at.duration_since(UNIX_EPOCH).unwrap_or_default()
}

/// Wall-clock milliseconds since the Unix epoch.
#[must_use]
pub fn militime_now() -> u64 {
    u64::try_from(since_epoch(SystemTime::now()).as_millis()).unwrap_or(u64::MAX)
}

/// Wall-clock nanoseconds since the Unix epoch.
#[must_use]
pub fn nanotime_now() -> u64 {
    u64::try_from(since_epoch(SystemTime::now()).as_nanos()).unwrap_or(u64::MAX)
}

/// Format seconds and milliseconds since the epoch as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Dates come from Howard Hinnant's `civil_from_days`:
/// <https://howardhinnant.github.io/date_algorithms.html#civil_from_days>
#[must_use]
#[allow(clippy::similar_names)] // doe/doy are standard date algorithm abbreviations
pub fn format_iso8601(secs: u64, millis: u32) -> String {
    let days = secs / SECONDS_PER_DAY;
    let time_of_day = secs % SECONDS_PER_DAY;
    let hours = time_of_day / SECONDS_PER_HOUR;
    let minutes = time_of_day % SECONDS_PER_HOUR / SECONDS_PER_MINUTE;
    let seconds = time_of_day % SECONDS_PER_MINUTE;

    // Shift the epoch to 0000-03-01 so leap days fall at the end of a year.
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);

    format!("{year:04}-{month:02}-{day:02}T{hours:02}:{minutes:02}:{seconds:02}.{millis:03}Z")
}
