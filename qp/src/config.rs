//! Runtime configuration.
//!
//! The process-wide configuration is read from the environment on first use
//! (see [`constants`](crate::constants) for the variables) and can be replaced
//! with [`set_config`]. [`with_config`] overrides it for the current thread
//! only, which keeps parallel tests independent of each other.
//!
//! ```
//! use qp::{CheckAction, Config, TimeHeader};
//!
//! let config = Config::default()
//!     .with_time_header(TimeHeader::Millis)
//!     .with_check_action(CheckAction::Continue);
//!
//! qp::with_config(config, || {
//!     assert_eq!(qp::config::current().time_header, TimeHeader::Millis);
//! });
//! ```

use std::cell::Cell;
use std::fmt;
use std::io::Write;
use std::sync::{OnceLock, PoisonError, RwLock};
use std::time::Duration;

use crate::constants::{
    DEFAULT_RATELIMIT_INTERVAL_MS, ENV_CHECK, ENV_RATELIMIT_INTERVAL, ENV_TIME_HEADER,
};
use crate::time::TimeHeader;

/// What a failed `qp_check!` does after emitting its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CheckAction {
    /// Terminate the process with `std::process::abort`.
    Abort,
    /// Panic, so test harnesses and `catch_unwind` can observe the failure.
    Panic,
    /// Keep going.
    Continue,
}

impl CheckAction {
    /// Names accepted by [`CheckAction::parse`].
    pub const NAMES: &'static [&'static str] = &["abort", "panic", "continue"];

    /// Parse a `QP_CHECK` value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abort" | "fatal" => Some(Self::Abort),
            "panic" => Some(Self::Panic),
            "continue" | "nonfatal" => Some(Self::Continue),
            _ => None,
        }
    }
}

impl Default for CheckAction {
    fn default() -> Self {
        if cfg!(feature = "nonfatal") {
            Self::Continue
        } else {
            Self::Abort
        }
    }
}

/// Error for an invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The variable holds a value outside the accepted set.
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Value found.
        value: String,
        /// Human-readable description of what is accepted.
        expected: String,
    },

    /// A `file:` sink without a path.
    EmptyPath {
        /// Variable name.
        var: &'static str,
    },
}

impl ConfigError {
    /// Create an error for an out-of-range value.
    #[must_use]
    pub fn invalid(var: &'static str, value: &str, expected: impl Into<String>) -> Self {
        Self::InvalidValue {
            var,
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    /// Name of the offending variable.
    #[must_use]
    pub const fn var(&self) -> &'static str {
        match self {
            Self::InvalidValue { var, .. } | Self::EmptyPath { var } => var,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue {
                var,
                value,
                expected,
            } => write!(f, "invalid {var}={value:?}, expected {expected}"),
            Self::EmptyPath { var } => write!(f, "{var} names a file sink without a path"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Runtime settings shared by every probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Config {
    /// Line prefix; events are only stamped when this is not `None`.
    pub time_header: TimeHeader,
    /// Interval for `qp_print_ratelimit!` and friends.
    pub ratelimit_interval: Duration,
    /// What a failed `qp_check!` does.
    pub check_action: CheckAction,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_header: TimeHeader::None,
            ratelimit_interval: Duration::from_millis(DEFAULT_RATELIMIT_INTERVAL_MS),
            check_action: CheckAction::default(),
        }
    }
}

impl Config {
    /// Replace the time header.
    #[must_use]
    pub const fn with_time_header(mut self, time_header: TimeHeader) -> Self {
        self.time_header = time_header;
        self
    }

    /// Replace the rate-limit interval.
    #[must_use]
    pub const fn with_ratelimit_interval(mut self, interval: Duration) -> Self {
        self.ratelimit_interval = interval;
        self
    }

    /// Replace the check failure action.
    #[must_use]
    pub const fn with_check_action(mut self, action: CheckAction) -> Self {
        self.check_action = action;
        self
    }

    /// Rate-limit interval in whole milliseconds.
    #[must_use]
    pub fn ratelimit_interval_ms(&self) -> u64 {
        u64::try_from(self.ratelimit_interval.as_millis()).unwrap_or(u64::MAX)
    }

    /// Build a configuration from a variable lookup.
    ///
    /// Invalid values are skipped (the default is kept) and returned as errors.
    ///
    /// ```
    /// use qp::{CheckAction, Config};
    ///
    /// let (config, errors) = Config::from_lookup(|name| match name {
    ///     "QP_CHECK" => Some("continue".to_string()),
    ///     "QP_RATELIMIT_INTERVAL" => Some("soon".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.check_action, CheckAction::Continue);
    /// assert_eq!(errors.len(), 1);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();

        if let Some(value) = lookup(ENV_TIME_HEADER) {
            match TimeHeader::parse(&value) {
                Some(header) => config.time_header = header,
                None => errors.push(ConfigError::invalid(
                    ENV_TIME_HEADER,
                    &value,
                    format!("one of {}", TimeHeader::NAMES.join(", ")),
                )),
            }
        }

        if let Some(value) = lookup(ENV_RATELIMIT_INTERVAL) {
            match value.trim().parse::<u64>() {
                Ok(ms) => config.ratelimit_interval = Duration::from_millis(ms),
                Err(_) => errors.push(ConfigError::invalid(
                    ENV_RATELIMIT_INTERVAL,
                    &value,
                    "a number of milliseconds",
                )),
            }
        }

        if let Some(value) = lookup(ENV_CHECK) {
            match CheckAction::parse(&value) {
                Some(action) => config.check_action = action,
                None => errors.push(ConfigError::invalid(
                    ENV_CHECK,
                    &value,
                    format!("one of {}", CheckAction::NAMES.join(", ")),
                )),
            }
        }

        (config, errors)
    }

    /// Build a configuration from the process environment.
    ///
    /// Invalid values are reported once on stderr and replaced by defaults.
    pub fn from_env() -> Self {
        let (config, errors) = Self::from_lookup(|name| std::env::var(name).ok());
        for error in &errors {
            report(error);
        }
        config
    }
}

/// Report a problem with qp itself on stderr.
pub(crate) fn report(problem: &dyn fmt::Display) {
    let _ = writeln!(std::io::stderr(), "qp: {problem}");
}

static GLOBAL: OnceLock<RwLock<Config>> = OnceLock::new();

thread_local! {
    static SCOPED: Cell<Option<Config>> = const { Cell::new(None) };
}

fn global() -> &'static RwLock<Config> {
    GLOBAL.get_or_init(|| RwLock::new(Config::from_env()))
}

/// Configuration in effect for the current thread.
#[must_use]
pub fn current() -> Config {
    if let Some(config) = SCOPED.with(Cell::get) {
        return config;
    }
    *global().read().unwrap_or_else(PoisonError::into_inner)
}

/// Replace the process-wide configuration.
pub fn set_config(config: Config) {
    *global().write().unwrap_or_else(PoisonError::into_inner) = config;
}

struct RestoreScoped(Option<Config>);

impl Drop for RestoreScoped {
    fn drop(&mut self) {
        let previous = self.0.take();
        let _ = SCOPED.try_with(|scoped| scoped.set(previous));
    }
}

/// Run `f` with `config` in effect on the current thread.
pub fn with_config<R>(config: Config, f: impl FnOnce() -> R) -> R {
    let previous = SCOPED.with(|scoped| scoped.replace(Some(config)));
    let _restore = RestoreScoped(previous);
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let (config, errors) = Config::from_lookup(|_| None);
        assert!(errors.is_empty());
        assert_eq!(config, Config::default());
        assert_eq!(config.ratelimit_interval_ms(), DEFAULT_RATELIMIT_INTERVAL_MS);
        assert_eq!(config.time_header, TimeHeader::None);
    }

    #[test]
    fn test_all_variables_parsed() {
        let (config, errors) = Config::from_lookup(lookup_from(&[
            ("QP_TIME_HEADER", "5_6"),
            ("QP_RATELIMIT_INTERVAL", "250"),
            ("QP_CHECK", "panic"),
        ]));
        assert!(errors.is_empty());
        assert_eq!(config.time_header, TimeHeader::Nanos);
        assert_eq!(config.ratelimit_interval, Duration::from_millis(250));
        assert_eq!(config.check_action, CheckAction::Panic);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let (config, errors) = Config::from_lookup(lookup_from(&[
            ("QP_TIME_HEADER", "sundial"),
            ("QP_RATELIMIT_INTERVAL", "-5"),
            ("QP_CHECK", "shrug"),
        ]));
        assert_eq!(config, Config::default());
        let vars: Vec<_> = errors.iter().map(ConfigError::var).collect();
        assert_eq!(vars, ["QP_TIME_HEADER", "QP_RATELIMIT_INTERVAL", "QP_CHECK"]);
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::invalid("QP_CHECK", "shrug", "one of abort, panic, continue");
        assert_eq!(
            err.to_string(),
            "invalid QP_CHECK=\"shrug\", expected one of abort, panic, continue"
        );
        let empty = ConfigError::EmptyPath { var: "QP_SINK" };
        assert!(empty.to_string().contains("without a path"));
    }

    #[test]
    fn test_check_action_parse() {
        assert_eq!(CheckAction::parse("ABORT"), Some(CheckAction::Abort));
        assert_eq!(CheckAction::parse("continue"), Some(CheckAction::Continue));
        assert_eq!(CheckAction::parse("nope"), None);
    }

    #[cfg(feature = "nonfatal")]
    #[test]
    fn test_nonfatal_default_continues() {
        assert_eq!(CheckAction::default(), CheckAction::Continue);
        assert_eq!(Config::default().check_action, CheckAction::Continue);
        let (config, _) = Config::from_lookup(lookup_from(&[("QP_CHECK", "abort")]));
        assert_eq!(config.check_action, CheckAction::Abort);
    }

    #[cfg(not(feature = "nonfatal"))]
    #[test]
    fn test_default_aborts() {
        assert_eq!(CheckAction::default(), CheckAction::Abort);
        assert_eq!(Config::default().check_action, CheckAction::Abort);
    }

    #[test]
    fn test_with_config_is_scoped_and_restored() {
        let outer = current();
        let inner = Config::default().with_time_header(TimeHeader::Iso8601);
        let seen = with_config(inner, || {
            let nested = with_config(
                inner.with_check_action(CheckAction::Continue),
                current,
            );
            assert_eq!(nested.check_action, CheckAction::Continue);
            current()
        });
        assert_eq!(seen, inner);
        assert_eq!(current(), outer);
    }

    #[test]
    fn test_with_config_does_not_leak_to_other_threads() {
        let inner = Config::default().with_ratelimit_interval(Duration::from_millis(7));
        with_config(inner, || {
            let other = std::thread::spawn(current).join().expect("thread");
            assert_ne!(other.ratelimit_interval, Duration::from_millis(7));
        });
    }
}
