//! Output sinks.
//!
//! A sink receives complete, newline-terminated records. Each record is
//! delivered with a single write followed by a flush, so concurrent probes
//! never interleave inside a line.
//!
//! # Selection
//!
//! The active sink is resolved per record, first match wins:
//!
//! 1. a sink installed for the current thread with [`with_sink`]
//! 2. a process-wide sink installed with [`set_sink`]
//! 3. the sink named by `QP_SINK` (read once)
//! 4. [`StderrSink`]
//!
//! ```
//! let buffer = qp::BufferSink::new();
//! qp::with_sink(buffer.clone(), || {
//!     qp::sink::write("hello\n");
//! });
//! assert_eq!(buffer.contents(), "hello\n");
//! ```

use std::cell::RefCell;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use crate::config::{ConfigError, report};
use crate::constants::{CONSOLE_PATH, ENV_SINK};

/// Destination for rendered records.
pub trait Sink: Send + Sync {
    /// Write one complete record and flush it.
    fn write_str(&self, text: &str) -> io::Result<()>;
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn write_str(&self, text: &str) -> io::Result<()> {
        (**self).write_str(text)
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write_str(&self, text: &str) -> io::Result<()> {
        (**self).write_str(text)
    }
}

fn write_locked(mut out: impl Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()
}

// ============================================================================
// STANDARD STREAMS
// ============================================================================

/// Writes to the process stderr. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn write_str(&self, text: &str) -> io::Result<()> {
        write_locked(io::stderr().lock(), text)
    }
}

/// Writes to the process stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write_str(&self, text: &str) -> io::Result<()> {
        write_locked(io::stdout().lock(), text)
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl Sink for NullSink {
    fn write_str(&self, _text: &str) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// FILES
// ============================================================================

/// Appends to a file, opening it for every record.
///
/// Opening per record keeps the sink usable for device files and lets the
/// file be truncated or rotated between records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Append records to `path`, creating it if needed.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write records to the system console.
    #[must_use]
    pub fn console() -> Self {
        Self::new(CONSOLE_PATH)
    }

    /// Target path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write_str(&self, text: &str) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write_locked(file, text)
    }
}

// ============================================================================
// IN-PROCESS SINKS
// ============================================================================

/// Wraps any writer behind a mutex.
pub struct WriterSink<W> {
    inner: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    /// Wrap `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W> fmt::Debug for WriterSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink").finish_non_exhaustive()
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write_str(&self, text: &str) -> io::Result<()> {
        let mut writer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        write_locked(&mut *writer, text)
    }
}

/// Hands each record to a closure.
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// static SEEN: AtomicUsize = AtomicUsize::new(0);
/// let sink = qp::CallbackSink::new(|line: &str| {
///     SEEN.fetch_add(line.len(), Ordering::Relaxed);
/// });
/// qp::with_sink(sink, || qp::sink::write("abc\n"));
/// assert_eq!(SEEN.load(Ordering::Relaxed), 4);
/// ```
pub struct CallbackSink<F> {
    callback: F,
}

impl<F: Fn(&str) + Send + Sync> CallbackSink<F> {
    /// Wrap `callback`.
    #[must_use]
    pub const fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> fmt::Debug for CallbackSink<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSink").finish_non_exhaustive()
    }
}

impl<F: Fn(&str) + Send + Sync> Sink for CallbackSink<F> {
    fn write_str(&self, text: &str) -> io::Result<()> {
        (self.callback)(text);
        Ok(())
    }
}

/// Collects records in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    buffer: Arc<Mutex<String>>,
}

impl BufferSink {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, String> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Everything written so far.
    #[must_use]
    pub fn contents(&self) -> String {
        self.lock().clone()
    }

    /// Written records, without their newlines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lock().lines().map(str::to_owned).collect()
    }

    /// Drop everything written so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Return and clear the contents.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.lock())
    }
}

impl Sink for BufferSink {
    fn write_str(&self, text: &str) -> io::Result<()> {
        self.lock().push_str(text);
        Ok(())
    }
}

// ============================================================================
// QP_SINK
// ============================================================================

/// Parsed `QP_SINK` value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SinkSpec {
    /// `stderr`
    Stderr,
    /// `stdout`
    Stdout,
    /// `null`
    Null,
    /// `console`
    Console,
    /// `file:<path>`
    File(PathBuf),
}

impl SinkSpec {
    /// Build the sink this value names.
    #[must_use]
    pub fn into_sink(self) -> Arc<dyn Sink> {
        match self {
            Self::Stderr => Arc::new(StderrSink),
            Self::Stdout => Arc::new(StdoutSink),
            Self::Null => Arc::new(NullSink),
            Self::Console => Arc::new(FileSink::console()),
            Self::File(path) => Arc::new(FileSink::new(path)),
        }
    }
}

impl FromStr for SinkSpec {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Some(path) = trimmed.strip_prefix("file:") {
            if path.is_empty() {
                return Err(ConfigError::EmptyPath { var: ENV_SINK });
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "stderr" | "" => Ok(Self::Stderr),
            "stdout" => Ok(Self::Stdout),
            "null" | "none" => Ok(Self::Null),
            "console" => Ok(Self::Console),
            _ => Err(ConfigError::invalid(
                ENV_SINK,
                value,
                "stderr, stdout, null, console or file:<path>",
            )),
        }
    }
}

// ============================================================================
// SELECTION
// ============================================================================

static GLOBAL_SINK: RwLock<Option<Arc<dyn Sink>>> = RwLock::new(None);
static DEFAULT_SINK: OnceLock<Arc<dyn Sink>> = OnceLock::new();

thread_local! {
    static SCOPED_SINK: RefCell<Option<Arc<dyn Sink>>> = const { RefCell::new(None) };
}

fn default_sink() -> Arc<dyn Sink> {
    DEFAULT_SINK
        .get_or_init(|| match std::env::var(ENV_SINK) {
            Ok(value) => value.parse::<SinkSpec>().map_or_else(
                |err| {
                    report(&err);
                    SinkSpec::Stderr.into_sink()
                },
                SinkSpec::into_sink,
            ),
            Err(_) => SinkSpec::Stderr.into_sink(),
        })
        .clone()
}

/// Install a process-wide sink.
pub fn set_sink(sink: impl Sink + 'static) {
    set_shared_sink(Arc::new(sink));
}

/// Install an already shared process-wide sink.
pub fn set_shared_sink(sink: Arc<dyn Sink>) {
    *GLOBAL_SINK.write().unwrap_or_else(PoisonError::into_inner) = Some(sink);
}

/// Remove the process-wide sink, falling back to `QP_SINK` or stderr.
pub fn reset_sink() {
    *GLOBAL_SINK.write().unwrap_or_else(PoisonError::into_inner) = None;
}

struct RestoreScoped(Option<Arc<dyn Sink>>);

impl Drop for RestoreScoped {
    fn drop(&mut self) {
        let previous = self.0.take();
        let _ = SCOPED_SINK.try_with(|scoped| *scoped.borrow_mut() = previous);
    }
}

/// Run `f` with `sink` receiving every record emitted on the current thread.
pub fn with_sink<R>(sink: impl Sink + 'static, f: impl FnOnce() -> R) -> R {
    let sink: Arc<dyn Sink> = Arc::new(sink);
    let previous = SCOPED_SINK.with(|scoped| scoped.borrow_mut().replace(sink));
    let _restore = RestoreScoped(previous);
    f()
}

/// Sink that would receive a record emitted now on this thread.
#[must_use]
pub fn active() -> Arc<dyn Sink> {
    if let Ok(Some(sink)) = SCOPED_SINK.try_with(|scoped| scoped.borrow().clone()) {
        return sink;
    }
    if let Some(sink) = GLOBAL_SINK
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return Arc::clone(sink);
    }
    default_sink()
}

/// Deliver one record to the active sink.
pub fn write(text: &str) -> io::Result<()> {
    active().write_str(text)
}

/// Run `f` and return everything it emitted on the current thread.
///
/// ```
/// let out = qp::capture(|| qp::sink::write("one\n").unwrap());
/// assert_eq!(out, "one\n");
/// ```
pub fn capture(f: impl FnOnce()) -> String {
    let buffer = BufferSink::new();
    with_sink(buffer.clone(), f);
    buffer.take()
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;
    use std::thread;

    assert_impl_all!(StderrSink: Sink, Send, Sync, Copy);
    assert_impl_all!(BufferSink: Sink, Clone, Send, Sync);
    assert_impl_all!(FileSink: Sink, Clone);
    assert_impl_all!(WriterSink<Vec<u8>>: Sink);

    #[test]
    fn test_parse_sink_spec() {
        assert_eq!("stderr".parse::<SinkSpec>(), Ok(SinkSpec::Stderr));
        assert_eq!(" STDOUT ".parse::<SinkSpec>(), Ok(SinkSpec::Stdout));
        assert_eq!("null".parse::<SinkSpec>(), Ok(SinkSpec::Null));
        assert_eq!("console".parse::<SinkSpec>(), Ok(SinkSpec::Console));
        assert_eq!(
            "file:/tmp/qp.log".parse::<SinkSpec>(),
            Ok(SinkSpec::File(PathBuf::from("/tmp/qp.log")))
        );
    }

    #[test]
    fn test_parse_sink_spec_errors() {
        assert_eq!(
            "file:".parse::<SinkSpec>(),
            Err(ConfigError::EmptyPath { var: ENV_SINK })
        );
        let err = "syslog".parse::<SinkSpec>().unwrap_err();
        assert_eq!(err.var(), ENV_SINK);
        assert!(err.to_string().contains("syslog"));
    }

    #[test]
    fn test_buffer_sink_shares_between_clones() {
        let a = BufferSink::new();
        let b = a.clone();
        a.write_str("one\n").unwrap();
        b.write_str("two\n").unwrap();
        assert_eq!(a.lines(), ["one", "two"]);
        assert_eq!(b.take(), "one\ntwo\n");
        assert!(a.contents().is_empty());
    }

    #[test]
    fn test_writer_sink_collects_bytes() {
        let sink = WriterSink::new(Vec::new());
        sink.write_str("a\n").unwrap();
        sink.write_str("b\n").unwrap();
        assert_eq!(sink.into_inner(), b"a\nb\n");
    }

    #[test]
    fn test_file_sink_appends() {
        let path = std::env::temp_dir().join(format!("qp-sink-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let sink = FileSink::new(&path);
        sink.write_str("first\n").unwrap();
        sink.write_str("second\n").unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(text, "first\nsecond\n");
    }

    #[test]
    fn test_scoped_sink_wins_and_restores() {
        let outer = BufferSink::new();
        let inner = BufferSink::new();
        with_sink(outer.clone(), || {
            write("outer-1\n").unwrap();
            with_sink(inner.clone(), || write("inner\n").unwrap());
            write("outer-2\n").unwrap();
        });
        assert_eq!(outer.lines(), ["outer-1", "outer-2"]);
        assert_eq!(inner.lines(), ["inner"]);
    }

    #[test]
    fn test_scoped_sink_restored_after_panic() {
        let outer = BufferSink::new();
        with_sink(outer.clone(), || {
            let result = std::panic::catch_unwind(|| {
                with_sink(NullSink, || panic!("boom"));
            });
            assert!(result.is_err());
            write("after\n").unwrap();
        });
        assert_eq!(outer.contents(), "after\n");
    }

    #[test]
    fn test_scoped_sink_is_per_thread() {
        let mine = BufferSink::new();
        with_sink(mine.clone(), || {
            let theirs = thread::spawn(capture_in_thread).join().unwrap();
            assert_eq!(theirs, "theirs\n");
            write("mine\n").unwrap();
        });
        assert_eq!(mine.contents(), "mine\n");
    }

    fn capture_in_thread() -> String {
        capture(|| write("theirs\n").unwrap())
    }

    #[test]
    fn test_callback_sink_sees_whole_records() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            CallbackSink::new(move |line: &str| seen.lock().unwrap().push(line.to_owned()))
        };
        with_sink(sink, || {
            write("a = 1\n").unwrap();
            write("b = 2\n").unwrap();
        });
        assert_eq!(*seen.lock().unwrap(), ["a = 1\n", "b = 2\n"]);
    }
}
