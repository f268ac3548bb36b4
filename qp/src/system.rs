//! Shell command capture.
//!
//! Runs a command through the shell and routes its stdout through the active
//! sink, so the output lands in the same stream as the surrounding probes:
//!
//! ```text
//! probe.rs:12:setup: RUN: ip route
//! default via 10.0.0.1 dev eth0
//! probe.rs:12:setup: exit status 0
//! ```

use std::io::{self, BufRead, BufReader};
use std::process::{Command, ExitStatus, Stdio};

use crate::emit::{emit, emit_raw};
use crate::event::CaptureEvent;
use crate::location::Location;

fn shell(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.arg("/C").arg(cmd);
        command
    } else {
        let mut command = Command::new("sh");
        command.arg("-c").arg(cmd);
        command
    }
}

/// Describe how a child process ended.
#[must_use]
pub fn describe_status(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exit status {code}");
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("exit signal {signal}");
        }
    }
    format!("unexpected wait status {status}")
}

fn say(location: Location, message: String) {
    emit(CaptureEvent::new(location).message(message));
}

/// Run `cmd` through the shell, forwarding each stdout line raw.
///
/// Emits `RUN: <cmd>` first and the exit description last. Failing to start
/// the shell or to wait for it is emitted and returned.
pub fn run_system(location: Location, cmd: &str) -> io::Result<ExitStatus> {
    say(location, format!("RUN: {cmd}"));

    let mut child = match shell(cmd).stdout(Stdio::piped()).spawn() {
        Ok(child) => child,
        Err(err) => {
            say(location, format!("RUN failed: {err}"));
            return Err(err);
        },
    };

    if let Some(stdout) = child.stdout.take() {
        let mut reader = BufReader::new(stdout);
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => emit_raw(format_args!("{}", String::from_utf8_lossy(&line))),
                Err(err) => {
                    say(location, format!("read error: {err}"));
                    break;
                },
            }
        }
    }

    report_exit(location, child.wait())
}

/// Emit how the child ended, or why waiting for it failed.
fn report_exit(location: Location, waited: io::Result<ExitStatus>) -> io::Result<ExitStatus> {
    match waited {
        Ok(status) => {
            say(location, describe_status(status));
            Ok(status)
        },
        Err(err) => {
            say(location, format!("wait failed: {err}"));
            Err(err)
        },
    }
}
