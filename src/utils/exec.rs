//! External command execution utilities.
//!
//! Runs commands to completion, captures their output and turns a non-zero
//! exit into an [`ExecError::Failed`] carrying the command's diagnostic text.

use crate::log;
use portable_pty::{CommandBuilder, NativePtySystem, PtySize, PtySystem};
use regex::Regex;
use std::{
    borrow::Cow,
    ffi::OsString,
    io::Read,
    path::Path,
    process::{Command, Output},
    sync::OnceLock,
};
use thiserror::Error;

/// Errors raised while running an external command.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Empty command")]
    Empty,

    #[error("Failed to execute `{name}`")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Pseudo-terminal error while running `{name}`: {message}")]
    Pty { name: String, message: String },

    /// The command ran and exited unsuccessfully.
    ///
    /// `message` is the command's own diagnostic output, untouched.
    #[error("Command `{name}` failed with {status}\n{message}")]
    Failed {
        name: String,
        status: String,
        message: String,
    },
}

impl ExecError {
    fn pty(name: &str, err: impl std::fmt::Display) -> Self {
        Self::Pty {
            name: name.to_owned(),
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Command Execution
// ============================================================================

/// Execute a command in `root` (or the current directory) and capture its output.
///
/// With `pty` the child gets a pseudo-terminal and behaves as if run
/// interactively (progress output, colors). Stdout and stderr are merged in
/// that mode.
///
/// # Errors
/// Returns [`ExecError::Failed`] on a non-zero exit code, other variants when
/// the command could not be run at all.
pub fn exec(
    root: Option<&Path>,
    cmd: &[OsString],
    args: &[OsString],
    filter: &'static FilterRule,
    pty: bool,
) -> Result<Output, ExecError> {
    if pty {
        exec_with_pty(root, cmd, args, filter)
    } else {
        exec_no_pty(root, cmd, args, filter)
    }
}

fn exec_no_pty(
    root: Option<&Path>,
    cmd: &[OsString],
    args: &[OsString],
    filter: &'static FilterRule,
) -> Result<Output, ExecError> {
    let (name, mut command) = prepare(root, cmd, args)?;

    let output = command
        .output()
        .map_err(|source| ExecError::Spawn {
            name: name.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(ExecError::Failed {
            message: diagnostic(&output.stderr, &output.stdout),
            status: output.status.to_string(),
            name,
        });
    }

    // On success, only log stderr (git reports progress there)
    filter.log(&name, String::from_utf8_lossy(&output.stderr).trim());
    Ok(output)
}

/// Execute a command attached to the slave end of a PTY.
///
/// The master is read on a separate thread: `read_to_string()` only returns
/// at EOF, which happens once the master is dropped after the child exits.
fn exec_with_pty(
    root: Option<&Path>,
    cmd: &[OsString],
    args: &[OsString],
    filter: &'static FilterRule,
) -> Result<Output, ExecError> {
    let (name, command_builder) = prepare_pty(root, cmd, args)?;

    let pty_system = NativePtySystem::default();
    let pair = pty_system
        .openpty(PtySize {
            rows: 24,
            cols: 80,
            pixel_width: 0,
            pixel_height: 0,
        })
        .map_err(|e| ExecError::pty(&name, e))?;

    let mut child = pair
        .slave
        .spawn_command(command_builder)
        .map_err(|e| ExecError::pty(&name, e))?;

    // The child holds its own handle to the slave
    drop(pair.slave);

    let mut reader = pair
        .master
        .try_clone_reader()
        .map_err(|e| ExecError::pty(&name, e))?;
    let output_handle = std::thread::spawn(move || {
        let mut output_str = String::new();
        let _ = reader.read_to_string(&mut output_str);
        output_str
    });

    let status = child.wait().map_err(|e| ExecError::pty(&name, e))?;

    // Closing the master signals EOF to the reader thread
    drop(pair.master);

    let output_str = output_handle
        .join()
        .map_err(|_| ExecError::pty(&name, "output reader thread panicked"))?;

    if !status.success() {
        return Err(ExecError::Failed {
            status: format!("exit code: {}", status.exit_code()),
            message: strip_ansi(output_str.trim()).into_owned(),
            name,
        });
    }

    filter.log(&name, &output_str);

    #[cfg(unix)]
    #[allow(clippy::cast_possible_wrap)] // exit_code is within i32 range
    let status = {
        use std::os::unix::process::ExitStatusExt;
        std::process::ExitStatus::from_raw((status.exit_code() as i32) << 8)
    };
    #[cfg(windows)]
    let status = {
        use std::os::windows::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(status.exit_code())
    };

    Ok(Output {
        status,
        stdout: output_str.into_bytes(),
        stderr: Vec::new(),
    })
}

fn command_name(cmd: &[OsString]) -> Result<String, ExecError> {
    cmd.first()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or(ExecError::Empty)
}

/// Prepare a Command from components.
fn prepare(
    root: Option<&Path>,
    cmd: &[OsString],
    args: &[OsString],
) -> Result<(String, Command), ExecError> {
    let name = command_name(cmd)?;

    let mut command = Command::new(&cmd[0]);
    command.args(&cmd[1..]).args(args);

    if let Some(dir) = root {
        command.current_dir(dir);
    }

    Ok((name, command))
}

/// Prepare a `CommandBuilder` from components.
fn prepare_pty(
    root: Option<&Path>,
    cmd: &[OsString],
    args: &[OsString],
) -> Result<(String, CommandBuilder), ExecError> {
    let name = command_name(cmd)?;

    let mut command = CommandBuilder::new(&cmd[0]);
    command.args(cmd[1..].iter().chain(args));

    if let Some(dir) = root {
        command.cwd(dir);
    }

    Ok((name, command))
}

/// Diagnostic text of a failed command: stderr, or stdout when stderr is empty.
fn diagnostic(stderr: &[u8], stdout: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::from_utf8_lossy(stdout).trim().to_owned()
    } else {
        stderr.to_owned()
    }
}

// ============================================================================
// Output Filtering
// ============================================================================

fn strip_ansi(s: &str) -> Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").unwrap());
    re.replace_all(s, "")
}

/// Prefix-based filter for successful command output.
pub struct FilterRule {
    /// Lines starting with any of these (after trimming) are not logged.
    pub skip_prefixes: &'static [&'static str],
}

impl FilterRule {
    pub const fn new(skip_prefixes: &'static [&'static str]) -> Self {
        Self { skip_prefixes }
    }

    fn should_skip(&self, line: &str) -> bool {
        line.is_empty() || self.skip_prefixes.iter().any(|p| line.starts_with(p))
    }

    /// Log the lines of `output` that survive the filter under `name`.
    fn log(&self, name: &str, output: &str) {
        let valid_lines: Vec<_> = output
            .lines()
            .map(|line| strip_ansi(line.trim_end_matches('\r')).into_owned())
            .filter(|line| !self.should_skip(line.trim()))
            .collect();

        if !valid_lines.is_empty() {
            log!(name; "{}", valid_lines.join("\n"));
        }
    }
}

/// Empty filter (no skipping).
pub const EMPTY_FILTER: FilterRule = FilterRule::new(&[]);

/// Git filter: drop advice lines, keep progress and ref updates.
pub const GIT_FILTER: FilterRule = FilterRule::new(&["hint:"]);

// ============================================================================
// Tests
// ============================================================================
