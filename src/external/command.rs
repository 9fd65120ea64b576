//! Subprocess execution shared by the git and go adapters

use crate::error::CommandError;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Render a command line for logs and error messages
fn render<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.as_ref().to_string_lossy());
    }
    line
}

/// Run a command in `dir` and return its stdout.
///
/// A non-zero exit is an error carrying the captured stderr. The child is
/// killed if the returned future is dropped before completion.
pub(crate) async fn run<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    dir: &Path,
) -> Result<Vec<u8>, CommandError> {
    let command_line = render(program, args);
    debug!(command = %command_line, dir = %dir.display(), "running command");

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| CommandError::spawn(&command_line, e))?;

    if !output.status.success() {
        return Err(CommandError::exit(command_line, output.status, &output.stderr));
    }

    debug!(command = %command_line, bytes = output.stdout.len(), "command finished");
    Ok(output.stdout)
}
