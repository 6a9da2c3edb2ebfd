use std::io::{BufRead, BufReader};
use std::process::{Command, ExitStatus, Output, Stdio};

/// Run a command, capturing stdout and stderr. A non-success exit status is
/// returned as `Ok` — callers decide how to surface it.
pub fn run_capture(cmd: &mut Command) -> std::io::Result<Output> {
    cmd.output()
}

/// Run a command, forwarding its stdout line by line as it is produced.
/// Used for long-running tools that report their own progress (rclone).
pub fn run_streaming(cmd: &mut Command) -> std::io::Result<ExitStatus> {
    let mut child = cmd.stdout(Stdio::piped()).spawn()?;

    if let Some(stdout) = child.stdout.take() {
        for line in BufReader::new(stdout).lines() {
            eprintln!("{}", line?);
        }
    }

    child.wait()
}

/// Describe a failed tool invocation: exit code (or signal) plus stderr.
pub fn describe_failure(tool: &str, output: &Output) -> String {
    let code = output
        .status
        .code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string());
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{tool} exited with {code}: {}", stderr.trim())
}
