use std::path::Path;
use std::process::Command;

use crate::error::{Result, SatchelError};
use crate::platform::shell;

/// Remote object store holding backup generations. All operations are
/// blocking and run to completion or fail; there is no retry logic.
pub trait RemoteStore {
    /// First-level directory names under `dest`.
    fn list_dirs(&self, dest: &str) -> Result<Vec<String>>;

    /// Recursively delete `dest` and everything under it.
    fn purge(&self, dest: &str) -> Result<()>;

    /// Copy the contents of a local directory into `dest`, creating it.
    fn copy(&self, local: &Path, dest: &str) -> Result<()>;
}

/// rclone-backed remote. Every operation shells out to the rclone binary;
/// a non-zero exit is a hard failure of the enclosing step.
pub struct Rclone {
    binary: String,
}

impl Rclone {
    pub fn new() -> Self {
        Self::with_binary("rclone")
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for Rclone {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteStore for Rclone {
    fn list_dirs(&self, dest: &str) -> Result<Vec<String>> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("lsd").arg(dest);
        let output = shell::run_capture(&mut cmd)
            .map_err(|e| SatchelError::Upload(format!("cannot run {}: {e}", self.binary)))?;
        if !output.status.success() {
            return Err(SatchelError::Upload(shell::describe_failure(
                "rclone lsd",
                &output,
            )));
        }

        // `rclone lsd` prints one line per directory; the name is the last
        // whitespace-delimited field.
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_lsd_output(&stdout))
    }

    fn purge(&self, dest: &str) -> Result<()> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("purge").arg(dest);
        let status = shell::run_streaming(&mut cmd)
            .map_err(|e| SatchelError::Upload(format!("cannot run {}: {e}", self.binary)))?;
        if !status.success() {
            return Err(SatchelError::Upload(format!(
                "rclone purge of '{dest}' exited with {}",
                status.code().unwrap_or(-1)
            )));
        }
        Ok(())
    }

    fn copy(&self, local: &Path, dest: &str) -> Result<()> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("copy").arg(local).arg(dest).arg("--progress");
        let status = shell::run_streaming(&mut cmd)
            .map_err(|e| SatchelError::Upload(format!("cannot run {}: {e}", self.binary)))?;
        if !status.success() {
            return Err(SatchelError::Upload(format!(
                "rclone copy to '{dest}' exited with {}",
                status.code().unwrap_or(-1)
            )));
        }
        Ok(())
    }
}

fn parse_lsd_output(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.split_whitespace().last())
        .map(str::to_string)
        .collect()
}
