use std::path::Path;
use std::process::Command;

use crate::error::{Result, SatchelError};
use crate::platform::shell;

/// Capability for measuring the on-disk size of a file or directory tree.
///
/// Block-size rounding may differ between platforms; the only requirement is
/// that the numbers are comparable within one run. Tests inject a
/// deterministic fake.
pub trait DiskUsage {
    /// Total on-disk size of `path` in bytes, recursing into directories.
    fn usage(&self, path: &Path) -> Result<u64>;
}

/// `du`-based probe. `-sk` reports 1 KiB blocks on both Linux and macOS.
pub struct DuCommand;

impl DiskUsage for DuCommand {
    fn usage(&self, path: &Path) -> Result<u64> {
        let mut cmd = Command::new("du");
        cmd.arg("-sk").arg(path);
        let output = shell::run_capture(&mut cmd)?;
        if !output.status.success() {
            return Err(SatchelError::Io(std::io::Error::other(
                shell::describe_failure("du", &output),
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let kib: u64 = stdout
            .split_whitespace()
            .next()
            .and_then(|field| field.parse().ok())
            .ok_or_else(|| {
                SatchelError::Io(std::io::Error::other(format!(
                    "unparsable du output: '{}'",
                    stdout.trim()
                )))
            })?;
        Ok(kib * 1024)
    }
}

/// Returns the disk-usage probe for the current platform, if one exists.
pub fn native() -> Result<Box<dyn DiskUsage>> {
    #[cfg(unix)]
    {
        Ok(Box::new(DuCommand))
    }

    #[cfg(not(unix))]
    {
        Err(SatchelError::UnsupportedPlatform(std::env::consts::OS))
    }
}
