use std::path::{Path, PathBuf};

use super::ManifestProvider;
use crate::error::Result;

/// Keeps the brew invocations from a shell history file, so installed
/// formulae can be reconstructed by hand on a new machine.
pub struct BrewHistory {
    history: PathBuf,
}

impl BrewHistory {
    pub fn new(history: PathBuf) -> Self {
        Self { history }
    }
}

impl ManifestProvider for BrewHistory {
    fn name(&self) -> &'static str {
        "brew-history"
    }

    fn collect(&self, dest: &Path) -> Result<()> {
        // Shell history is not guaranteed to be valid UTF-8.
        let raw = std::fs::read(&self.history)?;
        let text = String::from_utf8_lossy(&raw);

        let mut lines: Vec<&str> = text.lines().filter(|l| l.contains("brew")).collect();
        lines.push(""); // trailing newline
        std::fs::write(dest.join("zsh_history_brew.txt"), lines.join("\n"))?;
        Ok(())
    }
}
