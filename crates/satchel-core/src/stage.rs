use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, SatchelError};

/// Files and folder trees to gather before archiving.
#[derive(Debug, Clone, Default)]
pub struct IncludeList {
    pub files: Vec<String>,
    pub folders: Vec<String>,
}

/// Expand a leading `~` or `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home.to_string_lossy().to_string();
        }
    }
    if let Some(suffix) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(suffix).to_string_lossy().to_string();
        }
    }
    path.to_string()
}

/// Copy every include entry into `dest`: files land directly in `dest`,
/// folder trees are copied under their base name. Missing entries fail the
/// run.
pub fn stage_includes(include: &IncludeList, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;

    for file in &include.files {
        let src = PathBuf::from(expand_tilde(file));
        let name = src.file_name().ok_or_else(|| {
            SatchelError::Config(format!("include file '{file}' has no base name"))
        })?;
        debug!("staging file {}", src.display());
        std::fs::copy(&src, dest.join(name))?;
    }

    for folder in &include.folders {
        let src = PathBuf::from(expand_tilde(folder));
        let name = src.file_name().ok_or_else(|| {
            SatchelError::Config(format!("include folder '{folder}' has no base name"))
        })?;
        debug!("staging folder {}", src.display());
        copy_tree(&src, &dest.join(name))?;
    }

    Ok(())
}

/// Recursive copy, following symlinks.
fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| {
            SatchelError::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::other(format!("walk failed under {}", src.display()))
            }))
        })?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .expect("walkdir yields paths under its root");
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
