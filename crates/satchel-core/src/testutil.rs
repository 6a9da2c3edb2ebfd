use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Result, SatchelError};
use crate::platform::usage::DiskUsage;
use crate::remote::RemoteStore;

/// Deterministic disk-usage fake: sizes are looked up by file name, with a
/// fallback for anything unlisted.
#[derive(Default)]
pub struct FixedUsage {
    sizes: HashMap<String, u64>,
    fallback: u64,
}

impl FixedUsage {
    pub fn new(sizes: &[(&str, u64)]) -> Self {
        Self {
            sizes: sizes
                .iter()
                .map(|(name, size)| (name.to_string(), *size))
                .collect(),
            fallback: 0,
        }
    }
}

impl DiskUsage for FixedUsage {
    fn usage(&self, path: &Path) -> Result<u64> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(self.sizes.get(&name).copied().unwrap_or(self.fallback))
    }
}

/// In-memory remote for testing. Tracks the generation directories at a
/// single base destination and records every purge and copy.
pub struct MemoryRemote {
    dirs: Mutex<Vec<String>>,
    pub purged: Mutex<Vec<String>>,
    pub copied: Mutex<Vec<(PathBuf, String)>>,
    /// When set, purging a destination containing this substring fails.
    pub fail_purge_matching: Option<String>,
}

impl MemoryRemote {
    pub fn new(names: &[&str]) -> Self {
        Self {
            dirs: Mutex::new(names.iter().map(|n| n.to_string()).collect()),
            purged: Mutex::new(Vec::new()),
            copied: Mutex::new(Vec::new()),
            fail_purge_matching: None,
        }
    }

    pub fn with_generations(generations: &[i64]) -> Self {
        let names: Vec<String> = generations.iter().map(|g| g.to_string()).collect();
        Self::new(&names.iter().map(String::as_str).collect::<Vec<_>>())
    }

    pub fn dir_names(&self) -> Vec<String> {
        self.dirs.lock().unwrap().clone()
    }
}

impl RemoteStore for MemoryRemote {
    fn list_dirs(&self, _dest: &str) -> Result<Vec<String>> {
        Ok(self.dirs.lock().unwrap().clone())
    }

    fn purge(&self, dest: &str) -> Result<()> {
        if let Some(pattern) = &self.fail_purge_matching {
            if dest.contains(pattern.as_str()) {
                return Err(SatchelError::Upload(format!(
                    "injected purge failure for '{dest}'"
                )));
            }
        }
        self.purged.lock().unwrap().push(dest.to_string());

        // Drop the generation whose name matches the last path component.
        let name = dest
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        self.dirs.lock().unwrap().retain(|d| *d != name);
        Ok(())
    }

    fn copy(&self, local: &Path, dest: &str) -> Result<()> {
        self.copied
            .lock()
            .unwrap()
            .push((local.to_path_buf(), dest.to_string()));

        let name = dest
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        self.dirs.lock().unwrap().push(name);
        Ok(())
    }
}
