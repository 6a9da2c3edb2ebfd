use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SatchelError};
use crate::util::parse_size;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatchelConfig {
    #[serde(default)]
    pub profiles: Vec<ProfileConfig>,
}

/// One machine profile: what to gather, where to send it, and how to cut it
/// into segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    /// Hostname this profile applies to. Used when no --profile is given.
    pub hostname: Option<String>,
    /// Individual files to include (tilde-expandable).
    #[serde(default)]
    pub files: Vec<String>,
    /// Folder trees to include (tilde-expandable, copied under their base name).
    #[serde(default)]
    pub folders: Vec<String>,
    /// rclone destination for generations, e.g. "onedrive:backup/mac/configs/".
    /// Must end with a slash.
    pub destination: String,
    /// Where gathered files are staged before archiving. Defaults to a
    /// per-profile directory under the user cache dir.
    pub source_dir: Option<String>,
    /// Where archive segments are written before upload. Defaults to a
    /// per-profile directory under the user cache dir.
    pub segment_dir: Option<String>,
    /// Flush a segment once accumulated content exceeds this size.
    #[serde(default = "default_size_threshold")]
    pub size_threshold: String,
    /// Maximum number of remote generations after a run.
    #[serde(default = "default_keep")]
    pub keep: usize,
    /// Gzip-compress segments (.tar.gz instead of .tar).
    #[serde(default)]
    pub compress: bool,
    /// Store absolute member paths in the archives.
    #[serde(default)]
    pub absolute_paths: bool,
    /// Shell history file to scan for brew invocations (tilde-expandable).
    pub brew_history: Option<String>,
    /// Conda/mamba executable used to export environment manifests.
    pub conda_exe: Option<String>,
}

fn default_size_threshold() -> String {
    "1G".to_string()
}

fn default_keep() -> usize {
    10
}

impl ProfileConfig {
    pub fn threshold_bytes(&self) -> Result<u64> {
        parse_size(&self.size_threshold)
    }

    pub fn source_dir(&self) -> PathBuf {
        match &self.source_dir {
            Some(dir) => PathBuf::from(crate::stage::expand_tilde(dir)),
            None => profile_cache_dir(&self.name).join("source"),
        }
    }

    pub fn segment_dir(&self) -> PathBuf {
        match &self.segment_dir {
            Some(dir) => PathBuf::from(crate::stage::expand_tilde(dir)),
            None => profile_cache_dir(&self.name).join("segments"),
        }
    }
}

fn profile_cache_dir(profile: &str) -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("satchel")
        .join(profile)
}

/// Pick the profile to run.
///
/// An explicit name wins; otherwise the first profile whose `hostname`
/// matches the machine hostname is used.
pub fn select_profile<'a>(
    profiles: &'a [ProfileConfig],
    explicit: Option<&str>,
    hostname: &str,
) -> Result<&'a ProfileConfig> {
    if let Some(name) = explicit {
        return profiles.iter().find(|p| p.name == name).ok_or_else(|| {
            SatchelError::Config(format!("no profile named '{name}' in the config file"))
        });
    }

    profiles
        .iter()
        .find(|p| p.hostname.as_deref() == Some(hostname))
        .ok_or_else(|| {
            SatchelError::Config(format!(
                "no profile matches hostname '{hostname}'; pass --profile or add a hostname key"
            ))
        })
}

// --- Config resolution ---

/// Tracks where the config file was found.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Explicitly passed via `--config`.
    CliArg(PathBuf),
    /// Set via the `SATCHEL_CONFIG` env var.
    EnvVar(PathBuf),
    /// Found by searching standard locations.
    SearchOrder { path: PathBuf, level: &'static str },
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::CliArg(p) => p,
            ConfigSource::EnvVar(p) => p,
            ConfigSource::SearchOrder { path, .. } => path,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::CliArg(p) => write!(f, "{} (--config)", p.display()),
            ConfigSource::EnvVar(p) => write!(f, "{} (SATCHEL_CONFIG)", p.display()),
            ConfigSource::SearchOrder { path, level } => {
                write!(f, "{} ({})", path.display(), level)
            }
        }
    }
}

/// Returns search locations in priority order: project, user, system.
pub fn default_config_search_paths() -> Vec<(PathBuf, &'static str)> {
    let mut paths = vec![(PathBuf::from("satchel.yaml"), "project")];

    // User config: $XDG_CONFIG_HOME/satchel/config.yaml or ~/.config/satchel/config.yaml
    let user_config = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|base| base.join("satchel").join("config.yaml"));

    if let Some(p) = user_config {
        paths.push((p, "user"));
    }

    // System config
    paths.push((PathBuf::from("/etc/satchel/config.yaml"), "system"));

    paths
}

/// Resolve which config file to use.
///
/// Priority: CLI arg > `SATCHEL_CONFIG` env var > first existing file from
/// the search paths. Returns `None` if nothing is found.
pub fn resolve_config_path(cli_config: Option<&str>) -> Option<ConfigSource> {
    // 1. Explicit --config
    if let Some(path) = cli_config {
        return Some(ConfigSource::CliArg(PathBuf::from(path)));
    }

    // 2. SATCHEL_CONFIG env var
    if let Ok(val) = std::env::var("SATCHEL_CONFIG") {
        if !val.is_empty() {
            return Some(ConfigSource::EnvVar(PathBuf::from(val)));
        }
    }

    // 3. Search standard locations
    for (path, level) in default_config_search_paths() {
        if path.exists() {
            return Some(ConfigSource::SearchOrder { path, level });
        }
    }

    None
}

/// Load and parse a config file.
pub fn load_config(path: &Path) -> Result<SatchelConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| SatchelError::Config(format!("cannot read '{}': {e}", path.display())))?;
    let config: SatchelConfig = serde_yaml::from_str(&contents)
        .map_err(|e| SatchelError::Config(format!("invalid config '{}': {e}", path.display())))?;
    Ok(config)
}

/// Returns a minimal YAML config template suitable for bootstrapping.
pub fn minimal_config_template() -> &'static str {
    r#"# satchel configuration file
# One profile per machine; matched by hostname or selected with --profile.

profiles:
  - name: laptop
    hostname: my-laptop.local
    destination: "onedrive:backup/laptop/configs/"
    files:
      - ~/.zshrc
      - ~/.gitconfig
    folders:
      - ~/.ssh
    # size_threshold: 1G
    # keep: 10
    # compress: false
    # absolute_paths: false
    # brew_history: ~/.zsh_history
    # conda_exe: ~/miniforge3/condabin/mamba
"#
}
