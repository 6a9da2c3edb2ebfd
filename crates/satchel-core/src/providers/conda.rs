use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use tracing::debug;

use super::ManifestProvider;
use crate::error::{Result, SatchelError};
use crate::platform::shell;

/// Exports every conda/mamba environment as a from-history YAML manifest
/// under `conda_envs/`.
pub struct CondaEnvs {
    exe: PathBuf,
}

impl CondaEnvs {
    pub fn new(exe: PathBuf) -> Self {
        Self { exe }
    }
}

#[derive(Deserialize)]
struct EnvList {
    envs: Vec<String>,
}

impl ManifestProvider for CondaEnvs {
    fn name(&self) -> &'static str {
        "conda-envs"
    }

    fn collect(&self, dest: &Path) -> Result<()> {
        let out_dir = dest.join("conda_envs");
        std::fs::create_dir_all(&out_dir)?;

        let mut cmd = Command::new(&self.exe);
        cmd.args(["env", "list", "--json"]);
        let output = shell::run_capture(&mut cmd)?;
        if !output.status.success() {
            return Err(SatchelError::Io(std::io::Error::other(
                shell::describe_failure("conda env list", &output),
            )));
        }

        let list: EnvList = serde_json::from_slice(&output.stdout).map_err(|e| {
            SatchelError::Io(std::io::Error::other(format!(
                "unparsable env list from {}: {e}",
                self.exe.display()
            )))
        })?;

        for env_path in &list.envs {
            let Some(env_name) = Path::new(env_path).file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            debug!("exporting conda env {env_name}");

            let mut cmd = Command::new(&self.exe);
            cmd.args(["env", "export", "-n", env_name, "--from-history"]);
            let output = shell::run_capture(&mut cmd)?;
            if !output.status.success() {
                return Err(SatchelError::Io(std::io::Error::other(
                    shell::describe_failure("conda env export", &output),
                )));
            }

            std::fs::write(out_dir.join(format!("{env_name}.yaml")), &output.stdout)?;
        }

        Ok(())
    }
}
