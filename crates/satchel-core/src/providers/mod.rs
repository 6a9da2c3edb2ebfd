mod brew;
mod conda;

use std::path::{Path, PathBuf};

pub use brew::BrewHistory;
pub use conda::CondaEnvs;

use crate::config::ProfileConfig;
use crate::error::Result;
use crate::stage::expand_tilde;

/// Something that writes a package-manager manifest into the staging
/// source directory. The core pipeline only iterates these; it knows
/// nothing about individual package managers.
pub trait ManifestProvider {
    fn name(&self) -> &'static str;

    /// Write this provider's manifest file(s) under `dest`.
    fn collect(&self, dest: &Path) -> Result<()>;
}

/// Build the providers enabled by a profile's settings.
pub fn providers_for(profile: &ProfileConfig) -> Vec<Box<dyn ManifestProvider>> {
    let mut providers: Vec<Box<dyn ManifestProvider>> = Vec::new();

    if let Some(history) = &profile.brew_history {
        providers.push(Box::new(BrewHistory::new(PathBuf::from(expand_tilde(
            history,
        )))));
    }
    if let Some(exe) = &profile.conda_exe {
        providers.push(Box::new(CondaEnvs::new(PathBuf::from(expand_tilde(exe)))));
    }

    providers
}
