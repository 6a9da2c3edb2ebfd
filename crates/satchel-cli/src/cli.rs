use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "satchel",
    version,
    about = "Personal machine-configuration backups via tar and rclone",
    after_help = "\
Configuration file lookup order:
  1. --config <path>             (explicit flag)
  2. $SATCHEL_CONFIG             (environment variable)
  3. ./satchel.yaml              (project)
  4. ~/.config/satchel/config.yaml (user)
  5. /etc/satchel/config.yaml    (system)

With no subcommand, the full pipeline runs: stage includes, collect
package-manager manifests, build archive segments, prune old remote
generations, upload."
)]
pub(crate) struct Cli {
    /// Path to configuration file (overrides SATCHEL_CONFIG and default search)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Profile to run (default: the profile matching this machine's hostname)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Full pipeline: stage, archive, prune old generations, upload
    Run,

    /// Stage includes and build archive segments only (no upload)
    Archive,

    /// Prune old generations and upload previously built segments
    Upload,

    /// Generate a starter configuration file
    Config {
        /// Where to write the file (prints to stdout when omitted)
        dest: Option<String>,
    },
}
