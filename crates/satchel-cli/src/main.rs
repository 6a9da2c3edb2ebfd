mod cli;
mod cmd;
mod config_gen;

use clap::Parser;

use satchel_core::config;
use satchel_core::platform;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Handle `config` subcommand early — no config file needed
    if let Some(Commands::Config { dest }) = &cli.command {
        if let Err(e) = config_gen::run_config_generate(dest.as_deref()) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        return;
    }

    // Resolve config file
    let source = match config::resolve_config_path(cli.config.as_deref()) {
        Some(s) => s,
        None => {
            eprintln!("Error: no configuration file found.");
            eprintln!("Searched:");
            for (path, level) in config::default_config_search_paths() {
                eprintln!("  {} ({})", path.display(), level);
            }
            eprintln!();
            eprintln!("Run `satchel config` to generate a starter config file.");
            std::process::exit(1);
        }
    };

    tracing::info!("Using config: {source}");

    let loaded = match config::load_config(source.path()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let hostname = platform::hostname();
    let profile = match config::select_profile(&loaded.profiles, cli.profile.as_deref(), &hostname)
    {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Available profiles:");
            for p in &loaded.profiles {
                let host = p.hostname.as_deref().unwrap_or("-");
                eprintln!("  {:12} {host}", p.name);
            }
            std::process::exit(1);
        }
    };

    let result = match &cli.command {
        Some(Commands::Archive) => cmd::archive::run_archive(profile).map(|_| ()),
        Some(Commands::Upload) => cmd::upload::run_upload(profile).map(|_| ()),
        Some(Commands::Run) | None => cmd::run::run_pipeline(profile),
        Some(Commands::Config { .. }) => unreachable!("handled above"),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
