use satchel_core::config::ProfileConfig;
use satchel_core::remote::Rclone;
use satchel_core::retention::{update_archives, RetentionStats};

/// Prune old remote generations, then upload the staged segments as a new
/// generation.
pub(crate) fn run_upload(
    profile: &ProfileConfig,
) -> Result<RetentionStats, Box<dyn std::error::Error>> {
    let segment_dir = profile.segment_dir();
    if !segment_dir.exists() {
        return Err(format!(
            "no staged segments at {}; run `satchel archive` first",
            segment_dir.display()
        )
        .into());
    }

    let remote = Rclone::new();
    let stats = update_archives(&remote, &segment_dir, &profile.destination, profile.keep)?;

    for generation in &stats.deleted {
        println!("Deleted generation {generation}");
    }
    println!(
        "Uploaded generation {} to {} ({} generation(s) now remote)",
        stats.uploaded,
        profile.destination,
        stats.kept.len() + 1,
    );

    Ok(stats)
}
