use satchel_core::config::ProfileConfig;

/// Full pipeline: archive, upload, clean up the staging directories.
pub(crate) fn run_pipeline(profile: &ProfileConfig) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("==> Staging and archiving");
    let segments = super::archive::run_archive(profile)?;

    eprintln!("==> Uploading");
    super::upload::run_upload(profile)?;

    // Staging directories are only removed after a successful upload, so a
    // failed run can be inspected and re-run.
    std::fs::remove_dir_all(profile.source_dir())?;
    std::fs::remove_dir_all(profile.segment_dir())?;

    println!("Backup complete: {} segment(s) uploaded", segments.len());
    Ok(())
}
