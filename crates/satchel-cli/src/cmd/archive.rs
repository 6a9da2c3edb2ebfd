use satchel_core::archive::{make_archives, ArchiveOptions, SegmentSummary};
use satchel_core::config::ProfileConfig;
use satchel_core::platform::usage;
use satchel_core::providers;
use satchel_core::stage::{stage_includes, IncludeList};
use satchel_core::util::format_bytes;

/// Stage the profile's includes and manifests into the source directory,
/// then cut it into archive segments under the segment directory.
pub(crate) fn run_archive(
    profile: &ProfileConfig,
) -> Result<Vec<SegmentSummary>, Box<dyn std::error::Error>> {
    let source_dir = profile.source_dir();
    let segment_dir = profile.segment_dir();

    // Fresh gather directory for this run.
    if source_dir.exists() {
        std::fs::remove_dir_all(&source_dir)?;
    }
    let include = IncludeList {
        files: profile.files.clone(),
        folders: profile.folders.clone(),
    };
    stage_includes(&include, &source_dir)?;

    for provider in providers::providers_for(profile) {
        eprintln!("==> Collecting {} manifest", provider.name());
        provider.collect(&source_dir)?;
    }

    let usage = usage::native()?;
    let opts = ArchiveOptions {
        absolute_paths: profile.absolute_paths,
        compress: profile.compress,
    };
    let segments = make_archives(
        &source_dir,
        profile.threshold_bytes()?,
        &segment_dir,
        opts,
        usage.as_ref(),
    )?;

    for segment in &segments {
        println!(
            "Wrote {} ({} members, content {}, output {})",
            segment.archive_path.display(),
            segment.members.len(),
            format_bytes(segment.content_size),
            format_bytes(segment.output_size),
        );
    }
    println!(
        "{} segment(s) staged in {}",
        segments.len(),
        segment_dir.display()
    );

    Ok(segments)
}
