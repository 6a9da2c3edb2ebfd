use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::error::{Result, SatchelError};
use crate::platform::shell;
use crate::platform::usage::DiskUsage;
use crate::util::format_bytes;

/// File suffixes a previous run may legitimately have left in the staging
/// directory: manifests plus compressed or uncompressed archives.
const ARTIFACT_SUFFIXES: &[&str] = &["txt", "tar", "gz"];

/// Platform junk that is safe to ignore during the staging check.
const JUNK_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveOptions {
    /// Store absolute member paths instead of paths relative to the source.
    pub absolute_paths: bool,
    /// Gzip-compress segments (.tar.gz instead of .tar).
    pub compress: bool,
}

/// One emitted archive segment.
#[derive(Debug, Clone)]
pub struct SegmentSummary {
    pub index: usize,
    pub members: Vec<String>,
    /// Accumulated on-disk size of the members, as measured by the probe.
    pub content_size: u64,
    /// Size of the written archive file.
    pub output_size: u64,
    pub archive_path: PathBuf,
}

/// Verify that `dir` holds nothing but artifacts a previous run could have
/// left behind. Fails with [`SatchelError::UnsafeDirectory`] on the first
/// unrecognized entry, before anything is deleted — this guards against an
/// unrelated directory being wiped because of a config typo.
///
/// An absent or empty directory passes.
pub fn check_staging_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type()?.is_file() {
            return Err(SatchelError::UnsafeDirectory(path));
        }

        let name = entry.file_name();
        if JUNK_FILES.iter().any(|junk| name == *junk) {
            continue;
        }

        let known_suffix = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ARTIFACT_SUFFIXES.contains(&ext));
        if !known_suffix {
            return Err(SatchelError::UnsafeDirectory(path));
        }
    }

    Ok(())
}

/// Delete everything under `dir` and recreate it empty.
fn reset_staging_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// A planned segment: member names and their accumulated content size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPlan {
    pub members: Vec<String>,
    pub content_size: u64,
}

/// Group children into segments, preserving input order.
///
/// Each child's size is added to an accumulator; once the accumulator
/// exceeds `threshold_bytes` the current member list becomes one segment.
/// A trailing partial segment is always emitted. A single child larger
/// than the threshold is never split, so one segment can exceed the
/// threshold by an arbitrary amount.
pub fn plan_segments(children: &[(String, u64)], threshold_bytes: u64) -> Vec<SegmentPlan> {
    let mut plans = Vec::new();
    let mut members: Vec<String> = Vec::new();
    let mut content_size = 0u64;

    for (name, size) in children {
        content_size += size;
        members.push(name.clone());

        if content_size > threshold_bytes {
            plans.push(SegmentPlan {
                members: std::mem::take(&mut members),
                content_size,
            });
            content_size = 0;
        }
    }

    if !members.is_empty() {
        plans.push(SegmentPlan {
            members,
            content_size,
        });
    }

    plans
}

/// Pack the immediate children of `source` into size-bounded tar segments
/// under `staging_dir`.
///
/// Children are taken in directory-listing order (whatever the filesystem
/// yields) and grouped by [`plan_segments`]. Each segment `<index>.tar[.gz]`
/// gets a sibling `<index>.txt` manifest listing its member names, one per
/// line. Indices are sequential from 0.
pub fn make_archives(
    source: &Path,
    threshold_bytes: u64,
    staging_dir: &Path,
    opts: ArchiveOptions,
    usage: &dyn DiskUsage,
) -> Result<Vec<SegmentSummary>> {
    if staging_dir.starts_with(source) {
        return Err(SatchelError::Config(format!(
            "staging directory '{}' must not live inside the source '{}'",
            staging_dir.display(),
            source.display()
        )));
    }

    check_staging_dir(staging_dir)?;
    reset_staging_dir(staging_dir)?;

    let mut children = Vec::new();
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let path = entry.path();
        let size = usage.usage(&path)?;
        let member = if opts.absolute_paths {
            path.to_string_lossy().into_owned()
        } else {
            entry.file_name().to_string_lossy().into_owned()
        };
        children.push((member, size));
    }

    let mut segments = Vec::new();
    for (index, plan) in plan_segments(&children, threshold_bytes).into_iter().enumerate() {
        segments.push(write_segment(
            source,
            staging_dir,
            opts,
            index,
            plan.members,
            plan.content_size,
        )?);
    }

    Ok(segments)
}

fn write_segment(
    source: &Path,
    staging_dir: &Path,
    opts: ArchiveOptions,
    index: usize,
    members: Vec<String>,
    content_size: u64,
) -> Result<SegmentSummary> {
    let archive_name = if opts.compress {
        format!("{index}.tar.gz")
    } else {
        format!("{index}.tar")
    };
    let archive_path = staging_dir.join(archive_name);

    let mut cmd = Command::new("tar");
    cmd.arg(if opts.compress { "-czf" } else { "-cf" });
    cmd.arg(&archive_path);
    if !opts.absolute_paths {
        cmd.arg("-C").arg(source);
    }
    cmd.args(&members);

    let output = shell::run_capture(&mut cmd)
        .map_err(|e| SatchelError::ArchiveCreation(format!("cannot run tar: {e}")))?;
    if !output.status.success() {
        return Err(SatchelError::ArchiveCreation(shell::describe_failure(
            "tar", &output,
        )));
    }

    std::fs::write(
        staging_dir.join(format!("{index}.txt")),
        members.join("\n"),
    )?;

    let output_size = std::fs::metadata(&archive_path)?.len();
    info!(
        "segment {index}: {} members, content {}, output {}",
        members.len(),
        format_bytes(content_size),
        format_bytes(output_size),
    );

    Ok(SegmentSummary {
        index,
        members,
        content_size,
        output_size,
        archive_path,
    })
}
