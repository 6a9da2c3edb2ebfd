use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::error::{Result, SatchelError};
use crate::remote::RemoteStore;

/// Outcome of one retention run.
#[derive(Debug, Clone)]
pub struct RetentionStats {
    /// Generations deleted, oldest first.
    pub deleted: Vec<i64>,
    /// Pre-existing generations that survived pruning.
    pub kept: Vec<i64>,
    /// Name of the generation created by the upload.
    pub uploaded: i64,
}

/// Select the generations to delete: everything but the newest
/// `number_to_keep - 1`, so that after the subsequent upload at most
/// `number_to_keep` generations exist. Returns oldest first.
pub fn plan_deletions(mut generations: Vec<i64>, number_to_keep: usize) -> Vec<i64> {
    let survivors = number_to_keep.saturating_sub(1);
    if generations.len() <= survivors {
        return Vec::new();
    }
    generations.sort_unstable();
    generations.truncate(generations.len() - survivors);
    generations
}

/// Prune old remote generations, then upload `staging_dir` as a new
/// generation named by the current Unix timestamp.
pub fn update_archives(
    remote: &dyn RemoteStore,
    staging_dir: &Path,
    base_destination: &str,
    number_to_keep: usize,
) -> Result<RetentionStats> {
    update_archives_at(
        remote,
        staging_dir,
        base_destination,
        number_to_keep,
        Utc::now().timestamp(),
    )
}

/// Like [`update_archives`], with the upload timestamp passed in. Two runs
/// within the same second name the same generation; what the destination
/// tool does with the collision is its own business.
pub fn update_archives_at(
    remote: &dyn RemoteStore,
    staging_dir: &Path,
    base_destination: &str,
    number_to_keep: usize,
    now: i64,
) -> Result<RetentionStats> {
    if !base_destination.ends_with('/') {
        return Err(SatchelError::Config(format!(
            "destination '{base_destination}' must end with a slash"
        )));
    }

    let names = remote.list_dirs(base_destination)?;
    let mut generations = Vec::with_capacity(names.len());
    for name in &names {
        let parsed: i64 = name.parse().map_err(|_| {
            SatchelError::CorruptRetentionState(format!(
                "generation '{name}' under '{base_destination}' is not an integer timestamp"
            ))
        })?;
        generations.push(parsed);
    }

    // Prune strictly before upload, so the new generation never counts
    // toward the pre-upload retained set.
    let doomed = plan_deletions(generations.clone(), number_to_keep);
    for generation in &doomed {
        info!("deleting generation {generation} from {base_destination}");
        remote.purge(&format!("{base_destination}{generation}/"))?;
    }

    let target = format!("{base_destination}{now}/");
    info!("uploading staging directory to {target}");
    remote.copy(staging_dir, &target)?;

    let kept = generations
        .into_iter()
        .filter(|g| !doomed.contains(g))
        .collect();

    Ok(RetentionStats {
        deleted: doomed,
        kept,
        uploaded: now,
    })
}
