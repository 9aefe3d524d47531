//! The marking engine: writing silo-assigned ids back into posts.
//!
//! Given accumulated results, computes the minimal per-post metadata delta
//! (new identifier keys only, never overwriting existing ones) and hands
//! re-serialized posts to the commit collaborator. Re-running marking
//! against already-marked posts is a no-op, which is what makes the whole
//! pipeline safe to repeat.

use std::collections::{BTreeMap, BTreeSet};

use crate::actions;
use crate::post::Post;
use crate::ports::CommitClient;
use crate::results::{RunResults, SiloId};

/// Per-path delta: the silo ids each post must gain, keyed by silo name.
pub type MarkingDelta = BTreeMap<String, BTreeMap<String, SiloId>>;

/// Computes the delta for the given results against the posts' current
/// metadata.
///
/// Only the `added` buckets matter: modified posts already carry an id, by
/// definition. Pairs whose id is absent (failed creates) are skipped, as
/// are pairs whose target post already has an id for that silo. Paths with
/// no surviving pairs are omitted entirely.
///
/// # Errors
///
/// Returns an error if a post's metadata cannot be read.
pub fn delta(
    results: &RunResults,
    posts_by_path: &BTreeMap<String, Post>,
) -> Result<MarkingDelta, String> {
    // Pivot silo -> path -> id into path -> silo -> id.
    let mut ids_by_path: MarkingDelta = BTreeMap::new();
    for (silo, result) in results {
        let Some(result) = result else { continue };
        for (path, id) in &result.added {
            let Some(id) = id else { continue };
            ids_by_path.entry(path.clone()).or_default().insert(silo.clone(), id.clone());
        }
    }

    let mut delta = MarkingDelta::new();
    for (path, ids) in ids_by_path {
        let Some(post) = posts_by_path.get(&path) else {
            actions::warn(format!(
                "Cannot mark '{path}': it is not among this run's posts."
            ));
            continue;
        };
        let mut fresh = BTreeMap::new();
        for (silo, id) in ids {
            // Once written, an id is permanent; a re-run must never
            // clobber it.
            if post.silo_id(&silo)?.is_some() {
                continue;
            }
            fresh.insert(silo, id);
        }
        if !fresh.is_empty() {
            delta.insert(path, fresh);
        }
    }
    Ok(delta)
}

/// Marks syndicated posts by committing their new ids to the repository.
///
/// Returns the new commit id, or `None` when there was nothing to mark (no
/// empty commits). A commit failure surfaces as an error; nothing is
/// rolled back or retried, because the next run recomputes the same delta.
///
/// # Errors
///
/// Returns an error if the delta cannot be computed, a post cannot be
/// re-serialized, or the commit is rejected.
pub async fn mark_syndicated(
    commits: &dyn CommitClient,
    results: &RunResults,
    posts_by_path: &BTreeMap<String, Post>,
) -> Result<Option<String>, String> {
    let delta = delta(results, posts_by_path)?;
    if delta.is_empty() {
        actions::log("Nothing new to mark as syndicated.");
        return Ok(None);
    }

    let mut files = BTreeMap::new();
    let mut silos = BTreeSet::new();
    for (path, ids) in &delta {
        // Paths in the delta came from posts_by_path, so the lookup holds.
        let Some(post) = posts_by_path.get(path) else { continue };
        silos.extend(ids.keys().cloned());
        let marked = post.with_silo_ids(ids.iter().map(|(silo, id)| (silo.as_str(), id)));
        files.insert(path.clone(), marked.document()?);
    }

    actions::log(format!("Marking {} post(s) as syndicated: {silos:?}", files.len()));
    let commit = commits
        .commit_posts(&files, &silos)
        .await
        .map_err(|e| format!("Failed to commit syndicate ids: {e}"))?;
    actions::log(format!("Marked. New commit: {commit}"));
    Ok(Some(commit))
}
