//! `syndicate run` — the single pipeline-step entrypoint.
//!
//! One pass: fetch the changed posts, dispatch them to the requested
//! silos, fold the results into the job-level accumulation, and (when
//! asked) mark the posts by committing their new silo ids.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::actions;
use crate::context::ServiceContext;
use crate::dispatch;
use crate::marking;
use crate::post::Post;
use crate::results::merge_accumulated;

/// Execute the `run` command on a current-thread runtime.
///
/// # Errors
///
/// Returns an error string when the step fails; per-silo and per-post
/// failures are absorbed into the results instead.
pub fn run(ctx: &ServiceContext, silos: &[String], mark_as_syndicated: bool) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start the runtime: {e}"))?;
    runtime.block_on(run_step(ctx, silos, mark_as_syndicated))
}

/// The whole step, driven sequentially: every adapter call and every
/// commit call completes before the next one starts.
///
/// # Errors
///
/// Returns an error string when a whole-run precondition fails (posts
/// cannot be read, job results cannot be persisted, the marking commit is
/// rejected).
pub async fn run_step(
    ctx: &ServiceContext,
    silos: &[String],
    mark_as_syndicated: bool,
) -> Result<(), String> {
    let posts = ctx
        .posts
        .changed_posts()
        .await
        .map_err(|e| format!("Failed to read changed posts: {e}"))?;
    if posts.is_empty() {
        actions::log("No posts added or updated, nothing to see here.");
        actions::set_output("time", Utc::now());
        return Ok(());
    }

    let results = dispatch::syndicate(&ctx.registry, ctx.credentials.as_ref(), &posts, silos)
        .await?
        .unwrap_or_default();
    actions::set_output("time", Utc::now());
    let encoded = serde_json::to_string(&results)
        .map_err(|e| format!("Failed to serialize results: {e}"))?;
    actions::set_output("syndicated_posts", encoded);

    // Fold this step's results into the job-level accumulation so a later
    // step can mark everything in one commit.
    let previous = ctx.job.load().map_err(|e| format!("Failed to load job results: {e}"))?;
    let accumulated = merge_accumulated(previous, &results);
    ctx.job.save(&accumulated).map_err(|e| format!("Failed to save job results: {e}"))?;

    if mark_as_syndicated {
        // With an explicit silo list, mark only this step's results. With
        // none, mark the full accumulation, so workflows can defer marking
        // to one final step that commits for many syndication steps.
        let chosen = if silos.is_empty() { &accumulated } else { &results };
        let posts_by_path: BTreeMap<String, Post> =
            posts.into_iter().map(|post| (post.path.clone(), post)).collect();
        if let Some(commit) =
            marking::mark_syndicated(ctx.commits.as_ref(), chosen, &posts_by_path).await?
        {
            actions::set_output("commit", commit);
        }
    }
    Ok(())
}
