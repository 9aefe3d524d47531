//! Commit collaborator port for persisting marked posts.

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::future::Future;
use std::pin::Pin;

/// Boxed future type alias used by [`CommitClient`] to keep the trait
/// dyn-compatible.
pub type CommitFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// Commits updated post documents back to the source repository.
pub trait CommitClient: Send + Sync {
    /// Creates one commit containing every given file and returns the new
    /// commit identifier. `silos` names the platforms involved, for the
    /// commit message.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit is rejected; callers surface it
    /// without retrying.
    fn commit_posts(
        &self,
        files: &BTreeMap<String, String>,
        silos: &BTreeSet<String>,
    ) -> CommitFuture<'_>;
}
