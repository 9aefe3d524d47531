//! Post source port for changed-file retrieval.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use crate::post::Post;

/// Boxed future type alias used by [`PostSource`] to keep the trait
/// dyn-compatible.
pub type PostsFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<Post>, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// Retrieves the posts added or modified by the triggering commit.
pub trait PostSource: Send + Sync {
    /// Returns the changed posts with their raw contents, already parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the triggering commit cannot be read at all;
    /// that failure is fatal to the whole run.
    fn changed_posts(&self) -> PostsFuture<'_>;
}
