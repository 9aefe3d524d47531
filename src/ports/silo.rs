//! Silo adapter port: the per-platform syndication entrypoint.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use crate::post::Post;
use crate::results::SyndicationResult;

/// Boxed future type alias used by [`SiloAdapter`] to keep the trait
/// dyn-compatible.
pub type SyndicateFuture<'a> = Pin<
    Box<dyn Future<Output = Result<SyndicationResult, Box<dyn Error + Send + Sync>>> + Send + 'a>,
>;

/// Publishes posts to one third-party platform.
///
/// Implementations classify each post as `added` or `modified` from the
/// post's current `<silo>_syndicate_id` state, isolate per-post remote
/// failures (an absent id, not an error), and reserve errors for
/// unrecoverable preconditions such as a missing credential or title.
pub trait SiloAdapter: Send + Sync {
    /// The silo's canonical name, used as the registry key.
    fn name(&self) -> &'static str;

    /// Creates or updates remote articles for the given posts.
    ///
    /// # Errors
    ///
    /// Returns an error only for input-validation failures; ordinary
    /// remote failures surface as absent ids inside the result buckets.
    fn syndicate(&self, posts: &[Post], api_key: &str) -> SyndicateFuture<'_>;
}
