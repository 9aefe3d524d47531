//! Silo adapter for <https://medium.com>.
//!
//! The Medium API only supports creating posts, so this adapter cannot
//! synchronize changes to content that has already been syndicated; its
//! `modified` bucket is always empty. Drafts by default, with
//! `published: true` front matter switching to public.
//!
//! The required API key is a self-issued access token:
//! <https://github.com/Medium/medium-api-docs#22-self-issued-access-tokens>.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::actions;
use crate::post::Post;
use crate::ports::{SiloAdapter, SyndicateFuture};
use crate::results::{SiloId, SyndicationResult};

const API_ROOT: &str = "https://api.medium.com/v1";

/// Syndicates posts to Medium, creating articles for the posts that do not
/// yet carry a `medium_syndicate_id`.
pub struct MediumAdapter {
    client: Client,
    base_url: String,
}

impl MediumAdapter {
    /// Creates the adapter with a shared HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, API_ROOT)
    }

    /// Creates the adapter against a non-default API root.
    #[must_use]
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }

    /// Resolves the id of the token's author via `GET /v1/me`.
    async fn author_id(
        &self,
        api_key: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let response = self
            .client
            .get(format!("{}/me", self.base_url))
            .bearer_auth(api_key)
            .header("Content-Type", "application/json")
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if status != StatusCode::OK {
            return Err(format!("Failed to get user details: {text}").into());
        }
        let me: Envelope<Author> =
            serde_json::from_str(&text).map_err(|e| format!("Unexpected /me response: {e}"))?;
        Ok(me.data.id)
    }

    /// Creates a new Medium post and returns its assigned id, or `None`
    /// when Medium rejects the request.
    async fn create(
        &self,
        post: &Post,
        author_id: &str,
        api_key: &str,
    ) -> Result<Option<SiloId>, Box<dyn std::error::Error + Send + Sync>> {
        let Some(title) = post.title() else {
            return Err(format!("article '{}' is missing a title", post.path).into());
        };
        let body = PostRequest {
            title,
            publish_status: if post.published() { "public" } else { "draft" },
            canonical_url: post.canonical_url(),
            // Medium only uses the first three tags.
            tags: post.tags(),
            content: post.body(),
            content_format: "markdown",
        };
        let url = format!("{}/users/{author_id}/posts", self.base_url);
        let response = self.client.post(url).bearer_auth(api_key).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if status != StatusCode::CREATED {
            actions::error(format!("Failed to create draft for '{}': {text}", post.path));
            return Ok(None);
        }
        let created: Envelope<CreatedPost> = serde_json::from_str(&text)
            .map_err(|e| format!("Unexpected response creating '{}': {e}", post.path))?;
        actions::log(format!(
            "Created '{}' as {} ({})",
            post.path, created.data.id, created.data.url
        ));
        Ok(Some(created.data.id))
    }
}

impl SiloAdapter for MediumAdapter {
    fn name(&self) -> &'static str {
        "medium"
    }

    fn syndicate(&self, posts: &[Post], api_key: &str) -> SyndicateFuture<'_> {
        let posts = posts.to_vec();
        let api_key = api_key.to_string();
        Box::pin(async move {
            if posts.is_empty() {
                return Err("missing posts".into());
            }
            if api_key.is_empty() {
                return Err("missing API key".into());
            }
            actions::log("Hello? Yes, this is Medium.");
            let author_id = self.author_id(&api_key).await?;
            let mut result = SyndicationResult::default();
            for post in &posts {
                if post.silo_id(self.name())?.is_none() {
                    let created = self.create(post, &author_id, &api_key).await?;
                    result.added.insert(post.path.clone(), created);
                }
                // No update endpoint exists, so posts that already carry an
                // id are left alone.
            }
            Ok(result)
        })
    }
}

/// Medium wraps every response in a `data` envelope.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// The authenticated author, from `GET /v1/me`.
#[derive(Deserialize)]
struct Author {
    id: String,
}

/// Request body for creating a post.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostRequest<'a> {
    title: &'a str,
    publish_status: &'a str,
    canonical_url: Option<&'a str>,
    tags: Vec<String>,
    content: &'a str,
    content_format: &'a str,
}

/// The subset of the created-post response the adapter cares about.
#[derive(Deserialize)]
struct CreatedPost {
    id: SiloId,
    url: String,
}
