//! Silo adapter for <https://dev.to>.
//!
//! Articles are created as unpublished drafts by default. The full
//! document, front matter included, is sent as `body_markdown`; dev.to
//! parses the front matter itself, so a `published: true` key there
//! overrides the draft default. Updates send only `body_markdown` and
//! leave the remote publication state alone.
//!
//! Uses the DEV API: <https://developers.forem.com/api>. An API key can be
//! generated under account settings.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::actions;
use crate::post::Post;
use crate::ports::{SiloAdapter, SyndicateFuture};
use crate::results::{SiloId, SyndicationResult};

const API_ROOT: &str = "https://dev.to/api";

/// Syndicates posts to dev.to, updating the ones that already carry a
/// `dev_syndicate_id` and creating articles for the ones that don't.
pub struct DevAdapter {
    client: Client,
    base_url: String,
}

impl DevAdapter {
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

    /// Creates a new draft article and returns its assigned id, or `None`
    /// when dev.to rejects the request.
    async fn create(
        &self,
        post: &Post,
        api_key: &str,
    ) -> Result<Option<SiloId>, Box<dyn std::error::Error + Send + Sync>> {
        if post.title().is_none() {
            return Err(format!("article '{}' is missing a title", post.path).into());
        }
        let body = ArticleRequest {
            article: Article { published: Some(false), body_markdown: &post.document()? },
        };
        let response = self
            .client
            .post(format!("{}/articles", self.base_url))
            .header("api-key", api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if status != StatusCode::CREATED {
            actions::error(format!("Failed to create draft for '{}': {text}", post.path));
            return Ok(None);
        }
        let article: ArticleResponse = serde_json::from_str(&text)
            .map_err(|e| format!("Unexpected response creating '{}': {e}", post.path))?;
        actions::log(format!("Created '{}' as {} ({})", post.path, article.id, article.url));
        Ok(Some(article.id))
    }

    /// Updates the article previously created for this post and returns its
    /// id, or `None` when dev.to rejects the request.
    async fn update(
        &self,
        post: &Post,
        id: &SiloId,
        api_key: &str,
    ) -> Result<Option<SiloId>, Box<dyn std::error::Error + Send + Sync>> {
        // No `published` key here: an article published on dev.to after the
        // first syndication must not be flipped back to draft by an update.
        let body = ArticleRequest {
            article: Article { published: None, body_markdown: &post.document()? },
        };
        let response = self
            .client
            .put(format!("{}/articles/{id}", self.base_url))
            .header("api-key", api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if status != StatusCode::OK {
            actions::error(format!("Failed to update post '{}': {text}", post.path));
            return Ok(None);
        }
        let article: ArticleResponse = serde_json::from_str(&text)
            .map_err(|e| format!("Unexpected response updating '{}': {e}", post.path))?;
        actions::log(format!("Updated '{}' as {} ({})", post.path, article.id, article.url));
        Ok(Some(article.id))
    }
}

impl SiloAdapter for DevAdapter {
    fn name(&self) -> &'static str {
        "dev"
    }

    fn syndicate(&self, posts: &[Post], api_key: &str) -> SyndicateFuture<'_> {
        let posts = posts.to_vec();
        let api_key = api_key.to_string();
        Box::pin(async move {
            if api_key.is_empty() {
                return Err("missing API key".into());
            }
            actions::log("Hello? Yes, this is dev.");
            let mut result = SyndicationResult::default();
            for post in &posts {
                // Classification reads the post's current metadata, never
                // state mutated mid-run.
                match post.silo_id(self.name())? {
                    Some(id) => {
                        let updated = self.update(post, &id, &api_key).await?;
                        result.modified.insert(post.path.clone(), updated);
                    }
                    None => {
                        let created = self.create(post, &api_key).await?;
                        result.added.insert(post.path.clone(), created);
                    }
                }
            }
            Ok(result)
        })
    }
}

/// Request body for the create/update article endpoints.
#[derive(Serialize)]
struct ArticleRequest<'a> {
    article: Article<'a>,
}

/// The article payload inside an [`ArticleRequest`]. Creates pin the draft
/// default with `published: false`; updates omit the key entirely.
#[derive(Serialize)]
struct Article<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    published: Option<bool>,
    body_markdown: &'a str,
}

/// The subset of the article response the adapter cares about.
#[derive(Deserialize)]
struct ArticleResponse {
    id: SiloId,
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_an_empty_api_key() {
        let adapter = DevAdapter::new(Client::new());
        let post = Post::parse("posts/hello.md", "---\ntitle: Hello\n---\nHi.\n").unwrap();
        let result = adapter.syndicate(&[post], "").await;
        assert!(result.unwrap_err().to_string().contains("missing API key"));
    }

    #[test]
    fn article_request_serializes_like_the_api_expects() {
        let body = ArticleRequest {
            article: Article { published: Some(false), body_markdown: "# Hi" },
        };
        let encoded = serde_json::to_value(&body).unwrap();
        assert_eq!(encoded["article"]["published"], false);
        assert_eq!(encoded["article"]["body_markdown"], "# Hi");
    }

    #[test]
    fn update_payload_omits_the_published_key() {
        let body = ArticleRequest {
            article: Article { published: None, body_markdown: "# Hi" },
        };
        let encoded = serde_json::to_value(&body).unwrap();
        assert!(encoded["article"].get("published").is_none());
        assert_eq!(encoded["article"]["body_markdown"], "# Hi");
    }

    #[test]
    fn article_response_accepts_numeric_ids() {
        let decoded: ArticleResponse =
            serde_json::from_str("{\"id\": 42, \"url\": \"https://dev.to/a/42\"}").unwrap();
        assert_eq!(decoded.id, SiloId::Int(42));
        assert_eq!(decoded.url, "https://dev.to/a/42");
    }
}
