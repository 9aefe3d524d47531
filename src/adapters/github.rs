//! Live GitHub adapters: changed-post retrieval and the marking commit.
//!
//! Both read their coordinates from the standard Actions environment
//! (`GITHUB_REPOSITORY`, `GITHUB_SHA`, `GITHUB_REF`, `GITHUB_TOKEN`).

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::error::Error;

use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

use crate::actions;
use crate::post::Post;
use crate::ports::{CommitClient, CommitFuture, PostSource, PostsFuture};

const API_ROOT: &str = "https://api.github.com";

/// Reads an Actions environment variable or fails with its name.
fn required_env(var: &str) -> Result<String, String> {
    env::var(var).map_err(|_| format!("{var} is not set"))
}

fn authorized(builder: RequestBuilder, token: &str) -> RequestBuilder {
    builder
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(USER_AGENT, "syndicate")
        .header(ACCEPT, "application/vnd.github+json")
}

/// Fetches the posts touched by the triggering commit.
pub struct GitHubPostSource {
    client: Client,
    repo: String,
    sha: String,
    token: String,
    post_dir: String,
}

impl GitHubPostSource {
    /// Builds the source from the Actions environment.
    ///
    /// The post directory defaults to `pages/posts` and can be overridden
    /// with `SYNDICATE_POST_DIR`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing environment variable.
    pub fn from_env(client: Client) -> Result<Self, String> {
        Ok(Self {
            client,
            repo: required_env("GITHUB_REPOSITORY")?,
            sha: required_env("GITHUB_SHA")?,
            token: required_env("GITHUB_TOKEN")?,
            post_dir: env::var("SYNDICATE_POST_DIR").unwrap_or_else(|_| "pages/posts".to_string()),
        })
    }

    async fn fetch_raw(&self, path: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
        let url = format!("{API_ROOT}/repos/{}/contents/{path}?ref={}", self.repo, self.sha);
        let response = authorized(self.client.get(url), &self.token)
            .header(ACCEPT, "application/vnd.github.raw+json")
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if status != StatusCode::OK {
            return Err(format!("Failed to fetch contents of {path}: {text}").into());
        }
        Ok(text)
    }
}

/// One changed file in a commit, per the commits API.
#[derive(Deserialize)]
struct CommitFile {
    filename: String,
    status: String,
}

/// The subset of the commit response listing its files.
#[derive(Deserialize)]
struct Commit {
    #[serde(default)]
    files: Vec<CommitFile>,
}

impl PostSource for GitHubPostSource {
    fn changed_posts(&self) -> PostsFuture<'_> {
        Box::pin(async move {
            let url = format!("{API_ROOT}/repos/{}/commits/{}", self.repo, self.sha);
            let response = authorized(self.client.get(url), &self.token).send().await?;
            let status = response.status();
            let text = response.text().await?;
            if status != StatusCode::OK {
                return Err(
                    format!("Failed to read triggering commit {}: {text}", self.sha).into()
                );
            }
            let commit: Commit = serde_json::from_str(&text)
                .map_err(|e| format!("Unexpected commit response: {e}"))?;

            let mut posts = Vec::new();
            for file in commit.files {
                let changed = matches!(file.status.as_str(), "added" | "created" | "modified");
                if !changed || !file.filename.starts_with(&self.post_dir) {
                    continue;
                }
                actions::debug(format!("Fetching changed post {}", file.filename));
                let raw = self.fetch_raw(&file.filename).await?;
                posts.push(Post::parse(&file.filename, &raw)?);
            }
            Ok(posts)
        })
    }
}

/// Commits marked posts back to the triggering branch via the git data API.
pub struct GitHubCommitClient {
    client: Client,
    repo: String,
    token: String,
    /// Branch ref without the `refs/` prefix, e.g. `heads/main`.
    branch: String,
}

#[derive(Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Deserialize)]
struct GitRef {
    object: RefObject,
}

#[derive(Deserialize)]
struct TreePointer {
    sha: String,
}

#[derive(Deserialize)]
struct CommitDetail {
    tree: TreePointer,
}

#[derive(Serialize)]
struct NewBlob<'a> {
    content: &'a str,
    encoding: &'a str,
}

#[derive(Serialize)]
struct TreeEntry<'a> {
    path: &'a str,
    mode: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    sha: String,
}

#[derive(Serialize)]
struct NewTree<'a> {
    base_tree: &'a str,
    tree: Vec<TreeEntry<'a>>,
}

#[derive(Serialize)]
struct NewCommit<'a> {
    message: &'a str,
    tree: &'a str,
    parents: Vec<&'a str>,
}

#[derive(Serialize)]
struct RefUpdate<'a> {
    sha: &'a str,
}

#[derive(Deserialize)]
struct Created {
    sha: String,
}

impl GitHubCommitClient {
    /// Builds the client from the Actions environment.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing environment variable.
    pub fn from_env(client: Client) -> Result<Self, String> {
        let git_ref = required_env("GITHUB_REF")?;
        let branch = git_ref.strip_prefix("refs/").unwrap_or(&git_ref).to_string();
        Ok(Self {
            client,
            repo: required_env("GITHUB_REPOSITORY")?,
            token: required_env("GITHUB_TOKEN")?,
            branch,
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, Box<dyn Error + Send + Sync>> {
        let url = format!("{API_ROOT}/repos/{}/{path}", self.repo);
        let response = authorized(self.client.get(url), &self.token).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if status != StatusCode::OK {
            return Err(format!("GitHub GET {path} failed: {text}").into());
        }
        serde_json::from_str(&text).map_err(|e| format!("GitHub GET {path}: {e}").into())
    }

    async fn post<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Box<dyn Error + Send + Sync>> {
        let url = format!("{API_ROOT}/repos/{}/{path}", self.repo);
        let response = authorized(self.client.post(url), &self.token).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if status != StatusCode::CREATED && status != StatusCode::OK {
            return Err(format!("GitHub POST {path} failed: {text}").into());
        }
        serde_json::from_str(&text).map_err(|e| format!("GitHub POST {path}: {e}").into())
    }

    async fn update_ref(&self, sha: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let url = format!("{API_ROOT}/repos/{}/git/refs/{}", self.repo, self.branch);
        let response = authorized(self.client.patch(url), &self.token)
            .json(&RefUpdate { sha })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(format!("GitHub ref update failed: {text}").into());
        }
        Ok(())
    }
}

impl CommitClient for GitHubCommitClient {
    fn commit_posts(
        &self,
        files: &BTreeMap<String, String>,
        silos: &BTreeSet<String>,
    ) -> CommitFuture<'_> {
        let files = files.clone();
        let message = commit_message(silos);
        Box::pin(async move {
            let head: GitRef = self.get(&format!("git/ref/{}", self.branch)).await?;
            let parent = head.object.sha;
            let base: CommitDetail = self.get(&format!("git/commits/{parent}")).await?;

            let mut entries = Vec::new();
            for (path, content) in &files {
                let blob: Created = self
                    .post("git/blobs", &NewBlob { content: content.as_str(), encoding: "utf-8" })
                    .await?;
                entries.push(TreeEntry {
                    path: path.as_str(),
                    mode: "100644",
                    kind: "blob",
                    sha: blob.sha,
                });
            }
            let tree: Created = self
                .post("git/trees", &NewTree { base_tree: &base.tree.sha, tree: entries })
                .await?;
            let commit: Created = self
                .post(
                    "git/commits",
                    &NewCommit {
                        message: &message,
                        tree: &tree.sha,
                        parents: vec![parent.as_str()],
                    },
                )
                .await?;
            self.update_ref(&commit.sha).await?;
            Ok(commit.sha)
        })
    }
}

/// Builds the marking commit message from the silo names involved.
fn commit_message(silos: &BTreeSet<String>) -> String {
    let names: Vec<&str> = silos.iter().map(String::as_str).collect();
    format!("(syndicate): mark syndicated posts\n\nSilos: {}", names.join(", "))
}
