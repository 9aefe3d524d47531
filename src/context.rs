//! Service context bundling all port trait objects.

use reqwest::Client;

use crate::adapters::{EnvCredentialStore, FileJobStore, GitHubCommitClient, GitHubPostSource};
use crate::ports::{CommitClient, CredentialStore, JobStore, PostSource};
use crate::silos::SiloRegistry;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. The live
/// constructor wires up the real adapters; tests build the struct directly
/// with fakes.
pub struct ServiceContext {
    /// Per-silo secrets.
    pub credentials: Box<dyn CredentialStore>,
    /// Changed-post retrieval from the triggering commit.
    pub posts: Box<dyn PostSource>,
    /// Cross-step accumulated-results persistence.
    pub job: Box<dyn JobStore>,
    /// The commit collaborator for marking.
    pub commits: Box<dyn CommitClient>,
    /// The table of known silo adapters.
    pub registry: SiloRegistry,
}

impl ServiceContext {
    /// Creates a live context for a real pipeline run.
    ///
    /// # Errors
    ///
    /// Returns an error when the Actions environment is incomplete.
    pub fn live() -> Result<Self, String> {
        let client = Client::new();
        Ok(Self {
            credentials: Box::new(EnvCredentialStore),
            posts: Box::new(GitHubPostSource::from_env(client.clone())?),
            job: Box::new(FileJobStore::for_current_job()),
            commits: Box::new(GitHubCommitClient::from_env(client)?),
            registry: SiloRegistry::builtin(),
        })
    }
}
