//! Live adapter implementations of the port traits.

pub mod env;
pub mod github;
pub mod job_file;

pub use env::EnvCredentialStore;
pub use github::{GitHubCommitClient, GitHubPostSource};
pub use job_file::FileJobStore;
