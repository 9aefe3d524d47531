//! Credential store port for per-silo secrets.

/// Provides read access to named secrets.
///
/// Abstracting the process environment lets tests inject credentials
/// without mutating shared global state.
pub trait CredentialStore: Send + Sync {
    /// Returns the secret stored under `var`, if set.
    fn get(&self, var: &str) -> Option<String>;
}
