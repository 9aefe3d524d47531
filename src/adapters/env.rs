//! Live credential store backed by the process environment.

use std::env;

use crate::ports::CredentialStore;

/// Reads secrets from process environment variables.
pub struct EnvCredentialStore;

impl CredentialStore for EnvCredentialStore {
    fn get(&self, var: &str) -> Option<String> {
        env::var(var).ok()
    }
}
