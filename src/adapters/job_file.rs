//! Live job store backed by a JSON file scoped to one pipeline job.
//!
//! Sequential steps within a job share a runner workspace, so a file under
//! the runner's temp directory survives from one step process to the next
//! but not across jobs.

use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};

use crate::ports::JobStore;
use crate::results::RunResults;

/// JSON-file persistence for accumulated syndication results.
pub struct FileJobStore {
    path: PathBuf,
}

impl FileJobStore {
    /// Creates a store reading and writing the given file.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf() }
    }

    /// Creates the store for the current pipeline job: a file named after
    /// `GITHUB_JOB` under `RUNNER_TEMP` (or the system temp directory).
    #[must_use]
    pub fn for_current_job() -> Self {
        let dir = env::var("RUNNER_TEMP").map_or_else(|_| env::temp_dir(), PathBuf::from);
        let job = env::var("GITHUB_JOB").unwrap_or_else(|_| "local".to_string());
        Self { path: dir.join(format!("syndicate-results-{job}.json")) }
    }
}

impl JobStore for FileJobStore {
    fn load(&self) -> Result<RunResults, Box<dyn Error + Send + Sync>> {
        if !self.path.exists() {
            return Ok(RunResults::new());
        }
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read job results {}: {e}", self.path.display()))?;
        let results = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse job results {}: {e}", self.path.display()))?;
        Ok(results)
    }

    fn save(&self, results: &RunResults) -> Result<(), Box<dyn Error + Send + Sync>> {
        let text = serde_json::to_string(results)
            .map_err(|e| format!("Failed to serialize job results: {e}"))?;
        std::fs::write(&self.path, text)
            .map_err(|e| format!("Failed to write job results {}: {e}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{SiloId, SyndicationResult};

    fn temp_store(name: &str) -> FileJobStore {
        FileJobStore::new(&env::temp_dir().join(format!("syndicate-test-{name}.json")))
    }

    #[test]
    fn a_missing_file_loads_as_empty() {
        let store = temp_store("missing");
        let _ = std::fs::remove_file(&store.path);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn results_round_trip_verbatim() {
        let store = temp_store("roundtrip");
        let mut result = SyndicationResult::default();
        result.added.insert("posts/hello.md".to_string(), Some(SiloId::Int(42)));
        let mut results = RunResults::new();
        results.insert("dev".to_string(), Some(result));

        store.save(&results).unwrap();
        assert_eq!(store.load().unwrap(), results);
        let _ = std::fs::remove_file(&store.path);
    }
}
