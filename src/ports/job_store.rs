//! Job-output persistence port for cross-step accumulation.

use std::error::Error;

use crate::results::RunResults;

/// Persists accumulated syndication results across the sequential steps of
/// one pipeline job.
///
/// Values round-trip through a textual JSON encoding so a later step run in
/// a separate process reads back exactly what was written.
pub trait JobStore: Send + Sync {
    /// Loads the previously persisted results; empty when nothing has been
    /// written yet.
    ///
    /// # Errors
    ///
    /// Returns an error if stored results exist but cannot be read or parsed.
    fn load(&self) -> Result<RunResults, Box<dyn Error + Send + Sync>>;

    /// Overwrites the persisted results.
    ///
    /// # Errors
    ///
    /// Returns an error if the results cannot be serialized or written.
    fn save(&self, results: &RunResults) -> Result<(), Box<dyn Error + Send + Sync>>;
}
