//! Syndication result types and cross-run accumulation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A silo-assigned article identifier.
///
/// Platforms disagree on the shape of their ids (dev.to hands out integers,
/// Medium hands out strings), so the core treats them as opaque scalars:
/// equality and serialization only, never arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SiloId {
    /// A numeric identifier.
    Int(i64),
    /// A textual identifier.
    Text(String),
}

impl fmt::Display for SiloId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiloId::Int(n) => write!(f, "{n}"),
            SiloId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for SiloId {
    fn from(n: i64) -> Self {
        SiloId::Int(n)
    }
}

impl From<&str> for SiloId {
    fn from(s: &str) -> Self {
        SiloId::Text(s.to_string())
    }
}

/// What one silo did with one batch of posts.
///
/// Each bucket maps a post path to the id the silo assigned. A post appears
/// in at most one bucket per run: adapters classify by whether the post
/// already carries an id for that silo. An absent id inside a bucket means
/// the remote call for that post failed and will be retried on a later run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyndicationResult {
    /// Posts newly created on the silo, keyed by path.
    #[serde(default)]
    pub added: BTreeMap<String, Option<SiloId>>,
    /// Posts updated in place on the silo, keyed by path.
    #[serde(default)]
    pub modified: BTreeMap<String, Option<SiloId>>,
}

impl SyndicationResult {
    /// Returns true when no path is claimed as both added and modified.
    #[must_use]
    pub fn is_disjoint(&self) -> bool {
        self.added.keys().all(|path| !self.modified.contains_key(path))
    }
}

/// Per-silo results for one run, keyed by normalized silo name.
///
/// A `None` value records that the silo was eligible but its adapter call
/// failed outright, distinguishing it from a silo that was never attempted
/// (absent key).
pub type RunResults = BTreeMap<String, Option<SyndicationResult>>;

/// Merges this run's results into those persisted by earlier steps.
///
/// The union is shallow: a silo key present in `current` fully replaces the
/// same key in `previous`, buckets and all. That means a later step which
/// syndicated only one new post erases an earlier step's different posts
/// under the same silo. Deliberately implemented as observed rather than
/// deep-merged; revisit only as an explicit product decision.
#[must_use]
pub fn merge_accumulated(mut previous: RunResults, current: &RunResults) -> RunResults {
    previous.extend(current.iter().map(|(silo, result)| (silo.clone(), result.clone())));
    previous
}
