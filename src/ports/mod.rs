//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the syndication core and an
//! external system (silo APIs, process environment, job-output storage,
//! the hosting provider's commit APIs). Live implementations live in
//! `src/adapters/` and `src/silos/`.

pub mod commit;
pub mod credentials;
pub mod job_store;
pub mod posts;
pub mod silo;

pub use commit::{CommitClient, CommitFuture};
pub use credentials::CredentialStore;
pub use job_store::JobStore;
pub use posts::{PostSource, PostsFuture};
pub use silo::{SiloAdapter, SyndicateFuture};
