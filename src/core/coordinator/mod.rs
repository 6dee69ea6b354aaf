pub mod manifest;
pub mod run;

pub use manifest::{BucketEntry, BucketStatus, RunManifest};
pub use run::{Artifact, Outcome, RunCoordinator, RunReport, Step};
