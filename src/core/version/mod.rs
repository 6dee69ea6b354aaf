pub mod mc_version;
pub mod registry;

pub use mc_version::McVersion;
pub use registry::{buckets, lookup, select, NamespaceStyle, VersionBucket};
