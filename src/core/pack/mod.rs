pub mod archive;
pub mod manifest;

pub use archive::{archive_file_name, build_archive, write_archive, ArchiveDigests, LangPayload};
pub use manifest::PackMcmeta;
