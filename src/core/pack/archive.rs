// ─── Archive Builder ───
// Assembles a resource-pack zip for one bucket.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use sha1::Sha1;
use sha2::{Digest, Sha512};
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::error::{PackError, PackResult};
use crate::core::lang::LanguageCode;
use crate::core::version::VersionBucket;

use super::manifest::PackMcmeta;

pub const MANIFEST_NAME: &str = "pack.mcmeta";
pub const ICON_NAME: &str = "pack.png";

/// A rendered language file ready to be stored.
#[derive(Debug, Clone)]
pub struct LangPayload {
    pub language: LanguageCode,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDigests {
    pub sha1: String,
    pub sha512: String,
}

impl ArchiveDigests {
    pub fn of(bytes: &[u8]) -> Self {
        let mut sha1 = Sha1::new();
        sha1.update(bytes);
        let mut sha512 = Sha512::new();
        sha512.update(bytes);
        Self {
            sha1: hex::encode(sha1.finalize()),
            sha512: hex::encode(sha512.finalize()),
        }
    }
}

/// File name of a bucket's archive.
pub fn archive_file_name(bucket: &VersionBucket) -> String {
    format!("renovation_translation_pack_{}.zip", bucket.id)
}

/// Build the archive in memory.
///
/// Entries are written as `pack.mcmeta`, `pack.png`, then languages in the
/// bucket's language order, all with the zip epoch as timestamp, so equal
/// inputs give equal bytes. Payloads for languages the bucket does not
/// support are never stored.
pub fn build_archive(
    bucket: &VersionBucket,
    manifest: &PackMcmeta,
    icon: Option<&[u8]>,
    languages: &[LangPayload],
) -> PackResult<Vec<u8>> {
    let manifest_json = manifest.to_json()?;
    zip_entries(bucket, &manifest_json, icon, languages).map_err(|source| {
        PackError::ArchiveWrite {
            bucket: bucket.id.to_string(),
            path: PathBuf::from(archive_file_name(bucket)),
            source,
        }
    })
}

fn zip_entries(
    bucket: &VersionBucket,
    manifest_json: &str,
    icon: Option<&[u8]>,
    languages: &[LangPayload],
) -> Result<Vec<u8>, ZipError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(6))
        .last_modified_time(zip::DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file(MANIFEST_NAME, options)?;
    zip.write_all(manifest_json.as_bytes())?;

    if let Some(icon) = icon {
        zip.start_file(ICON_NAME, options)?;
        zip.write_all(icon)?;
    }

    for payload in languages {
        if !bucket.supports(payload.language) {
            warn!(
                "Skipping {} for bucket {}: language not available in this version",
                payload.language, bucket.id
            );
        }
    }

    for &language in bucket.supported_languages {
        let Some(payload) = languages.iter().find(|p| p.language == language) else {
            continue;
        };
        let entry = bucket.lang_asset_path(language);
        debug!("Adding {} ({} bytes) to {}", entry, payload.bytes.len(), bucket.id);
        zip.start_file(entry, options)?;
        zip.write_all(&payload.bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Write archive bytes to `dest` through a sibling `.part` file so that a
/// failed write never leaves a truncated archive at `dest`.
pub async fn write_archive(bucket: &VersionBucket, dest: &Path, bytes: &[u8]) -> PackResult<()> {
    let archive_error = |source: std::io::Error| PackError::ArchiveWrite {
        bucket: bucket.id.to_string(),
        path: dest.to_path_buf(),
        source: ZipError::Io(source),
    };

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(archive_error)?;
    }

    let part = part_path(dest);
    if let Err(e) = tokio::fs::write(&part, bytes).await {
        let _ = tokio::fs::remove_file(&part).await;
        return Err(archive_error(e));
    }
    if let Err(e) = tokio::fs::rename(&part, dest).await {
        let _ = tokio::fs::remove_file(&part).await;
        return Err(archive_error(e));
    }
    Ok(())
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}
