use std::path::{Path, PathBuf};

use crate::core::lang::LanguageCode;
use crate::core::pack::archive_file_name;
use crate::core::version::VersionBucket;

/// On-disk structure of the output directory:
///
/// - `<bucket>/<name>.<ext>`                  mapped language files
/// - `<bucket>/summary/<name>.json`           changed-entry reports
/// - `<bucket>/manually_check/<name>.json`    changes whose English text moved
/// - `<bucket>/renovation_translation_pack_<bucket>.zip`
/// - `manifest.json`                          run manifest
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bucket_dir(&self, bucket: &VersionBucket) -> PathBuf {
        self.root.join(bucket.id)
    }

    pub fn lang_path(&self, bucket: &VersionBucket, language: LanguageCode) -> PathBuf {
        self.bucket_dir(bucket).join(bucket.lang_file_name(language))
    }

    pub fn summary_path(&self, bucket: &VersionBucket, language: LanguageCode) -> PathBuf {
        self.bucket_dir(bucket)
            .join("summary")
            .join(format!("{}.json", language.file_stem(bucket.lang_case)))
    }

    pub fn manual_check_path(&self, bucket: &VersionBucket, language: LanguageCode) -> PathBuf {
        self.bucket_dir(bucket)
            .join("manually_check")
            .join(format!("{}.json", language.file_stem(bucket.lang_case)))
    }

    pub fn archive_path(&self, bucket: &VersionBucket) -> PathBuf {
        self.bucket_dir(bucket).join(archive_file_name(bucket))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("manifest.json")
    }

    /// `path` relative to the output root with `/` separators, for the run
    /// manifest.
    pub fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}
