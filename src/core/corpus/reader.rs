// ─── Corpus Reader ───
// Read-only access to the translation corpus on disk.
//
// Layout under the corpus root:
//   mc_lang/full/<code>.json      latest translations (en_us optional)
//   mc_lang/version.txt           upstream version identifier
//   data/<bucket>/<name>.<ext>    vanilla baseline per bucket (en_us optional)
//   data/mapping.json             optional key alias table
//   pack.png                      optional pack icon

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::core::error::{PackError, PackResult};
use crate::core::lang::{codec, LangDialect, LanguageCode, LanguageFile};
use crate::core::version::VersionBucket;

use super::aliases::KeyAliases;

/// Source of translation data for a run.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Latest translation for a language.
    async fn load_latest(&self, language: LanguageCode) -> PackResult<LanguageFile>;

    /// Vanilla translation shipped with the bucket's newest release.
    async fn load_baseline(
        &self,
        bucket: &VersionBucket,
        language: LanguageCode,
    ) -> PackResult<LanguageFile>;

    /// Upstream version the latest translations were taken from.
    async fn source_version(&self) -> PackResult<Option<String>>;

    /// English source text of the latest release, if the corpus has it.
    async fn load_source_latest(&self) -> PackResult<Option<LanguageFile>>;

    /// English source text shipped with the bucket's newest release.
    async fn load_source_baseline(
        &self,
        bucket: &VersionBucket,
    ) -> PackResult<Option<LanguageFile>>;

    async fn load_aliases(&self) -> PackResult<Option<KeyAliases>>;

    async fn load_icon(&self) -> PackResult<Option<Vec<u8>>>;
}

/// Filesystem-backed corpus.
#[derive(Debug, Clone)]
pub struct CorpusReader {
    root: PathBuf,
}

impl CorpusReader {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn latest_path(&self, language: LanguageCode) -> PathBuf {
        self.root
            .join("mc_lang")
            .join("full")
            .join(format!("{}.json", language.code()))
    }

    pub fn version_path(&self) -> PathBuf {
        self.root.join("mc_lang").join("version.txt")
    }

    pub fn baseline_path(&self, bucket: &VersionBucket, language: LanguageCode) -> PathBuf {
        self.root
            .join("data")
            .join(bucket.id)
            .join(bucket.lang_file_name(language))
    }

    pub fn aliases_path(&self) -> PathBuf {
        self.root.join("data").join("mapping.json")
    }

    pub fn icon_path(&self) -> PathBuf {
        self.root.join("pack.png")
    }

    async fn read_language_file(
        &self,
        path: &Path,
        bucket: Option<&str>,
        language: LanguageCode,
        dialect: LangDialect,
    ) -> PackResult<LanguageFile> {
        let corpus_error = |reason: String| PackError::CorpusRead {
            bucket: bucket.map(str::to_string),
            language,
            path: path.to_path_buf(),
            reason,
        };

        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                corpus_error("file not found".to_string())
            } else {
                corpus_error(e.to_string())
            }
        })?;

        let file = codec::parse(language, dialect, &text).map_err(|e| corpus_error(e.to_string()))?;
        debug!("Loaded {} entries from {:?}", file.len(), path);
        Ok(file)
    }

    /// Like `read_language_file`, but a missing file is `None`.
    async fn read_optional_language_file(
        &self,
        path: &Path,
        bucket: Option<&str>,
        language: LanguageCode,
        dialect: LangDialect,
    ) -> PackResult<Option<LanguageFile>> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|source| PackError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        if !exists {
            debug!("No {} file at {:?}", language, path);
            return Ok(None);
        }
        self.read_language_file(path, bucket, language, dialect)
            .await
            .map(Some)
    }
}

#[async_trait]
impl CorpusSource for CorpusReader {
    async fn load_latest(&self, language: LanguageCode) -> PackResult<LanguageFile> {
        let path = self.latest_path(language);
        self.read_language_file(&path, None, language, LangDialect::Json)
            .await
    }

    async fn load_baseline(
        &self,
        bucket: &VersionBucket,
        language: LanguageCode,
    ) -> PackResult<LanguageFile> {
        let path = self.baseline_path(bucket, language);
        self.read_language_file(&path, Some(bucket.id), language, bucket.dialect())
            .await
    }

    async fn load_source_latest(&self) -> PackResult<Option<LanguageFile>> {
        let path = self.latest_path(LanguageCode::EnUs);
        self.read_optional_language_file(&path, None, LanguageCode::EnUs, LangDialect::Json)
            .await
    }

    async fn load_source_baseline(
        &self,
        bucket: &VersionBucket,
    ) -> PackResult<Option<LanguageFile>> {
        let path = self.baseline_path(bucket, LanguageCode::EnUs);
        self.read_optional_language_file(
            &path,
            Some(bucket.id),
            LanguageCode::EnUs,
            bucket.dialect(),
        )
        .await
    }

    async fn source_version(&self) -> PackResult<Option<String>> {
        let Some(raw) = read_optional(&self.version_path()).await? else {
            return Ok(None);
        };
        let text = String::from_utf8_lossy(&raw);
        Ok(text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string))
    }

    async fn load_aliases(&self) -> PackResult<Option<KeyAliases>> {
        let path = self.aliases_path();
        let Some(raw) = read_optional(&path).await? else {
            return Ok(None);
        };
        let text = String::from_utf8_lossy(&raw);
        Ok(Some(KeyAliases::from_json(&text)?))
    }

    async fn load_icon(&self) -> PackResult<Option<Vec<u8>>> {
        read_optional(&self.icon_path()).await
    }
}

/// Read a file that is allowed to be absent.
async fn read_optional(path: &Path) -> PackResult<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PackError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::version::lookup;

    fn corpus_with(files: &[(&str, &str)]) -> (tempfile::TempDir, CorpusReader) {
        let dir = tempfile::tempdir().unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        let reader = CorpusReader::new(dir.path().to_path_buf());
        (dir, reader)
    }

    #[tokio::test]
    async fn baseline_uses_bucket_naming() {
        let (_dir, reader) = corpus_with(&[("data/1.8.9/zh_CN.lang", "gui.done=完成\n")]);
        let bucket = lookup("1.8.9").unwrap();
        let file = reader.load_baseline(bucket, LanguageCode::ZhCn).await.unwrap();
        assert_eq!(file.get("gui.done"), Some("完成"));
        assert_eq!(file.dialect(), LangDialect::Legacy);
    }

    #[tokio::test]
    async fn missing_baseline_reports_bucket_and_language() {
        let (_dir, reader) = corpus_with(&[]);
        let bucket = lookup("1.16.5").unwrap();
        let err = reader.load_baseline(bucket, LanguageCode::Lzh).await.unwrap_err();
        match err {
            PackError::CorpusRead { bucket, language, .. } => {
                assert_eq!(bucket.as_deref(), Some("1.16.5"));
                assert_eq!(language, LanguageCode::Lzh);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_latest_is_a_corpus_error() {
        let (_dir, reader) = corpus_with(&[("mc_lang/full/zh_cn.json", "{not json")]);
        let err = reader.load_latest(LanguageCode::ZhCn).await.unwrap_err();
        assert!(matches!(err, PackError::CorpusRead { bucket: None, .. }));
    }

    #[tokio::test]
    async fn version_and_optional_files() {
        let (_dir, reader) = corpus_with(&[("mc_lang/version.txt", "\n 1.21.4 \n")]);
        assert_eq!(reader.source_version().await.unwrap().as_deref(), Some("1.21.4"));
        assert!(reader.load_aliases().await.unwrap().is_none());
        assert!(reader.load_icon().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn source_text_is_optional() {
        let (_dir, reader) = corpus_with(&[("data/1.9.4/en_US.lang", "gui.done=Done\n")]);
        let bucket = lookup("1.9.4").unwrap();
        let baseline = reader.load_source_baseline(bucket).await.unwrap().unwrap();
        assert_eq!(baseline.get("gui.done"), Some("Done"));
        assert!(reader.load_source_latest().await.unwrap().is_none());
        assert!(reader
            .load_source_baseline(lookup("1.16.5").unwrap())
            .await
            .unwrap()
            .is_none());
    }
}
