use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::error::{PackError, PackResult};

pub const SETTINGS_FILE: &str = "renovation_settings.json";
const DEFAULT_CONCURRENCY: usize = 8;

/// Run settings, read from `renovation_settings.json` in the working
/// directory. Every field is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PackSettings {
    /// Root of the translation corpus.
    pub corpus_dir: PathBuf,
    /// Where intermediate files, archives and the run manifest go.
    pub output_dir: PathBuf,
    /// Maximum number of targets processed at once.
    pub concurrency: usize,
    /// Use `data/mapping.json` to fill renamed keys on flat buckets.
    pub key_aliases: bool,
    /// Restrict the run to these versions; empty means every bucket.
    pub versions: Vec<String>,
}

impl Default for PackSettings {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("."),
            output_dir: PathBuf::from("output"),
            concurrency: DEFAULT_CONCURRENCY,
            key_aliases: false,
            versions: Vec::new(),
        }
    }
}

impl PackSettings {
    /// Load settings from `work_dir`, falling back to defaults when the file
    /// is absent. Relative directories are resolved against `work_dir`.
    pub fn load(work_dir: &Path) -> PackResult<Self> {
        let path = work_dir.join(SETTINGS_FILE);
        let mut settings = match std::fs::read_to_string(&path) {
            Ok(raw) => {
                info!("Using settings from {:?}", path);
                serde_json::from_str::<PackSettings>(&raw).map_err(|e| PackError::Settings {
                    path: path.clone(),
                    reason: e.to_string(),
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No {} found, using defaults", SETTINGS_FILE);
                PackSettings::default()
            }
            Err(source) => return Err(PackError::Io { path, source }),
        };

        if settings.concurrency == 0 {
            return Err(PackError::Settings {
                path,
                reason: "concurrency must be at least 1".to_string(),
            });
        }

        settings.corpus_dir = work_dir.join(&settings.corpus_dir);
        settings.output_dir = work_dir.join(&settings.output_dir);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults_relative_to_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = PackSettings::load(dir.path()).unwrap();
        assert_eq!(settings.output_dir, dir.path().join("output"));
        assert_eq!(settings.concurrency, 8);
        assert!(!settings.key_aliases);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"corpus_dir": "corpus", "key_aliases": true, "versions": ["1.12.2"]}"#,
        )
        .unwrap();
        let settings = PackSettings::load(dir.path()).unwrap();
        assert_eq!(settings.corpus_dir, dir.path().join("corpus"));
        assert!(settings.key_aliases);
        assert_eq!(settings.versions, ["1.12.2"]);
        assert_eq!(settings.concurrency, 8);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), r#"{"concurency": 2}"#).unwrap();
        let err = PackSettings::load(dir.path()).unwrap_err();
        assert!(matches!(err, PackError::Settings { .. }));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), r#"{"concurrency": 0}"#).unwrap();
        assert!(matches!(
            PackSettings::load(dir.path()),
            Err(PackError::Settings { .. })
        ));
    }
}
