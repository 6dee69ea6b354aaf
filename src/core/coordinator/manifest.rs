// ─── Run Manifest ───
// `output/manifest.json`, read by the release tooling to tag and publish
// one release per bucket.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{PackError, PackResult};
use crate::core::lang::LanguageCode;
use crate::core::state::OutputLayout;
use crate::core::version;

use super::run::{Outcome, RunReport};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunManifest {
    pub source_version: Option<String>,
    pub buckets: Vec<BucketEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BucketEntry {
    pub id: String,
    pub pack_format: u32,
    pub languages: Vec<LanguageCode>,
    #[serde(flatten)]
    pub status: BucketStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BucketStatus {
    Success {
        /// Relative to the output directory.
        archive: String,
        sha1: String,
        sha512: String,
    },
    Failed {
        errors: Vec<String>,
    },
}

impl RunManifest {
    /// Build the manifest from a pack or all-step report. Buckets that
    /// succeeded without an archive (map step) are left out.
    pub fn from_report(report: &RunReport, layout: &OutputLayout) -> Self {
        let buckets = report
            .outcomes
            .iter()
            .filter_map(|(bucket, outcome)| {
                let status = match outcome {
                    Outcome::Success(artifact) => {
                        let digests = artifact.digests.as_ref()?;
                        BucketStatus::Success {
                            archive: layout.relative(&artifact.path),
                            sha1: digests.sha1.clone(),
                            sha512: digests.sha512.clone(),
                        }
                    }
                    Outcome::Failed(errors) => BucketStatus::Failed {
                        errors: errors.iter().map(ToString::to_string).collect(),
                    },
                };
                Some(BucketEntry {
                    id: bucket.id.to_string(),
                    pack_format: bucket.pack_format,
                    languages: bucket.supported_languages.to_vec(),
                    status,
                })
            })
            .collect();

        Self {
            source_version: report.source_version.clone(),
            buckets,
        }
    }

    /// Manifest left by an earlier run. A missing or unreadable file gives
    /// `None`, so the next write starts over.
    pub async fn load(layout: &OutputLayout) -> Option<Self> {
        let path = layout.manifest_path();
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No previous manifest at {:?}", path);
                return None;
            }
            Err(e) => {
                warn!("Cannot read previous manifest {:?}: {}", path, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                warn!("Ignoring malformed manifest {:?}: {}", path, e);
                None
            }
        }
    }

    /// Carry over entries of `previous` for buckets this run did not touch.
    /// Entries stay in registry order; ids no longer in the registry are
    /// dropped.
    pub fn merge_previous(mut self, previous: Option<RunManifest>) -> Self {
        let Some(previous) = previous else {
            return self;
        };
        for entry in previous.buckets {
            if !self.buckets.iter().any(|current| current.id == entry.id) {
                self.buckets.push(entry);
            }
        }
        let rank = |id: &str| version::buckets().iter().position(|b| b.id == id);
        self.buckets.retain(|entry| rank(&entry.id).is_some());
        self.buckets.sort_by_key(|entry| rank(&entry.id));
        self
    }

    pub async fn write(&self, layout: &OutputLayout) -> PackResult<()> {
        let path = layout.manifest_path();
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::create_dir_all(layout.root())
            .await
            .map_err(|source| PackError::Io {
                path: layout.root().to_path_buf(),
                source,
            })?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|source| PackError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::core::coordinator::run::{Artifact, Step};
    use crate::core::pack::ArchiveDigests;
    use crate::core::version::lookup;

    #[test]
    fn manifest_lists_archives_and_failures() {
        let layout = OutputLayout::new(PathBuf::from("out"));
        let ok = lookup("1.12.2").unwrap();
        let bad = lookup("1.16.5").unwrap();
        let report = RunReport {
            step: Step::All,
            source_version: Some("1.21.4".into()),
            outcomes: vec![
                (
                    ok,
                    Outcome::Success(Artifact {
                        path: layout.archive_path(ok),
                        digests: Some(ArchiveDigests::of(b"zip")),
                        stats: Vec::new(),
                    }),
                ),
                (
                    bad,
                    Outcome::Failed(vec![PackError::UnsupportedVersion("x".into())]),
                ),
            ],
        };

        let manifest = RunManifest::from_report(&report, &layout);
        let json = serde_json::to_value(&manifest).unwrap();

        assert_eq!(json["source_version"], "1.21.4");
        assert_eq!(json["buckets"][0]["status"], "success");
        assert_eq!(
            json["buckets"][0]["archive"],
            "1.12.2/renovation_translation_pack_1.12.2.zip"
        );
        assert_eq!(json["buckets"][0]["languages"], serde_json::json!(["zh_cn", "zh_tw"]));
        assert_eq!(json["buckets"][1]["status"], "failed");
        assert_eq!(json["buckets"][1]["pack_format"], 6);
    }

    #[test]
    fn map_step_successes_are_not_listed() {
        let layout = OutputLayout::new(PathBuf::from("out"));
        let bucket = lookup("1.8.9").unwrap();
        let report = RunReport {
            step: Step::Map,
            source_version: None,
            outcomes: vec![(
                bucket,
                Outcome::Success(Artifact {
                    path: layout.bucket_dir(bucket),
                    digests: None,
                    stats: Vec::new(),
                }),
            )],
        };
        assert!(RunManifest::from_report(&report, &layout).buckets.is_empty());
    }

    fn success(id: &str, sha1: &str) -> BucketEntry {
        let bucket = lookup(id).unwrap();
        BucketEntry {
            id: id.to_string(),
            pack_format: bucket.pack_format,
            languages: bucket.supported_languages.to_vec(),
            status: BucketStatus::Success {
                archive: format!("{id}/renovation_translation_pack_{id}.zip"),
                sha1: sha1.to_string(),
                sha512: String::new(),
            },
        }
    }

    #[test]
    fn partial_run_keeps_untouched_buckets() {
        let previous = RunManifest {
            source_version: Some("1.21.3".into()),
            buckets: vec![
                success("1.8.9", "old-a"),
                success("1.12.2", "old-b"),
                success("1.19.2", "old-c"),
            ],
        };
        let current = RunManifest {
            source_version: Some("1.21.4".into()),
            buckets: vec![success("1.12.2", "new-b")],
        };

        let merged = current.merge_previous(Some(previous));

        let ids: Vec<&str> = merged.buckets.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1.8.9", "1.12.2", "1.19.2"]);
        assert_eq!(merged.buckets[1], success("1.12.2", "new-b"));
        assert_eq!(merged.source_version.as_deref(), Some("1.21.4"));
    }

    #[test]
    fn unknown_previous_ids_are_dropped() {
        let mut stale = success("1.12.2", "x");
        stale.id = "1.5.2".into();
        let previous = RunManifest {
            source_version: None,
            buckets: vec![stale],
        };
        let current = RunManifest {
            source_version: None,
            buckets: Vec::new(),
        };
        assert!(current.merge_previous(Some(previous)).buckets.is_empty());
    }

    #[tokio::test]
    async fn load_ignores_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path().to_path_buf());
        assert!(RunManifest::load(&layout).await.is_none());

        std::fs::write(layout.manifest_path(), "{broken").unwrap();
        assert!(RunManifest::load(&layout).await.is_none());

        let manifest = RunManifest {
            source_version: Some("1.21.4".into()),
            buckets: vec![success("1.16.5", "abc")],
        };
        manifest.write(&layout).await.unwrap();
        assert_eq!(RunManifest::load(&layout).await, Some(manifest));
    }
}
