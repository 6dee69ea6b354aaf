// ─── Run Coordinator ───
// Drives the bucket × language matrix to completion. Targets run through a
// bounded `buffer_unordered` pool; failures are collected per bucket and
// never stop sibling buckets.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use futures_util::future::join_all;
use serde::Serialize;
use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::core::corpus::{CorpusSource, KeyAliases};
use crate::core::error::{PackError, PackResult};
use crate::core::lang::{codec, LanguageCode, LanguageFile};
use crate::core::mapping::{
    manual_checks, map_target, ChangedEntry, ManualCheckEntry, MappingResult, MappingStats,
};
use crate::core::pack::{build_archive, write_archive, ArchiveDigests, LangPayload, PackMcmeta};
use crate::core::state::OutputLayout;
use crate::core::version::VersionBucket;

/// Which part of the pipeline to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Compute mappings and write the intermediate language files.
    Map,
    /// Build archives from previously mapped files.
    Pack,
    /// Map, then pack every bucket whose mapping succeeded.
    All,
}

/// What a successful bucket produced.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Archive path, or the bucket directory for the map step.
    pub path: PathBuf,
    pub digests: Option<ArchiveDigests>,
    pub stats: Vec<(LanguageCode, MappingStats)>,
}

#[derive(Debug)]
pub enum Outcome {
    Success(Artifact),
    /// Every error hit by the bucket's targets, never empty.
    Failed(Vec<PackError>),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

/// Per-bucket outcomes in registry order.
#[derive(Debug)]
pub struct RunReport {
    pub step: Step,
    pub source_version: Option<String>,
    pub outcomes: Vec<(&'static VersionBucket, Outcome)>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|(_, outcome)| !outcome.is_success())
    }
}

pub struct RunCoordinator<C> {
    corpus: C,
    layout: OutputLayout,
    concurrency: usize,
    key_aliases: bool,
}

impl<C: CorpusSource> RunCoordinator<C> {
    pub fn new(corpus: C, layout: OutputLayout) -> Self {
        Self {
            corpus,
            layout,
            concurrency: 8,
            key_aliases: false,
        }
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn with_key_aliases(mut self, enabled: bool) -> Self {
        self.key_aliases = enabled;
        self
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Run `step` for every bucket. Only run-level misconfiguration (an
    /// unreadable alias table that was asked for) is returned as `Err`.
    pub async fn run(
        &self,
        buckets: &[&'static VersionBucket],
        step: Step,
    ) -> PackResult<RunReport> {
        let started = Instant::now();
        info!(
            "Starting {:?} for {} buckets, concurrency={}",
            step,
            buckets.len(),
            self.concurrency
        );

        let source_version = match self.corpus.source_version().await {
            Ok(Some(version)) => Some(version),
            Ok(None) => {
                warn!("No upstream version identifier found in corpus");
                None
            }
            Err(e) => {
                warn!("Cannot read upstream version identifier: {}", e);
                None
            }
        };

        let outcomes = match step {
            Step::Map => self.map_buckets(buckets).await?,
            Step::Pack => {
                self.pack_buckets(buckets, source_version.as_deref(), HashMap::new())
                    .await
            }
            Step::All => {
                let mapped = self.map_buckets(buckets).await?;
                let mut stats = HashMap::new();
                let mut ready = Vec::new();
                let mut failed = Vec::new();
                for (bucket, outcome) in mapped {
                    match outcome {
                        Outcome::Success(artifact) => {
                            stats.insert(bucket.id, artifact.stats);
                            ready.push(bucket);
                        }
                        Outcome::Failed(errors) => {
                            discard_stale(&self.layout.archive_path(bucket)).await;
                            failed.push((bucket, Outcome::Failed(errors)));
                        }
                    }
                }
                let mut packed = self.pack_buckets(&ready, source_version.as_deref(), stats).await;
                packed.extend(failed);
                packed
            }
        };

        let report = RunReport {
            step,
            source_version,
            outcomes: in_registry_order(buckets, outcomes),
        };

        let failed = report
            .outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_success())
            .count();
        info!(
            "{:?} finished in {:.2}s: {} succeeded, {} failed",
            step,
            started.elapsed().as_secs_f64(),
            report.outcomes.len() - failed,
            failed
        );
        Ok(report)
    }

    // ── Map ─────────────────────────────────────────────

    async fn map_buckets(
        &self,
        buckets: &[&'static VersionBucket],
    ) -> PackResult<Vec<(&'static VersionBucket, Outcome)>> {
        let aliases = self.load_aliases().await?;
        let latest = LatestSet::load(&self.corpus, buckets).await;
        let sources = SourceTexts::load(&self.corpus, buckets).await;

        let targets: Vec<(&'static VersionBucket, LanguageCode)> = buckets
            .iter()
            .flat_map(|&bucket| {
                bucket
                    .supported_languages
                    .iter()
                    .map(move |&language| (bucket, language))
            })
            .collect();

        let latest = &latest;
        let sources = &sources;
        let aliases = aliases.as_ref();
        let results: Vec<_> = stream::iter(targets)
            .map(|(bucket, language)| async move {
                let result = self
                    .map_one(bucket, language, latest, sources, aliases)
                    .await;
                (bucket, language, result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut grouped: HashMap<&'static str, Vec<(LanguageCode, PackResult<RenderedTarget>)>> =
            HashMap::new();
        for (bucket, language, result) in results {
            grouped.entry(bucket.id).or_default().push((language, result));
        }

        let outcomes = stream::iter(buckets.iter().copied())
            .map(|bucket| {
                let mut targets = grouped.remove(bucket.id).unwrap_or_default();
                async move {
                    targets.sort_by_key(|(language, _)| language_rank(bucket, *language));
                    (bucket, self.finish_mapped_bucket(bucket, targets).await)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        Ok(outcomes)
    }

    async fn load_aliases(&self) -> PackResult<Option<KeyAliases>> {
        if !self.key_aliases {
            return Ok(None);
        }
        let aliases = self.corpus.load_aliases().await?;
        match &aliases {
            Some(table) => info!("Loaded {} key aliases", table.len()),
            None => warn!("Key aliases enabled but no alias table found in corpus"),
        }
        Ok(aliases)
    }

    async fn map_one(
        &self,
        bucket: &'static VersionBucket,
        language: LanguageCode,
        latest: &LatestSet,
        sources: &SourceTexts,
        aliases: Option<&KeyAliases>,
    ) -> PackResult<RenderedTarget> {
        let latest = latest.get(bucket, language)?;
        let baseline = self.corpus.load_baseline(bucket, language).await?;

        let result = map_target(bucket, latest, &baseline, aliases);
        let review = sources.review(bucket, &result.changes);
        let text = codec::render(&result.file).map_err(|source| PackError::Serialization {
            bucket: bucket.id.to_string(),
            language,
            source,
        })?;

        debug!(
            "Mapped {} {}: {} keys ({} overridden, {} aliased, {} fallback, {} dropped)",
            bucket.id,
            language,
            result.stats.emitted(),
            result.stats.overridden,
            result.stats.aliased,
            result.stats.fallback,
            result.stats.dropped
        );
        Ok(RenderedTarget {
            result,
            text,
            review,
        })
    }

    /// Persist a bucket's mapped files, but only when every language mapped.
    async fn finish_mapped_bucket(
        &self,
        bucket: &'static VersionBucket,
        targets: Vec<(LanguageCode, PackResult<RenderedTarget>)>,
    ) -> Outcome {
        let mut rendered = Vec::with_capacity(targets.len());
        let mut errors = Vec::new();
        for (language, result) in targets {
            match result {
                Ok(target) => rendered.push((language, target)),
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            for (language, target) in &rendered {
                if let Err(e) = self.write_mapped(bucket, *language, target).await {
                    errors.push(e);
                }
            }
        }

        if !errors.is_empty() {
            for &language in bucket.supported_languages {
                discard_stale(&self.layout.lang_path(bucket, language)).await;
                discard_stale(&self.layout.summary_path(bucket, language)).await;
                discard_stale(&self.layout.manual_check_path(bucket, language)).await;
            }
            return failed_outcome(bucket, errors);
        }

        info!("Mapped bucket {}", bucket.id);
        Outcome::Success(Artifact {
            path: self.layout.bucket_dir(bucket),
            digests: None,
            stats: rendered
                .into_iter()
                .map(|(language, target)| (language, target.result.stats))
                .collect(),
        })
    }

    async fn write_mapped(
        &self,
        bucket: &VersionBucket,
        language: LanguageCode,
        target: &RenderedTarget,
    ) -> PackResult<()> {
        let target_io = |path: PathBuf| {
            move |source| PackError::TargetIo {
                bucket: bucket.id.to_string(),
                language,
                path,
                source,
            }
        };

        let lang_path = self.layout.lang_path(bucket, language);
        write_file(&lang_path, target.text.as_bytes())
            .await
            .map_err(target_io(lang_path.clone()))?;

        let summary_path = self.layout.summary_path(bucket, language);
        write_report(&summary_path, &target.result.changes)
            .await
            .map_err(target_io(summary_path.clone()))?;

        let review_path = self.layout.manual_check_path(bucket, language);
        write_report(&review_path, &target.review)
            .await
            .map_err(target_io(review_path.clone()))?;
        Ok(())
    }

    // ── Pack ────────────────────────────────────────────

    async fn pack_buckets(
        &self,
        buckets: &[&'static VersionBucket],
        source_version: Option<&str>,
        mut stats: HashMap<&'static str, Vec<(LanguageCode, MappingStats)>>,
    ) -> Vec<(&'static VersionBucket, Outcome)> {
        let icon = match self.corpus.load_icon().await {
            Ok(icon) => icon,
            Err(e) => {
                warn!("Cannot read pack icon, building packs without it: {}", e);
                None
            }
        };
        let icon = icon.as_deref();

        stream::iter(buckets.iter().copied())
            .map(|bucket| {
                let bucket_stats = stats.remove(bucket.id).unwrap_or_default();
                async move {
                    let outcome = match self.pack_one(bucket, source_version, icon).await {
                        Ok((path, digests)) => {
                            info!("Built {:?} (sha1 {})", path, digests.sha1);
                            Outcome::Success(Artifact {
                                path,
                                digests: Some(digests),
                                stats: bucket_stats,
                            })
                        }
                        Err(errors) => {
                            discard_stale(&self.layout.archive_path(bucket)).await;
                            failed_outcome(bucket, errors)
                        }
                    };
                    (bucket, outcome)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }

    async fn pack_one(
        &self,
        bucket: &'static VersionBucket,
        source_version: Option<&str>,
        icon: Option<&[u8]>,
    ) -> Result<(PathBuf, ArchiveDigests), Vec<PackError>> {
        let mut payloads = Vec::with_capacity(bucket.supported_languages.len());
        let mut errors = Vec::new();
        for &language in bucket.supported_languages {
            let path = self.layout.lang_path(bucket, language);
            match tokio::fs::read(&path).await {
                Ok(bytes) => payloads.push(LangPayload { language, bytes }),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    errors.push(PackError::MappingMissing {
                        bucket: bucket.id.to_string(),
                        language,
                        path,
                    })
                }
                Err(source) => errors.push(PackError::TargetIo {
                    bucket: bucket.id.to_string(),
                    language,
                    path,
                    source,
                }),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let manifest = PackMcmeta::for_bucket(bucket, source_version);
        let bytes = build_archive(bucket, &manifest, icon, &payloads).map_err(|e| vec![e])?;
        let dest = self.layout.archive_path(bucket);
        write_archive(bucket, &dest, &bytes)
            .await
            .map_err(|e| vec![e])?;
        Ok((dest, ArchiveDigests::of(&bytes)))
    }
}

struct RenderedTarget {
    result: MappingResult,
    text: String,
    review: Vec<ManualCheckEntry>,
}

/// Latest translations for every language a run needs, loaded once and
/// shared read-only by all targets.
struct LatestSet {
    files: HashMap<LanguageCode, PackResult<LanguageFile>>,
}

impl LatestSet {
    async fn load<C: CorpusSource>(corpus: &C, buckets: &[&'static VersionBucket]) -> Self {
        let languages: Vec<LanguageCode> = LanguageCode::ALL
            .into_iter()
            .filter(|language| buckets.iter().any(|bucket| bucket.supports(*language)))
            .collect();

        let loaded = join_all(languages.iter().map(|&language| corpus.load_latest(language))).await;
        for (language, result) in languages.iter().zip(&loaded) {
            match result {
                Ok(file) => info!("Loaded latest {} ({} keys)", language, file.len()),
                Err(e) => warn!("{}", e),
            }
        }

        Self {
            files: languages.into_iter().zip(loaded).collect(),
        }
    }

    /// The latest file, or a corpus error scoped to `bucket`.
    fn get(&self, bucket: &VersionBucket, language: LanguageCode) -> PackResult<&LanguageFile> {
        match self.files.get(&language) {
            Some(Ok(file)) => Ok(file),
            Some(Err(PackError::CorpusRead { path, reason, .. })) => Err(PackError::CorpusRead {
                bucket: Some(bucket.id.to_string()),
                language,
                path: path.clone(),
                reason: reason.clone(),
            }),
            Some(Err(other)) => Err(PackError::CorpusRead {
                bucket: Some(bucket.id.to_string()),
                language,
                path: PathBuf::new(),
                reason: other.to_string(),
            }),
            None => Err(PackError::CorpusRead {
                bucket: Some(bucket.id.to_string()),
                language,
                path: PathBuf::new(),
                reason: "latest translation was not loaded".to_string(),
            }),
        }
    }
}

/// English source text for the manual-check reports. Absent or unreadable
/// files only disable the report.
struct SourceTexts {
    latest: Option<LanguageFile>,
    baselines: HashMap<&'static str, LanguageFile>,
}

impl SourceTexts {
    async fn load<C: CorpusSource>(corpus: &C, buckets: &[&'static VersionBucket]) -> Self {
        let latest = match corpus.load_source_latest().await {
            Ok(Some(file)) => file,
            Ok(None) => {
                debug!("No latest en_us text, skipping manual-check reports");
                return Self::empty();
            }
            Err(e) => {
                warn!("Skipping manual-check reports: {}", e);
                return Self::empty();
            }
        };

        let loaded = join_all(
            buckets
                .iter()
                .map(|&bucket| async move { (bucket, corpus.load_source_baseline(bucket).await) }),
        )
        .await;

        let mut baselines = HashMap::new();
        for (bucket, result) in loaded {
            match result {
                Ok(Some(file)) => {
                    baselines.insert(bucket.id, file);
                }
                Ok(None) => debug!("No en_us baseline for bucket {}", bucket.id),
                Err(e) => warn!("Skipping manual-check report for {}: {}", bucket.id, e),
            }
        }

        Self {
            latest: Some(latest),
            baselines,
        }
    }

    fn empty() -> Self {
        Self {
            latest: None,
            baselines: HashMap::new(),
        }
    }

    fn review(&self, bucket: &VersionBucket, changes: &[ChangedEntry]) -> Vec<ManualCheckEntry> {
        match (&self.latest, self.baselines.get(bucket.id)) {
            (Some(latest), Some(baseline)) => manual_checks(changes, latest, baseline),
            _ => Vec::new(),
        }
    }
}

fn failed_outcome(bucket: &VersionBucket, errors: Vec<PackError>) -> Outcome {
    for e in &errors {
        warn!("Bucket {} failed: {}", bucket.id, e);
    }
    Outcome::Failed(errors)
}

fn language_rank(bucket: &VersionBucket, language: LanguageCode) -> usize {
    bucket
        .supported_languages
        .iter()
        .position(|&l| l == language)
        .unwrap_or(usize::MAX)
}

fn in_registry_order(
    buckets: &[&'static VersionBucket],
    mut outcomes: Vec<(&'static VersionBucket, Outcome)>,
) -> Vec<(&'static VersionBucket, Outcome)> {
    outcomes.sort_by_key(|(bucket, _)| {
        buckets
            .iter()
            .position(|b| b.id == bucket.id)
            .unwrap_or(usize::MAX)
    });
    outcomes
}

async fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await
}

/// Write a pretty JSON report, or remove a stale one when there is nothing
/// to report.
async fn write_report<T: Serialize>(path: &Path, entries: &[T]) -> std::io::Result<()> {
    if entries.is_empty() {
        discard_stale(path).await;
        return Ok(());
    }
    let json = serde_json::to_string_pretty(entries)?;
    write_file(path, json.as_bytes()).await
}

/// Remove output left by an earlier run so a failed bucket is not shipped stale.
async fn discard_stale(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed stale {:?}", path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Cannot remove stale {:?}: {}", path, e),
    }
}
