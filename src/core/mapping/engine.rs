// ─── Mapping Engine ───
// Backports the latest translation onto one bucket's vanilla key set.

use serde::Serialize;

use crate::core::corpus::KeyAliases;
use crate::core::lang::{LangDialect, LanguageFile};
use crate::core::version::{NamespaceStyle, VersionBucket};

/// Per-target counters, logged and shown in the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MappingStats {
    /// Baseline keys whose value was replaced by a different latest value.
    pub overridden: usize,
    /// Baseline keys whose latest value is identical.
    pub unchanged: usize,
    /// Baseline keys filled through the alias table.
    pub aliased: usize,
    /// Baseline keys missing from latest, kept with their vanilla value.
    pub fallback: usize,
    /// Latest keys the target client does not know.
    pub dropped: usize,
}

impl MappingStats {
    pub fn emitted(&self) -> usize {
        self.overridden + self.unchanged + self.aliased + self.fallback
    }
}

/// One value that differs from the vanilla text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedEntry {
    pub key: String,
    pub old_value: String,
    pub new_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via_alias: Option<String>,
}

/// A changed value whose English source text also changed between the
/// baseline release and the latest one, so the new translation may no
/// longer fit the old client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualCheckEntry {
    pub key: String,
    pub old_value: String,
    pub old_en_us: String,
    pub new_key: String,
    pub new_value: String,
    pub new_en_us: String,
}

/// Override file for one (bucket, language) target.
#[derive(Debug, Clone)]
pub struct MappingResult {
    pub bucket: &'static str,
    pub file: LanguageFile,
    pub stats: MappingStats,
    pub changes: Vec<ChangedEntry>,
}

/// Compute the override file for `bucket` from the latest translation and
/// the bucket's vanilla baseline.
///
/// Every baseline key is emitted exactly once, nothing else is: a shared key
/// takes the latest value, a baseline-only key keeps the vanilla value.
/// Aliases only apply to flat buckets and never beat an exact key match.
pub fn map_target(
    bucket: &'static VersionBucket,
    latest: &LanguageFile,
    baseline: &LanguageFile,
    aliases: Option<&KeyAliases>,
) -> MappingResult {
    let aliases = aliases.filter(|_| bucket.namespace_style == NamespaceStyle::Flat);
    let mut file = LanguageFile::new(baseline.language(), bucket.dialect());
    let mut stats = MappingStats::default();
    let mut changes = Vec::new();

    for entry in baseline.entries() {
        let (value, via_alias) = match latest.get(&entry.key) {
            Some(value) => (value, None),
            None => match aliases.and_then(|table| resolve_alias(table, latest, &entry.key)) {
                Some((alias, value)) => (value, Some(alias)),
                None => {
                    stats.fallback += 1;
                    file.insert(entry.key.clone(), entry.value.clone());
                    continue;
                }
            },
        };

        if via_alias.is_some() {
            stats.aliased += 1;
        } else if value == entry.value {
            stats.unchanged += 1;
        } else {
            stats.overridden += 1;
        }

        if value != entry.value {
            changes.push(ChangedEntry {
                key: entry.key.clone(),
                old_value: entry.value.clone(),
                new_value: value.to_string(),
                via_alias: via_alias.map(str::to_string),
            });
        }
        file.insert(entry.key.clone(), value.to_string());
    }

    stats.dropped = latest
        .keys()
        .filter(|key| !baseline.contains_key(key))
        .count();

    if file.dialect() == LangDialect::Json {
        file.sort_by_key();
    }

    MappingResult {
        bucket: bucket.id,
        file,
        stats,
        changes,
    }
}

/// Changed entries whose English text differs between `baseline_source`
/// and `latest_source`. Entries missing English text on either side are
/// not reported.
pub fn manual_checks(
    changes: &[ChangedEntry],
    latest_source: &LanguageFile,
    baseline_source: &LanguageFile,
) -> Vec<ManualCheckEntry> {
    changes
        .iter()
        .filter_map(|change| {
            let new_key = change.via_alias.as_deref().unwrap_or(&change.key);
            let old_en_us = baseline_source.get(&change.key)?;
            let new_en_us = latest_source.get(new_key)?;
            (old_en_us != new_en_us).then(|| ManualCheckEntry {
                key: change.key.clone(),
                old_value: change.old_value.clone(),
                old_en_us: old_en_us.to_string(),
                new_key: new_key.to_string(),
                new_value: change.new_value.clone(),
                new_en_us: new_en_us.to_string(),
            })
        })
        .collect()
}

fn resolve_alias<'a>(
    table: &'a KeyAliases,
    latest: &'a LanguageFile,
    old_key: &str,
) -> Option<(&'a str, &'a str)> {
    table
        .targets(old_key)
        .iter()
        .find_map(|new_key| latest.get(new_key).map(|value| (new_key.as_str(), value)))
}
