// ─── Version Registry ───
// Declarative table of supported version buckets. Adding a bucket is adding
// one row to `BUCKETS`.

use crate::core::error::{PackError, PackResult};
use crate::core::lang::{LangCase, LangDialect, LanguageCode};

use super::mc_version::McVersion;

/// Where language assets live inside the pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceStyle {
    /// Pre-1.13 assets with `.lang` files.
    Flat,
    /// 1.13+ namespaced assets with `.json` files.
    Namespaced,
}

/// A supported release range sharing one resource-pack format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBucket {
    pub id: &'static str,
    pub min_version: McVersion,
    pub max_version: McVersion,
    pub namespace_style: NamespaceStyle,
    pub lang_case: LangCase,
    pub pack_format: u32,
    pub supported_languages: &'static [LanguageCode],
    pub description: &'static str,
}

const LANG_ASSET_DIR: &str = "assets/minecraft/lang";

const LANGS_BASE: &[LanguageCode] = &[LanguageCode::ZhCn, LanguageCode::ZhTw];
const LANGS_FULL: &[LanguageCode] = &[
    LanguageCode::ZhCn,
    LanguageCode::ZhHk,
    LanguageCode::ZhTw,
    LanguageCode::Lzh,
];

/// Ascending, non-overlapping.
static BUCKETS: [VersionBucket; 13] = [
    VersionBucket {
        id: "1.7.10",
        min_version: McVersion::new(1, 7, 2),
        max_version: McVersion::new(1, 7, 10),
        namespace_style: NamespaceStyle::Flat,
        lang_case: LangCase::Upper,
        pack_format: 1,
        supported_languages: LANGS_BASE,
        description: "Renovation Translation Pack for Minecraft 1.7.2-1.7.10",
    },
    VersionBucket {
        id: "1.8.9",
        min_version: McVersion::new(1, 8, 0),
        max_version: McVersion::new(1, 8, 9),
        namespace_style: NamespaceStyle::Flat,
        lang_case: LangCase::Upper,
        pack_format: 1,
        supported_languages: LANGS_BASE,
        description: "Renovation Translation Pack for Minecraft 1.8-1.8.9",
    },
    VersionBucket {
        id: "1.9.4",
        min_version: McVersion::new(1, 9, 0),
        max_version: McVersion::new(1, 9, 4),
        namespace_style: NamespaceStyle::Flat,
        lang_case: LangCase::Upper,
        pack_format: 2,
        supported_languages: LANGS_BASE,
        description: "Renovation Translation Pack for Minecraft 1.9-1.9.4",
    },
    VersionBucket {
        id: "1.10.2",
        min_version: McVersion::new(1, 10, 0),
        max_version: McVersion::new(1, 10, 2),
        namespace_style: NamespaceStyle::Flat,
        lang_case: LangCase::Upper,
        pack_format: 2,
        supported_languages: LANGS_BASE,
        description: "Renovation Translation Pack for Minecraft 1.10-1.10.2",
    },
    VersionBucket {
        id: "1.11.2",
        min_version: McVersion::new(1, 11, 0),
        max_version: McVersion::new(1, 11, 2),
        namespace_style: NamespaceStyle::Flat,
        lang_case: LangCase::Lower,
        pack_format: 3,
        supported_languages: LANGS_BASE,
        description: "Renovation Translation Pack for Minecraft 1.11-1.11.2",
    },
    VersionBucket {
        id: "1.12.2",
        min_version: McVersion::new(1, 12, 0),
        max_version: McVersion::new(1, 12, 2),
        namespace_style: NamespaceStyle::Flat,
        lang_case: LangCase::Lower,
        pack_format: 3,
        supported_languages: LANGS_BASE,
        description: "Renovation Translation Pack for Minecraft 1.12-1.12.2",
    },
    VersionBucket {
        id: "1.13.2",
        min_version: McVersion::new(1, 13, 0),
        max_version: McVersion::new(1, 13, 2),
        namespace_style: NamespaceStyle::Namespaced,
        lang_case: LangCase::Lower,
        pack_format: 4,
        supported_languages: LANGS_BASE,
        description: "Renovation Translation Pack for Minecraft 1.13-1.13.2",
    },
    VersionBucket {
        id: "1.14.4",
        min_version: McVersion::new(1, 14, 0),
        max_version: McVersion::new(1, 14, 4),
        namespace_style: NamespaceStyle::Namespaced,
        lang_case: LangCase::Lower,
        pack_format: 4,
        supported_languages: LANGS_BASE,
        description: "Renovation Translation Pack for Minecraft 1.14-1.14.4",
    },
    VersionBucket {
        id: "1.15.2",
        min_version: McVersion::new(1, 15, 0),
        max_version: McVersion::new(1, 15, 2),
        namespace_style: NamespaceStyle::Namespaced,
        lang_case: LangCase::Lower,
        pack_format: 5,
        supported_languages: LANGS_FULL,
        description: "Renovation Translation Pack for Minecraft 1.15-1.15.2",
    },
    VersionBucket {
        id: "1.16.5",
        min_version: McVersion::new(1, 16, 0),
        max_version: McVersion::new(1, 16, 5),
        namespace_style: NamespaceStyle::Namespaced,
        lang_case: LangCase::Lower,
        pack_format: 6,
        supported_languages: LANGS_FULL,
        description: "Renovation Translation Pack for Minecraft 1.16-1.16.5",
    },
    VersionBucket {
        id: "1.17.1",
        min_version: McVersion::new(1, 17, 0),
        max_version: McVersion::new(1, 17, 1),
        namespace_style: NamespaceStyle::Namespaced,
        lang_case: LangCase::Lower,
        pack_format: 7,
        supported_languages: LANGS_FULL,
        description: "Renovation Translation Pack for Minecraft 1.17-1.17.1",
    },
    VersionBucket {
        id: "1.18.2",
        min_version: McVersion::new(1, 18, 0),
        max_version: McVersion::new(1, 18, 2),
        namespace_style: NamespaceStyle::Namespaced,
        lang_case: LangCase::Lower,
        pack_format: 8,
        supported_languages: LANGS_FULL,
        description: "Renovation Translation Pack for Minecraft 1.18-1.18.2",
    },
    VersionBucket {
        id: "1.19.2",
        min_version: McVersion::new(1, 19, 0),
        max_version: McVersion::new(1, 19, 2),
        namespace_style: NamespaceStyle::Namespaced,
        lang_case: LangCase::Lower,
        pack_format: 9,
        supported_languages: LANGS_FULL,
        description: "Renovation Translation Pack for Minecraft 1.19-1.19.2",
    },
];

/// All buckets in ascending version order.
pub fn buckets() -> &'static [VersionBucket] {
    &BUCKETS
}

/// Find the bucket covering `version`, or the bucket whose id is `version`.
pub fn lookup(version: &str) -> PackResult<&'static VersionBucket> {
    if let Some(bucket) = BUCKETS.iter().find(|b| b.id == version.trim()) {
        return Ok(bucket);
    }
    let parsed: McVersion = version.parse()?;
    BUCKETS
        .iter()
        .find(|b| b.contains(parsed))
        .ok_or_else(|| PackError::UnsupportedVersion(version.to_string()))
}

/// Resolve a list of requested versions to distinct buckets in registry
/// order. An empty request selects every bucket.
pub fn select(requested: &[String]) -> PackResult<Vec<&'static VersionBucket>> {
    if requested.is_empty() {
        return Ok(BUCKETS.iter().collect());
    }
    let mut wanted = Vec::with_capacity(requested.len());
    for version in requested {
        wanted.push(lookup(version)?.id);
    }
    Ok(BUCKETS.iter().filter(|b| wanted.contains(&b.id)).collect())
}

impl VersionBucket {
    pub fn contains(&self, version: McVersion) -> bool {
        self.min_version <= version && version <= self.max_version
    }

    pub fn dialect(&self) -> LangDialect {
        match self.namespace_style {
            NamespaceStyle::Flat => LangDialect::Legacy,
            NamespaceStyle::Namespaced => LangDialect::Json,
        }
    }

    pub fn supports(&self, language: LanguageCode) -> bool {
        self.supported_languages.contains(&language)
    }

    /// Language file name, e.g. `zh_CN.lang` or `zh_cn.json`.
    pub fn lang_file_name(&self, language: LanguageCode) -> String {
        format!(
            "{}.{}",
            language.file_stem(self.lang_case),
            self.dialect().extension()
        )
    }

    /// Path of a language file inside the resource pack.
    ///
    /// Flat and namespaced packs share this path; from 1.13 on the
    /// `minecraft` directory is read as the namespace.
    pub fn lang_asset_path(&self, language: LanguageCode) -> String {
        format!("{}/{}", LANG_ASSET_DIR, self.lang_file_name(language))
    }
}
