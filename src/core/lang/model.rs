use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Supported locales, strongly typed, no magic strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LanguageCode {
    ZhCn,
    ZhHk,
    ZhTw,
    Lzh,
    /// English source text. Read for review reports, never packed.
    EnUs,
}

impl LanguageCode {
    /// Every packable locale.
    pub const ALL: [LanguageCode; 4] = [
        LanguageCode::ZhCn,
        LanguageCode::ZhHk,
        LanguageCode::ZhTw,
        LanguageCode::Lzh,
    ];

    /// Canonical lower-case code, as used by the upstream corpus.
    pub fn code(self) -> &'static str {
        match self {
            LanguageCode::ZhCn => "zh_cn",
            LanguageCode::ZhHk => "zh_hk",
            LanguageCode::ZhTw => "zh_tw",
            LanguageCode::Lzh => "lzh",
            LanguageCode::EnUs => "en_us",
        }
    }

    /// File stem for a given naming convention (`zh_CN` vs `zh_cn`).
    pub fn file_stem(self, case: LangCase) -> &'static str {
        match (self, case) {
            (LanguageCode::ZhCn, LangCase::Upper) => "zh_CN",
            (LanguageCode::ZhHk, LangCase::Upper) => "zh_HK",
            (LanguageCode::ZhTw, LangCase::Upper) => "zh_TW",
            (LanguageCode::EnUs, LangCase::Upper) => "en_US",
            (code, _) => code.code(),
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Case of the region part of language file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LangCase {
    /// `zh_CN`, used up to 1.10.
    Upper,
    /// `zh_cn`, used from 1.11 on.
    Lower,
}

/// On-disk text format of a language file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LangDialect {
    /// `key=value` lines, order-sensitive.
    Legacy,
    /// Key-sorted JSON object.
    Json,
}

impl LangDialect {
    pub fn extension(self) -> &'static str {
        match self {
            LangDialect::Legacy => "lang",
            LangDialect::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    pub key: String,
    pub value: String,
}

/// Ordered translations for one language in one dialect.
///
/// Keys are unique: inserting an existing key replaces its value but keeps
/// the position of the first occurrence.
#[derive(Debug, Clone)]
pub struct LanguageFile {
    language: LanguageCode,
    dialect: LangDialect,
    entries: Vec<TranslationEntry>,
    index: HashMap<String, usize>,
}

impl LanguageFile {
    pub fn new(language: LanguageCode, dialect: LangDialect) -> Self {
        Self {
            language,
            dialect,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn from_pairs<I>(language: LanguageCode, dialect: LangDialect, pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut file = Self::new(language, dialect);
        for (key, value) in pairs {
            file.insert(key, value);
        }
        file
    }

    pub fn language(&self) -> LanguageCode {
        self.language
    }

    pub fn dialect(&self) -> LangDialect {
        self.dialect
    }

    pub fn insert(&mut self, key: String, value: String) {
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].value = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(TranslationEntry { key, value });
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn entries(&self) -> &[TranslationEntry] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reorder entries by key (byte order).
    pub fn sort_by_key(&mut self) {
        self.entries.sort_by(|a, b| a.key.cmp(&b.key));
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, entry)| (entry.key.clone(), pos))
            .collect();
    }
}
