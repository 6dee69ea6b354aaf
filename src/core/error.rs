use std::path::PathBuf;
use thiserror::Error;

use crate::core::lang::{CodecError, LanguageCode};

/// Central error type for the pack builder.
/// Every module returns `Result<T, PackError>`.
#[derive(Debug, Error)]
pub enum PackError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error at {path:?} for {language} in bucket {bucket}: {source}")]
    TargetIo {
        bucket: String,
        language: LanguageCode,
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Registry ────────────────────────────────────────
    #[error("Unsupported Minecraft version: {0}")]
    UnsupportedVersion(String),

    // ── Corpus ──────────────────────────────────────────
    #[error("Cannot read {language} corpus file {path:?}{}: {reason}", bucket_suffix(.bucket))]
    CorpusRead {
        bucket: Option<String>,
        language: LanguageCode,
        path: PathBuf,
        reason: String,
    },

    #[error("No mapped {language} file for bucket {bucket} at {path:?}, run the map step first")]
    MappingMissing {
        bucket: String,
        language: LanguageCode,
        path: PathBuf,
    },

    // ── Dialects ────────────────────────────────────────
    #[error("Cannot serialize {language} for bucket {bucket}: {source}")]
    Serialization {
        bucket: String,
        language: LanguageCode,
        source: CodecError,
    },

    // ── Archive ─────────────────────────────────────────
    #[error("Cannot write archive {path:?} for bucket {bucket}: {source}")]
    ArchiveWrite {
        bucket: String,
        path: PathBuf,
        source: zip::result::ZipError,
    },

    // ── Settings ────────────────────────────────────────
    #[error("Invalid settings file {path:?}: {reason}")]
    Settings { path: PathBuf, reason: String },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type PackResult<T> = Result<T, PackError>;

fn bucket_suffix(bucket: &Option<String>) -> String {
    match bucket {
        Some(id) => format!(" (bucket {id})"),
        None => String::new(),
    }
}

impl PackError {
    /// The language the error is scoped to, if any.
    pub fn language(&self) -> Option<LanguageCode> {
        match self {
            PackError::CorpusRead { language, .. }
            | PackError::MappingMissing { language, .. }
            | PackError::TargetIo { language, .. }
            | PackError::Serialization { language, .. } => Some(*language),
            _ => None,
        }
    }
}
