use serde::{Deserialize, Serialize};

use crate::core::error::PackResult;
use crate::core::version::VersionBucket;

/// `pack.mcmeta`, the file the client reads to accept or reject a pack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackMcmeta {
    pub pack: PackSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackSection {
    pub pack_format: u32,
    pub description: String,
}

impl PackMcmeta {
    pub fn for_bucket(bucket: &VersionBucket, source_version: Option<&str>) -> Self {
        let description = match source_version {
            Some(version) => format!("{}\nTranslations from {}", bucket.description, version),
            None => bucket.description.to_string(),
        };
        Self {
            pack: PackSection {
                pack_format: bucket.pack_format,
                description,
            },
        }
    }

    pub fn to_json(&self) -> PackResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::version::lookup;

    #[test]
    fn manifest_carries_bucket_pack_format() {
        let bucket = lookup("1.17.1").unwrap();
        let json = PackMcmeta::for_bucket(bucket, Some("1.21.4")).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["pack"]["pack_format"], 7);
        assert!(value["pack"]["description"]
            .as_str()
            .unwrap()
            .ends_with("Translations from 1.21.4"));
    }

    #[test]
    fn description_without_source_version_is_the_bucket_text() {
        let bucket = lookup("1.7.10").unwrap();
        let manifest = PackMcmeta::for_bucket(bucket, None);
        assert_eq!(manifest.pack.description, bucket.description);
        assert_eq!(manifest.pack.pack_format, 1);
    }
}
