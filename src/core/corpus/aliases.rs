use std::collections::HashMap;

use serde::Deserialize;

/// Explicit rename table: legacy key → one or more current keys.
///
/// Loaded from `data/mapping.json`, e.g.
/// `{"tile.stone.name": "block.minecraft.stone",
///   "item.record.name": ["item.minecraft.music_disc_13", "item.minecraft.music_disc_cat"]}`.
#[derive(Debug, Clone, Default)]
pub struct KeyAliases {
    targets: HashMap<String, Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AliasTarget {
    One(String),
    Many(Vec<String>),
}

impl KeyAliases {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, AliasTarget> = serde_json::from_str(text)?;
        let targets = raw
            .into_iter()
            .map(|(old_key, target)| {
                let new_keys = match target {
                    AliasTarget::One(key) => vec![key],
                    AliasTarget::Many(keys) => keys,
                };
                (old_key, new_keys)
            })
            .collect();
        Ok(Self { targets })
    }

    /// Current keys registered for a legacy key, in table order.
    pub fn targets(&self, old_key: &str) -> &[String] {
        self.targets.get(old_key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_single_and_list_targets() {
        let aliases = KeyAliases::from_json(
            r#"{"tile.stone.name": "block.minecraft.stone",
                "item.record.name": ["a", "b"]}"#,
        )
        .unwrap();
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases.targets("tile.stone.name"), ["block.minecraft.stone"]);
        assert_eq!(aliases.targets("item.record.name"), ["a", "b"]);
        assert!(aliases.targets("missing").is_empty());
    }

    #[test]
    fn rejects_non_string_targets() {
        assert!(KeyAliases::from_json(r#"{"a": 1}"#).is_err());
    }
}
