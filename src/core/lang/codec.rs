// ─── Language File Codec ───
// Reads and writes the two on-disk dialects: legacy `.lang` text and JSON.

use std::collections::BTreeMap;

use tracing::warn;

use super::model::{LangDialect, LanguageCode, LanguageFile};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid JSON language file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("key {key:?} cannot be written as a .lang line")]
    UnencodableKey { key: String },
    #[error("value of {key:?} contains a line break")]
    UnencodableValue { key: String },
}

/// Parse file contents in the given dialect.
pub fn parse(
    language: LanguageCode,
    dialect: LangDialect,
    text: &str,
) -> Result<LanguageFile, CodecError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let pairs = match dialect {
        LangDialect::Legacy => parse_legacy(text),
        LangDialect::Json => serde_json::from_str::<BTreeMap<String, String>>(text)?
            .into_iter()
            .collect(),
    };
    Ok(LanguageFile::from_pairs(language, dialect, pairs))
}

/// Legacy grammar: blank lines and `#` comments are skipped, everything
/// else is split at the first `=` with both sides trimmed. Lines the client
/// would not load either (no `=`, empty key) are skipped with a warning.
fn parse_legacy(text: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            warn!("Skipping .lang line {}: no `=` separator", idx + 1);
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            warn!("Skipping .lang line {}: empty key", idx + 1);
            continue;
        }
        pairs.push((key.to_string(), value.trim().to_string()));
    }
    pairs
}

/// Render a file in its own dialect.
///
/// Legacy output keeps entry order and writes values verbatim; JSON output
/// is key-sorted with two-space indentation.
pub fn render(file: &LanguageFile) -> Result<String, CodecError> {
    match file.dialect() {
        LangDialect::Legacy => render_legacy(file),
        LangDialect::Json => {
            let sorted: BTreeMap<&str, &str> = file
                .entries()
                .iter()
                .map(|entry| (entry.key.as_str(), entry.value.as_str()))
                .collect();
            Ok(serde_json::to_string_pretty(&sorted)?)
        }
    }
}

fn render_legacy(file: &LanguageFile) -> Result<String, CodecError> {
    let mut out = String::new();
    for entry in file.entries() {
        if entry.key.is_empty() || entry.key.contains(['=', '\n', '\r']) {
            return Err(CodecError::UnencodableKey {
                key: entry.key.clone(),
            });
        }
        if entry.value.contains(['\n', '\r']) {
            return Err(CodecError::UnencodableValue {
                key: entry.key.clone(),
            });
        }
        out.push_str(&entry.key);
        out.push('=');
        out.push_str(&entry.value);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(pairs: &[(&str, &str)]) -> LanguageFile {
        LanguageFile::from_pairs(
            LanguageCode::ZhCn,
            LangDialect::Legacy,
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn legacy_parse_skips_comments_and_trims() {
        let text = "\u{feff}# header\n\nitem.diamond.name = 钻石 \ngui.done=完成=OK\n";
        let file = parse(LanguageCode::ZhCn, LangDialect::Legacy, text).unwrap();
        assert_eq!(file.len(), 2);
        assert_eq!(file.get("item.diamond.name"), Some("钻石"));
        assert_eq!(file.get("gui.done"), Some("完成=OK"));
    }

    #[test]
    fn legacy_parse_skips_lines_without_separator() {
        let text = "a=1\nstray line without separator\nb=2\n";
        let file = parse(LanguageCode::ZhCn, LangDialect::Legacy, text).unwrap();
        assert_eq!(file.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(file.get("b"), Some("2"));
    }

    #[test]
    fn legacy_parse_skips_empty_keys() {
        let file = parse(LanguageCode::ZhCn, LangDialect::Legacy, "=value\nc=3\n").unwrap();
        assert_eq!(file.len(), 1);
        assert_eq!(file.get("c"), Some("3"));
    }

    #[test]
    fn json_parse_requires_string_values() {
        let err = parse(LanguageCode::ZhTw, LangDialect::Json, r#"{"a": 1}"#).unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }

    #[test]
    fn legacy_render_keeps_order_and_placeholders() {
        let file = legacy(&[("z.key", "%s 个"), ("a.key", "a=b")]);
        assert_eq!(render(&file).unwrap(), "z.key=%s 个\na.key=a=b\n");
    }

    #[test]
    fn legacy_render_rejects_line_breaks() {
        let file = legacy(&[("a", "line\nbreak")]);
        assert!(matches!(
            render(&file),
            Err(CodecError::UnencodableValue { .. })
        ));
    }

    #[test]
    fn json_render_is_sorted_and_escaped() {
        let file = LanguageFile::from_pairs(
            LanguageCode::ZhCn,
            LangDialect::Json,
            [
                ("b".to_string(), "say \"hi\"\n".to_string()),
                ("a".to_string(), "钻石".to_string()),
            ],
        );
        let text = render(&file).unwrap();
        assert_eq!(text, "{\n  \"a\": \"钻石\",\n  \"b\": \"say \\\"hi\\\"\\n\"\n}");
    }
}
