// Formatting utilities

use serde::Serialize;

/// Truncate string to max characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len.saturating_sub(3)).collect::<String>())
    }
}

/// Pretty-print a value as JSON with four-space indentation
pub fn pretty_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Wrap JSON in a code block, keeping the whole block within `max_len` characters
pub fn json_code_block(json: &str, max_len: usize) -> String {
    const OPEN: &str = "```json\n";
    const CLOSE: &str = "```";
    let budget = max_len.saturating_sub(OPEN.len() + CLOSE.len());
    format!("{}{}{}", OPEN, truncate(json, budget), CLOSE)
}

/// Comma separated list of inline-code names
pub fn code_list(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("`{}`", n))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("設定設定設定", 5), "設定...");
    }

    #[test]
    fn test_pretty_json() {
        assert_eq!(pretty_json(&json!({ "a": 1 })).unwrap(), "{\n    \"a\": 1\n}");
    }

    #[test]
    fn test_json_code_block_respects_limit() {
        let long = "x".repeat(5000);
        let block = json_code_block(&long, 100);
        assert!(block.chars().count() <= 100);
        assert!(block.starts_with("```json\n"));
        assert!(block.ends_with("```"));
    }

    #[test]
    fn test_code_list() {
        assert_eq!(code_list(&["embed_links", "add_reactions"]), "`embed_links`, `add_reactions`");
        assert_eq!(code_list(&[]), "");
    }
}
