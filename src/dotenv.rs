//! Reading and writing `.env` files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::Entry;

pub const ENV_FILENAME: &str = ".env";

/// Parse one `.env` line into a `(name, value)` pair.
///
/// Blank lines, `#` comments, lines without `=` and lines with an empty name
/// yield `None`. A leading `export ` is accepted, both sides are trimmed and
/// one pair of matching surrounding quotes is removed from the value.
pub fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let line = line.strip_prefix("export ").unwrap_or(line);
    let (name, value) = line.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    Some((name.to_string(), strip_quotes(value.trim()).to_string()))
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parse a whole `.env` document, skipping lines that carry no assignment.
pub fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    content.lines().filter_map(parse_line).collect()
}

/// `NAME=VALUE` per entry, each line newline-terminated.
pub fn render_dotenv(entries: &[Entry]) -> String {
    entries.iter().map(|entry| format!("{}\n", entry.as_assignment())).collect()
}

/// Write `entries` to `<dir>/.env`, replacing any existing file, and return its path.
pub fn write_env_file(dir: &Path, entries: &[Entry]) -> Result<PathBuf> {
    let path = dir.join(ENV_FILENAME);
    fs::write(&path, render_dotenv(entries))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn pair(name: &str, value: &str) -> Option<(String, String)> {
        Some((name.to_string(), value.to_string()))
    }

    #[test]
    fn test_parse_plain_assignment() {
        assert_eq!(parse_line("API_KEY=sk-123"), pair("API_KEY", "sk-123"));
    }

    #[test]
    fn test_parse_export_prefix_and_whitespace() {
        assert_eq!(parse_line("  export  TOKEN = abc  "), pair("TOKEN", "abc"));
    }

    #[test]
    fn test_parse_strips_matching_quotes() {
        assert_eq!(parse_line(r#"A="quoted value""#), pair("A", "quoted value"));
        assert_eq!(parse_line("B='single'"), pair("B", "single"));
    }

    #[test]
    fn test_parse_keeps_mismatched_quotes() {
        assert_eq!(parse_line(r#"A="half'"#), pair("A", r#""half'"#));
        assert_eq!(parse_line(r#"B=""#), pair("B", r#"""#));
    }

    #[test]
    fn test_parse_splits_at_first_equals() {
        assert_eq!(parse_line("URL=a=b=c"), pair("URL", "a=b=c"));
    }

    #[test]
    fn test_parse_skips_noise() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("# comment=1"), None);
        assert_eq!(parse_line("NO_EQUALS"), None);
        assert_eq!(parse_line("=value"), None);
    }

    #[test]
    fn test_parse_empty_value_is_kept() {
        assert_eq!(parse_line("EMPTY="), pair("EMPTY", ""));
    }

    #[test]
    fn test_parse_dotenv_document() {
        let content = "# header\nA=1\n\nexport B=\"2\"\r\ngarbage\nC=3";
        let pairs = parse_dotenv(content);

        assert_eq!(
            pairs,
            vec![
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "2".to_string()),
                ("C".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_write_env_file() {
        let tmp = TempDir::new().unwrap();
        let entries = vec![Entry::new("A", "1", 0), Entry::new("B", "two words", 0)];

        let path = write_env_file(tmp.path(), &entries).unwrap();
        assert_eq!(path, tmp.path().join(".env"));
        assert_eq!(fs::read_to_string(path).unwrap(), "A=1\nB=two words\n");
    }
}
