/// A stored key as seen by a single profile.
///
/// `updated_at` is a unix timestamp in seconds, or `0` when the row predates
/// timestamp tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub value: String,
    pub updated_at: i64,
}

impl Entry {
    pub fn new(name: impl Into<String>, value: impl Into<String>, updated_at: i64) -> Self {
        Self { name: name.into(), value: value.into(), updated_at }
    }

    /// `NAME=VALUE`, the line format used by `.env` files.
    pub fn as_assignment(&self) -> String {
        format!("{}={}", self.name, self.value)
    }

    /// `export NAME=VALUE`, ready to paste into a shell.
    pub fn as_export(&self) -> String {
        format!("export {}={}", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_assignment() {
        let entry = Entry::new("API_KEY", "sk-123", 0);
        assert_eq!(entry.as_assignment(), "API_KEY=sk-123");
    }

    #[test]
    fn test_as_export() {
        let entry = Entry::new("API_KEY", "sk-123", 0);
        assert_eq!(entry.as_export(), "export API_KEY=sk-123");
    }

    #[test]
    fn test_value_with_equals_sign_is_kept_verbatim() {
        let entry = Entry::new("URL", "postgres://u:p@h/db?a=b", 0);
        assert_eq!(entry.as_assignment(), "URL=postgres://u:p@h/db?a=b");
    }
}
