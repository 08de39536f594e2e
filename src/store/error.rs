use thiserror::Error;

/// Errors surfaced by the key store.
///
/// Messages are shown to the user verbatim, both on the command line and in
/// the `Error: ...` outcome of an interactive session.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key {0:?} not found")]
    NotFound(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_quotes_name() {
        let err = StoreError::NotFound("API_KEY".to_string());
        assert_eq!(err.to_string(), "key \"API_KEY\" not found");
    }
}
