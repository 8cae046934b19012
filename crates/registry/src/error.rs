/// Errors from registry payload parsing and dimension lookup.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry payload is missing `{0}`")]
    MissingKey(String),
    #[error("`{key}` has unexpected type: expected {expected}, found {found}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("expected a compound holding `{child}`, found {found}")]
    NotACompound { child: String, found: &'static str },
    #[error("`{key}` is out of range: {value}")]
    OutOfRange { key: String, value: i64 },
    #[error("dimension not found: {0}")]
    DimensionNotFound(String),
    #[error("unsupported payload value at `{0}`")]
    UnsupportedValue(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
