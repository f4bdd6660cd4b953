use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read parameters file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse parameters file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid parameter `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum CarouselError {
    #[error("carousel needs at least one item")]
    Empty,
}
