use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("input file '{}' is not valid UTF-8", .0.display())]
    NotUtf8(PathBuf),
    #[error("expected {expected} header lines, file has {found}")]
    MissingHeader { expected: usize, found: usize },
    #[error("line {line}: needs at least {needed} columns, found {found}")]
    ShortRow { line: usize, needed: usize, found: usize },
    #[error("line {line}: could not parse timestamp '{value}'")]
    BadTimestamp { line: usize, value: String },
}

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
