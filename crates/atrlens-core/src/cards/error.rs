use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardListError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid ATR pattern at line {line}: {message}")]
    Pattern { line: usize, message: String },
}
