//! Error types for word-deck-core.

use thiserror::Error;

/// Result type alias using DeckError.
pub type Result<T> = std::result::Result<T, DeckError>;

/// Errors raised while building a study set or deck settings.
///
/// The state machines themselves never fail: missing data degrades to an
/// empty slot or a bare card face.
#[derive(Debug, Error, PartialEq)]
pub enum DeckError {
    #[error("duplicate word {word} at index {index}")]
    DuplicateWord { word: String, index: usize },

    #[error("empty word at index {index}")]
    EmptyWord { index: usize },

    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}
