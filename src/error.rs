//! Error types for compact-trie

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons an insertion is refused. The trie is left untouched in every case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The word was empty after trimming and case folding
    #[error("word is empty after normalization")]
    EmptyWord,

    /// The word exceeds the configured length limit
    #[error("word is {len} bytes long, limit is {max}")]
    WordTooLong { len: usize, max: usize },

    /// No more word ids can be handed out
    #[error("word store is full ({len} words)")]
    StoreFull { len: usize },
}
