//! Construction-time settings for [`CompactTrie`](crate::CompactTrie).

use crate::store::MAX_WORD_LEN;

/// Configuration for a [`CompactTrie`](crate::CompactTrie).
#[derive(Debug, Clone)]
pub struct Config {
    /// Initial capacity hint for the number of words
    pub initial_capacity: usize,
    /// Longest accepted word in bytes, after normalization. Values above
    /// [`MAX_WORD_LEN`] are clamped to it.
    pub max_word_len: usize,
}

impl Config {
    /// The length limit actually enforced.
    #[inline]
    pub fn effective_max_word_len(&self) -> usize {
        self.max_word_len.min(MAX_WORD_LEN)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            max_word_len: MAX_WORD_LEN,
        }
    }
}
