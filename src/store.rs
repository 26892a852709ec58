//! Append-only word storage and the substring references that label trie edges.
//!
//! Edge labels never own characters. A [`SubstrRef`] names a byte range inside
//! one stored word, so a label costs 8 bytes no matter how long it is.

/// Longest word (in bytes) a [`SubstrRef`] can address with 16-bit offsets.
pub const MAX_WORD_LEN: usize = u16::MAX as usize + 1;

/// Stable position of a word in the [`WordStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordId(u32);

impl WordId {
    #[inline]
    pub(crate) fn new(idx: usize) -> Self {
        debug_assert!(idx <= u32::MAX as usize);
        Self(idx as u32)
    }

    /// Position of the word in insertion order.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Inclusive byte range `[start, end]` of one stored word.
///
/// Offsets always sit on `char` boundaries: every split point is produced by
/// [`common_prefix_len`], which only ever counts whole characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubstrRef {
    word: WordId,
    start: u16,
    end: u16,
}

impl SubstrRef {
    /// Builds a reference. Panics if `start > end`.
    pub fn new(word: WordId, start: usize, end: usize) -> Self {
        assert!(
            start <= end && end < MAX_WORD_LEN,
            "malformed substring reference: {start}..={end}"
        );
        Self {
            word,
            start: start as u16,
            end: end as u16,
        }
    }

    /// Reference covering `len` bytes of `word` from `start`. `len` must be non-zero.
    #[inline]
    pub fn span(word: WordId, start: usize, len: usize) -> Self {
        assert!(len > 0, "empty substring reference at {start}");
        Self::new(word, start, start + len - 1)
    }

    #[inline]
    pub fn word(self) -> WordId {
        self.word
    }

    #[inline]
    pub fn start(self) -> usize {
        self.start as usize
    }

    /// Inclusive end offset.
    #[inline]
    pub fn end(self) -> usize {
        self.end as usize
    }

    /// Label length in bytes (never zero).
    #[inline]
    pub fn len(self) -> usize {
        self.end() - self.start() + 1
    }

    /// Splits after the first `at` bytes into `(head, tail)`, both non-empty.
    pub fn split_at(self, at: usize) -> (SubstrRef, SubstrRef) {
        assert!(
            at > 0 && at < self.len(),
            "split offset {at} outside label of length {}",
            self.len()
        );
        let head = Self::new(self.word, self.start(), self.start() + at - 1);
        let tail = Self::new(self.word, self.start() + at, self.end());
        (head, tail)
    }
}

/// Byte length of the longest common prefix of `a` and `b`, counted in whole
/// characters so the result is a char boundary in both strings.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum()
}

/// Ordered, append-only list of distinct normalized words.
#[derive(Clone, Default)]
pub struct WordStore {
    words: Vec<String>,
}

impl WordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: Vec::with_capacity(capacity),
        }
    }

    /// Appends `word` and returns its stable id.
    pub fn push(&mut self, word: String) -> WordId {
        let id = WordId::new(self.words.len());
        self.words.push(word);
        id
    }

    #[inline]
    pub fn get(&self, id: WordId) -> &str {
        &self.words[id.index()]
    }

    /// Borrows exactly the characters `r` refers to.
    #[inline]
    pub fn materialize(&self, r: SubstrRef) -> &str {
        let word = self.get(r.word());
        assert!(
            r.end() < word.len(),
            "substring reference {r:?} past end of {word:?}"
        );
        &word[r.start()..=r.end()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.words.iter().map(String::as_str)
    }

    pub fn heap_bytes(&self) -> usize {
        self.words.capacity() * std::mem::size_of::<String>()
            + self.words.iter().map(String::capacity).sum::<usize>()
    }

    pub fn shrink_to_fit(&mut self) {
        self.words.shrink_to_fit();
    }
}
