//! # compact-trie
//!
//! A compressed (radix) trie for prefix completion. Edge labels are
//! [`SubstrRef`]s into an append-only word store, so indexing a word never
//! copies characters that are already stored.
//!
//! ## Example
//!
//! ```rust
//! use compact_trie::CompactTrie;
//!
//! let mut trie = CompactTrie::new();
//! for word in ["bear", "bull", "stock", "bell"] {
//!     trie.insert(word).unwrap();
//! }
//!
//! let mut words = trie.query("Be");
//! words.sort();
//! assert_eq!(words, ["bear", "bell"]);
//! assert!(trie.query("x").is_empty());
//! ```
//!
//! Words and prefixes are trimmed and lowercased before use. The order of
//! completions is unspecified.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod node;
pub mod shared;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use shared::SharedTrie;
pub use store::{SubstrRef, WordId, MAX_WORD_LEN};

use std::fmt;

use tracing::{debug, trace};

use node::{Node, NodeArena, NodeId};
use store::{common_prefix_len, WordStore};

// =============================================================================
// Normalization
// =============================================================================

/// Folds case and trims surrounding whitespace. Applied to every inserted word
/// and every queried prefix.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Ids are `u32`, so at most this many words or nodes can exist.
const ID_SPACE: u64 = u32::MAX as u64 + 1;

/// Whether one more word fits: it takes one store slot and at most two nodes.
#[inline]
fn has_room(word_count: usize, node_count: usize) -> bool {
    (word_count as u64) < ID_SPACE && node_count as u64 + 2 <= ID_SPACE
}

// =============================================================================
// Insertion placement
// =============================================================================

/// Where a new word goes, decided before anything is mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placement {
    /// `parent` has no children; the suffix from `start` becomes its first child.
    Child { parent: NodeId, start: usize },
    /// No child shares a first character; append after `last`.
    Sibling { last: NodeId, start: usize },
    /// `node`'s label diverges from the word after `shared` bytes.
    Split {
        node: NodeId,
        label: SubstrRef,
        shared: usize,
        start: usize,
    },
    /// The word ends exactly on the existing branch `node`.
    Terminus { node: NodeId },
    /// The word is already indexed.
    Duplicate(WordId),
}

// =============================================================================
// CompactTrie
// =============================================================================

/// Compressed prefix index over a growing set of words.
///
/// Nodes live in an arena and are linked first-child / next-sibling. Sibling
/// labels always differ at their first character, and every indexed word ends
/// at exactly one node (its terminus), which may itself have children when the
/// word is a prefix of another.
#[derive(Clone)]
pub struct CompactTrie {
    words: WordStore,
    nodes: NodeArena,
    max_word_len: usize,
}

impl CompactTrie {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            words: WordStore::with_capacity(config.initial_capacity),
            // A word adds at most two nodes.
            nodes: NodeArena::with_capacity(config.initial_capacity.saturating_mul(2)),
            max_word_len: config.effective_max_word_len(),
        }
    }

    /// Number of distinct indexed words.
    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of trie nodes, including the synthetic root.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn memory_usage(&self) -> usize {
        self.words.heap_bytes() + self.nodes.heap_bytes()
    }

    pub fn shrink_to_fit(&mut self) {
        self.words.shrink_to_fit();
        self.nodes.shrink_to_fit();
    }

    /// Indexed words in insertion order.
    pub fn words(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.words.iter()
    }

    #[inline]
    fn label(&self, id: NodeId) -> &str {
        self.nodes[id]
            .label
            .map_or("", |r| self.words.materialize(r))
    }

    /// Inserts `word` after normalizing it.
    ///
    /// Returns `Ok(true)` if the word was added and `Ok(false)` if it was
    /// already indexed. On error nothing is changed.
    pub fn insert(&mut self, word: &str) -> Result<bool> {
        let word = normalize(word);
        if word.is_empty() {
            debug!("rejecting empty word");
            return Err(Error::EmptyWord);
        }
        if word.len() > self.max_word_len {
            debug!(len = word.len(), max = self.max_word_len, "rejecting long word");
            return Err(Error::WordTooLong {
                len: word.len(),
                max: self.max_word_len,
            });
        }
        if !has_room(self.words.len(), self.nodes.len()) {
            debug!(words = self.words.len(), nodes = self.nodes.len(), "id space exhausted");
            return Err(Error::StoreFull {
                len: self.words.len(),
            });
        }

        let placement = self.locate(&word);
        if let Placement::Duplicate(id) = placement {
            debug!(word = %word, id = id.index(), "word already indexed");
            return Ok(false);
        }

        let word_len = word.len();
        let id = self.words.push(word);
        self.apply(placement, id, word_len);
        Ok(true)
    }

    /// Walks down from the root to find where `word` belongs.
    ///
    /// At each level the first child sharing a non-empty prefix with the
    /// unmatched rest of the word is followed. Siblings differ at their first
    /// character, so there is at most one such child.
    fn locate(&self, word: &str) -> Placement {
        let mut parent = NodeId::ROOT;
        let mut start = 0;

        'descend: loop {
            let rest = &word[start..];
            let mut last = None;

            for child in self.nodes.children(parent) {
                let label_ref = self.nodes[child]
                    .label
                    .expect("non-root node without label");
                let label = self.words.materialize(label_ref);
                let shared = common_prefix_len(label, rest);

                if shared == 0 {
                    last = Some(child);
                    continue;
                }
                if shared < label.len() {
                    return Placement::Split {
                        node: child,
                        label: label_ref,
                        shared,
                        start: start + shared,
                    };
                }

                start += shared;
                if start == word.len() {
                    return match self.nodes[child].word {
                        Some(id) => Placement::Duplicate(id),
                        None => Placement::Terminus { node: child },
                    };
                }
                parent = child;
                continue 'descend;
            }

            return match last {
                Some(last) => Placement::Sibling { last, start },
                None => Placement::Child { parent, start },
            };
        }
    }

    /// Performs the single structural change `placement` calls for. `id` is
    /// the freshly stored word, `word_len` its length in bytes.
    fn apply(&mut self, placement: Placement, id: WordId, word_len: usize) {
        let suffix = |start: usize| SubstrRef::span(id, start, word_len - start);

        match placement {
            Placement::Child { parent, start } => {
                debug_assert!(self.nodes[parent].is_leaf());
                let child = self.nodes.push(Node::leaf(suffix(start), id));
                self.nodes[parent].first_child = Some(child);
                trace!(?parent, ?child, start, "new first child");
            }
            Placement::Sibling { last, start } => {
                debug_assert!(self.nodes[last].next_sibling.is_none());
                let sibling = self.nodes.push(Node::leaf(suffix(start), id));
                self.nodes[last].next_sibling = Some(sibling);
                trace!(?last, ?sibling, start, "new sibling");
            }
            Placement::Split {
                node,
                label,
                shared,
                start,
            } => {
                // Offsets are validated here, before the tree is touched.
                let (head, tail) = label.split_at(shared);
                let fresh = (start < word_len).then(|| suffix(start));

                let old = &self.nodes[node];
                let moved = Node {
                    label: Some(tail),
                    first_child: old.first_child,
                    next_sibling: None,
                    word: old.word,
                };
                let moved = self.nodes.push(moved);
                if let Some(fresh) = fresh {
                    let fresh = self.nodes.push(Node::leaf(fresh, id));
                    self.nodes[moved].next_sibling = Some(fresh);
                }

                let split = &mut self.nodes[node];
                split.label = Some(head);
                split.first_child = Some(moved);
                split.word = fresh.is_none().then_some(id);
                trace!(?node, shared, start, "split edge");
            }
            Placement::Terminus { node } => {
                self.nodes[node].word = Some(id);
                trace!(?node, "branch marked as word");
            }
            Placement::Duplicate(_) => unreachable!("duplicates are filtered before apply"),
        }
    }

    /// Finds the node whose subtree holds exactly the words starting with
    /// `prefix` (already normalized). The empty prefix resolves to the root.
    fn resolve(&self, prefix: &str) -> Option<NodeId> {
        if prefix.is_empty() {
            return Some(NodeId::ROOT);
        }

        let mut node = self.nodes.first_child(NodeId::ROOT)?;
        let mut rest = prefix;
        loop {
            let label = self.label(node);
            let matched = common_prefix_len(label, rest);
            if matched == rest.len() {
                return Some(node);
            }
            if matched == label.len() {
                rest = &rest[matched..];
                node = self.nodes.first_child(node)?;
            } else {
                node = self.nodes.next_sibling(node)?;
            }
        }
    }

    /// Iterates over every indexed word starting with `prefix`.
    ///
    /// An empty prefix yields every word. No match yields nothing.
    pub fn completions(&self, prefix: &str) -> Completions<'_> {
        let prefix = normalize(prefix);
        Completions {
            trie: self,
            stack: self.resolve(&prefix).into_iter().collect(),
        }
    }

    /// Completion list for `prefix`; empty when nothing matches.
    pub fn query(&self, prefix: &str) -> Vec<&str> {
        self.completions(prefix).collect()
    }

    /// Id of `word` if it is indexed.
    pub fn position(&self, word: &str) -> Option<WordId> {
        let word = normalize(word);
        if word.is_empty() {
            return None;
        }
        match self.locate(&word) {
            Placement::Duplicate(id) => Some(id),
            _ => None,
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.position(word).is_some()
    }

    /// Indented dump of the node tree, one node per line:
    /// the label, its `(word, start, end)` reference, and `*` on terminus nodes.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Default for CompactTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CompactTrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.words()).finish()
    }
}

impl fmt::Display for CompactTrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "(root)")?;

        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        let push_children = |stack: &mut Vec<(NodeId, usize)>, id: NodeId, depth: usize| {
            let mark = stack.len();
            stack.extend(self.nodes.children(id).map(|child| (child, depth)));
            stack[mark..].reverse();
        };

        push_children(&mut stack, NodeId::ROOT, 0);
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id];
            write!(f, "{:indent$}+-- {}", "", self.label(id), indent = depth * 4)?;
            if let Some(r) = node.label {
                write!(f, " ({}, {}, {})", r.word().index(), r.start(), r.end())?;
            }
            if node.word.is_some() {
                write!(f, " *")?;
            }
            writeln!(f)?;
            push_children(&mut stack, id, depth + 1);
        }
        Ok(())
    }
}

/// Depth-first walk over one subtree, yielding the word of every terminus.
pub struct Completions<'a> {
    trie: &'a CompactTrie,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Completions<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            self.stack.extend(self.trie.nodes.children(id));
            if let Some(word) = self.trie.nodes[id].word {
                return Some(self.trie.words.get(word));
            }
        }
        None
    }
}


#[cfg(test)]
mod proptests;
