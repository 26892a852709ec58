//! A cloneable handle that puts one lock around a [`CompactTrie`].
//!
//! The trie itself has no internal synchronization. Every call here takes the
//! lock for its full duration: writes for `insert`, reads for queries.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{CompactTrie, Config, Result};

#[derive(Clone, Default)]
pub struct SharedTrie {
    inner: Arc<RwLock<CompactTrie>>,
}

impl SharedTrie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self::from(CompactTrie::with_config(config))
    }

    /// See [`CompactTrie::insert`].
    pub fn insert(&self, word: &str) -> Result<bool> {
        self.inner.write().insert(word)
    }

    /// Owned completion list, since results cannot outlive the read lock.
    pub fn query(&self, prefix: &str) -> Vec<String> {
        let trie = self.inner.read();
        trie.completions(prefix).map(str::to_owned).collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.inner.read().contains(word)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Holds the read lock for a batch of queries.
    pub fn read(&self) -> RwLockReadGuard<'_, CompactTrie> {
        self.inner.read()
    }

    /// Holds the write lock for a batch of inserts.
    ///
    /// Any other call on this handle from the same thread blocks until the
    /// guard is dropped.
    pub fn write(&self) -> RwLockWriteGuard<'_, CompactTrie> {
        self.inner.write()
    }
}

impl From<CompactTrie> for SharedTrie {
    fn from(trie: CompactTrie) -> Self {
        Self {
            inner: Arc::new(RwLock::new(trie)),
        }
    }
}

impl std::fmt::Debug for SharedTrie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The lock is not reentrant; never block while formatting.
        match self.inner.try_read() {
            Some(trie) => std::fmt::Debug::fmt(&*trie, f),
            None => f.write_str("<locked>"),
        }
    }
}
