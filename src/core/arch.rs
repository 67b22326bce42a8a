//! Target architecture tracking

use std::collections::BTreeSet;
use std::sync::RwLock;

/// Set of CPU architectures a step builds for.
///
/// Only grows. Readers and writers may live on different threads, so
/// every access goes through the lock.
#[derive(Debug, Default)]
pub struct ArchitectureSet {
    inner: RwLock<BTreeSet<String>>,
}

impl ArchitectureSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert architectures, ignoring ones already present
    pub fn insert<I, S>(&self, archs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = self.inner.write().unwrap_or_else(|e| e.into_inner());
        set.extend(archs.into_iter().map(Into::into));
    }

    /// Snapshot of the current contents
    pub fn snapshot(&self) -> BTreeSet<String> {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Current contents in sorted order
    pub fn to_vec(&self) -> Vec<String> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
