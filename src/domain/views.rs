use std::collections::BTreeMap;

/// View counters keyed by post id (`postViews/<id>`).
///
/// Owned by whoever renders; pass it in rather than keeping a global cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewLedger {
    counts: BTreeMap<String, u64>,
}

impl ViewLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counts(counts: BTreeMap<String, u64>) -> Self {
        Self { counts }
    }

    pub fn views(&self, id: &str) -> u64 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Counts one article page load; returns the new total.
    pub fn record_view(&mut self, id: &str) -> u64 {
        let count = self.counts.entry(id.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Drops the counter of a deleted post.
    pub fn forget(&mut self, id: &str) -> Option<u64> {
        self.counts.remove(id)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().fold(0u64, |acc, n| acc.saturating_add(*n))
    }

    pub fn into_counts(self) -> BTreeMap<String, u64> {
        self.counts
    }
}
