//! Snapshot id allocation.

use std::collections::HashMap;

/// Sequential id generator scoped to one snapshot file.
///
/// Generates ids in the format `base n` (e.g. "adds numbers 1", "adds numbers 2").
/// Counters only ever grow.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    counters: HashMap<String, usize>,
}

impl IdAllocator {
    /// Create a new IdAllocator.
    pub fn new() -> Self {
        Self {
            counters: HashMap::new(),
        }
    }

    /// Generate the next id for a given base name.
    ///
    /// # Example
    /// ```
    /// use snapstore_manager::IdAllocator;
    ///
    /// let mut ids = IdAllocator::new();
    /// assert_eq!(ids.next("foo"), "foo 1");
    /// assert_eq!(ids.next("foo"), "foo 2");
    /// assert_eq!(ids.next("bar"), "bar 1");
    /// ```
    pub fn next(&mut self, base: &str) -> String {
        let counter = self.counters.entry(base.to_string()).or_insert(0);
        *counter += 1;
        format!("{base} {counter}")
    }
}
