//! Client-side primary keys.
//!
//! Identifiers are ULIDs: 26 characters of Crockford base32, sortable by
//! creation time. Within one process they are strictly increasing, because
//! ids generated in the same millisecond increment the previous one instead
//! of drawing fresh randomness.

use std::sync::{LazyLock, Mutex, PoisonError};

use ulid::{Generator, Ulid};

// Shared so that ordering holds across threads.
static GENERATOR: LazyLock<Mutex<IdGenerator>> =
    LazyLock::new(|| Mutex::new(IdGenerator::new()));

/// Generate a new identifier from the process-wide generator.
#[must_use]
pub fn new_id() -> String {
    let mut generator = GENERATOR.lock().unwrap_or_else(PoisonError::into_inner);
    generator.next_id()
}

/// An owned monotonic identifier generator.
pub struct IdGenerator {
    inner: Generator,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Generator::new(),
        }
    }

    /// Next identifier as a ULID.
    ///
    /// If the random part overflows within one millisecond the generator
    /// falls back to a fresh random ULID, which is still unique but may
    /// sort before its predecessor.
    pub fn next_ulid(&mut self) -> Ulid {
        self.inner.generate().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ULID generator overflow, using a random id");
            Ulid::new()
        })
    }

    /// Next identifier as its string form.
    pub fn next_id(&mut self) -> String {
        self.next_ulid().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_id_shape() {
        let id = new_id();
        assert_eq!(id.len(), 26);
        assert!(id.parse::<Ulid>().is_ok());
    }

    #[test]
    fn test_monotonic_generation() {
        let mut g = IdGenerator::new();
        let a = g.next_ulid();
        let b = g.next_ulid();

        assert!(a < b);
    }

    #[test]
    fn test_ids_are_distinct_and_sorted() {
        let ids: Vec<String> = (0..1000).map(|_| new_id()).collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());

        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(sorted, ids);
    }

    #[test]
    fn test_ids_distinct_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..250).map(|_| new_id()).collect::<Vec<_>>()))
            .collect();
        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id));
            }
        }
        assert_eq!(all.len(), 1000);
    }
}
