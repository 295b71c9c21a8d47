//! Multipart boundary allocation.

use std::time::{SystemTime, UNIX_EPOCH};

/// Lazily allocated multipart boundaries, keyed by nesting index.
///
/// Index 0 is the outermost boundary, index 1 the nested
/// alternative-inside-mixed boundary. The first request for an index
/// generates a token; later requests return the cached value, so repeated
/// serializations of one message are stable.
#[derive(Debug, Clone, Default)]
pub struct BoundarySet {
    cached: Vec<Option<String>>,
}

impl BoundarySet {
    /// Creates an empty boundary set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the boundary for the given nesting index, generating and
    /// caching it on first use.
    ///
    /// Tokens for distinct indices never collide: the index is part of the
    /// token itself.
    pub fn get(&mut self, index: usize) -> &str {
        if self.cached.len() <= index {
            self.cached.resize(index + 1, None);
        }
        self.cached[index].get_or_insert_with(|| generate(index))
    }
}

/// Derives a boundary token from a high-resolution clock mixed with the
/// nesting index.
fn generate(index: usize) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    format!("----=_Part_{index}_{:x}", nanos.wrapping_add(index as u128))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_across_calls() {
        let mut boundaries = BoundarySet::new();
        let first = boundaries.get(0).to_string();
        assert_eq!(boundaries.get(0), first);
        assert_eq!(boundaries.get(0), first);
    }

    #[test]
    fn test_indices_never_collide() {
        let mut boundaries = BoundarySet::new();
        let outer = boundaries.get(0).to_string();
        let inner = boundaries.get(1).to_string();
        assert_ne!(outer, inner);
        assert!(outer.starts_with("----=_Part_0_"));
        assert!(inner.starts_with("----=_Part_1_"));
    }

    #[test]
    fn test_sparse_index_allocation() {
        let mut boundaries = BoundarySet::new();
        let inner = boundaries.get(1).to_string();
        let outer = boundaries.get(0).to_string();
        assert_ne!(outer, inner);
        assert_eq!(boundaries.get(1), inner);
    }
}
