//! Cache Key Module

use std::fmt;

/// Joins namespace and id. Neither part is escaped.
pub const KEY_SEPARATOR: char = '/';

// == Cache Key ==
/// A `(namespace, id)` pair addressing one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub namespace: String,
    pub id: String,
}

impl CacheKey {
    pub fn new(namespace: impl Into<String>, id: impl fmt::Display) -> Self {
        Self {
            namespace: namespace.into(),
            id: id.to_string(),
        }
    }

    /// The composite key as stored, `namespace/id`.
    pub fn composite(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.namespace, KEY_SEPARATOR, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_key() {
        assert_eq!(CacheKey::new("user", "42").composite(), "user/42");
        assert_eq!(CacheKey::new("session", 7).composite(), "session/7");
    }

    #[test]
    fn test_separator_not_escaped() {
        // known ambiguity: different pairs can collide once joined
        let a = CacheKey::new("a/b", "c");
        let b = CacheKey::new("a", "b/c");
        assert_ne!(a, b);
        assert_eq!(a.composite(), b.composite());
    }
}
