//! Field path addressing
//!
//! A [`FieldPath`] is the structural address of one logical field across all
//! records of a source: the collection (or table) name followed by the nested
//! keys leading to the value. Array hops are represented by an index-free
//! placeholder segment so that an array-valued field is classified once,
//! regardless of how many elements any particular record carries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PathSegment {
    /// Named object member or table column
    Key(String),
    /// Array element placeholder; elements are treated as homogeneous
    Array,
}

/// Structural address identifying one logical field across all records
///
/// Paths are comparable and hashable so discovery can deduplicate them, and
/// ordered so reports list fields deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldPath {
    collection: String,
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Create an empty path rooted at a collection or table
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            segments: Vec::new(),
        }
    }

    /// Convenience constructor for a one-level tabular column
    pub fn column(collection: impl Into<String>, name: impl Into<String>) -> Self {
        let mut path = Self::new(collection);
        path.segments.push(PathSegment::Key(name.into()));
        path
    }

    /// Derive a child path through an object member
    pub fn child_key(&self, key: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.segments.push(PathSegment::Key(key.into()));
        path
    }

    /// Derive a child path through an array element
    pub fn child_array(&self) -> Self {
        let mut path = self.clone();
        path.segments.push(PathSegment::Array);
        path
    }

    /// The collection or table this path is rooted at
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The path segments below the collection root
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Terminal name segment, used for keyword matching
    ///
    /// Skips trailing array placeholders: for `team[].member_name` this is
    /// `member_name`; for `tags[]` it is `tags`.
    pub fn terminal_name(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|segment| match segment {
            PathSegment::Key(key) => Some(key.as_str()),
            PathSegment::Array => None,
        })
    }

    /// Whether the path traverses at least one array
    pub fn is_array_valued(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, PathSegment::Array))
    }

    /// Number of segments below the collection root
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collection)?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Array => write!(f, "[]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_display_nested_and_array() {
        let path = FieldPath::new("reviews")
            .child_key("team")
            .child_array()
            .child_key("member_name");
        assert_eq!(path.to_string(), "reviews.team[].member_name");
    }

    #[test]
    fn test_terminal_name_skips_array_placeholder() {
        let path = FieldPath::new("docs").child_key("emails").child_array();
        assert_eq!(path.terminal_name(), Some("emails"));
        assert!(path.is_array_valued());
    }

    #[test]
    fn test_column_constructor() {
        let path = FieldPath::column("users", "email");
        assert_eq!(path.to_string(), "users.email");
        assert_eq!(path.terminal_name(), Some("email"));
        assert!(!path.is_array_valued());
    }

    #[test]
    fn test_paths_are_hashable_and_deduplicate() {
        let a = FieldPath::column("users", "name");
        let b = FieldPath::column("users", "name");
        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
    }
}
