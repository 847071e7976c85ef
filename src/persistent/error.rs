//! Error types for persistent ordered containers.
//!
//! Lookups such as [`get`](super::PersistentTreeMap::get) never fail; they
//! return `None`. The errors here are produced by the strict accessors
//! (`try_get`, `try_remove`, ...), by binary set operations over containers
//! with different comparators, and by bulk construction from malformed input.

use std::fmt;

/// Represents errors that can occur when working with persistent ordered
/// containers.
///
/// # Examples
///
/// ```rust
/// use arbor::persistent::{PersistentTreeMap, TreeMapError};
///
/// let map: PersistentTreeMap<i32, &str> = PersistentTreeMap::new();
/// assert_eq!(map.try_get(&1), Err(TreeMapError::KeyNotFound));
/// assert_eq!(format!("{}", TreeMapError::KeyNotFound), "key not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeMapError {
    /// A strict accessor was asked for a key the container does not hold.
    KeyNotFound,
    /// A binary operation was given containers ordered by different
    /// comparators.
    ComparatorMismatch {
        /// The operation that was rejected (`"union"`, `"is_subset"`, ...).
        operation: &'static str,
    },
    /// Bulk construction was given entries that cannot form a container.
    InvalidInput {
        /// Zero-based index of the offending entry.
        position: usize,
        /// What was wrong with the entry.
        reason: &'static str,
    },
}

impl fmt::Display for TreeMapError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound => formatter.write_str("key not found"),
            Self::ComparatorMismatch { operation } => write!(
                formatter,
                "{operation}: containers are ordered by different comparators"
            ),
            Self::InvalidInput { position, reason } => {
                write!(formatter, "invalid input at position {position}: {reason}")
            }
        }
    }
}

impl std::error::Error for TreeMapError {}
