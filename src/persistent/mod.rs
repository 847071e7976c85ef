//! Persistent (immutable) ordered containers.
//!
//! This module provides immutable ordered containers that use structural
//! sharing to minimize copying:
//!
//! - [`PersistentTreeMap`]: Persistent ordered map (size-biased binary search tree)
//! - [`PersistentTreeSet`]: Persistent ordered set (keys of a [`PersistentTreeMap`])
//!
//! Both are ordered by a [`Comparator`], which is either the natural `Ord`
//! order of the key type or a caller-supplied strict "less than" function.
//!
//! # Structural Sharing
//!
//! Updating a container rebuilds only the path from the root to the
//! touched entry. Every other subtree is shared between the old and the
//! new version, so old versions stay valid and cheap to keep around.
//!
//! # Examples
//!
//! ## `PersistentTreeMap`
//!
//! ```rust
//! use arbor::persistent::PersistentTreeMap;
//!
//! let map = PersistentTreeMap::new()
//!     .insert(3, "three")
//!     .insert(1, "one")
//!     .insert(2, "two");
//!
//! // Entries are always in sorted order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.insert(1, "ONE");
//! assert_eq!(map.get(&1), Some(&"one"));     // Original unchanged
//! assert_eq!(updated.get(&1), Some(&"ONE")); // New version
//! ```
//!
//! ## `PersistentTreeSet`
//!
//! ```rust
//! use arbor::persistent::PersistentTreeSet;
//!
//! let set: PersistentTreeSet<i32> = [1, 2, 3].into_iter().collect();
//! let other: PersistentTreeSet<i32> = [2, 3, 4].into_iter().collect();
//!
//! let union = set.union(&other).unwrap();
//! let intersection = set.intersection(&other).unwrap();
//!
//! assert_eq!(union.len(), 4);        // {1, 2, 3, 4}
//! assert_eq!(intersection.len(), 2); // {2, 3}
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod comparator;
mod error;
mod treemap;
mod treeset;

pub use comparator::Comparator;
pub use error::TreeMapError;
pub use treemap::Cursor;
pub use treemap::PersistentTreeMap;
pub use treemap::PersistentTreeMapIntoIterator;
pub use treemap::Step;
pub use treeset::PersistentTreeSet;
pub use treeset::PersistentTreeSetIntoIterator;
pub use treeset::PersistentTreeSetIterator;

// =============================================================================
// Tests
// =============================================================================
