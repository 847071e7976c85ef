//! # arbor
//!
//! Persistent (immutable) ordered maps and sets for Rust.
//!
//! ## Overview
//!
//! Every operation returns a new container and leaves the previous one
//! valid and untouched. Unmodified subtrees are shared between versions.
//!
//! - **Persistent Data Structures**: [`PersistentTreeMap`](persistent::PersistentTreeMap)
//!   and [`PersistentTreeSet`](persistent::PersistentTreeSet), backed by a
//!   size-biased binary search tree with O(1) cached subtree sizes
//! - **Cursors**: resumable, forkable traversal states (ascending, descending,
//!   seek-from-key)
//! - **Set Algebra**: linear merge-join union, intersection, difference,
//!   subset, equality and disjointness
//! - **Type Classes**: [`Foldable`](typeclass::Foldable) for generic ordered
//!   sequence adapters
//!
//! ## Feature Flags
//!
//! - `typeclass`: The `Foldable` trait
//! - `persistent`: Persistent data structures
//! - `arc`: Use `Arc` instead of `Rc` so handles can be shared across threads
//! - `serde`: Serialization support
//! - `full`: Enable all features except `arc`
//!
//! ## Example
//!
//! ```rust
//! use arbor::prelude::*;
//!
//! let map = PersistentTreeMap::new()
//!     .insert(2, "b")
//!     .insert(1, "a")
//!     .insert(3, "c");
//!
//! let entries: Vec<(&i32, &&str)> = map.iter().collect();
//! assert_eq!(entries, vec![(&1, &"a"), (&2, &"b"), (&3, &"c")]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use arbor::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "typeclass")]
    pub use crate::typeclass::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;
}

#[cfg(feature = "typeclass")]
pub mod typeclass;

#[cfg(feature = "persistent")]
pub mod persistent;
