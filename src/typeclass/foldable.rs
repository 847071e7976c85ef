//! Foldable type class - folding over ordered structures.
//!
//! This module provides the `Foldable` trait, which represents ordered
//! structures whose elements can be reduced (folded) into a single value
//! without consuming the structure.
//!
//! Unlike `Iterator::fold`, every fold here can stop early: the folding
//! function returns [`ControlFlow::Break`] to end the traversal and
//! [`ControlFlow::Continue`] to keep going. Persistent containers stop
//! walking their tree as soon as a fold breaks, so searches like
//! [`Foldable::find`] never visit more elements than necessary.
//!
//! # Laws
//!
//! ## Consistency between `fold_left` and `fold_right`
//!
//! ```text
//! fa.fold_left(init, f) == fa.fold_right(init, flip(f))  // when f is associative
//! ```
//!
//! ## Consistency with `to_list`
//!
//! ```text
//! fa.fold_left(init, f) == fa.to_list().into_iter().fold(init, f)
//! ```
//!
//! ## Early termination
//!
//! ```text
//! fa.fold_while(init, |acc, x| Continue(f(acc, x))) == fa.fold_left(init, f)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use arbor::typeclass::Foldable;
//!
//! let numbers = vec![1, 2, 3, 4, 5];
//! let sum = numbers.fold_left(0, |accumulator, element| accumulator + element);
//! assert_eq!(sum, 15);
//! ```

use std::ops::ControlFlow;

/// A type class for ordered structures that can be folded to a summary value.
///
/// # Required Methods
///
/// - `fold_while`: Front-to-back fold with early termination
/// - `fold_right_while`: Back-to-front fold with early termination
/// - `length`: Number of elements
///
/// # Provided Methods
///
/// - `fold_left` / `fold_right`: Complete folds
/// - `is_empty`: Check if the structure has no elements
/// - `to_list`: Convert to a `Vec` in order
/// - `find`: Find the first element matching a predicate
/// - `exists`: Check if any element matches a predicate
/// - `for_all`: Check if all elements match a predicate
///
/// # Examples
///
/// ```rust
/// use arbor::persistent::PersistentTreeMap;
/// use arbor::typeclass::Foldable;
///
/// let map: PersistentTreeMap<i32, i32> = (1..=4).map(|key| (key, key * 10)).collect();
/// let total = map.fold_left(0, |accumulator, (_, value)| accumulator + value);
/// assert_eq!(total, 100);
/// ```
pub trait Foldable {
    /// The element type yielded to folding functions.
    type Item;

    /// Folds the structure front to back, stopping at the first `Break`.
    ///
    /// # Arguments
    ///
    /// * `init` - The initial accumulator value
    /// * `function` - Receives the accumulator and an element and decides
    ///   whether to continue
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::typeclass::Foldable;
    /// use std::ops::ControlFlow;
    ///
    /// let values = vec![1, 2, 3, 4];
    /// let first_two = values.fold_while(Vec::new(), |mut accumulator, element| {
    ///     accumulator.push(element);
    ///     if accumulator.len() == 2 {
    ///         ControlFlow::Break(accumulator)
    ///     } else {
    ///         ControlFlow::Continue(accumulator)
    ///     }
    /// });
    /// assert_eq!(first_two, vec![1, 2]);
    /// ```
    fn fold_while<B, F>(&self, init: B, function: F) -> B
    where
        F: FnMut(B, Self::Item) -> ControlFlow<B, B>;

    /// Folds the structure back to front, stopping at the first `Break`.
    fn fold_right_while<B, F>(&self, init: B, function: F) -> B
    where
        F: FnMut(Self::Item, B) -> ControlFlow<B, B>;

    /// Returns the number of elements.
    fn length(&self) -> usize;

    /// Folds every element front to back.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::typeclass::Foldable;
    ///
    /// let values = vec![1, 2, 3];
    /// let sum = values.fold_left(0, |accumulator, element| accumulator + element);
    /// assert_eq!(sum, 6);
    /// ```
    fn fold_left<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.fold_while(init, |accumulator, element| {
            ControlFlow::Continue(function(accumulator, element))
        })
    }

    /// Folds every element back to front.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::typeclass::Foldable;
    ///
    /// let values = vec![1, 2, 3];
    /// let result = values.fold_right(String::new(), |element, accumulator| {
    ///     format!("{element}{accumulator}")
    /// });
    /// assert_eq!(result, "123");
    /// ```
    fn fold_right<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(Self::Item, B) -> B,
    {
        self.fold_right_while(init, |element, accumulator| {
            ControlFlow::Continue(function(element, accumulator))
        })
    }

    /// Returns `true` if the structure has no elements.
    #[inline]
    fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// Collects every element into a `Vec`, front to back.
    fn to_list(&self) -> Vec<Self::Item> {
        self.fold_left(Vec::with_capacity(self.length()), |mut accumulator, element| {
            accumulator.push(element);
            accumulator
        })
    }

    /// Finds the first element satisfying a predicate.
    ///
    /// Stops folding as soon as a match is found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbor::typeclass::Foldable;
    ///
    /// let values = vec![1, 2, 3, 4, 5];
    /// assert_eq!(values.find(|element| *element > 3), Some(4));
    /// assert_eq!(values.find(|element| *element > 10), None);
    /// ```
    fn find<P>(&self, mut predicate: P) -> Option<Self::Item>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        self.fold_while(None, |_, element| {
            if predicate(&element) {
                ControlFlow::Break(Some(element))
            } else {
                ControlFlow::Continue(None)
            }
        })
    }

    /// Checks if any element satisfies the predicate.
    fn exists<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&Self::Item) -> bool,
    {
        self.find(predicate).is_some()
    }

    /// Checks if all elements satisfy the predicate.
    ///
    /// An empty structure satisfies every predicate.
    fn for_all<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&Self::Item) -> bool,
    {
        !self.exists(|element| !predicate(element))
    }
}

// =============================================================================
// Standard Library Implementations
// =============================================================================

impl<T: Clone> Foldable for Vec<T> {
    type Item = T;

    fn fold_while<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(B, T) -> ControlFlow<B, B>,
    {
        let mut accumulator = init;
        for element in self {
            match function(accumulator, element.clone()) {
                ControlFlow::Continue(next) => accumulator = next,
                ControlFlow::Break(done) => return done,
            }
        }
        accumulator
    }

    fn fold_right_while<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(T, B) -> ControlFlow<B, B>,
    {
        let mut accumulator = init;
        for element in self.iter().rev() {
            match function(element.clone(), accumulator) {
                ControlFlow::Continue(next) => accumulator = next,
                ControlFlow::Break(done) => return done,
            }
        }
        accumulator
    }

    #[inline]
    fn length(&self) -> usize {
        self.len()
    }
}
