//! Key ordering for persistent ordered containers.
//!
//! A [`Comparator`] is fixed when a container is created and travels with
//! every version derived from it. Binary operations over two containers
//! require both to carry the *same* comparator, which is decided by a cheap
//! identity check rather than by comparing behaviour.

use super::ReferenceCounter;
use std::cmp::Ordering;
use std::fmt;

/// Strict less-than predicate stored by custom comparators.
#[cfg(feature = "arc")]
type LessThan<K> = dyn Fn(&K, &K) -> bool + Send + Sync;

#[cfg(not(feature = "arc"))]
type LessThan<K> = dyn Fn(&K, &K) -> bool;

enum Order<K> {
    /// `Ord::cmp` of the key type.
    Natural(fn(&K, &K) -> Ordering),
    /// A caller supplied strict less-than predicate.
    Custom(ReferenceCounter<LessThan<K>>),
}

/// The total order over keys of a persistent ordered container.
///
/// # Identity
///
/// - Every natural comparator of a key type is the same as every other
///   natural comparator of that key type.
/// - A custom comparator is only the same as itself and its clones.
///
/// # Examples
///
/// ```rust
/// use arbor::persistent::Comparator;
/// use std::cmp::Ordering;
///
/// let descending = Comparator::from_less_than(|left: &i32, right: &i32| left > right);
/// assert_eq!(descending.compare(&1, &2), Ordering::Greater);
///
/// let copy = descending.clone();
/// assert!(copy.same_as(&descending));
///
/// let other = Comparator::from_less_than(|left: &i32, right: &i32| left > right);
/// assert!(!other.same_as(&descending));
/// ```
pub struct Comparator<K> {
    order: Order<K>,
}

impl<K: Ord> Comparator<K> {
    /// Creates the comparator backed by the key type's `Ord` implementation.
    #[inline]
    #[must_use]
    pub fn natural() -> Self {
        Self {
            order: Order::Natural(K::cmp),
        }
    }
}

impl<K: Ord> Default for Comparator<K> {
    #[inline]
    fn default() -> Self {
        Self::natural()
    }
}

impl<K> Comparator<K> {
    /// Creates a comparator from a strict less-than predicate.
    ///
    /// The predicate must be a strict, transitive, total order over the keys
    /// the container will hold. Keys for which neither `less_than(a, b)` nor
    /// `less_than(b, a)` holds are treated as the same key.
    #[cfg(not(feature = "arc"))]
    #[must_use]
    pub fn from_less_than<F>(less_than: F) -> Self
    where
        F: Fn(&K, &K) -> bool + 'static,
    {
        Self {
            order: Order::Custom(ReferenceCounter::new(less_than)),
        }
    }

    /// Creates a comparator from a strict less-than predicate.
    ///
    /// The predicate must be a strict, transitive, total order over the keys
    /// the container will hold. Keys for which neither `less_than(a, b)` nor
    /// `less_than(b, a)` holds are treated as the same key.
    #[cfg(feature = "arc")]
    #[must_use]
    pub fn from_less_than<F>(less_than: F) -> Self
    where
        F: Fn(&K, &K) -> bool + Send + Sync + 'static,
    {
        Self {
            order: Order::Custom(ReferenceCounter::new(less_than)),
        }
    }

    /// Compares two keys.
    #[inline]
    pub fn compare(&self, left: &K, right: &K) -> Ordering {
        match &self.order {
            Order::Natural(cmp) => cmp(left, right),
            Order::Custom(less_than) => {
                if less_than(left, right) {
                    Ordering::Less
                } else if less_than(right, left) {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            }
        }
    }

    /// Returns `true` if `left` sorts strictly before `right`.
    #[inline]
    pub fn less_than(&self, left: &K, right: &K) -> bool {
        match &self.order {
            Order::Natural(cmp) => cmp(left, right) == Ordering::Less,
            Order::Custom(less_than) => less_than(left, right),
        }
    }

    /// Returns `true` if both comparators are the same value.
    ///
    /// This is an identity check, not a proof that two orders agree.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        match (&self.order, &other.order) {
            (Order::Natural(_), Order::Natural(_)) => true,
            (Order::Custom(left), Order::Custom(right)) => ReferenceCounter::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Returns `true` for the comparator backed by the key type's `Ord`.
    #[inline]
    #[must_use]
    pub const fn is_natural(&self) -> bool {
        matches!(self.order, Order::Natural(_))
    }
}

impl<K> Clone for Comparator<K> {
    fn clone(&self) -> Self {
        let order = match &self.order {
            Order::Natural(cmp) => Order::Natural(*cmp),
            Order::Custom(less_than) => Order::Custom(ReferenceCounter::clone(less_than)),
        };
        Self { order }
    }
}

impl<K> fmt::Debug for Comparator<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.order {
            Order::Natural(_) => formatter.write_str("Comparator::Natural"),
            Order::Custom(less_than) => write!(
                formatter,
                "Comparator::Custom({:p})",
                ReferenceCounter::as_ptr(less_than).cast::<()>()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 2, Ordering::Less)]
    #[case(2, 1, Ordering::Greater)]
    #[case(5, 5, Ordering::Equal)]
    fn natural_compare_follows_ord(
        #[case] left: i32,
        #[case] right: i32,
        #[case] expected: Ordering,
    ) {
        assert_eq!(Comparator::natural().compare(&left, &right), expected);
    }

    #[rstest]
    #[case(1, 2, Ordering::Greater)]
    #[case(2, 1, Ordering::Less)]
    #[case(5, 5, Ordering::Equal)]
    fn custom_compare_uses_predicate(
        #[case] left: i32,
        #[case] right: i32,
        #[case] expected: Ordering,
    ) {
        let descending = Comparator::from_less_than(|left: &i32, right: &i32| left > right);
        assert_eq!(descending.compare(&left, &right), expected);
    }

    #[rstest]
    fn custom_equivalent_keys_compare_equal() {
        let case_insensitive = Comparator::from_less_than(|left: &String, right: &String| {
            left.to_lowercase() < right.to_lowercase()
        });
        assert_eq!(
            case_insensitive.compare(&"Key".to_string(), &"kEY".to_string()),
            Ordering::Equal
        );
    }

    #[rstest]
    fn natural_comparators_are_the_same() {
        let first: Comparator<i32> = Comparator::natural();
        let second: Comparator<i32> = Comparator::default();
        assert!(first.same_as(&second));
        assert!(first.is_natural());
    }

    #[rstest]
    fn custom_comparator_is_same_as_its_clone_only() {
        let first = Comparator::from_less_than(|left: &i32, right: &i32| left < right);
        let clone = first.clone();
        let lookalike = Comparator::from_less_than(|left: &i32, right: &i32| left < right);

        assert!(first.same_as(&clone));
        assert!(!first.same_as(&lookalike));
        assert!(!first.same_as(&Comparator::natural()));
        assert!(!first.is_natural());
    }

    #[rstest]
    fn debug_names_the_variant() {
        let natural: Comparator<i32> = Comparator::natural();
        assert_eq!(format!("{natural:?}"), "Comparator::Natural");

        let custom = Comparator::from_less_than(|left: &i32, right: &i32| left < right);
        assert!(format!("{custom:?}").starts_with("Comparator::Custom("));
    }
}
