//! Type class traits consumed by generic sequence adapters.
//!
//! - [`Foldable`]: Folding over ordered structures, with early termination
//!
//! # Examples
//!
//! ```rust
//! use arbor::typeclass::Foldable;
//! use std::ops::ControlFlow;
//!
//! let values = vec![1, 2, 3, 4, 5];
//! let sum_below_four = values.fold_while(0, |accumulator, element| {
//!     if element < 4 {
//!         ControlFlow::Continue(accumulator + element)
//!     } else {
//!         ControlFlow::Break(accumulator)
//!     }
//! });
//! assert_eq!(sum_below_four, 6);
//! ```

mod foldable;

pub use foldable::Foldable;
