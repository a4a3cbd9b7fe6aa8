//! Augmented binary search trees over closed intervals, answering point
//! stabbing queries ("which stored intervals contain `p`?").
//!
//! [`IntervalTree`] is the plain variant: a binary search tree keyed on the
//! interval start in which every node tracks the maximum end below it, so
//! whole subtrees that cannot reach the query point are pruned. It performs
//! no rebalancing. [`BalancedIntervalTree`] keeps the same augmentation on top
//! of an AVL tree.
//!
//! Any `Ord` type can serve as coordinate; use [`ordered_float::NotNan`] for
//! floats.
//!
//! With the `python` feature the crate also builds a Python extension module
//! exposing an `IntervalStore` class.

mod balanced;
mod error;
mod interval;
mod interval_tree;
#[cfg(feature = "python")]
mod python;

pub use balanced::BalancedIntervalTree;
pub use error::IntervalError;
pub use interval::Interval;
pub use interval_tree::IntervalTree;
