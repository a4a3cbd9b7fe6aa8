use std::convert::Infallible;
use std::fmt;
use std::ops::ControlFlow;

use itertools::Itertools;
use nonmax::NonMaxUsize;

use crate::Interval;

/// A node of the arena: one interval, the maximum `end` over itself and its
/// descendants, and links to its children.
#[derive(Clone, Debug)]
struct Node<N> {
    interval: Interval<N>,
    max_end: N,
    left: Option<NonMaxUsize>,
    right: Option<NonMaxUsize>,
}

impl<N: Clone> Node<N> {
    /// Creates a new leaf node owning the given interval.
    fn new(interval: Interval<N>) -> Self {
        let max_end = interval.end.clone();
        Node {
            interval,
            max_end,
            left: None,
            right: None,
        }
    }
}

/// Converts an arena position into a child link.
///
/// A `Vec` of non-zero-sized nodes never reaches `usize::MAX` elements.
fn link(index: usize) -> NonMaxUsize {
    NonMaxUsize::new(index).expect("arena index below usize::MAX")
}

/// An augmented binary search tree over closed intervals, keyed on `start`.
///
/// Intervals with a smaller `start` than a node go to its left subtree, all
/// others (ties included) go right, so equal-start intervals form a chain in
/// insertion order. The tree is never rebalanced: inserting in sorted order
/// degenerates it into a list. See [`BalancedIntervalTree`] for a variant with
/// logarithmic height.
///
/// Nodes are kept in a flat arena in insertion order and both `insert` and
/// `query` walk the tree iteratively, so even degenerate trees do not grow the
/// call stack.
///
/// [`BalancedIntervalTree`]: crate::BalancedIntervalTree
#[derive(Clone, Debug)]
pub struct IntervalTree<N> {
    nodes: Vec<Node<N>>,
    root: Option<NonMaxUsize>,
}

impl<N> Default for IntervalTree<N> {
    fn default() -> Self {
        IntervalTree {
            nodes: Vec::new(),
            root: None,
        }
    }
}

impl<N> IntervalTree<N> {
    /// Creates an empty interval tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty tree with room for `capacity` intervals.
    pub fn with_capacity(capacity: usize) -> Self {
        IntervalTree {
            nodes: Vec::with_capacity(capacity),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all intervals in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Interval<N>> {
        self.nodes.iter().map(|node| &node.interval)
    }

    /// The largest `end` of any stored interval.
    pub fn max_end(&self) -> Option<&N> {
        self.root.map(|root| &self.nodes[root.get()].max_end)
    }

    /// Number of nodes on the longest root-to-leaf path; zero when empty.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = Vec::new();
        stack.extend(self.root.map(|root| (root, 1)));
        while let Some((index, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[index.get()];
            stack.extend(node.left.map(|left| (left, depth + 1)));
            stack.extend(node.right.map(|right| (right, depth + 1)));
        }
        deepest
    }
}

impl<N: Ord + Clone> IntervalTree<N> {
    /// Inserts an interval into the tree.
    ///
    /// Every node on the path from the root to the new leaf has its `max_end`
    /// raised to cover `interval.end`.
    ///
    /// Time complexity: **O(depth)**, which is O(N) for sorted input.
    pub fn insert(&mut self, interval: Interval<N>) {
        let index = self.nodes.len();

        let Some(mut cursor) = self.root else {
            self.nodes.push(Node::new(interval));
            self.root = Some(link(index));
            return;
        };

        let mut depth = 1;
        loop {
            let node = &mut self.nodes[cursor.get()];
            if node.max_end < interval.end {
                node.max_end = interval.end.clone();
            }
            let slot = if interval.start < node.interval.start {
                &mut node.left
            } else {
                &mut node.right
            };
            depth += 1;
            match *slot {
                Some(child) => cursor = child,
                None => {
                    *slot = Some(link(index));
                    break;
                }
            }
        }

        log::trace!("interval tree insert reached depth {depth}");
        self.nodes.push(Node::new(interval));
    }

    /// Visits every stored interval containing `point`, stopping early if
    /// `handler` breaks.
    ///
    /// Nodes are visited in pre-order (node, left, right). The left subtree is
    /// entered only if its `max_end` reaches `point`, the right subtree only if
    /// `point` is not below the node's `start`.
    pub fn query<'a, H, R>(&'a self, point: &N, mut handler: H) -> ControlFlow<R>
    where
        H: FnMut(&'a Interval<N>) -> ControlFlow<R>,
    {
        let mut stack = Vec::new();
        stack.extend(self.root);

        while let Some(index) = stack.pop() {
            let node = &self.nodes[index.get()];

            if node.interval.contains(point) {
                handler(&node.interval)?;
            }

            if point >= &node.interval.start {
                stack.extend(node.right);
            }
            if let Some(left) = node.left {
                if &self.nodes[left.get()].max_end >= point {
                    stack.push(left);
                }
            }
        }

        ControlFlow::Continue(())
    }

    /// Finds all intervals that contain the given `point`.
    ///
    /// Time complexity: O(N) in the worst case, sub-linear on random input.
    ///
    /// Returns an empty vector when nothing matches.
    pub fn find_intersecting(&self, point: &N) -> Vec<&Interval<N>> {
        let mut out = Vec::new();
        let flow = self.query(point, |interval| {
            out.push(interval);
            ControlFlow::<Infallible>::Continue(())
        });
        if let ControlFlow::Break(never) = flow {
            match never {}
        }
        out
    }
}

impl<N: Ord + Clone> FromIterator<Interval<N>> for IntervalTree<N> {
    fn from_iter<I: IntoIterator<Item = Interval<N>>>(intervals: I) -> Self {
        let mut tree = IntervalTree::new();
        tree.extend(intervals);
        tree
    }
}

impl<N: Ord + Clone> Extend<Interval<N>> for IntervalTree<N> {
    fn extend<I: IntoIterator<Item = Interval<N>>>(&mut self, intervals: I) {
        let intervals = intervals.into_iter();
        self.nodes.reserve(intervals.size_hint().0);
        for interval in intervals {
            self.insert(interval);
        }
    }
}

impl<N: fmt::Display> fmt::Display for IntervalTree<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{}}}", self.iter().format(", "))
    }
}


#[cfg(test)]
mod fuzz_tests {
    use std::collections::HashSet;

    use proptest::collection::vec;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn brute_force(intervals: &[Interval<i32>], point: i32) -> Vec<(i32, i32)> {
        intervals
            .iter()
            .filter(|iv| iv.contains(&point))
            .map(|iv| (iv.start, iv.end))
            .sorted()
            .collect()
    }

    fn found(tree: &IntervalTree<i32>, point: i32) -> Vec<(i32, i32)> {
        tree.find_intersecting(&point)
            .into_iter()
            .map(|iv| (iv.start, iv.end))
            .sorted()
            .collect()
    }

    #[test]
    fn fuzz_random_inserts_and_queries() {
        let mut rng = StdRng::seed_from_u64(0xDEADBEEF);

        for _trial in 0..20 {
            let intervals: Vec<_> = (0..1000)
                .map(|_| {
                    let start = rng.random_range(0..100_000);
                    Interval::new(start, start + rng.random_range(1..=1000))
                })
                .collect();
            let tree: IntervalTree<i32> = intervals.iter().copied().collect();

            for _ in 0..200 {
                let point = rng.random_range(-100..101_100);
                assert_eq!(
                    found(&tree, point),
                    brute_force(&intervals, point),
                    "mismatch at point {point}"
                );
            }
        }
    }

    proptest! {
        #[test]
        fn query_matches_containment(
            bounds in vec((-500..500i32, 0..200i32), 0..300),
            points in vec(-600..800i32, 1..50),
        ) {
            let intervals: Vec<_> = bounds.iter().map(|&(s, len)| Interval::new(s, s + len)).collect();
            let tree: IntervalTree<i32> = intervals.iter().copied().collect();

            for point in points {
                prop_assert_eq!(found(&tree, point), brute_force(&intervals, point));
            }
        }

        #[test]
        fn each_node_reported_at_most_once(
            bounds in vec((-50..50i32, 0..40i32), 0..200),
            point in -60..100i32,
        ) {
            let tree: IntervalTree<i32> =
                bounds.iter().map(|&(s, len)| Interval::new(s, s + len)).collect();

            let hits = tree.find_intersecting(&point);
            let distinct: HashSet<_> = hits.iter().map(|iv| *iv as *const Interval<i32>).collect();
            prop_assert_eq!(distinct.len(), hits.len());
        }

        #[test]
        fn membership_ignores_insertion_order(
            starts in proptest::sample::subsequence((0..400i32).collect::<Vec<_>>(), 0..100)
                .prop_shuffle(),
            point in 0..500i32,
        ) {
            let intervals: Vec<_> = starts.iter().map(|&s| Interval::new(s, s + s % 37)).collect();
            let forward: IntervalTree<i32> = intervals.iter().copied().collect();
            let backward: IntervalTree<i32> = intervals.iter().rev().copied().collect();

            prop_assert_eq!(found(&forward, point), found(&backward, point));
        }

        #[test]
        fn augmentation_is_exact(
            bounds in vec((-1000..1000i32, -10..500i32), 0..300),
        ) {
            let tree: IntervalTree<i32> =
                bounds.iter().map(|&(s, len)| Interval::new(s, s + len)).collect();
            tests::assert_invariants(&tree);
        }
    }
}
