use std::cmp;
use std::convert::Infallible;
use std::ops::ControlFlow;

use arrayvec::ArrayVec;

use crate::Interval;

/// Traversal stack depth for queries. An AVL tree of `n` nodes is at most
/// about `1.44 * log2(n)` high, which stays below this for any `usize` count.
const MAX_HEIGHT: usize = 128;

/// One closed interval plus the largest `end` found in its subtree and the
/// subtree height used for balancing.
#[derive(Clone, Debug)]
struct Node<N> {
    interval: Interval<N>,
    max_end: N,
    height: u8,
    left: Option<Box<Node<N>>>,
    right: Option<Box<Node<N>>>,
}

impl<N: Ord + Clone> Node<N> {
    /// Creates a new leaf node containing the given interval.
    fn new(interval: Interval<N>) -> Self {
        let max_end = interval.end.clone();
        Node {
            interval,
            max_end,
            height: 1,
            left: None,
            right: None,
        }
    }

    fn height(node: &Option<Box<Self>>) -> u8 {
        node.as_ref().map_or(0, |n| n.height)
    }

    /// Recomputes `height` and `max_end` from the children.
    fn update(&mut self) {
        self.height = 1 + cmp::max(Self::height(&self.left), Self::height(&self.right));

        let mut max_end = &self.interval.end;
        for child in [&self.left, &self.right].into_iter().flatten() {
            if &child.max_end > max_end {
                max_end = &child.max_end;
            }
        }
        self.max_end = max_end.clone();
    }

    /// Left subtree height minus right subtree height.
    fn balance_factor(&self) -> i16 {
        i16::from(Self::height(&self.left)) - i16::from(Self::height(&self.right))
    }

    /// Lifts the left child into this node's place; returns `self` unchanged
    /// when there is no left child.
    fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let Some(mut pivot) = self.left.take() else {
            return self;
        };
        log::trace!("rotating right");
        self.left = pivot.right.take();
        self.update();
        pivot.right = Some(self);
        pivot.update();
        pivot
    }

    /// Mirror of [`Node::rotate_right`].
    fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let Some(mut pivot) = self.right.take() else {
            return self;
        };
        log::trace!("rotating left");
        self.right = pivot.left.take();
        self.update();
        pivot.left = Some(self);
        pivot.update();
        pivot
    }

    /// Restores `|balance_factor| <= 1` with at most two rotations.
    fn rebalance(mut self: Box<Self>) -> Box<Self> {
        self.update();
        let bf = self.balance_factor();
        if bf > 1 {
            if let Some(left) = self.left.take() {
                self.left = Some(if left.balance_factor() < 0 {
                    left.rotate_left()
                } else {
                    left
                });
            }
            return self.rotate_right();
        } else if bf < -1 {
            if let Some(right) = self.right.take() {
                self.right = Some(if right.balance_factor() > 0 {
                    right.rotate_right()
                } else {
                    right
                });
            }
            return self.rotate_left();
        }
        self
    }

    /// Descends by `start` (ties go right) and hands back the possibly
    /// rotated subtree root.
    fn insert(mut self: Box<Self>, interval: Interval<N>) -> Box<Self> {
        let child = if interval.start < self.interval.start {
            &mut self.left
        } else {
            &mut self.right
        };
        *child = Some(match child.take() {
            Some(node) => node.insert(interval),
            None => Box::new(Node::new(interval)),
        });
        self.rebalance()
    }
}

/// A self-balancing interval tree supporting insertion and point queries.
///
/// Carries the same `max_end` augmentation and query rules as
/// [`IntervalTree`], backed by an AVL tree so that sorted input keeps the
/// height logarithmic. Ties on `start` still route right and rotations keep
/// the in-order sequence, but the node shape (and thus the order in which
/// matches are reported) differs from [`IntervalTree`].
///
/// [`IntervalTree`]: crate::IntervalTree
#[derive(Clone, Debug)]
pub struct BalancedIntervalTree<N> {
    root: Option<Box<Node<N>>>,
    len: usize,
}

impl<N> Default for BalancedIntervalTree<N> {
    fn default() -> Self {
        BalancedIntervalTree { root: None, len: 0 }
    }
}

impl<N: Ord + Clone> BalancedIntervalTree<N> {
    /// Creates an empty interval tree.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the height of the tree; zero when empty.
    pub fn height(&self) -> usize {
        usize::from(Node::height(&self.root))
    }

    /// Inserts a new interval into the tree.
    ///
    /// Time complexity: **O(log N)**.
    pub fn insert(&mut self, interval: Interval<N>) {
        let new_root = match self.root.take() {
            Some(root) => root.insert(interval),
            None => Box::new(Node::new(interval)),
        };
        self.root = Some(new_root);
        self.len += 1;
    }

    /// Visits every stored interval containing `point`, stopping early if
    /// `handler` breaks.
    pub fn query<'a, H, R>(&'a self, point: &N, mut handler: H) -> ControlFlow<R>
    where
        H: FnMut(&'a Interval<N>) -> ControlFlow<R>,
    {
        // Each level leaves at most one pending sibling on the stack.
        let mut stack = ArrayVec::<&'a Node<N>, MAX_HEIGHT>::new();
        stack.extend(self.root.as_deref());

        while let Some(node) = stack.pop() {
            if node.interval.contains(point) {
                handler(&node.interval)?;
            }
            // right starts are all >= this start
            if point >= &node.interval.start {
                stack.extend(node.right.as_deref());
            }
            if let Some(left) = node.left.as_deref() {
                if &left.max_end >= point {
                    stack.push(left);
                }
            }
        }

        ControlFlow::Continue(())
    }

    /// Finds all intervals that contain the given `point`.
    ///
    /// Time complexity: **O(log N + K)**, where K is the number of matches.
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

impl<N: Ord + Clone> FromIterator<Interval<N>> for BalancedIntervalTree<N> {
    fn from_iter<I: IntoIterator<Item = Interval<N>>>(intervals: I) -> Self {
        let mut tree = BalancedIntervalTree::new();
        tree.extend(intervals);
        tree
    }
}

impl<N: Ord + Clone> Extend<Interval<N>> for BalancedIntervalTree<N> {
    fn extend<I: IntoIterator<Item = Interval<N>>>(&mut self, intervals: I) {
        for interval in intervals {
            self.insert(interval);
        }
    }
}
