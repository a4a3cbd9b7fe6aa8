use ordered_float::NotNan;
use pyo3::exceptions::{PyFloatingPointError, PyValueError};
use pyo3::prelude::*;

use crate::{BalancedIntervalTree, Interval, IntervalError, IntervalTree};

impl From<IntervalError> for PyErr {
    fn from(err: IntervalError) -> PyErr {
        match err {
            IntervalError::NotANumber(_) => PyFloatingPointError::new_err(err.to_string()),
            IntervalError::Inverted => PyValueError::new_err(err.to_string()),
        }
    }
}

enum Backend {
    Plain(IntervalTree<NotNan<f64>>),
    Balanced(BalancedIntervalTree<NotNan<f64>>),
}

/// Python-exposed store of closed float intervals `[start, end]`.
#[pyclass]
struct IntervalStore {
    tree: Backend,
}

#[pymethods]
impl IntervalStore {
    #[new]
    #[pyo3(signature = (balanced = false))]
    fn new(balanced: bool) -> Self {
        let tree = if balanced {
            Backend::Balanced(BalancedIntervalTree::new())
        } else {
            Backend::Plain(IntervalTree::new())
        };
        IntervalStore { tree }
    }

    /// `len(store)` → number of stored intervals.
    fn __len__(&self) -> usize {
        match &self.tree {
            Backend::Plain(tree) => tree.len(),
            Backend::Balanced(tree) => tree.len(),
        }
    }

    fn __repr__(&self) -> String {
        let balanced = matches!(self.tree, Backend::Balanced(_));
        format!("IntervalStore(len={}, balanced={})", self.__len__(), balanced)
    }

    /// `store.insert(start, end)` — add the closed interval `[start, end]`.
    fn insert(&mut self, start: f64, end: f64) -> PyResult<()> {
        let interval = Interval::from_f64(start, end).inspect_err(|err| {
            log::debug!("rejected interval ({start}, {end}): {err}");
        })?;
        match &mut self.tree {
            Backend::Plain(tree) => tree.insert(interval),
            Backend::Balanced(tree) => tree.insert(interval),
        }
        Ok(())
    }

    /// `store.query(point)` → list of `(start, end)` tuples containing `point`.
    fn query(&self, point: f64) -> PyResult<Vec<(f64, f64)>> {
        let point = NotNan::new(point).map_err(IntervalError::from)?;
        let found = match &self.tree {
            Backend::Plain(tree) => tree.find_intersecting(&point),
            Backend::Balanced(tree) => tree.find_intersecting(&point),
        };
        Ok(found
            .into_iter()
            .map(|iv| (iv.start.into_inner(), iv.end.into_inner()))
            .collect())
    }

    /// Longest root-to-leaf path of the underlying tree.
    fn depth(&self) -> usize {
        match &self.tree {
            Backend::Plain(tree) => tree.depth(),
            Backend::Balanced(tree) => tree.height(),
        }
    }
}

/// Module initialization
#[pymodule]
fn augmented_itree(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<IntervalStore>()?;
    Ok(())
}
