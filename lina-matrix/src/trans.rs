use std::fmt::Display;
use itertools::Itertools;
use log::{debug, trace};
use lina::Real;
use lina::util::format::real_str;
use crate::MatTrait;
use crate::error::{ensure, Error, Result};

/// Targets of elementary row operations.
pub trait RowOps<R>: MatTrait {
    fn swap_rows(&mut self, i: usize, j: usize);

    /// `row_i <- sum_k c_k * row_{i_k}` for `coeffs = [(i_k, c_k)]`.
    /// The sources may include `i` itself, read before the write.
    fn combine_rows(&mut self, i: usize, coeffs: &[(usize, R)]);
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RowOp<R> {
    Swap(usize, usize),
    Combine(usize, Vec<(usize, R)>)
}

impl<R> RowOp<R>
where R: Real {
    pub fn perform<T>(&self, target: &mut T)
    where T: RowOps<R> + ?Sized {
        match self {
            RowOp::Swap(i, j) => target.swap_rows(*i, *j),
            RowOp::Combine(i, coeffs) => target.combine_rows(*i, coeffs),
        }
    }

    fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        let (i, others) = match self {
            RowOp::Swap(i, j) => (*i, vec![*j]),
            RowOp::Combine(i, coeffs) => (*i, coeffs.iter().map(|(k, _)| *k).collect())
        };
        std::iter::once(i).chain(others)
    }
}

impl<R> Display for RowOp<R>
where R: Real {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowOp::Swap(i, j) => write!(f, "swap-rows: ({i}, {j})"),
            RowOp::Combine(i, coeffs) => {
                let terms = coeffs.iter().map(|(k, c)|
                    format!("[row{k}, {}]", real_str(c))
                ).join(" ");
                write!(f, "combine-rows: row{i} <- {terms}")
            }
        }
    }
}

/// An ordered log of row operations recorded while reducing one matrix,
/// to be replayed verbatim against another matrix of the same shape.
#[derive(Clone, Debug, PartialEq)]
pub struct RowTrans<R> {
    shape: (usize, usize),
    ops: Vec<RowOp<R>>
}

impl<R> RowTrans<R>
where R: Real {
    pub fn new(shape: (usize, usize)) -> Self {
        Self { shape, ops: vec![] }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn ops(&self) -> &[RowOp<R>] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    fn push(&mut self, op: RowOp<R>) {
        assert!(op.rows().all(|i| i < self.shape.0), "{op} is out of {} rows.", self.shape.0);
        self.ops.push(op)
    }

    pub fn record_swap(&mut self, i: usize, j: usize) {
        self.push(RowOp::Swap(i, j))
    }

    pub fn record_combine(&mut self, i: usize, coeffs: Vec<(usize, R)>) {
        self.push(RowOp::Combine(i, coeffs))
    }

    pub fn perform_and_record_swap<T>(&mut self, i: usize, j: usize, target: &mut T)
    where T: RowOps<R> + ?Sized {
        target.swap_rows(i, j);
        self.record_swap(i, j);
    }

    pub fn perform_and_record_combine<T>(&mut self, i: usize, coeffs: Vec<(usize, R)>, target: &mut T)
    where T: RowOps<R> + ?Sized {
        target.combine_rows(i, &coeffs);
        self.record_combine(i, coeffs);
    }

    /// Replays the log, in recorded order, onto `target`.
    pub fn apply_in_place<T>(&self, target: &mut T) -> Result<()>
    where T: RowOps<R> + ?Sized {
        ensure!(target.shape() == self.shape, Error::ShapeMismatch {
            op: "replay", lhs: self.shape, rhs: target.shape()
        });

        debug!("replay {} row-ops onto {:?}.", self.len(), self.shape);

        for op in self.ops.iter() {
            trace!("{op}");
            op.perform(target);
        }

        Ok(())
    }

    pub fn apply<T>(&self, mut target: T) -> Result<T>
    where T: RowOps<R> {
        self.apply_in_place(&mut target)?;
        Ok(target)
    }
}

impl<R> Display for RowTrans<R>
where R: Real {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.ops.iter().join("\n"))
    }
}
