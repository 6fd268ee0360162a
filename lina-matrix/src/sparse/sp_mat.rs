use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign, Mul, Index};
use std::fmt::Display;
use auto_impl_ops::auto_ops;
use cartesian::cartesian;
use either::Either;
use itertools::Itertools;
use log::debug;
use lina::Real;
use crate::{algebra, MatLike, MatTrait, VecLike};
use crate::dense::{self, Mat, Vector};
use crate::error::{ensure, Error, Result};
use crate::trans::RowOps;
use super::SpVec;

/// A matrix whose entries read as `default` unless overridden, stored as
/// a map from row index to sparse rows. Absent rows are entirely default.
#[derive(Clone, Debug)]
pub struct SpMat<R> {
    default: R,
    shape: (usize, usize),
    rows: BTreeMap<usize, SpVec<R>>,
    empty_row: SpVec<R>
}

impl<R> MatTrait for SpMat<R> {
    fn shape(&self) -> (usize, usize) {
        self.shape
    }
}

impl<R> SpMat<R>
where R: Real {
    pub fn new(default: R, shape: (usize, usize)) -> Self {
        let empty_row = SpVec::new(default, shape.1);
        Self { default, shape, rows: BTreeMap::new(), empty_row }
    }

    pub fn zero(shape: (usize, usize)) -> Self {
        Self::new(R::zero(), shape)
    }

    pub fn id(n: usize) -> Self {
        Self::from_entries(R::zero(), (n, n), (0..n).map(|i| (i, i, R::one())))
    }

    /// Entries are written with [`SpMat::set`].
    pub fn from_entries<I>(default: R, shape: (usize, usize), entries: I) -> Self
    where I: IntoIterator<Item = (usize, usize, R)> {
        let mut a = Self::new(default, shape);
        for (i, j, x) in entries {
            a.set(i, j, x);
        }
        a
    }

    pub fn default_value(&self) -> R {
        self.default
    }

    pub fn nnz(&self) -> usize {
        self.rows.values().map(|r| r.nnz()).sum()
    }

    pub fn row(&self, i: usize) -> &SpVec<R> {
        assert!(i < self.nrows(), "row {i} out of range for {} rows", self.nrows());
        self.rows.get(&i).unwrap_or(&self.empty_row)
    }

    pub fn get(&self, i: usize, j: usize) -> Option<R> {
        if i < self.nrows() {
            self.row(i).get(j)
        } else {
            None
        }
    }

    pub fn try_entry(&self, i: usize, j: usize) -> Result<R> {
        ensure!(i < self.nrows(), Error::OutOfRange { index: i, dim: self.nrows() });
        self.row(i).try_at(j)
    }

    /// Overrides entry `(i, j)`, growing the row count to `i + 1` if needed.
    /// The column count is fixed, `j` must be below it.
    pub fn set(&mut self, i: usize, j: usize, a: R) {
        let n = self.ncols();
        assert!(j < n, "column {j} out of range for {n} columns");

        if i >= self.nrows() {
            self.shape.0 = i + 1;
        }
        self.row_entry(i).set(j, a);
    }

    fn row_entry(&mut self, i: usize) -> &mut SpVec<R> {
        self.rows.entry(i).or_insert_with(|| self.empty_row.clone())
    }

    /// Iterates over the overrides in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &R)> {
        self.rows.iter().flat_map(|(&i, r)|
            r.iter().map(move |(j, a)| (i, j, a))
        )
    }

    fn map<F>(&self, f: F) -> Self
    where F: Fn(&SpVec<R>) -> SpVec<R> {
        let rows = self.rows.iter().map(|(&i, r)| (i, f(r))).collect();
        let empty_row = f(&self.empty_row);
        let default = empty_row.default_value();
        Self { default, shape: self.shape, rows, empty_row }
    }

    pub fn add_scalar(&self, c: R) -> Self {
        self.map(|r| r.add_scalar(c))
    }

    pub fn sub_scalar(&self, c: R) -> Self {
        self.add_scalar(-c)
    }

    pub fn scale(&self, c: R) -> Self {
        self.map(|r| r.scale(c))
    }

    pub fn try_add(&self, other: &SpMat<R>) -> Result<Self> {
        self.zip_with("sum", other, |a, b| a + b)
    }

    pub fn try_sub(&self, other: &SpMat<R>) -> Result<Self> {
        self.zip_with("diff", other, |a, b| a - b)
    }

    fn zip_with<F>(&self, op: &'static str, other: &SpMat<R>, f: F) -> Result<Self>
    where F: Fn(R, R) -> R + Copy {
        ensure!(self.shape == other.shape, Error::ShapeMismatch { op, lhs: self.shape, rhs: other.shape });

        let mut res = Self::new(f(self.default, other.default), self.shape);
        for &i in self.rows.keys().merge(other.rows.keys()).dedup() {
            let r = self.row(i).zip_with(op, other.row(i), f)?;
            if r.nnz() > 0 {
                res.rows.insert(i, r);
            }
        }

        Ok(res)
    }

    pub fn try_mul<M>(&self, b: &M) -> Result<Mat<R>>
    where M: MatLike<R> + ?Sized {
        algebra::mat_mul(self, b)
    }

    pub fn mul_vec<V>(&self, v: &V) -> Result<Vector<R>>
    where V: VecLike<R> + ?Sized {
        algebra::mat_vec_mul(self, v)
    }

    pub fn transpose(&self) -> Self {
        let (m, n) = self.shape;
        Self::from_entries(self.default, (n, m),
            self.iter().map(|(i, j, &a)| (j, i, a))
        )
    }

    /// The `(i, j)` entry of the transpose, read in place.
    pub fn t(&self, i: usize, j: usize) -> R {
        self[(j, i)]
    }

    pub fn is_id(&self) -> bool {
        let n = self.nrows();
        self.is_square() && cartesian!(0..n, 0..n).all(|(i, j)| {
            let a = self[(i, j)];
            if i == j { a.is_one() } else { a.is_zero() }
        })
    }

    /// A shape with a zero dimension collapses to the null dense matrix.
    pub fn to_dense(&self) -> Mat<R> {
        let m = self.nrows();
        Mat::from_rows_unchecked((0..m).map(|i| self.row(i).to_vec()))
    }

    /// The inverse as a sparse matrix. Elimination runs on a dense copy,
    /// the recorded row operations are replayed onto the sparse identity.
    pub fn inv(&self) -> Result<SpMat<R>> {
        ensure!(self.is_square(), Error::NotSquare(self.shape));

        let trans = dense::elimination_log(&self.to_dense())?;
        let res = trans.apply(SpMat::id(self.nrows()))?;

        debug!("sparse inv done: {:?}, nnz: {}.", self.shape, res.nnz());

        Ok(res)
    }
}

impl<R> MatLike<R> for SpMat<R>
where R: Real {
    fn entry(&self, i: usize, j: usize) -> R {
        self[(i, j)]
    }
}

impl<R> RowOps<R> for SpMat<R>
where R: Real {
    fn swap_rows(&mut self, i: usize, j: usize) {
        let ri = self.rows.remove(&i);
        let rj = self.rows.remove(&j);
        if let Some(r) = ri {
            self.rows.insert(j, r);
        }
        if let Some(r) = rj {
            self.rows.insert(i, r);
        }
    }

    // Only the columns overridden in some source row can differ from the
    // combined default, unless the weights do not preserve the default.
    fn combine_rows(&mut self, i: usize, coeffs: &[(usize, R)]) {
        let n = self.ncols();
        let d = self.default;
        let d_comb = coeffs.iter().map(|&(_, c)| c * d).sum::<R>();

        let cols = if d_comb != d {
            Either::Left(0..n)
        } else {
            let cols: BTreeSet<_> = coeffs.iter().flat_map(|&(k, _)|
                self.rows.get(&k).into_iter().flat_map(|r| r.iter().map(|(j, _)| j))
            ).collect();
            Either::Right(cols.into_iter())
        };

        let mut row = SpVec::new(d, n);
        for j in cols {
            let a = coeffs.iter().map(|&(k, c)| c * self[(k, j)]).sum::<R>();
            if a != d {
                row.set(j, a);
            }
        }

        if row.nnz() > 0 {
            self.rows.insert(i, row);
        } else {
            self.rows.remove(&i);
        }
    }
}

impl<R> Index<(usize, usize)> for SpMat<R>
where R: Real {
    type Output = R;
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.row(index.0)[index.1]
    }
}

// Equal as logical matrices, regardless of which entries are stored.
impl<R> PartialEq for SpMat<R>
where R: Real {
    fn eq(&self, other: &Self) -> bool {
        if self.shape != other.shape {
            return false
        }

        let keys = self.rows.keys().merge(other.rows.keys()).dedup().collect_vec();
        if keys.len() < self.nrows() && self.empty_row != other.empty_row {
            return false
        }

        keys.into_iter().all(|&i| self.row(i) == other.row(i))
    }
}

impl<R> Neg for SpMat<R>
where R: Real {
    type Output = Self;
    fn neg(self) -> Self::Output {
        self.map(|r| -r)
    }
}

impl<R> Neg for &SpMat<R>
where R: Real {
    type Output = SpMat<R>;
    fn neg(self) -> Self::Output {
        self.map(|r| -r)
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $try_method:ident) => {
        #[auto_ops]
        impl<'a, 'b, R> $trait<&'b SpMat<R>> for &'a SpMat<R>
        where R: Real {
            type Output = SpMat<R>;
            fn $method(self, rhs: &'b SpMat<R>) -> Self::Output {
                self.$try_method(rhs).unwrap_or_else(|e| panic!("{e}"))
            }
        }
    };
}

impl_binop!(Add, add, try_add);
impl_binop!(Sub, sub, try_sub);

// SpMat * SpMat
#[auto_ops(val_val, val_ref, ref_val)]
impl<'a, 'b, R> Mul<&'b SpMat<R>> for &'a SpMat<R>
where R: Real {
    type Output = Mat<R>;
    fn mul(self, rhs: &'b SpMat<R>) -> Self::Output {
        self.try_mul(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

// SpMat * Vector
#[auto_ops(val_val, val_ref, ref_val)]
impl<'a, 'b, R> Mul<&'b Vector<R>> for &'a SpMat<R>
where R: Real {
    type Output = Vector<R>;
    fn mul(self, rhs: &'b Vector<R>) -> Self::Output {
        self.mul_vec(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl<R> Display for SpMat<R>
where R: Real {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&algebra::mat_text(self))
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct SpMatRaw<R> {
    default: R,
    shape: (usize, usize),
    entries: Vec<(usize, usize, R)>
}

#[cfg(feature = "serde")]
impl<R> serde::Serialize for SpMat<R>
where R: Real + serde::Serialize {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where S: serde::Serializer {
        SpMatRaw {
            default: self.default,
            shape: self.shape,
            entries: self.iter().map(|(i, j, &a)| (i, j, a)).collect()
        }.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, R> serde::Deserialize<'de> for SpMat<R>
where R: Real + serde::Deserialize<'de> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where D: serde::Deserializer<'de> {
        let SpMatRaw { default, shape, entries } = SpMatRaw::<R>::deserialize(deserializer)?;
        let (m, n) = shape;
        if let Some(&(i, j, _)) = entries.iter().find(|(i, j, _)| *i >= m || *j >= n) {
            let e = Error::ShapeMismatch { op: "deserialize", lhs: shape, rhs: (i + 1, j + 1) };
            return Err(serde::de::Error::custom(e))
        }

        Ok(Self::from_entries(default, shape, entries))
    }
}
