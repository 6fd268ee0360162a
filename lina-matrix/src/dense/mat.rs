use std::ops::{Add, AddAssign, Neg, Sub, SubAssign, Mul, MulAssign, Index, IndexMut, Range};
use std::fmt::Display;
use auto_impl_ops::auto_ops;
use cartesian::cartesian;
use itertools::Itertools;
use lina::Real;
use crate::{algebra, MatLike, MatTrait, VecLike};
use crate::error::{ensure, Error, Result};
use crate::sparse::SpMat;
use crate::trans::RowOps;
use super::Vector;

/// Row-major dense matrix. All rows have the same length, and a matrix
/// with rows always has columns. The matrix with no rows is the null
/// matrix, of shape `(0, 0)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mat<R> {
    rows: Vec<Vector<R>>,
    shape: (usize, usize)
}

impl<R> MatTrait for Mat<R> {
    fn shape(&self) -> (usize, usize) {
        self.shape
    }
}

impl<R> Mat<R> {
    pub fn null() -> Self {
        Self { rows: vec![], shape: (0, 0) }
    }

    pub fn try_from_rows(rows: Vec<Vec<R>>) -> Result<Self> {
        let m = rows.len();
        let Some(first) = rows.first() else {
            return Ok(Self::null())
        };

        let n = first.len();
        ensure!(n > 0, Error::Malformed(format!("{m} rows of length 0")));

        if let Some(i) = rows.iter().position(|r| r.len() != n) {
            return Err(Error::Malformed(format!(
                "row {i} has length {}, expected {n}", rows[i].len()
            )))
        }

        let rows = rows.into_iter().map(Vector::from).collect();
        Ok(Self { rows, shape: (m, n) })
    }

    // rows must be of equal length.
    pub(crate) fn from_rows_unchecked<I>(rows: I) -> Self
    where I: IntoIterator<Item = Vec<R>> {
        let rows = rows.into_iter().map(Vector::from).collect_vec();
        let n = rows.first().map(|r| r.dim()).unwrap_or(0);

        if n == 0 {
            return Self::null()
        }

        debug_assert!(rows.iter().all(|r| r.dim() == n));

        let shape = (rows.len(), n);
        Self { rows, shape }
    }

    /// Builds a `shape.0 x shape.1` matrix from row-major `data`.
    pub fn from_data<I>(shape: (usize, usize), data: I) -> Result<Self>
    where I: IntoIterator<Item = R> {
        let (m, n) = shape;
        let data = data.into_iter().collect_vec();

        ensure!(data.len() == m * n, Error::Malformed(format!(
            "{} values given for shape {shape:?}", data.len()
        )));

        if m == 0 {
            return Ok(Self::null())
        }

        let mut itr = data.into_iter();
        let rows = (0..m).map(|_| itr.by_ref().take(n).collect_vec()).collect_vec();
        Self::try_from_rows(rows)
    }

    pub fn rows(&self) -> &[Vector<R>] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> &Vector<R> {
        &self.rows[i]
    }

    pub fn into_rows(self) -> Vec<Vec<R>> {
        self.rows.into_iter().map(Vector::into_vec).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &R)> {
        self.rows.iter().enumerate().flat_map(|(i, r)|
            r.iter().enumerate().map(move |(j, a)| (i, j, a))
        )
    }

    pub fn is_null(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R> Mat<R>
where R: Real {
    /// A shape with a zero dimension gives the null matrix, of shape `(0, 0)`.
    pub fn zero(shape: (usize, usize)) -> Self {
        let (m, n) = shape;
        Self::from_rows_unchecked((0..m).map(|_| vec![R::zero(); n]))
    }

    pub fn id(n: usize) -> Self {
        Self::from_rows_unchecked((0..n).map(|i|
            (0..n).map(|j| if i == j { R::one() } else { R::zero() }).collect_vec()
        ))
    }

    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, _, a)| a.is_zero())
    }

    pub fn is_id(&self) -> bool {
        self.is_square() && self.iter().all(|(i, j, a)|
            i == j && a.is_one() ||
            i != j && a.is_zero()
        )
    }

    /// The `(i, j)` entry of the transpose, read in place.
    pub fn t(&self, i: usize, j: usize) -> R {
        self[(j, i)]
    }

    pub fn transpose(&self) -> Self {
        let (m, n) = self.shape;
        Self::from_rows_unchecked((0..n).map(|j|
            (0..m).map(|i| self[(i, j)]).collect_vec()
        ))
    }

    fn map<F>(&self, f: F) -> Self
    where F: Fn(R) -> R {
        let rows = self.rows.iter().map(|r|
            r.iter().map(|&a| f(a)).collect()
        ).collect();
        Self { rows, shape: self.shape }
    }

    pub fn add_scalar(&self, c: R) -> Self {
        self.map(|a| a + c)
    }

    pub fn sub_scalar(&self, c: R) -> Self {
        self.add_scalar(-c)
    }

    pub fn scale(&self, c: R) -> Self {
        self.map(|a| a * c)
    }

    pub fn try_add<M>(&self, b: &M) -> Result<Self>
    where M: MatLike<R> + ?Sized {
        algebra::mat_sum(self, b)
    }

    pub fn try_sub<M>(&self, b: &M) -> Result<Self>
    where M: MatLike<R> + ?Sized {
        algebra::mat_diff(self, b)
    }

    pub fn try_mul<M>(&self, b: &M) -> Result<Self>
    where M: MatLike<R> + ?Sized {
        algebra::mat_mul(self, b)
    }

    pub fn mul_vec<V>(&self, v: &V) -> Result<Vector<R>>
    where V: VecLike<R> + ?Sized {
        algebra::mat_vec_mul(self, v)
    }

    /// Stores only the entries that differ from `default`.
    pub fn to_sparse(&self, default: R) -> SpMat<R> {
        let (m, n) = self.shape;
        SpMat::from_entries(default, self.shape,
            cartesian!(0..m, 0..n)
                .map(|(i, j)| (i, j, self[(i, j)]))
                .filter(|&(_, _, a)| a != default)
        )
    }

    // row_i <- sum_k c_k * row_{i_k}, only over the columns in `cols`.
    pub(crate) fn combine_rows_in(&mut self, i: usize, coeffs: &[(usize, R)], cols: Range<usize>) {
        for j in cols {
            let s = coeffs.iter().map(|&(k, c)| self.rows[k][j] * c).sum::<R>();
            self.rows[i][j] = s;
        }
    }
}

impl<R> TryFrom<Vec<Vec<R>>> for Mat<R> {
    type Error = Error;
    fn try_from(rows: Vec<Vec<R>>) -> Result<Self> {
        Self::try_from_rows(rows)
    }
}

impl<R> From<Mat<R>> for Vec<Vec<R>> {
    fn from(a: Mat<R>) -> Self {
        a.into_rows()
    }
}

impl<R> MatLike<R> for Mat<R>
where R: Real {
    fn entry(&self, i: usize, j: usize) -> R {
        self.rows[i][j]
    }
}

impl<R> RowOps<R> for Mat<R>
where R: Real {
    fn swap_rows(&mut self, i: usize, j: usize) {
        self.rows.swap(i, j)
    }

    fn combine_rows(&mut self, i: usize, coeffs: &[(usize, R)]) {
        let n = self.ncols();
        self.combine_rows_in(i, coeffs, 0..n)
    }
}

impl<R> Index<(usize, usize)> for Mat<R> {
    type Output = R;
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.rows[index.0][index.1]
    }
}

impl<R> IndexMut<(usize, usize)> for Mat<R> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.rows[index.0][index.1]
    }
}

impl<R> Neg for Mat<R>
where R: Real {
    type Output = Self;
    fn neg(self) -> Self::Output {
        self.map(|a| -a)
    }
}

impl<R> Neg for &Mat<R>
where R: Real {
    type Output = Mat<R>;
    fn neg(self) -> Self::Output {
        self.map(|a| -a)
    }
}

// Operators panic on shape mismatch, use `try_*` to recover.
macro_rules! impl_binop {
    ($trait:ident, $method:ident, $try_method:ident) => {
        #[auto_ops]
        impl<'a, 'b, R> $trait<&'b Mat<R>> for &'a Mat<R>
        where R: Real {
            type Output = Mat<R>;
            fn $method(self, rhs: &'b Mat<R>) -> Self::Output {
                self.$try_method(rhs).unwrap_or_else(|e| panic!("{e}"))
            }
        }
    };
}

impl_binop!(Add, add, try_add);
impl_binop!(Sub, sub, try_sub);
impl_binop!(Mul, mul, try_mul);

// Mat * Vector
#[auto_ops(val_val, val_ref, ref_val)]
impl<'a, 'b, R> Mul<&'b Vector<R>> for &'a Mat<R>
where R: Real {
    type Output = Vector<R>;
    fn mul(self, rhs: &'b Vector<R>) -> Self::Output {
        self.mul_vec(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl<R> Display for Mat<R>
where R: Real {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&algebra::mat_text(self))
    }
}

#[cfg(feature = "serde")]
impl<R> serde::Serialize for Mat<R>
where R: serde::Serialize {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where S: serde::Serializer {
        self.rows.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, R> serde::Deserialize<'de> for Mat<R>
where R: serde::Deserialize<'de> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where D: serde::Deserializer<'de> {
        let rows = Vec::<Vec<R>>::deserialize(deserializer)?;
        Self::try_from_rows(rows).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init() {
        let a = Mat::try_from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(a.shape(), (2, 2));
        assert_eq!(a[(1, 0)], 3.0);
        assert_eq!(a.row(0), &Vector::from(vec![1.0, 2.0]));
    }

    #[test]
    fn init_unequal_rows() {
        let a = Mat::try_from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(a, Err(Error::Malformed(_))));
    }

    #[test]
    fn init_zero_length_row() {
        let a = Mat::<f64>::try_from_rows(vec![vec![], vec![]]);
        assert!(matches!(a, Err(Error::Malformed(_))));
    }

    #[test]
    fn init_null() {
        let a = Mat::<f64>::try_from_rows(vec![]).unwrap();
        assert!(a.is_null());
        assert_eq!(a.shape(), (0, 0));
        assert_eq!(a, Mat::null());
    }

    #[test]
    fn zero_with_empty_dim() {
        assert!(Mat::<f64>::zero((2, 0)).is_null());
        assert!(Mat::<f64>::zero((0, 3)).is_null());
        assert_eq!(Mat::<f64>::zero((2, 0)).shape(), (0, 0));
    }

    #[test]
    fn from_data() {
        let a = Mat::from_data((2, 3), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(a.into_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert!(Mat::from_data((2, 3), [1.0, 2.0]).is_err());
    }

    #[test]
    fn id() {
        let e = Mat::<f64>::id(3);
        assert!(e.is_id());
        assert_eq!(e, Mat::from_data((3, 3), [
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,
        ]).unwrap());
        assert!(Mat::<f64>::id(0).is_null());
    }

    #[test]
    fn transpose() {
        let a = Mat::from_data((2, 3), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let b = a.transpose();
        assert_eq!(b, Mat::from_data((3, 2), [1.0, 4.0, 2.0, 5.0, 3.0, 6.0]).unwrap());
        assert_eq!(b.transpose(), a);

        for (i, j, x) in b.iter() {
            assert_eq!(a.t(i, j), *x);
        }
    }

    #[test]
    fn scalar_ops() {
        let a = Mat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(a.add_scalar(1.0), Mat::from_data((2, 2), [2.0, 3.0, 4.0, 5.0]).unwrap());
        assert_eq!(a.sub_scalar(1.0), Mat::from_data((2, 2), [0.0, 1.0, 2.0, 3.0]).unwrap());
        assert_eq!(a.scale(-1.0), -&a);
        assert_eq!(a.add_scalar(0.0), a);
    }

    #[test]
    fn add_sub() {
        let a = Mat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Mat::from_data((2, 2), [4.0, 3.0, 2.0, 1.0]).unwrap();
        assert_eq!(&a + &b, Mat::from_data((2, 2), [5.0; 4]).unwrap());
        assert_eq!(a - b, Mat::from_data((2, 2), [-3.0, -1.0, 1.0, 3.0]).unwrap());
    }

    #[test]
    fn add_mismatch() {
        let a = Mat::<f64>::zero((2, 2));
        let b = Mat::<f64>::zero((2, 3));
        assert_eq!(a.try_add(&b), Err(Error::ShapeMismatch { op: "sum", lhs: (2, 2), rhs: (2, 3) }));
    }

    #[test]
    fn mul() {
        let a = Mat::from_data((2, 2), [4.0, 7.0, 2.0, 6.0]).unwrap();
        let e = Mat::id(2);
        assert_eq!(&a * &e, a);
        assert_eq!(&e * &a, a);
    }

    #[test]
    #[should_panic]
    fn mul_mismatch_panics() {
        let a = Mat::<f64>::zero((2, 3));
        let _ = &a * &a;
    }

    #[test]
    fn mul_vec() {
        let a = Mat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]).unwrap();
        let v = Vector::from(vec![1.0, 1.0]);
        assert_eq!(&a * &v, Vector::from(vec![3.0, 7.0]));
        assert_eq!(a.mul_vec(&[1.0, 0.0][..]), Ok(Vector::from(vec![1.0, 3.0])));
    }

    #[test]
    fn row_ops() {
        let mut a = Mat::from_data((3, 2), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        a.swap_rows(0, 2);
        assert_eq!(a, Mat::from_data((3, 2), [5.0, 6.0, 3.0, 4.0, 1.0, 2.0]).unwrap());

        a.combine_rows(1, &[(1, 1.0), (0, -2.0)]);
        assert_eq!(a, Mat::from_data((3, 2), [5.0, 6.0, -7.0, -8.0, 1.0, 2.0]).unwrap());
    }

    #[test]
    fn to_sparse() {
        let a = Mat::from_data((2, 3), [0.0, 1.0, 0.0, 0.0, 0.0, 2.0]).unwrap();
        let s = a.to_sparse(0.0);
        assert_eq!(s.nnz(), 2);
        assert_eq!(s.to_dense(), a);
    }

    #[test]
    fn display() {
        let a = Mat::from_data((2, 2), [1.0, 2.0, 30.0, -4.0]).unwrap();
        assert_eq!(a.to_string(), " 1.000000  2.000000\n30.000000 -4.000000");
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serialize() {
        let a = Mat::from_data((2, 3), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let ser = serde_json::to_string(&a).unwrap();
        assert_eq!(ser, "[[1.0,2.0,3.0],[4.0,5.0,6.0]]");
        let des: Mat<f64> = serde_json::from_str(&ser).unwrap();
        assert_eq!(a, des);
        assert!(serde_json::from_str::<Mat<f64>>("[[1.0,2.0],[3.0]]").is_err());
    }
}
