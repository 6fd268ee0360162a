use std::ops::{Add, AddAssign, Neg, Sub, SubAssign, Mul, Index, IndexMut};
use std::fmt::Display;
use auto_impl_ops::auto_ops;
use delegate::delegate;
use itertools::Itertools;
use lina::Real;
use crate::{algebra, MatLike, VecLike};
use crate::error::Result;
use crate::sparse::SpVec;
use super::Mat;

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Vector<R> {
    data: Vec<R>
}

impl<R> Vector<R> {
    pub fn new(data: Vec<R>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[R] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<R> {
        self.data
    }

    delegate! { to self.data {
        #[call(len)]
        pub fn dim(&self) -> usize;
        pub fn is_empty(&self) -> bool;
        pub fn iter(&self) -> std::slice::Iter<'_, R>;
        pub fn get(&self, i: usize) -> Option<&R>;
    }}
}

impl<R> Vector<R>
where R: Real {
    pub fn zero(dim: usize) -> Self {
        Self::fill(dim, R::zero())
    }

    pub fn fill(dim: usize, a: R) -> Self {
        Self::new(vec![a; dim])
    }

    pub fn unit(dim: usize, i: usize) -> Self {
        assert!(i < dim);
        let mut v = Self::zero(dim);
        v[i] = R::one();
        v
    }

    fn map<F>(&self, f: F) -> Self
    where F: Fn(R) -> R {
        Self::new(self.data.iter().map(|&a| f(a)).collect())
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

    pub fn try_add<V>(&self, v: &V) -> Result<Self>
    where V: VecLike<R> + ?Sized {
        algebra::vec_sum(self, v)
    }

    pub fn try_sub<V>(&self, v: &V) -> Result<Self>
    where V: VecLike<R> + ?Sized {
        algebra::vec_diff(self, v)
    }

    pub fn dot<V>(&self, v: &V) -> Result<R>
    where V: VecLike<R> + ?Sized {
        algebra::dot(self, v)
    }

    // as a row vector: (1 x n) * (n x m).
    pub fn try_mul<M>(&self, a: &M) -> Result<Self>
    where M: MatLike<R> + ?Sized {
        algebra::vec_mat_mul(self, a)
    }

    pub fn sum(&self) -> R {
        self.data.iter().copied().sum()
    }

    pub fn min(&self) -> Option<R> {
        self.data.iter().copied().reduce(R::min)
    }

    pub fn max(&self) -> Option<R> {
        self.data.iter().copied().reduce(R::max)
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|a| a.is_zero())
    }

    /// Stores only the entries that differ from `default`.
    pub fn to_sparse(&self, default: R) -> SpVec<R> {
        SpVec::from_entries(default, self.dim(),
            self.data.iter().copied().enumerate().filter(|&(_, a)| a != default)
        )
    }
}

impl<R> From<Vec<R>> for Vector<R> {
    fn from(data: Vec<R>) -> Self {
        Self::new(data)
    }
}

impl<R> From<Vector<R>> for Vec<R> {
    fn from(v: Vector<R>) -> Self {
        v.into_vec()
    }
}

impl<R> FromIterator<R> for Vector<R> {
    fn from_iter<T: IntoIterator<Item = R>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect_vec())
    }
}

impl<R> VecLike<R> for Vector<R>
where R: Real {
    fn dim(&self) -> usize {
        self.data.len()
    }

    fn at(&self, i: usize) -> R {
        self.data[i]
    }
}

impl<R> Index<usize> for Vector<R> {
    type Output = R;
    fn index(&self, i: usize) -> &Self::Output {
        &self.data[i]
    }
}

impl<R> IndexMut<usize> for Vector<R> {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.data[i]
    }
}

impl<R> Neg for Vector<R>
where R: Real {
    type Output = Self;
    fn neg(self) -> Self::Output {
        self.map(|a| -a)
    }
}

impl<R> Neg for &Vector<R>
where R: Real {
    type Output = Vector<R>;
    fn neg(self) -> Self::Output {
        self.map(|a| -a)
    }
}

// Operators panic on dimension mismatch, use `try_*` to recover.
macro_rules! impl_binop {
    ($trait:ident, $method:ident, $try_method:ident) => {
        #[auto_ops]
        impl<'a, 'b, R> $trait<&'b Vector<R>> for &'a Vector<R>
        where R: Real {
            type Output = Vector<R>;
            fn $method(self, rhs: &'b Vector<R>) -> Self::Output {
                self.$try_method(rhs).unwrap_or_else(|e| panic!("{e}"))
            }
        }
    };
}

impl_binop!(Add, add, try_add);
impl_binop!(Sub, sub, try_sub);

// Vector * Mat
#[auto_ops(val_val, val_ref, ref_val)]
impl<'a, 'b, R> Mul<&'b Mat<R>> for &'a Vector<R>
where R: Real {
    type Output = Vector<R>;
    fn mul(self, rhs: &'b Mat<R>) -> Self::Output {
        self.try_mul(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl<R> Display for Vector<R>
where R: Real {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&algebra::vec_text(self))
    }
}
