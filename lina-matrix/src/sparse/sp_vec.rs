use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign, Mul, Index};
use std::fmt::Display;
use auto_impl_ops::auto_ops;
use itertools::Itertools;
use num_traits::NumCast;
use lina::Real;
use crate::{algebra, MatLike, VecLike};
use crate::dense::{Mat, Vector};
use crate::error::{ensure, Error, Result};

/// A vector of logical length `dim` whose positions read as `default`
/// unless overridden. Costs are proportional to the number of overrides.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SpVec<R> {
    default: R,
    dim: usize,
    entries: BTreeMap<usize, R>
}

impl<R> SpVec<R>
where R: Real {
    pub fn new(default: R, dim: usize) -> Self {
        Self { default, dim, entries: BTreeMap::new() }
    }

    pub fn zero(dim: usize) -> Self {
        Self::new(R::zero(), dim)
    }

    /// Entries are written with [`SpVec::set`], so an index beyond `dim`
    /// grows the vector.
    pub fn from_entries<I>(default: R, dim: usize, entries: I) -> Self
    where I: IntoIterator<Item = (usize, R)> {
        let mut v = Self::new(default, dim);
        for (i, a) in entries {
            v.set(i, a);
        }
        v
    }

    pub fn default_value(&self) -> R {
        self.default
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The number of overrides, including those equal to the default.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over the overrides in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &R)> {
        self.entries.iter().map(|(&i, a)| (i, a))
    }

    pub fn get(&self, i: usize) -> Option<R> {
        if i < self.dim {
            Some(self.entries.get(&i).copied().unwrap_or(self.default))
        } else {
            None
        }
    }

    pub fn try_at(&self, i: usize) -> Result<R> {
        self.get(i).ok_or(Error::OutOfRange { index: i, dim: self.dim })
    }

    /// Overrides position `i`, growing `dim` to `i + 1` if needed.
    pub fn set(&mut self, i: usize, a: R) {
        if i >= self.dim {
            self.dim = i + 1;
        }
        self.entries.insert(i, a);
    }

    fn map<F>(&self, f: F) -> Self
    where F: Fn(R) -> R {
        let entries = self.entries.iter().map(|(&i, &a)| (i, f(a))).collect();
        Self { default: f(self.default), dim: self.dim, entries }
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

    pub fn try_add(&self, other: &SpVec<R>) -> Result<Self> {
        self.zip_with("sum", other, |a, b| a + b)
    }

    pub fn try_sub(&self, other: &SpVec<R>) -> Result<Self> {
        self.zip_with("diff", other, |a, b| a - b)
    }

    // Visits the overrides of each operand once, reading the other side.
    pub(crate) fn zip_with<F>(&self, op: &'static str, other: &SpVec<R>, f: F) -> Result<Self>
    where F: Fn(R, R) -> R {
        ensure!(self.dim == other.dim, Error::DimMismatch { op, lhs: self.dim, rhs: other.dim });

        let default = f(self.default, other.default);
        let entries = Iterator::chain(
            self.iter().map(|(i, &a)| (i, f(a, other[i]))),
            other.iter().map(|(i, &b)| (i, f(self[i], b)))
        ).filter(|&(_, c)| c != default).collect();

        Ok(Self { default, dim: self.dim, entries })
    }

    pub fn dot<V>(&self, v: &V) -> Result<R>
    where V: VecLike<R> + ?Sized {
        algebra::dot(self, v)
    }

    // as a row vector: (1 x n) * (n x m).
    pub fn try_mul<M>(&self, a: &M) -> Result<Vector<R>>
    where M: MatLike<R> + ?Sized {
        algebra::vec_mat_mul(self, a)
    }

    fn unset_count(&self) -> usize {
        self.dim - self.entries.len()
    }

    pub fn sum(&self) -> R {
        let k = <R as NumCast>::from(self.unset_count()).unwrap_or_else(R::nan);
        let rest = self.default * k;
        self.entries.values().copied().sum::<R>() + rest
    }

    fn values_with_default(&self) -> impl Iterator<Item = R> + '_ {
        let d = (self.unset_count() > 0).then_some(self.default);
        self.entries.values().copied().chain(d)
    }

    pub fn min(&self) -> Option<R> {
        self.values_with_default().reduce(R::min)
    }

    pub fn max(&self) -> Option<R> {
        self.values_with_default().reduce(R::max)
    }

    pub fn is_zero(&self) -> bool {
        self.values_with_default().all(|a| a.is_zero())
    }

    pub fn to_dense(&self) -> Vector<R> {
        let mut v = Vector::fill(self.dim, self.default);
        for (i, &a) in self.iter() {
            v[i] = a;
        }
        v
    }

    pub fn to_vec(&self) -> Vec<R> {
        self.to_dense().into_vec()
    }
}

impl<R> VecLike<R> for SpVec<R>
where R: Real {
    fn dim(&self) -> usize {
        self.dim
    }

    fn at(&self, i: usize) -> R {
        self[i]
    }
}

impl<R> Index<usize> for SpVec<R>
where R: Real {
    type Output = R;
    fn index(&self, i: usize) -> &Self::Output {
        assert!(i < self.dim, "index {i} out of range for dimension {}", self.dim);
        self.entries.get(&i).unwrap_or(&self.default)
    }
}

// Equal as logical vectors, regardless of which positions are stored.
impl<R> PartialEq for SpVec<R>
where R: Real {
    fn eq(&self, other: &Self) -> bool {
        if self.dim != other.dim {
            return false
        }

        let keys = self.entries.keys().merge(other.entries.keys()).dedup().collect_vec();
        if keys.len() < self.dim && self.default != other.default {
            return false
        }

        keys.into_iter().all(|&i| self[i] == other[i])
    }
}

impl<R> Neg for SpVec<R>
where R: Real {
    type Output = Self;
    fn neg(self) -> Self::Output {
        self.map(|a| -a)
    }
}

impl<R> Neg for &SpVec<R>
where R: Real {
    type Output = SpVec<R>;
    fn neg(self) -> Self::Output {
        self.map(|a| -a)
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $try_method:ident) => {
        #[auto_ops]
        impl<'a, 'b, R> $trait<&'b SpVec<R>> for &'a SpVec<R>
        where R: Real {
            type Output = SpVec<R>;
            fn $method(self, rhs: &'b SpVec<R>) -> Self::Output {
                self.$try_method(rhs).unwrap_or_else(|e| panic!("{e}"))
            }
        }
    };
}

impl_binop!(Add, add, try_add);
impl_binop!(Sub, sub, try_sub);

// SpVec * Mat
#[auto_ops(val_val, val_ref, ref_val)]
impl<'a, 'b, R> Mul<&'b Mat<R>> for &'a SpVec<R>
where R: Real {
    type Output = Vector<R>;
    fn mul(self, rhs: &'b Mat<R>) -> Self::Output {
        self.try_mul(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl<R> Display for SpVec<R>
where R: Real {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&algebra::vec_text(self))
    }
}

#[cfg(feature = "serde")]
impl<'de, R> serde::Deserialize<'de> for SpVec<R>
where R: Real + serde::Deserialize<'de> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where D: serde::Deserializer<'de> {
        #[derive(serde::Deserialize)]
        struct Raw<R> {
            default: R,
            dim: usize,
            entries: BTreeMap<usize, R>
        }

        let Raw { default, dim, entries } = Raw::<R>::deserialize(deserializer)?;
        if let Some(&index) = entries.keys().find(|&&i| i >= dim) {
            let e = Error::OutOfRange { index, dim };
            return Err(serde::de::Error::custom(e))
        }

        Ok(Self { default, dim, entries })
    }
}
