// Routines over anything vector-like or matrix-like, so that dense and
// sparse operands combine without per-pair code. Each routine costs
// O(result size) reads, at whatever price the operands charge per read.

use cartesian::cartesian;
use itertools::Itertools;
use lina::Real;
use lina::util::format::{grid, line, real_str};
use crate::{MatLike, VecLike};
use crate::dense::{Mat, Vector};
use crate::error::{ensure, Error, Result};

pub fn vec_sum<R, A, B>(a: &A, b: &B) -> Result<Vector<R>>
where R: Real, A: VecLike<R> + ?Sized, B: VecLike<R> + ?Sized {
    vec_zip_with("sum", a, b, |x, y| x + y)
}

pub fn vec_diff<R, A, B>(a: &A, b: &B) -> Result<Vector<R>>
where R: Real, A: VecLike<R> + ?Sized, B: VecLike<R> + ?Sized {
    vec_zip_with("diff", a, b, |x, y| x - y)
}

fn vec_zip_with<R, A, B, F>(op: &'static str, a: &A, b: &B, f: F) -> Result<Vector<R>>
where R: Real, A: VecLike<R> + ?Sized, B: VecLike<R> + ?Sized, F: Fn(R, R) -> R {
    ensure!(a.dim() == b.dim(), Error::DimMismatch { op, lhs: a.dim(), rhs: b.dim() });

    let data = (0..a.dim()).map(|i| f(a.at(i), b.at(i))).collect_vec();
    Ok(Vector::from(data))
}

pub fn dot<R, A, B>(a: &A, b: &B) -> Result<R>
where R: Real, A: VecLike<R> + ?Sized, B: VecLike<R> + ?Sized {
    ensure!(a.dim() == b.dim(), Error::DimMismatch { op: "dot", lhs: a.dim(), rhs: b.dim() });

    let s = (0..a.dim()).map(|i| a.at(i) * b.at(i)).sum::<R>();
    Ok(s)
}

pub fn mat_sum<R, A, B>(a: &A, b: &B) -> Result<Mat<R>>
where R: Real, A: MatLike<R> + ?Sized, B: MatLike<R> + ?Sized {
    mat_zip_with("sum", a, b, |x, y| x + y)
}

pub fn mat_diff<R, A, B>(a: &A, b: &B) -> Result<Mat<R>>
where R: Real, A: MatLike<R> + ?Sized, B: MatLike<R> + ?Sized {
    mat_zip_with("diff", a, b, |x, y| x - y)
}

fn mat_zip_with<R, A, B, F>(op: &'static str, a: &A, b: &B, f: F) -> Result<Mat<R>>
where R: Real, A: MatLike<R> + ?Sized, B: MatLike<R> + ?Sized, F: Fn(R, R) -> R {
    ensure!(a.shape() == b.shape(), Error::ShapeMismatch { op, lhs: a.shape(), rhs: b.shape() });

    let (m, n) = a.shape();
    let rows = (0..m).map(|i|
        (0..n).map(|j| f(a.entry(i, j), b.entry(i, j))).collect_vec()
    );
    Ok(Mat::from_rows_unchecked(rows))
}

/// The standard triple loop. Requires `a.ncols() == b.nrows()`.
pub fn mat_mul<R, A, B>(a: &A, b: &B) -> Result<Mat<R>>
where R: Real, A: MatLike<R> + ?Sized, B: MatLike<R> + ?Sized {
    ensure!(a.ncols() == b.nrows(), Error::ShapeMismatch { op: "mul", lhs: a.shape(), rhs: b.shape() });

    let (m, l, n) = (a.nrows(), a.ncols(), b.ncols());
    let rows = (0..m).map(|i|
        (0..n).map(|j|
            (0..l).map(|k| a.entry(i, k) * b.entry(k, j)).sum::<R>()
        ).collect_vec()
    );
    Ok(Mat::from_rows_unchecked(rows))
}

pub fn mat_vec_mul<R, A, V>(a: &A, v: &V) -> Result<Vector<R>>
where R: Real, A: MatLike<R> + ?Sized, V: VecLike<R> + ?Sized {
    ensure!(a.ncols() == v.dim(), Error::ShapeMismatch { op: "mul", lhs: a.shape(), rhs: (v.dim(), 1) });

    let (m, n) = a.shape();
    let data = (0..m).map(|i|
        (0..n).map(|j| a.entry(i, j) * v.at(j)).sum::<R>()
    ).collect_vec();
    Ok(Vector::from(data))
}

/// `v` is taken as a `1 x n` row vector.
pub fn vec_mat_mul<R, V, A>(v: &V, a: &A) -> Result<Vector<R>>
where R: Real, V: VecLike<R> + ?Sized, A: MatLike<R> + ?Sized {
    ensure!(v.dim() == a.nrows(), Error::ShapeMismatch { op: "mul", lhs: (1, v.dim()), rhs: a.shape() });

    let (m, n) = a.shape();
    let data = (0..n).map(|j|
        (0..m).map(|k| v.at(k) * a.entry(k, j)).sum::<R>()
    ).collect_vec();
    Ok(Vector::from(data))
}

pub fn max_abs_diff_vec<R, A, B>(a: &A, b: &B) -> Result<R>
where R: Real, A: VecLike<R> + ?Sized, B: VecLike<R> + ?Sized {
    ensure!(a.dim() == b.dim(), Error::DimMismatch { op: "diff", lhs: a.dim(), rhs: b.dim() });

    let d = (0..a.dim())
        .map(|i| (a.at(i) - b.at(i)).abs())
        .fold(R::zero(), R::max);
    Ok(d)
}

pub fn max_abs_diff_mat<R, A, B>(a: &A, b: &B) -> Result<R>
where R: Real, A: MatLike<R> + ?Sized, B: MatLike<R> + ?Sized {
    ensure!(a.shape() == b.shape(), Error::ShapeMismatch { op: "diff", lhs: a.shape(), rhs: b.shape() });

    let (m, n) = a.shape();
    let d = cartesian!(0..m, 0..n)
        .map(|(i, j)| (a.entry(i, j) - b.entry(i, j)).abs())
        .fold(R::zero(), R::max);
    Ok(d)
}

pub fn vec_text<R, V>(v: &V) -> String
where R: Real, V: VecLike<R> + ?Sized {
    let cells = (0..v.dim()).map(|i| real_str(&v.at(i))).collect_vec();
    line(&cells)
}

pub fn mat_text<R, A>(a: &A) -> String
where R: Real, A: MatLike<R> + ?Sized {
    let (m, n) = a.shape();
    let rows = (0..m).map(|i|
        (0..n).map(|j| real_str(&a.entry(i, j))).collect_vec()
    ).collect_vec();
    grid(&rows)
}
