use log::{debug, trace};
use lina::Real;
use crate::config;
use crate::error::{ensure, Error, Result};
use crate::trans::RowTrans;
use super::*;

impl<R> Mat<R>
where R: Real {
    /// The inverse, computed by Gauss-Jordan elimination with the global
    /// pivot threshold (see [`config::pivot_eps`]).
    pub fn inv(&self) -> Result<Mat<R>> {
        self.inv_with(R::of_f64(config::pivot_eps()))
    }

    pub fn inv_with(&self, eps: R) -> Result<Mat<R>> {
        let trans = elimination_log_with(self, eps)?;
        let n = self.nrows();
        let res = trans.apply(Mat::id(n))?;

        debug!("inv done: {:?}, {} row-ops.", self.shape(), trans.len());
        trace!("{res}");

        Ok(res)
    }
}

/// Reduces a copy of `target` to the identity and returns the row operations
/// performed. Replaying them onto the identity yields the inverse.
pub fn elimination_log<R>(target: &Mat<R>) -> Result<RowTrans<R>>
where R: Real {
    elimination_log_with(target, R::of_f64(config::pivot_eps()))
}

pub fn elimination_log_with<R>(target: &Mat<R>, eps: R) -> Result<RowTrans<R>>
where R: Real {
    ensure!(target.is_square(), Error::NotSquare(target.shape()));

    debug!("start elimination: {:?}, eps: {eps}.", target.shape());
    trace!("{target}");

    let mut calc = InvCalc::new(target.clone(), eps);

    calc.process()?;

    debug!("elimination done: {} row-ops.", calc.trans.len());

    Ok(calc.into_trans())
}

/// Working state of a Gauss-Jordan reduction. Every row operation applied
/// to `target` is also recorded in `trans`.
#[derive(Debug)]
pub struct InvCalc<R> {
    target: Mat<R>,
    trans: RowTrans<R>,
    thresh: Vec<R>
}

impl<R> InvCalc<R>
where R: Real {
    /// A candidate `a` in row `i` is not used as a pivot if
    /// `|a| <= eps * max_j |target_ij|`, taken over the input row.
    /// Thresholds travel with their rows on swaps.
    pub fn new(target: Mat<R>, eps: R) -> Self {
        let thresh = (0..target.nrows()).map(|i|
            eps * target.row(i).iter().map(|a| a.abs()).fold(R::zero(), R::max)
        ).collect();
        let trans = RowTrans::new(target.shape());
        Self { target, trans, thresh }
    }

    pub fn target(&self) -> &Mat<R> {
        &self.target
    }

    pub fn trans(&self) -> &RowTrans<R> {
        &self.trans
    }

    pub fn into_trans(self) -> RowTrans<R> {
        self.trans
    }

    pub fn process(&mut self) -> Result<()> {
        let n = self.target.nrows();

        for i in 0..n {
            self.forward_step(i)?;
        }

        for i in (0..n).rev() {
            self.backward_step(i);
        }

        Ok(())
    }

    fn is_negligible(&self, i: usize, j: usize) -> bool {
        self.target[(i, j)].is_negligible(self.thresh[i])
    }

    fn select_pivot(&self, i: usize) -> Option<usize> {
        let n = self.target.nrows();
        (i..n).find(|&i2| !self.is_negligible(i2, i))
    }

    fn forward_step(&mut self, i: usize) -> Result<()> {
        let Some(i_p) = self.select_pivot(i) else {
            debug!("no pivot for col {i}.");
            return Err(Error::NotInvertible { col: i })
        };

        if i_p > i {
            self.swap_rows(i, i_p);
        }

        // normalize
        let p = self.target[(i, i)];
        if !p.is_one() {
            self.combine(i, vec![(i, p.recip())], i, R::one());
        }

        // eliminate below
        let n = self.target.nrows();
        for i2 in i + 1..n {
            let f = self.target[(i2, i)];
            if !f.is_zero() {
                self.combine(i2, vec![(i2, R::one()), (i, -f)], i, R::zero());
            }
        }

        Ok(())
    }

    fn backward_step(&mut self, i: usize) {
        for i2 in (0..i).rev() {
            let f = self.target[(i2, i)];
            if !f.is_zero() {
                self.combine(i2, vec![(i2, R::one()), (i, -f)], i, R::zero());
            }
        }
    }

    fn swap_rows(&mut self, i: usize, j: usize) {
        self.trans.perform_and_record_swap(i, j, &mut self.target);
        self.thresh.swap(i, j);
        trace!("swap-rows: ({i}, {j})\n{}", self.target);
    }

    // Columns left of `j` are zero in the source rows, and column `j`
    // of the result is known to be `a_ij`.
    fn combine(&mut self, i: usize, coeffs: Vec<(usize, R)>, j: usize, a_ij: R) {
        let n = self.target.ncols();
        self.target.combine_rows_in(i, &coeffs, j + 1..n);
        self.target[(i, j)] = a_ij;
        self.trans.record_combine(i, coeffs);

        if let Some(op) = self.trans.ops().last() {
            trace!("{op}\n{}", self.target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trans::RowOp;

    fn mat(shape: (usize, usize), data: &[f64]) -> Mat<f64> {
        Mat::from_data(shape, data.iter().copied()).unwrap()
    }

    fn assert_close(a: &Mat<f64>, b: &Mat<f64>) {
        let d = crate::algebra::max_abs_diff_mat(a, b).unwrap();
        assert!(d < 1e-9, "|a - b| = {d}\n{a}\n\n{b}");
    }

    #[test]
    fn inv_2x2() {
        let a = mat((2, 2), &[4.0, 7.0, 2.0, 6.0]);
        let b = a.inv().unwrap();
        assert_close(&b, &mat((2, 2), &[0.6, -0.7, -0.2, 0.4]));
        assert_close(&(&a * &b), &Mat::id(2));
    }

    #[test]
    fn inv_id() {
        let e = Mat::<f64>::id(4);
        let t = elimination_log(&e).unwrap();
        assert!(t.is_empty());
        assert_eq!(e.inv(), Ok(e));
    }

    #[test]
    fn inv_null() {
        let a = Mat::<f64>::null();
        assert_eq!(a.inv(), Ok(Mat::null()));
    }

    #[test]
    fn inv_1x1() {
        let a = mat((1, 1), &[4.0]);
        assert_eq!(a.inv(), Ok(mat((1, 1), &[0.25])));
    }

    #[test]
    fn inv_needs_swap() {
        let a = mat((3, 3), &[
            0.0, 1.0, 2.0,
            1.0, 0.0, 3.0,
            4.0, -3.0, 8.0
        ]);
        let t = elimination_log(&a).unwrap();
        assert_eq!(t.ops()[0], RowOp::Swap(0, 1));

        let b = a.inv().unwrap();
        assert_close(&(&a * &b), &Mat::id(3));
        assert_close(&(&b * &a), &Mat::id(3));
    }

    #[test]
    fn inv_singular() {
        let a = mat((2, 2), &[1.0, 2.0, 2.0, 4.0]);
        assert_eq!(a.inv(), Err(Error::NotInvertible { col: 1 }));
    }

    #[test]
    fn inv_zero() {
        let a = Mat::<f64>::zero((3, 3));
        assert_eq!(a.inv(), Err(Error::NotInvertible { col: 0 }));
    }

    #[test]
    fn inv_not_square() {
        let a = Mat::<f64>::zero((2, 3));
        assert_eq!(a.inv(), Err(Error::NotSquare((2, 3))));
    }

    #[test]
    fn inv_near_singular() {
        let a = mat((2, 2), &[1.0, 2.0, 1.0, 2.0 + 1e-14]);
        assert_eq!(a.inv(), Err(Error::NotInvertible { col: 1 }));
        assert!(a.inv_with(0.0).is_ok());
    }

    #[test]
    fn inv_scale_invariant() {
        let a = mat((2, 2), &[4e-20, 7e-20, 2e-20, 6e-20]);
        let b = a.inv().unwrap();
        assert_close(&b.scale(1e-20), &mat((2, 2), &[0.6, -0.7, -0.2, 0.4]));
    }

    #[test]
    fn inv_rows_of_different_magnitude() {
        let a = mat((2, 2), &[1e6, 2e6, 1e-7, 3e-7]);
        let b = a.inv().unwrap();
        let e = mat((2, 2), &[3e-6, -2e7, -1e-6, 1e7]);
        for (i, j, &x) in e.iter() {
            assert!((b[(i, j)] - x).abs() <= 1e-9 * x.abs(), "{b}");
        }
    }

    #[test]
    fn inv_small_diagonal() {
        for (p, q) in [(1.0, 1e-13), (1e6, 1e-7)] {
            let a = mat((2, 2), &[p, 0.0, 0.0, q]);
            let b = a.inv().unwrap();
            assert_eq!(b, mat((2, 2), &[1.0 / p, 0.0, 0.0, 1.0 / q]));
        }
    }

    #[test]
    fn inv_row_scale_invariant() {
        let a = mat((3, 3), &[
            0.0, 1.0, 2.0,
            1.0, 1.0, 3.0,
            4.0, -3.0, 8.0
        ]);
        let mut c = a.clone();
        c.combine_rows_in(1, &[(1, 1e-15)], 0..3);

        let t = elimination_log(&c).unwrap();
        assert_eq!(t.ops()[0], RowOp::Swap(0, 1));

        let b = c.inv().unwrap();
        assert_close(&(&b * &c), &Mat::id(3));
    }

    #[test]
    fn log_replays_to_identity() {
        let a = mat((3, 3), &[
            2.0, 1.0, 1.0,
            1.0, 3.0, 2.0,
            1.0, 0.0, 0.0
        ]);
        let t = elimination_log(&a).unwrap();
        assert_eq!(t.shape(), (3, 3));
        assert_close(&t.apply(a).unwrap(), &Mat::id(3));
    }

    #[test]
    fn log_is_upper_then_lower() {
        let a = mat((2, 2), &[2.0, 1.0, 1.0, 1.0]);
        let t = elimination_log(&a).unwrap();
        assert_eq!(t.ops(), &[
            RowOp::Combine(0, vec![(0, 0.5)]),
            RowOp::Combine(1, vec![(1, 1.0), (0, -1.0)]),
            RowOp::Combine(1, vec![(1, 2.0)]),
            RowOp::Combine(0, vec![(0, 1.0), (1, -0.5)]),
        ]);
    }
}
