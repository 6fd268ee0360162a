#![allow(unused)]
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use lina_matrix::MatTrait;
use lina_matrix::algebra::max_abs_diff_mat;
use lina_matrix::dense::Mat;
use lina_matrix::sparse::SpMat;

pub const TOL: f64 = 1e-9;

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn random_mat<G>(rng: &mut G, shape: (usize, usize)) -> Mat<f64>
where G: Rng {
    let (m, n) = shape;
    Mat::from_data(shape, (0..m * n).map(|_| rng.gen_range(-10.0..10.0))).unwrap()
}

// diagonally dominant, hence invertible and well-conditioned.
pub fn random_inv_mat<G>(rng: &mut G, n: usize) -> Mat<f64>
where G: Rng {
    let mut a = random_mat(rng, (n, n));
    for i in 0..n {
        let s: f64 = (0..n).map(|j| a[(i, j)].abs()).sum();
        a[(i, i)] = if a[(i, i)] < 0.0 { -s - 1.0 } else { s + 1.0 };
    }
    a
}

pub fn random_sp_mat<G>(rng: &mut G, shape: (usize, usize), nnz: usize) -> SpMat<f64>
where G: Rng {
    let (m, n) = shape;
    let default = rng.gen_range(-1.0..1.0);
    let entries = (0..nnz).map(|_|
        (rng.gen_range(0..m), rng.gen_range(0..n), rng.gen_range(-10.0..10.0))
    ).collect::<Vec<_>>();
    SpMat::from_entries(default, shape, entries)
}

pub fn to_na(a: &Mat<f64>) -> nalgebra::DMatrix<f64> {
    let (m, n) = a.shape();
    let data = a.iter().map(|(_, _, &x)| x).collect::<Vec<_>>();
    nalgebra::DMatrix::from_row_slice(m, n, &data)
}

pub fn from_na(a: &nalgebra::DMatrix<f64>) -> Mat<f64> {
    let (m, n) = a.shape();
    Mat::from_data((m, n), (0..m).flat_map(|i| (0..n).map(move |j| a[(i, j)]))).unwrap()
}

pub fn assert_close(a: &Mat<f64>, b: &Mat<f64>) {
    let d = max_abs_diff_mat(a, b).unwrap();
    assert!(d < TOL, "max |a - b| = {d}\n{a}\n\n{b}");
}

macro_rules! test_inv {
    ($(#[$m:meta])* $test:ident, $seed:literal, $n:literal) => {
        $(#[$m])*
        #[test]
        fn $test() -> Result<(), Box<dyn std::error::Error>> {
            use lina_matrix::dense::Mat;
            use common::*;

            let mut rng = rng($seed);
            let a = random_inv_mat(&mut rng, $n);
            let b = a.inv()?;

            assert_close(&(&a * &b), &Mat::id($n));
            assert_close(&(&b * &a), &Mat::id($n));

            let expected = to_na(&a).try_inverse().ok_or("nalgebra: not invertible")?;
            assert_close(&b, &from_na(&expected));

            Ok(())
        }
    };
}

pub(crate) use test_inv;
