//! Binary fixture codec for test data.
//!
//! Sizes and indices are little-endian `i32`, values are little-endian `f64`.
//!
//! | type     | layout |
//! |----------|--------|
//! | `Vector` | `size, value * size` |
//! | `Mat`    | `rows, cols, value * (rows * cols)` (row-major) |
//! | `SpVec`  | `size, default, count, (index, value) * count` |
//! | `SpMat`  | `rows, cols, default, count, (row, col, value) * count` |

use std::io::{Read, Write};
use lina::Real;
use crate::MatTrait;
use crate::dense::{Mat, Vector};
use crate::sparse::{SpMat, SpVec};
use crate::error::{ensure, Error, Result};

pub trait Fixture: Sized {
    fn write_to<W>(&self, w: &mut W) -> Result<()>
    where W: Write + ?Sized;

    fn read_from<Rd>(r: &mut Rd) -> Result<Self>
    where Rd: Read + ?Sized;

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = vec![];
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Fails unless `bytes` holds exactly one encoded value.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = bytes;
        let res = Self::read_from(&mut r)?;
        ensure!(r.is_empty(), Error::Fixture(format!("{} trailing bytes", r.len())));
        Ok(res)
    }
}

fn write_size<W>(w: &mut W, n: usize) -> Result<()>
where W: Write + ?Sized {
    let n = i32::try_from(n).map_err(|_|
        Error::Fixture(format!("size {n} does not fit in i32"))
    )?;
    w.write_all(&n.to_le_bytes())?;
    Ok(())
}

fn read_size<Rd>(r: &mut Rd) -> Result<usize>
where Rd: Read + ?Sized {
    let mut bytes = [0u8; 4];
    r.read_exact(&mut bytes)?;
    let n = i32::from_le_bytes(bytes);
    usize::try_from(n).map_err(|_|
        Error::Fixture(format!("negative size {n}"))
    )
}

fn write_value<W, R>(w: &mut W, a: R) -> Result<()>
where W: Write + ?Sized, R: Real {
    let a = a.to_f64().ok_or_else(||
        Error::Fixture(format!("{a} is not representable as f64"))
    )?;
    w.write_all(&a.to_le_bytes())?;
    Ok(())
}

fn read_value<Rd, R>(r: &mut Rd) -> Result<R>
where Rd: Read + ?Sized, R: Real {
    let mut bytes = [0u8; 8];
    r.read_exact(&mut bytes)?;
    Ok(R::of_f64(f64::from_le_bytes(bytes)))
}

fn check_index(kind: &str, i: usize, n: usize) -> Result<()> {
    ensure!(i < n, Error::Fixture(format!("{kind} index {i} out of range for {n}")));
    Ok(())
}

impl<R> Fixture for Vector<R>
where R: Real {
    fn write_to<W>(&self, w: &mut W) -> Result<()>
    where W: Write + ?Sized {
        write_size(w, self.dim())?;
        for &a in self.iter() {
            write_value(w, a)?;
        }
        Ok(())
    }

    fn read_from<Rd>(r: &mut Rd) -> Result<Self>
    where Rd: Read + ?Sized {
        let n = read_size(r)?;
        let data = (0..n).map(|_| read_value(r)).collect::<Result<Vec<R>>>()?;
        Ok(Vector::from(data))
    }
}

impl<R> Fixture for Mat<R>
where R: Real {
    fn write_to<W>(&self, w: &mut W) -> Result<()>
    where W: Write + ?Sized {
        write_size(w, self.nrows())?;
        write_size(w, self.ncols())?;
        for (_, _, &a) in self.iter() {
            write_value(w, a)?;
        }
        Ok(())
    }

    fn read_from<Rd>(r: &mut Rd) -> Result<Self>
    where Rd: Read + ?Sized {
        let m = read_size(r)?;
        let n = read_size(r)?;
        let len = m.checked_mul(n).ok_or_else(||
            Error::Fixture(format!("shape ({m}, {n}) overflows"))
        )?;
        let data = (0..len).map(|_| read_value(r)).collect::<Result<Vec<R>>>()?;
        Mat::from_data((m, n), data)
    }
}

impl<R> Fixture for SpVec<R>
where R: Real {
    fn write_to<W>(&self, w: &mut W) -> Result<()>
    where W: Write + ?Sized {
        write_size(w, self.dim())?;
        write_value(w, self.default_value())?;
        write_size(w, self.nnz())?;
        for (i, &a) in self.iter() {
            write_size(w, i)?;
            write_value(w, a)?;
        }
        Ok(())
    }

    fn read_from<Rd>(r: &mut Rd) -> Result<Self>
    where Rd: Read + ?Sized {
        let n = read_size(r)?;
        let default = read_value(r)?;
        let count = read_size(r)?;

        let mut v = SpVec::new(default, n);
        for _ in 0..count {
            let i = read_size(r)?;
            check_index("entry", i, n)?;
            v.set(i, read_value(r)?);
        }
        Ok(v)
    }
}

impl<R> Fixture for SpMat<R>
where R: Real {
    fn write_to<W>(&self, w: &mut W) -> Result<()>
    where W: Write + ?Sized {
        write_size(w, self.nrows())?;
        write_size(w, self.ncols())?;
        write_value(w, self.default_value())?;
        write_size(w, self.nnz())?;
        for (i, j, &a) in self.iter() {
            write_size(w, i)?;
            write_size(w, j)?;
            write_value(w, a)?;
        }
        Ok(())
    }

    fn read_from<Rd>(r: &mut Rd) -> Result<Self>
    where Rd: Read + ?Sized {
        let m = read_size(r)?;
        let n = read_size(r)?;
        let default = read_value(r)?;
        let count = read_size(r)?;

        let mut a = SpMat::new(default, (m, n));
        for _ in 0..count {
            let i = read_size(r)?;
            let j = read_size(r)?;
            check_index("row", i, m)?;
            check_index("col", j, n)?;
            a.set(i, j, read_value(r)?);
        }
        Ok(a)
    }
}
