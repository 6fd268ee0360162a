use lina::Real;

pub trait MatTrait {
    fn shape(&self) -> (usize, usize);
    fn nrows(&self) -> usize { self.shape().0 }
    fn ncols(&self) -> usize { self.shape().1 }
    fn is_square(&self) -> bool { 
        let (m, n) = self.shape();
        m == n
    }
}

// Anything with a length and an integer-indexed read. 
// `at` panics when `i >= dim()`.
pub trait VecLike<R> { 
    fn dim(&self) -> usize;
    fn at(&self, i: usize) -> R;
}

// Anything with a shape and a positional read. 
// `entry` panics when `(i, j)` is out of shape.
pub trait MatLike<R>: MatTrait { 
    fn entry(&self, i: usize, j: usize) -> R;
}

impl<R> VecLike<R> for [R]
where R: Real { 
    fn dim(&self) -> usize {
        self.len()
    }

    fn at(&self, i: usize) -> R {
        self[i]
    }
}

impl<R> VecLike<R> for Vec<R>
where R: Real { 
    fn dim(&self) -> usize {
        self.len()
    }

    fn at(&self, i: usize) -> R {
        self[i]
    }
}
