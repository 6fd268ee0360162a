use std::fmt::{Debug, Display};
use std::iter::Sum;
use num_traits::{Float, NumAssign};

// Real numbers

pub trait Real: 
    Float + 
    NumAssign + 
    Sum + 
    Default + 
    Display + 
    Debug + 
    Send + 
    Sync + 
    'static
{
    fn is_negligible(&self, eps: Self) -> bool { 
        self.abs() <= eps
    }

    fn of_f64(x: f64) -> Self { 
        <Self as num_traits::NumCast>::from(x).unwrap_or_else(Self::nan)
    }
}

impl Real for f32 {}
impl Real for f64 {}
