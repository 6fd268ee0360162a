pub use crate::{MatTrait, VecLike, MatLike};

mod vec;
mod mat;
mod inv;

pub use vec::Vector;
pub use mat::Mat;
pub use inv::*;
