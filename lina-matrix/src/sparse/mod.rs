pub use crate::MatTrait;

mod sp_vec;
mod sp_mat;
pub use sp_vec::SpVec;
pub use sp_mat::SpMat;
