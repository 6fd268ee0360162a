mod base;
pub use base::*;

pub mod error;
pub mod config;
pub mod algebra;
pub mod trans;
pub mod dense;
pub mod sparse;
pub mod fixture;

pub use error::{Error, Result};
