use derive_more::Display;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq, Display)]
pub enum Error { 
    #[display("dimension mismatch in {op}: {lhs} vs {rhs}")]
    DimMismatch { op: &'static str, lhs: usize, rhs: usize },

    #[display("shape mismatch in {op}: {lhs:?} vs {rhs:?}")]
    ShapeMismatch { op: &'static str, lhs: (usize, usize), rhs: (usize, usize) },

    #[display("malformed matrix: {_0}")]
    Malformed(String),

    #[display("matrix of shape {_0:?} is not square")]
    NotSquare((usize, usize)),

    #[display("matrix is not invertible: no pivot for column {col}")]
    NotInvertible { col: usize },

    #[display("index {index} out of range for dimension {dim}")]
    OutOfRange { index: usize, dim: usize },

    #[display("fixture: {_0}")]
    Fixture(String),
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Fixture(e.to_string())
    }
}

macro_rules! ensure {
    ($cond:expr, $err:expr) => {{
        if !$cond { 
            return Err($err.into());
        }
    }}
}

pub(crate) use ensure;
