use gm_matrix::MatrixError;
use thiserror::Error;

use crate::input::InputError;

#[derive(Error, Debug)]
pub enum DemoError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
    #[error("size {0} is too large: n * n elements must fit in an i32")]
    SizeTooLarge(usize),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DemoError>;
