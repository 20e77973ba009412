use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid trade side: {0}")]
    InvalidSide(String),
}
