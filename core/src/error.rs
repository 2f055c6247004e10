use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid board configuration")]
    InvalidConfig,
    #[error("position outside of board bounds")]
    OutOfBounds,
}

pub type Result<T> = core::result::Result<T, GameError>;
