use thiserror::Error;

use crate::PlayerId;

use super::types::{MAX_BOARD_SIZE, MAX_WIN_LENGTH, MIN_BOARD_SIZE, MIN_WIN_LENGTH};

/// Rule violations and pool misuse. Display strings are what clients see in
/// error events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("not your turn error")]
    NotYourTurn,

    #[error("invalid turn number error")]
    InvalidMove { index: i64 },

    #[error("box is not empty error")]
    OccupiedCell { index: usize },

    #[error("turn without second player error")]
    TwoPlayersRequired,

    #[error("game is over")]
    NotInProgress,

    #[error("game is full")]
    GameFull,

    #[error("toss requires two players and an awaiting game")]
    TossNotAllowed,

    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardConfigError {
    #[error("grid size {size} must be between {} and {}", MIN_BOARD_SIZE, MAX_BOARD_SIZE)]
    SizeOutOfRange { size: usize },

    #[error("winning length {win_length} must be between {} and {}", MIN_WIN_LENGTH, MAX_WIN_LENGTH)]
    WinLengthOutOfRange { win_length: usize },

    #[error("winning length {win_length} exceeds grid size {size}")]
    WinLengthExceedsSize { size: usize, win_length: usize },
}
