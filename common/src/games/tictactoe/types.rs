use serde::{Deserialize, Serialize};

use super::error::BoardConfigError;

pub const MIN_BOARD_SIZE: usize = 3;
pub const MAX_BOARD_SIZE: usize = 14;
pub const MIN_WIN_LENGTH: usize = 3;
pub const MAX_WIN_LENGTH: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Mark {
    #[default]
    Empty,
    X,
    O,
}

impl Mark {
    pub fn to_wire(self) -> u8 {
        match self {
            Mark::Empty => 1,
            Mark::X => 2,
            Mark::O => 3,
        }
    }

    pub fn opponent(self) -> Option<Mark> {
        match self {
            Mark::X => Some(Mark::O),
            Mark::O => Some(Mark::X),
            Mark::Empty => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Mark::Empty
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Awaiting,
    InProgress,
    Unfinished,
    Finished,
}

impl GameStatus {
    pub fn to_wire(self) -> u8 {
        match self {
            GameStatus::Awaiting => 1,
            GameStatus::InProgress => 2,
            GameStatus::Unfinished => 3,
            GameStatus::Finished => 4,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Finished | GameStatus::Unfinished)
    }
}

/// Side length and winning run length. Equal configs are matchmaking-compatible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardConfig {
    size: usize,
    win_length: usize,
}

impl BoardConfig {
    pub fn new(size: usize, win_length: usize) -> Result<Self, BoardConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(BoardConfigError::SizeOutOfRange { size });
        }
        if !(MIN_WIN_LENGTH..=MAX_WIN_LENGTH).contains(&win_length) {
            return Err(BoardConfigError::WinLengthOutOfRange { win_length });
        }
        if win_length > size {
            return Err(BoardConfigError::WinLengthExceedsSize { size, win_length });
        }
        Ok(Self { size, win_length })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Re-checks bounds for values that bypassed `new`, e.g. deserialized ones.
    pub fn validate(&self) -> Result<(), BoardConfigError> {
        Self::new(self.size, self.win_length).map(|_| ())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: MIN_BOARD_SIZE,
            win_length: MIN_WIN_LENGTH,
        }
    }
}
