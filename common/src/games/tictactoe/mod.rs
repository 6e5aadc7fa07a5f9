mod board;
mod error;
mod game_state;
mod player;
mod types;
mod win_detector;

pub use board::Board;
pub use error::{BoardConfigError, GameError};
pub use game_state::{Game, GameSnapshot, PLAYERS_PER_GAME, TurnOutcome};
pub use player::Player;
pub use types::{
    BoardConfig, GameStatus, MAX_BOARD_SIZE, MAX_WIN_LENGTH, MIN_BOARD_SIZE, MIN_WIN_LENGTH, Mark,
};
pub use win_detector::is_winning_move;
