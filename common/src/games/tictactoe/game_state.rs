use crate::connection::Connection;
use crate::games::SessionRng;
use crate::protocol::{GameStatePayload, ServerEvent};
use crate::{ConnectionId, GameId, PlayerId};

use super::board::Board;
use super::error::GameError;
use super::player::Player;
use super::types::{BoardConfig, GameStatus, Mark};

pub const PLAYERS_PER_GAME: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Continued,
    Won,
    Draw,
}

/// Immutable view of a game, detached from its players' connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub game_id: GameId,
    pub config: BoardConfig,
    pub whose_turn: Option<PlayerId>,
    pub cells: Vec<Mark>,
    pub winner: Option<PlayerId>,
    pub status: GameStatus,
}

impl GameSnapshot {
    pub fn to_payload(&self) -> GameStatePayload {
        GameStatePayload {
            whose_turn: self.whose_turn.as_ref().map(|id| id.to_string()),
            grid: self.cells.iter().map(|mark| mark.to_wire()).collect(),
            winner: self.winner.as_ref().map(|id| id.to_string()),
            status: self.status.to_wire(),
        }
    }

    pub fn to_event(&self) -> ServerEvent {
        ServerEvent::GameState(self.to_payload())
    }
}

#[derive(Debug)]
pub struct Game {
    id: GameId,
    config: BoardConfig,
    board: Board,
    // Join order, not turn order.
    players: Vec<Player>,
    turn_holder: Option<usize>,
    status: GameStatus,
    winner: Option<usize>,
}

impl Game {
    pub fn new(config: BoardConfig) -> Self {
        Self::with_id(GameId::generate(), config)
    }

    pub fn with_id(id: GameId, config: BoardConfig) -> Self {
        Self {
            id,
            config,
            board: Board::new(config.size()),
            players: Vec::with_capacity(PLAYERS_PER_GAME),
            turn_holder: None,
            status: GameStatus::Awaiting,
            winner: None,
        }
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == player_id)
    }

    pub fn has_player(&self, player_id: &PlayerId) -> bool {
        self.player(player_id).is_some()
    }

    pub fn turn_holder(&self) -> Option<&Player> {
        self.turn_holder.map(|i| &self.players[i])
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.map(|i| &self.players[i])
    }

    pub fn add_player(&mut self, player: Player) -> Result<(), GameError> {
        if self.players.len() >= PLAYERS_PER_GAME || self.status != GameStatus::Awaiting {
            return Err(GameError::GameFull);
        }
        self.players.push(player);
        Ok(())
    }

    /// Deals the two marks and the first turn independently of join order,
    /// then starts the game.
    pub fn toss(&mut self, rng: &mut SessionRng) -> Result<(), GameError> {
        if self.players.len() != PLAYERS_PER_GAME || self.status != GameStatus::Awaiting {
            return Err(GameError::TossNotAllowed);
        }

        let (first, second) = if rng.coin_flip() {
            (Mark::X, Mark::O)
        } else {
            (Mark::O, Mark::X)
        };
        self.players[0].set_mark(first);
        self.players[1].set_mark(second);

        self.turn_holder = Some(rng.pick_index(PLAYERS_PER_GAME));
        self.status = GameStatus::InProgress;
        Ok(())
    }

    /// Every check runs before the board is touched, so a rejected turn leaves
    /// the game exactly as it was.
    pub fn take_turn(&mut self, player_id: &PlayerId, index: i64) -> Result<TurnOutcome, GameError> {
        if self.players.len() < PLAYERS_PER_GAME {
            return Err(GameError::TwoPlayersRequired);
        }
        if self.status != GameStatus::InProgress {
            return Err(GameError::NotInProgress);
        }

        let mover = self.turn_holder.ok_or(GameError::NotInProgress)?;
        if self.players[mover].id() != player_id {
            return Err(GameError::NotYourTurn);
        }

        let cell = usize::try_from(index)
            .ok()
            .filter(|&i| i < self.config.cell_count())
            .ok_or(GameError::InvalidMove { index })?;

        let mark = self.players[mover].mark();
        self.board.place(cell, mark)?;
        self.turn_holder = Some(1 - mover);

        if self.board.is_winning_move(cell, mark, self.config.win_length()) {
            self.winner = Some(mover);
            self.status = GameStatus::Finished;
            Ok(TurnOutcome::Won)
        } else if self.board.is_full() {
            self.status = GameStatus::Finished;
            Ok(TurnOutcome::Draw)
        } else {
            Ok(TurnOutcome::Continued)
        }
    }

    /// Reattaches a returning player. Mark and turn position stay put; the
    /// replaced connection is handed back to the caller.
    pub fn substitute_player(
        &mut self,
        player_id: &PlayerId,
        connection: Connection,
    ) -> Result<Connection, GameError> {
        if self.status.is_terminal() {
            return Err(GameError::NotInProgress);
        }
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id() == player_id)
            .ok_or_else(|| GameError::PlayerNotFound(player_id.clone()))?;
        Ok(player.replace_connection(connection))
    }

    /// Marks a running game as abandoned. Returns whether anything changed.
    pub fn abandon(&mut self) -> bool {
        if self.status != GameStatus::InProgress {
            return false;
        }
        self.status = GameStatus::Unfinished;
        true
    }

    pub fn is_current_connection(&self, player_id: &PlayerId, connection_id: ConnectionId) -> bool {
        self.player(player_id)
            .is_some_and(|p| p.connection_id() == connection_id)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game_id: self.id.clone(),
            config: self.config,
            whose_turn: self.turn_holder().map(|p| p.id().clone()),
            cells: self.board.cells().to_vec(),
            winner: self.winner().map(|p| p.id().clone()),
            status: self.status,
        }
    }
}
