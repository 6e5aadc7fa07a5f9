use thiserror::Error;

use onx_common::games::tictactoe::{GameError, TurnOutcome};
use onx_common::protocol::{ClientOperation, ProtocolError, TurnPayload, parse_operation};
use onx_common::{ConnectionId, PlayerId, debug_log};

use crate::broadcaster::broadcast_state;
use crate::session_pool::SharedGame;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error("connection replaced by a newer one")]
    Superseded,
}

pub async fn handle_text(
    game: &SharedGame,
    player_id: &PlayerId,
    connection_id: ConnectionId,
    text: &str,
) -> Result<TurnOutcome, GatewayError> {
    let operation = parse_operation(text)?;

    let mut game = game.lock().await;
    if !game.is_current_connection(player_id, connection_id) {
        return Err(GatewayError::Superseded);
    }

    match operation {
        ClientOperation::Turn(TurnPayload { turn }) => {
            let outcome = game.take_turn(player_id, turn)?;
            debug_log!("[game:{}] {} played {} ({:?})", game.id(), player_id, turn, outcome);
            broadcast_state(&game);
            Ok(outcome)
        }
    }
}
