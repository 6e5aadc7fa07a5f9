use onx_common::games::tictactoe::Game;
use onx_common::{Connection, ServerEvent, log};

pub fn broadcast_state(game: &Game) {
    let event = game.snapshot().to_event();
    for player in game.players() {
        if let Err(e) = player.connection().send(event.clone()) {
            log!(
                "[game:{}] Failed to send state to {} ({}): {}",
                game.id(),
                player.id(),
                player.connection_id(),
                e
            );
        }
    }
}

pub fn send_error(connection: &Connection, message: impl Into<String>) {
    if let Err(e) = connection.send(ServerEvent::error(message)) {
        log!("Failed to send error to {}: {}", connection.id(), e);
    }
}
