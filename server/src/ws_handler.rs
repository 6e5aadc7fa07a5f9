use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use onx_common::connection::channel;
use onx_common::games::tictactoe::GameStatus;
use onx_common::{ConnectionId, Outbound, PlayerId, debug_log, log};

use crate::broadcaster::{broadcast_state, send_error};
use crate::message_handler::{GatewayError, handle_text};
use crate::session_pool::{SessionPool, SharedGame};
use crate::web_server::{JoinRequest, WebServerState};

pub async fn handle_websocket(
    socket: WebSocket,
    state: WebServerState,
    request: Result<JoinRequest, String>,
) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (connection, mut outbound) = channel(state.next_connection_id(), state.settings.outbound_buffer);
    let connection_id = connection.id();

    let mut send_task = tokio::spawn(async move {
        while let Some(item) = outbound.recv().await {
            match item {
                Outbound::Event(event) => {
                    let text = match event.to_json() {
                        Ok(text) => text,
                        Err(e) => {
                            log!("Failed to encode event: {}", e);
                            continue;
                        }
                    };
                    if ws_sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Outbound::Close => {
                    let _ = ws_sender.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    let JoinRequest { player_id, config } = match request {
        Ok(request) => request,
        Err(message) => {
            debug_log!("[{}] Rejected connection: {}", connection_id, message);
            send_error(&connection, message);
            connection.close();
            let _ = send_task.await;
            return;
        }
    };

    let joined = match state.pool.join(config, player_id.clone(), connection.clone()).await {
        Ok(joined) => joined,
        Err(e) => {
            log!("[{}] Join failed for {}: {}", connection_id, player_id, e);
            send_error(&connection, e.to_string());
            connection.close();
            let _ = send_task.await;
            return;
        }
    };
    let game = joined.game;
    debug_log!("[{}] {} joined ({:?})", connection_id, player_id, joined.kind);

    broadcast_state(&*game.lock().await);

    let mut writer_done = false;
    loop {
        tokio::select! {
            incoming = ws_receiver.next() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        debug_log!("[{}] Socket error: {}", connection_id, e);
                        break;
                    }
                };

                match handle_text(&game, &player_id, connection_id, text.as_str()).await {
                    Ok(_) => state.pool.touch(&game).await,
                    Err(GatewayError::Superseded) => {
                        debug_log!("[{}] Superseded, dropping connection of {}", connection_id, player_id);
                        break;
                    }
                    Err(e) => send_error(&connection, e.to_string()),
                }
            }
            _ = &mut send_task => {
                writer_done = true;
                break;
            }
        }
    }

    // A closed connection is never paired, so the status read below is final
    // for the waiting case.
    connection.close();
    let status = game.lock().await.status();
    if !writer_done {
        let _ = send_task.await;
    }

    schedule_leave(&state, game, player_id, connection_id, status).await;
}

async fn schedule_leave(
    state: &WebServerState,
    game: SharedGame,
    player_id: PlayerId,
    connection_id: ConnectionId,
    status: GameStatus,
) {
    match status {
        GameStatus::Awaiting => {
            let outcome = state.pool.leave(&game, &player_id, connection_id).await;
            debug_log!("[{}] {} left: {:?}", connection_id, player_id, outcome);
        }
        GameStatus::InProgress => {
            let pool: SessionPool = state.pool.clone();
            let grace = state.settings.reconnect_grace;
            tokio::spawn(async move {
                tokio::time::sleep(grace).await;
                let outcome = pool.leave(&game, &player_id, connection_id).await;
                debug_log!("[{}] {} left after grace: {:?}", connection_id, player_id, outcome);
            });
        }
        GameStatus::Finished | GameStatus::Unfinished => {}
    }
}
