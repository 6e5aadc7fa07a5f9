use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use onx_common::games::tictactoe::BoardConfig;
use onx_common::{ConnectionId, PlayerId};

use crate::server_config::ServerConfig;
use crate::session_pool::SessionPool;
use crate::ws_handler::handle_websocket;

pub const PLAYER_ID_COOKIE: &str = "player_id";
pub const GRID_SIZE_COOKIE: &str = "grid_size";
pub const WINNING_LENGTH_COOKIE: &str = "winning_length";

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub default_board: BoardConfig,
    pub outbound_buffer: usize,
    pub reconnect_grace: Duration,
}

impl GatewaySettings {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            default_board: config.default_board,
            outbound_buffer: config.outbound_buffer,
            reconnect_grace: config.reconnect_grace(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub player_id: PlayerId,
    pub config: BoardConfig,
}

#[derive(Clone)]
pub struct WebServerState {
    pub pool: SessionPool,
    pub settings: Arc<GatewaySettings>,
    next_connection_id: Arc<AtomicU64>,
}

impl WebServerState {
    pub fn new(pool: SessionPool, settings: GatewaySettings) -> Self {
        Self {
            pool,
            settings: Arc::new(settings),
            next_connection_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn next_connection_id(&self) -> ConnectionId {
        ConnectionId::new(self.next_connection_id.fetch_add(1, Ordering::Relaxed))
    }
}

pub fn router(state: WebServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/ws", get(ws_upgrade_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn run_web_server(
    listener: TcpListener,
    state: WebServerState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

pub fn join_request_from_cookies(
    jar: &CookieJar,
    default_board: BoardConfig,
) -> Result<JoinRequest, String> {
    let player_id = jar
        .get(PLAYER_ID_COOKIE)
        .map(|c| c.value().trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| "player_id cookie required".to_string())?;

    let parse = |name: &str, fallback: usize| {
        jar.get(name)
            .and_then(|c| c.value().trim().parse::<usize>().ok())
            .unwrap_or(fallback)
    };
    let size = parse(GRID_SIZE_COOKIE, default_board.size());
    let win_length = parse(WINNING_LENGTH_COOKIE, default_board.win_length());

    let config = BoardConfig::new(size, win_length).map_err(|e| e.to_string())?;
    Ok(JoinRequest {
        player_id: PlayerId::from(player_id),
        config,
    })
}

async fn index_handler() -> impl IntoResponse {
    Json(serde_json::json!({}))
}

async fn ws_upgrade_handler(
    ws: WebSocketUpgrade,
    jar: CookieJar,
    State(state): State<WebServerState>,
) -> impl IntoResponse {
    let request = join_request_from_cookies(&jar, state.settings.default_board);
    ws.on_upgrade(move |socket| handle_websocket(socket, state, request))
}
