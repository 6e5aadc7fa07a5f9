pub mod broadcaster;
pub mod cleanup_task;
pub mod clock;
pub mod message_handler;
pub mod server_config;
pub mod session_pool;
pub mod web_server;
pub mod ws_handler;

pub use session_pool::{JoinKind, LeaveOutcome, SessionPool, SharedGame};
pub use web_server::{GatewaySettings, WebServerState, router, run_web_server};
