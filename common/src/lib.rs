pub mod config;
pub mod connection;
pub mod games;
pub mod identifiers;
pub mod logger;
pub mod protocol;

pub use connection::{Connection, Outbound, SendError};
pub use identifiers::*;
pub use protocol::{ClientOperation, ProtocolError, ServerEvent};
