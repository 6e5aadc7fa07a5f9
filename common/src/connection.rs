use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::ConnectionId;
use crate::protocol::ServerEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Event(ServerEvent),
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("connection closed")]
    Closed,

    #[error("outbound buffer full")]
    Full,
}

/// Write side of one client socket. Cloning shares the same socket; the
/// matching receiver is drained by the transport's writer task.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    sender: mpsc::Sender<Outbound>,
    closed: Arc<AtomicBool>,
}

pub fn channel(id: ConnectionId, capacity: usize) -> (Connection, mpsc::Receiver<Outbound>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let connection = Connection {
        id,
        sender,
        closed: Arc::new(AtomicBool::new(false)),
    };
    (connection, receiver)
}

impl Connection {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queues an event without waiting. Never blocks a caller holding a game lock.
    pub fn send(&self, event: ServerEvent) -> Result<(), SendError> {
        if !self.is_open() {
            return Err(SendError::Closed);
        }
        self.sender
            .try_send(Outbound::Event(event))
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => SendError::Full,
                mpsc::error::TrySendError::Closed(_) => SendError::Closed,
            })
    }

    /// Marks the connection closed and asks the writer to end the socket.
    /// Later calls are no-ops.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        // A full buffer still ends the writer once the receiver is dropped.
        let _ = self.sender.try_send(Outbound::Close);
    }

    pub fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Acquire) && !self.sender.is_closed()
    }
}
