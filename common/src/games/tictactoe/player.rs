use crate::connection::Connection;
use crate::{ConnectionId, PlayerId};

use super::types::Mark;

/// A seat in a game. The mark is assigned by the toss; until then it is `Empty`.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    connection: Connection,
    mark: Mark,
}

impl Player {
    pub fn new(id: PlayerId, connection: Connection) -> Self {
        Self {
            id,
            connection,
            mark: Mark::Empty,
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub(crate) fn set_mark(&mut self, mark: Mark) {
        self.mark = mark;
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection.id()
    }

    /// Swaps in a new connection and returns the old one so the caller can close it.
    pub(crate) fn replace_connection(&mut self, connection: Connection) -> Connection {
        std::mem::replace(&mut self.connection, connection)
    }
}
