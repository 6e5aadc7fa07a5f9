use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use onx_common::games::SessionRng;
use onx_common::games::tictactoe::{BoardConfig, Game, GameError, GameStatus, Player};
use onx_common::{Connection, ConnectionId, PlayerId, debug_log, log};

use crate::broadcaster::broadcast_state;
use crate::clock::{Clock, SystemClock};

pub type SharedGame = Arc<Mutex<Game>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Created,
    Paired,
    Reconnected,
    Rejoined,
}

#[derive(Debug, Clone)]
pub struct Joined {
    pub game: SharedGame,
    pub kind: JoinKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    Superseded,
    WithdrawnSlot,
    Abandoned,
    Unchanged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub expired_entries: usize,
    pub dead_slots: usize,
}

#[derive(Debug)]
struct LiveEntry {
    game: SharedGame,
    touched: Instant,
}

#[derive(Debug)]
struct PoolState {
    awaiting: HashMap<BoardConfig, SharedGame>,
    live: HashMap<PlayerId, LiveEntry>,
    rng: SessionRng,
}

// Lock order: pool, then game.
#[derive(Debug, Clone)]
pub struct SessionPool {
    inner: Arc<Mutex<PoolState>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl SessionPool {
    pub fn new(ttl: Duration) -> Self {
        Self::with_parts(ttl, Arc::new(SystemClock), SessionRng::from_random())
    }

    pub fn with_parts(ttl: Duration, clock: Arc<dyn Clock>, rng: SessionRng) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PoolState {
                awaiting: HashMap::new(),
                live: HashMap::new(),
                rng,
            })),
            clock,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn join(
        &self,
        config: BoardConfig,
        player_id: PlayerId,
        connection: Connection,
    ) -> Result<Joined, GameError> {
        let mut guard = self.inner.lock().await;
        let state = &mut *guard;
        let now = self.clock.now();

        if let Some(existing) = state
            .live
            .get(&player_id)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| entry.game.clone())
        {
            let mut game = existing.lock().await;
            if game.status() == GameStatus::InProgress {
                let replaced = game.substitute_player(&player_id, connection)?;
                replaced.close();
                debug_log!("[game:{}] {} reconnected", game.id(), player_id);
                drop(game);
                Self::touch_entry(state, &player_id, &existing, now);
                return Ok(Joined {
                    game: existing,
                    kind: JoinKind::Reconnected,
                });
            }
        }

        Self::withdraw_other_slots(state, &player_id, config).await;

        if let Some(slot) = state.awaiting.get(&config).cloned() {
            let mut game = slot.lock().await;

            if game.has_player(&player_id) {
                let replaced = game.substitute_player(&player_id, connection)?;
                replaced.close();
                drop(game);
                Self::touch_entry(state, &player_id, &slot, now);
                return Ok(Joined {
                    game: slot,
                    kind: JoinKind::Rejoined,
                });
            }

            let waiting_alive = game.players().iter().any(|p| p.connection().is_open());
            if waiting_alive {
                state.awaiting.remove(&config);
                game.add_player(Player::new(player_id.clone(), connection))?;
                game.toss(&mut state.rng)?;
                debug_log!("[game:{}] started with {} players", game.id(), game.players().len());

                let player_ids: Vec<PlayerId> = game.players().iter().map(|p| p.id().clone()).collect();
                drop(game);
                for id in &player_ids {
                    Self::touch_entry(state, id, &slot, now);
                }
                return Ok(Joined {
                    game: slot,
                    kind: JoinKind::Paired,
                });
            }

            log!("[game:{}] Dropping waiting slot with a closed connection", game.id());
            drop(game);
            state.awaiting.remove(&config);
        }

        let mut game = Game::new(config);
        game.add_player(Player::new(player_id.clone(), connection))?;
        debug_log!("[game:{}] created by {}", game.id(), player_id);

        let shared: SharedGame = Arc::new(Mutex::new(game));
        state.awaiting.insert(config, shared.clone());
        Self::touch_entry(state, &player_id, &shared, now);
        Ok(Joined {
            game: shared,
            kind: JoinKind::Created,
        })
    }

    pub async fn leave(
        &self,
        game: &SharedGame,
        player_id: &PlayerId,
        connection_id: ConnectionId,
    ) -> LeaveOutcome {
        let mut state = self.inner.lock().await;
        let mut locked = game.lock().await;

        if !locked.is_current_connection(player_id, connection_id) {
            return LeaveOutcome::Superseded;
        }

        let config = locked.config();
        if state
            .awaiting
            .get(&config)
            .is_some_and(|slot| Arc::ptr_eq(slot, game))
        {
            state.awaiting.remove(&config);
            if state
                .live
                .get(player_id)
                .is_some_and(|entry| Arc::ptr_eq(&entry.game, game))
            {
                state.live.remove(player_id);
            }
            debug_log!("[game:{}] waiting slot withdrawn by {}", locked.id(), player_id);
            return LeaveOutcome::WithdrawnSlot;
        }

        if locked.abandon() {
            debug_log!("[game:{}] abandoned by {}", locked.id(), player_id);
            broadcast_state(&locked);
            return LeaveOutcome::Abandoned;
        }

        LeaveOutcome::Unchanged
    }

    pub async fn touch(&self, game: &SharedGame) {
        let mut state = self.inner.lock().await;
        let player_ids: Vec<PlayerId> = game
            .lock()
            .await
            .players()
            .iter()
            .map(|p| p.id().clone())
            .collect();
        let now = self.clock.now();
        for id in &player_ids {
            if let Some(entry) = state.live.get_mut(id)
                && Arc::ptr_eq(&entry.game, game)
            {
                entry.touched = now;
            }
        }
    }

    pub async fn purge_expired(&self) -> PurgeReport {
        let mut state = self.inner.lock().await;
        let now = self.clock.now();
        let mut report = PurgeReport::default();

        let mut dead = Vec::new();
        let mut open_slots = Vec::new();
        for (config, slot) in &state.awaiting {
            let game = slot.lock().await;
            if game.players().iter().any(|p| p.connection().is_open()) {
                open_slots.push(slot.clone());
            } else {
                dead.push(*config);
            }
        }
        for config in &dead {
            state.awaiting.remove(config);
        }
        report.dead_slots = dead.len();

        // Waiting players keep their entry for as long as their slot is open.
        let before = state.live.len();
        let ttl = self.ttl;
        state.live.retain(|_, entry| {
            now.saturating_duration_since(entry.touched) < ttl
                || open_slots.iter().any(|slot| Arc::ptr_eq(slot, &entry.game))
        });
        report.expired_entries = before - state.live.len();

        report
    }

    pub async fn close_all(&self) {
        let mut state = self.inner.lock().await;
        let mut games: Vec<SharedGame> = state.awaiting.drain().map(|(_, g)| g).collect();
        games.extend(state.live.drain().map(|(_, entry)| entry.game));

        let mut closed: Vec<SharedGame> = Vec::new();
        for game in games {
            if closed.iter().any(|g| Arc::ptr_eq(g, &game)) {
                continue;
            }
            for player in game.lock().await.players() {
                player.connection().close();
            }
            closed.push(game);
        }
        log!("Closed {} games", closed.len());
    }

    pub async fn awaiting_count(&self) -> usize {
        self.inner.lock().await.awaiting.len()
    }

    pub async fn live_count(&self) -> usize {
        self.inner.lock().await.live.len()
    }

    fn is_expired(&self, entry: &LiveEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.touched) >= self.ttl
    }

    async fn withdraw_other_slots(state: &mut PoolState, player_id: &PlayerId, keep: BoardConfig) {
        let mut withdrawn = Vec::new();
        for (slot_config, slot) in &state.awaiting {
            if *slot_config == keep {
                continue;
            }
            let game = slot.lock().await;
            if game.has_player(player_id) {
                for player in game.players() {
                    player.connection().close();
                }
                debug_log!("[game:{}] {} withdrew to join {:?}", game.id(), player_id, keep);
                withdrawn.push(*slot_config);
            }
        }
        for slot_config in &withdrawn {
            state.awaiting.remove(slot_config);
        }
    }

    fn touch_entry(state: &mut PoolState, player_id: &PlayerId, game: &SharedGame, now: Instant) {
        state.live.insert(
            player_id.clone(),
            LiveEntry {
                game: game.clone(),
                touched: now,
            },
        );
    }
}
