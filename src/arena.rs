//! Arena - simulated match lifecycle, roster and settings

use crate::clock::{Clock, SystemClock, format_uptime};
use crate::error::{ArenaError, Result};
use crate::mock::MockGenerator;
use crate::runtime::{Duration, interval, sleep, spawn};
use crate::types::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{RwLock, mpsc, oneshot};
use tracing::{debug, info, warn};

const ANNOUNCEMENT_HISTORY: usize = 50;

/// Arena events emitted to the presentation layer
#[derive(Debug, Clone)]
pub enum ArenaEvent {
    /// Lifecycle status changed
    StatusChanged(ArenaStatus),
    /// Roster replaced or perturbed
    PlayersChanged { count: usize },
    /// Player removed by an administrator
    PlayerKicked(Player),
    /// Settings merged
    SettingsChanged(ArenaSettings),
    /// Announcement broadcast
    Announcement(Announcement),
}

#[derive(Debug, Clone, Copy)]
enum Transition {
    Start,
    Stop,
    Reload,
}

struct ArenaState {
    players: Vec<Player>,
    stats: ArenaStats,
    settings: ArenaSettings,
    busy: bool,
    /// Bumped by every accepted transition; completions with an older value are stale
    transition: u64,
    /// Bumped on every entry into ON; the perturbation loop is bound to one session
    session: u64,
    started_at: Option<u64>,
    closed: bool,
    mock: MockGenerator,
    announcements: Vec<Announcement>,
}

impl ArenaState {
    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(ArenaError::Shutdown)
        } else {
            Ok(())
        }
    }

    fn begin_transition(&mut self, status: ArenaStatus) -> u64 {
        self.busy = true;
        self.stats.status = status;
        self.transition += 1;
        self.transition
    }

    fn max_players(&self) -> usize {
        self.settings.max_players as usize
    }

    fn sync_count(&mut self) {
        self.stats.player_count = self.players.len();
    }
}

struct Shared {
    config: ArenaConfig,
    clock: Arc<dyn Clock>,
    state: RwLock<ArenaState>,
    event_tx: mpsc::Sender<ArenaEvent>,
    event_rx: RwLock<mpsc::Receiver<ArenaEvent>>,
    /// Set while events are being dropped on a full channel
    dropping: AtomicBool,
}

/// Arena - owns the simulated roster and drives the lifecycle
/// OFF → STARTING → ON → STOPPING → OFF.
///
/// Cloning is cheap and every clone drives the same arena.
#[derive(Clone)]
pub struct ArenaSimulator {
    shared: Arc<Shared>,
}

impl ArenaSimulator {
    /// Create a simulator with the system clock, seeded from `config.seed`
    /// when set and from entropy otherwise.
    pub fn new(config: ArenaConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_parts(config, rng, Arc::new(SystemClock))
    }

    /// Create a simulator with an explicit random source and clock
    pub fn with_parts(config: ArenaConfig, rng: StdRng, clock: Arc<dyn Clock>) -> Self {
        let (event_tx, event_rx) = mpsc::channel(config.event_capacity.max(1));
        let state = ArenaState {
            players: Vec::new(),
            stats: ArenaStats::default(),
            settings: config.settings,
            busy: false,
            transition: 0,
            session: 0,
            started_at: None,
            closed: false,
            mock: MockGenerator::new(rng),
            announcements: Vec::new(),
        };

        Self {
            shared: Arc::new(Shared {
                config,
                clock,
                state: RwLock::new(state),
                event_tx,
                event_rx: RwLock::new(event_rx),
                dropping: AtomicBool::new(false),
            }),
        }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.shared.config
    }

    // =========================================================================
    // Read Surface
    // =========================================================================

    /// Consistent view of players, stats, settings and the busy flag
    pub async fn snapshot(&self) -> ArenaSnapshot {
        let state = self.shared.state.read().await;
        ArenaSnapshot {
            players: state.players.clone(),
            stats: self.stats_of(&state),
            settings: state.settings,
            busy: state.busy,
        }
    }

    pub async fn status(&self) -> ArenaStatus {
        self.shared.state.read().await.stats.status
    }

    pub async fn players(&self) -> Vec<Player> {
        self.shared.state.read().await.players.clone()
    }

    pub async fn player_count(&self) -> usize {
        self.shared.state.read().await.stats.player_count
    }

    pub async fn stats(&self) -> ArenaStats {
        let state = self.shared.state.read().await;
        self.stats_of(&state)
    }

    pub async fn settings(&self) -> ArenaSettings {
        self.shared.state.read().await.settings
    }

    pub async fn is_busy(&self) -> bool {
        self.shared.state.read().await.busy
    }

    /// Recent announcements, oldest first
    pub async fn announcements(&self) -> Vec<Announcement> {
        self.shared.state.read().await.announcements.clone()
    }

    /// Receive next event (non-blocking)
    pub async fn try_recv(&self) -> Option<ArenaEvent> {
        self.shared.event_rx.write().await.try_recv().ok()
    }

    /// Receive next event (blocking)
    pub async fn recv(&self) -> Option<ArenaEvent> {
        self.shared.event_rx.write().await.recv().await
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start the arena. Resolves once the arena is ON.
    pub async fn start(&self) -> Result<()> {
        let token = {
            let mut state = self.shared.state.write().await;
            state.ensure_open()?;
            if state.busy {
                return Err(ArenaError::Busy);
            }
            if state.stats.status != ArenaStatus::Off {
                return Err(ArenaError::InvalidTransition {
                    status: state.stats.status,
                    command: Command::Start,
                });
            }
            state.begin_transition(ArenaStatus::Starting)
        };

        info!("Arena starting");
        self.emit(ArenaEvent::StatusChanged(ArenaStatus::Starting));
        self.schedule(token, self.shared.config.start_delay, Transition::Start)
            .await
    }

    /// Stop the arena. A pending start or reload is superseded.
    pub async fn stop(&self) -> Result<()> {
        let token = {
            let mut state = self.shared.state.write().await;
            state.ensure_open()?;
            match state.stats.status {
                ArenaStatus::Off => {
                    return Err(ArenaError::InvalidTransition {
                        status: ArenaStatus::Off,
                        command: Command::Stop,
                    });
                }
                ArenaStatus::Stopping => return Err(ArenaError::Busy),
                ArenaStatus::Starting | ArenaStatus::On => {}
            }
            if state.busy {
                debug!("Stop supersedes pending transition {}", state.transition);
            }
            state.begin_transition(ArenaStatus::Stopping)
        };

        info!("Arena stopping");
        self.emit(ArenaEvent::StatusChanged(ArenaStatus::Stopping));
        self.schedule(token, self.shared.config.stop_delay, Transition::Stop)
            .await
    }

    /// Replace the roster with a fresh batch. Only valid while ON.
    pub async fn reload(&self) -> Result<()> {
        let token = {
            let mut state = self.shared.state.write().await;
            state.ensure_open()?;
            if state.busy {
                return Err(ArenaError::Busy);
            }
            if state.stats.status != ArenaStatus::On {
                return Err(ArenaError::InvalidTransition {
                    status: state.stats.status,
                    command: Command::Reload,
                });
            }
            state.begin_transition(ArenaStatus::On)
        };

        info!("Arena reloading");
        self.schedule(token, self.shared.config.reload_delay, Transition::Reload)
            .await
    }

    /// Tear down: pending transitions resolve with `Shutdown`, the
    /// perturbation loop exits on its next tick and later commands fail.
    pub async fn shutdown(&self) {
        let mut state = self.shared.state.write().await;
        if state.closed {
            return;
        }
        state.closed = true;
        state.busy = false;
        state.transition += 1;
        state.session += 1;
        info!("Arena shut down");
    }

    // =========================================================================
    // Roster & Settings
    // =========================================================================

    /// Remove a player. Returns `None` (and changes nothing) for unknown ids,
    /// and `Shutdown` once the simulator has been torn down.
    pub async fn kick_player(&self, id: PlayerId) -> Result<Option<Player>> {
        let player = {
            let mut state = self.shared.state.write().await;
            state.ensure_open()?;
            let Some(index) = state.players.iter().position(|p| p.id == id) else {
                return Ok(None);
            };
            let player = state.players.remove(index);
            state.sync_count();
            player
        };

        info!("Kicked player {} ({})", player.name, player.id);
        self.emit(ArenaEvent::PlayerKicked(player.clone()));
        Ok(Some(player))
    }

    /// Merge a partial settings update. Nothing is applied if any field is invalid.
    pub async fn update_settings(&self, patch: SettingsPatch) -> Result<ArenaSettings> {
        if let Some(value) = patch.max_players {
            let (min, max) = (ArenaSettings::MIN_PLAYERS, ArenaSettings::MAX_PLAYERS);
            if !(min..=max).contains(&value) {
                return Err(ArenaError::MaxPlayersOutOfRange { value, min, max });
            }
        }

        let settings = {
            let mut state = self.shared.state.write().await;
            state.ensure_open()?;
            state.settings = patch.apply(&state.settings);
            state.settings
        };

        debug!("Settings updated: {:?}", settings);
        self.emit(ArenaEvent::SettingsChanged(settings));
        Ok(settings)
    }

    /// Broadcast an announcement after the simulated send latency
    pub async fn announce(&self, draft: AnnouncementDraft) -> Result<Announcement> {
        let title = draft.title.trim();
        let message = draft.message.trim();
        if title.is_empty() || message.is_empty() {
            return Err(ArenaError::InvalidAnnouncement(
                "title and message are required".to_string(),
            ));
        }
        if !AnnouncementDraft::DISPLAY_RANGE_MS.contains(&draft.display_time_ms) {
            return Err(ArenaError::InvalidAnnouncement(format!(
                "display time {}ms outside {}-{}ms",
                draft.display_time_ms,
                AnnouncementDraft::DISPLAY_RANGE_MS.start(),
                AnnouncementDraft::DISPLAY_RANGE_MS.end()
            )));
        }
        self.shared.state.read().await.ensure_open()?;

        sleep(Duration::from_millis(self.shared.config.announce_delay)).await;

        let announcement = {
            let mut state = self.shared.state.write().await;
            state.ensure_open()?;
            let announcement = Announcement {
                id: state.mock.token(),
                title: title.to_string(),
                message: message.to_string(),
                display_time_ms: draft.display_time_ms,
                timestamp: self.shared.clock.now_ms(),
            };
            state.announcements.push(announcement.clone());
            if state.announcements.len() > ANNOUNCEMENT_HISTORY {
                state.announcements.remove(0);
            }
            announcement
        };

        info!("Announcement sent: {}", announcement.title);
        self.emit(ArenaEvent::Announcement(announcement.clone()));
        Ok(announcement)
    }

    /// Apply one perturbation tick now. Returns false unless the arena is ON.
    pub async fn tick(&self) -> bool {
        self.perturb(None).await
    }

    // =========================================================================
    // Private: Transitions
    // =========================================================================

    async fn schedule(&self, token: u64, delay_ms: u64, transition: Transition) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        let arena = self.clone();

        spawn(async move {
            sleep(Duration::from_millis(delay_ms)).await;
            let outcome = arena.complete(token, transition).await;
            let _ = done_tx.send(outcome);
        });

        done_rx.await.unwrap_or(Err(ArenaError::Shutdown))
    }

    async fn complete(&self, token: u64, transition: Transition) -> Result<()> {
        let config = &self.shared.config;
        let now = self.shared.clock.now_ms();

        let (status, count, session) = {
            let mut state = self.shared.state.write().await;
            state.ensure_open()?;
            if state.transition != token {
                debug!("Discarding stale {:?} completion", transition);
                return Err(ArenaError::Superseded);
            }
            state.busy = false;

            match transition {
                Transition::Start => {
                    let cap = state.max_players();
                    let count = state.mock.batch_size(&config.start_batch, cap);
                    state.players = state.mock.players(count, now);
                    state.sync_count();
                    state.stats.status = ArenaStatus::On;
                    state.stats.zone_size = Some(config.initial_zone);
                    state.stats.total_kills = 0;
                    state.started_at = Some(now);
                    state.session += 1;
                    info!("Arena ON with {} players", count);
                    (Some(ArenaStatus::On), count, Some(state.session))
                }
                Transition::Stop => {
                    state.players.clear();
                    state.sync_count();
                    state.stats.status = ArenaStatus::Off;
                    state.stats.zone_size = None;
                    state.stats.uptime = format_uptime(0);
                    state.started_at = None;
                    info!("Arena OFF");
                    (Some(ArenaStatus::Off), 0, None)
                }
                Transition::Reload => {
                    let cap = state.max_players();
                    let count = state.mock.batch_size(&config.reload_batch, cap);
                    state.players = state.mock.players(count, now);
                    state.sync_count();
                    state.stats.total_kills = 0;
                    info!("Arena reloaded with {} players", count);
                    (None, count, None)
                }
            }
        };

        if let Some(status) = status {
            self.emit(ArenaEvent::StatusChanged(status));
        }
        self.emit(ArenaEvent::PlayersChanged { count });
        if let Some(session) = session {
            self.spawn_perturbation(session);
        }
        Ok(())
    }

    // =========================================================================
    // Private: Perturbation
    // =========================================================================

    fn spawn_perturbation(&self, session: u64) {
        let arena = self.clone();
        let period = Duration::from_millis(self.shared.config.tick_interval.max(1));

        spawn(async move {
            let mut ticker = interval(period);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if !arena.perturb(Some(session)).await {
                    debug!("Perturbation loop for session {} exiting", session);
                    break;
                }
            }
        });
    }

    async fn perturb(&self, session: Option<u64>) -> bool {
        let config = &self.shared.config;
        let now = self.shared.clock.now_ms();

        let count = {
            let mut state = self.shared.state.write().await;
            if state.closed || state.stats.status != ArenaStatus::On {
                return false;
            }
            if session.is_some_and(|s| s != state.session) {
                return false;
            }

            let current = state.players.len();
            let mut target = (current as i64 + state.mock.drift()).max(0) as usize;
            if target > current && current >= state.max_players() {
                target = current;
            }

            if target > current {
                let fresh = state.mock.players(target - current, now);
                state.players.extend(fresh);
            } else {
                state.players.truncate(target);
            }
            state.sync_count();
            state.stats.zone_size = Some(state.mock.zone_size(&config.zone_range));
            let kills = state.mock.kills(&config.kills_per_tick);
            state.stats.total_kills += kills;

            debug!(
                "Tick: players {} -> {}, zone {}, kills +{}",
                current,
                target,
                state.stats.zone_label(),
                kills
            );
            target
        };

        self.emit(ArenaEvent::PlayersChanged { count });
        true
    }

    // =========================================================================
    // Private: Helpers
    // =========================================================================

    fn stats_of(&self, state: &ArenaState) -> ArenaStats {
        let mut stats = state.stats.clone();
        if let Some(started_at) = state.started_at {
            let elapsed = self.shared.clock.now_ms().saturating_sub(started_at);
            stats.uptime = format_uptime(elapsed);
        }
        stats
    }

    fn emit(&self, event: ArenaEvent) {
        match self.shared.event_tx.try_send(event) {
            Ok(()) => {
                self.shared.dropping.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                // Warn once per overflow run
                if self.shared.dropping.swap(true, Ordering::Relaxed) {
                    debug!("Dropping arena event: {}", e);
                } else {
                    warn!("Event channel full, dropping events until drained: {}", e);
                }
            }
        }
    }
}
