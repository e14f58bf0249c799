//! Type definitions for arena-admin

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Player identifier, unique for the lifetime of a simulator.
pub type PlayerId = u64;

/// Arena lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ArenaStatus {
    #[default]
    Off,
    Starting,
    On,
    Stopping,
}

impl fmt::Display for ArenaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArenaStatus::Off => "OFF",
            ArenaStatus::Starting => "STARTING",
            ArenaStatus::On => "ON",
            ArenaStatus::Stopping => "STOPPING",
        })
    }
}

/// Lifecycle commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Start,
    Stop,
    Reload,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Command::Start => "start",
            Command::Stop => "stop",
            Command::Reload => "reload",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A simulated participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub status: PlayerStatus,
    /// Join timestamp in ms since the Unix epoch
    pub join_time: u64,
    pub kills: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Aggregate arena statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaStats {
    pub player_count: usize,
    pub status: ArenaStatus,
    /// Zone radius; `None` while the arena is OFF
    pub zone_size: Option<u32>,
    pub uptime: String,
    pub total_kills: u64,
}

impl Default for ArenaStats {
    fn default() -> Self {
        Self {
            player_count: 0,
            status: ArenaStatus::Off,
            zone_size: None,
            uptime: "00:00:00".to_string(),
            total_kills: 0,
        }
    }
}

impl ArenaStats {
    /// Zone size as shown on the dashboard (`N/A` when not applicable)
    pub fn zone_label(&self) -> String {
        match self.zone_size {
            Some(size) => size.to_string(),
            None => "N/A".to_string(),
        }
    }
}

/// Arena settings, independent of the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaSettings {
    pub player_blips: bool,
    pub auto_restart: bool,
    pub map_rotation: bool,
    pub max_players: u32,
}

impl ArenaSettings {
    pub const MIN_PLAYERS: u32 = 10;
    pub const MAX_PLAYERS: u32 = 200;
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            player_blips: false,
            auto_restart: false,
            map_rotation: true,
            max_players: 100,
        }
    }
}

/// Partial settings update. Unset fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub player_blips: Option<bool>,
    pub auto_restart: Option<bool>,
    pub map_rotation: Option<bool>,
    pub max_players: Option<u32>,
}

impl SettingsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_blips(mut self, on: bool) -> Self {
        self.player_blips = Some(on);
        self
    }

    pub fn auto_restart(mut self, on: bool) -> Self {
        self.auto_restart = Some(on);
        self
    }

    pub fn map_rotation(mut self, on: bool) -> Self {
        self.map_rotation = Some(on);
        self
    }

    pub fn max_players(mut self, n: u32) -> Self {
        self.max_players = Some(n);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into `settings`, returning the result without touching the input.
    pub fn apply(&self, settings: &ArenaSettings) -> ArenaSettings {
        ArenaSettings {
            player_blips: self.player_blips.unwrap_or(settings.player_blips),
            auto_restart: self.auto_restart.unwrap_or(settings.auto_restart),
            map_rotation: self.map_rotation.unwrap_or(settings.map_rotation),
            max_players: self.max_players.unwrap_or(settings.max_players),
        }
    }
}

/// Read-only view of the whole arena, handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub players: Vec<Player>,
    pub stats: ArenaStats,
    pub settings: ArenaSettings,
    pub busy: bool,
}

impl ArenaSnapshot {
    /// Players whose name (case-insensitive) or id contains `term`
    pub fn search(&self, term: &str) -> Vec<&Player> {
        let term = term.trim().to_lowercase();
        self.players
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&term) || p.id.to_string().contains(&term))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.status == PlayerStatus::Active)
            .count()
    }

    pub fn inactive_count(&self) -> usize {
        self.players.len() - self.active_count()
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Announcement input as typed by the administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementDraft {
    pub title: String,
    pub message: String,
    pub display_time_ms: u64,
}

impl AnnouncementDraft {
    pub const DEFAULT_DISPLAY_MS: u64 = 5000;
    pub const DISPLAY_RANGE_MS: RangeInclusive<u64> = 1000..=30000;

    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            display_time_ms: Self::DEFAULT_DISPLAY_MS,
        }
    }

    pub fn display_time(mut self, ms: u64) -> Self {
        self.display_time_ms = ms;
        self
    }

    /// Canned announcements offered next to the compose form
    pub fn presets() -> Vec<AnnouncementDraft> {
        vec![
            Self::new(
                "Zone Closing",
                "The safe zone is shrinking! Move to the designated area immediately.",
            ),
            Self::new(
                "Server Restart",
                "Server will restart in 5 minutes. Please prepare for disconnection.",
            ),
            Self::new(
                "Event Starting",
                "Special event is starting now! Join the action for exclusive rewards.",
            ),
            Self::new(
                "Maintenance",
                "Scheduled maintenance in 10 minutes. Session will be temporarily interrupted.",
            ),
        ]
    }
}

/// A broadcast announcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub message: String,
    pub display_time_ms: u64,
    pub timestamp: u64,
}

/// Simulator configuration
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    /// Delay before STARTING becomes ON, in ms (default: 2000)
    pub start_delay: u64,
    /// Delay before STOPPING becomes OFF, in ms (default: 1000)
    pub stop_delay: u64,
    /// Delay before a reload replaces the roster, in ms (default: 1500)
    pub reload_delay: u64,
    /// Perturbation period while ON, in ms (default: 5000)
    pub tick_interval: u64,
    /// Simulated broadcast latency for announcements, in ms (default: 1500)
    pub announce_delay: u64,
    /// Initial roster size on start (default: 5..=19)
    pub start_batch: RangeInclusive<usize>,
    /// Roster size on reload (default: 5..=24)
    pub reload_batch: RangeInclusive<usize>,
    /// Zone radius right after start (default: 500)
    pub initial_zone: u32,
    /// Zone radius range during perturbation (default: 200..=699)
    pub zone_range: RangeInclusive<u32>,
    /// Kills added per perturbation tick (default: 0..=2)
    pub kills_per_tick: RangeInclusive<u64>,
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Settings at construction
    pub settings: ArenaSettings,
    /// Event channel capacity (default: 100)
    pub event_capacity: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            start_delay: 2000,
            stop_delay: 1000,
            reload_delay: 1500,
            tick_interval: 5000,
            announce_delay: 1500,
            start_batch: 5..=19,
            reload_batch: 5..=24,
            initial_zone: 500,
            zone_range: 200..=699,
            kills_per_tick: 0..=2,
            seed: None,
            settings: ArenaSettings::default(),
            event_capacity: 100,
        }
    }
}

impl ArenaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_delay(mut self, ms: u64) -> Self {
        self.start_delay = ms;
        self
    }

    pub fn stop_delay(mut self, ms: u64) -> Self {
        self.stop_delay = ms;
        self
    }

    pub fn reload_delay(mut self, ms: u64) -> Self {
        self.reload_delay = ms;
        self
    }

    pub fn tick_interval(mut self, ms: u64) -> Self {
        self.tick_interval = ms;
        self
    }

    pub fn announce_delay(mut self, ms: u64) -> Self {
        self.announce_delay = ms;
        self
    }

    pub fn start_batch(mut self, range: RangeInclusive<usize>) -> Self {
        self.start_batch = range;
        self
    }

    pub fn reload_batch(mut self, range: RangeInclusive<usize>) -> Self {
        self.reload_batch = range;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn settings(mut self, settings: ArenaSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn event_capacity(mut self, n: usize) -> Self {
        self.event_capacity = n;
        self
    }

    /// Load overrides from `ARENA_*` environment variables
    pub fn load_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from a key lookup. Unparseable or out-of-range values
    /// are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse_var::<u64, _>(&lookup, "ARENA_START_DELAY_MS") {
            config.start_delay = ms;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "ARENA_STOP_DELAY_MS") {
            config.stop_delay = ms;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "ARENA_RELOAD_DELAY_MS") {
            config.reload_delay = ms;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "ARENA_TICK_MS") {
            if ms > 0 {
                config.tick_interval = ms;
            } else {
                tracing::warn!("ARENA_TICK_MS must be > 0, using default");
            }
        }
        if let Some(seed) = parse_var::<u64, _>(&lookup, "ARENA_SEED") {
            config.seed = Some(seed);
        }
        if let Some(n) = parse_var::<u32, _>(&lookup, "ARENA_MAX_PLAYERS") {
            if (ArenaSettings::MIN_PLAYERS..=ArenaSettings::MAX_PLAYERS).contains(&n) {
                config.settings.max_players = n;
            } else {
                tracing::warn!(
                    "ARENA_MAX_PLAYERS must be {}-{}, using default",
                    ArenaSettings::MIN_PLAYERS,
                    ArenaSettings::MAX_PLAYERS
                );
            }
        }

        config
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} '{}', using default", key, raw);
            None
        }
    }
}
