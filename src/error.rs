//! Error types for arena-admin

use crate::types::{ArenaStatus, Command};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("Another lifecycle transition is in progress")]
    Busy,

    #[error("Cannot {command} while arena is {status}")]
    InvalidTransition { status: ArenaStatus, command: Command },

    #[error("Transition superseded by a later command")]
    Superseded,

    #[error("max_players {value} out of range ({min}-{max})")]
    MaxPlayersOutOfRange { value: u32, min: u32, max: u32 },

    #[error("Invalid announcement: {0}")]
    InvalidAnnouncement(String),

    #[error("Arena has been shut down")]
    Shutdown,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
