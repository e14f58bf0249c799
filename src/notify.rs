//! Notifications raised by the presentation layer around command outcomes.
//!
//! The simulator never dispatches these; callers map results with the
//! helpers below and render them however they like.

use crate::error::{ArenaError, Result};
use crate::types::{Announcement, ArenaSettings, Command, Player};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Map a lifecycle command result to a dashboard notification
    pub fn for_command(command: Command, result: &Result<()>) -> Self {
        match (command, result) {
            (Command::Start, Ok(())) => Self::new(NotificationKind::Success, "Arena Started")
                .message("Arena has been successfully started."),
            (Command::Stop, Ok(())) => Self::new(NotificationKind::Success, "Arena Stopped")
                .message("Arena has been successfully stopped."),
            (Command::Reload, Ok(())) => Self::new(NotificationKind::Info, "Arena Reloaded")
                .message("Arena configuration has been reloaded."),
            (_, Err(ArenaError::Busy)) => Self::new(NotificationKind::Warning, "Arena Busy")
                .message(format!("Cannot {command} while another action is in progress.")),
            (_, Err(ArenaError::Superseded)) => {
                Self::new(NotificationKind::Info, "Action Cancelled")
                    .message(format!("The pending {command} was replaced by a later command."))
            }
            (_, Err(err @ ArenaError::InvalidTransition { .. })) => {
                Self::new(NotificationKind::Warning, "Not Available").message(err.to_string())
            }
            (_, Err(err)) => Self::new(NotificationKind::Error, "Action Failed")
                .message(format!("Failed to execute {command}: {err}")),
        }
    }

    pub fn for_kick(result: &Result<Option<Player>>) -> Self {
        match result {
            Ok(Some(p)) => Self::new(NotificationKind::Info, "Player Kicked")
                .message(format!("{} has been removed from the arena.", p.name)),
            Ok(None) => Self::new(NotificationKind::Warning, "Player Not Found")
                .message("The player is no longer in the arena."),
            Err(err) => Self::new(NotificationKind::Error, "Kick Failed").message(err.to_string()),
        }
    }

    pub fn for_settings(result: &Result<ArenaSettings>) -> Self {
        match result {
            Ok(_) => Self::new(NotificationKind::Success, "Settings Updated"),
            Err(err) => Self::new(NotificationKind::Error, "Invalid Setting").message(err.to_string()),
        }
    }

    pub fn for_announcement(result: &Result<Announcement>) -> Self {
        match result {
            Ok(a) => Self::new(NotificationKind::Success, "Announcement Sent").message(format!(
                "Announcement \"{}\" has been broadcast to all players.",
                a.title
            )),
            Err(ArenaError::InvalidAnnouncement(reason)) => {
                Self::new(NotificationKind::Error, "Invalid Input").message(reason.clone())
            }
            Err(err) => Self::new(NotificationKind::Error, "Announcement Failed").message(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArenaStatus;

    #[test]
    fn test_command_success() {
        let n = Notification::for_command(Command::Start, &Ok(()));
        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(n.title, "Arena Started");

        let n = Notification::for_command(Command::Reload, &Ok(()));
        assert_eq!(n.kind, NotificationKind::Info);
    }

    #[test]
    fn test_command_rejections() {
        let n = Notification::for_command(Command::Start, &Err(ArenaError::Busy));
        assert_eq!(n.kind, NotificationKind::Warning);

        let err = ArenaError::InvalidTransition {
            status: ArenaStatus::On,
            command: Command::Start,
        };
        let n = Notification::for_command(Command::Start, &Err(err));
        assert_eq!(n.message.as_deref(), Some("Cannot start while arena is ON"));

        let n = Notification::for_command(Command::Stop, &Err(ArenaError::Shutdown));
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(n.title, "Action Failed");
    }

    #[test]
    fn test_kick_not_found() {
        let n = Notification::for_kick(&Ok(None));
        assert_eq!(n.kind, NotificationKind::Warning);

        let n = Notification::for_kick(&Err(ArenaError::Shutdown));
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(n.message.as_deref(), Some("Arena has been shut down"));
    }

    #[test]
    fn test_serialization() {
        let n = Notification::new(NotificationKind::Info, "Hello");
        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains("\"kind\":\"info\""));
        assert!(!json.contains("message"));
    }
}
