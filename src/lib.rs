//! # arena-admin
//!
//! State core for an arena administration dashboard. All data is synthetic.
//!
//! ## Features
//!
//! - **Lifecycle**: OFF → STARTING → ON → STOPPING → OFF with deferred,
//!   supersedable transitions
//! - **Roster**: generated players, kicks, periodic perturbation while ON
//! - **Settings**: validated partial updates
//! - **Announcements**: validated broadcasts with a bounded history
//! - **Determinism**: injectable RNG and clock
//!
//! ## Example
//!
//! ```rust,ignore
//! use arena_admin::{ArenaConfig, ArenaEvent, ArenaSimulator, SettingsPatch};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let arena = ArenaSimulator::new(ArenaConfig::new().seed(7));
//!
//!     arena.start().await?;
//!     println!("{} players online", arena.player_count().await);
//!
//!     arena.update_settings(SettingsPatch::new().max_players(64)).await?;
//!
//!     while let Some(event) = arena.try_recv().await {
//!         if let ArenaEvent::StatusChanged(status) = event {
//!             println!("status: {status}");
//!         }
//!     }
//!
//!     arena.stop().await?;
//!     arena.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod arena;
pub mod clock;
pub mod error;
pub mod mock;
pub mod notify;
pub mod runtime;
pub mod types;


pub use arena::{ArenaEvent, ArenaSimulator};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ArenaError, Result};
pub use notify::{Notification, NotificationKind};
pub use types::*;
