//! Simulation core for a side-scrolling arcade shooter.
//!
//! The player's plane flies on the left, enemy planes stream in from the
//! right, and a boss guards the last level.  Everything here is headless:
//! a driver feeds held inputs into `Campaign::tick` every 50 ms and draws
//! the resulting `Snapshot`.

pub mod audio;
pub mod boss;
pub mod campaign;
pub mod clock;
pub mod collision;
pub mod compute;
pub mod entities;
pub mod input;
pub mod level;
pub mod player;
pub mod random;
pub mod spawn;

pub use campaign::Campaign;
pub use compute::{GameEvent, Hud, LevelSession, Services, Snapshot, TickReport, TICK_MS};
pub use input::{HeldInputs, InputCommand};
pub use level::{LevelConfig, LevelError, LevelId, LevelRegistry};
