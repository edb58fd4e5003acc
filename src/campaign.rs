//! A run through the level table.
//!
//! The campaign owns the active `LevelSession` and the injected services.
//! When a level reports `Advance`, the next level is built with the
//! player's remaining health handed over explicitly.  Restart goes back to
//! the first level at full starting health.

use tracing::{info, warn};

use crate::compute::{GameEvent, LevelSession, Services, Snapshot, TickReport};
use crate::input::HeldInputs;
use crate::level::{LevelError, LevelId, LevelRegistry};

pub struct Campaign {
    registry: LevelRegistry,
    start: LevelId,
    session: LevelSession,
    services: Services,
}

impl Campaign {
    pub fn new(registry: LevelRegistry, start: LevelId, mut services: Services) -> Result<Self, LevelError> {
        let config = registry.get(&start)?.clone();
        let health = config.player_health;
        let session = LevelSession::new(config, health, &mut services);
        Ok(Self {
            registry,
            start,
            session,
            services,
        })
    }

    /// Built-in three-level campaign from the first level.
    pub fn builtin(services: Services) -> Result<Self, LevelError> {
        let registry = LevelRegistry::builtin();
        let start = registry
            .first()
            .cloned()
            .ok_or_else(|| LevelError::UnknownLevel(LevelId::new("level-one")))?;
        Self::new(registry, start, services)
    }

    /// One tick of the active level.  An `Advance` event loads the next
    /// level before returning; an unknown target is an error and leaves the
    /// finished level in place.
    pub fn tick(&mut self, input: &HeldInputs) -> Result<TickReport, LevelError> {
        let report = self.session.tick(input, &mut self.services);
        if let Some(GameEvent::Advance(next)) = &report.event {
            self.advance_to(next)?;
        }
        Ok(report)
    }

    pub fn advance_to(&mut self, id: &LevelId) -> Result<(), LevelError> {
        let config = match self.registry.get(id) {
            Ok(config) => config.clone(),
            Err(err) => {
                warn!(from = %self.session.level_id(), to = %id, "level transition rejected");
                return Err(err);
            }
        };
        let carried = self.session.player_health();
        info!(from = %self.session.level_id(), to = %id, health = carried, "advancing");
        self.session = LevelSession::new(config, carried, &mut self.services);
        Ok(())
    }

    pub fn restart(&mut self) -> Result<(), LevelError> {
        let config = self.registry.get(&self.start)?.clone();
        let health = config.player_health;
        info!(level = %self.start, "restarting");
        // bring the volume back up from the pause fade
        self.resume();
        self.services.audio.stop_music();
        self.session = LevelSession::new(config, health, &mut self.services);
        Ok(())
    }

    pub fn pause(&mut self) {
        self.session.pause(self.services.audio.as_mut());
    }

    pub fn resume(&mut self) {
        self.session.resume(self.services.audio.as_mut());
    }

    pub fn toggle_pause(&mut self) {
        if self.session.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.session.is_paused()
    }

    pub fn session(&self) -> &LevelSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut LevelSession {
        &mut self.session
    }

    pub fn current_level(&self) -> &LevelId {
        self.session.level_id()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }
}
