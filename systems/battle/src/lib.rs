#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Battle-phase system that turns clicks into attack commands.

use broadside_core::{Camera, Command, PlayerId};
use glam::Vec2;
use tracing::{debug, warn};

/// Translates battle-phase clicks into [`Command::Attack`] values.
///
/// Targets are not validated here; the receiving board decides whether an
/// attack is legal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BattleInput {
    opponent: Option<PlayerId>,
}

impl BattleInput {
    /// Creates an adapter with no opponent bound.
    #[must_use]
    pub const fn new() -> Self {
        Self { opponent: None }
    }

    /// Opponent receiving attacks, if bound.
    #[must_use]
    pub const fn opponent(&self) -> Option<PlayerId> {
        self.opponent
    }

    /// Directs subsequent attacks at `opponent`.
    pub fn bind_opponent(&mut self, opponent: PlayerId) {
        self.opponent = Some(opponent);
    }

    /// Forgets the bound opponent.
    pub fn unbind(&mut self) {
        self.opponent = None;
    }

    /// Emits an attack at the world point under `screen`.
    pub fn handle_click<C>(&self, camera: &C, screen: Vec2, out: &mut Vec<Command>)
    where
        C: Camera + ?Sized,
    {
        let Some(opponent) = self.opponent else {
            warn!("battle click ignored: no opponent bound");
            return;
        };

        let target = camera.screen_to_world(screen);
        debug!(opponent = opponent.get(), x = target.x, z = target.z, "attack requested");
        out.push(Command::Attack { opponent, target });
    }
}
