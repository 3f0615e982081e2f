//! Game director backed by an in-memory saved layout.

use broadside_core::{Board, Fleet, PlayerId};
use broadside_system_lifecycle::{GameDirector, LoadError};
use tracing::debug;

use crate::layout_transfer::FleetLayout;

/// Pairs the local player with a fixed opponent and keeps one saved layout.
#[derive(Clone, Debug)]
pub(crate) struct LayoutDirector {
    opponent: PlayerId,
    saved: Option<String>,
}

impl LayoutDirector {
    /// Creates a director that starts with the provided encoded layout.
    pub(crate) fn new(opponent: PlayerId, saved: Option<String>) -> Self {
        Self { opponent, saved }
    }

    /// Replaces the saved layout.
    pub(crate) fn save(&mut self, layout: String) {
        self.saved = Some(layout);
    }
}

impl GameDirector for LayoutDirector {
    fn opponent_of(&self, _player: PlayerId) -> PlayerId {
        self.opponent
    }

    fn load_ship_deployment(
        &mut self,
        player: PlayerId,
        fleet: &mut Fleet,
        board: &mut dyn Board,
    ) -> Result<(), LoadError> {
        let encoded = self.saved.as_deref().ok_or(LoadError::NotFound)?;
        let layout =
            FleetLayout::decode(encoded).map_err(|error| LoadError::Corrupt(error.to_string()))?;
        layout
            .apply(fleet, board)
            .map_err(|error| LoadError::Corrupt(error.to_string()))?;
        debug!(player = player.get(), ships = layout.ships.len(), "layout loaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use broadside_board::GridBoard;

    use super::*;

    #[test]
    fn missing_layout_is_not_found() {
        let mut director = LayoutDirector::new(PlayerId::new(2), None);

        let result =
            director.load_ship_deployment(PlayerId::new(1), &mut Fleet::new(), &mut GridBoard::default());

        assert_eq!(result, Err(LoadError::NotFound));
    }

    #[test]
    fn malformed_layout_is_corrupt() {
        let mut director = LayoutDirector::new(PlayerId::new(2), Some("fleet:v1:10x10".into()));

        let result =
            director.load_ship_deployment(PlayerId::new(1), &mut Fleet::new(), &mut GridBoard::default());

        assert!(matches!(result, Err(LoadError::Corrupt(_))));
    }

    #[test]
    fn saved_layout_is_applied() {
        let mut source_board = GridBoard::default();
        let mut source_fleet = Fleet::new();
        let mut rng = <rand_chacha::ChaCha8Rng as rand::SeedableRng>::seed_from_u64(3);
        broadside_board::auto_deploy(
            &mut source_board,
            &mut source_fleet,
            &mut rng,
            broadside_board::AutoDeployMode::Forced,
        )
        .expect("default board fits the fleet");
        let encoded = FleetLayout::capture(&source_fleet, &source_board)
            .encode()
            .expect("layout encodes");

        let mut director = LayoutDirector::new(PlayerId::new(2), None);
        director.save(encoded);
        let mut board = GridBoard::default();
        let mut fleet = Fleet::new();

        director
            .load_ship_deployment(PlayerId::new(1), &mut fleet, &mut board)
            .expect("saved layout loads");

        assert!(fleet.is_all_deployed());
        assert_eq!(board.to_string(), source_board.to_string());
    }
}
