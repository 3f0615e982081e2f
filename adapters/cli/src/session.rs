//! Replays script steps against the local player and a computer-placed fleet.

use anyhow::{Context, Result};
use broadside_board::{auto_deploy, AutoDeployError, AutoDeployMode, GridBoard, TopDownCamera};
use broadside_core::{Board, Command, Fleet, GameState, GridCoord, PlayerId};
use broadside_player::UserPlayer;
use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::{
    director::LayoutDirector,
    layout_transfer::{FleetLayout, LayoutTransferError},
    script::{Script, Step},
};

/// Identifier of the scripted local player.
pub(crate) const PLAYER_ID: PlayerId = PlayerId::new(1);
/// Identifier of the computer-placed opponent.
pub(crate) const OPPONENT_ID: PlayerId = PlayerId::new(2);

/// A single local match driven by script steps.
pub(crate) struct Session {
    player: UserPlayer<GridBoard, TopDownCamera>,
    director: LayoutDirector,
    opponent_board: GridBoard,
}

impl Session {
    /// Builds both boards and places the opponent fleet from `seed`.
    pub(crate) fn new(
        script: &Script,
        layout: Option<String>,
        seed: u64,
    ) -> Result<Self, AutoDeployError> {
        let geometry = script.board;
        let board = GridBoard::new(
            geometry.columns,
            geometry.rows,
            geometry.cell_length,
            Vec3::ZERO,
        );
        let camera = TopDownCamera::new(
            board.center(),
            Vec2::from(script.camera.viewport),
            script.camera.pixels_per_unit,
        );

        let mut opponent_board = board.clone();
        let mut opponent_fleet = Fleet::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        auto_deploy(
            &mut opponent_board,
            &mut opponent_fleet,
            &mut rng,
            AutoDeployMode::Fill,
        )?;
        info!(seed, "opponent fleet deployed");

        Ok(Self {
            player: UserPlayer::new(PLAYER_ID, board, camera, seed),
            director: LayoutDirector::new(OPPONENT_ID, layout),
            opponent_board,
        })
    }

    /// Feeds one step to the player and resolves the attacks it produced.
    pub(crate) fn apply(&mut self, step: Step) -> Result<()> {
        match step {
            Step::State { state } => self.change_state(state)?,
            Step::Select { ship } => self.player.select_ship_to_deploy(ship),
            Step::Undo { ship } => self.player.undo_ship_deploy(ship),
            Step::Click { x, y } => self.player.on_click(Vec2::new(x, y)),
            Step::Move { x, y } => self.player.on_move(Vec2::new(x, y)),
            Step::Wheel { delta } => self.player.on_wheel(delta),
            Step::ClickCell { column, row } => {
                let screen = self.cell_to_screen(column, row);
                self.player.on_click(screen);
            }
            Step::MoveCell { column, row } => {
                let screen = self.cell_to_screen(column, row);
                self.player.on_move(screen);
            }
        }

        self.resolve_commands()
    }

    /// Encodes the player's committed ships.
    pub(crate) fn export_layout(&self) -> Result<String, LayoutTransferError> {
        FleetLayout::capture(self.player.fleet(), self.player.board()).encode()
    }

    /// Text rendering of both boards.
    pub(crate) fn report(&self) -> String {
        format!(
            "state: {:?}\n\nplayer board\n{}\nopponent board\n{}",
            self.player.state(),
            self.player.board(),
            self.opponent_board
        )
    }

    fn change_state(&mut self, state: GameState) -> Result<()> {
        let leaving_deployment = self.player.state() == GameState::ShipDeployment
            && state != GameState::ShipDeployment;
        if leaving_deployment && self.player.is_all_deployed() {
            let layout = self
                .export_layout()
                .context("failed to save the fleet layout")?;
            self.director.save(layout);
            info!("fleet layout saved");
        }

        let setup = self
            .player
            .on_state_change(state, &mut self.director)
            .context("failed to set up the fleet for battle")?;
        info!(?state, ?setup, "state entered");
        Ok(())
    }

    fn resolve_commands(&mut self) -> Result<()> {
        for command in self.player.drain_commands() {
            match command {
                Command::Attack { opponent, target } => {
                    if opponent != OPPONENT_ID {
                        warn!(opponent = opponent.get(), "attack against unknown player dropped");
                        continue;
                    }
                    match self.opponent_board.attack_at(target) {
                        Ok(outcome) => info!(?outcome, "attack resolved"),
                        Err(reason) => warn!(%reason, "attack rejected"),
                    }
                }
            }
        }

        if self.player.state() == GameState::Battle && self.opponent_board.is_defeated() {
            info!("opponent fleet destroyed");
            self.change_state(GameState::GameEnd)?;
        }
        Ok(())
    }

    fn cell_to_screen(&self, column: u32, row: u32) -> Vec2 {
        let world = self
            .player
            .board()
            .grid_to_world(GridCoord::new(column, row));
        self.player.camera().world_to_screen(world)
    }
}

#[cfg(test)]
mod tests {
    use broadside_core::ShipType;

    use super::*;
    use crate::script::DEMO_SCRIPT;

    fn run(text: &str, layout: Option<String>) -> Session {
        let script = Script::parse(text).expect("script parses");
        let mut session = Session::new(&script, layout, 9).expect("opponent fleet fits");
        for step in script.steps {
            session.apply(step).expect("step applies");
        }
        session
    }

    #[test]
    fn demo_script_deploys_by_hand_and_fires() {
        let session = run(DEMO_SCRIPT, None);

        assert_eq!(session.player.state(), GameState::GameEnd);
        assert!(session.player.is_all_deployed());
        let board = session.player.board();
        assert_eq!(board.occupant(GridCoord::new(1, 1)), Some(ShipType::Carrier));
        assert_eq!(board.occupant(GridCoord::new(5, 1)), Some(ShipType::Battleship));
        assert_eq!(board.occupant(GridCoord::new(7, 6)), Some(ShipType::Submarine));
        assert_eq!(board.occupant(GridCoord::new(6, 8)), None);
        for (column, row) in [(0, 0), (4, 4), (5, 5), (2, 7), (9, 9)] {
            assert!(
                session.opponent_board.is_attacked(GridCoord::new(column, row)),
                "cell ({column}, {row}) should have been shot"
            );
        }
    }

    #[test]
    fn battle_without_saved_layout_auto_deploys() {
        let session = run(
            r#"
            [[steps]]
            action = "state"
            state = "Battle"
            "#,
            None,
        );

        assert!(session.player.is_all_deployed());
        assert_eq!(session.player.battle().opponent(), Some(OPPONENT_ID));
    }

    #[test]
    fn provided_layout_is_restored_on_battle() {
        let first = run(DEMO_SCRIPT, None);
        let layout = first.export_layout().expect("layout encodes");

        let second = run(
            r#"
            [[steps]]
            action = "state"
            state = "Battle"
            "#,
            Some(layout),
        );

        assert_eq!(
            second.player.board().to_string(),
            first.player.board().to_string()
        );
    }

    #[test]
    fn sinking_every_ship_ends_the_game() {
        let script = Script::parse(
            r#"
            [[steps]]
            action = "state"
            state = "Battle"
            "#,
        )
        .expect("script parses");
        let mut session = Session::new(&script, None, 4).expect("opponent fleet fits");
        for step in script.steps {
            session.apply(step).expect("step applies");
        }

        let targets: Vec<GridCoord> = session
            .opponent_board
            .occupied_cells()
            .map(|(cell, _)| cell)
            .collect();
        for cell in targets {
            let screen = session.cell_to_screen(cell.column(), cell.row());
            session
                .apply(Step::Click {
                    x: screen.x,
                    y: screen.y,
                })
                .expect("attack applies");
        }

        assert!(session.opponent_board.is_defeated());
        assert_eq!(session.player.state(), GameState::GameEnd);
    }
}
