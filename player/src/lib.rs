#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Local player that turns host input into fleet placement and attacks.
//!
//! [`UserPlayer`] owns the fleet, board and camera of one participant and
//! wires the per-phase systems behind a state-keyed [`InputRouter`]. The host
//! drives it with pointer events and state transitions and collects the
//! resulting attack orders through [`UserPlayer::drain_commands`].

use broadside_board::AutoDeployError;
use broadside_core::{Board, Camera, Command, Fleet, GameState, PlayerId, ShipType};
use broadside_system_battle::BattleInput;
use broadside_system_deployment::{DeploymentController, DeploymentScene};
use broadside_system_input_router::InputRouter;
use broadside_system_lifecycle::{on_state_change, BattleSetup, GameDirector, LifecycleScene};
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// A human-controlled participant.
pub struct UserPlayer<B, C> {
    router: InputRouter<Controls<B, C>>,
    controls: Controls<B, C>,
}

struct Controls<B, C> {
    id: PlayerId,
    state: GameState,
    pointer: Vec2,
    fleet: Fleet,
    board: B,
    camera: C,
    rng: ChaCha8Rng,
    deployment: DeploymentController,
    battle: BattleInput,
    commands: Vec<Command>,
}

impl<B, C> Controls<B, C> {
    fn deployment_scene(&mut self) -> (&mut DeploymentController, DeploymentScene<'_, B, C>) {
        (
            &mut self.deployment,
            DeploymentScene {
                fleet: &mut self.fleet,
                board: &mut self.board,
                camera: &self.camera,
            },
        )
    }
}

impl<B, C> UserPlayer<B, C>
where
    B: Board,
    C: Camera,
{
    /// Creates a player in the title state with an undeployed fleet.
    ///
    /// `seed` drives automatic deployment so runs can be replayed.
    #[must_use]
    pub fn new(id: PlayerId, board: B, camera: C, seed: u64) -> Self {
        let router = InputRouter::new()
            .with_click(GameState::ShipDeployment, deployment_click::<B, C>)
            .with_move(GameState::ShipDeployment, deployment_move::<B, C>)
            .with_wheel(GameState::ShipDeployment, deployment_wheel::<B, C>)
            .with_click(GameState::Battle, battle_click::<B, C>);

        Self {
            router,
            controls: Controls {
                id,
                state: GameState::Title,
                pointer: Vec2::ZERO,
                fleet: Fleet::new(),
                board,
                camera,
                rng: ChaCha8Rng::seed_from_u64(seed),
                deployment: DeploymentController::new(),
                battle: BattleInput::new(),
                commands: Vec::new(),
            },
        }
    }

    /// Identifier of the player.
    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.controls.id
    }

    /// Game state most recently reported by the host.
    #[must_use]
    pub fn state(&self) -> GameState {
        self.controls.state
    }

    /// Last pointer position received, in screen space.
    #[must_use]
    pub fn pointer(&self) -> Vec2 {
        self.controls.pointer
    }

    /// Ships owned by the player.
    #[must_use]
    pub fn fleet(&self) -> &Fleet {
        &self.controls.fleet
    }

    /// Board holding the player's ships.
    #[must_use]
    pub fn board(&self) -> &B {
        &self.controls.board
    }

    /// Projection used for pointer input.
    #[must_use]
    pub fn camera(&self) -> &C {
        &self.controls.camera
    }

    /// Deployment-phase selection and tint.
    #[must_use]
    pub fn deployment(&self) -> &DeploymentController {
        &self.controls.deployment
    }

    /// Battle-phase input adapter.
    #[must_use]
    pub fn battle(&self) -> &BattleInput {
        &self.controls.battle
    }

    /// Reports whether every ship has been committed to the board.
    #[must_use]
    pub fn is_all_deployed(&self) -> bool {
        self.controls.fleet.is_all_deployed()
    }

    /// Handles a primary click at `screen`.
    pub fn on_click(&mut self, screen: Vec2) {
        self.controls.pointer = screen;
        let state = self.controls.state;
        self.router.click(&mut self.controls, state, screen);
    }

    /// Handles the pointer moving to `screen`.
    pub fn on_move(&mut self, screen: Vec2) {
        self.controls.pointer = screen;
        let state = self.controls.state;
        self.router.pointer_moved(&mut self.controls, state, screen);
    }

    /// Handles a scroll-wheel step.
    pub fn on_wheel(&mut self, delta: f32) {
        let state = self.controls.state;
        self.router.wheel(&mut self.controls, state, delta);
    }

    /// Records the new game state and runs its entry actions.
    pub fn on_state_change<D>(
        &mut self,
        state: GameState,
        director: &mut D,
    ) -> Result<Option<BattleSetup>, AutoDeployError>
    where
        D: GameDirector + ?Sized,
    {
        debug!(player = self.controls.id.get(), ?state, "state changed");
        self.controls.state = state;

        let controls = &mut self.controls;
        let mut scene = LifecycleScene {
            player: controls.id,
            fleet: &mut controls.fleet,
            board: &mut controls.board,
            deployment: &mut controls.deployment,
            battle: &mut controls.battle,
        };
        on_state_change(state, &mut scene, director, &mut controls.rng)
    }

    /// Picks up the ship of the provided kind under the last pointer position.
    pub fn select_ship_to_deploy(&mut self, kind: ShipType) {
        let pointer = self.controls.pointer;
        let (deployment, mut scene) = self.controls.deployment_scene();
        deployment.select_ship_to_deploy(&mut scene, kind, pointer);
    }

    /// Retracts the ship of the provided kind from the board.
    pub fn undo_ship_deploy(&mut self, kind: ShipType) {
        let (deployment, mut scene) = self.controls.deployment_scene();
        deployment.undo_ship_deploy(&mut scene, kind);
    }

    /// Removes and returns the commands emitted since the previous call.
    pub fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.controls.commands)
    }
}

fn deployment_click<B: Board, C: Camera>(controls: &mut Controls<B, C>, screen: Vec2) {
    let (deployment, mut scene) = controls.deployment_scene();
    deployment.handle_click(&mut scene, screen);
}

fn deployment_move<B: Board, C: Camera>(controls: &mut Controls<B, C>, screen: Vec2) {
    let (deployment, mut scene) = controls.deployment_scene();
    deployment.handle_move(&mut scene, screen);
}

fn deployment_wheel<B: Board, C: Camera>(controls: &mut Controls<B, C>, delta: f32) {
    let (deployment, mut scene) = controls.deployment_scene();
    deployment.handle_wheel(&mut scene, delta);
}

fn battle_click<B, C: Camera>(controls: &mut Controls<B, C>, screen: Vec2) {
    controls
        .battle
        .handle_click(&controls.camera, screen, &mut controls.commands);
}
