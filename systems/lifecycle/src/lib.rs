#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reacts to game-state transitions for a single player.
//!
//! Every transition resets the per-phase systems. Entering
//! [`GameState::Battle`] additionally binds the opponent and restores the
//! player's saved layout, falling back to a forced automatic deployment when
//! nothing usable was saved.

use broadside_board::{auto_deploy, AutoDeployError, AutoDeployMode};
use broadside_core::{Board, Fleet, GameState, PlayerId};
use broadside_system_battle::BattleInput;
use broadside_system_deployment::DeploymentController;
use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

/// Reasons a saved deployment could not be restored.
///
/// Callers treat every variant the same way; the distinction exists for logs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadError {
    /// No layout was saved for the player.
    #[error("no saved deployment")]
    NotFound,
    /// A layout exists but cannot be applied.
    #[error("saved deployment is unusable: {0}")]
    Corrupt(String),
}

/// Host-side authority over match setup.
pub trait GameDirector {
    /// Identifier of the player `player` is fighting.
    fn opponent_of(&self, player: PlayerId) -> PlayerId;

    /// Restores the saved layout of `player` onto `board`.
    ///
    /// A failure may leave ships partially deployed.
    fn load_ship_deployment(
        &mut self,
        player: PlayerId,
        fleet: &mut Fleet,
        board: &mut dyn Board,
    ) -> Result<(), LoadError>;
}

/// How the fleet ended up on the board when battle started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BattleSetup {
    /// The director restored a saved layout.
    Loaded,
    /// The saved layout was unavailable and the fleet was placed automatically.
    AutoDeployed,
}

/// Player-owned state touched by a transition.
pub struct LifecycleScene<'a, B> {
    /// Player whose state is changing.
    pub player: PlayerId,
    /// Ships owned by the player.
    pub fleet: &'a mut Fleet,
    /// Board holding the player's ships.
    pub board: &'a mut B,
    /// Deployment-phase system to reset.
    pub deployment: &'a mut DeploymentController,
    /// Battle-phase system to reset and rebind.
    pub battle: &'a mut BattleInput,
}

/// Applies the entry actions of `state`.
///
/// Returns `Ok(None)` for states without setup work and the battle setup
/// outcome when entering [`GameState::Battle`].
pub fn on_state_change<B, D, R>(
    state: GameState,
    scene: &mut LifecycleScene<'_, B>,
    director: &mut D,
    rng: &mut R,
) -> Result<Option<BattleSetup>, AutoDeployError>
where
    B: Board,
    D: GameDirector + ?Sized,
    R: Rng + ?Sized,
{
    initialise(scene);

    if state != GameState::Battle {
        return Ok(None);
    }

    let opponent = director.opponent_of(scene.player);
    scene.battle.bind_opponent(opponent);
    info!(
        player = scene.player.get(),
        opponent = opponent.get(),
        "battle started"
    );

    match director.load_ship_deployment(scene.player, scene.fleet, &mut *scene.board) {
        Ok(()) => {
            info!(player = scene.player.get(), "saved deployment restored");
            Ok(Some(BattleSetup::Loaded))
        }
        Err(reason) => {
            warn!(
                player = scene.player.get(),
                %reason,
                "falling back to automatic deployment"
            );
            auto_deploy(&mut *scene.board, scene.fleet, rng, AutoDeployMode::Forced)?;
            Ok(Some(BattleSetup::AutoDeployed))
        }
    }
}

fn initialise<B>(scene: &mut LifecycleScene<'_, B>) {
    scene.deployment.reset(scene.fleet);
    scene.battle.unbind();
}
