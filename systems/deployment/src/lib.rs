#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deployment-phase system that moves, rotates, commits and retracts ships.
//!
//! The controller tracks at most one selected ship. Pointer input is projected
//! through the scene's [`Camera`] and applied to the player's [`Fleet`] via the
//! [`Board`] contract. Placement rejections are reported through `tracing` and
//! never change state.

use broadside_core::{Board, Camera, DeployTint, Fleet, Rotation, ShipType, VisualMode};
use glam::Vec2;
use tracing::{debug, info};

/// Collaborators the controller operates on for a single input event.
pub struct DeploymentScene<'a, B: ?Sized, C: ?Sized> {
    /// Ships owned by the deploying player.
    pub fleet: &'a mut Fleet,
    /// Board receiving the player's ships.
    pub board: &'a mut B,
    /// Projection used to map pointer positions onto the board.
    pub camera: &'a C,
}

/// Selection and placement state for the deployment phase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeploymentController {
    selected: Option<ShipType>,
    tint: DeployTint,
}

impl DeploymentController {
    /// Creates a controller with nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selected: None,
            tint: DeployTint::Success,
        }
    }

    /// Ship currently being placed, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<ShipType> {
        self.selected
    }

    /// Deploy-mode tint computed by the most recent move or rotation.
    #[must_use]
    pub const fn tint(&self) -> DeployTint {
        self.tint
    }

    /// Picks up the ship of the provided kind for placement.
    pub fn select_ship_to_deploy<B, C>(
        &mut self,
        scene: &mut DeploymentScene<'_, B, C>,
        kind: ShipType,
        pointer: Vec2,
    ) where
        B: Board + ?Sized,
        C: Camera + ?Sized,
    {
        self.select(scene, Some(kind), pointer);
    }

    /// Replaces the current selection.
    ///
    /// A previously selected ship gets its normal material back and is hidden
    /// unless it is deployed. The new ship is highlighted, moved under the
    /// pointer on the board plane and shown.
    pub fn select<B, C>(
        &mut self,
        scene: &mut DeploymentScene<'_, B, C>,
        next: Option<ShipType>,
        pointer: Vec2,
    ) where
        B: Board + ?Sized,
        C: Camera + ?Sized,
    {
        if self.selected != next {
            self.clear_selection(scene.fleet);
        }
        self.selected = next;

        let Some(kind) = next else {
            return;
        };

        let mut world = scene.camera.screen_to_world(pointer);
        world.y = scene.board.plane_height();
        let ship = scene.fleet.ship_mut(kind);
        ship.set_visual(VisualMode::Selected);
        ship.set_position(world);
        ship.set_active(true);
        debug!(ship = ?kind, "ship selected for deployment");
    }

    /// Drops the current selection, restoring the ship's normal appearance.
    pub fn clear_selection(&mut self, fleet: &mut Fleet) {
        let Some(previous) = self.selected.take() else {
            return;
        };

        let ship = fleet.ship_mut(previous);
        ship.set_visual(VisualMode::Normal);
        if !ship.is_deployed() {
            ship.set_active(false);
        }
    }

    /// Clears the selection and the tint.
    pub fn reset(&mut self, fleet: &mut Fleet) {
        self.clear_selection(fleet);
        self.tint = DeployTint::default();
    }

    /// Commits the selected ship, or retracts the ship under the pointer when
    /// nothing is selected.
    pub fn handle_click<B, C>(&mut self, scene: &mut DeploymentScene<'_, B, C>, screen: Vec2)
    where
        B: Board + ?Sized,
        C: Camera + ?Sized,
    {
        let world = scene.camera.screen_to_world(screen);

        if let Some(kind) = self.selected {
            match scene.board.deploy_at(scene.fleet.ship_mut(kind), world) {
                Ok(cell) => {
                    info!(
                        ship = ?kind,
                        column = cell.column(),
                        row = cell.row(),
                        "ship deployed"
                    );
                    self.clear_selection(scene.fleet);
                }
                Err(reason) => debug!(ship = ?kind, %reason, "ship deployment rejected"),
            }
            return;
        }

        if !scene.board.contains(world) {
            return;
        }

        match scene.board.ship_type_at(world) {
            Some(kind) => self.undo_ship_deploy(scene, kind),
            None => debug!("no deployed ship under the pointer"),
        }
    }

    /// Drags the selected, undeployed ship along with the pointer.
    ///
    /// Inside the board the ship snaps to the hovered cell and the tint reports
    /// whether it could be committed there. Outside the board it follows the
    /// pointer freely and the tint always reports failure.
    pub fn handle_move<B, C>(&mut self, scene: &mut DeploymentScene<'_, B, C>, screen: Vec2)
    where
        B: Board + ?Sized,
        C: Camera + ?Sized,
    {
        let Some(kind) = self.selected else {
            return;
        };
        if scene.fleet.ship(kind).is_deployed() {
            return;
        }

        let mut world = scene.camera.screen_to_world(screen);
        world.y = scene.board.plane_height();
        let ship = scene.fleet.ship_mut(kind);

        self.tint = match scene.board.world_to_grid(world) {
            Some(cell) => {
                ship.set_position(scene.board.grid_to_world(cell));
                DeployTint::from_placeable(scene.board.can_deploy(ship, cell))
            }
            None => {
                ship.set_position(world);
                DeployTint::Failure
            }
        };
    }

    /// Turns the selected ship a quarter turn.
    ///
    /// Negative deltas rotate counter-clockwise; any other delta rotates
    /// clockwise.
    pub fn handle_wheel<B, C>(&mut self, scene: &mut DeploymentScene<'_, B, C>, delta: f32)
    where
        B: Board + ?Sized,
        C: Camera + ?Sized,
    {
        let Some(kind) = self.selected else {
            return;
        };
        let rotation = if delta < 0.0 {
            Rotation::CounterClockwise
        } else {
            Rotation::Clockwise
        };

        let ship = scene.fleet.ship_mut(kind);
        ship.rotate(rotation);
        self.tint = DeployTint::from_placeable(scene.board.can_deploy_at(ship, ship.position()));
    }

    /// Retracts the committed placement of the ship of the provided kind.
    ///
    /// The retracted ship is hidden unless it is the one being placed.
    pub fn undo_ship_deploy<B, C>(&mut self, scene: &mut DeploymentScene<'_, B, C>, kind: ShipType)
    where
        B: Board + ?Sized,
        C: Camera + ?Sized,
    {
        let ship = scene.fleet.ship_mut(kind);
        scene.board.undo_deployment(ship);
        if self.selected != Some(kind) {
            ship.set_active(false);
        }
        info!(ship = ?kind, "ship deployment undone");
    }
}
