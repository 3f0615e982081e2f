use broadside_board::{GridBoard, TopDownCamera};
use broadside_core::{
    Board, Camera, DeployTint, Fleet, GridCoord, PlacementError, Ship, ShipDirection, ShipType,
    VisualMode,
};
use broadside_system_deployment::{DeploymentController, DeploymentScene};
use glam::{Vec2, Vec3};

/// Grid board that records every retraction it performs.
#[derive(Debug, Default)]
struct RecordingBoard {
    inner: GridBoard,
    undone: Vec<ShipType>,
}

impl Board for RecordingBoard {
    fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    fn plane_height(&self) -> f32 {
        self.inner.plane_height()
    }

    fn world_to_grid(&self, world: Vec3) -> Option<GridCoord> {
        self.inner.world_to_grid(world)
    }

    fn grid_to_world(&self, cell: GridCoord) -> Vec3 {
        self.inner.grid_to_world(cell)
    }

    fn occupant(&self, cell: GridCoord) -> Option<ShipType> {
        self.inner.occupant(cell)
    }

    fn check_deployment(&self, ship: &Ship, cell: GridCoord) -> Result<(), PlacementError> {
        self.inner.check_deployment(ship, cell)
    }

    fn deploy(&mut self, ship: &mut Ship, cell: GridCoord) -> Result<(), PlacementError> {
        self.inner.deploy(ship, cell)
    }

    fn undo_deployment(&mut self, ship: &mut Ship) {
        self.undone.push(ship.kind());
        self.inner.undo_deployment(ship);
    }
}

struct Harness {
    controller: DeploymentController,
    fleet: Fleet,
    board: RecordingBoard,
    camera: TopDownCamera,
}

impl Harness {
    fn new() -> Self {
        let board = RecordingBoard::default();
        let camera = TopDownCamera::new(board.inner.center(), Vec2::new(800.0, 600.0), 40.0);
        Self {
            controller: DeploymentController::new(),
            fleet: Fleet::new(),
            board,
            camera,
        }
    }

    fn screen_of(&self, cell: GridCoord) -> Vec2 {
        self.camera.world_to_screen(self.board.grid_to_world(cell))
    }

    fn select(&mut self, kind: ShipType, pointer: Vec2) {
        let mut scene = DeploymentScene {
            fleet: &mut self.fleet,
            board: &mut self.board,
            camera: &self.camera,
        };
        self.controller.select_ship_to_deploy(&mut scene, kind, pointer);
    }

    fn click(&mut self, screen: Vec2) {
        let mut scene = DeploymentScene {
            fleet: &mut self.fleet,
            board: &mut self.board,
            camera: &self.camera,
        };
        self.controller.handle_click(&mut scene, screen);
    }

    fn pointer_moved(&mut self, screen: Vec2) {
        let mut scene = DeploymentScene {
            fleet: &mut self.fleet,
            board: &mut self.board,
            camera: &self.camera,
        };
        self.controller.handle_move(&mut scene, screen);
    }

    fn wheel(&mut self, delta: f32) {
        let mut scene = DeploymentScene {
            fleet: &mut self.fleet,
            board: &mut self.board,
            camera: &self.camera,
        };
        self.controller.handle_wheel(&mut scene, delta);
    }

    fn deploy_at(&mut self, kind: ShipType, cell: GridCoord) {
        let screen = self.screen_of(cell);
        self.select(kind, screen);
        self.click(screen);
        assert!(self.fleet.ship(kind).is_deployed(), "{kind:?} should deploy");
    }

    fn highlighted(&self) -> Vec<ShipType> {
        self.fleet
            .iter()
            .filter(|ship| ship.visual() == VisualMode::Selected)
            .map(Ship::kind)
            .collect()
    }
}

const OFF_BOARD: Vec2 = Vec2::new(5.0, 5.0);

#[test]
fn selection_places_ship_under_pointer_on_board_plane() {
    let mut harness = Harness::new();
    let pointer = harness.screen_of(GridCoord::new(3, 3));

    harness.select(ShipType::Destroyer, pointer);

    let ship = harness.fleet.ship(ShipType::Destroyer);
    assert_eq!(harness.controller.selected(), Some(ShipType::Destroyer));
    assert_eq!(ship.visual(), VisualMode::Selected);
    assert!(ship.is_active());
    assert_eq!(ship.position(), harness.board.grid_to_world(GridCoord::new(3, 3)));
}

#[test]
fn at_most_one_ship_is_highlighted_across_selections() {
    let mut harness = Harness::new();
    let sequence = [
        ShipType::Carrier,
        ShipType::PatrolBoat,
        ShipType::PatrolBoat,
        ShipType::Submarine,
        ShipType::Carrier,
        ShipType::Battleship,
        ShipType::Destroyer,
    ];

    for kind in sequence {
        harness.select(kind, Vec2::new(400.0, 300.0));
        assert_eq!(harness.highlighted(), vec![kind]);
    }
}

#[test]
fn reselection_hides_undeployed_previous_ship() {
    let mut harness = Harness::new();

    harness.select(ShipType::Carrier, Vec2::new(400.0, 300.0));
    harness.select(ShipType::Submarine, Vec2::new(400.0, 300.0));

    let carrier = harness.fleet.ship(ShipType::Carrier);
    assert_eq!(carrier.visual(), VisualMode::Normal);
    assert!(!carrier.is_active());
    assert!(!carrier.is_deployed());
}

#[test]
fn reselection_keeps_deployed_previous_ship_visible() {
    let mut harness = Harness::new();
    harness.deploy_at(ShipType::PatrolBoat, GridCoord::new(0, 0));

    harness.select(ShipType::PatrolBoat, Vec2::new(400.0, 300.0));
    harness.select(ShipType::Carrier, Vec2::new(400.0, 300.0));

    let patrol = harness.fleet.ship(ShipType::PatrolBoat);
    assert!(patrol.is_deployed());
    assert!(patrol.is_active());
    assert_eq!(patrol.visual(), VisualMode::Normal);
}

#[test]
fn successful_commit_deploys_and_clears_selection() {
    let mut harness = Harness::new();

    harness.deploy_at(ShipType::Battleship, GridCoord::new(2, 4));

    let ship = harness.fleet.ship(ShipType::Battleship);
    assert_eq!(harness.controller.selected(), None);
    assert_eq!(ship.deployed_at(), Some(GridCoord::new(2, 4)));
    assert!(ship.is_active());
    assert_eq!(ship.visual(), VisualMode::Normal);
    for row in 4..8 {
        assert_eq!(
            harness.board.occupant(GridCoord::new(2, row)),
            Some(ShipType::Battleship)
        );
    }
}

#[test]
fn rejected_commit_keeps_selection_and_board_untouched() {
    let mut harness = Harness::new();
    let pointer = harness.screen_of(GridCoord::new(0, 8));

    harness.select(ShipType::Carrier, pointer);
    harness.click(pointer);

    assert_eq!(harness.controller.selected(), Some(ShipType::Carrier));
    assert!(!harness.fleet.ship(ShipType::Carrier).is_deployed());
    assert_eq!(harness.board.inner.occupied_cells().count(), 0);

    harness.click(OFF_BOARD);
    assert_eq!(harness.controller.selected(), Some(ShipType::Carrier));
    assert!(harness.board.undone.is_empty());
}

#[test]
fn click_without_selection_undoes_only_the_ship_under_pointer() {
    let mut harness = Harness::new();
    harness.deploy_at(ShipType::Submarine, GridCoord::new(1, 1));
    harness.deploy_at(ShipType::Destroyer, GridCoord::new(5, 1));

    let on_submarine = harness.screen_of(GridCoord::new(1, 2));
    harness.click(on_submarine);

    assert_eq!(harness.board.undone, vec![ShipType::Submarine]);
    let submarine = harness.fleet.ship(ShipType::Submarine);
    assert!(!submarine.is_deployed());
    assert!(!submarine.is_active());
    assert!(harness.fleet.ship(ShipType::Destroyer).is_deployed());
    assert_eq!(harness.board.occupant(GridCoord::new(1, 2)), None);
}

#[test]
fn click_on_empty_water_or_off_board_undoes_nothing() {
    let mut harness = Harness::new();
    harness.deploy_at(ShipType::PatrolBoat, GridCoord::new(0, 0));

    let empty = harness.screen_of(GridCoord::new(9, 9));
    harness.click(empty);
    harness.click(OFF_BOARD);

    assert!(harness.board.undone.is_empty());
    assert!(harness.fleet.ship(ShipType::PatrolBoat).is_deployed());
}

#[test]
fn move_inside_board_snaps_to_cell_and_reports_validity() {
    let mut harness = Harness::new();
    harness.deploy_at(ShipType::Destroyer, GridCoord::new(4, 4));
    harness.select(ShipType::PatrolBoat, Vec2::new(400.0, 300.0));

    let free_cell = GridCoord::new(8, 1);
    let slightly_off_centre = harness.screen_of(free_cell) + Vec2::new(9.0, -7.0);
    harness.pointer_moved(slightly_off_centre);

    assert_eq!(
        harness.fleet.ship(ShipType::PatrolBoat).position(),
        harness.board.grid_to_world(free_cell)
    );
    assert_eq!(harness.controller.tint(), DeployTint::Success);

    harness.pointer_moved(harness.screen_of(GridCoord::new(4, 3)));
    assert_eq!(harness.controller.tint(), DeployTint::Failure);

    harness.pointer_moved(harness.screen_of(GridCoord::new(0, 9)));
    assert_eq!(harness.controller.tint(), DeployTint::Failure);
}

#[test]
fn move_outside_board_follows_pointer_and_forces_failure() {
    let mut harness = Harness::new();
    harness.select(ShipType::PatrolBoat, Vec2::new(400.0, 300.0));
    harness.pointer_moved(harness.screen_of(GridCoord::new(2, 2)));
    assert_eq!(harness.controller.tint(), DeployTint::Success);

    harness.pointer_moved(OFF_BOARD);

    let mut expected = harness.camera.screen_to_world(OFF_BOARD);
    expected.y = harness.board.plane_height();
    assert_eq!(harness.fleet.ship(ShipType::PatrolBoat).position(), expected);
    assert_eq!(harness.controller.tint(), DeployTint::Failure);
}

#[test]
fn move_ignores_deployed_selection() {
    let mut harness = Harness::new();
    harness.deploy_at(ShipType::Submarine, GridCoord::new(6, 6));
    harness.select(ShipType::Submarine, Vec2::new(400.0, 300.0));
    let before = harness.fleet.ship(ShipType::Submarine).position();

    harness.pointer_moved(OFF_BOARD);

    assert_eq!(harness.fleet.ship(ShipType::Submarine).position(), before);
    assert_eq!(harness.controller.tint(), DeployTint::Success);
}

#[test]
fn four_wheel_steps_restore_orientation() {
    let mut harness = Harness::new();
    harness.select(ShipType::Carrier, harness.screen_of(GridCoord::new(5, 5)));
    let start = harness.fleet.ship(ShipType::Carrier).direction();

    for _ in 0..4 {
        harness.wheel(120.0);
    }
    assert_eq!(harness.fleet.ship(ShipType::Carrier).direction(), start);

    for _ in 0..4 {
        harness.wheel(-120.0);
    }
    assert_eq!(harness.fleet.ship(ShipType::Carrier).direction(), start);
}

#[test]
fn wheel_direction_follows_delta_sign() {
    let mut harness = Harness::new();
    harness.select(ShipType::Destroyer, harness.screen_of(GridCoord::new(5, 5)));

    harness.wheel(1.0);
    assert_eq!(
        harness.fleet.ship(ShipType::Destroyer).direction(),
        ShipDirection::East
    );

    harness.wheel(-1.0);
    harness.wheel(-1.0);
    assert_eq!(
        harness.fleet.ship(ShipType::Destroyer).direction(),
        ShipDirection::West
    );

    harness.wheel(0.0);
    assert_eq!(
        harness.fleet.ship(ShipType::Destroyer).direction(),
        ShipDirection::North
    );
}

#[test]
fn zero_wheel_delta_turns_clockwise() {
    let mut harness = Harness::new();
    harness.select(ShipType::Destroyer, harness.screen_of(GridCoord::new(5, 5)));

    harness.wheel(0.0);

    assert_eq!(
        harness.fleet.ship(ShipType::Destroyer).direction(),
        ShipDirection::East,
        "a zero step rotates like a forward step"
    );
}

#[test]
fn rotation_recomputes_validity_at_current_position() {
    let mut harness = Harness::new();
    harness.select(ShipType::Carrier, Vec2::new(400.0, 300.0));
    harness.pointer_moved(harness.screen_of(GridCoord::new(1, 0)));
    assert_eq!(harness.controller.tint(), DeployTint::Success);

    // Facing east the hull trails off the left edge.
    harness.wheel(1.0);
    assert_eq!(harness.controller.tint(), DeployTint::Failure);

    // Facing west it fits along the top row.
    harness.wheel(1.0);
    harness.wheel(1.0);
    assert_eq!(harness.controller.tint(), DeployTint::Success);
}

#[test]
fn wheel_without_selection_is_ignored() {
    let mut harness = Harness::new();

    harness.wheel(1.0);

    assert!(harness
        .fleet
        .iter()
        .all(|ship| ship.direction() == ShipDirection::North));
}

#[test]
fn clear_selection_restores_appearance() {
    let mut harness = Harness::new();
    harness.select(ShipType::Battleship, Vec2::new(400.0, 300.0));

    harness.controller.reset(&mut harness.fleet);

    assert_eq!(harness.controller.selected(), None);
    assert!(harness.highlighted().is_empty());
    assert!(!harness.fleet.ship(ShipType::Battleship).is_active());
}
