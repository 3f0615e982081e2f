#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Broadside engine.
//!
//! This crate defines the vocabulary that connects the host adapter, the
//! player-side systems, and the board. Systems translate pointer input into
//! mutations of the player's [`Fleet`] through the [`Board`] contract, or into
//! [`Command`] values that the host resolves against an opponent. Screen
//! positions are expressed as [`glam::Vec2`] and world positions as
//! [`glam::Vec3`], with the board lying on a horizontal plane.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Global phase of a match, driven by the external game director.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameState {
    /// Title screen; no board interaction.
    Title,
    /// Players arrange their fleets on their own boards.
    ShipDeployment,
    /// Players take turns attacking the opponent's board.
    Battle,
    /// The match finished.
    GameEnd,
}

/// Commands emitted by player systems for the host to resolve.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests an attack on the opponent's board at the provided world point.
    Attack {
        /// Player whose board receives the attack.
        opponent: PlayerId,
        /// World-space point selected by the attacker.
        target: Vec3,
    },
}

/// Unique identifier assigned to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of ships composing a fleet. Every fleet holds exactly one of each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShipType {
    /// Five-cell carrier.
    Carrier,
    /// Four-cell battleship.
    Battleship,
    /// Three-cell destroyer.
    Destroyer,
    /// Three-cell submarine.
    Submarine,
    /// Two-cell patrol boat.
    PatrolBoat,
}

impl ShipType {
    /// Every ship type in fleet order.
    pub const ALL: [ShipType; 5] = [
        ShipType::Carrier,
        ShipType::Battleship,
        ShipType::Destroyer,
        ShipType::Submarine,
        ShipType::PatrolBoat,
    ];

    /// Number of cells the ship occupies.
    #[must_use]
    pub const fn size(self) -> u32 {
        match self {
            Self::Carrier => 5,
            Self::Battleship => 4,
            Self::Destroyer | Self::Submarine => 3,
            Self::PatrolBoat => 2,
        }
    }

    /// Zero-based slot of the ship within a [`Fleet`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Carrier => 0,
            Self::Battleship => 1,
            Self::Destroyer => 2,
            Self::Submarine => 3,
            Self::PatrolBoat => 4,
        }
    }

    /// Single-letter tag used by text renderings of a board.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Carrier => 'C',
            Self::Battleship => 'B',
            Self::Destroyer => 'D',
            Self::Submarine => 'S',
            Self::PatrolBoat => 'P',
        }
    }
}

/// Heading of a ship's bow. The hull trails behind the anchor cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipDirection {
    /// Bow faces decreasing rows.
    #[default]
    North,
    /// Bow faces increasing columns.
    East,
    /// Bow faces increasing rows.
    South,
    /// Bow faces decreasing columns.
    West,
}

impl ShipDirection {
    /// Every direction in clockwise order starting at north.
    pub const ALL: [ShipDirection; 4] = [
        ShipDirection::North,
        ShipDirection::East,
        ShipDirection::South,
        ShipDirection::West,
    ];

    /// Returns the direction reached after a quarter turn.
    #[must_use]
    pub const fn rotated(self, rotation: Rotation) -> Self {
        match (self, rotation) {
            (Self::North, Rotation::Clockwise) | (Self::South, Rotation::CounterClockwise) => {
                Self::East
            }
            (Self::East, Rotation::Clockwise) | (Self::West, Rotation::CounterClockwise) => {
                Self::South
            }
            (Self::South, Rotation::Clockwise) | (Self::North, Rotation::CounterClockwise) => {
                Self::West
            }
            (Self::West, Rotation::Clockwise) | (Self::East, Rotation::CounterClockwise) => {
                Self::North
            }
        }
    }

    /// Column and row step from the anchor towards the stern.
    const fn trailing_step(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (-1, 0),
            Self::South => (0, -1),
            Self::West => (1, 0),
        }
    }
}

/// Quarter-turn rotation requested by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// Rotate by ninety degrees clockwise.
    Clockwise,
    /// Rotate by ninety degrees counter-clockwise.
    CounterClockwise,
}

/// Location of a single board cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    column: u32,
    row: u32,
}

impl GridCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Offsets the coordinate, returning `None` when either axis underflows.
    #[must_use]
    pub fn offset(self, columns: i32, rows: i32) -> Option<Self> {
        Some(Self {
            column: self.column.checked_add_signed(columns)?,
            row: self.row.checked_add_signed(rows)?,
        })
    }

    /// Reports whether the two cells touch, diagonals included.
    #[must_use]
    pub fn is_adjacent(self, other: GridCoord) -> bool {
        self != other && self.column.abs_diff(other.column) <= 1 && self.row.abs_diff(other.row) <= 1
    }
}

/// Material applied to a ship's visual representation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VisualMode {
    /// Regular material.
    #[default]
    Normal,
    /// Highlight material shown while the ship is being placed.
    Selected,
}

/// Shared deploy-mode tint showing whether the current placement would succeed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DeployTint {
    /// The ship can be placed where it currently sits.
    #[default]
    Success,
    /// The ship cannot be placed where it currently sits.
    Failure,
}

impl DeployTint {
    /// Maps a placement validity flag to the matching tint.
    #[must_use]
    pub const fn from_placeable(placeable: bool) -> Self {
        if placeable {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// A single ship owned by a player.
#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    kind: ShipType,
    direction: ShipDirection,
    position: Vec3,
    anchor: Option<GridCoord>,
    visual: VisualMode,
    active: bool,
}

impl Ship {
    /// Creates an undeployed, hidden ship facing north at the world origin.
    #[must_use]
    pub fn new(kind: ShipType) -> Self {
        Self {
            kind,
            direction: ShipDirection::North,
            position: Vec3::ZERO,
            anchor: None,
            visual: VisualMode::Normal,
            active: false,
        }
    }

    /// Kind of the ship.
    #[must_use]
    pub const fn kind(&self) -> ShipType {
        self.kind
    }

    /// Current bow heading.
    #[must_use]
    pub const fn direction(&self) -> ShipDirection {
        self.direction
    }

    /// Overrides the bow heading.
    pub fn set_direction(&mut self, direction: ShipDirection) {
        self.direction = direction;
    }

    /// Turns the ship by a quarter turn.
    pub fn rotate(&mut self, rotation: Rotation) {
        self.direction = self.direction.rotated(rotation);
    }

    /// World-space position of the ship's anchor.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Moves the ship's anchor to the provided world point.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Material currently applied to the ship.
    #[must_use]
    pub const fn visual(&self) -> VisualMode {
        self.visual
    }

    /// Applies a material to the ship.
    pub fn set_visual(&mut self, visual: VisualMode) {
        self.visual = visual;
    }

    /// Reports whether the ship's visual representation is shown.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Shows or hides the ship's visual representation.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Reports whether the ship has been committed to a board.
    #[must_use]
    pub const fn is_deployed(&self) -> bool {
        self.anchor.is_some()
    }

    /// Anchor cell of the committed placement, if any.
    #[must_use]
    pub const fn deployed_at(&self) -> Option<GridCoord> {
        self.anchor
    }

    /// Records a committed placement anchored at `anchor` and moves the ship there.
    pub fn mark_deployed(&mut self, anchor: GridCoord, position: Vec3) {
        self.anchor = Some(anchor);
        self.position = position;
    }

    /// Clears the committed placement.
    pub fn mark_undeployed(&mut self) {
        self.anchor = None;
    }

    /// Cells covered by the ship when anchored at `anchor` with its current heading.
    ///
    /// Entries are `None` where the hull would leave the non-negative quadrant.
    pub fn footprint(&self, anchor: GridCoord) -> impl Iterator<Item = Option<GridCoord>> {
        let (column_step, row_step) = self.direction.trailing_step();
        (0..self.kind.size() as i32).map(move |step| anchor.offset(column_step * step, row_step * step))
    }
}

/// Fixed collection holding one ship of every [`ShipType`].
#[derive(Clone, Debug, PartialEq)]
pub struct Fleet {
    ships: Vec<Ship>,
}

impl Default for Fleet {
    fn default() -> Self {
        Self::new()
    }
}

impl Fleet {
    /// Creates a fleet with every ship undeployed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ships: ShipType::ALL.iter().copied().map(Ship::new).collect(),
        }
    }

    /// Ship of the provided kind.
    #[must_use]
    pub fn ship(&self, kind: ShipType) -> &Ship {
        &self.ships[kind.index()]
    }

    /// Mutable access to the ship of the provided kind.
    pub fn ship_mut(&mut self, kind: ShipType) -> &mut Ship {
        &mut self.ships[kind.index()]
    }

    /// Iterator over the ships in fleet order.
    pub fn iter(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter()
    }

    /// Mutable iterator over the ships in fleet order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Ship> {
        self.ships.iter_mut()
    }

    /// Reports whether every ship of the fleet is deployed.
    #[must_use]
    pub fn is_all_deployed(&self) -> bool {
        self.ships.iter().all(Ship::is_deployed)
    }
}

/// Reasons a ship placement request may be rejected by a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// Part of the hull would lie outside the board.
    #[error("ship would extend beyond the board")]
    OutOfBounds,
    /// Part of the hull overlaps another ship.
    #[error("cell already occupied by {0:?}")]
    Occupied(ShipType),
}

/// Outcome of a resolved attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttackOutcome {
    /// The shot landed in open water.
    Miss,
    /// The shot hit a ship that still floats.
    Hit(ShipType),
    /// The shot hit the last intact cell of a ship.
    Sunk(ShipType),
}

/// Reasons an attack may be rejected by the receiving board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum AttackError {
    /// The target lies outside the board.
    #[error("attack target lies outside the board")]
    OutOfBounds,
    /// The target cell was attacked before.
    #[error("cell {0:?} was already attacked")]
    AlreadyAttacked(GridCoord),
}

/// Projection from screen space onto the world.
pub trait Camera {
    /// Projects a screen position onto the world.
    fn screen_to_world(&self, screen: Vec2) -> Vec3;
}

/// Grid board that ships are deployed onto.
///
/// Only the horizontal components of world points are meaningful to a board;
/// the vertical component is ignored by every query.
pub trait Board {
    /// Number of columns and rows of the grid.
    fn dimensions(&self) -> (u32, u32);

    /// Height of the plane the board lies on.
    fn plane_height(&self) -> f32;

    /// Cell containing the world point, or `None` when the point is off the board.
    fn world_to_grid(&self, world: Vec3) -> Option<GridCoord>;

    /// Centre of the cell on the board plane.
    fn grid_to_world(&self, cell: GridCoord) -> Vec3;

    /// Ship occupying the provided cell, if any.
    fn occupant(&self, cell: GridCoord) -> Option<ShipType>;

    /// Checks whether `ship` could be committed with its anchor on `cell`.
    fn check_deployment(&self, ship: &Ship, cell: GridCoord) -> Result<(), PlacementError>;

    /// Commits `ship` with its anchor on `cell`.
    fn deploy(&mut self, ship: &mut Ship, cell: GridCoord) -> Result<(), PlacementError>;

    /// Retracts the committed placement of `ship`, vacating its cells.
    fn undo_deployment(&mut self, ship: &mut Ship);

    /// Reports whether the world point lies on the board.
    fn contains(&self, world: Vec3) -> bool {
        self.world_to_grid(world).is_some()
    }

    /// Ship occupying the cell under the world point, if any.
    fn ship_type_at(&self, world: Vec3) -> Option<ShipType> {
        self.world_to_grid(world).and_then(|cell| self.occupant(cell))
    }

    /// Reports whether `ship` could be committed with its anchor on `cell`.
    fn can_deploy(&self, ship: &Ship, cell: GridCoord) -> bool {
        self.check_deployment(ship, cell).is_ok()
    }

    /// Reports whether `ship` could be committed with its anchor under `world`.
    fn can_deploy_at(&self, ship: &Ship, world: Vec3) -> bool {
        self.world_to_grid(world)
            .map_or(false, |cell| self.can_deploy(ship, cell))
    }

    /// Commits `ship` with its anchor on the cell under `world`.
    fn deploy_at(&mut self, ship: &mut Ship, world: Vec3) -> Result<GridCoord, PlacementError> {
        let cell = self
            .world_to_grid(world)
            .ok_or(PlacementError::OutOfBounds)?;
        self.deploy(ship, cell)?;
        Ok(cell)
    }
}
