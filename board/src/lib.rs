#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state for Broadside.
//!
//! [`GridBoard`] is the concrete [`Board`] used by the player systems: it maps
//! world points onto a rectangular cell grid, tracks which ship occupies each
//! cell, validates and commits placements, and resolves incoming attacks.

use std::fmt;

use broadside_core::{
    AttackError, AttackOutcome, Board, GridCoord, PlacementError, Ship, ShipType,
};
use glam::Vec3;
use tracing::debug;

pub mod auto;
pub mod camera;

pub use auto::{auto_deploy, AutoDeployError, AutoDeployMode};
pub use camera::TopDownCamera;

const DEFAULT_COLUMNS: u32 = 10;
const DEFAULT_ROWS: u32 = 10;
const DEFAULT_CELL_LENGTH: f32 = 1.0;

/// Rectangular board whose columns grow along +x and rows along -z.
///
/// `origin` is the top-left corner of cell `(0, 0)`; its height defines the
/// board plane.
#[derive(Clone, Debug)]
pub struct GridBoard {
    columns: u32,
    rows: u32,
    cell_length: f32,
    origin: Vec3,
    occupancy: Vec<Option<ShipType>>,
    shots: Vec<bool>,
}

impl Default for GridBoard {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_CELL_LENGTH, Vec3::ZERO)
    }
}

impl GridBoard {
    /// Creates an empty board with the provided layout.
    ///
    /// Non-positive cell lengths fall back to one world unit.
    #[must_use]
    pub fn new(columns: u32, rows: u32, cell_length: f32, origin: Vec3) -> Self {
        let cell_length = if cell_length > f32::EPSILON {
            cell_length
        } else {
            DEFAULT_CELL_LENGTH
        };
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            cell_length,
            origin,
            occupancy: vec![None; capacity],
            shots: vec![false; capacity],
        }
    }

    /// Side length of a single square cell expressed in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// World-space corner of cell `(0, 0)`.
    #[must_use]
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// World-space centre of the whole board on its plane.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.origin
            + Vec3::new(
                self.columns as f32 * self.cell_length * 0.5,
                0.0,
                -(self.rows as f32) * self.cell_length * 0.5,
            )
    }

    /// Reports whether the cell was attacked.
    #[must_use]
    pub fn is_attacked(&self, cell: GridCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.shots.get(index).copied())
            .unwrap_or(false)
    }

    /// Resolves an attack against the cell under the world point.
    pub fn attack_at(&mut self, world: Vec3) -> Result<AttackOutcome, AttackError> {
        let cell = self.world_to_grid(world).ok_or(AttackError::OutOfBounds)?;
        self.receive_attack(cell)
    }

    /// Resolves an attack against the provided cell.
    pub fn receive_attack(&mut self, cell: GridCoord) -> Result<AttackOutcome, AttackError> {
        let index = self.index(cell).ok_or(AttackError::OutOfBounds)?;
        if self.shots[index] {
            return Err(AttackError::AlreadyAttacked(cell));
        }
        self.shots[index] = true;

        let Some(kind) = self.occupancy[index] else {
            return Ok(AttackOutcome::Miss);
        };

        if self.is_sunk(kind) {
            Ok(AttackOutcome::Sunk(kind))
        } else {
            Ok(AttackOutcome::Hit(kind))
        }
    }

    /// Reports whether every cell occupied by `kind` was attacked.
    ///
    /// A ship that is not on the board is never sunk.
    #[must_use]
    pub fn is_sunk(&self, kind: ShipType) -> bool {
        let mut cells = self
            .occupancy
            .iter()
            .zip(&self.shots)
            .filter(|(occupant, _)| **occupant == Some(kind))
            .peekable();
        cells.peek().is_some() && cells.all(|(_, shot)| *shot)
    }

    /// Reports whether at least one ship is placed and every ship cell was attacked.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        let mut occupied = self
            .occupancy
            .iter()
            .zip(&self.shots)
            .filter(|(occupant, _)| occupant.is_some())
            .peekable();
        occupied.peek().is_some() && occupied.all(|(_, shot)| *shot)
    }

    /// Iterator over every occupied cell with its occupant in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (GridCoord, ShipType)> + '_ {
        let columns = self.columns.max(1);
        self.occupancy
            .iter()
            .enumerate()
            .filter_map(move |(index, occupant)| {
                let kind = (*occupant)?;
                let index = u32::try_from(index).ok()?;
                Some((GridCoord::new(index % columns, index / columns), kind))
            })
    }

    fn vacate(&mut self, kind: ShipType) {
        for slot in self.occupancy.iter_mut() {
            if *slot == Some(kind) {
                *slot = None;
            }
        }
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn footprint_cells(&self, ship: &Ship, anchor: GridCoord) -> Result<Vec<usize>, PlacementError> {
        let mut indices = Vec::with_capacity(ship.kind().size() as usize);
        for cell in ship.footprint(anchor) {
            let index = cell
                .and_then(|cell| self.index(cell))
                .ok_or(PlacementError::OutOfBounds)?;
            match self.occupancy[index] {
                Some(other) if other != ship.kind() => return Err(PlacementError::Occupied(other)),
                _ => indices.push(index),
            }
        }
        Ok(indices)
    }
}

impl Board for GridBoard {
    fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn plane_height(&self) -> f32 {
        self.origin.y
    }

    fn world_to_grid(&self, world: Vec3) -> Option<GridCoord> {
        let column = (world.x - self.origin.x) / self.cell_length;
        let row = (self.origin.z - world.z) / self.cell_length;
        if !column.is_finite() || !row.is_finite() || column < 0.0 || row < 0.0 {
            return None;
        }

        let (column, row) = (column.floor() as u32, row.floor() as u32);
        if column < self.columns && row < self.rows {
            Some(GridCoord::new(column, row))
        } else {
            None
        }
    }

    fn grid_to_world(&self, cell: GridCoord) -> Vec3 {
        self.origin
            + Vec3::new(
                (cell.column() as f32 + 0.5) * self.cell_length,
                0.0,
                -(cell.row() as f32 + 0.5) * self.cell_length,
            )
    }

    fn occupant(&self, cell: GridCoord) -> Option<ShipType> {
        self.index(cell)
            .and_then(|index| self.occupancy.get(index).copied().flatten())
    }

    fn check_deployment(&self, ship: &Ship, cell: GridCoord) -> Result<(), PlacementError> {
        self.footprint_cells(ship, cell).map(|_| ())
    }

    fn deploy(&mut self, ship: &mut Ship, cell: GridCoord) -> Result<(), PlacementError> {
        let indices = self.footprint_cells(ship, cell)?;
        let kind = ship.kind();
        self.vacate(kind);
        for index in indices {
            self.occupancy[index] = Some(kind);
        }
        ship.mark_deployed(cell, self.grid_to_world(cell));
        debug!(ship = ?kind, column = cell.column(), row = cell.row(), "ship committed to board");
        Ok(())
    }

    fn undo_deployment(&mut self, ship: &mut Ship) {
        self.vacate(ship.kind());
        ship.mark_undeployed();
        debug!(ship = ?ship.kind(), "ship retracted from board");
    }
}

impl fmt::Display for GridBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let mut line = String::with_capacity(self.columns as usize);
            for column in 0..self.columns {
                let cell = GridCoord::new(column, row);
                let glyph = match (self.occupant(cell), self.is_attacked(cell)) {
                    (Some(_), true) => 'x',
                    (None, true) => 'o',
                    (Some(kind), false) => kind.letter(),
                    (None, false) => '.',
                };
                line.push(glyph);
            }
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
