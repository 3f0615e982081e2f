//! Automatic fleet deployment.
//!
//! Candidates are drawn from a caller-provided RNG so that a seeded
//! `ChaCha8Rng` reproduces the same layout on every run.

use broadside_core::{Board, Fleet, GridCoord, Ship, ShipDirection, ShipType};
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;
use tracing::{debug, info};

/// Controls how [`auto_deploy`] treats ships that are already on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AutoDeployMode {
    /// Retract every ship first, place the whole fleet and show it.
    Forced,
    /// Keep committed ships and place only the missing ones, leaving them hidden.
    Fill,
}

/// Reasons automatic deployment may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum AutoDeployError {
    /// No valid placement remains for the ship.
    #[error("no room left on the board for {0:?}")]
    NoRoom(ShipType),
}

/// Places every undeployed ship of `fleet` on `board`.
///
/// Placements whose hull does not touch another ship are preferred; when none
/// remain any valid placement is accepted.
pub fn auto_deploy<B, R>(
    board: &mut B,
    fleet: &mut Fleet,
    rng: &mut R,
    mode: AutoDeployMode,
) -> Result<(), AutoDeployError>
where
    B: Board + ?Sized,
    R: Rng + ?Sized,
{
    if mode == AutoDeployMode::Forced {
        for ship in fleet.iter_mut().filter(|ship| ship.is_deployed()) {
            board.undo_deployment(ship);
        }
    }

    let (columns, rows) = board.dimensions();
    for ship in fleet.iter_mut() {
        if ship.is_deployed() {
            continue;
        }

        let mut candidates: Vec<(GridCoord, ShipDirection)> = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| GridCoord::new(column, row)))
            .flat_map(|cell| ShipDirection::ALL.into_iter().map(move |direction| (cell, direction)))
            .collect();
        candidates.shuffle(rng);

        let chosen = pick_candidate(&*board, ship, &candidates, true)
            .or_else(|| pick_candidate(&*board, ship, &candidates, false))
            .ok_or(AutoDeployError::NoRoom(ship.kind()))?;

        ship.set_direction(chosen.1);
        board
            .deploy(ship, chosen.0)
            .map_err(|_| AutoDeployError::NoRoom(ship.kind()))?;
        ship.set_active(mode == AutoDeployMode::Forced);
        debug!(
            ship = ?ship.kind(),
            column = chosen.0.column(),
            row = chosen.0.row(),
            direction = ?chosen.1,
            "ship auto-deployed"
        );
    }

    info!(?mode, "automatic deployment complete");
    Ok(())
}

fn pick_candidate<B>(
    board: &B,
    ship: &mut Ship,
    candidates: &[(GridCoord, ShipDirection)],
    keep_clear: bool,
) -> Option<(GridCoord, ShipDirection)>
where
    B: Board + ?Sized,
{
    let original = ship.direction();
    let found = candidates.iter().copied().find(|&(cell, direction)| {
        ship.set_direction(direction);
        board.can_deploy(ship, cell) && (!keep_clear || !touches_other_ship(board, ship, cell))
    });
    ship.set_direction(original);
    found
}

fn touches_other_ship<B>(board: &B, ship: &Ship, anchor: GridCoord) -> bool
where
    B: Board + ?Sized,
{
    let (columns, rows) = board.dimensions();
    ship.footprint(anchor).flatten().any(|cell| {
        (-1..=1).any(|row_step| {
            (-1..=1).any(|column_step| {
                cell.offset(column_step, row_step)
                    .filter(|neighbour| neighbour.column() < columns && neighbour.row() < rows)
                    .and_then(|neighbour| board.occupant(neighbour))
                    .map_or(false, |other| other != ship.kind())
            })
        })
    })
}
