use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use broadside_core::{Board, Fleet, GridCoord, PlacementError, ShipDirection, ShipType};
use serde::{Deserialize, Serialize};

const LAYOUT_DOMAIN: &str = "fleet";
const LAYOUT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const LAYOUT_HEADER: &str = "fleet:v1";
const FIELD_DELIMITER: char = ':';

/// Placement of every committed ship on a board of known size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct FleetLayout {
    /// Number of board columns the layout was captured on.
    pub(crate) columns: u32,
    /// Number of board rows the layout was captured on.
    pub(crate) rows: u32,
    /// Committed ships.
    pub(crate) ships: Vec<FleetLayoutShip>,
}

/// Single committed ship captured within a layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct FleetLayoutShip {
    /// Ship the entry describes.
    pub(crate) kind: ShipType,
    /// Heading of the bow.
    pub(crate) direction: ShipDirection,
    /// Cell holding the bow.
    pub(crate) anchor: GridCoord,
}

#[derive(Serialize, Deserialize)]
struct Payload {
    ships: Vec<FleetLayoutShip>,
}

impl FleetLayout {
    /// Captures the committed ships of `fleet`.
    pub(crate) fn capture<B: Board + ?Sized>(fleet: &Fleet, board: &B) -> Self {
        let (columns, rows) = board.dimensions();
        let ships = fleet
            .iter()
            .filter_map(|ship| {
                ship.deployed_at().map(|anchor| FleetLayoutShip {
                    kind: ship.kind(),
                    direction: ship.direction(),
                    anchor,
                })
            })
            .collect();
        Self {
            columns,
            rows,
            ships,
        }
    }

    /// Encodes the layout into a single-line transfer string.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = Payload {
            ships: self.ships.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!("{LAYOUT_HEADER}:{}x{}:{encoded}", self.columns, self.rows))
    }

    /// Decodes a layout from its transfer string.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != LAYOUT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != LAYOUT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: Payload =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            columns,
            rows,
            ships: decoded.ships,
        })
    }

    /// Commits every ship of the layout to `board`.
    ///
    /// The layout must describe each ship exactly once and match the board
    /// size. Ships placed before a failing entry stay deployed.
    pub(crate) fn apply(
        &self,
        fleet: &mut Fleet,
        board: &mut dyn Board,
    ) -> Result<(), LayoutTransferError> {
        let found = board.dimensions();
        if found != (self.columns, self.rows) {
            return Err(LayoutTransferError::DimensionMismatch {
                layout: (self.columns, self.rows),
                board: found,
            });
        }

        let mut seen = [false; ShipType::ALL.len()];
        for entry in &self.ships {
            let slot = &mut seen[entry.kind.index()];
            if *slot {
                return Err(LayoutTransferError::DuplicateShip(entry.kind));
            }
            *slot = true;
        }
        if let Some(missing) = ShipType::ALL.into_iter().find(|kind| !seen[kind.index()]) {
            return Err(LayoutTransferError::MissingShip(missing));
        }

        for entry in &self.ships {
            let ship = fleet.ship_mut(entry.kind);
            ship.set_direction(entry.direction);
            board
                .deploy(ship, entry.anchor)
                .map_err(|reason| LayoutTransferError::Unplaceable(entry.kind, reason))?;
        }
        Ok(())
    }
}

/// Errors that can occur while transferring fleet layouts.
#[derive(Debug)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing.
    MissingPrefix,
    /// The version segment was missing.
    MissingVersion,
    /// The board dimensions were missing.
    MissingDimensions,
    /// The payload segment was missing.
    MissingPayload,
    /// The prefix segment named another layout kind.
    InvalidPrefix(String),
    /// The version identifier is not understood.
    UnsupportedVersion(String),
    /// The board dimensions could not be parsed.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload could not be converted to or from JSON.
    InvalidPayload(serde_json::Error),
    /// The layout was captured on a board of another size.
    DimensionMismatch {
        /// Columns and rows recorded in the layout.
        layout: (u32, u32),
        /// Columns and rows of the receiving board.
        board: (u32, u32),
    },
    /// A ship appears more than once.
    DuplicateShip(ShipType),
    /// A ship is absent from the layout.
    MissingShip(ShipType),
    /// The board rejected a ship placement.
    Unplaceable(ShipType, PlacementError),
}

impl fmt::Display for LayoutTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "layout string was empty"),
            Self::MissingPrefix => write!(f, "layout string is missing the prefix"),
            Self::MissingVersion => write!(f, "layout string is missing the version"),
            Self::MissingDimensions => write!(f, "layout string is missing the board dimensions"),
            Self::MissingPayload => write!(f, "layout string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "layout prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "layout version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse board dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => write!(f, "could not decode layout payload: {error}"),
            Self::InvalidPayload(error) => write!(f, "could not process layout payload: {error}"),
            Self::DimensionMismatch { layout, board } => write!(
                f,
                "layout targets a {}x{} board but the board is {}x{}",
                layout.0, layout.1, board.0, board.1
            ),
            Self::DuplicateShip(kind) => write!(f, "layout lists {kind:?} more than once"),
            Self::MissingShip(kind) => write!(f, "layout does not place {kind:?}"),
            Self::Unplaceable(kind, reason) => write!(f, "cannot place {kind:?}: {reason}"),
        }
    }
}

impl Error for LayoutTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            Self::Unplaceable(_, error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;
    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || rows == 0 {
        return Err(invalid());
    }
    Ok((columns, rows))
}
