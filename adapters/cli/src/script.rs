//! TOML input scripts replayed against the local player.

use broadside_core::{GameState, ShipType};
use serde::Deserialize;

/// Script used when no `--script` argument is given.
pub(crate) const DEMO_SCRIPT: &str = include_str!("../scripts/demo.toml");

/// Board geometry, camera setup and the ordered input steps.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Script {
    /// Geometry shared by both boards.
    #[serde(default)]
    pub(crate) board: BoardConfig,
    /// Projection applied to screen-space steps.
    #[serde(default)]
    pub(crate) camera: CameraConfig,
    /// Input replayed in order.
    #[serde(default)]
    pub(crate) steps: Vec<Step>,
}

impl Script {
    /// Parses a script from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Board geometry.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct BoardConfig {
    /// Number of cell columns.
    pub(crate) columns: u32,
    /// Number of cell rows.
    pub(crate) rows: u32,
    /// Edge length of a cell in world units.
    pub(crate) cell_length: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: 10,
            rows: 10,
            cell_length: 1.0,
        }
    }
}

/// Camera setup; the camera is always centred on the board.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CameraConfig {
    /// Viewport width and height in pixels.
    pub(crate) viewport: [f32; 2],
    /// Screen pixels covered by one world unit.
    pub(crate) pixels_per_unit: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport: [800.0, 600.0],
            pixels_per_unit: 40.0,
        }
    }
}

/// One scripted host event.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(crate) enum Step {
    /// Game-state transition.
    State {
        /// State being entered.
        state: GameState,
    },
    /// Picks up a ship at the current pointer.
    Select {
        /// Ship to pick up.
        ship: ShipType,
    },
    /// Retracts a committed ship.
    Undo {
        /// Ship to retract.
        ship: ShipType,
    },
    /// Click at a screen position.
    Click {
        /// Horizontal pixel.
        x: f32,
        /// Vertical pixel, growing downwards.
        y: f32,
    },
    /// Pointer move to a screen position.
    Move {
        /// Horizontal pixel.
        x: f32,
        /// Vertical pixel, growing downwards.
        y: f32,
    },
    /// Scroll-wheel step.
    Wheel {
        /// Signed wheel delta.
        delta: f32,
    },
    /// Click at the centre of a board cell.
    ClickCell {
        /// Cell column.
        column: u32,
        /// Cell row.
        row: u32,
    },
    /// Pointer move to the centre of a board cell.
    MoveCell {
        /// Cell column.
        column: u32,
        /// Cell row.
        row: u32,
    },
}
