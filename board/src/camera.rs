//! Orthographic camera looking straight down onto the board plane.

use broadside_core::Camera;
use glam::{Vec2, Vec3};

/// Top-down orthographic projection. Screen y grows downwards, mapping onto -z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopDownCamera {
    focus: Vec3,
    viewport: Vec2,
    pixels_per_unit: f32,
}

impl TopDownCamera {
    /// Creates a camera centred on `focus` rendering into a `viewport` of pixels.
    #[must_use]
    pub const fn new(focus: Vec3, viewport: Vec2, pixels_per_unit: f32) -> Self {
        Self {
            focus,
            viewport,
            pixels_per_unit,
        }
    }

    /// World point shown at the centre of the viewport.
    #[must_use]
    pub const fn focus(&self) -> Vec3 {
        self.focus
    }

    /// Projects a world point onto the screen.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec3) -> Vec2 {
        let centre = self.viewport * 0.5;
        Vec2::new(
            centre.x + (world.x - self.focus.x) * self.pixels_per_unit,
            centre.y - (world.z - self.focus.z) * self.pixels_per_unit,
        )
    }
}

impl Camera for TopDownCamera {
    fn screen_to_world(&self, screen: Vec2) -> Vec3 {
        if self.pixels_per_unit <= f32::EPSILON {
            return self.focus;
        }

        let offset = (screen - self.viewport * 0.5) / self.pixels_per_unit;
        Vec3::new(
            self.focus.x + offset.x,
            self.focus.y,
            self.focus.z - offset.y,
        )
    }
}
