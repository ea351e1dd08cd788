//! Blockfall - a falling blocks playground
//!
//! Core modules:
//! - `scene`: Scene population, size tiers, physics-to-visual sync, drag
//! - `physics`: Narrow physics engine interface and its rapier2d binding
//! - `view`: Narrow visual tree interface (DOM on web, in-memory elsewhere)
//! - `stage`: Host-facing owner of world, tree and scene

pub mod error;
pub mod physics;
pub mod scene;
pub mod settings;
pub mod stage;
pub mod view;

pub use error::StageError;
pub use settings::Settings;
pub use stage::Stage;

use serde::{Deserialize, Serialize};

/// Stage configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Distance from the viewport edge to a boundary's center
    pub const BOUNDARY_OFFSET: f32 = 500.0;
    /// Long side of every boundary
    pub const BOUNDARY_LENGTH: f32 = 10_000.0;
    /// Short side of every boundary (twice the offset, so the inner face sits on the edge)
    pub const BOUNDARY_THICKNESS: f32 = 2.0 * BOUNDARY_OFFSET;

    /// Final restitution for every dynamic body
    pub const RESTITUTION: f32 = 0.8;
    /// Friction used when a shape has no specific value
    pub const DEFAULT_FRICTION: f32 = 0.1;
    /// Rectangle friction
    pub const RECT_FRICTION: f32 = 0.2;

    /// Share of the viewport width where spawn columns start
    pub const SPAWN_X_START: f32 = 0.1;
    /// Share of the viewport width covered by spawn columns
    pub const SPAWN_X_SPAN: f32 = 0.6;
    /// Vertical spacing between successive spawns, in units
    pub const SPAWN_Y_STEP: f32 = 0.8;

    /// Number of color classes proxies cycle through
    pub const COLOR_CLASSES: u32 = 3;

    /// Delay before the ceiling closes (ms)
    pub const CEILING_DELAY_MS: u32 = 3000;
    /// Drag spring stiffness
    pub const DRAG_STIFFNESS: f32 = 1.4;
    /// Downward gravity in px/s²
    pub const GRAVITY: f32 = 1000.0;
    /// Gravity flip period when flipping is enabled (ms)
    pub const GRAVITY_FLIP_INTERVAL_MS: u32 = 5000;
}

/// Host viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Area in px²
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Reject zero-sized viewports before anything is built from them
    pub fn validate(self) -> Result<Self, StageError> {
        if self.width == 0 || self.height == 0 {
            return Err(StageError::NonPositiveViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }

    pub fn width_f(&self) -> f32 {
        self.width as f32
    }

    pub fn height_f(&self) -> f32 {
        self.height as f32
    }
}
