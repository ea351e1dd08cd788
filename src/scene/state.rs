//! Scene state owned by the stage
//!
//! Pairs every dynamic body with its proxy element. View state never lives on
//! the engine's bodies; the pairing record is the only link between them.

use crate::Viewport;
use crate::physics::{BodyDesc, BodyId, PhysicsWorld};
use crate::view::ProxyId;

use super::tier::SizeTier;

/// A dynamic body and the element that shows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyPair {
    pub body: BodyId,
    pub proxy: ProxyId,
    /// Color class, cycling across the whole population
    pub color: u32,
    /// Size multiplier over the tier unit
    pub multiplier: u32,
    pub circle: bool,
}

/// Boundaries that are part of the world from the start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundaries {
    pub ground: BodyId,
    pub left_wall: BodyId,
    pub right_wall: BodyId,
}

/// The ceiling goes from held to installed exactly once
#[derive(Debug, Clone, PartialEq)]
pub enum Ceiling {
    /// Described but not yet in the world
    Held(BodyDesc),
    Installed(BodyId),
}

#[derive(Debug, Clone)]
pub struct SceneState {
    pub(crate) tier: SizeTier,
    pub(crate) viewport: Viewport,
    pub(crate) boundaries: Boundaries,
    pub(crate) ceiling: Ceiling,
    pub(crate) pairs: Vec<BodyPair>,
    /// Reused by the sync loop so steady-state steps do not allocate
    pub(crate) transform_buf: String,
}

impl SceneState {
    pub fn tier(&self) -> SizeTier {
        self.tier
    }

    /// Viewport of the latest build or re-layout
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn boundaries(&self) -> Boundaries {
        self.boundaries
    }

    pub fn pairs(&self) -> &[BodyPair] {
        &self.pairs
    }

    pub fn ceiling(&self) -> &Ceiling {
        &self.ceiling
    }

    pub fn ceiling_installed(&self) -> bool {
        matches!(self.ceiling, Ceiling::Installed(_))
    }

    /// Insert the held ceiling into the world
    ///
    /// Returns true only on the call that installs it; later calls change nothing.
    pub fn close_ceiling<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W) -> bool {
        let Ceiling::Held(desc) = &self.ceiling else {
            return false;
        };
        let body = world.create_body(desc);
        self.ceiling = Ceiling::Installed(body);
        log::info!("Ceiling closed");
        true
    }
}
