//! Physics engine interface
//!
//! The stage never integrates, collides or solves anything itself. It talks to
//! the engine only through [`PhysicsWorld`], which exposes the handful of calls
//! scene setup, drag and sync need.

pub mod rapier;

pub use rapier::RapierWorld;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::StageError;

/// Stable handle to a body owned by the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Collision shape of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyShape {
    /// Axis-aligned box before rotation, full width and height
    Rectangle { width: f32, height: f32 },
    Circle { radius: f32 },
}

/// Everything needed to create a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub shape: BodyShape,
    pub position: Vec2,
    /// Orientation in radians
    pub angle: f32,
    pub restitution: f32,
    pub friction: f32,
    /// Static bodies never move unless repositioned explicitly
    pub is_static: bool,
}

impl BodyDesc {
    /// Immovable rectangle, used for scene boundaries
    pub fn fixed_rect(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            shape: BodyShape::Rectangle { width, height },
            position,
            angle: 0.0,
            restitution: 0.0,
            friction: crate::consts::DEFAULT_FRICTION,
            is_static: true,
        }
    }
}

/// Position and orientation of a body
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Vec2,
    pub angle: f32,
}

impl Pose {
    /// Map a point from body-local to world coordinates
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.position + Vec2::from_angle(self.angle).rotate(local)
    }

    /// Map a point from world to body-local coordinates
    pub fn to_local(&self, world: Vec2) -> Vec2 {
        Vec2::from_angle(-self.angle).rotate(world - self.position)
    }
}

/// The calls the stage needs from a rigid-body engine
pub trait PhysicsWorld {
    /// Create a body and insert it into the simulated world
    fn create_body(&mut self, desc: &BodyDesc) -> BodyId;

    /// Whether the body takes part in the simulation
    fn contains(&self, body: BodyId) -> bool;

    fn pose(&self, body: BodyId) -> Option<Pose>;

    /// Move a body in place without recreating it
    fn set_position(&mut self, body: BodyId, position: Vec2) -> Result<(), StageError>;

    fn set_linear_velocity(&mut self, body: BodyId, velocity: Vec2) -> Result<(), StageError>;

    fn restitution(&self, body: BodyId) -> Option<f32>;

    fn friction(&self, body: BodyId) -> Option<f32>;

    /// Topmost dynamic body containing `point`, if any
    fn body_at(&self, point: Vec2) -> Option<BodyId>;

    fn gravity(&self) -> Vec2;

    fn set_gravity(&mut self, gravity: Vec2);

    /// Advance the simulation by one integration step
    fn step(&mut self, dt: f32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_pose_round_trip_through_local_space() {
        let pose = Pose {
            position: Vec2::new(100.0, 50.0),
            angle: FRAC_PI_2,
        };
        // +x in body space points down-screen after a quarter turn
        let world = pose.to_world(Vec2::new(10.0, 0.0));
        assert!((world - Vec2::new(100.0, 60.0)).length() < 1e-4);

        let local = pose.to_local(world);
        assert!((local - Vec2::new(10.0, 0.0)).length() < 1e-4);
    }
}
