//! Pointer drag constraint
//!
//! The pointer position is tracked on every move. Pressing over a dynamic body
//! grabs it at that point; every step afterwards the grab point is pulled
//! toward the pointer like a stiff spring until the pointer is released.

use glam::Vec2;

use crate::physics::{BodyId, PhysicsWorld};
use crate::StageError;

/// A body held at a point fixed in its own frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grab {
    pub body: BodyId,
    pub local_anchor: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragConstraint {
    /// Fraction of the anchor-to-pointer gap closed per step; above 1 overshoots slightly
    stiffness: f32,
    pointer: Vec2,
    grab: Option<Grab>,
}

impl DragConstraint {
    pub fn new(stiffness: f32) -> Self {
        Self {
            stiffness,
            pointer: Vec2::ZERO,
            grab: None,
        }
    }

    pub fn stiffness(&self) -> f32 {
        self.stiffness
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn grab(&self) -> Option<Grab> {
        self.grab
    }

    /// Track the pointer in page coordinates
    pub fn pointer_moved(&mut self, position: Vec2) {
        self.pointer = position;
    }

    /// Grab whatever dynamic body lies under the pointer
    pub fn pointer_pressed<W: PhysicsWorld + ?Sized>(
        &mut self,
        world: &W,
        position: Vec2,
    ) -> Option<BodyId> {
        self.pointer = position;
        let body = world.body_at(position)?;
        let pose = world.pose(body)?;
        self.grab = Some(Grab {
            body,
            local_anchor: pose.to_local(position),
        });
        log::debug!("Grabbed {:?}", body);
        Some(body)
    }

    pub fn pointer_released(&mut self) {
        if let Some(grab) = self.grab.take() {
            log::debug!("Released {:?}", grab.body);
        }
    }

    /// Pull the grabbed body toward the pointer for one step of length `dt`
    pub fn apply<W: PhysicsWorld + ?Sized>(&self, world: &mut W, dt: f32) -> Result<(), StageError> {
        let Some(grab) = self.grab else {
            return Ok(());
        };
        let pose = world
            .pose(grab.body)
            .ok_or(StageError::UnknownBody(grab.body))?;
        let anchor = pose.to_world(grab.local_anchor);
        let velocity = (self.pointer - anchor) * self.stiffness / dt;
        world.set_linear_velocity(grab.body, velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::physics::{BodyDesc, BodyShape, RapierWorld};

    fn world_with_block() -> (RapierWorld, BodyId) {
        // No gravity so only the drag moves the block
        let mut world = RapierWorld::new(0.0);
        let body = world.create_body(&BodyDesc {
            shape: BodyShape::Rectangle {
                width: 60.0,
                height: 60.0,
            },
            position: Vec2::new(200.0, 200.0),
            angle: 0.0,
            restitution: RESTITUTION,
            friction: RECT_FRICTION,
            is_static: false,
        });
        (world, body)
    }

    #[test]
    fn test_move_only_tracks_pointer() {
        let (world, body) = world_with_block();
        let mut drag = DragConstraint::new(DRAG_STIFFNESS);
        drag.pointer_moved(Vec2::new(210.0, 190.0));
        assert_eq!(drag.pointer(), Vec2::new(210.0, 190.0));
        assert!(drag.grab().is_none());
        assert_eq!(world.pose(body).unwrap().position, Vec2::new(200.0, 200.0));
    }

    #[test]
    fn test_press_over_body_grabs_it() {
        let (world, body) = world_with_block();
        let mut drag = DragConstraint::new(DRAG_STIFFNESS);
        assert_eq!(drag.pointer_pressed(&world, Vec2::new(210.0, 190.0)), Some(body));
        let grab = drag.grab().unwrap();
        assert_eq!(grab.body, body);
        assert!((grab.local_anchor - Vec2::new(10.0, -10.0)).length() < 1e-4);
    }

    #[test]
    fn test_press_on_empty_space_grabs_nothing() {
        let (world, _) = world_with_block();
        let mut drag = DragConstraint::new(DRAG_STIFFNESS);
        assert_eq!(drag.pointer_pressed(&world, Vec2::new(900.0, 900.0)), None);
        assert!(drag.grab().is_none());
    }

    #[test]
    fn test_grabbed_body_follows_pointer() {
        let (mut world, body) = world_with_block();
        let mut drag = DragConstraint::new(DRAG_STIFFNESS);
        drag.pointer_pressed(&world, Vec2::new(200.0, 200.0));
        drag.pointer_moved(Vec2::new(400.0, 300.0));

        for _ in 0..60 {
            drag.apply(&mut world, SIM_DT).unwrap();
            world.step(SIM_DT);
        }

        let position = world.pose(body).unwrap().position;
        assert!((position - Vec2::new(400.0, 300.0)).length() < 5.0);
    }

    #[test]
    fn test_release_stops_pulling() {
        let (mut world, body) = world_with_block();
        let mut drag = DragConstraint::new(DRAG_STIFFNESS);
        drag.pointer_pressed(&world, Vec2::new(200.0, 200.0));
        drag.pointer_released();
        drag.pointer_moved(Vec2::new(400.0, 300.0));

        drag.apply(&mut world, SIM_DT).unwrap();
        world.step(SIM_DT);

        assert_eq!(world.pose(body).unwrap().position, Vec2::new(200.0, 200.0));
    }
}
