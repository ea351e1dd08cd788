//! rapier2d binding
//!
//! Works in pixel units with y growing downward, the same frame the visual
//! tree uses, so poses can be copied to proxies without conversion.

use glam::Vec2;
use rapier2d::prelude::*;

use super::{BodyDesc, BodyId, BodyShape, PhysicsWorld, Pose};
use crate::StageError;

#[derive(Debug, Clone, Copy)]
struct Handles {
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

/// A rapier2d pipeline plus the sets it steps
pub struct RapierWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    /// Indexed by `BodyId`
    handles: Vec<Handles>,
}

impl RapierWorld {
    /// Create an empty world with gravity pulling toward +y
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity: vector![0.0, gravity],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            handles: Vec::new(),
        }
    }

    /// Number of bodies in the world, static ones included
    pub fn body_count(&self) -> usize {
        self.handles.len()
    }

    fn handles(&self, body: BodyId) -> Option<Handles> {
        self.handles.get(body.0 as usize).copied()
    }

    fn rigid_body_mut(&mut self, body: BodyId) -> Result<&mut RigidBody, StageError> {
        let handles = self.handles(body).ok_or(StageError::UnknownBody(body))?;
        self.bodies
            .get_mut(handles.body)
            .ok_or(StageError::UnknownBody(body))
    }

    fn collider(&self, body: BodyId) -> Option<&Collider> {
        self.handles(body)
            .and_then(|handles| self.colliders.get(handles.collider))
    }
}

impl PhysicsWorld for RapierWorld {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyId {
        let builder = if desc.is_static {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic().ccd_enabled(true)
        };
        let rigid_body = builder
            .translation(vector![desc.position.x, desc.position.y])
            .rotation(desc.angle)
            .build();

        let collider = match desc.shape {
            BodyShape::Rectangle { width, height } => {
                ColliderBuilder::cuboid(width / 2.0, height / 2.0)
            }
            BodyShape::Circle { radius } => ColliderBuilder::ball(radius),
        }
        .restitution(desc.restitution)
        .friction(desc.friction)
        // Bounciest and least grippy surface wins in a contact
        .restitution_combine_rule(CoefficientCombineRule::Max)
        .friction_combine_rule(CoefficientCombineRule::Min)
        .build();

        let body = self.bodies.insert(rigid_body);
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        let id = BodyId(self.handles.len() as u32);
        self.handles.push(Handles { body, collider });
        id
    }

    fn contains(&self, body: BodyId) -> bool {
        self.handles(body)
            .is_some_and(|handles| self.bodies.contains(handles.body))
    }

    fn pose(&self, body: BodyId) -> Option<Pose> {
        let handles = self.handles(body)?;
        let rigid_body = self.bodies.get(handles.body)?;
        let translation = rigid_body.translation();
        Some(Pose {
            position: Vec2::new(translation.x, translation.y),
            angle: rigid_body.rotation().angle(),
        })
    }

    fn set_position(&mut self, body: BodyId, position: Vec2) -> Result<(), StageError> {
        self.rigid_body_mut(body)?
            .set_translation(vector![position.x, position.y], true);
        Ok(())
    }

    fn set_linear_velocity(&mut self, body: BodyId, velocity: Vec2) -> Result<(), StageError> {
        self.rigid_body_mut(body)?
            .set_linvel(vector![velocity.x, velocity.y], true);
        Ok(())
    }

    fn restitution(&self, body: BodyId) -> Option<f32> {
        self.collider(body).map(|collider| collider.restitution())
    }

    fn friction(&self, body: BodyId) -> Option<f32> {
        self.collider(body).map(|collider| collider.friction())
    }

    fn body_at(&self, point: Vec2) -> Option<BodyId> {
        let point = point![point.x, point.y];
        // Later bodies are drawn on top, so search newest first
        self.handles
            .iter()
            .enumerate()
            .rev()
            .find(|(_, handles)| {
                let dynamic = self
                    .bodies
                    .get(handles.body)
                    .is_some_and(|rigid_body| rigid_body.is_dynamic());
                dynamic
                    && self.colliders.get(handles.collider).is_some_and(|collider| {
                        collider
                            .shape()
                            .contains_point(collider.position(), &point)
                    })
            })
            .map(|(index, _)| BodyId(index as u32))
    }

    fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity.x, self.gravity.y)
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = vector![gravity.x, gravity.y];
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn dynamic_box(x: f32, y: f32) -> BodyDesc {
        BodyDesc {
            shape: BodyShape::Rectangle {
                width: 40.0,
                height: 40.0,
            },
            position: Vec2::new(x, y),
            angle: 0.0,
            restitution: 0.8,
            friction: 0.2,
            is_static: false,
        }
    }

    #[test]
    fn test_dynamic_body_falls_toward_positive_y() {
        let mut world = RapierWorld::new(1000.0);
        let body = world.create_body(&dynamic_box(100.0, 100.0));
        for _ in 0..30 {
            world.step(SIM_DT);
        }
        let pose = world.pose(body).unwrap();
        assert!(pose.position.y > 100.0);
        assert!((pose.position.x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_static_body_stays_put() {
        let mut world = RapierWorld::new(1000.0);
        let floor = world.create_body(&BodyDesc::fixed_rect(Vec2::new(0.0, 500.0), 1000.0, 100.0));
        for _ in 0..30 {
            world.step(SIM_DT);
        }
        assert_eq!(world.pose(floor).unwrap().position, Vec2::new(0.0, 500.0));
    }

    #[test]
    fn test_set_position_moves_in_place() {
        let mut world = RapierWorld::new(1000.0);
        let floor = world.create_body(&BodyDesc::fixed_rect(Vec2::ZERO, 100.0, 10.0));
        world.set_position(floor, Vec2::new(30.0, 40.0)).unwrap();
        assert_eq!(world.pose(floor).unwrap().position, Vec2::new(30.0, 40.0));
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn test_unknown_body_is_rejected() {
        let mut world = RapierWorld::new(1000.0);
        assert!(!world.contains(BodyId(7)));
        assert_eq!(
            world.set_position(BodyId(7), Vec2::ZERO),
            Err(StageError::UnknownBody(BodyId(7)))
        );
        assert!(world.pose(BodyId(7)).is_none());
    }

    #[test]
    fn test_body_at_finds_dynamic_bodies_only() {
        let mut world = RapierWorld::new(1000.0);
        let floor = world.create_body(&BodyDesc::fixed_rect(Vec2::new(0.0, 0.0), 1000.0, 1000.0));
        let block = world.create_body(&dynamic_box(100.0, 100.0));

        assert_eq!(world.body_at(Vec2::new(105.0, 95.0)), Some(block));
        // Inside the floor but not the block
        assert_eq!(world.body_at(Vec2::new(-200.0, -200.0)), None);
        assert!(world.contains(floor));
    }

    #[test]
    fn test_collider_materials_are_kept() {
        let mut world = RapierWorld::new(1000.0);
        let block = world.create_body(&dynamic_box(0.0, 0.0));
        assert_eq!(world.restitution(block), Some(0.8));
        assert_eq!(world.friction(block), Some(0.2));
    }
}
