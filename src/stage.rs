//! The stage: world, visual tree and scene under one owner
//!
//! Hosts drive it with events (resize, pointer, timer) and frame deltas. Each
//! fixed step runs drag, physics and then sync, so proxies always match the
//! last completed step.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::physics::{BodyId, PhysicsWorld};
use crate::scene::{self, DragConstraint, SceneState};
use crate::view::VisualTree;
use crate::{Settings, StageError, Viewport};

pub struct Stage<W, T> {
    world: W,
    tree: T,
    settings: Settings,
    scene: Option<SceneState>,
    drag: DragConstraint,
    accumulator: f32,
    steps: u64,
    /// Simulated time the held ceiling goes in
    ceiling_due: Option<f64>,
    /// Simulated time of the next gravity reversal
    next_gravity_flip: Option<f64>,
}

impl<W: PhysicsWorld, T: VisualTree> Stage<W, T> {
    pub fn new(mut world: W, tree: T, settings: Settings) -> Self {
        world.set_gravity(Vec2::new(0.0, settings.gravity));
        Self {
            world,
            tree,
            drag: DragConstraint::new(settings.drag_stiffness),
            settings,
            scene: None,
            accumulator: 0.0,
            steps: 0,
            ceiling_due: None,
            next_gravity_flip: None,
        }
    }

    /// Populate the world and the tree; a stage is built once
    pub fn build<R: Rng>(&mut self, viewport: Viewport, rng: &mut R) -> Result<(), StageError> {
        if self.scene.is_some() {
            return Err(StageError::SceneAlreadyBuilt);
        }
        let mut scene = scene::build(&mut self.world, &mut self.tree, viewport, rng)?;
        scene::sync(&mut scene, &self.world, &mut self.tree)?;
        self.scene = Some(scene);
        self.ceiling_due = Some(self.settings.ceiling_delay_secs());
        self.next_gravity_flip = self.settings.gravity_flip_period();
        Ok(())
    }

    /// Follow a viewport change
    pub fn re_arrange(&mut self, viewport: Viewport) -> Result<(), StageError> {
        let scene = self.scene.as_mut().ok_or(StageError::SceneNotBuilt)?;
        scene::re_arrange(scene, &mut self.world, viewport)
    }

    /// Deferred ceiling task; `Ok(true)` only for the call that closes it
    ///
    /// Runs by itself once the configured delay of simulated time has passed.
    /// Hosts with a wall-clock timer may call it earlier.
    pub fn close_ceiling(&mut self) -> Result<bool, StageError> {
        let scene = self.scene.as_mut().ok_or(StageError::SceneNotBuilt)?;
        Ok(scene.close_ceiling(&mut self.world))
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.drag.pointer_moved(Vec2::new(x, y));
    }

    pub fn pointer_pressed(&mut self, x: f32, y: f32) -> Option<BodyId> {
        self.drag.pointer_pressed(&self.world, Vec2::new(x, y))
    }

    pub fn pointer_released(&mut self) {
        self.drag.pointer_released();
    }

    /// Feed a frame delta (seconds) and run the fixed steps it covers
    ///
    /// Returns the number of steps run.
    pub fn advance(&mut self, frame_dt: f32) -> Result<u32, StageError> {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step()?;
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        Ok(substeps)
    }

    /// One fixed step followed by a full sync
    pub fn step(&mut self) -> Result<(), StageError> {
        let scene = self.scene.as_mut().ok_or(StageError::SceneNotBuilt)?;

        self.drag.apply(&mut self.world, SIM_DT)?;
        self.world.step(SIM_DT);
        scene::sync(scene, &self.world, &mut self.tree)?;

        self.steps += 1;
        self.close_ceiling_if_due();
        self.flip_gravity_if_due();
        Ok(())
    }

    fn close_ceiling_if_due(&mut self) {
        let (Some(due), Some(scene)) = (self.ceiling_due, self.scene.as_mut()) else {
            return;
        };
        if self.steps as f64 * SIM_DT as f64 >= due {
            if scene.close_ceiling(&mut self.world) {
                log::info!("Ceiling closed after {:.2}s", due);
            }
            self.ceiling_due = None;
        }
    }

    fn flip_gravity_if_due(&mut self) {
        let (Some(due), Some(period)) = (self.next_gravity_flip, self.settings.gravity_flip_period())
        else {
            return;
        };
        if self.sim_time() >= due {
            let gravity = self.world.gravity();
            self.world.set_gravity(Vec2::new(gravity.x, -gravity.y));
            self.next_gravity_flip = Some(due + period);
            log::info!("Gravity flipped to {}", -gravity.y);
        }
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn scene(&self) -> Option<&SceneState> {
        self.scene.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn drag(&self) -> &DragConstraint {
        &self.drag
    }

    /// Simulated seconds since build, derived from the step count
    pub fn sim_time(&self) -> f64 {
        self.steps as f64 * SIM_DT as f64
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}
