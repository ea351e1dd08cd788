//! Scene construction and re-layout
//!
//! Builds four oversized boundaries around the viewport and stacks a seeded
//! random population of blocks and circles above the floor.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{BodyPair, Boundaries, Ceiling, SceneState};
use super::tier::SizeTier;
use crate::consts::*;
use crate::physics::{BodyDesc, BodyShape, PhysicsWorld};
use crate::view::{ProxyShape, ProxySpec, VisualTree};
use crate::{StageError, Viewport};

/// One batch of identically shaped dynamic bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyGroup {
    pub shape: ProxyShape,
    pub multiplier: u32,
    /// Count before the tier ratio is applied
    pub base_count: u32,
}

impl BodyGroup {
    pub fn count(&self, tier: &SizeTier) -> u32 {
        self.base_count * tier.ratio
    }
}

/// Groups in creation order
pub const POPULATION: [BodyGroup; 3] = [
    BodyGroup {
        shape: ProxyShape::Block,
        multiplier: 1,
        base_count: 12,
    },
    BodyGroup {
        shape: ProxyShape::Circle,
        multiplier: 1,
        base_count: 6,
    },
    BodyGroup {
        shape: ProxyShape::Block,
        multiplier: 2,
        base_count: 1,
    },
];

/// Total dynamic bodies a tier produces
pub fn population_size(tier: &SizeTier) -> usize {
    POPULATION.iter().map(|group| group.count(tier) as usize).sum()
}

pub fn ground_position(viewport: Viewport) -> Vec2 {
    Vec2::new(viewport.width_f() / 2.0, viewport.height_f() + BOUNDARY_OFFSET)
}

pub fn right_wall_position(viewport: Viewport) -> Vec2 {
    Vec2::new(viewport.width_f() + BOUNDARY_OFFSET, 0.0)
}

pub fn left_wall_position() -> Vec2 {
    Vec2::new(-BOUNDARY_OFFSET, 0.0)
}

pub fn ceiling_position(viewport: Viewport) -> Vec2 {
    Vec2::new(viewport.width_f(), -BOUNDARY_OFFSET)
}

fn horizontal_boundary(position: Vec2) -> BodyDesc {
    BodyDesc::fixed_rect(position, BOUNDARY_LENGTH, BOUNDARY_THICKNESS)
}

fn vertical_boundary(position: Vec2) -> BodyDesc {
    BodyDesc::fixed_rect(position, BOUNDARY_THICKNESS, BOUNDARY_LENGTH)
}

/// Physics description for the `index`-th spawned body (1-based, shared across groups)
fn spawn_desc<R: Rng>(
    group: &BodyGroup,
    tier: &SizeTier,
    viewport: Viewport,
    index: u32,
    rng: &mut R,
) -> BodyDesc {
    let width = viewport.width_f();
    let x = width * SPAWN_X_START + rng.random::<f32>() * width * SPAWN_X_SPAN;
    // Large tiers stack well past the viewport top. Bodies that have not
    // fallen below the ceiling by the time it closes stay stranded above it.
    let y = viewport.height_f() - tier.unit * index as f32 * SPAWN_Y_STEP;
    let angle = rng.random_range(0.0..TAU);
    let size = tier.unit * group.multiplier as f32;

    let (shape, friction) = match group.shape {
        ProxyShape::Block => (
            BodyShape::Rectangle {
                width: size,
                height: size,
            },
            RECT_FRICTION,
        ),
        ProxyShape::Circle => (BodyShape::Circle { radius: size / 2.0 }, DEFAULT_FRICTION),
    };

    BodyDesc {
        shape,
        position: Vec2::new(x, y),
        angle,
        restitution: RESTITUTION,
        friction,
        is_static: false,
    }
}

/// Build the whole scene: boundaries, population, proxies and the held ceiling
///
/// The ceiling is described here but stays out of the world until
/// [`SceneState::close_ceiling`] runs.
pub fn build<W, T, R>(
    world: &mut W,
    tree: &mut T,
    viewport: Viewport,
    rng: &mut R,
) -> Result<SceneState, StageError>
where
    W: PhysicsWorld + ?Sized,
    T: VisualTree + ?Sized,
    R: Rng,
{
    let viewport = viewport.validate()?;
    let tier = SizeTier::for_viewport(viewport);
    log::info!(
        "Viewport {}x{} -> unit {}px, accent {}px, ratio {}",
        viewport.width,
        viewport.height,
        tier.unit,
        tier.line_width,
        tier.ratio
    );
    tree.set_accent_line_width(tier.line_width)?;

    let boundaries = Boundaries {
        ground: world.create_body(&horizontal_boundary(ground_position(viewport))),
        left_wall: world.create_body(&vertical_boundary(left_wall_position())),
        right_wall: world.create_body(&vertical_boundary(right_wall_position(viewport))),
    };
    let ceiling = Ceiling::Held(horizontal_boundary(ceiling_position(viewport)));

    let mut pairs = Vec::with_capacity(population_size(&tier));
    let mut index = 0u32;
    for group in &POPULATION {
        for _ in 0..group.count(&tier) {
            let color = index % COLOR_CLASSES;
            index += 1;

            let desc = spawn_desc(group, &tier, viewport, index, rng);
            let spec = ProxySpec {
                size: tier.unit * group.multiplier as f32,
                shape: group.shape,
                multiplier: group.multiplier,
                color,
            };
            let proxy = tree.create_proxy(&spec)?;
            let body = world.create_body(&desc);

            pairs.push(BodyPair {
                body,
                proxy,
                color,
                multiplier: group.multiplier,
                circle: group.shape == ProxyShape::Circle,
            });
        }
    }
    log::info!("Spawned {} bodies", pairs.len());

    Ok(SceneState {
        tier,
        viewport,
        boundaries,
        ceiling,
        pairs,
        transform_buf: String::new(),
    })
}

/// Move the ground and right wall to match a new viewport
///
/// Bodies are repositioned in place. The tier and the population stay as built.
pub fn re_arrange<W: PhysicsWorld + ?Sized>(
    scene: &mut SceneState,
    world: &mut W,
    viewport: Viewport,
) -> Result<(), StageError> {
    let viewport = viewport.validate()?;
    world.set_position(scene.boundaries.ground, ground_position(viewport))?;
    world.set_position(scene.boundaries.right_wall, right_wall_position(viewport))?;
    scene.viewport = viewport;
    log::debug!("Re-arranged for {}x{}", viewport.width, viewport.height);
    Ok(())
}
