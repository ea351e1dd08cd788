//! Scene module
//!
//! Everything here is deterministic given a seeded RNG and works against the
//! [`PhysicsWorld`](crate::physics::PhysicsWorld) and
//! [`VisualTree`](crate::view::VisualTree) traits only.

pub mod builder;
pub mod drag;
pub mod state;
pub mod sync;
pub mod tier;

pub use builder::{
    BodyGroup, POPULATION, build, ground_position, population_size, re_arrange,
    right_wall_position,
};
pub use drag::{DragConstraint, Grab};
pub use state::{BodyPair, Boundaries, Ceiling, SceneState};
pub use sync::{format_transform, sync};
pub use tier::SizeTier;
