//! Physics-to-visual sync
//!
//! Runs after every completed physics step and copies each dynamic body's
//! pose onto its proxy as `translate(..) rotate(..)`. Translate comes first so
//! the rotation happens about the already-offset element center.

use std::fmt::Write;

use super::state::SceneState;
use crate::physics::{PhysicsWorld, Pose};
use crate::view::VisualTree;
use crate::StageError;

/// Write the CSS transform for a pose into `out`, replacing its contents
pub fn format_transform(pose: &Pose, out: &mut String) {
    out.clear();
    // Writing into a String cannot fail
    let _ = write!(
        out,
        "translate({}px,{}px) rotate({}rad)",
        pose.position.x, pose.position.y, pose.angle
    );
}

/// Update every proxy from its body
///
/// Either all pairs are written or the first missing body aborts the pass.
pub fn sync<W, T>(scene: &mut SceneState, world: &W, tree: &mut T) -> Result<(), StageError>
where
    W: PhysicsWorld + ?Sized,
    T: VisualTree + ?Sized,
{
    let SceneState {
        pairs,
        transform_buf,
        ..
    } = scene;

    for pair in pairs.iter() {
        let pose = world
            .pose(pair.body)
            .ok_or(StageError::UnknownBody(pair.body))?;
        format_transform(&pose, transform_buf);
        tree.set_transform(pair.proxy, transform_buf);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::physics::RapierWorld;
    use crate::scene::builder::build;
    use crate::view::HeadlessTree;
    use crate::Viewport;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn scene() -> (RapierWorld, HeadlessTree, SceneState) {
        let mut world = RapierWorld::new(GRAVITY);
        let mut tree = HeadlessTree::new();
        let mut rng = Pcg32::seed_from_u64(2024);
        let scene = build(
            &mut world,
            &mut tree,
            Viewport::new(1000, 700),
            &mut rng,
        )
        .unwrap();
        (world, tree, scene)
    }

    #[test]
    fn test_format_transform_translates_then_rotates() {
        let pose = Pose {
            position: Vec2::new(12.5, -3.0),
            angle: 0.25,
        };
        let mut out = String::from("stale");
        format_transform(&pose, &mut out);
        assert_eq!(out, "translate(12.5px,-3px) rotate(0.25rad)");
    }

    #[test]
    fn test_sync_writes_every_proxy_once() {
        let (world, mut tree, mut scene) = scene();
        sync(&mut scene, &world, &mut tree).unwrap();

        for pair in scene.pairs() {
            let proxy = tree.proxy(pair.proxy).unwrap();
            assert_eq!(proxy.writes, 1);
            let mut expected = String::new();
            format_transform(&world.pose(pair.body).unwrap(), &mut expected);
            assert_eq!(proxy.transform, expected);
        }
    }

    #[test]
    fn test_sync_is_idempotent_without_a_step() {
        let (world, mut tree, mut scene) = scene();
        sync(&mut scene, &world, &mut tree).unwrap();
        let first: Vec<String> = tree.proxies().iter().map(|p| p.transform.clone()).collect();

        sync(&mut scene, &world, &mut tree).unwrap();
        let second: Vec<String> = tree.proxies().iter().map(|p| p.transform.clone()).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_sync_follows_the_simulation() {
        let (mut world, mut tree, mut scene) = scene();
        sync(&mut scene, &world, &mut tree).unwrap();
        let before = tree.proxies()[0].transform.clone();

        for _ in 0..10 {
            world.step(SIM_DT);
            sync(&mut scene, &world, &mut tree).unwrap();
        }

        assert_ne!(tree.proxies()[0].transform, before);
        assert!(tree.proxies().iter().all(|p| p.writes == 11));
    }
}
