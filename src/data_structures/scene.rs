//! The scene graph root and the demo stage.
//!
//! A [`Scene`] owns the ordered mesh children and the light rig. It is pure
//! CPU data: building and animating a scene needs no GPU, which keeps the
//! whole animation contract testable. GPU upload happens in
//! [`crate::render::StageRenderer`].

use std::sync::Arc;

use cgmath::{Euler, Rad};

use crate::{
    data_structures::{mesh::MeshData, primitives, transform::Transform},
    lights::LightRig,
    material::StandardMaterial,
};

/// Rotation rate around the y axis in radians per second.
pub const SPIN_RATE_Y: f32 = 0.1;
/// Rotation rate around the x axis in radians per second.
pub const SPIN_RATE_X: f32 = 0.15;

/// A mesh attached to the scene: geometry, shared material and transform.
///
/// `spin` marks the meshes the animation driver rotates; the ground plane
/// keeps its static tilt.
pub struct MeshNode {
    pub name: &'static str,
    pub geometry: MeshData,
    pub material: Arc<StandardMaterial>,
    pub transform: Transform,
    pub spin: bool,
}

/// Scene graph root: the ordered mesh children plus the light rig.
pub struct Scene {
    pub meshes: Vec<MeshNode>,
    pub rig: LightRig,
}

impl Scene {
    pub fn new(rig: LightRig) -> Self {
        Self {
            meshes: Vec::new(),
            rig,
        }
    }

    /// The demo stage: sphere, cube and torus in a row above a tilted ground
    /// plane, all sharing one material, lit by the demo rig.
    pub fn demo() -> Self {
        let material = Arc::new(StandardMaterial {
            color: [0.867, 0.867, 0.867],
            roughness: 0.4,
        });

        let mut scene = Self::new(LightRig::demo());
        scene.add(MeshNode {
            name: "sphere",
            geometry: primitives::sphere(0.5, 32, 32),
            material: material.clone(),
            transform: Transform::at([-1.5, 0.0, 0.0]),
            spin: true,
        });
        scene.add(MeshNode {
            name: "cube",
            geometry: primitives::cuboid(0.75, 0.75, 0.75),
            material: material.clone(),
            transform: Transform::new(),
            spin: true,
        });
        scene.add(MeshNode {
            name: "torus",
            geometry: primitives::torus(0.3, 0.2, 32, 64),
            material: material.clone(),
            transform: Transform::at([1.5, 0.0, 0.0]),
            spin: true,
        });

        // The plane is generated facing +Z and tilted flat to act as the floor.
        let mut plane_transform = Transform::at([0.0, -0.65, 0.0]);
        plane_transform.rotation = Euler::new(Rad(-std::f32::consts::FRAC_PI_2), Rad(0.0), Rad(0.0));
        scene.add(MeshNode {
            name: "plane",
            geometry: primitives::plane(5.0, 5.0),
            material,
            transform: plane_transform,
            spin: false,
        });

        scene
    }

    pub fn add(&mut self, node: MeshNode) {
        self.meshes.push(node);
    }

    /// Advance the animation to the given elapsed time in seconds.
    ///
    /// Spinning meshes get their rotation set to absolute, time-derived
    /// angles, so calling this twice with the same time is a no-op and the
    /// angles grow without bound over the session.
    pub fn advance(&mut self, elapsed_secs: f32) {
        for node in self.meshes.iter_mut().filter(|node| node.spin) {
            node.transform.rotation = Euler::new(
                Rad(SPIN_RATE_X * elapsed_secs),
                Rad(SPIN_RATE_Y * elapsed_secs),
                Rad(0.0),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scene_has_four_meshes_in_order() {
        let scene = Scene::demo();
        let names: Vec<_> = scene.meshes.iter().map(|m| m.name).collect();
        assert_eq!(names, ["sphere", "cube", "torus", "plane"]);
    }

    #[test]
    fn all_meshes_share_one_material() {
        let scene = Scene::demo();
        let first = &scene.meshes[0].material;
        for node in &scene.meshes[1..] {
            assert!(Arc::ptr_eq(first, &node.material));
        }
    }

    #[test]
    fn advance_sets_absolute_rotations() {
        let mut scene = Scene::demo();
        scene.advance(10.0);
        for node in scene.meshes.iter().filter(|node| node.spin) {
            assert!((node.transform.rotation.y.0 - 1.0).abs() < 1e-6);
            assert!((node.transform.rotation.x.0 - 1.5).abs() < 1e-6);
        }
    }

    #[test]
    fn advance_is_idempotent_per_timestamp() {
        let mut scene = Scene::demo();
        scene.advance(10.0);
        scene.advance(10.0);
        let sphere = &scene.meshes[0];
        assert!((sphere.transform.rotation.y.0 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn plane_keeps_its_static_tilt() {
        let mut scene = Scene::demo();
        scene.advance(42.0);
        let plane = scene.meshes.iter().find(|m| m.name == "plane").unwrap();
        assert!((plane.transform.rotation.x.0 + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(plane.transform.rotation.y.0, 0.0);
    }
}
