//! Stage data structures: meshes, primitives, transforms and scene layout.
//!
//! - `mesh` contains vertex/mesh definitions and their GPU resources
//! - `primitives` generates sphere, cuboid, torus and plane geometry
//! - `scene` holds the scene graph root and the animation contract
//! - `texture` contains the depth texture used by the render pass
//! - `transform` holds per-mesh position/rotation/scale data

pub mod mesh;
pub mod primitives;
pub mod scene;
pub mod texture;
pub mod transform;
