//! lightrig
//!
//! A small cross-platform rendering stage built on wgpu and winit: four lit
//! primitive meshes on a ground plane, a four-light rig (hemisphere,
//! directional, point, spot), an orbit camera with inertial damping and a
//! per-frame animation loop. The scene itself is plain data and can be
//! constructed and driven without a GPU; the GPU surface lives in `context`
//! and `render`.
//!
//! High-level modules
//! - `app`: the winit event loop, clock and animation driver
//! - `camera`: camera, perspective projection and the orbit controller
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: scene data (meshes, primitives, transforms, textures)
//! - `lights`: the four-light rig and its shader-side packing
//! - `material`: the shared standard material
//! - `panel`: slider bindings for the live debug panel
//! - `pipelines`: render pipeline construction and light GPU resources
//! - `render`: per-frame render composition
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod lights;
pub mod material;
pub mod panel;
pub mod pipelines;
pub mod render;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use wgpu::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
