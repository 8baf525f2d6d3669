//! Render pipeline construction and light GPU resources.
//!
//! - `stage` builds the lit mesh pipeline used for every scene mesh
//! - `light` owns the light rig uniform buffer and bind group

pub mod light;
pub mod stage;
