//! The four-light rig: hemisphere, directional, point and spot lights.
//!
//! Light parameters live on the CPU as plain structs so the debug panel can
//! mutate them between frames; [`LightRig::to_raw`] packs the whole rig into
//! a single uniform buffer value each frame.

use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};

/// Ambient light fading between a sky and a ground colour across the surface
/// normal's vertical component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HemisphereLight {
    pub sky_color: [f32; 3],
    pub ground_color: [f32; 3],
    pub intensity: f32,
}

/// Parallel light shining from `position` towards the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vector3<f32>,
}

/// Localized light with linear distance falloff up to `range`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub range: f32,
    pub position: Vector3<f32>,
}

/// Cone light aimed at `target`; fragments outside the half-angle `angle`
/// receive nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub range: f32,
    /// Cone half-angle in radians.
    pub angle: f32,
    pub position: Vector3<f32>,
    pub target: Point3<f32>,
}

/// One of each light type. The scene carries exactly one rig, which makes
/// the attached-exactly-once property structural rather than something to
/// check at runtime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightRig {
    pub hemisphere: HemisphereLight,
    pub directional: DirectionalLight,
    pub point: PointLight,
    pub spot: SpotLight,
}

impl LightRig {
    /// The rig of the demo stage: red/blue hemisphere ambience, a white
    /// directional key light, a green point light and a blue spotlight aimed
    /// at the origin.
    pub fn demo() -> Self {
        Self {
            hemisphere: HemisphereLight {
                sky_color: [1.0, 0.0, 0.0],
                ground_color: [0.0, 0.0, 1.0],
                intensity: 0.8,
            },
            directional: DirectionalLight {
                color: [1.0, 1.0, 1.0],
                intensity: 0.6,
                position: Vector3::new(5.0, 5.0, -3.0),
            },
            point: PointLight {
                color: [0.0, 1.0, 0.0],
                intensity: 1.0,
                range: 10.0,
                position: Vector3::new(2.0, 3.0, 1.0),
            },
            spot: SpotLight {
                color: [0.0, 0.0, 1.0],
                intensity: 1.0,
                range: 10.0,
                angle: std::f32::consts::PI * 0.1,
                position: Vector3::new(-3.0, 3.0, 3.0),
                target: Point3::new(0.0, 0.0, 0.0),
            },
        }
    }

    /// Pack the rig for the shader. Positions carry the light intensity in
    /// their fourth component, colours carry the range; the spot direction's
    /// fourth component is the cosine of the cone half-angle.
    pub fn to_raw(&self) -> LightRigUniform {
        let h = &self.hemisphere;
        let d = &self.directional;
        let p = &self.point;
        let s = &self.spot;
        let spot_dir = (s.target.to_vec() - s.position).normalize();
        LightRigUniform {
            hemisphere_sky: [h.sky_color[0], h.sky_color[1], h.sky_color[2], h.intensity],
            hemisphere_ground: [h.ground_color[0], h.ground_color[1], h.ground_color[2], 0.0],
            directional_position: [d.position.x, d.position.y, d.position.z, d.intensity],
            directional_color: [d.color[0], d.color[1], d.color[2], 0.0],
            point_position: [p.position.x, p.position.y, p.position.z, p.intensity],
            point_color: [p.color[0], p.color[1], p.color[2], p.range],
            spot_position: [s.position.x, s.position.y, s.position.z, s.intensity],
            spot_color: [s.color[0], s.color[1], s.color[2], s.range],
            spot_direction: [spot_dir.x, spot_dir.y, spot_dir.z, s.angle.cos()],
        }
    }
}

/// The rig as stored in the uniform buffer. All fields are vec4-packed so
/// the struct satisfies the 16 byte uniform alignment rules without padding
/// fields.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightRigUniform {
    pub hemisphere_sky: [f32; 4],
    pub hemisphere_ground: [f32; 4],
    pub directional_position: [f32; 4],
    pub directional_color: [f32; 4],
    pub point_position: [f32; 4],
    pub point_color: [f32; 4],
    pub spot_position: [f32; 4],
    pub spot_color: [f32; 4],
    pub spot_direction: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_rig_matches_stage_constants() {
        let rig = LightRig::demo();
        assert_eq!(rig.hemisphere.intensity, 0.8);
        assert_eq!(rig.directional.intensity, 0.6);
        assert_eq!(rig.directional.position, Vector3::new(5.0, 5.0, -3.0));
        assert_eq!(rig.point.range, 10.0);
        assert_eq!(rig.spot.angle, std::f32::consts::PI * 0.1);
        assert_eq!(rig.spot.target, Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn raw_packing_carries_intensity_and_range() {
        let rig = LightRig::demo();
        let raw = rig.to_raw();
        assert_eq!(raw.hemisphere_sky[3], rig.hemisphere.intensity);
        assert_eq!(raw.directional_position[3], rig.directional.intensity);
        assert_eq!(raw.point_color[3], rig.point.range);
        assert_eq!(raw.spot_color[3], rig.spot.range);
        assert!((raw.spot_direction[3] - rig.spot.angle.cos()).abs() < 1e-6);
    }

    #[test]
    fn spot_direction_is_normalized_towards_target() {
        let raw = LightRig::demo().to_raw();
        let d = Vector3::new(
            raw.spot_direction[0],
            raw.spot_direction[1],
            raw.spot_direction[2],
        );
        assert!((d.magnitude() - 1.0).abs() < 1e-6);
        // Aimed from (-3, 3, 3) towards the origin.
        assert!(d.x > 0.0 && d.y < 0.0 && d.z < 0.0);
    }

    #[test]
    fn uniform_is_vec4_packed() {
        assert_eq!(std::mem::size_of::<LightRigUniform>(), 9 * 16);
    }
}
