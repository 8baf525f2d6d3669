//! Primitive geometry generators.
//!
//! Each generator returns CPU-side [`MeshData`] with unit normals and
//! counter-clockwise winding. Parameters mirror the usual conventions:
//! segment counts control tessellation density and are clamped to sane
//! minimums.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::mesh::{MeshData, MeshVertex};

/// A UV sphere of the given radius.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for y in 0..=height_segments {
        let v = y as f32 / height_segments as f32;
        let theta = v * PI;
        for x in 0..=width_segments {
            let u = x as f32 / width_segments as f32;
            let phi = u * 2.0 * PI;
            let normal = Vector3::new(
                theta.sin() * phi.cos(),
                theta.cos(),
                theta.sin() * phi.sin(),
            );
            vertices.push(MeshVertex {
                position: (normal * radius).into(),
                normal: normal.into(),
            });
        }
    }

    let stride = width_segments + 1;
    for y in 0..height_segments {
        for x in 0..width_segments {
            let a = y * stride + x;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }

    MeshData { vertices, indices }
}

/// An axis-aligned box centred on the origin.
pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);

    // One quad per face so each face keeps its own flat normal.
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        (
            [0.0, 0.0, 1.0],
            [
                [-hw, -hh, hd],
                [hw, -hh, hd],
                [hw, hh, hd],
                [-hw, hh, hd],
            ],
        ),
        (
            [0.0, 0.0, -1.0],
            [
                [hw, -hh, -hd],
                [-hw, -hh, -hd],
                [-hw, hh, -hd],
                [hw, hh, -hd],
            ],
        ),
        (
            [1.0, 0.0, 0.0],
            [
                [hw, -hh, hd],
                [hw, -hh, -hd],
                [hw, hh, -hd],
                [hw, hh, hd],
            ],
        ),
        (
            [-1.0, 0.0, 0.0],
            [
                [-hw, -hh, -hd],
                [-hw, -hh, hd],
                [-hw, hh, hd],
                [-hw, hh, -hd],
            ],
        ),
        (
            [0.0, 1.0, 0.0],
            [
                [-hw, hh, hd],
                [hw, hh, hd],
                [hw, hh, -hd],
                [-hw, hh, -hd],
            ],
        ),
        (
            [0.0, -1.0, 0.0],
            [
                [-hw, -hh, -hd],
                [hw, -hh, -hd],
                [hw, -hh, hd],
                [-hw, -hh, hd],
            ],
        ),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        let base = vertices.len() as u32;
        for position in corners {
            vertices.push(MeshVertex { position, normal });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}

/// A torus in the XY plane: `radius` from the centre to the tube centre,
/// `tube` is the tube radius.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let radial_segments = radial_segments.max(3);
    let tubular_segments = tubular_segments.max(3);

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * 2.0 * PI;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * 2.0 * PI;
            let position = Vector3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vector3::new(radius * u.cos(), radius * u.sin(), 0.0);
            vertices.push(MeshVertex {
                position: position.into(),
                normal: (position - center).normalize().into(),
            });
        }
    }

    let stride = tubular_segments + 1;
    for j in 0..radial_segments {
        for i in 0..tubular_segments {
            let a = j * stride + i;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }

    MeshData { vertices, indices }
}

/// A flat quad in the XY plane facing +Z; tilt it to use it as a floor.
pub fn plane(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let normal = [0.0, 0.0, 1.0];
    MeshData {
        vertices: vec![
            MeshVertex {
                position: [-hw, -hh, 0.0],
                normal,
            },
            MeshVertex {
                position: [hw, -hh, 0.0],
                normal,
            },
            MeshVertex {
                position: [hw, hh, 0.0],
                normal,
            },
            MeshVertex {
                position: [-hw, hh, 0.0],
                normal,
            },
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unit_normals(data: &MeshData) {
        for vertex in &data.vertices {
            let n = Vector3::from(vertex.normal);
            assert!((n.magnitude() - 1.0).abs() < 1e-5, "normal {n:?}");
        }
    }

    #[test]
    fn sphere_vertex_and_index_counts() {
        let data = sphere(0.5, 32, 32);
        assert_eq!(data.vertices.len(), 33 * 33);
        assert_eq!(data.indices.len() as u32, 32 * 32 * 6);
        assert_eq!(data.indices.len() % 3, 0);
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let data = sphere(0.5, 16, 12);
        for vertex in &data.vertices {
            let p = Vector3::from(vertex.position);
            assert!((p.magnitude() - 0.5).abs() < 1e-5);
        }
        assert_unit_normals(&data);
    }

    #[test]
    fn cuboid_has_per_face_quads() {
        let data = cuboid(0.75, 0.75, 0.75);
        assert_eq!(data.vertices.len(), 24);
        assert_eq!(data.indices.len(), 36);
        assert_unit_normals(&data);
        for vertex in &data.vertices {
            for c in vertex.position {
                assert!(c.abs() <= 0.375 + 1e-6);
            }
        }
    }

    #[test]
    fn torus_counts_match_segments() {
        let data = torus(0.3, 0.2, 32, 64);
        assert_eq!(data.vertices.len(), 33 * 65);
        assert_eq!(data.indices.len() as u32, 32 * 64 * 6);
        assert_unit_normals(&data);
    }

    #[test]
    fn torus_vertices_stay_on_tube_surface() {
        let data = torus(0.3, 0.2, 8, 12);
        for vertex in &data.vertices {
            let p = Vector3::from(vertex.position);
            let ring = (p.x * p.x + p.y * p.y).sqrt();
            let tube_dist = ((ring - 0.3).powi(2) + p.z * p.z).sqrt();
            assert!((tube_dist - 0.2).abs() < 1e-5);
        }
    }

    #[test]
    fn plane_faces_positive_z() {
        let data = plane(5.0, 5.0);
        assert_eq!(data.vertices.len(), 4);
        assert_eq!(data.indices.len(), 6);
        for vertex in &data.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
            assert_eq!(vertex.position[2], 0.0);
        }
    }
}
