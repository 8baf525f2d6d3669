//! The shared standard material.
//!
//! A physically-inspired opaque material with a base colour and a roughness
//! term. The demo stage creates exactly one instance and shares it across
//! all four meshes through an `Arc`, so a colour or roughness change would
//! affect every mesh at once.

use wgpu::util::DeviceExt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StandardMaterial {
    pub color: [f32; 3],
    pub roughness: f32,
}

impl StandardMaterial {
    pub fn to_raw(&self) -> MaterialUniform {
        MaterialUniform {
            color: [self.color[0], self.color[1], self.color[2], 1.0],
            // Only x is used (roughness); the rest keeps vec4 alignment.
            params: [self.roughness, 0.0, 0.0, 0.0],
        }
    }
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            roughness: 0.5,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 4],
    pub params: [f32; 4],
}

/// GPU resources for the shared material: one uniform buffer and its bind
/// group. The material is immutable after startup so the buffer is written
/// once.
pub struct MaterialResources {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl MaterialResources {
    pub fn new(device: &wgpu::Device, material: &StandardMaterial) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material Buffer"),
            contents: bytemuck::cast_slice(&[material.to_raw()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("material_bind_group"),
        });
        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("material_bind_group_layout"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_material_keeps_colour_and_roughness() {
        let material = StandardMaterial {
            color: [0.867, 0.867, 0.867],
            roughness: 0.4,
        };
        let raw = material.to_raw();
        assert_eq!(raw.color, [0.867, 0.867, 0.867, 1.0]);
        assert_eq!(raw.params[0], 0.4);
    }
}
