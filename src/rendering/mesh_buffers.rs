use std::mem::offset_of;

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4};
use wgpu::util::DeviceExt;

use crate::{
    geometry::{Geometry, Vertex},
    material::Material,
};

pub const MESH_VBL: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, position) as wgpu::BufferAddress,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, normal) as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
    ],
};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshUniform {
    model: Mat4,
    // mat3x3 columns are padded to vec4 in WGSL
    normal_matrix: [[f32; 4]; 3],
    color: [f32; 4],
    emissive: [f32; 4],
}

impl MeshUniform {
    pub fn new(world_matrix: Mat4, normal_matrix: Mat3, material: &Material) -> Self {
        Self {
            model: world_matrix,
            normal_matrix: [
                normal_matrix.x_axis.extend(0.0).to_array(),
                normal_matrix.y_axis.extend(0.0).to_array(),
                normal_matrix.z_axis.extend(0.0).to_array(),
            ],
            color: material.color().extend(material.opacity()).to_array(),
            emissive: material.emissive().extend(0.0).to_array(),
        }
    }
}

/// GPU side of one scene mesh: its geometry and a uniform block for the
/// per-object transform and material parameters.
pub struct RenderMesh {
    pub vertices: wgpu::Buffer,
    pub indices: wgpu::Buffer,
    pub num_indices: u32,
    uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl RenderMesh {
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Mesh bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        name: &str,
        geometry: &Geometry,
        initial: MeshUniform,
    ) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Vertex buffer ({name}, {})", geometry.name)),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Index buffer ({name}, {})", geometry.name)),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Mesh uniform buffer ({name})")),
            contents: bytemuck::cast_slice(&[initial]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Mesh bind group ({name})")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            vertices,
            indices,
            num_indices: geometry.indices.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniform: MeshUniform) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_uniform_matches_shader_struct() {
        assert_eq!(std::mem::size_of::<MeshUniform>(), 64 + 48 + 16 + 16);
    }

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(MESH_VBL.array_stride, 24);
    }
}
