use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::{
    camera::Camera,
    lighting::{Light, LightUniform},
};

/// Must match the array length in `cube.wgsl`.
pub const MAX_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GlobalUniformState {
    view_proj: Mat4,
    camera_position: [f32; 4],
    light_count: [u32; 4],
    lights: [LightUniform; MAX_LIGHTS],
}

impl GlobalUniformState {
    pub fn new(camera: &Camera, lights: &[Light]) -> Self {
        if lights.len() > MAX_LIGHTS {
            log::warn!(
                "Scene has {} lights, only the first {} are used",
                lights.len(),
                MAX_LIGHTS
            );
        }

        let mut packed = [LightUniform::default(); MAX_LIGHTS];
        for (slot, light) in packed.iter_mut().zip(lights) {
            *slot = light.into();
        }

        Self {
            view_proj: camera.view_proj_matrix(),
            camera_position: camera.eye.extend(1.0).to_array(),
            light_count: [lights.len().min(MAX_LIGHTS) as u32, 0, 0, 0],
            lights: packed,
        }
    }
}

pub struct GlobalUniform {
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl GlobalUniform {
    pub fn new(device: &wgpu::Device, initial_state: GlobalUniformState) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Global uniform buffer"),
            contents: bytemuck::cast_slice(&[initial_state]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Global uniform bind group layout"),
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
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global uniform bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, state: GlobalUniformState) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[state]));
    }
}
