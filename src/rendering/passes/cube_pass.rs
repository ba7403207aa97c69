use std::collections::HashMap;

use wgpu::{
    DepthBiasState, MultisampleState, PipelineCompilationOptions, RenderPassDescriptor,
    ShaderSource, StencilState,
};

use crate::{
    geometry::Topology,
    material::{Material, MaterialKind},
    rendering::{
        mesh_buffers::{RenderMesh, MESH_VBL},
        render_common::RenderCommon,
        texture::RenderTarget,
    },
};

pub(crate) struct ShaderDefinition {
    pub name: &'static str,
    pub source: &'static str,
}

const CUBE_SHADER: ShaderDefinition = ShaderDefinition {
    name: "Cube Shader",
    source: include_str!("../../shaders/cube.wgsl"),
};

/// Fixed-function state for one material on one topology.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PipelineSettings {
    pub fragment_entry: &'static str,
    pub write_mask: wgpu::ColorWrites,
    pub blend: Option<wgpu::BlendState>,
    pub depth_write_enabled: bool,
    pub cull_mode: Option<wgpu::Face>,
}

impl PipelineSettings {
    pub fn for_material(material: &Material, topology: Topology) -> Self {
        let fragment_entry = match material.kind() {
            MaterialKind::Phong => "fs_phong",
            MaterialKind::DepthOnly | MaterialKind::Line => "fs_unlit",
        };

        let (write_mask, blend) = if material.writes_color() {
            (wgpu::ColorWrites::ALL, Some(wgpu::BlendState::ALPHA_BLENDING))
        } else {
            (wgpu::ColorWrites::empty(), None)
        };

        let cull_mode = match topology {
            Topology::Triangles => Some(wgpu::Face::Back),
            Topology::Lines => None,
        };

        Self {
            fragment_entry,
            write_mask,
            blend,
            depth_write_enabled: material.writes_depth(),
            cull_mode,
        }
    }
}

pub struct CubePassTextureViews<'a> {
    pub color: &'a wgpu::TextureView,
    pub resolve_target: Option<&'a wgpu::TextureView>,
    pub depth: &'a wgpu::TextureView,
}

pub struct CubePass {
    pipelines: HashMap<(MaterialKind, Topology), wgpu::RenderPipeline>,
}

impl CubePass {
    /// Builds one pipeline for every distinct material kind and topology in
    /// `materials`. Materials of the same kind share render state.
    pub fn create(
        device: &wgpu::Device,
        common: &RenderCommon,
        mesh_bind_group_layout: &wgpu::BindGroupLayout,
        materials: impl IntoIterator<Item = (Material, Topology)>,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(CUBE_SHADER.name),
            source: ShaderSource::Wgsl(CUBE_SHADER.source.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cube pipeline layout"),
            bind_group_layouts: &[
                &common.global_uniform.bind_group_layout,
                mesh_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });

        let mut pipelines = HashMap::new();
        for (material, topology) in materials {
            let kind = material.kind();
            pipelines.entry((kind, topology)).or_insert_with(|| {
                Self::create_pipeline(
                    device,
                    common,
                    &layout,
                    &shader,
                    &format!("Cube pipeline ({kind:?}, {topology:?})"),
                    PipelineSettings::for_material(&material, topology),
                    topology,
                )
            });
        }

        Self { pipelines }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        common: &RenderCommon,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        label: &str,
        settings: PipelineSettings,
        topology: Topology,
    ) -> wgpu::RenderPipeline {
        let topology = match topology {
            Topology::Triangles => wgpu::PrimitiveTopology::TriangleList,
            Topology::Lines => wgpu::PrimitiveTopology::LineList,
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[MESH_VBL],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(settings.fragment_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format: common.output_surface_config.format,
                    blend: settings.blend,
                    write_mask: settings.write_mask,
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: settings.cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: RenderTarget::DEPTH_FORMAT,
                depth_write_enabled: settings.depth_write_enabled,
                // Edges lie exactly on the depth-only faces, so equal depth
                // has to pass.
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState {
                count: common.sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        })
    }

    /// Clears the targets and draws `meshes` in the order given.
    pub fn render<'m>(
        &self,
        texture_views: &CubePassTextureViews,
        encoder: &mut wgpu::CommandEncoder,
        globals: &wgpu::BindGroup,
        meshes: impl IntoIterator<Item = (MaterialKind, Topology, &'m RenderMesh)>,
    ) {
        let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Cube Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: texture_views.color,
                resolve_target: texture_views.resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: texture_views.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_bind_group(0, globals, &[]);

        for (kind, topology, mesh) in meshes {
            let Some(pipeline) = self.pipelines.get(&(kind, topology)) else {
                log::warn!("No pipeline for {:?} drawn as {:?}", kind, topology);
                continue;
            };

            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(1, &mesh.bind_group, &[]);
            render_pass.set_vertex_buffer(0, mesh.vertices.slice(..));
            render_pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.num_indices, 0, 0..1);
        }
    }
}
