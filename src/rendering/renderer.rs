use std::collections::HashMap;

use anyhow::Context;
use wgpu::CommandEncoderDescriptor;

use crate::{
    cube::SkillsCube,
    rendering::{
        global_uniform::GlobalUniformState,
        mesh_buffers::{MeshUniform, RenderMesh},
        passes::cube_pass::{CubePass, CubePassTextureViews},
        render_common::RenderCommon,
        texture::RenderTarget,
    },
    scene_graph::ObjectId,
};

pub struct Renderer {
    pub size: (u32, u32),

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,

    common: RenderCommon,
    depth_target: RenderTarget,
    msaa_target: Option<RenderTarget>,
    meshes: HashMap<ObjectId, RenderMesh>,

    cube_pass: CubePass,
}

impl Renderer {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        cube: &SkillsCube,
    ) -> anyhow::Result<Renderer> {
        let backends = if cfg!(target_arch = "wasm32") {
            wgpu::Backends::GL
        } else {
            wgpu::Backends::PRIMARY
        };

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface = instance
            .create_surface(target)
            .context("Failed to create rendering surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No graphics adapter for the cube surface")?;

        let required_limits = if cfg!(target_arch = "wasm32") {
            wgpu::Limits::downlevel_webgl2_defaults()
        } else {
            wgpu::Limits::downlevel_defaults()
        }
        .using_resolution(adapter.limits());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits,
                label: Some("Cube device"),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create graphics device")?;

        let common = RenderCommon::new(
            &device,
            &adapter,
            &surface,
            size,
            cube.config.sample_count,
            GlobalUniformState::new(&cube.camera, &cube.scene.lights),
        );

        let (depth_target, msaa_target) = Self::create_targets(&device, &common);

        let mesh_layout = RenderMesh::bind_group_layout(&device);
        let materials = cube
            .scene
            .meshes_in_render_order()
            .into_iter()
            .filter_map(|(_, _, mesh)| {
                let geometry = cube.scene.get_geometry(mesh.geometry)?;
                Some((mesh.material, geometry.topology))
            })
            .collect::<Vec<_>>();
        let cube_pass = CubePass::create(&device, &common, &mesh_layout, materials);

        let mut meshes = HashMap::new();
        for (id, object, mesh) in cube.scene.meshes_in_render_order() {
            let geometry = cube
                .scene
                .get_geometry(mesh.geometry)
                .with_context(|| format!("Mesh {} has no geometry", object.name))?;

            let uniform = MeshUniform::new(
                *object.transform.world_matrix(),
                *object.transform.normal_matrix(),
                &mesh.material,
            );

            meshes.insert(
                id,
                RenderMesh::new(&device, &mesh_layout, &object.name, geometry, uniform),
            );
        }

        log::info!(
            "Renderer ready: {:?}, {}x{}, {} meshes, {}x MSAA",
            adapter.get_info().backend,
            common.output_surface_config.width,
            common.output_surface_config.height,
            meshes.len(),
            common.sample_count
        );

        Ok(Self {
            size: (
                common.output_surface_config.width,
                common.output_surface_config.height,
            ),
            surface,
            device,
            queue,
            common,
            depth_target,
            msaa_target,
            meshes,
            cube_pass,
        })
    }

    fn create_targets(
        device: &wgpu::Device,
        common: &RenderCommon,
    ) -> (RenderTarget, Option<RenderTarget>) {
        let config = &common.output_surface_config;
        let depth = RenderTarget::depth(device, config, common.sample_count, "Cube depth");
        let msaa = (common.sample_count > 1).then(|| {
            RenderTarget::multisampled_color(device, config, common.sample_count, "Cube MSAA color")
        });
        (depth, msaa)
    }

    pub fn resize(&mut self, (width, height): (u32, u32)) {
        if width == 0 || height == 0 {
            return;
        }

        self.size = (width, height);
        let config = &mut self.common.output_surface_config;
        config.width = width;
        config.height = height;
        self.surface.configure(&self.device, config);

        self.depth_target.resize(&self.device, config);
        if let Some(msaa) = self.msaa_target.as_mut() {
            msaa.resize(&self.device, config);
        }
    }

    /// Reconfigures the surface at its current size, for lost or outdated
    /// surfaces.
    pub fn reconfigure(&mut self) {
        self.resize(self.size);
    }

    pub fn render(&mut self, cube: &SkillsCube) -> Result<(), wgpu::SurfaceError> {
        self.common.global_uniform.update(
            &self.queue,
            GlobalUniformState::new(&cube.camera, &cube.scene.lights),
        );

        let ordered = cube.scene.meshes_in_render_order();
        for (id, object, mesh) in &ordered {
            if let Some(render_mesh) = self.meshes.get(id) {
                render_mesh.update(
                    &self.queue,
                    MeshUniform::new(
                        *object.transform.world_matrix(),
                        *object.transform.normal_matrix(),
                        &mesh.material,
                    ),
                );
            }
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let texture_views = match &self.msaa_target {
            Some(msaa) => CubePassTextureViews {
                color: msaa.view(),
                resolve_target: Some(&view),
                depth: self.depth_target.view(),
            },
            None => CubePassTextureViews {
                color: &view,
                resolve_target: None,
                depth: self.depth_target.view(),
            },
        };

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Cube Encoder"),
            });

        let draws = ordered.iter().filter_map(|(id, _, mesh)| {
            let topology = cube.scene.get_geometry(mesh.geometry)?.topology;
            let render_mesh = self.meshes.get(id)?;
            Some((mesh.material.kind(), topology, render_mesh))
        });

        self.cube_pass.render(
            &texture_views,
            &mut encoder,
            &self.common.global_uniform.bind_group,
            draws,
        );

        self.queue.submit([encoder.finish()]);
        output.present();

        Ok(())
    }
}
