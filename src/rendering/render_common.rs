use crate::rendering::global_uniform::{GlobalUniform, GlobalUniformState};

pub struct RenderCommon {
    pub output_surface_config: wgpu::SurfaceConfiguration,
    pub global_uniform: GlobalUniform,
    pub sample_count: u32,
}

impl RenderCommon {
    pub fn new(
        device: &wgpu::Device,
        adapter: &wgpu::Adapter,
        surface: &wgpu::Surface,
        (width, height): (u32, u32),
        requested_samples: u32,
        initial_globals: GlobalUniformState,
    ) -> Self {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        // The canvas sits on top of page content, so keep it see-through
        // wherever the backend allows.
        let alpha_mode = [
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ]
        .into_iter()
        .find(|mode| surface_caps.alpha_modes.contains(mode))
        .unwrap_or(surface_caps.alpha_modes[0]);

        let output_surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(device, &output_surface_config);

        let supported_samples = adapter
            .get_texture_format_features(surface_format)
            .flags
            .supported_sample_counts();
        let sample_count = if supported_samples.contains(&requested_samples) {
            requested_samples
        } else {
            log::info!(
                "{}x MSAA not supported for {:?}, rendering without it",
                requested_samples,
                surface_format
            );
            1
        };

        let global_uniform = GlobalUniform::new(device, initial_globals);

        Self {
            output_surface_config,
            global_uniform,
            sample_count,
        }
    }
}
