/// An attachment that has to be recreated whenever the surface is resized:
/// the depth buffer, and the multisampled color target when MSAA is on.
pub struct RenderTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    label: String,
    format: wgpu::TextureFormat,
    sample_count: u32,
}

impl RenderTarget {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    pub fn depth(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
        label: impl Into<String>,
    ) -> Self {
        Self::new(device, config, Self::DEPTH_FORMAT, sample_count, label.into())
    }

    pub fn multisampled_color(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
        label: impl Into<String>,
    ) -> Self {
        Self::new(device, config, config.format, sample_count, label.into())
    }

    fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        format: wgpu::TextureFormat,
        sample_count: u32,
        label: String,
    ) -> Self {
        let texture = Self::create_wgpu_texture(device, config, format, sample_count, &label);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            _texture: texture,
            view,
            label,
            format,
            sample_count,
        }
    }

    fn create_wgpu_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        format: wgpu::TextureFormat,
        sample_count: u32,
        label: &str,
    ) -> wgpu::Texture {
        let size = wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        };

        device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) {
        let format = if self.format.is_depth_stencil_format() {
            self.format
        } else {
            config.format
        };
        let label = std::mem::take(&mut self.label);
        *self = Self::new(device, config, format, self.sample_count, label);
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}
