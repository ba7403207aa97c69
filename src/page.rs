use crate::{config::CubeConfig, fragments::CodeFragment, scroll::SectionRect};

/// Client size of the host element in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostSize {
    pub width: f64,
    pub height: f64,
}

impl HostSize {
    /// Hosts that report no size yet (hidden, not laid out) fall back to the
    /// configured defaults instead of producing a zero sized surface.
    pub fn or_default(self, config: &CubeConfig) -> Self {
        let pick = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };

        Self {
            width: pick(self.width, config.default_width),
            height: pick(self.height, config.default_height),
        }
    }

    pub fn aspect(&self) -> f32 {
        (self.width / self.height) as f32
    }
}

/// Where the canvas goes relative to its host, and how big its drawing buffer
/// is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLayout {
    pub host: HostSize,
    pub scale: f64,
    pub pixel_ratio: f64,
}

impl SurfaceLayout {
    pub fn new(host: HostSize, config: &CubeConfig, device_pixel_ratio: f64) -> Self {
        let pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(config.max_pixel_ratio)
        } else {
            1.0
        };

        Self {
            host: host.or_default(config),
            scale: config.surface_scale,
            pixel_ratio,
        }
    }

    pub fn css_size(&self) -> (f64, f64) {
        (self.host.width * self.scale, self.host.height * self.scale)
    }

    /// Drawing buffer size in physical pixels, never zero.
    pub fn physical_size(&self) -> (u32, u32) {
        let (width, height) = self.css_size();
        let to_pixels = |value: f64| ((value * self.pixel_ratio).round() as u32).max(1);
        (to_pixels(width), to_pixels(height))
    }

    /// Inline style for the canvas: centered on the host, oversized, and
    /// transparent to pointer events.
    pub fn css_text(&self) -> String {
        let offset = -((self.scale - 1.0) / 2.0) * 100.0;
        let extent = self.scale * 100.0;
        format!(
            "position:absolute;left:{offset:.2}%;top:{offset:.2}%;width:{extent:.2}%;height:{extent:.2}%;pointer-events:none;"
        )
    }
}

/// What the cube needs from the document it lives in.
///
/// Lookups return `None` when the element is missing; the cube treats that as
/// "skip this feature", never as an error.
pub trait Page {
    /// Whatever the page hands back for a freshly attached canvas.
    type Surface;

    fn element_size(&self, id: &str) -> Option<HostSize>;
    fn section_rect(&self, id: &str) -> Option<SectionRect>;
    fn viewport_height(&self) -> f64;
    fn device_pixel_ratio(&self) -> f64;

    /// True if a cube canvas already lives inside `host_id`.
    fn has_surface(&self, host_id: &str) -> bool;

    fn attach_surface(
        &mut self,
        host_id: &str,
        layout: &SurfaceLayout,
    ) -> anyhow::Result<Self::Surface>;

    /// Appends a fragment layer to the first element matching `selector`.
    /// Returns `false` if there is no such element.
    fn attach_fragments(
        &mut self,
        selector: &str,
        fragments: Vec<CodeFragment>,
    ) -> anyhow::Result<bool>;

    /// Takes a canvas from `attach_surface` back out of the page.
    fn remove_surface(&mut self, surface: Self::Surface);

    /// Removes the fragment layer this page attached, including one that is
    /// still waiting to be appended. No-op if there is none.
    fn remove_fragments(&mut self);
}
