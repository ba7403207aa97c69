use std::f32::consts::PI;

/// Tunables for the skills cube. Everything here has a sensible default that
/// matches the portfolio page markup; callers override fields before mounting.
#[derive(Debug, Clone)]
pub struct CubeConfig {
    /// Id of the element that hosts the canvas.
    pub host_id: String,
    /// Id of the section whose scroll progress drives the extra rotation.
    pub section_id: String,
    /// Selector of the element that receives the floating code fragments.
    pub background_selector: String,

    pub cube_size: f32,
    pub inner_cube_ratio: f32,

    /// The canvas is this much larger than its host so corners never clip
    /// while the cube rotates.
    pub surface_scale: f64,
    pub default_width: f64,
    pub default_height: f64,
    pub max_pixel_ratio: f64,
    pub sample_count: u32,

    pub camera_fov_degrees: f32,
    pub camera_distance: f32,

    pub tilt_x: f32,
    pub spin_rate: f32,
    pub inner_spin_rate: f32,
    pub scroll_range: f32,
    pub scroll_tilt_factor: f32,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            host_id: "skills-cube".to_string(),
            section_id: "skills".to_string(),
            background_selector: ".scroll-animation-container".to_string(),

            cube_size: 1.9,
            inner_cube_ratio: 0.52,

            surface_scale: 1.3,
            default_width: 460.0,
            default_height: 520.0,
            max_pixel_ratio: 2.0,
            sample_count: 4,

            camera_fov_degrees: 40.0,
            camera_distance: 5.5,

            // ~23 degrees, keeps three faces in view
            tilt_x: 0.40,
            spin_rate: 0.28,
            inner_spin_rate: 0.35,
            scroll_range: PI * 0.7,
            scroll_tilt_factor: 0.25,
        }
    }
}
