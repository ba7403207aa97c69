use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Vec3,
        intensity: f32,
    },
    /// Shines from `position` towards the origin.
    Directional {
        color: Vec3,
        intensity: f32,
        position: Vec3,
    },
    Point {
        color: Vec3,
        intensity: f32,
        position: Vec3,
        range: f32,
    },
}

/// GPU layout of a light. `kind` is 0 ambient, 1 directional, 2 point.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Default)]
pub struct LightUniform {
    pub color_intensity: [f32; 4],
    pub position_range: [f32; 4],
    pub kind: [u32; 4],
}

impl From<&Light> for LightUniform {
    fn from(light: &Light) -> Self {
        match *light {
            Light::Ambient { color, intensity } => Self {
                color_intensity: color.extend(intensity).to_array(),
                position_range: [0.0; 4],
                kind: [0; 4],
            },
            Light::Directional {
                color,
                intensity,
                position,
            } => Self {
                color_intensity: color.extend(intensity).to_array(),
                position_range: position.normalize_or_zero().extend(0.0).to_array(),
                kind: [1, 0, 0, 0],
            },
            Light::Point {
                color,
                intensity,
                position,
                range,
            } => Self {
                color_intensity: color.extend(intensity).to_array(),
                position_range: position.extend(range).to_array(),
                kind: [2, 0, 0, 0],
            },
        }
    }
}
