use glam::Vec3;

/// Converts a `0xRRGGBB` literal to linear-ish float RGB.
pub fn rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Writes depth but no color, so anything drawn later behind it is
    /// hidden. Only front faces are rasterized.
    DepthOnly,
    /// Lit translucent surface. Never writes depth.
    Phong {
        color: Vec3,
        emissive: Vec3,
        opacity: f32,
    },
    /// Unlit lines, depth tested against whatever was drawn before.
    Line { color: Vec3, opacity: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    DepthOnly,
    Phong,
    Line,
}

impl Material {
    pub fn kind(&self) -> MaterialKind {
        match self {
            Material::DepthOnly => MaterialKind::DepthOnly,
            Material::Phong { .. } => MaterialKind::Phong,
            Material::Line { .. } => MaterialKind::Line,
        }
    }

    pub fn writes_color(&self) -> bool {
        !matches!(self, Material::DepthOnly)
    }

    pub fn writes_depth(&self) -> bool {
        !matches!(self, Material::Phong { .. })
    }

    pub fn color(&self) -> Vec3 {
        match self {
            Material::DepthOnly => Vec3::ZERO,
            Material::Phong { color, .. } | Material::Line { color, .. } => *color,
        }
    }

    pub fn emissive(&self) -> Vec3 {
        match self {
            Material::Phong { emissive, .. } => *emissive,
            _ => Vec3::ZERO,
        }
    }

    pub fn opacity(&self) -> f32 {
        match self {
            Material::DepthOnly => 0.0,
            Material::Phong { opacity, .. } | Material::Line { opacity, .. } => *opacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_unpack() {
        assert!(rgb(0xff0080).abs_diff_eq(Vec3::new(1.0, 0.0, 128.0 / 255.0), 1e-6));
    }

    #[test]
    fn depth_only_writes_depth_and_nothing_else() {
        let depth = Material::DepthOnly;
        assert!(depth.writes_depth());
        assert!(!depth.writes_color());

        let faces = Material::Phong {
            color: rgb(0x667eea),
            emissive: rgb(0x3344bb),
            opacity: 0.1,
        };
        assert!(!faces.writes_depth());
        assert!(faces.writes_color());

        let wire = Material::Line {
            color: rgb(0xaab8ff),
            opacity: 1.0,
        };
        assert!(wire.writes_depth());
        assert!(wire.writes_color());
    }
}
