use glam::{EulerRot, Quat};

use crate::config::CubeConfig;

/// Euler angles (radians, XYZ order) applied to the cube group each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeRotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl CubeRotation {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Rotation of the whole cube group. A pure function of elapsed time and
    /// the current scroll offset, so nothing accumulates between frames.
    pub fn group(config: &CubeConfig, time: f32, scroll_offset: f32) -> Self {
        Self {
            x: config.tilt_x + scroll_offset * config.scroll_tilt_factor,
            y: time * config.spin_rate + scroll_offset,
            // locked, no wobble
            z: 0.0,
        }
    }

    /// The inner wireframe counter-spins around Y only.
    pub fn inner(config: &CubeConfig, time: f32) -> Self {
        Self {
            x: 0.0,
            y: -time * config.inner_spin_rate,
            z: 0.0,
        }
    }

    pub fn to_quat(self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spin_never_reverses() {
        let config = CubeConfig::default();

        for offset in [0.0, 0.5, config.scroll_range] {
            let mut last = f32::NEG_INFINITY;
            for frame in 0..600 {
                let time = frame as f32 / 60.0;
                let rotation = CubeRotation::group(&config, time, offset);
                assert!(rotation.y > last);
                last = rotation.y;
            }
        }
    }

    #[test]
    fn z_is_always_locked() {
        let config = CubeConfig::default();

        for time in [0.0, 1.0, 17.5, 3600.0] {
            for offset in [0.0, 0.3, config.scroll_range, -1.0] {
                assert_eq!(CubeRotation::group(&config, time, offset).z, 0.0);
                assert_eq!(CubeRotation::inner(&config, time).z, 0.0);
            }
        }
    }

    #[test]
    fn scroll_nudges_tilt_and_spin() {
        let config = CubeConfig::default();
        let rest = CubeRotation::group(&config, 2.0, 0.0);
        let scrolled = CubeRotation::group(&config, 2.0, 1.0);

        assert!((rest.x - 0.40).abs() < 1e-6);
        assert!((scrolled.x - 0.65).abs() < 1e-6);
        assert!((scrolled.y - rest.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn inner_wire_counter_rotates() {
        let config = CubeConfig::default();
        let inner = CubeRotation::inner(&config, 10.0);
        assert!((inner.y + 3.5).abs() < 1e-5);
        assert_eq!(inner.x, 0.0);
    }
}
