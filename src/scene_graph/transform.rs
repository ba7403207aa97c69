use glam::{Mat3, Mat4, Quat, Vec3};
use std::cell::{Cell, Ref, RefCell};

use crate::animation::CubeRotation;

/// Rotation and uniform scale about the parent's origin.
#[derive(Debug, Clone)]
pub struct Transform {
    rotation: CubeRotation,
    scale: f32,

    local_matrix: RefCell<Mat4>,
    world_matrix: RefCell<Mat4>,
    normal_matrix: RefCell<Mat3>,
    local_dirty: Cell<bool>,
    world_dirty: Cell<bool>,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            rotation: CubeRotation::ZERO,
            scale: 1.0,
            local_matrix: RefCell::new(Mat4::IDENTITY),
            world_matrix: RefCell::new(Mat4::IDENTITY),
            normal_matrix: RefCell::new(Mat3::IDENTITY),
            local_dirty: Cell::new(true),
            world_dirty: Cell::new(true),
        }
    }

    pub fn local_matrix(&self) -> Ref<Mat4> {
        if self.local_dirty.get() {
            let matrix = Mat4::from_scale_rotation_translation(
                Vec3::splat(self.scale),
                self.rotation_quat(),
                Vec3::ZERO,
            );

            self.local_matrix.replace(matrix);
            self.local_dirty.set(false);
            self.invalidate_world();
        }

        self.local_matrix.borrow()
    }

    pub fn world_matrix(&self) -> Ref<Mat4> {
        self.world_matrix.borrow()
    }

    pub fn normal_matrix(&self) -> Ref<Mat3> {
        self.normal_matrix.borrow()
    }

    pub fn set_world_matrix(&self, world_matrix: Mat4) {
        self.world_matrix.replace(world_matrix);
        self.world_dirty.set(false);
        self.normal_matrix
            .replace(Mat3::from_mat4(world_matrix).inverse().transpose());
    }

    pub fn invalidate_local(&self) {
        self.local_dirty.set(true);
        self.world_dirty.set(true);
    }

    pub fn invalidate_world(&self) {
        self.world_dirty.set(true);
    }

    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty.get()
    }

    pub fn set_rotation(&mut self, rotation: CubeRotation) {
        self.rotation = rotation;
        self.invalidate_local();
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.invalidate_local();
    }

    pub fn rotation(&self) -> CubeRotation {
        self.rotation
    }

    pub fn rotation_quat(&self) -> Quat {
        self.rotation.to_quat()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_matrix_follows_rotation() {
        let mut transform = Transform::new();
        transform.set_rotation(CubeRotation {
            x: 0.0,
            y: std::f32::consts::FRAC_PI_2,
            z: 0.0,
        });

        let rotated = transform.local_matrix().transform_vector3(Vec3::X);
        assert!(rotated.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
        assert!(transform.is_world_dirty());

        let origin = transform.local_matrix().transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn scale_applies_before_rotation() {
        let mut transform = Transform::new();
        transform.set_scale(0.5);
        transform.set_rotation(CubeRotation {
            x: 0.0,
            y: std::f32::consts::PI,
            z: 0.0,
        });

        let point = transform.local_matrix().transform_point3(Vec3::new(2.0, 1.0, 0.0));
        assert!(point.abs_diff_eq(Vec3::new(-1.0, 0.5, 0.0), 1e-5));
    }
}
