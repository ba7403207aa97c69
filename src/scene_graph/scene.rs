use glam::Mat4;
use id_arena::Arena;
use itertools::Itertools;

use crate::animation::CubeRotation;
use crate::geometry::{Geometry, GeometryId};
use crate::lighting::Light;
use crate::scene_graph::object3d::{Mesh, Object3D, ObjectId};

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub geometries: Arena<Geometry>,
    pub lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            geometries: Arena::new(),
            lights: Vec::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    /// Adds `object` as a child of `parent`.
    pub fn add_child(&mut self, parent: ObjectId, object: Object3D) -> ObjectId {
        let id = self.add_object(object);
        self.set_object_parent(id, Some(parent));
        id
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.alloc(geometry)
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id)
    }

    /// Updates all object transforms in hierarchical order
    fn update_transforms(&self) {
        let root_objects = self
            .objects
            .iter()
            .filter(|(_, object)| object.parent_id.is_none())
            .map(|(id, _)| id);

        for root_id in root_objects {
            self.update_object_transform_recursive(root_id, Mat4::IDENTITY, false);
        }
    }

    fn update_object_transform_recursive(
        &self,
        object_id: ObjectId,
        parent_world_matrix: Mat4,
        parent_changed: bool,
    ) {
        let Some(object) = self.objects.get(object_id) else {
            return;
        };

        // Reading the local matrix flushes a pending rotation into the world
        // dirty flag, so it has to happen before the check.
        let local_matrix = *object.transform.local_matrix();
        let changed = parent_changed || object.transform.is_world_dirty();
        if changed {
            object
                .transform
                .set_world_matrix(parent_world_matrix * local_matrix);
        }

        let world_matrix = *object.transform.world_matrix();
        for &child_id in &object.child_ids {
            self.update_object_transform_recursive(child_id, world_matrix, changed);
        }
    }

    /// Sets the parent of an object and updates child relationships
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        if let Some(old_parent_id) = self.objects.get(child_id).and_then(|c| c.parent_id) {
            if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                old_parent.child_ids.retain(|&id| id != child_id);
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;
            child.transform.invalidate_world();
        }

        if let Some(new_parent) = new_parent_id.and_then(|id| self.objects.get_mut(id)) {
            new_parent.child_ids.push(child_id);
        }
    }

    pub fn set_object_rotation(&mut self, object_id: ObjectId, rotation: CubeRotation) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_rotation(rotation);
        }
    }

    pub fn set_object_scale(&mut self, object_id: ObjectId, scale: f32) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_scale(scale);
        }
    }

    /// Every mesh in the scene in the order it must be drawn.
    pub fn meshes_in_render_order(&self) -> Vec<(ObjectId, &Object3D, Mesh)> {
        self.objects
            .iter()
            .filter_map(|(id, object)| object.mesh.map(|mesh| (id, object, mesh)))
            .sorted_by_key(|(_, _, mesh)| mesh.render_order)
            .collect()
    }

    pub fn update(&mut self) {
        self.update_transforms();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::material::Material;

    #[test]
    fn child_inherits_parent_rotation() {
        let mut scene = Scene::new();
        let group = scene.add_object(Object3D::group("Group"));
        let child = scene.add_child(group, Object3D::group("Child"));

        scene.set_object_rotation(
            group,
            CubeRotation {
                x: 0.0,
                y: std::f32::consts::PI,
                z: 0.0,
            },
        );
        scene.update();

        let child_object = scene.get_object(child).unwrap();
        assert_eq!(child_object.parent(&scene).unwrap().name, "Group");

        let world = *child_object.transform.world_matrix();
        assert!(world
            .transform_vector3(Vec3::X)
            .abs_diff_eq(Vec3::NEG_X, 1e-5));

        // Child rotation composes on top of the parent's
        scene.set_object_rotation(
            child,
            CubeRotation {
                x: 0.0,
                y: std::f32::consts::PI,
                z: 0.0,
            },
        );
        scene.update();
        let world = *scene.get_object(child).unwrap().transform.world_matrix();
        assert!(world.transform_vector3(Vec3::X).abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn render_order_is_stable() {
        let mut scene = Scene::new();
        let geometry = scene.add_geometry(Geometry::cube("Cube", 1.0));
        let mesh = |render_order| Mesh {
            geometry,
            material: Material::DepthOnly,
            render_order,
        };

        scene.add_object(Object3D::mesh("c", mesh(2)));
        scene.add_object(Object3D::mesh("a", mesh(0)));
        scene.add_object(Object3D::group("no mesh"));
        scene.add_object(Object3D::mesh("d", mesh(2)));
        scene.add_object(Object3D::mesh("b", mesh(1)));

        let names = scene
            .meshes_in_render_order()
            .into_iter()
            .map(|(_, object, _)| object.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["a", "b", "c", "d"]);
    }
}
