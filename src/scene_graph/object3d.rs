use id_arena::Id;

use crate::geometry::GeometryId;
use crate::material::Material;
use crate::scene_graph::scene::Scene;
use crate::scene_graph::transform::Transform;

pub type ObjectId = Id<Object3D>;

#[derive(Debug, Clone, Copy)]
pub struct Mesh {
    pub geometry: GeometryId,
    pub material: Material,
    /// Meshes draw in ascending order, ties keep insertion order.
    pub render_order: i32,
}

pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    pub parent_id: Option<ObjectId>,
    pub child_ids: Vec<ObjectId>,
}

impl Object3D {
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh: Some(mesh),
            ..Default::default()
        }
    }

    pub fn parent<'a>(&self, scene: &'a Scene) -> Option<&'a Object3D> {
        self.parent_id.and_then(|id| scene.get_object(id))
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: Transform::new(),
            mesh: None,
            parent_id: None,
            child_ids: Vec::new(),
        }
    }
}
