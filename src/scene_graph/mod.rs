pub mod object3d;
pub mod scene;
pub mod transform;

pub use object3d::{Mesh, Object3D, ObjectId};
pub use scene::Scene;
pub use transform::Transform;
