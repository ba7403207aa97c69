use glam::Vec3;

use crate::{
    config::CubeConfig,
    geometry::Geometry,
    lighting::Light,
    material::{rgb, Material},
    scene_graph::{Mesh, Object3D, ObjectId, Scene},
};

/// Handles to the nodes the frame callback animates.
#[derive(Debug, Clone, Copy)]
pub struct CubeNodes {
    pub group: ObjectId,
    pub depth_mesh: ObjectId,
    pub faces: ObjectId,
    pub outer_wire: ObjectId,
    pub inner_wire: ObjectId,
}

/// Builds the layered hidden-line cube and its lights.
///
/// The depth-only mesh draws first and fills the depth buffer with the front
/// faces, so the back edges of both wireframes fail the depth test. The faces
/// add a faint tint on top without touching depth.
pub fn build_cube_scene(config: &CubeConfig) -> (Scene, CubeNodes) {
    let mut scene = Scene::new();

    let box_geometry = scene.add_geometry(Geometry::cube("Cube", config.cube_size));
    let edges = scene.add_geometry(Geometry::cube_edges("Cube edges", config.cube_size));

    let group = scene.add_object(Object3D::group("Cube group"));

    let depth_mesh = scene.add_child(
        group,
        Object3D::mesh(
            "Depth mesh",
            Mesh {
                geometry: box_geometry,
                material: Material::DepthOnly,
                render_order: 0,
            },
        ),
    );

    let faces = scene.add_child(
        group,
        Object3D::mesh(
            "Faces",
            Mesh {
                geometry: box_geometry,
                material: Material::Phong {
                    color: rgb(0x667eea),
                    emissive: rgb(0x3344bb),
                    opacity: 0.10,
                },
                render_order: 1,
            },
        ),
    );

    let outer_wire = scene.add_child(
        group,
        Object3D::mesh(
            "Outer wireframe",
            Mesh {
                geometry: edges,
                material: Material::Line {
                    color: rgb(0xaab8ff),
                    opacity: 1.0,
                },
                render_order: 2,
            },
        ),
    );

    let inner_wire = scene.add_child(
        group,
        Object3D::mesh(
            "Inner wireframe",
            Mesh {
                geometry: edges,
                material: Material::Line {
                    color: rgb(0xd0b4ff),
                    opacity: 0.55,
                },
                render_order: 3,
            },
        ),
    );

    // Same edges, shrunk in place
    scene.set_object_scale(inner_wire, config.inner_cube_ratio);

    add_lights(&mut scene);
    scene.update();

    (
        scene,
        CubeNodes {
            group,
            depth_mesh,
            faces,
            outer_wire,
            inner_wire,
        },
    )
}

fn add_lights(scene: &mut Scene) {
    scene.add_light(Light::Ambient {
        color: rgb(0xffffff),
        intensity: 1.2,
    });

    // key
    scene.add_light(Light::Directional {
        color: rgb(0x8899ff),
        intensity: 4.0,
        position: Vec3::new(3.0, 4.0, 5.0),
    });

    // rim
    scene.add_light(Light::Directional {
        color: rgb(0xcc99ff),
        intensity: 2.5,
        position: Vec3::new(-4.0, -2.0, -3.0),
    });

    scene.add_light(Light::Point {
        color: rgb(0x667eea),
        intensity: 3.0,
        position: Vec3::new(0.0, 0.0, 4.0),
        range: 12.0,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialKind;

    #[test]
    fn cube_layers_draw_in_ascending_order() {
        let (scene, nodes) = build_cube_scene(&CubeConfig::default());

        let order = scene
            .meshes_in_render_order()
            .into_iter()
            .map(|(id, _, _)| id)
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            [nodes.depth_mesh, nodes.faces, nodes.outer_wire, nodes.inner_wire]
        );
    }

    #[test]
    fn all_layers_belong_to_the_group() {
        let (scene, nodes) = build_cube_scene(&CubeConfig::default());
        let group = scene.get_object(nodes.group).unwrap();
        assert_eq!(group.child_ids.len(), 4);
        assert!(group.mesh.is_none());
    }

    #[test]
    fn depth_mesh_and_faces_share_geometry() {
        let (scene, nodes) = build_cube_scene(&CubeConfig::default());
        let mesh_of = |id| scene.get_object(id).and_then(|o| o.mesh).unwrap();

        let depth = mesh_of(nodes.depth_mesh);
        let faces = mesh_of(nodes.faces);
        assert_eq!(depth.geometry, faces.geometry);
        assert_eq!(depth.material.kind(), MaterialKind::DepthOnly);
        assert_eq!(faces.material.kind(), MaterialKind::Phong);
    }

    #[test]
    fn inner_wire_is_a_scaled_copy_of_the_outer_edges() {
        let config = CubeConfig::default();
        let (scene, nodes) = build_cube_scene(&config);
        let mesh_of = |id| scene.get_object(id).and_then(|o| o.mesh).unwrap();

        let inner = mesh_of(nodes.inner_wire);
        assert_eq!(inner.geometry, mesh_of(nodes.outer_wire).geometry);
        assert_eq!(scene.geometries.len(), 2);

        let geometry = scene.get_geometry(inner.geometry).unwrap();
        let world = *scene
            .get_object(nodes.inner_wire)
            .unwrap()
            .transform
            .world_matrix();
        let extent = geometry
            .vertices
            .iter()
            .map(|v| world.transform_point3(v.position).x.abs())
            .fold(0.0, f32::max);
        assert!((extent - 1.9 * 0.52 * 0.5).abs() < 1e-5);
    }

    #[test]
    fn one_ambient_two_directional_one_point() {
        let (scene, _) = build_cube_scene(&CubeConfig::default());
        assert_eq!(scene.lights.len(), 4);
        assert!(matches!(scene.lights[0], Light::Ambient { .. }));
        assert!(matches!(scene.lights[3], Light::Point { range, .. } if range == 12.0));
    }
}
