use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use id_arena::Id;
use itertools::iproduct;

pub type GeometryId = Id<Geometry>;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    Triangles,
    Lines,
}

pub struct Geometry {
    pub name: String,
    pub topology: Topology,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

// (normal, u, v) with u x v == normal, so faces wind counter-clockwise
// when seen from outside the box
const BOX_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::Z, Vec3::X),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y, Vec3::X),
];

impl Geometry {
    /// Axis-aligned cube centered on the origin, four vertices per face so
    /// every face gets a flat normal.
    pub fn cube(name: impl Into<String>, size: f32) -> Self {
        let half = size * 0.5;
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u, v) in BOX_FACES {
            let base = vertices.len() as u32;
            let corners = [-u - v, u - v, u + v, -u + v];

            vertices.extend(corners.iter().map(|corner| Vertex {
                position: (normal + *corner) * half,
                normal,
            }));
            indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self {
            name: name.into(),
            topology: Topology::Triangles,
            vertices,
            indices,
        }
    }

    /// The twelve edges of a cube as a line list.
    pub fn cube_edges(name: impl Into<String>, size: f32) -> Self {
        let half = size * 0.5;
        let axes = [Vec3::X, Vec3::Y, Vec3::Z];
        let mut vertices = Vec::with_capacity(24);

        for (axis, a, b) in iproduct!(0..3, [-half, half], [-half, half]) {
            let along = axes[axis];
            let across = axes[(axis + 1) % 3] * a + axes[(axis + 2) % 3] * b;

            for end in [-half, half] {
                vertices.push(Vertex {
                    position: across + along * end,
                    normal: Vec3::ZERO,
                });
            }
        }

        let indices = (0..vertices.len() as u32).collect();

        Self {
            name: name.into(),
            topology: Topology::Lines,
            vertices,
            indices,
        }
    }
}
