//! Smooth per-vertex normals for the cube
//!
//! Face normals come straight from each triangle's winding. A vertex normal is
//! the renormalized, unweighted sum of the face normals of every triangle that
//! touches the vertex, which removes the faceted look under Gouraud shading.
use nalgebra::{Point3, Vector3};

use crate::geometry::{
    self, Triangle, CUBE_ADJACENCY, INDEX_COUNT, TRIANGLE_COUNT, VERTEX_COUNT,
};

/// Component value of the direction substituted for a zero-length face normal.
///
/// `f32::MIN_POSITIVE` is too small: its squared length underflows and
/// normalizing it produces infinities.
pub const DEGENERATE_NORMAL_EPSILON: f32 = 1e-4;

/// Compute the normal of the triangle `(v0, v1, v2)`.
///
/// The raw normal is `(v2 - v0) × (v1 - v0)`; swapping the operands flips
/// every normal of the mesh. When that product is exactly zero the triangle
/// is degenerate and `normalize((ε, ε, ε))` is returned instead.
pub fn compute_face_normal(v0: &Point3<f32>, v1: &Point3<f32>, v2: &Point3<f32>) -> Vector3<f32> {
    let e0 = v1 - v0;
    let e1 = v2 - v0;
    let raw = e1.cross(&e0);

    if raw.x == 0.0 && raw.y == 0.0 && raw.z == 0.0 {
        log::warn!("degenerate triangle ({v0}, {v1}, {v2}), substituting fallback normal");
        return degenerate_fallback();
    }

    raw.normalize()
}

pub fn degenerate_fallback() -> Vector3<f32> {
    Vector3::repeat(DEGENERATE_NORMAL_EPSILON).normalize()
}

impl Triangle {
    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = &self.vertices;
        compute_face_normal(v0, v1, v2)
    }
}

/// Sum the face normals listed in `adjacency[vertex]` and renormalize
pub fn compute_vertex_normal(
    vertex: usize,
    adjacency: &[&[usize]],
    face_normals: &[Vector3<f32>],
) -> Vector3<f32> {
    adjacency[vertex]
        .iter()
        .map(|&triangle| face_normals[triangle])
        .sum::<Vector3<f32>>()
        .normalize()
}

/// Face normals for all cube triangles, in triangle order
pub fn build_face_normals() -> [Vector3<f32>; TRIANGLE_COUNT] {
    std::array::from_fn(|index| Triangle::from_cube(index).calculate_normal())
}

/// Smoothed normals for all cube vertices, in vertex order
pub fn build_vertex_normals(face_normals: &[Vector3<f32>; TRIANGLE_COUNT]) -> [Vector3<f32>; VERTEX_COUNT] {
    std::array::from_fn(|vertex| compute_vertex_normal(vertex, &CUBE_ADJACENCY, face_normals))
}

pub fn flatten_normals(normals: &[Vector3<f32>; VERTEX_COUNT]) -> [f32; VERTEX_COUNT * 3] {
    let rows = normals.map(|n| [n.x, n.y, n.z]);
    geometry::flatten(&rows)
}

/// Everything the geometry upload needs, built once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct CubeGeometry {
    pub positions: [f32; VERTEX_COUNT * 3],
    pub normals: [f32; VERTEX_COUNT * 3],
    pub colors: [f32; VERTEX_COUNT * 3],
    pub indices: [u16; INDEX_COUNT],
}

impl CubeGeometry {
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn position(&self, vertex: usize) -> Point3<f32> {
        let p = &self.positions[vertex * 3..vertex * 3 + 3];
        Point3::new(p[0], p[1], p[2])
    }

    pub fn normal(&self, vertex: usize) -> Vector3<f32> {
        Vector3::from_column_slice(&self.normals[vertex * 3..vertex * 3 + 3])
    }

    pub fn color(&self, vertex: usize) -> [f32; 3] {
        let c = &self.colors[vertex * 3..vertex * 3 + 3];
        [c[0], c[1], c[2]]
    }
}

/// Build the cube's vertex buffers, including the smoothed normals
pub fn build_geometry() -> CubeGeometry {
    let face_normals = build_face_normals();
    let vertex_normals = build_vertex_normals(&face_normals);

    let geometry = CubeGeometry {
        positions: geometry::flat_positions(),
        normals: flatten_normals(&vertex_normals),
        colors: geometry::flat_colors(),
        indices: geometry::flat_indices(),
    };

    log::debug!(
        "built cube geometry: {} vertices, {} triangles, {} indices",
        geometry.vertex_count(),
        TRIANGLE_COUNT,
        geometry.index_count()
    );

    geometry
}
