//! Fixed cube topology: positions, winding, colors and vertex adjacency
use nalgebra::Point3;

use crate::error::{Error, Result};

pub const VERTEX_COUNT: usize = 8;
pub const TRIANGLE_COUNT: usize = 12;
pub const INDEX_COUNT: usize = TRIANGLE_COUNT * 3;

/// Unit cube centered at the origin, ±1 on each axis
pub const CUBE_POSITIONS: [[f32; 3]; VERTEX_COUNT] = [
    [-1.0, -1.0, -1.0], // 0
    [-1.0, 1.0, -1.0],  // 1
    [1.0, -1.0, -1.0],  // 2
    [1.0, 1.0, -1.0],   // 3
    [1.0, -1.0, 1.0],   // 4
    [1.0, 1.0, 1.0],    // 5
    [-1.0, -1.0, 1.0],  // 6
    [-1.0, 1.0, 1.0],   // 7
];

/// Triangle list; two consecutive entries make up one side of the cube.
/// The winding of each triple decides the sign of its face normal.
pub const CUBE_TRIANGLES: [[u16; 3]; TRIANGLE_COUNT] = [
    [0, 1, 2],
    [2, 1, 3],
    [2, 3, 4],
    [4, 3, 5],
    [4, 5, 6],
    [6, 5, 7],
    [6, 7, 0],
    [0, 7, 1],
    [6, 0, 2],
    [2, 4, 6],
    [7, 5, 3],
    [7, 3, 1],
];

pub const CUBE_COLORS: [[f32; 3]; VERTEX_COUNT] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// Triangles touching each vertex, indexed by vertex id.
///
/// Must agree with [`CUBE_TRIANGLES`]; `derive_adjacency` rebuilds the same
/// table from the index list and the tests hold the two together.
pub const CUBE_ADJACENCY: [&[usize]; VERTEX_COUNT] = [
    &[0, 6, 7, 8],
    &[0, 1, 7, 11],
    &[0, 1, 2, 8, 9],
    &[1, 2, 3, 10, 11],
    &[2, 3, 4, 9],
    &[3, 4, 5, 10],
    &[4, 5, 6, 8, 9],
    &[5, 6, 7, 10, 11],
];

/// A triangle resolved to its three corner positions, in winding order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<f32>; 3],
}

impl Triangle {
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Resolve triangle `index` of the cube against [`CUBE_POSITIONS`]
    pub fn from_cube(index: usize) -> Self {
        let [i0, i1, i2] = CUBE_TRIANGLES[index];
        Self::new(position(i0), position(i1), position(i2))
    }
}

fn position(index: u16) -> Point3<f32> {
    let [x, y, z] = CUBE_POSITIONS[index as usize];
    Point3::new(x, y, z)
}

/// Build the vertex → triangle map for an arbitrary triangle list.
///
/// Triangle ids appear in ascending order and a triangle is listed once per
/// vertex even if it references that vertex twice.
pub fn derive_adjacency(triangles: &[[u16; 3]], vertex_count: usize) -> Result<Vec<Vec<usize>>> {
    let mut adjacency = vec![Vec::new(); vertex_count];

    for (triangle, indices) in triangles.iter().enumerate() {
        for &index in indices {
            let index = index as usize;
            if index >= vertex_count {
                return Err(Error::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count,
                });
            }
            let touching = &mut adjacency[index];
            if touching.last() != Some(&triangle) {
                touching.push(triangle);
            }
        }
    }

    Ok(adjacency)
}

pub fn flat_positions() -> [f32; VERTEX_COUNT * 3] {
    flatten(&CUBE_POSITIONS)
}

pub fn flat_colors() -> [f32; VERTEX_COUNT * 3] {
    flatten(&CUBE_COLORS)
}

pub fn flat_indices() -> [u16; INDEX_COUNT] {
    let mut out = [0u16; INDEX_COUNT];
    for (chunk, triangle) in out.chunks_exact_mut(3).zip(CUBE_TRIANGLES.iter()) {
        chunk.copy_from_slice(triangle);
    }
    out
}

pub(crate) fn flatten(rows: &[[f32; 3]; VERTEX_COUNT]) -> [f32; VERTEX_COUNT * 3] {
    let mut out = [0.0f32; VERTEX_COUNT * 3];
    for (chunk, row) in out.chunks_exact_mut(3).zip(rows.iter()) {
        chunk.copy_from_slice(row);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_adjacency_matches_topology() {
        let derived = derive_adjacency(&CUBE_TRIANGLES, VERTEX_COUNT).unwrap();
        for (vertex, expected) in CUBE_ADJACENCY.iter().enumerate() {
            assert_eq!(&derived[vertex][..], *expected, "vertex {vertex}");
        }
    }

    #[test]
    fn test_every_vertex_touches_three_to_five_triangles() {
        for touching in CUBE_ADJACENCY {
            assert!((3..=5).contains(&touching.len()));
        }
    }

    #[test]
    fn test_derive_adjacency_rejects_out_of_range_index() {
        let err = derive_adjacency(&[[0, 1, 2], [1, 2, 9]], 8).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange {
                triangle: 1,
                index: 9,
                vertex_count: 8
            }
        ));
    }

    #[test]
    fn test_derive_adjacency_lists_repeated_vertex_once() {
        let adjacency = derive_adjacency(&[[0, 0, 1]], 2).unwrap();
        assert_eq!(adjacency, vec![vec![0], vec![0]]);
    }

    #[test]
    fn test_flat_buffers_follow_vertex_order() {
        let positions = flat_positions();
        assert_eq!(&positions[9..12], &[1.0, 1.0, -1.0]);
        assert_eq!(&flat_colors()[9..12], &[1.0, 1.0, 1.0]);

        let indices = flat_indices();
        assert_eq!(indices.len(), 36);
        assert_eq!(&indices[33..36], &[7, 3, 1]);
    }

    #[test]
    fn test_triangle_from_cube_resolves_positions() {
        let triangle = Triangle::from_cube(1);
        assert_eq!(triangle.vertices[0], Point3::new(1.0, -1.0, -1.0));
        assert_eq!(triangle.vertices[1], Point3::new(-1.0, 1.0, -1.0));
        assert_eq!(triangle.vertices[2], Point3::new(1.0, 1.0, -1.0));
    }
}
