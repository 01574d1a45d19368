use nalgebra::{Point3, Vector3};

/// Represents a single vertex in 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f64>,
    /// Vertex normal in local object space (unit length, or zero when undefined).
    pub normal: Vector3<f64>,
}

impl Vertex {
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }
}

/// An undirected edge between two vertices of the same mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub vertices: [u32; 2],
    /// Marked by the user as not to be exported.
    pub excluded: bool,
}

impl Edge {
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            vertices: [a, b],
            excluded: false,
        }
    }

    /// Order-independent identity of the edge, used for deduplicating face edges.
    #[inline]
    pub fn key(&self) -> (u32, u32) {
        let [a, b] = self.vertices;
        (a.min(b), a.max(b))
    }
}
