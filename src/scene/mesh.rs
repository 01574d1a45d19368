use crate::core::geometry::{Edge, Vertex};
use nalgebra::{Point3, Vector3};
use std::collections::HashSet;

/// Vertices plus the edge list the exporter walks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, edges: Vec<Edge>) -> Self {
        Self { vertices, edges }
    }

    /// Builds a mesh from polygon faces (vertex index loops).
    ///
    /// Edges are the unique undirected face boundaries in first-seen order.
    /// When `normals` is `None`, vertex normals are the area-weighted mean of
    /// the adjacent face normals.
    pub fn from_polygons(
        positions: Vec<Point3<f64>>,
        faces: &[Vec<u32>],
        normals: Option<Vec<Vector3<f64>>>,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for face in faces {
            if face.len() < 2 {
                continue;
            }
            for (i, &a) in face.iter().enumerate() {
                let b = face[(i + 1) % face.len()];
                // A two-vertex "face" is a loose edge, not a loop.
                if face.len() == 2 && i == 1 {
                    break;
                }
                let edge = Edge::new(a, b);
                if a != b && seen.insert(edge.key()) {
                    edges.push(edge);
                }
            }
        }

        let normals = normals.unwrap_or_else(|| smooth_normals(&positions, faces));
        let vertices = positions
            .into_iter()
            .enumerate()
            .map(|(i, p)| Vertex::new(p, normals.get(i).copied().unwrap_or_else(Vector3::zeros)))
            .collect();

        Self { vertices, edges }
    }

    /// Marks the edges between the given vertex pairs as excluded from export.
    /// Pairs are matched regardless of direction; unknown pairs are ignored.
    pub fn mark_excluded(&mut self, pairs: &[[u32; 2]]) {
        let marked: HashSet<(u32, u32)> = pairs
            .iter()
            .map(|&[a, b]| (a.min(b), a.max(b)))
            .collect();
        for edge in &mut self.edges {
            if marked.contains(&edge.key()) {
                edge.excluded = true;
            }
        }
    }

    /// Looks up both endpoints of an edge. `None` if an index is out of range.
    pub fn edge_vertices(&self, edge: &Edge) -> Option<(&Vertex, &Vertex)> {
        let [a, b] = edge.vertices;
        Some((self.vertices.get(a as usize)?, self.vertices.get(b as usize)?))
    }
}

/// Area-weighted vertex normals from polygon faces (fan-triangulated).
fn smooth_normals(positions: &[Point3<f64>], faces: &[Vec<u32>]) -> Vec<Vector3<f64>> {
    let mut normals = vec![Vector3::zeros(); positions.len()];
    for face in faces.iter().filter(|f| f.len() >= 3) {
        let Some(p0) = positions.get(face[0] as usize) else {
            continue;
        };
        let mut face_normal = Vector3::zeros();
        for pair in face[1..].windows(2) {
            let (Some(p1), Some(p2)) = (
                positions.get(pair[0] as usize),
                positions.get(pair[1] as usize),
            ) else {
                continue;
            };
            // Cross product length is twice the triangle area, which is the weight we want.
            face_normal += (p1 - p0).cross(&(p2 - p0));
        }
        for &idx in face {
            if let Some(n) = normals.get_mut(idx as usize) {
                *n += face_normal;
            }
        }
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize(1e-12).unwrap_or_else(Vector3::zeros))
        .collect()
}

/// A polyline curve lying in its local XY plane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curve {
    pub points: Vec<Point3<f64>>,
    /// Closes the polyline back to its first point.
    pub cyclic: bool,
}

impl Curve {
    pub fn new(points: Vec<Point3<f64>>, cyclic: bool) -> Self {
        Self { points, cyclic }
    }

    /// Evaluates the curve to a wire mesh.
    ///
    /// Each vertex normal is the in-plane perpendicular (segment direction
    /// turned -90 degrees about Z) averaged over its adjacent segments.
    pub fn to_mesh(&self) -> Mesh {
        let n = self.points.len();
        if n < 2 {
            return Mesh::default();
        }

        let segment_count = if self.cyclic && n > 2 { n } else { n - 1 };
        let edges: Vec<Edge> = (0..segment_count)
            .map(|i| Edge::new(i as u32, ((i + 1) % n) as u32))
            .collect();

        let mut normals = vec![Vector3::zeros(); n];
        for edge in &edges {
            let [a, b] = edge.vertices;
            let dir = self.points[b as usize] - self.points[a as usize];
            let perpendicular = Vector3::new(dir.y, -dir.x, 0.0)
                .try_normalize(1e-12)
                .unwrap_or_else(Vector3::zeros);
            normals[a as usize] += perpendicular;
            normals[b as usize] += perpendicular;
        }

        let vertices = self
            .points
            .iter()
            .zip(normals)
            .map(|(p, n)| Vertex::new(*p, n.try_normalize(1e-12).unwrap_or_else(Vector3::zeros)))
            .collect();

        Mesh::new(vertices, edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_quad() -> Mesh {
        Mesh::from_polygons(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            &[vec![0, 1, 2], vec![0, 2, 3]],
            None,
        )
    }

    #[test]
    fn shared_face_edges_are_deduplicated_in_first_seen_order() {
        let mesh = unit_quad();
        let keys: Vec<_> = mesh.edges.iter().map(|e| e.vertices).collect();
        assert_eq!(keys, vec![[0, 1], [1, 2], [2, 0], [2, 3], [3, 0]]);
    }

    #[test]
    fn computed_normals_point_along_face_normal() {
        let mesh = unit_quad();
        for v in &mesh.vertices {
            assert_relative_eq!(v.normal, Vector3::z(), epsilon = 1e-12);
        }
    }

    #[test]
    fn loose_edge_face_yields_single_edge() {
        let mesh = Mesh::from_polygons(
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
            &[vec![0, 1]],
            None,
        );
        assert_eq!(mesh.edges.len(), 1);
        assert_eq!(mesh.vertices[0].normal, Vector3::zeros());
    }

    #[test]
    fn excluded_edges_match_either_direction() {
        let mut mesh = unit_quad();
        mesh.mark_excluded(&[[0, 2], [3, 2]]);
        let excluded: Vec<_> = mesh
            .edges
            .iter()
            .filter(|e| e.excluded)
            .map(|e| e.vertices)
            .collect();
        assert_eq!(excluded, vec![[2, 0], [2, 3]]);
    }

    #[test]
    fn open_curve_normals_are_in_plane_perpendiculars() {
        let curve = Curve::new(
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)],
            false,
        );
        let mesh = curve.to_mesh();
        assert_eq!(mesh.edges.len(), 1);
        assert_relative_eq!(mesh.vertices[0].normal, Vector3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn cyclic_curve_closes_loop() {
        let curve = Curve::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            true,
        );
        let mesh = curve.to_mesh();
        assert_eq!(mesh.edges.len(), 3);
        assert_eq!(mesh.edges[2].vertices, [2, 0]);
    }
}
