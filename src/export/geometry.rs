use crate::core::math::angle::{direction_angle_deg, signed_angle_deg};
use crate::core::math::transform::{normal_matrix, transform_point};
use crate::export::projector::CameraProjector;
use crate::scene::scene_object::SceneObject;
use log::trace;
use nalgebra::{Point2, Point3, Vector2, Vector3};
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Normal data of one segment, compressed the way the renderer interpolates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeNormals {
    /// Absolute normal angle at the start vertex, degrees.
    pub start_angle: f64,
    /// Offset from start to end vertex, pixels (Y down).
    pub delta: Vector2<f64>,
    /// Normal angle at the end vertex relative to the start normal, degrees.
    pub end_angle: f64,
}

/// One exported segment: `[material, x, y]` or `[material, x, y, n1, dx, dy, n2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRecord {
    pub material_id: usize,
    /// Start point, pixels, top-left origin.
    pub start: Point2<f64>,
    pub normals: Option<EdgeNormals>,
}

impl Serialize for EdgeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.normals.is_some() { 7 } else { 3 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.material_id)?;
        seq.serialize_element(&self.start.x)?;
        seq.serialize_element(&self.start.y)?;
        if let Some(n) = &self.normals {
            seq.serialize_element(&n.start_angle)?;
            seq.serialize_element(&n.delta.x)?;
            seq.serialize_element(&n.delta.y)?;
            seq.serialize_element(&n.end_angle)?;
        }
        seq.end()
    }
}

/// Normal-related export options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalOptions {
    pub export: bool,
    pub invert: bool,
}

/// Walks the edges of every visible drawable object, in object then edge order.
///
/// Lights, empties and hidden objects contribute nothing. Edges marked as
/// excluded are skipped. No sorting or deduplication happens here.
pub fn extract_edges(
    objects: &[SceneObject],
    projector: &CameraProjector,
    options: NormalOptions,
) -> Vec<EdgeRecord> {
    let mut records = Vec::new();

    for obj in objects {
        if !obj.visible {
            trace!("Skipping hidden object '{}'", obj.name);
            continue;
        }
        let Some(mesh) = obj.data.evaluated_mesh() else {
            continue;
        };

        let matrix = obj.matrix_world();
        let normal_to_world = normal_matrix(matrix);

        for edge in mesh.edges.iter().filter(|e| !e.excluded) {
            let Some((a, b)) = mesh.edge_vertices(edge) else {
                trace!("Edge {:?} of '{}' has a dangling index", edge.vertices, obj.name);
                continue;
            };

            let v1 = transform_point(matrix, &a.position);
            let v2 = transform_point(matrix, &b.position);
            let v1_cam = projector.view(&v1);
            let v2_cam = projector.view(&v2);

            let start = Point2::new(
                v1_cam.x * projector.width(),
                (1.0 - v1_cam.y) * projector.height(),
            );

            let normals = options.export.then(|| {
                let offset = |p: &Point3<f64>, n: &Vector3<f64>| {
                    p + (normal_to_world * n).try_normalize(1e-12).unwrap_or_else(Vector3::zeros)
                };
                let n1 = projector.direction(&v1, &offset(&v1, &a.normal));
                let n2 = projector.direction(&v2, &offset(&v2, &b.normal));

                let mut start_angle = direction_angle_deg(&n1);
                if options.invert {
                    start_angle += 180.0;
                }

                EdgeNormals {
                    start_angle,
                    delta: Vector2::new(
                        (v2_cam.x - v1_cam.x) * projector.width(),
                        (v1_cam.y - v2_cam.y) * projector.height(),
                    ),
                    // Flipping both normals leaves the angle between them unchanged.
                    end_angle: signed_angle_deg(&n1, &n2),
                }
            });

            records.push(EdgeRecord {
                material_id: obj.material_id,
                start,
                normals,
            });
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Edge, Vertex};
    use crate::export::projector::tests::TopView;
    use crate::scene::light::Light;
    use crate::scene::mesh::Mesh;
    use crate::scene::scene_object::{ObjectData, ObjectTransform};
    use approx::assert_relative_eq;

    /// A wall from (-2.5, -2.5) to (2.5, -2.5) whose normals point up (+Y).
    fn wall() -> Mesh {
        Mesh::new(
            vec![
                Vertex::new(Point3::new(-2.5, -2.5, 1.0), Vector3::y()),
                Vertex::new(Point3::new(2.5, -2.5, 1.0), Vector3::y()),
            ],
            vec![Edge::new(0, 1)],
        )
    }

    fn object(name: &str, data: ObjectData) -> SceneObject {
        SceneObject::new(name, ObjectTransform::default(), data)
    }

    #[test]
    fn start_point_is_y_flipped() {
        let objects = vec![object("wall", ObjectData::Mesh(wall()))];
        let projector = CameraProjector::with_size(&TopView, 1000.0, 1000.0);
        let edges = extract_edges(&objects, &projector, NormalOptions::default());

        assert_eq!(edges.len(), 1);
        assert_relative_eq!(edges[0].start, Point2::new(250.0, 750.0));
        assert!(edges[0].normals.is_none());
    }

    #[test]
    fn normals_are_absolute_then_relative() {
        let mut mesh = wall();
        // End vertex normal tilted towards +X by 45 degrees.
        mesh.vertices[1].normal = Vector3::new(1.0, 1.0, 0.0).normalize();
        let objects = vec![object("wall", ObjectData::Mesh(mesh))];
        let projector = CameraProjector::with_size(&TopView, 1000.0, 1000.0);
        let options = NormalOptions {
            export: true,
            invert: false,
        };

        let n = extract_edges(&objects, &projector, options)[0].normals.unwrap();
        assert_relative_eq!(n.start_angle, -90.0, epsilon = 1e-9);
        assert_relative_eq!(n.delta, Vector2::new(500.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(n.end_angle, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn inverted_normals_turn_start_angle_only() {
        let objects = vec![object("wall", ObjectData::Mesh(wall()))];
        let projector = CameraProjector::with_size(&TopView, 1000.0, 1000.0);
        let options = NormalOptions {
            export: true,
            invert: true,
        };

        let n = extract_edges(&objects, &projector, options)[0].normals.unwrap();
        assert_relative_eq!(n.start_angle, 90.0, epsilon = 1e-9);
        assert_relative_eq!(n.end_angle, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn skips_hidden_objects_excluded_edges_and_lights() {
        let mut marked = wall();
        marked.edges.push(Edge {
            vertices: [1, 0],
            excluded: true,
        });
        let objects = vec![
            object("hidden", ObjectData::Mesh(wall())).with_visibility(false),
            object("marked", ObjectData::Mesh(marked)).with_material(2),
            object("lamp", ObjectData::Light(Light::new_point(1.0))),
            object("empty", ObjectData::Empty),
        ];
        let projector = CameraProjector::with_size(&TopView, 100.0, 100.0);
        let edges = extract_edges(&objects, &projector, NormalOptions::default());

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].material_id, 2);
    }

    #[test]
    fn wire_shape_with_and_without_normals() {
        let plain = EdgeRecord {
            material_id: 1,
            start: Point2::new(2.0, 3.0),
            normals: None,
        };
        assert_eq!(serde_json::to_string(&plain).unwrap(), "[1,2.0,3.0]");

        let full = EdgeRecord {
            normals: Some(EdgeNormals {
                start_angle: 90.0,
                delta: Vector2::new(4.0, -5.0),
                end_angle: 0.0,
            }),
            ..plain
        };
        assert_eq!(
            serde_json::to_string(&full).unwrap(),
            "[1,2.0,3.0,90.0,4.0,-5.0,0.0]"
        );
    }
}
