use crate::core::math::interpolation::{Keyframe, sample_track};
use crate::core::math::transform::TransformFactory;
use crate::scene::light::Light;
use crate::scene::mesh::{Curve, Mesh};
use nalgebra::{Matrix4, Vector3};
use std::borrow::Cow;

/// Object payload, resolved once when the scene is built.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectData {
    Mesh(Mesh),
    Curve(Curve),
    /// Surface already evaluated to its preview mesh by the host.
    Surface(Mesh),
    /// Text already evaluated to its outline mesh by the host.
    Text(Mesh),
    Light(Light),
    /// Anything else (empties, cameras, ...). Never exported.
    Empty,
}

impl ObjectData {
    /// Mesh form of drawable objects; `None` for lights and empties.
    pub fn evaluated_mesh(&self) -> Option<Cow<'_, Mesh>> {
        match self {
            ObjectData::Mesh(mesh) | ObjectData::Surface(mesh) | ObjectData::Text(mesh) => {
                Some(Cow::Borrowed(mesh))
            }
            ObjectData::Curve(curve) => Some(Cow::Owned(curve.to_mesh())),
            ObjectData::Light(_) | ObjectData::Empty => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match self {
            ObjectData::Light(light) => Some(light),
            _ => None,
        }
    }
}

/// Location / rotation (XYZ euler, degrees) / scale, each optionally keyframed.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTransform {
    pub position: Vector3<f64>,
    pub rotation_deg: Vector3<f64>,
    pub scale: Vector3<f64>,
    pub position_keys: Vec<Keyframe<Vector3<f64>>>,
    pub rotation_keys: Vec<Keyframe<Vector3<f64>>>,
    pub scale_keys: Vec<Keyframe<Vector3<f64>>>,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation_deg: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            position_keys: Vec::new(),
            rotation_keys: Vec::new(),
            scale_keys: Vec::new(),
        }
    }
}

impl ObjectTransform {
    pub fn new(position: Vector3<f64>, rotation_deg: Vector3<f64>, scale: Vector3<f64>) -> Self {
        Self {
            position,
            rotation_deg,
            scale,
            ..Default::default()
        }
    }

    /// Applies keyframed values for `frame`; un-keyed channels keep their value.
    pub fn set_frame(&mut self, frame: i32) {
        if let Some(p) = sample_track(&self.position_keys, frame) {
            self.position = p;
        }
        if let Some(r) = sample_track(&self.rotation_keys, frame) {
            self.rotation_deg = r;
        }
        if let Some(s) = sample_track(&self.scale_keys, frame) {
            self.scale = s;
        }
    }

    pub fn matrix(&self) -> Matrix4<f64> {
        TransformFactory::object_to_world(&self.position, &self.rotation_deg, &self.scale)
    }
}

/// Represents an instance of an object in the scene with its own transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub visible: bool,
    /// Index into the scene's material list.
    pub material_id: usize,
    pub transform: ObjectTransform,
    pub data: ObjectData,
    matrix_world: Matrix4<f64>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, transform: ObjectTransform, data: ObjectData) -> Self {
        let matrix_world = transform.matrix();
        Self {
            name: name.into(),
            visible: true,
            material_id: 0,
            transform,
            data,
            matrix_world,
        }
    }

    pub fn with_material(mut self, material_id: usize) -> Self {
        self.material_id = material_id;
        self
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Object-to-world matrix for the currently active frame.
    pub fn matrix_world(&self) -> &Matrix4<f64> {
        &self.matrix_world
    }

    pub fn set_frame(&mut self, frame: i32) {
        self.transform.set_frame(frame);
        self.matrix_world = self.transform.matrix();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn curve_evaluates_to_mesh_lights_do_not() {
        let curve = ObjectData::Curve(Curve::new(
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
            false,
        ));
        assert_eq!(curve.evaluated_mesh().map(|m| m.edges.len()), Some(1));
        assert!(ObjectData::Light(Light::new_point(1.0)).evaluated_mesh().is_none());
        assert!(ObjectData::Empty.evaluated_mesh().is_none());
    }

    #[test]
    fn set_frame_refreshes_world_matrix() {
        let mut transform = ObjectTransform::default();
        transform.position_keys = vec![
            Keyframe::new(1, Vector3::zeros()),
            Keyframe::new(3, Vector3::new(4.0, 0.0, 0.0)),
        ];
        let mut obj = SceneObject::new("Cube", transform, ObjectData::Empty);
        obj.set_frame(2);
        let origin = obj.matrix_world().transform_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(2.0, 0.0, 0.0));
    }
}
