use crate::core::math::interpolation::{Keyframe, sample_track};
use crate::core::math::transform::{
    TransformFactory, apply_perspective_division, ndc_to_normalized,
};
use nalgebra::{Matrix4, Point3, Vector3};

/// World-to-camera-view mapping supplied by the host.
///
/// `x` and `y` of the result are normalized over the camera frame
/// (0..1, origin bottom-left, Y up). `z` is the depth along the view
/// direction, positive in front of the camera. Results for points with
/// `z <= 0` are unspecified; callers that care must check depth first.
pub trait Projector {
    fn world_to_camera_view(&self, point: &Point3<f64>) -> Point3<f64>;
}

#[derive(Debug, Clone)]
pub enum ProjectionType {
    Perspective { fov_y_rad: f64, aspect_ratio: f64 },
    Orthographic { height: f64, aspect_ratio: f64 },
}

/// Pinhole (or orthographic) camera. Manages the View and Projection matrices.
#[derive(Debug, Clone)]
pub struct Camera {
    // --- Common Parameters ---
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    pub near: f64,
    pub far: f64,

    // --- Projection Specifics ---
    pub projection_type: ProjectionType,

    // --- Animation ---
    pub position_keys: Vec<Keyframe<Vector3<f64>>>,
    pub target_keys: Vec<Keyframe<Vector3<f64>>>,

    // --- Cached Matrices ---
    view_matrix: Matrix4<f64>,
    projection_matrix: Matrix4<f64>,
}

impl Camera {
    pub fn new(
        position: Point3<f64>,
        target: Point3<f64>,
        up: Vector3<f64>,
        projection_type: ProjectionType,
        near: f64,
        far: f64,
    ) -> Self {
        let mut cam = Self {
            position,
            target,
            up,
            near,
            far,
            projection_type,
            position_keys: Vec::new(),
            target_keys: Vec::new(),
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_matrices();
        cam
    }

    pub fn new_perspective(
        position: Point3<f64>,
        target: Point3<f64>,
        up: Vector3<f64>,
        fov_y_rad: f64,
        aspect_ratio: f64,
        near: f64,
        far: f64,
    ) -> Self {
        Self::new(
            position,
            target,
            up,
            ProjectionType::Perspective {
                fov_y_rad,
                aspect_ratio,
            },
            near,
            far,
        )
    }

    pub fn new_orthographic(
        position: Point3<f64>,
        target: Point3<f64>,
        up: Vector3<f64>,
        height: f64, // View height
        aspect_ratio: f64,
        near: f64,
        far: f64,
    ) -> Self {
        Self::new(
            position,
            target,
            up,
            ProjectionType::Orthographic {
                height,
                aspect_ratio,
            },
            near,
            far,
        )
    }

    /// Moves the camera to its animated pose for `frame`. Un-keyed parameters are left as they are.
    pub fn set_frame(&mut self, frame: i32) {
        if let Some(p) = sample_track(&self.position_keys, frame) {
            self.position = Point3::from(p);
        }
        if let Some(t) = sample_track(&self.target_keys, frame) {
            self.target = Point3::from(t);
        }
        self.update_matrices();
    }

    /// Recalculates View and Projection matrices based on current parameters.
    pub fn update_matrices(&mut self) {
        self.view_matrix = TransformFactory::view(&self.position, &self.target, &self.up);

        self.projection_matrix = match self.projection_type {
            ProjectionType::Perspective {
                fov_y_rad,
                aspect_ratio,
            } => TransformFactory::perspective(aspect_ratio, fov_y_rad, self.near, self.far),

            ProjectionType::Orthographic {
                height,
                aspect_ratio,
            } => {
                let half_height = height / 2.0;
                let half_width = half_height * aspect_ratio;

                TransformFactory::orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        };
    }
}

impl Projector for Camera {
    fn world_to_camera_view(&self, point: &Point3<f64>) -> Point3<f64> {
        let view = self.view_matrix * point.to_homogeneous();
        let clip = self.projection_matrix * view;
        let ndc = apply_perspective_division(&clip);
        let normalized = ndc_to_normalized(ndc.x, ndc.y);
        Point3::new(normalized.x, normalized.y, -view.z)
    }
}
