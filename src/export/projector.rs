use crate::core::math::angle::direction_angle_deg;
use crate::scene::camera::Projector;
use crate::scene::context::RenderSettings;
use nalgebra::{Matrix4, Point2, Point3, Vector2, Vector3};

/// Maps world points to the output's pixel grid through the host projection.
pub struct CameraProjector<'a> {
    projector: &'a dyn Projector,
    width: f64,
    height: f64,
}

impl<'a> CameraProjector<'a> {
    pub fn new(projector: &'a dyn Projector, render: &RenderSettings) -> Self {
        Self::with_size(projector, render.width(), render.height())
    }

    /// `width`/`height` are the already scaled output size in pixels.
    pub fn with_size(projector: &'a dyn Projector, width: f64, height: f64) -> Self {
        Self {
            projector,
            width,
            height,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Normalized camera-view coordinates plus depth, straight from the host.
    #[inline]
    pub fn view(&self, point: &Point3<f64>) -> Point3<f64> {
        self.projector.world_to_camera_view(point)
    }

    /// Pixel coordinates with the host's bottom-left origin (Y up).
    pub fn project(&self, point: &Point3<f64>) -> Point2<f64> {
        let v = self.view(point);
        Point2::new(v.x * self.width, v.y * self.height)
    }

    /// Pixel coordinates with a top-left origin (Y down), as the renderer expects.
    pub fn project_flipped(&self, point: &Point3<f64>) -> Point2<f64> {
        let p = self.project(point);
        Point2::new(p.x, self.height - p.y)
    }

    /// Unit screen-space direction from `p1` to `p2`, in the Y-up pixel frame.
    /// Zero when both points land on the same pixel position.
    pub fn direction(&self, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector2<f64> {
        (self.project(p2) - self.project(p1))
            .try_normalize(1e-12)
            .unwrap_or_else(Vector2::zeros)
    }

    /// Signed angle (degrees, (-180, 180]) of the screen vector `p1 -> p2` against (1, 0).
    pub fn direction_angle(&self, p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
        direction_angle_deg(&self.direction(p1, p2))
    }

    /// In-plane rotation of an object: the screen angle of its local -Z axis
    /// drawn from its world position.
    pub fn object_rotation(&self, matrix_world: &Matrix4<f64>) -> f64 {
        let origin = Point3::from(matrix_world.fixed_view::<3, 1>(0, 3).into_owned());
        let local_z: Vector3<f64> = matrix_world.fixed_view::<3, 1>(0, 2).into_owned();
        let forward = -local_z.try_normalize(1e-12).unwrap_or_else(Vector3::zeros);
        self.direction_angle(&origin, &(origin + forward))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::math::transform::TransformFactory;
    use approx::assert_relative_eq;

    /// Orthographic top view of the XY plane: world [-5, 5] maps onto the frame, depth is `z`.
    pub(crate) struct TopView;

    impl Projector for TopView {
        fn world_to_camera_view(&self, point: &Point3<f64>) -> Point3<f64> {
            Point3::new((point.x + 5.0) / 10.0, (point.y + 5.0) / 10.0, point.z)
        }
    }

    #[test]
    fn scales_by_scaled_resolution() {
        let projector = CameraProjector::with_size(&TopView, 1000.0, 500.0);
        let p = projector.project(&Point3::new(0.0, -2.5, 1.0));
        assert_relative_eq!(p, Point2::new(500.0, 125.0));
    }

    #[test]
    fn flipped_projection_uses_top_left_origin() {
        let projector = CameraProjector::with_size(&TopView, 1000.0, 1000.0);
        let p = projector.project_flipped(&Point3::new(0.0, -2.5, 1.0));
        assert_relative_eq!(p.y, 750.0);
    }

    #[test]
    fn direction_angle_of_screen_axes() {
        let projector = CameraProjector::with_size(&TopView, 800.0, 600.0);
        let o = Point3::new(0.0, 0.0, 1.0);
        assert_relative_eq!(projector.direction_angle(&o, &Point3::new(1.0, 0.0, 1.0)), 0.0);
        // World +Y is screen up, which is -90 in the Y-down document frame.
        assert_relative_eq!(projector.direction_angle(&o, &Point3::new(0.0, 1.0, 1.0)), -90.0);
    }

    #[test]
    fn direction_accounts_for_non_square_pixels() {
        let projector = CameraProjector::with_size(&TopView, 2000.0, 1000.0);
        let o = Point3::new(0.0, 0.0, 1.0);
        let angle = projector.direction_angle(&o, &Point3::new(1.0, -1.0, 1.0));
        // dx = 200 px, dy = -100 px (Y up): atan2(100, 200).
        assert_relative_eq!(angle, (0.5_f64).atan().to_degrees(), epsilon = 1e-9);
    }

    #[test]
    fn object_rotation_follows_local_minus_z() {
        let projector = CameraProjector::with_size(&TopView, 1000.0, 1000.0);
        // Turning -Z onto +X: -90 degrees about Y.
        let m = TransformFactory::object_to_world(
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(0.0, -90.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
        );
        assert_relative_eq!(projector.object_rotation(&m), 0.0, epsilon = 1e-9);

        // Then spin about Z by 90: -Z now points to world +Y, screen up.
        let m = TransformFactory::object_to_world(
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(0.0, -90.0, 90.0),
            &Vector3::new(1.0, 1.0, 1.0),
        );
        assert_relative_eq!(projector.object_rotation(&m), -90.0, epsilon = 1e-9);
    }
}
