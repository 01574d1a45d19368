use nalgebra::Vector2;

/// Canonical reference direction for screen angles.
#[inline]
pub fn reference_axis() -> Vector2<f64> {
    Vector2::x()
}

/// Signed angle in degrees that rotates `from` onto `to`, taking the shorter path.
///
/// Both vectors live in the Y-up frame of normalized camera space, and the
/// sign is clockwise-positive there. That is the plain `atan2` angle of the
/// same vectors in the Y-down pixel frame of the exported document, so no
/// explicit flip is needed on the result.
///
/// The result is in (-180, 180]. Zero-length inputs yield 0.
pub fn signed_angle_deg(from: &Vector2<f64>, to: &Vector2<f64>) -> f64 {
    let perp_dot = from.y * to.x - from.x * to.y;
    let dot = from.dot(to);
    if perp_dot == 0.0 && dot == 0.0 {
        return 0.0;
    }
    let angle = perp_dot.atan2(dot).to_degrees();
    if angle <= -180.0 { angle + 360.0 } else { angle }
}

/// Signed angle of `direction` measured from the reference axis (1, 0).
#[inline]
pub fn direction_angle_deg(direction: &Vector2<f64>) -> f64 {
    signed_angle_deg(&reference_axis(), direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_axis_is_zero() {
        assert_relative_eq!(direction_angle_deg(&Vector2::new(3.0, 0.0)), 0.0);
    }

    #[test]
    fn upward_vector_is_negative_quarter_turn() {
        // Y-up "up" is Y-down "up" too, which reads as -90 in pixel space.
        assert_relative_eq!(direction_angle_deg(&Vector2::new(0.0, 1.0)), -90.0);
        assert_relative_eq!(direction_angle_deg(&Vector2::new(0.0, -2.0)), 90.0);
    }

    #[test]
    fn opposite_direction_maps_to_positive_half_turn() {
        assert_relative_eq!(direction_angle_deg(&Vector2::new(-1.0, 0.0)), 180.0);
        assert_relative_eq!(direction_angle_deg(&Vector2::new(-1.0, -0.0)), 180.0);
    }

    #[test]
    fn relative_angle_between_two_normals() {
        let a = Vector2::new(1.0, 0.0);
        let b = Vector2::new(1.0, -1.0);
        assert_relative_eq!(signed_angle_deg(&a, &b), 45.0, epsilon = 1e-9);
        assert_relative_eq!(signed_angle_deg(&b, &a), -45.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_vector_has_no_angle() {
        assert_eq!(direction_angle_deg(&Vector2::zeros()), 0.0);
    }
}
