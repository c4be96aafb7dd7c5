use rcube_ecs::Component;
use rcube_math::Mat4;

use super::Transform;

/// Perspective camera looking down the transform's −Z axis.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Camera {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_degrees,
            aspect,
            near,
            far,
        }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective(self.fov_degrees, self.aspect, self.near, self.far)
    }

    /// Inverse of the camera's world matrix; `None` if it is degenerate
    /// (e.g. a zero scale somewhere up the hierarchy).
    pub fn view(&self, transform: &Transform) -> Option<Mat4> {
        transform.world().inverse()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(60.0, 1.0, 0.01, 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rcube_math::Vec3;

    use super::*;

    #[test]
    fn test_view_moves_world_into_camera_space() {
        let camera = Camera::default();
        let mut transform = Transform::from_position(Vec3::new(0.0, 0.0, 10.0));
        transform.recompute(None);

        let view = camera.view(&transform).unwrap();
        let p = view.transform_point(Vec3::ZERO);
        assert_abs_diff_eq!(p[2], -10.0, epsilon = 0.0001);
    }

    #[test]
    fn test_degenerate_view() {
        let camera = Camera::default();
        let mut transform = Transform::new().with_scale(Vec3::ZERO);
        transform.recompute(None);
        assert!(camera.view(&transform).is_none());
    }

    #[test]
    fn test_projection_maps_near_plane() {
        let camera = Camera::new(90.0, 1.0, 1.0, 100.0);
        let clip = camera
            .projection()
            .mul_vec4(&rcube_math::Vec4::from_point(Vec3::new(0.0, 0.0, -1.0)));
        assert_abs_diff_eq!(clip[2] / clip[3], -1.0, epsilon = 0.0001);
    }
}
