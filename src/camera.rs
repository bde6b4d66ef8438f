use glam::{Mat4, Vec3};

/// World-space extent of the visible area at the camera's focal plane.
///
/// Supplied by the render driver; the particle field only observes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Fixed camera looking at the origin from down the +Z axis.
pub struct Camera {
    pub distance: f32,
    pub fov_y: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            distance: 5.0,
            fov_y: 75.0_f32.to_radians(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, 0.1, 100.0)
    }

    /// World units visible at the z = 0 plane for the given pixel aspect.
    pub fn world_viewport(&self, aspect: f32) -> Viewport {
        let height = 2.0 * self.distance * (self.fov_y * 0.5).tan();
        Viewport {
            width: height * aspect,
            height,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_viewport_height() {
        let camera = Camera::new();
        let viewport = camera.world_viewport(1.0);
        // 2 * 5 * tan(37.5 degrees)
        assert!((viewport.height - 7.6733).abs() < 0.001);
        assert!((viewport.width - viewport.height).abs() < 0.001);
    }

    #[test]
    fn test_world_viewport_scales_with_aspect() {
        let camera = Camera::new();
        let wide = camera.world_viewport(2.0);
        let narrow = camera.world_viewport(0.5);
        assert!((wide.width - 2.0 * wide.height).abs() < 0.001);
        assert!((narrow.width - 0.5 * narrow.height).abs() < 0.001);
        assert_eq!(wide.height, narrow.height);
    }

    #[test]
    fn test_view_matrix_centers_origin() {
        let camera = Camera::new();
        let view = camera.view_matrix();
        let origin = view.transform_point3(Vec3::ZERO);
        // Origin sits straight ahead, camera distance down -Z.
        assert!(origin.x.abs() < 1e-6);
        assert!(origin.y.abs() < 1e-6);
        assert!((origin.z + camera.distance).abs() < 1e-6);
    }
}
