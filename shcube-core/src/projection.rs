//! Perspective projection and viewport mapping
use nalgebra::{Matrix4, Point3};

use crate::config::ProjectionConfig;

/// Perspective frustum parameters; the aspect ratio is supplied per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Perspective {
    pub fn new(fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            fov_degrees,
            near,
            far,
        }
    }

    /// Right-handed projection into OpenGL clip space
    pub fn matrix(&self, aspect: f32) -> Matrix4<f32> {
        Matrix4::new_perspective(aspect, self.fov_degrees.to_radians(), self.near, self.far)
    }
}

impl Default for Perspective {
    fn default() -> Self {
        Self::new(50.0, 0.1, 1000.0)
    }
}

impl From<ProjectionConfig> for Perspective {
    fn from(config: ProjectionConfig) -> Self {
        Self::new(config.fov_degrees, config.near, config.far)
    }
}

/// Output surface dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    /// Width of one pixel relative to its height (terminal cells are ~0.5)
    pub pixel_aspect: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixel_aspect: 1.0,
        }
    }

    pub fn with_pixel_aspect(mut self, pixel_aspect: f32) -> Self {
        self.pixel_aspect = pixel_aspect;
        self
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 * self.pixel_aspect / self.height as f32
    }

    /// Project a model-space point to screen space.
    ///
    /// `clip_from_model` is the full `projection * model_view` product.
    /// Returns `(x, y, depth)` with `depth` in NDC, or `None` when the point
    /// is behind the eye or outside the view volume.
    pub fn project_to_screen(
        &self,
        clip_from_model: &Matrix4<f32>,
        point: &Point3<f32>,
    ) -> Option<(f32, f32, f32)> {
        let clip = clip_from_model * point.to_homogeneous();

        // Prevent division by near-zero or negative w
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        if !(-1.0..=1.0).contains(&ndc_x) || !(-1.0..=1.0).contains(&ndc_y) || !(-1.0..=1.0).contains(&depth) {
            return None;
        }

        let screen_x = (ndc_x + 1.0) * 0.5 * self.width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * self.height as f32;

        Some((screen_x, screen_y, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_perspective() {
        let perspective = Perspective::default();
        assert_eq!(perspective.fov_degrees, 50.0);
        assert_eq!(perspective.near, 0.1);
        assert_eq!(perspective.far, 1000.0);
    }

    #[test]
    fn test_perspective_matrix_entries() {
        let aspect = 16.0 / 9.0;
        let m = Perspective::default().matrix(aspect);
        let focal = 1.0 / (25.0f32.to_radians()).tan();

        assert_relative_eq!(m[(1, 1)], focal, epsilon = 1e-5);
        assert_relative_eq!(m[(0, 0)], focal / aspect, epsilon = 1e-5);
        assert_relative_eq!(m[(3, 2)], -1.0);
    }

    #[test]
    fn test_viewport_aspect() {
        assert_relative_eq!(Viewport::new(800, 600).aspect(), 800.0 / 600.0);
        assert_relative_eq!(Viewport::new(160, 40).with_pixel_aspect(0.5).aspect(), 2.0);
        assert_eq!(Viewport::new(10, 0).aspect(), 1.0);
    }

    #[test]
    fn test_project_center_and_behind() {
        let viewport = Viewport::new(100, 50);
        let view = Matrix4::new_translation(&nalgebra::Vector3::new(0.0, 0.0, -10.0));
        let mvp = Perspective::default().matrix(viewport.aspect()) * view;

        let (x, y, depth) = viewport.project_to_screen(&mvp, &Point3::origin()).unwrap();
        assert_relative_eq!(x, 50.0, epsilon = 1e-4);
        assert_relative_eq!(y, 25.0, epsilon = 1e-4);
        assert!(depth > -1.0 && depth < 1.0);

        assert!(viewport
            .project_to_screen(&mvp, &Point3::new(0.0, 0.0, 20.0))
            .is_none());
    }
}
