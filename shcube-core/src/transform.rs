//! Per-frame model, view and projection matrices
use nalgebra::{Matrix3, Matrix4, Vector3};

use crate::config::{AnimationConfig, SceneConfig};
use crate::projection::Perspective;

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Rotation about the Y axis, angle in degrees
    pub fn rotation_y_degrees(degrees: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, degrees.to_radians(), 0.0))
    }

    /// Create a uniform scale matrix
    pub fn scale_matrix(factor: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(factor)
    }

    /// Scale first, then rotate, then translate
    pub fn model_matrix(
        translation: &Matrix4<f32>,
        rotation: &Matrix4<f32>,
        scale: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        translation * rotation * scale
    }
}

/// The matrices bound as shader uniforms for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransforms {
    pub projection: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub model: Matrix4<f32>,
    pub model_view: Matrix4<f32>,
}

impl FrameTransforms {
    /// Flatten a matrix in column-major order, as GL uniforms expect
    pub fn to_column_major(matrix: &Matrix4<f32>) -> [f32; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(matrix.as_slice());
        out
    }

    pub fn projection_column_major(&self) -> [f32; 16] {
        Self::to_column_major(&self.projection)
    }

    pub fn view_column_major(&self) -> [f32; 16] {
        Self::to_column_major(&self.view)
    }

    pub fn model_column_major(&self) -> [f32; 16] {
        Self::to_column_major(&self.model)
    }

    pub fn model_view_column_major(&self) -> [f32; 16] {
        Self::to_column_major(&self.model_view)
    }

    /// `projection * model_view`
    pub fn clip_from_model(&self) -> Matrix4<f32> {
        self.projection * self.model_view
    }

    /// Inverse-transpose of the model's upper 3×3, for transforming normals.
    /// Falls back to the plain 3×3 if the model is singular.
    pub fn normal_matrix(&self) -> Matrix3<f32> {
        let linear = self.model.fixed_view::<3, 3>(0, 0).into_owned();
        linear
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or(linear)
    }
}

/// Derives [`FrameTransforms`] from elapsed time and aspect ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameComposer {
    pub animation: AnimationConfig,
    pub perspective: Perspective,
}

impl FrameComposer {
    pub fn new(animation: AnimationConfig, perspective: Perspective) -> Self {
        Self {
            animation,
            perspective,
        }
    }

    pub fn from_config(config: &SceneConfig) -> Self {
        Self::new(config.animation, config.projection.into())
    }

    /// Animation parameter driving the wobble: elapsed seconds damped twice
    pub fn wobble_parameter(&self, elapsed_seconds: f64) -> f32 {
        let t = elapsed_seconds * self.animation.time_scale;
        (t * self.animation.wobble_scale) as f32
    }

    /// Bounded Lissajous offset of the model
    pub fn wobble_translation(&self, elapsed_seconds: f64) -> Vector3<f32> {
        let f = self.wobble_parameter(elapsed_seconds);
        Vector3::new(
            (2.1 * f).sin() * 0.5,
            (1.7 * f).cos() * 0.5,
            (1.3 * f).sin() * (1.5 * f).cos() * 2.0,
        )
    }

    /// Spin about Y in degrees, reduced to `[0, 360)`.
    ///
    /// Uses the unscaled elapsed time. The reduction happens in `f64` so the
    /// angle keeps its precision however long the process runs.
    pub fn spin_degrees(&self, elapsed_seconds: f64) -> f32 {
        (elapsed_seconds * self.animation.spin_degrees_per_second).rem_euclid(360.0) as f32
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Transform::translation_matrix(0.0, 0.0, -self.animation.camera_distance)
    }

    pub fn model_matrix(&self, elapsed_seconds: f64) -> Matrix4<f32> {
        let offset = self.wobble_translation(elapsed_seconds);
        let translation = Transform::translation_matrix(offset.x, offset.y, offset.z);
        let rotation = Transform::rotation_y_degrees(self.spin_degrees(elapsed_seconds));
        let scale = Transform::scale_matrix(self.animation.model_scale);
        Transform::model_matrix(&translation, &rotation, &scale)
    }

    pub fn compose(&self, elapsed_seconds: f64, aspect: f32) -> FrameTransforms {
        let projection = self.perspective.matrix(aspect);
        let view = self.view_matrix();
        let model = self.model_matrix(elapsed_seconds);
        let model_view = view * model;

        FrameTransforms {
            projection,
            view,
            model,
            model_view,
        }
    }
}

impl Default for FrameComposer {
    fn default() -> Self {
        Self::new(AnimationConfig::default(), Perspective::default())
    }
}

/// Compose one frame's transforms with the default animation constants
pub fn compute_frame_transforms(elapsed_seconds: f64, aspect: f32) -> FrameTransforms {
    FrameComposer::default().compose(elapsed_seconds, aspect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_y_degrees(0.0);
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_quarter_turn_about_y() {
        let matrix = Transform::rotation_y_degrees(90.0);
        let rotated = matrix.transform_vector(&Vector3::x());
        assert_abs_diff_eq!(rotated, -Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_model_order_scales_before_translating() {
        let translation = Transform::translation_matrix(1.0, 0.0, 0.0);
        let scale = Transform::scale_matrix(2.0);
        let model = Transform::model_matrix(&translation, &Matrix4::identity(), &scale);

        let p = model.transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 3.0);
    }

    #[test]
    fn test_wobble_parameter_is_damped_twice() {
        let composer = FrameComposer::default();
        assert_relative_eq!(composer.wobble_parameter(10.0), 0.003, epsilon = 1e-9);
    }

    #[test]
    fn test_spin_wraps_into_one_turn() {
        let composer = FrameComposer::default();
        assert_relative_eq!(composer.spin_degrees(10.0), 90.0);
        assert_relative_eq!(composer.spin_degrees(8.0), 0.0);
        assert_relative_eq!(composer.spin_degrees(1_000_001.0), 45.0);
    }

    #[test]
    fn test_column_major_layout() {
        let m = Transform::translation_matrix(4.0, 5.0, 6.0);
        let flat = FrameTransforms::to_column_major(&m);
        assert_eq!(&flat[12..15], &[4.0, 5.0, 6.0]);
        assert_eq!(flat[15], 1.0);
        assert_eq!(flat[3], 0.0);
    }

    #[test]
    fn test_normal_matrix_undoes_uniform_scale() {
        let transforms = compute_frame_transforms(0.0, 1.0);
        assert_abs_diff_eq!(transforms.normal_matrix(), Matrix3::identity() * 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_view_is_static() {
        let a = compute_frame_transforms(0.0, 1.0);
        let b = compute_frame_transforms(1234.5, 1.0);
        assert_eq!(a.view, b.view);
        assert_eq!(a.view, Transform::translation_matrix(0.0, 0.0, -100.0));
    }
}
