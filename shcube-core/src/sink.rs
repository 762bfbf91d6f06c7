//! Seams between the core and the host renderer
//!
//! The host owns the window, the GPU (or whatever stands in for it) and the
//! clock. It receives geometry once through [`GeometrySink`] and per-frame
//! matrices through [`UniformSink`], then draws through [`DrawTarget`].
use crate::normals::CubeGeometry;
use crate::transform::{FrameComposer, FrameTransforms};

/// Receives the vertex and index buffers once at startup
pub trait GeometrySink {
    fn upload_geometry(&mut self, geometry: &CubeGeometry);
}

/// Receives the model, view, projection and model-view matrices every frame
pub trait UniformSink {
    fn bind_transforms(&mut self, transforms: &FrameTransforms);
}

/// Issues one indexed triangle draw over the uploaded buffers
pub trait DrawTarget {
    fn draw_indexed(&mut self, index_count: usize);
}

/// Bind this frame's transforms, then draw.
pub fn render_frame<R>(
    target: &mut R,
    composer: &FrameComposer,
    elapsed_seconds: f64,
    aspect: f32,
    index_count: usize,
) -> FrameTransforms
where
    R: UniformSink + DrawTarget,
{
    let transforms = composer.compose(elapsed_seconds, aspect);
    target.bind_transforms(&transforms);
    target.draw_indexed(index_count);
    transforms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        bound: Option<FrameTransforms>,
        drawn: usize,
    }

    impl UniformSink for Recorder {
        fn bind_transforms(&mut self, transforms: &FrameTransforms) {
            self.calls.push("bind");
            self.bound = Some(*transforms);
        }
    }

    impl DrawTarget for Recorder {
        fn draw_indexed(&mut self, index_count: usize) {
            self.calls.push("draw");
            self.drawn = index_count;
        }
    }

    #[test]
    fn test_binds_before_drawing() {
        let mut recorder = Recorder::default();
        let composer = FrameComposer::default();
        let transforms = render_frame(&mut recorder, &composer, 3.0, 1.5, 36);

        assert_eq!(recorder.calls, vec!["bind", "draw"]);
        assert_eq!(recorder.bound, Some(transforms));
        assert_eq!(recorder.drawn, 36);
    }
}
