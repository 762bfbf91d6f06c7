//! shcube core - smooth-shaded cube geometry and per-frame transforms
//!
//! The crate is stateless: [`build_geometry`] runs once at startup and
//! [`compute_frame_transforms`] runs every frame. Windowing, GPU upload and
//! the clock belong to the host, which plugs in through the [`sink`] traits.

pub mod config;
pub mod error;
pub mod geometry;
pub mod normals;
pub mod projection;
pub mod sink;
pub mod transform;

// Re-export commonly used types
pub use config::{AnimationConfig, ProjectionConfig, SceneConfig, TerminalConfig};
pub use error::{Error, Result};
pub use geometry::{Triangle, CUBE_ADJACENCY, CUBE_COLORS, CUBE_POSITIONS, CUBE_TRIANGLES};
pub use normals::{build_geometry, compute_face_normal, compute_vertex_normal, CubeGeometry};
pub use projection::{Perspective, Viewport};
pub use sink::{render_frame, DrawTarget, GeometrySink, UniformSink};
pub use transform::{compute_frame_transforms, FrameComposer, FrameTransforms, Transform};
