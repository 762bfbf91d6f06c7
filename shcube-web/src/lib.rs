//! shcube web - geometry and per-frame matrices for a WebGL host
//!
//! JavaScript owns the canvas, the shader program and the GL buffers. It reads
//! the vertex buffers from [`WebScene`] once, then calls [`WebScene::frame`]
//! every animation frame and binds the four matrices as uniforms.

use shcube_core::{build_geometry, CubeGeometry, FrameComposer, FrameTransforms, SceneConfig};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WebScene {
    geometry: CubeGeometry,
    composer: FrameComposer,
    transforms: FrameTransforms,
    start_ms: Option<f64>,
}

#[wasm_bindgen]
impl WebScene {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebScene, JsValue> {
        Ok(Self::with_config(&SceneConfig::default()))
    }

    /// Build a scene from a TOML document, same format as `shcube.toml`
    #[wasm_bindgen(js_name = fromToml)]
    pub fn from_toml(source: &str) -> Result<WebScene, JsValue> {
        let config = SceneConfig::from_toml_str(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_config(&config))
    }

    /// Vertex positions, 3 floats per vertex
    pub fn positions(&self) -> Vec<f32> {
        self.geometry.positions.to_vec()
    }

    /// Smoothed vertex normals, 3 floats per vertex
    pub fn normals(&self) -> Vec<f32> {
        self.geometry.normals.to_vec()
    }

    pub fn colors(&self) -> Vec<f32> {
        self.geometry.colors.to_vec()
    }

    /// Triangle indices for an `UNSIGNED_SHORT` element buffer
    pub fn indices(&self) -> Vec<u16> {
        self.geometry.indices.to_vec()
    }

    #[wasm_bindgen(js_name = indexCount)]
    pub fn index_count(&self) -> usize {
        self.geometry.index_count()
    }

    /// Recompute the transforms from `performance.now()` and the canvas size.
    /// The clock starts at the first call.
    pub fn frame(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        let now = now_ms()?;
        let start = *self.start_ms.get_or_insert(now);
        self.frame_at((now - start) / 1000.0, width, height);
        Ok(())
    }

    /// Recompute the transforms for an explicit elapsed time in seconds
    #[wasm_bindgen(js_name = frameAt)]
    pub fn frame_at(&mut self, elapsed_seconds: f64, width: u32, height: u32) {
        let aspect = if height == 0 { 1.0 } else { width as f32 / height as f32 };
        self.transforms = self.composer.compose(elapsed_seconds, aspect);
    }

    /// Column-major 4×4, ready for `uniformMatrix4fv`
    #[wasm_bindgen(js_name = projectionMatrix)]
    pub fn projection_matrix(&self) -> Vec<f32> {
        self.transforms.projection_column_major().to_vec()
    }

    #[wasm_bindgen(js_name = viewMatrix)]
    pub fn view_matrix(&self) -> Vec<f32> {
        self.transforms.view_column_major().to_vec()
    }

    #[wasm_bindgen(js_name = modelMatrix)]
    pub fn model_matrix(&self) -> Vec<f32> {
        self.transforms.model_column_major().to_vec()
    }

    #[wasm_bindgen(js_name = modelViewMatrix)]
    pub fn model_view_matrix(&self) -> Vec<f32> {
        self.transforms.model_view_column_major().to_vec()
    }
}

impl WebScene {
    fn with_config(config: &SceneConfig) -> WebScene {
        let composer = FrameComposer::from_config(config);
        log::debug!("web scene created");

        WebScene {
            geometry: build_geometry(),
            composer,
            transforms: composer.compose(0.0, 1.0),
            start_ms: None,
        }
    }
}

fn now_ms() -> Result<f64, JsValue> {
    let performance = web_sys::window()
        .and_then(|window| window.performance())
        .ok_or_else(|| JsValue::from_str("window.performance is unavailable"))?;
    Ok(performance.now())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffers_have_upload_sizes() {
        let scene = WebScene::with_config(&SceneConfig::default());
        assert_eq!(scene.positions().len(), 24);
        assert_eq!(scene.normals().len(), 24);
        assert_eq!(scene.colors().len(), 24);
        assert_eq!(scene.indices().len(), scene.index_count());
    }

    #[test]
    fn test_frame_at_updates_matrices() {
        let mut scene = WebScene::with_config(&SceneConfig::default());
        scene.frame_at(10.0, 1600, 900);

        let expected = shcube_core::compute_frame_transforms(10.0, 1600.0 / 900.0);
        assert_eq!(scene.model_matrix(), expected.model_column_major().to_vec());
        assert_eq!(scene.projection_matrix(), expected.projection_column_major().to_vec());
        assert_eq!(scene.view_matrix()[14], -100.0);
    }

    #[test]
    fn test_zero_height_canvas_uses_square_aspect() {
        let mut scene = WebScene::with_config(&SceneConfig::default());
        scene.frame_at(1.0, 300, 0);
        let expected = shcube_core::compute_frame_transforms(1.0, 1.0);
        assert_eq!(scene.projection_matrix(), expected.projection_column_major().to_vec());
    }
}
