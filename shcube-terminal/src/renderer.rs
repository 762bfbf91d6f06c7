//! ASCII rasterizer standing in for the GPU
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix3, Vector3};
use shcube_core::{CubeGeometry, DrawTarget, FrameTransforms, GeometrySink, UniformSink, Viewport};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const AMBIENT: f32 = 0.15;

/// A vertex after the "vertex shader": screen position, depth and lit color
#[derive(Debug, Clone, Copy)]
struct ShadedVertex {
    x: f32,
    y: f32,
    depth: f32,
    color: [f32; 3],
    intensity: f32,
}

/// Software renderer that Gouraud-shades the uploaded cube into a character grid
pub struct AsciiRenderer {
    viewport: Viewport,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<[u8; 3]>,
    geometry: Option<CubeGeometry>,
    transforms: Option<FrameTransforms>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, pixel_aspect: f32) -> Self {
        let size = width * height;
        Self {
            viewport: Viewport::new(width as u32, height as u32).with_pixel_aspect(pixel_aspect),
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![[0, 0, 0]; size],
            geometry: None,
            transforms: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn width(&self) -> usize {
        self.viewport.width as usize
    }

    pub fn height(&self) -> usize {
        self.viewport.height as usize
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width() && height == self.height() {
            return;
        }
        log::debug!("resizing render target to {width}x{height}");
        self.viewport = Viewport::new(width as u32, height as u32).with_pixel_aspect(self.viewport.pixel_aspect);
        let size = width * height;
        self.depth_buffer = vec![f32::INFINITY; size];
        self.char_buffer = vec![' '; size];
        self.color_buffer = vec![[0, 0, 0]; size];
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill([0, 0, 0]);
    }

    pub fn glyph_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width() + x]
    }

    pub fn covered_cells(&self) -> usize {
        self.char_buffer.iter().filter(|&&c| c != ' ').count()
    }

    fn shade_vertex(
        &self,
        geometry: &CubeGeometry,
        transforms: &FrameTransforms,
        normal_matrix: &Matrix3<f32>,
        vertex: usize,
    ) -> Option<ShadedVertex> {
        let (x, y, depth) = self
            .viewport
            .project_to_screen(&transforms.clip_from_model(), &geometry.position(vertex))?;

        let normal = (normal_matrix * geometry.normal(vertex)).normalize();
        Some(ShadedVertex {
            x,
            y,
            depth,
            color: geometry.color(vertex),
            intensity: lambert(&normal),
        })
    }

    fn rasterize_triangle(&mut self, v: [ShadedVertex; 3]) {
        let [v0, v1, v2] = v;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width() as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height() as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) = barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py)) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let idx = y as usize * self.width() + x as usize;
                if depth >= self.depth_buffer[idx] {
                    continue;
                }

                // Gouraud: interpolate the lit vertex colors
                let intensity = w0 * v0.intensity + w1 * v1.intensity + w2 * v2.intensity;
                let mut rgb = [0u8; 3];
                for (channel, out) in rgb.iter_mut().enumerate() {
                    let c = w0 * v0.color[channel] * v0.intensity
                        + w1 * v1.color[channel] * v1.intensity
                        + w2 * v2.color[channel] * v2.intensity;
                    *out = (c.clamp(0.0, 1.0) * 255.0) as u8;
                }

                self.depth_buffer[idx] = depth;
                self.char_buffer[idx] = glyph(intensity);
                self.color_buffer[idx] = rgb;
            }
        }
    }

    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height() {
            for x in 0..self.width() {
                let idx = y * self.width() + x;
                let [r, g, b] = self.color_buffer[idx];
                writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height() {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl GeometrySink for AsciiRenderer {
    fn upload_geometry(&mut self, geometry: &CubeGeometry) {
        log::info!(
            "uploaded {} vertices and {} indices",
            geometry.vertex_count(),
            geometry.index_count()
        );
        self.geometry = Some(geometry.clone());
    }
}

impl UniformSink for AsciiRenderer {
    fn bind_transforms(&mut self, transforms: &FrameTransforms) {
        self.transforms = Some(*transforms);
    }
}

impl DrawTarget for AsciiRenderer {
    fn draw_indexed(&mut self, index_count: usize) {
        let Some(transforms) = self.transforms else {
            log::warn!("draw issued before transforms were bound");
            return;
        };
        let Some(geometry) = self.geometry.take() else {
            log::warn!("draw issued before geometry upload");
            return;
        };

        let normal_matrix = transforms.normal_matrix();
        let count = index_count.min(geometry.indices.len());
        for triangle in geometry.indices[..count].chunks_exact(3) {
            let shaded = [triangle[0], triangle[1], triangle[2]]
                .map(|index| self.shade_vertex(&geometry, &transforms, &normal_matrix, index as usize));

            // Drop triangles with a clipped corner
            if let [Some(a), Some(b), Some(c)] = shaded {
                self.rasterize_triangle([a, b, c]);
            }
        }

        self.geometry = Some(geometry);
    }
}

/// Two-sided Lambert term with an ambient floor.
///
/// The cube's winding puts its normals on the inner side of each face, so the
/// absolute cosine is used to light both sides the same. The light shines
/// from the camera along -Z.
fn lambert(normal: &Vector3<f32>) -> f32 {
    AMBIENT + (1.0 - AMBIENT) * normal.dot(&Vector3::z()).abs()
}

fn glyph(intensity: f32) -> char {
    let char_index = (intensity * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
    LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
