//! # Rendering
//!
//! Triangle genes are drawn with `tiny_skia` onto a [`Pixmap`], which stores
//! premultiplied RGBA bytes and starts fully transparent. Triangles are filled
//! in gene order with source-over blending (painter's algorithm). Anti-aliasing
//! is off, so a pixel is covered when its center lies inside the triangle,
//! regardless of winding.
//!
//! A [`Viewport`] maps gene space (full-resolution target pixels) onto a raster of
//! a given size, so the same genes render at working or output resolution.

use image::{Rgba, RgbaImage};
use tiny_skia::{Color, ColorU8, FillRule, Paint, PathBuilder, Pixmap, Shader, Transform};

use crate::error::{GeneticError, Result};
use crate::individual::Triangle;

/// Target raster size plus the per-axis scale from gene space into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    scale_x: f32,
    scale_y: f32,
}

impl Viewport {
    /// A viewport at gene-space scale.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// A `width` x `height` viewport onto a gene space whose canvas is
    /// `source_width` x `source_height`.
    pub fn scaled(source_width: u32, source_height: u32, width: u32, height: u32) -> Self {
        let ratio = |to: u32, from: u32| if from == 0 { 1.0 } else { to as f32 / from as f32 };
        Self {
            width,
            height,
            scale_x: ratio(width, source_width),
            scale_y: ratio(height, source_height),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn transform(&self) -> Transform {
        Transform::from_scale(self.scale_x, self.scale_y)
    }
}

/// Allocates a transparent `width` x `height` pixmap.
///
/// # Errors
///
/// Returns a configuration error for an empty or oversized raster.
pub fn new_pixmap(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width, height).ok_or_else(|| {
        GeneticError::Configuration(format!("Cannot allocate a {}x{} canvas", width, height))
    })
}

/// Makes `pixmap` a transparent `width` x `height` raster, reusing it when the
/// size already matches.
pub fn prepare(pixmap: &mut Pixmap, width: u32, height: u32) -> Result<()> {
    if pixmap.width() == width && pixmap.height() == height {
        pixmap.fill(Color::TRANSPARENT);
    } else {
        *pixmap = new_pixmap(width, height)?;
    }
    Ok(())
}

/// Clears `pixmap` to the viewport size and draws `triangles` in order.
pub fn paint(pixmap: &mut Pixmap, triangles: &[Triangle], viewport: &Viewport) -> Result<()> {
    prepare(pixmap, viewport.width(), viewport.height())?;
    draw_triangles(pixmap, triangles, viewport);
    Ok(())
}

/// Draws `triangles` in order over the current contents.
pub fn draw_triangles(pixmap: &mut Pixmap, triangles: &[Triangle], viewport: &Viewport) {
    let transform = viewport.transform();
    for triangle in triangles {
        fill_triangle(pixmap, triangle, transform);
    }
}

/// Blends one triangle over the current contents.
pub fn fill_triangle(pixmap: &mut Pixmap, triangle: &Triangle, transform: Transform) {
    let [r, g, b, a] = triangle.color;
    if a == 0 {
        return;
    }

    let [p0, p1, p2] = triangle.vertices.map(|v| (v.x as f64, v.y as f64));
    let area = (p1.0 - p0.0) * (p2.1 - p0.1) - (p1.1 - p0.1) * (p2.0 - p0.0);
    if area == 0.0 {
        return;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(p0.0 as f32, p0.1 as f32);
    pb.line_to(p1.0 as f32, p1.1 as f32);
    pb.line_to(p2.0 as f32, p2.1 as f32);
    pb.close();
    let Some(path) = pb.finish() else {
        return;
    };

    let mut paint = Paint::default();
    paint.anti_alias = false;
    paint.shader = Shader::SolidColor(Color::from_rgba8(r, g, b, a));

    pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
}

/// Converts to a straight-alpha 8-bit image.
pub fn to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (pixel, p) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = p.demultiply();
        *pixel = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}

/// Premultiplied RGBA bytes of a straight-alpha image, laid out like
/// [`Pixmap::data`].
pub fn premultiplied_bytes(image: &RgbaImage) -> Vec<u8> {
    image
        .pixels()
        .flat_map(|p| {
            let c = ColorU8::from_rgba(p[0], p[1], p[2], p[3]).premultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}
