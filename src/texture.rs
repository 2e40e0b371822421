use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;

use crate::color::Color;
use crate::error::SceneError;

/// A source of surface colors, addressed by pixel.
///
/// Kites map their barycentric `(u, v)` onto the texture's pixel grid and
/// use the color found there as the base color of a hit.
pub trait Texture: std::fmt::Debug + Send + Sync {
    /// The width and height of the pixel grid.
    fn bounds(&self) -> (u32, u32);

    /// The color at pixel `(x, y)`. Out-of-range pixels are black.
    fn pixel_at(&self, x: u32, y: u32) -> Color;

    /// Samples the pixel at `(round(w * u), round(h * v))`.
    ///
    /// Indices are clamped to the last column and row, since `u == 1.0`
    /// would otherwise land one pixel past the edge.
    fn sample(&self, u: f64, v: f64) -> Color {
        let (w, h) = self.bounds();
        let x = ((w as f64) * u).round().max(0.0) as u32;
        let y = ((h as f64) * v).round().max(0.0) as u32;

        self.pixel_at(x.min(w.saturating_sub(1)), y.min(h.saturating_sub(1)))
    }
}

/// Shared, read-only handle to a texture. Many kites point at one texture.
pub type TextureRef = Arc<dyn Texture>;

/// A texture which is the same color everywhere.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Uniform(pub Color);

impl Uniform {
    /// Wraps a single color as a shareable texture.
    pub fn shared(color: Color) -> TextureRef {
        Arc::new(Uniform(color))
    }
}

impl Texture for Uniform {
    fn bounds(&self) -> (u32, u32) {
        (1, 1)
    }

    fn pixel_at(&self, _x: u32, _y: u32) -> Color {
        self.0
    }
}

impl Texture for RgbaImage {
    fn bounds(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn pixel_at(&self, x: u32, y: u32) -> Color {
        match self.get_pixel_checked(x, y) {
            Some(p) => (*p).into(),
            None => Color::black(),
        }
    }
}

/// Decodes an image file into a shareable texture.
pub fn open_image(path: &Path) -> Result<TextureRef, SceneError> {
    let image = image::open(path)?.to_rgba8();
    log::debug!("Loaded texture {:?} ({}x{})", path, image.width(), image.height());

    Ok(Arc::new(image))
}

#[cfg(test)]
pub(crate) fn quadrant_image() -> RgbaImage {
    // 4x4 image: red top-left, green top-right, blue bottom-left, white
    // bottom-right (x grows right, y grows down).
    RgbaImage::from_fn(4, 4, |x, y| match (x < 2, y < 2) {
        (true, true) => image::Rgba([255, 0, 0, 255]),
        (false, true) => image::Rgba([0, 255, 0, 255]),
        (true, false) => image::Rgba([0, 0, 255, 255]),
        (false, false) => image::Rgba([255, 255, 255, 255]),
    })
}

#[test]
fn uniform_is_constant() {
    let t = Uniform(Color::rgb(0.2, 0.4, 0.6));

    assert_eq!(t.sample(0.0, 0.0), Color::rgb(0.2, 0.4, 0.6));
    assert_eq!(t.sample(0.7, 0.3), Color::rgb(0.2, 0.4, 0.6));
    assert_eq!(t.sample(1.0, 1.0), Color::rgb(0.2, 0.4, 0.6));
}

#[test]
fn image_sample_rounds_to_nearest_pixel() {
    let t = quadrant_image();

    assert_eq!(t.bounds(), (4, 4));
    // round(4 * 0.3) = 1 -> red quadrant; round(4 * 0.4) = 2 -> green.
    assert_eq!(t.sample(0.3, 0.0), Color::red());
    assert_eq!(t.sample(0.4, 0.0), Color::rgb(0.0, 1.0, 0.0));
    assert_eq!(t.sample(0.0, 0.9), Color::blue());
}

#[test]
fn image_sample_clamps_far_edge() {
    let t = quadrant_image();

    assert_eq!(t.sample(1.0, 1.0), Color::white());
}

#[test]
fn image_pixel_out_of_range_is_black() {
    let t = quadrant_image();

    assert_eq!(t.pixel_at(4, 0), Color::black());
}
