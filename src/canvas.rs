use std::path::Path;

use image::{ Rgba, RgbaImage, ImageFormat };

use crate::error::SceneError;

/// A canvas for drawing pixels.
///
/// This structure stores the results of the ray tracer. Once the user
/// specifies the desired image width and height, the `Camera` casts a ray
/// for every pixel and writes the shaded result here.
///
/// Pixels are 8-bit RGBA. Once rendering finishes, the `Canvas` can be saved
/// as a PNG file.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// Creates a new, transparent canvas with specified width and height.
    pub fn new(width: u32, height: u32) -> Canvas {
        Canvas {
            pixels: RgbaImage::new(width, height),
        }
    }

    /// The width of the canvas, in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// The height of the canvas, in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Writes a pixel to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. `x` is the column of the pixel and
    /// `y` is the row; both are zero-indexed.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the fourth column, second row on an 8-by-8 canvas:
    ///
    /// ```
    /// # use kite_tracer::color::Color;
    /// # use kite_tracer::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0).to_rgba8();
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: u32, y: u32, pixel: Rgba<u8>) {
        // Silently ignore out-of-bounds pixels
        if x >= self.width() || y >= self.height() {
            return;
        }

        self.pixels.put_pixel(x, y, pixel);
    }

    /// Reads a pixel from a location on the `Canvas`.
    ///
    /// If the specified pixel location is out-of-bounds, `None` is returned.
    pub fn read_pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    /// Saves the canvas to a PNG file.
    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        self.pixels.save_with_format(path, ImageFormat::Png)?;
        log::info!("Wrote {}x{} image to {:?}", self.width(), self.height(), path);

        Ok(())
    }
}

#[test]
fn new_canvas_is_transparent() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.width(), 10);
    assert_eq!(c.height(), 20);
    assert_eq!(c.read_pixel(9, 19), Some(Rgba([0, 0, 0, 0])));
}

#[test]
fn out_of_bounds_pixels_are_ignored() {
    let mut c = Canvas::new(4, 4);
    c.write_pixel(4, 0, Rgba([255, 0, 0, 255]));
    c.write_pixel(0, 7, Rgba([255, 0, 0, 255]));

    assert_eq!(c.read_pixel(4, 0), None);
    assert_eq!(c.read_pixel(0, 7), None);
    assert!(c.pixels.pixels().all(|p| *p == Rgba([0, 0, 0, 0])));
}

#[test]
fn saved_canvas_reads_back() {
    let mut c = Canvas::new(3, 2);
    c.write_pixel(0, 0, Rgba([255, 0, 0, 255]));
    c.write_pixel(2, 1, Rgba([10, 20, 30, 255]));

    let path = std::env::temp_dir().join("kite-tracer-canvas-test.png");
    c.save(&path).unwrap();

    let back = image::open(&path).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (3, 2));
    assert_eq!(*back.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    assert_eq!(*back.get_pixel(2, 1), Rgba([10, 20, 30, 255]));
}
