use std::time::{ Duration, Instant };

use crate::scene::Scene;
use crate::canvas::Canvas;
use crate::error::SceneError;

/// A camera record for generating a canvas.
///
/// The projection itself belongs to the `Scene`; the camera only decides
/// how many pixels to cast and where on the screen each one lands.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Camera {
    /// The horizontal size of the resultant canvas.
    pub width: u32,

    /// The vertical size of the resultant canvas.
    pub height: u32,
}

/// A finished render, with the work it took.
#[derive(Clone, Debug)]
pub struct RenderOutput {
    pub canvas: Canvas,

    /// Primitive intersection tests over every pixel.
    pub tests: usize,

    pub elapsed: Duration,
}

impl RenderOutput {
    /// Primitive intersection tests per second of rendering.
    pub fn tests_per_second(&self) -> f64 {
        self.tests as f64 / self.elapsed.as_secs_f64()
    }
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Camera {
        Camera { width, height }
    }

    /// Maps pixel `(px, py)` to screen coordinates in `[-1, 1)`.
    pub fn pixel_to_screen(&self, px: u32, py: u32) -> (f64, f64) {
        let x = px as f64 / self.width as f64 * 2.0 - 1.0;
        let y = py as f64 / self.height as f64 * 2.0 - 1.0;

        (x, y)
    }

    pub fn render(&self, scene: &Scene) -> Result<RenderOutput, SceneError> {
        let mut canvas = Canvas::new(self.width, self.height);
        let mut tests = 0;
        let start = Instant::now();

        for py in 0..self.height {
            for px in 0..self.width {
                let (x, y) = self.pixel_to_screen(px, py);
                let (pixel, n) = scene.render(x, y)?;

                canvas.write_pixel(px, py, pixel);
                tests += n;
            }
        }

        let output = RenderOutput { canvas, tests, elapsed: start.elapsed() };
        log::info!("Rendered {}x{}: {} intersections in {:?}: {:.0} ints/sec",
            self.width, self.height, output.tests, output.elapsed,
            output.tests_per_second());

        Ok(output)
    }
}

#[test]
fn pixel_corners_map_to_screen() {
    let c = Camera::new(200, 100);

    assert_eq!(c.pixel_to_screen(0, 0), (-1.0, -1.0));
    assert_eq!(c.pixel_to_screen(100, 50), (0.0, 0.0));
    assert_eq!(c.pixel_to_screen(150, 25), (0.5, -0.5));
}

#[test]
fn render_counts_every_test() {
    use crate::tuple::Tuple3D;
    use crate::color::Color;
    use crate::shape::Shape;
    use crate::light::PointLight;
    use image::Rgba;

    let mut scene = Scene::new(-5.0, 1.0);
    scene.add_item(Shape::triangle(
        Tuple3D::new(-100.0, -100.0, 10.0),
        Tuple3D::new(100.0, -100.0, 10.0),
        Tuple3D::new(-100.0, 100.0, 10.0),
        Color::white(),
    ));
    scene.add_item(Shape::triangle(
        Tuple3D::new(0.0, 0.0, 20.0),
        Tuple3D::new(1.0, 0.0, 20.0),
        Tuple3D::new(0.0, 1.0, 20.0),
        Color::white(),
    ));
    scene.add_light(PointLight::new(Tuple3D::new(0.0, 0.0, -5.0), Color::white()));

    let out = Camera::new(4, 4).render(&scene).unwrap();

    assert_eq!(out.tests, 4 * 4 * 2);
    assert_eq!(out.canvas.width(), 4);

    // Pixels with x + y <= 0 land on the big triangle; the far corner misses.
    assert_ne!(out.canvas.read_pixel(0, 0), Some(Rgba([0, 0, 0, 255])));
    assert_eq!(out.canvas.read_pixel(3, 3), Some(Rgba([0, 0, 0, 255])));
}

#[test]
fn render_stops_on_unlit_hit() {
    use crate::tuple::Tuple3D;
    use crate::color::Color;
    use crate::shape::Shape;

    let mut scene = Scene::new(-5.0, 1.0);
    scene.add_item(Shape::triangle(
        Tuple3D::new(-100.0, -100.0, 10.0),
        Tuple3D::new(100.0, -100.0, 10.0),
        Tuple3D::new(-100.0, 100.0, 10.0),
        Color::white(),
    ));

    assert!(matches!(Camera::new(2, 2).render(&scene), Err(SceneError::NoLights)));
}
