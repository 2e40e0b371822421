use std::ops::Mul;

use image::Rgba;

use crate::feq;

/// A color.
///
/// Represented conventionally with red-green-blue (RGB) values. Each value
/// ranges from 0.0 to 1.0 inclusive. Colors only become 8-bit when they are
/// written to a canvas (see `Color::to_rgba8`).
///
/// # Examples
///
/// Construct the color red:
///
/// ```
/// # #![allow(unused)]
/// # use kite_tracer::color::Color;
/// let red = Color::red();
/// assert_eq!(red, Color::rgb(1.0, 0.0, 0.0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Similar to the `PartialEq` implementation on `Tuple3D`, `Color`s are
/// compared component-wise, accounting for possible floating point error in
/// comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

/// Conversion from a vector to a `Color`.
///
/// Takes the first `n` elements of a vector, and assigns them to the `r`, `g`
/// and `b` fields of the `Color`, in that order. If there aren't enough
/// elements in the vector (e.g. `n == 2`), fields are assigned defaults in
/// place.
impl From<&Vec<f64>> for Color {
    fn from(v: &Vec<f64>) -> Color {
        match v.len() {
            0 => Default::default(),
            1 => Color { r: v[0], ..Default::default() },
            2 => Color { r: v[0], g: v[1], ..Default::default() },
            _ => Color { r: v[0], g: v[1], b: v[2] }
        }
    }
}

/// Conversion from a decoded image pixel. Alpha is dropped.
impl From<Rgba<u8>> for Color {
    fn from(p: Rgba<u8>) -> Color {
        Color {
            r: p.0[0] as f64 / 255.0,
            g: p.0[1] as f64 / 255.0,
            b: p.0[2] as f64 / 255.0,
        }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// The color black.
    pub fn black() -> Color {
        Color {
            r: 0.0,
            g: 0.0,
            b: 0.0
        }
    }

    /// The color white.
    pub fn white() -> Color {
        Color {
            r: 1.0,
            g: 1.0,
            b: 1.0
        }
    }

    /// The color red.
    pub fn red() -> Color {
        Color {
            r: 1.0,
            g: 0.0,
            b: 0.0
        }
    }

    /// The color blue.
    pub fn blue() -> Color {
        Color {
            r: 0.0,
            g: 0.0,
            b: 1.0
        }
    }

    /// Converts the color to an opaque 8-bit pixel.
    ///
    /// Components are clamped to `[0.0, 1.0]` and rounded to the nearest
    /// 8-bit value. Alpha is always 255.
    ///
    /// # Examples
    ///
    /// ```
    /// # use kite_tracer::color::Color;
    /// let half = Color::rgb(0.5, 2.0, -1.0);
    /// assert_eq!(half.to_rgba8().0, [128, 255, 0, 255]);
    /// ```
    pub fn to_rgba8(&self) -> Rgba<u8> {
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;

        Rgba([channel(self.r), channel(self.g), channel(self.b), 255])
    }
}

/// Multiplies a color by a scalar.
///
/// Each component is multiplied by the scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(0.2, 0.3, 0.4);
    let c2 = Color { r: 0.4, g: 0.6, b: 0.8 };

    assert_eq!(c1 * 2.0, c2);
}

#[test]
fn color_from_short_vec() {
    let c: Color = (&vec![0.5, 0.25]).into();

    assert_eq!(c, Color::rgb(0.5, 0.25, 0.0));
}

#[test]
fn color_from_pixel_and_back() {
    let pixel = Rgba([128u8, 0, 64, 10]);
    let c: Color = pixel.into();

    assert!(feq(c.r, 128.0 / 255.0));
    assert_eq!(c.to_rgba8(), Rgba([128, 0, 64, 255]));
}
