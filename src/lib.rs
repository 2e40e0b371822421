pub mod consts;
pub mod error;

pub mod tuple;
pub mod ray;
pub mod color;
pub mod texture;

pub mod geometry;
pub mod intersect;
pub mod shape;
pub mod surface;

pub mod light;
pub mod scene;
pub mod camera;
pub mod canvas;

pub mod logger;
pub mod cli;

use crate::consts::FEQ_EPSILON;

/// Approximate equality for floats, within `FEQ_EPSILON`.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
