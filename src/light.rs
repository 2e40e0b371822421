use image::Rgba;

use crate::color::Color;
use crate::tuple::Tuple3D;
use crate::intersect::Hit;
use crate::error::SceneError;

/// A point light.
///
/// A very simple light source. Provides a color and a position where light is
/// produced from. The color is carried along with the light but does not
/// tint the result yet; every light shades as white.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointLight {
    pub position: Tuple3D,
    pub intensity: Color,
}

impl PointLight {
    pub fn new(position: Tuple3D, intensity: Color) -> PointLight {
        PointLight { position, intensity }
    }
}

/// How squarely `light` falls on `hit`, from 0.0 (grazing) to 1.0 (head on).
///
/// This is the absolute cosine between the hit's normal and the direction
/// to the light, so both sides of a surface are lit the same. Nothing is
/// checked for occlusion.
pub fn incidence(hit: &Hit, light: &PointLight) -> f64 {
    let to_light = light.position - hit.position;

    hit.normal.dot(&to_light).abs()
        / (hit.normal.magnitude() * to_light.magnitude())
}

/// Shades a hit with a set of lights.
///
/// The incidence of every light is averaged and the hit's base color is
/// scaled by it. The result is an opaque pixel.
///
/// Fails with `SceneError::NoLights` if `lights` is empty.
pub fn illuminate(hit: &Hit, lights: &[PointLight])
    -> Result<Rgba<u8>, SceneError> {
    if lights.is_empty() {
        return Err(SceneError::NoLights);
    }

    let total: f64 = lights.iter().map(|l| incidence(hit, l)).sum();
    let average = total / lights.len() as f64;

    Ok((hit.color * average).to_rgba8())
}

#[cfg(test)]
fn hit_facing_z(color: Color) -> Hit {
    Hit {
        position: Tuple3D::new(0.0, 0.0, 10.0),
        normal: Tuple3D::new(0.0, 0.0, 3.0),
        color,
    }
}

#[test]
fn light_straight_on_gives_full_incidence() {
    use crate::feq;

    let hit = hit_facing_z(Color::white());
    let light = PointLight::new(Tuple3D::new(0.0, 0.0, 20.0), Color::white());

    assert!(feq(incidence(&hit, &light), 1.0));
}

#[test]
fn back_faces_are_lit_like_front_faces() {
    use crate::feq;

    let hit = hit_facing_z(Color::white());
    let front = PointLight::new(Tuple3D::new(0.0, 3.0, 13.0), Color::white());
    let back = PointLight::new(Tuple3D::new(0.0, 3.0, 7.0), Color::white());

    assert!(feq(incidence(&hit, &front), incidence(&hit, &back)));
    assert!(feq(incidence(&hit, &front), 2.0f64.sqrt() / 2.0));
}

#[test]
fn grazing_light_gives_no_incidence() {
    use crate::feq;

    let hit = hit_facing_z(Color::white());
    let light = PointLight::new(Tuple3D::new(5.0, 0.0, 10.0), Color::white());

    assert!(feq(incidence(&hit, &light), 0.0));
}

#[test]
fn illuminate_averages_lights() {
    let hit = hit_facing_z(Color::rgb(1.0, 0.5, 0.0));
    let lights = [
        PointLight::new(Tuple3D::new(0.0, 0.0, 20.0), Color::white()),
        PointLight::new(Tuple3D::new(5.0, 0.0, 10.0), Color::white()),
    ];

    // (1.0 + 0.0) / 2 = 0.5
    assert_eq!(illuminate(&hit, &lights).unwrap(), Rgba([128, 64, 0, 255]));
}

#[test]
fn light_color_does_not_tint() {
    let hit = hit_facing_z(Color::white());
    let lights = [
        PointLight::new(Tuple3D::new(0.0, 0.0, 20.0), Color::red()),
    ];

    assert_eq!(illuminate(&hit, &lights).unwrap(), Rgba([255, 255, 255, 255]));
}

#[test]
fn illuminating_without_lights_fails() {
    let hit = hit_facing_z(Color::white());

    match illuminate(&hit, &[]) {
        Err(SceneError::NoLights) => (),
        other => panic!("expected NoLights, got {:?}", other),
    }
}
