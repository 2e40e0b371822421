use std::collections::HashMap;
use std::fs;
use std::path::{ Path, PathBuf };
use std::sync::Arc;

use image::Rgba;
use serde::{ Serialize, Deserialize };

use crate::consts::{ DISC_STEPS, TORUS_MAJOR_STEPS, TORUS_MINOR_STEPS };
use crate::tuple::Tuple3D;
use crate::ray::Ray3D;
use crate::color::Color;
use crate::shape::Shape;
use crate::light::{ PointLight, illuminate };
use crate::texture::{ self, TextureRef, Uniform };
use crate::surface;
use crate::error::SceneError;

/// Everything needed to render: the scene graph, the lights and the
/// projection.
///
/// The viewer sits at `(0, 0, viewer_distance)` looking down +Z, with the
/// projection plane `screen_distance` in front of it. A scene is mutated
/// while it is built and only read while rendering.
#[derive(Debug, Clone)]
pub struct Scene {
    pub root: Shape,
    pub lights: Vec<PointLight>,

    pub viewer_distance: f64,
    pub screen_distance: f64,

    /// Color of pixels whose ray hits nothing.
    pub ambient: Color,
}

impl Scene {
    /// Creates an empty, unlit scene with a black ambient color.
    pub fn new(viewer_distance: f64, screen_distance: f64) -> Scene {
        Scene {
            root: Shape::group(),
            lights: Vec::new(),
            viewer_distance,
            screen_distance,
            ambient: Color::black(),
        }
    }

    pub fn add_item(&mut self, item: Shape) {
        self.root.add_child(item);
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    /// Orders the scene graph nearest first. Call once after building.
    pub fn sort_front_to_back(&mut self) {
        self.root.sort_front_to_back();
    }

    /// The ray through screen coordinate `(x, y)`, both in `[-1, 1]`.
    ///
    /// The direction is `(x / screen, y / screen, 1)` and is not normalized.
    pub fn primary_ray(&self, x: f64, y: f64) -> Ray3D {
        Ray3D::new(
            Tuple3D::new(0.0, 0.0, self.viewer_distance),
            Tuple3D::new(x / self.screen_distance, y / self.screen_distance, 1.0),
        )
    }

    /// Renders screen coordinate `(x, y)`.
    ///
    /// Returns the pixel together with the number of primitive intersection
    /// tests the ray took. A ray that hits nothing gets the ambient color;
    /// a ray that hits something in a scene without lights is an error.
    pub fn render(&self, x: f64, y: f64) -> Result<(Rgba<u8>, usize), SceneError> {
        let ray = self.primary_ray(x, y);
        let i = self.root.intersect(&ray);

        let pixel = match i.hit {
            Some(ref hit) => illuminate(hit, &self.lights)?,
            None => self.ambient.to_rgba8(),
        };

        Ok((pixel, i.tests))
    }

    /// Loads a scene description from a JSON file.
    ///
    /// Relative image paths are resolved against the file's directory.
    pub fn from_json_file(path: &Path) -> Result<Scene, SceneError> {
        let text = fs::read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        Scene::from_json_str(&text, base)
    }

    /// Parses a scene description, resolving image paths against `base`.
    pub fn from_json_str(json: &str, base: &Path) -> Result<Scene, SceneError> {
        let scene_json: SceneJson = serde_json::from_str(json)?;
        let mut loader = SceneLoader::new(base);

        loader.scene(scene_json)
    }
}

#[derive(Serialize, Deserialize)]
pub struct SceneJson {
    viewer_distance: f64,
    screen_distance: f64,
    ambient: Option<Vec<f64>>,

    lights: Vec<LightJson>,
    items: Vec<ItemJson>,
}

#[derive(Clone, Serialize, Deserialize)]
struct LightJson {
    position: Vec<f64>,
    color: Option<Vec<f64>>,
}

#[derive(Clone, Serialize, Deserialize)]
struct TextureJson {
    color: Option<Vec<f64>>,
    image: Option<PathBuf>,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "ty", rename_all = "snake_case")]
enum ItemJson {
    Triangle {
        a: Vec<f64>,
        b: Vec<f64>,
        c: Vec<f64>,
        color: Vec<f64>,
    },
    Kite {
        a: Vec<f64>,
        b: Vec<f64>,
        c: Vec<f64>,
        texture: TextureJson,
    },
    Torus {
        center: Vec<f64>,
        axis: Vec<f64>,
        radius: f64,
        thickness: f64,
        major_steps: Option<usize>,
        minor_steps: Option<usize>,
        texture: TextureJson,
    },
    Parallelepiped {
        corner: Vec<f64>,
        e1: Vec<f64>,
        e2: Vec<f64>,
        e3: Vec<f64>,
        texture: TextureJson,
    },
    Disc {
        center: Vec<f64>,
        axis: Vec<f64>,
        inner_radius: f64,
        thickness: f64,
        steps: Option<usize>,
        texture: TextureJson,
    },
    Group {
        items: Vec<ItemJson>,
    },
}

/// A JSON vector as a tuple. It must have exactly three components.
fn vector(v: &[f64]) -> Result<Tuple3D, SceneError> {
    match *v {
        [x, y, z] => Ok(Tuple3D::new(x, y, z)),
        _ => Err(SceneError::BadVector(v.len())),
    }
}

/// Turns a parsed description into a scene, decoding each image once.
struct SceneLoader {
    base: PathBuf,
    images: HashMap<PathBuf, TextureRef>,
}

impl SceneLoader {
    fn new(base: &Path) -> SceneLoader {
        SceneLoader {
            base: base.to_path_buf(),
            images: HashMap::new(),
        }
    }

    fn scene(&mut self, scene_json: SceneJson) -> Result<Scene, SceneError> {
        let mut scene = Scene::new(
            scene_json.viewer_distance,
            scene_json.screen_distance
        );

        if let Some(ref ambient) = scene_json.ambient {
            scene.ambient = ambient.into();
        }

        for light in scene_json.lights.iter() {
            let intensity = match light.color {
                Some(ref c) => c.into(),
                None => Color::white(),
            };
            scene.add_light(PointLight::new(vector(&light.position)?, intensity));
        }

        for item in scene_json.items {
            let shape = self.item(item)?;
            scene.add_item(shape);
        }

        log::debug!("Scene loaded: {} primitives, {} lights, {} images",
            scene.root.count_primitives(), scene.lights.len(), self.images.len());

        Ok(scene)
    }

    fn texture(&mut self, texture_json: &TextureJson)
        -> Result<TextureRef, SceneError> {
        match (&texture_json.color, &texture_json.image) {
            (Some(c), None) => Ok(Uniform::shared(c.into())),
            (None, Some(path)) => {
                let path = self.base.join(path);

                if let Some(t) = self.images.get(&path) {
                    return Ok(Arc::clone(t));
                }

                let t = texture::open_image(&path)?;
                self.images.insert(path, Arc::clone(&t));
                Ok(t)
            },
            _ => Err(SceneError::BadTexture),
        }
    }

    fn item(&mut self, item_json: ItemJson) -> Result<Shape, SceneError> {
        let shape = match item_json {
            ItemJson::Triangle { a, b, c, color } => Shape::triangle(
                vector(&a)?, vector(&b)?, vector(&c)?, (&color).into()
            ),
            ItemJson::Kite { a, b, c, texture } => Shape::kite(
                vector(&a)?, vector(&b)?, vector(&c)?, self.texture(&texture)?
            ),
            ItemJson::Torus { center, axis, radius, thickness,
                major_steps, minor_steps, texture } => surface::torus_with_steps(
                vector(&center)?,
                vector(&axis)?,
                radius,
                thickness,
                major_steps.unwrap_or(TORUS_MAJOR_STEPS),
                minor_steps.unwrap_or(TORUS_MINOR_STEPS),
                self.texture(&texture)?,
            ),
            ItemJson::Parallelepiped { corner, e1, e2, e3, texture }
                => surface::parallelepiped(
                vector(&corner)?,
                vector(&e1)?,
                vector(&e2)?,
                vector(&e3)?,
                self.texture(&texture)?,
            ),
            ItemJson::Disc { center, axis, inner_radius, thickness, steps,
                texture } => surface::disc(
                vector(&center)?,
                vector(&axis)?,
                inner_radius,
                thickness,
                steps.unwrap_or(DISC_STEPS),
                self.texture(&texture)?,
            ),
            ItemJson::Group { items } => {
                // It's okay to have an empty group (no children).
                let mut group = Shape::group();
                for item in items {
                    group.add_child(self.item(item)?);
                }

                group
            },
        };

        Ok(shape)
    }
}

/// The scene the binary renders when no description is given.
///
/// Two interlocking tori and a parallelepiped, lit by one white light. The
/// parallelepiped uses `texture`; the tori are plain blue and red.
pub fn demo_scene(texture: TextureRef) -> Scene {
    let mut scene = Scene::new(-100.0, 5.0);

    scene.add_item(surface::torus(
        Tuple3D::new(0.0, 0.0, 100.0),
        Tuple3D::new(1.0, 1.0, 1.0),
        30.0,
        5.0,
        Uniform::shared(Color::blue()),
    ));
    scene.add_item(surface::torus(
        Tuple3D::new(10.0, 0.0, 100.0),
        Tuple3D::new(1.0, -1.0, 1.0),
        40.0,
        10.0,
        Uniform::shared(Color::red()),
    ));
    scene.add_item(surface::parallelepiped(
        Tuple3D::new(-10.0, 0.0, 0.0),
        Tuple3D::new(2.0, 2.0, 2.0),
        Tuple3D::new(1.0, -10.0, 0.0),
        Tuple3D::new(-10.0, -3.0, 2.0),
        texture,
    ));

    scene.add_light(PointLight::new(
        Tuple3D::new(-50.0, 50.0, 50.0),
        Color::white(),
    ));

    scene
}

#[cfg(test)]
fn unit_triangle_scene() -> Scene {
    let mut scene = Scene::new(-5.0, 1.0);
    scene.add_item(Shape::triangle(
        Tuple3D::new(0.0, 0.0, 10.0),
        Tuple3D::new(1.0, 0.0, 10.0),
        Tuple3D::new(0.0, 1.0, 10.0),
        Color::rgb(1.0, 0.5, 0.25),
    ));
    scene.add_light(PointLight::new(Tuple3D::origin(), Color::white()));

    scene
}

#[test]
fn primary_ray_projection() {
    let scene = Scene::new(-5.0, 2.0);
    let r = scene.primary_ray(0.5, -1.0);

    assert_eq!(r.origin, Tuple3D::new(0.0, 0.0, -5.0));
    assert_eq!(r.direction, Tuple3D::new(0.25, -0.5, 1.0));
}

#[test]
fn rendering_a_lit_triangle() {
    use crate::light::incidence;
    use crate::intersect::Hit;

    let scene = unit_triangle_scene();

    // The ray through (0.02, 0.02) travels 15 units in Z and crosses the
    // triangle's plane at (0.3, 0.3, 10).
    let (pixel, tests) = scene.render(0.02, 0.02).unwrap();
    let hit = Hit {
        position: Tuple3D::new(0.3, 0.3, 10.0),
        normal: Tuple3D::new(0.0, 0.0, 1.0),
        color: Color::rgb(1.0, 0.5, 0.25),
    };
    let factor = incidence(&hit, &scene.lights[0]);

    assert!(factor > 0.0);
    assert_eq!(pixel, (hit.color * factor).to_rgba8());
    assert_ne!(pixel, scene.ambient.to_rgba8());
    assert_eq!(tests, 1);
}

#[test]
fn rendering_a_miss_gives_ambient() {
    let mut scene = unit_triangle_scene();

    assert_eq!(scene.render(0.9, 0.9).unwrap(), (Rgba([0, 0, 0, 255]), 1));

    scene.ambient = Color::white();
    assert_eq!(scene.render(0.9, 0.9).unwrap().0, Rgba([255, 255, 255, 255]));
}

#[test]
fn rendering_a_hit_without_lights_fails() {
    let mut scene = unit_triangle_scene();
    scene.lights.clear();

    assert!(matches!(scene.render(0.02, 0.02), Err(SceneError::NoLights)));

    // Misses never need a light.
    assert!(scene.render(0.9, 0.9).is_ok());
}

#[test]
fn demo_scene_builds() {
    let scene = demo_scene(Uniform::shared(Color::white()));

    assert_eq!(scene.root.count_primitives(), 2 * 32 * 8 + 6);
    assert_eq!(scene.lights.len(), 1);
}

#[test]
fn scene_from_json() {
    let json = r#"{
        "viewer_distance": -5.0,
        "screen_distance": 1.0,
        "ambient": [0.0, 0.0, 0.2],
        "lights": [ { "position": [0.0, 0.0, 0.0] } ],
        "items": [
            {
                "ty": "triangle",
                "a": [0.0, 0.0, 10.0], "b": [1.0, 0.0, 10.0], "c": [0.0, 1.0, 10.0],
                "color": [1.0, 1.0, 1.0]
            },
            {
                "ty": "group",
                "items": [
                    {
                        "ty": "torus",
                        "center": [0.0, 0.0, 50.0], "axis": [0.0, 0.0, 1.0],
                        "radius": 10.0, "thickness": 2.0,
                        "major_steps": 6, "minor_steps": 4,
                        "texture": { "color": [1.0, 0.0, 0.0] }
                    },
                    {
                        "ty": "disc",
                        "center": [0.0, 0.0, 60.0], "axis": [0.0, 0.0, 1.0],
                        "inner_radius": 0.0, "thickness": 3.0,
                        "texture": { "color": [0.0, 1.0, 0.0] }
                    }
                ]
            },
            {
                "ty": "parallelepiped",
                "corner": [5.0, 5.0, 20.0],
                "e1": [1.0, 0.0, 0.0], "e2": [0.0, 1.0, 0.0], "e3": [0.0, 0.0, 1.0],
                "texture": { "color": [0.5, 0.5, 0.5] }
            }
        ]
    }"#;

    let scene = Scene::from_json_str(json, Path::new(".")).unwrap();

    assert_eq!(scene.viewer_distance, -5.0);
    assert_eq!(scene.ambient, Color::rgb(0.0, 0.0, 0.2));
    assert_eq!(scene.lights[0].intensity, Color::white());
    assert_eq!(scene.root.count_primitives(), 1 + 6 * 4 + DISC_STEPS + 6);
    assert_eq!(scene.render(0.9, 0.9).unwrap().0, Rgba([0, 0, 51, 255]));
}

#[test]
fn scene_json_rejects_short_vectors() {
    let json = r#"{
        "viewer_distance": -5.0,
        "screen_distance": 1.0,
        "lights": [ { "position": [0.0, 0.0] } ],
        "items": []
    }"#;

    assert!(matches!(
        Scene::from_json_str(json, Path::new(".")),
        Err(SceneError::BadVector(2))
    ));
}

#[test]
fn scene_json_rejects_ambiguous_textures() {
    let json = r#"{
        "viewer_distance": -5.0,
        "screen_distance": 1.0,
        "lights": [],
        "items": [
            {
                "ty": "kite",
                "a": [0.0, 0.0, 0.0], "b": [1.0, 1.0, 0.0], "c": [1.0, 0.0, 0.0],
                "texture": {}
            }
        ]
    }"#;

    assert!(matches!(
        Scene::from_json_str(json, Path::new(".")),
        Err(SceneError::BadTexture)
    ));
}

#[test]
fn scene_json_images_are_shared() {
    use crate::texture::quadrant_image;

    let dir = std::env::temp_dir().join("kite-tracer-scene-test");
    fs::create_dir_all(&dir).unwrap();
    quadrant_image().save(dir.join("quad.png")).unwrap();

    let kite = r#"{
        "ty": "kite",
        "a": [0.0, 0.0, 10.0], "b": [2.0, 2.0, 10.0], "c": [2.0, 0.0, 10.0],
        "texture": { "image": "quad.png" }
    }"#;
    let json = format!(r#"{{
        "viewer_distance": -5.0,
        "screen_distance": 1.0,
        "lights": [],
        "items": [ {}, {} ]
    }}"#, kite, kite);

    let mut loader = SceneLoader::new(&dir);
    let scene = loader.scene(serde_json::from_str(&json).unwrap()).unwrap();

    assert_eq!(loader.images.len(), 1);
    assert_eq!(scene.root.count_primitives(), 2);
}

#[test]
fn scene_json_missing_image_is_an_error() {
    let json = r#"{
        "viewer_distance": -5.0,
        "screen_distance": 1.0,
        "lights": [],
        "items": [
            {
                "ty": "kite",
                "a": [0.0, 0.0, 0.0], "b": [1.0, 1.0, 0.0], "c": [1.0, 0.0, 0.0],
                "texture": { "image": "does-not-exist.png" }
            }
        ]
    }"#;

    assert!(matches!(
        Scene::from_json_str(json, Path::new(".")),
        Err(SceneError::Image(_))
    ));
}

#[test]
fn bundled_demo_scene_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenes/demo.json");
    let scene = Scene::from_json_file(&path).unwrap();

    assert_eq!(scene.root.count_primitives(), 2 * 32 * 8 + 6 + 24);
    assert_eq!(scene.screen_distance, 5.0);
}
