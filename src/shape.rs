use crate::tuple::Tuple3D;
use crate::ray::Ray3D;
use crate::color::Color;
use crate::texture::TextureRef;
use crate::intersect::{ Hit, Intersection };
use crate::geometry::{ TriangleInfo, KiteInfo };

#[derive(Debug, Clone)]
pub enum ShapeType {
    /// An empty shape which does nothing. Mostly for testing.
    Empty,

    /// A single-colored triangle. See TriangleInfo for further explanation.
    Triangle(TriangleInfo, Color),

    /// A textured two-triangle quadrilateral. See KiteInfo.
    Kite(KiteInfo),

    /// A group of shapes. Can include other groups of shapes.
    Group(Vec<Shape>),
}

/// A node of the scene graph.
///
/// Leaves are triangles and kites; groups own their children outright, so
/// the graph is a tree. `z_front`, the smallest Z covered by the shape, is
/// computed when the shape is built and kept up to date as children are
/// added.
#[derive(Debug, Clone)]
pub struct Shape {
    pub ty: ShapeType,
    z_front: f64,
}

impl Default for Shape {
    fn default() -> Shape {
        Shape {
            ty: ShapeType::Empty,
            z_front: std::f64::INFINITY,
        }
    }
}

impl Shape {
    /// Creates an empty shape which does nothing. Mostly for testing.
    pub fn empty() -> Shape {
        Default::default()
    }

    /// Creates a triangle, defined by three points in space and a color.
    pub fn triangle(a: Tuple3D, b: Tuple3D, c: Tuple3D, color: Color)
        -> Shape {
        let info = TriangleInfo::new(a, b, c);

        Shape {
            z_front: info.z_front(),
            ty: ShapeType::Triangle(info, color),
        }
    }

    /// Creates a kite on corners `a` and `b` with side corner `c`.
    pub fn kite(a: Tuple3D, b: Tuple3D, c: Tuple3D, texture: TextureRef)
        -> Shape {
        let info = KiteInfo::new(a, b, c, texture);

        Shape {
            z_front: info.z_front(),
            ty: ShapeType::Kite(info),
        }
    }

    /// Creates a group, which holds a list of other shapes (possibly groups).
    pub fn group() -> Shape {
        Shape {
            ty: ShapeType::Group(Vec::new()),
            ..Default::default()
        }
    }

    /// Appends a child to a group.
    ///
    /// Panics if `self` is not a group.
    pub fn add_child(&mut self, child: Shape) {
        let children = match self.ty {
            ShapeType::Group(ref mut c) => c,
            _ => panic!("Cannot add child to non-group shape."),
        };

        self.z_front = self.z_front.min(child.z_front);
        children.push(child);
    }

    /// Returns a reference to a list of child `Shape`s if this is a group.
    pub fn children(&self) -> Option<&Vec<Shape>> {
        if let ShapeType::Group(ref children) = self.ty {
            Some(children)
        } else {
            None
        }
    }

    /// The smallest Z covered by this shape. Infinite for empty shapes.
    pub fn z_front(&self) -> f64 {
        self.z_front
    }

    /// Number of leaf primitives (triangles and kites) in this shape.
    pub fn count_primitives(&self) -> usize {
        match self.ty {
            ShapeType::Empty => 0,
            ShapeType::Triangle(_, _) | ShapeType::Kite(_) => 1,
            ShapeType::Group(ref children)
                => children.iter().map(|c| c.count_primitives()).sum(),
        }
    }

    /// Orders every group's children by `z_front`, nearest first.
    ///
    /// Meant to be called once, after the scene is built. Groups still test
    /// every child, so this changes the order of the work, not its result.
    pub fn sort_front_to_back(&mut self) {
        if let ShapeType::Group(ref mut children) = self.ty {
            for child in children.iter_mut() {
                child.sort_front_to_back();
            }

            children.sort_by(|a, b| a.sort_key().total_cmp(&b.sort_key()));
        }
    }

    /// `z_front` for ordering. NaN (degenerate geometry) sorts last.
    fn sort_key(&self) -> f64 {
        if self.z_front.is_nan() {
            std::f64::INFINITY
        } else {
            self.z_front
        }
    }

    /// Intersect a ray with a Shape.
    pub fn intersect(&self, ray: &Ray3D) -> Intersection {
        match self.ty {
            ShapeType::Empty => Intersection::miss(0),
            ShapeType::Triangle(_, _) => self.intersect_triangle(ray),
            ShapeType::Kite(_) => self.intersect_kite(ray),
            ShapeType::Group(_) => self.intersect_group(ray),
        }
    }

    fn intersect_triangle(&self, ray: &Ray3D) -> Intersection {
        let (info, color) = match self.ty {
            ShapeType::Triangle(ref ti, color) => (ti, color),
            _ => unreachable!(),
        };

        match info.intersect(ray) {
            Some(th) => Intersection::hit(Hit {
                position: th.position,
                normal: info.normal,
                color,
            }, 1),
            None => Intersection::miss(1),
        }
    }

    /// Intersects the first triangle, then the mirrored one.
    ///
    /// The first triangle samples the texture at `(u, v)`. The second
    /// triangle's apex is mirrored, so its weights are remapped to
    /// `(1 - v, 1 - u)`, which lands in the other half of the texture.
    fn intersect_kite(&self, ray: &Ray3D) -> Intersection {
        let info = match self.ty {
            ShapeType::Kite(ref ki) => ki,
            _ => unreachable!(),
        };

        if let Some(th) = info.ta.intersect(ray) {
            return Intersection::hit(Hit {
                position: th.position,
                normal: info.ta.normal,
                color: info.texture.sample(th.u, th.v),
            }, 1);
        }

        if let Some(th) = info.tb.intersect(ray) {
            return Intersection::hit(Hit {
                position: th.position,
                normal: info.tb.normal,
                color: info.texture.sample(1.0 - th.v, 1.0 - th.u),
            }, 2);
        }

        Intersection::miss(2)
    }

    /// Tests every child and keeps the nearest hit.
    fn intersect_group(&self, ray: &Ray3D) -> Intersection {
        let children = match self.ty {
            ShapeType::Group(ref c) => c,
            _ => unreachable!(),
        };

        Intersection::aggregate(children.iter().map(|child| child.intersect(ray)))
    }
}

#[cfg(test)]
fn square_kite(z: f64, texture: TextureRef) -> Shape {
    // Corners (0,0) and (2,2), side corner (2,0); mirrored side is (0,2).
    Shape::kite(
        Tuple3D::new(0.0, 0.0, z),
        Tuple3D::new(2.0, 2.0, z),
        Tuple3D::new(2.0, 0.0, z),
        texture,
    )
}

#[cfg(test)]
fn toward_z(x: f64, y: f64) -> Ray3D {
    Ray3D::new(Tuple3D::new(x, y, -5.0), Tuple3D::new(0.0, 0.0, 1.0))
}

#[test]
fn creating_a_shape_group() {
    let g = Shape::group();

    assert_eq!(g.children().unwrap().len(), 0);
    assert_eq!(g.count_primitives(), 0);
}

#[test]
fn adding_a_child_to_a_shape_group() {
    let mut g = Shape::group();
    g.add_child(Shape::triangle(
        Tuple3D::new(0.0, 0.0, 4.0),
        Tuple3D::new(1.0, 0.0, 3.0),
        Tuple3D::new(0.0, 1.0, 4.0),
        Color::red(),
    ));

    assert_eq!(g.children().unwrap().len(), 1);
    assert_eq!(g.z_front(), 3.0);
}

#[test]
#[should_panic]
fn adding_a_child_to_a_leaf_panics() {
    let mut s = Shape::empty();
    s.add_child(Shape::group());
}

#[test]
fn intersecting_ray_with_empty_group() {
    let g = Shape::group();
    let i = g.intersect(&toward_z(0.0, 0.0));

    assert_eq!(i, Intersection::miss(0));
}

#[test]
fn triangle_hit_carries_its_color_and_normal() {
    let t = Shape::triangle(
        Tuple3D::new(0.0, 0.0, 1.0),
        Tuple3D::new(1.0, 0.0, 1.0),
        Tuple3D::new(0.0, 1.0, 1.0),
        Color::red(),
    );

    let i = t.intersect(&toward_z(0.25, 0.25));
    let h = i.hit.unwrap();
    assert_eq!(i.tests, 1);
    assert_eq!(h.color, Color::red());
    assert_eq!(h.normal, Tuple3D::new(0.0, 0.0, 1.0));
    assert_eq!(h.position, Tuple3D::new(0.25, 0.25, 1.0));
}

#[test]
fn kite_counts_one_test_when_first_triangle_hits() {
    use crate::texture::Uniform;

    let k = square_kite(1.0, Uniform::shared(Color::blue()));
    // Below the diagonal: inside triangle (0,0),(2,2),(2,0).
    let i = k.intersect(&toward_z(1.5, 0.5));

    assert_eq!(i.tests, 1);
    assert_eq!(i.hit.unwrap().color, Color::blue());
}

#[test]
fn kite_counts_two_tests_when_mirrored_triangle_hits() {
    use crate::texture::Uniform;

    let k = square_kite(1.0, Uniform::shared(Color::blue()));
    // Above the diagonal: inside the mirrored triangle (0,0),(2,2),(0,2).
    let i = k.intersect(&toward_z(0.5, 1.5));

    assert_eq!(i.tests, 2);
    assert_eq!(i.hit.unwrap().position, Tuple3D::new(0.5, 1.5, 1.0));
}

#[test]
fn kite_counts_two_tests_on_a_miss() {
    use crate::texture::Uniform;

    let k = square_kite(1.0, Uniform::shared(Color::blue()));
    let i = k.intersect(&toward_z(3.0, 3.0));

    assert_eq!(i, Intersection::miss(2));
}

#[test]
fn kite_samples_mirrored_weights_in_second_triangle() {
    use std::sync::Arc;
    use crate::texture::{ quadrant_image, Texture };

    let texture: TextureRef = Arc::new(quadrant_image());
    let k = square_kite(1.0, Arc::clone(&texture));

    // First triangle at (1.9, 0.1): e1 = (2,2), e2 = (2,0), so
    // u = 0.05, v = 0.9. Samples pixel (0, 4 -> 3): blue.
    let first = k.intersect(&toward_z(1.9, 0.1)).hit.unwrap();
    assert_eq!(first.color, texture.sample(0.05, 0.9));
    assert_eq!(first.color, Color::blue());

    // The mirror of (1.9, 0.1) through the diagonal midpoint (1, 1) is
    // (0.1, 1.9), which lies in the second triangle with the same weights
    // (u = 0.05, v = 0.9). Remapped to (1 - v, 1 - u) = (0.1, 0.95): the
    // sample point mirrored across the texture's anti-diagonal.
    let second = k.intersect(&toward_z(0.1, 1.9)).hit.unwrap();
    assert_eq!(second.color, texture.sample(0.1, 0.95));
    assert_eq!(second.color, Color::blue());

    // Near the shared corner in the second triangle: u = 0.1, v = 0.05
    // remaps to (0.95, 0.9), the white quadrant.
    let far = k.intersect(&toward_z(0.2, 0.3));
    assert_eq!(far.tests, 2);
    assert_eq!(far.hit.unwrap().color, Color::white());
}

#[test]
fn group_returns_nearest_of_overlapping_children() {
    let layer = |z: f64, color: Color| Shape::triangle(
        Tuple3D::new(-10.0, -10.0, z),
        Tuple3D::new(10.0, -10.0, z),
        Tuple3D::new(0.0, 10.0, z),
        color,
    );

    let mut g = Shape::group();
    g.add_child(layer(6.0, Color::white()));
    g.add_child(layer(2.0, Color::red()));
    g.add_child(layer(4.0, Color::blue()));

    let r = toward_z(0.0, 0.0);
    let expected_tests: usize = g.children().unwrap().iter()
        .map(|c| c.intersect(&r).tests)
        .sum();

    let i = g.intersect(&r);
    assert_eq!(i.hit.unwrap().color, Color::red());
    assert_eq!(i.hit.unwrap().distance(), 2.0);
    assert_eq!(i.tests, expected_tests);
    assert_eq!(i.tests, 3);
}

#[test]
fn nested_groups_sum_leaf_tests() {
    use crate::texture::Uniform;

    let mut inner = Shape::group();
    inner.add_child(square_kite(3.0, Uniform::shared(Color::blue())));
    inner.add_child(square_kite(8.0, Uniform::shared(Color::white())));

    let mut outer = Shape::group();
    outer.add_child(inner);
    outer.add_child(Shape::empty());

    // Misses both kites: 2 tests each.
    let i = outer.intersect(&toward_z(-1.0, -1.0));
    assert!(!i.is_hit());
    assert_eq!(i.tests, 4);
    assert_eq!(outer.count_primitives(), 2);
}

#[test]
fn nearest_hit_measures_from_world_origin() {
    // The ray starts at z = 20 and travels towards -z, so the layer at
    // z = 12 is struck first along the ray. The layer at z = 3 is closer
    // to the world origin, and that is the one reported.
    let layer = |z: f64, color: Color| Shape::triangle(
        Tuple3D::new(-10.0, -10.0, z),
        Tuple3D::new(10.0, -10.0, z),
        Tuple3D::new(0.0, 10.0, z),
        color,
    );

    let mut g = Shape::group();
    g.add_child(layer(12.0, Color::white()));
    g.add_child(layer(3.0, Color::red()));

    let r = Ray3D::new(Tuple3D::new(0.0, 0.0, 20.0), Tuple3D::new(0.0, 0.0, -1.0));
    assert_eq!(g.intersect(&r).hit.unwrap().color, Color::red());
}

#[test]
fn sorting_front_to_back_keeps_result() {
    let layer = |z: f64, color: Color| Shape::triangle(
        Tuple3D::new(-10.0, -10.0, z),
        Tuple3D::new(10.0, -10.0, z),
        Tuple3D::new(0.0, 10.0, z),
        color,
    );

    let mut g = Shape::group();
    g.add_child(layer(9.0, Color::white()));
    g.add_child(layer(5.0, Color::red()));
    g.add_child(layer(7.0, Color::blue()));

    let r = toward_z(0.0, 0.0);
    let before = g.intersect(&r);
    g.sort_front_to_back();
    let after = g.intersect(&r);

    let zs: Vec<f64> = g.children().unwrap().iter().map(|c| c.z_front()).collect();
    assert_eq!(zs, vec![5.0, 7.0, 9.0]);
    assert_eq!(before, after);
}

#[test]
fn sorting_with_degenerate_children() {
    let nan = std::f64::NAN;
    let mut g = Shape::group();

    for i in 0..40 {
        let z = if i % 3 == 0 { nan } else { (40 - i) as f64 };
        g.add_child(Shape::triangle(
            Tuple3D::new(0.0, 0.0, z),
            Tuple3D::new(1.0, 0.0, z),
            Tuple3D::new(0.0, 1.0, z),
            Color::white(),
        ));
    }

    g.sort_front_to_back();

    let zs: Vec<f64> = g.children().unwrap().iter().map(|c| c.z_front()).collect();
    let finite: Vec<f64> = zs.iter().cloned().take_while(|z| !z.is_nan()).collect();

    assert_eq!(zs.len(), 40);
    assert_eq!(finite.len(), 26);
    assert!(finite.windows(2).all(|w| w[0] <= w[1]));
    assert!(zs[26..].iter().all(|z| z.is_nan()));
}
