use crate::consts::INTERSECT_EPSILON;
use crate::tuple::Tuple3D;
use crate::ray::Ray3D;
use crate::texture::TextureRef;

/// Information describing a triangle.
///
/// A triangle is made of three points, `a`, `b` and `c`. The edges `e1` and
/// `e2` share `a` (`e1 = b - a`, `e2 = c - a`) and are precomputed, as is the
/// normal `e1 x e2`.
///
/// The normal is left unnormalized. Its direction depends on vertex order,
/// and collinear vertices give a zero normal.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TriangleInfo {
    pub a: Tuple3D,
    pub b: Tuple3D,
    pub c: Tuple3D,

    pub e1: Tuple3D,
    pub e2: Tuple3D,
    pub normal: Tuple3D,
}

/// Where a ray crossed a triangle.
///
/// `position` is `ray.position(t)`, which is also `a + u * e1 + v * e2`.
/// `u` and `v` are barycentric weights along `e1` and `e2`; `u + v <= 1`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleHit {
    pub t: f64,
    pub position: Tuple3D,
    pub u: f64,
    pub v: f64,
}

impl TriangleInfo {
    pub fn new(a: Tuple3D, b: Tuple3D, c: Tuple3D) -> TriangleInfo {
        let e1 = b - a;
        let e2 = c - a;
        let normal = e1.cross(&e2);

        TriangleInfo { a, b, c, e1, e2, normal }
    }

    /// Intersects a ray with the triangle (Moller-Trumbore).
    ///
    /// Rays parallel to the triangle's plane miss, as do hits at or behind
    /// the ray origin. Triangles are two-sided.
    pub fn intersect(&self, ray: &Ray3D) -> Option<TriangleHit> {
        let dir_cross_e2 = ray.direction.cross(&self.e2);
        let determinant = dir_cross_e2.dot(&self.e1);

        // If the ray is parallel to the triangle, there is no intersection.
        if determinant.abs() < INTERSECT_EPSILON {
            return None;
        }

        let f = 1.0 / determinant;
        let a_to_origin = ray.origin - self.a;
        let u = f * a_to_origin.dot(&dir_cross_e2);
        if u < 0.0 || u > 1.0 {
            return None;
        }

        let origin_cross_e1 = a_to_origin.cross(&self.e1);
        let v = f * ray.direction.dot(&origin_cross_e1);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * self.e2.dot(&origin_cross_e1);
        if t <= INTERSECT_EPSILON {
            return None;
        }

        Some(TriangleHit { t, position: ray.position(t), u, v })
    }

    /// The smallest Z of the three vertices.
    pub fn z_front(&self) -> f64 {
        self.a.z.min(self.b.z).min(self.c.z)
    }
}

/// Information describing a kite.
///
/// A kite approximates the quadrilateral `a, c, b, c'` with two triangles
/// sharing the diagonal `a`-`b`. The second apex `c'` is `c` reflected
/// through the midpoint of that diagonal (`c' = a + b - c`), so for a planar
/// input the kite is a parallelogram.
///
/// The texture is shared with every other kite cut from the same surface.
#[derive(Clone, Debug)]
pub struct KiteInfo {
    pub ta: TriangleInfo,
    pub tb: TriangleInfo,
    pub texture: TextureRef,
}

impl KiteInfo {
    pub fn new(a: Tuple3D, b: Tuple3D, c: Tuple3D, texture: TextureRef)
        -> KiteInfo {
        let mirrored = a + b - c;

        KiteInfo {
            ta: TriangleInfo::new(a, b, c),
            tb: TriangleInfo::new(a, b, mirrored),
            texture,
        }
    }

    /// The smallest Z over both triangles.
    pub fn z_front(&self) -> f64 {
        self.ta.z_front().min(self.tb.z_front())
    }
}

#[cfg(test)]
fn xy_triangle() -> TriangleInfo {
    TriangleInfo::new(
        Tuple3D::new(0.0, 0.0, 10.0),
        Tuple3D::new(4.0, 0.0, 10.0),
        Tuple3D::new(0.0, 4.0, 10.0),
    )
}

#[test]
fn constructing_a_triangle() {
    let t = TriangleInfo::new(
        Tuple3D::new(0.0, 1.0, 0.0),
        Tuple3D::new(-1.0, 0.0, 0.0),
        Tuple3D::new(1.0, 0.0, 0.0),
    );

    assert_eq!(t.e1, Tuple3D::new(-1.0, -1.0, 0.0));
    assert_eq!(t.e2, Tuple3D::new(1.0, -1.0, 0.0));
    assert_eq!(t.normal, Tuple3D::new(0.0, 0.0, 2.0));
}

#[test]
fn a_ray_strikes_a_triangle_at_known_weights() {
    use crate::feq;

    let t = xy_triangle();
    let (u0, v0) = (0.25, 0.5);
    let target = t.a + t.e1 * u0 + t.e2 * v0;
    let origin = Tuple3D::new(0.3, -0.2, -5.0);
    let r = Ray3D::new(origin, (target - origin) * 0.5);

    let h = t.intersect(&r).expect("ray aimed inside the triangle");
    assert!(feq(h.u, u0));
    assert!(feq(h.v, v0));
    assert_eq!(h.position, target);
    assert_eq!(h.position, r.position(h.t));
    assert!(feq(h.t, 2.0));
}

#[test]
fn a_ray_strikes_a_triangle_from_behind() {
    let t = xy_triangle();
    let r = Ray3D::new(
        Tuple3D::new(1.0, 1.0, 20.0),
        Tuple3D::new(0.0, 0.0, -1.0)
    );

    assert!(t.intersect(&r).is_some());
}

#[test]
fn intersecting_a_ray_parallel_to_a_triangle() {
    let t = xy_triangle();

    // Direction in the triangle's plane, from several origins.
    for origin in [
        Tuple3D::new(0.0, -1.0, 10.0),
        Tuple3D::new(1.0, 1.0, 10.0),
        Tuple3D::new(-3.0, 2.0, 0.0),
    ] {
        let r = Ray3D::new(origin, Tuple3D::new(1.0, 1.0, 0.0));
        assert!(t.intersect(&r).is_none());
    }
}

#[test]
fn a_ray_misses_each_edge() {
    let t = xy_triangle();
    let dir = Tuple3D::new(0.0, 0.0, 1.0);

    // u < 0
    let r = Ray3D::new(Tuple3D::new(-0.5, 1.0, 0.0), dir);
    assert!(t.intersect(&r).is_none());

    // v < 0
    let r = Ray3D::new(Tuple3D::new(1.0, -0.5, 0.0), dir);
    assert!(t.intersect(&r).is_none());

    // u + v > 1
    let r = Ray3D::new(Tuple3D::new(2.5, 2.5, 0.0), dir);
    assert!(t.intersect(&r).is_none());

    // u > 1
    let r = Ray3D::new(Tuple3D::new(5.0, 0.1, 0.0), dir);
    assert!(t.intersect(&r).is_none());
}

#[test]
fn a_triangle_behind_the_origin_is_missed() {
    let t = xy_triangle();
    let r = Ray3D::new(
        Tuple3D::new(1.0, 1.0, 15.0),
        Tuple3D::new(0.0, 0.0, 1.0)
    );

    assert!(t.intersect(&r).is_none());
}

#[test]
fn a_hit_at_the_origin_is_missed() {
    let t = xy_triangle();
    let r = Ray3D::new(
        Tuple3D::new(1.0, 1.0, 10.0),
        Tuple3D::new(0.0, 0.0, 1.0)
    );

    assert!(t.intersect(&r).is_none());
}

#[test]
fn kite_mirrors_apex_through_diagonal() {
    use crate::texture::Uniform;
    use crate::color::Color;

    let k = KiteInfo::new(
        Tuple3D::new(0.0, 0.0, 0.0),
        Tuple3D::new(2.0, 2.0, 0.0),
        Tuple3D::new(2.0, 0.0, 0.0),
        Uniform::shared(Color::white()),
    );

    assert_eq!(k.tb.c, Tuple3D::new(0.0, 2.0, 0.0));
    assert_eq!(k.ta.a, k.tb.a);
    assert_eq!(k.ta.b, k.tb.b);
}

#[test]
fn z_front_is_nearest_vertex() {
    let t = TriangleInfo::new(
        Tuple3D::new(0.0, 0.0, 3.0),
        Tuple3D::new(1.0, 0.0, -2.0),
        Tuple3D::new(0.0, 1.0, 7.0),
    );

    assert_eq!(t.z_front(), -2.0);
}
