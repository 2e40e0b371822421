use crate::tuple::Tuple3D;
use crate::color::Color;

/// A surface hit.
///
/// Records where a ray struck a primitive, the primitive's (unnormalized)
/// normal and the base color found at that spot. Hits are transient; the
/// nearest one is kept and the rest are dropped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    pub position: Tuple3D,
    pub normal: Tuple3D,
    pub color: Color,
}

impl Hit {
    /// Distance of the hit from the world origin.
    ///
    /// This is the measure used to pick the nearest hit, at every level of
    /// the scene graph. It is *not* the distance along the ray.
    pub fn distance(&self) -> f64 {
        self.position.magnitude()
    }

    /// Strictly nearer than `other`. A NaN distance is farther than any
    /// number, so degenerate hits never shadow real ones.
    pub fn is_nearer_than(&self, other: &Hit) -> bool {
        let (d, other_d) = (self.distance(), other.distance());

        d < other_d || (other_d.is_nan() && !d.is_nan())
    }
}

/// The outcome of one ray query against a shape.
///
/// `tests` counts the primitive-level (leaf) intersection attempts that were
/// made to answer the query, whether or not anything was hit.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Intersection {
    pub hit: Option<Hit>,
    pub tests: usize,
}

impl Intersection {
    /// A query which found nothing after `tests` attempts.
    pub fn miss(tests: usize) -> Intersection {
        Intersection { hit: None, tests }
    }

    /// A query which found `hit` after `tests` attempts.
    pub fn hit(hit: Hit, tests: usize) -> Intersection {
        Intersection { hit: Some(hit), tests }
    }

    pub fn is_hit(&self) -> bool {
        self.hit.is_some()
    }

    /// Folds several intersections into one.
    ///
    /// Test counts are summed. Of all hits, the one with the smallest
    /// `Hit::distance` is kept; on an exact tie the earlier one wins.
    pub fn aggregate<I>(intersections: I) -> Intersection
        where I: IntoIterator<Item = Intersection> {
        let mut aggregated = Intersection::miss(0);

        for i in intersections {
            aggregated.tests += i.tests;

            aggregated.hit = match (aggregated.hit, i.hit) {
                (None, h) => h,
                (Some(best), Some(h)) if h.is_nearer_than(&best) => Some(h),
                (best, _) => best,
            };
        }

        aggregated
    }
}

#[cfg(test)]
fn hit_at(x: f64, y: f64, z: f64) -> Hit {
    Hit {
        position: Tuple3D::new(x, y, z),
        normal: Tuple3D::new(0.0, 0.0, -1.0),
        color: Color::white(),
    }
}

#[test]
fn hit_distance_is_from_world_origin() {
    let h = hit_at(3.0, 4.0, 0.0);

    assert_eq!(h.distance(), 5.0);
}

#[test]
fn aggregate_nothing() {
    let i = Intersection::aggregate(Vec::new());

    assert_eq!(i, Intersection::miss(0));
}

#[test]
fn aggregate_sums_tests_over_misses() {
    let i = Intersection::aggregate(vec![
        Intersection::miss(2),
        Intersection::miss(1),
        Intersection::miss(4),
    ]);

    assert!(!i.is_hit());
    assert_eq!(i.tests, 7);
}

#[test]
fn aggregate_keeps_nearest() {
    let near = hit_at(0.0, 0.0, 2.0);
    let mid = hit_at(0.0, 0.0, 5.0);
    let far = hit_at(0.0, 0.0, 9.0);

    let i = Intersection::aggregate(vec![
        Intersection::hit(mid, 1),
        Intersection::miss(2),
        Intersection::hit(far, 2),
        Intersection::hit(near, 1),
    ]);

    assert_eq!(i.hit, Some(near));
    assert_eq!(i.tests, 6);
}

#[test]
fn aggregate_tie_keeps_first() {
    let mut first = hit_at(0.0, 0.0, 5.0);
    first.color = Color::red();
    let second = hit_at(0.0, 5.0, 0.0);

    let i = Intersection::aggregate(vec![
        Intersection::hit(first, 1),
        Intersection::hit(second, 1),
    ]);

    assert_eq!(i.hit.unwrap().color, Color::red());
}

#[test]
fn aggregate_prefers_real_hits_over_nan() {
    let nan = std::f64::NAN;
    let mut degenerate = hit_at(nan, nan, nan);
    degenerate.color = Color::red();
    let real = hit_at(0.0, 0.0, 7.0);

    let i = Intersection::aggregate(vec![
        Intersection::hit(degenerate, 1),
        Intersection::hit(real, 1),
    ]);
    assert_eq!(i.hit.unwrap().color, Color::white());

    let i = Intersection::aggregate(vec![
        Intersection::hit(real, 1),
        Intersection::hit(degenerate, 1),
    ]);
    assert_eq!(i.hit.unwrap().color, Color::white());
    assert_eq!(i.tests, 2);
}
