use std::f64::consts::PI;
use std::sync::Arc;

use crate::consts::{ HELPER_PARALLEL_LIMIT, TORUS_MAJOR_STEPS, TORUS_MINOR_STEPS };
use crate::tuple::Tuple3D;
use crate::texture::TextureRef;
use crate::shape::Shape;

/// A circle in space: a center, the axis it is perpendicular to, and a
/// radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Circle {
    pub center: Tuple3D,
    pub axis: Tuple3D,
    pub radius: f64,
}

impl Circle {
    /// Creates a circle. The axis is normalized here.
    pub fn new(center: Tuple3D, axis: Tuple3D, radius: f64) -> Circle {
        Circle { center, axis: axis.normalize(), radius }
    }

    /// Two unit vectors spanning the circle's plane.
    ///
    /// The X axis is crossed with the circle's axis to get the first one,
    /// unless the two are close to parallel, in which case the Y axis is used.
    pub fn basis(&self) -> (Tuple3D, Tuple3D) {
        let x_axis = Tuple3D::new(1.0, 0.0, 0.0);
        let helper = if x_axis.component(&self.axis).abs() > HELPER_PARALLEL_LIMIT {
            Tuple3D::new(0.0, 1.0, 0.0)
        } else {
            x_axis
        };

        let rx = self.axis.cross(&helper).normalize();
        let ry = self.axis.cross(&rx);

        (rx, ry)
    }

    /// `n` points evenly spaced around the circle, starting on the first
    /// basis vector.
    pub fn points(&self, n: usize) -> Vec<Tuple3D> {
        let (rx, ry) = self.basis();
        let step = 2.0 * PI / n as f64;

        (0..n).map(|i| {
            let angle = step * i as f64;
            self.center
                + rx * (self.radius * angle.cos())
                + ry * (self.radius * angle.sin())
        }).collect()
    }
}

/// Samples a torus as a `num_major` by `num_minor` grid.
///
/// Row `i` is the tube cross-section at the `i`th point of the major circle:
/// a circle of radius `thickness / 2` whose axis is the major circle's
/// tangent there. An axis perpendicular to both the tangent and the torus
/// axis (the radial direction) would lay each circle flat in the torus
/// plane instead of across the tube.
///
/// Like the other generators here, the grid is stitched into kites by
/// `grid_to_kites` once, while the scene is built.
pub fn torus_grid(center: Tuple3D, axis: Tuple3D, radius: f64,
    thickness: f64, num_major: usize, num_minor: usize) -> Vec<Vec<Tuple3D>> {
    let major = Circle::new(center, axis, radius);

    major.points(num_major).into_iter().map(|p| {
        let radial = p - center;
        let tangent = major.axis.cross(&radial);

        Circle::new(p, tangent, thickness / 2.0).points(num_minor)
    }).collect()
}

/// Stitches a closed grid into kites.
///
/// Cell `(i, j)` becomes a kite on `grid[i][j]` and `grid[i+1][j+1]` with
/// side corner `grid[i][j+1]`. Both indices wrap, so the last row joins the
/// first and the last column joins the first.
pub fn grid_to_kites(grid: &[Vec<Tuple3D>], texture: &TextureRef) -> Shape {
    let mut group = Shape::group();
    let rows = grid.len();

    for i in 0..rows {
        let cols = grid[i].len();
        let next_row = &grid[(i + 1) % rows];

        for j in 0..cols {
            let next_j = (j + 1) % cols;

            group.add_child(Shape::kite(
                grid[i][j],
                next_row[next_j],
                grid[i][next_j],
                Arc::clone(texture),
            ));
        }
    }

    group
}

/// A torus at the default tessellation.
pub fn torus(center: Tuple3D, axis: Tuple3D, radius: f64, thickness: f64,
    texture: TextureRef) -> Shape {
    torus_with_steps(center, axis, radius, thickness,
        TORUS_MAJOR_STEPS, TORUS_MINOR_STEPS, texture)
}

pub fn torus_with_steps(center: Tuple3D, axis: Tuple3D, radius: f64,
    thickness: f64, num_major: usize, num_minor: usize, texture: TextureRef)
    -> Shape {
    let grid = torus_grid(center, axis, radius, thickness, num_major, num_minor);
    let torus = grid_to_kites(&grid, &texture);

    log::debug!("Torus at {:?}: {} kites", center, torus.count_primitives());
    torus
}

/// A parallelepiped spanned by three edges from one corner.
///
/// Three faces meet at `corner`; the other three meet at the opposite corner
/// `corner + e1 + e2 + e3` and are spanned by the negated edges.
pub fn parallelepiped(corner: Tuple3D, e1: Tuple3D, e2: Tuple3D, e3: Tuple3D,
    texture: TextureRef) -> Shape {
    let opposite = corner + e1 + e2 + e3;
    let mut group = Shape::group();

    for (ea, eb) in [(e1, e2), (e2, e3), (e3, e1)] {
        group.add_child(Shape::kite(
            corner, corner + ea + eb, corner + ea, Arc::clone(&texture)
        ));
        group.add_child(Shape::kite(
            opposite, opposite - ea - eb, opposite - ea, Arc::clone(&texture)
        ));
    }

    group
}

/// A flat ring between radii `inner_radius` and `inner_radius + thickness`.
///
/// An inner radius of zero gives a full disc.
pub fn disc(center: Tuple3D, axis: Tuple3D, inner_radius: f64,
    thickness: f64, steps: usize, texture: TextureRef) -> Shape {
    let inner = Circle::new(center, axis, inner_radius).points(steps);
    let outer = Circle::new(center, axis, inner_radius + thickness).points(steps);
    let mut group = Shape::group();

    for i in 0..steps {
        let next = (i + 1) % steps;

        group.add_child(Shape::kite(
            inner[i], outer[next], outer[i], Arc::clone(&texture)
        ));
    }

    group
}

#[cfg(test)]
use crate::feq;

#[cfg(test)]
fn plain() -> TextureRef {
    crate::texture::Uniform::shared(crate::color::Color::white())
}

#[test]
fn circle_points_lie_on_circle() {
    let c = Circle::new(Tuple3D::new(1.0, 2.0, 3.0), Tuple3D::new(0.0, 0.0, 2.0), 5.0);
    let points = c.points(12);

    assert_eq!(points.len(), 12);
    for p in points.iter() {
        let offset = *p - c.center;
        assert!(feq(offset.magnitude(), 5.0));
        assert!(feq(offset.dot(&c.axis), 0.0));
    }
}

#[test]
fn circle_points_are_evenly_spaced() {
    let c = Circle::new(Tuple3D::origin(), Tuple3D::new(1.0, 1.0, 1.0), 2.0);
    let points = c.points(6);

    // Hexagon: neighbouring points are one radius apart.
    for i in 0..6 {
        let d = (points[(i + 1) % 6] - points[i]).magnitude();
        assert!(feq(d, 2.0));
    }
}

#[test]
fn circle_around_x_axis_is_not_degenerate() {
    let c = Circle::new(Tuple3D::origin(), Tuple3D::new(1.0, 0.0, 0.0), 1.0);
    let (rx, ry) = c.basis();

    assert!(feq(rx.magnitude(), 1.0));
    assert!(feq(ry.magnitude(), 1.0));
    assert!(feq(rx.dot(&ry), 0.0));
    assert!(feq(rx.dot(&c.axis), 0.0));
}

#[test]
fn torus_grid_has_requested_shape() {
    let grid = torus_grid(Tuple3D::origin(), Tuple3D::new(0.0, 1.0, 0.0),
        10.0, 2.0, 16, 6);

    assert_eq!(grid.len(), 16);
    assert!(grid.iter().all(|row| row.len() == 6));

    // Every sample is one tube radius from the major circle.
    for row in grid.iter() {
        for p in row.iter() {
            let height = p.y;
            let flat = Tuple3D::new(p.x, 0.0, p.z).magnitude();
            let tube = ((flat - 10.0).powi(2) + height.powi(2)).sqrt();
            assert!(feq(tube, 1.0));
        }
    }
}

#[test]
fn torus_rows_are_tube_cross_sections() {
    let axis = Tuple3D::new(0.0, 0.0, 1.0);
    let major = Circle::new(Tuple3D::origin(), axis, 10.0).points(8);
    let grid = torus_grid(Tuple3D::origin(), axis, 10.0, 2.0, 8, 4);

    for (p, row) in major.iter().zip(grid.iter()) {
        let tangent = axis.cross(p);

        // Each row lies across the tube and reaches above the torus plane.
        assert!(row.iter().all(|q| feq((*q - *p).dot(&tangent), 0.0)));
        assert!(row.iter().any(|q| feq(q.z.abs(), 1.0)));
    }
}

#[test]
fn torus_last_cell_wraps_to_first_row_and_column() {
    let grid = torus_grid(Tuple3D::origin(), Tuple3D::new(0.0, 0.0, 1.0),
        10.0, 2.0, 8, 4);
    let torus = grid_to_kites(&grid, &plain());
    let kites = torus.children().unwrap();

    assert_eq!(kites.len(), 8 * 4);

    let last = match kites[kites.len() - 1].ty {
        crate::shape::ShapeType::Kite(ref k) => k.clone(),
        _ => unreachable!(),
    };

    assert_eq!(last.ta.a, grid[7][3]);
    assert_eq!(last.ta.b, grid[0][0]);
    assert_eq!(last.ta.c, grid[7][0]);
}

#[test]
fn torus_seam_is_closed() {
    use crate::ray::Ray3D;

    let grid = torus_grid(Tuple3D::new(0.0, 0.0, 50.0),
        Tuple3D::new(0.0, 0.0, 1.0), 10.0, 4.0, 8, 4);
    let torus = grid_to_kites(&grid, &plain());

    // The cells closing the tube (last row to first), closing the ring
    // (last column to first), and the corner where both wrap.
    let seam_cells = [
        (grid[7][1], grid[0][2], grid[7][2]),
        (grid[3][3], grid[4][0], grid[3][0]),
        (grid[7][3], grid[0][0], grid[7][0]),
    ];

    for (a, b, c) in seam_cells.iter() {
        let centroid = (*a + *b + *c) * (1.0 / 3.0);
        let normal = (*b - *a).cross(&(*c - *a)).normalize();
        let r = Ray3D::new(centroid + normal * 5.0, -normal);

        assert!(torus.intersect(&r).is_hit(), "seam miss at {:?}", centroid);
    }
}

#[test]
fn parallelepiped_has_six_faces() {
    let p = parallelepiped(Tuple3D::origin(),
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(0.0, 1.0, 0.0),
        Tuple3D::new(0.0, 0.0, 1.0),
        plain());

    assert_eq!(p.count_primitives(), 6);
}

#[test]
fn unit_cube_is_hit_on_every_side() {
    use crate::ray::Ray3D;

    let cube = parallelepiped(Tuple3D::origin(),
        Tuple3D::new(2.0, 0.0, 0.0),
        Tuple3D::new(0.0, 2.0, 0.0),
        Tuple3D::new(0.0, 0.0, 2.0),
        plain());
    let center = Tuple3D::new(1.0, 1.0, 1.0);

    for dir in [
        Tuple3D::new(1.0, 0.0, 0.0), Tuple3D::new(-1.0, 0.0, 0.0),
        Tuple3D::new(0.0, 1.0, 0.0), Tuple3D::new(0.0, -1.0, 0.0),
        Tuple3D::new(0.0, 0.0, 1.0), Tuple3D::new(0.0, 0.0, -1.0),
    ] {
        // Slightly off-center so the ray doesn't run along a diagonal.
        let origin = center + dir * 5.0 + Tuple3D::new(0.1, 0.2, 0.3);
        let r = Ray3D::new(origin, -dir);
        let i = cube.intersect(&r);

        // Both faces on the ray's path are hit; whichever is nearer the
        // world origin is reported.
        assert!(i.is_hit(), "no face towards {:?}", dir);
        let face = i.hit.unwrap().position - center;
        assert!(feq(face.dot(&dir).abs(), 1.0));
    }
}

#[test]
fn disc_is_hit_inside_ring_only() {
    use crate::ray::Ray3D;

    let ring = disc(Tuple3D::origin(), Tuple3D::new(0.0, 0.0, 1.0),
        2.0, 3.0, 10, plain());
    assert_eq!(ring.count_primitives(), 10);

    let down = |x: f64, y: f64| Ray3D::new(
        Tuple3D::new(x, y, 5.0), Tuple3D::new(0.0, 0.0, -1.0)
    );

    assert!(ring.intersect(&down(3.5, 0.1)).is_hit());
    assert!(!ring.intersect(&down(0.2, 0.1)).is_hit());
    assert!(!ring.intersect(&down(9.0, 0.0)).is_hit());
}
