use smallvec::{smallvec, SmallVec};

use crate::ray::Ray;
use crate::shape::{Intersection, Shape};
use crate::tuple::{Point, Vector, EPSILON};

/// A triangle with per-vertex normals, interpolated at the hit point.
#[derive(Debug, Copy, Clone)]
pub struct SmoothTriangle {
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
    pub e1: Vector,
    pub e2: Vector,
    pub n1: Vector,
    pub n2: Vector,
    pub n3: Vector,
}

impl SmoothTriangle {
    pub fn new(p1: Point, p2: Point, p3: Point, n1: Vector, n2: Vector, n3: Vector) -> Self {
        Self {
            p1,
            p2,
            p3,
            e1: p2 - p1,
            e2: p3 - p1,
            n1,
            n2,
            n3,
        }
    }
}

// Moeller-Trumbore, keeping the barycentric coordinates for the normal.
pub(super) fn intersect(
    shape: &'static Shape,
    triangle: &SmoothTriangle,
    ray: &Ray,
) -> SmallVec<[Intersection; 8]> {
    let dir_cross_e2 = ray.direction.cross(&triangle.e2);
    let det = triangle.e1.dot(&dir_cross_e2);
    if det.abs() < EPSILON {
        return smallvec![];
    }

    let f = 1. / det;
    let p1_to_origin = ray.origin - triangle.p1;
    let u = f * p1_to_origin.dot(&dir_cross_e2);
    if !(0. ..=1.).contains(&u) {
        return smallvec![];
    }

    let origin_cross_e1 = p1_to_origin.cross(&triangle.e1);
    let v = f * ray.direction.dot(&origin_cross_e1);
    if v < 0. || (u + v) > 1. {
        return smallvec![];
    }

    let t = f * triangle.e2.dot(&origin_cross_e1);
    smallvec![Intersection::with_uv(t, shape, u, v)]
}

pub(super) fn normal_at(triangle: &SmoothTriangle, hit: Option<&Intersection>) -> Vector {
    let hit = hit.expect("smooth triangle normal requires the hit's uv coordinates");
    let u = hit.u.expect("smooth triangle hit is missing u");
    let v = hit.v.expect("smooth triangle hit is missing v");
    triangle.n2 * u + triangle.n3 * v + triangle.n1 * (1. - u - v)
}

#[cfg(test)]
mod tests {
    use crate::ray::Ray;
    use crate::shape::{Intersection, Shape};
    use crate::tuple::{approx_eq, Point, Vector};
    use pretty_assertions::assert_eq;

    fn fixture() -> &'static Shape {
        Shape::smooth_triangle(
            Point::new(0., 1., 0.),
            Point::new(-1., 0., 0.),
            Point::new(1., 0., 0.),
            Vector::new(0., 1., 0.),
            Vector::new(-1., 0., 0.),
            Vector::new(1., 0., 0.),
        )
    }

    #[test]
    pub fn intersection_records_uv() {
        let s = fixture();
        let r = Ray::new(Point::new(-0.2, 0.3, -2.), Vector::new(0., 0., 1.));
        let xs = s.local_intersect(&r).unwrap();
        assert!(approx_eq(xs[0].u.unwrap(), 0.45));
        assert!(approx_eq(xs[0].v.unwrap(), 0.25));
    }

    #[test]
    pub fn normal_is_interpolated_from_uv() {
        let s = fixture();
        let i = Intersection::with_uv(1., s, 0.45, 0.25);
        let n = s.normal_at(Point::new(0., 0., 0.), Some(&i));
        assert_eq!(n, Vector::new(-0.5547, 0.83205, 0.));
    }

    #[test]
    pub fn precompute_uses_interpolated_normal() {
        let s = fixture();
        let r = Ray::new(Point::new(-0.2, 0.3, -2.), Vector::new(0., 0., 1.));
        let xs = s.intersect(&r).unwrap();
        let comps = xs[0].precompute(&r, &xs);
        assert_eq!(comps.normal, Vector::new(-0.5547, 0.83205, 0.));
    }
}
