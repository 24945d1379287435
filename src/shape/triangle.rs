use smallvec::{smallvec, SmallVec};

use crate::ray::Ray;
use crate::shape::{Intersection, Shape};
use crate::tuple::{Point, Vector, EPSILON};

/// A flat triangle with its edge vectors and face normal precomputed.
#[derive(Debug, Copy, Clone)]
pub struct Triangle {
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
    pub e1: Vector,
    pub e2: Vector,
    pub normal: Vector,
}

impl Triangle {
    pub fn new(p1: Point, p2: Point, p3: Point) -> Self {
        let e1 = p2 - p1;
        let e2 = p3 - p1;
        Self {
            p1,
            p2,
            p3,
            e1,
            e2,
            normal: e2.cross(&e1).normalize(),
        }
    }
}

// Moeller-Trumbore.
pub(super) fn intersect(
    shape: &'static Shape,
    triangle: &Triangle,
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
    smallvec![Intersection::new(t, shape)]
}
