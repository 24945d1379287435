use smallvec::{smallvec, SmallVec};
use std::mem::swap;

use crate::ray::Ray;
use crate::shape::{Intersection, Shape};
use crate::tuple::{approx_cmp, Point, Vector, EPSILON};

pub(super) fn intersect(shape: &'static Shape, ray: &Ray) -> SmallVec<[Intersection; 8]> {
    let (xtmin, xtmax) = check_axis(ray.origin.x, ray.direction.x);
    let (ytmin, ytmax) = check_axis(ray.origin.y, ray.direction.y);
    let (ztmin, ztmax) = check_axis(ray.origin.z, ray.direction.z);

    let tmin = [xtmin, ytmin, ztmin]
        .into_iter()
        .max_by(|&a, &b| approx_cmp(a, b))
        .unwrap();
    let tmax = [xtmax, ytmax, ztmax]
        .into_iter()
        .min_by(|&a, &b| approx_cmp(a, b))
        .unwrap();

    if tmin > tmax {
        return smallvec![];
    }

    smallvec![
        Intersection::new(tmin, shape),
        Intersection::new(tmax, shape),
    ]
}

// Signed infinities keep the slab ordering when the ray is parallel to an
// axis.
fn check_axis(origin: f64, direction: f64) -> (f64, f64) {
    let tmin_numerator = -1. - origin;
    let tmax_numerator = 1. - origin;
    let mut tmin;
    let mut tmax;

    if direction.abs() >= EPSILON {
        tmin = tmin_numerator / direction;
        tmax = tmax_numerator / direction;
    } else {
        tmin = tmin_numerator * f64::INFINITY;
        tmax = tmax_numerator * f64::INFINITY;
    }

    if tmin > tmax {
        swap(&mut tmin, &mut tmax);
    }

    (tmin, tmax)
}

pub(super) fn normal_at(point: &Point) -> Vector {
    let maxc = [point.x.abs(), point.y.abs(), point.z.abs()]
        .into_iter()
        .max_by(|a, b| a.partial_cmp(b).unwrap())
        .unwrap();

    if maxc == point.x.abs() {
        Vector::new(point.x, 0., 0.)
    } else if maxc == point.y.abs() {
        Vector::new(0., point.y, 0.)
    } else {
        Vector::new(0., 0., point.z)
    }
}
