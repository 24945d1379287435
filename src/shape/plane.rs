use smallvec::{smallvec, SmallVec};

use crate::ray::Ray;
use crate::shape::{Intersection, Shape};
use crate::tuple::{Vector, EPSILON};

pub(super) fn intersect(shape: &'static Shape, ray: &Ray) -> SmallVec<[Intersection; 8]> {
    if ray.direction.y.abs() < EPSILON {
        return smallvec![];
    }

    let t = -ray.origin.y / ray.direction.y;
    smallvec![Intersection::new(t, shape)]
}

pub(super) fn normal_at() -> Vector {
    Vector::new(0., 1., 0.)
}
