use smallvec::{smallvec, SmallVec};

use crate::ray::Ray;
use crate::shape::{Intersection, Shape};
use crate::tuple::{Point, Vector};

pub(super) fn intersect(shape: &'static Shape, ray: &Ray) -> SmallVec<[Intersection; 8]> {
    let sphere_to_ray = ray.origin - Point::zero();
    let a = ray.direction.dot(&ray.direction);
    let b = 2. * ray.direction.dot(&sphere_to_ray);
    let c = sphere_to_ray.dot(&sphere_to_ray) - 1.;

    let discriminant = b.mul_add(b, -(4. * a * c));
    if discriminant < 0. {
        return smallvec![];
    }

    let root = discriminant.sqrt();
    smallvec![
        Intersection::new((-b - root) / (2. * a), shape),
        Intersection::new((-b + root) / (2. * a), shape),
    ]
}

pub(super) fn normal_at(point: &Point) -> Vector {
    *point - Point::zero()
}
