use smallvec::SmallVec;
use std::cmp::Ordering;

use crate::ray::Ray;
use crate::shape::{Intersection, Shape};
use crate::tuple::{approx_cmp, approx_eq, Point, Vector, EPSILON};

pub(super) fn intersect(
    shape: &'static Shape,
    ray: &Ray,
    minimum: f64,
    maximum: f64,
    closed: bool,
) -> SmallVec<[Intersection; 8]> {
    let mut xs = SmallVec::new();

    let (o, d) = (ray.origin, ray.direction);
    let a = d.x.mul_add(d.x, d.z.mul_add(d.z, -(d.y * d.y)));
    let b = 2. * o.x.mul_add(d.x, o.z.mul_add(d.z, -(o.y * d.y)));
    let c = o.x.mul_add(o.x, o.z.mul_add(o.z, -(o.y * o.y)));

    if approx_eq(a, 0.) {
        // Parallel to one half of the double cone; a single hit on the
        // other half unless the ray also misses that.
        if !approx_eq(b, 0.) {
            xs.push(Intersection::new(-c / (2. * b), shape));
        }
    } else {
        let discriminant = b.mul_add(b, -(4. * a * c));
        if approx_cmp(discriminant, 0.) != Ordering::Less {
            let root = discriminant.max(0.).sqrt();
            let mut t0 = (-b - root) / (2. * a);
            let mut t1 = (-b + root) / (2. * a);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            for t in [t0, t1] {
                let y = t.mul_add(d.y, o.y);
                if approx_cmp(minimum, y) == Ordering::Less
                    && approx_cmp(y, maximum) == Ordering::Less
                {
                    xs.push(Intersection::new(t, shape));
                }
            }
        }
    }

    intersect_caps(shape, ray, minimum, maximum, closed, &mut xs);
    xs
}

// The cap radius grows with distance from the apex.
fn check_cap(ray: &Ray, t: f64, radius: f64) -> bool {
    let x = t.mul_add(ray.direction.x, ray.origin.x);
    let z = t.mul_add(ray.direction.z, ray.origin.z);
    z.mul_add(z, x.powi(2)) <= radius.abs()
}

fn intersect_caps(
    shape: &'static Shape,
    ray: &Ray,
    minimum: f64,
    maximum: f64,
    closed: bool,
    xs: &mut SmallVec<[Intersection; 8]>,
) {
    if !closed || approx_eq(ray.direction.y, 0.) {
        return;
    }

    let t0 = (minimum - ray.origin.y) / ray.direction.y;
    if check_cap(ray, t0, minimum) {
        xs.push(Intersection::new(t0, shape));
    }

    let t1 = (maximum - ray.origin.y) / ray.direction.y;
    if check_cap(ray, t1, maximum) {
        xs.push(Intersection::new(t1, shape));
    }
}

pub(super) fn normal_at(point: &Point, minimum: f64, maximum: f64) -> Vector {
    let distance = point.z.mul_add(point.z, point.x.powi(2));

    if distance < 1. && point.y >= maximum - EPSILON {
        return Vector::new(0., 1., 0.);
    }

    if distance < 1. && point.y <= minimum + EPSILON {
        return Vector::new(0., -1., 0.);
    }

    let mut y = distance.sqrt();
    if point.y > 0. {
        y = -y;
    }
    Vector::new(point.x, y, point.z)
}
