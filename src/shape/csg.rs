use itertools::Itertools;
use smallvec::SmallVec;

use crate::ray::Ray;
use crate::shape::{Intersection, Shape};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CsgOp {
    Union,
    Intersect,
    Difference,
}

impl CsgOp {
    fn intersection_allowed(self, left_hit: bool, in_left: bool, in_right: bool) -> bool {
        match self {
            Self::Union => (left_hit && !in_right) || (!left_hit && !in_left),
            Self::Intersect => (left_hit && in_right) || (!left_hit && in_left),
            Self::Difference => (left_hit && !in_right) || (!left_hit && in_left),
        }
    }
}

/// Walks the merged intersections in order, tracking which child the ray is
/// currently inside of, and keeps only the boundaries the operation admits.
pub(super) fn filter_intersections(
    operation: CsgOp,
    left: &Shape,
    xs: SmallVec<[Intersection; 8]>,
) -> SmallVec<[Intersection; 8]> {
    let mut in_left = false;
    let mut in_right = false;
    let mut result = SmallVec::new();

    for i in xs {
        let left_hit = left.includes(i.shape);
        if operation.intersection_allowed(left_hit, in_left, in_right) {
            result.push(i);
        }
        if left_hit {
            in_left = !in_left;
        } else {
            in_right = !in_right;
        }
    }

    result
}

pub(super) fn intersect(
    operation: CsgOp,
    left: &'static Shape,
    right: &'static Shape,
    ray: &Ray,
) -> SmallVec<[Intersection; 8]> {
    let xs = left
        .intersect(ray)
        .into_iter()
        .flatten()
        .chain(right.intersect(ray).into_iter().flatten())
        .sorted()
        .collect();

    filter_intersections(operation, left, xs)
}
