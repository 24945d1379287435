use itertools::Itertools;
use smallvec::SmallVec;

use crate::ray::Ray;
use crate::shape::{Intersection, Shape};

/// Children are intersected linearly in their own frames; the merged list
/// is sorted by t.
pub(super) fn intersect(
    children: &[&'static Shape],
    ray: &Ray,
) -> SmallVec<[Intersection; 8]> {
    children
        .iter()
        .filter_map(|child| child.intersect(ray))
        .flatten()
        .sorted()
        .collect()
}
