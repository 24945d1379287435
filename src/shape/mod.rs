mod cone;
mod csg;
mod cube;
mod cylinder;
mod group;
mod plane;
mod smooth_triangle;
mod sphere;
mod triangle;

pub use csg::CsgOp;
pub use smooth_triangle::SmoothTriangle;
pub use triangle::Triangle;

use itertools::Itertools;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::OnceLock;

use crate::material::Material;
use crate::matrix::{Matrix4, NonInvertibleMatrix};
use crate::ray::Ray;
use crate::tuple::{Point, Vector, EPSILON};

static NEXT_SHAPE_ID: AtomicU64 = AtomicU64::new(1);

/// The kind-specific payload of a shape. Leaves are canonical unit solids in
/// object space; composites hold their children.
#[derive(Debug)]
pub enum Geometry {
    Sphere,
    Plane,
    Cube,
    Cylinder {
        minimum: f64,
        maximum: f64,
        closed: bool,
    },
    Cone {
        minimum: f64,
        maximum: f64,
        closed: bool,
    },
    Triangle(Triangle),
    SmoothTriangle(SmoothTriangle),
    Group(Vec<&'static Shape>),
    Csg {
        operation: CsgOp,
        left: &'static Shape,
        right: &'static Shape,
    },
}

impl Geometry {
    fn id_prefix(&self) -> &'static str {
        match self {
            Self::Sphere => "S",
            Self::Plane => "P",
            Self::Cube => "C",
            Self::Cylinder { .. } => "CY",
            Self::Cone { .. } => "CO",
            Self::Triangle(_) => "T",
            Self::SmoothTriangle(_) => "ST",
            Self::Group(_) => "G",
            Self::Csg { .. } => "CSG",
        }
    }
}

/// A shape: unique id, object-to-world transform (with cached inverse),
/// material, an optional upward link to the owning composite, and the
/// kind-specific geometry.
///
/// Shapes live for the duration of a render and are handed out as leaked
/// `&'static` references; the parent link is therefore non-owning and
/// guaranteed to outlive every child.
pub struct Shape {
    id: u64,
    transform: Matrix4,
    inverse_transform: Matrix4,
    pub material: Material,
    parent: OnceLock<&'static Shape>,
    geometry: Geometry,
}

impl Shape {
    fn new(geometry: Geometry) -> &'static mut Self {
        Box::leak(Box::new(Self {
            id: NEXT_SHAPE_ID.fetch_add(1, AtomicOrdering::Relaxed),
            transform: Matrix4::identity(),
            inverse_transform: Matrix4::identity(),
            material: Material::default(),
            parent: OnceLock::new(),
            geometry,
        }))
    }

    pub fn sphere() -> &'static mut Self {
        Self::new(Geometry::Sphere)
    }

    pub fn glass_sphere() -> &'static mut Self {
        Self::new(Geometry::Sphere).with_material(Material::glass())
    }

    pub fn plane() -> &'static mut Self {
        Self::new(Geometry::Plane)
    }

    pub fn cube() -> &'static mut Self {
        Self::new(Geometry::Cube)
    }

    pub fn cylinder() -> &'static mut Self {
        Self::new(Geometry::Cylinder {
            minimum: f64::NEG_INFINITY,
            maximum: f64::INFINITY,
            closed: false,
        })
    }

    pub fn constrained_cylinder(minimum: f64, maximum: f64, closed: bool) -> &'static mut Self {
        Self::new(Geometry::Cylinder {
            minimum,
            maximum,
            closed,
        })
    }

    pub fn cone() -> &'static mut Self {
        Self::new(Geometry::Cone {
            minimum: f64::NEG_INFINITY,
            maximum: f64::INFINITY,
            closed: false,
        })
    }

    pub fn constrained_cone(minimum: f64, maximum: f64, closed: bool) -> &'static mut Self {
        Self::new(Geometry::Cone {
            minimum,
            maximum,
            closed,
        })
    }

    pub fn triangle(p1: Point, p2: Point, p3: Point) -> &'static mut Self {
        Self::new(Geometry::Triangle(Triangle::new(p1, p2, p3)))
    }

    pub fn smooth_triangle(
        p1: Point,
        p2: Point,
        p3: Point,
        n1: Vector,
        n2: Vector,
        n3: Vector,
    ) -> &'static mut Self {
        Self::new(Geometry::SmoothTriangle(SmoothTriangle::new(
            p1, p2, p3, n1, n2, n3,
        )))
    }

    pub fn group(children: Vec<&'static Shape>) -> &'static Shape {
        let group: &'static Shape = Self::new(Geometry::Group(children));
        group.adopt_children();
        group
    }

    pub fn group_with_transform(
        transform: Matrix4,
        children: Vec<&'static Shape>,
    ) -> Result<&'static Shape, NonInvertibleMatrix> {
        let group: &'static Shape =
            Self::new(Geometry::Group(children)).set_transform(transform)?;
        group.adopt_children();
        Ok(group)
    }

    pub fn csg(operation: CsgOp, left: &'static Shape, right: &'static Shape) -> &'static Shape {
        let node: &'static Shape = Self::new(Geometry::Csg {
            operation,
            left,
            right,
        });
        node.adopt_children();
        node
    }

    pub fn csg_with_transform(
        operation: CsgOp,
        transform: Matrix4,
        left: &'static Shape,
        right: &'static Shape,
    ) -> Result<&'static Shape, NonInvertibleMatrix> {
        let node: &'static Shape = Self::new(Geometry::Csg {
            operation,
            left,
            right,
        })
        .set_transform(transform)?;
        node.adopt_children();
        Ok(node)
    }

    fn adopt_children(&'static self) {
        match &self.geometry {
            Geometry::Group(children) => {
                for child in children {
                    child.attach_to(self);
                }
            }
            Geometry::Csg { left, right, .. } => {
                left.attach_to(self);
                right.attach_to(self);
            }
            _ => {}
        }
    }

    /// A shape joins at most one composite over its lifetime.
    fn attach_to(&self, parent: &'static Shape) {
        if self.parent.set(parent).is_err() {
            panic!("shape {self} is already attached to a composite");
        }
    }

    pub fn set_transform(
        &'static mut self,
        transform: Matrix4,
    ) -> Result<&'static mut Self, NonInvertibleMatrix> {
        self.inverse_transform = transform.inverse()?;
        self.transform = transform;
        Ok(self)
    }

    pub fn with_material(&'static mut self, material: Material) -> &'static mut Self {
        self.material = material;
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn transform(&self) -> &Matrix4 {
        &self.transform
    }

    pub fn inverse_transform(&self) -> &Matrix4 {
        &self.inverse_transform
    }

    pub fn parent(&self) -> Option<&'static Shape> {
        self.parent.get().copied()
    }

    pub fn children(&self) -> &[&'static Shape] {
        match &self.geometry {
            Geometry::Group(children) => children,
            _ => panic!("shape {self} is not a group and has no children"),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn intersect(&'static self, ray: &Ray) -> Option<SmallVec<[Intersection; 8]>> {
        let local_ray = ray.transform(&self.inverse_transform);
        self.local_intersect(&local_ray)
    }

    /// Intersection against a ray already in this shape's object space.
    pub fn local_intersect(&'static self, ray: &Ray) -> Option<SmallVec<[Intersection; 8]>> {
        let xs = match &self.geometry {
            Geometry::Sphere => sphere::intersect(self, ray),
            Geometry::Plane => plane::intersect(self, ray),
            Geometry::Cube => cube::intersect(self, ray),
            Geometry::Cylinder {
                minimum,
                maximum,
                closed,
            } => cylinder::intersect(self, ray, *minimum, *maximum, *closed),
            Geometry::Cone {
                minimum,
                maximum,
                closed,
            } => cone::intersect(self, ray, *minimum, *maximum, *closed),
            Geometry::Triangle(triangle) => triangle::intersect(self, triangle, ray),
            Geometry::SmoothTriangle(triangle) => smooth_triangle::intersect(self, triangle, ray),
            Geometry::Group(children) => group::intersect(children, ray),
            Geometry::Csg {
                operation,
                left,
                right,
            } => csg::intersect(*operation, *left, *right, ray),
        };

        if xs.is_empty() {
            None
        } else {
            Some(xs)
        }
    }

    pub fn normal_at(&self, world_point: Point, hit: Option<&Intersection>) -> Vector {
        let local_point = self.world_to_object(world_point);
        let local_normal = self.local_normal(&local_point, hit);
        self.normal_to_world(local_normal)
    }

    fn local_normal(&self, point: &Point, hit: Option<&Intersection>) -> Vector {
        match &self.geometry {
            Geometry::Sphere => sphere::normal_at(point),
            Geometry::Plane => plane::normal_at(),
            Geometry::Cube => cube::normal_at(point),
            Geometry::Cylinder {
                minimum, maximum, ..
            } => cylinder::normal_at(point, *minimum, *maximum),
            Geometry::Cone {
                minimum, maximum, ..
            } => cone::normal_at(point, *minimum, *maximum),
            Geometry::Triangle(triangle) => triangle.normal,
            Geometry::SmoothTriangle(triangle) => smooth_triangle::normal_at(triangle, hit),
            Geometry::Group(_) => unreachable!("normals are computed on a group's children"),
            Geometry::Csg { .. } => unreachable!("normals are computed on a CSG node's leaves"),
        }
    }

    /// Walks the point down through every ancestor frame into this shape's
    /// object space.
    pub fn world_to_object(&self, point: Point) -> Point {
        let point = match self.parent.get() {
            Some(parent) => parent.world_to_object(point),
            None => point,
        };
        self.inverse_transform * point
    }

    /// Lifts an object-space normal up through every ancestor frame.
    pub fn normal_to_world(&self, normal: Vector) -> Vector {
        let normal = (self.inverse_transform.transpose() * normal).normalize();
        match self.parent.get() {
            Some(parent) => parent.normal_to_world(normal),
            None => normal,
        }
    }

    /// Whether `other` is this shape or a descendant of it; leaves compare
    /// by id.
    pub(crate) fn includes(&self, other: &Shape) -> bool {
        match &self.geometry {
            Geometry::Group(children) => children.iter().any(|child| child.includes(other)),
            Geometry::Csg { left, right, .. } => left.includes(other) || right.includes(other),
            _ => self.id == other.id,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.geometry.id_prefix(), self.id)
    }
}

// The parent link is omitted: printing it would walk back up the tree.
impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("id", &self.to_string())
            .field("transform", &self.transform)
            .field("material", &self.material)
            .field("geometry", &self.geometry)
            .finish()
    }
}

impl Eq for Shape {}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[derive(Debug, Copy, Clone)]
pub struct Intersection {
    pub t: f64,
    pub shape: &'static Shape,
    pub u: Option<f64>,
    pub v: Option<f64>,
}

impl Intersection {
    pub fn new(t: f64, shape: &'static Shape) -> Self {
        Self {
            t,
            shape,
            u: None,
            v: None,
        }
    }

    pub fn with_uv(t: f64, shape: &'static Shape, u: f64, v: f64) -> Self {
        Self {
            t,
            shape,
            u: Some(u),
            v: Some(v),
        }
    }

    /// The hit is the intersection with the smallest non-negative t.
    pub fn hit(intersections: &[Self]) -> Option<Self> {
        intersections
            .iter()
            .filter(|&&x| x.t >= 0.)
            .min_by(|x, y| x.t.partial_cmp(&y.t).unwrap())
            .copied()
    }

    /// Reconstructs the refractive indices on either side of the hit by
    /// replaying which shapes the ray is inside of at each intersection.
    fn refractive_indices(&self, xs: &[Self]) -> (f64, f64) {
        let mut n1 = 1.0;
        let mut n2 = 1.0;

        let mut containers: Vec<&'static Shape> = vec![];
        for i in xs {
            if i == self {
                if let Some(container) = containers.last() {
                    n1 = container.material.refractive_index;
                }
            }

            if let Some((index, _)) =
                containers.iter().find_position(|&&existing| existing == i.shape)
            {
                containers.remove(index);
            } else {
                containers.push(i.shape);
            }

            if i == self {
                if let Some(container) = containers.last() {
                    n2 = container.material.refractive_index;
                }
                break;
            }
        }

        (n1, n2)
    }

    pub fn precompute(self, ray: &Ray, xs: &[Self]) -> PrecomputedHit {
        let point = ray.position(self.t);
        let eye = -ray.direction;
        let mut normal = self.shape.normal_at(point, Some(&self));
        let inside;

        if normal.dot(&eye) < 0. {
            normal = -normal;
            inside = true;
        } else {
            inside = false;
        }
        let over_point = point + normal * EPSILON;
        let under_point = point - normal * EPSILON;
        let reflected = ray.direction.reflect(&normal);
        let (n1, n2) = self.refractive_indices(xs);

        PrecomputedHit {
            intersection: self,
            point,
            eye,
            normal,
            inside,
            over_point,
            under_point,
            reflected_vector: reflected,
            n1,
            n2,
        }
    }
}

impl Eq for Intersection {}

impl PartialEq<Self> for Intersection {
    fn eq(&self, other: &Self) -> bool {
        self.t == other.t && self.shape.id == other.shape.id
    }
}

impl PartialOrd<Self> for Intersection {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Intersection {
    fn cmp(&self, other: &Self) -> Ordering {
        self.t.partial_cmp(&other.t).unwrap()
    }
}

/// An intersection enriched with everything shading needs.
#[derive(Debug, Copy, Clone)]
pub struct PrecomputedHit {
    pub intersection: Intersection,
    pub point: Point,
    pub eye: Vector,
    pub normal: Vector,
    pub inside: bool,
    pub over_point: Point,
    pub under_point: Point,
    pub reflected_vector: Vector,
    pub n1: f64,
    pub n2: f64,
}

impl PrecomputedHit {
    /// Schlick's approximation of the Fresnel reflectance.
    pub fn schlick_reflectance(&self) -> f64 {
        let mut cos = self.eye.dot(&self.normal);

        if self.n1 > self.n2 {
            let n = self.n1 / self.n2;
            let sin2t = n * n * cos.mul_add(-cos, 1.0);
            if sin2t > 1.0 {
                return 1.0;
            }

            cos = (1.0 - sin2t).sqrt();
        }

        let r0 = ((self.n1 - self.n2) / (self.n1 + self.n2)).powi(2);
        (1.0 - r0).mul_add((1.0 - cos).powi(5), r0)
    }
}
