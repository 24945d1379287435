use itertools::Itertools;

use crate::light::PointLight;
use crate::material::Material;
use crate::matrix::Matrix4;
use crate::ray::Ray;
use crate::shape::{Intersection, PrecomputedHit, Shape};
use crate::tuple::{Color, Point};

/// The scene: every top-level shape plus the point lights.
pub struct World {
    pub lights: Vec<PointLight>,
    pub objects: Vec<&'static Shape>,
}

impl World {
    pub fn new(lights: Vec<PointLight>, objects: Vec<&'static Shape>) -> Self {
        Self { lights, objects }
    }

    fn intersect_world(&self, ray: &Ray) -> Vec<Intersection> {
        self.objects
            .iter()
            .filter_map(|&shape| shape.intersect(ray))
            .flatten()
            .sorted()
            .collect_vec()
    }

    /// A point is shadowed from a light when something solid sits between
    /// them.
    pub fn is_shadowed(&self, point: Point, light_index: usize) -> bool {
        assert!(
            light_index < self.lights.len(),
            "no such light source in world"
        );

        let to_light = self.lights[light_index].position - point;
        let shadow_ray = Ray::new(point, to_light.normalize());
        match Intersection::hit(&self.intersect_world(&shadow_ray)) {
            Some(hit) => hit.t < to_light.magnitude(),
            None => false,
        }
    }

    fn shade_hit(&self, comps: &PrecomputedHit, depth: u32) -> Color {
        let material = &comps.intersection.shape.material;
        let reflected = self.reflected_color(comps, depth);
        let refracted = self.refracted_color(comps, depth);
        let fresnel_blend = material.reflective > 0. && material.transparency > 0.;

        (0..self.lights.len())
            .map(|index| {
                let shadowed = self.is_shadowed(comps.over_point, index);
                let surface = self.lights[index].calculate_lighting(
                    material,
                    comps.intersection.shape,
                    &comps.point,
                    &comps.eye,
                    &comps.normal,
                    shadowed,
                );
                if fresnel_blend {
                    let reflectance = comps.schlick_reflectance();
                    surface + reflected * reflectance + refracted * (1. - reflectance)
                } else {
                    surface + reflected + refracted
                }
            })
            .fold(Color::black(), |acc, color| acc + color)
    }

    pub fn reflected_color(&self, comps: &PrecomputedHit, depth: u32) -> Color {
        let reflective = comps.intersection.shape.material.reflective;
        if depth == 0 || reflective == 0. {
            return Color::black();
        }

        let reflected_ray = Ray::new(comps.over_point, comps.reflected_vector);
        self.color_at(&reflected_ray, depth - 1) * reflective
    }

    pub fn refracted_color(&self, comps: &PrecomputedHit, depth: u32) -> Color {
        let transparency = comps.intersection.shape.material.transparency;
        if depth == 0 || transparency == 0. {
            return Color::black();
        }

        // Snell's law; total internal reflection contributes nothing here.
        let n_ratio = comps.n1 / comps.n2;
        let cos_i = comps.eye.dot(&comps.normal);
        let sin2_t = n_ratio * n_ratio * cos_i.mul_add(-cos_i, 1.);
        if sin2_t > 1. {
            return Color::black();
        }

        let cos_t = (1. - sin2_t).sqrt();
        let direction = comps.normal * n_ratio.mul_add(cos_i, -cos_t) - comps.eye * n_ratio;
        let refracted_ray = Ray::new(comps.under_point, direction);
        self.color_at(&refracted_ray, depth - 1) * transparency
    }

    /// An intersection-less ray yields black; shading never fails per ray.
    pub fn color_at(&self, ray: &Ray, depth: u32) -> Color {
        let xs = self.intersect_world(ray);
        match Intersection::hit(&xs) {
            Some(hit) => self.shade_hit(&hit.precompute(ray, &xs), depth),
            None => Color::black(),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        let s1: &'static Shape = Shape::sphere().with_material(
            Material::builder()
                .color(Color::new(0.8, 1.0, 0.6))
                .diffuse(0.7)
                .specular(0.2)
                .build(),
        );
        let s2: &'static Shape = Shape::sphere()
            .set_transform(Matrix4::scaling(0.5, 0.5, 0.5))
            .expect("uniform scaling is invertible");

        Self {
            lights: vec![PointLight::new(
                Point::new(-10., 10., -10.),
                Color::new(1., 1., 1.),
            )],
            objects: vec![s1, s2],
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::light::PointLight;
    use crate::material::Material;
    use crate::matrix::Matrix4;
    use crate::pattern::Pattern;
    use crate::ray::Ray;
    use crate::shape::{Intersection, Shape};
    use crate::tuple::{Color, Point, Vector};
    use crate::world::World;
    use pretty_assertions::assert_eq;
    use std::f64::consts::FRAC_1_SQRT_2;
    use test_case::test_case;

    // recursive bounce totals accumulate rounding beyond the book's
    // five-decimal constants
    fn assert_color_close(actual: Color, expected: Color) {
        for (a, e) in [
            (actual.r, expected.r),
            (actual.g, expected.g),
            (actual.b, expected.b),
        ] {
            assert!((a - e).abs() < 2e-4, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    pub fn default_world_contents() {
        let w = World::default();
        assert_eq!(w.lights.len(), 1);
        assert_eq!(
            w.lights[0],
            PointLight::new(Point::new(-10., 10., -10.), Color::white())
        );
        assert_eq!(w.objects.len(), 2);
    }

    #[test]
    pub fn intersect_world_with_ray() {
        let w = World::default();
        let r = Ray::new(Point::new(0., 0., -5.), Vector::new(0., 0., 1.));
        let xs = w.intersect_world(&r);
        assert_eq!(xs.len(), 4);
        assert_eq!(xs[0].t, 4.);
        assert_eq!(xs[1].t, 4.5);
        assert_eq!(xs[2].t, 5.5);
        assert_eq!(xs[3].t, 6.);
    }

    #[test]
    pub fn shading_an_intersection() {
        let w = World::default();
        let r = Ray::new(Point::new(0., 0., -5.), Vector::new(0., 0., 1.));
        let shape = w.objects[0];
        let i = Intersection::new(4., shape);
        let comps = i.precompute(&r, &[i]);
        let c = w.shade_hit(&comps, 4);
        assert_eq!(c, Color::new(0.38066, 0.47583, 0.2855));
    }

    #[test]
    pub fn shading_an_intersection_from_inside() {
        let w = World {
            lights: vec![PointLight::new(
                Point::new(0., 0.25, 0.),
                Color::new(1., 1., 1.),
            )],
            ..Default::default()
        };
        let r = Ray::new(Point::new(0., 0., 0.), Vector::new(0., 0., 1.));
        let shape = w.objects[1];
        let i = Intersection::new(0.5, shape);
        let comps = i.precompute(&r, &[i]);
        let c = w.shade_hit(&comps, 4);
        assert_eq!(c, Color::new(0.90498, 0.90498, 0.90498));
    }

    #[test]
    pub fn shade_hit_is_given_an_intersection_in_shadow() {
        let s1: &'static Shape = Shape::sphere();
        let s2: &'static Shape = Shape::sphere()
            .set_transform(Matrix4::translation(0., 0., 10.))
            .unwrap();
        let w = World::new(
            vec![PointLight::new(Point::new(0., 0., -10.), Color::white())],
            vec![s1, s2],
        );
        let r = Ray::new(Point::new(0., 0., 5.), Vector::new(0., 0., 1.));
        let i = Intersection::new(4., s2);
        let comps = i.precompute(&r, &[i]);
        assert_eq!(w.shade_hit(&comps, 4), Color::new(0.1, 0.1, 0.1));
    }

    #[test]
    pub fn color_when_ray_misses() {
        let w = World::default();
        let r = Ray::new(Point::new(0., 0., -5.), Vector::new(0., 1., 0.));
        assert_eq!(w.color_at(&r, 4), Color::black());
    }

    #[test]
    pub fn color_when_ray_hits() {
        let w = World::default();
        let r = Ray::new(Point::new(0., 0., -5.), Vector::new(0., 0., 1.));
        assert_eq!(w.color_at(&r, 4), Color::new(0.38066, 0.47583, 0.2855));
    }

    #[test]
    pub fn color_with_intersection_behind_ray() {
        let s1: &'static Shape = Shape::sphere().with_material(
            Material::builder()
                .color(Color::new(0.8, 1.0, 0.6))
                .ambient(1.0)
                .diffuse(0.7)
                .specular(0.2)
                .build(),
        );
        let s2: &'static Shape = Shape::sphere()
            .set_transform(Matrix4::scaling(0.5, 0.5, 0.5))
            .unwrap()
            .with_material(Material::builder().ambient(1.0).build());

        let w = World {
            objects: vec![s1, s2],
            ..Default::default()
        };
        let r = Ray::new(Point::new(0., 0., 0.75), Vector::new(0., 0., -1.));
        assert_eq!(w.color_at(&r, 4), Color::white());
    }

    #[test_case(Point::new(0., 10., 0.), false ; "nothing collinear with point and light")]
    #[test_case(Point::new(10., -10., 10.), true ; "object between point and light")]
    #[test_case(Point::new(-20., 20., -20.), false ; "object behind light")]
    #[test_case(Point::new(-2., 2., -2.), false ; "object behind point")]
    pub fn testing_shadow_state(p: Point, expected: bool) {
        let w = World::default();
        assert_eq!(w.is_shadowed(p, 0), expected);
    }

    #[test]
    pub fn reflected_color_for_nonreflective_material() {
        let s1: &'static Shape = Shape::sphere().with_material(
            Material::builder()
                .color(Color::new(0.8, 1.0, 0.6))
                .diffuse(0.7)
                .specular(0.2)
                .build(),
        );
        let s2: &'static Shape = Shape::sphere()
            .set_transform(Matrix4::scaling(0.5, 0.5, 0.5))
            .unwrap()
            .with_material(Material::builder().ambient(1.0).build());
        let w = World {
            objects: vec![s1, s2],
            ..Default::default()
        };

        let r = Ray::new(Point::new(0., 0., 0.), Vector::new(0., 0., 1.));
        let i = Intersection::new(1., s2);
        let comps = i.precompute(&r, &[i]);
        assert_eq!(w.reflected_color(&comps, 4), Color::black());
    }

    #[test]
    pub fn reflected_color_for_reflective_material() {
        let mut w = World::default();
        let floor: &'static Shape = Shape::plane()
            .set_transform(Matrix4::translation(0., -1., 0.))
            .unwrap()
            .with_material(Material::builder().reflective(0.5).build());
        w.objects.push(floor);

        let r = Ray::new(
            Point::new(0., 0., -3.),
            Vector::new(0., -FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        );
        let i = Intersection::new(2.0_f64.sqrt(), floor);
        let comps = i.precompute(&r, &[i]);
        assert_eq!(
            w.reflected_color(&comps, 4),
            Color::new(0.19033, 0.23791, 0.14275)
        );
    }

    #[test]
    pub fn reflected_color_at_maximum_recursion_depth() {
        let mut w = World::default();
        let floor: &'static Shape = Shape::plane()
            .set_transform(Matrix4::translation(0., -1., 0.))
            .unwrap()
            .with_material(Material::builder().reflective(0.5).build());
        w.objects.push(floor);

        let r = Ray::new(
            Point::new(0., 0., -3.),
            Vector::new(0., -FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        );
        let i = Intersection::new(2.0_f64.sqrt(), floor);
        let comps = i.precompute(&r, &[i]);
        assert_eq!(w.reflected_color(&comps, 0), Color::black());
    }

    #[test]
    pub fn shade_hit_adds_the_reflected_contribution() {
        let mut w = World::default();
        let floor: &'static Shape = Shape::plane()
            .set_transform(Matrix4::translation(0., -1., 0.))
            .unwrap()
            .with_material(Material::builder().reflective(0.5).build());
        w.objects.push(floor);

        let r = Ray::new(
            Point::new(0., 0., -3.),
            Vector::new(0., -FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        );
        let i = Intersection::new(2.0_f64.sqrt(), floor);
        let comps = i.precompute(&r, &[i]);

        let surface = w.lights[0].calculate_lighting(
            &floor.material,
            floor,
            &comps.point,
            &comps.eye,
            &comps.normal,
            false,
        );
        let c = w.shade_hit(&comps, 4);
        assert_eq!(c, surface + w.reflected_color(&comps, 4));
        assert_color_close(c, Color::new(0.87676, 0.92434, 0.82917));
    }

    #[test]
    pub fn color_at_terminates_with_mutually_reflective_surfaces() {
        let lower: &'static Shape = Shape::plane()
            .set_transform(Matrix4::translation(0., -1., 0.))
            .unwrap()
            .with_material(Material::builder().reflective(1.0).build());
        let upper: &'static Shape = Shape::plane()
            .set_transform(Matrix4::translation(0., 1., 0.))
            .unwrap()
            .with_material(Material::builder().reflective(1.0).build());
        let w = World::new(
            vec![PointLight::new(Point::zero(), Color::white())],
            vec![lower, upper],
        );
        let r = Ray::new(Point::new(0., 0., 0.), Vector::new(0., 1., 0.));
        // must not recurse forever
        let _ = w.color_at(&r, 4);
    }

    #[test]
    pub fn refracted_color_of_opaque_surface() {
        let w = World::default();
        let shape = w.objects[0];
        let r = Ray::new(Point::new(0., 0., -5.), Vector::new(0., 0., 1.));
        let xs = [Intersection::new(4., shape), Intersection::new(6., shape)];
        let comps = xs[0].precompute(&r, &xs);
        assert_eq!(w.refracted_color(&comps, 5), Color::black());
    }

    #[test]
    pub fn refracted_color_at_maximum_recursion_depth() {
        let s1: &'static Shape = Shape::sphere().with_material(
            Material::builder()
                .color(Color::new(0.8, 1.0, 0.6))
                .diffuse(0.7)
                .specular(0.2)
                .transparency(1.0)
                .refractive_index(1.5)
                .build(),
        );
        let w = World {
            objects: vec![s1],
            ..Default::default()
        };
        let r = Ray::new(Point::new(0., 0., -5.), Vector::new(0., 0., 1.));
        let xs = [Intersection::new(4., s1), Intersection::new(6., s1)];
        let comps = xs[0].precompute(&r, &xs);
        assert_eq!(w.refracted_color(&comps, 0), Color::black());
    }

    #[test]
    pub fn refracted_color_under_total_internal_reflection() {
        let s1: &'static Shape = Shape::sphere().with_material(
            Material::builder()
                .color(Color::new(0.8, 1.0, 0.6))
                .diffuse(0.7)
                .specular(0.2)
                .transparency(1.0)
                .refractive_index(1.5)
                .build(),
        );
        let w = World {
            objects: vec![s1],
            ..Default::default()
        };
        let r = Ray::new(Point::new(0., 0., FRAC_1_SQRT_2), Vector::new(0., 1., 0.));
        let xs = [
            Intersection::new(-FRAC_1_SQRT_2, s1),
            Intersection::new(FRAC_1_SQRT_2, s1),
        ];
        let comps = xs[1].precompute(&r, &xs);
        assert_eq!(w.refracted_color(&comps, 5), Color::black());
    }

    #[test]
    pub fn refracted_color_samples_the_refracted_ray() {
        let a: &'static Shape = Shape::sphere().with_material(
            Material::builder()
                .color(Color::new(0.8, 1.0, 0.6))
                .diffuse(0.7)
                .specular(0.2)
                .ambient(1.0)
                .pattern(Pattern::test())
                .build(),
        );
        let b: &'static Shape = Shape::sphere()
            .set_transform(Matrix4::scaling(0.5, 0.5, 0.5))
            .unwrap()
            .with_material(
                Material::builder()
                    .transparency(1.0)
                    .refractive_index(1.5)
                    .build(),
            );
        let w = World {
            objects: vec![a, b],
            ..Default::default()
        };

        let r = Ray::new(Point::new(0., 0., 0.1), Vector::new(0., 1., 0.));
        let xs = [
            Intersection::new(-0.9899, a),
            Intersection::new(-0.4899, b),
            Intersection::new(0.4899, b),
            Intersection::new(0.9899, a),
        ];
        let comps = xs[2].precompute(&r, &xs);
        let c = w.refracted_color(&comps, 5);
        assert_color_close(c, Color::new(0., 0.99888, 0.04725));
    }

    #[test]
    pub fn shade_hit_with_transparent_material() {
        let mut w = World::default();
        let floor: &'static Shape = Shape::plane()
            .set_transform(Matrix4::translation(0., -1., 0.))
            .unwrap()
            .with_material(
                Material::builder()
                    .transparency(0.5)
                    .refractive_index(1.5)
                    .build(),
            );
        let ball: &'static Shape = Shape::sphere()
            .set_transform(Matrix4::translation(0., -3.5, -0.5))
            .unwrap()
            .with_material(
                Material::builder()
                    .color(Color::new(1., 0., 0.))
                    .ambient(0.5)
                    .build(),
            );
        w.objects.push(floor);
        w.objects.push(ball);

        let r = Ray::new(
            Point::new(0., 0., -3.),
            Vector::new(0., -FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        );
        let xs = [Intersection::new(2.0_f64.sqrt(), floor)];
        let comps = xs[0].precompute(&r, &xs);
        let c = w.shade_hit(&comps, 5);
        assert_color_close(c, Color::new(0.93642, 0.68642, 0.47243));
    }

    #[test]
    pub fn shade_hit_blends_reflection_and_refraction_with_schlick() {
        let mut w = World::default();
        let floor: &'static Shape = Shape::plane()
            .set_transform(Matrix4::translation(0., -1., 0.))
            .unwrap()
            .with_material(
                Material::builder()
                    .reflective(0.5)
                    .transparency(0.5)
                    .refractive_index(1.5)
                    .build(),
            );
        let ball: &'static Shape = Shape::sphere()
            .set_transform(Matrix4::translation(0., -3.5, -0.5))
            .unwrap()
            .with_material(
                Material::builder()
                    .color(Color::new(1., 0., 0.))
                    .ambient(0.5)
                    .build(),
            );
        w.objects.push(floor);
        w.objects.push(ball);

        let r = Ray::new(
            Point::new(0., 0., -3.),
            Vector::new(0., -FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        );
        let xs = [Intersection::new(2.0_f64.sqrt(), floor)];
        let comps = xs[0].precompute(&r, &xs);
        let c = w.shade_hit(&comps, 5);
        assert_color_close(c, Color::new(0.93391, 0.69643, 0.69243));
    }

    #[test]
    pub fn shade_hit_sums_every_light() {
        let s1: &'static Shape = Shape::sphere().with_material(
            Material::builder()
                .color(Color::new(0.8, 1.0, 0.6))
                .diffuse(0.7)
                .specular(0.2)
                .build(),
        );
        let light = PointLight::new(Point::new(-10., 10., -10.), Color::white());
        let single = World::new(vec![light], vec![s1]);
        let double = World::new(vec![light, light], vec![s1]);

        let r = Ray::new(Point::new(0., 0., -5.), Vector::new(0., 0., 1.));
        let one = single.color_at(&r, 4);
        let two = double.color_at(&r, 4);
        assert_eq!(two, one * 2.);
    }
}
