use crate::matrix::{Matrix4, NonInvertibleMatrix};
use crate::shape::Shape;
use crate::tuple::{Color, Point, EPSILON};

/// A procedural coloring: a kind-specific rule evaluated in pattern space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pattern {
    transform: Matrix4,
    inverse_transform: Matrix4,
    kind: PatternKind,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PatternKind {
    Solid(Color),
    Stripe(Color, Color),
    Gradient { base: Color, distance: Color },
    Ring(Color, Color),
    Checker(Color, Color),
    /// Diagnostic pattern: echoes the pattern-space point as a color.
    Test,
}

impl Pattern {
    fn new(kind: PatternKind) -> Self {
        Self {
            transform: Matrix4::identity(),
            inverse_transform: Matrix4::identity(),
            kind,
        }
    }

    pub fn solid(color: Color) -> Self {
        Self::new(PatternKind::Solid(color))
    }

    pub fn stripe(even: Color, odd: Color) -> Self {
        Self::new(PatternKind::Stripe(even, odd))
    }

    pub fn gradient(from: Color, to: Color) -> Self {
        Self::new(PatternKind::Gradient {
            base: from,
            distance: to - from,
        })
    }

    pub fn ring(even: Color, odd: Color) -> Self {
        Self::new(PatternKind::Ring(even, odd))
    }

    pub fn checker(even: Color, odd: Color) -> Self {
        Self::new(PatternKind::Checker(even, odd))
    }

    pub fn test() -> Self {
        Self::new(PatternKind::Test)
    }

    pub fn with_transform(self, transform: Matrix4) -> Result<Self, NonInvertibleMatrix> {
        Ok(Self {
            transform,
            inverse_transform: transform.inverse()?,
            kind: self.kind,
        })
    }

    pub fn transform(&self) -> &Matrix4 {
        &self.transform
    }

    /// Walks the world point into object space, then pattern space, then
    /// evaluates the kind rule.
    pub fn color_at_object(&self, object: &Shape, world_point: &Point) -> Color {
        let object_point = *object.inverse_transform() * *world_point;
        let pattern_point = self.inverse_transform * object_point;
        self.color_at(&pattern_point)
    }

    pub fn color_at(&self, point: &Point) -> Color {
        match self.kind {
            PatternKind::Solid(color) => color,
            PatternKind::Stripe(even, odd) => {
                if (point.x.floor() as i64).rem_euclid(2) == 0 {
                    even
                } else {
                    odd
                }
            }
            PatternKind::Gradient { base, distance } => {
                let along = point.x.abs();
                base + distance * (along - along.floor())
            }
            PatternKind::Ring(even, odd) => {
                if (point.x.hypot(point.z).floor() as i64).rem_euclid(2) == 0 {
                    even
                } else {
                    odd
                }
            }
            PatternKind::Checker(even, odd) => {
                let sum = (point.x + EPSILON).floor()
                    + (point.y + EPSILON).floor()
                    + (point.z + EPSILON).floor();
                if (sum as i64).rem_euclid(2) == 0 {
                    even
                } else {
                    odd
                }
            }
            PatternKind::Test => Color::new(point.x, point.y, point.z),
        }
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::solid(Color::white())
    }
}

#[cfg(test)]
mod tests {
    use crate::matrix::Matrix4;
    use crate::pattern::Pattern;
    use crate::shape::Shape;
    use crate::tuple::{Color, Point};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    pub fn solid_pattern_is_the_same_everywhere() {
        let pattern = Pattern::solid(Color::new(0.2, 0.4, 0.6));
        assert_eq!(
            pattern.color_at(&Point::new(0., 0., 0.)),
            Color::new(0.2, 0.4, 0.6)
        );
        assert_eq!(
            pattern.color_at(&Point::new(-3., 9., 120.)),
            Color::new(0.2, 0.4, 0.6)
        );
    }

    #[test]
    pub fn stripe_pattern_is_constant_in_y() {
        let pattern = Pattern::stripe(Color::white(), Color::black());
        assert_eq!(pattern.color_at(&Point::new(0., 0., 0.)), Color::white());
        assert_eq!(pattern.color_at(&Point::new(0., 1., 0.)), Color::white());
        assert_eq!(pattern.color_at(&Point::new(0., 2., 0.)), Color::white());
    }

    #[test]
    pub fn stripe_pattern_is_constant_in_z() {
        let pattern = Pattern::stripe(Color::white(), Color::black());
        assert_eq!(pattern.color_at(&Point::new(0., 0., 0.)), Color::white());
        assert_eq!(pattern.color_at(&Point::new(0., 0., 1.)), Color::white());
        assert_eq!(pattern.color_at(&Point::new(0., 0., 2.)), Color::white());
    }

    #[test]
    pub fn stripe_pattern_alternates_in_x() {
        let pattern = Pattern::stripe(Color::white(), Color::black());
        assert_eq!(pattern.color_at(&Point::new(0., 0., 0.)), Color::white());
        assert_eq!(pattern.color_at(&Point::new(0.9, 0., 0.)), Color::white());
        assert_eq!(pattern.color_at(&Point::new(1., 0., 0.)), Color::black());
        assert_eq!(pattern.color_at(&Point::new(-0.1, 0., 0.)), Color::black());
        assert_eq!(pattern.color_at(&Point::new(-1., 0., 0.)), Color::black());
        assert_eq!(pattern.color_at(&Point::new(-1.1, 0., 0.)), Color::white());
    }

    #[test]
    pub fn stripe_with_object_transformation() {
        let obj = Shape::sphere()
            .set_transform(Matrix4::scaling(2., 2., 2.))
            .unwrap();
        let pattern = Pattern::stripe(Color::white(), Color::black());
        assert_eq!(
            pattern.color_at_object(obj, &Point::new(1.5, 0., 0.)),
            Color::white()
        );
    }

    #[test]
    pub fn stripe_with_pattern_transformation() {
        let obj = Shape::sphere();
        let pattern = Pattern::stripe(Color::white(), Color::black())
            .with_transform(Matrix4::scaling(2., 2., 2.))
            .unwrap();
        assert_eq!(
            pattern.color_at_object(obj, &Point::new(1.5, 0., 0.)),
            Color::white()
        );
    }

    #[test]
    pub fn stripe_with_both_transforms() {
        let obj = Shape::sphere()
            .set_transform(Matrix4::scaling(2., 2., 2.))
            .unwrap();
        let pattern = Pattern::stripe(Color::white(), Color::black())
            .with_transform(Matrix4::translation(0.5, 0., 0.))
            .unwrap();
        assert_eq!(
            pattern.color_at_object(obj, &Point::new(2.5, 0., 0.)),
            Color::white()
        );
    }

    #[test]
    pub fn gradient_linearly_interpolates_between_colors() {
        let pattern = Pattern::gradient(Color::white(), Color::black());
        assert_eq!(pattern.color_at(&Point::zero()), Color::white());
        assert_eq!(
            pattern.color_at(&Point::new(0.25, 0., 0.)),
            Color::new(0.75, 0.75, 0.75)
        );
        assert_eq!(
            pattern.color_at(&Point::new(0.5, 0., 0.)),
            Color::new(0.5, 0.5, 0.5)
        );
        assert_eq!(
            pattern.color_at(&Point::new(0.75, 0., 0.)),
            Color::new(0.25, 0.25, 0.25)
        );
    }

    #[test]
    pub fn gradient_interpolates_in_the_fraction_of_absolute_x() {
        let pattern = Pattern::gradient(Color::white(), Color::black());
        assert_eq!(
            pattern.color_at(&Point::new(-0.25, 0., 0.)),
            Color::new(0.75, 0.75, 0.75)
        );
    }

    #[test]
    pub fn ring_should_extend_in_both_x_and_z() {
        let pattern = Pattern::ring(Color::white(), Color::black());
        assert_eq!(pattern.color_at(&Point::new(0., 0., 0.)), Color::white());
        assert_eq!(pattern.color_at(&Point::new(1., 0., 0.)), Color::black());
        assert_eq!(pattern.color_at(&Point::new(0., 0., 1.)), Color::black());
        assert_eq!(
            pattern.color_at(&Point::new(0.708, 0., 0.708)),
            Color::black()
        );
    }

    #[test_case(Point::new(0., 0., 0.), Color::white() ; "origin")]
    #[test_case(Point::new(0.99, 0., 0.), Color::white() ; "just inside x")]
    #[test_case(Point::new(1.01, 0., 0.), Color::black() ; "just outside x")]
    #[test_case(Point::new(0., 0.99, 0.), Color::white() ; "just inside y")]
    #[test_case(Point::new(0., 1.01, 0.), Color::black() ; "just outside y")]
    #[test_case(Point::new(0., 0., 0.99), Color::white() ; "just inside z")]
    #[test_case(Point::new(0., 0., 1.01), Color::black() ; "just outside z")]
    pub fn checkers_repeat_in_every_dimension(p: Point, expected: Color) {
        let pattern = Pattern::checker(Color::white(), Color::black());
        assert_eq!(pattern.color_at(&p), expected);
    }

    #[test]
    pub fn test_pattern_echoes_the_pattern_space_point() {
        let obj = Shape::sphere()
            .set_transform(Matrix4::scaling(2., 2., 2.))
            .unwrap();
        let pattern = Pattern::test()
            .with_transform(Matrix4::translation(0.5, 1., 1.5))
            .unwrap();
        assert_eq!(
            pattern.color_at_object(obj, &Point::new(2.5, 3., 3.5)),
            Color::new(0.75, 0.5, 0.25)
        );
    }
}
