use crate::pattern::Pattern;
use crate::tuple::Color;

/// Phong coefficients plus the surface pattern.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub pattern: Pattern,
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,
    pub reflective: f64,
    pub transparency: f64,
    pub refractive_index: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            pattern: Pattern::default(),
            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.0,
            reflective: 0.0,
            transparency: 0.0,
            refractive_index: 1.0,
        }
    }
}

impl Material {
    pub fn builder() -> MaterialBuilder {
        MaterialBuilder {
            material: Self::default(),
        }
    }

    pub fn glass() -> Self {
        Self {
            diffuse: 0.1,
            transparency: 1.0,
            refractive_index: 1.5,
            ..Self::default()
        }
    }
}

/// Produces immutable material values; out-of-range coefficients are
/// programming errors and panic.
#[derive(Debug, Clone)]
pub struct MaterialBuilder {
    material: Material,
}

impl MaterialBuilder {
    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.material.pattern = pattern;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.material.pattern = Pattern::solid(color);
        self
    }

    pub fn ambient(mut self, value: f64) -> Self {
        assert!(
            (0. ..=1.).contains(&value),
            "ambient must be within [0, 1], got {value}"
        );
        self.material.ambient = value;
        self
    }

    pub fn diffuse(mut self, value: f64) -> Self {
        assert!(
            (0. ..=1.).contains(&value),
            "diffuse must be within [0, 1], got {value}"
        );
        self.material.diffuse = value;
        self
    }

    pub fn specular(mut self, value: f64) -> Self {
        assert!(
            (0. ..=1.).contains(&value),
            "specular must be within [0, 1], got {value}"
        );
        self.material.specular = value;
        self
    }

    pub fn shininess(mut self, value: f64) -> Self {
        assert!(value >= 0., "shininess must be non-negative, got {value}");
        self.material.shininess = value;
        self
    }

    pub fn reflective(mut self, value: f64) -> Self {
        assert!(
            (0. ..=1.).contains(&value),
            "reflective must be within [0, 1], got {value}"
        );
        self.material.reflective = value;
        self
    }

    pub fn transparency(mut self, value: f64) -> Self {
        assert!(value >= 0., "transparency must be non-negative, got {value}");
        self.material.transparency = value;
        self
    }

    pub fn refractive_index(mut self, value: f64) -> Self {
        assert!(
            value >= 0.,
            "refractive index must be non-negative, got {value}"
        );
        self.material.refractive_index = value;
        self
    }

    pub fn build(self) -> Material {
        self.material
    }
}
