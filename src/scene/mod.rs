pub mod obj;

use serde::Deserialize;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::camera::Camera;
use crate::light::PointLight;
use crate::material::Material;
use crate::matrix::{Matrix4, NonInvertibleMatrix};
use crate::pattern::Pattern;
use crate::scene::obj::ObjParser;
use crate::shape::{CsgOp, Shape};
use crate::tuple::{Color, Point, Vector};
use crate::world::World;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file")]
    Io(#[from] io::Error),
    #[error("malformed scene document")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unknown shape type '{0}'")]
    UnknownShape(String),
    #[error("unknown pattern type '{0}'")]
    UnknownPattern(String),
    #[error("unknown CSG operation '{0}'")]
    UnknownOperation(String),
    #[error("csg requires an operation and both left and right children")]
    IncompleteCsg,
    #[error("triangle requires p1, p2 and p3")]
    IncompleteTriangle,
    #[error("{kind} pattern requires {expected} colors, got {found}")]
    PatternArity {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("no material preset named '{0}'")]
    UnknownMaterial(String),
    #[error("material parameter {name} = {value} is out of range")]
    MaterialRange { name: &'static str, value: f64 },
    #[error("degenerate transform in scene")]
    Transform(#[from] NonInvertibleMatrix),
    #[error("failed to import OBJ file {path:?}")]
    Obj { path: PathBuf, source: io::Error },
}

/// Serde mirror of the declarative scene document.
#[derive(Debug, Deserialize)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    #[serde(default)]
    pub fixtures: Vec<FixtureDescription>,
    #[serde(default)]
    pub materials: HashMap<String, MaterialDescription>,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

#[derive(Debug, Deserialize)]
pub struct CameraDescription {
    pub hsize: usize,
    pub vsize: usize,
    pub field_of_view: f64,
    pub from: [f64; 3],
    pub to: [f64; 3],
    pub up: [f64; 3],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FixtureDescription {
    PointLight {
        position: [f64; 3],
        color: [f64; 3],
    },
}

#[derive(Debug, Deserialize)]
pub struct ObjectDescription {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub transform: Vec<TransformDescription>,
    #[serde(default)]
    pub material: Option<MaterialRef>,
    // cylinder and cone bounds
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default)]
    pub closed: Option<bool>,
    // triangle corners
    #[serde(default)]
    pub p1: Option<[f64; 3]>,
    #[serde(default)]
    pub p2: Option<[f64; 3]>,
    #[serde(default)]
    pub p3: Option<[f64; 3]>,
    // group members
    #[serde(default)]
    pub content: Vec<ObjectDescription>,
    #[serde(default)]
    pub objfile: Option<PathBuf>,
    // csg members
    #[serde(default)]
    pub left: Option<Box<ObjectDescription>>,
    #[serde(default)]
    pub right: Option<Box<ObjectDescription>>,
    #[serde(default)]
    pub operation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransformDescription {
    Identity,
    Translate { params: [f64; 3] },
    Scale { params: [f64; 3] },
    Rotatex { params: [f64; 1] },
    Rotatey { params: [f64; 1] },
    Rotatez { params: [f64; 1] },
    Shear { params: [f64; 6] },
}

impl TransformDescription {
    fn to_matrix(&self) -> Matrix4 {
        match *self {
            Self::Identity => Matrix4::identity(),
            Self::Translate { params: [x, y, z] } => Matrix4::translation(x, y, z),
            Self::Scale { params: [x, y, z] } => Matrix4::scaling(x, y, z),
            Self::Rotatex { params: [r] } => Matrix4::rotation_x(r),
            Self::Rotatey { params: [r] } => Matrix4::rotation_y(r),
            Self::Rotatez { params: [r] } => Matrix4::rotation_z(r),
            Self::Shear {
                params: [xy, xz, yx, yz, zx, zy],
            } => Matrix4::shearing(xy, xz, yx, yz, zx, zy),
        }
    }
}

/// Transform lists compose left-to-right by right-multiplication.
fn combine_transforms(transforms: &[TransformDescription]) -> Matrix4 {
    transforms
        .iter()
        .fold(Matrix4::identity(), |acc, t| acc * t.to_matrix())
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MaterialRef {
    Named(String),
    Inline(MaterialDescription),
}

#[derive(Debug, Deserialize)]
pub struct MaterialDescription {
    #[serde(default)]
    pub pattern: Option<PatternDescription>,
    #[serde(default = "default_ambient")]
    pub ambient: f64,
    #[serde(default = "default_diffuse")]
    pub diffuse: f64,
    #[serde(default = "default_specular")]
    pub specular: f64,
    #[serde(default = "default_shininess")]
    pub shininess: f64,
    #[serde(default)]
    pub reflective: f64,
    #[serde(default)]
    pub transparency: f64,
    #[serde(default = "default_refractive_index")]
    pub refractive_index: f64,
}

fn default_ambient() -> f64 {
    0.1
}

fn default_diffuse() -> f64 {
    0.9
}

fn default_specular() -> f64 {
    0.9
}

fn default_shininess() -> f64 {
    200.0
}

fn default_refractive_index() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct PatternDescription {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub colors: Vec<[f64; 3]>,
    #[serde(default)]
    pub transform: Vec<TransformDescription>,
}

pub fn load_scene(path: &Path) -> Result<(World, Camera), SceneError> {
    let text = std::fs::read_to_string(path)?;
    let description: SceneDescription = serde_yaml::from_str(&text)?;
    description.build()
}

impl SceneDescription {
    pub fn build(&self) -> Result<(World, Camera), SceneError> {
        let camera = Camera::new(
            self.camera.hsize,
            self.camera.vsize,
            self.camera.field_of_view,
        )
        .with_transform(Matrix4::view_transform(
            to_point(self.camera.from),
            to_point(self.camera.to),
            to_vector(self.camera.up),
        ))?;

        let mut presets = HashMap::new();
        for (name, description) in &self.materials {
            presets.insert(name.clone(), build_material(description)?);
        }

        let mut lights = Vec::new();
        for fixture in &self.fixtures {
            let FixtureDescription::PointLight { position, color } = fixture;
            lights.push(PointLight::new(to_point(*position), to_color(*color)));
        }

        let mut objects = Vec::new();
        for object in &self.objects {
            objects.push(build_object(object, &presets)?);
        }

        Ok((World::new(lights, objects), camera))
    }
}

fn build_object(
    description: &ObjectDescription,
    presets: &HashMap<String, Material>,
) -> Result<&'static Shape, SceneError> {
    let transform = combine_transforms(&description.transform);
    let material = match &description.material {
        Some(MaterialRef::Named(name)) => Some(
            *presets
                .get(name)
                .ok_or_else(|| SceneError::UnknownMaterial(name.clone()))?,
        ),
        Some(MaterialRef::Inline(inline)) => Some(build_material(inline)?),
        None => None,
    };

    let shape = match description.kind.as_str() {
        "sphere" => Shape::sphere().set_transform(transform)?,
        "plane" => Shape::plane().set_transform(transform)?,
        "cube" => Shape::cube().set_transform(transform)?,
        "cylinder" => Shape::constrained_cylinder(
            description.minimum.unwrap_or(f64::NEG_INFINITY),
            description.maximum.unwrap_or(f64::INFINITY),
            description.closed.unwrap_or(false),
        )
        .set_transform(transform)?,
        "cone" => Shape::constrained_cone(
            description.minimum.unwrap_or(f64::NEG_INFINITY),
            description.maximum.unwrap_or(f64::INFINITY),
            description.closed.unwrap_or(false),
        )
        .set_transform(transform)?,
        "triangle" => {
            let (p1, p2, p3) = match (description.p1, description.p2, description.p3) {
                (Some(p1), Some(p2), Some(p3)) => (p1, p2, p3),
                _ => return Err(SceneError::IncompleteTriangle),
            };
            Shape::triangle(to_point(p1), to_point(p2), to_point(p3))
                .set_transform(transform)?
        }
        "group" => {
            let mut children = Vec::new();
            for child in &description.content {
                children.push(build_object(child, presets)?);
            }
            if let Some(path) = &description.objfile {
                let parser = ObjParser::load(path).map_err(|source| SceneError::Obj {
                    path: path.clone(),
                    source,
                })?;
                children.push(parser.into_group());
            }
            return Ok(Shape::group_with_transform(transform, children)?);
        }
        "csg" => {
            let (left, right, operation) = match (
                &description.left,
                &description.right,
                &description.operation,
            ) {
                (Some(left), Some(right), Some(operation)) => (left, right, operation),
                _ => return Err(SceneError::IncompleteCsg),
            };
            let operation = match operation.as_str() {
                "union" => CsgOp::Union,
                "intersect" => CsgOp::Intersect,
                "difference" => CsgOp::Difference,
                other => return Err(SceneError::UnknownOperation(other.to_owned())),
            };
            return Ok(Shape::csg_with_transform(
                operation,
                transform,
                build_object(left, presets)?,
                build_object(right, presets)?,
            )?);
        }
        other => return Err(SceneError::UnknownShape(other.to_owned())),
    };

    Ok(match material {
        Some(material) => shape.with_material(material),
        None => shape,
    })
}

fn build_material(description: &MaterialDescription) -> Result<Material, SceneError> {
    let pattern = match &description.pattern {
        Some(pattern) => build_pattern(pattern)?,
        None => Pattern::default(),
    };

    Ok(Material {
        pattern,
        ambient: check_unit("ambient", description.ambient)?,
        diffuse: check_unit("diffuse", description.diffuse)?,
        specular: check_unit("specular", description.specular)?,
        shininess: check_non_negative("shininess", description.shininess)?,
        reflective: check_unit("reflective", description.reflective)?,
        transparency: check_non_negative("transparency", description.transparency)?,
        refractive_index: check_non_negative("refractive_index", description.refractive_index)?,
    })
}

fn build_pattern(description: &PatternDescription) -> Result<Pattern, SceneError> {
    let colors = &description.colors;
    let arity = |expected: usize, kind: &'static str| {
        if colors.len() == expected {
            Ok(())
        } else {
            Err(SceneError::PatternArity {
                kind,
                expected,
                found: colors.len(),
            })
        }
    };

    let pattern = match description.kind.as_str() {
        "solid" => {
            arity(1, "solid")?;
            Pattern::solid(to_color(colors[0]))
        }
        "gradient" => {
            arity(2, "gradient")?;
            Pattern::gradient(to_color(colors[0]), to_color(colors[1]))
        }
        "ring" => {
            arity(2, "ring")?;
            Pattern::ring(to_color(colors[0]), to_color(colors[1]))
        }
        "checker" => {
            arity(2, "checker")?;
            Pattern::checker(to_color(colors[0]), to_color(colors[1]))
        }
        other => return Err(SceneError::UnknownPattern(other.to_owned())),
    };

    Ok(pattern.with_transform(combine_transforms(&description.transform))?)
}

fn check_unit(name: &'static str, value: f64) -> Result<f64, SceneError> {
    if (0. ..=1.).contains(&value) {
        Ok(value)
    } else {
        Err(SceneError::MaterialRange { name, value })
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<f64, SceneError> {
    if value >= 0. {
        Ok(value)
    } else {
        Err(SceneError::MaterialRange { name, value })
    }
}

fn to_point([x, y, z]: [f64; 3]) -> Point {
    Point::new(x, y, z)
}

fn to_vector([x, y, z]: [f64; 3]) -> Vector {
    Vector::new(x, y, z)
}

fn to_color([r, g, b]: [f64; 3]) -> Color {
    Color::new(r, g, b)
}
