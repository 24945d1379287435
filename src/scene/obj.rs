use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::shape::Shape;
use crate::tuple::{Point, Vector};

const DEFAULT_GROUP: &str = "default";

/// Wavefront OBJ reader: `v`, `vn`, `f` (fanned into triangles) and `g`
/// records. Unrecognised or malformed lines are counted and skipped.
pub struct ObjParser {
    pub ignored_lines: usize,
    vertices: Vec<Point>,
    normals: Vec<Vector>,
    groups: Vec<(String, Vec<&'static Shape>)>,
    current_group: usize,
}

impl ObjParser {
    pub fn load(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut lines = Vec::new();
        for line in BufReader::new(file).lines() {
            lines.push(line?);
        }
        Ok(Self::parse(lines.iter().map(String::as_str)))
    }

    pub fn parse_str(text: &str) -> Self {
        Self::parse(text.lines())
    }

    fn parse<'a>(lines: impl Iterator<Item = &'a str>) -> Self {
        let mut parser = Self {
            ignored_lines: 0,
            vertices: vec![],
            normals: vec![],
            groups: vec![(DEFAULT_GROUP.to_owned(), vec![])],
            current_group: 0,
        };

        for line in lines {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            parser.parse_record(line);
        }

        parser
    }

    fn parse_record(&mut self, line: &str) {
        let mut parts = line.split_whitespace();
        let parsed = match parts.next() {
            Some("v") => self.parse_vertex(parts),
            Some("vn") => self.parse_normal(parts),
            Some("f") => self.parse_face(parts),
            Some("g") => self.open_group(parts),
            _ => false,
        };

        if !parsed {
            self.ignored_lines += 1;
        }
    }

    fn parse_vertex<'a>(&mut self, parts: impl Iterator<Item = &'a str>) -> bool {
        match parse_floats(parts) {
            Some([x, y, z]) => {
                self.vertices.push(Point::new(x, y, z));
                true
            }
            None => false,
        }
    }

    fn parse_normal<'a>(&mut self, parts: impl Iterator<Item = &'a str>) -> bool {
        match parse_floats(parts) {
            Some([x, y, z]) => {
                self.normals.push(Vector::new(x, y, z));
                true
            }
            None => false,
        }
    }

    fn parse_face<'a>(&mut self, parts: impl Iterator<Item = &'a str>) -> bool {
        let mut corners = Vec::new();
        for part in parts {
            match self.parse_face_corner(part) {
                Some(corner) => corners.push(corner),
                None => return false,
            }
        }
        if corners.len() < 3 {
            return false;
        }

        // fan out from the first corner
        let smooth = corners.iter().all(|&(_, normal)| normal.is_some());
        for index in 1..corners.len() - 1 {
            let (p1, n1) = corners[0];
            let (p2, n2) = corners[index];
            let (p3, n3) = corners[index + 1];
            let triangle: &'static Shape = if smooth {
                Shape::smooth_triangle(p1, p2, p3, n1.unwrap(), n2.unwrap(), n3.unwrap())
            } else {
                Shape::triangle(p1, p2, p3)
            };
            self.groups[self.current_group].1.push(triangle);
        }
        true
    }

    /// A corner is `v`, `v/vt`, `v/vt/vn` or `v//vn`, all 1-indexed.
    fn parse_face_corner(&self, part: &str) -> Option<(Point, Option<Vector>)> {
        let mut indices = part.split('/');
        let vertex_index: usize = indices.next()?.parse().ok()?;
        let vertex = *self.vertices.get(vertex_index.checked_sub(1)?)?;

        let _texture = indices.next();
        let normal = match indices.next() {
            Some("") | None => None,
            Some(raw) => {
                let normal_index: usize = raw.parse().ok()?;
                Some(*self.normals.get(normal_index.checked_sub(1)?)?)
            }
        };

        Some((vertex, normal))
    }

    fn open_group<'a>(&mut self, mut parts: impl Iterator<Item = &'a str>) -> bool {
        let Some(name) = parts.next() else {
            return false;
        };

        if let Some(index) = self.groups.iter().position(|(n, _)| n == name) {
            self.current_group = index;
        } else {
            self.groups.push((name.to_owned(), vec![]));
            self.current_group = self.groups.len() - 1;
        }
        true
    }

    /// 1-indexed, as OBJ faces address vertices.
    pub fn vertex(&self, index: usize) -> Point {
        self.vertices[index - 1]
    }

    pub fn normal(&self, index: usize) -> Vector {
        self.normals[index - 1]
    }

    pub fn group(&self, name: &str) -> Option<&[&'static Shape]> {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, triangles)| triangles.as_slice())
    }

    pub fn default_group(&self) -> &[&'static Shape] {
        self.group(DEFAULT_GROUP).unwrap()
    }

    /// One top-level group whose children are the named sub-groups.
    pub fn into_group(self) -> &'static Shape {
        let children = self
            .groups
            .into_iter()
            .filter(|(_, triangles)| !triangles.is_empty())
            .map(|(_, triangles)| Shape::group(triangles))
            .collect();
        Shape::group(children)
    }
}

fn parse_floats<'a>(parts: impl Iterator<Item = &'a str>) -> Option<[f64; 3]> {
    let values: Vec<f64> = parts.map(str::parse).collect::<Result<_, _>>().ok()?;
    values.try_into().ok()
}
