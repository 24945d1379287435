use nalgebra::matrix;
use rayon::prelude::*;

use crate::canvas::Canvas;
use crate::matrix::{Matrix4, NonInvertibleMatrix};
use crate::ray::Ray;
use crate::tuple::{Point, Vector};
use crate::world::World;

/// Bound on reflection/refraction bounces per primary ray.
pub const DEFAULT_RECURSION_DEPTH: u32 = 4;

impl Matrix4 {
    pub fn view_transform(from: Point, to: Point, up: Vector) -> Self {
        let forward = (to - from).normalize();
        let left = forward.cross(&up.normalize());
        let true_up = left.cross(&forward);

        let orientation: Self = matrix![
            left.x, left.y, left.z, 0.;
            true_up.x, true_up.y, true_up.z, 0.;
            -forward.x, -forward.y, -forward.z, 0.;
            0., 0., 0., 1.;
        ]
        .into();

        orientation * Self::translation(-from.x, -from.y, -from.z)
    }
}

/// Pinhole camera over a canvas one unit in front of the eye.
#[derive(Debug, Copy, Clone)]
pub struct Camera {
    pub hsize: usize,
    pub vsize: usize,
    pub field_of_view: f64,
    transform: Matrix4,
    inverse_transform: Matrix4,
    pub pixel_size: f64,
    half_width: f64,
    half_height: f64,
}

impl Camera {
    pub fn new(hsize: usize, vsize: usize, field_of_view: f64) -> Self {
        let half_view = (field_of_view / 2.).tan();
        let aspect = hsize as f64 / vsize as f64;

        let (half_width, half_height) = if aspect >= 1. {
            (half_view, half_view / aspect)
        } else {
            (half_view * aspect, half_view)
        };

        Self {
            hsize,
            vsize,
            field_of_view,
            transform: Matrix4::identity(),
            inverse_transform: Matrix4::identity(),
            pixel_size: (half_width * 2.) / hsize as f64,
            half_width,
            half_height,
        }
    }

    /// Returns a camera looking through the given view transform.
    pub fn with_transform(self, transform: Matrix4) -> Result<Self, NonInvertibleMatrix> {
        Ok(Self {
            transform,
            inverse_transform: transform.inverse()?,
            ..self
        })
    }

    pub fn transform(&self) -> &Matrix4 {
        &self.transform
    }

    fn ray_for_pixel(&self, px: usize, py: usize) -> Ray {
        let x_offset = (px as f64 + 0.5) * self.pixel_size;
        let y_offset = (py as f64 + 0.5) * self.pixel_size;

        let world_x = self.half_width - x_offset;
        let world_y = self.half_height - y_offset;

        let pixel = self.inverse_transform * Point::new(world_x, world_y, -1.);
        let origin = self.inverse_transform * Point::new(0., 0., 0.);
        let direction = (pixel - origin).normalize();

        Ray::new(origin, direction)
    }

    pub fn render(&self, world: &World) -> Canvas {
        self.render_with_depth(world, DEFAULT_RECURSION_DEPTH)
    }

    /// Rows render in parallel; every pixel is written exactly once by
    /// exactly one worker.
    pub fn render_with_depth(&self, world: &World, depth: u32) -> Canvas {
        let mut canvas = Canvas::new(self.hsize, self.vsize);

        canvas
            .pixels
            .par_chunks_mut(self.hsize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    *pixel = world.color_at(&self.ray_for_pixel(x, y), depth);
                }
            });

        canvas
    }
}
