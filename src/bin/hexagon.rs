use clap::Parser;
use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use whitted::camera::Camera;
use whitted::light::PointLight;
use whitted::material::Material;
use whitted::matrix::Matrix4;
use whitted::shape::Shape;
use whitted::tuple::{Color, Point, Vector};
use whitted::world::World;

/// Render a hexagonal ring of spheres and cylinders to a PPM file.
#[derive(Debug, Parser)]
struct Args {
    /// File to write the rendered image to
    #[arg(short, long)]
    output: PathBuf,
}

fn hexagon_corner() -> color_eyre::Result<&'static Shape> {
    let corner = Shape::sphere()
        .set_transform(Matrix4::scaling(0.25, 0.25, 0.25).translate(0., 0., -1.))?
        .with_material(Material::builder().color(Color::new(0.9, 0.1, 0.1)).build());
    Ok(corner)
}

fn hexagon_edge() -> color_eyre::Result<&'static Shape> {
    let edge = Shape::constrained_cylinder(0., 1., true)
        .set_transform(
            Matrix4::scaling(0.25, 1., 0.25)
                .rotate_z(-PI / 2.)
                .rotate_y(-PI / 6.)
                .translate(0., 0., -1.),
        )?
        .with_material(Material::builder().color(Color::new(0.1, 0.9, 0.1)).build());
    Ok(edge)
}

fn hexagon() -> color_eyre::Result<&'static Shape> {
    let mut sides = Vec::new();
    for i in 0..6 {
        let side = Shape::group_with_transform(
            Matrix4::rotation_y(PI / 3. * i as f64),
            vec![hexagon_corner()?, hexagon_edge()?],
        )?;
        sides.push(side);
    }
    Ok(Shape::group_with_transform(
        Matrix4::scaling(1.5, 1.5, 1.5),
        sides,
    )?)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = Args::parse();

    let floor: &'static Shape = Shape::plane()
        .set_transform(Matrix4::rotation_x(PI / 6.).translate(0., -1., 0.))?;
    let world = World::new(
        vec![PointLight::new(
            Point::new(-10., 10., -10.),
            Color::white(),
        )],
        vec![floor, hexagon()?],
    );

    let camera = Camera::new(400, 400, PI / 3.).with_transform(Matrix4::view_transform(
        Point::new(0., 5., 5.),
        Point::new(0., 0., 0.),
        Vector::new(0., 1., 0.),
    ))?;

    let image = camera.render(&world);

    let file = File::create(&args.output)?;
    let mut out = BufWriter::new(file);
    image.write_ppm(&mut out)?;
    out.flush()?;

    Ok(())
}
