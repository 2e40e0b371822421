use std::process;

use clap::Parser;

use kite_tracer::cli::Args;
use kite_tracer::logger::init_logger;
use kite_tracer::color::Color;
use kite_tracer::texture::{ self, Uniform };
use kite_tracer::scene::{ self, Scene };
use kite_tracer::camera::Camera;
use kite_tracer::error::SceneError;

fn run(args: &Args) -> Result<(), SceneError> {
    let mut scene = match args.scene {
        Some(ref path) => {
            log::info!("Loading scene {:?}", path);
            Scene::from_json_file(path)?
        },
        None => {
            let texture = match args.texture {
                Some(ref path) => texture::open_image(path)?,
                None => Uniform::shared(Color::rgb(0.8, 0.8, 0.8)),
            };
            scene::demo_scene(texture)
        },
    };

    log::info!("Scene has {} primitives and {} lights",
        scene.root.count_primitives(), scene.lights.len());
    scene.sort_front_to_back();

    let output = Camera::new(args.width, args.height).render(&scene)?;
    output.canvas.save(&args.output)
}

fn main() {
    let args = Args::parse();
    init_logger(args.log_level.into());

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        process::exit(1);
    }
}
