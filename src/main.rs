use std::path::Path;

use scenegl::engine::config::RenderConfig;
use scenegl::engine::renderer::Renderer;
use scenegl::engine::scene::Scene;

fn main() {
    env_logger::init();

    // Optional TOML config as the first argument; defaults otherwise.
    let config = match std::env::args().nth(1) {
        Some(path) => match RenderConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => RenderConfig::default(),
    };

    let mut renderer = match Renderer::new(&config) {
        Ok(renderer) => renderer,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    renderer.set_scene(Scene::demo());
    renderer.run();  // handles everything, blocking until the window closes
}
