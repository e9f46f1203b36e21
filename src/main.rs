//! softpipe demo: renders one scene on the CPU and blits it every frame
//!
//! Usage: `softpipe-demo [config.ron]`. Enter toggles texture filtering,
//! Escape quits.

use macroquad::prelude::*;
use softpipe::config::{self, DemoConfig, DEFAULT_CONFIG_PATH};
use softpipe::logging::{init_logging, LoggingConfig};
use softpipe::rasterizer::{DepthBuffer, Framebuffer};
use softpipe::scene::Scene;
use softpipe::VERSION;

fn config_path() -> String {
    std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

fn window_conf() -> Conf {
    // Logging is not up yet; main() reloads the config and reports problems
    let config = config::load_config(config_path()).unwrap_or_default();
    Conf {
        window_title: format!("{} v{}", config.title, VERSION),
        window_width: config.width as i32,
        window_height: config.height as i32,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    init_logging(LoggingConfig::default());

    let config: DemoConfig = config::load_config_or_default(config_path());
    let mut scene = match Scene::from_config(&config) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("failed to build scene {:?}: {}", config.scene, e);
            return;
        }
    };

    let mut fb = Framebuffer::new(config.width, config.height);
    let mut depth = DepthBuffer::new(config.width, config.height);

    let mut old_time = get_time();
    let mut frames = 0u32;
    let mut fps_timer = old_time;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::Enter) {
            scene.toggle_filter();
        }

        let new_time = get_time();
        scene.update(old_time, new_time);
        old_time = new_time;

        if let Err(e) = scene.render(&mut fb, &mut depth) {
            log::error!("render failed: {}", e);
            break;
        }

        // Row 0 of the framebuffer is the bottom, so flip while drawing
        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        texture.set_filter(FilterMode::Nearest);

        clear_background(BLACK);
        draw_texture_ex(
            &texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                flip_y: true,
                ..Default::default()
            },
        );

        frames += 1;
        if new_time - fps_timer >= 1.0 {
            log::info!("{:.1} fps", frames as f64 / (new_time - fps_timer));
            frames = 0;
            fps_timer = new_time;
        }

        next_frame().await;
    }
}
