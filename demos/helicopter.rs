//! The helicopter showcase with a logging stand-in for the rendering engine.
//!
//! Expects `assets/models/helicopter.glb` next to the manifest. Run with
//! `RUST_LOG=info cargo run --example helicopter`.

use rotor_view::data_structures::scene_graph;
use rotor_view::render::{Renderer, Stage};
use rotor_view::viewer::{self, RendererConstructor, ViewerConfig};

struct LogRenderer {
    frames: u64,
}

impl Renderer for LogRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        log::debug!("viewport resized to {}x{}", width, height);
    }

    fn render(&mut self, stage: &Stage, overlay_percentage: Option<u8>) -> anyhow::Result<()> {
        self.frames += 1;
        match overlay_percentage {
            Some(pct) => {
                if self.frames % 30 == 0 {
                    log::info!("Loading: {}%", pct);
                }
            }
            None => {
                if self.frames % 300 == 0 {
                    if let Some(scene) = &stage.scene {
                        log::info!(
                            "frame {}: {} shadowed mesh(es), camera at {:?}",
                            self.frames,
                            scene_graph::mesh_count(scene.as_ref()),
                            stage.camera.position,
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let constructor: RendererConstructor = Box::new(|_window| {
        Box::pin(async move { Ok(Box::new(LogRenderer { frames: 0 }) as Box<dyn Renderer>) })
    });

    viewer::run(ViewerConfig::default(), constructor)
}
