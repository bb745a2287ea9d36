//! The rendering-engine boundary.
//!
//! This crate coordinates loading and animation; the engine that turns a
//! scene into pixels sits behind [`Renderer`]. Each tick the viewer hands it
//! the current [`Stage`] plus the loading overlay state and the engine does
//! whatever shadow-mapping and shading it likes with them.

use crate::{
    camera::Camera,
    data_structures::scene_graph::SceneNode,
    lighting::{ContactShadows, Light},
};

/// Everything the renderer consumes each frame. Mutated only on the event
/// loop thread, by the frame scheduler's callbacks and by scene adoption.
pub struct Stage {
    /// The adopted scene tree; `None` until the load session resolves.
    pub scene: Option<Box<dyn SceneNode>>,
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub contact_shadows: ContactShadows,
}

impl Stage {
    pub fn new(camera: Camera, lights: Vec<Light>, contact_shadows: ContactShadows) -> Self {
        Self {
            scene: None,
            camera,
            lights,
            contact_shadows,
        }
    }
}

/// Implemented by the hosting rendering engine.
pub trait Renderer {
    fn resize(&mut self, width: u32, height: u32);

    /// Produce one frame.
    ///
    /// `overlay_percentage` is `Some(0..=100)` while the loading overlay is
    /// up and `None` once it has been dismissed for good.
    fn render(&mut self, stage: &Stage, overlay_percentage: Option<u8>) -> anyhow::Result<()>;
}
