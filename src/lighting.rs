//! Light descriptions for the showcase scene.
//!
//! These are plain parameter records handed to the renderer each frame; the
//! shadow and shading math behind them lives on the other side of the
//! [`crate::render::Renderer`] boundary. [`LightRig`] spins the rect-area
//! light, the one animated light in the scene.

use cgmath::Rad;

use crate::scheduler::FrameContext;

/// Shadow-map resolution in texels for a shadow-casting light.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShadowMapConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ShadowMapConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Light {
    Ambient {
        intensity: f32,
    },
    Point {
        position: [f32; 3],
        color: [f32; 3],
        intensity: f32,
    },
    Directional {
        position: [f32; 3],
        color: [f32; 3],
        intensity: f32,
        shadow: Option<ShadowMapConfig>,
    },
    Spot {
        position: [f32; 3],
        intensity: f32,
        shadow: Option<ShadowMapConfig>,
    },
    /// An area light aimed at the origin. `rotation_x` is animated.
    RectArea {
        position: [f32; 3],
        width: f32,
        height: f32,
        intensity: f32,
        rotation_x: Rad<f32>,
    },
}

/// The ground-plane shadow catcher under the model.
///
/// A parameter record like the lights: the renderer decides how to realize
/// it, this only says where it sits and how soft and strong it reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactShadows {
    pub position: [f32; 3],
    /// Side length of the catcher plane in world units.
    pub scale: f32,
    pub blur: f32,
    pub opacity: f32,
    /// Occluders further above the plane than this cast nothing.
    pub far: f32,
}

impl Default for ContactShadows {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            scale: 40.0,
            blur: 0.9,
            opacity: 0.6,
            far: 10.0,
        }
    }
}

/// The light set of the helicopter showcase.
pub fn default_lights() -> Vec<Light> {
    vec![
        Light::Ambient { intensity: 0.5 },
        Light::Spot {
            position: [50.0, 50.0, -30.0],
            intensity: 2.0,
            shadow: Some(ShadowMapConfig::default()),
        },
        Light::Point {
            position: [-50.0, 10.0, -30.0],
            color: [1.0, 0.0, 0.0],
            intensity: 10000.0,
        },
        Light::Directional {
            position: [0.0, 10.0, 0.0],
            color: [1.0, 1.0, 1.0],
            intensity: 2.0,
            shadow: Some(ShadowMapConfig::default()),
        },
        Light::RectArea {
            position: [30.0, 30.0, -10.0],
            width: 15.0,
            height: 100.0,
            intensity: 5.0,
            rotation_x: Rad(0.0),
        },
    ]
}

/// Rotates every rect-area light with the frame clock. Independent of the
/// camera rig; the two share nothing but the tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct LightRig;

impl LightRig {
    pub fn update(&self, lights: &mut [Light], ctx: &FrameContext) {
        for light in lights.iter_mut() {
            if let Light::RectArea { rotation_x, .. } = light {
                *rotation_x = Rad(ctx.elapsed);
            }
        }
    }
}
