//! Camera state and procedural camera motion.
//!
//! [`CameraRig`] steers the camera toward a pointer-derived target by
//! exponential approach and layers a small bounded shake on top. Both run as
//! per-frame callbacks; neither touches state outside the camera.

use std::f32::consts::TAU;

use cgmath::{Deg, Euler, InnerSpace, Matrix4, Point3, Quaternion, Rad, Vector3};

use crate::scheduler::FrameContext;

/// A look-at camera with a periodic angular perturbation applied on top of
/// the view transform.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    pub look_at: Point3<f32>,
    pub fovy: Deg<f32>,
    pub shake: Euler<Rad<f32>>,
}

impl Camera {
    pub fn new(position: impl Into<Point3<f32>>, fovy: Deg<f32>) -> Self {
        Self {
            position: position.into(),
            look_at: Point3::new(0.0, 0.0, 0.0),
            fovy,
            shake: Euler::new(Rad(0.0), Rad(0.0), Rad(0.0)),
        }
    }

    /// View matrix including the shake offset.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let shake: Matrix4<f32> = Quaternion::from(self.shake).into();
        shake * Matrix4::look_at_rh(self.position, self.look_at, Vector3::unit_y())
    }
}

/// Bounded periodic yaw/pitch/roll offsets, a pure function of elapsed time.
///
/// Each axis oscillates at its own frequency with its own phase, so the
/// offset never accumulates drift and stays within the configured amplitude.
#[derive(Clone, Debug)]
pub struct CameraShake {
    pub max_yaw: f32,
    pub max_pitch: f32,
    pub max_roll: f32,
    pub yaw_frequency: f32,
    pub pitch_frequency: f32,
    pub roll_frequency: f32,
}

impl CameraShake {
    pub fn offset(&self, elapsed: f32) -> Euler<Rad<f32>> {
        // Distinct phases keep the axes from lining up at t = 0.
        let yaw = self.max_yaw * (TAU * self.yaw_frequency * elapsed).sin();
        let pitch = self.max_pitch * (TAU * self.pitch_frequency * elapsed + 1.3).sin();
        let roll = self.max_roll * (TAU * self.roll_frequency * elapsed + 2.6).sin();
        Euler::new(Rad(pitch), Rad(yaw), Rad(roll))
    }
}

impl Default for CameraShake {
    fn default() -> Self {
        Self {
            max_yaw: 0.01,
            max_pitch: 0.01,
            max_roll: 0.01,
            yaw_frequency: 0.5,
            pitch_frequency: 0.5,
            roll_frequency: 0.4,
        }
    }
}

/// Steers the camera toward a target derived from the pointer.
///
/// The target is `(x_scale * pointer.x, height, depth)` and each tick moves
/// the camera by `damping` of the remaining distance: an exponential
/// approach that never overshoots and converges in the limit.
#[derive(Clone, Debug)]
pub struct CameraRig {
    pub damping: f32,
    pub x_scale: f32,
    pub height: f32,
    pub depth: f32,
    pub shake: CameraShake,
}

impl CameraRig {
    pub fn target(&self, ctx: &FrameContext) -> Point3<f32> {
        Point3::new(self.x_scale * ctx.pointer.0, self.height, self.depth)
    }

    pub fn update(&self, camera: &mut Camera, ctx: &FrameContext) {
        let remaining = self.target(ctx) - camera.position;
        camera.position += remaining * self.damping;
        camera.shake = self.shake.offset(ctx.elapsed);
    }

    /// Whether the camera has effectively reached the rig's current target.
    pub fn converged(&self, camera: &Camera, ctx: &FrameContext, epsilon: f32) -> bool {
        (self.target(ctx) - camera.position).magnitude() < epsilon
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            damping: 0.05,
            x_scale: 2.0,
            height: 20.0,
            depth: 60.0,
            shake: CameraShake::default(),
        }
    }
}
