//! rotor-view
//!
//! The coordination core of a single-model animated viewer, native and WASM:
//! one cancellable load session feeding a progress-gated reveal, and a
//! per-frame scheduler driving procedural camera and light motion. Pixel
//! output is delegated to a host rendering engine behind a small trait.
//!
//! High-level modules
//! - `camera`: camera state, the pointer-follow rig and the bounded shake
//! - `data_structures`: scene tree, node transforms and the adoption pass
//! - `lighting`: the showcase light set and the rotating light rig
//! - `progress`: percentage aggregation and the one-way loading gate
//! - `render`: the boundary trait the hosting engine implements
//! - `resources`: asset fetch and glTF decode with progress and cancellation
//! - `scheduler`: per-tick callback registry with a fresh context per frame
//! - `session`: per-load session objects, asset handles and load errors
//! - `viewer`: the winit event-loop host wiring it all together
//!

pub mod camera;
pub mod data_structures;
pub mod lighting;
pub mod progress;
pub mod render;
pub mod resources;
pub mod scheduler;
pub mod session;
pub mod viewer;

// Re-exports the math types the public API surfaces, plus the winit types
// a hosting renderer needs, for convenience in downstream code.
pub use cgmath::{Deg, Euler, Matrix4, Point3, Quaternion, Rad, Vector3};
pub use winit::dpi::PhysicalPosition;
pub use winit::event::WindowEvent;
