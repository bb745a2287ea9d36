//! Scene data structures.
//!
//! - `instance` holds per-node transformation data
//! - `scene_graph` is the hierarchical node tree and the post-load adoption pass

pub mod instance;
pub mod scene_graph;
