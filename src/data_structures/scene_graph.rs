//! Scene graph and the post-load adoption pass.
//!
//! The loader resolves an asset into a tree of [`SceneNode`] trait objects:
//! [`MeshNode`] for renderable geometry, [`ContainerNode`] for groups,
//! lights and empties. [`adopt`] is the one-time mutation that runs between
//! resolution and first render, flagging every mesh for shadow casting and
//! receiving. The renderer consumes the tree as-is.

use thiserror::Error;

use crate::data_structures::instance::Instance;
use crate::session::LoadSession;

/// The asset resolved to nothing traversable; re-running the adapter on the
/// same tree cannot fix it.
#[derive(Debug, Error)]
#[error("asset resolved to no traversable scene nodes")]
pub struct SceneAdoptionError;

/// A node in the loaded scene tree.
///
/// Shadow flags are only meaningful on mesh-bearing nodes; containers report
/// `false` and ignore writes.
pub trait SceneNode: Send + std::fmt::Debug {
    fn name(&self) -> &str;

    fn is_mesh(&self) -> bool;

    fn local_transform(&self) -> &Instance;

    fn set_local_transform(&mut self, instance: Instance);

    fn casts_shadow(&self) -> bool;

    fn receives_shadow(&self) -> bool;

    fn set_shadow_flags(&mut self, casts: bool, receives: bool);

    fn children(&self) -> &[Box<dyn SceneNode>];

    fn children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>);
}

/// Depth-first walk over a tree, parents before children.
pub fn visit(node: &dyn SceneNode, f: &mut dyn FnMut(&dyn SceneNode)) {
    f(node);
    for child in node.children() {
        visit(child.as_ref(), f);
    }
}

/// Depth-first mutable walk over a tree, parents before children.
pub fn visit_mut(node: &mut dyn SceneNode, f: &mut dyn FnMut(&mut dyn SceneNode)) {
    f(node);
    for child in node.children_mut().iter_mut() {
        visit_mut(child.as_mut(), f);
    }
}

/// Number of mesh nodes anywhere in the tree.
pub fn mesh_count(node: &dyn SceneNode) -> usize {
    let mut count = 0;
    visit(node, &mut |n| {
        if n.is_mesh() {
            count += 1;
        }
    });
    count
}

/// Adopt a freshly resolved tree into the scene: flag every mesh node as
/// shadow casting and receiving, leaving non-mesh nodes untouched.
///
/// Runs at most one effective pass per session; a repeated call for an
/// already adopted session passes the tree through unchanged, which is
/// harmless since the flags only ever go from false to true. A tree with
/// zero meshes but real structure is a valid no-op. A bare root with no
/// children means the asset had no traversable scene and is rejected.
pub fn adopt(
    session: &LoadSession,
    mut root: Box<dyn SceneNode>,
) -> Result<Box<dyn SceneNode>, SceneAdoptionError> {
    if !root.is_mesh() && root.children().is_empty() {
        return Err(SceneAdoptionError);
    }
    if !session.mark_adopted() {
        return Ok(root);
    }
    let mut flagged = 0;
    visit_mut(root.as_mut(), &mut |node| {
        if node.is_mesh() {
            node.set_shadow_flags(true, true);
            flagged += 1;
        }
    });
    log::info!(
        "session {}: adopted scene, {} mesh node(s) flagged for shadows",
        session.id(),
        flagged
    );
    Ok(root)
}

/// A grouping node: gltf groups, lights and empties. Carries no geometry.
#[derive(Debug)]
pub struct ContainerNode {
    pub name: String,
    transform: Instance,
    children: Vec<Box<dyn SceneNode>>,
}

impl ContainerNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Instance::default(),
            children: Vec::new(),
        }
    }
}

impl SceneNode for ContainerNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_mesh(&self) -> bool {
        false
    }

    fn local_transform(&self) -> &Instance {
        &self.transform
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.transform = instance;
    }

    fn casts_shadow(&self) -> bool {
        false
    }

    fn receives_shadow(&self) -> bool {
        false
    }

    fn set_shadow_flags(&mut self, _casts: bool, _receives: bool) {}

    fn children(&self) -> &[Box<dyn SceneNode>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }
}

/// A renderable mesh node with its shadow flags and basic geometry counts.
#[derive(Debug)]
pub struct MeshNode {
    pub name: String,
    pub primitive_count: usize,
    pub vertex_count: usize,
    pub index_count: usize,
    transform: Instance,
    casts_shadow: bool,
    receives_shadow: bool,
    children: Vec<Box<dyn SceneNode>>,
}

impl MeshNode {
    pub fn new(
        name: impl Into<String>,
        primitive_count: usize,
        vertex_count: usize,
        index_count: usize,
    ) -> Self {
        Self {
            name: name.into(),
            primitive_count,
            vertex_count,
            index_count,
            transform: Instance::default(),
            casts_shadow: false,
            receives_shadow: false,
            children: Vec::new(),
        }
    }
}

impl SceneNode for MeshNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_mesh(&self) -> bool {
        true
    }

    fn local_transform(&self) -> &Instance {
        &self.transform
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.transform = instance;
    }

    fn casts_shadow(&self) -> bool {
        self.casts_shadow
    }

    fn receives_shadow(&self) -> bool {
        self.receives_shadow
    }

    fn set_shadow_flags(&mut self, casts: bool, receives: bool) {
        self.casts_shadow = casts;
        self.receives_shadow = receives;
    }

    fn children(&self) -> &[Box<dyn SceneNode>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }
}
