use std::io::{BufReader, Cursor};

use crate::{
    data_structures::{
        instance::Instance,
        scene_graph::{ContainerNode, MeshNode, SceneNode},
    },
    progress::LoadProgressEvent,
    session::{AssetHandle, AssetLoadError, LoadSession},
};

/**
 * This module contains all logic for fetching and decoding external assets
 * into a scene tree, with per-item progress reporting and cancellation.
 */

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> reqwest::Url {
    let window = web_sys::window().unwrap();
    let location = window.location();
    let origin = location.origin().unwrap();
    let base = reqwest::Url::parse(&format!("{}/assets/", origin)).unwrap();
    base.join(file_name).unwrap()
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name);
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        std::fs::read(path)?
    };

    Ok(data)
}

/// Fetch and decode one asset for the given session.
///
/// `Ok(None)` means the session was cancelled before resolution; in that
/// case no further progress events were emitted and none will be. Failures
/// are terminal for the session.
pub async fn load_scene(
    handle: &AssetHandle,
    session: &LoadSession,
    on_progress: impl FnMut(LoadProgressEvent),
) -> Result<Option<Box<dyn SceneNode>>, AssetLoadError> {
    log::info!("session {}: loading {}", session.id(), handle);
    if session.is_cancelled() {
        return Ok(None);
    }
    let bytes = load_binary(handle.path())
        .await
        .map_err(|e| AssetLoadError::new(handle.clone(), e))?;
    decode_scene(handle, session, bytes, on_progress).await
}

/// Decode an in-memory glTF/glb payload into a scene tree.
///
/// Progress items are the asset's sub-resources: one per buffer, one per
/// image, plus one for final tree assembly, so every successful decode emits
/// at least one event and the last event always reads 100%. Events are
/// emitted in order with no loss or duplication, and the cancellation flag
/// is checked before each one.
pub async fn decode_scene(
    handle: &AssetHandle,
    session: &LoadSession,
    bytes: Vec<u8>,
    mut on_progress: impl FnMut(LoadProgressEvent),
) -> Result<Option<Box<dyn SceneNode>>, AssetLoadError> {
    if session.is_cancelled() {
        return Ok(None);
    }
    let gltf_cursor = Cursor::new(bytes);
    let gltf_reader = BufReader::new(gltf_cursor);
    let gltf = gltf::Gltf::from_reader(gltf_reader)
        .map_err(|e| AssetLoadError::new(handle.clone(), e))?;

    let items_total = (gltf.buffers().count() + gltf.images().count() + 1) as u32;
    let mut items_loaded = 0u32;

    // Load buffers
    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        if session.is_cancelled() {
            return Ok(None);
        }
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                if let Some(blob) = gltf.blob.as_deref() {
                    buffer_data.push(blob.into());
                }
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = load_binary(uri)
                    .await
                    .map_err(|e| AssetLoadError::new(handle.clone(), e))?;
                buffer_data.push(bin);
            }
        }
        items_loaded += 1;
        on_progress(LoadProgressEvent {
            items_loaded,
            items_total,
        });
    }

    // Resolve images. Pixel decode belongs to the renderer; fetching them
    // here keeps the progress count honest for external references.
    for image in gltf.images() {
        if session.is_cancelled() {
            return Ok(None);
        }
        if let gltf::image::Source::Uri { uri, .. } = image.source() {
            load_binary(uri)
                .await
                .map_err(|e| AssetLoadError::new(handle.clone(), e))?;
        }
        items_loaded += 1;
        on_progress(LoadProgressEvent {
            items_loaded,
            items_total,
        });
    }

    // Assemble the node tree
    let mut roots: Vec<Box<dyn SceneNode>> = Vec::new();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            roots.push(to_scene_node(node, &buffer_data));
        }
    }

    let root = if roots.len() == 1 {
        roots.into_iter().next().unwrap()
    } else {
        let mut root = ContainerNode::new("scene");
        for node in roots {
            root.add_child(node);
        }
        Box::new(root) as Box<dyn SceneNode>
    };

    if session.is_cancelled() {
        return Ok(None);
    }
    on_progress(LoadProgressEvent {
        items_loaded: items_total,
        items_total,
    });
    Ok(Some(root))
}

fn to_scene_node(node: gltf::scene::Node, buf: &[Vec<u8>]) -> Box<dyn SceneNode> {
    let mut scene_node: Box<dyn SceneNode> = match node.mesh() {
        Some(mesh) => {
            let mut primitive_count = 0;
            let mut vertex_count = 0;
            let mut index_count = 0;
            for primitive in mesh.primitives() {
                primitive_count += 1;
                let reader = primitive.reader(|buffer| buf.get(buffer.index()).map(Vec::as_slice));
                if let Some(positions) = reader.read_positions() {
                    vertex_count += positions.count();
                }
                if let Some(indices) = reader.read_indices() {
                    index_count += indices.into_u32().count();
                }
            }
            Box::new(MeshNode::new(
                mesh.name().unwrap_or("unknown_mesh"),
                primitive_count,
                vertex_count,
                index_count,
            ))
        }
        None => Box::new(ContainerNode::new(node.name().unwrap_or("group"))),
    };
    let (position, rotation, scale) = node.transform().decomposed();
    scene_node.set_local_transform(Instance {
        position: position.into(),
        rotation: rotation.into(),
        scale: scale.into(),
    });
    for child in node.children() {
        scene_node.add_child(to_scene_node(child, buf));
    }

    scene_node
}
