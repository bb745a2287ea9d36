use rotor_view::data_structures::scene_graph::{adopt, mesh_count};
use rotor_view::progress::{LoadProgressEvent, LoadingGate};
use rotor_view::resources::{decode_scene, load_scene};
use rotor_view::session::{AssetHandle, LoadSession};
use rotor_view::viewer::SessionFailure;

/// Wraps a glTF JSON document into a minimal binary container.
fn glb_from_json(json: &str) -> Vec<u8> {
    let mut payload = json.as_bytes().to_vec();
    // The JSON chunk is padded to 4-byte alignment with spaces.
    while payload.len() % 4 != 0 {
        payload.push(b' ');
    }
    let total = 12 + 8 + payload.len();
    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());
    glb.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"JSON");
    glb.extend_from_slice(&payload);
    glb
}

const TWO_NODE_SCENE: &str = r#"{
    "asset": {"version": "2.0"},
    "scene": 0,
    "scenes": [{"nodes": [0]}],
    "nodes": [
        {"name": "root", "children": [1]},
        {"name": "mount"}
    ]
}"#;

#[tokio::test]
async fn decode_builds_the_tree_and_ends_at_one_hundred_percent() {
    let handle = AssetHandle::new("two_nodes.glb");
    let session = LoadSession::new();
    let mut events: Vec<LoadProgressEvent> = Vec::new();

    let root = decode_scene(&handle, &session, glb_from_json(TWO_NODE_SCENE), |e| {
        events.push(e)
    })
    .await
    .unwrap()
    .expect("session was not cancelled");

    // No buffers and no images: the single progress item is tree assembly.
    assert_eq!(
        events,
        vec![LoadProgressEvent {
            items_loaded: 1,
            items_total: 1
        }]
    );
    assert_eq!(root.name(), "root");
    assert_eq!(root.children().len(), 1);
    assert_eq!(root.children()[0].name(), "mount");
    assert_eq!(mesh_count(root.as_ref()), 0);

    // The emitted events are enough to open the gate.
    let mut gate = LoadingGate::new();
    for event in events {
        gate.observe(event);
    }
    assert!(gate.is_ready());
}

#[tokio::test]
async fn an_asset_with_no_scene_nodes_still_completes_but_fails_adoption() {
    // Valid glTF, empty scenes array: the decode succeeds and reaches 100%
    // (so the gate is already open by the time the tree arrives), but the
    // resulting root has nothing traversable under it.
    let empty = r#"{"asset": {"version": "2.0"}, "scenes": []}"#;
    let handle = AssetHandle::new("empty.glb");
    let session = LoadSession::new();
    let mut gate = LoadingGate::new();

    let root = decode_scene(&handle, &session, glb_from_json(empty), |e| gate.observe(e))
        .await
        .unwrap()
        .expect("session was not cancelled");
    assert!(gate.is_ready());
    assert!(root.children().is_empty());

    let err = adopt(&session, root).unwrap_err();
    // The owner sees this as a terminal session failure, same as a load
    // error; the empty stage plus the failure is what it reacts to.
    let failure = SessionFailure::from(err);
    assert!(matches!(failure, SessionFailure::Adoption(_)));
    assert!(failure.to_string().contains("no traversable"));
}

#[tokio::test]
async fn a_cancelled_session_emits_no_events_and_no_scene() {
    let handle = AssetHandle::new("two_nodes.glb");
    let session = LoadSession::new();
    session.cancel();

    let mut events: Vec<LoadProgressEvent> = Vec::new();
    let result = decode_scene(&handle, &session, glb_from_json(TWO_NODE_SCENE), |e| {
        events.push(e)
    })
    .await
    .unwrap();

    assert!(result.is_none());
    assert!(events.is_empty());
}

#[tokio::test]
async fn garbage_bytes_fail_with_a_load_error() {
    let handle = AssetHandle::new("garbage.glb");
    let session = LoadSession::new();

    let err = decode_scene(&handle, &session, b"not a model".to_vec(), |_| {})
        .await
        .unwrap_err();
    assert_eq!(err.handle, handle);
    assert!(err.to_string().contains("garbage.glb"));
}

#[tokio::test]
async fn a_missing_file_fails_with_a_load_error() {
    let handle = AssetHandle::new("models/definitely_not_here.glb");
    let session = LoadSession::new();

    let result = load_scene(&handle, &session, |_| {}).await;
    assert!(result.is_err());
}

#[test]
fn sessions_are_distinct_and_share_cancellation_across_clones() {
    let a = LoadSession::new();
    let b = LoadSession::new();
    assert_ne!(a.id(), b.id());

    let a_clone = a.clone();
    assert_eq!(a.id(), a_clone.id());
    assert!(!a_clone.is_cancelled());

    a.cancel();
    assert!(a_clone.is_cancelled());
    assert!(!b.is_cancelled());

    // Cancelling again is a no-op.
    a_clone.cancel();
    assert!(a.is_cancelled());
}

#[test]
fn the_adopted_flag_flips_exactly_once() {
    let session = LoadSession::new();
    assert!(!session.is_adopted());
    assert!(session.mark_adopted());
    assert!(!session.mark_adopted());
    assert!(session.is_adopted());
}
