use rotor_view::data_structures::scene_graph::{
    ContainerNode, MeshNode, SceneNode, adopt, mesh_count, visit,
};
use rotor_view::session::LoadSession;

/// rotor
///  ├── fuselage (mesh)
///  └── tail (group)
///       ├── boom (mesh)
///       └── fin (group)
///            └── blade (mesh)
fn helicopter_like_tree() -> Box<dyn SceneNode> {
    let mut fin = ContainerNode::new("fin");
    fin.add_child(Box::new(MeshNode::new("blade", 1, 24, 36)));

    let mut tail = ContainerNode::new("tail");
    tail.add_child(Box::new(MeshNode::new("boom", 1, 100, 150)));
    tail.add_child(Box::new(fin));

    let mut root = ContainerNode::new("rotor");
    root.add_child(Box::new(MeshNode::new("fuselage", 2, 5000, 9000)));
    root.add_child(Box::new(tail));
    Box::new(root)
}

fn collect_flags(root: &dyn SceneNode) -> Vec<(String, bool, bool, bool)> {
    let mut flags = Vec::new();
    visit(root, &mut |node| {
        flags.push((
            node.name().to_string(),
            node.is_mesh(),
            node.casts_shadow(),
            node.receives_shadow(),
        ));
    });
    flags
}

#[test]
fn adoption_flags_every_mesh_and_only_meshes() {
    let session = LoadSession::new();
    let root = adopt(&session, helicopter_like_tree()).unwrap();

    for (name, is_mesh, casts, receives) in collect_flags(root.as_ref()) {
        if is_mesh {
            assert!(casts && receives, "mesh {} was not flagged", name);
        } else {
            assert!(!casts && !receives, "group {} grew shadow flags", name);
        }
    }
    assert_eq!(mesh_count(root.as_ref()), 3);
    assert!(session.is_adopted());
}

#[test]
fn a_tree_without_meshes_is_a_valid_noop() {
    let mut inner = ContainerNode::new("lights");
    inner.add_child(Box::new(ContainerNode::new("key")));
    let mut root = ContainerNode::new("scene");
    root.add_child(Box::new(inner));

    let session = LoadSession::new();
    let root = adopt(&session, Box::new(root)).unwrap();
    assert_eq!(mesh_count(root.as_ref()), 0);
    for (_, _, casts, receives) in collect_flags(root.as_ref()) {
        assert!(!casts && !receives);
    }
}

#[test]
fn a_bare_mesh_root_is_adoptable() {
    let session = LoadSession::new();
    let root = adopt(&session, Box::new(MeshNode::new("solo", 1, 3, 3))).unwrap();
    assert!(root.casts_shadow());
    assert!(root.receives_shadow());
}

#[test]
fn an_empty_root_is_rejected() {
    let session = LoadSession::new();
    let result = adopt(&session, Box::new(ContainerNode::new("nothing")));
    assert!(result.is_err());
}

#[test]
fn adopting_twice_is_harmless() {
    let session = LoadSession::new();
    let root = adopt(&session, helicopter_like_tree()).unwrap();
    // Second pass is a guarded pass-through; flags stay true.
    let root = adopt(&session, root).unwrap();
    for (_, is_mesh, casts, receives) in collect_flags(root.as_ref()) {
        assert_eq!(casts, is_mesh);
        assert_eq!(receives, is_mesh);
    }
}

#[test]
fn flags_default_to_false_before_adoption() {
    let tree = helicopter_like_tree();
    for (_, _, casts, receives) in collect_flags(tree.as_ref()) {
        assert!(!casts && !receives);
    }
}
