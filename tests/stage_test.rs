use rotor_view::Deg;
use rotor_view::camera::Camera;
use rotor_view::lighting::{ContactShadows, Light};
use rotor_view::render::Stage;
use rotor_view::viewer::ViewerConfig;

#[test]
fn the_default_scene_carries_the_shadow_catcher() {
    let config = ViewerConfig::default();
    assert_eq!(config.contact_shadows.position, [0.0, 0.0, 0.0]);
    assert_eq!(config.contact_shadows.scale, 40.0);
    assert_eq!(config.contact_shadows.blur, 0.9);
    assert_eq!(config.contact_shadows.opacity, 0.6);
    assert_eq!(config.contact_shadows.far, 10.0);
}

#[test]
fn the_stage_hands_the_catcher_to_the_renderer_unchanged() {
    let catcher = ContactShadows {
        position: [0.0, -1.0, 0.0],
        scale: 25.0,
        blur: 0.5,
        opacity: 0.8,
        far: 5.0,
    };
    let stage = Stage::new(
        Camera::new([0.0, 0.0, 160.0], Deg(20.0)),
        vec![Light::Ambient { intensity: 0.5 }],
        catcher,
    );
    assert_eq!(stage.contact_shadows, catcher);
    assert!(stage.scene.is_none());
}
