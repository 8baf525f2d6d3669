//! End-to-end scenario over the CPU side of the stage: build the demo scene,
//! run the animation and panel against it and check the state that would be
//! uploaded to the GPU.

use lightrig::{
    camera::{Camera, OrbitController, Projection},
    context::Viewport,
    data_structures::scene::Scene,
    panel,
};

#[test]
fn ten_seconds_of_animation() {
    let mut scene = Scene::demo();

    // Drive the loop the way the event loop would, one tick per frame.
    for frame in 0..=600 {
        scene.advance(frame as f32 / 60.0);
    }

    for node in scene.meshes.iter().filter(|node| node.spin) {
        assert!((node.transform.rotation.y.0 - 1.0).abs() < 1e-5);
        assert!((node.transform.rotation.x.0 - 1.5).abs() < 1e-5);
    }

    // The ground plane never animates.
    let plane = scene.meshes.iter().find(|m| m.name == "plane").unwrap();
    assert!((plane.transform.rotation.x.0 + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
}

#[test]
fn resize_flows_into_projection_and_viewport() {
    let mut viewport = Viewport::new(800, 600, 1.0);
    let mut projection = Projection::new(800, 600, cgmath::Deg(75.0), 0.1, 100.0);

    viewport.resize(1024, 768);
    projection.resize(viewport.width, viewport.height);

    assert!((viewport.aspect() - projection.aspect).abs() < f32::EPSILON);
    assert!((projection.aspect - 1024.0 / 768.0).abs() < 1e-6);
    // At 1x density the surface matches the window exactly.
    assert_eq!(viewport.render_size(), (1024, 768));
}

#[test]
fn dense_displays_render_at_capped_density() {
    // A 3x display window of 2400x1800 renders at 2x density and keeps its
    // aspect; moving it to a 1.5x display restores the full window size.
    let mut viewport = Viewport::new(2400, 1800, 3.0);
    assert_eq!(viewport.pixel_ratio(), 2.0);
    assert_eq!(viewport.render_size(), (1600, 1200));
    assert!((viewport.aspect() - 4.0 / 3.0).abs() < 1e-6);

    viewport.set_scale_factor(1.5);
    assert_eq!(viewport.pixel_ratio(), 1.5);
    assert_eq!(viewport.render_size(), (2400, 1800));
}

#[test]
fn panel_edits_show_up_in_the_uniform() {
    let mut scene = Scene::demo();
    let bindings = panel::bindings();

    let directional_y = bindings
        .iter()
        .find(|b| b.label == "Directional Y")
        .unwrap();
    directional_y.apply(&mut scene.rig, -7.0);

    let spot = bindings
        .iter()
        .find(|b| b.label == "Spotlight Intensity")
        .unwrap();
    spot.apply(&mut scene.rig, 3.5);

    let raw = scene.rig.to_raw();
    assert!((raw.directional_position[1] + 7.0).abs() < 1e-6);
    assert!((raw.spot_position[3] - 3.5).abs() < 1e-6);
}

#[test]
fn orbit_camera_coasts_to_rest_after_a_drag() {
    let mut camera = Camera::new([2.0, 2.0, 5.0], [0.0, 0.0, 0.0]);
    let mut controller = OrbitController::from_camera(&camera);

    controller.handle_window_events(&winit::event::WindowEvent::MouseInput {
        device_id: winit::event::DeviceId::dummy(),
        state: winit::event::ElementState::Pressed,
        button: winit::event::MouseButton::Left,
    });
    controller.handle_mouse(40.0, 0.0);
    controller.handle_window_events(&winit::event::WindowEvent::MouseInput {
        device_id: winit::event::DeviceId::dummy(),
        state: winit::event::ElementState::Released,
        button: winit::event::MouseButton::Left,
    });

    let before = camera.position;
    controller.update(&mut camera);
    let after_one = camera.position;
    assert_ne!(before, after_one);

    // With damping the view keeps drifting for a while, then settles.
    for _ in 0..2000 {
        controller.update(&mut camera);
    }
    let settled = camera.position;
    controller.update(&mut camera);
    assert!((camera.position.x - settled.x).abs() < 1e-4);
    assert!((camera.position.z - settled.z).abs() < 1e-4);

    // Orbiting never changes the distance to the target.
    use cgmath::InnerSpace;
    let distance = (camera.position - camera.target).magnitude();
    assert!((distance - 33.0f32.sqrt()).abs() < 1e-3);
}
