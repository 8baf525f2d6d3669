//! Camera, perspective projection and orbit-style camera control.
//!
//! The camera is a simple look-at camera orbited around a target point by
//! [`OrbitController`]. The controller accumulates pointer input between
//! frames and applies it once per animation tick with inertial damping,
//! so releasing the mouse lets the view coast to a stop.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// wgpu clip space differs from OpenGL: z goes from 0.0 to 1.0 instead of
/// -1.0 to 1.0, so perspective matrices built by cgmath need a correction.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// A look-at camera described by eye position, target and up vector.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P, target: P) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
            up: Vector3::unit_y(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }
}

/// Perspective projection with field of view, aspect ratio and clip planes.
///
/// The aspect ratio follows the viewport: [`resize`](Self::resize) must be
/// called whenever the drawing surface changes size.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Recompute the aspect ratio for a new viewport size. Zero dimensions
    /// (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Camera data as stored on the GPU: the view position for specular shading
/// and the combined view-projection matrix.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = [camera.position.x, camera.position.y, camera.position.z, 1.0];
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

const MIN_PITCH: f32 = -1.54;
const MAX_PITCH: f32 = 1.54;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 50.0;

/// Orbit-style camera controller with inertial damping.
///
/// Left-drag rotates the camera around the target, the scroll wheel zooms.
/// Input is accumulated as velocities and applied in [`update`](Self::update),
/// which the animation driver calls exactly once per tick. With damping
/// enabled the velocities decay by `damping_factor` each step instead of
/// being consumed at once.
#[derive(Clone, Debug)]
pub struct OrbitController {
    pub target: Point3<f32>,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    distance: f32,
    yaw: f32,
    pitch: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
    rotating: bool,
}

impl OrbitController {
    /// Build a controller whose spherical state reproduces the given camera
    /// position relative to its target.
    pub fn from_camera(camera: &Camera) -> Self {
        let offset = camera.position - camera.target;
        let distance = offset.magnitude();
        Self {
            target: camera.target,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            distance,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).asin(),
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
            rotating: false,
        }
    }

    /// Track mouse button and wheel state from window events.
    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.rotating = *state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.zoom_velocity -= delta * self.zoom_speed;
            }
            _ => {}
        }
    }

    /// Accumulate a raw pointer drag. Has no effect unless a left-drag is in
    /// progress.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        if self.rotating {
            self.yaw_velocity -= dx as f32 * self.rotate_speed;
            self.pitch_velocity += dy as f32 * self.rotate_speed;
        }
    }

    /// Apply the accumulated input to the camera, then damp it. Called once
    /// per animation tick, before rendering.
    pub fn update(&mut self, camera: &mut Camera) {
        self.yaw += self.yaw_velocity;
        self.pitch = (self.pitch + self.pitch_velocity).clamp(MIN_PITCH, MAX_PITCH);
        self.distance =
            (self.distance * (1.0 + self.zoom_velocity)).clamp(MIN_DISTANCE, MAX_DISTANCE);

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.yaw_velocity *= decay;
            self.pitch_velocity *= decay;
            self.zoom_velocity *= decay;
        } else {
            self.yaw_velocity = 0.0;
            self.pitch_velocity = 0.0;
            self.zoom_velocity = 0.0;
        }

        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let offset = Vector3::new(
            self.distance * cos_pitch * sin_yaw,
            self.distance * sin_pitch,
            self.distance * cos_pitch * cos_yaw,
        );
        camera.position = self.target + offset;
        camera.target = self.target;
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_resize_updates_aspect() {
        let mut projection = Projection::new(800, 600, cgmath::Deg(75.0), 0.1, 100.0);
        projection.resize(1024, 768);
        assert!((projection.aspect - 1024.0 / 768.0).abs() < f32::EPSILON);
    }

    #[test]
    fn projection_ignores_zero_dimensions() {
        let mut projection = Projection::new(800, 600, cgmath::Deg(75.0), 0.1, 100.0);
        projection.resize(0, 600);
        projection.resize(800, 0);
        assert!((projection.aspect - 800.0 / 600.0).abs() < f32::EPSILON);
    }

    #[test]
    fn controller_reproduces_initial_camera_position() {
        let mut camera = Camera::new([2.0, 2.0, 5.0], [0.0, 0.0, 0.0]);
        let mut controller = OrbitController::from_camera(&camera);
        controller.update(&mut camera);
        assert!((camera.position.x - 2.0).abs() < 1e-4);
        assert!((camera.position.y - 2.0).abs() < 1e-4);
        assert!((camera.position.z - 5.0).abs() < 1e-4);
    }

    #[test]
    fn damping_decays_accumulated_input() {
        let mut camera = Camera::new([2.0, 2.0, 5.0], [0.0, 0.0, 0.0]);
        let mut controller = OrbitController::from_camera(&camera);
        controller.handle_window_events(&WindowEvent::MouseInput {
            device_id: winit::event::DeviceId::dummy(),
            state: ElementState::Pressed,
            button: MouseButton::Left,
        });
        controller.handle_mouse(10.0, 0.0);
        let initial = controller.yaw_velocity;
        assert!(initial != 0.0);
        controller.update(&mut camera);
        assert!(controller.yaw_velocity.abs() < initial.abs());
        assert!(controller.yaw_velocity != 0.0);
    }

    #[test]
    fn drag_is_ignored_without_button_press() {
        let mut controller =
            OrbitController::from_camera(&Camera::new([2.0, 2.0, 5.0], [0.0, 0.0, 0.0]));
        controller.handle_mouse(10.0, 10.0);
        assert_eq!(controller.yaw_velocity, 0.0);
        assert_eq!(controller.pitch_velocity, 0.0);
    }

    #[test]
    fn update_preserves_orbit_distance() {
        let mut camera = Camera::new([2.0, 2.0, 5.0], [0.0, 0.0, 0.0]);
        let mut controller = OrbitController::from_camera(&camera);
        for _ in 0..10 {
            controller.update(&mut camera);
        }
        let distance = (camera.position - camera.target).magnitude();
        assert!((distance - 33.0f32.sqrt()).abs() < 1e-4);
    }
}
