//! Application event loop and the per-frame animation driver.
//!
//! Each frame the loop advances the scene to the current elapsed time,
//! applies the orbit controller to the camera, pushes the camera and light
//! uniforms and renders. Window resizes flow through
//! [`Context::resize`](crate::context::Context::resize) before the next
//! frame; raw mouse motion feeds the orbit controller.

use std::sync::Arc;

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{context::Context, data_structures::scene::Scene, render::StageRenderer};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Monotonic session clock. Starts on the first tick so the animation's
/// zero point is the first rendered frame, not process start.
#[derive(Debug, Default)]
pub struct Clock {
    start: Option<Instant>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_secs(&mut self) -> f32 {
        let start = *self.start.get_or_insert_with(Instant::now);
        start.elapsed().as_secs_f32()
    }
}

/// Everything that exists once the GPU is up: context, scene, renderer and
/// the session clock.
pub struct AppState {
    ctx: Context,
    scene: Scene,
    renderer: StageRenderer,
    clock: Clock,
    is_surface_configured: bool,
    #[cfg(feature = "panel")]
    panel: crate::panel::PanelPainter,
}

impl AppState {
    async fn new(window: Arc<Window>, scene: Scene) -> anyhow::Result<Self> {
        let ctx = Context::new(window, &scene).await?;
        let renderer = StageRenderer::new(&ctx, &scene);
        #[cfg(feature = "panel")]
        let panel = crate::panel::PanelPainter::new(&ctx);
        Ok(Self {
            ctx,
            scene,
            renderer,
            clock: Clock::new(),
            is_surface_configured: false,
            #[cfg(feature = "panel")]
            panel,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.is_surface_configured = true;
            self.ctx.resize(width, height);
        }
    }

    /// One animation tick: advance the scene, apply camera input, upload the
    /// uniforms and draw.
    fn tick(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        if !self.is_surface_configured {
            return Ok(());
        }

        let elapsed = self.clock.elapsed_secs();
        self.scene.advance(elapsed);

        let camera = &mut self.ctx.camera;
        camera.controller.update(&mut camera.camera);
        camera
            .uniform
            .update_view_proj(&camera.camera, &self.ctx.projection);
        self.ctx.queue.write_buffer(
            &camera.buffer,
            0,
            bytemuck::cast_slice(&[camera.uniform]),
        );

        #[cfg(feature = "panel")]
        self.panel.run(&self.ctx, &mut self.scene.rig);

        self.ctx.light.write(&self.ctx.queue, &self.scene.rig);

        let result = self.renderer.render(
            &self.ctx,
            &self.scene,
            #[cfg(feature = "panel")]
            Some(&mut self.panel),
        );
        if result.is_ok() && self.renderer.frames_rendered() == 1 {
            log::info!("first frame presented");
        }
        result
    }
}

/// Events sent back into the loop; the web build finishes GPU setup
/// asynchronously and delivers the result this way.
pub enum StageEvent {
    Initialized(AppState),
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<StageEvent>,
    state: Option<AppState>,
    // Held until `resumed` creates the window.
    scene: Option<Scene>,
}

impl App {
    fn new(event_loop: &EventLoop<StageEvent>, scene: Scene) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            state: None,
            scene: Some(scene),
        })
    }
}

impl ApplicationHandler<StageEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes();

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Unable to create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let scene = self.scene.take().expect("resumed twice");

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(AppState::new(window, scene)) {
                Ok(state) => self.state = Some(state),
                Err(e) => {
                    log::error!("GPU setup failed: {}", e);
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let state = AppState::new(window, scene)
                    .await
                    .expect("GPU setup failed");
                assert!(proxy.send_event(StageEvent::Initialized(state)).is_ok());
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: StageEvent) {
        match event {
            StageEvent::Initialized(mut state) => {
                // Trigger a resize and redraw now that the GPU is ready.
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            state.ctx.camera.controller.handle_mouse(dx, dy);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        #[cfg(feature = "panel")]
        if state.panel.handle_window_events(&state.ctx.window, &event) {
            return;
        }

        state.ctx.camera.controller.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                state.ctx.set_scale_factor(scale_factor);
            }
            WindowEvent::RedrawRequested => match state.tick() {
                Ok(_) => {}
                // Reconfigure the surface if it's lost or outdated
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = state.ctx.window.inner_size();
                    state.resize(size.width, size.height);
                }
                Err(e) => {
                    log::error!("Unable to render {}", e);
                }
            },
            _ => {}
        }
    }
}

/// Set up logging, build the event loop and run the given scene until the
/// window closes.
pub fn run(scene: Scene) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<StageEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, scene)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    run(Scene::demo()).map_err(|e| wasm_bindgen::JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_on_first_read() {
        let mut clock = Clock::new();
        let first = clock.elapsed_secs();
        let second = clock.elapsed_secs();
        assert!(first >= 0.0);
        assert!(second >= first);
    }
}
