//! Central GPU and window context.
//!
//! [`Context`] owns the surface, device, queue, pipelines and the GPU-side
//! camera/light/material resources. It is created once at startup and passed
//! by reference to the resize handler and the animation driver; there is no
//! global state.

use std::sync::Arc;

use anyhow::Context as _;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraUniform, OrbitController, Projection},
    data_structures::{scene::Scene, texture::DepthTexture},
    material::MaterialResources,
    pipelines::{light::LightResources, stage::mk_stage_pipeline},
};

/// Current window size plus the applied pixel density.
///
/// The window system reports sizes in physical pixels at its own scale
/// factor; the applied density is capped at 2 to bound rendering cost on
/// denser displays. [`render_size`](Self::render_size) is what the surface
/// and depth texture are configured with, so on a 3x display the backing
/// buffers end up at two thirds of the raw window pixel size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    scale_factor: f64,
}

impl Viewport {
    pub const MAX_PIXEL_RATIO: f64 = 2.0;

    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Record a new window size. Zero dimensions are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
        }
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    /// The pixel density applied to rendering, never above 2.
    pub fn pixel_ratio(&self) -> f64 {
        self.scale_factor.min(Self::MAX_PIXEL_RATIO)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Surface dimensions with the density cap applied. Matches the window
    /// size while the scale factor is at most 2.
    pub fn render_size(&self) -> (u32, u32) {
        let scale = self.pixel_ratio() / self.scale_factor.max(f64::EPSILON);
        (
            ((self.width as f64 * scale).round() as u32).max(1),
            ((self.height as f64 * scale).round() as u32).max(1),
        )
    }
}

/// Camera state together with its GPU resources.
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

pub struct Pipelines {
    pub stage: wgpu::RenderPipeline,
}

pub struct Context {
    pub(crate) window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub viewport: Viewport,
    pub depth_texture: DepthTexture,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub material: MaterialResources,
    pub pipelines: Pipelines,
    pub clear_colour: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>, scene: &Scene) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("wgpu setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible graphics adapter")?;

        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                // WebGL doesn't support all of wgpu's features, so downlevel
                // limits are used when building for the web.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to request a device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shader assumes an sRGB surface; fall back to whatever the
        // surface offers first otherwise.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let viewport = Viewport::new(size.width, size.height, window.scale_factor());
        let (render_width, render_height) = viewport.render_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: render_width,
            height: render_height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera = Camera::new([2.0, 2.0, 5.0], [0.0, 0.0, 0.0]);
        let projection =
            Projection::new(config.width, config.height, cgmath::Deg(75.0), 0.1, 100.0);
        let controller = OrbitController::from_camera(&camera);

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let light = LightResources::new(&device, &scene.rig);
        let material = MaterialResources::new(
            &device,
            scene
                .meshes
                .first()
                .map(|node| node.material.as_ref())
                .unwrap_or(&crate::material::StandardMaterial::default()),
        );

        let stage = mk_stage_pipeline(
            &device,
            &config,
            &camera_bind_group_layout,
            &light.bind_group_layout,
            &material.bind_group_layout,
        );

        let depth_texture =
            DepthTexture::new(&device, [config.width, config.height], "depth_texture");

        let camera = CameraResources {
            camera,
            controller,
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout: camera_bind_group_layout,
        };

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            viewport,
            depth_texture,
            camera,
            projection,
            light,
            material,
            pipelines: Pipelines { stage },
            clear_colour: wgpu::Color {
                r: 0.01,
                g: 0.01,
                b: 0.01,
                a: 1.0,
            },
        })
    }

    /// Apply a new window size: viewport record, camera aspect, surface
    /// configuration and depth texture, in that order, before the next frame
    /// is rendered.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport.resize(width, height);
        self.apply_viewport();
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.viewport.set_scale_factor(scale_factor);
        self.apply_viewport();
    }

    /// Reconfigure everything that follows the viewport: surface size with
    /// the density cap applied, projection aspect, depth texture.
    fn apply_viewport(&mut self) {
        let (render_width, render_height) = self.viewport.render_size();
        self.config.width = render_width;
        self.config.height = render_height;
        self.projection
            .resize(self.viewport.width, self.viewport.height);
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = DepthTexture::new(
            &self.device,
            [render_width, render_height],
            "depth_texture",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_caps_pixel_ratio() {
        let mut viewport = Viewport::new(800, 600, 3.0);
        assert_eq!(viewport.pixel_ratio(), 2.0);
        viewport.set_scale_factor(1.5);
        assert_eq!(viewport.pixel_ratio(), 1.5);
        viewport.set_scale_factor(2.5);
        assert_eq!(viewport.pixel_ratio(), 2.0);
    }

    #[test]
    fn viewport_resize_updates_aspect() {
        let mut viewport = Viewport::new(800, 600, 1.0);
        viewport.resize(1024, 768);
        assert_eq!((viewport.width, viewport.height), (1024, 768));
        assert!((viewport.aspect() - 1024.0 / 768.0).abs() < f32::EPSILON);
    }

    #[test]
    fn render_size_matches_the_window_up_to_double_density() {
        assert_eq!(Viewport::new(800, 600, 1.0).render_size(), (800, 600));
        assert_eq!(Viewport::new(800, 600, 1.5).render_size(), (800, 600));
        assert_eq!(Viewport::new(1600, 1200, 2.0).render_size(), (1600, 1200));
    }

    #[test]
    fn render_size_shrinks_on_denser_displays() {
        // A 3x display renders at 2x density: two thirds of the window pixels.
        let viewport = Viewport::new(2400, 1800, 3.0);
        assert_eq!(viewport.render_size(), (1600, 1200));
        assert!((viewport.aspect() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn scale_factor_change_alters_the_render_size() {
        let mut viewport = Viewport::new(2400, 1800, 2.0);
        assert_eq!(viewport.render_size(), (2400, 1800));
        viewport.set_scale_factor(3.0);
        assert_eq!(viewport.render_size(), (1600, 1200));
    }

    #[test]
    fn viewport_ignores_zero_sizes() {
        let mut viewport = Viewport::new(800, 600, 1.0);
        viewport.resize(0, 400);
        viewport.resize(400, 0);
        assert_eq!((viewport.width, viewport.height), (800, 600));
    }
}
