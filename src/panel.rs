//! Debug panel: slider bindings over the light rig.
//!
//! The bindings themselves are plain data (label, bounds, step, accessors)
//! so they can be tested without any UI. The egui painter that turns them
//! into on-screen sliders is behind the `panel` feature.

use crate::lights::LightRig;

/// One tweakable rig parameter: a labelled slider range plus getter and
/// setter on the rig.
pub struct PanelBinding {
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub get: fn(&LightRig) -> f32,
    pub set: fn(&mut LightRig, f32),
}

impl PanelBinding {
    /// Write a slider value to the rig: clamped to the binding's bounds and
    /// snapped to its step size.
    pub fn apply(&self, rig: &mut LightRig, value: f32) {
        let clamped = value.clamp(self.min, self.max);
        let snapped = self.min + ((clamped - self.min) / self.step).round() * self.step;
        (self.set)(rig, snapped.clamp(self.min, self.max));
    }
}

/// The seven rig parameters exposed on the panel.
pub fn bindings() -> [PanelBinding; 7] {
    [
        PanelBinding {
            label: "Hemisphere Intensity",
            min: 0.0,
            max: 2.0,
            step: 0.01,
            get: |rig| rig.hemisphere.intensity,
            set: |rig, v| rig.hemisphere.intensity = v,
        },
        PanelBinding {
            label: "Directional X",
            min: -10.0,
            max: 10.0,
            step: 0.1,
            get: |rig| rig.directional.position.x,
            set: |rig, v| rig.directional.position.x = v,
        },
        PanelBinding {
            label: "Directional Y",
            min: -10.0,
            max: 10.0,
            step: 0.1,
            get: |rig| rig.directional.position.y,
            set: |rig, v| rig.directional.position.y = v,
        },
        PanelBinding {
            label: "Directional Z",
            min: -10.0,
            max: 10.0,
            step: 0.1,
            get: |rig| rig.directional.position.z,
            set: |rig, v| rig.directional.position.z = v,
        },
        PanelBinding {
            label: "Directional Intensity",
            min: 0.0,
            max: 2.0,
            step: 0.01,
            get: |rig| rig.directional.intensity,
            set: |rig, v| rig.directional.intensity = v,
        },
        PanelBinding {
            label: "Point Light Intensity",
            min: 0.0,
            max: 5.0,
            step: 0.1,
            get: |rig| rig.point.intensity,
            set: |rig, v| rig.point.intensity = v,
        },
        PanelBinding {
            label: "Spotlight Intensity",
            min: 0.0,
            max: 5.0,
            step: 0.1,
            get: |rig| rig.spot.intensity,
            set: |rig, v| rig.spot.intensity = v,
        },
    ]
}

#[cfg(feature = "panel")]
pub use painter::PanelPainter;

#[cfg(feature = "panel")]
mod painter {
    use super::bindings;
    use crate::{context::Context, lights::LightRig};

    /// Draws the slider panel on top of the rendered frame with egui.
    ///
    /// [`run`](Self::run) executes the UI against the rig once per tick and
    /// keeps the tessellated output; [`paint`](Self::paint) draws that output
    /// into the frame's command encoder.
    pub struct PanelPainter {
        state: egui_winit::State,
        renderer: egui_wgpu::Renderer,
        primitives: Vec<egui::ClippedPrimitive>,
        textures_delta: egui::TexturesDelta,
    }

    impl PanelPainter {
        pub fn new(ctx: &Context) -> Self {
            let egui_ctx = egui::Context::default();
            let state = egui_winit::State::new(
                egui_ctx,
                egui::ViewportId::ROOT,
                &ctx.window,
                Some(ctx.viewport.pixel_ratio() as f32),
                None,
                None,
            );
            let renderer = egui_wgpu::Renderer::new(
                &ctx.device,
                ctx.config.format,
                egui_wgpu::RendererOptions {
                    depth_stencil_format: None,
                    msaa_samples: 1,
                    dithering: false,
                    predictable_texture_filtering: false,
                },
            );
            Self {
                state,
                renderer,
                primitives: Vec::new(),
                textures_delta: Default::default(),
            }
        }

        /// Feed a window event to the panel. Returns true when the panel
        /// consumed it, in which case the camera controller should not see it.
        pub fn handle_window_events(
            &mut self,
            window: &winit::window::Window,
            event: &winit::event::WindowEvent,
        ) -> bool {
            self.state.on_window_event(window, event).consumed
        }

        /// Run the panel UI over the rig and remember the shapes to paint.
        pub fn run(&mut self, ctx: &Context, rig: &mut LightRig) {
            let input = self.state.take_egui_input(&ctx.window);
            let output = self.state.egui_ctx().run(input, |egui_ctx| {
                egui::Window::new("Lights")
                    .default_width(260.0)
                    .show(egui_ctx, |ui| {
                        for binding in bindings() {
                            let mut value = (binding.get)(rig);
                            let slider = egui::Slider::new(&mut value, binding.min..=binding.max)
                                .step_by(binding.step as f64)
                                .text(binding.label);
                            if ui.add(slider).changed() {
                                binding.apply(rig, value);
                            }
                        }
                    });
            });
            self.state
                .handle_platform_output(&ctx.window, output.platform_output);
            self.primitives = self
                .state
                .egui_ctx()
                .tessellate(output.shapes, output.pixels_per_point);
            self.textures_delta = output.textures_delta;
        }

        /// Paint the output of the last [`run`](Self::run) over the frame.
        pub fn paint(
            &mut self,
            ctx: &Context,
            encoder: &mut wgpu::CommandEncoder,
            view: &wgpu::TextureView,
        ) {
            // The surface is configured at the capped render size, so the
            // panel scales by the same capped ratio.
            let screen = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [ctx.config.width, ctx.config.height],
                pixels_per_point: ctx.viewport.pixel_ratio() as f32,
            };

            for (id, delta) in &self.textures_delta.set {
                self.renderer
                    .update_texture(&ctx.device, &ctx.queue, *id, delta);
            }
            self.renderer
                .update_buffers(&ctx.device, &ctx.queue, encoder, &self.primitives, &screen);

            {
                let mut pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Panel Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view,
                            depth_slice: None,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        occlusion_query_set: None,
                        timestamp_writes: None,
                    })
                    .forget_lifetime();
                self.renderer.render(&mut pass, &self.primitives, &screen);
            }

            for id in &self.textures_delta.free {
                self.renderer.free_texture(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_exposes_seven_controls() {
        let labels: Vec<_> = bindings().iter().map(|b| b.label).collect();
        assert_eq!(
            labels,
            [
                "Hemisphere Intensity",
                "Directional X",
                "Directional Y",
                "Directional Z",
                "Directional Intensity",
                "Point Light Intensity",
                "Spotlight Intensity",
            ]
        );
    }

    #[test]
    fn intensity_bounds_match_the_stage() {
        let bindings = bindings();
        let by_label = |label: &str| bindings.iter().find(|b| b.label == label).unwrap();
        let hemisphere = by_label("Hemisphere Intensity");
        assert_eq!((hemisphere.min, hemisphere.max, hemisphere.step), (0.0, 2.0, 0.01));
        let x = by_label("Directional X");
        assert_eq!((x.min, x.max, x.step), (-10.0, 10.0, 0.1));
        let point = by_label("Point Light Intensity");
        assert_eq!((point.min, point.max, point.step), (0.0, 5.0, 0.1));
        let spot = by_label("Spotlight Intensity");
        assert_eq!((spot.min, spot.max, spot.step), (0.0, 5.0, 0.1));
    }

    #[test]
    fn apply_clamps_to_bounds() {
        let mut rig = LightRig::demo();
        let bindings = bindings();
        let hemisphere = &bindings[0];
        hemisphere.apply(&mut rig, 7.5);
        assert_eq!(rig.hemisphere.intensity, 2.0);
        hemisphere.apply(&mut rig, -1.0);
        assert_eq!(rig.hemisphere.intensity, 0.0);
    }

    #[test]
    fn apply_snaps_to_step() {
        let mut rig = LightRig::demo();
        let bindings = bindings();
        let point = bindings
            .iter()
            .find(|b| b.label == "Point Light Intensity")
            .unwrap();
        point.apply(&mut rig, 1.2345);
        assert!((rig.point.intensity - 1.2).abs() < 1e-6);
    }

    #[test]
    fn bindings_read_back_what_they_wrote() {
        let mut rig = LightRig::demo();
        for binding in bindings() {
            binding.apply(&mut rig, binding.max);
            assert_eq!((binding.get)(&rig), binding.max);
        }
    }
}
