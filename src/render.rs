//! Per-frame rendering of the stage.
//!
//! [`StageRenderer`] uploads the scene meshes once at startup and then draws
//! them every frame with the stage pipeline: transforms are rewritten from
//! the scene state, a single render pass clears colour and depth and draws
//! each mesh indexed with its own instance buffer.

use crate::{context::Context, data_structures::{mesh::GpuMesh, scene::Scene}};

pub struct StageRenderer {
    meshes: Vec<GpuMesh>,
    frames_rendered: u64,
}

impl StageRenderer {
    /// Upload every scene mesh to the GPU. Mesh order follows the scene's
    /// child order.
    pub fn new(ctx: &Context, scene: &Scene) -> Self {
        let meshes = scene
            .meshes
            .iter()
            .map(|node| GpuMesh::new(&ctx.device, node.name, &node.geometry, &node.transform))
            .collect();
        Self {
            meshes,
            frames_rendered: 0,
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Draw one frame of the given scene.
    ///
    /// Surface errors are returned to the caller; the event loop decides
    /// whether to reconfigure or give up.
    pub fn render(
        &mut self,
        ctx: &Context,
        scene: &Scene,
        #[cfg(feature = "panel")] panel: Option<&mut crate::panel::PanelPainter>,
    ) -> Result<(), wgpu::SurfaceError> {
        for (mesh, node) in self.meshes.iter().zip(&scene.meshes) {
            mesh.write_transform(&ctx.queue, &node.transform);
        }

        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Stage Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Stage Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&ctx.pipelines.stage);
            render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
            render_pass.set_bind_group(1, &ctx.light.bind_group, &[]);
            render_pass.set_bind_group(2, &ctx.material.bind_group, &[]);

            for mesh in &self.meshes {
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, mesh.transform_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.num_elements, 0, 0..1);
            }
        }

        #[cfg(feature = "panel")]
        if let Some(panel) = panel {
            panel.paint(ctx, &mut encoder, &view);
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.frames_rendered += 1;

        Ok(())
    }
}
