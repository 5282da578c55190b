use anyhow::{Context, Result};

use crate::device::{Gpu, GpuInit};
use crate::mesh::{MeshSnapshot, MeshUpload};
use crate::paint::Color;
use crate::render::{
    readback_rgba, GpuMesh, MeshPipeline, MeshUniforms, PipelineSpec, RenderTarget, TextureId,
};
use crate::view::{DisplayMode, Representation, ViewState};

/// Construction parameters for a [`Renderer`].
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Adapter/device selection.
    pub gpu: GpuInit,
}

impl RendererConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            gpu: GpuInit::default(),
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Offscreen renderer for a single mesh.
///
/// Mutations take `&mut self`; [`Renderer::render`] only reads the mesh, view
/// and mode and writes the render target.
pub struct Renderer {
    // Declaration order is drop order: geometry, target, pipelines, device.
    geometry: GpuMesh,
    target: RenderTarget,
    surface: MeshPipeline,
    edge: MeshPipeline,
    gpu: Gpu,

    mesh: MeshSnapshot,
    view: ViewState,
    mode: DisplayMode,
}

impl Renderer {
    /// Creates a renderer with a `width x height` target on the default adapter.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_config(RendererConfig::new(width, height))
    }

    pub fn with_config(config: RendererConfig) -> Result<Self> {
        let RendererConfig { width, height, gpu } = config;

        let gpu = Gpu::new_blocking(gpu).context("failed to initialize GPU context")?;
        let device = gpu.device();

        let surface = MeshPipeline::new(device, PipelineSpec::surface());
        let edge = MeshPipeline::new(device, PipelineSpec::edge());
        let geometry = GpuMesh::new(device);
        let target = RenderTarget::new(device, width, height);

        log::info!(
            "renderer created ({}x{}, texture {})",
            target.width(),
            target.height(),
            target.id().get()
        );

        Ok(Self {
            geometry,
            target,
            surface,
            edge,
            gpu,
            mesh: MeshSnapshot::default(),
            view: ViewState::default(),
            mode: DisplayMode::default(),
        })
    }

    /// Replaces the mesh and uploads it to the GPU.
    ///
    /// On error the previous mesh stays in place.
    pub fn update_mesh(&mut self, upload: MeshUpload<'_>) -> Result<()> {
        let mesh = MeshSnapshot::from_upload(upload).context("invalid mesh upload")?;
        self.geometry
            .upload(self.gpu.device(), self.gpu.queue(), &mesh)
            .context("mesh does not fit in GPU buffers")?;

        log::debug!(
            "mesh uploaded: {} vertices, {} triangles, {} cell colors",
            mesh.vertex_count(),
            mesh.index_count() / 3,
            mesh.cell_count()
        );

        self.mesh = mesh;
        Ok(())
    }

    pub fn set_view(&mut self, view: ViewState) {
        self.view = view;
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    /// Recreates the render target at the new size.
    ///
    /// Texture ids obtained earlier no longer name the live texture.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.target = RenderTarget::new(self.gpu.device(), width, height);
        log::info!(
            "render target resized to {}x{} (texture {})",
            self.target.width(),
            self.target.height(),
            self.target.id().get()
        );
    }

    /// Redraws the target and returns its texture id.
    pub fn render(&self) -> TextureId {
        let device = self.gpu.device();
        let queue = self.gpu.queue();
        let representation = self.mode.representation;

        let draw = !self.mesh.is_empty() && !self.geometry.is_empty();
        if draw {
            let matrices = self
                .view
                .matrices(self.target.width(), self.target.height());
            if representation.draws_surface() {
                let uniforms = MeshUniforms::new(&matrices, Color::default());
                self.surface.write_uniforms(queue, &uniforms);
            }
            if representation.draws_edges() {
                let uniforms = MeshUniforms::new(&matrices, edge_color(representation));
                self.edge.write_uniforms(queue, &uniforms);
            }
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("foam-render frame encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("foam-render mesh pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.target.color_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(Color::BACKGROUND.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.target.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if draw {
                if representation.draws_surface() {
                    self.surface.draw(&mut pass, &self.geometry);
                }
                if representation.draws_edges() {
                    self.edge.draw(&mut pass, &self.geometry);
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        self.target.id()
    }

    /// Id of the current color texture, without rendering.
    pub fn texture_id(&self) -> TextureId {
        self.target.id()
    }

    /// The current color texture, for sampling on [`Renderer::device`].
    pub fn texture(&self) -> &wgpu::Texture {
        self.target.color_texture()
    }

    /// Target size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.target.width(), self.target.height())
    }

    /// Copies the current target into RGBA8 bytes, top row first.
    pub fn read_pixels(&self) -> Result<Vec<u8>> {
        readback_rgba(
            self.gpu.device(),
            self.gpu.queue(),
            self.target.color_texture(),
            self.target.width(),
            self.target.height(),
        )
    }

    pub fn device(&self) -> &wgpu::Device {
        self.gpu.device()
    }

    pub fn queue(&self) -> &wgpu::Queue {
        self.gpu.queue()
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.gpu.adapter_info()
    }

    pub fn mesh(&self) -> &MeshSnapshot {
        &self.mesh
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }
}

/// Edge color for the given representation: solid blue on its own, faint black
/// over a shaded surface.
fn edge_color(representation: Representation) -> Color {
    match representation {
        Representation::Wireframe => Color::WIREFRAME_EDGE,
        Representation::Surface | Representation::SurfaceWithEdges => Color::OVERLAY_EDGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wireframe_edges_are_opaque_blue() {
        assert_eq!(edge_color(Representation::Wireframe), Color::new(0.25, 0.5, 1.0, 1.0));
    }

    #[test]
    fn overlay_edges_are_faint_black() {
        assert_eq!(
            edge_color(Representation::SurfaceWithEdges),
            Color::new(0.0, 0.0, 0.0, 0.3)
        );
    }

    #[test]
    fn renderer_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Renderer>();
    }
}
