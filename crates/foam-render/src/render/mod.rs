//! GPU rendering subsystem.
//!
//! - [`RenderTarget`]: offscreen color + depth/stencil textures
//! - [`MeshPipeline`]: one compiled pipeline with its uniform block
//! - [`GpuMesh`]: vertex/index buffers derived from a mesh snapshot
//! - [`readback_rgba`]: copies a target back to CPU memory
//!
//! Convention: geometry is in model space; the vertex shader applies
//! `projection * view * model` from the uniform block.

mod geometry;
mod pipeline;
mod readback;
mod target;

pub use geometry::GpuMesh;
pub use pipeline::{MeshPipeline, MeshPrimitive, MeshUniforms, PipelineSpec};
pub use readback::readback_rgba;
pub use target::{RenderTarget, TextureId, COLOR_FORMAT, DEPTH_FORMAT};
