//! Headless mesh renderer for CFD result visualization.
//!
//! A [`Renderer`] owns a wgpu device, two pipelines (filled surface and edge
//! overlay), an offscreen render target and the most recently uploaded mesh.
//! Callers upload flat vertex/index/color arrays, adjust the view and display
//! mode, and render into a texture they sample or read back.

pub mod device;
pub mod logging;
pub mod mesh;
pub mod paint;
pub mod render;
pub mod view;

mod renderer;

pub use glam;
pub use mesh::{MeshSnapshot, MeshUpload};
pub use render::TextureId;
pub use renderer::{Renderer, RendererConfig};
pub use view::{DataMode, DisplayMode, Representation, ViewState};
