//! CPU-side mesh data.
//!
//! The renderer keeps a full copy of the last upload ([`MeshSnapshot`]) and
//! derives GPU buffers from it. Uploads replace the snapshot wholesale.

mod snapshot;

pub use snapshot::{edge_indices, MeshSnapshot, MeshUpload};

/// Components per position (x, y, z).
pub const POSITION_COMPONENTS: usize = 3;

/// Components per color (r, g, b, a).
pub const COLOR_COMPONENTS: usize = 4;

/// Indices per triangle.
pub const TRIANGLE_INDICES: usize = 3;
