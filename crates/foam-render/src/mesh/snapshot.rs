use anyhow::{ensure, Result};

use crate::paint::Color;

use super::{COLOR_COMPONENTS, POSITION_COMPONENTS, TRIANGLE_INDICES};

/// Borrowed arrays handed over by the caller for one upload.
///
/// - `positions`: `x, y, z` per vertex
/// - `indices`: three vertex indices per triangle
/// - `vertex_colors`: `r, g, b, a` per vertex, or `None` for the default color
/// - `cell_colors`: `r, g, b, a` per cell, or `None`
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshUpload<'a> {
    pub positions: &'a [f32],
    pub indices: &'a [u32],
    pub vertex_colors: Option<&'a [f32]>,
    pub cell_colors: Option<&'a [f32]>,
}

/// The most recently uploaded geometry and colors.
///
/// Invariants:
/// - `positions.len() == 3 * vertex_count()`
/// - `indices.len()` is a multiple of 3
/// - `vertex_colors.len() == 4 * vertex_count()` (synthesized when absent)
/// - `cell_colors.len()` is a multiple of 4 (empty when absent)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshSnapshot {
    positions: Vec<f32>,
    indices: Vec<u32>,
    vertex_colors: Vec<f32>,
    cell_colors: Vec<f32>,
}

impl MeshSnapshot {
    /// Copies `upload` into an owned snapshot, validating array shapes.
    pub fn from_upload(upload: MeshUpload<'_>) -> Result<Self> {
        let MeshUpload {
            positions,
            indices,
            vertex_colors,
            cell_colors,
        } = upload;

        ensure!(
            positions.len() % POSITION_COMPONENTS == 0,
            "position array length {} is not a multiple of {POSITION_COMPONENTS}",
            positions.len()
        );
        ensure!(
            indices.len() % TRIANGLE_INDICES == 0,
            "index array length {} is not a multiple of {TRIANGLE_INDICES}",
            indices.len()
        );

        let vertex_count = positions.len() / POSITION_COMPONENTS;
        // No positions means no geometry, whatever the indices say.
        if let Some(&max) = indices.iter().max().filter(|_| vertex_count > 0) {
            ensure!(
                (max as usize) < vertex_count,
                "index {max} out of range for {vertex_count} vertices"
            );
        }

        let vertex_colors = match vertex_colors {
            Some(colors) => {
                ensure!(
                    colors.len() == vertex_count * COLOR_COMPONENTS,
                    "vertex color array length {} does not match {vertex_count} vertices",
                    colors.len()
                );
                colors.to_vec()
            }
            None => Color::DEFAULT_VERTEX
                .to_array()
                .iter()
                .copied()
                .cycle()
                .take(vertex_count * COLOR_COMPONENTS)
                .collect(),
        };

        let cell_colors = match cell_colors {
            Some(colors) => {
                ensure!(
                    colors.len() % COLOR_COMPONENTS == 0,
                    "cell color array length {} is not a multiple of {COLOR_COMPONENTS}",
                    colors.len()
                );
                colors.to_vec()
            }
            None => Vec::new(),
        };

        Ok(Self {
            positions: positions.to_vec(),
            indices: indices.to_vec(),
            vertex_colors,
            cell_colors,
        })
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_colors(&self) -> &[f32] {
        &self.vertex_colors
    }

    /// Per-cell colors as uploaded. Not consumed by drawing.
    pub fn cell_colors(&self) -> &[f32] {
        &self.cell_colors
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / POSITION_COMPONENTS
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn cell_count(&self) -> usize {
        self.cell_colors.len() / COLOR_COMPONENTS
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.index_count() == 0
    }
}

/// Expands a triangle list into a line list tracing every triangle outline.
///
/// Edges shared between triangles appear once per triangle, matching a
/// per-polygon outline rasterization.
pub fn edge_indices(triangles: &[u32]) -> Vec<u32> {
    triangles
        .chunks_exact(TRIANGLE_INDICES)
        .flat_map(|t| [t[0], t[1], t[1], t[2], t[2], t[0]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRI: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

    fn upload<'a>(positions: &'a [f32], indices: &'a [u32]) -> MeshUpload<'a> {
        MeshUpload {
            positions,
            indices,
            ..Default::default()
        }
    }

    #[test]
    fn missing_vertex_colors_are_synthesized() {
        let snap = MeshSnapshot::from_upload(upload(&TRI, &[0, 1, 2])).unwrap();
        assert_eq!(snap.vertex_count(), 3);
        assert_eq!(snap.vertex_colors().len(), 12);
        for rgba in snap.vertex_colors().chunks_exact(4) {
            assert_eq!(rgba, &[0.5, 0.7, 1.0, 1.0]);
        }
    }

    #[test]
    fn explicit_colors_are_kept() {
        let colors = [1.0f32, 0.0, 0.0, 1.0].repeat(3);
        let snap = MeshSnapshot::from_upload(MeshUpload {
            vertex_colors: Some(colors.as_slice()),
            ..upload(&TRI, &[0, 1, 2])
        })
        .unwrap();
        assert_eq!(snap.vertex_colors(), colors.as_slice());
    }

    #[test]
    fn cell_colors_are_stored() {
        let cells = [0.2f32, 0.3, 0.4, 1.0];
        let snap = MeshSnapshot::from_upload(MeshUpload {
            cell_colors: Some(&cells[..]),
            ..upload(&TRI, &[0, 1, 2])
        })
        .unwrap();
        assert_eq!(snap.cell_count(), 1);
        assert_eq!(snap.cell_colors(), &cells);
    }

    #[test]
    fn absent_cell_colors_are_empty() {
        let snap = MeshSnapshot::from_upload(upload(&TRI, &[0, 1, 2])).unwrap();
        assert_eq!(snap.cell_count(), 0);
    }

    #[test]
    fn rejects_partial_position() {
        assert!(MeshSnapshot::from_upload(upload(&TRI[..8], &[0, 1, 2])).is_err());
    }

    #[test]
    fn rejects_partial_triangle() {
        assert!(MeshSnapshot::from_upload(upload(&TRI, &[0, 1])).is_err());
    }

    #[test]
    fn rejects_out_of_range_index() {
        assert!(MeshSnapshot::from_upload(upload(&TRI, &[0, 1, 3])).is_err());
        let snap = MeshSnapshot::from_upload(upload(&[], &[0, 0, 0])).unwrap();
        assert!(snap.is_empty());
    }

    #[test]
    fn rejects_short_vertex_colors() {
        let colors = [1.0f32; 8];
        let res = MeshSnapshot::from_upload(MeshUpload {
            vertex_colors: Some(&colors[..]),
            ..upload(&TRI, &[0, 1, 2])
        });
        assert!(res.is_err());
    }

    #[test]
    fn empty_upload_is_empty() {
        let snap = MeshSnapshot::from_upload(MeshUpload::default()).unwrap();
        assert!(snap.is_empty());
        assert!(MeshSnapshot::from_upload(upload(&TRI, &[])).unwrap().is_empty());
    }

    #[test]
    fn edges_trace_each_triangle() {
        assert_eq!(
            edge_indices(&[0, 1, 2, 2, 1, 3]),
            vec![0, 1, 1, 2, 2, 0, 2, 1, 1, 3, 3, 2]
        );
    }

    #[test]
    fn edges_of_nothing() {
        assert!(edge_indices(&[]).is_empty());
    }
}
