use anyhow::{ensure, Result};

use crate::mesh::{edge_indices, MeshSnapshot};

/// Smallest allocation for any mesh buffer (bytes).
const MIN_CAPACITY: u64 = 256;

/// A GPU buffer rewritten wholesale on each upload.
///
/// Grows to the next power of two when an upload does not fit; never shrinks.
struct StreamBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    buffer: wgpu::Buffer,
    capacity: u64,
    len: u64,
}

impl StreamBuffer {
    fn new(device: &wgpu::Device, label: &'static str, usage: wgpu::BufferUsages) -> Self {
        let usage = usage | wgpu::BufferUsages::COPY_DST;
        Self {
            label,
            usage,
            buffer: Self::allocate(device, label, usage, MIN_CAPACITY),
            capacity: MIN_CAPACITY,
            len: 0,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &'static str,
        usage: wgpu::BufferUsages,
        size: u64,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        })
    }

    /// Writes `bytes`, reallocating first when they do not fit.
    ///
    /// `bytes` must already have passed [`ensure_fits`] against `max`.
    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8], max: u64) {
        let required = bytes.len() as u64;
        if required > self.capacity {
            let new_cap = grown_capacity(required, max);
            log::debug!("{}: growing {} -> {new_cap} bytes", self.label, self.capacity);
            self.buffer = Self::allocate(device, self.label, self.usage, new_cap);
            self.capacity = new_cap;
        }
        if required > 0 {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.len = required;
    }

    fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..self.len)
    }
}

/// Fails when `required` bytes exceed the device's `max` buffer size.
fn ensure_fits(label: &str, required: u64, max: u64) -> Result<()> {
    ensure!(
        required <= max,
        "{label}: {required} bytes exceed the device buffer limit of {max} bytes"
    );
    Ok(())
}

/// Next power of two at or above `required`, capped at `max`.
fn grown_capacity(required: u64, max: u64) -> u64 {
    required.next_power_of_two().max(MIN_CAPACITY).min(max)
}

/// GPU copy of the current mesh.
///
/// Both draws share `positions`; the surface draw adds `colors` and the
/// triangle index list, the edge draw uses a line list derived from the same
/// triangles.
pub struct GpuMesh {
    positions: StreamBuffer,
    colors: StreamBuffer,
    triangles: StreamBuffer,
    edges: StreamBuffer,
    triangle_index_count: u32,
    edge_index_count: u32,
}

impl GpuMesh {
    /// Allocates empty buffers.
    pub fn new(device: &wgpu::Device) -> Self {
        use wgpu::BufferUsages as U;
        Self {
            positions: StreamBuffer::new(device, "foam-render positions", U::VERTEX),
            colors: StreamBuffer::new(device, "foam-render colors", U::VERTEX),
            triangles: StreamBuffer::new(device, "foam-render triangle indices", U::INDEX),
            edges: StreamBuffer::new(device, "foam-render edge indices", U::INDEX),
            triangle_index_count: 0,
            edge_index_count: 0,
        }
    }

    /// Replaces the buffer contents with `mesh`.
    ///
    /// Every buffer is checked against the device's `max_buffer_size` before
    /// any is touched; on error the previous contents stay in place.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        mesh: &MeshSnapshot,
    ) -> Result<()> {
        let edges = edge_indices(mesh.indices());
        let max = device.limits().max_buffer_size;

        let staged: [(&mut StreamBuffer, &[u8]); 4] = [
            (&mut self.positions, bytemuck::cast_slice(mesh.positions())),
            (&mut self.colors, bytemuck::cast_slice(mesh.vertex_colors())),
            (&mut self.triangles, bytemuck::cast_slice(mesh.indices())),
            (&mut self.edges, bytemuck::cast_slice(&edges)),
        ];
        for (buffer, bytes) in &staged {
            ensure_fits(buffer.label, bytes.len() as u64, max)?;
        }
        for (buffer, bytes) in staged {
            buffer.write(device, queue, bytes, max);
        }

        self.triangle_index_count = mesh.index_count() as u32;
        self.edge_index_count = edges.len() as u32;
        Ok(())
    }

    /// True when there is nothing to draw. Slices must not be taken then.
    pub fn is_empty(&self) -> bool {
        self.positions.len == 0 || self.triangle_index_count == 0
    }

    pub fn positions(&self) -> wgpu::BufferSlice<'_> {
        self.positions.slice()
    }

    pub fn colors(&self) -> wgpu::BufferSlice<'_> {
        self.colors.slice()
    }

    pub fn triangles(&self) -> wgpu::BufferSlice<'_> {
        self.triangles.slice()
    }

    pub fn edges(&self) -> wgpu::BufferSlice<'_> {
        self.edges.slice()
    }

    pub fn triangle_index_count(&self) -> u32 {
        self.triangle_index_count
    }

    pub fn edge_index_count(&self) -> u32 {
        self.edge_index_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u64 = 256 << 20;

    #[test]
    fn oversized_buffers_are_rejected() {
        // 24 bytes of edge indices per triangle.
        let edges = 11_200_000u64 * 24;
        assert!(ensure_fits("edges", edges, LIMIT).is_err());
        assert!(ensure_fits("edges", LIMIT, LIMIT).is_ok());
        assert!(ensure_fits("edges", 0, LIMIT).is_ok());
    }

    #[test]
    fn growth_stays_within_limit() {
        assert_eq!(grown_capacity(1, LIMIT), MIN_CAPACITY);
        assert_eq!(grown_capacity(1000, LIMIT), 1024);
        assert_eq!(grown_capacity(LIMIT, LIMIT), LIMIT);
        assert_eq!(grown_capacity(200 << 20, 300 << 20), 300 << 20);
    }
}
