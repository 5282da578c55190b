use bytemuck::{Pod, Zeroable};

use crate::device::log_compilation_info;
use crate::paint::Color;
use crate::view::CameraMatrices;

use super::geometry::GpuMesh;
use super::target::{COLOR_FORMAT, DEPTH_FORMAT};

/// Uniform block shared by both shaders (must match the WGSL `Uniforms`).
///
/// The surface shader ignores `edge_color`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct MeshUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub edge_color: [f32; 4],
}

impl MeshUniforms {
    pub fn new(matrices: &CameraMatrices, edge_color: Color) -> Self {
        Self {
            model: matrices.model.to_cols_array_2d(),
            view: matrices.view.to_cols_array_2d(),
            projection: matrices.projection.to_cols_array_2d(),
            edge_color: edge_color.to_array(),
        }
    }
}

/// Which mesh buffers a pipeline consumes and how they are rasterized.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MeshPrimitive {
    /// Triangle list with per-vertex colors.
    FilledTriangles,
    /// Line list tracing each triangle, single uniform color.
    TriangleOutlines,
}

/// Immutable description of a pipeline, shader source included.
#[derive(Debug, Clone)]
pub struct PipelineSpec {
    pub label: &'static str,
    pub wgsl: &'static str,
    pub primitive: MeshPrimitive,
    pub depth_compare: wgpu::CompareFunction,
}

impl PipelineSpec {
    /// Filled surface colored per vertex.
    pub fn surface() -> Self {
        Self {
            label: "foam-render surface",
            wgsl: include_str!("shaders/surface.wgsl"),
            primitive: MeshPrimitive::FilledTriangles,
            depth_compare: wgpu::CompareFunction::Less,
        }
    }

    /// Triangle outlines in a uniform color.
    ///
    /// `LessEqual` lets outlines win against the coincident filled surface.
    pub fn edge() -> Self {
        Self {
            label: "foam-render edge",
            wgsl: include_str!("shaders/edge.wgsl"),
            primitive: MeshPrimitive::TriangleOutlines,
            depth_compare: wgpu::CompareFunction::LessEqual,
        }
    }
}

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const COLOR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x4];

fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &POSITION_ATTRS,
    }
}

fn color_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 4]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &COLOR_ATTRS,
    }
}

fn uniforms_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<MeshUniforms>() as u64)
        .expect("MeshUniforms has non-zero size by construction")
}

/// A compiled pipeline plus the uniform buffer and bind group feeding it.
pub struct MeshPipeline {
    spec: PipelineSpec,
    pipeline: wgpu::RenderPipeline,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl MeshPipeline {
    /// Compiles `spec`. Shader diagnostics are logged, never returned.
    pub fn new(device: &wgpu::Device, spec: PipelineSpec) -> Self {
        let label = spec.label;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(spec.wgsl.into()),
        });
        log_compilation_info(&shader, label);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(uniforms_min_binding_size()),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let layouts = [position_layout(), color_layout()];
        let (topology, buffers) = match spec.primitive {
            MeshPrimitive::FilledTriangles => (wgpu::PrimitiveTopology::TriangleList, &layouts[..]),
            MeshPrimitive::TriangleOutlines => (wgpu::PrimitiveTopology::LineList, &layouts[..1]),
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: COLOR_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: spec.depth_compare,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<MeshUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });

        log::debug!("pipeline '{label}' created");

        Self {
            spec,
            pipeline,
            uniforms,
            bind_group,
        }
    }

    /// Stages `uniforms` for the next submission.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &MeshUniforms) {
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(uniforms));
    }

    /// Records the draw of `mesh` into `pass`.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, mesh: &GpuMesh) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, mesh.positions());

        let (indices, count) = match self.spec.primitive {
            MeshPrimitive::FilledTriangles => {
                pass.set_vertex_buffer(1, mesh.colors());
                (mesh.triangles(), mesh.triangle_index_count())
            }
            MeshPrimitive::TriangleOutlines => (mesh.edges(), mesh.edge_index_count()),
        };

        pass.set_index_buffer(indices, wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewState;

    #[test]
    fn uniform_block_is_wgsl_sized() {
        // 3 x mat4x4<f32> + vec4<f32>
        assert_eq!(std::mem::size_of::<MeshUniforms>(), 208);
    }

    #[test]
    fn uniforms_carry_matrices_column_major() {
        let m = ViewState::default().matrices(4, 3);
        let u = MeshUniforms::new(&m, Color::WIREFRAME_EDGE);
        assert_eq!(u.model, m.model.to_cols_array_2d());
        assert_eq!(u.view[3], [0.0, 0.0, -500.0, 1.0]);
        assert_eq!(u.edge_color, [0.25, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn specs_pick_distinct_primitives() {
        assert_eq!(PipelineSpec::surface().primitive, MeshPrimitive::FilledTriangles);
        assert_eq!(PipelineSpec::edge().primitive, MeshPrimitive::TriangleOutlines);
        assert!(PipelineSpec::edge().wgsl.contains("edge_color"));
    }
}
