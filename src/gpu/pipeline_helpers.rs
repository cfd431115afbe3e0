//! Shared wgpu boilerplate for the point-sprite pipelines.

use super::texture::DEPTH_FORMAT;

/// Vertex-visible uniform buffer binding.
pub fn uniform_buffer(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// What differs between the visible, highlight and picking point passes.
pub struct PointPipelineDesc<'a> {
    /// Debug label prefix.
    pub label: &'a str,
    /// Composed shader module.
    pub shader: &'a wgpu::ShaderModule,
    /// Vertex entry point.
    pub vs_entry: &'a str,
    /// Per-instance vertex buffer layout.
    pub instance_layout: wgpu::VertexBufferLayout<'a>,
    /// Color target format.
    pub format: wgpu::TextureFormat,
    /// Depth comparison; `Always` draws on top of the scene.
    pub depth_compare: wgpu::CompareFunction,
    /// MSAA sample count.
    pub sample_count: u32,
}

/// Instanced pipeline drawing six vertices (two triangles) per point, with
/// `fs_main` as fragment entry and a `Depth32Float` attachment.
pub fn create_point_pipeline(
    device: &wgpu::Device,
    desc: PointPipelineDesc<'_>,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::RenderPipeline {
    let pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Pipeline Layout", desc.label)),
            bind_group_layouts,
            push_constant_ranges: &[],
        });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", desc.label)),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some(desc.vs_entry),
            buffers: &[desc.instance_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: desc.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: desc.sample_count,
            ..Default::default()
        },
        multiview: None,
        cache: None,
    })
}

/// Vertices per point sprite.
pub const SPRITE_VERTICES: u32 = 6;
