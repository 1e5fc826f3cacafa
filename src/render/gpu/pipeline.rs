//! Render pipelines for the color and ID passes.

use super::target::{COLOR_FORMAT, DEPTH_FORMAT, ID_FORMATS};
use super::vertex::{ColorVertex, IdVertex};

/// One pipeline per primitive topology a repr can emit.
pub(crate) struct PassPipelines {
    pub triangles: wgpu::RenderPipeline,
    pub lines: wgpu::RenderPipeline,
    pub points: wgpu::RenderPipeline,
}

/// Single uniform buffer (view-projection) visible to the vertex stage.
pub(crate) fn uniform_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Pass Uniform Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Surfaces are pushed back so edges drawn over them pass the depth test.
fn depth_stencil(topology: wgpu::PrimitiveTopology) -> wgpu::DepthStencilState {
    let bias = if topology == wgpu::PrimitiveTopology::TriangleList {
        wgpu::DepthBiasState {
            constant: 2,
            slope_scale: 1.0,
            clamp: 0.0,
        }
    } else {
        wgpu::DepthBiasState::default()
    };
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    vertex_layout: wgpu::VertexBufferLayout<'_>,
    targets: &[Option<wgpu::ColorTargetState>],
    topology: wgpu::PrimitiveTopology,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets,
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(depth_stencil(topology)),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_set(
    device: &wgpu::Device,
    name: &str,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    vertex_layout: &wgpu::VertexBufferLayout<'_>,
    targets: &[Option<wgpu::ColorTargetState>],
) -> PassPipelines {
    let make = |suffix: &str, topology| {
        create_pipeline(
            device,
            &format!("{name} {suffix} Pipeline"),
            shader,
            layout,
            vertex_layout.clone(),
            targets,
            topology,
        )
    };
    PassPipelines {
        triangles: make("Triangle", wgpu::PrimitiveTopology::TriangleList),
        lines: make("Line", wgpu::PrimitiveTopology::LineList),
        points: make("Point", wgpu::PrimitiveTopology::PointList),
    }
}

fn pipeline_layout(
    device: &wgpu::Device,
    label: &str,
    uniform_layout: &wgpu::BindGroupLayout,
) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[uniform_layout],
        push_constant_ranges: &[],
    })
}

/// Pipelines writing lit colors into an `Rgba8Unorm` target.
pub(crate) fn create_color_pipelines(
    device: &wgpu::Device,
    uniform_layout: &wgpu::BindGroupLayout,
) -> PassPipelines {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Color Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/color.wgsl").into()),
    });
    let layout = pipeline_layout(device, "Color Pipeline Layout", uniform_layout);
    let targets = [Some(wgpu::ColorTargetState {
        format: COLOR_FORMAT,
        blend: None,
        write_mask: wgpu::ColorWrites::ALL,
    })];
    create_set(device, "Color", &shader, &layout, &ColorVertex::layout(), &targets)
}

/// Pipelines writing prim id, element id and depth into three targets.
pub(crate) fn create_id_pipelines(
    device: &wgpu::Device,
    uniform_layout: &wgpu::BindGroupLayout,
) -> PassPipelines {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Id Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/id.wgsl").into()),
    });
    let layout = pipeline_layout(device, "Id Pipeline Layout", uniform_layout);
    let targets = ID_FORMATS.map(|format| {
        Some(wgpu::ColorTargetState {
            format,
            blend: None,
            write_mask: wgpu::ColorWrites::ALL,
        })
    });
    create_set(device, "Id", &shader, &layout, &IdVertex::layout(), &targets)
}
