//! Headless wgpu backend.
//!
//! Lighting and highlight blending happen on the CPU while vertices are
//! expanded, so the shaders only transform and write. Each pass renders into
//! fresh targets sized to the pass and reads them back synchronously.

mod context;
mod pipeline;
mod readback;
mod target;
mod vertex;

use glam::Mat4;
use wgpu::util::DeviceExt;

pub use context::{GpuContext, GpuContextError};
use pipeline::PassPipelines;
use target::{depth_attachment, RenderTarget, COLOR_FORMAT, DEPTH_FORMAT, ID_FORMATS};
pub use vertex::{ColorVertex, IdVertex, PassUniform};

use super::{ColorImage, ColorPass, IdBuffer, IdPass, RenderBackend};
use crate::error::PickError;
use crate::picking::PickMap;

/// Vertex lists for one pass, one per topology.
struct Batches<V> {
    triangles: Vec<V>,
    lines: Vec<V>,
    points: Vec<V>,
}

impl<V> Default for Batches<V> {
    fn default() -> Self {
        Self {
            triangles: Vec::new(),
            lines: Vec::new(),
            points: Vec::new(),
        }
    }
}

/// wgpu implementation of [`RenderBackend`].
pub struct GpuBackend {
    context: GpuContext,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    color_pipelines: PassPipelines,
    id_pipelines: PassPipelines,
}

impl GpuBackend {
    /// Create a headless device and all pipelines.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::Gpu`] if no adapter or device is available.
    pub fn new() -> Result<Self, PickError> {
        let context = GpuContext::new_blocking()?;
        let device = &context.device;
        let uniform_layout = pipeline::uniform_bind_group_layout(device);
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pass Uniform Buffer"),
            size: std::mem::size_of::<PassUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Pass Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let color_pipelines = pipeline::create_color_pipelines(device, &uniform_layout);
        let id_pipelines = pipeline::create_id_pipelines(device, &uniform_layout);
        Ok(Self {
            context,
            uniform_buffer,
            uniform_bind_group,
            color_pipelines,
            id_pipelines,
        })
    }

    fn upload_view_proj(&self, view_proj: Mat4) {
        let uniform = PassUniform {
            view_proj: view_proj.to_cols_array_2d(),
        };
        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    fn vertex_buffer<V: bytemuck::Pod>(&self, label: &str, vertices: &[V]) -> Option<wgpu::Buffer> {
        if vertices.is_empty() {
            return None;
        }
        Some(
            self.context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytemuck::cast_slice(vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
        )
    }

    fn record_draws<V: bytemuck::Pod>(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        pipelines: &PassPipelines,
        batches: &Batches<V>,
    ) {
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        let draws = [
            (&pipelines.triangles, &batches.triangles),
            (&pipelines.lines, &batches.lines),
            (&pipelines.points, &batches.points),
        ];
        for (pipeline, vertices) in draws {
            if let Some(buffer) = self.vertex_buffer("Pass Vertex Buffer", vertices) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..vertices.len() as u32, 0..1);
            }
        }
    }
}

fn color_batches(pass: &ColorPass<'_>) -> Batches<ColorVertex> {
    let mut batches = Batches::default();
    for item in &pass.items {
        let geom = item.geometry;
        if geom.style.draws_surface() {
            for tri in &geom.triangles {
                for i in tri.indices {
                    let normal = if geom.smooth {
                        geom.normals[i as usize]
                    } else {
                        tri.normal
                    };
                    let shade = pass.lighting.shade(&pass.view, normal);
                    batches.triangles.push(ColorVertex::new(
                        geom.positions[i as usize],
                        item.shaded(item.color, shade),
                    ));
                }
            }
        }
        if geom.style.draws_edges() {
            let base = if geom.style.draws_surface() {
                pass.wire_color
            } else {
                item.color
            };
            let color = item.shaded(base, 1.0);
            for line in &geom.lines {
                for i in line.indices {
                    batches
                        .lines
                        .push(ColorVertex::new(geom.positions[i as usize], color));
                }
            }
        }
        let color = item.shaded(item.color, 1.0);
        for &p in &geom.points {
            batches
                .points
                .push(ColorVertex::new(geom.positions[p as usize], color));
        }
    }
    batches
}

fn id_batches(pass: &IdPass<'_>) -> Batches<IdVertex> {
    let mut batches = Batches::default();
    for (index, geom) in pass.items.iter().enumerate() {
        let prim = index as u32 + 1;
        for tri in &geom.triangles {
            let element = PickMap::encode_element(tri.element);
            for i in tri.indices {
                batches
                    .triangles
                    .push(IdVertex::new(geom.positions[i as usize], prim, element));
            }
        }
        for line in &geom.lines {
            let element = PickMap::encode_element(line.element);
            for i in line.indices {
                batches
                    .lines
                    .push(IdVertex::new(geom.positions[i as usize], prim, element));
            }
        }
        for &p in &geom.points {
            batches
                .points
                .push(IdVertex::new(geom.positions[p as usize], prim, 0));
        }
    }
    batches
}

fn u32s(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

fn f32s(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

impl RenderBackend for GpuBackend {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn draw_color(&mut self, pass: &ColorPass<'_>) -> Result<ColorImage, PickError> {
        let device = &self.context.device;
        let color = RenderTarget::new(device, "Color Target", pass.width, pass.height, COLOR_FORMAT);
        let depth = RenderTarget::new(device, "Color Depth", pass.width, pass.height, DEPTH_FORMAT);
        self.upload_view_proj(pass.projection * pass.view);
        let batches = color_batches(pass);
        let clear = pass.clear_color.as_dvec4();

        let mut encoder = self.context.create_encoder("Color Pass Encoder");
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Color Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &color.view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.x,
                            g: clear.y,
                            b: clear.z,
                            a: clear.w,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(depth_attachment(&depth.view)),
                ..Default::default()
            });
            self.record_draws(&mut render_pass, &self.color_pipelines, &batches);
        }
        self.context.submit(encoder);

        let bytes = readback::read_texture(&self.context, &color.texture, pass.width, pass.height)?;
        ColorImage::from_rgba8(pass.width, pass.height, &bytes)
    }

    fn draw_ids(&mut self, pass: &IdPass<'_>) -> Result<IdBuffer, PickError> {
        let device = &self.context.device;
        let labels = ["Prim Id Target", "Element Id Target", "Pick Depth Target"];
        let targets: Vec<RenderTarget> = ID_FORMATS
            .iter()
            .zip(labels)
            .map(|(format, label)| RenderTarget::new(device, label, pass.width, pass.height, *format))
            .collect();
        let depth = RenderTarget::new(device, "Pick Depth", pass.width, pass.height, DEPTH_FORMAT);
        self.upload_view_proj(pass.projection * pass.view);
        let batches = id_batches(pass);

        let clears = [0.0, 0.0, 1.0];
        let attachments: Vec<Option<wgpu::RenderPassColorAttachment<'_>>> = targets
            .iter()
            .zip(clears)
            .map(|(target, clear)| {
                Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear,
                            g: 0.0,
                            b: 0.0,
                            a: 0.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })
            })
            .collect();

        let mut encoder = self.context.create_encoder("Id Pass Encoder");
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Id Pass"),
                color_attachments: &attachments,
                depth_stencil_attachment: Some(depth_attachment(&depth.view)),
                ..Default::default()
            });
            self.record_draws(&mut render_pass, &self.id_pipelines, &batches);
        }
        self.context.submit(encoder);

        let read = |target: &RenderTarget| {
            readback::read_texture(&self.context, &target.texture, pass.width, pass.height)
        };
        let prims = u32s(&read(&targets[0])?);
        let elements = u32s(&read(&targets[1])?);
        let depths = f32s(&read(&targets[2])?);
        Ok(IdBuffer::from_channels(pass.width, pass.height, &prims, &elements, &depths))
    }
}
