//! Vertex formats uploaded per pass.

use glam::Vec3;

/// Color pass vertex: world position and final (lit, highlighted) color.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Linear RGBA.
    pub color: [f32; 4],
}

impl ColorVertex {
    pub(crate) fn new(position: Vec3, color: glam::Vec4) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// ID pass vertex: world position plus raw prim and element ids.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct IdVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// `[prim id, element id]`, both 1-based.
    pub ids: [u32; 2],
}

impl IdVertex {
    pub(crate) fn new(position: Vec3, prim: u32, element: u32) -> Self {
        Self {
            position: position.to_array(),
            ids: [prim, element],
        }
    }

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Uint32x2];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// View-projection uniform.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PassUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
}
