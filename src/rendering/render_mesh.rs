use std::mem::offset_of;

use wgpu::util::DeviceExt;

use crate::model::{Mesh, Vertex};
use crate::rendering::instance::{InstanceBuffer, Instances};

/// GPU copy of a scene mesh plus the instances gathered for this frame.
pub struct RenderMesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
    pub instance_buffer: InstanceBuffer,
    pub instances: Instances,
}

impl RenderMesh {
    pub fn from_mesh(device: &wgpu::Device, mesh: &Mesh) -> Self {
        let vertex_buffer_name = format!("Vertex buffer ({})", mesh.name);
        let index_buffer_name = format!("Index buffer ({})", mesh.name);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&vertex_buffer_name),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&index_buffer_name),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            name: mesh.name.clone(),
            vertex_buffer,
            index_buffer,
            num_indices: mesh.indices.len() as u32,
            instance_buffer: InstanceBuffer::new(device, mesh.name.clone()),
            instances: Instances::new(),
        }
    }

    pub fn should_render(&self) -> bool {
        self.num_indices > 0 && self.instances.should_render()
    }

    pub fn upload_instances(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        self.instance_buffer
            .ensure_capacity(device, self.instances.len());
        self.instances
            .write_to_buffer(queue, &self.instance_buffer);
    }
}

pub fn render_mesh_instances(render_pass: &mut wgpu::RenderPass<'_>, render_mesh: &RenderMesh) {
    let instance_count = render_mesh.instances.len();

    render_pass.set_vertex_buffer(0, render_mesh.vertex_buffer.slice(..));
    render_mesh
        .instance_buffer
        .bind(render_pass, instance_count);
    render_pass.set_index_buffer(
        render_mesh.index_buffer.slice(..),
        wgpu::IndexFormat::Uint32,
    );
    render_pass.draw_indexed(0..render_mesh.num_indices, 0, 0..instance_count as u32);
}

pub const RENDER_MESH_VBL: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, position) as wgpu::BufferAddress,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, normal) as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
    ],
};
