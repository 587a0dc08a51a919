use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use wgpu::BufferUsages;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Instance {
    pub model: Mat4,
    pub color: Vec4,
}

impl Instance {
    pub fn new(model: Mat4, color: Vec3) -> Self {
        Self {
            model,
            color: color.extend(1.0),
        }
    }

    pub fn descriptor() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
            5 => Float32x4,
            6 => Float32x4,
            7 => Float32x4,
            8 => Float32x4,
            9 => Float32x4
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

pub struct Instances {
    instances: Vec<Instance>,
}

impl Default for Instances {
    fn default() -> Self {
        Self::new()
    }
}

impl Instances {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
        }
    }

    pub fn add(&mut self, instance: Instance) {
        self.instances.push(instance);
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn write_to_buffer(&self, queue: &wgpu::Queue, instance_buffer: &InstanceBuffer) {
        if self.instances.is_empty() {
            return;
        }

        queue.write_buffer(
            instance_buffer.buffer(),
            0,
            bytemuck::cast_slice(&self.instances),
        );
    }

    pub fn should_render(&self) -> bool {
        !self.instances.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Per-mesh instance vertex buffer that grows as more objects share the mesh.
pub struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    name: String,
}

impl InstanceBuffer {
    const INITIAL_CAPACITY: usize = 16;

    pub fn new(device: &wgpu::Device, name: impl Into<String>) -> Self {
        let name: String = name.into();
        let buffer = Self::create_buffer(device, &name, Self::INITIAL_CAPACITY);

        Self {
            buffer,
            capacity: Self::INITIAL_CAPACITY,
            name,
        }
    }

    fn create_buffer(device: &wgpu::Device, name: &str, capacity: usize) -> wgpu::Buffer {
        let label = format!("Instance buffer ({})", name);

        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&label),
            size: (std::mem::size_of::<Instance>() * capacity) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn ensure_capacity(&mut self, device: &wgpu::Device, count: usize) {
        if count <= self.capacity {
            return;
        }

        let capacity = count.next_power_of_two();
        log::debug!(
            "Growing instance buffer for {} from {} to {}",
            self.name,
            self.capacity,
            capacity
        );
        self.buffer = Self::create_buffer(device, &self.name, capacity);
        self.capacity = capacity;
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>, count: usize) {
        let size = (std::mem::size_of::<Instance>() * count) as u64;
        render_pass.set_vertex_buffer(1, self.buffer.slice(..size));
    }
}
