use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::BufferUsages;

/// Per-object data for instanced model drawing.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Instance {
    pub model: Mat4,
    /// Columns of the normal matrix.
    pub normal: [Vec4; 3],
    /// x: hover highlight.
    pub params: Vec4,
}

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
    5 => Float32x4,
    6 => Float32x4,
    7 => Float32x4,
    8 => Float32x4,
    9 => Float32x4,
    10 => Float32x4,
    11 => Float32x4,
    12 => Float32x4,
];

impl Instance {
    pub fn new(world: &Mat4, inverse_transpose_world: &Mat4, highlight: f32) -> Self {
        Self {
            model: *world,
            normal: [
                inverse_transpose_world.x_axis,
                inverse_transpose_world.y_axis,
                inverse_transpose_world.z_axis,
            ],
            params: Vec4::new(highlight, 0.0, 0.0, 0.0),
        }
    }

    pub fn descriptor() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &INSTANCE_ATTRIBUTES,
        }
    }
}

pub struct Instances {
    instances: Vec<Instance>,
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
        let count = self.len();
        queue.write_buffer(
            instance_buffer.buffer(),
            0,
            bytemuck::cast_slice(&self.instances[..count]),
        );
    }

    pub fn should_render(&self) -> bool {
        !self.instances.is_empty()
    }

    /// Number of instances that fit in the buffer.
    pub fn len(&self) -> usize {
        self.instances.len().min(InstanceBuffer::MAX_INSTANCES as usize)
    }
}

pub struct InstanceBuffer(wgpu::Buffer);

impl InstanceBuffer {
    const MAX_INSTANCES: u64 = 128;

    pub fn new(device: &wgpu::Device, name: impl Into<String>) -> Self {
        let name: String = name.into();

        let descriptor = Self::descriptor(&name);
        let buffer = device.create_buffer(&descriptor);

        Self(buffer)
    }

    fn descriptor(name: &str) -> wgpu::BufferDescriptor<'static> {
        // Labels must outlive the descriptor; these are created once per model.
        let label = format!("Instance buffer ({})", name);
        let label = Box::leak(label.into_boxed_str());

        wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<Instance>() as u64 * Self::MAX_INSTANCES,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.0
    }

    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(1, self.buffer().slice(..));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn instance_layout_matches_attributes() {
        assert_eq!(size_of::<Instance>(), 128);
        assert_eq!(INSTANCE_ATTRIBUTES[7].offset, 112);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let world = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 1.0, 1.0),
            Quat::IDENTITY,
            Vec3::ZERO,
        );
        let instance = Instance::new(&world, &world.inverse().transpose(), 1.0);
        assert_eq!(instance.normal[0].x, 0.5);
        assert_eq!(instance.params.x, 1.0);
    }
}
