use std::marker::PhantomData;

use bytemuck::Pod;

/// Uniform buffer holding `capacity` values of `T`, each bound through a
/// dynamic offset so every draw in a frame can see its own value.
pub struct DynamicUniformBuffer<T: Pod> {
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
    stride: u64,
    capacity: u32,
    _marker: PhantomData<T>,
}

impl<T: Pod> DynamicUniformBuffer<T> {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        capacity: u32,
        visibility: wgpu::ShaderStages,
    ) -> Self {
        let size = size_of::<T>() as u64;
        let stride = aligned_stride(
            size,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let capacity = capacity.max(1);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} bind group layout")),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(size),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} bind group")),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(size),
                }),
            }],
        });

        Self {
            buffer,
            bind_group,
            bind_group_layout,
            stride,
            capacity,
            _marker: PhantomData,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Writes `value` into `slot` and returns its dynamic offset, or `None`
    /// when the buffer is full.
    pub fn write(&self, queue: &wgpu::Queue, slot: u32, value: &T) -> Option<u32> {
        if slot >= self.capacity {
            return None;
        }

        let offset = self.stride * slot as u64;
        queue.write_buffer(&self.buffer, offset, bytemuck::bytes_of(value));
        Some(offset as u32)
    }
}

pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(aligned_stride(96, 256), 256);
        assert_eq!(aligned_stride(640, 256), 768);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(20, 0), 20);
    }
}
