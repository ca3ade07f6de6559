use bytemuck::{Pod, Zeroable};
use glam::{UVec2, Vec4};
use id_arena::Id;
use wgpu::util::DeviceExt;

use crate::asset_pipeline::materials::MaterialData;
use crate::rendering::texture::Texture;

pub type RenderMaterialId = Id<RenderMaterial>;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct MaterialUniform {
    base_color_factor: Vec4,
}

pub struct RenderMaterial {
    _texture: Texture,
    _uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl RenderMaterial {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        material: &MaterialData,
    ) -> Self {
        let texture = match &material.base_color {
            Some(image) if image.width > 0 && image.height > 0 => Texture::from_rgba8(
                device,
                queue,
                &format!("{} (base color)", material.name),
                UVec2::new(image.width, image.height),
                &image.pixels,
            ),
            _ => Texture::white(device, queue),
        };

        Self::from_parts(device, layout, &material.name, material.base_color_factor, texture)
    }

    /// Plain white material for primitives without one.
    pub fn default_material(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let texture = Texture::white(device, queue);
        Self::from_parts(device, layout, "Default material", Vec4::ONE, texture)
    }

    fn from_parts(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        name: &str,
        base_color_factor: Vec4,
        texture: Texture,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Material uniform ({name})")),
            contents: bytemuck::cast_slice(&[MaterialUniform { base_color_factor }]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Material bind group ({name})")),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        Self {
            _texture: texture,
            _uniform_buffer: uniform_buffer,
            bind_group,
        }
    }
}

pub fn material_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Material bind group layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}
