use std::mem::offset_of;

use id_arena::{Arena, Id};
use wgpu::util::DeviceExt;

use crate::model::{Model, ModelPrimitive, Vertex};
use crate::rendering::instance::{InstanceBuffer, Instances};
use crate::rendering::material::{RenderMaterial, RenderMaterialId};

pub type RenderModelId = Id<RenderModel>;

pub struct RenderPrimitive {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
    pub material: RenderMaterialId,
}

impl RenderPrimitive {
    fn from_primitive(
        device: &wgpu::Device,
        model: &Model,
        primitive: &ModelPrimitive,
        material: RenderMaterialId,
    ) -> Self {
        let vertex_buffer_name = format!(
            "Vertex buffer ({}, primitive {})",
            model.name, primitive.index
        );
        let index_buffer_name = format!(
            "Index buffer ({}, primitive {})",
            model.name, primitive.index
        );

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&vertex_buffer_name),
            contents: bytemuck::cast_slice(&primitive.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&index_buffer_name),
            contents: bytemuck::cast_slice(&primitive.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: primitive.indices.len() as u32,
            material,
        }
    }
}

pub struct RenderModel {
    pub primitives: Vec<RenderPrimitive>,
    pub instance_buffer: InstanceBuffer,
    pub instances: Instances,
}

impl RenderModel {
    /// `material_for` resolves each primitive's material to its GPU material.
    pub fn from_model(
        device: &wgpu::Device,
        model: &Model,
        material_for: impl Fn(&ModelPrimitive) -> RenderMaterialId,
    ) -> Self {
        let primitives = model
            .primitives
            .iter()
            .map(|primitive| {
                RenderPrimitive::from_primitive(device, model, primitive, material_for(primitive))
            })
            .collect();
        let instance_buffer = InstanceBuffer::new(device, model.name.clone());

        RenderModel {
            primitives,
            instance_buffer,
            instances: Instances::new(),
        }
    }
}

pub const RENDER_MODEL_VBL: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
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
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, tex_coords) as wgpu::BufferAddress,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x2,
        },
    ],
};

impl RenderModel {
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass, materials: &Arena<RenderMaterial>) {
        if !self.instances.should_render() {
            return;
        }

        let instance_count = self.instances.len() as u32;
        self.instance_buffer.bind(render_pass);

        for primitive in &self.primitives {
            let Some(material) = materials.get(primitive.material) else {
                continue;
            };

            render_pass.set_bind_group(1, &material.bind_group, &[]);
            render_pass.set_vertex_buffer(0, primitive.vertex_buffer.slice(..));
            render_pass.set_index_buffer(primitive.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..primitive.num_indices, 0, 0..instance_count);
        }
    }
}
