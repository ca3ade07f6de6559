use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};
use wgpu::{Device, MultisampleState, PipelineCompilationOptions, RenderPass, ShaderSource};

use crate::{
    math::rect::Rect,
    rendering::{
        config::RenderConfig,
        dynamic_uniform::DynamicUniformBuffer,
        passes::pass::Pass,
        render_common::RenderCommon,
        shader_loader::{PipelineCache, PipelineCacheBuilder, PipelineId, ShaderDefinition},
        texture::{texture_bind_group_layout, Texture},
    },
};

const QUAD_SHADER: ShaderDefinition = ShaderDefinition {
    name: "Quad shader",
    path: "quad.wgsl",
};

const MODE_TEXTURE: f32 = 0.0;
const MODE_GRADIENT: f32 = 1.0;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct QuadUniform {
    pub rect: Vec4,
    pub uv_rect: Vec4,
    pub color_top: Vec4,
    pub color_middle: Vec4,
    pub color_bottom: Vec4,
    /// Opacity, brightness, corner radius, mode.
    pub params: Vec4,
}

impl QuadUniform {
    pub fn textured(rect: Rect, uv_offset: Vec2, uv_scale: Vec2) -> Self {
        Self {
            rect: rect_to_vec4(rect),
            uv_rect: Vec4::new(uv_offset.x, uv_offset.y, uv_scale.x, uv_scale.y),
            color_top: Vec4::ONE,
            color_middle: Vec4::ONE,
            color_bottom: Vec4::ONE,
            params: Vec4::new(1.0, 1.0, 0.0, MODE_TEXTURE),
        }
    }

    pub fn gradient(rect: Rect, colors: [Vec4; 3]) -> Self {
        Self {
            rect: rect_to_vec4(rect),
            uv_rect: Vec4::new(0.0, 0.0, 1.0, 1.0),
            color_top: colors[0],
            color_middle: colors[1],
            color_bottom: colors[2],
            params: Vec4::new(1.0, 1.0, 0.0, MODE_GRADIENT),
        }
    }

    pub fn with_style(mut self, opacity: f32, brightness: f32, corner_radius: f32) -> Self {
        self.params.x = opacity;
        self.params.y = brightness;
        self.params.z = corner_radius;
        self
    }
}

fn rect_to_vec4(rect: Rect) -> Vec4 {
    Vec4::new(rect.min.x, rect.min.y, rect.size.x, rect.size.y)
}

pub struct QuadPass {
    pub pipeline_id: PipelineId,
    common: Arc<RenderCommon>,
    uniforms: DynamicUniformBuffer<QuadUniform>,
    pub texture_bind_group_layout: wgpu::BindGroupLayout,
    _white_texture: Texture,
    white_bind_group: wgpu::BindGroup,
}

pub struct QuadTextureViews {
    pub color: wgpu::TextureView,
}

impl QuadPass {
    pub fn capacity(&self) -> u32 {
        self.uniforms.capacity()
    }

    pub fn write_uniform(
        &self,
        queue: &wgpu::Queue,
        slot: u32,
        uniform: &QuadUniform,
    ) -> Option<u32> {
        self.uniforms.write(queue, slot, uniform)
    }

    /// Draws one quad. `texture` defaults to plain white, which is what
    /// gradients sample.
    pub fn draw(
        &self,
        render_pass: &mut RenderPass,
        uniform_offset: u32,
        texture: Option<&wgpu::BindGroup>,
    ) {
        render_pass.set_bind_group(1, &self.uniforms.bind_group, &[uniform_offset]);
        render_pass.set_bind_group(2, texture.unwrap_or(&self.white_bind_group), &[]);
        render_pass.draw(0..6, 0..1);
    }
}

impl Pass for QuadPass {
    type TextureViews = QuadTextureViews;

    fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        common: Arc<RenderCommon>,
        config: &RenderConfig,
        cache_builder: &mut PipelineCacheBuilder,
    ) -> anyhow::Result<Self>
    where
        Self: Sized,
    {
        let uniforms = DynamicUniformBuffer::<QuadUniform>::new(
            device,
            "Quad uniforms",
            config.max_quad_layers,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );

        let texture_bind_group_layout = texture_bind_group_layout(device, "Quad texture layout");

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Quad pipeline layout"),
                bind_group_layouts: &[
                    &common.global_uniform.bind_group_layout,
                    &uniforms.bind_group_layout,
                    &texture_bind_group_layout,
                ],
                push_constant_ranges: &[],
            });

        let surface_format = common.surface_format();

        let pipeline_id = cache_builder.add_shader(
            QUAD_SHADER,
            Box::new(
                move |device: &Device, shader_def: &ShaderDefinition, source: &str| {
                    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                        label: Some(shader_def.name),
                        source: ShaderSource::Wgsl(source.into()),
                    });

                    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                        label: Some("Quad render pipeline"),
                        layout: Some(&render_pipeline_layout),
                        vertex: wgpu::VertexState {
                            module: &shader,
                            entry_point: Some("vs_main"),
                            buffers: &[],
                            compilation_options: PipelineCompilationOptions::default(),
                        },
                        fragment: Some(wgpu::FragmentState {
                            module: &shader,
                            entry_point: Some("fs_main"),
                            targets: &[Some(wgpu::ColorTargetState {
                                format: surface_format,
                                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                                write_mask: wgpu::ColorWrites::ALL,
                            })],
                            compilation_options: PipelineCompilationOptions::default(),
                        }),
                        primitive: wgpu::PrimitiveState::default(),
                        depth_stencil: None,
                        multisample: MultisampleState::default(),
                        multiview: None,
                        cache: None,
                    });

                    Ok(pipeline)
                },
            ),
        );

        let white_texture = Texture::white(device, queue);
        let white_bind_group =
            white_texture.bind_group(device, &texture_bind_group_layout, "White quad texture");

        Ok(QuadPass {
            pipeline_id,
            common,
            uniforms,
            texture_bind_group_layout,
            _white_texture: white_texture,
            white_bind_group,
        })
    }

    fn render<'a, F>(
        &self,
        texture_views: &Self::TextureViews,
        encoder: &mut wgpu::CommandEncoder,
        pipeline_cache: &PipelineCache,
        render_callback: F,
    ) where
        F: FnOnce(&mut RenderPass) + 'a,
    {
        let Some(pipeline) = pipeline_cache.get(self.pipeline_id) else {
            return;
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &texture_views.color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.common.global_uniform.bind_group, &[]);

        render_callback(&mut render_pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_matches_shader_layout() {
        assert_eq!(size_of::<QuadUniform>(), 96);
    }

    #[test]
    fn style_goes_to_params() {
        let uniform = QuadUniform::gradient(Rect::new(1.0, 2.0, 3.0, 4.0), [Vec4::ONE; 3])
            .with_style(0.8, 0.6, 8.0);
        assert_eq!(uniform.rect, Vec4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(uniform.params, Vec4::new(0.8, 0.6, 8.0, MODE_GRADIENT));

        let textured = QuadUniform::textured(Rect::from_size(Vec2::ONE), Vec2::ZERO, Vec2::ONE);
        assert_eq!(textured.params.w, MODE_TEXTURE);
    }
}
