use std::sync::Arc;

use wgpu::{
    DepthBiasState, Device, MultisampleState, PipelineCompilationOptions, RenderPass,
    RenderPassDescriptor, ShaderSource, StencilState,
};

use crate::rendering::{
    config::RenderConfig,
    dynamic_uniform::DynamicUniformBuffer,
    instance::Instance,
    material::material_bind_group_layout,
    passes::pass::Pass,
    render_common::RenderCommon,
    render_model::RENDER_MODEL_VBL,
    scene_uniform::SceneUniform,
    shader_loader::{PipelineCache, PipelineCacheBuilder, PipelineId, ShaderDefinition},
    texture::DepthTexture,
};

const MODEL_SHADER: ShaderDefinition = ShaderDefinition {
    name: "Model shader",
    path: "model.wgsl",
};

pub struct ScenePass {
    pub pipeline_id: PipelineId,
    uniforms: DynamicUniformBuffer<SceneUniform>,
    pub material_bind_group_layout: wgpu::BindGroupLayout,
}

pub struct SceneTextureViews {
    pub color: wgpu::TextureView,
    pub depth: wgpu::TextureView,
}

impl ScenePass {
    pub fn capacity(&self) -> u32 {
        self.uniforms.capacity()
    }

    pub fn write_uniform(
        &self,
        queue: &wgpu::Queue,
        slot: u32,
        uniform: &SceneUniform,
    ) -> Option<u32> {
        self.uniforms.write(queue, slot, uniform)
    }

    pub fn bind_scene(&self, render_pass: &mut RenderPass, uniform_offset: u32) {
        render_pass.set_bind_group(0, &self.uniforms.bind_group, &[uniform_offset]);
    }
}

impl Pass for ScenePass {
    type TextureViews = SceneTextureViews;

    fn create(
        device: &wgpu::Device,
        _queue: &wgpu::Queue,
        common: Arc<RenderCommon>,
        config: &RenderConfig,
        cache_builder: &mut PipelineCacheBuilder,
    ) -> anyhow::Result<Self>
    where
        Self: Sized,
    {
        let uniforms = DynamicUniformBuffer::<SceneUniform>::new(
            device,
            "Scene uniforms",
            config.max_scene_layers,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );

        let material_bind_group_layout = material_bind_group_layout(device);

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Scene pipeline layout"),
                bind_group_layouts: &[&uniforms.bind_group_layout, &material_bind_group_layout],
                push_constant_ranges: &[],
            });

        let surface_format = common.surface_format();

        let pipeline_id = cache_builder.add_shader(
            MODEL_SHADER,
            Box::new(
                move |device: &Device, shader_def: &ShaderDefinition, source: &str| {
                    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                        label: Some(shader_def.name),
                        source: ShaderSource::Wgsl(source.into()),
                    });

                    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                        label: Some("Model render pipeline"),
                        layout: Some(&render_pipeline_layout),
                        vertex: wgpu::VertexState {
                            module: &shader,
                            entry_point: Some("vs_main"),
                            buffers: &[RENDER_MODEL_VBL, Instance::descriptor()],
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
                        primitive: wgpu::PrimitiveState {
                            topology: wgpu::PrimitiveTopology::TriangleList,
                            strip_index_format: None,
                            front_face: wgpu::FrontFace::Ccw,
                            cull_mode: Some(wgpu::Face::Back),
                            polygon_mode: wgpu::PolygonMode::Fill,
                            unclipped_depth: false,
                            conservative: false,
                        },
                        depth_stencil: Some(wgpu::DepthStencilState {
                            format: DepthTexture::DEPTH_FORMAT,
                            depth_write_enabled: true,
                            depth_compare: wgpu::CompareFunction::Less,
                            stencil: StencilState::default(),
                            bias: DepthBiasState::default(),
                        }),
                        multisample: MultisampleState::default(),
                        multiview: None,
                        cache: None,
                    });

                    Ok(pipeline)
                },
            ),
        );

        Ok(ScenePass {
            pipeline_id,
            uniforms,
            material_bind_group_layout,
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

        let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &texture_views.color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            // Every scene layer gets its own depth range.
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &texture_views.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(pipeline);

        render_callback(&mut render_pass);
    }
}
