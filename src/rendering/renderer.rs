use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use glam::Vec2;
use id_arena::Arena;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    math::rect::Rect,
    media::{cover_uv, MediaClip},
    rendering::{
        config::RenderConfig,
        global_uniform::GlobalUniformState,
        imgui_renderer::{create_imgui_renderer, ImguiRendererState},
        instance::Instance,
        layer::{composite_order, Layer, LayerContent},
        material::{RenderMaterial, RenderMaterialId},
        passes::{
            pass::Pass,
            quad_pass::{QuadPass, QuadTextureViews, QuadUniform},
            scene_pass::{ScenePass, SceneTextureViews},
        },
        render_common::RenderCommon,
        render_model::RenderModel,
        scene_uniform::SceneUniform,
        shader_loader::{PipelineCacheBuilder, ShaderLoader},
        texture::{ClipTexture, ClipTextureId, DepthTexture},
    },
    scene_graph::scene::Scene,
};

/// Pixel rectangle as `(x, y, width, height)`.
type ScissorRect = (u32, u32, u32, u32);

enum DrawCommand<'l> {
    Quad {
        uniform_offset: u32,
        texture: Option<ClipTextureId>,
    },
    Scene {
        uniform_offset: u32,
        scissor: ScissorRect,
        scene: &'l Scene,
    },
}

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,

    common: Arc<RenderCommon>,
    depth_texture: DepthTexture,

    shader_loader: ShaderLoader,

    quad_pass: QuadPass,
    scene_pass: ScenePass,
    imgui_renderer: ImguiRendererState,

    render_models: Arena<RenderModel>,
    materials: Arena<RenderMaterial>,
    default_material: RenderMaterialId,
    clip_textures: Arena<ClipTexture>,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        config: &RenderConfig,
        imgui: &mut imgui::Context,
    ) -> anyhow::Result<Renderer> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable graphics adapter")?;

        log::info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let common = Arc::new(RenderCommon::new(&device, &adapter, &surface, size)?);

        let depth_texture = {
            let surface_config = common
                .output_surface_config
                .read()
                .map_err(|_| anyhow::anyhow!("Surface config lock poisoned"))?;
            DepthTexture::new(&device, &surface_config, "Depth texture")
        };

        let mut cache_builder = PipelineCacheBuilder::new();

        let quad_pass =
            QuadPass::create(&device, &queue, common.clone(), config, &mut cache_builder)?;
        let scene_pass =
            ScenePass::create(&device, &queue, common.clone(), config, &mut cache_builder)?;

        let shader_loader = ShaderLoader::new(
            device.clone(),
            cache_builder,
            &config.shader_root,
            config.watch_shaders,
        )?;

        let imgui_renderer = create_imgui_renderer(&device, &queue, common.surface_format(), imgui);

        let mut materials = Arena::new();
        let default_material = materials.alloc(RenderMaterial::default_material(
            &device,
            &queue,
            &scene_pass.material_bind_group_layout,
        ));

        Ok(Self {
            window,
            size,
            surface,
            device,
            queue,
            common,
            depth_texture,
            shader_loader,
            quad_pass,
            scene_pass,
            imgui_renderer,
            render_models: Arena::new(),
            materials,
            default_material,
            clip_textures: Arena::new(),
        })
    }

    /// Uploads the models and materials of `scene` and links them back to it.
    pub fn load_scene(&mut self, scene: &mut Scene) {
        let mut material_map = HashMap::new();
        for (material_id, material) in scene.materials.iter() {
            let render_material = RenderMaterial::new(
                &self.device,
                &self.queue,
                &self.scene_pass.material_bind_group_layout,
                material,
            );
            material_map.insert(material_id, self.materials.alloc(render_material));
        }

        let default_material = self.default_material;
        for (_, scene_model) in scene.models.iter_mut() {
            let render_model = RenderModel::from_model(&self.device, &scene_model.model, |primitive| {
                primitive
                    .material
                    .and_then(|id| material_map.get(&id).copied())
                    .unwrap_or(default_material)
            });
            log::debug!(
                "Uploaded model {} with {} primitives",
                scene_model.model.name,
                render_model.primitives.len()
            );
            scene_model.render_model = Some(self.render_models.alloc(render_model));
        }
    }

    /// Creates the GPU texture of a clip. Empty clips are left without one.
    pub fn load_clip(&mut self, clip: &mut MediaClip) {
        if let Some(texture) = ClipTexture::new(
            &self.device,
            &self.queue,
            &self.quad_pass.texture_bind_group_layout,
            clip,
        ) {
            clip.render_texture = Some(self.clip_textures.alloc(texture));
        }
    }

    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.size.width as f32, self.size.height as f32)
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        let mut config = match self.common.output_surface_config.write() {
            Ok(config) => config,
            Err(poisoned) => poisoned.into_inner(),
        };

        self.size = new_size;
        config.width = new_size.width;
        config.height = new_size.height;
        self.depth_texture.resize(&self.device, &config);
        self.surface.configure(&self.device, &config);
    }

    pub fn render(
        &mut self,
        layers: &[Layer],
        time: f32,
        scroll: f32,
        imgui: &mut imgui::Context,
    ) -> Result<(), wgpu::SurfaceError> {
        self.shader_loader.load_pending_shaders();

        let screen = self.resolution();
        self.common
            .global_uniform
            .update(&self.queue, GlobalUniformState::new(screen, time, scroll));

        let commands = self.prepare_layers(layers, screen);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        clear(&mut encoder, &view);

        let pipeline_cache = &self.shader_loader.cache;

        for command in &commands {
            match *command {
                DrawCommand::Quad {
                    uniform_offset,
                    texture,
                } => {
                    let texture = texture
                        .and_then(|id| self.clip_textures.get(id))
                        .map(|texture| &texture.bind_group);

                    self.quad_pass.render(
                        &QuadTextureViews {
                            color: view.clone(),
                        },
                        &mut encoder,
                        pipeline_cache,
                        |render_pass| self.quad_pass.draw(render_pass, uniform_offset, texture),
                    );
                }
                DrawCommand::Scene {
                    uniform_offset,
                    scissor,
                    scene,
                } => {
                    self.scene_pass.render(
                        &SceneTextureViews {
                            color: view.clone(),
                            depth: self.depth_texture.view().clone(),
                        },
                        &mut encoder,
                        pipeline_cache,
                        |render_pass| {
                            let (x, y, width, height) = scissor;
                            render_pass.set_scissor_rect(x, y, width, height);
                            self.scene_pass.bind_scene(render_pass, uniform_offset);

                            for (_, scene_model) in scene.models.iter() {
                                let Some(render_model) = scene_model
                                    .render_model
                                    .and_then(|id| self.render_models.get(id))
                                else {
                                    continue;
                                };
                                render_model.draw(render_pass, &self.materials);
                            }
                        },
                    );
                }
            }
        }

        if let Err(e) =
            self.imgui_renderer
                .render(&view, imgui, &self.device, &self.queue, &mut encoder)
        {
            log::error!("{:?}", e);
        }

        self.queue.submit([encoder.finish()]);

        output.present();

        Ok(())
    }

    /// Writes uniforms, clip frames and instances for the visible layers and
    /// returns what to draw, back to front.
    fn prepare_layers<'l>(&mut self, layers: &'l [Layer], screen: Vec2) -> Vec<DrawCommand<'l>> {
        let mut commands = Vec::new();
        let mut quad_slot = 0;
        let mut scene_slot = 0;

        for layer in composite_order(layers, screen) {
            match layer.content {
                LayerContent::Media { clip, time } => {
                    let Some(texture_id) = clip.render_texture else {
                        continue;
                    };
                    if let Some(texture) = self.clip_textures.get_mut(texture_id) {
                        texture.update(&self.queue, clip, time);
                    }

                    let (uv_offset, uv_scale) = cover_uv(clip.aspect(), layer.rect.aspect());
                    let uniform = QuadUniform::textured(layer.rect, uv_offset, uv_scale)
                        .with_style(layer.opacity, layer.brightness, layer.corner_radius);

                    let Some(uniform_offset) =
                        self.quad_pass.write_uniform(&self.queue, quad_slot, &uniform)
                    else {
                        log::warn!("Too many quad layers, dropping {}", clip.name());
                        continue;
                    };
                    quad_slot += 1;

                    commands.push(DrawCommand::Quad {
                        uniform_offset,
                        texture: Some(texture_id),
                    });
                }
                LayerContent::Gradient { colors } => {
                    let uniform = QuadUniform::gradient(layer.rect, colors).with_style(
                        layer.opacity,
                        layer.brightness,
                        layer.corner_radius,
                    );

                    let Some(uniform_offset) =
                        self.quad_pass.write_uniform(&self.queue, quad_slot, &uniform)
                    else {
                        log::warn!("Too many quad layers, dropping a gradient");
                        continue;
                    };
                    quad_slot += 1;

                    commands.push(DrawCommand::Quad {
                        uniform_offset,
                        texture: None,
                    });
                }
                LayerContent::Scene { scene, camera } => {
                    let Some(scissor) = scissor_rect(&layer.rect, self.size) else {
                        continue;
                    };

                    let view_proj =
                        layer.rect.clip_transform(screen) * camera.get_vp_matrix(layer.rect.size);
                    let uniform = SceneUniform::new(scene, camera, view_proj, layer.opacity);

                    let Some(uniform_offset) =
                        self.scene_pass.write_uniform(&self.queue, scene_slot, &uniform)
                    else {
                        log::warn!("Too many scene layers, dropping one");
                        continue;
                    };
                    scene_slot += 1;

                    self.gather_instances(scene);

                    commands.push(DrawCommand::Scene {
                        uniform_offset,
                        scissor,
                        scene,
                    });
                }
            }
        }

        commands
    }

    fn gather_instances(&mut self, scene: &Scene) {
        for (_, scene_model) in scene.models.iter() {
            if let Some(render_model) = scene_model
                .render_model
                .and_then(|id| self.render_models.get_mut(id))
            {
                render_model.instances.clear();
            }
        }

        for (object, scene_model) in scene.renderables() {
            let Some(render_model) = scene_model
                .render_model
                .and_then(|id| self.render_models.get_mut(id))
            else {
                continue;
            };

            render_model.instances.add(Instance::new(
                &object.transform.get_world_matrix(),
                &object.transform.get_inverse_transpose_world_matrix(),
                object.highlight,
            ));
        }

        for (_, scene_model) in scene.models.iter() {
            if let Some(render_model) = scene_model
                .render_model
                .and_then(|id| self.render_models.get(id))
            {
                render_model
                    .instances
                    .write_to_buffer(&self.queue, &render_model.instance_buffer);
            }
        }
    }
}

fn clear(encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Clear pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        occlusion_query_set: None,
        timestamp_writes: None,
    });
}

/// Part of `rect` inside a target of `size`, snapped outward to whole
/// pixels. `None` when nothing is visible.
fn scissor_rect(rect: &Rect, size: PhysicalSize<u32>) -> Option<ScissorRect> {
    let screen = Rect::from_size(Vec2::new(size.width as f32, size.height as f32));
    let visible = rect.intersect(&screen)?;

    let x = visible.min.x.floor().max(0.0) as u32;
    let y = visible.min.y.floor().max(0.0) as u32;
    let max_x = (visible.max().x.ceil() as u32).min(size.width);
    let max_y = (visible.max().y.ceil() as u32).min(size.height);

    if max_x <= x || max_y <= y {
        return None;
    }

    Some((x, y, max_x - x, max_y - y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scissor_is_clamped_to_target() {
        let size = PhysicalSize::new(800, 600);
        assert_eq!(
            scissor_rect(&Rect::new(-10.5, 590.2, 100.0, 40.0), size),
            Some((0, 590, 90, 10))
        );
        assert_eq!(
            scissor_rect(&Rect::new(560.0, 360.0, 240.0, 240.0), size),
            Some((560, 360, 240, 240))
        );
        assert_eq!(scissor_rect(&Rect::new(0.0, 600.0, 10.0, 10.0), size), None);
    }
}
