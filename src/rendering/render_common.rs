use std::sync::RwLock;

use glam::Vec2;
use wgpu::SurfaceConfiguration;
use winit::dpi::PhysicalSize;

use crate::rendering::global_uniform::{GlobalUniform, GlobalUniformState};

pub struct RenderCommon {
    pub output_surface_config: RwLock<SurfaceConfiguration>,
    pub global_uniform: GlobalUniform,
}

impl RenderCommon {
    pub fn new(
        device: &wgpu::Device,
        adapter: &wgpu::Adapter,
        surface: &wgpu::Surface,
        size: PhysicalSize<u32>,
    ) -> anyhow::Result<Self> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Surface is not supported by the adapter"))?;

        let output_surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(device, &output_surface_config);

        let resolution = Vec2::new(size.width as f32, size.height as f32);
        let global_uniform = GlobalUniform::new(device, GlobalUniformState::new(resolution, 0.0, 0.0));

        Ok(Self {
            output_surface_config: RwLock::new(output_surface_config),
            global_uniform,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        match self.output_surface_config.read() {
            Ok(config) => config.format,
            Err(poisoned) => poisoned.into_inner().format,
        }
    }
}
