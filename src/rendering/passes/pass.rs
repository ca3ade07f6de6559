use std::sync::Arc;

use wgpu::RenderPass;

use crate::rendering::{
    config::RenderConfig,
    render_common::RenderCommon,
    shader_loader::{PipelineCache, PipelineCacheBuilder},
};

pub(crate) trait Pass {
    type TextureViews;

    fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        common: Arc<RenderCommon>,
        config: &RenderConfig,
        cache_builder: &mut PipelineCacheBuilder,
    ) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Opens a render pass with the pass pipeline bound and hands it to
    /// `render_callback` for the draws.
    fn render<'a, F>(
        &self,
        texture_views: &Self::TextureViews,
        encoder: &mut wgpu::CommandEncoder,
        pipeline_cache: &PipelineCache,
        render_callback: F,
    ) where
        F: FnOnce(&mut RenderPass) + 'a;
}
