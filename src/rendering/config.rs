use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Folder containing the WGSL sources, with shared modules in `shared/`.
    pub shader_root: PathBuf,
    /// Recompile pipelines when shader files change.
    pub watch_shaders: bool,
    /// Upper bound of media and gradient layers drawn per frame.
    pub max_quad_layers: u32,
    /// Upper bound of 3D scene layers drawn per frame.
    pub max_scene_layers: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            shader_root: PathBuf::from("assets/shaders"),
            watch_shaders: false,
            max_quad_layers: 64,
            max_scene_layers: 16,
        }
    }
}
