pub mod config;
pub mod dynamic_uniform;
pub mod global_uniform;
pub mod imgui_renderer;
pub mod instance;
pub mod layer;
pub mod material;
pub mod passes;
pub mod render_common;
pub mod render_model;
pub mod renderer;
pub mod scene_uniform;
pub mod shader_loader;
pub mod texture;
