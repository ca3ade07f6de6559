pub mod pass;
pub mod quad_pass;
pub mod scene_pass;
