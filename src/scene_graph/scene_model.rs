use id_arena::Id;

use crate::math::bounds::BoundingSphere;
use crate::model::Model;
use crate::rendering::render_model::RenderModelId;

pub type SceneModelId = Id<SceneModel>;

pub struct SceneModel {
    pub model: Model,
    /// Model-space bounds, used for picking.
    pub bounds: Option<BoundingSphere>,
    /// Set by the renderer once GPU buffers exist.
    pub render_model: Option<RenderModelId>,
}

impl SceneModel {
    pub fn new(model: Model) -> Self {
        let bounds = model.bounds();
        Self {
            model,
            bounds,
            render_model: None,
        }
    }
}
