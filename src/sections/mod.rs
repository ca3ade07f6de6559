//! The page, top to bottom. Each section owns its scroll triggers, scenes and
//! media, turns the frame's scroll offset into animation state in `update`,
//! and describes what to draw in `layers` and `draw_ui`.

pub mod decoration;
pub mod hero;
pub mod karmine;
pub mod original;
pub mod outro;
pub mod rig;
pub mod sky;
pub mod text_panel;
pub mod video_box;

use glam::Vec2;

use crate::media::{Assets, MediaClip};
use crate::rendering::layer::Layer;
use crate::scene_graph::scene::Scene;
use crate::scroll::{ElementBounds, ScrollTrigger, SectionSlot};

/// Everything a section sees of the current frame.
#[derive(Debug, Clone, Default)]
pub struct FrameContext {
    /// Seconds since start.
    pub time: f32,
    pub dt: f32,
    /// Page scroll offset in pixels.
    pub scroll: f32,
    pub viewport: Vec2,
    pub pointer: Option<Vec2>,
    /// Left button went down this frame.
    pub clicked: bool,
    /// The pointer is over an overlay window, so the 3D views ignore it.
    pub pointer_over_ui: bool,
}

/// Page-level actions a section can ask for from its UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    ScrollToSection(usize),
}

pub trait Section {
    fn name(&self) -> &'static str;

    /// Height in document pixels for the given viewport.
    fn height(&self, viewport: Vec2) -> f32;

    /// Called with the section's place on the page whenever the layout
    /// changes. Resolves scroll triggers.
    fn mount(&mut self, slot: &SectionSlot, viewport: Vec2) -> anyhow::Result<()>;

    fn update(&mut self, ctx: &FrameContext);

    fn layers<'a>(&'a self, ctx: &FrameContext, out: &mut Vec<Layer<'a>>);

    fn draw_ui(&mut self, _ui: &imgui::Ui, _ctx: &FrameContext) -> Option<PageRequest> {
        None
    }

    /// Scenes that need GPU resources.
    fn scenes_mut(&mut self) -> Vec<&mut Scene> {
        Vec::new()
    }

    /// Clips that need GPU resources.
    fn clips_mut(&mut self) -> Vec<&mut MediaClip> {
        Vec::new()
    }

    /// Named triggers, for the debug markers.
    fn triggers(&self) -> Vec<(&'static str, &ScrollTrigger)> {
        Vec::new()
    }
}

/// Viewport heights in pixels.
pub fn vh(viewport: Vec2, amount: f32) -> f32 {
    viewport.y * amount
}

pub fn slot_bounds(slot: &SectionSlot) -> ElementBounds {
    ElementBounds {
        top: slot.top,
        height: slot.height,
    }
}

/// The page's sections in order, with the fixed decoration last.
pub fn build_sections(assets: &Assets) -> anyhow::Result<Vec<Box<dyn Section>>> {
    Ok(vec![
        Box::new(hero::Hero::new(assets)),
        Box::new(original::Original::new(assets)?),
        Box::new(sky::Sky::new(assets)?),
        Box::new(karmine::Karmine::new(assets)?),
        Box::new(outro::Outro::default()),
        Box::new(decoration::Decoration::new(assets)),
    ])
}
