use glam::{Vec2, Vec4};

use crate::math::rect::Rect;
use crate::rendering::layer::Layer;
use crate::scroll::{Placement, SectionSlot};
use crate::sections::{vh, FrameContext, Section};

const PANEL_Z: i32 = 20;

/// A transparent screen of backdrop followed by a black screen that slides
/// over the fixed layers.
#[derive(Debug, Default)]
pub struct Outro {
    slot: Option<SectionSlot>,
}

impl Section for Outro {
    fn name(&self) -> &'static str {
        "outro"
    }

    fn height(&self, viewport: Vec2) -> f32 {
        vh(viewport, 2.0)
    }

    fn mount(&mut self, slot: &SectionSlot, _viewport: Vec2) -> anyhow::Result<()> {
        self.slot = Some(slot.clone());
        Ok(())
    }

    fn update(&mut self, _ctx: &FrameContext) {}

    fn layers<'a>(&'a self, ctx: &FrameContext, out: &mut Vec<Layer<'a>>) {
        let Some(slot) = &self.slot else {
            return;
        };

        let local = Rect::new(0.0, ctx.viewport.y, ctx.viewport.x, ctx.viewport.y);
        let rect = Placement::Flow.place(local, slot, ctx.scroll);
        out.push(Layer::solid(PANEL_Z, rect, Vec4::new(0.0, 0.0, 0.0, 1.0)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_panel_covers_the_last_screen() {
        let viewport = Vec2::new(1280.0, 800.0);
        let mut outro = Outro::default();
        outro
            .mount(
                &SectionSlot {
                    index: 4,
                    top: 4000.0,
                    height: outro.height(viewport),
                },
                viewport,
            )
            .unwrap();

        let mut layers = Vec::new();
        let ctx = FrameContext {
            scroll: 4800.0,
            viewport,
            ..Default::default()
        };
        outro.layers(&ctx, &mut layers);

        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].rect, Rect::from_size(viewport));
        assert_eq!(layers[0].z, PANEL_Z);
    }
}
