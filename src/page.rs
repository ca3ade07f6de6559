use anyhow::Context;
use glam::Vec2;

use crate::media::MediaClip;
use crate::rendering::layer::Layer;
use crate::scene_graph::scene::Scene;
use crate::scroll::{PageLayout, ScrollTrigger, SmoothScroll, SmoothScrollOptions};
use crate::sections::{FrameContext, PageRequest, Section};

const ARROW_STEP: f32 = 40.0;
/// Share of the viewport a page step scrolls, leaving some overlap.
const PAGE_STEP: f32 = 0.875;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollKey {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

/// The scrolling document: sections stacked top to bottom, one smooth
/// scroller driving all of them.
pub struct Page {
    sections: Vec<Box<dyn Section>>,
    layout: PageLayout,
    scroll: SmoothScroll,
}

impl Page {
    pub fn new(sections: Vec<Box<dyn Section>>, options: SmoothScrollOptions) -> Self {
        Self {
            sections,
            layout: PageLayout::default(),
            scroll: SmoothScroll::new(options),
        }
    }

    /// Lays the sections out for `viewport` and resolves their triggers.
    pub fn mount(&mut self, viewport: Vec2) -> anyhow::Result<()> {
        self.layout = PageLayout::stack(
            self.sections.iter().map(|section| section.height(viewport)),
            viewport,
        );

        for (section, slot) in self.sections.iter_mut().zip(self.layout.slots()) {
            let name = section.name();
            section
                .mount(slot, viewport)
                .with_context(|| format!("Failed to mount section {}", name))?;
        }

        self.scroll.set_limit(self.layout.max_scroll());
        log::debug!(
            "Page laid out for {}x{}: {} px tall",
            viewport.x,
            viewport.y,
            self.layout.total_height()
        );
        Ok(())
    }

    pub fn resize(&mut self, viewport: Vec2) -> anyhow::Result<()> {
        if viewport == self.layout.viewport() {
            return Ok(());
        }
        self.mount(viewport)
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn scroll(&self) -> f32 {
        self.scroll.value()
    }

    pub fn on_wheel(&mut self, delta: f32) {
        self.scroll.on_wheel(delta);
    }

    pub fn on_key(&mut self, key: ScrollKey) {
        let viewport_height = self.layout.viewport().y;
        let target = self.scroll.target();

        let target = match key {
            ScrollKey::Up => target - ARROW_STEP,
            ScrollKey::Down => target + ARROW_STEP,
            ScrollKey::PageUp => target - viewport_height * PAGE_STEP,
            ScrollKey::PageDown => target + viewport_height * PAGE_STEP,
            ScrollKey::Home => 0.0,
            ScrollKey::End => self.layout.max_scroll(),
        };
        self.scroll.scroll_to(target, false);
    }

    pub fn scroll_to_section(&mut self, index: usize) {
        match self.layout.slot(index) {
            Some(slot) => self.scroll.scroll_to(slot.top, false),
            None => log::warn!("No section {} to scroll to", index),
        }
    }

    fn apply(&mut self, request: PageRequest) {
        match request {
            PageRequest::ScrollToSection(index) => self.scroll_to_section(index),
        }
    }

    /// Advances scrolling and every section. `input` carries time and
    /// pointer state, the returned context adds scroll and viewport.
    pub fn update(&mut self, input: FrameContext) -> FrameContext {
        let ctx = FrameContext {
            scroll: self.scroll.advance(input.dt),
            viewport: self.layout.viewport(),
            ..input
        };

        for section in &mut self.sections {
            section.update(&ctx);
        }
        ctx
    }

    pub fn layers(&self, ctx: &FrameContext) -> Vec<Layer<'_>> {
        let mut layers = Vec::new();
        for section in &self.sections {
            section.layers(ctx, &mut layers);
        }
        layers
    }

    pub fn draw_ui(&mut self, ui: &imgui::Ui, ctx: &FrameContext) {
        let requests = self
            .sections
            .iter_mut()
            .filter_map(|section| section.draw_ui(ui, ctx))
            .collect::<Vec<_>>();

        for request in requests {
            self.apply(request);
        }
    }

    pub fn scenes_mut(&mut self) -> Vec<&mut Scene> {
        self.sections
            .iter_mut()
            .flat_map(|section| section.scenes_mut())
            .collect()
    }

    pub fn clips_mut(&mut self) -> Vec<&mut MediaClip> {
        self.sections
            .iter_mut()
            .flat_map(|section| section.clips_mut())
            .collect()
    }

    pub fn triggers(&self) -> Vec<(&'static str, &ScrollTrigger)> {
        self.sections
            .iter()
            .flat_map(|section| section.triggers())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::rect::Rect;
    use crate::scroll::{ElementBounds, SectionSlot};
    use glam::Vec4;

    const VIEWPORT: Vec2 = Vec2::new(1000.0, 500.0);

    struct Block {
        screens: f32,
        trigger: ScrollTrigger,
        last_scroll: Option<f32>,
    }

    impl Block {
        fn boxed(screens: f32) -> Box<dyn Section> {
            Box::new(Self {
                screens,
                trigger: ScrollTrigger::new("top top", "bottom top").unwrap(),
                last_scroll: None,
            })
        }
    }

    impl Section for Block {
        fn name(&self) -> &'static str {
            "block"
        }

        fn height(&self, viewport: Vec2) -> f32 {
            viewport.y * self.screens
        }

        fn mount(&mut self, slot: &SectionSlot, viewport: Vec2) -> anyhow::Result<()> {
            self.trigger.refresh(
                ElementBounds {
                    top: slot.top,
                    height: slot.height,
                },
                viewport.y,
            );
            Ok(())
        }

        fn update(&mut self, ctx: &FrameContext) {
            self.last_scroll = Some(ctx.scroll);
            self.trigger.update(ctx.scroll, ctx.dt);
        }

        fn layers<'a>(&'a self, ctx: &FrameContext, out: &mut Vec<Layer<'a>>) {
            out.push(Layer::solid(0, Rect::from_size(ctx.viewport), Vec4::ONE));
        }

        fn triggers(&self) -> Vec<(&'static str, &ScrollTrigger)> {
            vec![("block", &self.trigger)]
        }
    }

    fn page() -> Page {
        let mut page = Page::new(
            vec![Block::boxed(1.0), Block::boxed(2.0), Block::boxed(1.0)],
            SmoothScrollOptions::default(),
        );
        page.mount(VIEWPORT).unwrap();
        page
    }

    fn settle(page: &mut Page) -> FrameContext {
        let mut ctx = FrameContext::default();
        for _ in 0..120 {
            ctx = page.update(FrameContext {
                dt: 1.0 / 60.0,
                ..Default::default()
            });
        }
        ctx
    }

    #[test]
    fn sections_stack_and_limit_scroll() {
        let page = page();
        let tops = page
            .layout()
            .slots()
            .iter()
            .map(|slot| slot.top)
            .collect::<Vec<_>>();
        assert_eq!(tops, vec![0.0, 500.0, 1500.0]);
        assert_eq!(page.layout().max_scroll(), 1500.0);
        assert_eq!(page.triggers().len(), 3);
    }

    #[test]
    fn wheel_scrolls_every_section_smoothly() {
        let mut page = page();
        page.on_wheel(10_000.0);

        let first = page.update(FrameContext {
            dt: 1.0 / 60.0,
            ..Default::default()
        });
        assert!(first.scroll > 0.0 && first.scroll < 1500.0);
        assert_eq!(first.viewport, VIEWPORT);

        let ctx = settle(&mut page);
        assert_eq!(ctx.scroll, 1500.0);
        assert_eq!(page.layers(&ctx).len(), 3);
    }

    #[test]
    fn keys_step_and_jump() {
        let mut page = page();
        page.on_key(ScrollKey::PageDown);
        assert_eq!(settle(&mut page).scroll, 437.5);
        page.on_key(ScrollKey::Down);
        assert_eq!(settle(&mut page).scroll, 477.5);
        page.on_key(ScrollKey::End);
        assert_eq!(settle(&mut page).scroll, 1500.0);
        page.on_key(ScrollKey::Home);
        assert_eq!(settle(&mut page).scroll, 0.0);
    }

    #[test]
    fn scrolls_to_section_tops() {
        let mut page = page();
        page.apply(PageRequest::ScrollToSection(1));
        assert_eq!(settle(&mut page).scroll, 500.0);
        page.scroll_to_section(9);
        assert_eq!(settle(&mut page).scroll, 500.0);
    }

    #[test]
    fn resize_relayouts_and_clamps() {
        let mut page = page();
        page.on_key(ScrollKey::End);
        settle(&mut page);

        page.resize(Vec2::new(1000.0, 250.0)).unwrap();
        assert_eq!(page.layout().max_scroll(), 750.0);
        assert_eq!(page.scroll(), 750.0);
    }
}
