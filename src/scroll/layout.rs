use glam::Vec2;

use crate::math::rect::Rect;

/// A section's vertical extent in document pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSlot {
    pub index: usize,
    pub top: f32,
    pub height: f32,
}

impl SectionSlot {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Section rectangle on screen for the given scroll offset.
    pub fn screen_rect(&self, scroll: f32, viewport: Vec2) -> Rect {
        Rect::new(0.0, self.top - scroll, viewport.x, self.height)
    }

    pub fn is_visible(&self, scroll: f32, viewport: Vec2) -> bool {
        self.top - scroll < viewport.y && self.bottom() - scroll > 0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    slots: Vec<SectionSlot>,
    viewport: Vec2,
}

impl PageLayout {
    /// Stacks sections top to bottom in the given order.
    pub fn stack(heights: impl IntoIterator<Item = f32>, viewport: Vec2) -> Self {
        let mut top = 0.0;
        let slots = heights
            .into_iter()
            .enumerate()
            .map(|(index, height)| {
                let slot = SectionSlot {
                    index,
                    top,
                    height: height.max(0.0),
                };
                top += slot.height;
                slot
            })
            .collect();

        Self { slots, viewport }
    }

    pub fn slots(&self) -> &[SectionSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&SectionSlot> {
        self.slots.get(index)
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn total_height(&self) -> f32 {
        self.slots.last().map(SectionSlot::bottom).unwrap_or(0.0)
    }

    pub fn max_scroll(&self) -> f32 {
        (self.total_height() - self.viewport.y).max(0.0)
    }
}

/// How an element is positioned relative to scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Moves with its section.
    Flow,
    /// Pinned to the viewport; `local` is in viewport space.
    Fixed,
    /// Moves with its section until it reaches the top of the viewport, then
    /// stays there until the section's bottom edge pushes it out.
    Sticky,
}

impl Placement {
    /// `local` is relative to the section's top-left for `Flow`/`Sticky`.
    pub fn place(&self, local: Rect, slot: &SectionSlot, scroll: f32) -> Rect {
        match self {
            Placement::Flow => local.translated(Vec2::new(0.0, slot.top - scroll)),
            Placement::Fixed => local,
            Placement::Sticky => {
                let natural = slot.top + local.min.y - scroll;
                let floor = slot.bottom() - local.size.y - scroll;
                let y = natural.max(0.0).min(floor);
                Rect {
                    min: Vec2::new(local.min.x, y),
                    size: local.size,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 800.0);

    #[test]
    fn sections_stack_in_order() {
        let layout = PageLayout::stack([800.0, 1600.0, 800.0], VIEWPORT);
        assert_eq!(layout.slot(1).unwrap().top, 800.0);
        assert_eq!(layout.slot(2).unwrap().top, 2400.0);
        assert_eq!(layout.total_height(), 3200.0);
        assert_eq!(layout.max_scroll(), 2400.0);
    }

    #[test]
    fn short_page_cannot_scroll() {
        let layout = PageLayout::stack([400.0], VIEWPORT);
        assert_eq!(layout.max_scroll(), 0.0);
    }

    #[test]
    fn sticky_pins_then_releases() {
        let slot = SectionSlot {
            index: 0,
            top: 1000.0,
            height: 1440.0,
        };
        let stage = Rect::new(0.0, 0.0, VIEWPORT.x, VIEWPORT.y);

        let before = Placement::Sticky.place(stage, &slot, 500.0);
        assert_eq!(before.min.y, 500.0);

        let pinned = Placement::Sticky.place(stage, &slot, 1300.0);
        assert_eq!(pinned.min.y, 0.0);

        let released = Placement::Sticky.place(stage, &slot, 1840.0);
        assert_eq!(released.min.y, -200.0);
    }

    #[test]
    fn flow_and_fixed() {
        let slot = SectionSlot {
            index: 0,
            top: 800.0,
            height: 800.0,
        };
        let local = Rect::new(10.0, 20.0, 100.0, 100.0);
        assert_eq!(Placement::Flow.place(local, &slot, 300.0).min, Vec2::new(10.0, 520.0));
        assert_eq!(Placement::Fixed.place(local, &slot, 300.0), local);
        assert!(slot.is_visible(300.0, VIEWPORT));
        assert!(!slot.is_visible(1600.0, VIEWPORT));
    }
}
