use glam::Vec2;

use crate::animation::{lerp, Playhead};
use crate::math::rect::Rect;
use crate::media::MediaClip;
use crate::rendering::layer::Layer;
use crate::scroll::trigger::TriggerParseError;
use crate::scroll::{ElementBounds, Scrub, ScrollTrigger};
use crate::sections::FrameContext;

const SCALE_FROM: f32 = 0.3;
const SCALE_TO: f32 = 1.9;
/// Share of the frame the unscaled box may cover on each axis.
const FIT: f32 = 0.8;
const CORNER_RADIUS: f32 = 8.0;
const FADE_DURATION: f32 = 0.5;

/// A looping clip in a rounded box that grows with scroll.
pub struct VideoBox {
    clip: MediaClip,
    trigger: ScrollTrigger,
    fade: Playhead,
    scale: f32,
}

impl VideoBox {
    /// The box grows from `top center` over `end`.
    pub fn new(clip: MediaClip, end: &str) -> Result<Self, TriggerParseError> {
        let trigger = ScrollTrigger::new("top center", end)?.with_scrub(Scrub::Smoothed(1.0));

        Ok(Self {
            clip,
            trigger,
            fade: Playhead::new(FADE_DURATION),
            scale: SCALE_FROM,
        })
    }

    pub fn refresh(&mut self, bounds: ElementBounds, viewport_height: f32) {
        self.trigger.refresh(bounds, viewport_height);
    }

    pub fn update(&mut self, ctx: &FrameContext) {
        for event in self.trigger.update(ctx.scroll, ctx.dt) {
            self.fade
                .apply(self.trigger.toggle_actions().action_for(event));
        }
        self.fade.update(ctx.dt);
        self.scale = lerp(SCALE_FROM, SCALE_TO, self.trigger.progress());
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn opacity(&self) -> f32 {
        self.fade.progress()
    }

    pub fn trigger(&self) -> &ScrollTrigger {
        &self.trigger
    }

    pub fn clip_mut(&mut self) -> &mut MediaClip {
        &mut self.clip
    }

    /// Screen rect of the box centered in `frame`, at the current scale.
    pub fn rect(&self, frame: Rect) -> Rect {
        let bounds = frame.size * FIT;
        let aspect = self.clip.aspect();
        let size = if bounds.x / bounds.y > aspect {
            Vec2::new(bounds.y * aspect, bounds.y)
        } else {
            Vec2::new(bounds.x, bounds.x / aspect)
        };

        Rect {
            min: frame.center() - size * 0.5,
            size,
        }
        .scaled(self.scale)
    }

    pub fn layer(&self, z: i32, frame: Rect, time: f32) -> Layer<'_> {
        Layer::media(z, self.rect(frame), &self.clip, time)
            .with_opacity(self.opacity())
            .with_corner_radius(CORNER_RADIUS * self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn video_box() -> VideoBox {
        let clip = MediaClip::from_frames("clouds", vec![RgbaImage::new(16, 9)], 24.0);
        let mut video_box = VideoBox::new(clip, "+=80%").unwrap();
        video_box.refresh(
            ElementBounds {
                top: 800.0,
                height: 800.0,
            },
            800.0,
        );
        video_box
    }

    fn run(video_box: &mut VideoBox, scroll: f32, seconds: f32) {
        let ctx = FrameContext {
            dt: 1.0 / 60.0,
            scroll,
            viewport: Vec2::new(1280.0, 800.0),
            ..Default::default()
        };
        for _ in 0..(seconds * 60.0) as usize {
            video_box.update(&ctx);
        }
    }

    #[test]
    fn grows_with_scroll_and_fades_in_once_entered() {
        let mut video_box = video_box();
        assert_eq!(video_box.trigger().start(), 400.0);
        assert_eq!(video_box.trigger().end(), 1040.0);

        run(&mut video_box, 0.0, 0.5);
        assert_eq!(video_box.scale(), SCALE_FROM);
        assert_eq!(video_box.opacity(), 0.0);

        run(&mut video_box, 2000.0, 2.0);
        assert!((video_box.scale() - SCALE_TO).abs() < 1e-4);
        assert_eq!(video_box.opacity(), 1.0);
    }

    #[test]
    fn box_keeps_clip_aspect_inside_frame() {
        let video_box = video_box();
        let frame = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        let rect = video_box.rect(frame);

        assert!((rect.aspect() - 16.0 / 9.0).abs() < 1e-4);
        assert!((rect.size.x - 800.0 * SCALE_FROM).abs() < 1e-3);
        assert!(rect.center().abs_diff_eq(frame.center(), 1e-3));
    }
}
