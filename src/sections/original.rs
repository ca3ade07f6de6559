use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::animation::{Ease, Playhead, Position, Timeline, TweenValue};
use crate::math::rect::Rect;
use crate::media::{Assets, MediaClip};
use crate::rendering::layer::Layer;
use crate::scene_graph::light::Light;
use crate::scene_graph::scene::Scene;
use crate::scroll::{Placement, Scrub, ScrollTrigger, SectionSlot};
use crate::sections::rig::{FlavorRig, Pose, PoseKey};
use crate::sections::text_panel::{accent, plain, PanelCopy, TextPanel};
use crate::sections::{slot_bounds, vh, FrameContext, PageRequest, Section};

const BACKDROP_Z: i32 = -10;
const CANVAS_Z: i32 = 5;

const COPY: PanelCopy = PanelCopy {
    id: "original",
    title: &[plain("Red Bull "), accent("Original")],
    main: &[
        plain("Le goût "),
        accent("iconique"),
        plain(" qui donne des ailes depuis 1987"),
    ],
    description: &[
        plain("Taurine, caféine et vitamines B pour un "),
        accent("coup de fouet"),
        plain(" à tout moment de la journée"),
    ],
    cta: "En savoir plus",
    accent: 0xff3b3b,
};

/// The first flavor: the can turns to face the viewer over a planet
/// backdrop while the section scrolls by.
pub struct Original {
    slot: SectionSlot,
    backdrop: MediaClip,
    rig: FlavorRig,
    timeline: Timeline<PoseKey>,
    trigger: ScrollTrigger,
    canvas_fade: Playhead,
    panel: TextPanel,
}

impl Original {
    pub fn new(assets: &Assets) -> anyhow::Result<Self> {
        let mut rig = FlavorRig::load(
            assets,
            "original",
            Pose::new(Vec3::new(0.0, 0.0, 4.3), Vec3::new(0.0, PI, 0.0)),
        );
        add_lights(&mut rig.scene);

        let timeline = Timeline::new()
            .to(
                &[
                    (PoseKey::Z, TweenValue::To(4.83)),
                    (PoseKey::Y, TweenValue::To(-0.09)),
                ],
                1.0,
                Ease::POWER2_IN_OUT,
                Position::Append,
            )
            .to(
                &[(PoseKey::RotY, TweenValue::To(0.0))],
                1.0,
                Ease::POWER2_IN_OUT,
                Position::WithPrevious,
            );

        let trigger = ScrollTrigger::new("top top", "+=200%")?
            .with_scrub(Scrub::Immediate)
            .with_toggle_actions("play none none reverse".parse()?);

        Ok(Self {
            slot: SectionSlot {
                index: 0,
                top: 0.0,
                height: 0.0,
            },
            backdrop: assets.clip("video/planete"),
            rig,
            timeline,
            trigger,
            canvas_fade: Playhead::new(0.5),
            panel: TextPanel::new(COPY)?,
        })
    }

    fn frame(&self, ctx: &FrameContext) -> Rect {
        Placement::Sticky.place(Rect::from_size(ctx.viewport), &self.slot, ctx.scroll)
    }

    /// The planet stays behind everything below the hero once this section
    /// scrolls into view.
    fn backdrop_visible(&self, ctx: &FrameContext) -> bool {
        ctx.scroll + ctx.viewport.y > self.slot.top
    }
}

fn add_lights(scene: &mut Scene) {
    scene.add_light(Light::ambient(0xffffff, 0.3));
    scene.add_light(Light::directional(0xffffff, 1.0, Vec3::new(-150.0, 1.0, 4.83)));
    scene.add_light(Light::directional(0xffffff, 0.3, Vec3::new(-4.0, 3.0, 8.0)));
}

impl Section for Original {
    fn name(&self) -> &'static str {
        "original"
    }

    fn height(&self, viewport: Vec2) -> f32 {
        vh(viewport, 2.0)
    }

    fn mount(&mut self, slot: &SectionSlot, viewport: Vec2) -> anyhow::Result<()> {
        self.slot = slot.clone();
        self.trigger.refresh(slot_bounds(slot), viewport.y);
        self.panel.refresh(slot_bounds(slot), viewport.y);
        Ok(())
    }

    fn update(&mut self, ctx: &FrameContext) {
        for event in self.trigger.update(ctx.scroll, ctx.dt) {
            self.canvas_fade
                .apply(self.trigger.toggle_actions().action_for(event));
        }
        self.canvas_fade.update(ctx.dt);

        self.timeline
            .set_progress(&mut self.rig.pose, self.trigger.progress());
        self.rig.apply(ctx.time);

        self.panel.update(ctx);
    }

    fn layers<'a>(&'a self, ctx: &FrameContext, out: &mut Vec<Layer<'a>>) {
        let screen = Rect::from_size(ctx.viewport);

        if self.backdrop_visible(ctx) {
            out.push(
                Layer::media(BACKDROP_Z, screen, &self.backdrop, ctx.time).with_brightness(0.6),
            );
        }

        if self.slot.is_visible(ctx.scroll, ctx.viewport) {
            out.push(
                Layer::scene(CANVAS_Z, screen, &self.rig.scene, &self.rig.camera)
                    .with_opacity(self.canvas_fade.progress()),
            );
        }
    }

    fn draw_ui(&mut self, ui: &imgui::Ui, ctx: &FrameContext) -> Option<PageRequest> {
        if self.slot.is_visible(ctx.scroll, ctx.viewport) {
            let frame = self.frame(ctx);
            self.panel.draw(ui, frame, ctx);
        }
        None
    }

    fn scenes_mut(&mut self) -> Vec<&mut Scene> {
        vec![&mut self.rig.scene]
    }

    fn clips_mut(&mut self) -> Vec<&mut MediaClip> {
        vec![&mut self.backdrop]
    }

    fn triggers(&self) -> Vec<(&'static str, &ScrollTrigger)> {
        vec![
            ("original can", &self.trigger),
            ("original text", self.panel.trigger()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaOptions;
    use crate::scroll::PageLayout;

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 800.0);

    fn mounted() -> Original {
        let assets = Assets::new("does/not/exist", MediaOptions::default());
        let mut original = Original::new(&assets).unwrap();
        let layout = PageLayout::stack([VIEWPORT.y, original.height(VIEWPORT)], VIEWPORT);
        original.mount(&layout.slots()[1], VIEWPORT).unwrap();
        original
    }

    fn step(original: &mut Original, scroll: f32, frames: usize) {
        for frame in 0..frames {
            original.update(&FrameContext {
                time: frame as f32 / 60.0,
                dt: 1.0 / 60.0,
                scroll,
                viewport: VIEWPORT,
                ..Default::default()
            });
        }
    }

    #[test]
    fn can_turns_around_over_two_viewports() {
        let mut original = mounted();
        assert_eq!(original.trigger.start(), 800.0);
        assert_eq!(original.trigger.end(), 2400.0);

        step(&mut original, 0.0, 1);
        assert_eq!(original.rig.pose.position, Vec3::new(0.0, 0.0, 4.3));
        assert_eq!(original.rig.pose.rotation.y, PI);

        step(&mut original, 1600.0, 1);
        assert!((original.rig.pose.position.z - (4.3 + 4.83) / 2.0).abs() < 1e-4);
        assert!((original.rig.pose.rotation.y - PI / 2.0).abs() < 1e-4);

        step(&mut original, 2400.0, 1);
        assert!((original.rig.pose.position.z - 4.83).abs() < 1e-5);
        assert!((original.rig.pose.position.y + 0.09).abs() < 1e-5);
        assert_eq!(original.rig.pose.rotation.y, 0.0);
    }

    #[test]
    fn canvas_fades_in_on_enter_and_out_on_leave_back() {
        let mut original = mounted();
        step(&mut original, 900.0, 60);
        assert_eq!(original.canvas_fade.progress(), 1.0);

        step(&mut original, 3000.0, 60);
        assert_eq!(original.canvas_fade.progress(), 1.0);

        step(&mut original, 100.0, 60);
        assert_eq!(original.canvas_fade.progress(), 0.0);
    }

    #[test]
    fn backdrop_is_dimmed_behind_everything() {
        let mut original = mounted();
        step(&mut original, 900.0, 1);

        let ctx = FrameContext {
            scroll: 900.0,
            viewport: VIEWPORT,
            ..Default::default()
        };
        let mut layers = Vec::new();
        original.layers(&ctx, &mut layers);

        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].z, BACKDROP_Z);
        assert_eq!(layers[0].brightness, 0.6);
        assert_eq!(layers[1].z, CANVAS_Z);
    }
}
