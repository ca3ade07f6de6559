use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::animation::{Ease, Playhead, Position, Repeat, Timeline, Tween, TweenValue};
use crate::media::{Assets, MediaClip};
use crate::rendering::layer::Layer;
use crate::scene_graph::light::Light;
use crate::scene_graph::scene::Scene;
use crate::scroll::{Scrub, ScrollTrigger, SectionSlot};
use crate::sections::rig::{FlavorRig, IdleMotion, Pose, PoseKey};
use crate::sections::text_panel::{accent, plain, PanelCopy, TextPanel};
use crate::sections::video_box::VideoBox;
use crate::sections::{slot_bounds, vh, FrameContext, PageRequest, Section};

const VIDEO_Z: i32 = 3;
const CANVAS_Z: i32 = 6;

const COPY: PanelCopy = PanelCopy {
    id: "sky",
    title: &[plain("Sky "), accent("Edition")],
    main: &[
        plain("Une fraîcheur "),
        accent("aérienne"),
        plain(" au-dessus des nuages"),
    ],
    description: &[
        plain("Des notes de "),
        accent("pêche blanche"),
        plain(" et de fleur de sureau pour prendre de la hauteur"),
    ],
    cta: "En savoir plus",
    accent: 0x7cc4ff,
};

/// Clouds open up behind the can as it drops in from above.
pub struct Sky {
    slot: SectionSlot,
    clouds: VideoBox,
    rig: FlavorRig,
    timeline: Timeline<PoseKey>,
    trigger: ScrollTrigger,
    canvas_fade: Playhead,
    panel: TextPanel,
}

fn idle_motion() -> IdleMotion {
    let sway = Tween::new(0.0, 0.05, 3.0, Ease::POWER1_IN_OUT)
        .repeat(Repeat::Infinite)
        .yoyo(true);
    let float = Tween::new(0.0, -0.01, 2.5, Ease::SINE_IN_OUT)
        .repeat(Repeat::Infinite)
        .yoyo(true);

    IdleMotion::default()
        .with(PoseKey::RotX, sway.clone())
        .with(PoseKey::RotZ, sway)
        .with(PoseKey::Y, float)
}

impl Sky {
    pub fn new(assets: &Assets) -> anyhow::Result<Self> {
        let mut rig = FlavorRig::load(
            assets,
            "sky",
            Pose::new(Vec3::new(0.0, 2.0, 4.3), Vec3::new(0.0, PI, -0.5)),
        )
        .with_idle(idle_motion());
        rig.scene.add_light(Light::ambient(0xffffff, 1.0));
        rig.scene
            .add_light(Light::directional(0xffffff, 2.0, Vec3::splat(5.0)));

        let timeline = Timeline::new()
            .to(
                &[
                    (PoseKey::Z, TweenValue::To(4.83)),
                    (PoseKey::Y, TweenValue::To(-0.09)),
                    (PoseKey::X, TweenValue::To(-0.05)),
                ],
                3.0,
                Ease::POWER3_IN_OUT,
                Position::Append,
            )
            .to(
                &[(PoseKey::RotY, TweenValue::To(0.0))],
                2.0,
                Ease::POWER3_IN_OUT,
                Position::WithPrevious,
            );

        Ok(Self {
            slot: SectionSlot {
                index: 0,
                top: 0.0,
                height: 0.0,
            },
            clouds: VideoBox::new(assets.clip("video/cloud"), "+=80%")?,
            rig,
            timeline,
            trigger: ScrollTrigger::new("top+=20% center", "+=80%")?
                .with_scrub(Scrub::Smoothed(1.0)),
            canvas_fade: Playhead::new(0.5),
            panel: TextPanel::new(COPY)?,
        })
    }
}

impl Section for Sky {
    fn name(&self) -> &'static str {
        "sky"
    }

    fn height(&self, viewport: Vec2) -> f32 {
        vh(viewport, 1.0)
    }

    fn mount(&mut self, slot: &SectionSlot, viewport: Vec2) -> anyhow::Result<()> {
        self.slot = slot.clone();
        let bounds = slot_bounds(slot);
        self.clouds.refresh(bounds, viewport.y);
        self.trigger.refresh(bounds, viewport.y);
        self.panel.refresh(bounds, viewport.y);
        Ok(())
    }

    fn update(&mut self, ctx: &FrameContext) {
        self.clouds.update(ctx);

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
        if !self.slot.is_visible(ctx.scroll, ctx.viewport) {
            return;
        }

        let frame = self.slot.screen_rect(ctx.scroll, ctx.viewport);
        out.push(self.clouds.layer(VIDEO_Z, frame, ctx.time));

        out.push(
            Layer::scene(CANVAS_Z, frame, &self.rig.scene, &self.rig.camera)
                .with_opacity(self.canvas_fade.progress()),
        );
    }

    fn draw_ui(&mut self, ui: &imgui::Ui, ctx: &FrameContext) -> Option<PageRequest> {
        if self.slot.is_visible(ctx.scroll, ctx.viewport) {
            let frame = self.slot.screen_rect(ctx.scroll, ctx.viewport);
            self.panel.draw(ui, frame, ctx);
        }
        None
    }

    fn scenes_mut(&mut self) -> Vec<&mut Scene> {
        vec![&mut self.rig.scene]
    }

    fn clips_mut(&mut self) -> Vec<&mut MediaClip> {
        vec![self.clouds.clip_mut()]
    }

    fn triggers(&self) -> Vec<(&'static str, &ScrollTrigger)> {
        vec![
            ("sky clouds", self.clouds.trigger()),
            ("sky can", &self.trigger),
            ("sky text", self.panel.trigger()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaOptions;
    use crate::scroll::PageLayout;

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 800.0);

    fn mounted() -> Sky {
        let assets = Assets::new("does/not/exist", MediaOptions::default());
        let mut sky = Sky::new(&assets).unwrap();
        let layout = PageLayout::stack([VIEWPORT.y, sky.height(VIEWPORT)], VIEWPORT);
        sky.mount(&layout.slots()[1], VIEWPORT).unwrap();
        sky
    }

    fn run(sky: &mut Sky, scroll: f32, seconds: f32) {
        for frame in 0..(seconds * 60.0) as usize {
            sky.update(&FrameContext {
                time: frame as f32 / 60.0,
                dt: 1.0 / 60.0,
                scroll,
                viewport: VIEWPORT,
                ..Default::default()
            });
        }
    }

    #[test]
    fn can_drops_in_and_settles() {
        let mut sky = mounted();
        // top+=20% of an 800px section at 800, against the viewport center.
        assert_eq!(sky.trigger.start(), 800.0 + 160.0 - 400.0);
        assert_eq!(sky.trigger.end(), sky.trigger.start() + 640.0);

        run(&mut sky, 0.0, 0.5);
        assert_eq!(sky.rig.pose.position, Vec3::new(0.0, 2.0, 4.3));
        assert_eq!(sky.rig.pose.rotation, Vec3::new(0.0, PI, -0.5));
        assert_eq!(sky.canvas_fade.progress(), 0.0);

        run(&mut sky, 2000.0, 2.0);
        let pose = sky.rig.pose;
        assert!(pose.position.abs_diff_eq(Vec3::new(-0.05, -0.09, 4.83), 1e-4));
        assert!(pose.rotation.y.abs() < 1e-4);
        // Untouched by scroll.
        assert_eq!(pose.rotation.z, -0.5);
        assert_eq!(sky.canvas_fade.progress(), 1.0);
    }

    #[test]
    fn rotation_finishes_before_position() {
        let mut sky = mounted();
        let start = sky.trigger.start();
        let length = sky.trigger.end() - start;
        // Two thirds through: the two-unit rotation is done, the move is not.
        run(&mut sky, start + length * 2.0 / 3.0, 2.0);

        let pose = sky.rig.pose;
        assert!(pose.rotation.y.abs() < 1e-3);
        assert!(pose.position.z < 4.83 - 1e-3);
    }

    #[test]
    fn idle_sway_is_added_on_top() {
        let sky = mounted();
        let pose = sky.rig.animated_pose(3.0);
        assert!((pose.rotation.x - 0.05).abs() < 1e-5);
        assert!((pose.rotation.z - (-0.5 + 0.05)).abs() < 1e-5);
    }
}
