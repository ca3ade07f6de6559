use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::animation::{lerp, Ease, Repeat, Tween};
use crate::math::rect::Rect;
use crate::media::{Assets, MediaClip};
use crate::rendering::layer::Layer;
use crate::scene_graph::light::{Light, LightId};
use crate::scene_graph::scene::Scene;
use crate::scroll::{ElementBounds, Placement, Scrub, ScrollTrigger, SectionSlot};
use crate::sections::rig::{FlavorRig, IdleMotion, Pose, PoseKey};
use crate::sections::text_panel::{accent, plain, PanelCopy, TextPanel};
use crate::sections::video_box::VideoBox;
use crate::sections::{slot_bounds, vh, FrameContext, PageRequest, Section};

const VIDEO_Z: i32 = 3;
const CANVAS_Z: i32 = 6;
const BLUE: u32 = 0x0066ff;
const TARGET_X: f32 = -0.05;
const CAN_Z: (f32, f32) = (4.3, 4.83);
const CAN_Y: (f32, f32) = (-2.0, -0.09);
const SPOT_INTENSITY: f32 = 25.0;
const FRONT_SPOT_INTENSITY: f32 = 15.0;
const POINT_INTENSITY: f32 = 8.0;

const COPY: PanelCopy = PanelCopy {
    id: "karmine",
    title: &[plain("Karmine "), accent("Energy")],
    main: &[
        plain("L'énergie pure de la "),
        accent("compétition"),
        plain(" dans une canette explosive"),
    ],
    description: &[
        plain("Un boost "),
        accent("électrisant"),
        plain(" avec des notes de fruits du dragon et une touche de "),
        accent("plasma glacé"),
    ],
    cta: "En savoir plus",
    accent: 0x3ad6ff,
};

struct StageLights {
    sides: [LightId; 2],
    front: LightId,
    points: [LightId; 2],
}

impl StageLights {
    fn add(scene: &mut Scene) -> Self {
        scene.add_light(Light::ambient(0xffffff, 0.2));

        let target = Vec3::new(TARGET_X, CAN_Y.1, CAN_Z.1);
        let side = |x: f32| {
            Light::spot(BLUE, 0.0, Vec3::new(x, 1.0, CAN_Z.1), PI / 4.0, 0.2, 10.0)
                .with_target(target)
        };
        let sides = [scene.add_light(side(-1.5)), scene.add_light(side(1.5))];
        let front = scene.add_light(
            Light::spot(BLUE, 0.0, Vec3::new(0.0, 0.0, 6.5), PI / 6.0, 0.3, 10.0)
                .with_target(target),
        );
        let points = [-0.5, 0.5]
            .map(|x| scene.add_light(Light::point(BLUE, 0.0, Vec3::new(x, 0.0, CAN_Z.1), 8.0)));

        Self {
            sides,
            front,
            points,
        }
    }

    /// Brightens with `progress` and keeps every light aimed at the can's
    /// height.
    fn update(&self, scene: &mut Scene, progress: f32, can_y: f32) {
        for id in self.sides {
            if let Some(light) = scene.light_mut(id) {
                light.intensity = lerp(0.0, SPOT_INTENSITY, progress);
                light.target.y = can_y;
            }
        }
        if let Some(light) = scene.light_mut(self.front) {
            light.intensity = lerp(0.0, FRONT_SPOT_INTENSITY, progress);
            light.target.y = can_y;
        }
        for id in self.points {
            if let Some(light) = scene.light_mut(id) {
                light.intensity = lerp(0.0, POINT_INTENSITY, progress);
                light.position.y = can_y;
            }
        }
    }
}

/// The can rises into blue stage lights in front of a sticky video.
pub struct Karmine {
    slot: SectionSlot,
    video: VideoBox,
    rig: FlavorRig,
    lights: StageLights,
    trigger: ScrollTrigger,
    panel: TextPanel,
}

impl Karmine {
    pub fn new(assets: &Assets) -> anyhow::Result<Self> {
        let float = Tween::new(0.0, -0.01, 2.5, Ease::SINE_IN_OUT)
            .repeat(Repeat::Infinite)
            .yoyo(true);
        let mut rig = FlavorRig::load(
            assets,
            "karmine",
            Pose::new(Vec3::new(0.0, CAN_Y.0, CAN_Z.0), Vec3::ZERO),
        )
        .with_idle(IdleMotion::default().with(PoseKey::Y, float));
        let lights = StageLights::add(&mut rig.scene);

        Ok(Self {
            slot: SectionSlot {
                index: 0,
                top: 0.0,
                height: 0.0,
            },
            video: VideoBox::new(assets.clip("video/karmine"), "+=70%")?,
            rig,
            lights,
            trigger: ScrollTrigger::new("top+=20% center", "+=80%")?
                .with_scrub(Scrub::Immediate),
            panel: TextPanel::new(COPY)?,
        })
    }

    /// The 100vh stage that sticks to the top while the section scrolls.
    fn stage(&self, ctx: &FrameContext) -> Rect {
        Placement::Sticky.place(Rect::from_size(ctx.viewport), &self.slot, ctx.scroll)
    }
}

impl Section for Karmine {
    fn name(&self) -> &'static str {
        "karmine"
    }

    fn height(&self, viewport: Vec2) -> f32 {
        vh(viewport, 1.8)
    }

    fn mount(&mut self, slot: &SectionSlot, viewport: Vec2) -> anyhow::Result<()> {
        self.slot = slot.clone();
        let bounds = slot_bounds(slot);
        self.video.refresh(bounds, viewport.y);
        // The can follows the stage, not the whole section.
        let stage = ElementBounds {
            top: slot.top,
            height: viewport.y,
        };
        self.trigger.refresh(stage, viewport.y);
        self.panel.refresh(bounds, viewport.y);
        Ok(())
    }

    fn update(&mut self, ctx: &FrameContext) {
        self.video.update(ctx);
        self.trigger.update(ctx.scroll, ctx.dt);

        let progress = self.trigger.progress();
        let pose = &mut self.rig.pose;
        pose.position.y = lerp(CAN_Y.0, CAN_Y.1, progress);
        pose.position.z = lerp(CAN_Z.0, CAN_Z.1, progress);
        let can_y = pose.position.y;

        self.lights.update(&mut self.rig.scene, progress, can_y);
        self.rig.apply(ctx.time);

        self.panel.update(ctx);
    }

    fn layers<'a>(&'a self, ctx: &FrameContext, out: &mut Vec<Layer<'a>>) {
        if !self.slot.is_visible(ctx.scroll, ctx.viewport) {
            return;
        }

        let stage = self.stage(ctx);
        out.push(
            self.video
                .layer(VIDEO_Z, stage, ctx.time)
                .with_brightness(0.5),
        );
        out.push(
            Layer::scene(CANVAS_Z, stage, &self.rig.scene, &self.rig.camera)
                .with_opacity(self.video.opacity()),
        );
    }

    fn draw_ui(&mut self, ui: &imgui::Ui, ctx: &FrameContext) -> Option<PageRequest> {
        if self.slot.is_visible(ctx.scroll, ctx.viewport) {
            self.panel.draw(ui, Rect::from_size(ctx.viewport), ctx);
        }
        None
    }

    fn scenes_mut(&mut self) -> Vec<&mut Scene> {
        vec![&mut self.rig.scene]
    }

    fn clips_mut(&mut self) -> Vec<&mut MediaClip> {
        vec![self.video.clip_mut()]
    }

    fn triggers(&self) -> Vec<(&'static str, &ScrollTrigger)> {
        vec![
            ("karmine video", self.video.trigger()),
            ("karmine can", &self.trigger),
            ("karmine text", self.panel.trigger()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaOptions;
    use crate::scene_graph::light::LightKind;
    use crate::scroll::PageLayout;

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 800.0);

    fn mounted() -> Karmine {
        let assets = Assets::new("does/not/exist", MediaOptions::default());
        let mut karmine = Karmine::new(&assets).unwrap();
        let layout = PageLayout::stack([VIEWPORT.y, karmine.height(VIEWPORT)], VIEWPORT);
        karmine.mount(&layout.slots()[1], VIEWPORT).unwrap();
        karmine
    }

    fn run(karmine: &mut Karmine, scroll: f32, seconds: f32) {
        for frame in 0..(seconds * 60.0) as usize {
            karmine.update(&FrameContext {
                time: frame as f32 / 60.0,
                dt: 1.0 / 60.0,
                scroll,
                viewport: VIEWPORT,
                ..Default::default()
            });
        }
    }

    fn intensities(karmine: &Karmine, kind: fn(&LightKind) -> bool) -> Vec<f32> {
        karmine
            .rig
            .scene
            .lights
            .iter()
            .filter(|(_, light)| kind(&light.kind))
            .map(|(_, light)| light.intensity)
            .collect()
    }

    #[test]
    fn lights_are_off_before_the_can_rises() {
        let mut karmine = mounted();
        run(&mut karmine, 0.0, 0.5);

        assert_eq!(karmine.rig.pose.position.y, -2.0);
        assert_eq!(karmine.rig.pose.position.z, 4.3);
        let spots = intensities(&karmine, |kind| matches!(kind, LightKind::Spot { .. }));
        assert_eq!(spots, vec![0.0; 3]);
    }

    #[test]
    fn spotlights_reach_full_intensity_at_the_end() {
        let mut karmine = mounted();
        run(&mut karmine, 5000.0, 2.0);

        assert!((karmine.rig.pose.position.y + 0.09).abs() < 1e-4);
        assert!((karmine.rig.pose.position.z - 4.83).abs() < 1e-4);

        let sides = karmine.lights.sides.map(|id| karmine.rig.scene.lights[id].intensity);
        assert!(sides.iter().all(|&intensity| (intensity - 25.0).abs() < 1e-3));
        let front = karmine.rig.scene.lights[karmine.lights.front].intensity;
        assert!((front - 15.0).abs() < 1e-3);
        let points = intensities(&karmine, |kind| matches!(kind, LightKind::Point { .. }));
        assert!(points.iter().all(|&intensity| (intensity - 8.0).abs() < 1e-3));
    }

    #[test]
    fn can_trigger_is_measured_against_the_stage() {
        let karmine = mounted();
        // 20% of the 100vh stage below its top, at the viewport center.
        assert!((karmine.trigger.start() - 560.0).abs() < 1e-3);
        assert!((karmine.trigger.end() - 1200.0).abs() < 1e-3);
    }

    #[test]
    fn can_tracks_scroll_without_lag() {
        let mut karmine = mounted();
        let quarter = karmine.trigger.start() + 160.0;
        run(&mut karmine, quarter, 1.0 / 60.0);

        assert!((karmine.rig.pose.position.z - lerp(4.3, 4.83, 0.25)).abs() < 1e-4);
        let front = karmine.rig.scene.lights[karmine.lights.front].intensity;
        assert!((front - 15.0 * 0.25).abs() < 1e-3);
    }

    #[test]
    fn lights_follow_the_can() {
        let mut karmine = mounted();
        let halfway = (karmine.trigger.start() + karmine.trigger.end()) / 2.0;
        run(&mut karmine, halfway, 2.0);

        let can_y = karmine.rig.pose.position.y;
        assert!(can_y > -2.0 && can_y < -0.09);
        for id in karmine.lights.sides {
            assert_eq!(karmine.rig.scene.lights[id].target.y, can_y);
        }
        for id in karmine.lights.points {
            assert_eq!(karmine.rig.scene.lights[id].position.y, can_y);
        }
    }

    #[test]
    fn stage_sticks_while_the_section_scrolls() {
        let karmine = mounted();
        let ctx = FrameContext {
            scroll: 800.0 + 500.0,
            viewport: VIEWPORT,
            ..Default::default()
        };
        assert_eq!(karmine.stage(&ctx), Rect::from_size(VIEWPORT));

        let ctx = FrameContext {
            scroll: 800.0 + 1440.0,
            viewport: VIEWPORT,
            ..Default::default()
        };
        assert_eq!(karmine.stage(&ctx).min.y, -800.0);
    }
}
