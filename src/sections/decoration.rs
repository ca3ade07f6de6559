use glam::{Vec2, Vec3};
use imgui::{Condition, StyleVar};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::{Ease, Repeat, Transition, Tween};
use crate::camera::Camera;
use crate::math::rect::Rect;
use crate::media::Assets;
use crate::rendering::layer::Layer;
use crate::scene_graph::light::Light;
use crate::scene_graph::scene::Scene;
use crate::scroll::SectionSlot;
use crate::sections::rig::{FlavorRig, Pose};
use crate::sections::text_panel::overlay_flags;
use crate::sections::{FrameContext, PageRequest, Section};

const SIZE: f32 = 240.0;
const MARGIN: f32 = 24.0;
const Z: i32 = 30;
const IDLE_SPIN_SPEED: f32 = 0.5;
const BOB_AMPLITUDE: f32 = 0.05;
const SPIN_DAMPING: f32 = 3.0;
const HOVER_DURATION: f32 = 0.2;
const TOAST_DURATION: f32 = 3.0;
const TOAST_FADE: f32 = 0.4;

/// Click counts that unlock a toast, with its title.
pub const ACHIEVEMENTS: [(u32, &str); 4] = [
    (10, "Energized"),
    (25, "Wings Unlocked"),
    (50, "Overcharged"),
    (100, "Legend"),
];

#[derive(Debug, Clone, PartialEq)]
struct Toast {
    title: &'static str,
    shown_at: f32,
}

impl Toast {
    fn opacity(&self, time: f32) -> f32 {
        let elapsed = time - self.shown_at;
        if !(0.0..TOAST_DURATION).contains(&elapsed) {
            return 0.0;
        }

        let fade_in = elapsed / TOAST_FADE;
        let fade_out = (TOAST_DURATION - elapsed) / TOAST_FADE;
        fade_in.min(fade_out).min(1.0)
    }
}

/// A small can in the bottom-left corner that can be poked.
pub struct Decoration {
    rig: FlavorRig,
    rng: StdRng,
    highlight: Transition,
    hovered: bool,
    spin: f32,
    spin_velocity: f32,
    punch: Option<(Tween, f32)>,
    clicks: u32,
    toast: Option<Toast>,
    time: f32,
}

impl Decoration {
    pub fn new(assets: &Assets) -> Self {
        Self::with_rng(assets, StdRng::from_entropy())
    }

    pub fn with_rng(assets: &Assets, rng: StdRng) -> Self {
        let mut rig = FlavorRig::load(assets, "decoration", Pose::default());
        rig.camera = Camera::perspective(75.0, Vec3::new(0.0, 0.0, 3.0)).looking_at(Vec3::ZERO);
        rig.scene.add_light(Light::ambient(0xffffff, 0.6));
        rig.scene
            .add_light(Light::directional(0xffffff, 1.5, Vec3::new(2.0, 3.0, 4.0)));

        Self {
            rig,
            rng,
            highlight: Transition::new(0.0),
            hovered: false,
            spin: 0.0,
            spin_velocity: 0.0,
            punch: None,
            clicks: 0,
            toast: None,
            time: 0.0,
        }
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    /// Fixed to the bottom-left corner of the viewport, below the panel
    /// titles and left of the panel bodies.
    pub fn rect(viewport: Vec2) -> Rect {
        Rect::new(
            MARGIN,
            viewport.y - SIZE - MARGIN,
            SIZE,
            SIZE,
        )
    }

    fn is_hovering(&self, ctx: &FrameContext) -> bool {
        if ctx.pointer_over_ui {
            return false;
        }
        let Some(pointer) = ctx.pointer else {
            return false;
        };

        let rect = Self::rect(ctx.viewport);
        if !rect.contains(pointer) {
            return false;
        }

        let ray = self.rig.camera.ray_from_ndc(rect.to_ndc(pointer), rect.size);
        self.rig.scene.pick(&ray).is_some()
    }

    /// Registers a click at `time`. Returns the achievement it unlocked, if
    /// any.
    pub fn click(&mut self, time: f32) -> Option<&'static str> {
        self.clicks += 1;

        let punch = Tween::new(1.0, 1.25, 0.15, Ease::default())
            .repeat(Repeat::Count(1))
            .yoyo(true);
        self.punch = Some((punch, time));

        let impulse = self.rng.gen_range(4.0..8.0);
        self.spin_velocity += if self.rng.gen_bool(0.5) {
            impulse
        } else {
            -impulse
        };

        let &(_, title) = ACHIEVEMENTS
            .iter()
            .find(|(threshold, _)| *threshold == self.clicks)?;
        log::info!("Achievement unlocked after {} clicks: {}", self.clicks, title);
        self.toast = Some(Toast {
            title,
            shown_at: time,
        });
        Some(title)
    }

    fn scale(&self, time: f32) -> f32 {
        match &self.punch {
            Some((tween, started_at)) => tween.sample(time - started_at),
            None => 1.0,
        }
    }
}

impl Section for Decoration {
    fn name(&self) -> &'static str {
        "decoration"
    }

    fn height(&self, _viewport: Vec2) -> f32 {
        0.0
    }

    fn mount(&mut self, _slot: &SectionSlot, _viewport: Vec2) -> anyhow::Result<()> {
        Ok(())
    }

    fn update(&mut self, ctx: &FrameContext) {
        self.time = ctx.time;
        self.hovered = self.is_hovering(ctx);
        if self.hovered && ctx.clicked {
            self.click(ctx.time);
        }

        self.highlight
            .animate_to(if self.hovered { 1.0 } else { 0.0 }, HOVER_DURATION);
        self.highlight.update(ctx.dt);

        self.spin += self.spin_velocity * ctx.dt;
        self.spin_velocity *= (-SPIN_DAMPING * ctx.dt).exp();

        if self
            .punch
            .as_ref()
            .is_some_and(|(tween, started_at)| tween.is_complete(ctx.time - started_at))
        {
            self.punch = None;
        }

        let mut pose = Pose::default();
        pose.rotation.y = ctx.time * IDLE_SPIN_SPEED + self.spin;
        pose.position.y = (ctx.time * 2.0).sin() * BOB_AMPLITUDE;
        pose.scale = self.scale(ctx.time);
        self.rig.pose = pose;
        self.rig.apply(ctx.time);

        if let Some(model) = self.rig.model {
            self.rig.scene.set_highlight(model, self.highlight.value());
        }
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| ctx.time - toast.shown_at >= TOAST_DURATION)
        {
            self.toast = None;
        }
    }

    fn layers<'a>(&'a self, ctx: &FrameContext, out: &mut Vec<Layer<'a>>) {
        out.push(Layer::scene(
            Z,
            Self::rect(ctx.viewport),
            &self.rig.scene,
            &self.rig.camera,
        ));
    }

    fn draw_ui(&mut self, ui: &imgui::Ui, ctx: &FrameContext) -> Option<PageRequest> {
        let rect = Self::rect(ctx.viewport);

        ui.window("##decoration-counter")
            .position([rect.min.x, rect.min.y - 36.0], Condition::Always)
            .size([SIZE, 32.0], Condition::Always)
            .flags(overlay_flags())
            .build(|| {
                let label = format!("{} clicks", self.clicks);
                let width = ui.calc_text_size(&label)[0];
                ui.set_cursor_pos([(SIZE - width) * 0.5, 6.0]);
                ui.text_colored([1.0, 1.0, 1.0, 0.8], label);
            });

        if let Some(toast) = &self.toast {
            let opacity = toast.opacity(self.time);
            let size = [320.0, 72.0];

            ui.window("##decoration-toast")
                .position(
                    [(ctx.viewport.x - size[0]) * 0.5, 48.0],
                    Condition::Always,
                )
                .size(size, Condition::Always)
                .flags(overlay_flags() & !imgui::WindowFlags::NO_BACKGROUND)
                .build(|| {
                    let _alpha = ui.push_style_var(StyleVar::Alpha(opacity));
                    ui.text_colored([1.0, 0.8, 0.2, 1.0], "Achievement unlocked");
                    ui.text(toast.title);
                });
        }

        None
    }

    fn scenes_mut(&mut self) -> Vec<&mut Scene> {
        vec![&mut self.rig.scene]
    }
}
