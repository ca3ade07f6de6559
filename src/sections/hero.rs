use glam::{Vec2, Vec4};
use imgui::{Condition, StyleColor, StyleVar};

use crate::animation::{Animatable, Ease, Position, Timeline};
use crate::math::rect::Rect;
use crate::media::{Assets, MediaClip};
use crate::rendering::layer::Layer;
use crate::scene_graph::light::color_from_hex;
use crate::scroll::{Placement, SectionSlot};
use crate::sections::text_panel::overlay_flags;
use crate::sections::{vh, FrameContext, PageRequest, Section};

const LOGO_WIDTH: f32 = 384.0;
const TEXT_WIDTH: f32 = 576.0;
const TEXT_FONT_SCALE: f32 = 1.25;
const GAP: f32 = 32.0;
const BUTTON_PADDING: [f32; 2] = [40.0, 20.0];
const LINE_HEIGHT: f32 = 28.0;
const TEXT: &str =
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Ut id ex vel tellus placerat laoreet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroKey {
    LogoOpacity,
    LogoY,
    TextOpacity,
    TextY,
    ButtonOpacity,
    ButtonY,
}

/// Opacity and vertical offset of each piece of hero content.
#[derive(Debug, Clone, Default)]
struct HeroContent {
    logo: (f32, f32),
    text: (f32, f32),
    button: (f32, f32),
}

impl Animatable for HeroContent {
    type Key = HeroKey;

    fn get(&self, key: HeroKey) -> f32 {
        match key {
            HeroKey::LogoOpacity => self.logo.0,
            HeroKey::LogoY => self.logo.1,
            HeroKey::TextOpacity => self.text.0,
            HeroKey::TextY => self.text.1,
            HeroKey::ButtonOpacity => self.button.0,
            HeroKey::ButtonY => self.button.1,
        }
    }

    fn set(&mut self, key: HeroKey, value: f32) {
        match key {
            HeroKey::LogoOpacity => self.logo.0 = value,
            HeroKey::LogoY => self.logo.1 = value,
            HeroKey::TextOpacity => self.text.0 = value,
            HeroKey::TextY => self.text.1 = value,
            HeroKey::ButtonOpacity => self.button.0 = value,
            HeroKey::ButtonY => self.button.1 = value,
        }
    }
}

/// Logo, text and button rise in one after another.
fn entrance() -> Timeline<HeroKey> {
    use HeroKey::*;

    Timeline::new()
        .from_to(
            &[(LogoOpacity, 0.0, 1.0), (LogoY, 40.0, 0.0)],
            1.0,
            Ease::POWER3_OUT,
            Position::At(0.2),
        )
        .from_to(
            &[(TextOpacity, 0.0, 1.0), (TextY, 40.0, 0.0)],
            0.8,
            Ease::POWER3_OUT,
            Position::At(0.5),
        )
        .from_to(
            &[(ButtonOpacity, 0.0, 1.0), (ButtonY, 40.0, 0.0)],
            0.8,
            Ease::POWER3_OUT,
            Position::At(0.8),
        )
}

/// Full-screen opening section over a looping video.
pub struct Hero {
    slot: SectionSlot,
    video: MediaClip,
    logo: MediaClip,
    content: HeroContent,
    entrance: Timeline<HeroKey>,
    started_at: Option<f32>,
}

impl Hero {
    pub fn new(assets: &Assets) -> Self {
        let mut hero = Self {
            slot: SectionSlot {
                index: 0,
                top: 0.0,
                height: 0.0,
            },
            video: assets.clip("video/redbullvideo"),
            logo: assets.clip("images/redbulls.png"),
            content: HeroContent::default(),
            entrance: entrance(),
            started_at: None,
        };
        hero.entrance.seek(&mut hero.content, 0.0);
        hero
    }

    fn section_rect(&self, ctx: &FrameContext) -> Rect {
        Placement::Flow.place(Rect::from_size(ctx.viewport), &self.slot, ctx.scroll)
    }

    fn logo_height(&self) -> f32 {
        LOGO_WIDTH / self.logo.aspect()
    }

    /// Top of the centered content column.
    fn column_top(&self, section: Rect) -> f32 {
        let height = self.logo_height() + GAP + 2.0 * LINE_HEIGHT + 2.0 * GAP + 68.0;
        section.center().y - height * 0.5
    }

    fn logo_rect(&self, section: Rect) -> Rect {
        Rect::new(
            section.center().x - LOGO_WIDTH * 0.5,
            self.column_top(section) + self.content.logo.1,
            LOGO_WIDTH,
            self.logo_height(),
        )
    }
}

impl Section for Hero {
    fn name(&self) -> &'static str {
        "hero"
    }

    fn height(&self, viewport: Vec2) -> f32 {
        vh(viewport, 1.0)
    }

    fn mount(&mut self, slot: &SectionSlot, _viewport: Vec2) -> anyhow::Result<()> {
        self.slot = slot.clone();
        Ok(())
    }

    fn update(&mut self, ctx: &FrameContext) {
        let started_at = *self.started_at.get_or_insert(ctx.time);
        self.entrance
            .seek(&mut self.content, ctx.time - started_at);
    }

    fn layers<'a>(&'a self, ctx: &FrameContext, out: &mut Vec<Layer<'a>>) {
        if !self.slot.is_visible(ctx.scroll, ctx.viewport) {
            return;
        }

        let section = self.section_rect(ctx);
        let black = Vec4::new(0.0, 0.0, 0.0, 1.0);
        let red = color_from_hex(0x7f1d1d).extend(1.0);

        out.push(Layer::media(0, section, &self.video, ctx.time));
        out.push(Layer::gradient(1, section, [black, black, red]).with_opacity(0.8));
        out.push(
            Layer::media(2, self.logo_rect(section), &self.logo, ctx.time)
                .with_opacity(self.content.logo.0),
        );
    }

    fn draw_ui(&mut self, ui: &imgui::Ui, ctx: &FrameContext) -> Option<PageRequest> {
        if !self.slot.is_visible(ctx.scroll, ctx.viewport) {
            return None;
        }

        let section = self.section_rect(ctx);
        let text_top = self.column_top(section) + self.logo_height() + GAP;
        let content = &self.content;
        let mut request = None;

        ui.window("##hero")
            .position(
                [section.center().x - TEXT_WIDTH * 0.5, text_top],
                Condition::Always,
            )
            .size([TEXT_WIDTH, 4.0 * LINE_HEIGHT + 3.0 * GAP + 68.0], Condition::Always)
            .flags(overlay_flags())
            .build(|| {
                ui.set_window_font_scale(TEXT_FONT_SCALE);

                {
                    let _alpha = ui.push_style_var(StyleVar::Alpha(content.text.0));
                    let lines = wrap_lines(TEXT, TEXT_WIDTH, |text| ui.calc_text_size(text)[0]);
                    for (index, line) in lines.iter().enumerate() {
                        let width = ui.calc_text_size(line)[0];
                        ui.set_cursor_pos([
                            (TEXT_WIDTH - width) * 0.5,
                            content.text.1 + index as f32 * LINE_HEIGHT,
                        ]);
                        ui.text(line);
                    }
                }

                let _alpha = ui.push_style_var(StyleVar::Alpha(content.button.0));
                let _rounding = ui.push_style_var(StyleVar::FrameRounding(12.0));
                let _padding = ui.push_style_var(StyleVar::FramePadding(BUTTON_PADDING));
                let _button = ui.push_style_color(StyleColor::Button, [1.0; 4]);
                let _hovered = ui.push_style_color(StyleColor::ButtonHovered, [0.9, 0.9, 0.9, 1.0]);
                let _active = ui.push_style_color(StyleColor::ButtonActive, [0.8, 0.8, 0.8, 1.0]);
                let _text = ui.push_style_color(StyleColor::Text, [0.0, 0.0, 0.0, 1.0]);

                let label = "fall down";
                let width = ui.calc_text_size(label)[0] + 2.0 * BUTTON_PADDING[0];
                ui.set_cursor_pos([
                    (TEXT_WIDTH - width) * 0.5,
                    2.0 * LINE_HEIGHT + 2.0 * GAP + content.button.1,
                ]);
                if ui.button(label) {
                    request = Some(PageRequest::ScrollToSection(self.slot.index + 1));
                }
            });

        request
    }

    fn clips_mut(&mut self) -> Vec<&mut MediaClip> {
        vec![&mut self.video, &mut self.logo]
    }
}

/// Greedy word wrap against a measured width.
pub fn wrap_lines(text: &str, width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }

        let candidate = format!("{line} {word}");
        if measure(&candidate) > width {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaOptions;

    fn hero() -> Hero {
        let mut hero = Hero::new(&Assets::new("does/not/exist", MediaOptions::default()));
        hero.mount(
            &SectionSlot {
                index: 0,
                top: 0.0,
                height: 800.0,
            },
            Vec2::new(1280.0, 800.0),
        )
        .unwrap();
        hero
    }

    fn at(hero: &mut Hero, time: f32) {
        hero.update(&FrameContext {
            time,
            ..Default::default()
        });
    }

    #[test]
    fn content_enters_in_order() {
        let mut hero = hero();
        assert_eq!(hero.content.logo, (0.0, 40.0));

        at(&mut hero, 10.0);
        at(&mut hero, 10.6);
        assert!(hero.content.logo.0 > hero.content.text.0);
        assert!(hero.content.text.0 > 0.0);
        assert_eq!(hero.content.button, (0.0, 40.0));

        at(&mut hero, 12.0);
        assert_eq!(hero.content.logo, (1.0, 0.0));
        assert_eq!(hero.content.text, (1.0, 0.0));
        assert_eq!(hero.content.button, (1.0, 0.0));
    }

    #[test]
    fn hero_layers_scroll_away() {
        let mut hero = hero();
        at(&mut hero, 0.0);

        let mut layers = Vec::new();
        let ctx = FrameContext {
            scroll: 300.0,
            viewport: Vec2::new(1280.0, 800.0),
            ..Default::default()
        };
        hero.layers(&ctx, &mut layers);
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].rect.min.y, -300.0);
        assert_eq!(layers[1].opacity, 0.8);

        let mut layers = Vec::new();
        let ctx = FrameContext {
            scroll: 800.0,
            ..ctx
        };
        hero.layers(&ctx, &mut layers);
        assert!(layers.is_empty());
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let measure = |text: &str| text.len() as f32;
        assert_eq!(
            wrap_lines("aa bb cc dd", 5.0, measure),
            vec!["aa bb".to_string(), "cc dd".to_string()]
        );
        assert_eq!(wrap_lines("toolongword x", 3.0, measure), vec!["toolongword", "x"]);
        assert!(wrap_lines("   ", 10.0, measure).is_empty());
    }
}
