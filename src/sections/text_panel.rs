use glam::Vec2;
use imgui::{Condition, StyleColor, StyleVar, WindowFlags};

use crate::animation::{Animatable, Ease, Playhead, Position, Timeline, Transition};
use crate::math::rect::Rect;
use crate::scroll::trigger::TriggerParseError;
use crate::scroll::{ElementBounds, Scrub, ScrollTrigger};
use crate::sections::decoration::Decoration;
use crate::sections::FrameContext;

const TITLE_FONT_SCALE: f32 = 2.25;
const BODY_FONT_SCALE: f32 = 1.25;
const BODY_WIDTH: f32 = 448.0;
const BODY_RIGHT_MARGIN: f32 = 96.0;
const TITLE_TOP: f32 = 112.0;
const TITLE_SLIDE: f32 = 100.0;
const TITLE_HEIGHT: f32 = 160.0;
const SEPARATOR_LENGTHS: [f32; 2] = [600.0, 207.0];
const HOVER_SCALE: f32 = 1.15;
const SHRUNK_SCALE: f32 = 0.9;
const HOVER_DURATION: f32 = 0.2;
const FADE_DURATION: f32 = 0.5;

/// A run of text, optionally drawn in the panel's accent color.
#[derive(Debug, Clone, Copy)]
pub struct Span {
    pub text: &'static str,
    pub accent: bool,
}

pub const fn plain(text: &'static str) -> Span {
    Span {
        text,
        accent: false,
    }
}

pub const fn accent(text: &'static str) -> Span {
    Span { text, accent: true }
}

#[derive(Debug, Clone, Copy)]
pub struct PanelCopy {
    /// Unique, used for window ids.
    pub id: &'static str,
    pub title: &'static [Span],
    pub main: &'static [Span],
    pub description: &'static [Span],
    pub cta: &'static str,
    /// `0xRRGGBB`.
    pub accent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    TitleX,
    TitleOpacity,
    SeparatorX,
    SeparatorOpacity,
    MainX,
    MainOpacity,
    DescriptionX,
    DescriptionOpacity,
    CtaY,
    CtaOpacity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementState {
    pub offset: Vec2,
    pub opacity: f32,
}

#[derive(Debug, Clone, Default)]
pub struct TextElements {
    pub title: ElementState,
    pub separators: ElementState,
    pub main: ElementState,
    pub description: ElementState,
    pub cta: ElementState,
}

impl Animatable for TextElements {
    type Key = TextKey;

    fn get(&self, key: TextKey) -> f32 {
        match key {
            TextKey::TitleX => self.title.offset.x,
            TextKey::TitleOpacity => self.title.opacity,
            TextKey::SeparatorX => self.separators.offset.x,
            TextKey::SeparatorOpacity => self.separators.opacity,
            TextKey::MainX => self.main.offset.x,
            TextKey::MainOpacity => self.main.opacity,
            TextKey::DescriptionX => self.description.offset.x,
            TextKey::DescriptionOpacity => self.description.opacity,
            TextKey::CtaY => self.cta.offset.y,
            TextKey::CtaOpacity => self.cta.opacity,
        }
    }

    fn set(&mut self, key: TextKey, value: f32) {
        match key {
            TextKey::TitleX => self.title.offset.x = value,
            TextKey::TitleOpacity => self.title.opacity = value,
            TextKey::SeparatorX => self.separators.offset.x = value,
            TextKey::SeparatorOpacity => self.separators.opacity = value,
            TextKey::MainX => self.main.offset.x = value,
            TextKey::MainOpacity => self.main.opacity = value,
            TextKey::DescriptionX => self.description.offset.x = value,
            TextKey::DescriptionOpacity => self.description.opacity = value,
            TextKey::CtaY => self.cta.offset.y = value,
            TextKey::CtaOpacity => self.cta.opacity = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hovered {
    Main,
    Description,
}

/// Slide-in of every element, scrubbed by scroll. Each element group is a
/// separate scrubbed tween, so all of them span the whole trigger range.
fn entrance_timeline() -> Timeline<TextKey> {
    use TextKey::*;
    let ease = Ease::default();
    let groups: [&[(TextKey, f32, f32)]; 5] = [
        &[(TitleX, -100.0, 0.0), (TitleOpacity, 0.0, 1.0)],
        &[(SeparatorX, 100.0, 0.0), (SeparatorOpacity, 0.0, 1.0)],
        &[(MainX, 100.0, 0.0), (MainOpacity, 0.0, 1.0)],
        &[(DescriptionX, 100.0, 0.0), (DescriptionOpacity, 0.0, 1.0)],
        &[(CtaY, 20.0, 0.0), (CtaOpacity, 0.0, 1.0)],
    ];

    groups
        .into_iter()
        .fold(Timeline::new(), |timeline, group| {
            timeline.from_to(group, 1.0, ease, Position::At(0.0))
        })
}

/// Title, separators, main text, description and call to action of a flavor
/// section. The container fades in while its section is in the middle of the
/// viewport.
pub struct TextPanel {
    copy: PanelCopy,
    elements: TextElements,
    timeline: Timeline<TextKey>,
    trigger: ScrollTrigger,
    container: Playhead,
    main_scale: Transition,
    description_scale: Transition,
    hovered: Option<Hovered>,
}

impl TextPanel {
    pub fn new(copy: PanelCopy) -> Result<Self, TriggerParseError> {
        let trigger = ScrollTrigger::new("top center", "bottom center")?
            .with_scrub(Scrub::Smoothed(1.0))
            .with_toggle_actions("play reverse play reverse".parse()?);

        let mut panel = Self {
            copy,
            elements: TextElements::default(),
            timeline: entrance_timeline(),
            trigger,
            container: Playhead::new(FADE_DURATION),
            main_scale: Transition::new(1.0),
            description_scale: Transition::new(1.0),
            hovered: None,
        };
        panel.timeline.set_progress(&mut panel.elements, 0.0);

        Ok(panel)
    }

    pub fn refresh(&mut self, bounds: ElementBounds, viewport_height: f32) {
        self.trigger.refresh(bounds, viewport_height);
    }

    pub fn trigger(&self) -> &ScrollTrigger {
        &self.trigger
    }

    pub fn opacity(&self) -> f32 {
        self.container.progress()
    }

    pub fn update(&mut self, ctx: &FrameContext) {
        for event in self.trigger.update(ctx.scroll, ctx.dt) {
            self.container
                .apply(self.trigger.toggle_actions().action_for(event));
        }
        self.container.update(ctx.dt);

        self.timeline
            .set_progress(&mut self.elements, self.trigger.progress());

        let (main, description) = match self.hovered {
            Some(Hovered::Main) => (HOVER_SCALE, SHRUNK_SCALE),
            Some(Hovered::Description) => (SHRUNK_SCALE, HOVER_SCALE),
            None => (1.0, 1.0),
        };
        self.main_scale.animate_to(main, HOVER_DURATION);
        self.description_scale.animate_to(description, HOVER_DURATION);
        self.main_scale.update(ctx.dt);
        self.description_scale.update(ctx.dt);
    }

    /// Draws the panel inside `frame`, the screen rectangle it is laid out
    /// in.
    pub fn draw(&mut self, ui: &imgui::Ui, frame: Rect, ctx: &FrameContext) {
        let opacity = self.opacity();
        if opacity <= 0.001 {
            self.hovered = None;
            return;
        }

        let accent_color = ui_color(self.copy.accent, 1.0);
        // The decoration sits above the panels, so they let the pointer
        // through over its corner.
        let mut flags = overlay_flags();
        if ctx
            .pointer
            .is_some_and(|pointer| Decoration::rect(ctx.viewport).contains(pointer))
        {
            flags |= WindowFlags::NO_MOUSE_INPUTS;
        }
        let elements = &self.elements;
        let copy = &self.copy;

        let title = title_rect(frame);
        ui.window(format!("##{}-title", copy.id))
            .position(title.min.to_array(), Condition::Always)
            .size(title.size.to_array(), Condition::Always)
            .flags(flags)
            .build(|| {
                let _alpha = ui.push_style_var(StyleVar::Alpha(opacity * elements.title.opacity));
                ui.set_window_font_scale(TITLE_FONT_SCALE);
                ui.set_cursor_pos([TITLE_SLIDE + elements.title.offset.x, 0.0]);
                rich_text(ui, copy.title, f32::MAX, accent_color);
            });

        let body = body_rect(frame);
        let main_scale = self.main_scale.value();
        let description_scale = self.description_scale.value();
        let separator_color = [1.0, 1.0, 1.0, opacity * elements.separators.opacity];
        let mut hovered = None;

        ui.window(format!("##{}-body", copy.id))
            .position(body.min.to_array(), Condition::Always)
            .size(body.size.to_array(), Condition::Always)
            .flags(flags)
            .build(|| {
                let draw_list = ui.get_window_draw_list();
                let separator = |x: f32, length: f32| {
                    let [_, y] = ui.cursor_screen_pos();
                    let x = x + elements.separators.offset.x;
                    draw_list
                        .add_line([x, y], [x + length, y], separator_color)
                        .thickness(2.0)
                        .build();
                };
                let left = ui.cursor_screen_pos()[0];

                {
                    let _alpha = ui.push_style_var(StyleVar::Alpha(opacity * elements.main.opacity));
                    ui.set_window_font_scale(BODY_FONT_SCALE * main_scale);
                    ui.set_cursor_pos([elements.main.offset.x, ui.cursor_pos()[1]]);
                    ui.group(|| rich_text(ui, copy.main, BODY_WIDTH, accent_color));
                    if ui.is_item_hovered() {
                        hovered = Some(Hovered::Main);
                    }
                }

                ui.dummy([0.0, 32.0]);
                separator(left, SEPARATOR_LENGTHS[0]);
                ui.dummy([0.0, 16.0]);

                {
                    let _alpha = ui.push_style_var(StyleVar::Alpha(
                        opacity * elements.description.opacity,
                    ));
                    ui.set_window_font_scale(BODY_FONT_SCALE * description_scale);
                    ui.set_cursor_pos([elements.description.offset.x, ui.cursor_pos()[1]]);
                    ui.group(|| rich_text(ui, copy.description, BODY_WIDTH, accent_color));
                    if ui.is_item_hovered() {
                        hovered = Some(Hovered::Description);
                    }
                }

                ui.dummy([0.0, 48.0]);

                {
                    let _alpha = ui.push_style_var(StyleVar::Alpha(opacity * elements.cta.opacity));
                    let _rounding = ui.push_style_var(StyleVar::FrameRounding(8.0));
                    let _border = ui.push_style_var(StyleVar::FrameBorderSize(1.0));
                    let _padding = ui.push_style_var(StyleVar::FramePadding([24.0, 12.0]));
                    let _button = ui.push_style_color(StyleColor::Button, [0.0; 4]);
                    let _hovered = ui.push_style_color(StyleColor::ButtonHovered, [0.0; 4]);
                    let _active = ui.push_style_color(StyleColor::ButtonActive, [0.0; 4]);
                    let border = if ui.is_mouse_hovering_rect(
                        ui.cursor_screen_pos(),
                        [left + BODY_WIDTH, ui.cursor_screen_pos()[1] + 48.0],
                    ) {
                        accent_color
                    } else {
                        ui_color(copy.accent, 0.3)
                    };
                    let _border_color = ui.push_style_color(StyleColor::Border, border);
                    let _text = ui.push_style_color(StyleColor::Text, [1.0, 1.0, 1.0, 0.7]);

                    ui.set_window_font_scale(BODY_FONT_SCALE);
                    let [x, y] = ui.cursor_pos();
                    ui.set_cursor_pos([x, y + elements.cta.offset.y]);
                    if ui.button(copy.cta) {
                        log::info!("{}: {} clicked", copy.id, copy.cta);
                    }
                }

                ui.same_line();
                let [_, top] = ui.item_rect_min();
                let [_, bottom] = ui.item_rect_max();
                ui.set_cursor_screen_pos([left, (top + bottom) * 0.5]);
                separator(left + BODY_WIDTH - SEPARATOR_LENGTHS[1], SEPARATOR_LENGTHS[1]);
            });

        self.hovered = hovered;
    }
}

/// Screen rect of the title window. It starts left of the title so the title
/// can slide in from there.
pub fn title_rect(frame: Rect) -> Rect {
    Rect::new(
        frame.min.x + frame.size.x * 0.17 - TITLE_SLIDE,
        frame.min.y + TITLE_TOP,
        frame.size.x * 0.66 + TITLE_SLIDE,
        TITLE_HEIGHT,
    )
}

/// Screen rect of the body column, from 40% down the frame to its right
/// edge. The long separator runs past the column and is clipped there.
pub fn body_rect(frame: Rect) -> Rect {
    Rect::new(
        frame.max().x - BODY_RIGHT_MARGIN - BODY_WIDTH,
        frame.min.y + frame.size.y * 0.4,
        BODY_WIDTH + BODY_RIGHT_MARGIN,
        frame.size.y * 0.6,
    )
}

pub fn overlay_flags() -> WindowFlags {
    WindowFlags::NO_DECORATION
        | WindowFlags::NO_BACKGROUND
        | WindowFlags::NO_MOVE
        | WindowFlags::NO_SAVED_SETTINGS
        | WindowFlags::NO_FOCUS_ON_APPEARING
        | WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS
        | WindowFlags::NO_NAV
        | WindowFlags::NO_SCROLL_WITH_MOUSE
}

/// `0xRRGGBB` as an imgui color.
pub fn ui_color(hex: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), alpha]
}

/// Word-wrapped text where accent spans change color mid-line.
pub fn rich_text(ui: &imgui::Ui, spans: &[Span], wrap_width: f32, accent_color: [f32; 4]) {
    let white = [1.0, 1.0, 1.0, 1.0];
    let space = ui.calc_text_size(" ")[0];
    let mut line_width = 0.0;

    for span in spans {
        let color = if span.accent { accent_color } else { white };

        for word in span.text.split_whitespace() {
            let width = ui.calc_text_size(word)[0];

            if line_width > 0.0 {
                if line_width + space + width > wrap_width {
                    line_width = 0.0;
                } else {
                    ui.same_line_with_spacing(0.0, space);
                    line_width += space;
                }
            }

            ui.text_colored(color, word);
            line_width += width;
        }
    }
}
