use imgui::Condition;

use crate::config::Config;
use crate::media::Assets;
use crate::page::Page;
use crate::rendering::renderer::Renderer;
use crate::sections::{build_sections, FrameContext};

const MARKER_START: [f32; 4] = [0.2, 0.9, 0.3, 1.0];
const MARKER_END: [f32; 4] = [1.0, 0.3, 0.3, 1.0];

pub struct AppState {
    pub page: Page,
    pub show_debug: bool,
    pub show_markers: bool,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let assets = Assets::new(&config.assets, config.media_options());
        let sections = build_sections(&assets)?;

        Ok(Self {
            page: Page::new(sections, config.scroll_options()),
            show_debug: config.debug,
            show_markers: config.markers,
        })
    }

    /// Uploads every scene and clip the page holds.
    pub fn load_resources(&mut self, renderer: &mut Renderer) {
        for scene in self.page.scenes_mut() {
            renderer.load_scene(scene);
        }
        for clip in self.page.clips_mut() {
            renderer.load_clip(clip);
        }
    }
}

/// Runs one frame of page logic and builds its UI. Returns the context the
/// frame's layers should be collected with.
pub fn update(state: &mut AppState, ui: &imgui::Ui, input: FrameContext) -> FrameContext {
    let ctx = state.page.update(input);
    state.page.draw_ui(ui, &ctx);

    if state.show_markers {
        draw_markers(state, ui, &ctx);
    }
    if state.show_debug {
        debug_window(state, ui, &ctx);
    }

    ctx
}

fn debug_window(state: &mut AppState, ui: &imgui::Ui, ctx: &FrameContext) {
    let mut jump_to = None;

    ui.window("Debug")
        .position([16.0, 16.0], Condition::FirstUseEver)
        .size([280.0, 240.0], Condition::FirstUseEver)
        .build(|| {
            ui.text(format!("{:.0} fps", ui.io().framerate));
            ui.text(format!(
                "scroll {:.0} / {:.0}",
                ctx.scroll,
                state.page.layout().max_scroll()
            ));
            if let Some(pointer) = ctx.pointer {
                ui.text(format!("pointer {:.0}, {:.0}", pointer.x, pointer.y));
            }
            ui.checkbox("Trigger markers", &mut state.show_markers);

            ui.separator();
            for slot in state.page.layout().slots() {
                if ui.button(format!("{} @ {:.0}", slot.index, slot.top)) {
                    jump_to = Some(slot.index);
                }
            }
        });

    if let Some(index) = jump_to {
        state.page.scroll_to_section(index);
    }
}

/// Start and end lines of every trigger at their scroll offsets, relative
/// to the top of the viewport.
fn draw_markers(state: &AppState, ui: &imgui::Ui, ctx: &FrameContext) {
    let draw_list = ui.get_foreground_draw_list();
    let width = ctx.viewport.x;

    for (index, (name, trigger)) in state.page.triggers().into_iter().enumerate() {
        let x = width - 200.0 - (index % 4) as f32 * 24.0;

        for (offset, color, label) in [
            (trigger.start(), MARKER_START, "start"),
            (trigger.end(), MARKER_END, "end"),
        ] {
            let y = offset - ctx.scroll;
            if !(0.0..ctx.viewport.y).contains(&y) {
                continue;
            }
            draw_list
                .add_line([x, y], [width, y], color)
                .thickness(1.0)
                .build();
            draw_list.add_text([x, y + 2.0], color, format!("{name} {label}"));
        }
    }
}
