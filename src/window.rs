use std::path::Path;
use std::{sync::Arc, time::Instant};

use anyhow::Context;
use glam::Vec2;
use imgui::{FontConfig, FontSource};
use imgui_winit_support::WinitPlatform;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, ModifiersState, NamedKey},
    window::{Window, WindowId},
};

use crate::{
    config::Config,
    engine::{self, AppState},
    page::ScrollKey,
    rendering::renderer::Renderer,
    sections::FrameContext,
};

const FONT_SIZE: f32 = 20.0;
/// Pixels per wheel line, for mice that report lines.
const WHEEL_LINE: f32 = 100.0;
/// Longest frame step fed to animations, so a stall doesn't skip them.
const MAX_DT: f32 = 0.1;

struct ImguiState {
    context: imgui::Context,
    platform: WinitPlatform,
}

struct App {
    config: Config,
    renderer: Option<Renderer>,
    state: AppState,
    imgui: Option<ImguiState>,
    pointer: Option<Vec2>,
    clicked: bool,
    modifiers: ModifiersState,
    start: Instant,
    last_frame: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config, state: AppState) -> Self {
        Self {
            config,
            renderer: None,
            state,
            imgui: None,
            pointer: None,
            clicked: false,
            modifiers: ModifiersState::empty(),
            start: Instant::now(),
            last_frame: Instant::now(),
            error: None,
        }
    }

    fn setup_imgui(&mut self, window: &Window) {
        let mut context = imgui::Context::create();
        let mut platform = WinitPlatform::new(&mut context);
        // Overlay layout is done in physical pixels, like the layers.
        platform.attach_window(
            context.io_mut(),
            window,
            imgui_winit_support::HiDpiMode::Locked(1.0),
        );

        let config = Some(FontConfig {
            oversample_h: 2,
            pixel_snap_h: true,
            size_pixels: FONT_SIZE,
            ..Default::default()
        });
        match load_font(&self.config.assets.join("fonts")) {
            Some(data) => {
                context.fonts().add_font(&[FontSource::TtfData {
                    data: &data,
                    size_pixels: FONT_SIZE,
                    config,
                }]);
            }
            None => {
                context
                    .fonts()
                    .add_font(&[FontSource::DefaultFontData { config }]);
            }
        }

        // Disable INI support because it's broken in the published version of imgui
        context.set_ini_filename(None);

        self.imgui = Some(ImguiState { context, platform });
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("scrollreel")
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = event_loop
            .create_window(window_attributes)
            .context("Failed to create window")?;
        self.setup_imgui(&window);

        let imgui = self.imgui.as_mut().context("Imgui is not set up")?;
        let mut renderer = pollster::block_on(Renderer::new(
            Arc::new(window),
            &self.config.render_config(),
            &mut imgui.context,
        ))
        .context("Failed to create renderer")?;

        self.state.load_resources(&mut renderer);
        self.state.page.mount(renderer.resolution())?;
        renderer.window.request_redraw();
        self.renderer = Some(renderer);

        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn on_key(&mut self, key: &Key) {
        let key = match key {
            Key::Named(NamedKey::ArrowUp) => ScrollKey::Up,
            Key::Named(NamedKey::ArrowDown) => ScrollKey::Down,
            Key::Named(NamedKey::PageUp) => ScrollKey::PageUp,
            Key::Named(NamedKey::PageDown) => ScrollKey::PageDown,
            Key::Named(NamedKey::Space) if self.modifiers.shift_key() => ScrollKey::PageUp,
            Key::Named(NamedKey::Space) => ScrollKey::PageDown,
            Key::Named(NamedKey::Home) => ScrollKey::Home,
            Key::Named(NamedKey::End) => ScrollKey::End,
            _ => return,
        };
        self.state.page.on_key(key);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(renderer), Some(imgui)) = (self.renderer.as_mut(), self.imgui.as_mut()) else {
            return;
        };

        let now = Instant::now();
        let delta_time = now - self.last_frame;
        self.last_frame = now;
        imgui.context.io_mut().update_delta_time(delta_time);
        let pointer_over_ui = imgui.context.io().want_capture_mouse;

        renderer.window.request_redraw();

        if let Err(error) = imgui
            .platform
            .prepare_frame(imgui.context.io_mut(), &renderer.window)
        {
            log::warn!("Failed to prepare imgui frame: {}", error);
        }

        let ui = imgui.context.new_frame();
        let input = FrameContext {
            time: self.start.elapsed().as_secs_f32(),
            dt: delta_time.as_secs_f32().min(MAX_DT),
            pointer: self.pointer,
            clicked: std::mem::take(&mut self.clicked),
            pointer_over_ui,
            ..Default::default()
        };
        let ctx = engine::update(&mut self.state, ui, input);
        imgui.platform.prepare_render(ui, &renderer.window);

        let layers = self.state.page.layers(&ctx);
        match renderer.render(&layers, ctx.time, ctx.scroll, &mut imgui.context) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.resize(renderer.size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory");
                event_loop.exit();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timeout");
            }
            Err(other) => {
                log::error!("Unexpected error: {:?}", other);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        if let Err(error) = self.init(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(*new_size);
                    if let Err(error) = self.state.page.resize(renderer.resolution()) {
                        self.fail(event_loop, error);
                        return;
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let pixels = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * WHEEL_LINE,
                    MouseScrollDelta::PixelDelta(position) => -position.y as f32,
                };
                self.state.page.on_wheel(pixels);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                self.on_key(&event.logical_key);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = Some(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer = None;
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.clicked = true;
            }
            _ => (),
        }

        if let (Some(renderer), Some(imgui)) = (self.renderer.as_ref(), self.imgui.as_mut()) {
            imgui.platform.handle_event::<()>(
                imgui.context.io_mut(),
                &renderer.window,
                &Event::WindowEvent { window_id, event },
            );
        }
    }
}

/// First `.ttf` in `dir`, by name.
fn load_font(dir: &Path) -> Option<Vec<u8>> {
    let mut fonts = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "ttf"))
        .collect::<Vec<_>>();
    fonts.sort();

    let path = fonts.first()?;
    match std::fs::read(path) {
        Ok(data) => {
            log::info!("Using font {}", path.display());
            Some(data)
        }
        Err(error) => {
            log::warn!("Failed to read font {}: {}", path.display(), error);
            None
        }
    }
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let state = AppState::new(&config).context("Failed to create page")?;
    let mut app = App::new(config, state);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
