use std::path::PathBuf;

use clap::Parser;

use crate::media::MediaOptions;
use crate::rendering::config::RenderConfig;
use crate::scroll::SmoothScrollOptions;

#[derive(Parser, Debug, Clone)]
#[command(name = "scrollreel", version)]
#[command(about = "Scroll-driven flavor showcase rendered with wgpu")]
pub struct Config {
    /// Directory that models, media, fonts and shaders are loaded from
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Seconds a wheel gesture takes to settle
    #[arg(long, default_value_t = 1.2)]
    pub scroll_duration: f32,

    /// Pixels scrolled per wheel pixel
    #[arg(long, default_value_t = 1.0)]
    pub wheel_multiplier: f32,

    /// Apply wheel input immediately instead of easing it
    #[arg(long)]
    pub no_smooth_wheel: bool,

    /// Playback rate of frame-sequence videos
    #[arg(long, default_value_t = 24.0)]
    pub video_fps: f32,

    /// Downscale video frames wider than this at load time, 0 keeps them
    #[arg(long, default_value_t = 1280)]
    pub max_frame_width: u32,

    /// Recompile shaders when their files change
    #[arg(long)]
    pub watch_shaders: bool,

    /// Draw scroll trigger start and end markers
    #[arg(long)]
    pub markers: bool,

    /// Show the debug window
    #[arg(long)]
    pub debug: bool,
}

impl Config {
    pub fn scroll_options(&self) -> SmoothScrollOptions {
        SmoothScrollOptions {
            duration: self.scroll_duration.max(0.0),
            wheel_multiplier: self.wheel_multiplier,
            smooth_wheel: !self.no_smooth_wheel,
            ..Default::default()
        }
    }

    pub fn media_options(&self) -> MediaOptions {
        MediaOptions {
            fps: self.video_fps,
            max_frame_width: self.max_frame_width,
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            shader_root: self.assets.join("shaders"),
            watch_shaders: self.watch_shaders,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_behavior() {
        let config = Config::parse_from(["scrollreel"]);
        assert_eq!(config.assets, PathBuf::from("assets"));

        let scroll = config.scroll_options();
        assert_eq!(scroll.duration, 1.2);
        assert!(scroll.smooth_wheel);

        let render = config.render_config();
        assert_eq!(render.shader_root, PathBuf::from("assets").join("shaders"));
        assert!(!render.watch_shaders);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::parse_from([
            "scrollreel",
            "--assets",
            "/srv/page",
            "--no-smooth-wheel",
            "--wheel-multiplier",
            "2",
            "--video-fps",
            "30",
            "--watch-shaders",
            "--markers",
        ]);

        assert!(!config.scroll_options().smooth_wheel);
        assert_eq!(config.scroll_options().wheel_multiplier, 2.0);
        assert_eq!(config.media_options().fps, 30.0);
        assert_eq!(
            config.render_config().shader_root,
            PathBuf::from("/srv/page/shaders")
        );
        assert!(config.render_config().watch_shaders);
        assert!(config.markers);
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
