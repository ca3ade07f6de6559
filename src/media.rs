use std::path::{Path, PathBuf};

use anyhow::Context;
use glam::{UVec2, Vec2};
use image::{imageops::FilterType, RgbaImage};
use rayon::prelude::*;

use crate::rendering::texture::ClipTextureId;

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Clone)]
pub struct MediaOptions {
    /// Playback rate of frame sequences.
    pub fps: f32,
    /// Frames wider than this are downscaled at load time.
    pub max_frame_width: u32,
}

impl Default for MediaOptions {
    fn default() -> Self {
        Self {
            fps: 24.0,
            max_frame_width: 1280,
        }
    }
}

/// Resolves asset paths relative to the asset root.
#[derive(Debug, Clone)]
pub struct Assets {
    root: PathBuf,
    media: MediaOptions,
}

impl Assets {
    pub fn new(root: impl Into<PathBuf>, media: MediaOptions) -> Self {
        Self {
            root: root.into(),
            media,
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn clip(&self, relative: &str) -> MediaClip {
        MediaClip::load(&self.path(relative), &self.media)
    }
}

/// A muted, looping video decoded to a frame sequence, or a still image as a
/// one-frame clip.
pub struct MediaClip {
    name: String,
    frames: Vec<RgbaImage>,
    fps: f32,
    /// Set by the renderer once the GPU texture exists.
    pub render_texture: Option<ClipTextureId>,
}

impl MediaClip {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames: Vec::new(),
            fps: 0.0,
            render_texture: None,
        }
    }

    pub fn from_frames(name: impl Into<String>, frames: Vec<RgbaImage>, fps: f32) -> Self {
        Self {
            name: name.into(),
            frames,
            fps,
            render_texture: None,
        }
    }

    /// Loads a frame directory or a single image. Failures are logged and
    /// produce an empty clip, which draws nothing.
    pub fn load(path: &Path, options: &MediaOptions) -> Self {
        let name = path.to_string_lossy().to_string();

        match load_frames(path, options.max_frame_width) {
            Ok(frames) => {
                log::info!("Loaded {} ({} frames)", name, frames.len());
                Self::from_frames(name, frames, options.fps)
            }
            Err(error) => {
                log::warn!("Media unavailable, skipping {}: {:#}", name, error);
                Self::empty(name)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn size(&self) -> Option<UVec2> {
        self.frames
            .first()
            .map(|frame| UVec2::new(frame.width(), frame.height()))
    }

    pub fn aspect(&self) -> f32 {
        match self.size() {
            Some(size) if size.y > 0 => size.x as f32 / size.y as f32,
            _ => 1.0,
        }
    }

    /// Index of the frame shown at `time` seconds, looping.
    pub fn frame_index(&self, time: f32) -> Option<usize> {
        if self.frames.is_empty() {
            return None;
        }

        let frame = (time.max(0.0) * self.fps) as usize;
        Some(frame % self.frames.len())
    }

    pub fn frame(&self, index: usize) -> Option<&RgbaImage> {
        self.frames.get(index)
    }
}

fn load_frames(path: &Path, max_frame_width: u32) -> anyhow::Result<Vec<RgbaImage>> {
    if !path.is_dir() {
        return Ok(vec![decode_frame(path, max_frame_width)?]);
    }

    let mut paths = std::fs::read_dir(path)
        .with_context(|| format!("Failed to read frame directory {}", path.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect::<Vec<_>>();
    paths.sort();

    if paths.is_empty() {
        anyhow::bail!("No frames in {}", path.display());
    }

    paths
        .par_iter()
        .map(|path| decode_frame(path, max_frame_width))
        .collect()
}

fn decode_frame(path: &Path, max_frame_width: u32) -> anyhow::Result<RgbaImage> {
    let image =
        image::open(path).with_context(|| format!("Failed to decode {}", path.display()))?;

    let image = if max_frame_width > 0 && image.width() > max_frame_width {
        let height = (image.height() as u64 * max_frame_width as u64 / image.width() as u64)
            .max(1) as u32;
        image.resize_exact(max_frame_width, height, FilterType::Triangle)
    } else {
        image
    };

    Ok(image.to_rgba8())
}

/// UV offset and scale that crop a frame to fill a box without distortion
/// (`object-fit: cover`).
pub fn cover_uv(frame_aspect: f32, box_aspect: f32) -> (Vec2, Vec2) {
    if frame_aspect <= 0.0 || box_aspect <= 0.0 {
        return (Vec2::ZERO, Vec2::ONE);
    }

    let scale = if frame_aspect > box_aspect {
        Vec2::new(box_aspect / frame_aspect, 1.0)
    } else {
        Vec2::new(1.0, frame_aspect / box_aspect)
    };

    ((Vec2::ONE - scale) * 0.5, scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_crops_the_longer_axis() {
        let (offset, scale) = cover_uv(16.0 / 9.0, 1.0);
        assert!((scale.x - 0.5625).abs() < 1e-5);
        assert_eq!(scale.y, 1.0);
        assert!((offset.x - 0.21875).abs() < 1e-5);

        let (offset, scale) = cover_uv(1.0, 2.0);
        assert_eq!(scale, Vec2::new(1.0, 0.5));
        assert_eq!(offset, Vec2::new(0.0, 0.25));

        assert_eq!(cover_uv(2.0, 2.0), (Vec2::ZERO, Vec2::ONE));
    }

    #[test]
    fn frames_loop() {
        let frames = vec![RgbaImage::new(2, 1); 3];
        let clip = MediaClip::from_frames("test", frames, 10.0);
        assert_eq!(clip.frame_index(0.0), Some(0));
        assert_eq!(clip.frame_index(0.25), Some(2));
        assert_eq!(clip.frame_index(0.35), Some(0));
        assert_eq!(clip.aspect(), 2.0);
    }

    #[test]
    fn missing_media_is_empty() {
        let clip = MediaClip::load(Path::new("does/not/exist.mp4"), &MediaOptions::default());
        assert!(clip.is_empty());
        assert_eq!(clip.frame_index(1.0), None);
        assert_eq!(clip.aspect(), 1.0);
    }

    #[test]
    fn frame_directory_loads_sorted_and_downscaled() {
        let dir = std::env::temp_dir().join(format!("scrollreel-frames-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for (index, shade) in [(1, 200u8), (0, 100u8)] {
            let frame = RgbaImage::from_pixel(8, 4, image::Rgba([shade, 0, 0, 255]));
            frame.save(dir.join(format!("frame_{index:03}.png"))).unwrap();
        }
        std::fs::write(dir.join("notes.txt"), "not a frame").unwrap();

        let clip = MediaClip::load(
            &dir,
            &MediaOptions {
                fps: 24.0,
                max_frame_width: 4,
            },
        );
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(clip.size(), Some(UVec2::new(4, 2)));
        assert_eq!(clip.frame(0).unwrap().get_pixel(0, 0)[0], 100);
        assert_eq!(clip.frame(1).unwrap().get_pixel(0, 0)[0], 200);
    }
}
