use glam::{Vec2, Vec4};

use crate::camera::Camera;
use crate::math::rect::Rect;
use crate::media::MediaClip;
use crate::scene_graph::scene::Scene;

pub enum LayerContent<'a> {
    /// Current frame of a clip, cropped to cover the rectangle.
    Media { clip: &'a MediaClip, time: f32 },
    /// Vertical three-stop gradient, top to bottom. Colors are linear RGBA.
    Gradient { colors: [Vec4; 3] },
    /// A 3D scene rendered into the rectangle with a transparent background.
    Scene { scene: &'a Scene, camera: &'a Camera },
}

/// One composited element of a frame. Layers are drawn back to front by
/// `z`, ties keep submission order.
pub struct Layer<'a> {
    pub z: i32,
    pub rect: Rect,
    pub opacity: f32,
    /// Rounded corner radius in pixels, quads only.
    pub corner_radius: f32,
    /// Color multiplier, quads only.
    pub brightness: f32,
    pub content: LayerContent<'a>,
}

impl<'a> Layer<'a> {
    fn new(z: i32, rect: Rect, content: LayerContent<'a>) -> Self {
        Self {
            z,
            rect,
            opacity: 1.0,
            corner_radius: 0.0,
            brightness: 1.0,
            content,
        }
    }

    pub fn media(z: i32, rect: Rect, clip: &'a MediaClip, time: f32) -> Self {
        Self::new(z, rect, LayerContent::Media { clip, time })
    }

    pub fn solid(z: i32, rect: Rect, color: Vec4) -> Self {
        Self::gradient(z, rect, [color; 3])
    }

    pub fn gradient(z: i32, rect: Rect, colors: [Vec4; 3]) -> Self {
        Self::new(z, rect, LayerContent::Gradient { colors })
    }

    pub fn scene(z: i32, rect: Rect, scene: &'a Scene, camera: &'a Camera) -> Self {
        Self::new(z, rect, LayerContent::Scene { scene, camera })
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius.max(0.0);
        self
    }

    pub fn with_brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness.max(0.0);
        self
    }

    /// Whether drawing the layer can change any pixel of a `screen`-sized
    /// target.
    pub fn is_visible(&self, screen: Vec2) -> bool {
        if self.opacity <= 0.0 || self.rect.is_empty() {
            return false;
        }
        if let LayerContent::Media { clip, .. } = self.content {
            if clip.is_empty() {
                return false;
            }
        }

        self.rect.intersect(&Rect::from_size(screen)).is_some()
    }
}

/// Drops invisible layers and orders the rest for drawing.
pub fn composite_order<'l, 'a>(layers: &'l [Layer<'a>], screen: Vec2) -> Vec<&'l Layer<'a>> {
    let mut visible = layers
        .iter()
        .filter(|layer| layer.is_visible(screen))
        .collect::<Vec<_>>();
    visible.sort_by_key(|layer| layer.z);
    visible
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn layers_sort_by_z_keeping_submission_order() {
        let full = Rect::from_size(SCREEN);
        let layers = vec![
            Layer::solid(20, full, Vec4::ONE),
            Layer::solid(-10, full, Vec4::ONE),
            Layer::solid(0, full, Vec4::ZERO),
            Layer::solid(0, full, Vec4::ONE),
        ];

        let order = composite_order(&layers, SCREEN)
            .iter()
            .map(|layer| (layer.z, layer.content_color()))
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![(-10, 1.0), (0, 0.0), (0, 1.0), (20, 1.0)]
        );
    }

    #[test]
    fn invisible_layers_are_skipped() {
        let clip = MediaClip::empty("missing");
        let layers = vec![
            Layer::solid(0, Rect::new(0.0, 700.0, 800.0, 600.0), Vec4::ONE),
            Layer::solid(0, Rect::from_size(SCREEN), Vec4::ONE).with_opacity(0.0),
            Layer::media(0, Rect::from_size(SCREEN), &clip, 0.0),
            Layer::solid(0, Rect::new(0.0, -300.0, 800.0, 600.0), Vec4::ONE),
        ];

        let visible = composite_order(&layers, SCREEN);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].rect.min.y, -300.0);
    }

    impl Layer<'_> {
        fn content_color(&self) -> f32 {
            match self.content {
                LayerContent::Gradient { colors } => colors[0].x,
                _ => -1.0,
            }
        }
    }
}
