use glam::{Mat4, Vec2, Vec4};

/// Screen-space rectangle in physical pixels, origin top-left, y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_size(size: Vec2) -> Self {
        Self {
            min: Vec2::ZERO,
            size,
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn aspect(&self) -> f32 {
        if self.size.y <= 0.0 {
            1.0
        } else {
            self.size.x / self.size.y
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.y >= self.min.y && point.x < max.x && point.y < max.y
    }

    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let min = self.min.max(other.min);
        let max = self.max().min(other.max());
        let size = max - min;
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }

        Some(Rect { min, size })
    }

    /// Scales the rectangle around its center.
    pub fn scaled(&self, scale: f32) -> Rect {
        let size = self.size * scale;
        Rect {
            min: self.center() - size * 0.5,
            size,
        }
    }

    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect {
            min: self.min + offset,
            size: self.size,
        }
    }

    /// Maps a point inside the rectangle to normalized device coordinates
    /// (x right, y up, both in [-1, 1]).
    pub fn to_ndc(&self, point: Vec2) -> Vec2 {
        let local = (point - self.min) / self.size;
        Vec2::new(local.x * 2.0 - 1.0, 1.0 - local.y * 2.0)
    }

    /// Clip-space transform that squeezes a full-screen projection into this
    /// rectangle of a `screen`-sized target. Applied after the projection so
    /// the rectangle may extend past the screen edges.
    pub fn clip_transform(&self, screen: Vec2) -> Mat4 {
        let scale = self.size / screen;
        let offset = Vec2::new(
            (2.0 * self.min.x + self.size.x) / screen.x - 1.0,
            1.0 - (2.0 * self.min.y + self.size.y) / screen.y,
        );

        Mat4::from_cols(
            Vec4::new(scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale.y, 0.0, 0.0),
            Vec4::Z,
            Vec4::new(offset.x, offset.y, 0.0, 1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_and_containment() {
        let screen = Rect::new(0.0, 0.0, 800.0, 600.0);
        let layer = Rect::new(600.0, -100.0, 400.0, 300.0);
        let visible = layer.intersect(&screen).unwrap();
        assert_eq!(visible, Rect::new(600.0, 0.0, 200.0, 200.0));
        assert!(layer.contains(Vec2::new(700.0, 0.0)));
        assert!(Rect::new(900.0, 0.0, 10.0, 10.0).intersect(&screen).is_none());
    }

    #[test]
    fn scaling_keeps_center() {
        let rect = Rect::new(100.0, 100.0, 200.0, 100.0).scaled(0.5);
        assert_eq!(rect, Rect::new(150.0, 125.0, 100.0, 50.0));
    }

    #[test]
    fn ndc_corners() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.to_ndc(Vec2::new(10.0, 20.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(rect.to_ndc(Vec2::new(60.0, 45.0)), Vec2::ZERO);
    }

    #[test]
    fn clip_transform_maps_local_corners_into_rect() {
        let screen = Vec2::new(800.0, 600.0);
        let rect = Rect::new(560.0, 360.0, 240.0, 240.0);
        let transform = rect.clip_transform(screen);

        let top_left = transform * Vec4::new(-1.0, 1.0, 0.5, 1.0);
        let expected = Rect::from_size(screen).to_ndc(rect.min);
        assert!(top_left.truncate().truncate().abs_diff_eq(expected, 1e-5));

        let bottom_right = transform * Vec4::new(2.0, -2.0, 1.0, 2.0);
        let expected = Rect::from_size(screen).to_ndc(rect.max());
        assert!((bottom_right.truncate().truncate() / bottom_right.w).abs_diff_eq(expected, 1e-5));
    }
}
