use glam::Vec3;
use id_arena::Id;

pub type LightId = Id<Light>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    /// Parallel light shining from `position` toward `target`.
    Directional,
    Spot {
        /// Half-angle of the cone in radians.
        angle: f32,
        /// Fraction of the cone that fades out, 0 gives a hard edge.
        penumbra: f32,
        /// Range cutoff, 0 means unlimited.
        distance: f32,
        decay: f32,
    },
    Point {
        distance: f32,
        decay: f32,
    },
}

/// A light with the same parameters and conventions as the three.js light of
/// the same kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    /// Linear RGB.
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
}

const DEFAULT_DECAY: f32 = 2.0;

impl Light {
    fn new(kind: LightKind, color: u32, intensity: f32, position: Vec3) -> Self {
        Self {
            kind,
            color: color_from_hex(color),
            intensity,
            position,
            target: Vec3::ZERO,
        }
    }

    pub fn ambient(color: u32, intensity: f32) -> Self {
        Self::new(LightKind::Ambient, color, intensity, Vec3::ZERO)
    }

    pub fn directional(color: u32, intensity: f32, position: Vec3) -> Self {
        Self::new(LightKind::Directional, color, intensity, position)
    }

    pub fn spot(
        color: u32,
        intensity: f32,
        position: Vec3,
        angle: f32,
        penumbra: f32,
        distance: f32,
    ) -> Self {
        let kind = LightKind::Spot {
            angle,
            penumbra,
            distance,
            decay: DEFAULT_DECAY,
        };
        Self::new(kind, color, intensity, position)
    }

    pub fn point(color: u32, intensity: f32, position: Vec3, distance: f32) -> Self {
        let kind = LightKind::Point {
            distance,
            decay: DEFAULT_DECAY,
        };
        Self::new(kind, color, intensity, position)
    }

    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Unit vector the light travels along.
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Y)
    }
}

/// `0xRRGGBB` in sRGB to linear RGB.
pub fn color_from_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

fn srgb_to_linear(value: f32) -> f32 {
    if value <= 0.04045 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_are_linearized() {
        assert_eq!(color_from_hex(0xffffff), Vec3::ONE);
        let blue = color_from_hex(0x0066ff);
        assert_eq!(blue.x, 0.0);
        assert!(blue.y > 0.12 && blue.y < 0.14);
        assert_eq!(blue.z, 1.0);
    }

    #[test]
    fn spot_points_at_target() {
        let spot = Light::spot(0x0066ff, 0.0, Vec3::new(0.0, 0.0, 6.5), 0.5, 0.3, 10.0)
            .with_target(Vec3::new(0.0, 0.0, 4.83));
        assert!(spot.direction().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }
}
