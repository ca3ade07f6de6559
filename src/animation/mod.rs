//! Scroll choreography primitives: eases, free-running tweens, retargetable
//! transitions, toggle playheads and property timelines.

pub mod easing;
pub mod playhead;
pub mod timeline;
pub mod transition;
pub mod tween;

pub use easing::Ease;
pub use playhead::{Playhead, ToggleAction};
pub use timeline::{Animatable, Position, Timeline, TweenValue};
pub use transition::Transition;
pub use tween::{Repeat, Tween};

use glam::{Vec2, Vec3};

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Values that can be blended linearly.
pub trait Interpolate: Copy {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        lerp(*self, *other, t)
    }
}

impl Interpolate for Vec2 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self.lerp(*other, t)
    }
}

impl Interpolate for Vec3 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self.lerp(*other, t)
    }
}

/// Eased interpolation between two values, the `gsap.utils.interpolate`
/// equivalent with an optional curve applied to `t` first.
pub fn interpolate<T: Interpolate>(from: T, to: T, t: f32, ease: Ease) -> T {
    from.interpolate(&to, ease.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_vectors() {
        let from = Vec3::new(0.0, -2.0, 4.3);
        let to = Vec3::new(0.0, -0.09, 4.83);
        let mid = interpolate(from, to, 0.5, Ease::None);
        assert!((mid.y + 1.045).abs() < 1e-5);
        assert!((mid.z - 4.565).abs() < 1e-5);
        assert!(interpolate(from, to, 1.0, Ease::POWER2_IN_OUT).abs_diff_eq(to, 1e-5));
    }
}
