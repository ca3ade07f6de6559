use crate::animation::{easing::Ease, lerp};

/// A value that animates toward whatever target it was last given, starting
/// from wherever it currently is. Retargeting mid-flight never jumps.
#[derive(Debug, Clone)]
pub struct Transition {
    value: f32,
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    ease: Ease,
}

impl Transition {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            from: value,
            to: value,
            elapsed: 0.0,
            duration: 0.0,
            ease: Ease::default(),
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_animating(&self) -> bool {
        self.elapsed < self.duration
    }

    /// Jumps to `value` and cancels any running animation.
    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.from = value;
        self.to = value;
        self.elapsed = 0.0;
        self.duration = 0.0;
    }

    pub fn animate_to(&mut self, to: f32, duration: f32) {
        if duration <= 0.0 {
            self.set(to);
            return;
        }

        if (to - self.to).abs() <= f32::EPSILON && self.is_animating() {
            return;
        }

        self.from = self.value;
        self.to = to;
        self.elapsed = 0.0;
        self.duration = duration;
    }

    pub fn update(&mut self, dt: f32) -> f32 {
        if !self.is_animating() {
            self.value = self.to;
            return self.value;
        }

        self.elapsed = (self.elapsed + dt).min(self.duration);
        let t = self.elapsed / self.duration;
        self.value = lerp(self.from, self.to, self.ease.apply(t));
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_target_after_duration() {
        let mut opacity = Transition::new(0.0);
        opacity.animate_to(1.0, 0.5);
        opacity.update(0.25);
        assert!(opacity.value() > 0.0 && opacity.value() < 1.0);
        opacity.update(0.25);
        assert_eq!(opacity.value(), 1.0);
        assert!(!opacity.is_animating());
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let mut scale = Transition::new(1.0).with_ease(Ease::None);
        scale.animate_to(2.0, 1.0);
        scale.update(0.5);
        let before = scale.value();
        scale.animate_to(0.0, 1.0);
        assert_eq!(scale.value(), before);
        scale.update(0.5);
        assert!((scale.value() - before / 2.0).abs() < 1e-5);
    }

    #[test]
    fn same_target_does_not_restart() {
        let mut value = Transition::new(0.0).with_ease(Ease::None);
        value.animate_to(1.0, 1.0);
        value.update(0.5);
        value.animate_to(1.0, 1.0);
        value.update(0.5);
        assert_eq!(value.value(), 1.0);
    }

    #[test]
    fn zero_duration_jumps() {
        let mut value = Transition::new(0.0);
        value.animate_to(3.0, 0.0);
        assert_eq!(value.value(), 3.0);
    }
}
