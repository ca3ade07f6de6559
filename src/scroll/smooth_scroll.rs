use crate::animation::{lerp, Ease};

#[derive(Debug, Clone)]
pub struct SmoothScrollOptions {
    /// Seconds a wheel gesture takes to settle.
    pub duration: f32,
    pub easing: Ease,
    pub wheel_multiplier: f32,
    /// When disabled, wheel input scrolls immediately.
    pub smooth_wheel: bool,
}

impl Default for SmoothScrollOptions {
    fn default() -> Self {
        Self {
            duration: 1.2,
            easing: Ease::ExpoScroll,
            wheel_multiplier: 1.0,
            smooth_wheel: true,
        }
    }
}

#[derive(Debug, Clone)]
struct ScrollAnimation {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

/// Eased page scrolling. Input moves a clamped target; every frame the
/// rendered scroll value eases from where it was toward that target.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    options: SmoothScrollOptions,
    value: f32,
    target: f32,
    limit: f32,
    animation: Option<ScrollAnimation>,
}

impl SmoothScroll {
    pub fn new(options: SmoothScrollOptions) -> Self {
        Self {
            options,
            value: 0.0,
            target: 0.0,
            limit: 0.0,
            animation: None,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn limit(&self) -> f32 {
        self.limit
    }

    pub fn is_scrolling(&self) -> bool {
        self.animation.is_some()
    }

    /// Updates the maximum scroll offset, pulling value and target back into
    /// range if the page got shorter.
    pub fn set_limit(&mut self, limit: f32) {
        self.limit = limit.max(0.0);
        if self.target > self.limit || self.value > self.limit {
            self.target = self.target.min(self.limit);
            self.value = self.value.min(self.limit);
            self.animation = None;
        }
    }

    pub fn on_wheel(&mut self, delta: f32) {
        let delta = delta * self.options.wheel_multiplier;
        let target = self.target + delta;
        let immediate = !self.options.smooth_wheel;
        self.scroll_to(target, immediate);
    }

    pub fn scroll_to(&mut self, target: f32, immediate: bool) {
        let target = target.clamp(0.0, self.limit);
        self.target = target;

        if immediate || self.options.duration <= 0.0 {
            self.value = target;
            self.animation = None;
            return;
        }

        self.animation = Some(ScrollAnimation {
            from: self.value,
            to: target,
            elapsed: 0.0,
            duration: self.options.duration,
        });
    }

    pub fn advance(&mut self, dt: f32) -> f32 {
        let Some(animation) = self.animation.as_mut() else {
            return self.value;
        };

        animation.elapsed += dt;
        let linear = (animation.elapsed / animation.duration).clamp(0.0, 1.0);
        let completed = linear >= 1.0;
        let eased = if completed {
            1.0
        } else {
            self.options.easing.apply(linear)
        };

        self.value = lerp(animation.from, animation.to, eased);

        if completed {
            self.value = animation.to;
            self.animation = None;
        }

        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scroller(limit: f32) -> SmoothScroll {
        let mut scroll = SmoothScroll::new(SmoothScrollOptions::default());
        scroll.set_limit(limit);
        scroll
    }

    #[test]
    fn wheel_eases_toward_target() {
        let mut scroll = scroller(1000.0);
        scroll.on_wheel(300.0);
        assert_eq!(scroll.target(), 300.0);

        let first = scroll.advance(0.1);
        assert!(first > 0.0 && first < 300.0);
        let second = scroll.advance(0.1);
        assert!(second > first);

        for _ in 0..20 {
            scroll.advance(0.1);
        }
        assert_eq!(scroll.value(), 300.0);
        assert!(!scroll.is_scrolling());
    }

    #[test]
    fn target_is_clamped_to_page() {
        let mut scroll = scroller(500.0);
        scroll.on_wheel(-200.0);
        assert_eq!(scroll.target(), 0.0);
        scroll.on_wheel(10_000.0);
        assert_eq!(scroll.target(), 500.0);
    }

    #[test]
    fn accumulated_wheel_restarts_from_current_value() {
        let mut scroll = scroller(2000.0);
        scroll.on_wheel(100.0);
        scroll.advance(0.3);
        let mid = scroll.value();
        scroll.on_wheel(100.0);
        assert_eq!(scroll.target(), 200.0);
        assert_eq!(scroll.value(), mid);
        let next = scroll.advance(0.016);
        assert!(next >= mid);
    }

    #[test]
    fn immediate_scroll_and_shrinking_limit() {
        let mut scroll = scroller(1000.0);
        scroll.scroll_to(800.0, true);
        assert_eq!(scroll.value(), 800.0);
        scroll.set_limit(400.0);
        assert_eq!(scroll.value(), 400.0);
        assert_eq!(scroll.target(), 400.0);
    }

    #[test]
    fn disabled_smooth_wheel_jumps() {
        let mut scroll = SmoothScroll::new(SmoothScrollOptions {
            smooth_wheel: false,
            ..Default::default()
        });
        scroll.set_limit(1000.0);
        scroll.on_wheel(120.0);
        assert_eq!(scroll.value(), 120.0);
    }
}
