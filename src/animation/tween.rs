use crate::animation::{easing::Ease, lerp};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Repeat {
    Count(u32),
    Infinite,
}

/// A free-running, time-driven tween of a single value. Used for idle motion
/// that loops independently of scroll.
#[derive(Debug, Clone)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    delay: f32,
    ease: Ease,
    repeat: Repeat,
    yoyo: bool,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration,
            delay: 0.0,
            ease,
            repeat: Repeat::Count(0),
            yoyo: false,
        }
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn from_value(&self) -> f32 {
        self.from
    }

    pub fn to_value(&self) -> f32 {
        self.to
    }

    /// Total time including delay and every repetition, `None` when infinite.
    pub fn total_duration(&self) -> Option<f32> {
        match self.repeat {
            Repeat::Count(count) => Some(self.delay + self.duration * (count + 1) as f32),
            Repeat::Infinite => None,
        }
    }

    pub fn is_complete(&self, time: f32) -> bool {
        self.total_duration().is_some_and(|total| time >= total)
    }

    pub fn sample(&self, time: f32) -> f32 {
        let local = time - self.delay;
        if local <= 0.0 {
            return self.from;
        }

        if self.duration <= 0.0 {
            return self.end_value();
        }

        if let Some(total) = self.total_duration() {
            if time >= total {
                return self.end_value();
            }
        }

        let iteration = (local / self.duration).floor();
        let t = (local - iteration * self.duration) / self.duration;
        let reversed = self.yoyo && (iteration as u64) % 2 == 1;

        if reversed {
            // Yoyo iterations play the tween backwards, ease included.
            lerp(self.from, self.to, self.ease.apply(1.0 - t))
        } else {
            lerp(self.from, self.to, self.ease.apply(t))
        }
    }

    fn end_value(&self) -> f32 {
        match self.repeat {
            Repeat::Count(count) if self.yoyo && count % 2 == 1 => self.from,
            _ => self.to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_once_and_holds() {
        let tween = Tween::new(0.0, 10.0, 2.0, Ease::None);
        assert_eq!(tween.sample(-1.0), 0.0);
        assert!((tween.sample(1.0) - 5.0).abs() < 1e-5);
        assert_eq!(tween.sample(5.0), 10.0);
        assert!(tween.is_complete(2.0));
    }

    #[test]
    fn delay_shifts_start() {
        let tween = Tween::new(0.0, 1.0, 1.0, Ease::None).delay(0.5);
        assert_eq!(tween.sample(0.25), 0.0);
        assert!((tween.sample(1.0) - 0.5).abs() < 1e-5);
        assert_eq!(tween.total_duration(), Some(1.5));
    }

    #[test]
    fn infinite_yoyo_swings_back_and_forth() {
        let tween = Tween::new(0.0, -0.01, 2.5, Ease::SINE_IN_OUT)
            .repeat(Repeat::Infinite)
            .yoyo(true);

        assert!((tween.sample(2.5 - 1e-4) + 0.01).abs() < 1e-5);
        assert!((tween.sample(3.75) + 0.005).abs() < 1e-5);
        assert!(tween.sample(5.0 - 1e-4).abs() < 1e-5);
        assert!(!tween.is_complete(1_000.0));
    }

    #[test]
    fn counted_yoyo_ends_where_it_started_on_odd_repeats() {
        let tween = Tween::new(1.0, 1.25, 0.15, Ease::default())
            .repeat(Repeat::Count(1))
            .yoyo(true);

        assert_eq!(tween.total_duration(), Some(0.3));
        assert_eq!(tween.sample(1.0), 1.0);
        assert!(tween.sample(0.15) > 1.2);
    }
}
