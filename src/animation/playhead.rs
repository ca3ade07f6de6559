use crate::animation::easing::Ease;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
    Paused,
}

/// What a time-based animation does when its scroll trigger fires an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
    None,
}

/// A 0..1 playhead over a fixed duration, controlled by toggle actions.
#[derive(Debug, Clone)]
pub struct Playhead {
    time: f32,
    duration: f32,
    direction: Direction,
    resume_direction: Direction,
    ease: Ease,
}

impl Playhead {
    pub fn new(duration: f32) -> Self {
        Self {
            time: 0.0,
            duration,
            direction: Direction::Paused,
            resume_direction: Direction::Forward,
            ease: Ease::default(),
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn apply(&mut self, action: ToggleAction) {
        match action {
            ToggleAction::Play => self.direction = Direction::Forward,
            ToggleAction::Reverse => self.direction = Direction::Backward,
            ToggleAction::Pause => {
                if self.direction != Direction::Paused {
                    self.resume_direction = self.direction;
                }
                self.direction = Direction::Paused;
            }
            ToggleAction::Resume => self.direction = self.resume_direction,
            ToggleAction::Restart => {
                self.time = 0.0;
                self.direction = Direction::Forward;
            }
            ToggleAction::Reset => {
                self.time = 0.0;
                self.direction = Direction::Paused;
            }
            ToggleAction::Complete => {
                self.time = self.duration;
                self.direction = Direction::Paused;
            }
            ToggleAction::None => {}
        }

        if matches!(self.direction, Direction::Forward | Direction::Backward) {
            self.resume_direction = self.direction;
        }
    }

    pub fn update(&mut self, dt: f32) -> f32 {
        match self.direction {
            Direction::Forward => self.time = (self.time + dt).min(self.duration),
            Direction::Backward => self.time = (self.time - dt).max(0.0),
            Direction::Paused => {}
        }

        self.progress()
    }

    /// Eased progress in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return if self.time > 0.0 || self.direction == Direction::Forward {
                1.0
            } else {
                0.0
            };
        }

        self.ease.apply(self.time / self.duration)
    }

    pub fn is_at_start(&self) -> bool {
        self.time <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_then_reverse() {
        let mut fade = Playhead::new(0.5).with_ease(Ease::None);
        fade.apply(ToggleAction::Play);
        fade.update(0.25);
        assert!((fade.progress() - 0.5).abs() < 1e-5);
        fade.update(1.0);
        assert_eq!(fade.progress(), 1.0);

        fade.apply(ToggleAction::Reverse);
        fade.update(0.5);
        assert_eq!(fade.progress(), 0.0);
        assert!(fade.is_at_start());
    }

    #[test]
    fn pause_and_resume_keep_direction() {
        let mut fade = Playhead::new(1.0).with_ease(Ease::None);
        fade.apply(ToggleAction::Play);
        fade.update(0.25);
        fade.apply(ToggleAction::Pause);
        fade.update(0.5);
        assert!((fade.progress() - 0.25).abs() < 1e-5);
        fade.apply(ToggleAction::Resume);
        fade.update(0.25);
        assert!((fade.progress() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn complete_and_reset_jump() {
        let mut fade = Playhead::new(1.0);
        fade.apply(ToggleAction::Complete);
        assert_eq!(fade.progress(), 1.0);
        fade.apply(ToggleAction::Reset);
        assert_eq!(fade.progress(), 0.0);
        fade.apply(ToggleAction::None);
        fade.update(1.0);
        assert_eq!(fade.progress(), 0.0);
    }
}
