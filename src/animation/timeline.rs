use std::fmt::Debug;

use crate::animation::{easing::Ease, lerp};

/// Something a timeline can write animated channels into.
pub trait Animatable {
    type Key: Copy + PartialEq + Debug;

    fn get(&self, key: Self::Key) -> f32;
    fn set(&mut self, key: Self::Key, value: f32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenValue {
    /// Absolute end value.
    To(f32),
    /// End value relative to the start value (`"+=0.05"`, `"-=0.01"`).
    By(f32),
}

/// Where a tween is placed on the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// After everything added so far (`">"`, the default).
    Append,
    /// Same start time as the previously added tween (`"<"`).
    WithPrevious,
    At(f32),
    /// Relative to the current end of the timeline (`"+=0.5"`, `"-=0.2"`).
    Offset(f32),
}

#[derive(Debug, Clone)]
struct Track<K> {
    key: K,
    start: f32,
    duration: f32,
    ease: Ease,
    value: TweenValue,
    from: Option<f32>,
    resolved: (f32, f32),
}

impl<K> Track<K> {
    fn local_progress(&self, time: f32) -> f32 {
        if self.duration <= 0.0 {
            return if time >= self.start { 1.0 } else { 0.0 };
        }

        ((time - self.start) / self.duration).clamp(0.0, 1.0)
    }
}

/// A sequence of property tweens that is seeked rather than played, so a
/// scroll position can scrub it back and forth.
#[derive(Debug, Clone)]
pub struct Timeline<K> {
    tracks: Vec<Track<K>>,
    duration: f32,
    previous_start: f32,
    initialized: bool,
}

impl<K: Copy + PartialEq + Debug> Default for Timeline<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + PartialEq + Debug> Timeline<K> {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            duration: 0.0,
            previous_start: 0.0,
            initialized: false,
        }
    }

    pub fn to(
        self,
        props: &[(K, TweenValue)],
        duration: f32,
        ease: Ease,
        position: Position,
    ) -> Self {
        let props: Vec<_> = props.iter().map(|&(key, value)| (key, None, value)).collect();
        self.push(&props, duration, ease, position)
    }

    pub fn from_to(
        self,
        props: &[(K, f32, f32)],
        duration: f32,
        ease: Ease,
        position: Position,
    ) -> Self {
        let props: Vec<_> = props
            .iter()
            .map(|&(key, from, to)| (key, Some(from), TweenValue::To(to)))
            .collect();
        self.push(&props, duration, ease, position)
    }

    fn push(
        mut self,
        props: &[(K, Option<f32>, TweenValue)],
        duration: f32,
        ease: Ease,
        position: Position,
    ) -> Self {
        let start = match position {
            Position::Append => self.duration,
            Position::WithPrevious => self.previous_start,
            Position::At(time) => time,
            Position::Offset(offset) => self.duration + offset,
        }
        .max(0.0);

        for &(key, from, value) in props {
            self.tracks.push(Track {
                key,
                start,
                duration,
                ease,
                value,
                from,
                resolved: (0.0, 0.0),
            });
        }

        self.duration = self.duration.max(start + duration);
        self.previous_start = start;
        self.initialized = false;
        self
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Forces start values to be captured again from the target on the next
    /// seek.
    pub fn invalidate(&mut self) {
        self.initialized = false;
    }

    fn capture<T: Animatable<Key = K>>(&mut self, target: &T) {
        let mut running: Vec<(K, f32)> = Vec::new();

        for track in &mut self.tracks {
            let base = running
                .iter()
                .find(|(key, _)| *key == track.key)
                .map(|&(_, value)| value)
                .unwrap_or_else(|| target.get(track.key));

            let from = track.from.unwrap_or(base);
            let to = match track.value {
                TweenValue::To(to) => to,
                TweenValue::By(delta) => from + delta,
            };
            track.resolved = (from, to);

            match running.iter_mut().find(|(key, _)| *key == track.key) {
                Some(entry) => entry.1 = to,
                None => running.push((track.key, to)),
            }
        }

        self.initialized = true;
    }

    pub fn seek<T: Animatable<Key = K>>(&mut self, target: &mut T, time: f32) {
        if !self.initialized {
            self.capture(target);
        }

        let mut written: Vec<K> = Vec::with_capacity(self.tracks.len());

        for track in &self.tracks {
            let seen = written.contains(&track.key);
            if seen && time < track.start {
                continue;
            }

            let (from, to) = track.resolved;
            let t = track.ease.apply(track.local_progress(time));
            target.set(track.key, lerp(from, to, t));

            if !seen {
                written.push(track.key);
            }
        }
    }

    pub fn set_progress<T: Animatable<Key = K>>(&mut self, target: &mut T, progress: f32) {
        self.seek(target, progress.clamp(0.0, 1.0) * self.duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Key {
        Y,
        Z,
        RotY,
    }

    #[derive(Debug, Default)]
    struct Pose {
        y: f32,
        z: f32,
        rot_y: f32,
    }

    impl Animatable for Pose {
        type Key = Key;

        fn get(&self, key: Key) -> f32 {
            match key {
                Key::Y => self.y,
                Key::Z => self.z,
                Key::RotY => self.rot_y,
            }
        }

        fn set(&mut self, key: Key, value: f32) {
            match key {
                Key::Y => self.y = value,
                Key::Z => self.z = value,
                Key::RotY => self.rot_y = value,
            }
        }
    }

    fn can_timeline() -> Timeline<Key> {
        Timeline::new()
            .to(
                &[(Key::Z, TweenValue::To(4.83)), (Key::Y, TweenValue::To(-0.09))],
                3.0,
                Ease::POWER3_IN_OUT,
                Position::Append,
            )
            .to(
                &[(Key::RotY, TweenValue::To(0.0))],
                2.0,
                Ease::POWER3_IN_OUT,
                Position::WithPrevious,
            )
    }

    #[test]
    fn start_values_are_captured_from_target() {
        let mut pose = Pose {
            y: 2.0,
            z: 4.3,
            rot_y: std::f32::consts::PI,
        };
        let mut timeline = can_timeline();
        assert_eq!(timeline.duration(), 3.0);

        timeline.set_progress(&mut pose, 0.0);
        assert_eq!(pose.y, 2.0);
        assert_eq!(pose.z, 4.3);

        timeline.set_progress(&mut pose, 1.0);
        assert!((pose.y + 0.09).abs() < 1e-6);
        assert!((pose.z - 4.83).abs() < 1e-6);
        assert_eq!(pose.rot_y, 0.0);

        timeline.set_progress(&mut pose, 0.0);
        assert_eq!(pose.y, 2.0);
        assert!((pose.rot_y - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn with_previous_shares_start_and_shorter_tween_holds() {
        let mut pose = Pose {
            rot_y: 1.0,
            ..Default::default()
        };
        let mut timeline = can_timeline();

        timeline.seek(&mut pose, 2.0);
        assert_eq!(pose.rot_y, 0.0);
        assert!(pose.z > 0.0 && pose.z < 4.83);
    }

    #[test]
    fn relative_values_chain_per_key() {
        let mut pose = Pose {
            y: 1.0,
            ..Default::default()
        };
        let mut timeline = Timeline::new()
            .to(&[(Key::Y, TweenValue::By(-0.5))], 1.0, Ease::None, Position::Append)
            .to(&[(Key::Y, TweenValue::By(-0.5))], 1.0, Ease::None, Position::Append);

        timeline.seek(&mut pose, 0.5);
        assert!((pose.y - 0.75).abs() < 1e-6);
        timeline.seek(&mut pose, 1.5);
        assert!((pose.y - 0.25).abs() < 1e-6);
        timeline.seek(&mut pose, 2.0);
        assert!(pose.y.abs() < 1e-6);
        timeline.seek(&mut pose, 0.0);
        assert!((pose.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn from_to_and_absolute_positions() {
        let mut pose = Pose::default();
        let mut timeline = Timeline::new()
            .from_to(&[(Key::Z, -100.0, 0.0)], 0.8, Ease::None, Position::At(0.0))
            .from_to(&[(Key::Y, 20.0, 0.0)], 0.8, Ease::None, Position::At(1.0));
        assert!((timeline.duration() - 1.8).abs() < 1e-6);

        timeline.seek(&mut pose, 0.0);
        assert_eq!(pose.z, -100.0);
        assert_eq!(pose.y, 20.0);

        timeline.seek(&mut pose, 0.9);
        assert_eq!(pose.z, 0.0);
        assert_eq!(pose.y, 20.0);
    }

    #[test]
    fn invalidate_recaptures_current_values() {
        let mut pose = Pose::default();
        let mut timeline =
            Timeline::new().to(&[(Key::Y, TweenValue::To(1.0))], 1.0, Ease::None, Position::Append);

        timeline.seek(&mut pose, 0.0);
        pose.y = 0.5;
        timeline.invalidate();
        timeline.seek(&mut pose, 0.5);
        assert!((pose.y - 0.75).abs() < 1e-6);
    }

    #[test]
    fn offset_position_extends_duration() {
        let timeline: Timeline<Key> = Timeline::new()
            .to(&[(Key::Y, TweenValue::To(1.0))], 1.0, Ease::None, Position::Append)
            .to(&[(Key::Z, TweenValue::To(1.0))], 1.0, Ease::None, Position::Offset(0.5));
        assert_eq!(timeline.duration(), 2.5);
    }
}
