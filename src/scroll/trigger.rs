use std::str::FromStr;

use crate::animation::{Ease, ToggleAction, Transition};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TriggerParseError {
    #[error("empty trigger position")]
    Empty,
    #[error("invalid length {0:?}")]
    InvalidLength(String),
    #[error("trigger position {0:?} has too many parts")]
    TooManyParts(String),
    #[error("invalid toggle actions {0:?}")]
    InvalidToggleActions(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f32),
    Percent(f32),
}

impl Length {
    pub fn resolve(&self, reference: f32) -> f32 {
        match *self {
            Length::Px(px) => px,
            Length::Percent(percent) => reference * percent / 100.0,
        }
    }

    fn negate(self) -> Self {
        match self {
            Length::Px(px) => Length::Px(-px),
            Length::Percent(percent) => Length::Percent(-percent),
        }
    }
}

impl FromStr for Length {
    type Err = TriggerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TriggerParseError::InvalidLength(s.to_string());

        match s {
            "top" | "left" => return Ok(Length::Percent(0.0)),
            "center" => return Ok(Length::Percent(50.0)),
            "bottom" | "right" => return Ok(Length::Percent(100.0)),
            _ => {}
        }

        if let Some(percent) = s.strip_suffix('%') {
            return percent
                .parse()
                .map(Length::Percent)
                .map_err(|_| invalid());
        }

        let px = s.strip_suffix("px").unwrap_or(s);
        px.parse().map(Length::Px).map_err(|_| invalid())
    }
}

/// One side of a trigger position, e.g. `top+=20%`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub base: Length,
    pub offset: Option<Length>,
}

impl Anchor {
    pub fn resolve(&self, reference: f32) -> f32 {
        self.base.resolve(reference) + self.offset.map_or(0.0, |offset| offset.resolve(reference))
    }
}

impl FromStr for Anchor {
    type Err = TriggerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TriggerParseError::Empty);
        }

        for (operator, negative) in [("+=", false), ("-=", true)] {
            if let Some((base, offset)) = s.split_once(operator) {
                let offset: Length = offset.parse()?;
                return Ok(Anchor {
                    base: base.parse()?,
                    offset: Some(if negative { offset.negate() } else { offset }),
                });
            }
        }

        Ok(Anchor {
            base: s.parse()?,
            offset: None,
        })
    }
}

/// `"<element anchor> <viewport anchor>"`: the scroll position at which the
/// element anchor meets the viewport anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerPoint {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl TriggerPoint {
    pub fn resolve(&self, bounds: ElementBounds, viewport_height: f32) -> f32 {
        bounds.top + self.element.resolve(bounds.height) - self.viewport.resolve(viewport_height)
    }
}

impl FromStr for TriggerPoint {
    type Err = TriggerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let element = parts.next().ok_or(TriggerParseError::Empty)?.parse()?;
        let viewport = match parts.next() {
            Some(part) => part.parse()?,
            None => Anchor {
                base: Length::Percent(0.0),
                offset: None,
            },
        };

        if parts.next().is_some() {
            return Err(TriggerParseError::TooManyParts(s.to_string()));
        }

        Ok(TriggerPoint { element, viewport })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerEnd {
    Point(TriggerPoint),
    /// `"+=80%"`: distance from the start, percentages of the viewport.
    Relative(Length),
}

impl FromStr for TriggerEnd {
    type Err = TriggerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(distance) = s.strip_prefix("+=") {
            return Ok(TriggerEnd::Relative(distance.parse()?));
        }
        if let Some(distance) = s.strip_prefix("-=") {
            return Ok(TriggerEnd::Relative(distance.parse::<Length>()?.negate()));
        }

        Ok(TriggerEnd::Point(s.parse()?))
    }
}

/// Document-space vertical bounds of the element a trigger watches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBounds {
    pub top: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scrub {
    /// Progress follows scroll exactly.
    Immediate,
    /// Progress catches up with scroll over this many seconds.
    Smoothed(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    Enter,
    Leave,
    EnterBack,
    LeaveBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleActions {
    pub on_enter: ToggleAction,
    pub on_leave: ToggleAction,
    pub on_enter_back: ToggleAction,
    pub on_leave_back: ToggleAction,
}

impl Default for ToggleActions {
    fn default() -> Self {
        Self {
            on_enter: ToggleAction::Play,
            on_leave: ToggleAction::None,
            on_enter_back: ToggleAction::None,
            on_leave_back: ToggleAction::None,
        }
    }
}

impl ToggleActions {
    pub fn action_for(&self, event: TriggerEvent) -> ToggleAction {
        match event {
            TriggerEvent::Enter => self.on_enter,
            TriggerEvent::Leave => self.on_leave,
            TriggerEvent::EnterBack => self.on_enter_back,
            TriggerEvent::LeaveBack => self.on_leave_back,
        }
    }
}

impl FromStr for ToggleActions {
    type Err = TriggerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TriggerParseError::InvalidToggleActions(s.to_string());

        let actions = s
            .split_whitespace()
            .map(|word| match word {
                "play" => Ok(ToggleAction::Play),
                "pause" => Ok(ToggleAction::Pause),
                "resume" => Ok(ToggleAction::Resume),
                "reverse" => Ok(ToggleAction::Reverse),
                "restart" => Ok(ToggleAction::Restart),
                "reset" => Ok(ToggleAction::Reset),
                "complete" => Ok(ToggleAction::Complete),
                "none" => Ok(ToggleAction::None),
                _ => Err(invalid()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let [on_enter, on_leave, on_enter_back, on_leave_back] = actions[..] else {
            return Err(invalid());
        };

        Ok(ToggleActions {
            on_enter,
            on_leave,
            on_enter_back,
            on_leave_back,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerState {
    Before,
    Active,
    After,
}

/// Maps the page scroll offset onto a 0..1 progress over a range derived from
/// an element's bounds, and reports when that range is entered or left.
#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    start_point: TriggerPoint,
    end_point: TriggerEnd,
    scrub: Scrub,
    toggle_actions: ToggleActions,
    start: f32,
    end: f32,
    state: TriggerState,
    progress: f32,
    smoothed: Transition,
}

impl ScrollTrigger {
    pub fn new(start: &str, end: &str) -> Result<Self, TriggerParseError> {
        Ok(Self {
            start_point: start.parse()?,
            end_point: end.parse()?,
            scrub: Scrub::Immediate,
            toggle_actions: ToggleActions::default(),
            start: 0.0,
            end: 0.0,
            state: TriggerState::Before,
            progress: 0.0,
            smoothed: Transition::new(0.0).with_ease(Ease::POWER3_OUT),
        })
    }

    pub fn with_scrub(mut self, scrub: Scrub) -> Self {
        self.scrub = scrub;
        self
    }

    pub fn with_toggle_actions(mut self, toggle_actions: ToggleActions) -> Self {
        self.toggle_actions = toggle_actions;
        self
    }

    pub fn toggle_actions(&self) -> &ToggleActions {
        &self.toggle_actions
    }

    /// Recomputes the scroll range, e.g. after a resize. State is kept so the
    /// next update reports any crossings caused by the new range.
    pub fn refresh(&mut self, bounds: ElementBounds, viewport_height: f32) {
        self.start = self.start_point.resolve(bounds, viewport_height);
        self.end = match self.end_point {
            TriggerEnd::Point(point) => point.resolve(bounds, viewport_height),
            TriggerEnd::Relative(distance) => self.start + distance.resolve(viewport_height),
        }
        .max(self.start);
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }

    pub fn is_active(&self) -> bool {
        self.state == TriggerState::Active
    }

    /// Raw progress, clamped to [0, 1].
    pub fn raw_progress(&self) -> f32 {
        self.progress
    }

    /// Progress after scrub smoothing; this is what animations should use.
    pub fn progress(&self) -> f32 {
        match self.scrub {
            Scrub::Immediate => self.progress,
            Scrub::Smoothed(_) => self.smoothed.value(),
        }
    }

    pub fn update(&mut self, scroll: f32, dt: f32) -> Vec<TriggerEvent> {
        self.progress = if self.end > self.start {
            ((scroll - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
        } else if scroll > self.start {
            1.0
        } else {
            0.0
        };

        if let Scrub::Smoothed(seconds) = self.scrub {
            self.smoothed.animate_to(self.progress, seconds);
            self.smoothed.update(dt);
        }

        let state = if scroll <= self.start {
            TriggerState::Before
        } else if scroll >= self.end {
            TriggerState::After
        } else {
            TriggerState::Active
        };

        let events = transition_events(self.state, state);
        self.state = state;
        events
    }
}

fn transition_events(from: TriggerState, to: TriggerState) -> Vec<TriggerEvent> {
    use TriggerEvent::*;
    use TriggerState::*;

    match (from, to) {
        (Before, Active) => vec![Enter],
        (Before, After) => vec![Enter, Leave],
        (Active, After) => vec![Leave],
        (After, Active) => vec![EnterBack],
        (After, Before) => vec![EnterBack, LeaveBack],
        (Active, Before) => vec![LeaveBack],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT_HEIGHT: f32 = 800.0;

    #[test]
    fn parses_anchors_with_offsets() {
        let point: TriggerPoint = "top+=20% center".parse().unwrap();
        assert_eq!(point.element.base, Length::Percent(0.0));
        assert_eq!(point.element.offset, Some(Length::Percent(20.0)));
        assert_eq!(point.viewport.base, Length::Percent(50.0));

        let point: TriggerPoint = "bottom-=100px 75%".parse().unwrap();
        assert_eq!(point.element.offset, Some(Length::Px(-100.0)));
        assert_eq!(point.viewport.base, Length::Percent(75.0));
    }

    #[test]
    fn rejects_bad_positions() {
        assert_eq!("".parse::<TriggerPoint>(), Err(TriggerParseError::Empty));
        assert!(matches!(
            "top center bottom".parse::<TriggerPoint>(),
            Err(TriggerParseError::TooManyParts(_))
        ));
        assert!(matches!(
            "middle center".parse::<TriggerPoint>(),
            Err(TriggerParseError::InvalidLength(_))
        ));
        assert!("play reverse".parse::<ToggleActions>().is_err());
    }

    #[test]
    fn resolves_relative_end_against_viewport() {
        let mut trigger = ScrollTrigger::new("top+=20% center", "+=80%").unwrap();
        trigger.refresh(
            ElementBounds {
                top: 2000.0,
                height: 1000.0,
            },
            VIEWPORT_HEIGHT,
        );
        assert_eq!(trigger.start(), 2000.0 + 200.0 - 400.0);
        assert_eq!(trigger.end(), trigger.start() + 640.0);
    }

    #[test]
    fn resolves_point_end() {
        let mut trigger = ScrollTrigger::new("top center", "bottom center").unwrap();
        trigger.refresh(
            ElementBounds {
                top: 1000.0,
                height: 1440.0,
            },
            VIEWPORT_HEIGHT,
        );
        assert_eq!(trigger.start(), 600.0);
        assert_eq!(trigger.end(), 2040.0);
    }

    #[test]
    fn reports_enter_leave_sequence() {
        let mut trigger = ScrollTrigger::new("top top", "+=100px").unwrap();
        trigger.refresh(
            ElementBounds {
                top: 500.0,
                height: 100.0,
            },
            VIEWPORT_HEIGHT,
        );

        assert!(trigger.update(0.0, 0.016).is_empty());
        assert_eq!(trigger.update(550.0, 0.016), vec![TriggerEvent::Enter]);
        assert!((trigger.progress() - 0.5).abs() < 1e-6);
        assert_eq!(trigger.update(700.0, 0.016), vec![TriggerEvent::Leave]);
        assert_eq!(trigger.progress(), 1.0);
        assert_eq!(trigger.update(560.0, 0.016), vec![TriggerEvent::EnterBack]);
        assert_eq!(trigger.update(0.0, 0.016), vec![TriggerEvent::LeaveBack]);
        assert_eq!(trigger.progress(), 0.0);
        assert_eq!(
            trigger.update(10_000.0, 0.016),
            vec![TriggerEvent::Enter, TriggerEvent::Leave]
        );
    }

    #[test]
    fn smoothed_scrub_lags_then_catches_up() {
        let mut trigger = ScrollTrigger::new("top top", "+=1000px")
            .unwrap()
            .with_scrub(Scrub::Smoothed(1.0));
        trigger.refresh(
            ElementBounds {
                top: 0.0,
                height: 1000.0,
            },
            VIEWPORT_HEIGHT,
        );

        trigger.update(1000.0, 0.1);
        assert_eq!(trigger.raw_progress(), 1.0);
        assert!(trigger.progress() > 0.0 && trigger.progress() < 1.0);

        for _ in 0..20 {
            trigger.update(1000.0, 0.1);
        }
        assert_eq!(trigger.progress(), 1.0);
    }

    #[test]
    fn parses_toggle_actions() {
        let actions: ToggleActions = "play reverse play reverse".parse().unwrap();
        assert_eq!(actions.action_for(TriggerEvent::Leave), ToggleAction::Reverse);
        assert_eq!(actions.action_for(TriggerEvent::EnterBack), ToggleAction::Play);
    }
}
