//! Page scrolling: eased wheel scrolling, section layout and scroll triggers.

pub mod layout;
pub mod smooth_scroll;
pub mod trigger;

pub use layout::{PageLayout, Placement, SectionSlot};
pub use smooth_scroll::{SmoothScroll, SmoothScrollOptions};
pub use trigger::{ElementBounds, Scrub, ScrollTrigger, ToggleActions, TriggerEvent};
