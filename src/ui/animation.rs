//! Timed transitions for widget opacity.

use std::time::{Duration, Instant};

use ratatui::style::{Modifier, Style};

use crate::observation::Animation;

/// Below this opacity a widget is not drawn at all.
const INVISIBLE_BELOW: f32 = 0.05;
/// Below this opacity a widget is drawn dimmed.
const DIM_BELOW: f32 = 0.6;

/// An opacity value that moves linearly toward its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    from: f32,
    to: f32,
    start: Instant,
    duration: Duration,
}

impl Fade {
    pub fn new(value: f32, now: Instant) -> Self {
        Self {
            from: value,
            to: value,
            start: now,
            duration: Duration::ZERO,
        }
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    /// Move toward `target`, over `animation` if given, else at once.
    /// Retargeting mid-flight starts from the current value.
    pub fn animate_to(&mut self, target: f32, animation: Option<Animation>, now: Instant) {
        let target = target.clamp(0.0, 1.0);
        if target == self.to {
            return;
        }
        self.from = self.value(now);
        self.to = target;
        self.start = now;
        self.duration = animation.map_or(Duration::ZERO, |a| a.duration);
    }

    pub fn value(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.start);
        let progress = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0);
        self.from + (self.to - self.from) * progress
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) < self.duration
    }
}

/// Style for drawing at `alpha`, or `None` when fully transparent.
pub fn faded(style: Style, alpha: f32) -> Option<Style> {
    if alpha < INVISIBLE_BELOW {
        None
    } else if alpha < DIM_BELOW {
        Some(style.add_modifier(Modifier::DIM))
    } else {
        Some(style)
    }
}
