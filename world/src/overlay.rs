//! Single-shot red flash shown when the player strikes a tree.

use std::time::Duration;

use forest_survival_core::OverlayConfig;

#[derive(Debug)]
pub(crate) struct DamageOverlay {
    opacity: f32,
    duration: Duration,
    remaining: Option<Duration>,
}

impl DamageOverlay {
    pub(crate) fn new(config: &OverlayConfig) -> Self {
        Self {
            opacity: config.opacity,
            duration: config.duration(),
            remaining: None,
        }
    }

    /// Makes the overlay visible for the full duration, re-arming a running timer.
    pub(crate) fn show(&mut self) -> f32 {
        self.remaining = Some(self.duration);
        self.opacity
    }

    /// Advances the timer, returning `true` when the overlay just cleared.
    pub(crate) fn advance(&mut self, dt: Duration) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        let left = remaining.saturating_sub(dt);
        if left.is_zero() {
            self.remaining = None;
            true
        } else {
            self.remaining = Some(left);
            false
        }
    }

    /// Opacity to paint with; zero while hidden.
    pub(crate) fn opacity(&self) -> f32 {
        if self.remaining.is_some() {
            self.opacity
        } else {
            0.0
        }
    }
}
