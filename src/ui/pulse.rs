// Transient highlight on counter buttons after a tap

use crate::session::types::Category;
use std::time::{Duration, Instant};

/// Tracks when each button last pulsed
///
/// Triggering again mid-pulse restarts it from full intensity.
#[derive(Debug, Clone)]
pub struct PulseTracker {
    started: [Option<Instant>; 4],
    duration: Duration,
}

impl PulseTracker {
    pub fn new(duration: Duration) -> Self {
        Self {
            started: [None; 4],
            duration,
        }
    }

    pub fn trigger(&mut self, category: Category, now: Instant) {
        self.started[category.index()] = Some(now);
    }

    /// 1.0 right after a trigger, fading linearly to 0.0
    pub fn intensity(&self, category: Category, now: Instant) -> f32 {
        let Some(start) = self.started[category.index()] else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= self.duration {
            return 0.0;
        }
        1.0 - elapsed.as_secs_f32() / self.duration.as_secs_f32()
    }

    /// Whether any button is still fading
    pub fn is_animating(&self, now: Instant) -> bool {
        Category::ALL
            .iter()
            .any(|&category| self.intensity(category, now) > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_button_has_no_pulse() {
        let pulses = PulseTracker::new(Duration::from_millis(300));
        let now = Instant::now();
        assert_eq!(pulses.intensity(Category::FoldedRight, now), 0.0);
        assert!(!pulses.is_animating(now));
    }

    #[test]
    fn test_pulse_fades_out() {
        let mut pulses = PulseTracker::new(Duration::from_millis(300));
        let start = Instant::now();
        pulses.trigger(Category::FoldedLeft, start);

        assert_eq!(pulses.intensity(Category::FoldedLeft, start), 1.0);
        let halfway = pulses.intensity(Category::FoldedLeft, start + Duration::from_millis(150));
        assert!((halfway - 0.5).abs() < 1e-3);
        assert_eq!(
            pulses.intensity(Category::FoldedLeft, start + Duration::from_millis(300)),
            0.0
        );
        assert_eq!(pulses.intensity(Category::FoldedRight, start), 0.0);
    }

    #[test]
    fn test_retrigger_restarts_pulse() {
        let mut pulses = PulseTracker::new(Duration::from_millis(300));
        let start = Instant::now();
        pulses.trigger(Category::UnfoldedLeft, start);

        let later = start + Duration::from_millis(200);
        pulses.trigger(Category::UnfoldedLeft, later);

        assert_eq!(pulses.intensity(Category::UnfoldedLeft, later), 1.0);
        assert!(pulses.is_animating(start + Duration::from_millis(400)));
    }
}
