//! Timing and easing settings.

use std::time::Duration;

use crate::anim::Easing;

/// Durations are in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeConfig {
    /// Face turn triggered from the keyboard.
    pub turn_duration: f32,
    /// Whole-cube turn triggered from the keyboard.
    pub cube_turn_duration: f32,
    /// Per move when setting up a catalog algorithm.
    pub setup_duration: f32,
    /// Per move when undoing the last algorithm.
    pub solve_duration: f32,
    /// Pause after a move fails before the next one is tried.
    pub retry_delay: f32,
    /// How long a reset waits for an in-flight turn before cancelling it.
    pub reset_settle: f32,
    pub easing: Easing,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            turn_duration: 0.3,
            cube_turn_duration: 0.35,
            setup_duration: 0.2,
            solve_duration: 0.5,
            retry_delay: 0.1,
            reset_settle: 1.0,
            easing: Easing::Power2InOut,
        }
    }
}

impl CubeConfig {
    /// Scales every animation by `1 / speed`. Non-positive speeds are ignored.
    pub fn with_speed(mut self, speed: f32) -> Self {
        if speed > 0.0 {
            self.turn_duration /= speed;
            self.cube_turn_duration /= speed;
            self.setup_duration /= speed;
            self.solve_duration /= speed;
        }
        self
    }

    pub fn turn(&self) -> Duration {
        seconds(self.turn_duration)
    }

    pub fn cube_turn(&self) -> Duration {
        seconds(self.cube_turn_duration)
    }

    pub fn setup(&self) -> Duration {
        seconds(self.setup_duration)
    }

    pub fn solve(&self) -> Duration {
        seconds(self.solve_duration)
    }

    pub fn retry(&self) -> Duration {
        seconds(self.retry_delay)
    }

    pub fn settle(&self) -> Duration {
        seconds(self.reset_settle)
    }
}

/// Converts seconds to a [`Duration`], treating negative or NaN values as zero.
fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value.max(0.0)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_scales_animation_only() {
        let config = CubeConfig::default().with_speed(2.0);
        assert!((config.turn().as_secs_f32() - 0.15).abs() < 1e-6);
        assert!((config.solve().as_secs_f32() - 0.25).abs() < 1e-6);
        assert!((config.retry().as_secs_f32() - 0.1).abs() < 1e-6);
        assert_eq!(config.settle(), Duration::from_secs(1));
    }

    #[test]
    fn test_bad_durations_become_zero() {
        assert_eq!(seconds(-1.0), Duration::ZERO);
        assert_eq!(seconds(f32::NAN), Duration::ZERO);
        assert_eq!(CubeConfig::default().with_speed(0.0), CubeConfig::default());
    }
}
