//! Frame-driven animation primitives: eased tweens and timers.
//!
//! Nothing here reads the wall clock. Whoever owns the render loop calls
//! `proceed`/`advance` with the time since the last frame.

use std::f32::consts::PI;
use std::time::Duration;

use futures::channel::oneshot;

/// Easing curve applied to tween progress.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Quadratic ease-in-out, slow at both ends.
    #[default]
    Power2InOut,
    Cosine,
}

impl Easing {
    /// Returns the eased value in the range [0, 1] for `t` in the range
    /// [0, 1].
    pub fn ease(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power2InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::Cosine => (1.0 - (t * PI).cos()) / 2.0,
        }
    }
}

/// Animates a single value from zero to `target` over `duration`.
#[derive(Debug, Clone)]
pub struct Tween {
    target: f32,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Tween {
    pub fn new(target: f32, duration: Duration, easing: Easing) -> Self {
        Self {
            target,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    /// Steps the tween forward and returns the current value.
    pub fn proceed(&mut self, delta: Duration) -> f32 {
        self.elapsed = (self.elapsed + delta).min(self.duration);
        self.value()
    }

    /// Linear progress in the range [0, 1]. A zero-length tween is always
    /// complete.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            1.0
        } else {
            self.elapsed.as_secs_f32() / self.duration.as_secs_f32()
        }
    }

    pub fn value(&self) -> f32 {
        if self.is_finished() {
            self.target
        } else {
            self.target * self.easing.ease(self.progress())
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// One-shot timers that fire after a given amount of frame time.
#[derive(Debug, Default)]
pub struct Timers {
    pending: Vec<(Duration, oneshot::Sender<()>)>,
}

impl Timers {
    /// Schedules a timer. The receiver resolves once `duration` of frame time
    /// has been passed to [`Self::advance`].
    pub fn sleep(&mut self, duration: Duration) -> oneshot::Receiver<()> {
        let (sender, receiver) = oneshot::channel();
        self.pending.push((duration, sender));
        receiver
    }

    /// Counts down every timer, firing the ones that have run out.
    pub fn advance(&mut self, delta: Duration) {
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for (remaining, sender) in self.pending.drain(..) {
            match remaining.checked_sub(delta) {
                Some(left) if !left.is_zero() => still_pending.push((left, sender)),
                _ => {
                    // receiver may already be gone
                    let _ = sender.send(());
                }
            }
        }
        self.pending = still_pending;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::Power2InOut, Easing::Cosine] {
            assert_eq!(easing.ease(0.0), 0.0, "{easing:?}");
            assert!((easing.ease(1.0) - 1.0).abs() < 1e-6, "{easing:?}");
            assert!((easing.ease(0.5) - 0.5).abs() < 1e-6, "{easing:?}");
        }
    }

    #[test]
    fn test_power2_is_slow_at_both_ends() {
        let ease = Easing::Power2InOut;
        assert!(ease.ease(0.1) < 0.1);
        assert!(ease.ease(0.9) > 0.9);
    }

    #[test]
    fn test_tween_reaches_target_exactly() {
        let mut tween = Tween::new(-1.5, Duration::from_millis(300), Easing::Power2InOut);
        let mut last = 0.0;
        for _ in 0..10 {
            let value = tween.proceed(Duration::from_millis(16));
            assert!(value <= last);
            last = value;
        }
        assert!(!tween.is_finished());
        assert_eq!(tween.proceed(Duration::from_secs(1)), -1.5);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_zero_length_tween_is_finished() {
        let tween = Tween::new(2.0, Duration::ZERO, Easing::Linear);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 2.0);
    }

    #[test]
    fn test_timers_fire_after_duration() {
        let mut timers = Timers::default();
        let mut receiver = timers.sleep(Duration::from_millis(100));
        timers.advance(Duration::from_millis(60));
        assert_eq!(receiver.try_recv(), Ok(None));
        timers.advance(Duration::from_millis(60));
        assert_eq!(receiver.try_recv(), Ok(Some(())));
        assert!(timers.pending.is_empty());
    }
}
