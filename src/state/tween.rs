use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    /// `1 - (1 - t)^2`, a.k.a. "power1.out".
    #[default]
    OutQuad,
    OutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::OutQuad => 1.0 - (1.0 - t).powi(2),
            Ease::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Time-bounded interpolation of a single value. Times are in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    start: f64,
    duration: f64,
    ease: Ease,
}

impl Tween {
    pub fn new(from: f32, to: f32, start: f64, duration: f64, ease: Ease) -> Self {
        Self { from, to, start, duration: duration.max(0.0), ease }
    }

    #[cfg(test)]
    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: f64) -> f32 {
        let k = self.ease.apply(self.progress(now)) as f32;
        self.from + (self.to - self.from) * k
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let tw = Tween::new(0.5, 1.5, 10.0, 0.5, Ease::OutQuad);
        assert_eq!(tw.sample(10.0), 0.5);
        assert_eq!(tw.sample(10.5), 1.5);
        assert_eq!(tw.sample(99.0), 1.5);
        assert_eq!(tw.sample(0.0), 0.5);
        assert!(!tw.is_finished(10.25));
        assert!(tw.is_finished(10.5));
    }

    #[test]
    fn test_ease_out_is_ahead_of_linear() {
        let eased = Tween::new(0.0, 1.0, 0.0, 1.0, Ease::OutQuad);
        let linear = Tween::new(0.0, 1.0, 0.0, 1.0, Ease::Linear);
        assert!((eased.sample(0.5) - 0.75).abs() < 1e-6);
        assert!(eased.sample(0.5) > linear.sample(0.5));
        assert!(Ease::OutCubic.apply(0.5) > Ease::OutQuad.apply(0.5));
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let tw = Tween::new(0.0, 2.0, 3.0, 0.0, Ease::OutQuad);
        assert!(tw.is_finished(3.0));
        assert_eq!(tw.sample(3.0), 2.0);
    }
}
