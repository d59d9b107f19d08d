//! Periodic sensor emission.

use crate::osc::OscMessage;

/// Counts render blocks and produces one sensor message every `threshold`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitter {
    path: String,
    counter: u32,
    threshold: u32,
}

impl Emitter {
    /// Emit on `path` every `threshold` calls (minimum 1).
    pub fn new(path: impl Into<String>, threshold: u32) -> Self {
        Self {
            path: path.into(),
            counter: 0,
            threshold: threshold.max(1),
        }
    }

    /// Emit on `path` roughly every `interval_ms` of stream time.
    pub fn from_interval(
        path: impl Into<String>,
        interval_ms: f32,
        sample_rate: f32,
        frames_per_block: usize,
    ) -> Self {
        Self::new(path, Self::ticks_for_interval(interval_ms, sample_rate, frames_per_block))
    }

    /// Convert a millisecond interval into render blocks.
    ///
    /// `ceil(interval_ms * sample_rate / 1000 / frames_per_block)`, at least 1.
    pub fn ticks_for_interval(interval_ms: f32, sample_rate: f32, frames_per_block: usize) -> u32 {
        let frames = interval_ms as f64 * sample_rate as f64 / 1000.0;
        let ticks = (frames / frames_per_block.max(1) as f64).ceil();
        if ticks.is_nan() || ticks < 1.0 {
            1
        } else if ticks >= u32::MAX as f64 {
            u32::MAX
        } else {
            ticks as u32
        }
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    #[inline]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Count one block. When the count reaches the threshold, reset to zero
    /// and return the message carrying `sensor_value`.
    pub fn emit_if_due(&mut self, sensor_value: f32) -> Option<OscMessage> {
        self.counter += 1;
        if self.counter < self.threshold {
            return None;
        }
        self.counter = 0;
        Some(OscMessage::new(self.path.as_str()).with_float(sensor_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_for_interval() {
        assert_eq!(Emitter::ticks_for_interval(500.0, 22050.0, 1), 11025);
        assert_eq!(Emitter::ticks_for_interval(500.0, 22050.0, 8), 1379);
        assert_eq!(Emitter::ticks_for_interval(0.0, 22050.0, 8), 1);
        assert_eq!(Emitter::ticks_for_interval(f32::NAN, 22050.0, 8), 1);
        assert_eq!(Emitter::ticks_for_interval(10.0, 1000.0, 0), 10);
    }

    #[test]
    fn test_zero_threshold_clamped() {
        let mut emitter = Emitter::new("/x", 0);
        assert_eq!(emitter.threshold(), 1);
        assert!(emitter.emit_if_due(0.5).is_some());
    }
}
