//! Pressure sensor sampler.

use crate::io::AnalogBlock;

/// Reads one analog input per frame and remembers the latest value.
///
/// No filtering: the router emits whatever the last frame read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSampler {
    channel: usize,
    last: f32,
}

impl SensorSampler {
    pub const fn new(channel: usize) -> Self {
        Self { channel, last: 0.0 }
    }

    #[inline]
    pub fn channel(&self) -> usize {
        self.channel
    }

    /// Most recent reading (0.0 before the first frame).
    #[inline]
    pub fn last(&self) -> f32 {
        self.last
    }

    /// Read the input for `frame`, overwrite the latest reading, return it.
    #[inline]
    pub fn sample<B: AnalogBlock + ?Sized>(&mut self, block: &B, frame: usize) -> f32 {
        self.last = block.analog_read(frame, self.channel);
        self.last
    }
}
