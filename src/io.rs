//! Per-block analog I/O.
//!
//! The host platform hands the render callback one block of analog frames.
//! [`AnalogBlock`] is the only view of it the core gets: read an input,
//! write an output, both scoped to the current block.

/// One block of interleaved analog frames.
pub trait AnalogBlock {
    /// Frames in this block.
    fn frames(&self) -> usize;

    /// Read input `channel` at `frame`. Out-of-range reads return 0.0.
    fn analog_read(&self, frame: usize, channel: usize) -> f32;

    /// Write output `channel` at `frame`. Out-of-range writes are ignored.
    fn analog_write(&mut self, frame: usize, channel: usize, value: f32);
}

/// Owned block buffer, interleaved frame-major like the hardware DMA layout.
///
/// ```text
/// inputs:  [f0c0 f0c1 .. f0cN][f1c0 f1c1 .. f1cN]...
/// outputs: [f0c0 f0c1 .. f0cM][f1c0 f1c1 .. f1cM]...
/// ```
#[derive(Debug, Clone)]
pub struct BlockBuffer {
    frames: usize,
    input_channels: usize,
    output_channels: usize,
    inputs: Vec<f32>,
    outputs: Vec<f32>,
}

impl BlockBuffer {
    /// Create a zeroed block.
    pub fn new(frames: usize, input_channels: usize, output_channels: usize) -> Self {
        Self {
            frames,
            input_channels,
            output_channels,
            inputs: vec![0.0; frames * input_channels],
            outputs: vec![0.0; frames * output_channels],
        }
    }

    #[inline]
    pub fn input_channels(&self) -> usize {
        self.input_channels
    }

    #[inline]
    pub fn output_channels(&self) -> usize {
        self.output_channels
    }

    /// Set input `channel` at `frame` (host side, before rendering).
    pub fn set_input(&mut self, frame: usize, channel: usize, value: f32) {
        if frame < self.frames && channel < self.input_channels {
            self.inputs[frame * self.input_channels + channel] = value;
        }
    }

    /// Fill input `channel` for every frame from `source(frame)`.
    pub fn fill_input(&mut self, channel: usize, mut source: impl FnMut(usize) -> f32) {
        for frame in 0..self.frames {
            self.set_input(frame, channel, source(frame));
        }
    }

    /// Output `channel` at `frame` (host side, after rendering).
    pub fn output(&self, frame: usize, channel: usize) -> f32 {
        if frame < self.frames && channel < self.output_channels {
            self.outputs[frame * self.output_channels + channel]
        } else {
            0.0
        }
    }

    /// Every frame of output `channel`, in order.
    pub fn output_channel(&self, channel: usize) -> impl Iterator<Item = f32> + '_ {
        (0..self.frames).map(move |frame| self.output(frame, channel))
    }
}

impl AnalogBlock for BlockBuffer {
    #[inline]
    fn frames(&self) -> usize {
        self.frames
    }

    #[inline]
    fn analog_read(&self, frame: usize, channel: usize) -> f32 {
        if frame < self.frames && channel < self.input_channels {
            self.inputs[frame * self.input_channels + channel]
        } else {
            0.0
        }
    }

    #[inline]
    fn analog_write(&mut self, frame: usize, channel: usize, value: f32) {
        if frame < self.frames && channel < self.output_channels {
            self.outputs[frame * self.output_channels + channel] = value;
        }
    }
}
