//! LED modulation generator with float phase accumulator.
//!
//! Each channel is a sine oscillator whose output is squeezed into the band
//! an LED driver stays lit in:
//!
//! ```text
//! out = MIN + RANGE * 0.5 * (1 + sin(phase)) * amplitude
//! ```
//!
//! With amplitude in [0, 1] the output stays in [MIN, MIN + RANGE] = [0.3, 1.0].

use core::f32::consts::{PI, TAU};

/// Lowest output: 1.5 V of the 5 V analog output range.
pub const MINIMUM_AMPLITUDE: f32 = 1.5 / 5.0;

/// Span above [`MINIMUM_AMPLITUDE`] up to full scale.
pub const AMPLITUDE_RANGE: f32 = 1.0 - MINIMUM_AMPLITUDE;

/// Map a phase and amplitude to an output value.
#[inline]
pub fn led_output(phase: f32, amplitude: f32) -> f32 {
    MINIMUM_AMPLITUDE + AMPLITUDE_RANGE * 0.5 * (1.0 + phase.sin()) * amplitude
}

/// State of one modulated output channel.
///
/// Lives for the whole session. The router rewrites `frequency` and
/// `amplitude`; [`advance`](Self::advance) moves `phase` once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelState {
    /// Modulation frequency in Hz
    pub frequency: f32,
    /// Unitless multiplier on the modulation depth
    pub amplitude: f32,
    /// Phase in radians, kept in (-π, π]
    phase: f32,
}

impl ChannelState {
    /// Create a channel at phase 0.
    pub const fn new(frequency: f32, amplitude: f32) -> Self {
        Self {
            frequency,
            amplitude,
            phase: 0.0,
        }
    }

    /// Create a channel at an arbitrary starting phase (wrapped once).
    pub fn with_phase(frequency: f32, amplitude: f32, phase: f32) -> Self {
        Self {
            frequency,
            amplitude,
            phase: wrap(phase),
        }
    }

    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Update both modulation parameters at once.
    #[inline]
    pub fn set(&mut self, amplitude: f32, frequency: f32) {
        self.amplitude = amplitude;
        self.frequency = frequency;
    }

    /// Output for the current phase, without advancing.
    #[inline]
    pub fn output(&self) -> f32 {
        led_output(self.phase, self.amplitude)
    }

    /// Produce this frame's output, then advance phase by one frame.
    ///
    /// # Arguments
    /// * `inverse_sample_rate` - Seconds per frame (1 / sample rate)
    ///
    /// The wrap is single-step: it assumes the phase moves less than 2π per
    /// frame, i.e. `|frequency|` below the sample rate.
    #[inline]
    pub fn advance(&mut self, inverse_sample_rate: f32) -> f32 {
        let out = self.output();
        self.phase = wrap(self.phase + TAU * self.frequency * inverse_sample_rate);
        out
    }

    /// Reset phase to 0, keeping parameters.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// The two modulated LED outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Led {
    Red,
    Green,
}

impl Led {
    pub const ALL: [Led; 2] = [Led::Red, Led::Green];

    /// Position in the `/analogOutputs/<n>` address space.
    pub fn index(self) -> usize {
        match self {
            Led::Red => 0,
            Led::Green => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Led::Red => "red",
            Led::Green => "green",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "red" | "0" => Some(Led::Red),
            "green" | "1" => Some(Led::Green),
            _ => None,
        }
    }
}

/// Both LED channels, owned by the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedChannels {
    pub red: ChannelState,
    pub green: ChannelState,
}

impl LedChannels {
    /// Both channels at the same frequency and amplitude, phase 0.
    pub const fn new(frequency: f32, amplitude: f32) -> Self {
        Self {
            red: ChannelState::new(frequency, amplitude),
            green: ChannelState::new(frequency, amplitude),
        }
    }

    pub fn get(&self, led: Led) -> &ChannelState {
        match led {
            Led::Red => &self.red,
            Led::Green => &self.green,
        }
    }

    pub fn get_mut(&mut self, led: Led) -> &mut ChannelState {
        match led {
            Led::Red => &mut self.red,
            Led::Green => &mut self.green,
        }
    }
}

#[inline]
fn wrap(phase: f32) -> f32 {
    if phase > PI {
        phase - TAU
    } else if phase <= -PI {
        phase + TAU
    } else {
        phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_single_step() {
        assert!((wrap(PI + 0.5) - (0.5 - PI)).abs() < 1e-6);
        assert!((wrap(-PI - 0.5) - (PI - 0.5)).abs() < 1e-6);
        assert_eq!(wrap(PI), PI);
        assert_eq!(wrap(0.25), 0.25);
    }

    #[test]
    fn test_output_band() {
        assert!((led_output(-PI / 2.0, 1.0) - MINIMUM_AMPLITUDE).abs() < 1e-6);
        assert!((led_output(PI / 2.0, 1.0) - 1.0).abs() < 1e-6);
    }
}
