//! Signal generator tests

use core::f32::consts::{PI, TAU};

use analog_osc_bridge::signal::{
    led_output, ChannelState, Led, LedChannels, AMPLITUDE_RANGE, MINIMUM_AMPLITUDE,
};

const SAMPLE_RATE: f32 = 22050.0;

fn in_range(phase: f32) -> bool {
    phase > -PI && phase <= PI
}

#[test]
fn test_phase_stays_wrapped_for_a_full_period() {
    let inv = 1.0 / SAMPLE_RATE;
    for freq in [0.1, 1.0, 3.0, 30.0, 440.0, 5000.0, 11024.0, -3.0, -440.0] {
        let mut ch = ChannelState::new(freq, 1.0);
        let period_ticks = (SAMPLE_RATE / freq.abs()).ceil() as usize;
        for tick in 0..period_ticks.min(100_000) + 10 {
            ch.advance(inv);
            assert!(
                in_range(ch.phase()),
                "freq {} tick {} phase {} out of (-pi, pi]",
                freq,
                tick,
                ch.phase()
            );
        }
    }
}

#[test]
fn test_zero_amplitude_holds_floor() {
    let mut ch = ChannelState::new(7.5, 0.0);
    for _ in 0..1000 {
        assert_eq!(ch.advance(1.0 / SAMPLE_RATE), MINIMUM_AMPLITUDE);
    }
}

#[test]
fn test_zero_frequency_holds_initial_phase() {
    let mut ch = ChannelState::new(0.0, 1.0);
    let expected = MINIMUM_AMPLITUDE + AMPLITUDE_RANGE * 0.5;
    for _ in 0..100 {
        let out = ch.advance(1.0 / SAMPLE_RATE);
        assert!((out - expected).abs() < 1e-6);
    }
    assert_eq!(ch.phase(), 0.0);

    let mut ch = ChannelState::with_phase(0.0, 1.0, PI / 2.0);
    assert!((ch.advance(1.0 / SAMPLE_RATE) - (MINIMUM_AMPLITUDE + AMPLITUDE_RANGE)).abs() < 1e-6);
}

#[test]
fn test_advance_returns_output_before_stepping() {
    let mut ch = ChannelState::new(100.0, 1.0);
    let before = ch.output();
    assert_eq!(ch.advance(1.0 / SAMPLE_RATE), before);

    let expected_phase = TAU * 100.0 / SAMPLE_RATE;
    assert!((ch.phase() - expected_phase).abs() < 1e-6);
}

#[test]
fn test_full_amplitude_stays_in_led_band() {
    let mut ch = ChannelState::new(1234.0, 1.0);
    for _ in 0..10_000 {
        let out = ch.advance(1.0 / SAMPLE_RATE);
        assert!(out >= MINIMUM_AMPLITUDE - 1e-6 && out <= 1.0 + 1e-6, "out {}", out);
    }
}

#[test]
fn test_constants() {
    assert!((MINIMUM_AMPLITUDE - 0.3).abs() < 1e-6);
    assert!((AMPLITUDE_RANGE - 0.7).abs() < 1e-6);
    assert!((led_output(0.0, 0.5) - (0.3 + 0.7 * 0.5 * 0.5)).abs() < 1e-6);
}

#[test]
fn test_set_updates_both_parameters() {
    let mut ch = ChannelState::new(3.0, 0.0);
    ch.set(0.5, 2.0);
    assert_eq!(ch.amplitude, 0.5);
    assert_eq!(ch.frequency, 2.0);
}

#[test]
fn test_reset_keeps_parameters() {
    let mut ch = ChannelState::new(50.0, 0.8);
    for _ in 0..10 {
        ch.advance(1.0 / SAMPLE_RATE);
    }
    ch.reset();
    assert_eq!(ch.phase(), 0.0);
    assert_eq!(ch.frequency, 50.0);
    assert_eq!(ch.amplitude, 0.8);
}

#[test]
fn test_led_names() {
    assert_eq!(Led::from_name("red"), Some(Led::Red));
    assert_eq!(Led::from_name("1"), Some(Led::Green));
    assert_eq!(Led::from_name("blue"), None);
    assert_eq!(Led::Green.index(), 1);
}

#[test]
fn test_led_channels_are_independent() {
    let mut leds = LedChannels::new(3.0, 0.0);
    leds.get_mut(Led::Red).set(1.0, 10.0);
    assert_eq!(leds.get(Led::Red).frequency, 10.0);
    assert_eq!(leds.get(Led::Green).frequency, 3.0);
    assert_eq!(leds.green.amplitude, 0.0);
}
