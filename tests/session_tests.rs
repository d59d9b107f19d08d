//! Session setup/render tests against an in-memory transport

use analog_osc_bridge::config::BridgeConfig;
use analog_osc_bridge::health::{FaultCode, LinkHealth};
use analog_osc_bridge::io::{AnalogBlock, BlockBuffer};
use analog_osc_bridge::logging::LogStream;
use analog_osc_bridge::osc::{OscArg, OscMessage};
use analog_osc_bridge::peer::PeerResponder;
use analog_osc_bridge::signal::{AMPLITUDE_RANGE, MINIMUM_AMPLITUDE};
use analog_osc_bridge::{LoopbackTransport, Session};

/// 1 kHz, 10-frame blocks, one sensor message every 3 blocks.
fn small_config() -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.analog.sample_rate = 1000.0;
    config.analog.frames_per_block = 10;
    config.analog.input_channels = 2;
    config.analog.output_channels = 2;
    config.osc.send_interval_ms = 30.0;
    config
}

fn block_for(config: &BridgeConfig) -> BlockBuffer {
    BlockBuffer::new(
        config.analog.frames_per_block,
        config.analog.input_channels,
        config.analog.output_channels,
    )
}

#[test]
fn test_setup_with_peer() {
    let config = small_config();
    let mut peer = PeerResponder::new("", 0);
    let mut transport = LoopbackTransport::new().with_responder(move |msg| peer.replies(msg));
    let log: LogStream = LogStream::new();
    let health = LinkHealth::new();

    let session = Session::setup(&config, &mut transport, &log, &health);

    assert!(session.handshake_ok());
    assert_eq!(session.emitter().threshold(), 3);
    assert!((session.inverse_sample_rate() - 0.001).abs() < 1e-9);
}

#[test]
fn test_setup_without_peer_still_runs() {
    let config = small_config();
    let mut transport = LoopbackTransport::new();
    let log: LogStream = LogStream::new();
    let health = LinkHealth::new();

    let mut session = Session::setup(&config, &mut transport, &log, &health);
    assert!(!session.handshake_ok());
    assert_eq!(health.code(), FaultCode::HandshakeTimeout);

    let mut block = block_for(&config);
    session.render(&mut block, &mut transport);
    assert_eq!(session.frames_elapsed(), 10);
}

#[test]
fn test_defaults_before_any_message() {
    let config = small_config();
    let mut transport = LoopbackTransport::new();
    let log: LogStream = LogStream::new();
    let health = LinkHealth::new();
    let mut session = Session::new(&config, &log, &health);

    assert_eq!(session.leds().red.frequency, 3.0);
    assert_eq!(session.leds().green.amplitude, 0.0);

    let mut block = block_for(&config);
    session.render(&mut block, &mut transport);
    for frame in 0..block.frames() {
        assert_eq!(block.output(frame, 0), MINIMUM_AMPLITUDE);
        assert_eq!(block.output(frame, 1), MINIMUM_AMPLITUDE);
    }
}

#[test]
fn test_messages_apply_before_the_block_is_generated() {
    let config = small_config();
    let mut transport = LoopbackTransport::new();
    let log: LogStream = LogStream::new();
    let health = LinkHealth::new();
    let mut session = Session::new(&config, &log, &health);

    transport.inject(OscMessage::new("/analogOutputs/0").with_float(1.0).with_float(0.0));
    let mut block = block_for(&config);
    let report = session.render(&mut block, &mut transport);

    assert_eq!(report.received, 1);
    let expected = MINIMUM_AMPLITUDE + AMPLITUDE_RANGE * 0.5;
    for frame in 0..block.frames() {
        assert!((block.output(frame, 0) - expected).abs() < 1e-6);
        assert_eq!(block.output(frame, 1), MINIMUM_AMPLITUDE);
    }
    assert_eq!(health.snapshot().applied, 1);
}

#[test]
fn test_mismatched_message_is_ignored() {
    let config = small_config();
    let mut transport = LoopbackTransport::new();
    let log: LogStream = LogStream::new();
    let health = LinkHealth::new();
    let mut session = Session::new(&config, &log, &health);
    let before = *session.leds();

    transport.inject(OscMessage::new("/analogOutputs/0").with_float(1.0));
    transport.inject(OscMessage::new("/nowhere").with_float(1.0).with_float(1.0));
    let mut block = block_for(&config);
    session.render(&mut block, &mut transport);

    assert_eq!(session.leds().red.amplitude, before.red.amplitude);
    assert_eq!(session.leds().red.frequency, before.red.frequency);
    assert_eq!(health.snapshot().ignored, 2);
}

#[test]
fn test_sensor_emitted_every_threshold_blocks() {
    let config = small_config();
    let mut transport = LoopbackTransport::new();
    let log: LogStream = LogStream::new();
    let health = LinkHealth::new();
    let mut session = Session::new(&config, &log, &health);

    let mut block = block_for(&config);
    let mut emitted = Vec::new();
    for n in 0..6 {
        let level = n as f32 * 0.1;
        block.fill_input(0, |frame| level + frame as f32 * 0.001);
        if session.render(&mut block, &mut transport).emitted {
            emitted.push(n);
        }
    }

    assert_eq!(emitted, vec![2, 5]);
    let sent = transport.take_sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].address(), "/analogInputs/0");
    // Latest reading: last frame of the emitting block.
    match sent[1].args() {
        [OscArg::Float(v)] => assert!((v - (0.5 + 9.0 * 0.001)).abs() < 1e-6),
        other => panic!("unexpected args {:?}", other),
    }
    assert_eq!(health.snapshot().sent, 2);
}

#[test]
fn test_ingest_is_bounded_per_block() {
    let mut config = small_config();
    config.osc.max_messages_per_block = 2;
    let mut transport = LoopbackTransport::new();
    let log: LogStream = LogStream::new();
    let health = LinkHealth::new();
    let mut session = Session::new(&config, &log, &health);

    for i in 0..5 {
        transport.inject(OscMessage::new("/analogOutputs/1").with_float(0.5).with_float(i as f32));
    }
    let mut block = block_for(&config);

    assert_eq!(session.render(&mut block, &mut transport).received, 2);
    assert_eq!(transport.pending(), 3);
    assert_eq!(session.leds().green.frequency, 1.0);

    session.render(&mut block, &mut transport);
    session.render(&mut block, &mut transport);
    assert_eq!(transport.pending(), 0);
    assert_eq!(session.leds().green.frequency, 4.0);
}

#[test]
fn test_send_failure_does_not_stop_rendering() {
    let mut config = small_config();
    config.osc.send_interval_ms = 0.0;
    let mut transport = LoopbackTransport::new();
    transport.set_fail_sends(true);
    let log: LogStream = LogStream::new();
    let health = LinkHealth::new();
    let mut session = Session::new(&config, &log, &health);

    let mut block = block_for(&config);
    for _ in 0..4 {
        let report = session.render(&mut block, &mut transport);
        assert!(!report.emitted);
    }

    assert_eq!(session.frames_elapsed(), 40);
    assert_eq!(health.code(), FaultCode::SendFailed);
    assert_eq!(health.count(), 4);
}

#[test]
fn test_phase_continues_across_blocks() {
    let mut config = small_config();
    config.led.default_amplitude = 1.0;
    config.led.default_frequency_hz = 50.0;
    let mut transport = LoopbackTransport::new();
    let log: LogStream = LogStream::new();
    let health = LinkHealth::new();
    let mut session = Session::new(&config, &log, &health);

    let mut one_block = BlockBuffer::new(20, 2, 2);
    session.render(&mut one_block, &mut transport);
    let continuous: Vec<f32> = one_block.output_channel(0).collect();

    let mut session = Session::new(&config, &log, &health);
    let mut half = BlockBuffer::new(10, 2, 2);
    let mut split = Vec::new();
    for _ in 0..2 {
        session.render(&mut half, &mut transport);
        split.extend(half.output_channel(0));
    }

    assert_eq!(continuous, split);
}

#[test]
fn test_prefix_applies_to_analog_paths() {
    let mut config = small_config();
    config.osc.address_prefix = "/bela".to_string();
    config.osc.send_interval_ms = 0.0;
    let mut transport = LoopbackTransport::new();
    let log: LogStream = LogStream::new();
    let health = LinkHealth::new();
    let mut session = Session::new(&config, &log, &health);

    transport.inject(OscMessage::new("/bela/analogOutputs/0").with_float(0.5).with_float(2.0));
    let mut block = block_for(&config);
    session.render(&mut block, &mut transport);

    assert_eq!(session.leds().red.amplitude, 0.5);
    assert_eq!(transport.sent()[0].address(), "/bela/analogInputs/0");
}

#[test]
fn test_custom_pins() {
    let mut config = small_config();
    config.analog.output_channels = 4;
    config.analog.red_output = 3;
    config.analog.green_output = 2;
    config.led.default_amplitude = 1.0;
    config.led.default_frequency_hz = 0.0;
    let mut transport = LoopbackTransport::new();
    let log: LogStream = LogStream::new();
    let health = LinkHealth::new();
    let mut session = Session::new(&config, &log, &health);

    let mut block = block_for(&config);
    session.render(&mut block, &mut transport);

    let lit = MINIMUM_AMPLITUDE + AMPLITUDE_RANGE * 0.5;
    assert!((block.output(0, 3) - lit).abs() < 1e-6);
    assert!((block.output(0, 2) - lit).abs() < 1e-6);
    assert_eq!(block.output(0, 0), 0.0);
}
