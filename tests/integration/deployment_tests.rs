//! Full deployments: SamplerService → TriggerEngine → pump, one-second ticks.

use crate::mock_hw::{MockBoard, PumpCall, RecordingSink};

use sampler::adapters::log_sink::LogEventSink;
use sampler::app::events::{AppEvent, DeploymentPhase};
use sampler::app::service::SamplerService;
use sampler::config::SamplerConfig;
use sampler::deployment::DeploymentParams;
use sampler::error::{ActuatorError, ConfigError};
use sampler::trigger::PumpCommand;
use sampler::trigger::conditions::StopCondition;

const TPL: u32 = 4600;

fn configured(params: DeploymentParams) -> (SamplerService, MockBoard, RecordingSink) {
    let mut svc = SamplerService::new(SamplerConfig::default());
    let mut sink = RecordingSink::new();
    svc.configure(&params, &mut sink)
        .expect("deployment should validate");
    assert_eq!(svc.phase(), DeploymentPhase::Ready);
    (svc, MockBoard::new(), sink)
}

/// Tick until the deployment completes or `limit` ticks pass.
fn run_to_completion(
    svc: &mut SamplerService,
    board: &mut MockBoard,
    sink: &mut RecordingSink,
    limit: usize,
) -> usize {
    for n in 1..=limit {
        svc.tick(board, sink);
        if svc.phase() == DeploymentPhase::Complete {
            return n;
        }
    }
    panic!("deployment did not complete within {limit} ticks");
}

fn completion_reason(sink: &RecordingSink) -> Option<StopCondition> {
    sink.events.iter().find_map(|e| match e {
        AppEvent::Completed { reason, .. } => Some(*reason),
        _ => None,
    })
}

fn depth_for_one_minute() -> DeploymentParams {
    DeploymentParams {
        target_depth_m: 20.0,
        depth_band_m: 5.0,
        max_pump_duration_min: 1,
        ticks_per_litre: TPL,
        ..DeploymentParams::default()
    }
}

// ── Depth start / duration stop ───────────────────────────────

#[test]
fn pump_waits_on_the_surface() {
    let (mut svc, mut board, mut sink) = configured(depth_for_one_minute());
    for _ in 0..5 {
        assert_eq!(svc.tick(&mut board, &mut sink), PumpCommand::Off);
    }
    assert_eq!(svc.phase(), DeploymentPhase::Ready);
    assert!(board.calls.is_empty());
}

#[test]
fn duration_limit_completes_deployment() {
    let (mut svc, mut board, mut sink) = configured(depth_for_one_minute());
    board.ticks_per_sec = 76;
    svc.tick(&mut board, &mut sink);

    board.depth_m = 20.0;
    run_to_completion(&mut svc, &mut board, &mut sink, 200);

    assert_eq!(completion_reason(&sink), Some(StopCondition::Duration));
    assert_eq!(svc.pump_elapsed_secs(), 60);
    assert_eq!(board.calls, vec![PumpCall::Start, PumpCall::Stop]);
    assert!(!board.pump_running);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::PeakFlowCaptured(_))),
        1,
        "peak flow is captured once after the warm-up"
    );

    // Complete is terminal: back in band, still no pumping.
    for _ in 0..10 {
        assert_eq!(svc.tick(&mut board, &mut sink), PumpCommand::Off);
    }
    assert_eq!(board.starts(), 1);
}

#[test]
fn pump_time_only_counts_while_running() {
    let (mut svc, mut board, mut sink) = configured(depth_for_one_minute());
    board.depth_m = 20.0;
    for _ in 0..20 {
        svc.tick(&mut board, &mut sink);
    }
    assert!(svc.is_pump_on());

    // Drift out of the band for half a minute.
    board.depth_m = 30.0;
    for _ in 0..30 {
        assert_eq!(svc.tick(&mut board, &mut sink), PumpCommand::Off);
    }
    assert_eq!(svc.phase(), DeploymentPhase::Deployed);
    assert_eq!(svc.pump_elapsed_secs(), 20);

    board.depth_m = 22.0;
    run_to_completion(&mut svc, &mut board, &mut sink, 200);
    assert_eq!(svc.pump_elapsed_secs(), 60);
    assert_eq!(
        board.calls,
        vec![PumpCall::Start, PumpCall::Stop, PumpCall::Start, PumpCall::Stop]
    );
}

// ── Volume stop ───────────────────────────────────────────────

#[test]
fn volume_target_completes_deployment() {
    let (mut svc, mut board, mut sink) = configured(DeploymentParams {
        target_depth_m: 20.0,
        depth_band_m: 5.0,
        target_volume_l: 1.0,
        ticks_per_litre: 100,
        ..DeploymentParams::default()
    });
    board.depth_m = 20.0;
    board.ticks_per_sec = 10;

    run_to_completion(&mut svc, &mut board, &mut sink, 50);
    assert_eq!(completion_reason(&sink), Some(StopCondition::Volume));
    assert_eq!(board.flow_ticks, 100);
    assert!(!board.pump_running);
}

// ── Flow decay stop ───────────────────────────────────────────

#[test]
fn clogged_filter_completes_deployment() {
    let (mut svc, mut board, mut sink) = configured(DeploymentParams {
        target_depth_m: 20.0,
        depth_band_m: 5.0,
        min_flowrate_l_per_min: 0.5,
        ticks_per_litre: TPL,
        ..DeploymentParams::default()
    });
    board.depth_m = 20.0;
    board.ticks_per_sec = 76;

    // Warm-up: the decay condition cannot fire before the peak exists.
    for _ in 0..15 {
        assert_eq!(svc.tick(&mut board, &mut sink), PumpCommand::On);
    }
    let peak = svc.engine().peak_flowrate();
    assert!((peak - 76.0 * 60.0).abs() < 1.0, "peak {peak}");

    board.ticks_per_sec = 20;
    let ticks = run_to_completion(&mut svc, &mut board, &mut sink, 10);
    assert!(ticks <= 6);
    assert_eq!(completion_reason(&sink), Some(StopCondition::Flowrate));
}

// ── Dive wait start ───────────────────────────────────────────

#[test]
fn dive_wait_counts_from_submersion() {
    let (mut svc, mut board, mut sink) = configured(DeploymentParams {
        wait_after_dive_min: 1,
        max_pump_duration_min: 1,
        ticks_per_litre: TPL,
        ..DeploymentParams::default()
    });
    board.depth_m = 1.0;
    svc.tick(&mut board, &mut sink);
    assert_eq!(svc.phase(), DeploymentPhase::Ready);

    board.depth_m = 3.0;
    svc.tick(&mut board, &mut sink);
    let dived_at = board.now;
    assert_eq!(svc.phase(), DeploymentPhase::Deployed);
    assert!(sink.events.contains(&AppEvent::DiveStarted { at: dived_at }));

    while !svc.is_pump_on() {
        svc.tick(&mut board, &mut sink);
        assert!(board.now <= dived_at + 60, "pump late");
    }
    assert_eq!(board.now, dived_at + 60);
    assert_eq!(svc.engine().pump_start_time(), Some(dived_at + 60));
    assert!(sink.events.contains(&AppEvent::PumpStarted { at: dived_at + 60 }));
}

// ── Invalid configuration ─────────────────────────────────────

#[test]
fn invalid_deployment_never_pumps() {
    let mut svc = SamplerService::new(SamplerConfig::default());
    let mut sink = RecordingSink::new();
    let mut board = MockBoard::new();
    let params = DeploymentParams {
        target_depth_m: 20.0,
        depth_band_m: 5.0,
        ticks_per_litre: TPL,
        ..DeploymentParams::default()
    };
    assert_eq!(
        svc.configure(&params, &mut sink),
        Err(ConfigError::NoStopCondition)
    );

    board.depth_m = 20.0;
    for _ in 0..30 {
        assert_eq!(svc.tick(&mut board, &mut sink), PumpCommand::Off);
    }
    assert_eq!(svc.phase(), DeploymentPhase::NotReady);
    assert!(board.calls.is_empty());
}

// ── Actuator faults ───────────────────────────────────────────

#[test]
fn jammed_pump_is_reported_and_retried() {
    let (mut svc, mut board, mut sink) = configured(depth_for_one_minute());
    board.depth_m = 20.0;
    board.jammed = true;
    for _ in 0..3 {
        svc.tick(&mut board, &mut sink);
    }
    assert!(!svc.is_pump_on());
    assert_eq!(svc.pump_elapsed_secs(), 0);
    assert_eq!(
        sink.count(|e| *e == AppEvent::ActuatorFault(ActuatorError::GpioWriteFailed)),
        3
    );

    board.jammed = false;
    svc.tick(&mut board, &mut sink);
    assert!(svc.is_pump_on());
    assert!(board.pump_running);
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn reset_allows_a_second_deployment() {
    let (mut svc, mut board, mut sink) = configured(depth_for_one_minute());
    board.depth_m = 20.0;
    run_to_completion(&mut svc, &mut board, &mut sink, 200);

    svc.reset(&mut board, &mut sink);
    assert_eq!(svc.phase(), DeploymentPhase::NotReady);
    assert_eq!(svc.pump_elapsed_secs(), 0);

    svc.configure(&depth_for_one_minute(), &mut sink).unwrap();
    assert_eq!(svc.tick(&mut board, &mut sink), PumpCommand::On);
    assert_eq!(board.starts(), 2);
}

fn one_litre_at_depth() -> DeploymentParams {
    DeploymentParams {
        target_depth_m: 20.0,
        depth_band_m: 5.0,
        target_volume_l: 1.0,
        ticks_per_litre: 100,
        ..DeploymentParams::default()
    }
}

#[test]
fn back_to_back_volume_deployments_each_collect_a_sample() {
    let (mut svc, mut board, mut sink) = configured(one_litre_at_depth());
    board.depth_m = 20.0;
    board.ticks_per_sec = 10;
    run_to_completion(&mut svc, &mut board, &mut sink, 50);
    assert_eq!(board.flow_ticks, 100);

    // The pulse counter keeps its total across deployments.
    svc.reset(&mut board, &mut sink);
    svc.configure(&one_litre_at_depth(), &mut sink).unwrap();
    assert_eq!(svc.tick(&mut board, &mut sink), PumpCommand::On);

    run_to_completion(&mut svc, &mut board, &mut sink, 50);
    assert_eq!(board.starts(), 2);
    assert_eq!(board.flow_ticks, 200);
    assert_eq!(svc.pump_elapsed_secs(), 10);
    assert_eq!(svc.telemetry().flow_ticks, 100);
    assert_eq!(
        sink.count(|e| matches!(
            e,
            AppEvent::Completed {
                reason: StopCondition::Volume,
                ..
            }
        )),
        2
    );
}

#[test]
fn volume_is_measured_across_counter_wrap() {
    let (mut svc, mut board, mut sink) = configured(one_litre_at_depth());
    board.flow_ticks = u32::MAX - 35;
    board.depth_m = 20.0;
    board.ticks_per_sec = 10;

    run_to_completion(&mut svc, &mut board, &mut sink, 50);
    assert_eq!(completion_reason(&sink), Some(StopCondition::Volume));
    assert_eq!(board.flow_ticks, 64);
    assert_eq!(svc.pump_elapsed_secs(), 10);
}

#[test]
fn telemetry_reflects_the_last_tick() {
    let (mut svc, mut board, mut sink) = configured(depth_for_one_minute());
    board.depth_m = 21.5;
    board.temperature_c = 9.0;
    svc.tick(&mut board, &mut sink);
    svc.publish_telemetry(&mut sink);

    let Some(AppEvent::Telemetry(t)) = sink.events.last() else {
        panic!("expected telemetry, got {:?}", sink.events.last());
    };
    assert_eq!(t.phase, DeploymentPhase::Deployed);
    assert_eq!(t.now, board.now);
    assert!((t.depth_m - 21.5).abs() < f32::EPSILON);
    assert!(t.pump_on);
}

#[test]
fn log_sink_drives_a_whole_deployment() {
    let mut svc = SamplerService::new(SamplerConfig::default());
    let mut sink = LogEventSink::new();
    let mut board = MockBoard::new();
    svc.configure(&depth_for_one_minute(), &mut sink).unwrap();
    board.depth_m = 20.0;
    for _ in 0..70 {
        svc.tick(&mut board, &mut sink);
        svc.publish_telemetry(&mut sink);
    }
    assert_eq!(svc.phase(), DeploymentPhase::Complete);
}
