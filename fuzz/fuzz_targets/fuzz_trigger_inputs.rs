//! Fuzz target: `TriggerEngine::evaluate`
//!
//! Derives a deployment and a stream of readings from the fuzz bytes and
//! asserts the combination rule holds on every tick.
//!
//! Invariants checked:
//! - No panics, including on NaN readings and clock jumps
//! - The pump is on only if an enabled start condition holds
//! - The pump is never on while an enabled stop condition holds
//!
//! cargo fuzz run fuzz_trigger_inputs

#![no_main]

use libfuzzer_sys::fuzz_target;
use sampler::config::SamplerConfig;
use sampler::deployment::DeploymentParams;
use sampler::trigger::{PumpCommand, TriggerEngine, TriggerInputs};

fn word(chunk: &[u8], at: usize) -> u32 {
    chunk
        .get(at..at + 4)
        .and_then(|s| s.try_into().ok())
        .map_or(0, u32::from_le_bytes)
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 16 {
        return;
    }
    let (head, readings) = data.split_at(16);

    let params = DeploymentParams {
        target_depth_m: f32::from(head[0]),
        depth_band_m: f32::from(head[1]) / 10.0,
        target_temperature_c: f32::from(head[2]) - 20.0,
        temperature_band_c: f32::from(head[3]) / 10.0,
        wait_after_dive_min: u32::from(head[4] % 8),
        target_volume_l: f32::from(head[5]),
        min_flowrate_l_per_min: f32::from(head[6]) / 50.0,
        max_pump_duration_min: u32::from(head[7] % 8),
        ticks_per_litre: word(head, 8) % 10_000,
    };

    let mut engine = TriggerEngine::new(SamplerConfig::default());
    engine.set_deployment_config(&params);
    let _ = engine.validate();
    engine.set_dive_start_time(word(head, 12));

    for (i, chunk) in readings.chunks(16).enumerate() {
        let inputs = TriggerInputs {
            depth_m: f32::from_bits(word(chunk, 0)),
            temperature_c: f32::from_bits(word(chunk, 4)),
            now: word(chunk, 8),
            flow_ticks: word(chunk, 12),
            pump_elapsed_secs: i as u32,
        };
        engine.update_current_flowrate(inputs.flow_ticks);
        if i == 8 {
            let _ = engine.compute_max_flowrate(inputs.flow_ticks);
        }
        if i == 2 {
            engine.set_pump_start_time(inputs.now);
        }

        let decision = engine.evaluate(&inputs);
        if decision.command == PumpCommand::On {
            assert!(decision.start.is_some());
            assert!(decision.stop.is_none());
        }
        let mask = engine.condition_mask();
        if let Some(start) = decision.start {
            assert!(mask.start.contains(start));
        }
        if let Some(stop) = decision.stop {
            assert!(mask.stop.contains(stop));
        }
    }
});
