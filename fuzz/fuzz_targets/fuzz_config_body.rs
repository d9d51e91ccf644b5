//! Fuzz target: `parse_deployment_body` → `TriggerEngine::validate`
//!
//! Feeds arbitrary bytes as a `get_config` response body.  Whatever decodes
//! is pushed through configuration and validation.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - A zero flow-meter calibration is never accepted
//! - An accepted configuration has at least one start and one stop condition
//!
//! cargo fuzz run fuzz_config_body

#![no_main]

use libfuzzer_sys::fuzz_target;
use sampler::adapters::server_config::parse_deployment_body;
use sampler::config::SamplerConfig;
use sampler::trigger::TriggerEngine;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(params) = parse_deployment_body(body) else {
        return;
    };

    let mut engine = TriggerEngine::new(SamplerConfig::default());
    engine.set_deployment_config(&params);
    match engine.validate() {
        Ok(mask) => {
            assert!(params.ticks_per_litre > 0, "uncalibrated flow meter accepted");
            assert!(!mask.start.is_empty());
            assert!(!mask.stop.is_empty());
        }
        Err(_) => assert!(!engine.is_valid_user_config()),
    }
});
