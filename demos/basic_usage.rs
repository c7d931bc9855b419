// demos/basic_usage.rs
//! Detect muscle on/off windows in synthetic EMG and compare them with a
//! simulated activation

use emg_onoff::batch::{process_channels, NamedChannel};
use emg_onoff::compare::compare_percent;
use emg_onoff::{ConfigLoader, OnOffConfig, OnOffPipeline};
use std::f64::consts::PI;
use std::path::PathBuf;

const SAMPLE_RATE: f64 = 1000.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🦵 EMG On/Off Detection Demo");
    println!("============================\n");

    // Optional overrides from ./emg_onoff.toml and EMG_ONOFF__* variables
    let config = ConfigLoader::with_paths(vec![PathBuf::from("emg_onoff.toml")])
        .with_environment()
        .load()?;

    demonstrate_single_channel(&config)?;
    demonstrate_batch(&config)?;
    demonstrate_comparison(&config)?;

    println!("✅ Done");
    Ok(())
}

/// One gait cycle of EMG: a short contraction at heel strike, rest, then a
/// longer burst between `burst_start` and `burst_end`
fn gait_cycle_emg(len: usize, burst_start: usize, burst_end: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            let rest = 0.01 * (2.0 * PI * 97.0 * t).sin() + 0.25;
            if i < 40 || (burst_start..burst_end).contains(&i) {
                rest + (2.0 * PI * 80.0 * t).sin()
            } else {
                rest
            }
        })
        .collect()
}

fn demonstrate_single_channel(config: &OnOffConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("📊 Single channel");
    println!("-----------------");

    let pipeline = OnOffPipeline::new(config.clone(), SAMPLE_RATE)?;
    let activity = pipeline.process(&gait_cycle_emg(1500, 600, 900))?;

    println!("  Threshold: {:.4}", activity.threshold);
    println!("  Duty cycle: {:.1}%", activity.timeline.duty_cycle() * 100.0);
    for interval in activity.timeline.intervals() {
        println!(
            "  Active {:.3}s - {:.3}s ({:.0} ms)",
            interval.start_time_s(SAMPLE_RATE),
            interval.end_time_s(SAMPLE_RATE),
            interval.duration_s(SAMPLE_RATE) * 1000.0
        );
    }
    println!();
    Ok(())
}

fn demonstrate_batch(config: &OnOffConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("🧵 Parallel batch");
    println!("-----------------");

    let channels = vec![
        NamedChannel::new("tibialis_anterior", gait_cycle_emg(1500, 100, 300)),
        NamedChannel::new("gastrocnemius", gait_cycle_emg(1500, 500, 800)),
        NamedChannel::new("rectus_femoris", gait_cycle_emg(1500, 900, 1200)),
        NamedChannel::new("disconnected", vec![0.0; 20]),
    ];

    for outcome in process_channels(&channels, SAMPLE_RATE, config)? {
        match outcome.result {
            Ok(activity) => println!(
                "  {:<18} {} interval(s)",
                outcome.name,
                activity.timeline.intervals().len()
            ),
            Err(e) => println!("  {:<18} ❌ {}", outcome.name, e),
        }
    }
    println!();
    Ok(())
}

fn demonstrate_comparison(config: &OnOffConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Measured vs simulated");
    println!("------------------------");

    let pipeline = OnOffPipeline::new(config.clone(), SAMPLE_RATE)?;
    let measured = pipeline.process(&gait_cycle_emg(1001, 400, 700))?.timeline;

    // Simulated activation sampled at 100 Hz over the same cycle
    let simulation = OnOffPipeline::new(config.clone(), 100.0)?;
    let activation: Vec<f64> = (0..101)
        .map(|i| if (38..72).contains(&i) { 0.6 } else { 0.0 })
        .collect();
    let simulated = simulation.process_envelope(&activation)?;

    let report = compare_percent(&measured, &simulated)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
